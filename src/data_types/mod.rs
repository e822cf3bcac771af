/// Tracker for the record and genotype counts of a run
pub mod exchange_stats;
/// Contains the genotype call enumerations and the source tag decoder
pub mod genotype;
/// Contains the enumeration of source genotype tags a user can select
pub mod gt_source;
