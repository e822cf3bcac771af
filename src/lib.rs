
/// Command line interface functionality
pub mod cli;
/// Contains various shared data types
pub mod data_types;
/// Core logic for swapping a source genotype tag into the primary GT field
pub mod gt_exchanger;
/// Tooling for parsing input files into meaningful structs / data
pub mod parsing;
/// Various utility functions that tend to be very generic
pub mod util;
/// All output writers
pub mod writers;
