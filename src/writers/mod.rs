/*!
# Writers module
Contains the logic for writing the transformed variant stream.
*/
/// Helper functions for indexing files
pub mod noodles_idx;
/// Opens and stamps the output VCF
pub mod vcf_out;
