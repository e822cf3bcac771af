
use anyhow::Context;
use noodles_util::variant::io::reader::Builder as VcfBuilder;
use noodles_util::variant::io::Reader as VcfReader;
use std::io::BufRead;
use std::path::Path;

/// Wrapper function that opens a variant file for streaming, with the format and
/// compression auto-detected (plain or bgzipped VCF, or BCF).
/// # Arguments
/// * `filename` - path to the variant file to open
pub fn open_variant_reader(filename: &Path) -> anyhow::Result<VcfReader<Box<dyn BufRead>>> {
    let vcf_reader = VcfBuilder::default()
        .build_from_path(filename)
        .with_context(|| format!("Error while opening {filename:?}:"))?;
    Ok(vcf_reader)
}
