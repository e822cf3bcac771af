
use anyhow::Context;
use log::debug;
use noodles::vcf;
use std::path::Path;

/// Stamps the output header with the version and invocation of this run.
/// # Arguments
/// * `header` - the output header to stamp
pub fn stamp_header(header: &mut vcf::Header) -> anyhow::Result<()> {
    let ver: &str = crate::cli::core::FULL_VERSION.as_str(); // clippy gets weird about direct access
    let cli_version = format!("\"{ver}\"");
    let cli_string = format!("\"{}\"", std::env::args().collect::<Vec<String>>().join(" "));
    header.insert("swapgt_version".parse()?, vcf::header::record::Value::from(cli_version))?;
    header.insert("swapgt_command".parse()?, vcf::header::record::Value::from(cli_string))?;
    Ok(())
}

/// Opens the output VCF for writing and writes the provided header.
/// The stream is bgzip compressed when the filename ends in .gz.
/// # Arguments
/// * `vcf_fn` - the output filename
/// * `header` - the already-rewritten header to lead the file with
pub fn open_vcf_writer(vcf_fn: &Path, header: &vcf::Header) -> anyhow::Result<vcf::io::Writer<Box<dyn std::io::Write>>> {
    let is_compressed = match vcf_fn.extension() {
        Some(extension) => extension == "gz",
        None => false
    };
    let compression_method = if is_compressed {
        vcf::io::CompressionMethod::Bgzf
    } else {
        vcf::io::CompressionMethod::None
    };

    debug!("Opening {vcf_fn:?} for writing...");
    let mut vcf_writer = vcf::io::writer::Builder::default()
        .set_compression_method(compression_method)
        .build_from_path(vcf_fn)
        .with_context(|| format!("Error while opening {vcf_fn:?} for writing:"))?;
    vcf_writer.write_header(header)
        .with_context(|| format!("Error while writing header to {vcf_fn:?}:"))?;

    Ok(vcf_writer)
}
