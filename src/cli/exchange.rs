
use clap::Args;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::core::{check_required_filename, AFTER_HELP, FULL_VERSION};
use crate::data_types::gt_source::GtSource;

#[derive(Args, Clone, Default, Serialize)]
#[clap(author, about,
    after_help = &**AFTER_HELP
)]
pub struct ExchangeSettings {
    #[clap(default_value = "")]
    #[clap(hide = true)]
    swapgt_version: String,

    /// Input variant call file (VCF or BCF)
    #[clap(required = true)]
    #[clap(short = 'i')]
    #[clap(long = "input-vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub input_vcf_filename: PathBuf,

    /// Output variant call file; bgzipped when the filename ends in .gz
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_vcf_filename: PathBuf,

    /// Optional output statistics file (JSON)
    #[clap(long = "output-stats")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_stats_filename: Option<PathBuf>,

    // The source flags mirror the upstream pipeline naming; they override each other so
    // the last flag on the command line silently wins, matching the original tool.
    /// Swap FORMAT/DV_GT into FORMAT/GT
    #[clap(long = "dv")]
    #[clap(overrides_with_all = ["use_hc", "use_strelka2", "use_dv_priority", "use_concensus"])]
    #[clap(help_heading = Some("Source selection"))]
    pub use_dv: bool,

    /// Swap FORMAT/HC_GT into FORMAT/GT
    #[clap(long = "hc")]
    #[clap(overrides_with_all = ["use_dv", "use_strelka2", "use_dv_priority", "use_concensus"])]
    #[clap(help_heading = Some("Source selection"))]
    pub use_hc: bool,

    /// Swap FORMAT/strelka2_GT into FORMAT/GT
    #[clap(long = "strelka2")]
    #[clap(overrides_with_all = ["use_dv", "use_hc", "use_dv_priority", "use_concensus"])]
    #[clap(help_heading = Some("Source selection"))]
    pub use_strelka2: bool,

    /// Swap FORMAT/dv_priority_GT into FORMAT/GT
    #[clap(long = "dv-priority")]
    #[clap(overrides_with_all = ["use_dv", "use_hc", "use_strelka2", "use_concensus"])]
    #[clap(help_heading = Some("Source selection"))]
    pub use_dv_priority: bool,

    /// Swap FORMAT/concensus_GT into FORMAT/GT [default]
    #[clap(long = "concensus")]
    #[clap(overrides_with_all = ["use_dv", "use_hc", "use_strelka2", "use_dv_priority"])]
    #[clap(help_heading = Some("Source selection"))]
    pub use_concensus: bool,

    /// Disables tabix indexing of a bgzipped output
    #[clap(long = "skip-index")]
    #[clap(help_heading = Some("Input/Output"))]
    pub skip_index: bool,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl ExchangeSettings {
    /// Resolves the flags down to the single active source for the run.
    /// With no flag set, the consensus source is assumed.
    pub fn resolve_source(&self) -> GtSource {
        if self.use_dv {
            GtSource::DeepVariant
        } else if self.use_hc {
            GtSource::HaplotypeCaller
        } else if self.use_strelka2 {
            GtSource::Strelka2
        } else if self.use_dv_priority {
            GtSource::DvPriority
        } else {
            GtSource::Consensus
        }
    }
}

pub fn check_exchange_settings(mut settings: ExchangeSettings) -> anyhow::Result<ExchangeSettings> {
    // hard code the version in
    settings.swapgt_version = FULL_VERSION.clone();
    info!("Swapgt version: {:?}", &settings.swapgt_version);
    info!("Inputs:");

    // check for all the required input files
    check_required_filename(&settings.input_vcf_filename, "Input VCF")?;

    // dump stuff to the logger
    info!("\tInput VCF: {:?}", &settings.input_vcf_filename);

    let source = settings.resolve_source();
    info!("Source selection:");
    info!("\tMode: {source}");
    info!("\tSource tag: {:?}", source.tag());

    // outputs
    info!("Outputs:");
    info!("\tOutput VCF: {:?}", &settings.output_vcf_filename);
    if let Some(stats_fn) = settings.output_stats_filename.as_deref() {
        info!("\tStatistics: {stats_fn:?}");
    }
    if settings.skip_index {
        info!("\tOutput indexing: DISABLED");
    }

    Ok(settings)
}
