
use log::{LevelFilter, error, info};
use noodles::vcf::variant::RecordBuf;
use noodles::vcf::variant::io::Write;
use std::time::Instant;

use swapgt::cli::core::get_cli;
use swapgt::cli::exchange::check_exchange_settings;
use swapgt::gt_exchanger::{GtExchangeConfigBuilder, GtExchanger, ensure_source_tag, rewrite_gt_declaration};
use swapgt::parsing::noodles_helper::open_variant_reader;
use swapgt::util::json_io::save_json;
use swapgt::writers::noodles_idx::index_vcf;
use swapgt::writers::vcf_out::{open_vcf_writer, stamp_header};

fn main() {
    // start the timer
    let start_time = Instant::now();

    // set up logging before we check the other settings
    let cli = get_cli();
    let filter_level: LevelFilter = match cli.settings.verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };
    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();

    let settings = match check_exchange_settings(cli.settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while verifying settings: {e:#}");
            std::process::exit(exitcode::CONFIG);
        }
    };

    // open the input stream and pull the header
    let mut vcf_reader = match open_variant_reader(&settings.input_vcf_filename) {
        Ok(vr) => vr,
        Err(e) => {
            error!("Error while opening input VCF: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };
    let vcf_header = match vcf_reader.read_header() {
        Ok(vh) => vh,
        Err(e) => {
            error!("Error while reading header of {:?}: {e:#}", settings.input_vcf_filename);
            std::process::exit(exitcode::IOERR);
        }
    };

    // the source tag has to be declared up front; a missing tag is a configuration error
    let source = settings.resolve_source();
    if let Err(e) = ensure_source_tag(&vcf_header, source.tag()) {
        error!("Error while binding the source tag: {e}");
        std::process::exit(exitcode::CONFIG);
    }

    let sample_count = vcf_header.sample_names().len();
    info!("Found {sample_count} sample(s) in the input header.");

    // rewrite the output header before any record is processed
    let mut out_header = vcf_header.clone();
    rewrite_gt_declaration(&mut out_header);
    if let Err(e) = stamp_header(&mut out_header) {
        error!("Error while stamping output header: {e:#}");
        std::process::exit(exitcode::SOFTWARE);
    }

    let mut vcf_writer = match open_vcf_writer(&settings.output_vcf_filename, &out_header) {
        Ok(vw) => vw,
        Err(e) => {
            error!("Error while opening output VCF: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    };

    // build the per-run exchanger
    let exchange_config = match GtExchangeConfigBuilder::default()
        .source_tag(source.tag().to_string())
        .sample_count(sample_count)
        .build() {
        Ok(ec) => ec,
        Err(e) => {
            error!("Error while building exchange config: {e:?}");
            std::process::exit(exitcode::SOFTWARE);
        }
    };
    let mut exchanger = GtExchanger::new(exchange_config);

    // one record at a time, start to finish
    info!("Swapping {:?} into GT...", source.tag());
    for result in vcf_reader.records(&vcf_header) {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                error!("Error while reading record: {e}");
                std::process::exit(exitcode::IOERR);
            }
        };
        let record_buf = match RecordBuf::try_from_variant_record(&vcf_header, record.as_ref()) {
            Ok(rb) => rb,
            Err(e) => {
                error!("Error while parsing record: {e}");
                std::process::exit(exitcode::IOERR);
            }
        };

        if let Some(out_record) = exchanger.process(record_buf) {
            if let Err(e) = vcf_writer.write_variant_record(&out_header, &out_record) {
                error!("Error while writing record: {e}");
                std::process::exit(exitcode::IOERR);
            }
        }
    }

    let stats = exchanger.stats();
    info!("Records read: {}", stats.records_read);
    info!("Records emitted: {}", stats.records_emitted);
    info!("Records dropped: {}", stats.records_dropped);
    for (call, count) in stats.call_counts.iter() {
        info!("\t{call}: {count}");
    }

    if let Some(stats_fn) = settings.output_stats_filename.as_deref() {
        info!("Saving statistics to {stats_fn:?}...");
        if let Err(e) = save_json(stats, stats_fn) {
            error!("Error while saving statistics: {e:#}");
            std::process::exit(exitcode::IOERR);
        }
    }

    // drop it from memory, this forces all the finalizing to happen
    std::mem::drop(vcf_writer);

    let bgzf_output = settings.output_vcf_filename.extension().is_some_and(|ext| ext == "gz");
    if bgzf_output && !settings.skip_index {
        info!("Generating index for {:?}...", settings.output_vcf_filename);
        if let Err(e) = index_vcf(&settings.output_vcf_filename) {
            error!("Error while writing index for {:?}: {e:#}", settings.output_vcf_filename);
            std::process::exit(exitcode::IOERR);
        }
    }

    info!("Swap completed in {} seconds.", start_time.elapsed().as_secs_f64());
    info!("Process finished successfully.");
}
