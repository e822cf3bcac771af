
use derive_builder::Builder;
use log::trace;
use noodles::vcf;
use noodles::vcf::header::record::value::{Map, map};
use noodles::vcf::variant::record::samples::keys::key as vcf_key;
use noodles::vcf::variant::record_buf;

use crate::data_types::exchange_stats::ExchangeStats;
use crate::data_types::genotype::{decode_gt, Allele};

/// Errors that can come up while binding the source tag to the input header
#[derive(thiserror::Error, Debug)]
pub enum SourceTagError {
    #[error("the source tag is not declared as a FORMAT field in the input header: {tag:?}")]
    UndeclaredTag {
        tag: String
    }
}

/// Verifies that the chosen source tag is declared as a FORMAT field in the input header.
/// This is a configuration error path and is meant to be checked before any record is processed.
/// # Arguments
/// * `header` - the input VCF header
/// * `tag` - the FORMAT tag the active source reads from
pub fn ensure_source_tag(header: &vcf::Header, tag: &str) -> Result<(), SourceTagError> {
    if header.formats().contains_key(tag) {
        Ok(())
    } else {
        Err(SourceTagError::UndeclaredTag { tag: tag.to_string() })
    }
}

/// Rewrites the GT declaration in an output header: any pre-existing FORMAT/GT line is
/// removed and a fresh one is appended. Idempotent; must run before the first record is
/// written since the new GT series relies on this declaration.
/// # Arguments
/// * `header` - the output VCF header to mutate
pub fn rewrite_gt_declaration(header: &mut vcf::Header) {
    let formats = header.formats_mut();
    formats.shift_remove(vcf_key::GENOTYPE);
    formats.insert(
        vcf_key::GENOTYPE.to_string(),
        Map::<map::Format>::new(map::format::Number::Count(1), map::format::Type::String, "Genotype")
    );
}

/// Controls how records get their GT field swapped
#[derive(Builder, Clone, Debug)]
pub struct GtExchangeConfig {
    /// The FORMAT tag we read per-sample calls from
    source_tag: String,
    /// Number of samples in the stream, fixed by the input header
    sample_count: usize
}

/// Per-run transformer that swaps the source tag calls into the primary GT field.
/// One record is processed start-to-finish at a time; the allele buffer is scratch
/// space that is fully repopulated for each record.
pub struct GtExchanger {
    /// Run configuration, immutable after construction
    config: GtExchangeConfig,
    /// Scratch allele slots, sample-major, 2 per sample; lazily grown and reused across records
    allele_buffer: Vec<Allele>,
    /// Accumulated record and call counts
    stats: ExchangeStats
}

impl GtExchanger {
    /// Constructor
    /// # Arguments
    /// * `config` - the run configuration, usually from `GtExchangeConfigBuilder`
    pub fn new(config: GtExchangeConfig) -> Self {
        Self {
            config,
            allele_buffer: vec![],
            stats: Default::default()
        }
    }

    /// Core per-record transform. Decodes the source tag for every sample and overwrites
    /// the record's GT series with the canonical calls. Returns None when the source tag
    /// is not populated on this record, which filters it from the output stream.
    /// No field other than GT is modified.
    /// # Arguments
    /// * `record` - the record to transform, consumed so the drop path discards it
    pub fn process(&mut self, mut record: record_buf::RecordBuf) -> Option<record_buf::RecordBuf> {
        self.stats.records_read += 1;

        if !self.decode_record(&record) {
            self.stats.records_dropped += 1;
            trace!("Dropping record without {:?}: {record:?}", self.config.source_tag);
            return None;
        }

        self.rewrite_genotypes(&mut record);
        self.stats.records_emitted += 1;
        Some(record)
    }

    /// Populates the allele buffer from the record's source tag series.
    /// Returns false when the tag is absent from the record or carries non-string
    /// values, the drop signal.
    /// Every sample always gets exactly 2 slots written, so stale content from a
    /// previous record can never leak through.
    fn decode_record(&mut self, record: &record_buf::RecordBuf) -> bool {
        let sample_count = self.config.sample_count;
        let samples = record.samples();

        // absent tag or an empty sample set is the "no data" signal from the original field fetch
        if !samples.keys().as_ref().contains(self.config.source_tag.as_str()) || sample_count == 0 {
            return false;
        }

        // a tag declared with a non-String type fails the string fetch outright, so the
        // record is dropped the same way an absent tag is; checked up front so no call
        // is tallied for a record that gets discarded
        for i in 0..sample_count {
            let opt_sample = samples.get_index(i);
            let raw_value = opt_sample.as_ref()
                .and_then(|sample| sample.get(self.config.source_tag.as_str()))
                .flatten();
            if !matches!(raw_value, None | Some(record_buf::samples::sample::Value::String(_))) {
                return false;
            }
        }

        if self.allele_buffer.len() < 2 * sample_count {
            self.allele_buffer.resize(2 * sample_count, Allele::Unknown);
        }

        for i in 0..sample_count {
            // samples beyond the record's series or with null entries decode to missing
            let opt_sample = samples.get_index(i);
            let raw_value = opt_sample.as_ref()
                .and_then(|sample| sample.get(self.config.source_tag.as_str()))
                .flatten();
            let raw_text = match raw_value {
                Some(record_buf::samples::sample::Value::String(s)) => Some(s.as_str()),
                _ => None
            };

            let call = decode_gt(raw_text);
            let alleles = call.decompose_alleles();
            self.allele_buffer[2 * i] = alleles[0];
            self.allele_buffer[2 * i + 1] = alleles[1];
            self.stats.record_call(call);
        }

        true
    }

    /// Overwrites the record's GT series from the allele buffer, replacing any existing
    /// genotype values. GT is placed first in the FORMAT key order per VCF convention;
    /// all other series are carried through untouched.
    fn rewrite_genotypes(&self, record: &mut record_buf::RecordBuf) {
        let sample_count = self.config.sample_count;
        let old_samples = record.samples();
        let old_keys = old_samples.keys();

        // GT first, then everything else in original order
        let new_keys: record_buf::samples::Keys = std::iter::once(vcf_key::GENOTYPE.to_string())
            .chain(old_keys.as_ref().iter().filter(|k| k.as_str() != vcf_key::GENOTYPE).cloned())
            .collect();

        let mut new_values: Vec<Vec<Option<record_buf::samples::sample::Value>>> = Vec::with_capacity(sample_count);
        for i in 0..sample_count {
            let gt_string = render_gt_pair(self.allele_buffer[2 * i], self.allele_buffer[2 * i + 1]);

            let mut sample_values = Vec::with_capacity(new_keys.as_ref().len());
            sample_values.push(Some(record_buf::samples::sample::Value::from(gt_string)));

            // carry through the non-GT series for this sample
            let old_sample = old_samples.get_index(i);
            for key in old_keys.as_ref().iter().filter(|k| k.as_str() != vcf_key::GENOTYPE) {
                let value = old_sample.as_ref()
                    .and_then(|sample| sample.get(key.as_str()))
                    .flatten()
                    .cloned();
                sample_values.push(value);
            }
            new_values.push(sample_values);
        }

        *record.samples_mut() = record_buf::Samples::new(new_keys, new_values);
    }

    // getters
    pub fn stats(&self) -> &ExchangeStats {
        &self.stats
    }
}

/// Renders a buffer allele pair back into the textual GT form.
/// The decoder never emits a partial call, so a pair with any unknown slot is "./.".
fn render_gt_pair(first: Allele, second: Allele) -> String {
    match (first.to_index(), second.to_index()) {
        (Some(a1), Some(a2)) => format!("{a1}/{a2}"),
        _ => "./.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::data_types::genotype::GenotypeCall;

    /// Builds a header with the given sample names, declaring the source tag and a DP field
    fn build_test_header(sample_names: &[&str]) -> vcf::Header {
        let mut builder = vcf::Header::builder()
            .add_format(
                "concensus_GT",
                Map::<map::Format>::new(map::format::Number::Count(1), map::format::Type::String, "Consensus genotype")
            )
            .add_format(
                "DP",
                Map::<map::Format>::new(map::format::Number::Count(1), map::format::Type::Integer, "Read depth")
            );
        for &name in sample_names {
            builder = builder.add_sample_name(name);
        }
        builder.build()
    }

    /// Builds a single-position record with the given FORMAT keys and per-sample values
    fn build_test_record(keys: &[&str], values: Vec<Vec<Option<record_buf::samples::sample::Value>>>) -> record_buf::RecordBuf {
        let format_keys: record_buf::samples::Keys = keys.iter().map(|k| k.to_string()).collect();
        let samples = record_buf::Samples::new(format_keys, values);
        record_buf::RecordBuf::builder()
            .set_reference_sequence_name("chr1")
            .set_variant_start(noodles::core::Position::new(100).unwrap())
            .set_reference_bases("A")
            .set_alternate_bases(record_buf::AlternateBases::from(vec![String::from("C")]))
            .set_samples(samples)
            .build()
    }

    fn test_exchanger(sample_count: usize) -> GtExchanger {
        let config = GtExchangeConfigBuilder::default()
            .source_tag("concensus_GT".to_string())
            .sample_count(sample_count)
            .build()
            .unwrap();
        GtExchanger::new(config)
    }

    /// Pulls the GT string for a sample out of a transformed record
    fn get_gt(record: &record_buf::RecordBuf, sample_index: usize) -> String {
        let samples = record.samples();
        let sample = samples.get_index(sample_index).unwrap();
        let value = sample.get(vcf_key::GENOTYPE).unwrap().unwrap();
        match value {
            record_buf::samples::sample::Value::String(s) => s.clone(),
            v => panic!("expected GT string, found {v:?}")
        }
    }

    #[test]
    fn test_ensure_source_tag() {
        let header = build_test_header(&["sample1"]);
        assert!(ensure_source_tag(&header, "concensus_GT").is_ok());

        // DV_GT is not declared, so this configuration must fail
        let error = ensure_source_tag(&header, "DV_GT").unwrap_err();
        assert_eq!(error.to_string(), "the source tag is not declared as a FORMAT field in the input header: \"DV_GT\"");
    }

    #[test]
    fn test_rewrite_gt_declaration() {
        let mut header = build_test_header(&["sample1"]);
        assert!(!header.formats().contains_key(vcf_key::GENOTYPE));

        rewrite_gt_declaration(&mut header);
        assert_eq!(header.formats().keys().filter(|k| k.as_str() == vcf_key::GENOTYPE).count(), 1);
        let gt_format = header.formats().get(vcf_key::GENOTYPE).unwrap();
        assert_eq!(gt_format.ty(), map::format::Type::String);

        // second application must leave exactly one declaration
        rewrite_gt_declaration(&mut header);
        assert_eq!(header.formats().keys().filter(|k| k.as_str() == vcf_key::GENOTYPE).count(), 1);
    }

    #[test]
    fn test_process_three_samples() {
        let mut exchanger = test_exchanger(3);

        // ["0/1", null, "1/1"] is the canonical mixed-sample scenario
        let record = build_test_record(
            &["GT", "concensus_GT"],
            vec![
                vec![
                    Some(record_buf::samples::sample::Value::from("1/1")), // stale GT, must be replaced
                    Some(record_buf::samples::sample::Value::from("0/1"))
                ],
                vec![
                    Some(record_buf::samples::sample::Value::from("0/0")),
                    None
                ],
                vec![
                    None,
                    Some(record_buf::samples::sample::Value::from("1/1"))
                ],
            ]
        );

        let result = exchanger.process(record).expect("record should be retained");
        assert_eq!(get_gt(&result, 0), "0/1");
        assert_eq!(get_gt(&result, 1), "./.");
        assert_eq!(get_gt(&result, 2), "1/1");

        // buffer length is always 2x the sample count
        assert_eq!(exchanger.allele_buffer.len(), 6);

        let stats = exchanger.stats();
        assert_eq!(stats.records_read, 1);
        assert_eq!(stats.records_emitted, 1);
        assert_eq!(stats.records_dropped, 0);
        assert_eq!(stats.call_counts.get("0/1"), Some(&1));
        assert_eq!(stats.call_counts.get("./."), Some(&1));
        assert_eq!(stats.call_counts.get("1/1"), Some(&1));
    }

    #[test]
    fn test_process_drops_missing_tag() {
        let mut exchanger = test_exchanger(1);

        // the record only carries DP, so the source fetch comes back empty
        let record = build_test_record(
            &["DP"],
            vec![
                vec![Some(record_buf::samples::sample::Value::from(30))]
            ]
        );

        assert!(exchanger.process(record).is_none());
        let stats = exchanger.stats();
        assert_eq!(stats.records_read, 1);
        assert_eq!(stats.records_emitted, 0);
        assert_eq!(stats.records_dropped, 1);
        assert!(stats.call_counts.is_empty());
    }

    #[test]
    fn test_gt_is_first_and_other_series_survive() {
        let mut exchanger = test_exchanger(1);

        let record = build_test_record(
            &["DP", "concensus_GT"],
            vec![
                vec![
                    Some(record_buf::samples::sample::Value::from(42)),
                    Some(record_buf::samples::sample::Value::from("1/0"))
                ]
            ]
        );

        let result = exchanger.process(record).unwrap();
        let keys: Vec<&str> = result.samples().keys().as_ref().iter().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["GT", "DP", "concensus_GT"]);

        // 1/0 is canonicalized to 0/1
        assert_eq!(get_gt(&result, 0), "0/1");

        // DP must be untouched
        let samples = result.samples();
        let sample = samples.get_index(0).unwrap();
        let dp = sample.get("DP").unwrap().unwrap();
        assert_eq!(dp, &record_buf::samples::sample::Value::from(42));
    }

    #[test]
    fn test_process_drops_non_string_tag() {
        let mut exchanger = test_exchanger(2);

        // the tag is present but typed as integers, so the string fetch fails and the
        // whole record is dropped with no call tallied, even for the string sample
        let record = build_test_record(
            &["concensus_GT"],
            vec![
                vec![Some(record_buf::samples::sample::Value::from("0/1"))],
                vec![Some(record_buf::samples::sample::Value::from(7))],
            ]
        );

        assert!(exchanger.process(record).is_none());
        let stats = exchanger.stats();
        assert_eq!(stats.records_dropped, 1);
        assert!(stats.call_counts.is_empty());
    }

    #[test]
    fn test_no_stale_buffer_leak() {
        // a wide record followed by a narrower decode must not reuse old slots
        let mut exchanger = test_exchanger(2);
        let wide = build_test_record(
            &["concensus_GT"],
            vec![
                vec![Some(record_buf::samples::sample::Value::from("1/1"))],
                vec![Some(record_buf::samples::sample::Value::from("1/1"))],
            ]
        );
        exchanger.process(wide).unwrap();

        let narrow = build_test_record(
            &["concensus_GT"],
            vec![
                vec![Some(record_buf::samples::sample::Value::from("0/0"))],
                vec![None],
            ]
        );
        let result = exchanger.process(narrow).unwrap();
        assert_eq!(get_gt(&result, 0), "0/0");
        assert_eq!(get_gt(&result, 1), "./.");
    }

    #[test]
    fn test_render_gt_pair() {
        let pairs = [
            (GenotypeCall::Missing, "./."),
            (GenotypeCall::HomozygousReference, "0/0"),
            (GenotypeCall::Heterozygous, "0/1"),
            (GenotypeCall::HomozygousAlternate, "1/1"),
        ];
        for (call, expected) in pairs {
            let alleles = call.decompose_alleles();
            assert_eq!(render_gt_pair(alleles[0], alleles[1]), expected);
        }
    }
}
