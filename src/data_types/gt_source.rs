
/// The selectable source genotype tags.
/// Each variant is bound 1:1 to a FORMAT tag produced by the upstream calling pipeline;
/// the tag spellings (including "concensus") are fixed by that pipeline.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum_macros::Display)]
pub enum GtSource {
    /// FORMAT/DV_GT from DeepVariant
    #[strum(serialize = "DV")]
    DeepVariant,
    /// FORMAT/HC_GT from GATK HaplotypeCaller
    #[strum(serialize = "HC")]
    HaplotypeCaller,
    /// FORMAT/strelka2_GT from Strelka2
    #[strum(serialize = "strelka2")]
    Strelka2,
    /// FORMAT/dv_priority_GT, the DeepVariant-priority consensus
    #[strum(serialize = "dv_priority")]
    DvPriority,
    /// FORMAT/concensus_GT, the majority-vote consensus; the default source
    #[default]
    #[strum(serialize = "concensus")]
    Consensus
}

impl GtSource {
    /// Returns the FORMAT tag this source reads from.
    pub fn tag(&self) -> &'static str {
        match self {
            GtSource::DeepVariant => "DV_GT",
            GtSource::HaplotypeCaller => "HC_GT",
            GtSource::Strelka2 => "strelka2_GT",
            GtSource::DvPriority => "dv_priority_GT",
            GtSource::Consensus => "concensus_GT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_binding() {
        assert_eq!(GtSource::DeepVariant.tag(), "DV_GT");
        assert_eq!(GtSource::HaplotypeCaller.tag(), "HC_GT");
        assert_eq!(GtSource::Strelka2.tag(), "strelka2_GT");
        assert_eq!(GtSource::DvPriority.tag(), "dv_priority_GT");
        assert_eq!(GtSource::Consensus.tag(), "concensus_GT");
    }

    #[test]
    fn test_default_is_consensus() {
        assert_eq!(GtSource::default(), GtSource::Consensus);
        assert_eq!(GtSource::default().tag(), "concensus_GT");
    }
}
