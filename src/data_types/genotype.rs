
/// A single allele slot in a diploid call
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Allele {
    /// Indicates an unknown allele, '.' in a file
    Unknown,
    /// The reference allele, 0 in a file
    Reference,
    /// The alternate allele, 1 in a file
    Alternate
}

impl Allele {
    /// Converts into the numeric allele index, or None for an unknown allele.
    pub fn to_index(&self) -> Option<u8> {
        match self {
            Allele::Unknown => None,
            Allele::Reference => Some(0),
            Allele::Alternate => Some(1),
        }
    }
}

/// Captures the diploid calls the source tags can encode.
/// The string form (via `AsRef<str>`) is the canonical unphased GT rendering.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, strum_macros::AsRefStr)]
pub enum GenotypeCall {
    /// Anything unrecognized, including absent values
    #[default]
    #[strum(serialize = "./.")]
    Missing,
    /// 0/0
    #[strum(serialize = "0/0")]
    HomozygousReference,
    /// 0/1 or 1/0, canonicalized to 0/1
    #[strum(serialize = "0/1")]
    Heterozygous,
    /// 1/1
    #[strum(serialize = "1/1")]
    HomozygousAlternate
}

impl GenotypeCall {
    /// Splits the call into its two allele slots, always exactly two.
    pub fn decompose_alleles(&self) -> [Allele; 2] {
        match self {
            GenotypeCall::Missing => [Allele::Unknown, Allele::Unknown],
            GenotypeCall::HomozygousReference => [Allele::Reference, Allele::Reference],
            GenotypeCall::Heterozygous => [Allele::Reference, Allele::Alternate],
            GenotypeCall::HomozygousAlternate => [Allele::Alternate, Allele::Alternate],
        }
    }
}

/// Decodes a single sample's source tag value into a canonical call.
/// The vocabulary is deliberately fixed to biallelic, unphased literals; anything
/// else (phased "|" separators, multi-allelic codes, "./.", malformed text) is
/// treated as a missing call rather than an error.
/// # Arguments
/// * `raw` - the textual tag value for one sample, None if the sample has no value
pub fn decode_gt(raw: Option<&str>) -> GenotypeCall {
    match raw {
        Some("0/0") => GenotypeCall::HomozygousReference,
        Some("0/1") | Some("1/0") => GenotypeCall::Heterozygous,
        Some("1/1") => GenotypeCall::HomozygousAlternate,
        _ => GenotypeCall::Missing
    }
}
