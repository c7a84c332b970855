//! Shared data structures for the parsed analysis bundle.
//!
//! These types mirror the output of the upstream genomic analysis pipeline
//! after parsing; deserialization happens outside of this crate's core.  Tag
//! values whose vocabulary must stay in sync with the upstream contract
//! (variant effects, coding effect, fusion type, fusion driver likelihood)
//! are kept as raw strings here and mapped by the classifiers, which fail
//! hard on anything unrecognized.

use std::path::Path;

/// Purity/ploidy fit of the sample.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PurityPloidyFit {
    /// Estimated tumor purity.
    pub purity: f64,
    /// Estimated sample ploidy, if the fit produced one.
    pub ploidy: Option<f64>,
    /// Whether the fit is reliable enough to trust copy-number dependent
    /// classification.
    pub reliable: bool,
}

/// Impact of a variant on a single transcript.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct TranscriptImpactCall {
    /// Transcript identifier.
    pub transcript_id: String,
    /// HGVS coding impact string (may be empty).
    pub hgvs_coding_impact: String,
    /// HGVS protein impact string (may be empty).
    pub hgvs_protein_impact: String,
    /// Affected codon, if any.
    pub affected_codon: Option<u32>,
    /// Affected exon, if any.
    pub affected_exon: Option<u32>,
    /// Whether the variant lies in a splice region.
    pub is_splice_region: bool,
    /// Raw effect tags.
    pub effects: Vec<String>,
    /// Raw coding effect tag, if any.
    pub coding_effect: Option<String>,
}

/// A single somatic variant call.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct VariantCall {
    /// Gene symbol.
    pub gene: String,
    /// Reference allele.
    pub ref_allele: String,
    /// Alternative allele.
    pub alt_allele: String,
    /// Whether the upstream pipeline reports this call as a driver.
    pub reported: bool,
    /// Numeric driver score in `[0, 1]`.
    pub driver_score: f64,
    /// Whether the call hits a known hotspot.
    pub is_hotspot: bool,
    /// Whether the call is biallelic.
    pub is_biallelic: bool,
    /// Copy number of the variant allele.
    pub variant_copy_number: f64,
    /// Total copy number at the locus.
    pub total_copy_number: f64,
    /// Likelihood that the variant is clonal.
    pub clonal_likelihood: f64,
    /// Phase group identifiers, empty when unphased.
    pub phase_groups: Vec<u32>,
    /// Impact on the canonical transcript.
    pub canonical_impact: TranscriptImpactCall,
    /// Impacts on other transcripts.
    pub other_impacts: Vec<TranscriptImpactCall>,
}

/// Direction of a copy-number driver record attached by the upstream
/// pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CopyNumberDriver {
    /// Reported as an amplification driver.
    Amplification,
    /// Reported as a loss driver.
    Loss,
}

/// Copy-number segment for one gene.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct CopyNumberSegment {
    /// Gene symbol.
    pub gene: String,
    /// Minimum copy number over the gene, if known.
    pub min_copies: Option<f64>,
    /// Maximum copy number over the gene, if known.
    pub max_copies: Option<f64>,
    /// Driver record the upstream pipeline attached and reports for this
    /// segment, if any.
    pub reported_driver: Option<CopyNumberDriver>,
}

/// Homozygous disruption of one gene.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct HomozygousDisruptionCall {
    /// Gene symbol.
    pub gene: String,
}

/// Enumeration for the structural type of a breakend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionType {
    /// Translocation breakend.
    Bnd,
    /// Deletion.
    Del,
    /// Duplication.
    Dup,
    /// Insertion.
    Ins,
    /// Inversion.
    Inv,
    /// Single breakend.
    Sgl,
}

/// Region type a breakend falls into.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RegionType {
    /// Within an exon.
    Exonic,
    /// Within an intron.
    Intronic,
    /// Upstream of the gene.
    Upstream,
    /// Downstream of the gene.
    Downstream,
}

/// Coding context of a breakend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CodingContext {
    /// Within coding sequence.
    Coding,
    /// Outside of any coding sequence.
    NonCoding,
    /// Within the 5' UTR.
    Utr5p,
    /// Within the 3' UTR.
    Utr3p,
}

/// A structural breakend affecting one gene.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct BreakendCall {
    /// Gene symbol.
    pub gene: String,
    /// Whether the upstream pipeline reports this breakend as a driver.
    pub reported: bool,
    /// Structural type of the breakend.
    pub disruption_type: DisruptionType,
    /// Copy number crossing the junction.
    pub junction_copies: f64,
    /// Copy number left undisrupted.
    pub undisrupted_copies: f64,
    /// Region type the breakend falls into.
    pub region_type: RegionType,
    /// Coding context of the breakend.
    pub coding_context: CodingContext,
    /// Identifier of the breakend cluster this call belongs to.
    pub cluster_group: u32,
}

/// A fusion call between two gene ends.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct FusionCall {
    /// Five-prime gene symbol.
    pub gene_start: String,
    /// Five-prime transcript identifier.
    pub transcript_start: String,
    /// Last exon fused on the five-prime side.
    pub fused_exon_up: u32,
    /// Three-prime gene symbol.
    pub gene_end: String,
    /// Three-prime transcript identifier.
    pub transcript_end: String,
    /// First exon fused on the three-prime side.
    pub fused_exon_down: u32,
    /// Whether the upstream pipeline reports this fusion as a driver.
    pub reported: bool,
    /// Raw fusion type tag.
    pub fusion_type: String,
    /// Raw driver likelihood tag (`HIGH`, `LOW`, or `NA`).
    pub driver_likelihood: String,
}

/// QC status of a viral-integration call.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VirusQcStatus {
    /// No abnormalities detected.
    NoAbnormalities,
    /// Viral coverage too low for a confident call.
    LowViralCoverage,
    /// Tumor fraction of the sample failed QC.
    FailNoTumor,
}

/// Interpreted taxonomy of a detected virus.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum VirusInterpretation {
    /// Human papillomavirus.
    Hpv,
    /// Epstein-Barr virus.
    Ebv,
    /// Merkel cell polyomavirus.
    Mcv,
    /// Hepatitis B virus.
    Hbv,
    /// Human herpesvirus 8.
    Hhv8,
}

/// Driver likelihood tag of a viral-integration call.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VirusDriverLikelihood {
    /// High likelihood.
    High,
    /// Low likelihood.
    Low,
    /// Unknown likelihood.
    Unknown,
}

/// A viral-integration call.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct VirusCall {
    /// Name of the detected virus.
    pub name: String,
    /// QC status of the call.
    pub qc_status: VirusQcStatus,
    /// Interpreted taxonomy, if any.
    pub interpretation: Option<VirusInterpretation>,
    /// Number of detected integration sites.
    pub integrations: u32,
    /// Driver likelihood tag.
    pub driver_likelihood: VirusDriverLikelihood,
    /// Whether the upstream pipeline reports this virus as a driver.
    pub reported: bool,
}

/// The full analysis bundle as produced by the upstream pipeline.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AnalysisBundle {
    /// Purity/ploidy fit of the sample.
    pub fit: PurityPloidyFit,
    /// Somatic variant calls.
    pub variants: Vec<VariantCall>,
    /// Copy-number segments.
    pub copy_numbers: Vec<CopyNumberSegment>,
    /// Homozygous-disruption calls.
    pub homozygous_disruptions: Vec<HomozygousDisruptionCall>,
    /// Structural breakend calls.
    pub breakends: Vec<BreakendCall>,
    /// Fusion calls.
    pub fusions: Vec<FusionCall>,
    /// Viral-integration calls.
    pub viruses: Vec<VirusCall>,
}

impl AnalysisBundle {
    /// Load an analysis bundle from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the bundle JSON file.
    ///
    /// # Returns
    ///
    /// The parsed bundle.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn load<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        let reader = std::fs::File::open(path.as_ref())
            .map_err(|e| anyhow::anyhow!("problem opening file: {}", e))
            .map(std::io::BufReader::new)?;
        serde_json::from_reader(reader)
            .map_err(|e| anyhow::anyhow!("problem parsing bundle: {}", e))
    }
}
