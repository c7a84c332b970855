//! Data structures for representing the extracted driver events.

use std::collections::BTreeSet;

use crate::drivers::data::evidence::{ActionableTreatment, GeneAnnotation, GeneRole, ProteinEffect};
use crate::drivers::ds;

/// Driver likelihood tier of an extracted event.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DriverLikelihood {
    /// High driver likelihood.
    High,
    /// Medium driver likelihood.
    Medium,
    /// Low driver likelihood.
    Low,
}

/// Shared gene-level annotation attached to every gene-scoped driver.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct GeneAlteration {
    /// Gene symbol.
    pub gene: String,
    /// Role of the gene.
    pub gene_role: GeneRole,
    /// Protein effect of the alteration.
    pub protein_effect: ProteinEffect,
    /// Whether the alteration is associated with drug resistance; absent
    /// means unknown, not false.
    pub is_associated_with_drug_resistance: Option<bool>,
}

impl GeneAlteration {
    /// Construct for `gene` from an optional knowledge base annotation.
    pub fn with_annotation(gene: &str, annotation: Option<&GeneAnnotation>) -> Self {
        match annotation {
            Some(annotation) => Self {
                gene: gene.to_string(),
                gene_role: annotation.gene_role,
                protein_effect: annotation.protein_effect,
                is_associated_with_drug_resistance: annotation.is_associated_with_drug_resistance,
            },
            None => Self {
                gene: gene.to_string(),
                gene_role: GeneRole::Unknown,
                protein_effect: ProteinEffect::Unknown,
                is_associated_with_drug_resistance: None,
            },
        }
    }
}

/// Enumeration for the shape of a variant call.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VariantType {
    /// Single-nucleotide variant.
    Snv,
    /// Multi-nucleotide variant.
    Mnv,
    /// Insertion.
    Insert,
    /// Deletion.
    Delete,
}

/// Effect of a variant on a transcript.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VariantEffect {
    /// Stop codon gained.
    StopGained,
    /// Stop codon lost.
    StopLost,
    /// Start codon lost.
    StartLost,
    /// Frameshift.
    Frameshift,
    /// Splice acceptor site affected.
    SpliceAcceptor,
    /// Splice donor site affected.
    SpliceDonor,
    /// In-frame insertion.
    InframeInsertion,
    /// In-frame deletion.
    InframeDeletion,
    /// Missense change.
    Missense,
    /// Phased in-frame insertion.
    PhasedInframeInsertion,
    /// Phased in-frame deletion.
    PhasedInframeDeletion,
    /// Phased missense change.
    PhasedMissense,
    /// Synonymous change.
    Synonymous,
    /// Phased synonymous change.
    PhasedSynonymous,
    /// Intronic change.
    Intronic,
    /// Within the 5' UTR.
    FivePrimeUtr,
    /// Within the 3' UTR.
    ThreePrimeUtr,
    /// Upstream of the gene.
    UpstreamGene,
    /// On a non-coding transcript.
    NonCodingTranscript,
    /// Any other effect.
    Other,
}

impl VariantEffect {
    /// Map an upstream effect tag onto the enumeration.
    ///
    /// # Errors
    ///
    /// Fails on any unrecognized tag; the mapping table must stay in sync
    /// with the upstream data contract.
    pub fn try_from_tag(tag: &str) -> Result<Self, anyhow::Error> {
        tag.parse()
            .map_err(|_| anyhow::anyhow!("unrecognized variant effect: {}", tag))
    }
}

/// Aggregated coding effect of a variant on a transcript.
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
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CodingEffect {
    /// Nonsense or frameshift change.
    NonsenseOrFrameshift,
    /// Splice change.
    Splice,
    /// Missense change.
    Missense,
    /// Synonymous change.
    Synonymous,
    /// No coding effect.
    None,
}

impl CodingEffect {
    /// Map an upstream coding effect tag onto the enumeration.
    ///
    /// # Errors
    ///
    /// Fails on any unrecognized tag; the mapping table must stay in sync
    /// with the upstream data contract.
    pub fn try_from_tag(tag: &str) -> Result<Self, anyhow::Error> {
        tag.parse()
            .map_err(|_| anyhow::anyhow!("unrecognized coding effect: {}", tag))
    }
}

/// Impact of a variant on a single transcript, with mapped effects.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct TranscriptImpact {
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
    /// Effects on the transcript.
    pub effects: BTreeSet<VariantEffect>,
    /// Aggregated coding effect; absent means unknown, not "none".
    pub coding_effect: Option<CodingEffect>,
}

impl TryFrom<&ds::TranscriptImpactCall> for TranscriptImpact {
    type Error = anyhow::Error;

    fn try_from(call: &ds::TranscriptImpactCall) -> Result<Self, Self::Error> {
        let effects = call
            .effects
            .iter()
            .map(|tag| VariantEffect::try_from_tag(tag))
            .collect::<Result<BTreeSet<_>, _>>()?;
        let coding_effect = call
            .coding_effect
            .as_deref()
            .map(CodingEffect::try_from_tag)
            .transpose()?;

        Ok(Self {
            transcript_id: call.transcript_id.clone(),
            hgvs_coding_impact: call.hgvs_coding_impact.clone(),
            hgvs_protein_impact: call.hgvs_protein_impact.clone(),
            affected_codon: call.affected_codon,
            affected_exon: call.affected_exon,
            is_splice_region: call.is_splice_region,
            effects,
            coding_effect,
        })
    }
}

/// A somatic variant driver event.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Variant {
    /// Shared gene-level annotation.
    pub alteration: GeneAlteration,
    /// Whether the event is reportable.
    pub reported: bool,
    /// Human-readable event label.
    pub event: String,
    /// Driver likelihood tier; absent means unknown.
    pub driver_likelihood: Option<DriverLikelihood>,
    /// Matched actionable evidence.
    pub evidence: Vec<ActionableTreatment>,
    /// Shape of the variant.
    pub variant_type: VariantType,
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
    pub canonical_impact: TranscriptImpact,
    /// Impacts on other transcripts.
    pub other_impacts: Vec<TranscriptImpact>,
}

/// A copy-number amplification driver event.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Amplification {
    /// Shared gene-level annotation.
    pub alteration: GeneAlteration,
    /// Whether the event is reportable.
    pub reported: bool,
    /// Human-readable event label.
    pub event: String,
    /// Driver likelihood tier; absent means unknown.
    pub driver_likelihood: Option<DriverLikelihood>,
    /// Matched actionable evidence.
    pub evidence: Vec<ActionableTreatment>,
    /// Minimum copy number over the gene, if known.
    pub min_copies: Option<f64>,
    /// Maximum copy number over the gene, if known.
    pub max_copies: Option<f64>,
    /// Whether the event covers the gene only partially.
    pub is_partial: bool,
}

/// A copy-number loss driver event.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Loss {
    /// Shared gene-level annotation.
    pub alteration: GeneAlteration,
    /// Whether the event is reportable.
    pub reported: bool,
    /// Human-readable event label.
    pub event: String,
    /// Driver likelihood tier; absent means unknown.
    pub driver_likelihood: Option<DriverLikelihood>,
    /// Matched actionable evidence.
    pub evidence: Vec<ActionableTreatment>,
    /// Minimum copy number over the gene, if known.
    pub min_copies: Option<f64>,
    /// Maximum copy number over the gene, if known.
    pub max_copies: Option<f64>,
    /// Whether the event covers the gene only partially.
    pub is_partial: bool,
}

/// A homozygous disruption driver event.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct HomozygousDisruption {
    /// Shared gene-level annotation.
    pub alteration: GeneAlteration,
    /// Whether the event is reportable.
    pub reported: bool,
    /// Human-readable event label.
    pub event: String,
    /// Driver likelihood tier; absent means unknown.
    pub driver_likelihood: Option<DriverLikelihood>,
    /// Matched actionable evidence.
    pub evidence: Vec<ActionableTreatment>,
}

/// A structural disruption driver event.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Disruption {
    /// Shared gene-level annotation.
    pub alteration: GeneAlteration,
    /// Whether the event is reportable.
    pub reported: bool,
    /// Human-readable event label.
    pub event: String,
    /// Driver likelihood tier; absent means unknown.
    pub driver_likelihood: Option<DriverLikelihood>,
    /// Matched actionable evidence.
    pub evidence: Vec<ActionableTreatment>,
    /// Structural type of the breakend.
    pub disruption_type: ds::DisruptionType,
    /// Copy number crossing the junction.
    pub junction_copies: f64,
    /// Copy number left undisrupted.
    pub undisrupted_copies: f64,
    /// Region type the breakend falls into.
    pub region_type: ds::RegionType,
    /// Coding context of the breakend.
    pub coding_context: ds::CodingContext,
    /// Identifier of the breakend cluster this event belongs to.
    pub cluster_group: u32,
}

/// Driver type of a fusion event.
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
    strum::EnumString,
)]
pub enum FusionDriverType {
    /// Five-prime promiscuous partner.
    #[serde(rename = "promiscuous_5")]
    #[strum(serialize = "PROMISCUOUS_5")]
    Promiscuous5,
    /// Three-prime promiscuous partner.
    #[serde(rename = "promiscuous_3")]
    #[strum(serialize = "PROMISCUOUS_3")]
    Promiscuous3,
    /// Both partners promiscuous.
    #[serde(rename = "promiscuous_both")]
    #[strum(serialize = "PROMISCUOUS_BOTH")]
    PromiscuousBoth,
    /// Promiscuous immunoglobulin partner.
    #[serde(rename = "promiscuous_ig")]
    #[strum(serialize = "PROMISCUOUS_IG")]
    PromiscuousIg,
    /// Curated known pair.
    #[serde(rename = "known_pair")]
    #[strum(serialize = "KNOWN_PAIR")]
    KnownPair,
    /// Curated known immunoglobulin pair.
    #[serde(rename = "known_pair_ig")]
    #[strum(serialize = "KNOWN_PAIR_IG")]
    KnownPairIg,
    /// Curated known pair arising from deletion/duplication.
    #[serde(rename = "known_pair_del_dup")]
    #[strum(serialize = "KNOWN_PAIR_DEL_DUP")]
    KnownPairDelDup,
    /// No driver type.
    #[serde(rename = "none")]
    #[strum(serialize = "NONE")]
    None,
}

impl FusionDriverType {
    /// Map an upstream fusion type tag onto the enumeration.
    ///
    /// # Errors
    ///
    /// Fails on any unrecognized tag; the mapping table must stay in sync
    /// with the upstream data contract.
    pub fn try_from_tag(tag: &str) -> Result<Self, anyhow::Error> {
        tag.parse()
            .map_err(|_| anyhow::anyhow!("unrecognized fusion driver type: {}", tag))
    }
}

/// A fusion driver event.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Fusion {
    /// Whether the event is reportable.
    pub reported: bool,
    /// Human-readable event label.
    pub event: String,
    /// Driver likelihood tier; absent means unknown.
    pub driver_likelihood: Option<DriverLikelihood>,
    /// Matched actionable evidence.
    pub evidence: Vec<ActionableTreatment>,
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
    /// Driver type of the fusion.
    pub driver_type: FusionDriverType,
    /// Protein effect of the fusion.
    pub protein_effect: ProteinEffect,
    /// Whether the fusion is associated with drug resistance; absent means
    /// unknown, not false.
    pub is_associated_with_drug_resistance: Option<bool>,
}

/// A viral-integration driver event.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Virus {
    /// Whether the event is reportable.
    pub reported: bool,
    /// Human-readable event label.
    pub event: String,
    /// Driver likelihood tier; absent means unknown.
    pub driver_likelihood: Option<DriverLikelihood>,
    /// Matched actionable evidence.
    pub evidence: Vec<ActionableTreatment>,
    /// Name of the detected virus.
    pub name: String,
    /// Interpreted taxonomy, if any.
    pub interpretation: Option<ds::VirusInterpretation>,
    /// Number of detected integration sites.
    pub integrations: u32,
    /// Whether the underlying call passed QC.
    pub is_reliable: bool,
}

/// One extracted driver event of any category.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Driver {
    /// Somatic variant.
    Variant(Variant),
    /// Copy-number amplification.
    Amplification(Amplification),
    /// Copy-number loss.
    Loss(Loss),
    /// Homozygous disruption.
    HomozygousDisruption(HomozygousDisruption),
    /// Structural disruption.
    Disruption(Disruption),
    /// Fusion.
    Fusion(Fusion),
    /// Viral integration.
    Virus(Virus),
}

impl Driver {
    /// Return whether the event is reportable.
    pub fn reported(&self) -> bool {
        match self {
            Driver::Variant(variant) => variant.reported,
            Driver::Amplification(amplification) => amplification.reported,
            Driver::Loss(loss) => loss.reported,
            Driver::HomozygousDisruption(homozygous_disruption) => homozygous_disruption.reported,
            Driver::Disruption(disruption) => disruption.reported,
            Driver::Fusion(fusion) => fusion.reported,
            Driver::Virus(virus) => virus.reported,
        }
    }

    /// Return the human-readable event label.
    pub fn event(&self) -> &str {
        match self {
            Driver::Variant(variant) => &variant.event,
            Driver::Amplification(amplification) => &amplification.event,
            Driver::Loss(loss) => &loss.event,
            Driver::HomozygousDisruption(homozygous_disruption) => &homozygous_disruption.event,
            Driver::Disruption(disruption) => &disruption.event,
            Driver::Fusion(fusion) => &fusion.event,
            Driver::Virus(virus) => &virus.event,
        }
    }

    /// Return the driver likelihood tier.
    pub fn driver_likelihood(&self) -> Option<DriverLikelihood> {
        match self {
            Driver::Variant(variant) => variant.driver_likelihood,
            Driver::Amplification(amplification) => amplification.driver_likelihood,
            Driver::Loss(loss) => loss.driver_likelihood,
            Driver::HomozygousDisruption(homozygous_disruption) => {
                homozygous_disruption.driver_likelihood
            }
            Driver::Disruption(disruption) => disruption.driver_likelihood,
            Driver::Fusion(fusion) => fusion.driver_likelihood,
            Driver::Virus(virus) => virus.driver_likelihood,
        }
    }

    /// Return the gene symbol for gene-scoped categories.
    ///
    /// Fusions span two genes and viruses none; both return `None` here.
    pub fn gene(&self) -> Option<&str> {
        match self {
            Driver::Variant(variant) => Some(&variant.alteration.gene),
            Driver::Amplification(amplification) => Some(&amplification.alteration.gene),
            Driver::Loss(loss) => Some(&loss.alteration.gene),
            Driver::HomozygousDisruption(homozygous_disruption) => {
                Some(&homozygous_disruption.alteration.gene)
            }
            Driver::Disruption(disruption) => Some(&disruption.alteration.gene),
            Driver::Fusion(_) | Driver::Virus(_) => None,
        }
    }
}

/// The immutable aggregate of all extracted driver events.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Drivers {
    /// Somatic variant events.
    pub variants: Vec<Variant>,
    /// Amplification events.
    pub amplifications: Vec<Amplification>,
    /// Loss events.
    pub losses: Vec<Loss>,
    /// Homozygous disruption events.
    pub homozygous_disruptions: Vec<HomozygousDisruption>,
    /// Structural disruption events.
    pub disruptions: Vec<Disruption>,
    /// Fusion events.
    pub fusions: Vec<Fusion>,
    /// Viral-integration events.
    pub viruses: Vec<Virus>,
}

impl Drivers {
    /// Total number of driver events over all categories.
    pub fn len(&self) -> usize {
        self.variants.len()
            + self.amplifications.len()
            + self.losses.len()
            + self.homozygous_disruptions.len()
            + self.disruptions.len()
            + self.fusions.len()
            + self.viruses.len()
    }

    /// Whether no driver events were extracted in any category.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collect all events into the category-tagged `Driver` representation.
    pub fn drivers(&self) -> Vec<Driver> {
        let mut result = Vec::with_capacity(self.len());
        result.extend(self.variants.iter().cloned().map(Driver::Variant));
        result.extend(
            self.amplifications
                .iter()
                .cloned()
                .map(Driver::Amplification),
        );
        result.extend(self.losses.iter().cloned().map(Driver::Loss));
        result.extend(
            self.homozygous_disruptions
                .iter()
                .cloned()
                .map(Driver::HomozygousDisruption),
        );
        result.extend(self.disruptions.iter().cloned().map(Driver::Disruption));
        result.extend(self.fusions.iter().cloned().map(Driver::Fusion));
        result.extend(self.viruses.iter().cloned().map(Driver::Virus));
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[rstest::rstest]
    #[case("stop_gained", VariantEffect::StopGained)]
    #[case("phased_inframe_insertion", VariantEffect::PhasedInframeInsertion)]
    #[case("phased_inframe_deletion", VariantEffect::PhasedInframeDeletion)]
    #[case("five_prime_utr", VariantEffect::FivePrimeUtr)]
    #[case("missense", VariantEffect::Missense)]
    fn variant_effect_from_tag(
        #[case] tag: &str,
        #[case] expected: VariantEffect,
    ) -> Result<(), anyhow::Error> {
        assert_eq!(VariantEffect::try_from_tag(tag)?, expected);

        Ok(())
    }

    #[test]
    fn variant_effect_unrecognized_tag() {
        assert!(VariantEffect::try_from_tag("exotic_effect").is_err());
    }

    #[rstest::rstest]
    #[case("nonsense_or_frameshift", CodingEffect::NonsenseOrFrameshift)]
    #[case("splice", CodingEffect::Splice)]
    #[case("none", CodingEffect::None)]
    fn coding_effect_from_tag(
        #[case] tag: &str,
        #[case] expected: CodingEffect,
    ) -> Result<(), anyhow::Error> {
        assert_eq!(CodingEffect::try_from_tag(tag)?, expected);

        Ok(())
    }

    #[test]
    fn coding_effect_unrecognized_tag() {
        assert!(CodingEffect::try_from_tag("regulatory").is_err());
    }

    #[rstest::rstest]
    #[case("PROMISCUOUS_5", FusionDriverType::Promiscuous5)]
    #[case("PROMISCUOUS_3", FusionDriverType::Promiscuous3)]
    #[case("PROMISCUOUS_BOTH", FusionDriverType::PromiscuousBoth)]
    #[case("PROMISCUOUS_IG", FusionDriverType::PromiscuousIg)]
    #[case("KNOWN_PAIR", FusionDriverType::KnownPair)]
    #[case("KNOWN_PAIR_IG", FusionDriverType::KnownPairIg)]
    #[case("KNOWN_PAIR_DEL_DUP", FusionDriverType::KnownPairDelDup)]
    #[case("NONE", FusionDriverType::None)]
    fn fusion_driver_type_from_tag(
        #[case] tag: &str,
        #[case] expected: FusionDriverType,
    ) -> Result<(), anyhow::Error> {
        assert_eq!(FusionDriverType::try_from_tag(tag)?, expected);

        Ok(())
    }

    #[test]
    fn fusion_driver_type_unrecognized_tag() {
        assert!(FusionDriverType::try_from_tag("KNOWN_TRIPLE").is_err());
    }

    #[test]
    fn transcript_impact_conversion() -> Result<(), anyhow::Error> {
        let call = ds::TranscriptImpactCall {
            transcript_id: String::from("ENST00000269305"),
            hgvs_coding_impact: String::from("c.524G>A"),
            hgvs_protein_impact: String::from("p.R175H"),
            affected_codon: Some(175),
            affected_exon: Some(5),
            is_splice_region: false,
            effects: vec![String::from("missense")],
            coding_effect: Some(String::from("missense")),
        };

        let impact = TranscriptImpact::try_from(&call)?;
        assert!(impact.effects.contains(&VariantEffect::Missense));
        assert_eq!(impact.coding_effect, Some(CodingEffect::Missense));

        let without_coding_effect = ds::TranscriptImpactCall {
            coding_effect: None,
            ..call
        };
        let impact = TranscriptImpact::try_from(&without_coding_effect)?;
        assert_eq!(impact.coding_effect, None);

        Ok(())
    }

    #[test]
    fn gene_alteration_without_annotation_is_unknown() {
        let alteration = GeneAlteration::with_annotation("GENE", None);

        assert_eq!(alteration.gene_role, GeneRole::Unknown);
        assert_eq!(alteration.protein_effect, ProteinEffect::Unknown);
        assert_eq!(alteration.is_associated_with_drug_resistance, None);
    }
}
