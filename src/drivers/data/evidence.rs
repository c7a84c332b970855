//! Actionable-evidence knowledge base.
//!
//! The knowledge base is consumed at its interface boundary only: given a raw
//! upstream call of a given driver category it returns a gene-alteration
//! annotation (absent when unknown) and the matched actionable evidence
//! (possibly empty, never absent).  Matching is keyed by gene symbol, gene
//! pair, or virus interpretation.

use std::{io::BufReader, path::Path};

use crate::drivers::ds;

/// Role of a gene in tumorigenesis.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GeneRole {
    /// Oncogene.
    Oncogene,
    /// Tumor suppressor gene.
    TumorSuppressor,
    /// Both oncogene and tumor suppressor.
    Both,
    /// Role unknown.
    #[default]
    Unknown,
}

/// Effect of an alteration on the protein product.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    serde::Deserialize,
    serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProteinEffect {
    /// Established no effect.
    NoEffect,
    /// Predicted no effect.
    NoEffectPredicted,
    /// Established loss of function.
    LossOfFunction,
    /// Predicted loss of function.
    LossOfFunctionPredicted,
    /// Established gain of function.
    GainOfFunction,
    /// Predicted gain of function.
    GainOfFunctionPredicted,
    /// Effect unknown.
    #[default]
    Unknown,
}

/// Evidence tier of an actionable treatment association.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum EvidenceTier {
    /// Approved / guideline evidence.
    A,
    /// Late clinical evidence.
    B,
    /// Early clinical evidence.
    C,
    /// Preclinical evidence.
    D,
}

/// Direction of an actionable treatment association.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceDirection {
    /// The alteration predicts response to the treatment.
    Responsive,
    /// The alteration predicts resistance against the treatment.
    Resistant,
}

/// Driver category an actionable entry applies to.
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
)]
#[serde(rename_all = "snake_case")]
pub enum ActionableCategory {
    /// Somatic variant.
    Variant,
    /// Copy-number amplification.
    Amplification,
    /// Copy-number loss.
    Loss,
    /// Homozygous disruption.
    HomozygousDisruption,
    /// Structural disruption.
    Disruption,
    /// Fusion.
    Fusion,
    /// Viral integration.
    Virus,
}

/// Curated annotation for alterations of one gene.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct GeneAnnotation {
    /// Gene symbol.
    pub gene: String,
    /// Role of the gene.
    pub gene_role: GeneRole,
    /// Characteristic protein effect of drivers on this gene.
    pub protein_effect: ProteinEffect,
    /// Whether alterations of this gene are associated with drug
    /// resistance; absent means unknown, not false.
    pub is_associated_with_drug_resistance: Option<bool>,
}

/// Curated known fusion pair.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct KnownFusion {
    /// Five-prime gene symbol.
    pub gene_start: String,
    /// Three-prime gene symbol.
    pub gene_end: String,
    /// Protein effect of the fusion.
    pub protein_effect: ProteinEffect,
    /// Whether the fusion is associated with drug resistance; absent means
    /// unknown, not false.
    pub is_associated_with_drug_resistance: Option<bool>,
}

/// One actionable treatment entry of the knowledge base.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ActionableEntry {
    /// Driver category the entry applies to.
    pub category: ActionableCategory,
    /// Match target (gene symbol, `FIVE-THREE` gene pair, or virus
    /// interpretation).
    pub target: String,
    /// Name of the treatment.
    pub treatment: String,
    /// Evidence tier.
    pub tier: EvidenceTier,
    /// Direction of the association.
    pub direction: EvidenceDirection,
}

/// Treatment association attached to an extracted driver event.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct ActionableTreatment {
    /// Name of the treatment.
    pub treatment: String,
    /// Evidence tier.
    pub tier: EvidenceTier,
    /// Direction of the association.
    pub direction: EvidenceDirection,
}

/// Load a headered, tab-separated knowledge base file.
///
/// # Arguments
///
/// * `path` - Path to the TSV file.
///
/// # Returns
///
/// The deserialized records.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn load_file<T, P>(path: P) -> Result<Vec<T>, anyhow::Error>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    // Construct buffered file and CSV reader.
    let reader = std::fs::File::open(path)
        .map_err(|e| anyhow::anyhow!("problem opening file: {}", e))
        .map(BufReader::new)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);
    let mut result = Vec::new();
    for record in csv_reader.deserialize() {
        let record = record.map_err(|e| anyhow::anyhow!("problem parsing record: {}", e))?;
        result.push(record);
    }

    Ok(result)
}

/// Facade struct for querying the knowledge base.
#[derive(Debug, Clone)]
pub struct Data {
    /// Gene annotations.
    annotations: Vec<GeneAnnotation>,
    /// Mapping from gene symbol to index in `annotations`.
    gene_to_annotation_idx: rustc_hash::FxHashMap<String, usize>,
    /// Known fusion pairs.
    known_fusions: Vec<KnownFusion>,
    /// Mapping from gene pair to index in `known_fusions`.
    pair_to_fusion_idx: rustc_hash::FxHashMap<(String, String), usize>,
    /// Actionable treatment entries.
    actionable: Vec<ActionableEntry>,
    /// Mapping from (category, target) to indices in `actionable`.
    target_to_actionable_idx: rustc_hash::FxHashMap<(ActionableCategory, String), Vec<usize>>,
}

impl Data {
    /// Construct from paths to the knowledge base files.
    ///
    /// # Arguments
    ///
    /// * `path_known_genes` - Path to the gene annotation TSV file.
    /// * `path_known_fusions` - Path to the known fusion TSV file.
    /// * `path_actionable` - Path to the actionable treatment TSV file.
    ///
    /// # Returns
    ///
    /// A new `Data`.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn load<P1, P2, P3>(
        path_known_genes: P1,
        path_known_fusions: P2,
        path_actionable: P3,
    ) -> Result<Self, anyhow::Error>
    where
        P1: AsRef<Path>,
        P2: AsRef<Path>,
        P3: AsRef<Path>,
    {
        let annotations = load_file::<GeneAnnotation, _>(path_known_genes)
            .map_err(|e| anyhow::anyhow!("problem loading gene annotations: {}", e))?;
        let known_fusions = load_file::<KnownFusion, _>(path_known_fusions)
            .map_err(|e| anyhow::anyhow!("problem loading known fusions: {}", e))?;
        let actionable = load_file::<ActionableEntry, _>(path_actionable)
            .map_err(|e| anyhow::anyhow!("problem loading actionable entries: {}", e))?;

        Ok(Self::new(annotations, known_fusions, actionable))
    }

    /// Create a new `Data` object from in-memory records.
    pub fn new(
        annotations: Vec<GeneAnnotation>,
        known_fusions: Vec<KnownFusion>,
        actionable: Vec<ActionableEntry>,
    ) -> Self {
        let gene_to_annotation_idx = annotations
            .iter()
            .enumerate()
            .map(|(idx, annotation)| (annotation.gene.clone(), idx))
            .collect();
        let pair_to_fusion_idx = known_fusions
            .iter()
            .enumerate()
            .map(|(idx, fusion)| ((fusion.gene_start.clone(), fusion.gene_end.clone()), idx))
            .collect();
        let mut target_to_actionable_idx: rustc_hash::FxHashMap<
            (ActionableCategory, String),
            Vec<usize>,
        > = rustc_hash::FxHashMap::default();
        for (idx, entry) in actionable.iter().enumerate() {
            target_to_actionable_idx
                .entry((entry.category, entry.target.clone()))
                .or_default()
                .push(idx);
        }

        Self {
            annotations,
            gene_to_annotation_idx,
            known_fusions,
            pair_to_fusion_idx,
            actionable,
            target_to_actionable_idx,
        }
    }

    /// Obtain the curated annotation for the given gene, if any.
    pub fn gene_annotation(&self, gene: &str) -> Option<&GeneAnnotation> {
        self.gene_to_annotation_idx
            .get(gene)
            .map(|idx| &self.annotations[*idx])
    }

    /// Obtain the known fusion record for the given gene pair, if any.
    pub fn known_fusion(&self, gene_start: &str, gene_end: &str) -> Option<&KnownFusion> {
        self.pair_to_fusion_idx
            .get(&(gene_start.to_string(), gene_end.to_string()))
            .map(|idx| &self.known_fusions[*idx])
    }

    /// Collect the actionable treatments for `(category, target)`.
    fn matches(&self, category: ActionableCategory, target: &str) -> Vec<ActionableTreatment> {
        self.target_to_actionable_idx
            .get(&(category, target.to_string()))
            .map(|idxs| {
                idxs.iter()
                    .map(|idx| {
                        let entry = &self.actionable[*idx];
                        ActionableTreatment {
                            treatment: entry.treatment.clone(),
                            tier: entry.tier,
                            direction: entry.direction,
                        }
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Actionable evidence for a somatic variant call.
    pub fn variant_evidence(&self, call: &ds::VariantCall) -> Vec<ActionableTreatment> {
        self.matches(ActionableCategory::Variant, &call.gene)
    }

    /// Actionable evidence for an amplification of `gene`.
    pub fn amplification_evidence(&self, gene: &str) -> Vec<ActionableTreatment> {
        self.matches(ActionableCategory::Amplification, gene)
    }

    /// Actionable evidence for a loss of `gene`.
    pub fn loss_evidence(&self, gene: &str) -> Vec<ActionableTreatment> {
        self.matches(ActionableCategory::Loss, gene)
    }

    /// Actionable evidence for a homozygous disruption of `gene`.
    pub fn homozygous_disruption_evidence(&self, gene: &str) -> Vec<ActionableTreatment> {
        self.matches(ActionableCategory::HomozygousDisruption, gene)
    }

    /// Actionable evidence for a structural disruption of `gene`.
    pub fn disruption_evidence(&self, gene: &str) -> Vec<ActionableTreatment> {
        self.matches(ActionableCategory::Disruption, gene)
    }

    /// Actionable evidence for a fusion call.
    pub fn fusion_evidence(&self, call: &ds::FusionCall) -> Vec<ActionableTreatment> {
        self.matches(
            ActionableCategory::Fusion,
            &format!("{}-{}", call.gene_start, call.gene_end),
        )
    }

    /// Actionable evidence for a viral-integration call.
    ///
    /// Matching is keyed on the interpreted taxonomy when present, the raw
    /// virus name otherwise.
    pub fn virus_evidence(&self, call: &ds::VirusCall) -> Vec<ActionableTreatment> {
        let target = call
            .interpretation
            .map(|interpretation| interpretation.to_string())
            .unwrap_or_else(|| call.name.clone());
        self.matches(ActionableCategory::Virus, &target)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::drivers::ds;

    fn example_data() -> Data {
        Data::new(
            vec![GeneAnnotation {
                gene: String::from("MYC"),
                gene_role: GeneRole::Oncogene,
                protein_effect: ProteinEffect::GainOfFunction,
                is_associated_with_drug_resistance: None,
            }],
            vec![KnownFusion {
                gene_start: String::from("EML4"),
                gene_end: String::from("ALK"),
                protein_effect: ProteinEffect::GainOfFunction,
                is_associated_with_drug_resistance: Some(false),
            }],
            vec![
                ActionableEntry {
                    category: ActionableCategory::Amplification,
                    target: String::from("MYC"),
                    treatment: String::from("Trial drug A"),
                    tier: EvidenceTier::B,
                    direction: EvidenceDirection::Responsive,
                },
                ActionableEntry {
                    category: ActionableCategory::Virus,
                    target: String::from("HPV"),
                    treatment: String::from("Trial drug B"),
                    tier: EvidenceTier::C,
                    direction: EvidenceDirection::Responsive,
                },
            ],
        )
    }

    #[test]
    fn test_load() -> Result<(), anyhow::Error> {
        let data = super::Data::load(
            "tests/data/drivers/known_genes.tsv",
            "tests/data/drivers/known_fusions.tsv",
            "tests/data/drivers/actionable.tsv",
        )?;

        let annotation = data
            .gene_annotation("TP53")
            .expect("TP53 must be annotated");
        assert_eq!(annotation.gene_role, GeneRole::TumorSuppressor);
        assert!(data.known_fusion("EML4", "ALK").is_some());

        Ok(())
    }

    #[test]
    fn gene_annotation_lookup() {
        let data = example_data();

        assert!(data.gene_annotation("MYC").is_some());
        assert!(data.gene_annotation("KRAS").is_none());
    }

    #[test]
    fn known_fusion_lookup() {
        let data = example_data();

        assert!(data.known_fusion("EML4", "ALK").is_some());
        // The pair lookup is directional.
        assert!(data.known_fusion("ALK", "EML4").is_none());
    }

    #[test]
    fn amplification_evidence_lookup() {
        let data = example_data();

        let treatments = data.amplification_evidence("MYC");
        assert_eq!(treatments.len(), 1);
        assert_eq!(treatments[0].treatment, "Trial drug A");
        assert_eq!(treatments[0].tier, EvidenceTier::B);

        assert!(data.loss_evidence("MYC").is_empty());
        assert!(data.amplification_evidence("KRAS").is_empty());
    }

    #[test]
    fn virus_evidence_keyed_on_interpretation() {
        let data = example_data();
        let call = ds::VirusCall {
            name: String::from("Human papillomavirus type 16"),
            qc_status: ds::VirusQcStatus::NoAbnormalities,
            interpretation: Some(ds::VirusInterpretation::Hpv),
            integrations: 2,
            driver_likelihood: ds::VirusDriverLikelihood::High,
            reported: true,
        };

        let treatments = data.virus_evidence(&call);
        assert_eq!(treatments.len(), 1);
        assert_eq!(treatments[0].treatment, "Trial drug B");

        let uninterpreted = ds::VirusCall {
            interpretation: None,
            ..call
        };
        assert!(data.virus_evidence(&uninterpreted).is_empty());
    }
}
