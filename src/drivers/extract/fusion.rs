//! Classification of fusion calls.

use super::result::{DriverLikelihood, Fusion, FusionDriverType};
use crate::drivers::data::evidence::ProteinEffect;
use crate::drivers::ds;

/// Map an upstream fusion driver likelihood tag onto a tier.
///
/// `HIGH` and `LOW` map onto their tiers, `NA` onto an absent tier.
///
/// # Errors
///
/// Fails on any other tag; the mapping table must stay in sync with the
/// upstream data contract.
fn likelihood_from_tag(tag: &str) -> Result<Option<DriverLikelihood>, anyhow::Error> {
    match tag {
        "HIGH" => Ok(Some(DriverLikelihood::High)),
        "LOW" => Ok(Some(DriverLikelihood::Low)),
        "NA" => Ok(None),
        _ => anyhow::bail!("unrecognized fusion driver likelihood: {}", tag),
    }
}

/// Extraction of fusion driver events.
///
/// This is mainly used to encapsulate the functionality.  Creating new such
/// objects is very straightforward and cheap.
pub struct Extractor<'a> {
    /// The parent extractor.
    parent: &'a super::Extractor<'a>,
}

impl<'a> Extractor<'a> {
    /// Create a new `Extractor`.
    pub fn with_parent(parent: &'a super::Extractor<'a>) -> Self {
        Self { parent }
    }

    /// Extract fusion events from the fusion calls.
    ///
    /// A fusion is retained when at least one gene end is on the gene
    /// panel.
    ///
    /// # Arguments
    ///
    /// * `calls` - The fusion calls.
    ///
    /// # Returns
    ///
    /// The extracted events.
    ///
    /// # Errors
    ///
    /// Fails on unrecognized fusion type or likelihood tags and on
    /// reportable fusions with neither gene end on the panel.
    pub fn extract(&self, calls: &[ds::FusionCall]) -> Result<Vec<Fusion>, anyhow::Error> {
        let mut result = Vec::with_capacity(calls.len());
        for call in calls {
            let start_on_panel = self.parent.genes.include(&call.gene_start);
            let end_on_panel = self.parent.genes.include(&call.gene_end);
            if !start_on_panel && !end_on_panel {
                if call.reported {
                    anyhow::bail!(
                        "gene panel is inconsistent with upstream reporting: \
                         reportable fusion {}-{} with neither gene on panel",
                        call.gene_start,
                        call.gene_end
                    );
                }
                tracing::debug!(
                    "skipping fusion {}-{} with neither gene on panel",
                    call.gene_start,
                    call.gene_end
                );
                continue;
            }

            let driver_type = FusionDriverType::try_from_tag(&call.fusion_type)?;
            let driver_likelihood = likelihood_from_tag(&call.driver_likelihood)?;
            let known = self
                .parent
                .evidence
                .known_fusion(&call.gene_start, &call.gene_end);

            result.push(Fusion {
                reported: call.reported,
                event: format!("{}-{} fusion", call.gene_start, call.gene_end),
                driver_likelihood,
                evidence: self.parent.evidence.fusion_evidence(call),
                gene_start: call.gene_start.clone(),
                transcript_start: call.transcript_start.clone(),
                fused_exon_up: call.fused_exon_up,
                gene_end: call.gene_end.clone(),
                transcript_end: call.transcript_end.clone(),
                fused_exon_down: call.fused_exon_down,
                driver_type,
                protein_effect: known
                    .map(|fusion| fusion.protein_effect)
                    .unwrap_or(ProteinEffect::Unknown),
                is_associated_with_drug_resistance: known
                    .and_then(|fusion| fusion.is_associated_with_drug_resistance),
            });
        }

        Ok(result)
    }
}
