//! Classification of somatic variant calls.

use itertools::Itertools as _;

use super::dedup;
use super::result::{DriverLikelihood, GeneAlteration, TranscriptImpact, Variant, VariantType};
use crate::drivers::ds;

/// Derive the variant type from the allele shape of a call.
pub fn variant_type(call: &ds::VariantCall) -> VariantType {
    if call.ref_allele.len() == call.alt_allele.len() {
        if call.ref_allele.len() == 1 {
            VariantType::Snv
        } else {
            VariantType::Mnv
        }
    } else if call.ref_allele.len() < call.alt_allele.len() {
        VariantType::Insert
    } else {
        VariantType::Delete
    }
}

/// Derive the driver likelihood tier from a numeric driver score.
pub fn likelihood_from_score(score: f64) -> DriverLikelihood {
    if score >= 0.8 {
        DriverLikelihood::High
    } else if score >= 0.2 {
        DriverLikelihood::Medium
    } else {
        DriverLikelihood::Low
    }
}

/// Build the human-readable event label for a variant.
fn event_label(gene: &str, canonical: &TranscriptImpact) -> String {
    if !canonical.hgvs_protein_impact.is_empty() {
        format!("{} {}", gene, canonical.hgvs_protein_impact)
    } else if !canonical.hgvs_coding_impact.is_empty() {
        format!("{} {}", gene, canonical.hgvs_coding_impact)
    } else {
        format!("{} {}", gene, canonical.effects.iter().join("&"))
    }
}

/// Extraction of variant driver events.
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

    /// Convert the deduplicated, gene-filtered variant calls into driver
    /// events.
    ///
    /// # Arguments
    ///
    /// * `calls` - The raw variant calls.
    ///
    /// # Returns
    ///
    /// The extracted variant events.
    ///
    /// # Errors
    ///
    /// Fails on unrecognized effect tags and on reportable calls whose gene
    /// is absent from the gene panel.
    pub fn extract(&self, calls: &[ds::VariantCall]) -> Result<Vec<Variant>, anyhow::Error> {
        let deduplicated = dedup::deduplicate(calls)?;

        let mut result = Vec::with_capacity(deduplicated.len());
        for call in deduplicated {
            if !self.parent.genes.include(&call.gene) {
                if call.reported {
                    anyhow::bail!(
                        "gene panel is inconsistent with upstream reporting: \
                         reportable variant on gene {} absent from panel",
                        call.gene
                    );
                }
                tracing::debug!("skipping variant on gene {} absent from panel", call.gene);
                continue;
            }

            let canonical_impact = TranscriptImpact::try_from(&call.canonical_impact)?;
            let other_impacts = call
                .other_impacts
                .iter()
                .map(TranscriptImpact::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            let annotation = self.parent.evidence.gene_annotation(&call.gene);

            result.push(Variant {
                alteration: GeneAlteration::with_annotation(&call.gene, annotation),
                reported: call.reported,
                event: event_label(&call.gene, &canonical_impact),
                driver_likelihood: Some(likelihood_from_score(call.driver_score)),
                evidence: self.parent.evidence.variant_evidence(call),
                variant_type: variant_type(call),
                is_hotspot: call.is_hotspot,
                is_biallelic: call.is_biallelic,
                variant_copy_number: call.variant_copy_number,
                total_copy_number: call.total_copy_number,
                clonal_likelihood: call.clonal_likelihood,
                phase_groups: call.phase_groups.clone(),
                canonical_impact,
                other_impacts,
            });
        }

        Ok(result)
    }
}
