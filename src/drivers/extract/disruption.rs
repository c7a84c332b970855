//! Classification of homozygous disruptions and structural breakends.

use super::result::{Disruption, DriverLikelihood, GeneAlteration, HomozygousDisruption, Loss};
use crate::drivers::ds;

/// Extraction of disruption driver events.
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

    /// Extract homozygous disruption events.
    ///
    /// Homozygous disruptions are always reportable with high driver
    /// likelihood.
    ///
    /// # Arguments
    ///
    /// * `calls` - The homozygous-disruption calls.
    ///
    /// # Returns
    ///
    /// The extracted events.
    ///
    /// # Errors
    ///
    /// Fails when a call's gene is absent from the gene panel.
    pub fn extract_homozygous(
        &self,
        calls: &[ds::HomozygousDisruptionCall],
    ) -> Result<Vec<HomozygousDisruption>, anyhow::Error> {
        let mut result = Vec::with_capacity(calls.len());
        for call in calls {
            if !self.parent.genes.include(&call.gene) {
                anyhow::bail!(
                    "gene panel is inconsistent with upstream reporting: \
                     homozygous disruption on gene {} absent from panel",
                    call.gene
                );
            }

            let annotation = self.parent.evidence.gene_annotation(&call.gene);
            result.push(HomozygousDisruption {
                alteration: GeneAlteration::with_annotation(&call.gene, annotation),
                reported: true,
                event: format!("{} hom disruption", call.gene),
                driver_likelihood: Some(DriverLikelihood::High),
                evidence: self
                    .parent
                    .evidence
                    .homozygous_disruption_evidence(&call.gene),
            });
        }

        Ok(result)
    }

    /// Extract structural disruption events from breakend calls.
    ///
    /// A deletion-type breakend whose gene already has a loss event in the
    /// current extraction pass is suppressed so that one physical event is
    /// not represented twice.  Retained disruptions are always reportable
    /// with low driver likelihood.
    ///
    /// # Arguments
    ///
    /// * `calls` - The breakend calls.
    /// * `losses` - Loss events extracted in the current pass.
    ///
    /// # Returns
    ///
    /// The extracted events.
    ///
    /// # Errors
    ///
    /// Fails on reportable breakends whose gene is absent from the gene
    /// panel.
    pub fn extract_disruptions(
        &self,
        calls: &[ds::BreakendCall],
        losses: &[Loss],
    ) -> Result<Vec<Disruption>, anyhow::Error> {
        let loss_genes = losses
            .iter()
            .map(|loss| loss.alteration.gene.as_str())
            .collect::<rustc_hash::FxHashSet<_>>();

        let mut result = Vec::with_capacity(calls.len());
        for call in calls {
            if !self.parent.genes.include(&call.gene) {
                if call.reported {
                    anyhow::bail!(
                        "gene panel is inconsistent with upstream reporting: \
                         reportable breakend on gene {} absent from panel",
                        call.gene
                    );
                }
                tracing::debug!("skipping breakend on gene {} absent from panel", call.gene);
                continue;
            }
            if call.disruption_type == ds::DisruptionType::Del
                && loss_genes.contains(call.gene.as_str())
            {
                tracing::debug!(
                    "suppressing deletion breakend on gene {}: already counted as loss",
                    call.gene
                );
                continue;
            }

            let annotation = self.parent.evidence.gene_annotation(&call.gene);
            result.push(Disruption {
                alteration: GeneAlteration::with_annotation(&call.gene, annotation),
                reported: true,
                event: format!("{} disruption", call.gene),
                driver_likelihood: Some(DriverLikelihood::Low),
                evidence: self.parent.evidence.disruption_evidence(&call.gene),
                disruption_type: call.disruption_type,
                junction_copies: call.junction_copies,
                undisrupted_copies: call.undisrupted_copies,
                region_type: call.region_type,
                coding_context: call.coding_context,
                cluster_group: call.cluster_group,
            });
        }

        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::drivers::extract;
    use crate::drivers::extract::test::{breakend_call, evidence, gene_filter, loss};

    #[test]
    fn homozygous_disruption_is_high_and_reportable() -> Result<(), anyhow::Error> {
        let genes = gene_filter();
        let evidence = evidence();
        let parent = extract::Extractor::new(&genes, &evidence);

        let calls = vec![ds::HomozygousDisruptionCall {
            gene: String::from("TP53"),
        }];
        let result = Extractor::with_parent(&parent).extract_homozygous(&calls)?;

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].event, "TP53 hom disruption");
        assert!(result[0].reported);
        assert_eq!(result[0].driver_likelihood, Some(DriverLikelihood::High));

        Ok(())
    }

    #[test]
    fn homozygous_disruption_off_panel_is_fatal() {
        let genes = gene_filter();
        let evidence = evidence();
        let parent = extract::Extractor::new(&genes, &evidence);

        let calls = vec![ds::HomozygousDisruptionCall {
            gene: String::from("GENE_OFF_PANEL"),
        }];

        assert!(Extractor::with_parent(&parent)
            .extract_homozygous(&calls)
            .is_err());
    }

    #[test]
    fn deletion_breakend_suppressed_by_loss() -> Result<(), anyhow::Error> {
        let genes = gene_filter();
        let evidence = evidence();
        let parent = extract::Extractor::new(&genes, &evidence);
        let extractor = Extractor::with_parent(&parent);

        let del = breakend_call("PTEN", ds::DisruptionType::Del);
        let dup = breakend_call("PTEN", ds::DisruptionType::Dup);
        let losses = vec![loss("PTEN")];

        // With a loss on PTEN, the DEL breakend is suppressed while the DUP
        // breakend survives.
        let result = extractor.extract_disruptions(&[del.clone(), dup.clone()], &losses)?;
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].disruption_type, ds::DisruptionType::Dup);

        // Without the loss, both survive.
        let result = extractor.extract_disruptions(&[del, dup], &[])?;
        assert_eq!(result.len(), 2);

        Ok(())
    }

    #[test]
    fn disruption_is_low_and_reportable() -> Result<(), anyhow::Error> {
        let genes = gene_filter();
        let evidence = evidence();
        let parent = extract::Extractor::new(&genes, &evidence);

        let mut call = breakend_call("TP53", ds::DisruptionType::Bnd);
        call.reported = false;
        let result = Extractor::with_parent(&parent).extract_disruptions(&[call], &[])?;

        assert_eq!(result.len(), 1);
        assert!(result[0].reported);
        assert_eq!(result[0].driver_likelihood, Some(DriverLikelihood::Low));
        assert_eq!(result[0].region_type, ds::RegionType::Intronic);
        assert_eq!(result[0].coding_context, ds::CodingContext::Coding);

        Ok(())
    }

    #[test]
    fn reported_off_panel_breakend_is_fatal() {
        let genes = gene_filter();
        let evidence = evidence();
        let parent = extract::Extractor::new(&genes, &evidence);

        let call = breakend_call("GENE_OFF_PANEL", ds::DisruptionType::Bnd);

        assert!(Extractor::with_parent(&parent)
            .extract_disruptions(&[call], &[])
            .is_err());
    }
}
