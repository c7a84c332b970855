//! Classification of copy-number segments into amplifications and losses.
//!
//! Classification is relative to sample ploidy.  A segment whose relative
//! math cannot be computed (absent ploidy or copy values) or comes out
//! negative is only carried when the upstream pipeline attached a driver
//! record for it, and then with an unknown likelihood tier.

use super::result::{Amplification, DriverLikelihood, GeneAlteration, Loss};
use crate::drivers::data::evidence::{GeneAnnotation, GeneRole, ProteinEffect};
use crate::drivers::ds;

/// Hard cutoff for amplification, relative to ploidy.
pub const AMPLIFICATION_HARD_CUTOFF: f64 = 3.0;
/// Soft (advisory) cutoff for amplification, relative to ploidy.
pub const AMPLIFICATION_SOFT_CUTOFF: f64 = 2.5;
/// Hard cutoff for loss, relative to ploidy.
pub const LOSS_HARD_CUTOFF: f64 = 0.5;
/// Soft (advisory) cutoff for loss, relative to ploidy.
pub const LOSS_SOFT_CUTOFF: f64 = 0.75;

/// Ploidy-relative assessment of one copy-number segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Assessment {
    /// Both relative extremes clear the hard cutoff.
    Full,
    /// The relative extreme clears the hard cutoff, the other end does not.
    Partial,
    /// Within the advisory band behind the hard cutoff.
    NearCutoff,
    /// Beyond the soft cutoff on the uneventful side.
    Negative,
    /// Ploidy or copy values missing.
    Unknown,
}

/// Assess a segment for amplification from its ploidy-relative copy numbers.
pub fn assess_amplification(rel_min: f64, rel_max: f64) -> Assessment {
    if rel_max >= AMPLIFICATION_HARD_CUTOFF {
        if rel_min >= AMPLIFICATION_HARD_CUTOFF {
            Assessment::Full
        } else {
            Assessment::Partial
        }
    } else if rel_min >= AMPLIFICATION_SOFT_CUTOFF {
        Assessment::NearCutoff
    } else {
        Assessment::Negative
    }
}

/// Assess a segment for loss, mirroring `assess_amplification`.
pub fn assess_loss(rel_min: f64, rel_max: f64) -> Assessment {
    if rel_min <= LOSS_HARD_CUTOFF {
        if rel_max <= LOSS_HARD_CUTOFF {
            Assessment::Full
        } else {
            Assessment::Partial
        }
    } else if rel_max <= LOSS_SOFT_CUTOFF {
        Assessment::NearCutoff
    } else {
        Assessment::Negative
    }
}

/// Assess a segment, falling back to `Unknown` when ploidy or copy values
/// are missing.
fn assess(
    segment: &ds::CopyNumberSegment,
    ploidy: Option<f64>,
    assess_relative: fn(f64, f64) -> Assessment,
) -> Assessment {
    match (ploidy, segment.min_copies, segment.max_copies) {
        (Some(ploidy), Some(min_copies), Some(max_copies)) if ploidy > 0.0 => {
            assess_relative(min_copies / ploidy, max_copies / ploidy)
        }
        _ => Assessment::Unknown,
    }
}

/// Driver likelihood for an assessed amplification candidate.
///
/// A clean full pass is downgraded to the advisory tier when the gene role
/// is not oncogene-compatible, the annotated protein effect is loss of
/// function, or the segment is not reported upstream.
fn amplification_likelihood(
    assessment: Assessment,
    reported: bool,
    annotation: Option<&GeneAnnotation>,
) -> Option<DriverLikelihood> {
    match assessment {
        Assessment::Full => {
            let role_compatible = matches!(
                annotation.map(|a| a.gene_role),
                Some(GeneRole::Oncogene) | Some(GeneRole::Both)
            );
            let loss_of_function = matches!(
                annotation.map(|a| a.protein_effect),
                Some(ProteinEffect::LossOfFunction) | Some(ProteinEffect::LossOfFunctionPredicted)
            );
            if role_compatible && !loss_of_function && reported {
                Some(DriverLikelihood::High)
            } else {
                Some(DriverLikelihood::Medium)
            }
        }
        Assessment::Partial | Assessment::NearCutoff => Some(DriverLikelihood::Medium),
        Assessment::Negative | Assessment::Unknown => None,
    }
}

/// Driver likelihood for an assessed loss candidate.
///
/// Mirrors `amplification_likelihood` without the oncogene/loss-of-function
/// special cases.
fn loss_likelihood(assessment: Assessment, reported: bool) -> Option<DriverLikelihood> {
    match assessment {
        Assessment::Full => {
            if reported {
                Some(DriverLikelihood::High)
            } else {
                Some(DriverLikelihood::Medium)
            }
        }
        Assessment::Partial | Assessment::NearCutoff => Some(DriverLikelihood::Medium),
        Assessment::Negative | Assessment::Unknown => None,
    }
}

/// Extraction of amplification and loss driver events.
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

    /// Check the gene panel for one segment.
    ///
    /// # Errors
    ///
    /// Fails when the segment carries an upstream driver record (and is
    /// therefore reportable) but its gene is absent from the panel.
    fn check_panel(&self, segment: &ds::CopyNumberSegment, upstream: bool) -> Result<bool, anyhow::Error> {
        if self.parent.genes.include(&segment.gene) {
            return Ok(true);
        }
        if upstream {
            anyhow::bail!(
                "gene panel is inconsistent with upstream reporting: \
                 reportable copy-number driver on gene {} absent from panel",
                segment.gene
            );
        }
        tracing::debug!("skipping segment on gene {} absent from panel", segment.gene);
        Ok(false)
    }

    /// Extract amplification events from the copy-number segments.
    ///
    /// # Arguments
    ///
    /// * `segments` - The copy-number segments.
    /// * `ploidy` - Sample ploidy, if the fit produced one.
    ///
    /// # Returns
    ///
    /// The extracted amplification events.
    ///
    /// # Errors
    ///
    /// Fails on reportable segments whose gene is absent from the gene
    /// panel.
    pub fn extract_amplifications(
        &self,
        segments: &[ds::CopyNumberSegment],
        ploidy: Option<f64>,
    ) -> Result<Vec<Amplification>, anyhow::Error> {
        let mut result = Vec::new();
        for segment in segments {
            let upstream = segment.reported_driver == Some(ds::CopyNumberDriver::Amplification);
            if !self.check_panel(segment, upstream)? {
                continue;
            }

            let assessment = assess(segment, ploidy, assess_amplification);
            if matches!(assessment, Assessment::Negative | Assessment::Unknown) && !upstream {
                continue;
            }
            if assessment == Assessment::NearCutoff {
                tracing::warn!(
                    "gene {} is near the amplification cutoff but does not pass it",
                    segment.gene
                );
            }

            let annotation = self.parent.evidence.gene_annotation(&segment.gene);
            let is_partial = matches!(assessment, Assessment::Partial | Assessment::NearCutoff);
            let event = if is_partial {
                format!("{} partial amp", segment.gene)
            } else {
                format!("{} amp", segment.gene)
            };

            result.push(Amplification {
                alteration: GeneAlteration::with_annotation(&segment.gene, annotation),
                reported: upstream,
                event,
                driver_likelihood: amplification_likelihood(assessment, upstream, annotation),
                evidence: self.parent.evidence.amplification_evidence(&segment.gene),
                min_copies: segment.min_copies,
                max_copies: segment.max_copies,
                is_partial,
            });
        }

        Ok(result)
    }

    /// Extract loss events from the copy-number segments.
    ///
    /// # Arguments
    ///
    /// * `segments` - The copy-number segments.
    /// * `ploidy` - Sample ploidy, if the fit produced one.
    ///
    /// # Returns
    ///
    /// The extracted loss events.
    ///
    /// # Errors
    ///
    /// Fails on reportable segments whose gene is absent from the gene
    /// panel.
    pub fn extract_losses(
        &self,
        segments: &[ds::CopyNumberSegment],
        ploidy: Option<f64>,
    ) -> Result<Vec<Loss>, anyhow::Error> {
        let mut result = Vec::new();
        for segment in segments {
            let upstream = segment.reported_driver == Some(ds::CopyNumberDriver::Loss);
            if !self.check_panel(segment, upstream)? {
                continue;
            }

            let assessment = assess(segment, ploidy, assess_loss);
            if matches!(assessment, Assessment::Negative | Assessment::Unknown) && !upstream {
                continue;
            }

            let annotation = self.parent.evidence.gene_annotation(&segment.gene);
            let is_partial = matches!(assessment, Assessment::Partial | Assessment::NearCutoff);
            let event = if is_partial {
                format!("{} partial del", segment.gene)
            } else {
                format!("{} del", segment.gene)
            };

            result.push(Loss {
                alteration: GeneAlteration::with_annotation(&segment.gene, annotation),
                reported: upstream,
                event,
                driver_likelihood: loss_likelihood(assessment, upstream),
                evidence: self.parent.evidence.loss_evidence(&segment.gene),
                min_copies: segment.min_copies,
                max_copies: segment.max_copies,
                is_partial,
            });
        }

        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::drivers::extract;
    use crate::drivers::extract::test::{copy_number_segment, evidence, gene_filter};

    // The classification moves monotonically through negative, near cutoff,
    // partial, and full as copy numbers grow against a fixed ploidy.
    #[rstest::rstest]
    #[case(2.3, 2.4, Assessment::Negative)]
    #[case(2.5, 2.9, Assessment::NearCutoff)]
    #[case(2.75, 2.75, Assessment::NearCutoff)]
    #[case(2.6, 3.5, Assessment::Partial)]
    #[case(3.0, 3.5, Assessment::Full)]
    #[case(4.0, 4.0, Assessment::Full)]
    fn amplification_assessment_ladder(
        #[case] rel_min: f64,
        #[case] rel_max: f64,
        #[case] expected: Assessment,
    ) {
        assert_eq!(assess_amplification(rel_min, rel_max), expected);
    }

    #[rstest::rstest]
    #[case(0.8, 1.0, Assessment::Negative)]
    #[case(0.6, 0.7, Assessment::NearCutoff)]
    #[case(0.4, 0.9, Assessment::Partial)]
    #[case(0.2, 0.5, Assessment::Full)]
    #[case(0.0, 0.0, Assessment::Full)]
    fn loss_assessment_ladder(
        #[case] rel_min: f64,
        #[case] rel_max: f64,
        #[case] expected: Assessment,
    ) {
        assert_eq!(assess_loss(rel_min, rel_max), expected);
    }

    #[test]
    fn full_reported_amplification_is_high() -> Result<(), anyhow::Error> {
        let genes = gene_filter();
        let evidence = evidence();
        let parent = extract::Extractor::new(&genes, &evidence);

        // Ploidy 2.0, copy number 6.0 over the whole gene: full amplification.
        let segment = copy_number_segment(
            "MYC",
            Some(6.0),
            Some(6.0),
            Some(ds::CopyNumberDriver::Amplification),
        );
        let result =
            Extractor::with_parent(&parent).extract_amplifications(&[segment], Some(2.0))?;

        assert_eq!(result.len(), 1);
        let amplification = &result[0];
        assert_eq!(amplification.event, "MYC amp");
        assert_eq!(
            amplification.driver_likelihood,
            Some(DriverLikelihood::High)
        );
        assert!(amplification.reported);
        assert!(!amplification.is_partial);
        assert_eq!(amplification.evidence.len(), 1);

        Ok(())
    }

    #[test]
    fn near_cutoff_amplification_is_advisory() -> Result<(), anyhow::Error> {
        let genes = gene_filter();
        let evidence = evidence();
        let parent = extract::Extractor::new(&genes, &evidence);

        // Ploidy 2.0, copy number 5.5: relative 2.75, near the cutoff.
        let segment = copy_number_segment("MYC", Some(5.5), Some(5.5), None);
        let result =
            Extractor::with_parent(&parent).extract_amplifications(&[segment], Some(2.0))?;

        assert_eq!(result.len(), 1);
        assert_eq!(
            result[0].driver_likelihood,
            Some(DriverLikelihood::Medium)
        );

        Ok(())
    }

    #[test]
    fn unreported_full_amplification_is_downgraded() -> Result<(), anyhow::Error> {
        let genes = gene_filter();
        let evidence = evidence();
        let parent = extract::Extractor::new(&genes, &evidence);

        let segment = copy_number_segment("MYC", Some(6.0), Some(6.0), None);
        let result =
            Extractor::with_parent(&parent).extract_amplifications(&[segment], Some(2.0))?;

        assert_eq!(
            result[0].driver_likelihood,
            Some(DriverLikelihood::Medium)
        );
        assert!(!result[0].reported);

        Ok(())
    }

    #[test]
    fn tumor_suppressor_amplification_is_downgraded() -> Result<(), anyhow::Error> {
        let genes = gene_filter();
        let evidence = evidence();
        let parent = extract::Extractor::new(&genes, &evidence);

        // TP53 is annotated as tumor suppressor with loss of function.
        let segment = copy_number_segment(
            "TP53",
            Some(6.0),
            Some(6.0),
            Some(ds::CopyNumberDriver::Amplification),
        );
        let result =
            Extractor::with_parent(&parent).extract_amplifications(&[segment], Some(2.0))?;

        assert_eq!(
            result[0].driver_likelihood,
            Some(DriverLikelihood::Medium)
        );

        Ok(())
    }

    #[test]
    fn negative_segment_only_carried_with_upstream_driver() -> Result<(), anyhow::Error> {
        let genes = gene_filter();
        let evidence = evidence();
        let parent = extract::Extractor::new(&genes, &evidence);
        let extractor = Extractor::with_parent(&parent);

        let unreported = copy_number_segment("MYC", Some(2.0), Some(2.1), None);
        assert!(extractor
            .extract_amplifications(&[unreported], Some(2.0))?
            .is_empty());

        let reported = copy_number_segment(
            "MYC",
            Some(2.0),
            Some(2.1),
            Some(ds::CopyNumberDriver::Amplification),
        );
        let result = extractor.extract_amplifications(&[reported], Some(2.0))?;
        assert_eq!(result.len(), 1);
        assert!(result[0].reported);
        assert_eq!(result[0].driver_likelihood, None);

        Ok(())
    }

    #[test]
    fn missing_ploidy_yields_unknown_likelihood() -> Result<(), anyhow::Error> {
        let genes = gene_filter();
        let evidence = evidence();
        let parent = extract::Extractor::new(&genes, &evidence);
        let extractor = Extractor::with_parent(&parent);

        let reported = copy_number_segment(
            "PTEN",
            Some(0.2),
            Some(0.4),
            Some(ds::CopyNumberDriver::Loss),
        );
        let result = extractor.extract_losses(&[reported], None)?;

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].driver_likelihood, None);
        assert!(result[0].reported);

        Ok(())
    }

    #[test]
    fn full_reported_loss_is_high() -> Result<(), anyhow::Error> {
        let genes = gene_filter();
        let evidence = evidence();
        let parent = extract::Extractor::new(&genes, &evidence);

        let segment = copy_number_segment(
            "PTEN",
            Some(0.2),
            Some(0.4),
            Some(ds::CopyNumberDriver::Loss),
        );
        let result = Extractor::with_parent(&parent).extract_losses(&[segment], Some(2.0))?;

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].event, "PTEN del");
        assert_eq!(result[0].driver_likelihood, Some(DriverLikelihood::High));

        Ok(())
    }

    #[test]
    fn reported_off_panel_segment_is_fatal() {
        let genes = gene_filter();
        let evidence = evidence();
        let parent = extract::Extractor::new(&genes, &evidence);

        let segment = copy_number_segment(
            "GENE_OFF_PANEL",
            Some(6.0),
            Some(6.0),
            Some(ds::CopyNumberDriver::Amplification),
        );
        let result =
            Extractor::with_parent(&parent).extract_amplifications(&[segment], Some(2.0));

        assert!(result.is_err());
    }

    #[test]
    fn loss_driver_does_not_trigger_amplification_panel_check() -> Result<(), anyhow::Error> {
        let genes = gene_filter();
        let evidence = evidence();
        let parent = extract::Extractor::new(&genes, &evidence);

        // A loss driver on an off-panel gene is fatal for loss extraction
        // but invisible to amplification extraction.
        let segment = copy_number_segment(
            "GENE_OFF_PANEL",
            Some(0.1),
            Some(0.2),
            Some(ds::CopyNumberDriver::Loss),
        );
        let extractor = Extractor::with_parent(&parent);

        assert!(extractor
            .extract_amplifications(std::slice::from_ref(&segment), Some(2.0))?
            .is_empty());
        assert!(extractor.extract_losses(&[segment], Some(2.0)).is_err());

        Ok(())
    }
}
