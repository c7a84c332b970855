//! Extraction of driver events from the analysis bundle.

pub mod copy_number;
pub mod dedup;
pub mod disruption;
pub mod fusion;
pub mod result;
pub mod variant;
pub mod virus;

use self::result::Drivers;
use crate::drivers::data::{evidence, genes};
use crate::drivers::ds;

/// Extractor for driver events.
///
/// Holds the leaf collaborators and orchestrates the per-category
/// sub-extractors over one analysis bundle.
pub struct Extractor<'a> {
    /// The reportable-gene panel.
    genes: &'a genes::Data,
    /// The actionable-evidence knowledge base.
    evidence: &'a evidence::Data,
}

impl<'a> Extractor<'a> {
    /// Construct from the given data facades.
    ///
    /// # Arguments
    ///
    /// * `genes` - The reportable-gene panel.
    /// * `evidence` - The actionable-evidence knowledge base.
    ///
    /// # Returns
    ///
    /// A new `Extractor`.
    pub fn new(genes: &'a genes::Data, evidence: &'a evidence::Data) -> Self {
        Self { genes, evidence }
    }

    /// Extract all driver events from `bundle`.
    ///
    /// When the purity/ploidy fit is unreliable, all seven collections come
    /// back empty: unreliable tumor content invalidates copy-number
    /// dependent classification across the board, so no driver is trusted
    /// in isolation.
    ///
    /// # Arguments
    ///
    /// * `bundle` - The parsed analysis bundle.
    ///
    /// # Returns
    ///
    /// The extracted driver events.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn extract(&self, bundle: &ds::AnalysisBundle) -> Result<Drivers, anyhow::Error> {
        if !bundle.fit.reliable {
            tracing::warn!("purity/ploidy fit is unreliable; suppressing all driver events");
            return Ok(Drivers::default());
        }

        let copy_number = copy_number::Extractor::with_parent(self);
        // Losses first: disruption extraction consumes them for suppression.
        let losses = copy_number.extract_losses(&bundle.copy_numbers, bundle.fit.ploidy)?;
        let variants = variant::Extractor::with_parent(self).extract(&bundle.variants)?;
        let amplifications =
            copy_number.extract_amplifications(&bundle.copy_numbers, bundle.fit.ploidy)?;
        let disruption = disruption::Extractor::with_parent(self);
        let homozygous_disruptions =
            disruption.extract_homozygous(&bundle.homozygous_disruptions)?;
        let disruptions = disruption.extract_disruptions(&bundle.breakends, &losses)?;
        let fusions = fusion::Extractor::with_parent(self).extract(&bundle.fusions)?;
        let viruses = virus::Extractor::with_parent(self).extract(&bundle.viruses)?;

        Ok(Drivers {
            variants,
            amplifications,
            losses,
            homozygous_disruptions,
            disruptions,
            fusions,
            viruses,
        })
    }
}
