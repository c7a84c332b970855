//! Classification of viral-integration calls.

use super::result::{DriverLikelihood, Virus};
use crate::drivers::ds;

/// Build the human-readable event label for a virus.
///
/// HPV labels keep the concrete strain name next to the interpreted
/// taxonomy; other interpreted viruses use the taxonomy alone, and
/// uninterpreted calls fall back to the raw name.
fn event_label(call: &ds::VirusCall) -> String {
    match call.interpretation {
        Some(ds::VirusInterpretation::Hpv) => {
            format!("{} positive ({})", ds::VirusInterpretation::Hpv, call.name)
        }
        Some(interpretation) => format!("{} positive", interpretation),
        None => format!("{} positive", call.name),
    }
}

/// Map the upstream virus driver likelihood tag onto a tier.
fn likelihood(call: &ds::VirusCall) -> DriverLikelihood {
    match call.driver_likelihood {
        ds::VirusDriverLikelihood::High => DriverLikelihood::High,
        ds::VirusDriverLikelihood::Low | ds::VirusDriverLikelihood::Unknown => {
            DriverLikelihood::Low
        }
    }
}

/// Extraction of viral-integration driver events.
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

    /// Extract virus events from the viral-integration calls.
    ///
    /// # Arguments
    ///
    /// * `calls` - The viral-integration calls.
    ///
    /// # Returns
    ///
    /// The extracted events.
    ///
    /// # Errors
    ///
    /// If anything goes wrong, it returns a generic `anyhow::Error`.
    pub fn extract(&self, calls: &[ds::VirusCall]) -> Result<Vec<Virus>, anyhow::Error> {
        let mut result = Vec::with_capacity(calls.len());
        for call in calls {
            result.push(Virus {
                reported: call.reported,
                event: event_label(call),
                driver_likelihood: Some(likelihood(call)),
                evidence: self.parent.evidence.virus_evidence(call),
                name: call.name.clone(),
                interpretation: call.interpretation,
                integrations: call.integrations,
                is_reliable: call.qc_status == ds::VirusQcStatus::NoAbnormalities,
            });
        }

        Ok(result)
    }
}
