//! Deduplication of phased in-frame variant calls.
//!
//! The upstream pipeline reports a single underlying in-frame event as
//! multiple phased sub-variants.  Within each group sharing gene, canonical
//! effect set, and canonical protein impact, only the member with the lowest
//! variant copy number survives, ties broken by the lexicographically
//! greatest coding impact string.  The rule is independent of input order.

use std::collections::BTreeSet;

use super::result::{TranscriptImpact, VariantEffect};
use crate::drivers::ds;

/// Whether an effect set marks a variant as a phased in-frame call.
fn is_phased_inframe(effects: &BTreeSet<VariantEffect>) -> bool {
    effects.contains(&VariantEffect::PhasedInframeInsertion)
        || effects.contains(&VariantEffect::PhasedInframeDeletion)
}

/// Remove redundant phased in-frame calls from `calls`.
///
/// # Arguments
///
/// * `calls` - The raw variant calls.
///
/// # Returns
///
/// The surviving calls, in input order.
///
/// # Errors
///
/// If any effect or coding effect tag is unrecognized, it returns a generic
/// `anyhow::Error`.
pub fn deduplicate(calls: &[ds::VariantCall]) -> Result<Vec<&ds::VariantCall>, anyhow::Error> {
    let effect_sets = calls
        .iter()
        .map(|call| Ok(TranscriptImpact::try_from(&call.canonical_impact)?.effects))
        .collect::<Result<Vec<_>, anyhow::Error>>()?;

    let mut result = Vec::with_capacity(calls.len());
    for (idx, call) in calls.iter().enumerate() {
        if !is_phased_inframe(&effect_sets[idx]) {
            result.push(call);
            continue;
        }

        // Equivalence group: same gene, same canonical effect set, same
        // canonical protein impact.
        let group = calls
            .iter()
            .enumerate()
            .filter(|(other_idx, other)| {
                other.gene == call.gene
                    && effect_sets[*other_idx] == effect_sets[idx]
                    && other.canonical_impact.hgvs_protein_impact
                        == call.canonical_impact.hgvs_protein_impact
            })
            .map(|(_, other)| other)
            .collect::<Vec<_>>();

        let min_copies = group
            .iter()
            .map(|other| other.variant_copy_number)
            .fold(f64::INFINITY, f64::min);
        let representative_coding = group
            .iter()
            .filter(|other| other.variant_copy_number == min_copies)
            .map(|other| other.canonical_impact.hgvs_coding_impact.as_str())
            .max();

        if call.variant_copy_number == min_copies
            && Some(call.canonical_impact.hgvs_coding_impact.as_str()) == representative_coding
        {
            result.push(call);
        } else {
            tracing::debug!(
                "removing redundant phased call {} {} (copy number {})",
                call.gene,
                call.canonical_impact.hgvs_coding_impact,
                call.variant_copy_number
            );
        }
    }

    Ok(result)
}
