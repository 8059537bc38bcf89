//! Capability wizard: creates a run of equally wide capabilities at once.

use std::num::{NonZeroU16, NonZeroU32};

use crate::{Capability, CapabilitySet, OverlapError};

/// Input of the capability wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSpec {
    /// first DMX value of the first capability
    pub start: u8,
    /// number of DMX values per capability
    pub width: NonZeroU16,
    /// number of capabilities to create
    pub amount: NonZeroU32,
    /// Common name of all capabilities. Every `#` is replaced by the running
    /// number, starting at 1.
    pub pattern: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStatus {
    /// all requested capabilities fit below 256
    Complete,
    /// Generation ran past 255. `count` capabilities were produced, the last
    /// one clipped to end at 255.
    Truncated { count: u32 },
}

/// Result of [`generate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    /// generated capabilities not colliding with the target set
    pub capabilities: CapabilitySet,
    /// generated capabilities colliding with the target set, not included above
    pub rejected: Vec<OverlapError>,
    pub status: GenerationStatus,
}

/// Generates the capabilities described by `spec` and trial-merges them with
/// `target`.
///
/// `target` is not modified. The returned capabilities can be merged into it
/// with [`CapabilitySet::merge`] without conflicts.
pub fn generate(spec: &WizardSpec, target: &CapabilitySet) -> Generated {
    let (candidates, status) = preview(spec);

    let mut capabilities = Vec::with_capacity(candidates.len());
    let mut rejected = Vec::new();
    for c in candidates {
        match target.check(&c) {
            Ok(()) => capabilities.push(c),
            Err(e) => rejected.push(e),
        }
    }

    if !rejected.is_empty() {
        tracing::debug!(
            rejected = rejected.len(),
            "some generated capabilities overlap existing ones"
        );
    }

    Generated {
        capabilities: CapabilitySet::from_unchecked(capabilities),
        rejected,
        status,
    }
}

/// Generates the capabilities described by `spec` without a target set.
pub fn preview(spec: &WizardSpec) -> (Vec<Capability>, GenerationStatus) {
    let width = u32::from(spec.width.get());
    let amount = spec.amount.get();
    let start = u32::from(spec.start);

    let mut capabilities = Vec::new();
    for i in 0..amount {
        let min = match i.checked_mul(width).and_then(|offset| offset.checked_add(start)) {
            Some(min) if min <= 255 => min,
            _ => break,
        };
        let max = (min + width - 1).min(255);
        let capability = Capability::new(min as u8, max as u8, numbered(&spec.pattern, i + 1));
        match capability {
            Ok(c) => capabilities.push(c),
            // min <= max holds by construction
            Err(_) => break,
        }
    }

    let last_value = u64::from(start) + u64::from(amount) * u64::from(width) - 1;
    let status = if last_value > 255 {
        let count = capabilities.len() as u32;
        tracing::debug!(count, requested = amount, "capability wizard truncated at 255");
        GenerationStatus::Truncated { count }
    } else {
        GenerationStatus::Complete
    };

    (capabilities, status)
}

fn numbered(pattern: &str, number: u32) -> String {
    pattern.replace('#', &number.to_string())
}
