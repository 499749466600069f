//! Input curation: tracking how many inputs are live.
//!
//! Only the number of connected+open inputs is remembered between passes. A
//! device swapped for another one (or renamed) while the count stays the same
//! is not reported.

use crate::access::PortInfo;
use parking_lot::Mutex;

/// Result of one curation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurationOutcome {
    /// Names of every input the host reported, in host order.
    pub names: Vec<String>,
    /// Inputs that are both connected and open.
    pub open_count: usize,
    /// `open_count` differs from the previous pass (always true on the first).
    pub changed: bool,
}

#[derive(Debug, Default)]
pub struct InputCurator {
    last_open_count: Mutex<Option<usize>>,
}

impl InputCurator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new device snapshot and report whether the open count moved.
    pub fn observe(&self, inputs: &[PortInfo]) -> CurationOutcome {
        let names: Vec<String> = inputs.iter().map(|port| port.name.clone()).collect();
        let open_count = inputs.iter().filter(|port| port.is_open()).count();

        let previous = self.last_open_count.lock().replace(open_count);
        let changed = previous != Some(open_count);

        if changed {
            tracing::debug!(
                "MIDI inputs changed: {:?} -> {} open ({:?})",
                previous,
                open_count,
                names
            );
        }

        CurationOutcome {
            names,
            open_count,
            changed,
        }
    }

    /// Open count seen by the last pass, `None` before the first.
    pub fn last_open_count(&self) -> Option<usize> {
        *self.last_open_count.lock()
    }

    /// Forget the stored count so the next pass reports a change.
    pub fn reset(&self) {
        *self.last_open_count.lock() = None;
    }
}
