//! Discard ledger: one record per in-flight COUNT, owning the running
//! discard timer and, on AM DRBs, the protected PDU bytes for data
//! recovery.  Cancelling a timer is removing its record.

use std::collections::BTreeMap;
use std::time::Duration;
use stop_token::StopSource;

/// Handle to a running one-shot discard timer.  Dropping it cancels the
/// timer.
pub struct DiscardTimer {
    _stop: Option<StopSource>,
}

impl DiscardTimer {
    pub fn new(stop: StopSource) -> Self {
        Self { _stop: Some(stop) }
    }

    /// A handle with nothing to cancel, for timer factories that track
    /// expiry themselves (tests).
    pub fn inert() -> Self {
        Self { _stop: None }
    }
}

/// Starts discard timers.  Expiry must be delivered back into the entity's
/// serialized context as a call to `PdcpEntityTx::handle_discard_expiry`.
pub trait TimerFactory: Send {
    fn start_one_shot(&self, count: u32, duration: Duration) -> DiscardTimer;
}

pub(crate) struct DiscardRecord {
    /// Protected PDU retained for data recovery (AM DRBs only).
    pub retained_pdu: Option<Vec<u8>>,
    _timer: DiscardTimer,
}

#[derive(Default)]
pub(crate) struct DiscardLedger {
    entries: BTreeMap<u32, DiscardRecord>,
}

impl DiscardLedger {
    pub fn insert(&mut self, count: u32, retained_pdu: Option<Vec<u8>>, timer: DiscardTimer) {
        let previous = self.entries.insert(
            count,
            DiscardRecord {
                retained_pdu,
                _timer: timer,
            },
        );
        debug_assert!(previous.is_none(), "duplicate ledger entry for a COUNT");
    }

    /// Remove the entry for `count`, cancelling its timer.
    pub fn remove(&mut self, count: u32) -> Option<DiscardRecord> {
        self.entries.remove(&count)
    }

    /// Remove every entry with COUNT < `fmc`, cancelling their timers.
    /// Returns the removed COUNTs in ascending order.
    pub fn confirm_below(&mut self, fmc: u32) -> Vec<u32> {
        let kept = self.entries.split_off(&fmc);
        let confirmed = std::mem::replace(&mut self.entries, kept);
        confirmed.into_keys().collect()
    }

    /// Entries in ascending COUNT order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &DiscardRecord)> {
        self.entries.iter().map(|(count, record)| (*count, record))
    }

    pub fn contains(&self, count: u32) -> bool {
        self.entries.contains_key(&count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
