//! Bounded measurement history.
//!
//! Fixed capacity, stack-allocated, oldest entry evicted first.  Lives in
//! RAM only; a restart starts from an empty log.

use heapless::Deque;
use log::debug;

use crate::record::MeasurementRecord;

/// Number of records retained (one per measurement pass).
pub const HISTORY_CAPACITY: usize = 24;

/// Chronological log of the most recent measurement records.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Deque<MeasurementRecord, HISTORY_CAPACITY>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self {
            entries: Deque::new(),
        }
    }

    /// Append a record, evicting the oldest when full.
    pub fn push(&mut self, record: MeasurementRecord) {
        if self.entries.is_full() {
            self.entries.pop_front();
            debug!("history full, evicted oldest record");
        }
        // Cannot fail: a slot was freed above when the deque was full.
        let _ = self.entries.push_back(record);
        debug!("history holds {} records", self.entries.len());
    }

    /// Oldest-first iteration.
    pub fn iter(&self) -> impl Iterator<Item = &MeasurementRecord> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent record.
    pub fn latest(&self) -> Option<&MeasurementRecord> {
        self.entries.back()
    }

    pub fn capacity(&self) -> usize {
        HISTORY_CAPACITY
    }
}
