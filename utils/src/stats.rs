//! Per-session statement counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters keyed by a small, fixed list of names.
///
/// Names are registered once and bumped per statement. Unknown names read
/// as zero and are never created.
pub struct StatsCounter {
    slots: Vec<(&'static str, AtomicU64)>,
}

impl StatsCounter {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            slots: names.iter().map(|&name| (name, AtomicU64::new(0))).collect(),
        }
    }

    fn slot(&self, name: &str) -> Option<&AtomicU64> {
        self.slots
            .iter()
            .find(|(slot, _)| *slot == name)
            .map(|(_, value)| value)
    }

    pub fn increment(&self, name: &str) {
        if let Some(value) = self.slot(name) {
            value.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn get(&self, name: &str) -> u64 {
        self.slot(name).map_or(0, |value| value.load(Ordering::Relaxed))
    }

    /// Zero every counter at the start of a new session.
    pub fn reset(&self) {
        for (_, value) in &self.slots {
            value.store(0, Ordering::Relaxed);
        }
    }
}
