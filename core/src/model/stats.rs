use serde::{Deserialize, Serialize};

/// Aggregate counts over the whole store.
///
/// `total == completed + active` and `overdue <= active` hold for any
/// value produced by the service.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoStats {
    pub total: u64,
    pub completed: u64,
    pub active: u64,
    pub overdue: u64,
}

impl TodoStats {
    /// Share of completed todos in percent, `0.0` for an empty store.
    pub fn completion_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 * 100.0 / self.total as f64
        }
    }
}
