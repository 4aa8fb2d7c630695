use chrono::{DateTime, Utc};

/// In-process state that can drop entries which no read path will accept anymore.
pub trait ExpirySweep: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns how many entries were dropped.
    fn sweep(&self, now: DateTime<Utc>) -> usize;
}
