use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::store::{CacheError, HitOutcome, ThrottleStore};

/// [`ThrottleStore`] kept in process memory.
///
/// Counters are lost on restart and not shared between instances.
#[derive(Debug, Default)]
pub struct MemoryThrottleStore {
    logs: Mutex<HashMap<String, VecDeque<i64>>>,
}

impl MemoryThrottleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn logs(&self) -> MutexGuard<'_, HashMap<String, VecDeque<i64>>> {
        self.logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.logs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs().is_empty()
    }
}

fn prune(log: &mut VecDeque<i64>, now_ms: i64, window_ms: i64) {
    let cutoff = now_ms - window_ms;
    while log.front().is_some_and(|&t| t <= cutoff) {
        log.pop_front();
    }
}

#[async_trait]
impl ThrottleStore for MemoryThrottleStore {
    async fn hit(
        &self,
        key: &str,
        now_ms: i64,
        window_ms: i64,
        limit: u32,
    ) -> Result<HitOutcome, CacheError> {
        let mut logs = self.logs();
        let log = logs.entry(key.to_string()).or_default();
        prune(log, now_ms, window_ms);

        if log.len() >= limit as usize {
            let oldest_ms = log.front().copied().unwrap_or(now_ms);
            if log.is_empty() {
                logs.remove(key);
            }
            return Ok(HitOutcome::Rejected { oldest_ms });
        }

        log.push_back(now_ms);
        Ok(HitOutcome::Recorded {
            count: log.len() as u32,
        })
    }

    fn retain_recent(&self, now_ms: i64, window_ms: i64) -> usize {
        let cutoff = now_ms - window_ms;
        let mut logs = self.logs();
        let before = logs.len();
        logs.retain(|_, log| log.back().is_some_and(|&newest| newest > cutoff));
        before - logs.len()
    }
}
