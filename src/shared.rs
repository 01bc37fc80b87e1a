//! Copy-on-reload publication of extent map snapshots.
//!
//! Readers take an `Arc<ExtentMap>` and query it without holding any lock.
//! A reload builds a fresh map off to the side and swaps the pointer, so
//! readers that started before the swap finish against the old snapshot.

use std::sync::{Arc, PoisonError, RwLock};

use crate::config::LayoutPolicy;
use crate::error::Result;
use crate::map::{ExtentMap, ReloadReport};
use crate::source::RecordSource;

pub struct SharedExtentMap {
    current: RwLock<Arc<ExtentMap>>,
    policy: LayoutPolicy,
}

impl SharedExtentMap {
    pub fn new(policy: LayoutPolicy) -> Self {
        Self {
            current: RwLock::new(Arc::new(ExtentMap::with_policy(policy))),
            policy,
        }
    }

    /// Current snapshot. Stays valid across later reloads.
    pub fn snapshot(&self) -> Arc<ExtentMap> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Build a new snapshot from `source` and publish it.
    ///
    /// On error nothing is published and the previous snapshot stays current.
    pub fn reload(&self, source: &mut dyn RecordSource) -> Result<ReloadReport> {
        let mut next = ExtentMap::with_policy(self.policy);
        let report = next.reload(source)?;
        self.publish(next);
        Ok(report)
    }

    /// Publish an empty snapshot.
    pub fn dispose(&self) {
        self.publish(ExtentMap::with_policy(self.policy));
    }

    fn publish(&self, map: ExtentMap) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(map);
    }
}

impl Default for SharedExtentMap {
    fn default() -> Self {
        Self::new(LayoutPolicy::default())
    }
}
