use anyhow::{anyhow, Result};
use dash_structs::core::ReferenceOptimum;
use log::debug;
use once_cell::sync::OnceCell;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

type Slot = Arc<OnceCell<Arc<ReferenceOptimum>>>;

/// Reference optima keyed by round fingerprint. Concurrent callers asking for
/// the same key wait on a single computation; a failed computation is not kept.
#[derive(Default)]
pub struct OptimumCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl OptimumCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_try_compute<F>(&self, key: &str, compute: F) -> Result<Arc<ReferenceOptimum>>
    where
        F: FnOnce() -> Result<ReferenceOptimum>,
    {
        let slot = {
            let mut slots = self
                .slots
                .lock()
                .map_err(|_| anyhow!("Optimum cache lock is poisoned"))?;
            slots.entry(key.to_string()).or_default().clone()
        };
        if let Some(optimum) = slot.get() {
            debug!("optimum cache hit for {}", key);
            return Ok(optimum.clone());
        }
        slot.get_or_try_init(|| compute().map(Arc::new)).cloned()
    }

    pub fn get(&self, key: &str) -> Option<Arc<ReferenceOptimum>> {
        let slots = self.slots.lock().ok()?;
        slots.get(key).and_then(|slot| slot.get().cloned())
    }

    /// Drops every cached optimum, e.g. when a round closes.
    pub fn clear(&self) -> Result<()> {
        self.slots
            .lock()
            .map_err(|_| anyhow!("Optimum cache lock is poisoned"))?
            .clear();
        Ok(())
    }

    /// Number of computed optima held.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .map(|slots| slots.values().filter(|slot| slot.get().is_some()).count())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
