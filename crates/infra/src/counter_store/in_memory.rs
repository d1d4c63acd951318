use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use inkwell_core::PostId;

use super::r#trait::CounterStore;
use crate::error::StoreError;

/// In-memory counter store.
///
/// Each counter is an `AtomicU64`; once a cell exists, increments only take
/// the read lock and `fetch_add`, so concurrent viewers never serialize on
/// the map and never lose an update.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    cells: RwLock<HashMap<PostId, AtomicU64>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment(&self, id: PostId) -> Result<u64, StoreError> {
        {
            let cells = self.cells.read().map_err(|_| StoreError::poisoned())?;
            if let Some(cell) = cells.get(&id) {
                return Ok(cell.fetch_add(1, Ordering::AcqRel) + 1);
            }
        }

        let mut cells = self.cells.write().map_err(|_| StoreError::poisoned())?;
        let cell = cells.entry(id).or_default();
        Ok(cell.fetch_add(1, Ordering::AcqRel) + 1)
    }

    async fn get(&self, id: PostId) -> Result<Option<u64>, StoreError> {
        let cells = self.cells.read().map_err(|_| StoreError::poisoned())?;
        Ok(cells.get(&id).map(|cell| cell.load(Ordering::Acquire)))
    }

    async fn remove(&self, id: PostId) -> Result<(), StoreError> {
        let mut cells = self.cells.write().map_err(|_| StoreError::poisoned())?;
        cells.remove(&id);
        Ok(())
    }
}
