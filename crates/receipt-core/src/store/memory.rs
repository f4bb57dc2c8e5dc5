//! In-memory receipt database.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::{ReceiptDatabase, Result};
use crate::error::StoreError;
use crate::models::receipt::Receipt;

#[derive(Debug)]
struct Inner {
    receipts: BTreeMap<i64, Receipt>,
    next_id: i64,
    closed: bool,
}

/// Receipt database kept in process memory. IDs start at 1.
#[derive(Debug)]
pub struct MemoryReceiptDatabase {
    inner: RwLock<Inner>,
}

impl MemoryReceiptDatabase {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                receipts: BTreeMap::new(),
                next_id: 1,
                closed: false,
            }),
        }
    }

    /// Number of stored receipts.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.receipts.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>> {
        let guard = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        if guard.closed {
            return Err(StoreError::Closed);
        }
        Ok(guard)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>> {
        let guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        if guard.closed {
            return Err(StoreError::Closed);
        }
        Ok(guard)
    }
}

impl Default for MemoryReceiptDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptDatabase for MemoryReceiptDatabase {
    fn get_receipt(&self, id: i64) -> Result<Receipt> {
        self.read()?
            .receipts
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn add_receipt(&self, receipt: &Receipt) -> Result<i64> {
        let mut inner = self.write()?;
        let id = inner.next_id;
        inner.next_id += 1;

        let mut stored = receipt.clone();
        stored.id = id;
        inner.receipts.insert(id, stored);

        debug!("Added receipt {} for user {}", id, receipt.user_id);
        Ok(id)
    }

    fn delete_receipt(&self, id: i64) -> Result<()> {
        self.write()?
            .receipts
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    fn update_receipt(&self, receipt: &Receipt) -> Result<()> {
        let mut inner = self.write()?;
        let slot = inner
            .receipts
            .get_mut(&receipt.id)
            .ok_or(StoreError::NotFound(receipt.id))?;
        *slot = receipt.clone();
        Ok(())
    }

    fn list_receipts_by_user(&self, user_id: &str) -> Result<Vec<Receipt>> {
        let inner = self.read()?;
        let mut receipts: Vec<Receipt> = inner
            .receipts
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();

        // Dated receipts first, oldest to newest; ties keep insertion order
        receipts.sort_by_key(|r| (r.date.is_none(), r.date, r.id));
        Ok(receipts)
    }

    fn close(&self) -> Result<()> {
        let mut inner = self.write()?;
        inner.closed = true;
        inner.receipts.clear();
        Ok(())
    }
}
