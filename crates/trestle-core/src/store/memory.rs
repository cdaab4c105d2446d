// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! In-memory store backend.
//!
//! Backs tests and embedded single-process use. A `BTreeMap` keeps prefix
//! scans a cheap ordered range walk; callers must not rely on that order.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Mutex;

use async_trait::async_trait;

use super::TableStore;
use crate::error::CoreError;
use crate::table::TableRecord;

/// In-memory key/value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, TableRecord>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|map| map.len()).unwrap_or(0)
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<TableRecord>, CoreError> {
        let entries = self.entries.lock().map_err(lock_poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, record: &TableRecord) -> Result<(), CoreError> {
        let mut entries = self.entries.lock().map_err(lock_poisoned)?;
        entries.insert(key.to_string(), record.clone());
        Ok(())
    }

    async fn scan_by_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<(String, TableRecord)>, CoreError> {
        let entries = self.entries.lock().map_err(lock_poisoned)?;
        let matches = entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect();
        Ok(matches)
    }
}

fn lock_poisoned<T>(_: std::sync::PoisonError<T>) -> CoreError {
    CoreError::StoreUnavailable {
        operation: "lock".to_string(),
        details: "store mutex poisoned".to_string(),
    }
}
