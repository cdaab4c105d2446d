// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for trestle-core integration tests.
//!
//! Provides TestContext bundling a write-counting in-memory store with a
//! ready HandlerState, plus record and request builders.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use trestle_core::error::CoreError;
use trestle_core::handlers::HandlerState;
use trestle_core::store::{MemoryStore, TableStore, table_key};
use trestle_core::table::{CreateTableRequest, ListTablesRequest, TableRecord, TableStatus, TableView};

/// Install a test subscriber once; respects RUST_LOG for debugging.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Store wrapper that counts writes issued through the trait.
pub struct CountingStore {
    inner: MemoryStore,
    puts: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            puts: AtomicUsize::new(0),
        }
    }

    /// Writes observed since creation.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Insert a fixture directly, bypassing the write counter.
    pub async fn seed(&self, record: &TableRecord) {
        self.inner
            .put(&table_key(&record.id), record)
            .await
            .expect("seed should not fail");
    }
}

#[async_trait]
impl TableStore for CountingStore {
    async fn get(&self, key: &str) -> Result<Option<TableRecord>, CoreError> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, record: &TableRecord) -> Result<(), CoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, record).await
    }

    async fn scan_by_prefix(&self, prefix: &str) -> Result<Vec<(String, TableRecord)>, CoreError> {
        self.inner.scan_by_prefix(prefix).await
    }
}

/// Test context bundling the handler state with its counting store.
pub struct TestContext {
    pub state: HandlerState,
    pub store: Arc<CountingStore>,
}

impl TestContext {
    pub fn new() -> Self {
        init_tracing();
        let store = Arc::new(CountingStore::new());
        let state = HandlerState::new(store.clone());
        Self { state, store }
    }

    /// Build a creation request with an optional pre-combined start time.
    pub fn create_request(&self, owner_id: &str, starts_at: Option<DateTime<Utc>>) -> CreateTableRequest {
        CreateTableRequest {
            owner_id: owner_id.to_string(),
            starts_at: starts_at.map(|instant| instant.to_rfc3339()),
            date: None,
            time: None,
            details: json!({"name": "Test supper", "seats": 8}),
        }
    }

    /// Build a listing request.
    pub fn list_request(&self, owner_id: &str, view: Option<TableView>) -> ListTablesRequest {
        ListTablesRequest {
            owner_id: owner_id.to_string(),
            view,
        }
    }

    /// Build a record fixture offset from now, then seed it.
    pub async fn seed_table(
        &self,
        id: &str,
        owner_id: &str,
        start_offset: Option<Duration>,
        status: TableStatus,
    ) -> TableRecord {
        let now = Utc::now();
        let record = TableRecord {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            starts_at: start_offset.map(|offset| (now + offset).to_rfc3339()),
            status,
            created_at: now - Duration::days(1),
            updated_at: now - Duration::days(1),
            details: json!({}),
        };
        self.store.seed(&record).await;
        record
    }
}
