// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Store interfaces and backends for trestle-core.
//!
//! The engine treats persistence as an opaque key/value store: `get`,
//! `put`, and a prefix scan. No transactions, no secondary indexes, no
//! ordering guarantee from the scan. Racing writers are safe for the
//! status field because derivation is a pure function of the same inputs,
//! so concurrent reconciliations converge (last-write-wins).

pub mod memory;
pub mod sqlite;

pub use self::memory::MemoryStore;
pub use self::sqlite::SqliteStore;

use async_trait::async_trait;

use crate::error::CoreError;
use crate::table::TableRecord;

/// Key prefix under which every table record lives.
pub const TABLE_PREFIX: &str = "table/";

/// Store key for a table record.
///
/// The key deliberately does not embed the owner: point lookups are
/// owner-agnostic and scoping is enforced by the engine on scans.
pub fn table_key(table_id: &str) -> String {
    format!("{}{}", TABLE_PREFIX, table_id)
}

/// Key/value store interface used by the lifecycle engine.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Fetch a single record by key.
    async fn get(&self, key: &str) -> Result<Option<TableRecord>, CoreError>;

    /// Write a record at the given key, replacing any previous value.
    async fn put(&self, key: &str, record: &TableRecord) -> Result<(), CoreError>;

    /// Return every `(key, record)` pair whose key starts with `prefix`.
    ///
    /// Callers get a point-in-time snapshot with no ordering guarantee.
    async fn scan_by_prefix(&self, prefix: &str) -> Result<Vec<(String, TableRecord)>, CoreError>;
}
