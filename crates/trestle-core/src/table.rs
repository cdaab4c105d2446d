// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Table record model and request types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule;

/// Status of a scheduled table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// Table has not started yet (or carries no start time at all).
    Scheduled,
    /// Table is within its post-start active window.
    Active,
    /// Table started longer ago than the active window.
    Completed,
    /// Table was cancelled by an operator. Protected from derivation.
    Cancelled,
}

impl TableStatus {
    /// Check if this is a terminal status.
    ///
    /// Only `cancelled` is protected from time-driven rewrites; `completed`
    /// is re-derivable if the start time changes.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TableStatus::Completed | TableStatus::Cancelled)
    }

    /// Stable string form, matching the persisted serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Scheduled => "scheduled",
            TableStatus::Active => "active",
            TableStatus::Completed => "completed",
            TableStatus::Cancelled => "cancelled",
        }
    }
}

/// A named dashboard view over the reconciled record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableView {
    /// Upcoming tables (status == scheduled).
    Scheduled,
    /// Tables currently in their active window (status == active).
    Active,
    /// Past tables (status in {completed, cancelled}).
    History,
}

impl TableView {
    /// Parse a view name as supplied by the routing layer.
    pub fn parse(raw: &str) -> Option<TableView> {
        match raw {
            "scheduled" => Some(TableView::Scheduled),
            "active" => Some(TableView::Active),
            "history" => Some(TableView::History),
            _ => None,
        }
    }

    /// Whether a record with the given status belongs to this view.
    pub fn includes(&self, status: TableStatus) -> bool {
        match self {
            TableView::Scheduled => status == TableStatus::Scheduled,
            TableView::Active => status == TableStatus::Active,
            TableView::History => status.is_terminal(),
        }
    }
}

/// Table record as held in the key/value store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRecord {
    /// Unique identifier, assigned at creation.
    pub id: String,
    /// Identifier of the creating party. Used for access scoping.
    pub owner_id: String,
    /// RFC 3339 start instant, if the table is timed.
    ///
    /// Kept as the raw string: historical records may hold values that no
    /// longer parse, and those must survive round-trips untouched. Parsing
    /// happens lazily at derivation and sort time.
    pub starts_at: Option<String>,
    /// Current status. Only the engine or an explicit operator action writes this.
    pub status: TableStatus,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last written, including engine-driven status rewrites.
    pub updated_at: DateTime<Utc>,
    /// Descriptive payload (name, venue, capacity, pricing...). Carried
    /// through unchanged; the engine never inspects it.
    #[serde(default)]
    pub details: serde_json::Value,
}

impl TableRecord {
    /// The start time as an instant, if present and parseable.
    pub fn starts_at_instant(&self) -> Option<DateTime<Utc>> {
        self.starts_at.as_deref().and_then(schedule::parse_instant)
    }
}

/// Request to create a new table.
///
/// The owner is resolved by the identity layer and supplied here, the same
/// way tenant IDs travel inside requests elsewhere in the stack. Timing
/// inputs are heterogeneous: either a pre-combined `starts_at`, or a
/// calendar `date` plus an `HH:MM` time. See [`crate::schedule`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTableRequest {
    /// Identifier of the creating party.
    pub owner_id: String,
    /// Pre-combined RFC 3339 start instant. Tried first.
    #[serde(default)]
    pub starts_at: Option<String>,
    /// Calendar date (`YYYY-MM-DD`), used together with `time`.
    #[serde(default)]
    pub date: Option<String>,
    /// Time of day in 24-hour `HH:MM` form, used together with `date`.
    #[serde(default)]
    pub time: Option<String>,
    /// Opaque descriptive payload.
    #[serde(default)]
    pub details: serde_json::Value,
}

/// Request to list tables for an owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListTablesRequest {
    /// Identifier of the requesting owner. An access boundary, not a filter.
    pub owner_id: String,
    /// Requested view; `None` lists everything the owner has.
    #[serde(default)]
    pub view: Option<TableView>,
}

/// Request to manually override a table's status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStatusRequest {
    /// The table to update.
    pub table_id: String,
    /// Target status. Any of the four is allowed, including re-opening a
    /// non-cancelled terminal record; this bypasses derivation.
    pub status: TableStatus,
}
