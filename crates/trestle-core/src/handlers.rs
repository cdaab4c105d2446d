// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Request handlers for the table lifecycle engine.
//!
//! These handlers process requests from the routing layer:
//! - Create a table (timing normalization + initial status)
//! - List tables for an owner (reconcile, filter, sort)
//! - Get a single table
//! - Manually override a table's status
//!
//! Identity resolution happens upstream; handlers receive the owner as part
//! of the request and enforce it as an access boundary on listings.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument};

use crate::error::{CoreError, Result};
use crate::lifecycle::{self, DEFAULT_ACTIVE_WINDOW_HOURS};
use crate::schedule;
use crate::store::{TABLE_PREFIX, TableStore, table_key};
use crate::table::{CreateTableRequest, ListTablesRequest, SetStatusRequest, TableRecord};
use crate::views;

/// Shared state for table handlers.
///
/// Contains the store implementation shared across all handlers.
pub struct HandlerState {
    /// Store implementation.
    pub store: Arc<dyn TableStore>,
    /// Post-start window during which a table counts as active.
    pub active_window: Duration,
}

impl HandlerState {
    /// Create a new handler state with the given store backend and the
    /// default active window.
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            active_window: Duration::hours(DEFAULT_ACTIVE_WINDOW_HOURS),
        }
    }

    /// Override the active window (see [`crate::config::Config`]).
    pub fn with_active_window(mut self, window: Duration) -> Self {
        self.active_window = window;
        self
    }
}

// ============================================================================
// Create Table
// ============================================================================

/// Handle a table creation request.
///
/// Normalizes the timing input (combined instant, then split date/time,
/// then untimed), computes the initial status from the creation-time clock,
/// and writes the record. On validation failure nothing is written.
///
/// # Errors
///
/// Returns [`CoreError::ValidationError`] if `owner_id` is empty or the
/// split date/time fields are present but invalid.
#[instrument(skip(state, request), fields(owner_id = %request.owner_id))]
pub async fn handle_create_table(
    state: &HandlerState,
    request: CreateTableRequest,
) -> Result<TableRecord> {
    // 1. Validate owner_id is not empty
    if request.owner_id.is_empty() {
        return Err(CoreError::ValidationError {
            field: "owner_id".to_string(),
            message: "owner_id is required".to_string(),
        });
    }

    // 2. Resolve the start instant; hard validation failures reject the request
    let starts_at = schedule::resolve_starts_at(
        request.starts_at.as_deref(),
        request.date.as_deref(),
        request.time.as_deref(),
    )?;

    // 3. Capture the clock once and derive the initial status from it
    let now = Utc::now();
    let starts_at_raw = starts_at.map(|instant| instant.to_rfc3339());
    let status =
        lifecycle::derive_status_with_window(starts_at_raw.as_deref(), now, state.active_window);

    let record = TableRecord {
        id: uuid::Uuid::new_v4().to_string(),
        owner_id: request.owner_id,
        starts_at: starts_at_raw,
        status,
        created_at: now,
        updated_at: now,
        details: request.details,
    };

    // 4. Single write; no partial state on failure
    state.store.put(&table_key(&record.id), &record).await?;

    info!(
        table_id = %record.id,
        status = record.status.as_str(),
        timed = record.starts_at.is_some(),
        "Table created"
    );

    Ok(record)
}

// ============================================================================
// List Tables
// ============================================================================

/// Handle a listing request for one owner's tables.
///
/// Scans the store, scopes to the owner, reconciles every record against a
/// single captured `now` (persisting drift), then applies the requested
/// view's filter and ordering.
///
/// # Errors
///
/// Returns [`CoreError::ValidationError`] for an empty `owner_id`, or
/// [`CoreError::StoreUnavailable`] if the scan or a reconciliation write
/// fails. Reconciliation writes already committed are not rolled back.
#[instrument(skip(state, request), fields(owner_id = %request.owner_id, view = ?request.view))]
pub async fn handle_list_tables(
    state: &HandlerState,
    request: ListTablesRequest,
) -> Result<Vec<TableRecord>> {
    // 1. Validate owner_id is not empty
    if request.owner_id.is_empty() {
        return Err(CoreError::ValidationError {
            field: "owner_id".to_string(),
            message: "owner_id is required".to_string(),
        });
    }

    // 2. Capture the clock once for the whole pass
    let now = Utc::now();

    // 3. Scan and scope to the requesting owner before anything else
    let scanned = state.store.scan_by_prefix(TABLE_PREFIX).await?;
    let owned: Vec<TableRecord> = scanned
        .into_iter()
        .map(|(_, record)| record)
        .filter(|record| record.owner_id == request.owner_id)
        .collect();

    debug!(count = owned.len(), "Scoped scan complete");

    // 4. Reconcile against the captured clock, persisting drift
    let reconciled = lifecycle::reconcile(
        state.store.as_ref(),
        owned,
        now,
        state.active_window,
    )
    .await?;

    // 5. Narrow and order for the requested view
    Ok(views::apply_view(reconciled, request.view))
}

// ============================================================================
// Get Table
// ============================================================================

/// Handle a point read of a single table.
///
/// Plain read: drift repair belongs to the listing path, so this never
/// writes.
///
/// # Errors
///
/// Returns [`CoreError::TableNotFound`] if no record exists for the ID.
#[instrument(skip(state))]
pub async fn handle_get_table(state: &HandlerState, table_id: &str) -> Result<TableRecord> {
    let record = state.store.get(&table_key(table_id)).await?;

    record.ok_or_else(|| CoreError::TableNotFound {
        table_id: table_id.to_string(),
    })
}

// ============================================================================
// Set Status (manual override)
// ============================================================================

/// Handle an explicit operator status override.
///
/// Bypasses derivation entirely: any of the four statuses may be set,
/// including re-opening a non-cancelled terminal record. The next
/// reconciliation pass will re-derive anything non-cancelled, so overrides
/// to a non-terminal status only stick while the clock agrees.
///
/// # Errors
///
/// Returns [`CoreError::TableNotFound`] if no record exists for the ID.
#[instrument(skip(state, request), fields(table_id = %request.table_id, status = request.status.as_str()))]
pub async fn handle_set_status(
    state: &HandlerState,
    request: SetStatusRequest,
) -> Result<TableRecord> {
    // 1. The record must exist; no upsert on override
    let mut record = state
        .store
        .get(&table_key(&request.table_id))
        .await?
        .ok_or_else(|| CoreError::TableNotFound {
            table_id: request.table_id.clone(),
        })?;

    // 2. Apply the override and refresh updated_at
    let previous = record.status;
    record.status = request.status;
    record.updated_at = Utc::now();

    state.store.put(&table_key(&record.id), &record).await?;

    info!(
        from = previous.as_str(),
        to = record.status.as_str(),
        "Table status overridden"
    );

    Ok(record)
}
