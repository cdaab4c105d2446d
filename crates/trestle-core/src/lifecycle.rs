// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Time-driven status derivation and the read-time reconciliation pass.
//!
//! A table's status is a function of its start time and the clock; there is
//! no background job. Reads recompute the status lazily via
//! [`derive_status`] and [`reconcile`] persists any drift it finds.
//!
//! `now` is always captured once per request and threaded in explicitly,
//! never read mid-computation, so every record in a pass sees the same
//! instant and the rule stays a pure function of its inputs.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::error::Result;
use crate::schedule;
use crate::store::{TableStore, table_key};
use crate::table::{TableRecord, TableStatus};

/// Default length of the post-start `active` window, in hours.
pub const DEFAULT_ACTIVE_WINDOW_HOURS: i64 = 6;

/// The status a table *should* have at `now`, with the default window.
///
/// See [`derive_status_with_window`]. Manual terminal state is the caller's
/// concern: the rule itself never returns `Cancelled`.
pub fn derive_status(starts_at: Option<&str>, now: DateTime<Utc>) -> TableStatus {
    derive_status_with_window(starts_at, now, Duration::hours(DEFAULT_ACTIVE_WINDOW_HOURS))
}

/// The status a table *should* have at `now`, given the active window.
///
/// Pure and total:
/// - missing or unparseable `starts_at` derives `Scheduled`;
/// - a future start derives `Scheduled`;
/// - a start between `now - window` and `now` (both inclusive) derives `Active`;
/// - anything older derives `Completed`.
pub fn derive_status_with_window(
    starts_at: Option<&str>,
    now: DateTime<Utc>,
    window: Duration,
) -> TableStatus {
    let Some(raw) = starts_at else {
        return TableStatus::Scheduled;
    };
    let Some(start) = schedule::parse_instant(raw) else {
        debug!(starts_at = raw, "Start time unparseable, deriving scheduled");
        return TableStatus::Scheduled;
    };

    let diff = start - now;
    if diff > Duration::zero() {
        TableStatus::Scheduled
    } else if diff >= -window {
        TableStatus::Active
    } else {
        TableStatus::Completed
    }
}

/// Reconcile a record set against `now`, persisting any status drift.
///
/// For each record the derived status replaces the persisted one when they
/// differ, `updated_at` is refreshed to `now`, and the record is written
/// through the store before it is included in the output. Cancelled records
/// are skipped entirely. Running the pass twice with the same `now` writes
/// nothing the second time.
///
/// Writes are not transactional with each other: a failed `put` propagates,
/// and earlier writes in the same pass stay committed.
pub async fn reconcile(
    store: &dyn TableStore,
    records: Vec<TableRecord>,
    now: DateTime<Utc>,
    window: Duration,
) -> Result<Vec<TableRecord>> {
    let mut reconciled = Vec::with_capacity(records.len());

    for mut record in records {
        // Cancelled is operator-owned; derivation never touches it
        if record.status == TableStatus::Cancelled {
            reconciled.push(record);
            continue;
        }

        let derived = derive_status_with_window(record.starts_at.as_deref(), now, window);
        if derived != record.status {
            info!(
                table_id = %record.id,
                from = record.status.as_str(),
                to = derived.as_str(),
                "Reconciling table status"
            );
            record.status = derived;
            record.updated_at = now;
            store.put(&table_key(&record.id), &record).await?;
        }
        reconciled.push(record);
    }

    Ok(reconciled)
}
