// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Dashboard view filtering and ordering.
//!
//! Applied after reconciliation: narrow the record set to the requested
//! view, then order by start time. History reads newest-first, everything
//! else soonest-first. Records without a parseable start time compare as
//! equal, and the sort is stable, so their relative order is preserved.

use std::cmp::Ordering;

use crate::table::{TableRecord, TableView};

/// Narrow and order a reconciled record set for the requested view.
pub fn apply_view(mut records: Vec<TableRecord>, view: Option<TableView>) -> Vec<TableRecord> {
    if let Some(view) = view {
        records.retain(|record| view.includes(record.status));
    }

    let newest_first = view == Some(TableView::History);
    records.sort_by(|a, b| {
        if newest_first {
            by_starts_at(b, a)
        } else {
            by_starts_at(a, b)
        }
    });

    records
}

/// Compare two records by start instant; either side missing or
/// unparseable compares equal so the stable sort leaves the pair alone.
fn by_starts_at(a: &TableRecord, b: &TableRecord) -> Ordering {
    match (a.starts_at_instant(), b.starts_at_instant()) {
        (Some(a), Some(b)) => a.cmp(&b),
        _ => Ordering::Equal,
    }
}
