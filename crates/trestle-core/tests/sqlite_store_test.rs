// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Integration tests for the SQLite store backend: durability across
//! reopens and the full handler flow over a real file.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use trestle_core::handlers::{
    HandlerState, handle_create_table, handle_get_table, handle_list_tables,
};
use trestle_core::store::{SqliteStore, TableStore, table_key};
use trestle_core::table::{CreateTableRequest, ListTablesRequest, TableRecord, TableStatus};

fn record(id: &str, owner_id: &str) -> TableRecord {
    TableRecord {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        starts_at: Some((Utc::now() + Duration::hours(2)).to_rfc3339()),
        status: TableStatus::Scheduled,
        created_at: Utc::now(),
        updated_at: Utc::now(),
        details: json!({"name": "Long table", "seats": 12}),
    }
}

#[tokio::test]
async fn test_round_trip_and_prefix_scan() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::from_path(dir.path().join("tables.db"))
        .await
        .expect("store should open");

    assert!(store.get(&table_key("missing")).await.unwrap().is_none());

    store.put(&table_key("t-1"), &record("t-1", "owner-1")).await.unwrap();
    store.put(&table_key("t-2"), &record("t-2", "owner-2")).await.unwrap();

    let fetched = store.get(&table_key("t-1")).await.unwrap().unwrap();
    assert_eq!(fetched.owner_id, "owner-1");
    assert_eq!(fetched.details["seats"], 12);

    let scanned = store.scan_by_prefix("table/").await.unwrap();
    assert_eq!(scanned.len(), 2);
    assert!(scanned.iter().all(|(key, _)| key.starts_with("table/")));
}

#[tokio::test]
async fn test_put_overwrites_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::from_path(dir.path().join("tables.db"))
        .await
        .unwrap();

    let mut rec = record("t-1", "owner-1");
    store.put(&table_key("t-1"), &rec).await.unwrap();

    rec.status = TableStatus::Cancelled;
    store.put(&table_key("t-1"), &rec).await.unwrap();

    let fetched = store.get(&table_key("t-1")).await.unwrap().unwrap();
    assert_eq!(fetched.status, TableStatus::Cancelled);
    assert_eq!(store.scan_by_prefix("table/").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tables.db");

    {
        let store = SqliteStore::from_path(&path).await.unwrap();
        store.put(&table_key("t-1"), &record("t-1", "owner-1")).await.unwrap();
    }

    // Reopen from the same path; migrations are idempotent
    let store = SqliteStore::from_path(&path).await.unwrap();
    let fetched = store.get(&table_key("t-1")).await.unwrap().unwrap();
    assert_eq!(fetched.id, "t-1");
}

#[tokio::test]
async fn test_handler_flow_over_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::from_path(dir.path().join("tables.db"))
        .await
        .unwrap();
    let state = HandlerState::new(Arc::new(store));

    let created = handle_create_table(
        &state,
        CreateTableRequest {
            owner_id: "owner-1".to_string(),
            starts_at: Some((Utc::now() - Duration::hours(1)).to_rfc3339()),
            date: None,
            time: None,
            details: json!({"name": "Harvest dinner"}),
        },
    )
    .await
    .unwrap();
    assert_eq!(created.status, TableStatus::Active);

    let listed = handle_list_tables(
        &state,
        ListTablesRequest {
            owner_id: "owner-1".to_string(),
            view: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);

    let fetched = handle_get_table(&state, &created.id).await.unwrap();
    assert_eq!(fetched.details["name"], "Harvest dinner");
}
