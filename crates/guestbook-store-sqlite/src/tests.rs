//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashSet;

use guestbook_core::{greeting::NewGreeting, store::GreetingStore};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_greeting(name: &str, message: &str, timestamp: i64, ip: &str) -> NewGreeting {
  NewGreeting {
    name:       name.into(),
    message:    message.into(),
    timestamp,
    ip_address: ip.into(),
  }
}

// ─── Insert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_returns_stored_record() {
  let s = store().await;

  let g = s
    .insert(new_greeting("Sam", "Congrats!", 1_000, "10.0.0.1"))
    .await
    .unwrap();

  assert_eq!(g.id, 1);
  assert_eq!(g.name, "Sam");
  assert_eq!(g.message, "Congrats!");
  assert_eq!(g.timestamp, 1_000);
  assert_eq!(g.ip_address, "10.0.0.1");
}

#[tokio::test]
async fn insert_assigns_increasing_ids() {
  let s = store().await;

  let mut last = 0;
  for i in 0..5 {
    let g = s
      .insert(new_greeting("Ana", &format!("msg {i}"), 1_000 + i, "10.0.0.1"))
      .await
      .unwrap();
    assert!(g.id > last, "id {} not above {last}", g.id);
    last = g.id;
  }
}

#[tokio::test]
async fn concurrent_inserts_get_distinct_ids() {
  let s = store().await;

  let handles: Vec<_> = (0..20)
    .map(|i| {
      let s = s.clone();
      tokio::spawn(async move {
        s.insert(new_greeting("Guest", &format!("hello {i}"), 5_000, "10.0.0.9"))
          .await
          .unwrap()
          .id
      })
    })
    .collect();

  let mut ids = HashSet::new();
  for h in handles {
    assert!(ids.insert(h.await.unwrap()));
  }
  assert_eq!(ids.len(), 20);
  assert_eq!(s.list_recent(100).await.unwrap().len(), 20);
}

#[tokio::test]
async fn values_are_bound_not_interpolated() {
  let s = store().await;
  let hostile = "'); DROP TABLE greetings; --";

  let g = s
    .insert(new_greeting(hostile, hostile, 1, "10.0.0.1"))
    .await
    .unwrap();
  assert_eq!(g.message, hostile);

  let all = s.list_recent(10).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].name, hostile);
}

// ─── list_recent ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_recent_orders_newest_first() {
  let s = store().await;
  s.insert(new_greeting("A", "first", 100, "ip")).await.unwrap();
  s.insert(new_greeting("B", "third", 300, "ip")).await.unwrap();
  s.insert(new_greeting("C", "second", 200, "ip")).await.unwrap();

  let messages: Vec<_> = s
    .list_recent(10)
    .await
    .unwrap()
    .into_iter()
    .map(|g| g.message)
    .collect();
  assert_eq!(messages, ["third", "second", "first"]);
}

#[tokio::test]
async fn list_recent_breaks_ties_by_higher_id() {
  let s = store().await;
  let a = s.insert(new_greeting("A", "a", 500, "ip")).await.unwrap();
  let b = s.insert(new_greeting("B", "b", 500, "ip")).await.unwrap();

  let ids: Vec<_> = s.list_recent(10).await.unwrap().iter().map(|g| g.id).collect();
  assert_eq!(ids, [b.id, a.id]);
}

#[tokio::test]
async fn list_recent_respects_limit() {
  let s = store().await;
  for i in 0..7 {
    s.insert(new_greeting("G", &format!("{i}"), i, "ip")).await.unwrap();
  }

  let recent = s.list_recent(3).await.unwrap();
  assert_eq!(recent.len(), 3);
  assert_eq!(recent[0].timestamp, 6);
}

#[tokio::test]
async fn list_recent_on_empty_store() {
  let s = store().await;
  assert!(s.list_recent(100).await.unwrap().is_empty());
}

// ─── Abuse-guard queries ─────────────────────────────────────────────────────

#[tokio::test]
async fn count_since_filters_by_address_and_strict_time() {
  let s = store().await;
  s.insert(new_greeting("A", "1", 100, "10.0.0.1")).await.unwrap();
  s.insert(new_greeting("A", "2", 200, "10.0.0.1")).await.unwrap();
  s.insert(new_greeting("A", "3", 300, "10.0.0.1")).await.unwrap();
  s.insert(new_greeting("B", "4", 300, "10.0.0.2")).await.unwrap();

  assert_eq!(s.count_since("10.0.0.1", 0).await.unwrap(), 3);
  // `since` itself is excluded.
  assert_eq!(s.count_since("10.0.0.1", 200).await.unwrap(), 1);
  assert_eq!(s.count_since("10.0.0.2", 0).await.unwrap(), 1);
  assert_eq!(s.count_since("10.0.0.3", 0).await.unwrap(), 0);
}

#[tokio::test]
async fn most_recent_from_returns_latest_in_window() {
  let s = store().await;
  s.insert(new_greeting("A", "old", 100, "10.0.0.1")).await.unwrap();
  s.insert(new_greeting("A", "new", 200, "10.0.0.1")).await.unwrap();
  s.insert(new_greeting("B", "other", 300, "10.0.0.2")).await.unwrap();

  let latest = s.most_recent_from("10.0.0.1", 0).await.unwrap().unwrap();
  assert_eq!(latest.message, "new");

  assert!(s.most_recent_from("10.0.0.1", 200).await.unwrap().is_none());
  assert!(s.most_recent_from("10.0.0.3", 0).await.unwrap().is_none());
}

#[tokio::test]
async fn reopening_a_file_store_keeps_greetings() {
  let path = std::env::temp_dir().join(format!(
    "guestbook-store-test-{}.sqlite",
    std::process::id()
  ));
  let _ = std::fs::remove_file(&path);

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert(new_greeting("Sam", "Congrats!", 1, "ip")).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let all = s.list_recent(10).await.unwrap();
  assert_eq!(all.len(), 1);
  let next = s.insert(new_greeting("Ana", "Hi", 2, "ip")).await.unwrap();
  assert_eq!(next.id, 2);

  drop(s);
  for suffix in ["", "-wal", "-shm"] {
    let mut file = path.clone().into_os_string();
    file.push(suffix);
    let _ = std::fs::remove_file(file);
  }
}
