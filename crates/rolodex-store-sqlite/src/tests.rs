//! Integration tests for `SqliteStore` against in-memory and on-disk
//! databases.

use std::time::Duration;

use chrono::{DateTime, DurationRound as _, FixedOffset, TimeDelta, TimeZone, Utc};
use rolodex_core::{ContactInput, ContactRepository, Outcome};

use crate::{Error, SqliteStore, latest_version};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn john() -> ContactInput {
  ContactInput::new("Mr", "John", "Doe", "john@x.com")
}

fn now_ms() -> DateTime<Utc> {
  Utc::now()
    .duration_trunc(TimeDelta::milliseconds(1))
    .unwrap()
}

/// Let the millisecond database clock move past the previous write.
async fn tick() {
  tokio::time::sleep(Duration::from_millis(15)).await;
}

async fn count(s: &SqliteStore) -> usize { s.get_all().await.unwrap().len() }

// ─── Insert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_assigns_id_and_timestamps() {
  let s = store().await;
  let before = now_ms();

  let contact = s.insert(john()).await.success().unwrap();

  assert!(contact.id > 0);
  assert_eq!(contact.display_name(), "Mr John Doe");
  assert_eq!(contact.creation_timestamp, contact.last_change_timestamp);
  assert!(contact.creation_timestamp >= before);
  assert!(contact.last_change_timestamp >= before);
}

#[tokio::test]
async fn insert_returns_what_get_by_id_reads() {
  let s = store().await;
  let inserted = s
    .insert(john().with_phone_number("0176/123456789"))
    .await
    .success()
    .unwrap();

  let fetched = s.get_by_id(inserted.id).await.unwrap().unwrap();
  assert_eq!(fetched, inserted);
  assert_eq!(fetched.phone_number.as_deref(), Some("0176/123456789"));
}

#[tokio::test]
async fn ids_increase_and_are_not_reused() {
  let s = store().await;
  let a = s.insert(john()).await.success().unwrap();
  let b = s.insert(john()).await.success().unwrap();
  assert!(b.id > a.id);

  assert!(s.delete(b.id).await.is_success());
  let c = s.insert(john()).await.success().unwrap();
  assert!(c.id > b.id);
}

#[tokio::test]
async fn birth_date_reads_back_as_utc() {
  let s = store().await;
  let plus_five = FixedOffset::east_opt(5 * 3600).unwrap();
  let local = plus_five.with_ymd_and_hms(1990, 5, 1, 3, 0, 0).unwrap();

  let contact = s
    .insert(john().with_birth_date(local))
    .await
    .success()
    .unwrap();
  let fetched = s.get_by_id(contact.id).await.unwrap().unwrap();

  let expected = Utc.with_ymd_and_hms(1990, 4, 30, 22, 0, 0).unwrap();
  assert_eq!(fetched.birth_date, Some(expected));
  assert!(fetched.notify_has_birthday_soon().is_some());
}

#[tokio::test]
async fn missing_birth_date_means_unknown_notice() {
  let s = store().await;
  let contact = s.insert(john()).await.success().unwrap();
  assert_eq!(contact.birth_date, None);
  assert_eq!(contact.notify_has_birthday_soon(), None);
}

#[tokio::test]
async fn display_name_override_is_persisted() {
  let s = store().await;
  let contact = s
    .insert(john().with_display_name("Johnny"))
    .await
    .success()
    .unwrap();
  assert_eq!(contact.display_name(), "Johnny");

  let fetched = s.get_by_id(contact.id).await.unwrap().unwrap();
  assert_eq!(fetched.display_name_override.as_deref(), Some("Johnny"));
}

#[tokio::test]
async fn empty_display_name_is_stored_as_unset() {
  let s = store().await;
  let contact = s
    .insert(john().with_display_name(""))
    .await
    .success()
    .unwrap();
  assert_eq!(contact.display_name_override, None);
  assert_eq!(contact.display_name(), "Mr John Doe");
}

#[tokio::test]
async fn insert_storage_failure_is_reported_not_raised() {
  let s = store().await;
  let mut input = john();
  input.first_name = "J".into();

  let outcome = s.insert(input).await;
  match outcome {
    Outcome::Failure(f) => {
      assert_eq!(f.operation, "insert");
      assert!(f.reason.contains("CHECK"), "{}", f.reason);
    }
    other => panic!("expected failure, got {other:?}"),
  }
  assert_eq!(count(&s).await, 0);
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_all_empty_table() {
  let s = store().await;
  assert!(s.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_all_returns_every_row() {
  let s = store().await;
  s.insert(john()).await.success().unwrap();
  s.insert(ContactInput::new("Frau", "Nikita", "Khutorni", "nk@example.com"))
    .await
    .success()
    .unwrap();

  let all = s.get_all().await.unwrap();
  assert_eq!(all.len(), 2);
  assert!(all.iter().any(|c| c.first_name == "Nikita"));
}

#[tokio::test]
async fn get_by_id_missing_returns_none() {
  let s = store().await;
  assert!(s.get_by_id(12345).await.unwrap().is_none());
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_restamps_last_change_only() {
  let s = store().await;
  let original = s.insert(john()).await.success().unwrap();
  tick().await;

  let updated = s
    .update(original.id, john().with_phone_number("555-1234"))
    .await
    .success()
    .unwrap();

  assert_eq!(updated.phone_number.as_deref(), Some("555-1234"));
  assert_eq!(updated.first_name, "John");
  assert_eq!(updated.id, original.id);
  assert_eq!(updated.creation_timestamp, original.creation_timestamp);
  assert!(updated.last_change_timestamp > original.last_change_timestamp);

  let fetched = s.get_by_id(original.id).await.unwrap().unwrap();
  assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_first_name_leaves_other_fields() {
  let s = store().await;
  let original = s
    .insert(john().with_phone_number("0176/1"))
    .await
    .success()
    .unwrap();

  let mut input = john().with_phone_number("0176/1");
  input.first_name = "Jack".into();
  let updated = s.update(original.id, input).await.success().unwrap();

  assert_eq!(updated.first_name, "Jack");
  assert_eq!(updated.last_name, original.last_name);
  assert_eq!(updated.email, original.email);
  assert_eq!(updated.phone_number, original.phone_number);
  assert_eq!(updated.id, original.id);
  assert_eq!(updated.creation_timestamp, original.creation_timestamp);
  assert_eq!(updated.display_name(), "Mr Jack Doe");
}

#[tokio::test]
async fn update_never_rewrites_salutation() {
  let s = store().await;
  let original = s.insert(john()).await.success().unwrap();

  let mut input = john();
  input.salutation = "Dr".into();
  let updated = s.update(original.id, input).await.success().unwrap();
  assert_eq!(updated.salutation, "Mr");
}

#[tokio::test]
async fn repeated_updates_keep_creation_timestamp() {
  let s = store().await;
  let original = s.insert(john()).await.success().unwrap();

  let mut last = original.last_change_timestamp;
  for phone in ["1", "2", "3"] {
    tick().await;
    let updated = s
      .update(original.id, john().with_phone_number(phone))
      .await
      .success()
      .unwrap();
    assert_eq!(updated.creation_timestamp, original.creation_timestamp);
    assert!(updated.last_change_timestamp > last);
    last = updated.last_change_timestamp;
  }
}

#[tokio::test]
async fn update_missing_is_not_found() {
  let s = store().await;
  assert!(s.update(999, john()).await.is_not_found());
  assert_eq!(count(&s).await, 0);
}

#[tokio::test]
async fn update_storage_failure_leaves_row_intact() {
  let s = store().await;
  let original = s.insert(john()).await.success().unwrap();

  let mut input = john();
  input.last_name = "D".into();
  match s.update(original.id, input).await {
    Outcome::Failure(f) => assert_eq!(f.operation, "update"),
    other => panic!("expected failure, got {other:?}"),
  }

  let fetched = s.get_by_id(original.id).await.unwrap().unwrap();
  assert_eq!(fetched, original);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_then_get_is_absent() {
  let s = store().await;
  let contact = s.insert(john()).await.success().unwrap();

  assert_eq!(s.delete(contact.id).await, Outcome::Success(()));
  assert!(s.get_by_id(contact.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_missing_is_not_found_and_changes_nothing() {
  let s = store().await;
  s.insert(john()).await.success().unwrap();

  assert!(s.delete(4242).await.is_not_found());
  assert_eq!(count(&s).await, 1);
}

#[tokio::test]
async fn delete_twice_reports_not_found_second_time() {
  let s = store().await;
  let contact = s.insert(john()).await.success().unwrap();
  assert!(s.delete(contact.id).await.is_success());
  assert!(s.delete(contact.id).await.is_not_found());
}

// ─── Generated columns ───────────────────────────────────────────────────────

#[tokio::test]
async fn forged_last_change_is_overwritten_by_trigger() {
  let s = store().await;
  let contact = s.insert(john()).await.success().unwrap();
  let id = contact.id;
  tick().await;

  s.conn
    .call(move |conn| {
      conn.execute(
        "UPDATE contacts SET last_change_timestamp = '2000-01-01T00:00:00Z' WHERE id = ?1",
        rusqlite::params![id],
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let fetched = s.get_by_id(id).await.unwrap().unwrap();
  assert!(fetched.last_change_timestamp > contact.last_change_timestamp);
}

#[tokio::test]
async fn creation_timestamp_cannot_be_rewritten() {
  let s = store().await;
  let contact = s.insert(john()).await.success().unwrap();
  let id = contact.id;

  let result = s
    .conn
    .call(move |conn| {
      conn.execute(
        "UPDATE contacts SET creation_timestamp = '2000-01-01T00:00:00Z' WHERE id = ?1",
        rusqlite::params![id],
      )?;
      Ok(())
    })
    .await;
  assert!(result.is_err());

  let fetched = s.get_by_id(id).await.unwrap().unwrap();
  assert_eq!(fetched.creation_timestamp, contact.creation_timestamp);
}

#[tokio::test]
async fn id_cannot_be_rewritten() {
  let s = store().await;
  let contact = s.insert(john()).await.success().unwrap();
  let id = contact.id;

  let result = s
    .conn
    .call(move |conn| {
      conn.execute(
        "UPDATE contacts SET id = id + 100 WHERE id = ?1",
        rusqlite::params![id],
      )?;
      Ok(())
    })
    .await;
  assert!(result.is_err());
  assert!(s.get_by_id(id).await.unwrap().is_some());
}

async fn raw_insert(s: &SqliteStore, sql: &'static str) -> tokio_rusqlite::Result<usize> {
  s.conn.call(move |conn| Ok(conn.execute(sql, [])?)).await
}

#[tokio::test]
async fn explicit_id_on_insert_is_rejected() {
  let s = store().await;
  let result = raw_insert(
    &s,
    "INSERT INTO contacts (id, salutation, first_name, last_name, email)
     VALUES (500, 'Mr', 'Jo', 'Do', 'a@b.c')",
  )
  .await;
  assert!(result.is_err());
  assert_eq!(count(&s).await, 0);
  assert!(s.get_by_id(500).await.unwrap().is_none());
}

#[tokio::test]
async fn explicit_timestamps_on_insert_are_rejected() {
  let s = store().await;
  let creation = raw_insert(
    &s,
    "INSERT INTO contacts (salutation, first_name, last_name, email, creation_timestamp)
     VALUES ('Mr', 'Jo', 'Do', 'a@b.c', '2000-01-01T00:00:00.000Z')",
  )
  .await;
  assert!(creation.is_err());

  let last_change = raw_insert(
    &s,
    "INSERT INTO contacts (salutation, first_name, last_name, email, last_change_timestamp)
     VALUES ('Mr', 'Jo', 'Do', 'a@b.c', '2999-01-01T00:00:00.000Z')",
  )
  .await;
  assert!(last_change.is_err());
  assert_eq!(count(&s).await, 0);
}

#[tokio::test]
async fn insert_without_generated_columns_is_accepted() {
  let s = store().await;
  let inserted = raw_insert(
    &s,
    "INSERT INTO contacts (salutation, first_name, last_name, email)
     VALUES ('Mr', 'Jo', 'Do', 'a@b.c')",
  )
  .await
  .unwrap();
  assert_eq!(inserted, 1);

  let all = s.get_all().await.unwrap();
  assert_eq!(all.len(), 1);
  assert!(all[0].id > 0);
  assert_eq!(all[0].creation_timestamp, all[0].last_change_timestamp);
}

#[tokio::test]
async fn delete_storage_failure_keeps_row() {
  let s = store().await;
  let contact = s.insert(john()).await.success().unwrap();

  s.conn
    .call(|conn| {
      conn.execute_batch(
        "CREATE TEMP TRIGGER contacts_no_delete BEFORE DELETE ON contacts
         BEGIN SELECT RAISE(ABORT, 'delete blocked'); END;",
      )?;
      Ok(())
    })
    .await
    .unwrap();

  match s.delete(contact.id).await {
    Outcome::Failure(f) => {
      assert_eq!(f.operation, "delete");
      assert!(f.reason.contains("delete blocked"), "{}", f.reason);
    }
    other => panic!("expected failure, got {other:?}"),
  }
  assert_eq!(count(&s).await, 1);
  assert!(s.get_by_id(contact.id).await.unwrap().is_some());
}

#[tokio::test]
async fn concurrent_updates_last_writer_wins() {
  let s = store().await;
  let contact = s.insert(john()).await.success().unwrap();

  let (a, b) = tokio::join!(
    s.update(contact.id, john().with_phone_number("a")),
    s.update(contact.id, john().with_phone_number("b")),
  );
  assert!(a.is_success() && b.is_success());

  let fetched = s.get_by_id(contact.id).await.unwrap().unwrap();
  let phone = fetched.phone_number.unwrap();
  assert!(phone == "a" || phone == "b");
}

// ─── Migrations ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_database_is_idempotent() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("rolodex.db");

  let first = SqliteStore::open(&path).await.unwrap();
  let contact = first.insert(john()).await.success().unwrap();
  drop(first);

  let second = SqliteStore::open(&path).await.unwrap();
  let fetched = second.get_by_id(contact.id).await.unwrap().unwrap();
  assert_eq!(fetched, contact);

  let version: u32 = second
    .conn
    .call(|conn| Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?))
    .await
    .unwrap();
  assert_eq!(version, latest_version());
}

#[tokio::test]
async fn newer_schema_version_is_rejected() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("future.db");

  let conn = rusqlite::Connection::open(&path).unwrap();
  conn.execute_batch("PRAGMA user_version = 99;").unwrap();
  drop(conn);

  let err = SqliteStore::open(&path).await.err().unwrap();
  assert!(matches!(
    err,
    Error::UnsupportedSchemaVersion { found: 99, .. }
  ));
}
