//! End-to-end behaviour of TableStore over the in-memory store

use kvtables::error::Error;
use kvtables::{record, KeyValueStore, MemoryStore, Record, TableStore, Value};

fn ids(rows: &[Record]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.id().and_then(Value::as_str).map(str::to_string))
        .collect()
}

#[test]
fn test_users_walkthrough() -> anyhow::Result<()> {
    let tables = TableStore::new(MemoryStore::new());

    tables.create_table("users")?;
    tables.insert(
        "users",
        [
            record! { "id" => "1", "name" => "Ann" },
            record! { "id" => "2", "name" => "Bo" },
        ],
    )?;

    assert_eq!(
        tables.get_one_by_id("users", "2")?,
        Some(record! { "id" => "2", "name" => "Bo" })
    );

    tables.remove_by_id("users", "1")?;
    assert_eq!(
        tables.get_all("users")?,
        vec![record! { "id" => "2", "name" => "Bo" }]
    );

    tables.drop_table("users")?;
    assert_eq!(tables.get_all("users")?, Vec::<Record>::new());
    Ok(())
}

#[test]
fn test_lifecycle_errors() {
    let tables = TableStore::new(MemoryStore::new());

    tables.create_table("t").expect("first create");
    match tables.create_table("t") {
        Err(Error::AlreadyExists(msg)) => assert!(msg.contains("'t'")),
        other => panic!("expected AlreadyExists, got {:?}", other.map(|_| ())),
    }

    tables.drop_table("t").expect("drop existing");
    match tables.drop_table("t") {
        Err(Error::NotFound(msg)) => assert!(msg.contains("'t'")),
        other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_round_trip_of_mixed_fields() -> anyhow::Result<()> {
    let tables = TableStore::new(MemoryStore::new());
    let r = record! {
        "id" => "mixed",
        "text" => "héllo \"quoted\"\n",
        "int" => -42,
        "float" => 0.1,
        "big" => 1.0e300,
        "yes" => true,
        "nothing" => Value::Null,
        "list" => vec![Value::from(1), Value::from("two"), record! { "three" => 3 }],
    };

    tables.create_table("t")?.insert("t", [r.clone()])?;
    assert_eq!(tables.get_all("t")?, vec![r]);
    Ok(())
}

#[test]
fn test_drop_all_clears_every_table() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let tables = TableStore::new(store.clone());

    for name in ["a", "b", "c"] {
        tables
            .create_table(name)?
            .insert(name, [record! { "id" => name }])?;
    }
    assert_eq!(store.len(), 3);

    tables.drop_all_tables()?;
    assert!(store.is_empty());
    for name in ["a", "b", "c"] {
        assert!(tables.get_all(name)?.is_empty());
        assert!(!tables.table_exists(name)?);
    }
    Ok(())
}

#[test]
fn test_chained_mutations_persist() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let tables = TableStore::new(&store);

    tables
        .create_table("t")?
        .insert("t", [record! { "id" => "a" }, record! { "id" => "b" }])?
        .insert("t", [record! { "id" => "c" }])?
        .remove_by_id("t", "b")?
        .remove("t", [record! { "id" => "c" }])?;

    // read straight from the store to check the removal was written back
    assert_eq!(store.get("t")?.as_deref(), Some(r#"[{"id":"a"}]"#));
    assert_eq!(ids(&tables.get_all("t")?), vec!["a"]);
    Ok(())
}

#[test]
fn test_tables_are_independent() -> anyhow::Result<()> {
    let tables = TableStore::new(MemoryStore::new());
    tables.insert("left", [record! { "id" => "1" }])?;
    tables.insert("right", [record! { "id" => "1" }, record! { "id" => "2" }])?;

    tables.remove_by_id("left", "1")?;
    assert!(tables.get_all("left")?.is_empty());
    assert_eq!(ids(&tables.get_all("right")?), vec!["1", "2"]);

    tables.drop_table("right")?;
    assert!(tables.table_exists("left")?);
    Ok(())
}

#[test]
fn test_repeated_reads_are_equal() -> anyhow::Result<()> {
    let tables = TableStore::new(MemoryStore::new());
    tables.insert("t", [record! { "id" => "1", "n" => 1.5 }, Value::from("loose")])?;

    let first = tables.get_all("t")?;
    let second = tables.get_all("t")?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_lost_update_between_handles() -> anyhow::Result<()> {
    // Mutations are whole-table read-modify-write; a stale copy written back
    // wins over a newer insert.
    let store = MemoryStore::new();
    let tables = TableStore::new(store.clone());
    tables.insert("t", [record! { "id" => "1" }])?;

    let stale = store.get("t")?;
    tables.insert("t", [record! { "id" => "2" }])?;
    if let Some(text) = stale {
        store.set("t", text)?;
    }

    assert_eq!(ids(&tables.get_all("t")?), vec!["1"]);
    Ok(())
}
