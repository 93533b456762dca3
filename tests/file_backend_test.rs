//! Tables persisted through the file backend

use kvtables::{record, Backend, FileStore, StoreConfig, TableStore};

#[test]
fn test_tables_survive_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tables.json");

    {
        let tables = TableStore::new(FileStore::open(&path).expect("open"));
        tables
            .create_table("users")
            .and_then(|t| {
                t.insert(
                    "users",
                    [
                        record! { "id" => "1", "name" => "Ann" },
                        record! { "id" => "2", "name" => "Bo" },
                    ],
                )
            })
            .and_then(|t| t.remove_by_id("users", "1"))
            .expect("populate");
    }

    let tables = TableStore::new(FileStore::open(&path).expect("reopen"));
    assert_eq!(
        tables.get_all("users").expect("read"),
        vec![record! { "id" => "2", "name" => "Bo" }]
    );
    assert!(tables.create_table("users").is_err());
}

#[test]
fn test_drop_all_is_persisted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = StoreConfig {
        backend: Backend::File,
        path: Some(dir.path().join("store").join("tables.json")),
        ..Default::default()
    };

    let tables = config.open_tables().expect("open");
    tables.insert("a", [record! { "id" => "1" }]).expect("insert");
    tables.insert("b", [record! { "id" => "2" }]).expect("insert");
    tables.drop_all_tables().expect("drop all");
    drop(tables);

    let reopened = config.open_tables().expect("reopen");
    assert!(!reopened.table_exists("a").expect("exists"));
    assert_eq!(reopened.count("b").expect("count"), 0);
}
