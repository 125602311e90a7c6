//! Integration tests for the database handle against on-disk databases
//!
//! These tests exercise the public handle API through temporary files, so
//! behaviour that only shows across connections (commit on close, reopen)
//! is covered.

#[cfg(test)]
mod tests {
    use managedb::core::db::{Assignments, DatabaseHandle, FieldSpec};
    use managedb::core::ManageDbError;
    use rusqlite::types::Value;
    use tempfile::TempDir;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn couples(pairs: &[(&str, &str)]) -> Assignments {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), text(v)))
            .collect()
    }

    /// Opens a handle on a fresh database file inside a temporary directory
    fn open_temp_db() -> (TempDir, DatabaseHandle) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.sqlite");
        let mut handle = DatabaseHandle::new(path.to_string_lossy().to_string());
        assert!(handle.open(None));
        (dir, handle)
    }

    #[test]
    fn test_open_valid_and_invalid_paths() {
        let (dir, mut handle) = open_temp_db();
        assert!(handle.is_open());
        assert!(dir.path().join("test.sqlite").exists());

        let missing_dir = dir.path().join("missing").join("db.sqlite");
        assert!(!handle.open(Some(missing_dir.to_str().unwrap())));
        assert!(!handle.is_open());
    }

    #[test]
    fn test_create_then_list_fields_round_trip() {
        let (_dir, handle) = open_temp_db();
        handle
            .create("t", &[FieldSpec::from("f1"), FieldSpec::from(("f2", "INTEGER"))])
            .unwrap();

        assert_eq!(handle.list_fields("t").unwrap(), vec!["f1", "f2"]);
        assert_eq!(handle.list_tables().unwrap(), vec!["t"]);

        let columns = handle.describe("t").unwrap();
        assert_eq!(columns[0].type_name, "TEXT");
        assert_eq!(columns[1].type_name, "INTEGER");
    }

    #[test]
    fn test_column_type_cannot_declare_extra_columns() {
        let (_dir, handle) = open_temp_db();
        let result = handle.create("t", &[("a", "INTEGER, injected BLOB").into()]);

        assert!(matches!(result, Err(ManageDbError::Query(_))));
        assert!(handle.list_tables().unwrap().is_empty());

        handle.create("t", &[("price", "DECIMAL(10,2)").into()]).unwrap();
        assert_eq!(handle.list_fields("t").unwrap(), vec!["price"]);
    }

    #[test]
    fn test_set_then_get_in_column_order() {
        let (_dir, handle) = open_temp_db();
        handle.create("t", &["a".into(), "b".into()]).unwrap();
        handle.set("t", &couples(&[("a", "1"), ("b", "2")])).unwrap();

        assert_eq!(handle.get("t", None).unwrap(), vec![vec![text("1"), text("2")]]);
    }

    #[test]
    fn test_set_with_mapping_order_differing_from_columns() {
        let (_dir, handle) = open_temp_db();
        handle.create("t", &["a".into(), "b".into()]).unwrap();
        handle.set("t", &couples(&[("b", "2"), ("a", "1")])).unwrap();

        assert_eq!(handle.get("t", None).unwrap(), vec![vec![text("1"), text("2")]]);
    }

    #[test]
    fn test_bob_scenario_returns_native_types() {
        let (_dir, handle) = open_temp_db();
        handle
            .create("t", &["name".into(), ("age", "INTEGER").into()])
            .unwrap();
        handle.set("t", &couples(&[("name", "Bob"), ("age", "5")])).unwrap();

        assert_eq!(
            handle.get("t", None).unwrap(),
            vec![vec![text("Bob"), Value::Integer(5)]]
        );
    }

    #[test]
    fn test_delete_matching_nothing_keeps_rows() {
        let (_dir, handle) = open_temp_db();
        handle.create("t", &["name".into()]).unwrap();
        handle.set("t", &couples(&[("name", "Bob")])).unwrap();
        handle.set("t", &couples(&[("name", "Eve")])).unwrap();

        let deleted = handle.delete("t", &couples(&[("name", "Nobody")])).unwrap();
        assert_eq!(deleted, 0);
        assert_eq!(handle.get("t", None).unwrap().len(), 2);

        let deleted = handle.delete("t", &couples(&[("name", "Bob")])).unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(handle.get("t", None).unwrap(), vec![vec![text("Eve")]]);
    }

    #[test]
    fn test_syntax_error_keeps_committed_state() {
        let (_dir, handle) = open_temp_db();
        handle.create("t", &["name".into()]).unwrap();
        handle.set("t", &couples(&[("name", "Bob")])).unwrap();

        let result = handle.execute("INSERT INTO t VALUES (", None);
        assert!(matches!(result, Err(ManageDbError::Database(_))));
        assert_eq!(handle.get("t", None).unwrap(), vec![vec![text("Bob")]]);
    }

    #[test]
    fn test_changes_survive_close_and_reopen() {
        let (_dir, mut handle) = open_temp_db();
        handle.create("t", &["name".into()]).unwrap();
        handle.set("t", &couples(&[("name", "Bob")])).unwrap();
        handle.close().unwrap();
        assert!(!handle.is_open());

        assert!(handle.open(None));
        assert_eq!(handle.get("t", None).unwrap(), vec![vec![text("Bob")]]);
    }

    #[test]
    fn test_reopen_replaces_connection_without_losing_work() {
        let (dir, mut handle) = open_temp_db();
        handle.create("t", &["name".into()]).unwrap();
        handle.set("t", &couples(&[("name", "Bob")])).unwrap();

        let second = dir.path().join("second.sqlite");
        assert!(handle.open(Some(second.to_str().unwrap())));
        assert!(handle.list_tables().unwrap().is_empty());

        let first = dir.path().join("test.sqlite");
        assert!(handle.open(Some(first.to_str().unwrap())));
        assert_eq!(handle.get("t", None).unwrap(), vec![vec![text("Bob")]]);
    }

    #[test]
    fn test_drop_closes_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("drop.sqlite").to_string_lossy().to_string();
        {
            let handle = DatabaseHandle::with_auto_open(path.clone(), true);
            handle.create("t", &["name".into()]).unwrap();
            handle.set("t", &couples(&[("name", "Bob")])).unwrap();
        }

        let handle = DatabaseHandle::with_auto_open(path, true);
        assert_eq!(handle.list_tables().unwrap(), vec!["t"]);
        assert_eq!(handle.get("t", None).unwrap().len(), 1);
    }

    #[test]
    fn test_names_and_values_are_not_interpreted_as_sql() {
        let (_dir, handle) = open_temp_db();
        let table = "t\"; DROP TABLE victims; --";
        handle.create("victims", &["name".into()]).unwrap();
        handle
            .create(table, &["we\"ird".into(), ("n", "INTEGER").into()])
            .unwrap();

        handle
            .set(table, &couples(&[("we\"ird", "x' OR '1'='1"), ("n", "3")]))
            .unwrap();
        assert_eq!(
            handle.get(table, Some(&["we\"ird".to_string()])).unwrap(),
            vec![vec![text("x' OR '1'='1")]]
        );

        let deleted = handle.delete(table, &couples(&[("we\"ird", "' OR '1'='1")])).unwrap();
        assert_eq!(deleted, 0);

        let mut tables = handle.list_tables().unwrap();
        tables.sort();
        assert_eq!(tables, vec![table.to_string(), "victims".to_string()]);
        assert_eq!(handle.list_fields(table).unwrap(), vec!["we\"ird", "n"]);
    }
}
