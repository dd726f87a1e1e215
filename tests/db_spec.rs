use aquascape::db::Database;
use speculate2::speculate;

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "slots" {
        describe "get_slot" {
            it "returns None for a key never written" {
                let value = db.get_slot("currentBuild").expect("Query failed");
                assert!(value.is_none());
            }
        }

        describe "put_slot" {
            it "stores a value" {
                db.put_slot("currentBuild", r#"{"title":"A"}"#).expect("Failed to put");
                let value = db.get_slot("currentBuild").expect("Query failed");
                assert_eq!(value.as_deref(), Some(r#"{"title":"A"}"#));
            }

            it "overwrites an existing value" {
                db.put_slot("currentBuild", "first").expect("Failed to put");
                db.put_slot("currentBuild", "second").expect("Failed to put");

                assert_eq!(db.get_slot("currentBuild").expect("Query failed").as_deref(), Some("second"));
                assert_eq!(db.list_slots().expect("Query failed"), vec!["currentBuild"]);
            }
        }

        describe "delete_slot" {
            it "removes the value and reports it existed" {
                db.put_slot("currentBuild", "x").expect("Failed to put");
                assert!(db.delete_slot("currentBuild").expect("Failed to delete"));
                assert!(db.get_slot("currentBuild").expect("Query failed").is_none());
            }

            it "reports false for a missing key" {
                assert!(!db.delete_slot("nothing").expect("Failed to delete"));
            }
        }

        describe "list_slots" {
            it "lists keys in order" {
                db.put_slot("b", "2").expect("Failed to put");
                db.put_slot("a", "1").expect("Failed to put");
                assert_eq!(db.list_slots().expect("Query failed"), vec!["a", "b"]);
            }
        }
    }

    describe "migrate" {
        it "can run more than once" {
            db.migrate().expect("Second migration failed");
            db.put_slot("k", "v").expect("Failed to put");
            assert_eq!(db.get_slot("k").expect("Query failed").as_deref(), Some("v"));
        }
    }

    describe "on disk" {
        it "keeps slots across reopen" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("aquascape.db");

            let first = Database::open(path.clone()).expect("Failed to open");
            first.migrate().expect("Failed to migrate");
            first.put_slot("currentBuild", "saved").expect("Failed to put");
            drop(first);

            let second = Database::open(path).expect("Failed to reopen");
            second.migrate().expect("Failed to migrate");
            assert_eq!(second.get_slot("currentBuild").expect("Query failed").as_deref(), Some("saved"));
        }
    }
}
