use aquascape::catalog::CatalogStore;
use aquascape::db::Database;
use aquascape::models::*;
use aquascape::session::{BuildSession, SessionError, SessionScope, BUILD_SLOT_KEY};
use speculate2::speculate;

fn open_db() -> Database {
    let db = Database::open_memory().expect("Failed to create in-memory database");
    db.migrate().expect("Failed to run migrations");
    db
}

fn load(db: &Database) -> BuildSession {
    BuildSession::load(db.clone(), AquariumBuild::draft(DEFAULT_AUTHOR))
        .expect("Failed to load session")
}

fn stored_build(db: &Database) -> Option<AquariumBuild> {
    db.get_slot(BUILD_SLOT_KEY)
        .expect("Query failed")
        .map(|json| serde_json::from_str(&json).expect("Stored build is not valid JSON"))
}

speculate! {
    before {
        let catalog = CatalogStore::builtin().expect("Failed to load catalog");
        let db = open_db();
        let mut session = load(&db);
        let tank = catalog.find_equipment("tank-1").expect("tank-1 missing").clone();
        let neon = catalog.find_livestock("fish-1").expect("fish-1 missing").clone();
        let fern = catalog.find_livestock("plant-1").expect("plant-1 missing").clone();
    }

    describe "load" {
        it "starts from the default build when nothing is stored" {
            let build = session.build();
            assert_eq!(build.id, DRAFT_BUILD_ID);
            assert_eq!(build.title, DEFAULT_TITLE);
            assert_eq!(build.author, DEFAULT_AUTHOR);
            assert!(build.equipment.is_empty());
            assert!(!build.is_public);
            assert!(stored_build(&db).is_none());
        }

        it "restores what an earlier session stored" {
            session.add_equipment(&tank, 2).expect("add failed");
            session.add_fish(&neon, 6).expect("add failed");
            session.update_build(UpdateBuildInput {
                title: Some("Nano Scape".to_string()),
                ..Default::default()
            }).expect("update failed");
            let before = session.build().clone();
            drop(session);

            let reloaded = load(&db);
            assert_eq!(reloaded.build(), &before);
        }

        it "fills fields missing from an older stored record" {
            let legacy = r#"{
                "id": "build-42",
                "title": "Old Build",
                "description": "<p>hi</p>",
                "equipment": [],
                "fish": [],
                "plants": [],
                "isPublic": true,
                "createdAt": "2024-03-01T12:00:00Z",
                "author": "Someone"
            }"#;
            db.put_slot(BUILD_SLOT_KEY, legacy).expect("put failed");

            let reloaded = load(&db);
            let build = reloaded.build();
            assert_eq!(build.id, "build-42");
            assert_eq!(build.title, "Old Build");
            assert!(build.is_public);
            assert!(build.photos.is_empty());
        }

        it "keeps good fields and drops malformed ones" {
            db.put_slot(BUILD_SLOT_KEY, r#"{ "title": "Kept", "fish": "not a list" }"#)
                .expect("put failed");

            let reloaded = load(&db);
            assert_eq!(reloaded.build().title, "Kept");
            assert!(reloaded.build().fish.is_empty());
        }

        it "falls back to defaults when the stored value is not JSON" {
            db.put_slot(BUILD_SLOT_KEY, "{{{").expect("put failed");

            let reloaded = load(&db);
            assert_eq!(reloaded.build(), reloaded.default_build());
        }
    }

    describe "equipment" {
        it "ignores a second add of the same item" {
            session.add_equipment(&tank, 1).expect("add failed");
            session.add_equipment(&tank, 5).expect("add failed");

            let lines = &session.build().equipment;
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0].id(), "tank-1");
            assert_eq!(lines[0].quantity, 1);
        }

        it "removes a line by id" {
            session.add_equipment(&tank, 1).expect("add failed");
            assert!(session.has_equipment("tank-1"));

            session.remove_equipment("tank-1").expect("remove failed");
            assert!(!session.has_equipment("tank-1"));
            assert!(stored_build(&db).expect("nothing stored").equipment.is_empty());
        }

        it "leaves the build unchanged when removing an absent id" {
            session.add_equipment(&tank, 1).expect("add failed");
            let before = session.build().clone();

            session.remove_equipment("heater-9").expect("remove failed");
            assert_eq!(session.build(), &before);
        }
    }

    describe "livestock" {
        it "accumulates quantity for repeated adds" {
            session.add_fish(&neon, 2).expect("add failed");
            session.add_fish(&neon, 3).expect("add failed");

            let fish = &session.build().fish;
            assert_eq!(fish.len(), 1);
            assert_eq!(fish[0].quantity, 5);
        }

        it "saturates instead of overflowing" {
            session.add_fish(&neon, u32::MAX - 1).expect("add failed");
            session.add_fish(&neon, 10).expect("add failed");
            assert_eq!(session.build().fish[0].quantity, u32::MAX);
        }

        it "routes by kind" {
            session.add_livestock(&neon, 4).expect("add failed");
            session.add_livestock(&fern, 2).expect("add failed");

            assert_eq!(session.build().fish.len(), 1);
            assert_eq!(session.build().plants.len(), 1);
            assert!(session.has_livestock(&neon));
            assert!(session.has_livestock(&fern));

            session.remove_livestock(&fern).expect("remove failed");
            assert!(!session.has_livestock(&fern));
            assert!(session.has_livestock(&neon));
        }

        it "keeps fish and plant lists separate" {
            session.add_plant(&fern, 3).expect("add failed");
            session.remove_fish("plant-1").expect("remove failed");
            assert_eq!(session.build().plants[0].quantity, 3);
        }
    }

    describe "every mutation is persisted" {
        it "stores the full build after each change" {
            session.add_equipment(&tank, 1).expect("add failed");
            assert_eq!(stored_build(&db).as_ref(), Some(session.build()));

            session.add_plant(&fern, 2).expect("add failed");
            assert_eq!(stored_build(&db).as_ref(), Some(session.build()));

            session.add_photo("data:image/png;base64,AA==".to_string()).expect("add failed");
            assert_eq!(stored_build(&db).as_ref(), Some(session.build()));

            let now_public = session.toggle_visibility().expect("toggle failed");
            assert!(now_public);
            assert_eq!(stored_build(&db).as_ref(), Some(session.build()));
        }
    }

    describe "photos" {
        it "appends and removes by index" {
            session.add_photo("a".to_string()).expect("add failed");
            session.add_photo("b".to_string()).expect("add failed");
            session.add_photo("c".to_string()).expect("add failed");

            session.remove_photo(1).expect("remove failed");
            assert_eq!(session.build().photos, vec!["a", "c"]);

            session.remove_photo(10).expect("remove failed");
            assert_eq!(session.build().photos, vec!["a", "c"]);
        }
    }

    describe "reset_build" {
        it "returns to the default build and clears storage" {
            session.add_equipment(&tank, 1).expect("add failed");
            session.add_fish(&neon, 3).expect("add failed");
            assert!(stored_build(&db).is_some());

            session.reset_build().expect("reset failed");
            assert_eq!(session.build(), session.default_build());
            assert!(stored_build(&db).is_none());
        }

        it "is followed by a default build on the next load" {
            session.add_fish(&neon, 3).expect("add failed");
            session.reset_build().expect("reset failed");
            drop(session);

            let reloaded = load(&db);
            assert!(reloaded.build().fish.is_empty());
        }
    }

    describe "share_url" {
        it "is absent while the build is private" {
            assert_eq!(session.share_url("https://aquarium-builder.com/build"), None);
        }

        it "appends the build id to the base once public" {
            session.toggle_visibility().expect("toggle failed");
            assert_eq!(
                session.share_url("https://aquarium-builder.com/build/").as_deref(),
                Some("https://aquarium-builder.com/build/build-draft")
            );
        }
    }

    describe "comments" {
        it "ignores blank content" {
            let posted = session.post_comment(CreateCommentInput {
                author: None,
                content: "   ".to_string(),
            });
            assert!(posted.is_none());
            assert!(session.comments().is_empty());
        }

        it "appends comments after the seeded ones" {
            let mut session = session.with_comments(catalog.sample_comments().iter().cloned());
            let seeded = session.comments().len();

            let comment = session.post_comment(CreateCommentInput {
                author: None,
                content: "Love the hardscape".to_string(),
            }).expect("comment rejected");

            assert!(comment.id.starts_with("comment-"));
            assert_eq!(comment.author, DEFAULT_AUTHOR);
            assert_eq!(comment.build_id, DRAFT_BUILD_ID);
            assert_eq!(session.comments().len(), seeded + 1);
            assert_eq!(session.comments().last(), Some(&comment));
        }

        it "never writes comments to storage" {
            session.post_comment(CreateCommentInput {
                author: Some("Visitor".to_string()),
                content: "Nice".to_string(),
            });
            assert_eq!(db.list_slots().expect("Query failed").len(), 0);
        }
    }

    describe "scope" {
        it "rejects access with no active session" {
            let scope = SessionScope::new();
            let result = scope.with(|s| s.build().title.clone());
            assert!(matches!(result, Err(SessionError::OutsideScope)));
        }

        it "gives access while a session is active" {
            let scope = SessionScope::active(session);
            let title = scope.with(|s| s.build().title.clone()).expect("no session");
            assert_eq!(title, DEFAULT_TITLE);

            scope.try_with(|s| s.add_fish(&neon, 1)).expect("add failed");
            assert!(scope.end().is_some());
            assert!(!scope.is_active());
            assert!(matches!(
                scope.try_with(|s| s.add_fish(&neon, 1)),
                Err(SessionError::OutsideScope)
            ));
        }
    }
}
