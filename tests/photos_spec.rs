use aquascape::db::Database;
use aquascape::models::*;
use aquascape::photos::upload_photos;
use aquascape::session::{BuildSession, SessionError, SessionScope};

fn active_scope() -> SessionScope {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let session = BuildSession::load(db, AquariumBuild::draft(DEFAULT_AUTHOR))
        .expect("Failed to load session");
    SessionScope::active(session)
}

#[tokio::test]
async fn appends_every_readable_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let png = dir.path().join("front.png");
    let jpg = dir.path().join("side.jpg");
    std::fs::write(&png, b"png-bytes").expect("write failed");
    std::fs::write(&jpg, b"jpg-bytes").expect("write failed");
    let missing = dir.path().join("gone.png");

    let scope = active_scope();
    let report = upload_photos(&scope, vec![png.clone(), missing.clone(), jpg.clone()])
        .await
        .expect("upload failed");

    assert_eq!(report.added.len(), 2);
    assert!(report.added.contains(&png));
    assert!(report.added.contains(&jpg));
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, missing);

    let photos = scope.with(|s| s.build().photos.clone()).expect("no session");
    assert_eq!(photos.len(), 2);
    assert!(photos.iter().all(|p| p.starts_with("data:image/")));
    assert!(photos.contains(&"data:image/png;base64,cG5nLWJ5dGVz".to_string()));
}

#[tokio::test]
async fn empty_batch_changes_nothing() {
    let scope = active_scope();
    let report = upload_photos(&scope, Vec::new()).await.expect("upload failed");
    assert!(report.added.is_empty());
    assert!(scope.with(|s| s.build().photos.is_empty()).expect("no session"));
}

#[tokio::test]
async fn fails_without_an_active_session() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("a.gif");
    std::fs::write(&path, b"gif").expect("write failed");

    let scope = SessionScope::new();
    let result = upload_photos(&scope, vec![path]).await;
    assert!(matches!(result, Err(SessionError::OutsideScope)));
}
