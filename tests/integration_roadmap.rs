use audit_roadmap_lib::catalog::Catalog;
use audit_roadmap_lib::controller::AuditController;
use audit_roadmap_lib::db::Database;
use audit_roadmap_lib::models::{AppSettings, ItemStatus, LoadWarning, Move};
use audit_roadmap_lib::scheduler::{FlushOutcome, ManualClock};
use audit_roadmap_lib::store::{OverlayStore, LAYOUT_KEY, OVERLAY_KEY};
use std::sync::Arc;
use std::time::Duration;

fn open(db: &Arc<Database>, clock: &ManualClock) -> AuditController {
    AuditController::load(
        db.clone(),
        Arc::new(Catalog::builtin().clone()),
        AppSettings::default(),
        Arc::new(clock.clone()),
    )
}

#[test]
fn edits_and_moves_survive_a_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = Arc::new(Database::new(&dir.path().join("audit.db")).expect("db"));
    let clock = ManualClock::new();

    let mut session = open(&db, &clock);
    session
        .set_status("id-1", ItemStatus::Implemented)
        .expect("status");
    session.set_notes("sec-1", "pilot group first").expect("notes");
    let index = session
        .board()
        .column("phase1")
        .expect("phase1")
        .item_ids
        .iter()
        .position(|id| id == "sec-1")
        .expect("sec-1 placed");
    session
        .apply_move(&Move {
            source_column: "phase1".to_string(),
            source_index: index,
            dest_column: "phase3".to_string(),
            dest_index: 0,
            item_id: "sec-1".to_string(),
        })
        .expect("move");
    clock.advance(Duration::from_millis(1000));
    assert!(matches!(session.tick(), FlushOutcome::Written));
    drop(session);

    let reopened = Arc::new(Database::new(&dir.path().join("audit.db")).expect("reopen"));
    let restored = open(&reopened, &clock);
    assert!(restored.warnings().is_empty());
    assert!(!restored.is_dirty());
    let sec1 = restored.state().item("sec-1").expect("sec-1");
    assert_eq!(sec1.notes, "pilot group first");
    assert_eq!(restored.board().column_of("sec-1"), Some("phase3"));
    // Implemented before it was ever saved, still kept on the board.
    assert_eq!(restored.board().column_of("id-1"), Some("phase1"));
    assert_eq!(restored.stats().overall, 10);
}

#[test]
fn legacy_full_item_blobs_are_read_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = Arc::new(Database::new(&dir.path().join("audit.db")).expect("db"));
    db.write_blob(
        OVERLAY_KEY,
        r#"[
            {"id":"sec-1","category":"Security","item":"Old MFA wording","impact":"Critical","link":"x","defaultStatus":"Not Implemented","status":"Implemented","notes":"done in Q1"},
            {"id":"gov-2","category":"Access Governance","item":"Reviews","impact":"Medium","link":"y","status":"N/A","notes":""},
            {"id":"retired-9","status":"Planned","notes":"gone from catalog"}
        ]"#,
    )
    .expect("seed overlay");
    db.write_blob(
        LAYOUT_KEY,
        r#"{
            "phase1": {"id":"phase1","title":"Phase 1: Immediate","itemIds":["retired-9","sec-2"],"color":"border-red-500","bg":"bg-red-50"},
            "phase2": {"id":"phase2","title":"Phase 2: Short-term","itemIds":[],"color":"border-orange-500","bg":"bg-orange-50"},
            "phase3": {"id":"phase3","title":"Phase 3: Long-term","itemIds":["sec-1"],"color":"border-blue-500","bg":"bg-blue-50"}
        }"#,
    )
    .expect("seed layout");

    let clock = ManualClock::new();
    let mut session = open(&db, &clock);
    let sec1 = session.state().item("sec-1").expect("sec-1");
    assert_eq!(sec1.status, ItemStatus::Implemented);
    assert_eq!(sec1.text, "Enable Multi-Factor Authentication (MFA) for all users");
    assert_eq!(sec1.category, "Security & Zero Trust");
    assert!(session.state().item("retired-9").is_none());
    assert_eq!(
        session.warnings(),
        &[LoadWarning::UnknownBoardEntry {
            item_id: "retired-9".to_string(),
            column_id: "phase1".to_string(),
        }]
    );

    let phase1 = session.board().column("phase1").expect("phase1").item_ids.clone();
    assert_eq!(phase1[0], "sec-2");
    assert!(!phase1.contains(&"gov-2".to_string()));
    assert!(!phase1.contains(&"sec-1".to_string()));
    assert_eq!(session.board().column_of("sec-1"), Some("phase3"));

    // Repaired layout and trimmed overlay are written back.
    assert!(session.is_dirty());
    assert!(matches!(session.flush_now(), FlushOutcome::Written));
    let overlay = db.read_blob(OVERLAY_KEY).expect("read").expect("overlay");
    assert!(!overlay.contains("Old MFA wording"));
    assert!(!overlay.contains("retired-9"));
}

#[test]
fn stats_follow_status_changes_immediately() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = Arc::new(Database::new(&dir.path().join("audit.db")).expect("db"));
    let clock = ManualClock::new();
    let mut session = open(&db, &clock);

    for id in ["id-1", "id-2", "id-3"] {
        session.set_status(id, ItemStatus::Implemented).expect("status");
    }
    session
        .set_status("ext-1", ItemStatus::NotApplicable)
        .expect("status");

    let stats = session.stats();
    assert_eq!(stats.overall, 33);
    assert_eq!(stats.per_category[0].category, "Identity Fundamentals");
    assert_eq!(stats.per_category[0].score, 100);
    let external = stats
        .per_category
        .iter()
        .find(|score| score.category == "External Identities")
        .expect("external");
    assert_eq!(external.applicable, 0);
    assert_eq!(external.score, 0);
    assert!(session.critical_gaps().iter().all(|gap| gap.id != "id-1"));
}
