//! Integration tests for ledger storage constraints and cascades

use questline::ledger::{BoostType, LedgerError, LedgerManager};
use tempfile::tempdir;

fn test_ledger() -> LedgerManager {
    LedgerManager::in_memory().expect("Failed to open in-memory ledger")
}

fn count(ledger: &LedgerManager, table: &str) -> i64 {
    ledger
        .db()
        .conn()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .expect("count rows")
}

/// Seed one player holding a boost, a completed level and its prize
fn seed_full_player(ledger: &LedgerManager) -> (String, String, String) {
    let catalog = ledger.catalog();
    let player = catalog.create_player().expect("create player");
    let boost = catalog
        .create_boost(BoostType::Speed)
        .expect("create boost");
    let level = catalog.create_level("Level 1", 1).expect("create level");
    let prize = catalog.create_prize("Prize 1").expect("create prize");
    catalog.attach_prize(&level.id, &prize.id).expect("attach");

    let progression = ledger.progression();
    progression
        .add_boost(&player.id, &boost.id, 1)
        .expect("add boost");
    progression
        .complete_level(&player.id, &level.id, 100)
        .expect("complete level");

    (player.id, boost.id, level.id)
}

#[test]
fn test_open_creates_schema_on_disk() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("ledger.db");
    let ledger = LedgerManager::with_path(&db_path).expect("open ledger");

    assert!(db_path.exists());
    assert_eq!(count(&ledger, "players"), 0);

    // Reopening the same file must not fail or lose data
    ledger.catalog().create_prize("Keeper").expect("create prize");
    drop(ledger);
    let reopened = LedgerManager::with_path(&db_path).expect("reopen ledger");
    assert_eq!(count(&reopened, "prizes"), 1);
}

#[test]
fn test_duplicate_boost_type_rejected() {
    let ledger = test_ledger();
    ledger
        .catalog()
        .create_boost(BoostType::Speed)
        .expect("first speed boost");

    let err = ledger
        .catalog()
        .create_boost(BoostType::Speed)
        .expect_err("duplicate kind must fail");
    assert!(matches!(err, LedgerError::ConstraintViolation(_)));
    assert_eq!(count(&ledger, "boosts"), 1);
}

#[test]
fn test_deleting_player_cascades_to_association_rows() {
    let ledger = test_ledger();
    let (player_id, _, _) = seed_full_player(&ledger);

    assert_eq!(count(&ledger, "player_boosts"), 1);
    assert_eq!(count(&ledger, "player_levels"), 1);
    assert_eq!(count(&ledger, "player_prizes"), 1);

    ledger.catalog().delete_player(&player_id).expect("delete");

    assert_eq!(count(&ledger, "player_boosts"), 0);
    assert_eq!(count(&ledger, "player_levels"), 0);
    assert_eq!(count(&ledger, "player_prizes"), 0);
    // Catalog rows stay
    assert_eq!(count(&ledger, "boosts"), 1);
    assert_eq!(count(&ledger, "levels"), 1);
    assert_eq!(count(&ledger, "prizes"), 1);
}

#[test]
fn test_deleting_level_cascades_to_associations() {
    let ledger = test_ledger();
    let (_, _, level_id) = seed_full_player(&ledger);

    ledger.catalog().delete_level(&level_id).expect("delete");

    assert_eq!(count(&ledger, "level_prizes"), 0);
    assert_eq!(count(&ledger, "player_levels"), 0);
    // Granted prizes are grant events, not level associations
    assert_eq!(count(&ledger, "player_prizes"), 1);
}

#[test]
fn test_deleting_boost_cascades_to_player_boosts() {
    let ledger = test_ledger();
    let (_, boost_id, _) = seed_full_player(&ledger);

    ledger.catalog().delete_boost(&boost_id).expect("delete");
    assert_eq!(count(&ledger, "player_boosts"), 0);
    assert_eq!(count(&ledger, "players"), 1);
}

#[test]
fn test_delete_unknown_record_is_not_found() {
    let ledger = test_ledger();
    let err = ledger
        .catalog()
        .delete_player("missing")
        .expect_err("unknown id must fail");
    assert!(matches!(err, LedgerError::NotFound { entity: "player", .. }));
}

#[test]
fn test_attach_prize_unknown_level() {
    let ledger = test_ledger();
    let prize = ledger.catalog().create_prize("Prize 1").expect("create");

    let err = ledger
        .catalog()
        .attach_prize("missing", &prize.id)
        .expect_err("unknown level must fail");
    assert!(matches!(err, LedgerError::NotFound { entity: "level", .. }));
}

#[test]
fn test_reset_all_clears_every_table() {
    let ledger = test_ledger();
    seed_full_player(&ledger);

    ledger.reset_all().expect("reset");

    for table in [
        "players",
        "boosts",
        "levels",
        "prizes",
        "level_prizes",
        "player_boosts",
        "player_levels",
        "player_prizes",
    ] {
        assert_eq!(count(&ledger, table), 0, "{table} must be empty");
    }

    // Schema is still usable after the wipe
    ledger
        .catalog()
        .create_boost(BoostType::Shield)
        .expect("create after reset");
}
