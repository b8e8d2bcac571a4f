//! Integration tests for the CSV export projection

use questline::ledger::LedgerManager;
use tempfile::tempdir;

fn test_ledger() -> LedgerManager {
    LedgerManager::in_memory().expect("Failed to open in-memory ledger")
}

fn export_lines(ledger: &LedgerManager) -> Vec<String> {
    let mut out = Vec::new();
    ledger.exporter().export_csv(&mut out).expect("export");
    String::from_utf8(out)
        .expect("utf8 output")
        .lines()
        .map(|l| l.to_string())
        .collect()
}

#[test]
fn test_export_one_row_per_player_level() {
    let ledger = test_ledger();
    let catalog = ledger.catalog();
    let progression = ledger.progression();

    let level_a = catalog.create_level("Level A", 1).expect("create level A");
    let level_b = catalog.create_level("Level B", 2).expect("create level B");
    let prize = catalog.create_prize("Prize A").expect("create prize");
    catalog.attach_prize(&level_a.id, &prize.id).expect("attach");

    let alice = catalog.create_player().expect("create alice");
    let bob = catalog.create_player().expect("create bob");

    progression
        .complete_level(&alice.id, &level_a.id, 100)
        .expect("alice completes A");
    progression
        .record_level_result(&alice.id, &level_b.id, None, 10)
        .expect("alice attempts B");
    progression
        .complete_level(&bob.id, &level_b.id, 80)
        .expect("bob completes B");

    let lines = export_lines(&ledger);
    assert_eq!(lines[0], "player_id,level_title,completed,prize_title");
    assert_eq!(
        lines.len() as u64 - 1,
        ledger.query().count_player_levels().expect("count"),
        "one data row per PlayerLevel record"
    );

    // Rows come back in insertion order
    assert_eq!(lines[1], format!("{},Level A,true,Prize A", alice.id));
    assert_eq!(lines[2], format!("{},Level B,false,", alice.id));
    assert_eq!(lines[3], format!("{},Level B,true,", bob.id));
}

#[test]
fn test_export_reports_first_attached_prize_only() {
    let ledger = test_ledger();
    let catalog = ledger.catalog();
    let progression = ledger.progression();

    let level = catalog.create_level("Level 1", 1).expect("create level");
    let prize_x = catalog.create_prize("Prize X").expect("create prize X");
    let prize_y = catalog.create_prize("Prize Y").expect("create prize Y");
    catalog.attach_prize(&level.id, &prize_x.id).expect("attach X");
    catalog.attach_prize(&level.id, &prize_y.id).expect("attach Y");

    let player = catalog.create_player().expect("create player");
    progression
        .complete_level(&player.id, &level.id, 100)
        .expect("complete");

    let lines = export_lines(&ledger);
    assert_eq!(lines.len(), 2);
    assert!(
        lines[1].ends_with(",Prize X"),
        "only the first attached prize is reported: {}",
        lines[1]
    );
}

#[test]
fn test_export_empty_prize_title_when_level_has_no_prize() {
    let ledger = test_ledger();
    let catalog = ledger.catalog();

    let level = catalog.create_level("Level 1", 1).expect("create level");
    let player = catalog.create_player().expect("create player");
    ledger
        .progression()
        .complete_level(&player.id, &level.id, 100)
        .expect("complete");

    let lines = export_lines(&ledger);
    assert_eq!(lines[1], format!("{},Level 1,true,", player.id));
}

#[test]
fn test_export_quotes_fields_with_commas() {
    let ledger = test_ledger();
    let catalog = ledger.catalog();

    let level = catalog
        .create_level("Boss, Final", 99)
        .expect("create level");
    let player = catalog.create_player().expect("create player");
    ledger
        .progression()
        .record_level_result(&player.id, &level.id, None, 0)
        .expect("record attempt");

    let lines = export_lines(&ledger);
    assert!(
        lines[1].contains("\"Boss, Final\""),
        "comma-bearing title must be quoted: {}",
        lines[1]
    );
}

#[test]
fn test_export_empty_ledger_writes_header_only() {
    let ledger = test_ledger();
    let lines = export_lines(&ledger);
    assert_eq!(lines, vec!["player_id,level_title,completed,prize_title"]);
}

#[test]
fn test_export_to_file() {
    let ledger = test_ledger();
    let catalog = ledger.catalog();

    let level = catalog.create_level("Level 1", 1).expect("create level");
    let player = catalog.create_player().expect("create player");
    ledger
        .progression()
        .complete_level(&player.id, &level.id, 100)
        .expect("complete");

    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("reports").join("levels.csv");
    let rows = ledger
        .exporter()
        .export_csv_file(&path)
        .expect("export to file");
    assert_eq!(rows, 1);

    let text = std::fs::read_to_string(&path).expect("read export");
    assert!(text.starts_with("player_id,level_title,completed,prize_title\n"));
    assert_eq!(text.lines().count(), 2);
}
