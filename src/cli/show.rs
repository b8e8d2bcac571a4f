//! Show command implementation

use anyhow::{Result, bail};

use questline::ledger::LedgerManager;

/// Print a player's points, boosts, level progress and received prizes
pub fn show_command(ledger: &LedgerManager, player_id: &str) -> Result<()> {
    let query = ledger.query();
    let Some(player) = query.get_player(player_id)? else {
        bail!("no player with id {player_id}");
    };

    println!("Player {}", player.id);
    println!("  points: {}", player.points);

    println!("Boosts:");
    for pb in query.boosts_for_player(&player.id)? {
        let name = query
            .get_boost(&pb.boost_id)?
            .map(|b| b.boost_type.as_str().to_string())
            .unwrap_or_else(|| pb.boost_id.clone());
        println!("  - {}: amount {}", name, pb.amount);
    }

    println!("Levels:");
    for pl in query.levels_for_player(&player.id)? {
        let title = query
            .get_level(&pl.level_id)?
            .map(|l| l.title)
            .unwrap_or_else(|| pl.level_id.clone());
        let state = if pl.is_completed() {
            "completed"
        } else {
            "in progress"
        };
        println!("  - {}: score {}, {}", title, pl.score, state);
    }

    println!("Prizes:");
    for pp in query.prizes_for_player(&player.id)? {
        let title = query
            .get_prize(&pp.prize_id)?
            .map(|p| p.title)
            .unwrap_or_else(|| pp.prize_id.clone());
        println!("  - {} (received_at {})", title, pp.received_at);
    }

    Ok(())
}
