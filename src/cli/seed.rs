//! Seed command implementation

use anyhow::Result;
use tracing::info;

use questline::ledger::{BoostType, LedgerManager};

/// Populate the ledger with demo data: the boost catalog, `levels` levels
/// with one prize attached to each, and `players` players with a login,
/// three boost grants and an alternating half of the levels completed.
pub fn seed_command(ledger: &LedgerManager, players: usize, levels: usize) -> Result<()> {
    let catalog = ledger.catalog();
    let progression = ledger.progression();

    // Boost catalog, one entry per kind
    let mut boosts = Vec::new();
    for boost_type in BoostType::ALL {
        boosts.push(catalog.create_boost(boost_type)?);
    }

    // Levels with one prize attached to each
    let mut level_rows = Vec::new();
    for i in 0..levels {
        let level = catalog.create_level(&format!("Level {}", i + 1), (i + 1) as i64)?;
        let prize = catalog.create_prize(&format!("Prize {}", i + 1))?;
        catalog.attach_prize(&level.id, &prize.id)?;
        level_rows.push(level);
    }
    info!(levels, "catalog seeded");

    let boost_amounts: [i64; 3] = [2, 1, 3];
    let mut sample_player_id = None;
    for p in 0..players {
        let player = catalog.create_player()?;
        if sample_player_id.is_none() {
            sample_player_id = Some(player.id.clone());
        }

        progression.login(&player.id)?;

        for (boost, amount) in boosts.iter().zip(boost_amounts) {
            progression.add_boost(&player.id, &boost.id, amount)?;
        }

        // Alternate which levels each player has completed
        for (l, level) in level_rows.iter().enumerate() {
            if (p + l) % 2 == 0 {
                progression.complete_level(&player.id, &level.id, 100)?;
            } else {
                progression.record_level_result(&player.id, &level.id, None, 0)?;
            }
        }
    }
    info!(players, "players seeded");

    println!(
        "Seeded {} players, {} levels, {} boosts.",
        players,
        levels,
        boosts.len()
    );
    if let Some(id) = sample_player_id {
        println!("Try: questline show {id}");
    }
    Ok(())
}
