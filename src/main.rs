//! Chain Burst headless demo
//!
//! Plays a seeded session of random placements against the boss and logs the
//! event stream. Usage: `chain-burst [seed] [turns]`, with RUST_LOG=info for
//! the turn-by-turn transcript.

use std::env;
use std::process;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use chain_burst::{BoardConfig, BoardState, CellCoord, GameEvent, TileType};

fn main() {
    env_logger::init();

    let mut args = env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    let turns: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(100);

    let mut state = match BoardState::new(BoardConfig::default(), seed) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("bad config: {err}");
            process::exit(1);
        }
    };
    state.drain_events();

    // The "player": a separate RNG stream so its choices never perturb the
    // sim's own spawn rolls.
    let mut player = Pcg32::seed_from_u64(seed ^ 0x9E37_79B9);
    let type_count = state.config().type_count;

    let mut wins = 0u32;
    let mut resets = 0u32;
    let mut best_chain = 0u32;

    for turn in 0..turns {
        let Some(cell) = random_empty(&state, &mut player) else {
            break;
        };
        let tile_type = TileType(player.random_range(0..type_count));
        match state.request_placement(tile_type, cell) {
            Ok(outcome) => {
                best_chain = best_chain.max(outcome.clusters);
                log::info!(
                    "turn {turn}: type {} at ({}, {}) -> {} clusters, {} damage",
                    tile_type.0,
                    cell.x,
                    cell.y,
                    outcome.clusters,
                    outcome.damage
                );
            }
            Err(err) => {
                log::warn!("turn {turn}: placement rejected: {err}");
                continue;
            }
        }
        for event in state.drain_events() {
            match event {
                GameEvent::Win => wins += 1,
                GameEvent::BoardReset { reason } => {
                    resets += 1;
                    log::info!("turn {turn}: board reset ({reason:?})");
                }
                _ => {}
            }
        }
    }

    println!(
        "seed {seed}: {turns} turns, best chain {best_chain}, {wins} wins, \
         {resets} resets, score {}, boss at {}/{}",
        state.score(),
        state.boss().current(),
        state.boss().max()
    );
}

fn random_empty(state: &BoardState, rng: &mut Pcg32) -> Option<CellCoord> {
    let empties: Vec<CellCoord> = state.grid().empty_cells().collect();
    if empties.is_empty() {
        return None;
    }
    Some(empties[rng.random_range(0..empties.len())])
}
