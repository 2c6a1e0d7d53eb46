use std::time::Duration;

use monopoly_rs::dice::Dice;
use monopoly_rs::providers::{HeuristicProvider, ProviderTable, TimedProvider};
use monopoly_rs::state::GameState;
use monopoly_rs::turn::TurnController;

const MAX_TURNS: u32 = 500;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let num_players: usize = args.next().and_then(|a| a.parse().ok()).unwrap_or(4);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(42);
    if !(2..=6).contains(&num_players) {
        eprintln!("usage: monopoly-rs [players 2-6] [seed]");
        std::process::exit(2);
    }

    println!("monopoly-rs {}: {num_players} players, seed {seed}", monopoly_rs::VERSION);

    let mut state = GameState::new(num_players, seed);
    let mut providers = ProviderTable::for_seats(num_players);
    for seat in 0..num_players {
        let inner = HeuristicProvider::seeded(seed.wrapping_add(seat as u64));
        providers.set(
            seat,
            Some(Box::new(TimedProvider::spawn(inner, Duration::from_secs(5)))),
        );
    }
    let mut controller = TurnController::new(Dice::seeded(seed), providers);

    let mut printed: u64 = 0;
    for _ in 0..MAX_TURNS {
        if state.winner().is_some() {
            break;
        }
        controller.play_turn(&mut state);
        // The log is capped, so drain new entries off the tail each turn.
        let total = state.event_log().total_appended();
        let fresh = (total - printed) as usize;
        for entry in state.event_log().recent(fresh) {
            println!("{entry}");
        }
        printed = total;
    }

    match state.winner() {
        Some(idx) => println!("Winner: {}", state.player(idx).name()),
        None => println!("No winner after {MAX_TURNS} turns"),
    }
}
