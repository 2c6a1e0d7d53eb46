//! monopoly-rs: a rules engine for a property-trading board game
//!
//! Goals:
//! - A single consistent, auditable game state driven by one turn
//!   state machine; no concurrent writers
//! - Decisions (buy/auction/build/jail/bid) come from pluggable
//!   providers that may be slow or fail; every suspension point is
//!   bounded by a deadline and degrades to a deterministic fallback
//! - Deterministic tests: seedable dice and deck shuffles
//! - No panics for invalid input; `Result` for recoverable errors
//!
//! ## Quick start: play a seeded game with local heuristics
//! ```
//! use monopoly_rs::dice::Dice;
//! use monopoly_rs::providers::{HeuristicProvider, ProviderTable};
//! use monopoly_rs::state::GameState;
//! use monopoly_rs::turn::TurnController;
//!
//! let mut state = GameState::new(4, 42);
//! let mut providers = ProviderTable::for_seats(4);
//! for seat in 0..4 {
//!     providers.set(seat, Some(Box::new(HeuristicProvider::seeded(seat as u64))));
//! }
//! let mut controller = TurnController::new(Dice::seeded(42), providers);
//! controller.play_to_completion(&mut state, 50);
//! for entry in state.event_log().recent(5) {
//!     println!("{entry}");
//! }
//! ```
//!
//! ## Headless simulation
//! ```sh
//! cargo run --bin monopoly-rs -- 4 42
//! ```

pub mod auction;
pub mod board;
pub mod cards;
pub mod decision;
pub mod dice;
pub mod ledger;
pub mod log;
pub mod providers;
pub mod remote;
pub mod state;
pub mod turn;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
