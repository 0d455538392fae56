//! # Hi-Lo Game Server
//!
//! Web-served number-guessing game with persistent player profiles and a
//! leaderboard. Players log into named profiles, start rounds at a chosen
//! difficulty, and accumulate score across sessions.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HI-LO SERVER                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Shared primitives                         │
//! │  ├── rng.rs      - Injectable secret-number source           │
//! │  └── time.rs     - Timestamps and one-decimal rounding       │
//! │                                                              │
//! │  game/           - Game logic (no I/O)                       │
//! │  ├── difficulty.rs - Difficulty table                        │
//! │  └── engine.rs   - Active-game state machine and scoring     │
//! │                                                              │
//! │  store/          - Durable profile records                   │
//! │  ├── profile.rs  - Profile, history, totals reconciliation   │
//! │  ├── leaderboard.rs - Derived ranking projection             │
//! │  └── file.rs     - JSON flat-file store                      │
//! │                                                              │
//! │  network/        - HTTP layer (plumbing, not core)           │
//! │  ├── protocol.rs - Request/response schemas                  │
//! │  ├── session.rs  - Client-id to session registry             │
//! │  ├── error.rs    - API errors with HTTP status mapping       │
//! │  ├── handlers.rs - Endpoint orchestration                    │
//! │  └── server.rs   - Config, router, serve loop                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reconciliation Guarantee
//!
//! Stored aggregate counters are never trusted as ground truth. Profile
//! totals (`total_games`, `games_won`) are recomputed from the bounded
//! history log after every mutation, before every persist, and whenever a
//! profile is loaded for display. Sessions and in-progress games live only
//! in process memory and are lost on restart; profiles survive in a single
//! JSON record keyed by username.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod network;
pub mod store;

// Re-export commonly used types
pub use core::rng::{SecretSource, ThreadRngSource};
pub use game::difficulty::Difficulty;
pub use game::engine::{ActiveGame, GuessOutcome};
pub use store::profile::{GameSummary, HistoryEntry, Profile, ProfileMap};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base points for a win before the difficulty multiplier is applied
pub const WINNING_SCORE: u64 = 10;

/// Maximum history entries retained per profile (oldest evicted first)
pub const MAX_HISTORY: usize = 50;
