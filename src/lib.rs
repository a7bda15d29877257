//! Turn-based fish rescue: find the missing fish and bring them home.
//!
//! The library holds the simulation only. `main.rs` and `display.rs` are the
//! terminal front-end that drives it.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod world;

pub use compute::Game;
pub use config::GameConfig;
pub use error::GameError;
