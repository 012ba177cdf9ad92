//! Frame-driven simulation core of a 2D arcade shooter.
//!
//! `compute` holds the per-tick update, `driver` sequences it against the
//! collaborator traits in `ports`. Everything is single-threaded and all
//! randomness is injected, so a seeded RNG replays a game exactly.

pub mod compute;
pub mod config;
pub mod driver;
pub mod entities;
pub mod error;
pub mod input;
pub mod persistence;
pub mod ports;
pub mod store;
