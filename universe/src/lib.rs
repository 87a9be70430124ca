//! # Universe
//!
//! The world model crate - sectors and the warps between them, the ports,
//! ships, traders and corporations that live in them, the session-wide game
//! statistics, and breadth-first course plotting over the warp graph.
//! This crate holds state only; it knows nothing about the text stream that
//! feeds it.

pub mod entities;
pub mod error;
pub mod game_stats;
pub mod mechanics;
pub mod notify;
pub mod pathfinder;
pub mod world_state;

pub use entities::*;
pub use error::*;
pub use game_stats::*;
pub use mechanics::*;
pub use notify::*;
pub use pathfinder::*;
pub use world_state::*;
