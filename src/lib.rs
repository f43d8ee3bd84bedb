//! Dungeon digging: grows a connected map of rooms and corridors out of a
//! single entrance, one randomly chosen doorway at a time.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod config;
pub mod corridor;
pub mod dungeon;
pub mod error;
pub mod geometry;
pub mod render;
pub mod rng;
pub mod room;
pub mod stage;

pub use dungeon::{DigStats, Doorway, Dungeon, Worklist};
pub use geometry::{Direction, Vector};
pub use rng::DigRng;
pub use stage::{Stage, Tile};
