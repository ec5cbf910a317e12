//! Dungeon system
//!
//! Contains the level structure, terrain cells, clouds, and grid geometry.

mod cell;
mod coord;
mod level;

pub use cell::{Cell, TerrainKind, VetoFlags};
pub use coord::Position;
pub use level::{Cloud, CloudKind, Level, LevelError};
