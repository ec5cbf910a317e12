//! Core engine constants

/// Map dimensions
pub const COLNO: usize = 80;
pub const ROWNO: usize = 21;

/// Sight radius used when refreshing the visibility field
pub const SIGHT_RANGE: i32 = 8;

/// Maximum reach of a single chain-lightning arc
///
/// The target selector starts its running minimum at `ARC_RANGE - 1`
/// because jitter can shift a candidate's distance by one.
pub const ARC_RANGE: i32 = 8;

/// Per-hop chain power decay: `ARC_DECAY_BASE + rn2(ARC_DECAY_RAND)`
pub const ARC_DECAY_BASE: i32 = 8;
pub const ARC_DECAY_RAND: i32 = 13;
