//! The effect engine
//!
//! Casting is split into layers: selection (area sweeps and chain
//! hops), outcome classification (what a struck thing does), and
//! application (the only code that mutates the world). The cast entry
//! points in [`spells`] drive the layers and log everything they did
//! into a [`CastResult`].

pub mod apply;
pub mod area;
pub mod chain;
pub mod context;
pub mod outcome;
pub mod spells;

pub use apply::{Status, apply_status, hurt_monster, hurt_player};
pub use area::{Candidate, Occupant};
pub use chain::{Agent, ArcStrike, Chain};
pub use context::{CastResult, EffectContext, Termination};
pub use spells::{
    cast_airstrike, cast_chain_lightning, cast_discharge, cast_dispersal, cast_fragmentation,
    cast_ignite_poison, cast_refrigeration, cast_shatter, cast_toxic_radiance,
};
