//! P2P module - Bootstrap peer discovery data

mod seeds;

pub use seeds::*;
