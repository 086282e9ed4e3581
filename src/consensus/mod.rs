//! Consensus module - Block encoding, difficulty limits, deployments, checkpoints and parameters

mod block;
mod checkpoints;
mod deployment;
mod params;
mod pow;
mod script;
mod transaction;

pub use block::*;
pub use checkpoints::*;
pub use deployment::*;
pub use params::*;
pub use pow::*;
pub use script::*;
pub use transaction::*;
