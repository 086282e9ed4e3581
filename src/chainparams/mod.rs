//! Chain parameters - Network profiles and the registry that selects one

mod mainnet;
mod network;
mod profile;
mod registry;
mod regtest;
mod testnet;

pub use network::*;
pub use profile::*;
pub use registry::*;
