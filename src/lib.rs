//! Onex Network Parameter Registry
//!
//! The immutable consensus constants every node component agrees on for a
//! given network: genesis block, checkpoints, soft-fork deployments,
//! address prefixes and wire magic.
//!
//! Select a network once at startup, then read it from anywhere:
//!
//! ```
//! use onex_params::{profile_by_name, profile_for, Network};
//!
//! let testnet = profile_by_name("test").unwrap();
//! assert_eq!(testnet.default_port, 28291);
//! assert_eq!(testnet.genesis_hash(), profile_for(Network::Main).genesis_hash());
//! ```

pub mod chainparams;
pub mod consensus;
pub mod crypto;
pub mod node;
pub mod p2p;

pub use chainparams::{
    active_profile, profile_by_name, profile_for, select_network, try_active_profile, Network,
    NetworkProfile, Registry, RegistryError,
};

/// Protocol constants - HARD-CODED, NEVER CONFIGURABLE
pub mod constants {
    /// Amount in base units
    pub type Amount = i64;

    /// Base units per coin
    pub const COIN: Amount = 100_000_000;

    /// Number of decimal places
    pub const DECIMAL_PLACES: u8 = 8;

    /// Chain name
    pub const CHAIN_NAME: &str = "Onex";
}
