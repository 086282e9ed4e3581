//! Parameter registry
//!
//! All three profiles live in statics built on first touch. A [`Registry`]
//! holds a reference to exactly one of them, written once per process.
//! The free functions operate on a process-wide registry; components that
//! prefer an injected context can own a `Registry` of their own.

use once_cell::sync::{Lazy, OnceCell};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::{mainnet, regtest, testnet, IntegrityError, Network, NetworkProfile};

/// Network selection errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Unknown network {0:?}, expected one of main, test, regtest")]
    UnknownNetwork(String),
    #[error("Network already selected: {active} is active, {requested} was requested")]
    AlreadySelected { active: Network, requested: Network },
}

static MAIN: Lazy<NetworkProfile> = Lazy::new(|| build_or_abort(Network::Main, mainnet::build));
static TESTNET: Lazy<NetworkProfile> =
    Lazy::new(|| build_or_abort(Network::Testnet, testnet::build));
static REGTEST: Lazy<NetworkProfile> =
    Lazy::new(|| build_or_abort(Network::Regtest, regtest::build));

static GLOBAL: Registry = Registry::new();

/// Run a profile builder; corrupt constants abort the process
fn build_or_abort(
    network: Network,
    build: fn() -> Result<NetworkProfile, IntegrityError>,
) -> NetworkProfile {
    let built = build().and_then(|profile| {
        profile.verify()?;
        Ok(profile)
    });

    match built {
        Ok(profile) => {
            debug!(
                network = %network,
                genesis = %profile.genesis_hash(),
                checkpoints = profile.checkpoint_data.checkpoints.len(),
                "Built network profile"
            );
            profile
        }
        Err(e) => {
            error!(network = %network, error = %e, "Network profile failed integrity check");
            panic!("{network} parameters failed integrity check: {e}");
        }
    }
}

/// Profile for `network`, without touching any selection
pub fn profile_for(network: Network) -> &'static NetworkProfile {
    match network {
        Network::Main => Lazy::force(&MAIN),
        Network::Testnet => Lazy::force(&TESTNET),
        Network::Regtest => Lazy::force(&REGTEST),
    }
}

/// Profile for a textual identifier, without touching any selection
pub fn profile_by_name(identifier: &str) -> Result<&'static NetworkProfile, RegistryError> {
    Ok(profile_for(identifier.parse()?))
}

/// Build and verify every profile
pub fn all_profiles() -> [&'static NetworkProfile; 3] {
    Network::ALL.map(profile_for)
}

/// Holds the active network, assigned at most once
#[derive(Debug, Default)]
pub struct Registry {
    active: OnceCell<&'static NetworkProfile>,
}

impl Registry {
    pub const fn new() -> Self {
        Self {
            active: OnceCell::new(),
        }
    }

    /// Resolve `identifier` and make it the active network.
    ///
    /// An unknown identifier leaves the registry untouched.
    pub fn select(&self, identifier: &str) -> Result<&'static NetworkProfile, RegistryError> {
        let network = identifier.parse::<Network>().map_err(|e| {
            warn!(requested = identifier, "Rejected unknown network");
            e
        })?;
        self.select_network(network)
    }

    /// Make `network` the active network. Fails if any network is already active.
    pub fn select_network(&self, network: Network) -> Result<&'static NetworkProfile, RegistryError> {
        // Integrity failures abort here, whichever network was asked for.
        all_profiles();

        let requested = profile_for(network);
        let mut selected = false;
        let active = self.active.get_or_init(|| {
            selected = true;
            requested
        });

        if selected {
            info!(
                network = %network,
                port = requested.default_port,
                genesis = %requested.genesis_hash(),
                "Selected network"
            );
            Ok(requested)
        } else {
            warn!(active = %active.network, requested = %network, "Rejected network re-selection");
            Err(RegistryError::AlreadySelected {
                active: active.network,
                requested: network,
            })
        }
    }

    /// The active profile.
    ///
    /// # Panics
    /// If no network has been selected yet.
    pub fn active(&self) -> &'static NetworkProfile {
        match self.try_active() {
            Some(profile) => profile,
            None => panic!("network parameters read before a network was selected"),
        }
    }

    pub fn try_active(&self) -> Option<&'static NetworkProfile> {
        self.active.get().copied()
    }

    pub fn is_selected(&self) -> bool {
        self.active.get().is_some()
    }
}

/// Select the process-wide network
pub fn select_network(identifier: &str) -> Result<&'static NetworkProfile, RegistryError> {
    GLOBAL.select(identifier)
}

/// The process-wide active profile.
///
/// # Panics
/// If [`select_network`] has not succeeded yet.
pub fn active_profile() -> &'static NetworkProfile {
    GLOBAL.active()
}

pub fn try_active_profile() -> Option<&'static NetworkProfile> {
    GLOBAL.try_active()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Hash;
    use crate::node::{GenesisError, GENESIS_HASH};

    #[test]
    fn test_profile_lookup_is_stable() {
        let a = profile_for(Network::Main);
        let b = profile_for(Network::Main);
        assert!(std::ptr::eq(a, b));
        assert_eq!(profile_by_name("regtest").unwrap().network, Network::Regtest);
    }

    #[test]
    fn test_select_sets_active() {
        let registry = Registry::new();
        assert!(!registry.is_selected());
        assert!(registry.try_active().is_none());

        let profile = registry.select("test").unwrap();
        assert_eq!(profile.network, Network::Testnet);
        assert!(std::ptr::eq(registry.active(), profile));
    }

    #[test]
    fn test_unknown_network_leaves_selection_alone() {
        let registry = Registry::new();
        assert_eq!(
            registry.select("bogus"),
            Err(RegistryError::UnknownNetwork("bogus".to_string()))
        );
        assert!(!registry.is_selected());

        registry.select("regtest").unwrap();
        assert!(registry.select("bogus").is_err());
        assert_eq!(registry.active().network, Network::Regtest);
    }

    #[test]
    fn test_reselection_fails() {
        let registry = Registry::new();
        registry.select_network(Network::Main).unwrap();
        assert_eq!(
            registry.select_network(Network::Testnet),
            Err(RegistryError::AlreadySelected {
                active: Network::Main,
                requested: Network::Testnet,
            })
        );
        assert!(registry.select("main").is_err());
        assert_eq!(registry.active().network, Network::Main);
    }

    fn tampered_main() -> Result<NetworkProfile, IntegrityError> {
        let mut profile = mainnet::build()?;
        profile.genesis.header.nonce += 1;
        Ok(profile)
    }

    #[test]
    #[should_panic(expected = "main parameters failed integrity check")]
    fn test_tampered_profile_aborts() {
        build_or_abort(Network::Main, tampered_main);
    }

    #[test]
    #[should_panic(expected = "failed integrity check: Genesis hash mismatch")]
    fn test_failed_builder_aborts() {
        build_or_abort(Network::Testnet, || {
            Err(IntegrityError::Genesis(GenesisError::HashMismatch {
                expected: GENESIS_HASH,
                computed: Hash::zero(),
            }))
        });
    }

    #[test]
    fn test_untampered_builder_passes() {
        let profile = build_or_abort(Network::Regtest, regtest::build);
        assert_eq!(profile.network, Network::Regtest);
    }

    #[test]
    #[should_panic(expected = "before a network was selected")]
    fn test_active_before_selection_panics() {
        Registry::new().active();
    }
}
