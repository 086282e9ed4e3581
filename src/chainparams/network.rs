use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::RegistryError;

/// The closed set of networks a node can run on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[serde(rename = "main")]
    Main,
    #[serde(rename = "test")]
    Testnet,
    Regtest,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Main, Network::Testnet, Network::Regtest];

    /// Identifier used on the command line and in logs
    pub const fn as_str(self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Testnet => "test",
            Network::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Network {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownNetwork(s.to_string()))
    }
}
