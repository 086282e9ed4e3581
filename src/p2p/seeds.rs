//! Seed Node Configuration
//!
//! Bootstrap data for initial peer discovery: DNS seeds queried first, and
//! a compiled-in list of fixed addresses used when DNS returns nothing.

use serde::Serialize;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};

/// A DNS seed operator and the host to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DnsSeed {
    pub name: &'static str,
    pub host: &'static str,
}

impl DnsSeed {
    pub const fn new(name: &'static str, host: &'static str) -> Self {
        Self { name, host }
    }
}

/// Fixed seed as an IPv6 (or IPv4-mapped) address and port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSpec6 {
    pub addr: [u8; 16],
    pub port: u16,
}

impl SeedSpec6 {
    /// IPv4-mapped entries come back as plain IPv4
    pub fn socket_addr(&self) -> SocketAddr {
        let v6 = Ipv6Addr::from(self.addr);
        let ip = match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        };
        SocketAddr::new(ip, self.port)
    }
}

impl From<SocketAddr> for SeedSpec6 {
    fn from(addr: SocketAddr) -> Self {
        let v6 = match addr.ip() {
            IpAddr::V4(v4) => v4.to_ipv6_mapped(),
            IpAddr::V6(v6) => v6,
        };
        Self {
            addr: v6.octets(),
            port: addr.port(),
        }
    }
}

pub const MAINNET_DNS_SEEDS: &[DnsSeed] = &[
    DnsSeed::new("onex.cash", "seed1.onex.cash"),
    DnsSeed::new("onex.cash", "seed2.onex.cash"),
    DnsSeed::new("onex.cash", "seed3.onex.cash"),
    DnsSeed::new("onex.cash", "seed4.onex.cash"),
];

pub const TESTNET_DNS_SEEDS: &[DnsSeed] = &[DnsSeed::new("onex.cash", "testnet.onex.cash")];

/// Fixed seeds are generated into a separate table by the seeder tooling;
/// no generated mainnet or testnet table has been published, so both are empty.
pub const MAINNET_FIXED_SEEDS: &[SeedSpec6] = &[];

pub const TESTNET_FIXED_SEEDS: &[SeedSpec6] = &[];

/// Resolve fixed seeds to socket addresses
pub fn fixed_seed_addresses(seeds: &[SeedSpec6]) -> Vec<SocketAddr> {
    seeds.iter().map(SeedSpec6::socket_addr).collect()
}

/// DNS seed hosts with the network's port appended, ready for a resolver
pub fn dns_seed_targets(seeds: &[DnsSeed], default_port: u16) -> Vec<String> {
    seeds
        .iter()
        .map(|seed| format!("{}:{}", seed.host, default_port))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_dns_seeds() {
        assert_eq!(MAINNET_DNS_SEEDS.len(), 4);
        assert!(MAINNET_DNS_SEEDS.iter().all(|s| s.name == "onex.cash"));
        assert_eq!(TESTNET_DNS_SEEDS[0].host, "testnet.onex.cash");
    }

    #[test]
    fn test_seed_spec_ipv4_round_trip() {
        let addr: SocketAddr = "203.0.113.7:18291".parse().unwrap();
        let spec = SeedSpec6::from(addr);
        assert_eq!(&spec.addr[..12], &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff]);
        assert_eq!(spec.socket_addr(), addr);
    }

    #[test]
    fn test_seed_spec_ipv6() {
        let addr: SocketAddr = "[2001:db8::1]:28291".parse().unwrap();
        let spec = SeedSpec6::from(addr);
        assert_eq!(spec.socket_addr(), addr);
        assert_eq!(fixed_seed_addresses(&[spec]), vec![addr]);
    }

    #[test]
    fn test_no_published_fixed_seeds() {
        assert!(MAINNET_FIXED_SEEDS.is_empty());
        assert!(fixed_seed_addresses(TESTNET_FIXED_SEEDS).is_empty());
    }

    #[test]
    fn test_dns_seed_targets() {
        let targets = dns_seed_targets(TESTNET_DNS_SEEDS, 28291);
        assert_eq!(targets, vec!["testnet.onex.cash:28291".to_string()]);
    }
}
