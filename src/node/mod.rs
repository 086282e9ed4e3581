//! Node bootstrap - Genesis block construction and verification

mod genesis;

pub use genesis::*;
