//! Deploys the NFT marketplace contract and the NFT contract bound to it.

pub mod artifact;
pub mod checkpoint;
pub mod cli;
pub mod deployer;
pub mod env;
pub mod error;
pub mod factory;
