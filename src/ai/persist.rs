//! Predictor weight persistence
//!
//! Weights go to a single binary snapshot file; the network architecture can
//! be overridden by a small JSON sidecar. A missing or corrupt snapshot is
//! never fatal - play starts with a fresh network.

use std::fs;
use std::path::Path;

use rand::Rng;
use thiserror::Error;

use super::net::{NetConfig, Network};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot: {0}")]
    Snapshot(#[from] postcard::Error),
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Write the network to a binary snapshot
pub fn save(net: &Network, path: &Path) -> Result<(), PersistError> {
    let bytes = postcard::to_allocvec(net)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Read a network back from a binary snapshot
pub fn load(path: &Path) -> Result<Network, PersistError> {
    let bytes = fs::read(path)?;
    Ok(postcard::from_bytes(&bytes)?)
}

/// Read construction parameters from a JSON sidecar, or fall back to the
/// default architecture.
pub fn load_config(path: &Path) -> NetConfig {
    let parsed = fs::read_to_string(path)
        .map_err(PersistError::from)
        .and_then(|text| Ok(serde_json::from_str(&text)?));
    match parsed {
        Ok(cfg) => cfg,
        Err(_) => NetConfig::default(),
    }
}

/// Load saved weights, falling back to a fresh network when the snapshot is
/// missing or unreadable.
pub fn load_or_default(path: &Path, cfg: NetConfig, rng: &mut impl Rng) -> Network {
    match load(path) {
        Ok(net) => {
            log::info!("loaded predictor weights from {}", path.display());
            net
        }
        Err(err) => {
            log::warn!(
                "no usable predictor weights at {} ({err}); starting fresh",
                path.display()
            );
            Network::new(cfg, rng)
        }
    }
}
