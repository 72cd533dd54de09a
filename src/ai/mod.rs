//! Predictor network and the automated paddle controller
//!
//! The network is a plain feed-forward approximator consumed through
//! forward-evaluate and train-step; controllers share one instance behind a
//! mutex and hold the lock across an evaluate + train pair so each decision
//! trains against the observation it was made from.

pub mod controller;
pub mod net;
pub mod persist;

use std::sync::{Arc, Mutex};

pub use controller::{Command, Controller, decide, observe, training_target};
pub use net::{NetConfig, Network};
pub use persist::{load_config, load_or_default, save};

/// The explicitly passed, lock-guarded predictor handle
pub type SharedNetwork = Arc<Mutex<Network>>;

/// Wrap a network for sharing between controllers
pub fn share(net: Network) -> SharedNetwork {
    Arc::new(Mutex::new(net))
}
