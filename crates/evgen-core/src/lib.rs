#![deny(missing_docs)]
#![doc = "Core data types for the evgen interaction core: particle keys, interaction \
signatures and records, structured errors, numerics configuration and the deterministic \
RNG handle threaded through every sampling call."]

pub mod config;
pub mod constants;
pub mod errors;
pub mod particle;
pub mod record;
pub mod rng;

pub use config::NumericsConfig;
pub use errors::{ErrorInfo, EvgenError};
pub use particle::ParticleType;
pub use record::{assign_neutrino_helicity, InteractionRecord, InteractionSignature, Momentum4};
pub use rng::{derive_substream_seed, RngHandle};
