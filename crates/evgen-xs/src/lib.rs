#![deny(missing_docs)]
#![doc = "Interaction models for the evgen interaction core: a shared `InteractionModel` trait, \
spline-backed deep-inelastic scattering, closed-form neutrino-electron elastic scattering, \
table-backed dipole upscattering to a heavy neutral lepton, a closed-form test model, \
per-primary model collections and deterministic parallel batch sampling."]

pub mod batch;
pub mod collection;
pub mod dipole;
pub mod dis;
pub mod dummy;
pub mod elastic;
mod frame;
pub mod model;

pub use batch::sample_final_states;
pub use collection::InteractionCollection;
pub use dipole::{DipoleFromTable, DipoleParameters, HelicityChannel};
pub use dis::{DisChannel, DisFromSpline, DisParameters};
pub use dummy::DummyCrossSection;
pub use elastic::ElasticScattering;
pub use model::{InteractionModel, SignatureCache};
