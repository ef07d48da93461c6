//! Interaction signatures and the mutable per-event record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::particle::ParticleType;

/// Four-momentum stored as `[E, px, py, pz]` in GeV.
pub type Momentum4 = [f64; 4];

/// Identity of an interaction channel: primary, target and ordered secondaries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InteractionSignature {
    /// Incoming particle.
    pub primary_type: ParticleType,
    /// Particle struck by the primary.
    pub target_type: ParticleType,
    /// Outgoing particles, in the order models fill the record.
    pub secondary_types: Vec<ParticleType>,
}

impl InteractionSignature {
    /// Creates a signature from its parts.
    pub fn new(
        primary_type: ParticleType,
        target_type: ParticleType,
        secondary_types: Vec<ParticleType>,
    ) -> Self {
        Self {
            primary_type,
            target_type,
            secondary_types,
        }
    }
}

impl fmt::Display for InteractionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} ->", self.primary_type, self.target_type)?;
        for (idx, secondary) in self.secondary_types.iter().enumerate() {
            if idx > 0 {
                write!(f, " +")?;
            }
            write!(f, " {secondary}")?;
        }
        Ok(())
    }
}

/// Event data passed between orchestration and models.
///
/// Orchestration fills the primary, target and vertex fields; a model's
/// sampler fills the secondary fields and `interaction_parameters`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Channel of this event.
    pub signature: InteractionSignature,
    /// Primary mass in GeV.
    pub primary_mass: f64,
    /// Primary four-momentum.
    pub primary_momentum: Momentum4,
    /// Primary helicity.
    pub primary_helicity: f64,
    /// Target mass in GeV.
    pub target_mass: f64,
    /// Target four-momentum.
    pub target_momentum: Momentum4,
    /// Target helicity.
    pub target_helicity: f64,
    /// Interaction vertex in detector coordinates.
    pub interaction_vertex: [f64; 3],
    /// Secondary masses, ordered like the signature's secondaries.
    pub secondary_masses: Vec<f64>,
    /// Secondary four-momenta, ordered like the signature's secondaries.
    pub secondary_momenta: Vec<Momentum4>,
    /// Secondary helicities, ordered like the signature's secondaries.
    pub secondary_helicities: Vec<f64>,
    /// Model-specific sampled parameters (see `density_variables`).
    pub interaction_parameters: Vec<f64>,
}

impl InteractionRecord {
    /// Creates an empty record for `signature` with the target at rest.
    ///
    /// Secondary vectors are sized to the signature and zero filled.
    pub fn new(signature: InteractionSignature) -> Self {
        let n = signature.secondary_types.len();
        Self {
            signature,
            primary_mass: 0.0,
            primary_momentum: [0.0; 4],
            primary_helicity: 0.0,
            target_mass: 0.0,
            target_momentum: [0.0; 4],
            target_helicity: 0.0,
            interaction_vertex: [0.0; 3],
            secondary_masses: vec![0.0; n],
            secondary_momenta: vec![[0.0; 4]; n],
            secondary_helicities: vec![0.0; n],
            interaction_parameters: Vec::new(),
        }
    }

    /// Sets the primary as a particle of `mass` moving along `direction`
    /// with total energy `energy`. The direction need not be normalised.
    pub fn with_primary(mut self, mass: f64, energy: f64, direction: [f64; 3]) -> Self {
        let norm = direction.iter().map(|c| c * c).sum::<f64>().sqrt();
        let p = (energy * energy - mass * mass).max(0.0).sqrt();
        let scale = if norm > 0.0 { p / norm } else { 0.0 };
        self.primary_mass = mass;
        self.primary_momentum = [
            energy,
            direction[0] * scale,
            direction[1] * scale,
            direction[2] * scale,
        ];
        self
    }

    /// Sets the target as a particle of `mass` at rest.
    pub fn with_target_at_rest(mut self, mass: f64) -> Self {
        self.target_mass = mass;
        self.target_momentum = [mass, 0.0, 0.0, 0.0];
        self
    }

    /// Primary energy in the frame the record is expressed in.
    pub fn primary_energy(&self) -> f64 {
        self.primary_momentum[0]
    }

    /// Whether the target three-momentum is exactly zero.
    pub fn target_at_rest(&self) -> bool {
        self.target_momentum[1..].iter().all(|&c| c == 0.0)
    }

    /// Component-wise sum of the secondary four-momenta.
    pub fn total_secondary_momentum(&self) -> Momentum4 {
        self.secondary_momenta
            .iter()
            .fold([0.0; 4], |mut acc, p| {
                for (a, c) in acc.iter_mut().zip(p) {
                    *a += c;
                }
                acc
            })
    }

    /// Component-wise sum of primary and target four-momenta.
    pub fn total_initial_momentum(&self) -> Momentum4 {
        let mut total = self.primary_momentum;
        for (t, c) in total.iter_mut().zip(&self.target_momentum) {
            *t += c;
        }
        total
    }
}

/// Default helicity for a primary: left handed for particles, right handed
/// for antiparticles.
pub fn assign_neutrino_helicity(primary: ParticleType) -> f64 {
    if primary.code() > 0 {
        -0.5
    } else {
        0.5
    }
}
