//! Closed-form test model with a cross section linear in energy.

use std::f64::consts::PI;

use evgen_core::constants::AVOGADRO;
use evgen_core::{EvgenError, InteractionRecord, InteractionSignature, NumericsConfig, ParticleType, RngHandle};
use tracing::debug;

use crate::frame::{rest_frame_energy, scatter_inelastic, RestFrame};
use crate::model::{budget_exhausted, expect_secondaries, InteractionModel, SignatureCache};

/// Interaction length, in cm of unit-density matter, at the reference energy.
const REFERENCE_LENGTH_CM: f64 = 1e6 * 100.0;
/// Energy in GeV at which the reference length applies.
const REFERENCE_ENERGY: f64 = 1e5;

/// Every light neutrino on a generic nucleon, `nu N -> nu N`.
///
/// The total cross section grows linearly with energy and gives a 1000 km
/// interaction length in 1 g/cm^3 matter at 100 TeV. The differential equals
/// the total, so every sampled final state is equally likely.
#[derive(Debug, Clone)]
pub struct DummyCrossSection {
    signatures: SignatureCache,
    numerics: NumericsConfig,
}

impl Default for DummyCrossSection {
    fn default() -> Self {
        let target = ParticleType::NUCLEON;
        let signatures = SignatureCache::new(
            ParticleType::NEUTRINOS
                .iter()
                .map(|&primary| InteractionSignature::new(primary, target, vec![primary, target]))
                .collect(),
        );
        debug!(signatures = signatures.signatures().len(), "built dummy model");
        Self {
            signatures,
            numerics: NumericsConfig::default(),
        }
    }
}

impl DummyCrossSection {
    /// Creates the model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the numerics configuration.
    pub fn with_numerics(mut self, numerics: NumericsConfig) -> Self {
        self.numerics = numerics;
        self
    }
}

impl InteractionModel for DummyCrossSection {
    fn name(&self) -> &'static str {
        "dummy"
    }

    fn signature_cache(&self) -> &SignatureCache {
        &self.signatures
    }

    fn total_cross_section(&self, record: &InteractionRecord) -> f64 {
        self.total_cross_section_for(
            record.signature.primary_type,
            rest_frame_energy(record),
            record.signature.target_type,
        )
    }

    fn total_cross_section_for(
        &self,
        _primary: ParticleType,
        energy: f64,
        _target: ParticleType,
    ) -> f64 {
        let cm2_per_particle = 1.0 / (REFERENCE_LENGTH_CM * AVOGADRO);
        cm2_per_particle * energy / REFERENCE_ENERGY
    }

    fn differential_cross_section(&self, record: &InteractionRecord) -> f64 {
        self.total_cross_section(record)
    }

    fn interaction_threshold(&self, _record: &InteractionRecord) -> f64 {
        0.0
    }

    fn sample_final_state(
        &self,
        record: &mut InteractionRecord,
        rng: &mut RngHandle,
    ) -> Result<(), EvgenError> {
        expect_secondaries(self.name(), record, 2)?;
        let frame = RestFrame::of(record);
        let trials = self.numerics.max_sampling_trials;
        for _ in 0..trials {
            let x = rng.uniform();
            let y = rng.uniform();
            let phi = rng.uniform_range(0.0, 2.0 * PI);
            let Some(pair) = scatter_inelastic(&frame, record.primary_mass, 0.0, x, y, phi) else {
                continue;
            };
            record.secondary_momenta = vec![pair.lepton.to_array(), pair.hadrons.to_array()];
            record.secondary_masses = vec![0.0, pair.hadrons.mass()];
            record.secondary_helicities = vec![record.primary_helicity, record.target_helicity];
            record.interaction_parameters = vec![frame.primary_energy(), x, y];
            return Ok(());
        }
        Err(budget_exhausted(self.name(), record, trials))
    }

    fn density_variables(&self) -> Vec<String> {
        vec!["Bjorken x".to_string(), "Bjorken y".to_string()]
    }
}
