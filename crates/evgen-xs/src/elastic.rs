//! Neutrino-electron elastic scattering in closed form
//! (arXiv:1906.00111, appendix A).

use std::f64::consts::PI;

use evgen_core::constants::{ELECTRON_MASS, FERMI_CONSTANT, INV_GEV_SQ_TO_CM_SQ, WEAK_MIXING_CLR};
use evgen_core::{
    ErrorInfo, EvgenError, InteractionRecord, InteractionSignature, NumericsConfig, ParticleType,
    RngHandle,
};
use tracing::debug;

use crate::frame::{inelasticity, rest_frame_energy, scatter_two_body, RestFrame};
use crate::model::{budget_exhausted, expect_secondaries, InteractionModel, SignatureCache};

const ELECTRON_INDEX: usize = 0;
const NEUTRINO_INDEX: usize = 1;

/// `nu_e e- -> nu_e e-` and `nu_mu e- -> nu_mu e-`.
#[derive(Debug, Clone)]
pub struct ElasticScattering {
    signatures: SignatureCache,
    numerics: NumericsConfig,
}

impl Default for ElasticScattering {
    fn default() -> Self {
        Self::from_primaries(&[ParticleType::NU_E, ParticleType::NU_MU])
    }
}

impl ElasticScattering {
    /// Model for both supported flavours.
    pub fn new() -> Self {
        Self::default()
    }

    /// Model restricted to a subset of `NU_E` and `NU_MU`.
    pub fn with_primaries(primaries: &[ParticleType]) -> Result<Self, EvgenError> {
        if let Some(&bad) = primaries
            .iter()
            .find(|&&p| p != ParticleType::NU_E && p != ParticleType::NU_MU)
        {
            return Err(EvgenError::Model(
                ErrorInfo::new("elastic-primary", "elastic scattering supports nu_e and nu_mu")
                    .with_context("primary", bad),
            ));
        }
        if primaries.is_empty() {
            return Err(EvgenError::model("elastic-primary", "no primaries given"));
        }
        Ok(Self::from_primaries(primaries))
    }

    fn from_primaries(primaries: &[ParticleType]) -> Self {
        let signatures = SignatureCache::new(
            primaries
                .iter()
                .map(|&primary| {
                    InteractionSignature::new(
                        primary,
                        ParticleType::E_MINUS,
                        vec![ParticleType::E_MINUS, primary],
                    )
                })
                .collect(),
        );
        debug!(signatures = signatures.signatures().len(), "built elastic model");
        Self {
            signatures,
            numerics: NumericsConfig::default(),
        }
    }

    /// Replaces the numerics configuration.
    pub fn with_numerics(mut self, numerics: NumericsConfig) -> Self {
        self.numerics = numerics;
        self
    }

    /// Largest kinematically allowed inelasticity.
    pub fn maximum_y(energy: f64) -> f64 {
        2.0 * energy / (2.0 * energy + ELECTRON_MASS)
    }

    fn flavour_term(primary: ParticleType) -> Option<f64> {
        match primary {
            ParticleType::NU_E => Some((0.5 + WEAK_MIXING_CLR).powi(2)),
            ParticleType::NU_MU => Some((-0.5 + WEAK_MIXING_CLR).powi(2)),
            _ => None,
        }
    }

    fn prefactor(energy: f64) -> f64 {
        let s = 2.0 * ELECTRON_MASS * energy;
        FERMI_CONSTANT * FERMI_CONSTANT * s / (2.0 * PI) * INV_GEV_SQ_TO_CM_SQ
    }

    /// `dsigma/dy` in cm^2; zero outside `[0, y_max]` or for primaries the
    /// model was not built for.
    pub fn differential_at(&self, primary: ParticleType, energy: f64, y: f64) -> f64 {
        if !self.signatures.has_primary(primary) {
            return 0.0;
        }
        let Some(t1) = Self::flavour_term(primary) else {
            return 0.0;
        };
        if energy.is_nan() || energy <= 0.0 || y < 0.0 || y > Self::maximum_y(energy) {
            return 0.0;
        }
        let c2 = WEAK_MIXING_CLR * WEAK_MIXING_CLR;
        Self::prefactor(energy) * (t1 + c2 * (1.0 - y).powi(2))
    }
}

impl InteractionModel for ElasticScattering {
    fn name(&self) -> &'static str {
        "elastic-scattering"
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
        primary: ParticleType,
        energy: f64,
        target: ParticleType,
    ) -> f64 {
        if target != ParticleType::E_MINUS || !self.signatures.has_primary(primary) {
            return 0.0;
        }
        let Some(t1) = Self::flavour_term(primary) else {
            return 0.0;
        };
        if energy.is_nan() || energy <= 0.0 {
            return 0.0;
        }
        let y_max = Self::maximum_y(energy);
        let c2 = WEAK_MIXING_CLR * WEAK_MIXING_CLR;
        Self::prefactor(energy) * (t1 * y_max + c2 * (1.0 - (1.0 - y_max).powi(3)) / 3.0)
    }

    fn differential_cross_section(&self, record: &InteractionRecord) -> f64 {
        if record.signature.target_type != ParticleType::E_MINUS {
            return 0.0;
        }
        match inelasticity(record, ELECTRON_INDEX) {
            Some(y) => self.differential_at(record.signature.primary_type, rest_frame_energy(record), y),
            None => 0.0,
        }
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
        let primary = record.signature.primary_type;
        let energy = frame.primary_energy();
        let y_max = Self::maximum_y(energy);
        // dsigma/dy decreases with y, so the bound sits at y = 0
        let bound = self.differential_at(primary, energy, 0.0);
        if bound <= 0.0 {
            return Err(EvgenError::Sampling(
                ErrorInfo::new("elastic-closed", "no phase space for this primary")
                    .with_context("primary", primary)
                    .with_context("energy", energy),
            ));
        }

        let trials = self.numerics.max_sampling_trials;
        for _ in 0..trials {
            let y = rng.uniform_range(0.0, y_max);
            let accept = rng.uniform() * bound;
            if accept > self.differential_at(primary, energy, y) {
                continue;
            }
            let phi = rng.uniform_range(0.0, 2.0 * PI);
            let Some(pair) = scatter_two_body(
                &frame,
                record.primary_mass,
                record.primary_mass,
                y * energy,
                phi,
            ) else {
                continue;
            };
            record.secondary_momenta = vec![[0.0; 4]; 2];
            record.secondary_masses = vec![0.0; 2];
            record.secondary_helicities = vec![0.0; 2];
            record.secondary_momenta[ELECTRON_INDEX] = pair.recoil.to_array();
            record.secondary_masses[ELECTRON_INDEX] = frame.target_mass();
            record.secondary_helicities[ELECTRON_INDEX] = record.target_helicity;
            record.secondary_momenta[NEUTRINO_INDEX] = pair.outgoing.to_array();
            record.secondary_masses[NEUTRINO_INDEX] = record.primary_mass;
            record.secondary_helicities[NEUTRINO_INDEX] = record.primary_helicity;
            record.interaction_parameters = vec![energy, y];
            return Ok(());
        }
        Err(budget_exhausted(self.name(), record, trials))
    }

    fn density_variables(&self) -> Vec<String> {
        vec!["Bjorken y".to_string()]
    }
}
