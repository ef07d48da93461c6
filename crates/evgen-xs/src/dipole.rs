//! Heavy neutral lepton production by dipole upscattering, `nu A -> N A`,
//! from per-target interpolation tables.

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::sync::Arc;

use evgen_core::constants::INV_GEV_SQ_TO_CM_SQ;
use evgen_core::{
    ErrorInfo, EvgenError, InteractionRecord, InteractionSignature, NumericsConfig, ParticleType,
    RngHandle,
};
use evgen_math::{Interpolator1D, Interpolator2D};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::frame::{inelasticity, rest_frame_energy, scatter_two_body, RestFrame};
use crate::model::{budget_exhausted, expect_secondaries, InteractionModel, SignatureCache};

const HNL_INDEX: usize = 0;
const RECOIL_INDEX: usize = 1;

/// Helicity of the outgoing heavy lepton relative to the primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HelicityChannel {
    /// Same helicity as the primary.
    #[default]
    Conserving,
    /// Opposite helicity to the primary.
    Flipping,
}

/// Construction parameters for [`DipoleFromTable`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DipoleParameters {
    /// Heavy neutral lepton mass in GeV.
    pub hnl_mass: f64,
    /// Dipole coupling; tabulated values are scaled by its square.
    #[serde(default = "default_coupling")]
    pub dipole_coupling: f64,
    /// Helicity channel of the tables.
    #[serde(default)]
    pub channel: HelicityChannel,
    /// Whether differential tables are indexed by the rescaled `z` instead of `y`.
    #[serde(default = "default_true")]
    pub z_samp: bool,
    /// Whether tables are in GeV^-2 and need converting to cm^2.
    #[serde(default = "default_true")]
    pub in_inv_gev: bool,
    /// Supported primaries.
    #[serde(default = "default_primaries")]
    pub primaries: Vec<ParticleType>,
    /// Target masses used by energy-only queries; record queries use the
    /// record's own target mass.
    #[serde(default)]
    pub target_masses: BTreeMap<ParticleType, f64>,
}

fn default_coupling() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_primaries() -> Vec<ParticleType> {
    ParticleType::NEUTRINOS.to_vec()
}

impl DipoleParameters {
    /// Parameters for an HNL of `hnl_mass` with every other field defaulted.
    pub fn new(hnl_mass: f64) -> Self {
        Self {
            hnl_mass,
            dipole_coupling: default_coupling(),
            channel: HelicityChannel::default(),
            z_samp: true,
            in_inv_gev: true,
            primaries: default_primaries(),
            target_masses: BTreeMap::new(),
        }
    }
}

/// Table-backed dipole upscattering model.
#[derive(Debug, Clone)]
pub struct DipoleFromTable {
    params: DipoleParameters,
    total: BTreeMap<ParticleType, Arc<Interpolator1D>>,
    differential: BTreeMap<ParticleType, Arc<Interpolator2D>>,
    signatures: SignatureCache,
    numerics: NumericsConfig,
}

impl DipoleFromTable {
    /// Creates a model without tables.
    pub fn new(params: DipoleParameters) -> Result<Self, EvgenError> {
        if !(params.hnl_mass.is_finite() && params.hnl_mass >= 0.0) {
            return Err(EvgenError::Model(
                ErrorInfo::new("dipole-hnl-mass", "HNL mass must be finite and non-negative")
                    .with_context("hnl_mass", params.hnl_mass),
            ));
        }
        if !params.dipole_coupling.is_finite() {
            return Err(EvgenError::model("dipole-coupling", "dipole coupling must be finite"));
        }
        if let Some(&bad) = params.primaries.iter().find(|p| !p.is_neutrino()) {
            return Err(EvgenError::Model(
                ErrorInfo::new("dipole-primary", "dipole primaries must be light neutrinos")
                    .with_context("primary", bad),
            ));
        }
        Ok(Self {
            params,
            total: BTreeMap::new(),
            differential: BTreeMap::new(),
            signatures: SignatureCache::default(),
            numerics: NumericsConfig::default(),
        })
    }

    /// Replaces the numerics configuration.
    pub fn with_numerics(mut self, numerics: NumericsConfig) -> Self {
        self.numerics = numerics;
        self
    }

    /// Installs (or swaps) the total cross-section table of `target`.
    pub fn add_total_cross_section(&mut self, target: ParticleType, table: Arc<Interpolator1D>) {
        self.total.insert(target, table);
        self.rebuild_signatures();
    }

    /// Installs (or swaps) the differential cross-section table of `target`.
    pub fn add_differential_cross_section(
        &mut self,
        target: ParticleType,
        table: Arc<Interpolator2D>,
    ) {
        self.differential.insert(target, table);
        self.rebuild_signatures();
    }

    fn rebuild_signatures(&mut self) {
        let mut signatures = Vec::new();
        for &target in self.total.keys() {
            if !self.differential.contains_key(&target) {
                continue;
            }
            for &primary in &self.params.primaries {
                if let Some(hnl) = primary.heavy_partner() {
                    signatures.push(InteractionSignature::new(primary, target, vec![hnl, target]));
                }
            }
        }
        self.signatures = SignatureCache::new(signatures);
        debug!(
            hnl_mass = self.params.hnl_mass,
            targets = self.signatures.targets().len(),
            signatures = self.signatures.signatures().len(),
            "rebuilt dipole signatures"
        );
    }

    /// Construction parameters.
    pub fn parameters(&self) -> &DipoleParameters {
        &self.params
    }

    /// `m_N + m_N^2 / (2M)` for a target of mass `target_mass` at rest.
    pub fn threshold_for(&self, target_mass: f64) -> f64 {
        let m = self.params.hnl_mass;
        m + m * m / (2.0 * target_mass)
    }

    /// Allowed inelasticity range `[y_min, y_max]` from 2 -> 2 kinematics in
    /// the target rest frame, or `None` below threshold.
    pub fn y_range(&self, energy: f64, target_mass: f64) -> Option<(f64, f64)> {
        let m_n = self.params.hnl_mass;
        let big_m = target_mass;
        let s = big_m * big_m + 2.0 * big_m * energy;
        let lambda = (s - (m_n + big_m).powi(2)) * (s - (m_n - big_m).powi(2));
        if energy.is_nan() || energy <= 0.0 || lambda < 0.0 {
            return None;
        }
        let sqrt_s = s.sqrt();
        let recoil_cm = (s + big_m * big_m - m_n * m_n) / (2.0 * sqrt_s);
        let p_cm = lambda.sqrt() / (2.0 * sqrt_s);
        let gamma = (energy + big_m) / sqrt_s;
        let beta_gamma = energy / sqrt_s;
        let y_min = (gamma * recoil_cm - beta_gamma * p_cm - big_m) / energy;
        let y_max = (gamma * recoil_cm + beta_gamma * p_cm - big_m) / energy;
        Some((y_min.max(0.0), y_max))
    }

    fn scale(&self) -> f64 {
        let coupling2 = self.params.dipole_coupling * self.params.dipole_coupling;
        if self.params.in_inv_gev {
            coupling2 * INV_GEV_SQ_TO_CM_SQ
        } else {
            coupling2
        }
    }

    /// `dsigma/dy` in cm^2 for a target of mass `target_mass`.
    pub fn differential_at(
        &self,
        primary: ParticleType,
        target: ParticleType,
        target_mass: f64,
        energy: f64,
        y: f64,
    ) -> f64 {
        if !self.signatures.has_primary(primary) {
            return 0.0;
        }
        let (Some(total), Some(differential)) =
            (self.total.get(&target), self.differential.get(&target))
        else {
            return 0.0;
        };
        if energy < self.threshold_for(target_mass)
            || energy < total.min_x()
            || energy > total.max_x()
        {
            trace!(energy, %target, "dipole differential queried outside table range");
            return 0.0;
        }
        let Some((y_min, y_max)) = self.y_range(energy, target_mass) else {
            return 0.0;
        };
        if y_max <= y_min || y < y_min || y > y_max {
            return 0.0;
        }
        let coordinate = if self.params.z_samp {
            (y - y_min) / (y_max - y_min)
        } else {
            y
        };
        differential.evaluate(energy, coordinate) * self.scale()
    }

    fn target_mass_of(&self, target: ParticleType) -> Option<f64> {
        self.params.target_masses.get(&target).copied()
    }
}

impl InteractionModel for DipoleFromTable {
    fn name(&self) -> &'static str {
        "dipole-from-table"
    }

    fn signature_cache(&self) -> &SignatureCache {
        &self.signatures
    }

    fn total_cross_section(&self, record: &InteractionRecord) -> f64 {
        let energy = rest_frame_energy(record);
        if energy < self.threshold_for(record.target_mass) {
            return 0.0;
        }
        self.total_cross_section_for(
            record.signature.primary_type,
            energy,
            record.signature.target_type,
        )
    }

    fn total_cross_section_for(
        &self,
        primary: ParticleType,
        energy: f64,
        target: ParticleType,
    ) -> f64 {
        if !self.signatures.has_primary(primary) {
            return 0.0;
        }
        let Some(total) = self.total.get(&target) else {
            return 0.0;
        };
        if let Some(mass) = self.target_mass_of(target) {
            if energy < self.threshold_for(mass) {
                return 0.0;
            }
        }
        if energy < total.min_x() || energy > total.max_x() {
            trace!(energy, %target, "dipole total queried outside table range");
            return 0.0;
        }
        total.evaluate(energy) * self.scale()
    }

    fn differential_cross_section(&self, record: &InteractionRecord) -> f64 {
        match inelasticity(record, RECOIL_INDEX) {
            Some(y) => self.differential_at(
                record.signature.primary_type,
                record.signature.target_type,
                record.target_mass,
                rest_frame_energy(record),
                y,
            ),
            None => 0.0,
        }
    }

    fn interaction_threshold(&self, record: &InteractionRecord) -> f64 {
        self.threshold_for(record.target_mass)
    }

    fn sample_final_state(
        &self,
        record: &mut InteractionRecord,
        rng: &mut RngHandle,
    ) -> Result<(), EvgenError> {
        expect_secondaries(self.name(), record, 2)?;
        let frame = RestFrame::of(record);
        let energy = frame.primary_energy();
        let target_mass = frame.target_mass();
        let primary = record.signature.primary_type;
        let target = record.signature.target_type;
        let closed = || {
            EvgenError::Sampling(
                ErrorInfo::new("dipole-closed", "no phase space at this energy")
                    .with_context("energy", energy)
                    .with_context("target", target),
            )
        };
        let (y_min, y_max) = self.y_range(energy, target_mass).ok_or_else(closed)?;

        let points = self.numerics.dipole_scan_points.max(2);
        let peak = (0..points)
            .map(|i| {
                let y = y_min + (y_max - y_min) * i as f64 / (points - 1) as f64;
                self.differential_at(primary, target, target_mass, energy, y)
            })
            .fold(0.0, f64::max);
        if peak.is_nan() || peak <= 0.0 {
            return Err(closed());
        }
        let bound = 1.1 * peak;

        let trials = self.numerics.max_sampling_trials;
        for _ in 0..trials {
            let y = rng.uniform_range(y_min, y_max);
            let accept = rng.uniform() * bound;
            if accept > self.differential_at(primary, target, target_mass, energy, y) {
                continue;
            }
            let phi = rng.uniform_range(0.0, 2.0 * PI);
            let Some(pair) = scatter_two_body(
                &frame,
                record.primary_mass,
                self.params.hnl_mass,
                y * energy,
                phi,
            ) else {
                continue;
            };
            let hnl_helicity = match self.params.channel {
                HelicityChannel::Conserving => record.primary_helicity,
                HelicityChannel::Flipping => -record.primary_helicity,
            };
            record.secondary_momenta = vec![[0.0; 4]; 2];
            record.secondary_masses = vec![0.0; 2];
            record.secondary_helicities = vec![0.0; 2];
            record.secondary_momenta[HNL_INDEX] = pair.outgoing.to_array();
            record.secondary_masses[HNL_INDEX] = self.params.hnl_mass;
            record.secondary_helicities[HNL_INDEX] = hnl_helicity;
            record.secondary_momenta[RECOIL_INDEX] = pair.recoil.to_array();
            record.secondary_masses[RECOIL_INDEX] = target_mass;
            record.secondary_helicities[RECOIL_INDEX] = record.target_helicity;
            record.interaction_parameters = vec![energy, y];
            return Ok(());
        }
        Err(budget_exhausted(self.name(), record, trials))
    }

    fn density_variables(&self) -> Vec<String> {
        vec!["Bjorken y".to_string()]
    }
}
