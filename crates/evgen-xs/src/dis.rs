//! Deep-inelastic neutrino scattering from fitted spline tables.
//!
//! The differential table is a 3D spline over `(log10 E, log10 x, log10 y)`
//! and the total table a 1D spline over `log10 E`; both return `log10` of the
//! cross section in cm^2.

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::sync::Arc;

use evgen_core::constants::{ELECTRON_MASS, ISOSCALAR_MASS};
use evgen_core::{
    ErrorInfo, EvgenError, InteractionRecord, InteractionSignature, NumericsConfig, ParticleType,
    RngHandle,
};
use evgen_math::{FourVector, SplineTable};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::frame::{rest_frame_energy, scatter_inelastic, RestFrame};
use crate::model::{budget_exhausted, expect_secondaries, InteractionModel, SignatureCache};

/// Current type of a DIS table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisChannel {
    /// W exchange; the outgoing lepton is the charged partner.
    ChargedCurrent,
    /// Z exchange; the neutrino scatters off.
    NeutralCurrent,
    /// Resonant W production on electrons.
    GlashowResonance,
}

impl DisChannel {
    /// Decodes the numeric `INTERACTION` convention (1, 2, 3).
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::ChargedCurrent),
            2 => Some(Self::NeutralCurrent),
            3 => Some(Self::GlashowResonance),
            _ => None,
        }
    }

    /// Target mass used when neither the caller nor the table supplies one.
    pub fn default_target_mass(self) -> f64 {
        match self {
            Self::ChargedCurrent | Self::NeutralCurrent => ISOSCALAR_MASS,
            Self::GlashowResonance => ELECTRON_MASS,
        }
    }

    fn outgoing_lepton(self, primary: ParticleType) -> Option<ParticleType> {
        match self {
            Self::ChargedCurrent => primary.charged_partner(),
            Self::NeutralCurrent => Some(primary),
            Self::GlashowResonance => Some(ParticleType::HADRONS),
        }
    }
}

/// Construction parameters. Unset fields fall back to the differential
/// table's `INTERACTION`, `TARGETMASS` and `Q2MIN` metadata, then to
/// charged current, the channel's default mass and 1 GeV^2.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisParameters {
    /// Numeric channel code (1 CC, 2 NC, 3 GR).
    #[serde(default)]
    pub interaction_type: Option<i32>,
    /// Target mass in GeV.
    #[serde(default)]
    pub target_mass: Option<f64>,
    /// Lowest accepted `Q^2` in GeV^2.
    #[serde(default)]
    pub minimum_q2: Option<f64>,
    /// Neutrino primaries the tables describe.
    pub primaries: Vec<ParticleType>,
    /// Targets the tables describe.
    pub targets: Vec<ParticleType>,
    /// Masses of outgoing leptons; missing keys are massless.
    #[serde(default)]
    pub lepton_masses: BTreeMap<ParticleType, f64>,
}

/// Spline-backed DIS model.
#[derive(Debug, Clone)]
pub struct DisFromSpline {
    differential: Arc<SplineTable>,
    total: Arc<SplineTable>,
    channel: DisChannel,
    target_mass: f64,
    minimum_q2: f64,
    lepton_masses: BTreeMap<ParticleType, f64>,
    signatures: SignatureCache,
    numerics: NumericsConfig,
}

impl DisFromSpline {
    /// Builds a model from its two tables.
    pub fn new(
        differential: Arc<SplineTable>,
        total: Arc<SplineTable>,
        params: DisParameters,
    ) -> Result<Self, EvgenError> {
        if differential.ndim() != 3 {
            return Err(EvgenError::Table(
                ErrorInfo::new("dis-table-dimension", "differential table must be 3D")
                    .with_context("ndim", differential.ndim()),
            ));
        }
        if total.ndim() != 1 {
            return Err(EvgenError::Table(
                ErrorInfo::new("dis-table-dimension", "total table must be 1D")
                    .with_context("ndim", total.ndim()),
            ));
        }
        let code = params
            .interaction_type
            .or_else(|| differential.read_key("INTERACTION"))
            .unwrap_or(1);
        let channel = DisChannel::from_code(code).ok_or_else(|| {
            EvgenError::Model(
                ErrorInfo::new("dis-interaction-type", "unknown DIS interaction type")
                    .with_context("interaction_type", code)
                    .with_hint("use 1 (CC), 2 (NC) or 3 (GR)"),
            )
        })?;
        let target_mass = params
            .target_mass
            .or_else(|| differential.read_key("TARGETMASS"))
            .unwrap_or_else(|| channel.default_target_mass());
        let minimum_q2 = params
            .minimum_q2
            .or_else(|| differential.read_key("Q2MIN"))
            .unwrap_or(1.0);
        if !(target_mass.is_finite() && target_mass > 0.0) {
            return Err(EvgenError::Model(
                ErrorInfo::new("dis-target-mass", "target mass must be positive")
                    .with_context("target_mass", target_mass),
            ));
        }
        if params.primaries.is_empty() || params.targets.is_empty() {
            return Err(EvgenError::model(
                "dis-empty-channels",
                "at least one primary and one target are required",
            ));
        }

        let mut signatures = Vec::new();
        for &primary in &params.primaries {
            let lepton = match channel.outgoing_lepton(primary) {
                Some(lepton) if primary.is_neutrino() => lepton,
                _ => {
                    return Err(EvgenError::Model(
                        ErrorInfo::new("dis-primary", "DIS primaries must be light neutrinos")
                            .with_context("primary", primary),
                    ))
                }
            };
            for &target in &params.targets {
                signatures.push(InteractionSignature::new(
                    primary,
                    target,
                    vec![lepton, ParticleType::HADRONS],
                ));
            }
        }
        let signatures = SignatureCache::new(signatures);
        debug!(
            channel = ?channel,
            target_mass,
            minimum_q2,
            signatures = signatures.signatures().len(),
            "built DIS model"
        );
        Ok(Self {
            differential,
            total,
            channel,
            target_mass,
            minimum_q2,
            lepton_masses: params.lepton_masses,
            signatures,
            numerics: NumericsConfig::default(),
        })
    }

    /// Replaces the numerics configuration.
    pub fn with_numerics(mut self, numerics: NumericsConfig) -> Self {
        self.numerics = numerics;
        self
    }

    /// Channel of the tables.
    pub fn channel(&self) -> DisChannel {
        self.channel
    }

    /// Target mass used in the kinematic limits.
    pub fn target_mass(&self) -> f64 {
        self.target_mass
    }

    /// Lowest accepted `Q^2`.
    pub fn minimum_q2(&self) -> f64 {
        self.minimum_q2
    }

    /// Mass of `lepton`, zero when not supplied.
    pub fn lepton_mass(&self, lepton: ParticleType) -> f64 {
        self.lepton_masses.get(&lepton).copied().unwrap_or(0.0)
    }

    /// Differential cross section `d2sigma/dxdy` in cm^2.
    ///
    /// `q2` defaults to `2 M E x y`. Zero outside the table, outside the
    /// physical region or below the `Q^2` cut.
    pub fn differential_at(
        &self,
        energy: f64,
        x: f64,
        y: f64,
        lepton_mass: f64,
        q2: Option<f64>,
    ) -> f64 {
        let log_energy = energy.log10();
        if !self.differential.contains(0, log_energy) {
            trace!(energy, "DIS differential queried outside table energy range");
            return 0.0;
        }
        if !(x > 0.0 && x < 1.0 && y > 0.0 && y < 1.0) {
            return 0.0;
        }
        let q2 = q2.unwrap_or(2.0 * self.target_mass * energy * x * y);
        if q2 < self.minimum_q2 {
            return 0.0;
        }
        if !kinematically_allowed(x, y, energy, self.target_mass, lepton_mass) {
            return 0.0;
        }
        self.differential
            .evaluate(&[log_energy, x.log10(), y.log10()])
            .map_or(0.0, |log_xs| 10f64.powf(log_xs))
    }

    fn lepton_index(record: &InteractionRecord) -> usize {
        record
            .signature
            .secondary_types
            .iter()
            .position(|&t| t != ParticleType::HADRONS)
            .unwrap_or(0)
    }
}

/// Physical region of DIS for a massive outgoing lepton
/// (Phys. Rev. D 66, 113007, eqs. 6-7).
pub fn kinematically_allowed(x: f64, y: f64, energy: f64, target_mass: f64, lepton_mass: f64) -> bool {
    if x > 1.0 || energy <= lepton_mass {
        return false;
    }
    let m2 = lepton_mass * lepton_mass;
    if x < m2 / (2.0 * target_mass * (energy - lepton_mass)) {
        return false;
    }
    let d = 2.0 * (1.0 + target_mass * x / (2.0 * energy));
    let ad = 1.0 - m2 * (1.0 / (2.0 * target_mass * energy * x) + 1.0 / (2.0 * energy * energy));
    let term = 1.0 - m2 / (2.0 * target_mass * energy * x);
    let radicand = term * term - m2 / (energy * energy);
    if radicand < 0.0 {
        return false;
    }
    let bd = radicand.sqrt();
    (ad - bd) <= d * y && d * y <= (ad + bd)
}

impl InteractionModel for DisFromSpline {
    fn name(&self) -> &'static str {
        "dis-from-spline"
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
        if !self.signatures.has_primary(primary) || !self.signatures.has_target(target) {
            return 0.0;
        }
        let log_energy = energy.log10();
        if !self.total.contains(0, log_energy) {
            trace!(energy, "DIS total queried outside table energy range");
            return 0.0;
        }
        self.total
            .evaluate(&[log_energy])
            .map_or(0.0, |log_xs| 10f64.powf(log_xs))
    }

    fn differential_cross_section(&self, record: &InteractionRecord) -> f64 {
        let signature = &record.signature;
        if !self.signatures.has_primary(signature.primary_type)
            || !self.signatures.has_target(signature.target_type)
        {
            return 0.0;
        }
        let lepton_index = Self::lepton_index(record);
        let Some(&p3) = record.secondary_momenta.get(lepton_index) else {
            return 0.0;
        };
        let p1 = FourVector::from_array(record.primary_momentum);
        let p2 = FourVector::from_array(record.target_momentum);
        let p3 = FourVector::from_array(p3);
        let q = p1 - p3;
        let q2 = -q.mass_squared();
        let p2_p1 = p2.dot(&p1);
        let p2_q = p2.dot(&q);
        if p2_p1 == 0.0 || p2_q == 0.0 {
            return 0.0;
        }
        let y = 1.0 - p2.dot(&p3) / p2_p1;
        let x = q2 / (2.0 * p2_q);
        let lepton_mass = record
            .secondary_masses
            .get(lepton_index)
            .copied()
            .unwrap_or(0.0);
        self.differential_at(rest_frame_energy(record), x, y, lepton_mass, Some(q2))
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
        let lepton_index = Self::lepton_index(record);
        let hadron_index = 1 - lepton_index.min(1);
        let lepton_mass = self.lepton_mass(record.signature.secondary_types[lepton_index]);
        let frame = RestFrame::of(record);

        let trials = self.numerics.max_sampling_trials;
        for _ in 0..trials {
            let x = rng.uniform();
            let y = rng.uniform();
            let phi = rng.uniform_range(0.0, 2.0 * PI);
            let Some(pair) =
                scatter_inelastic(&frame, record.primary_mass, lepton_mass, x, y, phi)
            else {
                continue;
            };
            let n = record.signature.secondary_types.len();
            record.secondary_momenta.resize(n, [0.0; 4]);
            record.secondary_masses.resize(n, 0.0);
            record.secondary_helicities.resize(n, 0.0);
            record.secondary_momenta[lepton_index] = pair.lepton.to_array();
            record.secondary_masses[lepton_index] = lepton_mass;
            record.secondary_helicities[lepton_index] = record.primary_helicity;
            record.secondary_momenta[hadron_index] = pair.hadrons.to_array();
            record.secondary_masses[hadron_index] = pair.hadrons.mass();
            record.secondary_helicities[hadron_index] = record.target_helicity;
            record.interaction_parameters = vec![frame.primary_energy(), x, y];
            return Ok(());
        }
        Err(budget_exhausted(self.name(), record, trials))
    }

    fn density_variables(&self) -> Vec<String> {
        vec!["Bjorken x".to_string(), "Bjorken y".to_string()]
    }
}
