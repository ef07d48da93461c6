//! Opaque particle keys.
//!
//! The particle catalog (masses, charges, names) lives outside this core.
//! A [`ParticleType`] is only a key: the handful of named codes below are the
//! ones the built-in models need to build their signatures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// PDG-style particle code used as a lookup and grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticleType(i32);

impl ParticleType {
    /// Placeholder for an unset key.
    pub const UNKNOWN: Self = Self(0);
    /// Electron.
    pub const E_MINUS: Self = Self(11);
    /// Positron.
    pub const E_PLUS: Self = Self(-11);
    /// Electron neutrino.
    pub const NU_E: Self = Self(12);
    /// Electron antineutrino.
    pub const NU_E_BAR: Self = Self(-12);
    /// Negative muon.
    pub const MU_MINUS: Self = Self(13);
    /// Positive muon.
    pub const MU_PLUS: Self = Self(-13);
    /// Muon neutrino.
    pub const NU_MU: Self = Self(14);
    /// Muon antineutrino.
    pub const NU_MU_BAR: Self = Self(-14);
    /// Negative tau.
    pub const TAU_MINUS: Self = Self(15);
    /// Positive tau.
    pub const TAU_PLUS: Self = Self(-15);
    /// Tau neutrino.
    pub const NU_TAU: Self = Self(16);
    /// Tau antineutrino.
    pub const NU_TAU_BAR: Self = Self(-16);
    /// Heavy neutral lepton.
    pub const NU_F4: Self = Self(5914);
    /// Heavy neutral antilepton.
    pub const NU_F4_BAR: Self = Self(-5914);
    /// Generic (isoscalar) nucleon target.
    pub const NUCLEON: Self = Self(2000002112);
    /// Unresolved hadronic final state.
    pub const HADRONS: Self = Self(-2000001006);

    /// The six light neutrino flavours, particles first.
    pub const NEUTRINOS: [Self; 6] = [
        Self::NU_E,
        Self::NU_MU,
        Self::NU_TAU,
        Self::NU_E_BAR,
        Self::NU_MU_BAR,
        Self::NU_TAU_BAR,
    ];

    /// Creates a key from its raw code.
    pub const fn from_code(code: i32) -> Self {
        Self(code)
    }

    /// Returns the raw code.
    pub const fn code(self) -> i32 {
        self.0
    }

    /// Whether the key is one of the three light neutrinos or antineutrinos.
    pub fn is_neutrino(self) -> bool {
        matches!(self.0.abs(), 12 | 14 | 16)
    }

    /// Whether the key names a lepton (charged, light neutral or heavy neutral).
    pub fn is_lepton(self) -> bool {
        matches!(self.0.abs(), 11..=16 | 5914)
    }

    /// PDG sign convention: negative codes are antiparticles.
    pub fn is_antiparticle(self) -> bool {
        self.0 < 0
    }

    /// Charged lepton produced by a charged-current interaction of this neutrino.
    pub fn charged_partner(self) -> Option<Self> {
        match self.0 {
            12 => Some(Self::E_MINUS),
            -12 => Some(Self::E_PLUS),
            14 => Some(Self::MU_MINUS),
            -14 => Some(Self::MU_PLUS),
            16 => Some(Self::TAU_MINUS),
            -16 => Some(Self::TAU_PLUS),
            _ => None,
        }
    }

    /// Heavy neutral lepton produced by dipole upscattering of this neutrino.
    pub fn heavy_partner(self) -> Option<Self> {
        if !self.is_neutrino() {
            return None;
        }
        Some(if self.is_antiparticle() {
            Self::NU_F4_BAR
        } else {
            Self::NU_F4
        })
    }

    fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            0 => "unknown",
            11 => "e-",
            -11 => "e+",
            12 => "nu_e",
            -12 => "nu_e_bar",
            13 => "mu-",
            -13 => "mu+",
            14 => "nu_mu",
            -14 => "nu_mu_bar",
            15 => "tau-",
            -15 => "tau+",
            16 => "nu_tau",
            -16 => "nu_tau_bar",
            5914 => "nu_f4",
            -5914 => "nu_f4_bar",
            2000002112 => "nucleon",
            -2000001006 => "hadrons",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for ParticleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "pdg({})", self.0),
        }
    }
}
