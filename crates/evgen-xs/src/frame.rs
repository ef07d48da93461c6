//! Target rest frame handling and final-state reconstruction shared by models.

use evgen_core::InteractionRecord;
use evgen_math::{azimuthal_rotation, rotation_between, Boost, FourVector};
use nalgebra::Vector3;

/// Primary and target expressed in the target rest frame, plus the way back.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RestFrame {
    pub primary: FourVector,
    pub target: FourVector,
    back: Option<Boost>,
}

impl RestFrame {
    /// Moves the record's incoming particles into the target rest frame.
    /// No boost is built when the target is already at rest.
    pub fn of(record: &InteractionRecord) -> Self {
        let primary = FourVector::from_array(record.primary_momentum);
        let target = FourVector::from_array(record.target_momentum);
        if record.target_at_rest() {
            return Self {
                primary,
                target,
                back: None,
            };
        }
        let to_rest = Boost::rest_frame_of(&target);
        Self {
            primary: to_rest.apply(&primary),
            target: to_rest.apply(&target),
            back: Some(to_rest.inverse()),
        }
    }

    pub fn primary_energy(&self) -> f64 {
        self.primary.e
    }

    pub fn target_mass(&self) -> f64 {
        self.target.e
    }

    pub fn to_original(&self, v: &FourVector) -> FourVector {
        match &self.back {
            Some(boost) => boost.apply(v),
            None => *v,
        }
    }
}

/// Rest-frame primary energy, computed without building a boost.
pub(crate) fn rest_frame_energy(record: &InteractionRecord) -> f64 {
    if record.target_at_rest() {
        return record.primary_momentum[0];
    }
    let p1 = FourVector::from_array(record.primary_momentum);
    let p2 = FourVector::from_array(record.target_momentum);
    let mass = p2.mass();
    if mass > 0.0 {
        p1.dot(&p2) / mass
    } else {
        0.0
    }
}

/// Fraction of the primary energy transferred to the target, from invariants:
/// `y = p2.(p4 - p2) / p2.p1`.
pub(crate) fn inelasticity(record: &InteractionRecord, recoil_index: usize) -> Option<f64> {
    let p4 = FourVector::from_array(*record.secondary_momenta.get(recoil_index)?);
    let p1 = FourVector::from_array(record.primary_momentum);
    let p2 = FourVector::from_array(record.target_momentum);
    let denominator = p2.dot(&p1);
    (denominator != 0.0).then(|| p2.dot(&(p4 - p2)) / denominator)
}

/// Maps a vector built along the x axis onto `direction`, then spins it by
/// `phi` about `direction`.
fn orient(v: FourVector, direction: &Vector3<f64>, phi: f64) -> FourVector {
    let onto = rotation_between(&Vector3::x(), direction);
    let spin = azimuthal_rotation(direction, phi);
    v.rotated(&onto).rotated(&spin)
}

/// Outgoing lepton and hadronic system, in the record's original frame.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScatteredPair {
    pub lepton: FourVector,
    pub hadrons: FourVector,
}

/// Builds the DIS final state from Bjorken `x`, `y` and an azimuth.
///
/// With `E` the rest-frame primary energy and `M` the target mass:
/// `nu = yE`, `Q^2 = 2MExy`, and the momentum transfer along the primary is
/// fixed by requiring the outgoing lepton to have mass `lepton_mass`.
/// Returns `None` for kinematically forbidden points.
pub(crate) fn scatter_inelastic(
    frame: &RestFrame,
    primary_mass: f64,
    lepton_mass: f64,
    x: f64,
    y: f64,
    phi: f64,
) -> Option<ScatteredPair> {
    let energy = frame.primary.e;
    let mass = frame.target_mass();
    let p1 = frame.primary.momentum();
    if p1 <= 0.0 {
        return None;
    }
    let nu = y * energy;
    if energy - nu < lepton_mass {
        return None;
    }
    let q2 = 2.0 * mass * energy * x * y;
    let q_parallel = (primary_mass * primary_mass
        + lepton_mass * lepton_mass
        + 2.0 * p1 * p1
        + q2
        + 2.0 * energy * energy * (y - 1.0))
        / (2.0 * p1);
    let q_sq = nu * nu + q2;
    let q_perp_sq = q_sq - q_parallel * q_parallel;
    if q_perp_sq < -1e-12 * q_sq.max(f64::MIN_POSITIVE) {
        return None;
    }
    let q_perp = q_perp_sq.max(0.0).sqrt();

    let q = orient(
        FourVector::new(nu, q_parallel, q_perp, 0.0),
        &frame.primary.p,
        phi,
    );
    let lepton = frame.primary - q;
    let hadrons = frame.target + q;
    if hadrons.mass_squared() <= 0.0 {
        return None;
    }
    Some(ScatteredPair {
        lepton: frame.to_original(&lepton),
        hadrons: frame.to_original(&hadrons),
    })
}

/// Outgoing projectile and recoiling target, in the record's original frame.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RecoilPair {
    pub outgoing: FourVector,
    pub recoil: FourVector,
}

/// Builds a 2 -> 2 final state in which the target recoils with kinetic
/// energy `kinetic` and the projectile leaves with mass `outgoing_mass`.
///
/// The recoil angle follows from energy-momentum conservation:
/// `cos = (m3^2 - m1^2 - 2M^2 - 2E1 M + 2(E1 + M)E4) / (2|p1||p4|)`.
pub(crate) fn scatter_two_body(
    frame: &RestFrame,
    primary_mass: f64,
    outgoing_mass: f64,
    kinetic: f64,
    phi: f64,
) -> Option<RecoilPair> {
    let e1 = frame.primary.e;
    let mass = frame.target_mass();
    let p1 = frame.primary.momentum();
    if p1 <= 0.0 || kinetic < 0.0 {
        return None;
    }
    let e4 = mass + kinetic;
    let p4 = (kinetic * (kinetic + 2.0 * mass)).sqrt();
    let cos_theta = if p4 > 0.0 {
        (outgoing_mass * outgoing_mass - primary_mass * primary_mass - 2.0 * mass * mass
            - 2.0 * e1 * mass
            + 2.0 * (e1 + mass) * e4)
            / (2.0 * p1 * p4)
    } else {
        1.0
    };
    if !cos_theta.is_finite() || cos_theta.abs() > 1.0 + 1e-9 {
        return None;
    }
    let cos_theta = cos_theta.clamp(-1.0, 1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

    let recoil = orient(
        FourVector::new(e4, p4 * cos_theta, p4 * sin_theta, 0.0),
        &frame.primary.p,
        phi,
    );
    let outgoing = frame.primary + frame.target - recoil;
    if outgoing.e < outgoing_mass {
        return None;
    }
    Some(RecoilPair {
        outgoing: frame.to_original(&outgoing),
        recoil: frame.to_original(&recoil),
    })
}
