#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use evgen_core::constants::MUON_MASS;
use evgen_core::{InteractionRecord, InteractionSignature, ParticleType};
use evgen_math::{Interpolator1D, Interpolator2D, SplineTable, TableData1D, TableData2D};
use evgen_xs::{DipoleFromTable, DipoleParameters, DisFromSpline, DisParameters};

pub const CARBON: ParticleType = ParticleType::from_code(1000060120);
pub const CARBON_MASS: f64 = 11.17793;

/// Clamped knot vector of `intervals` equal intervals for a spline of `order`.
pub fn clamped_knots(lo: f64, hi: f64, intervals: usize, order: usize) -> Vec<f64> {
    let mut knots = vec![lo; order];
    for i in 0..=intervals {
        knots.push(lo + (hi - lo) * i as f64 / intervals as f64);
    }
    knots.extend(std::iter::repeat(hi).take(order));
    knots
}

/// Linear spline tables over log10 E in [0, 6] with `d2sigma/dxdy = 1e-38`
/// and `sigma = 1e-38 * E` (both cm^2).
pub fn dis_tables(aux: &[(&str, &str)]) -> (Arc<SplineTable>, Arc<SplineTable>) {
    let energy = clamped_knots(0.0, 6.0, 6, 1);
    let fraction = clamped_knots(-6.0, 0.0, 3, 1);
    let n = (energy.len() - 2) * (fraction.len() - 2) * (fraction.len() - 2);
    let aux: BTreeMap<String, String> = aux
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let differential = SplineTable::new(
        vec![energy.clone(), fraction.clone(), fraction],
        vec![1, 1, 1],
        vec![-38.0; n],
    )
    .unwrap()
    .with_aux(aux);
    let total_coefficients: Vec<f64> = (0..=6).map(|i| -38.0 + i as f64).collect();
    let total = SplineTable::new(vec![energy], vec![1], total_coefficients).unwrap();
    (Arc::new(differential), Arc::new(total))
}

pub fn charged_current_dis() -> DisFromSpline {
    let (differential, total) = dis_tables(&[]);
    let params = DisParameters {
        primaries: vec![ParticleType::NU_MU, ParticleType::NU_MU_BAR],
        targets: vec![ParticleType::NUCLEON],
        lepton_masses: [
            (ParticleType::MU_MINUS, MUON_MASS),
            (ParticleType::MU_PLUS, MUON_MASS),
        ]
        .into_iter()
        .collect(),
        ..DisParameters::default()
    };
    DisFromSpline::new(differential, total, params).unwrap()
}

/// Carbon tables between 0.2 and 20 GeV: `sigma = 1e-10 E` and
/// `dsigma/dz = 1e-10 E (2 - z)`, both in GeV^-2.
pub fn dipole_tables() -> (Arc<Interpolator1D>, Arc<Interpolator2D>) {
    let energies: Vec<f64> = (0..21).map(|i| 0.2 * 10f64.powf(0.1 * i as f64)).collect();
    let total = TableData1D {
        x: energies.clone(),
        f: energies.iter().map(|e| 1e-10 * e).collect(),
    };
    let mut differential = TableData2D::default();
    for &e in &energies {
        for j in 0..11 {
            let z = 0.1 * j as f64;
            differential.x.push(e);
            differential.y.push(z);
            differential.f.push(1e-10 * e * (2.0 - z));
        }
    }
    (
        Arc::new(Interpolator1D::new(&total).unwrap()),
        Arc::new(Interpolator2D::new(&differential).unwrap()),
    )
}

pub fn dipole_model(hnl_mass: f64) -> DipoleFromTable {
    let mut params = DipoleParameters::new(hnl_mass);
    params.target_masses.insert(CARBON, CARBON_MASS);
    let mut model = DipoleFromTable::new(params).unwrap();
    let (total, differential) = dipole_tables();
    model.add_total_cross_section(CARBON, total);
    model.add_differential_cross_section(CARBON, differential);
    model
}

/// Record with a moving (or resting) target, primary along `direction`.
pub fn record(
    signature: InteractionSignature,
    primary_mass: f64,
    energy: f64,
    direction: [f64; 3],
    target_mass: f64,
    target_p: [f64; 3],
) -> InteractionRecord {
    let mut record = InteractionRecord::new(signature)
        .with_primary(primary_mass, energy, direction)
        .with_target_at_rest(target_mass);
    let p2 = target_p.iter().map(|c| c * c).sum::<f64>();
    record.target_momentum = [
        (target_mass * target_mass + p2).sqrt(),
        target_p[0],
        target_p[1],
        target_p[2],
    ];
    record.primary_helicity = -0.5;
    record.target_helicity = 0.5;
    record
}

pub fn assert_conserves_momentum(record: &InteractionRecord) {
    let initial = record.total_initial_momentum();
    let final_ = record.total_secondary_momentum();
    let scale = initial[0].abs();
    for k in 0..4 {
        assert!(
            (initial[k] - final_[k]).abs() <= 1e-6 * scale,
            "component {k}: {initial:?} vs {final_:?}"
        );
    }
}
