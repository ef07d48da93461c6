mod common;

use common::{assert_conserves_momentum, charged_current_dis, dipole_model, record, CARBON, CARBON_MASS};
use evgen_core::constants::{ELECTRON_MASS, ISOSCALAR_MASS};
use evgen_core::{ParticleType, RngHandle};
use evgen_xs::{DummyCrossSection, ElasticScattering, InteractionModel};
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-1.0f64..1.0).prop_filter("non-zero direction", |d| {
        d.iter().map(|c| c * c).sum::<f64>() > 1e-3
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn dis_samples_conserve_four_momentum(
        seed in any::<u64>(),
        energy in 5.0f64..1e5,
        dir in direction(),
        target_p in prop::array::uniform3(-3.0f64..3.0),
    ) {
        let model = charged_current_dis();
        let signature = model.possible_signatures()[0].clone();
        let mut record = record(signature, 0.0, energy, dir, ISOSCALAR_MASS, target_p);
        let mut rng = RngHandle::from_seed(seed);
        model.sample_final_state(&mut record, &mut rng).unwrap();
        assert_conserves_momentum(&record);
        prop_assert_eq!(record.interaction_parameters.len(), 3);
        prop_assert_eq!(record.secondary_helicities[0], record.primary_helicity);
        prop_assert_eq!(record.secondary_helicities[1], record.target_helicity);
    }

    #[test]
    fn dis_secondaries_stay_on_shell_for_moving_targets(
        seed in any::<u64>(),
        energy in 5.0f64..1e5,
        dir in direction(),
        target_p in prop::array::uniform3(-3.0f64..3.0),
    ) {
        let model = charged_current_dis();
        let signature = model.possible_signatures()[0].clone();
        let mut record = record(signature, 0.0, energy, dir, ISOSCALAR_MASS, target_p);
        let mut rng = RngHandle::from_seed(seed);
        model.sample_final_state(&mut record, &mut rng).unwrap();
        let scale = record.primary_momentum[0] + record.target_momentum[0];
        for (p, mass) in record.secondary_momenta.iter().zip(&record.secondary_masses) {
            let m2 = p[0] * p[0] - p[1] * p[1] - p[2] * p[2] - p[3] * p[3];
            // rounding in E^2 - |p|^2 grows with the incoming energy
            let tolerance = 1e-12 * scale * scale + 1e-9;
            prop_assert!(
                (m2 - mass * mass).abs() <= tolerance,
                "m^2 = {} for mass {} at E = {}", m2, mass, p[0]
            );
        }
        prop_assert!(record.secondary_masses[1] >= ISOSCALAR_MASS * (1.0 - 1e-9));
    }

    #[test]
    fn dummy_samples_conserve_four_momentum(
        seed in any::<u64>(),
        energy in 1.0f64..1e6,
        dir in direction(),
        target_p in prop::array::uniform3(-10.0f64..10.0),
    ) {
        let model = DummyCrossSection::new();
        let signature = model
            .possible_signatures_from_parents(ParticleType::NU_TAU_BAR, ParticleType::NUCLEON)[0]
            .clone();
        let mut record = record(signature, 0.0, energy, dir, ISOSCALAR_MASS, target_p);
        let mut rng = RngHandle::from_seed(seed);
        model.sample_final_state(&mut record, &mut rng).unwrap();
        assert_conserves_momentum(&record);
    }

    #[test]
    fn elastic_samples_conserve_four_momentum(
        seed in any::<u64>(),
        energy in 0.01f64..1e3,
        dir in direction(),
        flavour in prop::sample::select(vec![ParticleType::NU_E, ParticleType::NU_MU]),
    ) {
        let model = ElasticScattering::new();
        let signature = model.possible_signatures_from_parents(flavour, ParticleType::E_MINUS)[0].clone();
        let mut record = record(signature, 0.0, energy, dir, ELECTRON_MASS, [0.0; 3]);
        let mut rng = RngHandle::from_seed(seed);
        model.sample_final_state(&mut record, &mut rng).unwrap();
        assert_conserves_momentum(&record);
        let y = record.interaction_parameters[1];
        prop_assert!((0.0..=ElasticScattering::maximum_y(energy)).contains(&y));
        prop_assert!(model.differential_cross_section(&record) > 0.0);
    }

    #[test]
    fn dipole_samples_conserve_four_momentum(
        seed in any::<u64>(),
        energy in 0.3f64..15.0,
        dir in direction(),
        target_p in prop::array::uniform3(-1.0f64..1.0),
    ) {
        let model = dipole_model(0.1);
        let signature = model
            .possible_signatures_from_parents(ParticleType::NU_MU, CARBON)[0]
            .clone();
        let mut record = record(signature, 0.0, energy, dir, CARBON_MASS, target_p);
        let mut rng = RngHandle::from_seed(seed);
        model.sample_final_state(&mut record, &mut rng).unwrap();
        assert_conserves_momentum(&record);
        prop_assert!((record.secondary_masses[0] - 0.1).abs() < 1e-12);
        prop_assert!(model.final_state_probability(&record) > 0.0);
    }
}

#[test]
fn dis_outgoing_lepton_is_on_shell() {
    let model = charged_current_dis();
    let signature = model.possible_signatures()[0].clone();
    let mut record = record(signature, 0.0, 100.0, [0.0, 0.0, 1.0], ISOSCALAR_MASS, [0.0; 3]);
    let mut rng = RngHandle::from_seed(11);
    for _ in 0..50 {
        model.sample_final_state(&mut record, &mut rng).unwrap();
        let p = record.secondary_momenta[0];
        let m2 = p[0] * p[0] - p[1] * p[1] - p[2] * p[2] - p[3] * p[3];
        assert!((m2.max(0.0).sqrt() - record.secondary_masses[0]).abs() < 1e-6);
    }
}
