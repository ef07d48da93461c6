use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use evgen_core::constants::ISOSCALAR_MASS;
use evgen_core::{InteractionRecord, ParticleType, RngHandle};
use evgen_math::SplineTable;
use evgen_xs::{sample_final_states, DisFromSpline, DisParameters, DummyCrossSection, InteractionModel};

fn clamped_knots(lo: f64, hi: f64, intervals: usize) -> Vec<f64> {
    let mut knots = vec![lo];
    knots.extend((0..=intervals).map(|i| lo + (hi - lo) * i as f64 / intervals as f64));
    knots.push(hi);
    knots
}

fn dis_model() -> DisFromSpline {
    let energy = clamped_knots(0.0, 6.0, 12);
    let fraction = clamped_knots(-6.0, 0.0, 12);
    let n = (energy.len() - 2) * (fraction.len() - 2) * (fraction.len() - 2);
    let differential =
        SplineTable::new(vec![energy.clone(), fraction.clone(), fraction], vec![1; 3], vec![-38.0; n])
            .unwrap();
    let total = SplineTable::new(vec![energy], vec![1], vec![-36.0; 13]).unwrap();
    let params = DisParameters {
        primaries: vec![ParticleType::NU_MU],
        targets: vec![ParticleType::NUCLEON],
        ..DisParameters::default()
    };
    DisFromSpline::new(Arc::new(differential), Arc::new(total), params).unwrap()
}

fn sample_bench(c: &mut Criterion) {
    let model = dis_model();
    let signature = model.possible_signatures()[0].clone();
    let record = InteractionRecord::new(signature)
        .with_primary(0.0, 1e3, [0.0, 0.0, 1.0])
        .with_target_at_rest(ISOSCALAR_MASS);

    c.bench_function("dis_sample_final_state", |b| {
        let mut rng = RngHandle::from_seed(42);
        b.iter(|| {
            let mut rec = record.clone();
            model.sample_final_state(&mut rec, &mut rng).unwrap();
            black_box(model.final_state_probability(&rec));
        });
    });

    let dummy = DummyCrossSection::new();
    let dummy_signature = dummy.possible_signatures()[0].clone();
    let dummy_record = InteractionRecord::new(dummy_signature)
        .with_primary(0.0, 1e3, [0.0, 0.0, 1.0])
        .with_target_at_rest(ISOSCALAR_MASS);
    c.bench_function("dummy_batch_4k", |b| {
        b.iter(|| {
            let mut records = vec![dummy_record.clone(); 4_096];
            black_box(sample_final_states(&dummy, &mut records, 7));
        });
    });
}

criterion_group!(benches, sample_bench);
criterion_main!(benches);
