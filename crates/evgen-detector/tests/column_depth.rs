use evgen_detector::{
    CartesianAxis1D, ConstantDistribution1D, DensityDistribution, DensityDistribution1D,
    ExponentialDistribution1D, PolynomialDistribution1D, RadialAxis1D, NO_VALID_DISTANCE,
};
use nalgebra::Vector3;
use proptest::prelude::*;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * b.abs().max(1.0)
}

fn uniform(rho: f64) -> DensityDistribution1D<RadialAxis1D, ConstantDistribution1D> {
    DensityDistribution1D::new(RadialAxis1D::default(), ConstantDistribution1D::new(rho))
}

fn linear_slab() -> DensityDistribution1D<CartesianAxis1D, PolynomialDistribution1D> {
    DensityDistribution1D::new(
        CartesianAxis1D::default(),
        PolynomialDistribution1D::from_coefficients(vec![1.0, 0.5]),
    )
}

#[test]
fn unit_density_scenario() {
    init_logging();
    let density = uniform(1.0);
    let origin = Vector3::zeros();
    let up = Vector3::z();
    assert_eq!(density.integral(&origin, &up, 10.0), 10.0);
    assert_eq!(density.inverse_integral(&origin, &up, 10.0, 20.0), 10.0);
    assert!(density.inverse_integral(&origin, &up, 25.0, 20.0) < 0.0);
    assert_eq!(density.inverse_integral_unbounded(&origin, &up, 25.0), 25.0);
    assert_eq!(density.derivative(&origin, &up), 0.0);
}

#[test]
fn inverse_rejects_degenerate_requests() {
    let density = uniform(2.0);
    let origin = Vector3::zeros();
    let up = Vector3::z();
    assert_eq!(density.inverse_integral(&origin, &up, 0.0, 5.0), 0.0);
    assert_eq!(density.inverse_integral(&origin, &up, -1.0, 5.0), NO_VALID_DISTANCE);
    assert_eq!(density.inverse_integral(&origin, &up, f64::NAN, 5.0), NO_VALID_DISTANCE);
    assert_eq!(uniform(0.0).inverse_integral(&origin, &up, 1.0, 5.0), NO_VALID_DISTANCE);
    assert_eq!(density.integral_between(&origin, &origin), 0.0);
}

#[test]
fn cartesian_polynomial_uses_the_antiderivative() {
    let density = linear_slab();
    let origin = Vector3::zeros();
    let oblique = Vector3::new(0.6, 0.0, 0.8);
    assert!(close(density.integral(&origin, &Vector3::z(), 4.0), 8.0, 1e-12));
    assert!(close(density.integral(&origin, &oblique, 5.0), 10.0, 1e-12));
    assert!(close(
        density.integral_between(&origin, &Vector3::new(3.0, 0.0, 4.0)),
        10.0,
        1e-12
    ));
    assert!(close(density.inverse_integral(&origin, &oblique, 10.0, 10.0), 5.0, 1e-5));
    assert!(close(density.inverse_integral_unbounded(&origin, &oblique, 10.0), 5.0, 1e-5));
    assert_eq!(density.inverse_integral(&origin, &oblique, 10.0, 4.0), NO_VALID_DISTANCE);
    assert!(close(density.derivative(&Vector3::new(0.0, 0.0, 2.0), &oblique), 0.4, 1e-12));

    let p1 = Vector3::new(0.0, 1.0, 1.0);
    let p2 = Vector3::new(0.0, 1.0, 3.0);
    let difference = density.antiderivative(&p2, &Vector3::z()) - density.antiderivative(&p1, &Vector3::z());
    assert!(close(difference, density.integral_between(&p1, &p2), 1e-12));
}

#[test]
fn ray_across_the_gradient_sees_a_uniform_density() {
    let density = linear_slab();
    let start = Vector3::new(0.0, 0.0, 3.0);
    let across = Vector3::x();
    assert!(close(density.integral(&start, &across, 4.0), 10.0, 1e-12));
    assert!(close(density.inverse_integral(&start, &across, 5.0, 10.0), 2.0, 1e-12));
    assert_eq!(density.inverse_integral(&start, &across, 50.0, 10.0), NO_VALID_DISTANCE);
}

#[test]
fn decaying_exponential_has_finite_reach() {
    init_logging();
    let density = DensityDistribution1D::new(
        CartesianAxis1D::default(),
        ExponentialDistribution1D::new(2.0).unwrap(),
    );
    let origin = Vector3::zeros();
    let down = -Vector3::z();
    let depth = density.integral(&origin, &down, 6.0);
    assert!(close(depth, 2.0 * (1.0 - (-3.0f64).exp()), 1e-12));
    let expected = 2.0 * 4f64.ln();
    assert!(close(density.inverse_integral(&origin, &down, 1.5, 100.0), expected, 1e-5));
    assert!(close(density.inverse_integral_unbounded(&origin, &down, 1.5), expected, 1e-5));
    assert_eq!(density.inverse_integral_unbounded(&origin, &down, 2.5), NO_VALID_DISTANCE);
}

#[test]
fn growing_exponential_inverse_stays_inside_overflow() {
    init_logging();
    let density = DensityDistribution1D::new(
        CartesianAxis1D::default(),
        ExponentialDistribution1D::new(1.0).unwrap(),
    );
    let origin = Vector3::zeros();
    let up = Vector3::z();
    // depth over d is e^d - 1, which overflows well before the limits below
    assert!(close(density.inverse_integral(&origin, &up, 1.5, 1000.0), 2.5f64.ln(), 1e-5));
    let deep = (1e300f64 + 1.0).ln();
    let bounded = density.inverse_integral(&origin, &up, 1e300, 1e6);
    assert!(close(bounded, deep, 1e-6), "{bounded}");
    let unbounded = density.inverse_integral_unbounded(&origin, &up, 1e300);
    assert!(close(unbounded, deep, 1e-6), "{unbounded}");
    assert_eq!(density.inverse_integral(&origin, &up, 1e300, 600.0), NO_VALID_DISTANCE);
}

#[test]
fn radial_polynomial_goes_through_quadrature() {
    let density = DensityDistribution1D::new(
        RadialAxis1D::default(),
        PolynomialDistribution1D::from_coefficients(vec![2.0, 1.0]),
    );
    let origin = Vector3::zeros();
    let direction = Vector3::new(0.0, 0.6, 0.8);
    assert!(close(density.integral(&origin, &direction, 4.0), 16.0, 1e-6));
    assert!(close(density.inverse_integral(&origin, &direction, 16.0, 10.0), 4.0, 1e-5));
    assert!(close(density.inverse_integral_unbounded(&origin, &direction, 16.0), 4.0, 1e-5));
    assert!(density.inverse_integral(&origin, &direction, 16.0, 3.0) < 0.0);

    let p = Vector3::new(0.0, 3.0, 4.0);
    assert_eq!(density.evaluate(&p), 7.0);
    assert!(close(density.derivative(&p, &Vector3::z()), 0.8, 1e-12));
}

#[test]
fn radial_antiderivative_differences_match_segment_integrals() {
    let density = DensityDistribution1D::new(
        RadialAxis1D::default(),
        PolynomialDistribution1D::from_coefficients(vec![1.0, 0.0, 0.25]),
    );
    let up = Vector3::z();
    let p1 = Vector3::new(0.0, 3.0, -4.0);
    let p2 = Vector3::new(0.0, 3.0, 4.0);
    let difference = density.antiderivative(&p2, &up) - density.antiderivative(&p1, &up);
    // rho = 1 + (9 + t^2) / 4 integrated over t in [-4, 4]
    let exact = 8.0 + (9.0 * 8.0 + 128.0 / 3.0) / 4.0;
    assert!(close(difference, exact, 1e-6));
    assert!(close(density.integral_between(&p1, &p2), exact, 1e-6));
}

#[test]
fn radial_exponential_reports_unreachable_depth() {
    let density = DensityDistribution1D::new(
        RadialAxis1D::default(),
        ExponentialDistribution1D::new(-1.0).unwrap(),
    );
    let origin = Vector3::zeros();
    let up = Vector3::z();
    assert!(close(density.inverse_integral(&origin, &up, 0.5, 10.0), 2f64.ln(), 1e-5));
    assert_eq!(density.inverse_integral(&origin, &up, 1.5, 10.0), NO_VALID_DISTANCE);
}

#[test]
fn densities_work_behind_trait_objects() {
    let fields: Vec<Box<dyn DensityDistribution>> = vec![
        Box::new(uniform(1.0)),
        Box::new(linear_slab()),
        Box::new(DensityDistribution1D::new(
            RadialAxis1D::new(Vector3::new(0.0, 0.0, -10.0)),
            ConstantDistribution1D::new(1.0),
        )),
    ];
    let origin = Vector3::zeros();
    for field in &fields {
        let depth = field.integral(&origin, &Vector3::z(), 2.0);
        let back = field.inverse_integral(&origin, &Vector3::z(), depth, 10.0);
        assert!(close(back, 2.0, 1e-5), "{field:?}");
    }
}

#[test]
fn descriptions_round_trip_through_json() {
    let density = DensityDistribution1D::new(
        CartesianAxis1D::new(Vector3::x(), Vector3::new(1.0, 2.0, 3.0)),
        ExponentialDistribution1D::with_amplitude(4.0, 2.0).unwrap(),
    );
    let json = serde_json::to_string(&density).unwrap();
    let back: DensityDistribution1D<CartesianAxis1D, ExponentialDistribution1D> =
        serde_json::from_str(&json).unwrap();
    assert_eq!(back, density);

    let polynomial: PolynomialDistribution1D = serde_json::from_str(r#"{"coefficients":[1.0,2.0]}"#).unwrap();
    assert_eq!(polynomial, PolynomialDistribution1D::from_coefficients(vec![1.0, 2.0]));

    let unit: ExponentialDistribution1D = serde_json::from_str(r#"{"sigma":3.0}"#).unwrap();
    assert_eq!(unit.amplitude(), 1.0);
    assert!(serde_json::from_str::<ExponentialDistribution1D>(r#"{"sigma":0.0}"#).is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn uniform_inverse_recovers_distance(rho in 0.01f64..100.0, length in 0.0f64..1e4) {
        let density = uniform(rho);
        let origin = Vector3::zeros();
        let depth = density.integral(&origin, &Vector3::x(), length);
        let back = density.inverse_integral(&origin, &Vector3::x(), depth, length * 1.001 + 1e-9);
        prop_assert!(close(back, length, 1e-9));
    }

    #[test]
    fn slab_inverse_recovers_distance(
        length in 0.1f64..20.0,
        theta in 0.05f64..1.5,
        z0 in -1.0f64..5.0,
    ) {
        let density = linear_slab();
        let start = Vector3::new(0.0, 0.0, z0);
        let direction = Vector3::new(theta.sin(), 0.0, theta.cos());
        let depth = density.integral(&start, &direction, length);
        let back = density.inverse_integral(&start, &direction, depth, 2.0 * length);
        prop_assert!(close(back, length, 1e-4), "{} vs {}", back, length);
    }
}
