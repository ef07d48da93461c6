use evgen_math::{azimuthal_rotation, rotation_between, Boost, FourVector};
use nalgebra::Vector3;
use proptest::prelude::*;

fn assert_close(a: &FourVector, b: &FourVector, scale: f64) {
    let diff = (a.e - b.e).abs().max((a.p - b.p).norm());
    assert!(diff <= 1e-9 * scale, "{a:?} vs {b:?}");
}

fn massive(mass: f64, p: [f64; 3]) -> FourVector {
    let p = Vector3::new(p[0], p[1], p[2]);
    FourVector::from_parts((mass * mass + p.norm_squared()).sqrt(), p)
}

#[test]
fn rest_and_lab_boosts_are_inverse() {
    let frame = massive(0.938, [1.0, -2.0, 30.0]);
    let v = massive(0.1, [0.3, 0.2, -5.0]);
    let to_rest = Boost::rest_frame_of(&frame);
    let back = Boost::lab_frame_of(&frame);
    assert_close(&back.apply(&to_rest.apply(&v)), &v, v.e);
    assert_close(&to_rest.inverse().apply(&to_rest.apply(&v)), &v, v.e);
}

#[test]
fn rotation_maps_x_axis_onto_direction() {
    let direction = Vector3::new(0.3, -0.4, 0.866);
    let rotation = rotation_between(&Vector3::x(), &direction);
    let mapped = rotation * Vector3::x();
    assert!((mapped - direction.normalize()).norm() < 1e-12);
    let spun = azimuthal_rotation(&direction, 1.2) * direction;
    assert!((spun - direction).norm() < 1e-12);
}

#[test]
fn minkowski_products() {
    let a = FourVector::new(5.0, 1.0, 2.0, 3.0);
    let b = FourVector::new(2.0, 0.0, 1.0, -1.0);
    assert_eq!(a.dot(&b), 10.0 - (0.0 + 2.0 - 3.0));
    assert_eq!((a + b).to_array(), [7.0, 1.0, 3.0, 2.0]);
    assert_eq!((a - b).to_array(), [3.0, 1.0, 1.0, 4.0]);
    assert_eq!(FourVector::from_array(a.to_array()), a);
}

proptest! {
    #[test]
    fn boost_round_trip_reproduces_vector(
        frame in prop::array::uniform3(-50.0f64..50.0),
        frame_mass in 0.1f64..10.0,
        v in prop::array::uniform3(-20.0f64..20.0),
        mass in 0.0f64..5.0,
    ) {
        let frame = massive(frame_mass, frame);
        let v = massive(mass, v);
        let boost = Boost::rest_frame_of(&frame);
        let round = boost.inverse().apply(&boost.apply(&v));
        let scale = v.e * boost.gamma() * boost.gamma();
        assert_close(&round, &v, scale);
    }

    #[test]
    fn boosts_preserve_invariant_mass(
        frame in prop::array::uniform3(-50.0f64..50.0),
        v in prop::array::uniform3(-20.0f64..20.0),
        mass in 0.1f64..5.0,
    ) {
        let frame = massive(1.0, frame);
        let v = massive(mass, v);
        let boosted = Boost::rest_frame_of(&frame).apply(&v);
        let scale = boosted.e * boosted.e;
        prop_assert!((boosted.mass_squared() - mass * mass).abs() <= 1e-9 * scale.max(1.0));
    }
}
