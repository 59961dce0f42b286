//! Property-based tests for the physics step using proptest.
//!
//! These tests verify invariants of gravity, integration and propulsion
//! across a wide range of orbital parameters.

use bevy::math::DVec2;
use proptest::prelude::*;

use super::{
    advance_orbiter, apply_thrust, gravitational_acceleration, integrate_position,
    integrate_velocity, PhysicsConfig, MIN_SEPARATION,
};
use crate::body::{Orbiter, Spacecraft};
use crate::test_utils::{assertions, fixtures};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Gravity has magnitude GM/r² and points at the central body.
    #[test]
    fn prop_gravity_inverse_square_toward_center(
        angle in 0.0f64..std::f64::consts::TAU,
        distance in 6.5e6f64..4.0e8,
        cx in -1.0e7f64..1.0e7,
        cy in -1.0e7f64..1.0e7,
    ) {
        let field = fixtures::earth_field();
        let center = DVec2::new(cx, cy);
        let pos = center + DVec2::from_angle(angle) * distance;

        let acc = gravitational_acceleration(field.gm, center, pos, MIN_SEPARATION);

        let expected = field.gm / (distance * distance);
        let relative_error = ((acc.length() - expected) / expected).abs();
        prop_assert!(relative_error < 1e-9, "Magnitude error {:.3e}", relative_error);

        let toward_center = (center - pos).normalize();
        prop_assert!(acc.normalize().dot(toward_center) > 1.0 - 1e-9);
    }

    /// Position always integrates with the freshly updated velocity.
    #[test]
    fn prop_semi_implicit_order(
        px in -1.0e8f64..1.0e8, py in -1.0e8f64..1.0e8,
        vx in -1.0e4f64..1.0e4, vy in -1.0e4f64..1.0e4,
        ax in -10.0f64..10.0, ay in -10.0f64..10.0,
        dt in 0.0f64..50.0,
    ) {
        let pos = DVec2::new(px, py);
        let vel = DVec2::new(vx, vy);
        let acc = DVec2::new(ax, ay);

        let v_new = integrate_velocity(vel, acc, dt);
        let p_new = integrate_position(pos, v_new, dt);

        prop_assert_eq!(v_new, vel + acc * dt);
        prop_assert_eq!(p_new, pos + (vel + acc * dt) * dt);
    }

    /// Semi-implicit Euler conserves angular momentum under a central force.
    #[test]
    fn prop_angular_momentum_conservation(
        altitude in 2.0e5f64..3.0e7,
        speed_factor in 0.9f64..1.1,
    ) {
        let field = fixtures::earth_field();
        let config = PhysicsConfig::default();
        let mut state = fixtures::circular_orbit(altitude);
        state.vel *= speed_factor;
        let mut orbiter = Orbiter::new(1.0);
        let initial_l = assertions::angular_momentum(&state);

        for _ in 0..2000 {
            advance_orbiter(&mut state, &mut orbiter, None, None, field, 1.0, &config);
        }

        let drift = ((assertions::angular_momentum(&state) - initial_l) / initial_l).abs();
        prop_assert!(drift < 1e-9, "Angular momentum drift {:.3e}", drift);
    }

    /// Propellant never increases, never goes negative, and firing stops at empty.
    #[test]
    fn prop_propellant_bounds(
        dry_mass in 10.0f64..10_000.0,
        propellant in 0.1f64..5_000.0,
        specific_impulse in 100.0f64..4_000.0,
        thrust in 1.0f64..100_000.0,
        dt in 0.01f64..50.0,
    ) {
        let mut craft = Spacecraft::new(dry_mass, propellant, specific_impulse, thrust);
        craft.firing = true;
        let mut vel = DVec2::ZERO;
        let mut previous = craft.propellant_mass;

        for _ in 0..500 {
            apply_thrust(&mut craft, &mut vel, dt);
            prop_assert!(craft.propellant_mass <= previous);
            prop_assert!(craft.propellant_mass >= 0.0);
            prop_assert!(craft.propellant_mass <= craft.propellant_mass_initial);
            prop_assert!(vel.is_finite());
            if craft.propellant_mass == 0.0 {
                prop_assert!(!craft.firing);
            }
            previous = craft.propellant_mass;
        }
    }
}
