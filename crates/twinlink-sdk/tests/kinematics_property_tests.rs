//! 属性测试：运动学、映射器、规划器与调节器
//!
//! 覆盖随机输入下必须成立的不变量。

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::f64::consts::PI;
use twinlink_sdk::prelude::*;

fn angles(a: f64, b: f64) -> JointArray<Rad> {
    JointArray::new([Rad(a), Rad(b)])
}

proptest! {
    #[test]
    fn prop_pose_inverse_is_identity(
        theta in -PI..PI,
        x in -5.0..5.0f64,
        y in -5.0..5.0f64,
    ) {
        let p = Pose2::new(theta, Vector2::new(x, y));
        let id = p * p.inverse();
        prop_assert!(id.translation().norm() < 1e-12);
        prop_assert!(id.angle().sin().abs() < 1e-12);
        prop_assert!((id.angle().cos() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn prop_evaluate_is_deterministic(a in -PI..PI, b in -PI..PI) {
        let model = KinematicModel::default();
        let s1 = model.evaluate(angles(a, b), Vector2::zeros());
        let s2 = model.evaluate(angles(a, b), Vector2::zeros());
        prop_assert_eq!(s1, s2);
    }

    #[test]
    fn prop_reach_bounded_by_two_links(a in -PI..PI, b in -PI..PI, l in 0.0..2.0f64) {
        let model = KinematicModel::new(l).unwrap();
        let state = model.evaluate(angles(a, b), Vector2::zeros());
        prop_assert!(state.output.translation().norm() <= 2.0 * l + 1e-12);
    }

    #[test]
    fn prop_sensitivity_matches_finite_difference(a in -PI..PI, b in -PI..PI) {
        let model = KinematicModel::default();
        let base = Vector2::new(0.1, -0.2);
        let state = model.evaluate(angles(a, b), base);
        let h = 1e-6;

        for joint in Joint::ALL {
            let mut plus = angles(a, b);
            let mut minus = angles(a, b);
            plus[joint] = plus[joint] + Rad(h);
            minus[joint] = minus[joint] - Rad(h);
            let ep = model.evaluate(plus, base).output.translation();
            let em = model.evaluate(minus, base).output.translation();
            let fd = (ep - em) / (2.0 * h);
            prop_assert!((fd - state.sensitivities[joint]).norm() < 1e-6);
        }
    }

    #[test]
    fn prop_mapper_exact_for_independent_columns(
        v0x in -2.0..2.0f64, v0y in -2.0..2.0f64,
        v1x in -2.0..2.0f64, v1y in -2.0..2.0f64,
        c0 in -2.5..2.5f64, c1 in -2.5..2.5f64,
    ) {
        let det = v0x * v1y - v0y * v1x;
        prop_assume!(det.abs() > 0.1);

        let v0 = Vector2::new(v0x, v0y);
        let v1 = Vector2::new(v1x, v1y);
        let target = c0 * v0 + c1 * v1;

        let mapper = CartesianToJointMapper::default();
        let solved = mapper.solve(&JointArray::new([v0, v1]), target);
        prop_assert!((solved[Joint::Shoulder] - c0).abs() < 1e-8);
        prop_assert!((solved[Joint::Elbow] - c1).abs() < 1e-8);
    }

    #[test]
    fn prop_mapper_commands_clamped_exactly(
        v0x in -2.0..2.0f64, v0y in -2.0..2.0f64,
        v1x in -2.0..2.0f64, v1y in -2.0..2.0f64,
        c0 in -10.0..10.0f64, c1 in -10.0..10.0f64,
    ) {
        let det = v0x * v1y - v0y * v1x;
        prop_assume!(det.abs() > 0.1);

        let sens = JointArray::new([Vector2::new(v0x, v0y), Vector2::new(v1x, v1y)]);
        let error = c0 * sens[Joint::Shoulder] + c1 * sens[Joint::Elbow];

        // dt = 0：积分不变，T = Kp·e = e
        let mut mapper = CartesianToJointMapper::default();
        let mapping = mapper.map(error, Vector2::zeros(), &sens, 0.0);

        for (joint, expected) in [(Joint::Shoulder, c0), (Joint::Elbow, c1)] {
            let cmd = mapping.commands[joint].0;
            prop_assert!(cmd.abs() <= 3.0);
            if expected > 3.0 + 1e-6 {
                prop_assert_eq!(cmd, 3.0);
            } else if expected < -3.0 - 1e-6 {
                prop_assert_eq!(cmd, -3.0);
            } else {
                prop_assert!((cmd - expected).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn prop_singular_configuration_stays_finite(a in -PI..PI, ex in -1.0..1.0f64, ey in -1.0..1.0f64) {
        // θ1 = 0：两根连杆共线，两列平行
        let model = KinematicModel::default();
        let state = model.evaluate(angles(a, 0.0), Vector2::zeros());
        let mut mapper = CartesianToJointMapper::default();
        let mapping = mapper.map(Vector2::new(ex, ey), Vector2::zeros(), &state.sensitivities, 0.001);
        prop_assert!(mapping.commands.iter().all(|c| c.is_finite() && c.abs().0 <= 3.0));
        prop_assert!(mapping.residual.is_finite());
    }

    #[test]
    fn prop_planner_sides_are_mirrored(t in 0.0..60.0f64) {
        let planner = TargetPlanner::default();
        let left = planner.target(t, ArmSide::Left);
        let right = planner.target(t, ArmSide::Right);
        prop_assert!((left.x + right.x).abs() < 1e-12 || t > 10.0);
        prop_assert_eq!(left.y, right.y);
        // 两侧差值恒为横向偏移的两倍
        prop_assert!((right.x - left.x - 0.7).abs() < 1e-12);
    }

    #[test]
    fn prop_planner_height_bounded(t in 0.0..1000.0f64) {
        let planner = TargetPlanner::default();
        let target = planner.target(t, ArmSide::Right);
        // 斜坡上限 1.3，轨道 y 偏移范围 [-0.4, 0]
        prop_assert!(target.y >= 0.7 - 1e-12);
        prop_assert!(target.y <= 1.3 + 1e-12);
    }
}

#[test]
fn test_regulator_reset_is_exact_after_random_steps() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut regulator = CascadeRegulator::default();

    for _ in 0..500 {
        let feedback = JointFeedback::new(
            Rad(rng.gen_range(-PI..PI)),
            RadPerSec(rng.gen_range(-5.0..5.0)),
        );
        regulator.set_speed2_target(RadPerSec(rng.gen_range(-3.0..3.0)));
        let torque = regulator.step(feedback, rng.gen_range(1e-4..1e-2));
        assert!(torque.is_finite());
    }

    regulator.reset();
    let state = regulator.state();
    assert_eq!(state.position_target, Rad::ZERO);
    assert_eq!(state.speed_target, RadPerSec::ZERO);
    assert_eq!(state.speed2_target, RadPerSec(0.05));
    assert_eq!(state.position_integral, 0.0);
    assert_eq!(state.speed_integral, 0.0);
    assert_eq!(state.torque, NewtonMeter::ZERO);
}

#[test]
fn test_home_configuration_reaches_same_point_on_both_sides() {
    let model = KinematicModel::default();
    let left = model.evaluate(ArmSide::Left.home_angles(), Vector2::zeros());
    let right = model.evaluate(ArmSide::Right.home_angles(), Vector2::zeros());

    let expected = Vector2::new(0.0, 0.8 * 2.0_f64.sqrt());
    assert_abs_diff_eq!(left.output.translation(), expected, epsilon = 1e-12);
    assert_abs_diff_eq!(right.output.translation(), expected, epsilon = 1e-12);
}
