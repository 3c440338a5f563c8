use fabrik_rs::{look_rotation, ConeConstraint, DirectionalPreference, FabrikChain, FabrikJoint, Pose, UpFacing};
use glam::Vec3A;

/// Chain laid out along +X with the root frame also facing +X.
fn chain_facing_x() -> FabrikChain {
    let root = Pose::new(Vec3A::ZERO, look_rotation(Vec3A::X, Vec3A::Y));
    let mut joints = vec![
        FabrikJoint::new(Vec3A::ZERO),
        FabrikJoint::new(Vec3A::new(1.0, 0.0, 0.0)),
        FabrikJoint::new(Vec3A::new(2.0, 0.0, 0.0)),
    ];
    for joint in joints.iter_mut() {
        joint.set_rotation(look_rotation(Vec3A::X, Vec3A::Y));
    }
    return FabrikChain::new(root, joints).unwrap();
}

fn angle_between_deg(a: Vec3A, b: Vec3A) -> f32 {
    return a.normalize().dot(b.normalize()).clamp(-1.0, 1.0).acos().to_degrees();
}

#[test]
fn test_cone_bounds_base_link() {
    let mut chain = chain_facing_x();
    chain.joints_mut()[0].set_constrain_rotation(true);
    chain.joints_mut()[0].set_cone(ConeConstraint::symmetric(30.0));

    // pull the chain straight up, 90 degrees off the allowed cone
    chain.set_target(Pose::from_position(Vec3A::new(0.0, 2.0, 0.0)));
    chain.solve();

    let positions = chain.positions();
    let first_link = positions[1] - positions[0];
    assert!(angle_between_deg(first_link, Vec3A::X) <= 30.5);
    assert!((first_link.length() - 1.0).abs() < 1e-3);

    // the constrained chain cannot reach, which is not an error
    assert!(!chain.reached());
    assert_eq!(chain.iterations(), chain.max_iterations());
    for position in positions {
        assert!(position.is_finite());
    }
}

#[test]
fn test_cone_keeps_links_at_length() {
    let mut chain = chain_facing_x();
    for joint in chain.joints_mut() {
        joint.set_constrain_rotation(true);
        joint.set_cone(ConeConstraint::new(20.0, 45.0, 60.0, 60.0));
    }

    chain.set_target(Pose::from_position(Vec3A::new(1.0, 1.2, -0.3)));
    chain.solve();

    let positions = chain.positions();
    for i in 0..positions.len() - 1 {
        let length = positions[i + 1].distance(positions[i]);
        let expected = chain.joints()[i].downstream_distance();
        assert!((length - expected).abs() < 1e-3);
    }
}

#[test]
fn test_in_cone_targets_unaffected_by_constraint() {
    // a wide cone never triggers for a target near the forward axis
    let mut constrained = chain_facing_x();
    for joint in constrained.joints_mut() {
        joint.set_constrain_rotation(true);
        joint.set_cone(ConeConstraint::symmetric(85.0));
    }
    let mut free = chain_facing_x();

    let target = Pose::from_position(Vec3A::new(1.6, 0.4, 0.0));
    constrained.set_target(target);
    free.set_target(target);
    constrained.solve();
    free.solve();

    assert!(constrained.reached());
    assert!(free.reached());
    for (a, b) in constrained.positions().iter().zip(free.positions()) {
        assert!(a.abs_diff_eq(*b, 1e-4));
    }
}

#[test]
fn test_preference_biases_elbow_toward_forward() {
    let target = Pose::from_position(Vec3A::new(1.0, 1.0, 0.0));

    let mut biased = chain_facing_x();
    biased.joints_mut()[0].set_preference(Some(DirectionalPreference::new(Vec3A::Z, 0.6)));
    biased.set_target(target);

    let mut free = chain_facing_x();
    free.set_target(target);

    // one cycle each, then compare how far the elbow strays off the root axis
    biased.backward();
    biased.forward();
    biased.commit();
    free.backward();
    free.forward();
    free.commit();

    // the preferred local forward is the root's forward (+X in world)
    let biased_angle = angle_between_deg(biased.positions()[1], Vec3A::X);
    let free_angle = angle_between_deg(free.positions()[1], Vec3A::X);
    assert!(biased_angle < free_angle - 1e-3);
}

#[test]
fn test_preference_still_converges() {
    let mut chain = chain_facing_x();
    chain.joints_mut()[0].set_preference(Some(DirectionalPreference::new(Vec3A::Z, 0.4)));
    chain.set_target(Pose::from_position(Vec3A::new(1.4, 0.7, 0.2)));

    chain.solve();

    assert!(chain.reached());
    let positions = chain.positions();
    for i in 0..positions.len() - 1 {
        let length = positions[i + 1].distance(positions[i]);
        assert!((length - chain.joints()[i].downstream_distance()).abs() < 1e-3);
    }
}

#[test]
fn test_up_facing_override() {
    let mut chain = chain_facing_x();
    chain.joints_mut()[0].set_up_facing(UpFacing::Override(Vec3A::Z));
    // keep the chain straight so the base link looks along +X
    chain.set_target(Pose::from_position(Vec3A::new(2.0, 0.0, 0.0)));

    chain.solve();
    chain.backward();
    chain.forward();
    chain.commit();

    let rotation = chain.joints()[0].rotation();
    assert!((rotation * Vec3A::Z).abs_diff_eq(Vec3A::X, 1e-4));
    assert!((rotation * Vec3A::Y).abs_diff_eq(Vec3A::Z, 1e-4));
}

#[test]
fn test_up_facing_interpolate_full_upstream() {
    let mut chain = chain_facing_x();
    chain.joints_mut()[0].set_up_facing(UpFacing::Interpolate { toward_upstream: 1.0 });
    chain.set_target(Pose::from_position(Vec3A::new(2.0, 0.0, 0.0)));

    chain.solve();
    chain.backward();
    chain.forward();
    chain.commit();

    // fully toward upstream reproduces the root's up vector
    let rotation = chain.joints()[0].rotation();
    assert!((rotation * Vec3A::Y).abs_diff_eq(Vec3A::Y, 1e-4));
}

#[test]
fn test_end_effector_matches_target_orientation() {
    let mut chain = chain_facing_x();
    chain.set_match_target_orientation(true);
    chain.set_target(Pose::new(
        Vec3A::new(1.8, 0.2, 0.0),
        look_rotation(Vec3A::X, Vec3A::Y),
    ));

    chain.solve();

    assert!(chain.reached());
    let end = &chain.joints()[chain.joints().len() - 1];
    let forward = end.rotation() * Vec3A::Z;
    assert!(angle_between_deg(forward, Vec3A::X) < 10.0);
}
