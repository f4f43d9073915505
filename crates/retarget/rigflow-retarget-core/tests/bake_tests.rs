use rigflow_retarget_core::{
    bake::{bake, BakeParams, PoseSampler},
    bind::bind_set,
    error::BakeError,
    mapping::BoneMapping,
    math::quat_from_euler,
    preset::load_preset_into,
    set::RetargetSet,
    skeleton::Skeleton,
    track::{CurveChannel, Interpolation, KeyValue},
    EvaluationContext,
};
use rigflow_test_fixtures as fixtures;

/// Drives the fixture source rig with a simple, frame-dependent motion.
struct SwaySampler;

impl PoseSampler for SwaySampler {
    fn apply_pose(&mut self, frame: i32, source: &mut Skeleton) {
        if let Some(pelvis) = source.bone_by_name_mut("Pelvis") {
            pelvis.pose.translation = [4.0, 0.0, 0.0];
            pelvis.pose.rotation_euler = [0.01 * frame as f32, 0.0, 0.0];
        }
        if let Some(spine) = source.bone_by_name_mut("Spine1") {
            spine.pose.rotation_euler = [0.0, 0.0, 0.02 * frame as f32];
        }
    }
}

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn bound_fixture() -> (RetargetSet, Skeleton, Skeleton, EvaluationContext) {
    let mut target = fixtures::target_skeleton();
    let source = fixtures::source_skeleton();
    let mut set = fixtures::basic_set();
    let mut ctx = EvaluationContext::new();
    bind_set(&mut set, &mut ctx, &mut target, &source).expect("fixture bind");
    (set, target, source, ctx)
}

/// it should key exactly the stepped frames for every enabled channel
#[test]
fn bake_keys_exact_frame_range() {
    let (mut set, mut target, mut source, mut ctx) = bound_fixture();
    let params = BakeParams {
        start_frame: 1,
        end_frame: 10,
        frame_step: 2,
        ..Default::default()
    };
    let track = bake(
        &mut set,
        &mut ctx,
        &mut target,
        &mut source,
        &mut SwaySampler,
        &params,
    )
    .expect("bake");

    assert!(!track.is_empty());
    for curve in &track.curves {
        let frames: Vec<i32> = curve.keys.iter().map(|k| k.frame).collect();
        assert_eq!(frames, vec![1, 3, 5, 7, 9], "curve {:?}", curve.channel);
    }
}

/// it should drop additional bones that do not exist on the target
#[test]
fn missing_additional_bone_is_dropped() {
    let (mut set, mut target, mut source, mut ctx) = bound_fixture();
    set.add_additional_bone("NoSuchBone");
    let params = BakeParams {
        start_frame: 1,
        end_frame: 4,
        ..Default::default()
    };
    let track = bake(
        &mut set,
        &mut ctx,
        &mut target,
        &mut source,
        &mut SwaySampler,
        &params,
    )
    .expect("bake succeeds without the unknown bone");
    assert!(track.curves.iter().all(|c| c.bone != "NoSuchBone"));
    assert!(track.curves.iter().any(|c| c.bone == "hips"));
}

/// it should bake unmapped additional bones at their own pose
#[test]
fn additional_bone_bakes_own_pose() {
    let (mut set, mut target, mut source, mut ctx) = bound_fixture();
    target.bone_by_name_mut("chest").unwrap().pose.translation = [0.3, 0.0, 0.0];
    set.add_additional_bone("chest");

    let params = BakeParams {
        start_frame: 1,
        end_frame: 3,
        ..Default::default()
    };
    let track = bake(
        &mut set,
        &mut ctx,
        &mut target,
        &mut source,
        &mut SwaySampler,
        &params,
    )
    .expect("bake");

    let curve = track
        .curve("chest", CurveChannel::Location)
        .expect("chest location curve");
    for key in &curve.keys {
        assert_eq!(key.value, KeyValue::Vec3([0.3, 0.0, 0.0]));
    }
}

/// it should reject an invalid frame range before touching anything
#[test]
fn invalid_frame_range_rejected() {
    let (mut set, mut target, mut source, mut ctx) = bound_fixture();
    for params in [
        BakeParams {
            start_frame: 10,
            end_frame: 10,
            ..Default::default()
        },
        BakeParams {
            start_frame: 1,
            end_frame: 10,
            frame_step: 0,
            ..Default::default()
        },
    ] {
        let err = bake(
            &mut set,
            &mut ctx,
            &mut target,
            &mut source,
            &mut SwaySampler,
            &params,
        )
        .unwrap_err();
        assert!(matches!(err, BakeError::InvalidFrameRange { .. }));
    }
    assert!(set.bound);
}

/// it should refuse to bake an unbound set
#[test]
fn bake_requires_bound_set() {
    let mut target = fixtures::target_skeleton();
    let mut source = fixtures::source_skeleton();
    let mut set = fixtures::basic_set();
    let mut ctx = EvaluationContext::new();
    let err = bake(
        &mut set,
        &mut ctx,
        &mut target,
        &mut source,
        &mut SwaySampler,
        &BakeParams::default(),
    )
    .unwrap_err();
    assert_eq!(err, BakeError::NotBound);
}

/// it should pin every inserted key to linear interpolation
#[test]
fn keys_are_linear_after_bake() {
    let (mut set, mut target, mut source, mut ctx) = bound_fixture();
    let params = BakeParams {
        start_frame: 1,
        end_frame: 5,
        ..Default::default()
    };
    let track = bake(
        &mut set,
        &mut ctx,
        &mut target,
        &mut source,
        &mut SwaySampler,
        &params,
    )
    .expect("bake");
    assert!(track
        .curves
        .iter()
        .flat_map(|c| c.keys.iter())
        .all(|k| k.interpolation == Interpolation::Linear));
}

/// it should restore the evaluation clock and the pre-bake pose
#[test]
fn clock_and_pose_restored_after_bake() {
    let (mut set, mut target, mut source, mut ctx) = bound_fixture();
    ctx.set_frame(7);
    target.bone_by_name_mut("hips").unwrap().pose.translation = [0.3, 0.0, 0.0];

    let params = BakeParams {
        start_frame: 1,
        end_frame: 5,
        ..Default::default()
    };
    bake(
        &mut set,
        &mut ctx,
        &mut target,
        &mut source,
        &mut SwaySampler,
        &params,
    )
    .expect("bake");

    assert_eq!(ctx.frame(), 7);
    assert_eq!(
        target.bone_by_name("hips").unwrap().pose.translation,
        [0.3, 0.0, 0.0]
    );
}

/// it should yield an empty track when nothing resolves into the bake set
#[test]
fn empty_bake_set_yields_empty_track() {
    let mut target = fixtures::target_skeleton();
    let mut source = fixtures::source_skeleton();
    let mut set = RetargetSet::new("TargetRig", "SourceRig").unwrap();
    let mut ctx = EvaluationContext::new();
    bind_set(&mut set, &mut ctx, &mut target, &source).expect("empty bind");

    let params = BakeParams {
        start_frame: 1,
        end_frame: 4,
        ..Default::default()
    };
    let track = bake(
        &mut set,
        &mut ctx,
        &mut target,
        &mut source,
        &mut SwaySampler,
        &params,
    )
    .expect("bake");
    assert!(track.is_empty());
    assert_eq!(track.key_count(), 0);
}

/// it should let mapping-derived flags win when a bone is listed twice
#[test]
fn mapping_flags_take_precedence_on_merge() {
    let mut target = fixtures::target_skeleton();
    let mut source = fixtures::source_skeleton();
    let mut set = RetargetSet::new("TargetRig", "SourceRig").unwrap();
    let mut mapping = BoneMapping::new("Bone.001", "hips", "Pelvis");
    mapping.location.enabled = false;
    set.add_mapping(mapping);
    // The additional entry asks for location; the mapping's flags still win.
    set.add_additional_bone("hips");

    let mut ctx = EvaluationContext::new();
    bind_set(&mut set, &mut ctx, &mut target, &source).expect("bind");
    let params = BakeParams {
        start_frame: 1,
        end_frame: 4,
        ..Default::default()
    };
    let track = bake(
        &mut set,
        &mut ctx,
        &mut target,
        &mut source,
        &mut SwaySampler,
        &params,
    )
    .expect("bake");

    assert!(track.curve("hips", CurveChannel::Location).is_none());
    assert!(track
        .curve("hips", CurveChannel::RotationQuaternion)
        .is_some());
}

/// it should capture the resolved copy-transform values, not the raw pose
#[test]
fn baked_values_capture_resolved_transform() {
    let (mut set, mut target, mut source, mut ctx) = bound_fixture();
    let params = BakeParams {
        start_frame: 1,
        end_frame: 3,
        ..Default::default()
    };
    let track = bake(
        &mut set,
        &mut ctx,
        &mut target,
        &mut source,
        &mut SwaySampler,
        &params,
    )
    .expect("bake");

    // Pelvis translation 4.0 on x, world-scale ratio 1/2 -> resolved 8.0.
    let loc = track
        .curve("hips", CurveChannel::Location)
        .expect("hips location curve");
    for key in &loc.keys {
        assert_eq!(key.value, KeyValue::Vec3([8.0, 0.0, 0.0]));
    }

    // hips is a quaternion-mode bone: rotation keys follow its mode.
    let rot = track
        .curve("hips", CurveChannel::RotationQuaternion)
        .expect("hips quaternion curve");
    let expected = quat_from_euler([0.01, 0.0, 0.0]);
    match rot.keys[0].value {
        KeyValue::Quat(q) => {
            for i in 0..4 {
                approx(q[i], expected[i], 1e-4);
            }
        }
        other => panic!("expected quaternion key, got {other:?}"),
    }

    // spine is Euler-mode: rotation keys stay Euler, at the shaped value.
    let rot = track
        .curve("spine", CurveChannel::RotationEuler)
        .expect("spine euler curve");
    for (key, frame) in rot.keys.iter().zip([1, 2, 3]) {
        match key.value {
            KeyValue::Vec3(e) => approx(e[2], 0.02 * frame as f32, 1e-5),
            other => panic!("expected euler key, got {other:?}"),
        }
    }
}

/// it should unbind the whole set after baking when asked to
#[test]
fn unbind_after_bake_tears_down() {
    let (mut set, mut target, mut source, mut ctx) = bound_fixture();
    let bones_bound = target.bone_count();
    let params = BakeParams {
        start_frame: 1,
        end_frame: 4,
        unbind_after: true,
        ..Default::default()
    };
    bake(
        &mut set,
        &mut ctx,
        &mut target,
        &mut source,
        &mut SwaySampler,
        &params,
    )
    .expect("bake");

    assert!(!set.bound);
    assert_eq!(target.bone_count(), bones_bound - 4);
    assert_eq!(target.collection_count(), 0);
}

/// it should run the whole flow from preset load to baked track
#[test]
fn retarget_end_to_end() {
    let mut target = fixtures::target_skeleton();
    let mut source = fixtures::source_skeleton();
    let mut set = RetargetSet::new("TargetRig", "SourceRig").unwrap();
    load_preset_into(&mut set, fixtures::preset_json()).expect("preset loads");

    let mut ctx = EvaluationContext::new();
    bind_set(&mut set, &mut ctx, &mut target, &source).expect("bind");

    let params = BakeParams {
        action_name: "WalkRetarget".to_string(),
        start_frame: 1,
        end_frame: 8,
        frame_step: 1,
        unbind_after: true,
    };
    let track = bake(
        &mut set,
        &mut ctx,
        &mut target,
        &mut source,
        &mut SwaySampler,
        &params,
    )
    .expect("bake");

    assert_eq!(track.name, "WalkRetarget");
    assert!(!track.is_empty());
    // Preset Bone.001 disables scale for hips, Bone.002 disables location for spine.
    assert!(track.curve("hips", CurveChannel::Scale).is_none());
    assert!(track.curve("spine", CurveChannel::Location).is_none());
    // unbind_after left a pristine skeleton behind.
    assert_eq!(
        target.bone_count(),
        fixtures::target_skeleton().bone_count()
    );
}
