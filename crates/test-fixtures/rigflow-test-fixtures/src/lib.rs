//! Shared test fixtures: a canonical source/target skeleton pair with
//! deliberately different bone naming and proportions, plus a preset JSON
//! document exercising every node field.

use rigflow_retarget_core::{Bone, BoneMapping, RetargetSet, RotationMode, Skeleton};

const PRESET_BASIC: &str = include_str!("../fixtures/basic_preset.json");

/// Preset document with one frame node and two bone nodes.
pub fn preset_json() -> &'static str {
    PRESET_BASIC
}

/// Parsed copy of the preset fixture, for schema-level assertions.
pub fn preset_value() -> serde_json::Value {
    serde_json::from_str(PRESET_BASIC).expect("fixture preset should parse")
}

/// Target rig: lowercase bone names, quaternion rotation by default.
pub fn target_skeleton() -> Skeleton {
    let mut skeleton = Skeleton::new("TargetRig");
    let root = skeleton.add_bone(Bone::new("root"));
    let mut hips = Bone::new("hips");
    hips.parent = Some(root);
    let hips = skeleton.add_bone(hips);
    let mut spine = Bone::new("spine");
    spine.parent = Some(hips);
    spine.rotation_mode = RotationMode::EulerXyz;
    let spine = skeleton.add_bone(spine);
    let mut chest = Bone::new("chest");
    chest.parent = Some(spine);
    chest.rotation_mode = RotationMode::EulerXyz;
    let chest = skeleton.add_bone(chest);
    let mut hand = Bone::new("hand.L");
    hand.parent = Some(chest);
    hand.rotation_mode = RotationMode::EulerXyz;
    skeleton.add_bone(hand);
    skeleton
}

/// Source rig: PascalCase bone names, twice the world scale of the target.
pub fn source_skeleton() -> Skeleton {
    let mut skeleton = Skeleton::new("SourceRig").with_world_scale([2.0, 2.0, 2.0]);
    let root = skeleton.add_bone(Bone::new("Root"));
    let mut pelvis = Bone::new("Pelvis");
    pelvis.parent = Some(root);
    let pelvis = skeleton.add_bone(pelvis);
    let mut spine = Bone::new("Spine1");
    spine.parent = Some(pelvis);
    let spine = skeleton.add_bone(spine);
    let mut chest = Bone::new("Spine2");
    chest.parent = Some(spine);
    let chest = skeleton.add_bone(chest);
    let mut hand = Bone::new("LeftHand");
    hand.parent = Some(chest);
    skeleton.add_bone(hand);
    skeleton
}

/// A set over the fixture skeletons with two resolvable mappings.
pub fn basic_set() -> RetargetSet {
    let mut set =
        RetargetSet::new("TargetRig", "SourceRig").expect("fixture skeleton names differ");
    set.add_mapping(BoneMapping::new("Bone.001", "hips", "Pelvis"));
    set.add_mapping(BoneMapping::new("Bone.002", "spine", "Spine1"));
    set
}
