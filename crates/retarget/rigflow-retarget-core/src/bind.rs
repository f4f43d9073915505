//! BindEngine: structural setup and teardown of the evaluation linkage.
//!
//! Binding a mapping creates a pair of hidden helper bones on the target
//! skeleton (target helper parented to source helper, oriented from the
//! bind-time rest rotations); the source helper is then driven from the live
//! source pose by [`crate::eval`]. Unbinding reverses the steps. Set-level
//! passes are best-effort: per-mapping failures are collected, never fatal.

use crate::context::EvaluationContext;
use crate::error::{MappingError, SkeletonRole};
use crate::ids::CollectionId;
use crate::mapping::{BoneMapping, HelperBoneLink};
use crate::set::RetargetSet;
use crate::skeleton::{Bone, RotationMode, Skeleton};

/// Name of the hidden collection grouping all helper bones of a set.
pub const HELPER_COLLECTION_NAME: &str = "RetargetHelperBones";

/// Helper bones carry no geometry; near-zero rest length keeps them out of
/// the way visually.
const HELPER_BONE_LENGTH: f32 = 0.001;

fn helper_bone(name: String, rest_rotation: [f32; 4], collection: CollectionId) -> Bone {
    let mut bone = Bone::new(name);
    bone.rest_rotation = rest_rotation;
    bone.rest_length = HELPER_BONE_LENGTH;
    // Driven through its Euler channels by the evaluation engine.
    bone.rotation_mode = RotationMode::EulerXyz;
    bone.deform = false;
    bone.selectable = false;
    bone.hidden = true;
    bone.collection = Some(collection);
    bone
}

/// Bind one mapping: resolve both bones, create the helper pair, record the
/// linkage. A failed lookup leaves the mapping `bound` but invalid, with no
/// partial structure on the skeleton. Already-bound mappings are skipped.
pub fn bind_mapping(
    mapping: &mut BoneMapping,
    collection: CollectionId,
    target: &mut Skeleton,
    source: &Skeleton,
) -> Result<(), MappingError> {
    if mapping.bound {
        return Ok(());
    }

    let target_rest = match target.bone_by_name(&mapping.target_bone) {
        Some(bone) => bone.rest_rotation,
        None => {
            mapping.bound = true;
            mapping.bind_valid = false;
            return Err(MappingError::BoneNotFound {
                mapping: mapping.id.clone(),
                bone: mapping.target_bone.clone(),
                role: SkeletonRole::Target,
            });
        }
    };
    let source_rest = match source.bone_by_name(&mapping.source_bone) {
        Some(bone) => bone.rest_rotation,
        None => {
            mapping.bound = true;
            mapping.bind_valid = false;
            return Err(MappingError::BoneNotFound {
                mapping: mapping.id.clone(),
                bone: mapping.source_bone.clone(),
                role: SkeletonRole::Source,
            });
        }
    };

    let source_helper = target.add_bone(helper_bone(
        mapping.source_helper_name(),
        source_rest,
        collection,
    ));
    let mut target_helper_bone =
        helper_bone(mapping.target_helper_name(), target_rest, collection);
    target_helper_bone.parent = Some(source_helper);
    let target_helper = target.add_bone(target_helper_bone);

    mapping.helpers = Some(HelperBoneLink {
        target_helper,
        source_helper,
    });
    mapping.bound = true;
    mapping.bind_valid = true;
    Ok(())
}

/// Unbind one mapping: drop the helper pair and reset the state flags.
/// Idempotent on unbound mappings. Missing helpers are a teardown
/// inconsistency: logged, reported, and teardown still completes.
pub fn unbind_mapping(
    mapping: &mut BoneMapping,
    target: &mut Skeleton,
) -> Result<(), MappingError> {
    if !mapping.bound {
        return Ok(());
    }

    let mut result = Ok(());
    if let Some(helpers) = mapping.helpers.take() {
        // Reverse creation order: target helper first, then its parent.
        if !target.remove_bone(helpers.target_helper) {
            let err = MappingError::HelperMissing {
                mapping: mapping.id.clone(),
                helper: mapping.target_helper_name(),
            };
            log::warn!("teardown inconsistency: {err}");
            result = Err(err);
        }
        if !target.remove_bone(helpers.source_helper) {
            let err = MappingError::HelperMissing {
                mapping: mapping.id.clone(),
                helper: mapping.source_helper_name(),
            };
            log::warn!("teardown inconsistency: {err}");
            if result.is_ok() {
                result = Err(err);
            }
        }
    }
    mapping.bound = false;
    mapping.bind_valid = false;
    result
}

/// Bind every unbound mapping of the set in insertion order. Creates the
/// shared hidden helper collection once. The set ends up `bound` regardless
/// of individual failures; those are returned for per-mapping reporting.
pub fn bind_set(
    set: &mut RetargetSet,
    ctx: &mut EvaluationContext,
    target: &mut Skeleton,
    source: &Skeleton,
) -> Result<(), Vec<MappingError>> {
    if set.bound {
        return Ok(());
    }
    // Structural edits run under a scope so any clock movement is undone.
    let _scope = ctx.scope();

    let collection = target.add_collection(HELPER_COLLECTION_NAME, false);
    set.helper_collection = Some(collection);

    let mut errors = Vec::new();
    for mapping in &mut set.mappings {
        if let Err(err) = bind_mapping(mapping, collection, target, source) {
            errors.push(err);
        }
    }
    set.bound = true;
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Unbind every bound mapping, then drop the helper collection. Collection
/// removal is attempted even when constituent teardowns reported errors.
pub fn unbind_set(
    set: &mut RetargetSet,
    ctx: &mut EvaluationContext,
    target: &mut Skeleton,
) -> Result<(), Vec<MappingError>> {
    let _scope = ctx.scope();

    let mut errors = Vec::new();
    for mapping in &mut set.mappings {
        if let Err(err) = unbind_mapping(mapping, target) {
            errors.push(err);
        }
    }
    if let Some(collection) = set.helper_collection.take() {
        if !target.remove_collection(collection) {
            log::warn!(
                "helper bone collection missing during unbind of set targeting '{}'",
                set.target_skeleton
            );
        }
    }
    set.bound = false;
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Bind a single mapping of an already-bound set, e.g. one just added.
/// No-op when the set itself is not bound.
pub fn live_bind_mapping(
    set: &mut RetargetSet,
    index: usize,
    target: &mut Skeleton,
    source: &Skeleton,
) -> Result<(), MappingError> {
    let Some(collection) = set.helper_collection else {
        return Ok(());
    };
    match set.mappings.get_mut(index) {
        Some(mapping) => bind_mapping(mapping, collection, target, source),
        None => Ok(()),
    }
}

/// Unbind a single mapping without touching the rest of the set. Changing a
/// mapping's bone names requires this first; names are immutable while bound.
pub fn live_unbind_mapping(
    set: &mut RetargetSet,
    index: usize,
    target: &mut Skeleton,
) -> Result<(), MappingError> {
    match set.mappings.get_mut(index) {
        Some(mapping) => unbind_mapping(mapping, target),
        None => Ok(()),
    }
}

/// Remove a mapping from the set, live-unbinding it first when needed.
pub fn remove_mapping(
    set: &mut RetargetSet,
    index: usize,
    target: &mut Skeleton,
) -> Option<BoneMapping> {
    if index >= set.mappings.len() {
        return None;
    }
    // Teardown errors are already logged; removal proceeds regardless.
    let _ = live_unbind_mapping(set, index, target);
    Some(set.mappings.remove(index))
}
