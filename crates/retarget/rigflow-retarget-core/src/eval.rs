//! EvaluationEngine: the pure per-frame computation turning a source bone's
//! local pose into a target bone's visual transform.
//!
//! Binding establishes a standing relationship, not a one-shot copy: the
//! caller re-runs [`evaluate_set`] every time the source pose changes and
//! propagates the returned transforms.

use hashbrown::HashMap;

use crate::channel::TransformChannel;
use crate::mapping::{BoneMapping, MixOrder};
use crate::math::Transform;
use crate::set::RetargetSet;
use crate::skeleton::Skeleton;

/// Shape one axis: `(raw * influence) * multiply + offset`, gated to zero by
/// the channel and axis enable flags.
#[inline]
pub fn shape_axis(channel: &TransformChannel, raw: f32, axis: usize) -> f32 {
    if !channel.axis_active(axis) {
        return 0.0;
    }
    (raw * channel.influence[axis]) * channel.multiply[axis] + channel.offset[axis]
}

/// Shape all three axes of a dimensionless component (rotation, scale).
#[inline]
pub fn shape_vec(channel: &TransformChannel, raw: [f32; 3]) -> [f32; 3] {
    [
        shape_axis(channel, raw[0], 0),
        shape_axis(channel, raw[1], 1),
        shape_axis(channel, raw[2], 2),
    ]
}

/// Location variant: the raw offset is divided by the target/source
/// world-scale ratio per axis before shaping, compensating rigs built at
/// different real-world sizes. A degenerate (zero or non-finite) ratio skips
/// normalization.
pub fn shape_location(
    channel: &TransformChannel,
    raw: [f32; 3],
    target_world_scale: [f32; 3],
    source_world_scale: [f32; 3],
) -> [f32; 3] {
    let mut out = [0.0; 3];
    for axis in 0..3 {
        let ratio = target_world_scale[axis] / source_world_scale[axis];
        let normalized = if ratio.is_finite() && ratio != 0.0 {
            raw[axis] / ratio
        } else {
            raw[axis]
        };
        out[axis] = shape_axis(channel, normalized, axis);
    }
    out
}

/// The copied transform a mapping derives from a source bone's local pose.
/// This is what the source helper bone carries while bound.
pub fn shaped_transform(
    mapping: &BoneMapping,
    source_pose: &Transform,
    target_world_scale: [f32; 3],
    source_world_scale: [f32; 3],
) -> Transform {
    Transform {
        translation: shape_location(
            &mapping.location,
            source_pose.translation,
            target_world_scale,
            source_world_scale,
        ),
        rotation_euler: shape_vec(&mapping.rotation_euler, source_pose.rotation_euler),
        scale: shape_vec(&mapping.scale, source_pose.scale),
    }
}

/// Combine the target bone's own pose with the copied transform.
/// `Before` treats the copy as the parent of the original, `After` as a
/// child; both collapse to the pure copy when the own pose is identity.
pub fn mix_transform(own: &Transform, copied: &Transform, order: MixOrder) -> Transform {
    match order {
        MixOrder::Before => copied.compose(own),
        MixOrder::After => own.compose(copied),
    }
}

/// Recompute one bound-valid mapping: drive the source helper pose from the
/// live source bone and return the target bone's visual transform. Returns
/// None for mappings without an evaluation linkage.
pub fn evaluate_mapping(
    mapping: &BoneMapping,
    target: &mut Skeleton,
    source: &Skeleton,
) -> Option<Transform> {
    if !mapping.is_bound_valid() {
        return None;
    }
    let helpers = mapping.helpers?;
    let source_pose = source.bone_by_name(&mapping.source_bone)?.pose;
    let copied = shaped_transform(mapping, &source_pose, target.world_scale, source.world_scale);

    // The helper pair carries the copied transform through its parenting;
    // the target bone then mixes it with its own channels.
    target.bone_mut(helpers.source_helper)?.pose = copied;
    let own = target.bone_by_name(&mapping.target_bone)?.pose;
    Some(mix_transform(&own, &copied, mapping.mix_order))
}

/// Recompute every bound-valid mapping in insertion order. Returns the
/// visual transform keyed by target bone name; unmapped bones keep their own
/// pose as their visual transform.
pub fn evaluate_set(
    set: &RetargetSet,
    target: &mut Skeleton,
    source: &Skeleton,
) -> HashMap<String, Transform> {
    let mut visual = HashMap::with_capacity(set.mappings.len());
    for mapping in &set.mappings {
        if let Some(transform) = evaluate_mapping(mapping, target, source) {
            visual.insert(mapping.target_bone.clone(), transform);
        }
    }
    visual
}
