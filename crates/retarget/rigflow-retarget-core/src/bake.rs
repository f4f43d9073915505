//! BakeEngine: drive the live evaluation across a frame range and collect
//! the resolved transforms into a detached keyframe track.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::bind;
use crate::context::EvaluationContext;
use crate::error::BakeError;
use crate::eval::evaluate_set;
use crate::math::{quat_from_euler, Transform};
use crate::set::RetargetSet;
use crate::skeleton::{RotationMode, Skeleton};
use crate::track::{AnimationTrack, CurveChannel, Interpolation, KeyValue, Keyframe};

/// Host hook invoked once per baked frame, before evaluation: advance the
/// source skeleton's pose to `frame` (typically by sampling the host's own
/// playback). The engine has no notion of where source motion comes from.
pub trait PoseSampler {
    fn apply_pose(&mut self, frame: i32, source: &mut Skeleton);
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BakeParams {
    pub action_name: String,
    pub start_frame: i32,
    pub end_frame: i32,
    pub frame_step: i32,
    /// Unbind the whole set once the track is produced.
    pub unbind_after: bool,
}

impl Default for BakeParams {
    fn default() -> Self {
        Self {
            action_name: "BakeAction".to_string(),
            start_frame: 1,
            end_frame: 250,
            frame_step: 1,
            unbind_after: false,
        }
    }
}

/// One bone scheduled for baking: merged component flags plus the pre-bake
/// pose snapshot restored before keying each frame.
struct BakeBone {
    name: String,
    bake_location: bool,
    bake_rotation: bool,
    bake_scale: bool,
    rotation_mode: RotationMode,
    snapshot: Transform,
}

/// Union of mapping-derived bake bones and the additional list. Mappings are
/// inserted first and their flags win on a name collision; additional
/// entries naming unknown bones are dropped.
fn collect_bake_bones(set: &RetargetSet, target: &Skeleton) -> Vec<BakeBone> {
    let mut order: Vec<String> = Vec::new();
    let mut flags: HashMap<String, (bool, bool, bool)> = HashMap::new();

    for mapping in &set.mappings {
        if !mapping.is_bound_valid() {
            continue;
        }
        let entry = (
            mapping.location.enabled,
            mapping.rotation_euler.enabled,
            mapping.scale.enabled,
        );
        if flags.insert(mapping.target_bone.clone(), entry).is_none() {
            order.push(mapping.target_bone.clone());
        }
    }
    for extra in &set.additional_bake_bones {
        if target.bone_by_name(&extra.bone).is_none() {
            continue;
        }
        if !flags.contains_key(&extra.bone) {
            flags.insert(
                extra.bone.clone(),
                (extra.bake_location, extra.bake_rotation, extra.bake_scale),
            );
            order.push(extra.bone.clone());
        }
    }

    let mut bones = Vec::with_capacity(order.len());
    for name in order {
        let Some(bone) = target.bone_by_name(&name) else {
            continue;
        };
        let Some(&(bake_location, bake_rotation, bake_scale)) = flags.get(&name) else {
            continue;
        };
        bones.push(BakeBone {
            name,
            bake_location,
            bake_rotation,
            bake_scale,
            rotation_mode: bone.rotation_mode,
            snapshot: bone.pose,
        });
    }
    bones
}

/// Sample the bound evaluation over `[start_frame, end_frame]` stepping by
/// `frame_step` and key the resolved (visual) transform of every bake bone.
/// The produced track is detached; the skeleton pose and the evaluation
/// clock are restored before returning.
pub fn bake(
    set: &mut RetargetSet,
    ctx: &mut EvaluationContext,
    target: &mut Skeleton,
    source: &mut Skeleton,
    sampler: &mut dyn PoseSampler,
    params: &BakeParams,
) -> Result<AnimationTrack, BakeError> {
    if params.start_frame >= params.end_frame || params.frame_step <= 0 {
        return Err(BakeError::InvalidFrameRange {
            start: params.start_frame,
            end: params.end_frame,
            step: params.frame_step,
        });
    }
    if !set.bound {
        return Err(BakeError::NotBound);
    }

    let bake_bones = collect_bake_bones(set, target);
    let mut track = AnimationTrack::new(&params.action_name);

    {
        let mut scope = ctx.scope();
        let mut frame = params.start_frame;
        while frame <= params.end_frame {
            scope.set_frame(frame);
            sampler.apply_pose(frame, source);

            // Restore pre-bake values on enabled components so a key never
            // compounds with the previous frame's result.
            for bone in &bake_bones {
                if let Some(live) = target.bone_by_name_mut(&bone.name) {
                    if bone.bake_location {
                        live.pose.translation = bone.snapshot.translation;
                    }
                    if bone.bake_rotation {
                        live.pose.rotation_euler = bone.snapshot.rotation_euler;
                    }
                    if bone.bake_scale {
                        live.pose.scale = bone.snapshot.scale;
                    }
                }
            }

            // Resolve the copy-transform chain for this frame.
            let visual = evaluate_set(set, target, source);

            for bone in &bake_bones {
                let resolved = visual
                    .get(&bone.name)
                    .copied()
                    .or_else(|| target.bone_by_name(&bone.name).map(|b| b.pose));
                let Some(resolved) = resolved else {
                    continue;
                };
                if bone.bake_location {
                    let group = format!("{} (loc)", bone.name);
                    track
                        .curve_mut(&bone.name, CurveChannel::Location, &group)
                        .keys
                        .push(Keyframe {
                            frame,
                            value: KeyValue::Vec3(resolved.translation),
                            interpolation: Interpolation::Bezier,
                        });
                }
                if bone.bake_rotation {
                    let group = format!("{} (rot)", bone.name);
                    let (channel, value) = match bone.rotation_mode {
                        RotationMode::Quaternion => (
                            CurveChannel::RotationQuaternion,
                            KeyValue::Quat(quat_from_euler(resolved.rotation_euler)),
                        ),
                        RotationMode::EulerXyz => (
                            CurveChannel::RotationEuler,
                            KeyValue::Vec3(resolved.rotation_euler),
                        ),
                    };
                    track.curve_mut(&bone.name, channel, &group).keys.push(Keyframe {
                        frame,
                        value,
                        interpolation: Interpolation::Bezier,
                    });
                }
                if bone.bake_scale {
                    let group = format!("{} (scale)", bone.name);
                    track
                        .curve_mut(&bone.name, CurveChannel::Scale, &group)
                        .keys
                        .push(Keyframe {
                            frame,
                            value: KeyValue::Vec3(resolved.scale),
                            interpolation: Interpolation::Bezier,
                        });
                }
            }

            frame += params.frame_step;
        }
        // Scope drop restores the evaluation clock.
    }

    // Keys were inserted with the host default; pin the whole track to an
    // unambiguous piecewise-linear curve.
    track.set_interpolation(Interpolation::Linear);

    // Leave the skeleton pose as it was before baking.
    for bone in &bake_bones {
        if let Some(live) = target.bone_by_name_mut(&bone.name) {
            live.pose = bone.snapshot;
        }
    }

    if params.unbind_after {
        if let Err(errors) = bind::unbind_set(set, ctx, target) {
            for err in errors {
                log::warn!("unbind after bake: {err}");
            }
        }
    }

    Ok(track)
}
