//! Rigflow Retarget Core (engine-agnostic)
//!
//! Retargets skeletal animation from a source skeleton onto a
//! differently-proportioned target skeleton: per-bone transform-copy
//! mappings with per-axis influence / multiply / offset shaping and a mix
//! order, a bind/unbind lifecycle that materializes hidden helper bones, a
//! pure per-frame evaluation, and a bake pass emitting a detached keyframe
//! track. Hosts provide the skeletons and source motion; this crate never
//! renders, schedules, or persists anything beyond the preset JSON.

pub mod bake;
pub mod bind;
pub mod channel;
pub mod context;
pub mod error;
pub mod eval;
pub mod ids;
pub mod mapping;
pub mod math;
pub mod preset;
pub mod set;
pub mod skeleton;
pub mod track;

// Re-exports for consumers (adapters)
pub use bake::{bake, BakeParams, PoseSampler};
pub use bind::{
    bind_mapping, bind_set, live_bind_mapping, live_unbind_mapping, remove_mapping,
    unbind_mapping, unbind_set, HELPER_COLLECTION_NAME,
};
pub use channel::TransformChannel;
pub use context::{ContextScope, EvaluationContext};
pub use error::{BakeError, MappingError, PresetError, SetError, SkeletonRole};
pub use eval::{
    evaluate_mapping, evaluate_set, mix_transform, shape_axis, shape_location, shape_vec,
    shaped_transform,
};
pub use ids::{BoneId, CollectionId, IdAllocator};
pub use mapping::{BoneMapping, GroupingNode, HelperBoneLink, MixOrder, NodeLayout};
pub use math::Transform;
pub use preset::{load_preset_into, parse_preset_json, save_preset_json, PresetDocument};
pub use set::{AdditionalBakeBone, RetargetSet};
pub use skeleton::{Bone, BoneCollection, RotationMode, Skeleton};
pub use track::{AnimationTrack, BoneCurve, CurveChannel, Interpolation, KeyValue, Keyframe};
