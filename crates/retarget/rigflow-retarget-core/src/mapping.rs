//! Bone mapping: one source -> target bone pair with its three shaping
//! channels, mix order, bind state and node-editor layout for presets.

use serde::{Deserialize, Serialize};

use crate::channel::TransformChannel;
use crate::ids::BoneId;

/// How the copied transform combines with the target bone's own channels:
/// `Before` composes the copy as if it were the parent of the original,
/// `After` as if it were a child. Equivalent when the target bone carries no
/// animation of its own.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MixOrder {
    Before,
    #[default]
    After,
}

/// Cosmetic node-editor placement carried through preset round-trips.
/// Positions are relative to the set's anchor node; `parent` refers to a
/// grouping node id within the same document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeLayout {
    pub label: String,
    pub position: [f32; 2],
    pub width: f32,
    pub height: f32,
    pub hide: bool,
    pub parent: Option<String>,
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self {
            label: String::new(),
            position: [0.0, 0.0],
            width: 300.0,
            height: 100.0,
            hide: false,
            parent: None,
        }
    }
}

/// Purely-cosmetic frame node: groups mapping nodes in the editor, carries no
/// retargeting semantics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupingNode {
    pub id: String,
    pub layout: NodeLayout,
}

/// Ids of the two helper bones a valid binding creates on the target
/// skeleton. Stored explicitly so teardown never has to reconstruct them
/// from names.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct HelperBoneLink {
    pub target_helper: BoneId,
    pub source_helper: BoneId,
}

/// One mapped bone pair. Lifecycle: UNBOUND -> bind -> BOUND_VALID or
/// BOUND_INVALID -> unbind -> UNBOUND. Bone names are immutable input while
/// `bound` is set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneMapping {
    /// Stable node id, unique within the owning set.
    pub id: String,
    pub target_bone: String,
    pub source_bone: String,
    pub location: TransformChannel,
    pub rotation_euler: TransformChannel,
    pub scale: TransformChannel,
    pub mix_order: MixOrder,
    #[serde(skip)]
    pub bound: bool,
    #[serde(skip)]
    pub bind_valid: bool,
    #[serde(skip)]
    pub helpers: Option<HelperBoneLink>,
    pub layout: NodeLayout,
}

impl BoneMapping {
    pub fn new(
        id: impl Into<String>,
        target_bone: impl Into<String>,
        source_bone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            target_bone: target_bone.into(),
            source_bone: source_bone.into(),
            location: TransformChannel::default(),
            rotation_euler: TransformChannel::default(),
            scale: TransformChannel::default(),
            mix_order: MixOrder::default(),
            bound: false,
            bind_valid: false,
            helpers: None,
            layout: NodeLayout::default(),
        }
    }

    /// True when a bind succeeded and the evaluation linkage exists.
    #[inline]
    pub fn is_bound_valid(&self) -> bool {
        self.bound && self.bind_valid && self.helpers.is_some()
    }

    /// Deterministic helper-bone names, derived from the mapping identity.
    /// Kept for inspectability; teardown goes through `helpers` ids.
    pub fn target_helper_name(&self) -> String {
        format!("TARGET_{}_{}", self.id, self.target_bone)
    }

    pub fn source_helper_name(&self) -> String {
        format!("SOURCE_{}_{}", self.id, self.source_bone)
    }

    /// Clamp all channel influences into range.
    pub fn clamp_influences(&mut self) {
        self.location.clamp_influence();
        self.rotation_euler.clamp_influence();
        self.scale.clamp_influence();
    }
}
