//! RetargetSet: the ordered collection of bone mappings between one source
//! and one target skeleton, plus the extra bones to include when baking.

use serde::{Deserialize, Serialize};

use crate::error::SetError;
use crate::ids::CollectionId;
use crate::mapping::{BoneMapping, GroupingNode};

fn default_true() -> bool {
    true
}

/// A bone baked alongside the mapped ones, with explicit per-component
/// flags. Entries naming unknown bones are dropped silently at bake time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdditionalBakeBone {
    pub bone: String,
    #[serde(default = "default_true")]
    pub bake_location: bool,
    #[serde(default = "default_true")]
    pub bake_rotation: bool,
    #[serde(default = "default_true")]
    pub bake_scale: bool,
}

impl AdditionalBakeBone {
    pub fn new(bone: impl Into<String>) -> Self {
        Self {
            bone: bone.into(),
            bake_location: true,
            bake_rotation: true,
            bake_scale: true,
        }
    }
}

/// Mappings are evaluated (and bound) in insertion order. `bound` is set once
/// a set-level bind pass completes, even when individual mappings failed to
/// resolve; per-mapping validity lives on the mappings themselves.
#[derive(Clone, Debug)]
pub struct RetargetSet {
    pub target_skeleton: String,
    pub source_skeleton: String,
    pub mappings: Vec<BoneMapping>,
    pub groupings: Vec<GroupingNode>,
    pub additional_bake_bones: Vec<AdditionalBakeBone>,
    pub bound: bool,
    pub helper_collection: Option<CollectionId>,
}

impl RetargetSet {
    pub fn new(
        target_skeleton: impl Into<String>,
        source_skeleton: impl Into<String>,
    ) -> Result<Self, SetError> {
        let target_skeleton = target_skeleton.into();
        let source_skeleton = source_skeleton.into();
        if target_skeleton == source_skeleton {
            return Err(SetError::IdenticalSkeletons(target_skeleton));
        }
        Ok(Self {
            target_skeleton,
            source_skeleton,
            mappings: Vec::new(),
            groupings: Vec::new(),
            additional_bake_bones: Vec::new(),
            bound: false,
            helper_collection: None,
        })
    }

    /// Append a mapping; returns its index. The caller live-binds it via
    /// `bind::live_bind_mapping` when the set is already bound.
    pub fn add_mapping(&mut self, mut mapping: BoneMapping) -> usize {
        mapping.clamp_influences();
        self.mappings.push(mapping);
        self.mappings.len() - 1
    }

    pub fn mapping(&self, index: usize) -> Option<&BoneMapping> {
        self.mappings.get(index)
    }

    pub fn mapping_by_id(&self, id: &str) -> Option<&BoneMapping> {
        self.mappings.iter().find(|m| m.id == id)
    }

    pub fn add_additional_bone(&mut self, name: impl Into<String>) {
        self.additional_bake_bones.push(AdditionalBakeBone::new(name));
    }

    /// Remove an additional-bake entry by index; out-of-range is a no-op.
    pub fn remove_additional_bone(&mut self, index: usize) {
        if index < self.additional_bake_bones.len() {
            self.additional_bake_bones.remove(index);
        }
    }
}
