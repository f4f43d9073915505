//! Skeleton collaborator model: named bones with rest orientation and a live
//! local pose, plus bone collections used to group helper bones.
//!
//! The host owns the skeleton; the retargeting engine only mutates structure
//! to add or remove its own helper bones and the helper collection.

use serde::{Deserialize, Serialize};

use crate::ids::{BoneId, CollectionId, IdAllocator};
use crate::math::{Transform, QUAT_IDENTITY};

/// Which rotation channel a bone's pose is keyed in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum RotationMode {
    Quaternion,
    EulerXyz,
}

/// One skeletal segment. `rest_rotation` is the bind-time armature-space
/// orientation; `pose` is the live parent-relative transform.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    pub parent: Option<BoneId>,
    pub rest_rotation: [f32; 4],
    pub rest_length: f32,
    pub rotation_mode: RotationMode,
    pub deform: bool,
    pub selectable: bool,
    pub hidden: bool,
    pub pose: Transform,
    pub collection: Option<CollectionId>,
}

impl Bone {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            rest_rotation: QUAT_IDENTITY,
            rest_length: 1.0,
            rotation_mode: RotationMode::Quaternion,
            deform: true,
            selectable: true,
            hidden: false,
            pose: Transform::IDENTITY,
            collection: None,
        }
    }
}

/// Named visibility group for bones.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BoneCollection {
    pub name: String,
    pub visible: bool,
}

/// A named skeleton with per-axis world scale (the owning object's scale,
/// used to normalize copied locations between differently sized rigs).
#[derive(Clone, Debug)]
pub struct Skeleton {
    pub name: String,
    pub world_scale: [f32; 3],
    ids: IdAllocator,
    bones: Vec<(BoneId, Bone)>,
    collections: Vec<(CollectionId, BoneCollection)>,
}

impl Skeleton {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            world_scale: [1.0, 1.0, 1.0],
            ids: IdAllocator::new(),
            bones: Vec::new(),
            collections: Vec::new(),
        }
    }

    pub fn with_world_scale(mut self, scale: [f32; 3]) -> Self {
        self.world_scale = scale;
        self
    }

    pub fn add_bone(&mut self, bone: Bone) -> BoneId {
        let id = self.ids.alloc_bone();
        self.bones.push((id, bone));
        id
    }

    /// Remove a bone by id. Returns false when the id is unknown.
    pub fn remove_bone(&mut self, id: BoneId) -> bool {
        let before = self.bones.len();
        self.bones.retain(|(bid, _)| *bid != id);
        self.bones.len() != before
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones
            .iter()
            .find_map(|(bid, b)| if *bid == id { Some(b) } else { None })
    }

    pub fn bone_mut(&mut self, id: BoneId) -> Option<&mut Bone> {
        self.bones
            .iter_mut()
            .find_map(|(bid, b)| if *bid == id { Some(b) } else { None })
    }

    pub fn bone_id(&self, name: &str) -> Option<BoneId> {
        self.bones
            .iter()
            .find_map(|(bid, b)| if b.name == name { Some(*bid) } else { None })
    }

    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.bone_id(name).and_then(|id| self.bone(id))
    }

    pub fn bone_by_name_mut(&mut self, name: &str) -> Option<&mut Bone> {
        self.bone_id(name).and_then(|id| self.bone_mut(id))
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn bones(&self) -> impl Iterator<Item = (BoneId, &Bone)> {
        self.bones.iter().map(|(id, b)| (*id, b))
    }

    pub fn add_collection(&mut self, name: impl Into<String>, visible: bool) -> CollectionId {
        let id = self.ids.alloc_collection();
        self.collections.push((
            id,
            BoneCollection {
                name: name.into(),
                visible,
            },
        ));
        id
    }

    /// Remove a collection by id; bones assigned to it are released.
    /// Returns false when the id is unknown.
    pub fn remove_collection(&mut self, id: CollectionId) -> bool {
        let before = self.collections.len();
        self.collections.retain(|(cid, _)| *cid != id);
        if self.collections.len() == before {
            return false;
        }
        for (_, bone) in &mut self.bones {
            if bone.collection == Some(id) {
                bone.collection = None;
            }
        }
        true
    }

    pub fn collection(&self, id: CollectionId) -> Option<&BoneCollection> {
        self.collections
            .iter()
            .find_map(|(cid, c)| if *cid == id { Some(c) } else { None })
    }

    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }
}
