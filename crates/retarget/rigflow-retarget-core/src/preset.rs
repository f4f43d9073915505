//! Preset JSON boundary: round-trips bone-mapping configuration and the
//! cosmetic node layout.
//!
//! Notes:
//! - Node positions are stored relative to the set's anchor node.
//! - `parent` references are by node id and must resolve within the same
//!   file; unknown ids degrade to no parent. Cyclic parent graphs are not
//!   validated.
//! - Shaping parameters are preserved bit-identically; influence is clamped
//!   into [0, 1] on load.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::channel::TransformChannel;
use crate::error::PresetError;
use crate::mapping::{BoneMapping, GroupingNode, MixOrder, NodeLayout};
use crate::set::RetargetSet;

pub const PRESET_VERSION: [u32; 3] = [0, 0, 1];

/// Everything a preset file carries, ready to append to a set.
#[derive(Clone, Debug, Default)]
pub struct PresetDocument {
    pub mappings: Vec<BoneMapping>,
    pub groupings: Vec<GroupingNode>,
}

/// Parse preset JSON into mappings and grouping nodes. Entries are built in
/// sorted-id order so loading is deterministic regardless of file layout.
pub fn parse_preset_json(s: &str) -> Result<PresetDocument, PresetError> {
    let file: PresetFile = serde_json::from_str(s)?;
    if file.version[0] != PRESET_VERSION[0] {
        return Err(PresetError::UnsupportedVersion(file.version));
    }

    let mut ids: Vec<&String> = file.nodes.keys().collect();
    ids.sort();

    let mut doc = PresetDocument::default();
    for id in ids {
        let Some(node) = file.nodes.get(id) else {
            continue;
        };
        // Unknown parent ids degrade to no parent rather than failing the load.
        let parent = node
            .parent
            .clone()
            .filter(|pid| file.nodes.contains_key(pid));
        let layout = NodeLayout {
            label: node.label.clone(),
            position: node.location,
            width: node.width,
            height: node.height,
            hide: node.hide,
            parent,
        };
        match node.kind {
            RawNodeKind::Frame => doc.groupings.push(GroupingNode {
                id: id.clone(),
                layout,
            }),
            RawNodeKind::Bone => {
                let mut mapping =
                    BoneMapping::new(id.clone(), &node.bone_target, &node.bone_source);
                mapping.location = channel_from_raw(
                    node.use_location,
                    node.location_axis,
                    node.location_influence,
                    node.location_multiply,
                    node.location_offset,
                );
                mapping.rotation_euler = channel_from_raw(
                    node.use_rotation_euler,
                    node.rotation_euler_axis,
                    node.rotation_euler_influence,
                    node.rotation_euler_multiply,
                    node.rotation_euler_offset,
                );
                mapping.scale = channel_from_raw(
                    node.use_scale,
                    node.scale_axis,
                    node.scale_influence,
                    node.scale_multiply,
                    node.scale_offset,
                );
                mapping.mix_order = node.mix_mode.unwrap_or_default();
                mapping.layout = layout;
                doc.mappings.push(mapping);
            }
        }
    }
    Ok(doc)
}

/// Append a parsed preset to a set. Loaded mappings start unbound.
pub fn load_preset_into(set: &mut RetargetSet, s: &str) -> Result<(), PresetError> {
    let doc = parse_preset_json(s)?;
    set.groupings.extend(doc.groupings);
    for mapping in doc.mappings {
        set.add_mapping(mapping);
    }
    Ok(())
}

/// Serialize every currently-present mapping and grouping node.
pub fn save_preset_json(set: &RetargetSet) -> Result<String, PresetError> {
    let mut nodes = HashMap::with_capacity(set.mappings.len() + set.groupings.len());
    for grouping in &set.groupings {
        nodes.insert(grouping.id.clone(), raw_frame_node(&grouping.layout));
    }
    for mapping in &set.mappings {
        nodes.insert(mapping.id.clone(), raw_bone_node(mapping));
    }
    let file = PresetFile {
        version: PRESET_VERSION,
        nodes,
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

fn channel_from_raw(
    enabled: Option<bool>,
    axis: Option<[bool; 3]>,
    influence: Option<[f32; 3]>,
    multiply: Option<[f32; 3]>,
    offset: Option<[f32; 3]>,
) -> TransformChannel {
    let defaults = TransformChannel::default();
    let mut channel = TransformChannel {
        enabled: enabled.unwrap_or(defaults.enabled),
        axis: axis.unwrap_or(defaults.axis),
        influence: influence.unwrap_or(defaults.influence),
        multiply: multiply.unwrap_or(defaults.multiply),
        offset: offset.unwrap_or(defaults.offset),
    };
    channel.clamp_influence();
    channel
}

fn raw_frame_node(layout: &NodeLayout) -> RawNode {
    RawNode {
        kind: RawNodeKind::Frame,
        label: layout.label.clone(),
        location: layout.position,
        width: layout.width,
        height: layout.height,
        hide: layout.hide,
        parent: layout.parent.clone(),
        bone_target: String::new(),
        bone_source: String::new(),
        use_location: None,
        location_axis: None,
        location_influence: None,
        location_multiply: None,
        location_offset: None,
        use_rotation_euler: None,
        rotation_euler_axis: None,
        rotation_euler_influence: None,
        rotation_euler_multiply: None,
        rotation_euler_offset: None,
        use_scale: None,
        scale_axis: None,
        scale_influence: None,
        scale_multiply: None,
        scale_offset: None,
        mix_mode: None,
    }
}

fn raw_bone_node(mapping: &BoneMapping) -> RawNode {
    RawNode {
        kind: RawNodeKind::Bone,
        label: mapping.layout.label.clone(),
        location: mapping.layout.position,
        width: mapping.layout.width,
        height: mapping.layout.height,
        hide: mapping.layout.hide,
        parent: mapping.layout.parent.clone(),
        bone_target: mapping.target_bone.clone(),
        bone_source: mapping.source_bone.clone(),
        use_location: Some(mapping.location.enabled),
        location_axis: Some(mapping.location.axis),
        location_influence: Some(mapping.location.influence),
        location_multiply: Some(mapping.location.multiply),
        location_offset: Some(mapping.location.offset),
        use_rotation_euler: Some(mapping.rotation_euler.enabled),
        rotation_euler_axis: Some(mapping.rotation_euler.axis),
        rotation_euler_influence: Some(mapping.rotation_euler.influence),
        rotation_euler_multiply: Some(mapping.rotation_euler.multiply),
        rotation_euler_offset: Some(mapping.rotation_euler.offset),
        use_scale: Some(mapping.scale.enabled),
        scale_axis: Some(mapping.scale.axis),
        scale_influence: Some(mapping.scale.influence),
        scale_multiply: Some(mapping.scale.multiply),
        scale_offset: Some(mapping.scale.offset),
        mix_mode: Some(mapping.mix_order),
    }
}

// ----- JSON schema (serde) -----

#[derive(Debug, Serialize, Deserialize)]
struct PresetFile {
    version: [u32; 3],
    nodes: HashMap<String, RawNode>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum RawNodeKind {
    Frame,
    Bone,
}

/// One node entry. Frame nodes carry null shaping fields; only bone nodes
/// populate them.
#[derive(Debug, Serialize, Deserialize)]
struct RawNode {
    #[serde(rename = "type")]
    kind: RawNodeKind,
    label: String,
    location: [f32; 2],
    width: f32,
    height: f32,
    hide: bool,
    parent: Option<String>,
    #[serde(default)]
    bone_target: String,
    #[serde(default)]
    bone_source: String,
    #[serde(default)]
    use_location: Option<bool>,
    #[serde(default)]
    location_axis: Option<[bool; 3]>,
    #[serde(default)]
    location_influence: Option<[f32; 3]>,
    #[serde(default)]
    location_multiply: Option<[f32; 3]>,
    #[serde(default)]
    location_offset: Option<[f32; 3]>,
    #[serde(default)]
    use_rotation_euler: Option<bool>,
    #[serde(default)]
    rotation_euler_axis: Option<[bool; 3]>,
    #[serde(default)]
    rotation_euler_influence: Option<[f32; 3]>,
    #[serde(default)]
    rotation_euler_multiply: Option<[f32; 3]>,
    #[serde(default)]
    rotation_euler_offset: Option<[f32; 3]>,
    #[serde(default)]
    use_scale: Option<bool>,
    #[serde(default)]
    scale_axis: Option<[bool; 3]>,
    #[serde(default)]
    scale_influence: Option<[f32; 3]>,
    #[serde(default)]
    scale_multiply: Option<[f32; 3]>,
    #[serde(default)]
    scale_offset: Option<[f32; 3]>,
    #[serde(default)]
    mix_mode: Option<MixOrder>,
}
