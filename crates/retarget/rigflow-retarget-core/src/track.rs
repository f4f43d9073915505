//! Baked animation data model: a standalone keyframe track per bake,
//! detached from any skeleton and handed to the caller.

use serde::{Deserialize, Serialize};

/// Keyframe interpolation kind. Baking inserts with the host default and
/// flips everything to `Linear` as a final pass.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Interpolation {
    Constant,
    Linear,
    Bezier,
}

/// Value carried by one keyframe; shape follows the curve channel.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    Vec3([f32; 3]),
    Quat([f32; 4]),
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: i32,
    pub value: KeyValue,
    pub interpolation: Interpolation,
}

/// Which pose channel a curve addresses. Rotation curves follow the baked
/// bone's rotation mode.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveChannel {
    Location,
    RotationEuler,
    RotationQuaternion,
    Scale,
}

/// Keyframes for one channel of one bone. `group` is a display label
/// gathering related curves, e.g. `"hips (loc)"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneCurve {
    pub bone: String,
    pub channel: CurveChannel,
    pub group: String,
    pub keys: Vec<Keyframe>,
}

/// A detached bake result: every curve produced over the sampled frame
/// range. Empty when the bake-bone set resolved to nothing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationTrack {
    pub name: String,
    pub curves: Vec<BoneCurve>,
}

impl AnimationTrack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            curves: Vec::new(),
        }
    }

    pub fn curve(&self, bone: &str, channel: CurveChannel) -> Option<&BoneCurve> {
        self.curves
            .iter()
            .find(|c| c.bone == bone && c.channel == channel)
    }

    /// Fetch or create the curve for a bone/channel pair.
    pub fn curve_mut(
        &mut self,
        bone: &str,
        channel: CurveChannel,
        group: &str,
    ) -> &mut BoneCurve {
        let idx = match self
            .curves
            .iter()
            .position(|c| c.bone == bone && c.channel == channel)
        {
            Some(idx) => idx,
            None => {
                self.curves.push(BoneCurve {
                    bone: bone.to_string(),
                    channel,
                    group: group.to_string(),
                    keys: Vec::new(),
                });
                self.curves.len() - 1
            }
        };
        &mut self.curves[idx]
    }

    /// Rewrite the interpolation of every inserted key.
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        for curve in &mut self.curves {
            for key in &mut curve.keys {
                key.interpolation = interpolation;
            }
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn key_count(&self) -> usize {
        self.curves.iter().map(|c| c.keys.len()).sum()
    }
}
