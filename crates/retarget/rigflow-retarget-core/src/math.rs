//! Small fixed-size math helpers:
//! - component-wise vec3 ops
//! - quaternion product / rotation (x, y, z, w order)
//! - XYZ Euler <-> quaternion conversion
//! - local TRS transform with parent/child composition

use serde::{Deserialize, Serialize};

#[inline]
pub fn add_vec3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn mul_vec3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2]]
}

#[inline]
fn cross3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub const QUAT_IDENTITY: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Hamilton product `a * b` (apply `b` first, then `a`).
#[inline]
pub fn quat_mul(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    let [ax, ay, az, aw] = a;
    let [bx, by, bz, bw] = b;
    [
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
        aw * bw - ax * bx - ay * by - az * bz,
    ]
}

#[inline]
pub fn quat_normalize(mut q: [f32; 4]) -> [f32; 4] {
    let len2 = q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3];
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        q[0] *= inv_len;
        q[1] *= inv_len;
        q[2] *= inv_len;
        q[3] *= inv_len;
    }
    q
}

/// Rotate a vector by a unit quaternion.
#[inline]
pub fn quat_rotate_vec3(q: [f32; 4], v: [f32; 3]) -> [f32; 3] {
    let u = [q[0], q[1], q[2]];
    let t = cross3(u, v);
    let t = [t[0] * 2.0, t[1] * 2.0, t[2] * 2.0];
    add_vec3(add_vec3(v, [t[0] * q[3], t[1] * q[3], t[2] * q[3]]), cross3(u, t))
}

/// Quaternion from XYZ Euler angles (radians, x applied first).
pub fn quat_from_euler(e: [f32; 3]) -> [f32; 4] {
    let (sx, cx) = (e[0] * 0.5).sin_cos();
    let (sy, cy) = (e[1] * 0.5).sin_cos();
    let (sz, cz) = (e[2] * 0.5).sin_cos();
    let qx = [sx, 0.0, 0.0, cx];
    let qy = [0.0, sy, 0.0, cy];
    let qz = [0.0, 0.0, sz, cz];
    quat_mul(quat_mul(qz, qy), qx)
}

/// XYZ Euler angles (radians) from a unit quaternion.
pub fn euler_from_quat(q: [f32; 4]) -> [f32; 3] {
    let [x, y, z, w] = q;
    // sin(pitch) comes from the m20 element of the rotation matrix.
    let sy = 2.0 * (w * y - x * z);
    if sy.abs() >= 0.999_999 {
        // Gimbal lock: fold the z rotation into x.
        let ex = (2.0 * (w * x - y * z)).atan2(1.0 - 2.0 * (x * x + z * z));
        return [ex, sy.clamp(-1.0, 1.0).asin(), 0.0];
    }
    [
        (2.0 * (y * z + w * x)).atan2(1.0 - 2.0 * (x * x + y * y)),
        sy.asin(),
        (2.0 * (x * y + w * z)).atan2(1.0 - 2.0 * (y * y + z * z)),
    ]
}

/// Local bone transform as separate location / XYZ Euler rotation / scale
/// channels. Channels stay decomposed so per-axis shaping can address them
/// directly; composition goes through quaternions.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: [f32; 3],
    pub rotation_euler: [f32; 3],
    pub scale: [f32; 3],
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: [0.0, 0.0, 0.0],
        rotation_euler: [0.0, 0.0, 0.0],
        scale: [1.0, 1.0, 1.0],
    };

    #[inline]
    pub fn rotation_quat(&self) -> [f32; 4] {
        quat_from_euler(self.rotation_euler)
    }

    /// Compose `self` (acting as the parent) with `child`.
    /// Scale is combined component-wise; no shear term is introduced.
    pub fn compose(&self, child: &Transform) -> Transform {
        let pr = self.rotation_quat();
        let rotated = quat_rotate_vec3(pr, mul_vec3(self.scale, child.translation));
        Transform {
            translation: add_vec3(self.translation, rotated),
            rotation_euler: euler_from_quat(quat_normalize(quat_mul(pr, child.rotation_quat()))),
            scale: mul_vec3(self.scale, child.scale),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}
