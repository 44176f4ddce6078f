//! Numeric kernel shared by the simulation and the renderer.
//!
//! Rotations go through a sampled cosine table instead of `f32::cos` so the
//! facing vectors used for prediction are bit-for-bit reproducible.

use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::OnceLock;

use glam::Vec2;

pub const INV_SQRT2: f32 = std::f32::consts::FRAC_1_SQRT_2;

const COS_STEP: f64 = 0.005;
const INV_COS_STEP: f32 = 200.0;
const COS_SAMPLES: usize = (std::f64::consts::TAU / COS_STEP) as usize + 1;

fn cos_table() -> &'static [f32; COS_SAMPLES] {
    static TABLE: OnceLock<[f32; COS_SAMPLES]> = OnceLock::new();
    TABLE.get_or_init(|| std::array::from_fn(|i| (COS_STEP * i as f64).cos() as f32))
}

/// Approximate `1 / sqrt(n)` with one Newton iteration (~0.2% error).
#[inline]
pub fn inv_sqrt(n: f32) -> f32 {
    let half = n * 0.5;
    let bits = 0x5F37_59DF_u32.wrapping_sub(n.to_bits() >> 1);
    let y = f32::from_bits(bits);
    y * (1.5 - half * y * y)
}

pub fn cos(angle: f32) -> f32 {
    let table = cos_table();
    let angle = modulo(angle.abs(), TAU);
    let mut weight = angle * INV_COS_STEP;
    let i1 = (weight as usize).min(COS_SAMPLES - 1);
    let i2 = if i1 + 1 >= COS_SAMPLES { 0 } else { i1 + 1 };
    weight -= i1 as f32;
    lerp(weight, table[i1], table[i2])
}

#[inline]
pub fn sin(angle: f32) -> f32 {
    cos(angle - FRAC_PI_2)
}

#[inline]
pub fn tan(angle: f32) -> f32 {
    sin(angle) / cos(angle)
}

/// `1.0` when the sign bit is clear (including `+0.0`), `-1.0` otherwise.
#[inline]
pub fn sign(x: f32) -> f32 {
    if x.is_sign_positive() { 1.0 } else { -1.0 }
}

/// Blend from `from` (weight 0) to `to` (weight 1).
#[inline]
pub fn lerp(weight: f32, from: f32, to: f32) -> f32 {
    (1.0 - weight) * from + weight * to
}

/// Truncating remainder, same sign as `value`.
#[inline]
pub fn modulo(value: f32, modulus: f32) -> f32 {
    value - ((value / modulus) as i32) as f32 * modulus
}

/// Keeps an angle in `[0, 2π)` after adding a small delta.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    if angle >= TAU {
        angle - TAU
    } else if angle < 0.0 {
        angle + TAU
    } else {
        angle
    }
}

#[inline]
pub fn unit_vector(angle: f32) -> Vec2 {
    Vec2::new(cos(angle), sin(angle))
}

#[inline]
pub fn fast_normalize(v: Vec2) -> Vec2 {
    v * inv_sqrt(v.length_squared())
}
