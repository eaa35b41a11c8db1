// src/utils/math.rs

#[inline(always)]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Position of `v` inside `[a, b]` as a fraction, clamped to `[0, 1]`.
/// Callers must handle `a == b` themselves; this returns 1.0 once `v >= b` there.
#[inline(always)]
pub fn inv_lerp(a: f32, b: f32, v: f32) -> f32 {
    let span = b - a;
    if span <= 0.0 {
        return if v >= b { 1.0 } else { 0.0 };
    }
    ((v - a) / span).clamp(0.0, 1.0)
}

#[inline(always)]
pub fn clamp01(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}
