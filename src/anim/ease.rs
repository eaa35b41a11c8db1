// src/anim/ease.rs
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
pub enum Ease {
    /// `linear(t)`
    #[default]
    Linear,
    /// `accelerate(t)` (quad-in)
    Accelerate,
    /// `decelerate(t)` (quad-out)
    Decelerate,
    /// quad-in for the first half, quad-out for the second
    Smooth,
    /// Holds the start value until the very end of the range.
    Hold,
}

impl Ease {
    #[inline(always)]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Accelerate => t * t,
            Ease::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Smooth => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            Ease::Hold => {
                if t >= 1.0 { 1.0 } else { 0.0 }
            }
        }
    }

    /// Config spelling (`linear`, `accelerate`, `decelerate`, `smooth`, `hold`).
    pub fn from_name(name: &str) -> Option<Ease> {
        match name.trim().to_ascii_lowercase().as_str() {
            "linear" => Some(Ease::Linear),
            "accelerate" => Some(Ease::Accelerate),
            "decelerate" => Some(Ease::Decelerate),
            "smooth" => Some(Ease::Smooth),
            "hold" => Some(Ease::Hold),
            _ => None,
        }
    }
}
