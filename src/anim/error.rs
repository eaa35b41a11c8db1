// src/anim/error.rs
use std::error::Error;
use std::fmt;

/// Malformed animation setup. Only ever produced while building mappers,
/// domains and thresholds; per-sample evaluation never fails.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    EmptyDomain { start: f32, end: f32 },
    PhaseBounds { id: String, start: f32, end: f32 },
    PhaseOrder { id: String },
    Crossfade { width: f32, narrowest: f32 },
    Anchors { enter: f32, settle: f32 },
    Threshold { name: &'static str, value: f32 },
    NoPhases,
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::EmptyDomain { start, end } => {
                write!(f, "signal domain [{}, {}] is empty or not finite", start, end)
            }
            MotionError::PhaseBounds { id, start, end } => {
                write!(f, "phase '{}' has invalid range [{}, {}]", id, start, end)
            }
            MotionError::PhaseOrder { id } => {
                write!(f, "phase '{}' starts before the previous phase ends", id)
            }
            MotionError::Crossfade { width, narrowest } => write!(
                f,
                "crossfade width {} exceeds the narrowest phase ({})",
                width, narrowest
            ),
            MotionError::Anchors { enter, settle } => write!(
                f,
                "scroll anchors must satisfy 0 <= settle < enter <= 1 (enter {}, settle {})",
                enter, settle
            ),
            MotionError::Threshold { name, value } => {
                write!(f, "threshold '{}' has invalid value {}", name, value)
            }
            MotionError::NoPhases => write!(f, "a phase sequence needs at least one phase"),
        }
    }
}

impl Error for MotionError {}
