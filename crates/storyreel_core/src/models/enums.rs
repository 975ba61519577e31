//! Core enums used throughout the pipeline.

use serde::{Deserialize, Serialize};

/// Direction for the (reserved) pan effect.
///
/// Carried in the config for forward compatibility; the current renderer
/// produces static segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanDirection {
    #[default]
    Left,
    Right,
}

impl std::fmt::Display for PanDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PanDirection::Left => write!(f, "left"),
            PanDirection::Right => write!(f, "right"),
        }
    }
}

/// Transition style between adjacent segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionStyle {
    /// Cross-fade at segment boundaries (one second per fade).
    #[default]
    Fade,
    /// Hard cut, plain concatenation.
    Concat,
}

impl std::fmt::Display for TransitionStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionStyle::Fade => write!(f, "fade"),
            TransitionStyle::Concat => write!(f, "concat"),
        }
    }
}

/// Terminal status of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Pending => write!(f, "pending"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}
