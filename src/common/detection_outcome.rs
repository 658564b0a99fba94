use std::time::Duration;
use thiserror::Error;
use crate::common::BoundingBox;

/// Lifecycle of a detection session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    #[default] Uninitialized,
    Ready,
    Closed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Ready => "ready",
            SessionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    /// Model or label asset missing or corrupt, or the declared shapes are unusable.
    #[error("Model or labels could not be loaded: {0}")]
    Initialization(String),

    #[error("Detector is {state}, expected {expected}")]
    InvalidState {
        state: SessionState,
        expected: SessionState,
    },

    /// Preprocessing or the model run itself failed.
    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Exactly one of these is produced per `detect` call.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionOutcome {
    /// Nothing cleared the confidence threshold.
    Empty,
    /// Boxes in confidence-descending order with the wall-clock time of the call.
    Detections {
        boxes: Vec<BoundingBox>,
        elapsed: Duration,
    },
    Error(String),
}

impl From<DetectError> for DetectionOutcome {
    fn from(err: DetectError) -> Self {
        DetectionOutcome::Error(err.to_string())
    }
}

impl DetectionOutcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, DetectionOutcome::Empty)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DetectionOutcome::Error(_))
    }

    /// Detected boxes, empty for the `Empty` and `Error` outcomes.
    pub fn boxes(&self) -> &[BoundingBox] {
        match self {
            DetectionOutcome::Detections { boxes, .. } => boxes,
            _ => &[],
        }
    }

    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            DetectionOutcome::Detections { elapsed, .. } => Some(*elapsed),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            DetectionOutcome::Error(message) => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_message_names_both_states() {
        let err = DetectError::InvalidState {
            state: SessionState::Closed,
            expected: SessionState::Ready,
        };
        assert_eq!(err.to_string(), "Detector is closed, expected ready");

        let outcome = DetectionOutcome::from(err);
        assert!(outcome.is_error());
        assert!(outcome.boxes().is_empty());
        assert_eq!(outcome.error_message(), Some("Detector is closed, expected ready"));
    }

    #[test]
    fn empty_is_not_an_error() {
        let outcome = DetectionOutcome::Empty;
        assert!(outcome.is_empty());
        assert!(!outcome.is_error());
        assert_eq!(outcome.elapsed(), None);
    }
}
