//! Error types for planning and for the write-back boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    /// Only returned when the fallback site is disabled in the config.
    #[error("No flat site found: {candidates_checked} windows scanned, none within tolerance")]
    NoFlatSiteFound { candidates_checked: usize },

    #[error("Degenerate courtyard: footprint {width}x{length} yields courtyard size {size}")]
    DegenerateCourtyard { width: i32, length: i32, size: i32 },

    #[error("Degenerate roof tier {tier}: footprint span {span_x}x{span_z} cannot hold {tier_count} tiers")]
    DegenerateRoofTier {
        tier: u32,
        tier_count: u32,
        span_x: i32,
        span_z: i32,
    },

    #[error("Anchor ({x}, {z}) lies outside the elevation grid")]
    OutOfBoundsAnchor { x: i32, z: i32 },

    #[error("Invalid planner config: {0}")]
    InvalidConfig(String),

    #[error("Elevation grid is {actual_width}x{actual_depth}, build area needs {expected_width}x{expected_depth}")]
    GridSizeMismatch {
        expected_width: usize,
        expected_depth: usize,
        actual_width: usize,
        actual_depth: usize,
    },

    #[error("Layout failed after {attempts} attempts: {last}")]
    LayoutAttemptsExhausted {
        attempts: u32,
        last: Box<PlanError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl PlanError {
    /// Errors caused by an unlucky dimension draw; a fresh draw may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlanError::DegenerateCourtyard { .. } | PlanError::DegenerateRoofTier { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Position ({x}, {y}, {z}) rejected by backend: {reason}")]
    Rejected { x: i32, y: i32, z: i32, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let courtyard = PlanError::DegenerateCourtyard { width: 4, length: 4, size: 0 };
        let anchor = PlanError::OutOfBoundsAnchor { x: -1, z: 3 };
        assert!(courtyard.is_retryable());
        assert!(!anchor.is_retryable());
    }

    #[test]
    fn test_messages_carry_coordinates() {
        let err = PlanError::OutOfBoundsAnchor { x: 12, z: -4 };
        assert_eq!(err.to_string(), "Anchor (12, -4) lies outside the elevation grid");
    }
}
