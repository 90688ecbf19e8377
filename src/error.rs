//! Error types for the packing core.
//!
//! Every failure is returned as a `PackError` from the top-level entry
//! points; nothing panics across the library boundary.

use crate::types::Rect;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PackError {
    /// One or more parts cannot fit the stock sheet in any grain-legal
    /// orientation. Carries every offending part id so the caller can fix
    /// the whole list in one round trip.
    #[error("part(s) {} do not fit stock {stock} in any legal orientation", .ids.join(", "))]
    PartTooLarge { ids: Vec<String>, stock: Rect },

    /// Rejected before any placement work starts.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Internal consistency check failed. A layout produced after this
    /// would not be physically cuttable, so the run aborts instead.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl PackError {
    /// Part ids that could not be placed, empty for non-placement errors.
    pub fn unplaced_ids(&self) -> &[String] {
        match self {
            PackError::PartTooLarge { ids, .. } => ids,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_too_large_message_lists_ids() {
        let e = PackError::PartTooLarge {
            ids: vec!["door".into(), "back-panel".into()],
            stock: Rect::new(2700, 1800),
        };
        let msg = e.to_string();
        assert!(msg.contains("door"));
        assert!(msg.contains("back-panel"));
        assert!(msg.contains("2700x1800"));
        assert_eq!(e.unplaced_ids().len(), 2);
    }

    #[test]
    fn test_config_error_has_no_unplaced() {
        let e = PackError::InvalidConfiguration("stock dimensions must be non-zero".into());
        assert!(e.unplaced_ids().is_empty());
    }
}
