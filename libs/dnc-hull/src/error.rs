//! # Error Types
//!
//! Error types for hull construction. Geometric degeneracies are absorbed by
//! the builder; only invalid input and internal inconsistencies surface here.
//!
//! ## Error Policy
//!
//! - Degenerate inputs (few points, duplicates, flat sets) are not errors
//! - A malformed equator cycle aborts the merge, no partial mesh is returned
//! - Errors carry the phase and vertex pair for debugging

use std::fmt;

use thiserror::Error;

// =============================================================================
// MERGE PHASES
// =============================================================================

/// Stage of hull construction in which a topology error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePhase {
    /// Phase 1, search for the seed bridge edge.
    SeedBridge,
    /// Phase 2, walk around the equator.
    EquatorWalk,
    /// Phase 3, removal of vertices hidden by the merge.
    InteriorPruning,
    /// Structural check of a finished mesh.
    Validation,
}

impl fmt::Display for MergePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MergePhase::SeedBridge => "seed bridge",
            MergePhase::EquatorWalk => "equator walk",
            MergePhase::InteriorPruning => "interior pruning",
            MergePhase::Validation => "validation",
        };
        f.write_str(name)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while building, reading or writing hulls.
///
/// ## Example
///
/// ```rust
/// use dnc_hull::{build, HullError};
///
/// match build(&[]) {
///     Err(HullError::EmptyInput) => {}
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum HullError {
    /// An invariant of the bridge cycle or the adjacency graph was violated.
    ///
    /// Fatal: the merge cannot proceed.
    #[error("Malformed topology during {phase} at ({a}, {b}): {message}")]
    MalformedTopology {
        /// Phase that detected the problem
        phase: MergePhase,
        /// First vertex of the offending pair
        a: usize,
        /// Second vertex of the offending pair
        b: usize,
        /// Error message
        message: String,
    },

    /// No points were supplied.
    #[error("Cannot build a hull from an empty point set")]
    EmptyInput,

    /// A point cannot take part in a hull.
    #[error("Invalid input point {index}: {message}")]
    InvalidInput {
        /// Index of the point in the input slice
        index: usize,
        /// Error message
        message: String,
    },

    /// A point file line could not be parsed.
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// Error message
        message: String,
    },

    /// Reading points or writing a mesh failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HullError {
    /// Creates a malformed topology error for a vertex pair.
    pub fn malformed(phase: MergePhase, a: usize, b: usize, message: impl Into<String>) -> Self {
        Self::MalformedTopology {
            phase,
            a,
            b,
            message: message.into(),
        }
    }

    /// Creates a parse error for a 1-based line number.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

// =============================================================================
// RESULT TYPE ALIAS
// =============================================================================

/// Result type alias for hull operations.
pub type HullResult<T> = Result<T, HullError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test error display messages.
    #[test]
    fn test_error_display() {
        let err = HullError::malformed(MergePhase::InteriorPruning, 3, 7, "links share no side");
        let text = err.to_string();
        assert!(text.contains("interior pruning"));
        assert!(text.contains("(3, 7)"));
        assert!(text.contains("links share no side"));

        let parse = HullError::parse(12, "expected 3 coordinates");
        assert!(parse.to_string().contains("line 12"));
    }

    /// Test every phase has its own name.
    #[test]
    fn test_merge_phase_names() {
        let names: Vec<String> = [
            MergePhase::SeedBridge,
            MergePhase::EquatorWalk,
            MergePhase::InteriorPruning,
            MergePhase::Validation,
        ]
        .iter()
        .map(|phase| phase.to_string())
        .collect();
        assert_eq!(names, ["seed bridge", "equator walk", "interior pruning", "validation"]);
    }

    /// Test io errors convert through `?`.
    #[test]
    fn test_io_error_converts() {
        fn fails() -> HullResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(HullError::Io(_))));
    }

    /// Test error types are Send + Sync for use across rayon workers.
    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HullError>();
    }
}
