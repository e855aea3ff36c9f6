//! Physics error types
//!
//! A simulation step never fails. These errors surface from the builders and
//! setters that accept user geometry and parameters before they reach the
//! solver.

use std::fmt;

/// Error type for physics setup operations
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// The key does not refer to a live body (removed or never added)
    UnknownBody,
    /// A polygon needs at least three vertices to enclose an area
    DegeneratePolygon { vertex_count: usize },
    /// Grid partition counts must be at least one in each direction
    InvalidGrid { width: u32, height: u32 },
    /// Mass must be zero (static) or positive
    NegativeMass(f32),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::UnknownBody => write!(f, "Unknown physics body"),
            PhysicsError::DegeneratePolygon { vertex_count } => {
                write!(f, "Degenerate polygon: {} vertices (need at least 3)", vertex_count)
            }
            PhysicsError::InvalidGrid { width, height } => {
                write!(f, "Invalid grid partitions: {}x{}", width, height)
            }
            PhysicsError::NegativeMass(mass) => write!(f, "Negative mass: {}", mass),
        }
    }
}

impl std::error::Error for PhysicsError {}
