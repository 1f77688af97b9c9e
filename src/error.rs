use std::path::PathBuf;

use thiserror::Error;

use crate::element::{FH, HH, VH};

#[derive(Debug, Error)]
pub enum Error {
    // Properties.
    #[error("property is already borrowed")]
    BorrowedPropertyAccess,
    #[error("mismatched array lengths: {0} and {1}")]
    MismatchedArrayLengths(usize, usize),
    // Topology.
    #[error("{0} is not manifold")]
    ComplexVertex(VH),
    #[error("{0} already has a face")]
    ComplexHalfedge(HH),
    #[error("unable to relink the patch around a new face")]
    PatchRelinkingFailed,
    #[error("{0} is deleted")]
    DeletedFace(FH),
    #[error("{0} is deleted")]
    DeletedVertex(VH),
    #[error("{0} is deleted")]
    DeletedHalfedge(HH),
    #[error("{0} is out of bounds")]
    InvalidHalfedge(HH),
    #[error("{0} starts and ends at the same vertex")]
    DegenerateHalfedge(HH),
    #[error("outgoing halfedge of {0} is not on the boundary")]
    OutgoingHalfedgeNotBoundary(VH),
    #[error("outgoing halfedges of {0} are inconsistent")]
    InvalidOutgoingHalfedges(VH),
    #[error("{0} has inconsistent next / prev links")]
    InvalidHalfedgeLink(HH),
    #[error("{0} cannot be reached from its vertices")]
    InvalidHalfedgeVertexLink(HH),
    #[error("loop through {0} visits a halfedge twice")]
    InvalidLoopTopology(HH),
    #[error("loop through {0} has halfedges with different faces")]
    InconsistentFaceInLoop(HH),
    #[error("{0} does not point back to {1}")]
    InvalidFaceHalfedgeLink(FH, HH),
    // Boundary.
    #[error("boundary is broken after {0}")]
    BrokenBoundary(HH),
    #[error("{0} is not a live boundary halfedge")]
    NotBoundaryHalfedge(HH),
    #[error("boundary walk from {0} does not close")]
    OpenBoundary(HH),
    #[error("boundary loop through {seed} has only {len} halfedges")]
    DegenerateLoop { seed: HH, len: usize },
    #[error("boundary loop is empty")]
    EmptyLoop,
    #[error("boundary loop through {0} no longer matches the mesh")]
    StaleLoop(HH),
    #[error("boundary loop has {len} halfedges, at least {min} are required")]
    LoopTooShort { len: usize, min: usize },
    #[error("found {found} boundary loops, at least {required} are required")]
    NotEnoughLoops { found: usize, required: usize },
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
    // Trimming.
    #[error("cutoff consumed the whole hole after removing {} faces", .removed.len())]
    HoleExhausted { removed: Vec<u32> },
    #[error("trimming did not settle within {rounds} rounds")]
    RoundLimitExceeded { rounds: usize, removed: Vec<u32> },
    // Files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to load obj: {0}")]
    ObjLoadFailed(String),
    #[error("invalid off file, line {line}: {reason}")]
    InvalidOff { line: usize, reason: String },
    #[error("incorrect number of coordinates: {0}")]
    IncorrectNumberOfCoordinates(usize),
    #[error("face references vertex {index}, but there are only {count} vertices")]
    InvalidVertexIndex { index: usize, count: usize },
    #[error("unsupported mesh file: {0}")]
    UnsupportedFormat(PathBuf),
}

impl Error {
    pub(crate) fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
