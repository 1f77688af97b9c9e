use std::collections::HashSet;

use crate::{
    analysis::Axis,
    boundary::BoundaryLoop,
    element::{FH, HH},
    error::Error,
    mesh::PolyMesh,
};

/// Options for [`trim_hole`].
#[derive(Clone, Debug)]
pub struct TrimOptions {
    /// Give up after this many rounds that removed faces. `None` means
    /// keep going until nothing is left to remove.
    pub max_rounds: Option<usize>,
    pub height_axis: Axis,
}

impl Default for TrimOptions {
    fn default() -> Self {
        Self {
            max_rounds: None,
            height_axis: Axis::Y,
        }
    }
}

impl TrimOptions {
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    pub fn with_height_axis(mut self, axis: Axis) -> Self {
        self.height_axis = axis;
        self
    }
}

/// What is left after trimming a hole.
#[derive(Debug)]
pub struct TrimOutcome {
    /// The hole after the last round.
    pub boundary: BoundaryLoop,
    /// Identifiers of the removed faces, in the order they were removed.
    pub removed: Vec<u32>,
    /// Number of rounds that removed faces.
    pub rounds: usize,
}

/// Result of walking the loop once.
struct Round {
    marked: Vec<FH>,
    survivors: Vec<HH>,
}

fn mark_faces(
    mesh: &PolyMesh,
    bloop: &BoundaryLoop,
    cutoff: f64,
    axis: Axis,
) -> Result<Round, Error> {
    let points = mesh.points();
    let points = points.try_borrow()?;
    let mut seen: HashSet<FH> = HashSet::new();
    let mut round = Round {
        marked: Vec::new(),
        survivors: Vec::new(),
    };
    for &h in bloop.halfedges() {
        if axis.coord(points[h.head(mesh)]) < cutoff {
            // Nothing to remove across an edge that is boundary on both sides.
            if let Some(f) = mesh.halfedge_face(h.opposite()) {
                if seen.insert(f) {
                    round.marked.push(f);
                }
            }
        } else {
            round.survivors.push(h);
        }
    }
    Ok(round)
}

/// Grow a hole by removing the faces around it that dip below `cutoff`.
///
/// Every round walks the hole and removes the faces across the boundary
/// edges whose head vertex is below the cutoff. The grown hole is then
/// traced again, starting from the first boundary halfedge of the walk
/// whose head was not below the cutoff. Trimming stops after a round that
/// finds nothing to remove.
///
/// If no halfedge of the walk is left to continue from, the hole has eaten
/// everything around it and this returns [`Error::HoleExhausted`]. When
/// `opts.max_rounds` is set and another round would be needed, this returns
/// [`Error::RoundLimitExceeded`]. In both cases the faces already removed
/// stay removed, and their identifiers are carried by the error.
pub fn trim_hole(
    mesh: &mut PolyMesh,
    bloop: BoundaryLoop,
    cutoff: f64,
    opts: &TrimOptions,
) -> Result<TrimOutcome, Error> {
    bloop.ensure_current(mesh)?;
    let mut bloop = bloop;
    let mut removed: Vec<u32> = Vec::new();
    let mut rounds = 0usize;
    loop {
        let Round { marked, survivors } = mark_faces(mesh, &bloop, cutoff, opts.height_axis)?;
        if marked.is_empty() {
            log::debug!(
                "Trimming settled after {} rounds, removed {} faces",
                rounds,
                removed.len()
            );
            return Ok(TrimOutcome {
                boundary: bloop,
                removed,
                rounds,
            });
        }
        if let Some(max_rounds) = opts.max_rounds {
            if rounds >= max_rounds {
                log::warn!(
                    "Trimming stopped at the round limit of {} with {} faces removed",
                    max_rounds,
                    removed.len()
                );
                return Err(Error::RoundLimitExceeded { rounds, removed });
            }
        }
        for f in &marked {
            removed.push(mesh.face_id(*f)?);
        }
        for f in marked.iter() {
            mesh.delete_face(*f)?;
        }
        rounds += 1;
        log::debug!(
            "Trimming round {} removed {} faces below {}",
            rounds,
            marked.len(),
            cutoff
        );
        let seed = survivors
            .into_iter()
            .find(|h| !h.is_deleted(mesh) && mesh.is_boundary_halfedge(*h));
        match seed {
            Some(seed) => bloop = BoundaryLoop::trace(mesh, seed)?,
            None => {
                log::warn!(
                    "Nothing left of the hole above {} after removing {} faces",
                    cutoff,
                    removed.len()
                );
                return Err(Error::HoleExhausted { removed });
            }
        }
    }
}
