use std::collections::HashSet;

use glam::DVec3;

use crate::{
    analysis::{select_arm_holes, Axis},
    boundary::{find_boundary_loops, BoundaryLoop},
    cutoff::{estimate_cutoff, CutoffEstimate, CutoffOptions, Extreme},
    error::Error,
    mesh::PolyMesh,
    smooth::smooth_boundaries,
    trim::{trim_hole, TrimOptions},
};

/// Settings for [`trim_arm_holes`].
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Smoothing passes applied to every boundary loop before anything else.
    pub smoothing_iterations: usize,
    /// Number of the largest loops considered when picking the two holes.
    pub candidates: usize,
    /// Axis separating the left hole from the right hole.
    pub side_axis: Axis,
    /// Cutoff estimation for the left hole.
    pub left: CutoffOptions,
    /// Cutoff estimation for the right hole.
    pub right: CutoffOptions,
    pub trim: TrimOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            smoothing_iterations: 10,
            candidates: 4,
            side_axis: Axis::X,
            left: CutoffOptions::default().with_start(Extreme::Max),
            right: CutoffOptions::default().with_start(Extreme::Min),
            trim: TrimOptions::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_smoothing_iterations(mut self, iterations: usize) -> Self {
        self.smoothing_iterations = iterations;
        self
    }

    pub fn with_candidates(mut self, candidates: usize) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_side_axis(mut self, axis: Axis) -> Self {
        self.side_axis = axis;
        self
    }

    /// Set the scanned portion of the loop for both holes.
    pub fn with_fraction(mut self, fraction: f64) -> Self {
        self.left.fraction = fraction;
        self.right.fraction = fraction;
        self
    }

    /// Set the axis heights are measured along, for estimation and trimming.
    pub fn with_height_axis(mut self, axis: Axis) -> Self {
        self.left.height_axis = axis;
        self.right.height_axis = axis;
        self.trim.height_axis = axis;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.trim.max_rounds = Some(max_rounds);
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.candidates < 2 {
            return Err(Error::invalid_param(
                "candidates",
                self.candidates,
                "at least two holes are needed",
            ));
        }
        self.left.validate()?;
        self.right.validate()
    }
}

/// What happened to one hole.
#[derive(Debug)]
pub struct HoleReport {
    /// Centroid of the hole when it was selected.
    pub centroid: DVec3,
    pub cutoff: CutoffEstimate,
    /// The hole after trimming.
    pub boundary: BoundaryLoop,
    /// Identifiers of the faces removed around this hole.
    pub removed: Vec<u32>,
    pub rounds: usize,
}

#[derive(Debug)]
pub struct PipelineReport {
    /// Number of boundary loops in the mesh before trimming.
    pub loops_found: usize,
    pub left: HoleReport,
    pub right: HoleReport,
}

impl PipelineReport {
    /// All removed face identifiers, left hole first.
    pub fn removed_ids(&self) -> Vec<u32> {
        self.left
            .removed
            .iter()
            .chain(self.right.removed.iter())
            .copied()
            .collect()
    }

    pub fn removed_set(&self) -> HashSet<u32> {
        self.left
            .removed
            .iter()
            .chain(self.right.removed.iter())
            .copied()
            .collect()
    }
}

fn trim_one(
    mesh: &mut PolyMesh,
    bloop: BoundaryLoop,
    cutoff: CutoffEstimate,
    opts: &TrimOptions,
) -> Result<HoleReport, Error> {
    let centroid = bloop.centroid();
    let outcome = trim_hole(mesh, bloop, cutoff.height, opts)?;
    Ok(HoleReport {
        centroid,
        cutoff,
        boundary: outcome.boundary,
        removed: outcome.removed,
        rounds: outcome.rounds,
    })
}

/// Find the two arm holes of the mesh and trim both down to their cutoff
/// heights.
///
/// The boundary is normalized, all loops are smoothed, and the left and
/// right holes are picked among the largest loops. A cutoff is estimated for
/// each before either is trimmed. The right hole is traced again after the
/// left one is trimmed, in case the two met. Positions are not touched
/// when there are fewer loops than `candidates`.
pub fn trim_arm_holes(mesh: &mut PolyMesh, config: &PipelineConfig) -> Result<PipelineReport, Error> {
    config.validate()?;
    mesh.normalize_boundary()?;
    let mut loops = find_boundary_loops(mesh)?;
    let loops_found = loops.len();
    log::info!("Found {} boundary loops", loops_found);
    if loops_found < config.candidates {
        return Err(Error::NotEnoughLoops {
            found: loops_found,
            required: config.candidates,
        });
    }
    smooth_boundaries(mesh, &mut loops, config.smoothing_iterations)?;
    let holes = select_arm_holes(loops, config.candidates, config.side_axis)?;
    let left_cutoff = estimate_cutoff(mesh, &holes.left, &config.left)?;
    let right_cutoff = estimate_cutoff(mesh, &holes.right, &config.right)?;
    log::info!(
        "Cutoff heights: left {}, right {}",
        left_cutoff.height,
        right_cutoff.height
    );
    let left = trim_one(mesh, holes.left, left_cutoff, &config.trim)?;
    log::info!(
        "Removed {} faces around the left hole in {} rounds",
        left.removed.len(),
        left.rounds
    );
    let right_loop = holes.right.retrace(mesh)?;
    let right = trim_one(mesh, right_loop, right_cutoff, &config.trim)?;
    log::info!(
        "Removed {} faces around the right hole in {} rounds",
        right.removed.len(),
        right.rounds
    );
    Ok(PipelineReport {
        loops_found,
        left,
        right,
    })
}

#[cfg(test)]
mod test {
    use glam::DVec3;

    use crate::{error::Error, mesh::PolyMesh};

    use super::{trim_arm_holes, PipelineConfig};

    const SEGMENTS: usize = 16;
    const RINGS: usize = 4;

    /// Open tube along X whose rings rise towards the middle, so only the
    /// rim of each end dips below the cutoff.
    fn sleeve() -> PolyMesh {
        let mut mesh = PolyMesh::open_tube(1.0, 8.0, SEGMENTS, RINGS).expect("Cannot create tube");
        for r in 0..=RINGS {
            let lift = 5.0 * r.min(RINGS - r) as f64;
            for s in 0..SEGMENTS {
                let v = ((r * SEGMENTS + s) as u32).into();
                let p = mesh.point(v).expect("Cannot read point");
                mesh.set_point(v, p + DVec3::Y * lift)
                    .expect("Cannot set point");
            }
        }
        mesh
    }

    #[test]
    fn t_trim_sleeve() {
        let mut mesh = sleeve();
        let before = mesh.num_live_faces();
        let report = trim_arm_holes(&mut mesh, &PipelineConfig::default().with_candidates(2))
            .expect("Pipeline failed");
        assert_eq!(report.loops_found, 2);
        assert!(report.left.centroid.x > 0.0);
        assert!(report.right.centroid.x < 0.0);
        let removed = report.removed_ids();
        assert_eq!(removed.len(), report.removed_set().len());
        assert_eq!(mesh.num_live_faces(), before - removed.len());
        // Only the outermost band at each end is touched.
        let band = 2 * SEGMENTS as u32;
        for id in &report.left.removed {
            assert!(*id >= band * (RINGS as u32 - 1), "Face {} is too deep", id);
        }
        for id in &report.right.removed {
            assert!(*id < band, "Face {} is too deep", id);
        }
        for f in mesh.faces() {
            let id = mesh.face_id(f).expect("Cannot read face id");
            assert_eq!(f.is_deleted(&mesh), report.removed_set().contains(&id));
        }
        for hole in [&report.left, &report.right] {
            assert!(hole.boundary.is_current(&mesh));
            for v in hole.boundary.vertices(&mesh) {
                assert!(mesh.point(v).expect("Cannot read point").y >= hole.cutoff.height);
            }
        }
        mesh.check_topology().expect("Topology check failed");
    }

    #[test]
    fn t_not_enough_holes() {
        let mut mesh = sleeve();
        assert!(matches!(
            trim_arm_holes(&mut mesh, &PipelineConfig::default()),
            Err(Error::NotEnoughLoops {
                found: 2,
                required: 4
            })
        ));
        let mut mesh = PolyMesh::unit_box().expect("Cannot create box");
        assert!(matches!(
            trim_arm_holes(&mut mesh, &PipelineConfig::default().with_candidates(2)),
            Err(Error::NotEnoughLoops { found: 0, .. })
        ));
    }

    #[test]
    fn t_not_enough_holes_leaves_mesh_alone() {
        let mut mesh = sleeve();
        let before: Vec<DVec3> = mesh
            .vertices()
            .map(|v| mesh.point(v).expect("Cannot read point"))
            .collect();
        assert!(trim_arm_holes(&mut mesh, &PipelineConfig::default().with_candidates(3)).is_err());
        for (v, p) in mesh.vertices().zip(before) {
            assert_eq!(mesh.point(v).expect("Cannot read point"), p);
        }
        assert_eq!(mesh.num_live_faces(), mesh.num_faces());
    }

    #[test]
    fn t_invalid_config() {
        let mut mesh = sleeve();
        assert!(matches!(
            trim_arm_holes(&mut mesh, &PipelineConfig::default().with_candidates(1)),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            trim_arm_holes(&mut mesh, &PipelineConfig::default().with_fraction(2.0)),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
