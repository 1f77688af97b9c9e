use crate::{
    analysis::Axis,
    boundary::BoundaryLoop,
    element::{HH, VH},
    error::Error,
    mesh::PolyMesh,
};

/// Which end of an axis to look for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extreme {
    Min,
    Max,
}

impl Extreme {
    fn is_better(self, candidate: f64, best: f64) -> bool {
        match self {
            Extreme::Min => candidate < best,
            Extreme::Max => candidate > best,
        }
    }
}

/// Options for [`estimate_cutoff`].
#[derive(Clone, Debug)]
pub struct CutoffOptions {
    /// Portion of the loop to scan, in `(0, 1]`.
    pub fraction: f64,
    /// Number of halfedges between the two ends of a slope.
    pub slope_step: usize,
    /// Slopes are divided by this.
    pub slope_scale: f64,
    /// Axis along which heights are measured.
    pub height_axis: Axis,
    /// Axis used to pick where the scan starts.
    pub start_axis: Axis,
    /// The scan starts at the loop vertex with this extreme coordinate
    /// along `start_axis`.
    pub start: Extreme,
}

impl Default for CutoffOptions {
    fn default() -> Self {
        Self {
            fraction: 0.3,
            slope_step: 3,
            slope_scale: 0.001,
            height_axis: Axis::Y,
            start_axis: Axis::Z,
            start: Extreme::Max,
        }
    }
}

impl CutoffOptions {
    pub fn with_fraction(mut self, fraction: f64) -> Self {
        self.fraction = fraction;
        self
    }

    pub fn with_slope_step(mut self, slope_step: usize) -> Self {
        self.slope_step = slope_step;
        self
    }

    pub fn with_slope_scale(mut self, slope_scale: f64) -> Self {
        self.slope_scale = slope_scale;
        self
    }

    pub fn with_height_axis(mut self, axis: Axis) -> Self {
        self.height_axis = axis;
        self
    }

    pub fn with_start_axis(mut self, axis: Axis) -> Self {
        self.start_axis = axis;
        self
    }

    pub fn with_start(mut self, start: Extreme) -> Self {
        self.start = start;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.fraction > 0.0 && self.fraction <= 1.0) {
            return Err(Error::invalid_param(
                "fraction",
                self.fraction,
                "must be in (0, 1]",
            ));
        }
        if self.slope_step == 0 {
            return Err(Error::invalid_param(
                "slope_step",
                self.slope_step,
                "must be positive",
            ));
        }
        if !(self.slope_scale.is_finite() && self.slope_scale > 0.0) {
            return Err(Error::invalid_param(
                "slope_scale",
                self.slope_scale,
                "must be finite and positive",
            ));
        }
        Ok(())
    }

    /// The fewest halfedges a loop needs for the scan.
    pub fn min_loop_len(&self) -> usize {
        2 * self.slope_step + 2
    }
}

/// Result of [`estimate_cutoff`].
#[derive(Clone, Copy, Debug)]
pub struct CutoffEstimate {
    /// The cutoff height.
    pub height: f64,
    /// The loop halfedge whose head sets the cutoff height.
    pub halfedge: HH,
    pub vertex: VH,
    /// Number of `next` steps from the start of the scan to `halfedge`.
    pub offset: usize,
}

fn advance(mesh: &PolyMesh, mut h: HH, steps: usize) -> HH {
    for _ in 0..steps {
        h = mesh.next_halfedge(h);
    }
    h
}

/// Estimate the height below which the faces around a hole are to be
/// removed.
///
/// The scan starts at the loop vertex with the extreme coordinate along
/// `start_axis`, and walks along the loop comparing the height slope over
/// `slope_step` halfedges at each position with the slope `slope_step`
/// halfedges further on. The height at the position with the sharpest
/// increase in slope is the cutoff.
pub fn estimate_cutoff(
    mesh: &PolyMesh,
    bloop: &BoundaryLoop,
    opts: &CutoffOptions,
) -> Result<CutoffEstimate, Error> {
    opts.validate()?;
    bloop.ensure_current(mesh)?;
    let len = bloop.len();
    if len < opts.min_loop_len() {
        return Err(Error::LoopTooShort {
            len,
            min: opts.min_loop_len(),
        });
    }
    let points = mesh.points();
    let points = points.try_borrow()?;
    let height = |h: HH| opts.height_axis.coord(points[h.head(mesh)]);
    let start = bloop
        .halfedges()
        .iter()
        .map(|&h| (h, opts.start_axis.coord(points[h.head(mesh)])))
        .fold(None, |best: Option<(HH, f64)>, (h, c)| match best {
            Some((_, bc)) if !opts.start.is_better(c, bc) => best,
            _ => Some((h, c)),
        })
        .map(|(h, _)| h)
        .ok_or(Error::EmptyLoop)?;
    let slope = |h: HH| (height(h) - height(advance(mesh, h, opts.slope_step))) / opts.slope_scale;
    let steps = (opts.fraction * len as f64).ceil() as usize;
    let mut best: Option<(usize, f64)> = None;
    let mut current = mesh.next_halfedge(start);
    for i in 0..steps {
        let diff = slope(advance(mesh, current, opts.slope_step)) - slope(current);
        match best {
            Some((_, bdiff)) if bdiff >= diff => {}
            _ => best = Some((i, diff)),
        }
        current = mesh.next_halfedge(current);
    }
    let offset = best.map(|(i, _)| i).unwrap_or(0);
    let halfedge = advance(mesh, start, offset);
    let vertex = halfedge.head(mesh);
    let estimate = CutoffEstimate {
        height: height(halfedge),
        halfedge,
        vertex,
        offset,
    };
    log::debug!(
        "Cutoff height {} at {} after scanning {} of {} halfedges from {}",
        estimate.height,
        vertex,
        steps,
        len,
        start
    );
    Ok(estimate)
}
