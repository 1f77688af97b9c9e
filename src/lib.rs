/*!
Trim the rims of holes in a halfedge mesh down to a height estimated from the
shape of each hole.

The crate is built around a halfedge polygon mesh, [`PolyMesh`], in the
spirit of [OpenMesh](https://www.graphics.rwth-aachen.de/software/openmesh/).
Mesh elements are addressed by integer handles ([`VH`], [`HH`], [`EH`],
[`FH`]). Deleting a face only marks it as deleted, so handles and the
persistent face identifiers of everything else stay valid while the mesh is
being trimmed.

# Overview

+ [`find_boundary_loops`] partitions the boundary halfedges of the mesh into
  closed [`BoundaryLoop`]s.

+ The [`analysis`] functions compute centroids, order loops by size and pick
  the two holes to trim out of the largest ones with
  [`select_arm_holes`](analysis::select_arm_holes).

+ [`smooth_boundary`] evens out the vertices along a loop.

+ [`estimate_cutoff`] walks part of a loop looking for the sharpest change in
  slope, and reports the height there.

+ [`trim_hole`] removes the faces around a hole that dip below the cutoff,
  round after round, and reports the identifiers of the removed faces.

+ [`trim_arm_holes`] runs all of the above on a mesh with two holes, and the
  `holetrim` binary does the same for files on disk, mapping the removed
  faces onto a [`FaceSoup`] loaded from a second file.
*/

mod macros;

pub mod analysis;
mod boundary;
mod check;
mod cutoff;
mod element;
mod error;
mod iterator;
mod mesh;
mod obj;
mod off;
mod pipeline;
mod primitive;
mod property;
mod smooth;
mod soup;
mod status;
mod topol;
mod trim;

pub use analysis::{Axis, compute_centroid, nearest_centroid, nearest_loop, sort_by_size};
pub use boundary::{BoundaryLoop, find_boundary_loops};
pub use cutoff::{CutoffEstimate, CutoffOptions, Extreme, estimate_cutoff};
pub use element::{EH, FH, HH, Handle, HasTopology, VH};
pub use error::Error;
pub use mesh::PolyMesh;
pub use off::read_off;
pub use pipeline::{HoleReport, PipelineConfig, PipelineReport, trim_arm_holes};
pub use property::{FPropBuf, FProperty, PropBuf, Property, VPropBuf, VProperty};
pub use smooth::{smooth_boundaries, smooth_boundary};
pub use soup::FaceSoup;
pub use status::Status;
pub use trim::{TrimOptions, TrimOutcome, trim_hole};
