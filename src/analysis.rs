use glam::DVec3;

use crate::{boundary::BoundaryLoop, element::HH, error::Error, mesh::PolyMesh};

/// A coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// The coordinate of `p` along this axis.
    pub fn coord(self, p: DVec3) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
            Axis::Z => p.z,
        }
    }
}

/// Mean position of the vertices the given halfedges point to.
pub fn compute_centroid(mesh: &PolyMesh, halfedges: &[HH]) -> Result<DVec3, Error> {
    if halfedges.is_empty() {
        return Err(Error::EmptyLoop);
    }
    let points = mesh.points();
    let points = points.try_borrow()?;
    let sum = halfedges
        .iter()
        .fold(DVec3::ZERO, |sum, h| sum + points[h.head(mesh)]);
    Ok(sum / halfedges.len() as f64)
}

/// Sort loops by the number of halfedges, smallest first. Loops of equal
/// size keep their relative order.
pub fn sort_by_size(loops: &mut [BoundaryLoop]) {
    loops.sort_by_key(|l| l.len());
}

/// Index of the loop whose centroid is closest to `point`. Ties go to the
/// loop that comes first.
pub fn nearest_loop(point: DVec3, loops: &[BoundaryLoop]) -> Option<usize> {
    loops
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, l)| {
            let dsq = l.centroid().distance_squared(point);
            match best {
                Some((_, bestdsq)) if bestdsq <= dsq => best,
                _ => Some((i, dsq)),
            }
        })
        .map(|(i, _)| i)
}

/// The centroid closest to `point`, out of the centroids of all `loops`.
pub fn nearest_centroid(point: DVec3, loops: &[BoundaryLoop]) -> Option<DVec3> {
    nearest_loop(point, loops).map(|i| loops[i].centroid())
}

/// The two loops picked out as the holes to trim.
#[derive(Debug)]
pub struct ArmHoles {
    /// Candidate with the largest centroid coordinate along the side axis.
    pub left: BoundaryLoop,
    /// Candidate with the smallest centroid coordinate along the side axis.
    pub right: BoundaryLoop,
}

/// Pick the left and right holes among the `candidates` largest loops.
///
/// The loops are ranked by size, largest first, with equal sizes keeping
/// their order. Among the first `candidates`, the left hole is the one with
/// the largest centroid coordinate along `axis`, and the right hole is the
/// one with the smallest coordinate out of the rest. Ties go to the loop
/// ranked first.
pub fn select_arm_holes(
    mut loops: Vec<BoundaryLoop>,
    candidates: usize,
    axis: Axis,
) -> Result<ArmHoles, Error> {
    if candidates < 2 || loops.len() < candidates {
        return Err(Error::NotEnoughLoops {
            found: loops.len(),
            required: candidates.max(2),
        });
    }
    loops.sort_by(|a, b| b.len().cmp(&a.len()));
    loops.truncate(candidates);
    let coords: Vec<f64> = loops.iter().map(|l| axis.coord(l.centroid())).collect();
    let left = coords
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &c)| match best {
            Some((_, bc)) if bc >= c => best,
            _ => Some((i, c)),
        })
        .map(|(i, _)| i)
        .ok_or(Error::NotEnoughLoops {
            found: 0,
            required: 2,
        })?;
    let right = coords
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != left)
        .fold(None, |best: Option<(usize, f64)>, (i, &c)| match best {
            Some((_, bc)) if bc <= c => best,
            _ => Some((i, c)),
        })
        .map(|(i, _)| i)
        .ok_or(Error::NotEnoughLoops {
            found: 1,
            required: 2,
        })?;
    log::debug!(
        "Selected hole {} as left ({} = {}) and hole {} as right ({} = {})",
        left,
        axis_name(axis),
        coords[left],
        right,
        axis_name(axis),
        coords[right]
    );
    // Take the later one out first so the other index stays valid.
    let (left, right) = if left > right {
        let l = loops.swap_remove(left);
        let r = loops.swap_remove(right);
        (l, r)
    } else {
        let r = loops.swap_remove(right);
        let l = loops.swap_remove(left);
        (l, r)
    };
    Ok(ArmHoles { left, right })
}

fn axis_name(axis: Axis) -> &'static str {
    match axis {
        Axis::X => "x",
        Axis::Y => "y",
        Axis::Z => "z",
    }
}

#[cfg(test)]
mod test {
    use glam::DVec3;

    use crate::{
        boundary::{find_boundary_loops, BoundaryLoop},
        error::Error,
        macros::{assert_f64_eq, assert_point_eq},
        mesh::PolyMesh,
    };

    use super::{
        compute_centroid, nearest_centroid, nearest_loop, select_arm_holes, sort_by_size, Axis,
    };

    /// A strip of `count` separate square frames along the X axis. Frame `i`
    /// is centered at `x = centers[i]` and has a square hole with `4 * sizes[i]`
    /// boundary edges.
    fn frames(centers: &[f64], sizes: &[usize]) -> (PolyMesh, Vec<BoundaryLoop>) {
        let mut positions = Vec::new();
        let mut tris: Vec<[u32; 3]> = Vec::new();
        for (&cx, &size) in centers.iter().zip(sizes.iter()) {
            // Inner square subdivided into `size` segments per side, outer
            // square with the same number of vertices, joined by a strip.
            let n = 4 * size;
            let square = |k: usize, r: f64| {
                let side = k / size;
                let t = (k % size) as f64 / size as f64;
                let (x, y) = match side {
                    0 => (-r + 2.0 * r * t, -r),
                    1 => (r, -r + 2.0 * r * t),
                    2 => (r - 2.0 * r * t, r),
                    _ => (-r, r - 2.0 * r * t),
                };
                DVec3::new(cx + x, y, 0.0)
            };
            let base = positions.len() as u32;
            positions.extend((0..n).map(|k| square(k, 1.0)));
            positions.extend((0..n).map(|k| square(k, 2.0)));
            let inner = |k: usize| base + (k % n) as u32;
            let outer = |k: usize| base + (n + k % n) as u32;
            for k in 0..n {
                tris.push([inner(k), outer(k), outer(k + 1)]);
                tris.push([inner(k), outer(k + 1), inner(k + 1)]);
            }
        }
        let mesh = PolyMesh::from_polygons(&positions, &tris).expect("Cannot create mesh");
        let mut loops = find_boundary_loops(&mesh).expect("Cannot find loops");
        // Keep only the inner holes.
        loops.retain(|l| {
            l.vertices(&mesh)
                .all(|v| mesh.point(v).expect("Cannot read point").y.abs() < 1.0 + 1e-9)
        });
        (mesh, loops)
    }

    #[test]
    fn t_compute_centroid() {
        let mut mesh = PolyMesh::unit_box().expect("Cannot create box");
        mesh.delete_face(5.into()).expect("Cannot delete face");
        let loops = find_boundary_loops(&mesh).expect("Cannot find loops");
        let c = compute_centroid(&mesh, loops[0].halfedges()).expect("Cannot compute centroid");
        assert_point_eq!(c, DVec3::new(0.5, 0.5, 1.0));
        assert!(matches!(
            compute_centroid(&mesh, &[]),
            Err(Error::EmptyLoop)
        ));
    }

    #[test]
    fn t_sort_by_size_is_stable() {
        let (_mesh, mut loops) = frames(&[0.0, 10.0, 20.0], &[2, 1, 2]);
        assert_eq!(
            loops.iter().map(|l| l.len()).collect::<Vec<_>>(),
            vec![8, 4, 8]
        );
        let firsts: Vec<_> = loops.iter().map(|l| l.first()).collect();
        sort_by_size(&mut loops);
        assert_eq!(
            loops.iter().map(|l| l.first()).collect::<Vec<_>>(),
            vec![firsts[1], firsts[0], firsts[2]]
        );
    }

    #[test]
    fn t_nearest_centroid() {
        let mesh = PolyMesh::open_tube(1.0, 4.0, 8, 4).expect("Cannot create tube");
        let loops = find_boundary_loops(&mesh).expect("Cannot find loops");
        for l in &loops {
            let c = nearest_centroid(l.centroid(), &loops).expect("Must find a centroid");
            assert_eq!(c, l.centroid());
        }
        let i = nearest_loop(DVec3::new(10.0, 0.0, 0.0), &loops).expect("Must find a loop");
        assert_f64_eq!(loops[i].centroid().x, 2.0, 1e-12);
        assert_eq!(nearest_centroid(DVec3::ZERO, &[]), None);
        // Equidistant from both ends, so the first one wins.
        assert_eq!(nearest_loop(DVec3::ZERO, &loops), Some(0));
    }

    #[test]
    fn t_select_arm_holes() {
        let (_mesh, loops) = frames(&[0.0, 10.0, -10.0, 20.0, -20.0], &[2, 3, 3, 1, 3]);
        assert_eq!(loops.len(), 5);
        // The smallest hole at x = 20 is not a candidate.
        let holes = select_arm_holes(loops, 4, Axis::X).expect("Cannot select holes");
        assert_f64_eq!(holes.left.centroid().x, 10.0, 1e-9);
        assert_f64_eq!(holes.right.centroid().x, -20.0, 1e-9);
    }

    #[test]
    fn t_select_arm_holes_not_enough_loops() {
        let (_mesh, loops) = frames(&[0.0, 10.0, -10.0], &[2, 2, 2]);
        assert!(matches!(
            select_arm_holes(loops.clone(), 4, Axis::X),
            Err(Error::NotEnoughLoops {
                found: 3,
                required: 4
            })
        ));
        assert!(matches!(
            select_arm_holes(loops, 1, Axis::X),
            Err(Error::NotEnoughLoops { required: 2, .. })
        ));
    }

    #[test]
    fn t_select_arm_holes_distinct_on_ties() {
        let (_mesh, loops) = frames(&[5.0, 5.0], &[2, 2]);
        let holes = select_arm_holes(loops, 2, Axis::X).expect("Cannot select holes");
        assert_ne!(holes.left.first(), holes.right.first());
    }
}
