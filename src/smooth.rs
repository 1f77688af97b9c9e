use glam::DVec3;

use crate::{boundary::BoundaryLoop, error::Error, mesh::PolyMesh};

/// One pass of the cyclic `[0.25, 0.5, 0.25]` filter over the head vertices
/// of the loop. New positions are computed from the positions before the
/// pass.
fn smooth_pass(mesh: &mut PolyMesh, bloop: &BoundaryLoop, buf: &mut Vec<DVec3>) -> Result<(), Error> {
    let mut points = mesh.points();
    let mut points = points.try_borrow_mut()?;
    let n = bloop.len();
    buf.clear();
    buf.extend(bloop.vertices(mesh).map(|v| points[v]));
    for (i, v) in bloop.vertices(mesh).enumerate() {
        let prev = buf[(i + n - 1) % n];
        let next = buf[(i + 1) % n];
        points[v] = 0.5 * buf[i] + 0.25 * (prev + next);
    }
    Ok(())
}

/// Smooth the vertices of a boundary loop in place.
///
/// Each pass moves every vertex of the loop to `0.5 * p + 0.25 * (prev +
/// next)`, where `prev` and `next` are its neighbors along the loop. Only
/// vertex positions change, so the loop stays current. Its centroid is
/// recomputed at the end.
pub fn smooth_boundary(
    mesh: &mut PolyMesh,
    bloop: &mut BoundaryLoop,
    iterations: usize,
) -> Result<(), Error> {
    bloop.ensure_current(mesh)?;
    let mut buf = Vec::with_capacity(bloop.len());
    for _ in 0..iterations {
        smooth_pass(mesh, bloop, &mut buf)?;
    }
    bloop.refresh_centroid(mesh)
}

/// Smooth all loops, one pass over every loop at a time.
pub fn smooth_boundaries(
    mesh: &mut PolyMesh,
    loops: &mut [BoundaryLoop],
    iterations: usize,
) -> Result<(), Error> {
    for bloop in loops.iter() {
        bloop.ensure_current(mesh)?;
    }
    let mut buf = Vec::new();
    for _ in 0..iterations {
        for bloop in loops.iter() {
            smooth_pass(mesh, bloop, &mut buf)?;
        }
    }
    for bloop in loops.iter_mut() {
        bloop.refresh_centroid(mesh)?;
    }
    log::debug!(
        "Smoothed {} boundary loops with {} iterations",
        loops.len(),
        iterations
    );
    Ok(())
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

    use super::{smooth_boundaries, smooth_boundary};

    /// Capped ring whose hole zig-zags between `y = 0` and `y = 1`.
    fn zigzag() -> (PolyMesh, BoundaryLoop) {
        let ring = |r: f64, y: &dyn Fn(usize) -> f64| -> Vec<DVec3> {
            (0..8)
                .map(|k| {
                    let theta = std::f64::consts::TAU * k as f64 / 8.0;
                    DVec3::new(r * theta.cos(), y(k), r * theta.sin())
                })
                .collect()
        };
        let inner = ring(1.0, &|k| (k % 2) as f64);
        let outer = ring(2.0, &|_| 0.5);
        let mesh =
            PolyMesh::capped_ring(&inner, &outer, DVec3::Y * 2.0).expect("Cannot create mesh");
        let mut loops = find_boundary_loops(&mesh).expect("Cannot find loops");
        assert_eq!(loops.len(), 1);
        let bloop = loops.pop().expect("Must have one loop");
        (mesh, bloop)
    }

    /// Sum of squared distances of each loop vertex from the midpoint of its
    /// neighbors.
    fn roughness(mesh: &PolyMesh, bloop: &BoundaryLoop) -> f64 {
        let pts: Vec<DVec3> = bloop
            .vertices(mesh)
            .map(|v| mesh.point(v).expect("Cannot read point"))
            .collect();
        let n = pts.len();
        (0..n)
            .map(|i| {
                let mid = 0.5 * (pts[(i + n - 1) % n] + pts[(i + 1) % n]);
                pts[i].distance_squared(mid)
            })
            .sum()
    }

    #[test]
    fn t_zero_iterations_is_identity() {
        let (mut mesh, mut bloop) = zigzag();
        let before: Vec<DVec3> = mesh
            .vertices()
            .map(|v| mesh.point(v).expect("Cannot read point"))
            .collect();
        let centroid = bloop.centroid();
        smooth_boundary(&mut mesh, &mut bloop, 0).expect("Cannot smooth");
        for (v, p) in mesh.vertices().zip(before) {
            assert_eq!(mesh.point(v).expect("Cannot read point"), p);
        }
        assert_eq!(bloop.centroid(), centroid);
    }

    #[test]
    fn t_one_pass_reduces_roughness() {
        let (mut mesh, mut bloop) = zigzag();
        let before = roughness(&mesh, &bloop);
        smooth_boundary(&mut mesh, &mut bloop, 1).expect("Cannot smooth");
        let after = roughness(&mesh, &bloop);
        assert!(after < before, "{} is not less than {}", after, before);
        // Vertex 0 sits at y = 0 between two neighbors at y = 1.
        let c = std::f64::consts::FRAC_1_SQRT_2;
        assert_point_eq!(
            mesh.point(0.into()).expect("Cannot read point"),
            DVec3::new(0.5 + 0.5 * c, 0.5, 0.0),
            1e-12
        );
        // The outer ring is not touched.
        assert_f64_eq!(mesh.point(8.into()).expect("Cannot read point").y, 0.5);
        assert!(bloop.is_current(&mesh));
        assert_f64_eq!(bloop.centroid().y, 0.5, 1e-12);
    }

    #[test]
    fn t_smooth_boundaries_matches_single() {
        let (mut mesh_a, mut bloop_a) = zigzag();
        let (mut mesh_b, bloop_b) = zigzag();
        smooth_boundary(&mut mesh_a, &mut bloop_a, 3).expect("Cannot smooth");
        let mut loops = vec![bloop_b];
        smooth_boundaries(&mut mesh_b, &mut loops, 3).expect("Cannot smooth");
        for v in mesh_a.vertices() {
            assert_eq!(
                mesh_a.point(v).expect("Cannot read point"),
                mesh_b.point(v).expect("Cannot read point")
            );
        }
        assert_eq!(bloop_a.centroid(), loops[0].centroid());
    }

    #[test]
    fn t_smooth_rejects_stale_loop() {
        let (mut mesh, mut bloop) = zigzag();
        mesh.delete_face(1.into()).expect("Cannot delete face");
        assert!(matches!(
            smooth_boundary(&mut mesh, &mut bloop, 1),
            Err(Error::StaleLoop(_))
        ));
    }
}
