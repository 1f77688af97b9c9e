use std::f64::consts::TAU;

use glam::DVec3;

use crate::{error::Error, mesh::PolyMesh};

impl PolyMesh {
    /// Makes a box with the following topology, spanning from the min point to
    /// the max point.
    ///
    ///  ```text
    ///       7-----------6
    ///      /|          /|
    ///     / |         / |
    ///    4-----------5  |
    ///    |  |        |  |
    ///    |  3--------|--2
    ///    | /         | /
    ///    |/          |/
    ///    0-----------1
    ///  ```
    pub fn quad_box(min: DVec3, max: DVec3) -> Result<Self, Error> {
        const BOX_POS: [(bool, bool, bool); 8] = [
            (false, false, false),
            (true, false, false),
            (true, true, false),
            (false, true, false),
            (false, false, true),
            (true, false, true),
            (true, true, true),
            (false, true, true),
        ];
        const BOX_IDX: [[u32; 4]; 6] = [
            [0, 3, 2, 1],
            [0, 1, 5, 4],
            [1, 2, 6, 5],
            [2, 3, 7, 6],
            [3, 0, 4, 7],
            [4, 5, 6, 7],
        ];
        let pos = BOX_POS.map(|(xf, yf, zf)| {
            DVec3::new(
                if xf { max.x } else { min.x },
                if yf { max.y } else { min.y },
                if zf { max.z } else { min.z },
            )
        });
        Self::from_polygons(&pos, &BOX_IDX)
    }

    /// Create a box of size 1, spanning from the origin to (1, 1, 1).
    pub fn unit_box() -> Result<Self, Error> {
        Self::quad_box(DVec3::ZERO, DVec3::ONE)
    }

    /// Create a disk-like triangle mesh with a hole in the middle.
    ///
    /// The `inner` ring of vertices bounds the hole. It is connected to the
    /// `outer` ring by a strip of triangles, and the outer ring is closed by
    /// a fan of triangles around `apex`. With `n` vertices per ring, the
    /// strip triangles between `inner[k]` and `inner[k + 1]` get identifiers
    /// `2k` and `2k + 1`, where the latter is the one across the hole edge.
    /// The fan triangles get identifiers `2n` and above.
    ///
    /// ```text
    ///        o[k]-------o[k+1]
    ///          | \  2k    |
    ///          |   \      |
    ///          | 2k+1\    |
    ///        i[k]-------i[k+1]
    ///              hole
    /// ```
    pub fn capped_ring(inner: &[DVec3], outer: &[DVec3], apex: DVec3) -> Result<Self, Error> {
        let n = inner.len();
        if n != outer.len() {
            return Err(Error::MismatchedArrayLengths(n, outer.len()));
        }
        if n < 3 {
            return Err(Error::invalid_param(
                "inner.len()",
                n,
                "a ring needs at least 3 vertices",
            ));
        }
        let mut positions = Vec::with_capacity(2 * n + 1);
        positions.extend_from_slice(inner);
        positions.extend_from_slice(outer);
        positions.push(apex);
        let ring = |k: usize| (k % n) as u32;
        let out = |k: usize| (n + k % n) as u32;
        let apex = (2 * n) as u32;
        let mut tris: Vec<[u32; 3]> = Vec::with_capacity(3 * n);
        for k in 0..n {
            tris.push([ring(k), out(k), out(k + 1)]);
            tris.push([ring(k), out(k + 1), ring(k + 1)]);
        }
        for k in 0..n {
            tris.push([out(k + 1), out(k), apex]);
        }
        Self::from_polygons(&positions, &tris)
    }

    /// Create a triangulated open cylinder along the X axis, centered at the
    /// origin, with a boundary loop at each end.
    ///
    /// The vertices are laid out ring by ring, starting at `x = -length / 2`,
    /// with `segments` vertices per ring and `rings + 1` rings.
    pub fn open_tube(
        radius: f64,
        length: f64,
        segments: usize,
        rings: usize,
    ) -> Result<Self, Error> {
        if segments < 3 {
            return Err(Error::invalid_param(
                "segments",
                segments,
                "a ring needs at least 3 vertices",
            ));
        }
        if rings == 0 {
            return Err(Error::invalid_param("rings", rings, "must be positive"));
        }
        let positions: Vec<DVec3> = (0..=rings)
            .flat_map(|r| {
                let x = length * (r as f64 / rings as f64 - 0.5);
                (0..segments).map(move |s| {
                    let theta = TAU * s as f64 / segments as f64;
                    DVec3::new(x, radius * theta.cos(), radius * theta.sin())
                })
            })
            .collect();
        let vi = |r: usize, s: usize| (r * segments + s % segments) as u32;
        let mut tris: Vec<[u32; 3]> = Vec::with_capacity(2 * rings * segments);
        for r in 0..rings {
            for s in 0..segments {
                tris.push([vi(r, s), vi(r, s + 1), vi(r + 1, s + 1)]);
                tris.push([vi(r, s), vi(r + 1, s + 1), vi(r + 1, s)]);
            }
        }
        Self::from_polygons(&positions, &tris)
    }
}

#[cfg(test)]
mod test {
    use glam::DVec3;

    use crate::{element::Handle, error::Error, mesh::PolyMesh};

    fn ring(n: usize, radius: f64, y: f64) -> Vec<DVec3> {
        (0..n)
            .map(|k| {
                let theta = std::f64::consts::TAU * k as f64 / n as f64;
                DVec3::new(radius * theta.cos(), y, radius * theta.sin())
            })
            .collect()
    }

    #[test]
    fn t_unit_box() {
        let mesh = PolyMesh::unit_box().expect("Cannot create box");
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_edges(), 12);
        assert_eq!(mesh.num_faces(), 6);
        assert_eq!(mesh.boundary_halfedges().count(), 0);
        mesh.check_topology().expect("Topology check failed");
    }

    #[test]
    fn t_capped_ring() {
        let mesh = PolyMesh::capped_ring(&ring(8, 1.0, 0.0), &ring(8, 2.0, 1.0), DVec3::Y * 2.0)
            .expect("Cannot create mesh");
        assert_eq!(mesh.num_vertices(), 17);
        assert_eq!(mesh.num_faces(), 24);
        assert_eq!(mesh.boundary_halfedges().count(), 8);
        mesh.check_topology().expect("Topology check failed");
        mesh.check_boundary().expect("Boundary check failed");
        // The face across the hole edge from inner[k] to inner[k + 1] is 2k + 1.
        for k in 0u32..8 {
            let h = mesh
                .find_halfedge(k.into(), ((k + 1) % 8).into())
                .expect("Cannot find hole edge");
            assert!(mesh.is_boundary_halfedge(h));
            let f = mesh
                .halfedge_face(h.opposite())
                .expect("Hole edge must have a face on the other side");
            assert_eq!(f.index(), 2 * k + 1);
        }
    }

    #[test]
    fn t_capped_ring_rejects_bad_rings() {
        assert!(matches!(
            PolyMesh::capped_ring(&ring(5, 1.0, 0.0), &ring(4, 2.0, 0.0), DVec3::Y),
            Err(Error::MismatchedArrayLengths(5, 4))
        ));
        assert!(matches!(
            PolyMesh::capped_ring(&ring(2, 1.0, 0.0), &ring(2, 2.0, 0.0), DVec3::Y),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn t_open_tube() {
        let mesh = PolyMesh::open_tube(1.0, 4.0, 12, 5).expect("Cannot create tube");
        assert_eq!(mesh.num_vertices(), 72);
        assert_eq!(mesh.num_faces(), 120);
        assert_eq!(mesh.boundary_halfedges().count(), 24);
        mesh.check_topology().expect("Topology check failed");
        mesh.check_boundary().expect("Boundary check failed");
        assert!(mesh.live_vertices().all(|v| mesh.is_manifold_vertex(v)));
    }
}
