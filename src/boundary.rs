use std::collections::HashSet;

use glam::DVec3;

use crate::{
    analysis::compute_centroid,
    element::{HH, VH},
    error::Error,
    mesh::PolyMesh,
};

/// A closed cycle of boundary halfedges.
///
/// The halfedges are stored in `next` order, so the halfedge after the last
/// one is the first one again. The loop is a snapshot of the mesh at the time
/// it was traced; it goes stale as soon as a face next to it is deleted. Use
/// [`BoundaryLoop::is_current`] to check whether it still matches the mesh.
#[derive(Clone, Debug)]
pub struct BoundaryLoop {
    halfedges: Vec<HH>,
    centroid: DVec3,
}

impl BoundaryLoop {
    /// Walk the boundary from `seed` until it comes back around.
    pub fn trace(mesh: &PolyMesh, seed: HH) -> Result<Self, Error> {
        if !seed.is_valid(mesh) || seed.is_deleted(mesh) || !seed.is_boundary(mesh) {
            return Err(Error::NotBoundaryHalfedge(seed));
        }
        let mut halfedges = vec![seed];
        let mut prev = seed;
        let mut h = mesh.next_halfedge(seed);
        while h != seed {
            if h.is_deleted(mesh) || !h.is_boundary(mesh) {
                return Err(Error::BrokenBoundary(prev));
            }
            if halfedges.len() >= mesh.num_halfedges() {
                return Err(Error::OpenBoundary(seed));
            }
            halfedges.push(h);
            prev = h;
            h = mesh.next_halfedge(h);
        }
        if halfedges.len() < 3 {
            return Err(Error::DegenerateLoop {
                seed,
                len: halfedges.len(),
            });
        }
        let centroid = compute_centroid(mesh, &halfedges)?;
        Ok(BoundaryLoop {
            halfedges,
            centroid,
        })
    }

    pub fn halfedges(&self) -> &[HH] {
        &self.halfedges
    }

    pub fn len(&self) -> usize {
        self.halfedges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.halfedges.is_empty()
    }

    /// The mean position of the vertices of the loop, as of the last time it
    /// was computed.
    pub fn centroid(&self) -> DVec3 {
        self.centroid
    }

    /// The halfedge the loop was traced from.
    pub fn first(&self) -> HH {
        self.halfedges[0]
    }

    /// The vertices the halfedges of this loop point to, in loop order.
    pub fn vertices<'a>(&'a self, mesh: &'a PolyMesh) -> impl Iterator<Item = VH> + use<'a> {
        self.halfedges.iter().map(|h| h.head(mesh))
    }

    /// Check that every halfedge of the loop is still alive, still on the
    /// boundary, and still linked to the one after it.
    pub fn is_current(&self, mesh: &PolyMesh) -> bool {
        self.halfedges.iter().all(|h| {
            h.is_valid(mesh) && !h.is_deleted(mesh) && h.is_boundary(mesh)
        }) && self
            .halfedges
            .iter()
            .zip(self.halfedges.iter().cycle().skip(1))
            .all(|(h, next)| mesh.next_halfedge(*h) == *next)
    }

    /// Returns [`Error::StaleLoop`] if this loop no longer matches the mesh.
    pub fn ensure_current(&self, mesh: &PolyMesh) -> Result<(), Error> {
        if self.is_current(mesh) {
            Ok(())
        } else {
            Err(Error::StaleLoop(self.first()))
        }
    }

    /// Bring the loop up to date with the mesh.
    ///
    /// A stale loop is traced again from its first halfedge that is still a
    /// live boundary halfedge. If none is left, this returns
    /// [`Error::StaleLoop`].
    pub fn retrace(self, mesh: &PolyMesh) -> Result<Self, Error> {
        if self.is_current(mesh) {
            return Ok(self);
        }
        let seed = self
            .halfedges
            .iter()
            .copied()
            .find(|h| h.is_valid(mesh) && !h.is_deleted(mesh) && h.is_boundary(mesh))
            .ok_or(Error::StaleLoop(self.first()))?;
        Self::trace(mesh, seed)
    }

    pub fn refresh_centroid(&mut self, mesh: &PolyMesh) -> Result<(), Error> {
        self.centroid = compute_centroid(mesh, &self.halfedges)?;
        Ok(())
    }
}

/// Find all boundary loops of the mesh.
///
/// Every live boundary halfedge ends up in exactly one loop. The loops are
/// ordered by the index of the halfedge they were traced from. The boundary
/// must be normalized, see [`PolyMesh::normalize_boundary`].
pub fn find_boundary_loops(mesh: &PolyMesh) -> Result<Vec<BoundaryLoop>, Error> {
    mesh.check_boundary()?;
    let mut assigned: HashSet<HH> = HashSet::new();
    let mut loops = Vec::new();
    for h in mesh.boundary_halfedges() {
        if assigned.contains(&h) {
            continue;
        }
        let bloop = BoundaryLoop::trace(mesh, h)?;
        assigned.extend(bloop.halfedges().iter().copied());
        loops.push(bloop);
    }
    log::debug!(
        "Found {} boundary loops with {} halfedges",
        loops.len(),
        assigned.len()
    );
    Ok(loops)
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use glam::DVec3;

    use crate::{element::HH, error::Error, macros::assert_point_eq, mesh::PolyMesh};

    use super::{find_boundary_loops, BoundaryLoop};

    #[test]
    fn t_closed_mesh_has_no_loops() {
        let mesh = PolyMesh::unit_box().expect("Cannot create box");
        assert!(
            find_boundary_loops(&mesh)
                .expect("Cannot find loops")
                .is_empty()
        );
    }

    #[test]
    fn t_loops_partition_boundary() {
        let mut mesh = PolyMesh::unit_box().expect("Cannot create box");
        // Remove the bottom and the top, leaving two square holes.
        mesh.delete_face(0.into()).expect("Cannot delete face");
        mesh.delete_face(5.into()).expect("Cannot delete face");
        let loops = find_boundary_loops(&mesh).expect("Cannot find loops");
        assert_eq!(loops.len(), 2);
        let mut seen: HashSet<HH> = HashSet::new();
        for bloop in &loops {
            assert_eq!(bloop.len(), 4);
            for h in bloop.halfedges() {
                assert!(seen.insert(*h), "Halfedge {} is in two loops", h);
            }
        }
        let all: HashSet<HH> = mesh.boundary_halfedges().collect();
        assert_eq!(seen, all);
        // Ordered by seed index.
        assert!(loops[0].first() < loops[1].first());
        assert_point_eq!(loops[0].centroid(), DVec3::new(0.5, 0.5, 0.0));
        assert_point_eq!(loops[1].centroid(), DVec3::new(0.5, 0.5, 1.0));
    }

    #[test]
    fn t_next_closes_loop() {
        let mesh = PolyMesh::open_tube(1.0, 2.0, 10, 3).expect("Cannot create tube");
        let loops = find_boundary_loops(&mesh).expect("Cannot find loops");
        assert_eq!(loops.len(), 2);
        for bloop in &loops {
            assert_eq!(bloop.len(), 10);
            let start = bloop.first();
            let mut h = start;
            for (i, expected) in bloop.halfedges().iter().enumerate() {
                assert_eq!(h, *expected, "Mismatch at position {}", i);
                h = mesh.next_halfedge(h);
            }
            assert_eq!(h, start);
            assert!(bloop.is_current(&mesh));
        }
        let xs: Vec<f64> = loops.iter().map(|l| l.centroid().x).collect();
        assert!(xs.contains(&-1.0) && xs.contains(&1.0));
    }

    #[test]
    fn t_trace_rejects_interior_seed() {
        let mesh = PolyMesh::unit_box().expect("Cannot create box");
        assert!(matches!(
            BoundaryLoop::trace(&mesh, 0.into()),
            Err(Error::NotBoundaryHalfedge(_))
        ));
    }

    #[test]
    fn t_stale_loop() {
        let mut mesh = PolyMesh::unit_box().expect("Cannot create box");
        mesh.delete_face(5.into()).expect("Cannot delete face");
        let loops = find_boundary_loops(&mesh).expect("Cannot find loops");
        let bloop = loops[0].clone();
        assert!(bloop.is_current(&mesh));
        // Deleting a side face merges it into the hole.
        mesh.delete_face(1.into()).expect("Cannot delete face");
        assert!(!bloop.is_current(&mesh));
        assert!(matches!(
            bloop.ensure_current(&mesh),
            Err(Error::StaleLoop(_))
        ));
        let bloop = bloop.retrace(&mesh).expect("Cannot retrace loop");
        assert!(bloop.is_current(&mesh));
        assert_eq!(bloop.len(), 6);
    }
}
