use crate::{
    element::{HasTopology, Handle},
    error::Error,
    iterator,
    mesh::PolyMesh,
    topol::Topology,
};

fn check_vertices(topol: &Topology, hvisited: &mut [bool]) -> Result<(), Error> {
    hvisited.fill(false);
    for v in topol.vertices().filter(|v| !v.is_deleted(topol)) {
        if let Some(h) = v.halfedge(topol) {
            if !h.is_valid(topol) {
                return Err(Error::InvalidHalfedge(h));
            }
            if h.is_deleted(topol) {
                return Err(Error::DeletedHalfedge(h));
            }
            // Either the outgoing halfedge is on the boundary, or none of them are.
            if !h.is_boundary(topol)
                && iterator::voh_ccw_iter(topol, v).any(|h| h.is_boundary(topol))
            {
                return Err(Error::OutgoingHalfedgeNotBoundary(v));
            }
            if h.tail(topol) != v {
                return Err(Error::InvalidOutgoingHalfedges(v));
            }
        }
        // Circulating both ways must visit the same halfedges exactly once.
        for h in iterator::voh_ccw_iter(topol, v) {
            if std::mem::replace(&mut hvisited[h.index() as usize], true) {
                return Err(Error::InvalidOutgoingHalfedges(v));
            }
        }
        for h in iterator::voh_cw_iter(topol, v) {
            if !std::mem::replace(&mut hvisited[h.index() as usize], false) {
                return Err(Error::InvalidOutgoingHalfedges(v));
            }
        }
    }
    Ok(())
}

fn check_halfedges(topol: &Topology, hvisited: &mut [bool]) -> Result<(), Error> {
    for h in topol.halfedges().filter(|h| !h.is_deleted(topol)) {
        let (head, tail) = (h.head(topol), h.tail(topol));
        if head == tail {
            return Err(Error::DegenerateHalfedge(h));
        }
        let hedge = topol.halfedge(h);
        if hedge.prev.is_deleted(topol) {
            return Err(Error::DeletedHalfedge(hedge.prev));
        }
        if hedge.next.is_deleted(topol) {
            return Err(Error::DeletedHalfedge(hedge.next));
        }
        if head.is_deleted(topol) {
            return Err(Error::DeletedVertex(head));
        }
        if let Some(f) = hedge.face {
            if f.is_deleted(topol) {
                return Err(Error::DeletedFace(f));
            }
        }
        if hedge.prev.next(topol) != h
            || hedge.next.prev(topol) != h
            || head != hedge.next.tail(topol)
            || tail != hedge.prev.head(topol)
        {
            return Err(Error::InvalidHalfedgeLink(h));
        }
        if !iterator::voh_ccw_iter(topol, tail).any(|hh| hh == h)
            || !iterator::vih_ccw_iter(topol, head).any(|hh| hh == h)
        {
            return Err(Error::InvalidHalfedgeVertexLink(h));
        }
    }
    // Every live halfedge belongs to exactly one loop, and all halfedges of
    // a loop share the same face.
    hvisited.fill(false);
    for h in topol.halfedges().filter(|h| !h.is_deleted(topol)) {
        if hvisited[h.index() as usize] {
            continue;
        }
        let f = h.face(topol);
        for h in iterator::loop_ccw_iter(topol, h) {
            if std::mem::replace(&mut hvisited[h.index() as usize], true) {
                return Err(Error::InvalidLoopTopology(h));
            }
            if h.face(topol) != f {
                return Err(Error::InconsistentFaceInLoop(h));
            }
        }
    }
    Ok(())
}

fn check_faces(topol: &Topology) -> Result<(), Error> {
    for f in topol.faces().filter(|f| !f.is_deleted(topol)) {
        let h = f.halfedge(topol);
        if h.is_deleted(topol) {
            return Err(Error::DeletedHalfedge(h));
        }
        if h.face(topol) != Some(f) {
            return Err(Error::InvalidFaceHalfedgeLink(f, h));
        }
    }
    Ok(())
}

impl Topology {
    pub fn check(&self) -> Result<(), Error> {
        let mut hvisited = vec![false; self.num_halfedges()].into_boxed_slice();
        check_vertices(self, &mut hvisited)?;
        check_halfedges(self, &mut hvisited)?;
        check_faces(self)?;
        Ok(())
    }
}

impl PolyMesh {
    /// Check the topology of the mesh.
    ///
    /// This function will return an error if any errors are found in the
    /// topology. Deleted elements are skipped.
    pub fn check_topology(&self) -> Result<(), Error> {
        self.topology().check()
    }
}
