use crate::{
    element::{Edge, Face, Halfedge, Handle, Vertex, EH, FH, HH, VH},
    error::Error,
    iterator,
    property::{FProperty, PropertyContainer, VProperty},
    status::Status,
};

/// An edge of a face that is being added. It either already exists in the
/// mesh, or will be created once every link around the face is known.
enum PendingEdge {
    Existing(HH),
    Fresh {
        halfedge: u32,
        from: VH,
        to: VH,
        prev: Option<HH>,
        next: Option<HH>,
        opp_prev: Option<HH>,
        opp_next: Option<HH>,
    },
}

impl PendingEdge {
    fn inner(&self) -> HH {
        match self {
            PendingEdge::Existing(h) => *h,
            PendingEdge::Fresh { halfedge, .. } => halfedge.into(),
        }
    }
}

/// Scratch buffers reused across topological edits.
#[derive(Default)]
pub(crate) struct TopolCache {
    loop_halfedges: Vec<Option<HH>>,
    needs_adjust: Vec<bool>,
    next_cache: Vec<(HH, HH)>,
    pending: Vec<PendingEdge>,
    halfedges: Vec<HH>,
    edges: Vec<EH>,
    vertices: Vec<VH>,
}

impl TopolCache {
    fn clear(&mut self) {
        self.loop_halfedges.clear();
        self.needs_adjust.clear();
        self.next_cache.clear();
        self.pending.clear();
        self.halfedges.clear();
        self.edges.clear();
        self.vertices.clear();
    }
}

pub(crate) struct Topology {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    faces: Vec<Face>,
    vprops: PropertyContainer<VH>,
    fprops: PropertyContainer<FH>,
    vstatus: Vec<Status>,
    estatus: Vec<Status>,
    fstatus: Vec<Status>,
}

impl Topology {
    pub fn new() -> Self {
        Self::with_capacity(0, 0, 0)
    }

    pub fn with_capacity(nverts: usize, nedges: usize, nfaces: usize) -> Self {
        Topology {
            vertices: Vec::with_capacity(nverts),
            edges: Vec::with_capacity(nedges),
            faces: Vec::with_capacity(nfaces),
            vprops: PropertyContainer::new(),
            fprops: PropertyContainer::new(),
            vstatus: Vec::with_capacity(nverts),
            estatus: Vec::with_capacity(nedges),
            fstatus: Vec::with_capacity(nfaces),
        }
    }

    pub fn create_vertex_prop<T: Clone + Copy + 'static>(&mut self, default: T) -> VProperty<T> {
        VProperty::<T>::new(&mut self.vprops, default)
    }

    pub fn create_face_prop<T: Clone + Copy + 'static>(&mut self, default: T) -> FProperty<T> {
        FProperty::<T>::new(&mut self.fprops, default)
    }

    pub fn reserve(&mut self, nverts: usize, nedges: usize, nfaces: usize) -> Result<(), Error> {
        self.vertices.reserve(nverts);
        self.vstatus.reserve(nverts);
        self.vprops.reserve(nverts)?;
        self.edges.reserve(nedges);
        self.estatus.reserve(nedges);
        self.faces.reserve(nfaces);
        self.fstatus.reserve(nfaces);
        self.fprops.reserve(nfaces)?;
        Ok(())
    }

    fn vertex(&self, v: VH) -> &Vertex {
        &self.vertices[v.index() as usize]
    }

    pub(crate) fn halfedge(&self, h: HH) -> &Halfedge {
        &self.edges[(h.index() >> 1) as usize].halfedges[(h.index() & 1) as usize]
    }

    fn halfedge_mut(&mut self, h: HH) -> &mut Halfedge {
        &mut self.edges[(h.index() >> 1) as usize].halfedges[(h.index() & 1) as usize]
    }

    pub fn vertex_halfedge(&self, v: VH) -> Option<HH> {
        self.vertex(v).halfedge
    }

    pub fn to_vertex(&self, h: HH) -> VH {
        self.halfedge(h).vertex
    }

    pub fn from_vertex(&self, h: HH) -> VH {
        self.halfedge(h.opposite()).vertex
    }

    pub fn prev_halfedge(&self, h: HH) -> HH {
        self.halfedge(h).prev
    }

    pub fn next_halfedge(&self, h: HH) -> HH {
        self.halfedge(h).next
    }

    pub fn halfedge_face(&self, h: HH) -> Option<FH> {
        self.halfedge(h).face
    }

    pub fn face_halfedge(&self, f: FH) -> HH {
        self.faces[f.index() as usize].halfedge
    }

    pub fn is_boundary_halfedge(&self, h: HH) -> bool {
        self.halfedge(h).face.is_none()
    }

    pub fn is_boundary_edge(&self, e: EH) -> bool {
        let (h, oh) = e.halfedges();
        self.is_boundary_halfedge(h) || self.is_boundary_halfedge(oh)
    }

    pub fn is_boundary_vertex(&self, v: VH) -> bool {
        match self.vertex_halfedge(v) {
            Some(h) => self.is_boundary_halfedge(h),
            None => true,
        }
    }

    pub fn is_valid_halfedge(&self, h: HH) -> bool {
        (h.index() as usize) < self.num_halfedges()
    }

    pub fn is_deleted_vertex(&self, v: VH) -> bool {
        self.vstatus[v.index() as usize].deleted()
    }

    pub fn is_deleted_edge(&self, e: EH) -> bool {
        self.estatus[e.index() as usize].deleted()
    }

    pub fn is_deleted_halfedge(&self, h: HH) -> bool {
        self.is_deleted_edge(h.edge())
    }

    pub fn is_deleted_face(&self, f: FH) -> bool {
        self.fstatus[f.index() as usize].deleted()
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_halfedges(&self) -> usize {
        self.num_edges() * 2
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn num_live_faces(&self) -> usize {
        self.fstatus.iter().filter(|s| !s.deleted()).count()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VH> + use<> {
        (0..(self.num_vertices() as u32)).map(|i| i.into())
    }

    pub fn halfedges(&self) -> impl Iterator<Item = HH> + use<> {
        (0..(self.num_halfedges() as u32)).map(|i| i.into())
    }

    pub fn edges(&self) -> impl Iterator<Item = EH> + use<> {
        (0..(self.num_edges() as u32)).map(|i| i.into())
    }

    pub fn faces(&self) -> impl Iterator<Item = FH> + use<> {
        (0..(self.num_faces() as u32)).map(|i| i.into())
    }

    /// Halfedges that are alive and have no face, in index order.
    pub fn boundary_halfedges(&self) -> impl Iterator<Item = HH> + use<'_> {
        self.halfedges()
            .filter(|h| !self.is_deleted_halfedge(*h) && self.is_boundary_halfedge(*h))
    }

    pub fn find_halfedge(&self, from: VH, to: VH) -> Option<HH> {
        iterator::voh_ccw_iter(self, from).find(|h| self.to_vertex(*h) == to)
    }

    pub fn is_manifold_vertex(&self, v: VH) -> bool {
        /* The outgoing halfedge of a boundary vertex is a boundary halfedge. A
         * second boundary halfedge anywhere else around the vertex means there
         * are two gaps in the fan of faces, so only the first one may be on
         * the boundary.
         */
        iterator::voh_ccw_iter(self, v)
            .skip(1)
            .all(|h| !self.is_boundary_halfedge(h))
    }

    fn adjust_outgoing_halfedge(&mut self, v: VH) {
        let h = iterator::voh_ccw_iter(self, v).find(|h| self.is_boundary_halfedge(*h));
        if let Some(h) = h {
            self.set_vertex_halfedge(v, h)
        }
    }

    pub fn add_vertex(&mut self) -> Result<VH, Error> {
        let vi = self.vertices.len() as u32;
        self.vprops.push_value()?;
        self.vertices.push(Vertex { halfedge: None });
        self.vstatus.push(Status::default());
        Ok(vi.into())
    }

    fn new_edge(
        &mut self,
        from: VH,
        to: VH,
        prev: HH,
        next: HH,
        opp_prev: HH,
        opp_next: HH,
    ) -> u32 {
        let ei = self.edges.len() as u32;
        self.edges.push(Edge {
            halfedges: [
                Halfedge {
                    face: None,
                    vertex: to,
                    next,
                    prev,
                },
                Halfedge {
                    face: None,
                    vertex: from,
                    next: opp_next,
                    prev: opp_prev,
                },
            ],
        });
        self.estatus.push(Status::default());
        ei
    }

    fn new_face(&mut self, halfedge: HH) -> Result<FH, Error> {
        let fi = self.faces.len() as u32;
        self.fprops.push_value()?;
        self.faces.push(Face { halfedge });
        self.fstatus.push(Status::default());
        Ok(fi.into())
    }

    pub fn set_vertex_halfedge(&mut self, v: VH, h: HH) {
        self.vertices[v.index() as usize].halfedge = Some(h);
    }

    pub fn set_next_halfedge(&mut self, hprev: HH, hnext: HH) {
        self.halfedge_mut(hprev).next = hnext;
        self.halfedge_mut(hnext).prev = hprev;
    }

    /// Every vertex must be on the boundary and every existing edge of the
    /// new face must still be free on the inside.
    fn check_face_loop(&self, verts: &[VH], cache: &mut TopolCache) -> Result<(), Error> {
        let n = verts.len();
        for (i, v) in verts.iter().enumerate() {
            if self.is_deleted_vertex(*v) {
                return Err(Error::DeletedVertex(*v));
            }
            if !self.is_boundary_vertex(*v) {
                return Err(Error::ComplexVertex(*v));
            }
            let h = self.find_halfedge(*v, verts[(i + 1) % n]);
            if let Some(h) = h {
                if !self.is_boundary_halfedge(h) {
                    return Err(Error::ComplexHalfedge(h));
                }
            }
            cache.loop_halfedges.push(h);
            cache.needs_adjust.push(false);
        }
        Ok(())
    }

    /// Two consecutive existing edges that are not linked to each other have
    /// a patch of faces wedged between them at their shared vertex. That
    /// patch is moved to another gap around the vertex.
    fn plan_patch_relinks(&self, n: usize, cache: &mut TopolCache) -> Result<(), Error> {
        for i in 0..n {
            let (prev, next) = match (
                cache.loop_halfedges[i],
                cache.loop_halfedges[(i + 1) % n],
            ) {
                (Some(prev), Some(next)) if self.next_halfedge(prev) != next => (prev, next),
                _ => continue,
            };
            let boundprev = {
                let mut out = next.opposite();
                loop {
                    out = self.next_halfedge(out).opposite();
                    if self.is_boundary_halfedge(out) {
                        break out;
                    }
                }
            };
            let boundnext = self.next_halfedge(boundprev);
            if boundprev == prev {
                return Err(Error::PatchRelinkingFailed);
            }
            debug_assert!(
                self.is_boundary_halfedge(boundprev) && self.is_boundary_halfedge(boundnext)
            );
            let pstart = self.next_halfedge(prev);
            let pend = self.prev_halfedge(next);
            cache
                .next_cache
                .extend_from_slice(&[(boundprev, pstart), (pend, boundnext), (prev, next)]);
        }
        Ok(())
    }

    fn corner_pair(
        pending: &mut [PendingEdge],
        i: usize,
        j: usize,
    ) -> (&mut PendingEdge, &mut PendingEdge) {
        if j == 0 {
            let (right, left) = pending.split_at_mut(i);
            (&mut left[0], &mut right[0])
        } else {
            let (left, right) = pending.split_at_mut(j);
            (&mut left[left.len() - 1], &mut right[0])
        }
    }

    /// Work out the links at the corner where `verts[j]` sits between the
    /// incoming edge `i` and the outgoing edge `j`.
    fn link_corner(&mut self, verts: &[VH], i: usize, j: usize, cache: &mut TopolCache) {
        let v = verts[j];
        let (incoming, outgoing) = Self::corner_pair(&mut cache.pending, i, j);
        match (incoming, outgoing) {
            (PendingEdge::Existing(_), PendingEdge::Existing(innernext)) => {
                cache.needs_adjust[j] = self.vertex_halfedge(v) == Some(*innernext);
            }
            (
                PendingEdge::Fresh {
                    halfedge: innerprev,
                    opp_prev,
                    next,
                    ..
                },
                PendingEdge::Existing(innernext),
            ) => {
                let innernext = *innernext;
                let innerprev: HH = innerprev.into();
                let outernext = innerprev.opposite();
                let boundprev = self.prev_halfedge(innernext);
                cache.next_cache.push((boundprev, outernext));
                *opp_prev = Some(boundprev);
                cache.next_cache.push((innerprev, innernext));
                *next = Some(innernext);
                self.set_vertex_halfedge(v, outernext);
            }
            (
                PendingEdge::Existing(innerprev),
                PendingEdge::Fresh {
                    halfedge: innernext,
                    prev,
                    opp_next,
                    ..
                },
            ) => {
                let innerprev = *innerprev;
                let innernext: HH = innernext.into();
                let outerprev = innernext.opposite();
                let boundnext = self.next_halfedge(innerprev);
                cache.next_cache.push((outerprev, boundnext));
                *opp_next = Some(boundnext);
                cache.next_cache.push((innerprev, innernext));
                *prev = Some(innerprev);
                self.set_vertex_halfedge(v, boundnext);
            }
            (
                PendingEdge::Fresh {
                    halfedge: innerprev,
                    next,
                    opp_prev,
                    ..
                },
                PendingEdge::Fresh {
                    halfedge: innernext,
                    prev,
                    opp_next,
                    ..
                },
            ) => {
                let innerprev: HH = innerprev.into();
                let innernext: HH = innernext.into();
                let outernext = innerprev.opposite();
                let outerprev = innernext.opposite();
                *next = Some(innernext);
                *prev = Some(innerprev);
                if let Some(boundnext) = self.vertex_halfedge(v) {
                    let boundprev = self.prev_halfedge(boundnext);
                    cache
                        .next_cache
                        .extend(&[(boundprev, outernext), (outerprev, boundnext)]);
                    *opp_prev = Some(boundprev);
                    *opp_next = Some(boundnext);
                } else {
                    // Isolated vertex.
                    self.set_vertex_halfedge(v, outernext);
                    *opp_prev = Some(outerprev);
                    *opp_next = Some(outernext);
                }
            }
        }
    }

    pub fn add_face(&mut self, verts: &[VH], cache: &mut TopolCache) -> Result<FH, Error> {
        let n = verts.len();
        cache.clear();
        cache.loop_halfedges.reserve(n);
        cache.needs_adjust.reserve(n);
        cache.next_cache.reserve(n * 6);
        self.check_face_loop(verts, cache)?;
        self.plan_patch_relinks(n, cache)?;
        // Nothing has been modified so far. From here on, the face is built.
        cache.pending.reserve(n);
        {
            let mut ei = self.edges.len() as u32;
            cache
                .pending
                .extend((0..n).map(|i| match cache.loop_halfedges[i] {
                    Some(h) => PendingEdge::Existing(h),
                    None => PendingEdge::Fresh {
                        halfedge: {
                            let current = ei;
                            ei += 1;
                            current << 1
                        },
                        from: verts[i],
                        to: verts[(i + 1) % n],
                        prev: None,
                        next: None,
                        opp_prev: None,
                        opp_next: None,
                    },
                }));
        }
        for (i, j) in (0..n).map(|i| (i, (i + 1) % n)) {
            self.link_corner(verts, i, j, cache);
        }
        cache.halfedges.reserve(n);
        for pending in &cache.pending {
            let h = match pending {
                PendingEdge::Existing(h) => *h,
                PendingEdge::Fresh {
                    halfedge,
                    from,
                    to,
                    prev,
                    next,
                    opp_prev,
                    opp_next,
                } => {
                    let ei = self.new_edge(
                        *from,
                        *to,
                        prev.ok_or(Error::PatchRelinkingFailed)?,
                        next.ok_or(Error::PatchRelinkingFailed)?,
                        opp_prev.ok_or(Error::PatchRelinkingFailed)?,
                        opp_next.ok_or(Error::PatchRelinkingFailed)?,
                    );
                    debug_assert_eq!(*halfedge >> 1, ei, "Edges created out of order");
                    halfedge.into()
                }
            };
            cache.halfedges.push(h);
        }
        let last = cache
            .pending
            .last()
            .map(PendingEdge::inner)
            .ok_or(Error::PatchRelinkingFailed)?;
        let fnew = self.new_face(last)?;
        for h in &cache.halfedges {
            self.halfedge_mut(*h).face = Some(fnew);
        }
        for (prev, next) in cache.next_cache.drain(..) {
            self.set_next_halfedge(prev, next);
        }
        for (v, adjust) in verts.iter().zip(cache.needs_adjust.iter()) {
            if *adjust {
                self.adjust_outgoing_halfedge(*v);
            }
        }
        Ok(fnew)
    }

    /// Delete a face, leaving a hole in its place.
    ///
    /// The halfedges of the face become boundary halfedges. Edges that end up
    /// with no face on either side are deleted, and so are vertices left
    /// without any edges. The boundary `next` links around the hole are
    /// stitched back together, and the outgoing halfedges of the affected
    /// vertices are moved back onto the boundary.
    pub fn delete_face(&mut self, f: FH, cache: &mut TopolCache) -> Result<(), Error> {
        if self.is_deleted_face(f) {
            return Err(Error::DeletedFace(f));
        }
        cache.clear();
        cache.halfedges.extend(iterator::fh_ccw_iter(self, f));
        for h in cache.halfedges.iter() {
            self.halfedge_mut(*h).face = None;
            if self.is_boundary_halfedge(h.opposite()) {
                cache.edges.push(h.edge());
            }
            cache.vertices.push(self.to_vertex(*h));
        }
        for e in cache.edges.iter() {
            let (h0, h1) = e.halfedges();
            let v0 = self.to_vertex(h0);
            let next0 = self.next_halfedge(h0);
            let prev0 = self.prev_halfedge(h0);
            let v1 = self.to_vertex(h1);
            let next1 = self.next_halfedge(h1);
            let prev1 = self.prev_halfedge(h1);
            self.set_next_halfedge(prev0, next1);
            self.set_next_halfedge(prev1, next0);
            self.estatus[e.index() as usize].set_deleted(true);
            if self.vertex_halfedge(v0) == Some(h1) {
                if next0 == h1 {
                    self.vstatus[v0.index() as usize].set_deleted(true);
                    self.vertices[v0.index() as usize].halfedge = None;
                } else {
                    self.set_vertex_halfedge(v0, next0);
                }
            }
            if self.vertex_halfedge(v1) == Some(h0) {
                if next1 == h0 {
                    self.vstatus[v1.index() as usize].set_deleted(true);
                    self.vertices[v1.index() as usize].halfedge = None;
                } else {
                    self.set_vertex_halfedge(v1, next1);
                }
            }
        }
        for v in cache.vertices.iter() {
            self.adjust_outgoing_halfedge(*v);
        }
        self.fstatus[f.index() as usize].set_deleted(true);
        Ok(())
    }

    /// Check that the boundary is well formed: live vertices point to a
    /// boundary outgoing halfedge when they have one, they are manifold, and
    /// following `next` from any boundary halfedge stays on the boundary.
    pub fn check_boundary(&self) -> Result<(), Error> {
        for v in self.vertices().filter(|v| !self.is_deleted_vertex(*v)) {
            let h = match self.vertex_halfedge(v) {
                Some(h) => h,
                None => continue,
            };
            if !self.is_boundary_halfedge(h)
                && iterator::voh_ccw_iter(self, v).any(|h| self.is_boundary_halfedge(h))
            {
                return Err(Error::OutgoingHalfedgeNotBoundary(v));
            }
            if !self.is_manifold_vertex(v) {
                return Err(Error::ComplexVertex(v));
            }
        }
        for h in self.boundary_halfedges() {
            let next = self.next_halfedge(h);
            if self.is_deleted_halfedge(next)
                || !self.is_boundary_halfedge(next)
                || self.from_vertex(next) != self.to_vertex(h)
            {
                return Err(Error::BrokenBoundary(h));
            }
        }
        Ok(())
    }

    /// Point every live vertex at a boundary outgoing halfedge, if it has
    /// one, and then check the boundary.
    pub fn normalize_boundary(&mut self) -> Result<(), Error> {
        for v in self.vertices() {
            if !self.is_deleted_vertex(v) {
                self.adjust_outgoing_halfedge(v);
            }
        }
        self.check_boundary()
    }

    pub fn vertex_valence(&self, v: VH) -> usize {
        iterator::voh_ccw_iter(self, v).count()
    }

    pub fn face_valence(&self, f: FH) -> usize {
        iterator::fv_ccw_iter(self, f).count()
    }
}

impl Default for Topology {
    fn default() -> Self {
        Self::new()
    }
}
