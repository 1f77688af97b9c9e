use std::ops::Range;

use glam::DVec3;

use crate::{
    element::{Handle, EH, FH, HH, VH},
    error::Error,
    iterator,
    property::{FProperty, VProperty},
    topol::{TopolCache, Topology},
};

/// Halfedge polygon mesh with `f64` vertex positions.
///
/// Every face carries a persistent `u32` identifier, which is the index the
/// face was created with unless it is overwritten. Deleting a face only
/// marks it as deleted, so handles and identifiers of the remaining elements
/// never change.
pub struct PolyMesh {
    pub(crate) topol: Topology,
    cache: TopolCache,
    points: VProperty<DVec3>,
    face_ids: FProperty<u32>,
}

impl Default for PolyMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl PolyMesh {
    pub fn new() -> Self {
        Self::with_capacity(0, 0, 0)
    }

    pub fn with_capacity(nverts: usize, nedges: usize, nfaces: usize) -> Self {
        let mut topol = Topology::with_capacity(nverts, nedges, nfaces);
        let points = topol.create_vertex_prop(DVec3::ZERO);
        let face_ids = topol.create_face_prop(0u32);
        PolyMesh {
            topol,
            cache: TopolCache::default(),
            points,
            face_ids,
        }
    }

    /// Build a mesh from vertex positions and polygons given as lists of
    /// indices into `positions`.
    pub fn from_polygons<P>(positions: &[DVec3], polygons: &[P]) -> Result<Self, Error>
    where
        P: AsRef<[u32]>,
    {
        let nfaces = polygons.len();
        let mut mesh = Self::with_capacity(positions.len(), nfaces * 3 / 2, nfaces);
        mesh.add_vertices(positions)?;
        let mut fverts: Vec<VH> = Vec::new();
        for poly in polygons {
            fverts.clear();
            for &i in poly.as_ref() {
                if i as usize >= positions.len() {
                    return Err(Error::InvalidVertexIndex {
                        index: i as usize,
                        count: positions.len(),
                    });
                }
                fverts.push(i.into());
            }
            mesh.add_face(&fverts)?;
        }
        Ok(mesh)
    }

    pub fn num_vertices(&self) -> usize {
        self.topol.num_vertices()
    }

    pub fn num_edges(&self) -> usize {
        self.topol.num_edges()
    }

    pub fn num_halfedges(&self) -> usize {
        self.topol.num_halfedges()
    }

    /// Number of faces, including deleted ones.
    pub fn num_faces(&self) -> usize {
        self.topol.num_faces()
    }

    pub fn num_live_faces(&self) -> usize {
        self.topol.num_live_faces()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VH> + use<> {
        self.topol.vertices()
    }

    pub fn halfedges(&self) -> impl Iterator<Item = HH> + use<> {
        self.topol.halfedges()
    }

    pub fn edges(&self) -> impl Iterator<Item = EH> + use<> {
        self.topol.edges()
    }

    pub fn faces(&self) -> impl Iterator<Item = FH> + use<> {
        self.topol.faces()
    }

    pub fn live_vertices(&self) -> impl Iterator<Item = VH> + use<'_> {
        self.vertices().filter(|v| !self.topol.is_deleted_vertex(*v))
    }

    pub fn live_faces(&self) -> impl Iterator<Item = FH> + use<'_> {
        self.faces().filter(|f| !self.topol.is_deleted_face(*f))
    }

    /// Live halfedges without a face, in index order.
    pub fn boundary_halfedges(&self) -> impl Iterator<Item = HH> + use<'_> {
        self.topol.boundary_halfedges()
    }

    pub fn vertex_halfedge(&self, v: VH) -> Option<HH> {
        self.topol.vertex_halfedge(v)
    }

    pub fn to_vertex(&self, h: HH) -> VH {
        self.topol.to_vertex(h)
    }

    pub fn from_vertex(&self, h: HH) -> VH {
        self.topol.from_vertex(h)
    }

    pub fn next_halfedge(&self, h: HH) -> HH {
        self.topol.next_halfedge(h)
    }

    pub fn prev_halfedge(&self, h: HH) -> HH {
        self.topol.prev_halfedge(h)
    }

    pub fn halfedge_face(&self, h: HH) -> Option<FH> {
        self.topol.halfedge_face(h)
    }

    pub fn is_boundary_halfedge(&self, h: HH) -> bool {
        self.topol.is_boundary_halfedge(h)
    }

    pub fn is_manifold_vertex(&self, v: VH) -> bool {
        self.topol.is_manifold_vertex(v)
    }

    pub fn find_halfedge(&self, from: VH, to: VH) -> Option<HH> {
        self.topol.find_halfedge(from, to)
    }

    pub fn voh_ccw_iter(&self, v: VH) -> impl Iterator<Item = HH> + use<'_> {
        iterator::voh_ccw_iter(&self.topol, v)
    }

    pub fn vv_ccw_iter(&self, v: VH) -> impl Iterator<Item = VH> + use<'_> {
        iterator::vv_ccw_iter(&self.topol, v)
    }

    pub fn vf_ccw_iter(&self, v: VH) -> impl Iterator<Item = FH> + use<'_> {
        iterator::vf_ccw_iter(&self.topol, v)
    }

    pub fn fv_ccw_iter(&self, f: FH) -> impl Iterator<Item = VH> + use<'_> {
        iterator::fv_ccw_iter(&self.topol, f)
    }

    /// Halfedges reached by following `next` from `h` until the loop closes.
    pub fn loop_ccw_iter(&self, h: HH) -> impl Iterator<Item = HH> + use<'_> {
        iterator::loop_ccw_iter(&self.topol, h)
    }

    /// The vertex positions. The returned property shares its buffer with
    /// the mesh.
    pub fn points(&self) -> VProperty<DVec3> {
        self.points.clone()
    }

    pub fn point(&self, v: VH) -> Result<DVec3, Error> {
        self.points.get_cloned(v)
    }

    pub fn set_point(&mut self, v: VH, pos: DVec3) -> Result<(), Error> {
        self.points.set(v, pos)
    }

    /// The persistent face identifiers. The returned property shares its
    /// buffer with the mesh.
    pub fn face_ids(&self) -> FProperty<u32> {
        self.face_ids.clone()
    }

    pub fn face_id(&self, f: FH) -> Result<u32, Error> {
        self.face_ids.get_cloned(f)
    }

    pub fn set_face_id(&mut self, f: FH, id: u32) -> Result<(), Error> {
        self.face_ids.set(f, id)
    }

    pub fn add_vertex(&mut self, pos: DVec3) -> Result<VH, Error> {
        let v = self.topol.add_vertex()?;
        self.points.set(v, pos)?;
        Ok(v)
    }

    /// Add all `positions` as vertices, and return the range of their
    /// indices.
    pub fn add_vertices(&mut self, positions: &[DVec3]) -> Result<Range<u32>, Error> {
        let start = self.num_vertices() as u32;
        self.topol.reserve(positions.len(), 0, 0)?;
        for _ in positions {
            self.topol.add_vertex()?;
        }
        let stop = self.num_vertices() as u32;
        let mut points = self.points.try_borrow_mut()?;
        let points: &mut [DVec3] = &mut points;
        points[(start as usize)..(stop as usize)].copy_from_slice(positions);
        Ok(start..stop)
    }

    /// Add a face and tag it with its own index as the identifier.
    pub fn add_face(&mut self, verts: &[VH]) -> Result<FH, Error> {
        let f = self.topol.add_face(verts, &mut self.cache)?;
        self.face_ids.set(f, f.index())?;
        Ok(f)
    }

    pub fn add_tri_face(&mut self, v0: VH, v1: VH, v2: VH) -> Result<FH, Error> {
        self.add_face(&[v0, v1, v2])
    }

    pub fn add_quad_face(&mut self, v0: VH, v1: VH, v2: VH, v3: VH) -> Result<FH, Error> {
        self.add_face(&[v0, v1, v2, v3])
    }

    /// Delete a face, leaving a hole in its place.
    ///
    /// Edges left without faces on either side are deleted along with the
    /// face, and so are vertices left without edges. Boundary links around
    /// the hole are stitched back together.
    pub fn delete_face(&mut self, f: FH) -> Result<(), Error> {
        self.topol.delete_face(f, &mut self.cache)
    }

    /// Point every vertex at a boundary outgoing halfedge when it has one,
    /// then check that all boundary loops are closed and every boundary
    /// vertex is manifold.
    pub fn normalize_boundary(&mut self) -> Result<(), Error> {
        self.topol.normalize_boundary()
    }

    /// Check that all boundary loops are closed and boundary vertices are
    /// manifold, without modifying anything.
    pub fn check_boundary(&self) -> Result<(), Error> {
        self.topol.check_boundary()
    }

    /// Average position of the live vertices of the face.
    pub fn face_centroid(&self, f: FH) -> Result<DVec3, Error> {
        let points = self.points.try_borrow()?;
        let (sum, count) = self
            .fv_ccw_iter(f)
            .fold((DVec3::ZERO, 0usize), |(sum, count), v| {
                (sum + points[v], count + 1)
            });
        Ok(sum / count as f64)
    }
}
