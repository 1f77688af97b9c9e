use std::path::Path;

use crate::{element::Handle, error::Error, mesh::PolyMesh, soup::FaceSoup};

impl PolyMesh {
    /// Build a mesh from a face soup, tagging each face with its identifier
    /// from the soup.
    pub fn from_soup(soup: &FaceSoup) -> Result<Self, Error> {
        let mesh = Self::from_polygons(soup.positions(), soup.faces())?;
        {
            let mut ids = mesh.face_ids();
            let mut ids = ids.try_borrow_mut()?;
            ids.copy_from_slice(soup.ids());
        }
        Ok(mesh)
    }

    /// Load a mesh from an OBJ file. Faces are tagged with the order they
    /// appear in the file.
    pub fn load_obj(path: &Path) -> Result<Self, Error> {
        Self::from_soup(&FaceSoup::load_obj(path)?)
    }

    /// Load an OBJ or OFF file, depending on the extension of `path`.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("obj") => Self::load_obj(path),
            Some("off") => Self::load_off(path),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// The live vertices and faces of the mesh as a face soup. Vertices are
    /// renumbered to skip the deleted ones, and faces keep their
    /// identifiers.
    pub fn to_soup(&self) -> Result<FaceSoup, Error> {
        let points = self.points();
        let points = points.try_borrow()?;
        let ids = self.face_ids();
        let ids = ids.try_borrow()?;
        let mut vmap = vec![u32::MAX; self.num_vertices()];
        let mut positions = Vec::new();
        for v in self.live_vertices() {
            vmap[v.index() as usize] = positions.len() as u32;
            positions.push(points[v]);
        }
        let mut faces = Vec::with_capacity(self.num_live_faces());
        let mut fids = Vec::with_capacity(self.num_live_faces());
        for f in self.live_faces() {
            faces.push(
                self.fv_ccw_iter(f)
                    .map(|v| vmap[v.index() as usize])
                    .collect::<Vec<u32>>(),
            );
            fids.push(ids[f]);
        }
        FaceSoup::with_ids(positions, faces, fids)
    }

    /// Write the live part of the mesh to an OBJ file.
    pub fn write_obj(&self, path: &Path) -> Result<(), Error> {
        self.to_soup()?.write_obj(path)
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use crate::{
        element::Handle, error::Error, macros::assert_point_eq, mesh::PolyMesh,
        soup::test::temp_path,
    };

    #[test]
    fn t_to_soup_skips_deleted() {
        let mut mesh = PolyMesh::open_tube(1.0, 2.0, 6, 2).expect("Cannot create tube");
        mesh.delete_face(4.into()).expect("Cannot delete face");
        let soup = mesh.to_soup().expect("Cannot create soup");
        assert_eq!(soup.num_faces(), 23);
        assert!(!soup.ids().contains(&4));
        assert_eq!(soup.num_vertices(), 18);
        let back = PolyMesh::from_soup(&soup).expect("Cannot build mesh");
        assert_eq!(back.num_faces(), 23);
        assert_eq!(
            back.live_faces()
                .map(|f| back.face_id(f).expect("Cannot read face id"))
                .collect::<Vec<_>>(),
            soup.ids()
        );
        back.check_topology().expect("Topology check failed");
    }

    #[test]
    fn t_obj_round_trip() {
        let mut mesh = PolyMesh::unit_box().expect("Cannot create box");
        mesh.delete_face(5.into()).expect("Cannot delete face");
        let path = temp_path("box_round_trip.obj");
        mesh.write_obj(&path).expect("Cannot write obj");
        let loaded = PolyMesh::load(&path).expect("Cannot load obj");
        std::fs::remove_file(&path).expect("Cannot remove temp file");
        assert_eq!(loaded.num_vertices(), 8);
        assert_eq!(loaded.num_faces(), 5);
        assert_eq!(loaded.boundary_halfedges().count(), 4);
        for f in loaded.faces() {
            let expected = mesh
                .face_centroid(f.index().into())
                .expect("Cannot compute centroid");
            assert_point_eq!(
                loaded.face_centroid(f).expect("Cannot compute centroid"),
                expected
            );
        }
        loaded.check_topology().expect("Topology check failed");
    }

    #[test]
    fn t_load_unsupported() {
        assert!(matches!(
            PolyMesh::load(Path::new("mesh.stl")),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
