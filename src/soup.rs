use std::{
    collections::HashSet,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use glam::DVec3;

use crate::error::Error;

/// Polygons with no connectivity between them, each tagged with an
/// identifier.
///
/// A soup keeps faces exactly as they were loaded, so it can hold meshes the
/// halfedge structure would reject. The identifiers start out as the load
/// order of the faces, which is what face identifiers of a [`PolyMesh`]
/// loaded from the same file are.
///
/// [`PolyMesh`]: crate::PolyMesh
#[derive(Clone, Debug, Default)]
pub struct FaceSoup {
    positions: Vec<DVec3>,
    faces: Vec<Vec<u32>>,
    ids: Vec<u32>,
}

impl FaceSoup {
    /// Create a soup from vertex positions and polygons given as indices into
    /// `positions`. Faces are tagged with their index.
    pub fn new(positions: Vec<DVec3>, faces: Vec<Vec<u32>>) -> Result<Self, Error> {
        let ids = (0..faces.len() as u32).collect();
        Self::with_ids(positions, faces, ids)
    }

    pub fn with_ids(
        positions: Vec<DVec3>,
        faces: Vec<Vec<u32>>,
        ids: Vec<u32>,
    ) -> Result<Self, Error> {
        if faces.len() != ids.len() {
            return Err(Error::MismatchedArrayLengths(faces.len(), ids.len()));
        }
        if let Some(&index) = faces
            .iter()
            .flatten()
            .find(|&&i| i as usize >= positions.len())
        {
            return Err(Error::InvalidVertexIndex {
                index: index as usize,
                count: positions.len(),
            });
        }
        Ok(FaceSoup {
            positions,
            faces,
            ids,
        })
    }

    /// Load all the polygons of an OBJ file, in the order they appear.
    ///
    /// Faces of all objects and groups in the file end up in the same soup.
    pub fn load_obj(path: &Path) -> Result<Self, Error> {
        let options = tobj::LoadOptions::default();
        let (models, _) =
            tobj::load_obj(path, &options).map_err(|e| Error::ObjLoadFailed(format!("{}", e)))?;
        let mut positions: Vec<DVec3> = Vec::new();
        let mut faces: Vec<Vec<u32>> = Vec::new();
        for model in models {
            let mesh = model.mesh;
            if mesh.positions.len() % 3 != 0 {
                return Err(Error::IncorrectNumberOfCoordinates(mesh.positions.len()));
            }
            let voffset = positions.len() as u32;
            positions.extend(
                mesh.positions
                    .chunks(3)
                    .map(|triplet| DVec3::new(triplet[0], triplet[1], triplet[2])),
            );
            // Without arities, every face is a triangle.
            let arities: Vec<usize> = if mesh.face_arities.is_empty() {
                vec![3; mesh.indices.len() / 3]
            } else {
                mesh.face_arities.iter().map(|&a| a as usize).collect()
            };
            let mut start = 0usize;
            for size in arities {
                let indices = mesh
                    .indices
                    .get(start..(start + size))
                    .ok_or_else(|| {
                        Error::ObjLoadFailed(format!(
                            "face arities of '{}' do not match its indices",
                            model.name
                        ))
                    })?;
                start += size;
                faces.push(indices.iter().map(|i| i + voffset).collect());
            }
        }
        log::debug!(
            "Loaded {} vertices and {} faces from {}",
            positions.len(),
            faces.len(),
            path.display()
        );
        Self::new(positions, faces)
    }

    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }

    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// Remove every face whose identifier is in `ids`, keeping the order of
    /// the rest. Vertices are kept. Returns the number of removed faces.
    pub fn remove_faces(&mut self, ids: &HashSet<u32>) -> usize {
        let before = self.faces.len();
        let keep: Vec<bool> = self.ids.iter().map(|id| !ids.contains(id)).collect();
        let mut flags = keep.iter();
        self.faces.retain(|_| flags.next().copied().unwrap_or(true));
        self.ids.retain(|id| !ids.contains(id));
        before - self.faces.len()
    }

    /// Write the soup in OBJ format.
    pub fn write_obj_to<W: Write>(&self, mut out: W) -> Result<(), Error> {
        for p in &self.positions {
            writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
        }
        for face in &self.faces {
            write!(out, "f")?;
            for i in face {
                write!(out, " {}", i + 1)?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }

    pub fn write_obj(&self, path: &Path) -> Result<(), Error> {
        let file = File::create(path)?;
        self.write_obj_to(BufWriter::new(file))?;
        log::debug!(
            "Wrote {} vertices and {} faces to {}",
            self.positions.len(),
            self.faces.len(),
            path.display()
        );
        Ok(())
    }
}
