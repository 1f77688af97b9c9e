use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::SplitWhitespace,
};

use glam::DVec3;

use crate::{error::Error, mesh::PolyMesh, soup::FaceSoup};

fn invalid(line: usize, reason: impl Into<String>) -> Error {
    Error::InvalidOff {
        line,
        reason: reason.into(),
    }
}

fn parse_next<T: std::str::FromStr>(
    tokens: &mut SplitWhitespace,
    line: usize,
    what: &str,
) -> Result<T, Error> {
    let token = tokens
        .next()
        .ok_or_else(|| invalid(line, format!("missing {}", what)))?;
    token
        .parse()
        .map_err(|_| invalid(line, format!("cannot parse {} from '{}'", what, token)))
}

/// Lines with content, numbered from 1, with comments stripped.
fn content_lines<R: BufRead>(reader: R) -> impl Iterator<Item = Result<(usize, String), Error>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Ok(line) => {
                let content = match line.find('#') {
                    Some(pos) => &line[..pos],
                    None => &line,
                };
                let content = content.trim();
                if content.is_empty() {
                    None
                } else {
                    Some(Ok((i + 1, content.to_string())))
                }
            }
            Err(e) => Some(Err(Error::Io(e))),
        })
}

/// Read a mesh in OFF format.
///
/// The vertex and face counts may follow the `OFF` keyword on the same
/// line. Each face line lists the number of vertices followed by their
/// indices. Anything after that, such as a color, is ignored, and so is
/// anything after the coordinates of a vertex.
const MAX_RESERVE: usize = 1 << 20;

pub fn read_off<R: BufRead>(reader: R) -> Result<FaceSoup, Error> {
    let mut lines = content_lines(reader);
    let mut next_line = |what: &str| -> Result<(usize, String), Error> {
        lines
            .next()
            .unwrap_or_else(|| Err(invalid(0, format!("unexpected end of file, expected {}", what))))
    };
    let (lineno, header) = next_line("the OFF header")?;
    let rest = header
        .strip_prefix("OFF")
        .ok_or_else(|| invalid(lineno, "missing OFF header"))?;
    let (lineno, counts) = if rest.trim().is_empty() {
        next_line("vertex and face counts")?
    } else {
        (lineno, rest.to_string())
    };
    let mut tokens = counts.split_whitespace();
    let nverts: usize = parse_next(&mut tokens, lineno, "vertex count")?;
    let nfaces: usize = parse_next(&mut tokens, lineno, "face count")?;
    // Counts come from the file, so they only bound how much is reserved.
    let mut positions = Vec::with_capacity(nverts.min(MAX_RESERVE));
    for _ in 0..nverts {
        let (lineno, line) = next_line("a vertex")?;
        let mut tokens = line.split_whitespace();
        let x = parse_next(&mut tokens, lineno, "x coordinate")?;
        let y = parse_next(&mut tokens, lineno, "y coordinate")?;
        let z = parse_next(&mut tokens, lineno, "z coordinate")?;
        positions.push(DVec3::new(x, y, z));
    }
    let mut faces = Vec::with_capacity(nfaces.min(MAX_RESERVE));
    for _ in 0..nfaces {
        let (lineno, line) = next_line("a face")?;
        let mut tokens = line.split_whitespace();
        let size: usize = parse_next(&mut tokens, lineno, "face size")?;
        if size < 3 {
            return Err(invalid(lineno, format!("face with {} vertices", size)));
        }
        let face = (0..size)
            .map(|_| {
                let i: u32 = parse_next(&mut tokens, lineno, "vertex index")?;
                if i as usize >= nverts {
                    Err(invalid(
                        lineno,
                        format!("vertex index {} out of range, there are {} vertices", i, nverts),
                    ))
                } else {
                    Ok(i)
                }
            })
            .collect::<Result<Vec<u32>, Error>>()?;
        faces.push(face);
    }
    FaceSoup::new(positions, faces)
}

impl PolyMesh {
    /// Load a mesh from an OFF file. Faces are tagged with the order they
    /// appear in the file.
    pub fn load_off(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        let soup = read_off(BufReader::new(file))?;
        log::debug!(
            "Read {} vertices and {} faces from {}",
            soup.num_vertices(),
            soup.num_faces(),
            path.display()
        );
        Self::from_soup(&soup)
    }
}
