/// Mesh file loading for Wavefront OBJ and STL (binary and ASCII)
use log::{debug, info};
use nom::{
    bytes::complete::{is_not, tag, take},
    character::complete::{char, i64 as integer, multispace0, multispace1, not_line_ending, space0, space1},
    combinator::{all_consuming, opt},
    multi::{count, many0, separated_list1},
    number::complete::{double, le_f32, le_u16, le_u32},
    sequence::{preceded, terminated, tuple},
    IResult,
};
use quatview_core::{Face, Mesh, Vec3};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported mesh format: {0} (expected .obj or .stl)")]
    UnsupportedFormat(String),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid STL: {0}")]
    Stl(String),

    #[error(transparent)]
    Mesh(#[from] quatview_core::Error),
}

/// Load a mesh, choosing the parser from the file extension.
pub fn load_mesh(path: &Path) -> Result<Mesh, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let data = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = match extension.as_str() {
        "obj" => parse_obj(&String::from_utf8_lossy(&data))?,
        "stl" => parse_stl(&data)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    info!(
        "loaded {}: {} vertices, {} faces",
        path.display(),
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Parse Wavefront OBJ text.
///
/// Only `v` and `f` statements matter; polygons are fan-triangulated and
/// texture/normal references are ignored. Other statements are skipped.
pub fn parse_obj(input: &str) -> Result<Mesh, LoadError> {
    let mut vertices = Vec::new();
    let mut faces: Vec<Face> = Vec::new();

    for (number, line) in input.lines().enumerate() {
        let line = line.trim();
        let error = |message: String| LoadError::Parse {
            line: number + 1,
            message,
        };

        match line.split_whitespace().next() {
            Some("v") => {
                let (_, v) = obj_vertex(line).map_err(|e| error(format!("bad vertex: {:?}", e)))?;
                vertices.push(v);
            }
            Some("f") => {
                let (_, refs) = obj_face(line).map_err(|e| error(format!("bad face: {:?}", e)))?;
                if refs.len() < 3 {
                    return Err(error(format!("face needs 3 vertices, got {}", refs.len())));
                }
                let indices = refs
                    .iter()
                    .map(|&r| resolve_index(r, vertices.len()).ok_or_else(|| error(format!("bad vertex index {}", r))))
                    .collect::<Result<Vec<_>, _>>()?;
                for k in 1..indices.len() - 1 {
                    faces.push([indices[0], indices[k], indices[k + 1]]);
                }
            }
            _ => {}
        }
    }

    debug!("parsed OBJ: {} vertices, {} triangles", vertices.len(), faces.len());
    Ok(Mesh::new(vertices, faces)?)
}

/// OBJ indices are 1-based; negative ones count back from the latest vertex.
fn resolve_index(index: i64, defined: usize) -> Option<usize> {
    match index {
        0 => None,
        i if i > 0 => usize::try_from(i - 1).ok(),
        i => defined.checked_sub(usize::try_from(-i).ok()?),
    }
}

fn obj_vertex(input: &str) -> IResult<&str, Vec3> {
    let (input, _) = terminated(tag("v"), space1)(input)?;
    let (input, (x, _, y, _, z)) = tuple((double, space1, double, space1, double))(input)?;
    // An optional w component is ignored
    let (input, _) = opt(preceded(space1, double))(input)?;
    let (input, _) = all_consuming(space0)(input)?;
    Ok((input, Vec3::new(x, y, z)))
}

fn obj_face(input: &str) -> IResult<&str, Vec<i64>> {
    let (input, _) = terminated(tag("f"), space1)(input)?;
    let vertex_ref = terminated(integer, opt(preceded(char('/'), is_not(" \t"))));
    let (input, refs) = separated_list1(space1, vertex_ref)(input)?;
    let (input, _) = all_consuming(space0)(input)?;
    Ok((input, refs))
}

/// Detect and parse STL file (binary or ASCII)
///
/// Every facet gets its own three vertices; coincident corners are not merged.
pub fn parse_stl(data: &[u8]) -> Result<Mesh, LoadError> {
    // Try to detect format
    if data.len() > 5 && &data[0..5] == b"solid" {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok((_, triangles)) = ascii_stl(text) {
                return triangle_soup(triangles);
            }
        }
    }

    parse_binary_stl(data)
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, LoadError> {
    if data.len() < 84 {
        return Err(LoadError::Stl("file too small to be a valid STL".to_string()));
    }

    match binary_stl(data) {
        Ok((_, triangles)) => triangle_soup(triangles),
        Err(_) => Err(LoadError::Stl("unexpected end of file".to_string())),
    }
}

fn binary_stl(input: &[u8]) -> IResult<&[u8], Vec<[Vec3; 3]>> {
    // Skip 80-byte header
    let (input, _) = take(80usize)(input)?;
    let (input, triangle_count) = le_u32(input)?;
    count(binary_facet, triangle_count as usize)(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], [Vec3; 3]> {
    // The stored normal is recomputed from the corners, so skip it
    let (input, _) = count(le_f32, 3)(input)?;
    let (input, corners) = count(binary_vertex, 3)(input)?;
    // Attribute byte count
    let (input, _) = le_u16(input)?;
    Ok((input, [corners[0], corners[1], corners[2]]))
}

fn binary_vertex(input: &[u8]) -> IResult<&[u8], Vec3> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Vec3::new(x as f64, y as f64, z as f64)))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, LoadError> {
    match ascii_stl(input) {
        Ok((_, triangles)) => triangle_soup(triangles),
        Err(e) => Err(LoadError::Stl(format!("failed to parse ASCII STL: {:?}", e))),
    }
}

fn ascii_stl(input: &str) -> IResult<&str, Vec<[Vec3; 3]>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, triangles) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = not_line_ending(input)?;
    Ok((input, triangles))
}

fn ascii_facet(input: &str) -> IResult<&str, [Vec3; 3]> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _) = ascii_vector(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = ascii_vertex(input)?;
    let (input, v2) = ascii_vertex(input)?;
    let (input, v3) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, [v1, v2, v3]))
}

fn ascii_vertex(input: &str) -> IResult<&str, Vec3> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    ascii_vector(input)
}

fn ascii_vector(input: &str) -> IResult<&str, Vec3> {
    let (input, _) = multispace0(input)?;
    let (input, x) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = double(input)?;
    Ok((input, Vec3::new(x, y, z)))
}

fn triangle_soup(triangles: Vec<[Vec3; 3]>) -> Result<Mesh, LoadError> {
    let faces = (0..triangles.len()).map(|i| [3 * i, 3 * i + 1, 3 * i + 2]).collect();
    let vertices = triangles.into_iter().flatten().collect();
    Ok(Mesh::new(vertices, faces)?)
}
