//! STL export for 3D printing.
//!
//! Positions are written exactly as given; any centering or orientation must
//! already be baked into the mesh.

use caseforge_core::ExportError;
use caseforge_geometry::Mesh;
use glam::DVec3;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{multispace0, multispace1, space0},
    combinator::{map, rest},
    multi::{count, many0},
    number::complete::{double, le_f32, le_u16, le_u32},
    sequence::{preceded, terminated, tuple},
    IResult,
};
use tracing::debug;

/// Solid name used for exported cases.
pub const SOLID_NAME: &str = "phonecase";

const BINARY_HEADER: &[u8] = b"Binary STL exported by caseforge";

/// File name for a model's STL export.
pub fn stl_filename(model_id: &str) -> String {
    format!("{model_id}.stl")
}

/// Serialize an indexed triangle list as ASCII STL.
///
/// A mesh without an index buffer is rejected rather than guessed at.
pub fn serialize_mesh(
    positions: &[DVec3],
    indices: Option<&[u32]>,
    name: &str,
) -> Result<String, ExportError> {
    let triangles = checked_triangles(positions, indices)?;

    let mut output = String::new();
    output.push_str(&format!("solid {}\n", name));

    for [v0, v1, v2] in triangles {
        let normal = facet_normal(v0, v1, v2);
        output.push_str(&format!(
            "  facet normal {} {} {}\n",
            normal.x, normal.y, normal.z
        ));
        output.push_str("    outer loop\n");
        output.push_str(&format!("      vertex {} {} {}\n", v0.x, v0.y, v0.z));
        output.push_str(&format!("      vertex {} {} {}\n", v1.x, v1.y, v1.z));
        output.push_str(&format!("      vertex {} {} {}\n", v2.x, v2.y, v2.z));
        output.push_str("    endloop\n");
        output.push_str("  endfacet\n");
    }

    output.push_str(&format!("endsolid {}\n", name));
    Ok(output)
}

/// Serialize a mesh as ASCII STL.
pub fn mesh_to_stl_ascii(mesh: &Mesh, name: &str) -> Result<String, ExportError> {
    serialize_mesh(&mesh.positions, Some(&mesh.indices), name)
}

/// Serialize an indexed triangle list as binary STL.
pub fn serialize_mesh_binary(
    positions: &[DVec3],
    indices: Option<&[u32]>,
) -> Result<Vec<u8>, ExportError> {
    let triangles = checked_triangles(positions, indices)?;
    let triangle_count = triangles.len();
    let mut output = Vec::with_capacity(84 + triangle_count * 50);

    // 80-byte header padded with spaces
    let mut header = [0x20u8; 80];
    header[..BINARY_HEADER.len()].copy_from_slice(BINARY_HEADER);
    output.extend_from_slice(&header);
    output.extend_from_slice(&(triangle_count as u32).to_le_bytes());

    for [v0, v1, v2] in triangles {
        let normal = facet_normal(v0, v1, v2);
        for v in [normal, v0, v1, v2] {
            output.extend_from_slice(&(v.x as f32).to_le_bytes());
            output.extend_from_slice(&(v.y as f32).to_le_bytes());
            output.extend_from_slice(&(v.z as f32).to_le_bytes());
        }
        // Attribute byte count
        output.extend_from_slice(&0u16.to_le_bytes());
    }

    debug!(triangles = triangle_count, bytes = output.len(), "encoded binary STL");
    Ok(output)
}

/// Serialize a mesh as binary STL.
pub fn mesh_to_stl(mesh: &Mesh) -> Result<Vec<u8>, ExportError> {
    serialize_mesh_binary(&mesh.positions, Some(&mesh.indices))
}

fn facet_normal(v0: DVec3, v1: DVec3, v2: DVec3) -> DVec3 {
    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}

fn checked_triangles(
    positions: &[DVec3],
    indices: Option<&[u32]>,
) -> Result<Vec<[DVec3; 3]>, ExportError> {
    let indices = indices.ok_or(ExportError::UnsupportedMeshFormat)?;
    if indices.len() % 3 != 0 {
        return Err(ExportError::MalformedIndexBuffer { len: indices.len() });
    }
    if indices.is_empty() {
        return Err(ExportError::NoGeometry);
    }

    let vertex = |index: u32| {
        positions
            .get(index as usize)
            .copied()
            .ok_or(ExportError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            })
    };
    indices
        .chunks_exact(3)
        .map(|tri| -> Result<[DVec3; 3], ExportError> {
            Ok([vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?])
        })
        .collect()
}

/// One triangle read back from an STL file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StlFacet {
    pub normal: DVec3,
    pub vertices: [DVec3; 3],
}

/// The contents of an STL file.
#[derive(Debug, Clone, PartialEq)]
pub struct StlDocument {
    pub name: String,
    pub facets: Vec<StlFacet>,
}

/// Parse ASCII STL text.
pub fn parse_ascii_stl(input: &str) -> Result<StlDocument, ExportError> {
    match ascii_document(input) {
        Ok((remaining, document)) if remaining.trim().is_empty() => Ok(document),
        Ok((remaining, _)) => Err(ExportError::Parse {
            reason: format!("unexpected trailing input: {}", snippet(remaining)),
        }),
        Err(e) => Err(ExportError::Parse {
            reason: e.to_string(),
        }),
    }
}

/// Parse binary STL bytes.
pub fn parse_binary_stl(input: &[u8]) -> Result<StlDocument, ExportError> {
    match binary_document(input) {
        Ok((remaining, document)) if remaining.is_empty() => Ok(document),
        Ok((remaining, _)) => Err(ExportError::Parse {
            reason: format!("{} bytes after the last facet", remaining.len()),
        }),
        Err(e) => Err(ExportError::Parse {
            reason: format!("{:?}", e.map_input(|i| i.len())),
        }),
    }
}

fn snippet(input: &str) -> &str {
    let end = input
        .char_indices()
        .nth(40)
        .map_or(input.len(), |(i, _)| i);
    &input[..end]
}

fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(multispace0, tag(word))
}

fn vec3(input: &str) -> IResult<&str, DVec3> {
    map(
        tuple((
            preceded(multispace1, double),
            preceded(multispace1, double),
            preceded(multispace1, double),
        )),
        |(x, y, z)| DVec3::new(x, y, z),
    )(input)
}

fn ascii_facet(input: &str) -> IResult<&str, StlFacet> {
    let (input, _) = keyword("facet")(input)?;
    let (input, normal) = preceded(keyword("normal"), vec3)(input)?;
    let (input, _) = tuple((keyword("outer"), keyword("loop")))(input)?;
    let (input, v0) = preceded(keyword("vertex"), vec3)(input)?;
    let (input, v1) = preceded(keyword("vertex"), vec3)(input)?;
    let (input, v2) = preceded(keyword("vertex"), vec3)(input)?;
    let (input, _) = tuple((keyword("endloop"), keyword("endfacet")))(input)?;
    Ok((
        input,
        StlFacet {
            normal,
            vertices: [v0, v1, v2],
        },
    ))
}

fn ascii_document(input: &str) -> IResult<&str, StlDocument> {
    let (input, name) = preceded(
        terminated(keyword("solid"), space0),
        take_till(|c: char| c == '\n' || c == '\r'),
    )(input)?;
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(keyword("endsolid"), rest)(input)?;
    Ok((
        input,
        StlDocument {
            name: name.trim().to_string(),
            facets,
        },
    ))
}

fn binary_vec3(input: &[u8]) -> IResult<&[u8], DVec3> {
    map(tuple((le_f32, le_f32, le_f32)), |(x, y, z)| {
        DVec3::new(x as f64, y as f64, z as f64)
    })(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], StlFacet> {
    map(
        tuple((binary_vec3, binary_vec3, binary_vec3, binary_vec3, le_u16)),
        |(normal, v0, v1, v2, _attributes)| StlFacet {
            normal,
            vertices: [v0, v1, v2],
        },
    )(input)
}

fn binary_document(input: &[u8]) -> IResult<&[u8], StlDocument> {
    let (input, header) = nom::bytes::complete::take(80usize)(input)?;
    let (input, facet_count) = le_u32(input)?;
    let (input, facets) = count(binary_facet, facet_count as usize)(input)?;
    let name = String::from_utf8_lossy(header)
        .trim_end_matches(|c: char| c == ' ' || c == '\0')
        .to_string();
    Ok((input, StlDocument { name, facets }))
}
