use thiserror::Error;

use crate::gfx::geometry::MeshData;

/// Floats per vertex record: position, normal and texture coordinates.
const VERTEX_ARITY: usize = 8;

#[derive(Debug, Error, PartialEq)]
pub enum PlyError {
    #[error("missing 'ply' magic on the first line")]
    MissingMagic,
    #[error("unsupported PLY format '{0}', only ascii is supported")]
    UnsupportedFormat(String),
    #[error("header does not declare an 'element {0}' count")]
    MissingElement(&'static str),
    #[error("header is not terminated by 'end_header'")]
    MissingEndHeader,
    #[error("expected {expected} {element} lines but found {found}")]
    Truncated {
        element: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("vertex on line {line} has {found} values, expected {VERTEX_ARITY}")]
    VertexArity { line: usize, found: usize },
    #[error("face on line {line} has {count} corners, only triangles are supported")]
    NonTriangularFace { line: usize, count: usize },
    #[error("face on line {line} declares {declared} indices but lists {found}")]
    FaceArity {
        line: usize,
        declared: usize,
        found: usize,
    },
    #[error("invalid number '{token}' on line {line}")]
    InvalidNumber { line: usize, token: String },
    #[error("face on line {line} references vertex {index} but there are only {vertex_count}")]
    IndexOutOfRange {
        line: usize,
        index: u32,
        vertex_count: usize,
    },
}

struct Header {
    vertex_count: usize,
    face_count: usize,
}

/// Parses an ASCII PLY file with `x y z nx ny nz s t` vertices and
/// triangular faces.
///
/// Anything else (binary bodies, other vertex layouts, polygons) is rejected
/// instead of being misread.
pub fn parse_ply(text: &str) -> Result<MeshData, PlyError> {
    // 1-based line numbers for error messages
    let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line.trim()));

    let header = parse_header(&mut lines)?;
    let mut body = lines.filter(|(_, line)| !line.is_empty());

    // header counts are untrusted, so buffers grow with the lines actually read
    let mut data = MeshData::default();

    for found in 0..header.vertex_count {
        let (line, record) = body.next().ok_or(PlyError::Truncated {
            element: "vertex",
            expected: header.vertex_count,
            found,
        })?;

        let values = record
            .split_whitespace()
            .map(|token| parse_number::<f32>(line, token))
            .collect::<Result<Vec<_>, _>>()?;
        if values.len() != VERTEX_ARITY {
            return Err(PlyError::VertexArity {
                line,
                found: values.len(),
            });
        }

        data.positions.extend_from_slice(&values[0..3]);
        data.normals.extend_from_slice(&values[3..6]);
        data.texcoords.extend_from_slice(&values[6..8]);
    }

    for found in 0..header.face_count {
        let (line, record) = body.next().ok_or(PlyError::Truncated {
            element: "face",
            expected: header.face_count,
            found,
        })?;

        let mut tokens = record.split_whitespace();
        let declared = parse_number::<usize>(line, tokens.next().unwrap_or_default())?;
        if declared != 3 {
            return Err(PlyError::NonTriangularFace {
                line,
                count: declared,
            });
        }

        let corners = tokens
            .map(|token| parse_number::<u32>(line, token))
            .collect::<Result<Vec<_>, _>>()?;
        if corners.len() != declared {
            return Err(PlyError::FaceArity {
                line,
                declared,
                found: corners.len(),
            });
        }
        if let Some(&index) = corners
            .iter()
            .find(|&&index| index as usize >= header.vertex_count)
        {
            return Err(PlyError::IndexOutOfRange {
                line,
                index,
                vertex_count: header.vertex_count,
            });
        }

        data.indices.extend_from_slice(&corners);
    }

    if body.next().is_some() {
        log::debug!("ignoring PLY lines after the declared faces");
    }

    log::debug!(
        "parsed PLY with {} vertices and {} faces",
        header.vertex_count,
        header.face_count
    );
    Ok(data)
}

fn parse_header<'a>(lines: &mut impl Iterator<Item = (usize, &'a str)>) -> Result<Header, PlyError> {
    match lines.next() {
        Some((_, "ply")) => {}
        _ => return Err(PlyError::MissingMagic),
    }

    let mut vertex_count = None;
    let mut face_count = None;

    for (line, record) in lines.by_ref() {
        let mut tokens = record.split_whitespace();
        match tokens.next() {
            Some("end_header") => {
                return Ok(Header {
                    vertex_count: vertex_count.ok_or(PlyError::MissingElement("vertex"))?,
                    face_count: face_count.ok_or(PlyError::MissingElement("face"))?,
                });
            }
            Some("format") => {
                let format = tokens.next().unwrap_or_default();
                if format != "ascii" {
                    return Err(PlyError::UnsupportedFormat(format.to_string()));
                }
            }
            Some("element") => {
                let name = tokens.next().unwrap_or_default();
                let count = tokens.next().unwrap_or_default();
                match name {
                    "vertex" => vertex_count = Some(parse_number(line, count)?),
                    "face" => face_count = Some(parse_number(line, count)?),
                    other => log::warn!("ignoring unsupported PLY element '{other}'"),
                }
            }
            // comments, properties and obj_info are not needed for the fixed layout
            _ => {}
        }
    }

    Err(PlyError::MissingEndHeader)
}

fn parse_number<T: std::str::FromStr>(line: usize, token: &str) -> Result<T, PlyError> {
    token.parse().map_err(|_| PlyError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}
