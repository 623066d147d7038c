use glam::{Vec2, Vec3};

use crate::Error;
use crate::cursor::ByteCursor;
use crate::model::VertexWeights;

/// Restart marker inside triangle-strip index streams.
const STRIP_RESTART: u16 = 0xFFFF;

/// Converts a triangle strip with restart markers into an explicit triangle
/// list.
///
/// Winding alternates per emitted triangle, starting flipped; a restart
/// marker re-seeds the window and resets the winding. Windows containing a
/// repeated index are dropped, but the winding still flips for them.
pub(crate) fn decode_triangle_strip(
    cur: &mut ByteCursor<'_>,
    faces_offset: usize,
    face_count: usize,
) -> Result<Vec<u16>, Error> {
    let end = faces_offset + face_count * 2;
    cur.seek(faces_offset)?;

    let mut indices = Vec::new();
    if face_count < 3 {
        return Ok(indices);
    }

    let mut a = cur.read_u16()?;
    let mut b = cur.read_u16()?;
    let mut direction = -1i32;

    while cur.position() < end {
        let c = cur.read_u16()?;

        if c == STRIP_RESTART {
            a = cur.read_u16()?;
            b = cur.read_u16()?;
            direction = -1;
            continue;
        }

        direction = -direction;
        if a != b && b != c && c != a {
            if direction > 0 {
                indices.extend_from_slice(&[a, b, c]);
            } else {
                indices.extend_from_slice(&[a, c, b]);
            }
        }
        a = b;
        b = c;
    }

    Ok(indices)
}

pub(crate) struct StaticVertices {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
}

/// Unskinned vertex layout: position, normal, 12 unused bytes, UV.
pub(crate) fn decode_static_vertices(
    cur: &mut ByteCursor<'_>,
    vertex_count: usize,
) -> Result<StaticVertices, Error> {
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    for _ in 0..vertex_count {
        positions.push(cur.read_vec3()?);
        normals.push(cur.read_vec3()?);
        cur.skip(12)?;
        uvs.push(cur.read_vec2()?);
    }

    Ok(StaticVertices {
        positions,
        normals,
        uvs,
    })
}

pub(crate) struct SkinnedVertices {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub weights: Vec<VertexWeights>,
}

/// Skinned vertex layout: position, normal, four weight bytes, four bone
/// selector bytes, UV.
///
/// Each selector byte resolves through `indice_array[(s / 3) % len]`,
/// integer division then modulo. The stride-3 bucketing is a quirk of the
/// source format and is reproduced as-is.
pub(crate) fn decode_skinned_vertices(
    cur: &mut ByteCursor<'_>,
    vertex_count: usize,
    indice_array: &[u32],
) -> Result<SkinnedVertices, Error> {
    if vertex_count > 0 && indice_array.is_empty() {
        return Err(Error::Malformed {
            message: format!(
                "skinned mesh declares {vertex_count} vertices but an empty bone indices array"
            ),
        });
    }

    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);
    let mut weights = Vec::with_capacity(vertex_count);

    for _ in 0..vertex_count {
        positions.push(cur.read_vec3()?);
        normals.push(cur.read_vec3()?);

        let mut vertex_weights = [0.0f32; 4];
        for weight in &mut vertex_weights {
            *weight = cur.read_u8()? as f32 / 255.0;
        }
        let mut bones = [0u32; 4];
        for bone in &mut bones {
            let selector = cur.read_u8()? as usize;
            *bone = indice_array[(selector / 3) % indice_array.len()];
        }

        uvs.push(cur.read_vec2()?);
        weights.push(VertexWeights {
            bones,
            weights: vertex_weights,
        });
    }

    Ok(SkinnedVertices {
        positions,
        normals,
        uvs,
        weights,
    })
}
