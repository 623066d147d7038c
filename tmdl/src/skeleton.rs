use crate::Error;
use crate::cursor::ByteCursor;
use crate::model::{Bone, Skeleton};

/// Bytes per bone record.
const BONE_STRIDE: usize = 0xC0;

/// Bone names occupy a fixed-size field: one length byte plus 31 name bytes.
const BONE_NAME_FIELD: usize = 31;

/// Decodes the skeleton block at the cursor: a header, then `node_count`
/// bone records at fixed stride from `first_bone_offset`.
///
/// Each record carries the bone's fallback rotation, rest transform,
/// inverse-bind transform, name, parent index, and fallback translation.
/// The animation table location is retained for the animation decoder.
pub(crate) fn decode_skeleton(cur: &mut ByteCursor<'_>) -> Result<Skeleton, Error> {
    let node_count = cur.read_u32()? as usize;
    let animation_count = cur.read_u16()?;
    cur.skip(0x2E)?;
    let first_bone_offset = cur.read_u32()? as usize;
    let animation_table_offset = cur.read_u32()?;

    let mut bones = Vec::with_capacity(node_count);
    let mut fallback_rotations = Vec::with_capacity(node_count);
    let mut fallback_translations = Vec::with_capacity(node_count);

    for index in 0..node_count {
        cur.seek(first_bone_offset + BONE_STRIDE * index)?;

        let rotation = cur.read_quat()?;
        let local_transform = cur.read_mat4()?;
        let inverse_bind = cur.read_mat4()?;

        let name_len = cur.read_u8()? as usize;
        let padding = BONE_NAME_FIELD
            .checked_sub(name_len)
            .ok_or_else(|| Error::Malformed {
                message: format!(
                    "bone {index} name length {name_len} exceeds the {BONE_NAME_FIELD}-byte name field"
                ),
            })?;
        let name = cur.read_str(name_len)?;
        cur.skip(padding)?;

        let parent = cur.read_i16()?;
        let _ = cur.read_u16()?;
        let fallback_translation = cur.read_vec3()?;

        fallback_rotations.push(rotation);
        fallback_translations.push(fallback_translation);
        bones.push(Bone {
            index,
            name,
            parent: (parent >= 0).then_some(parent as usize),
            local_transform,
            inverse_bind,
        });
    }

    Ok(Skeleton {
        bones,
        fallback_rotations,
        fallback_translations,
        animation_count,
        animation_table_offset,
    })
}
