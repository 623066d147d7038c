use glam::{Quat, Vec3};

use crate::Error;
use crate::container::Container;

/// Shared pools of translation vectors and rotation quaternions. Animation
/// channels of a *different* file's clips address these by index, so the
/// library is loaded independently and handed to the animation decoder.
#[derive(Clone, Debug, Default)]
pub struct KeyframeLibrary {
    pub translations: Vec<Vec3>,
    pub rotations: Vec<Quat>,
}

impl KeyframeLibrary {
    /// Parses a companion `.tkl` buffer, which is its own TSFL container.
    pub fn from_tkl_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let container = Container::parse(bytes)?;
        Self::decode(&container)
    }

    /// Pool counts live at 0x10 and pool offsets at 0x28 inside the SECT
    /// payload.
    pub fn decode(container: &Container) -> Result<Self, Error> {
        let mut cur = container.section_cursor();

        cur.seek(0x10)?;
        let translation_count = cur.read_u32()? as usize;
        let rotation_count = cur.read_u32()? as usize;
        cur.seek(0x28)?;
        let translations_offset = cur.read_u32()? as usize;
        let rotations_offset = cur.read_u32()? as usize;

        cur.seek(translations_offset)?;
        let mut translations = Vec::with_capacity(translation_count);
        for _ in 0..translation_count {
            translations.push(cur.read_vec3()?);
        }

        cur.seek(rotations_offset)?;
        let mut rotations = Vec::with_capacity(rotation_count);
        for _ in 0..rotation_count {
            rotations.push(cur.read_quat()?);
        }

        Ok(KeyframeLibrary {
            translations,
            rotations,
        })
    }

    pub fn translation(&self, index: usize) -> Result<Vec3, Error> {
        self.translations
            .get(index)
            .copied()
            .ok_or(Error::KeyframeIndex {
                pool: "translation",
                index,
                len: self.translations.len(),
            })
    }

    pub fn rotation(&self, index: usize) -> Result<Quat, Error> {
        self.rotations
            .get(index)
            .copied()
            .ok_or(Error::KeyframeIndex {
                pool: "rotation",
                index,
                len: self.rotations.len(),
            })
    }
}
