use byteorder::{ByteOrder, LittleEndian};
use glam::{Mat4, Quat, Vec2, Vec3};

use crate::Error;

/// Bounds-checked little-endian reader over an in-memory buffer.
#[derive(Clone, Debug)]
pub(crate) struct ByteCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn seek(&mut self, pos: usize) -> Result<(), Error> {
        if pos > self.bytes.len() {
            return Err(Error::Malformed {
                message: format!(
                    "seek to offset {pos} past the end of a {}-byte buffer",
                    self.bytes.len()
                ),
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub(crate) fn skip(&mut self, count: usize) -> Result<(), Error> {
        let pos = self.pos.checked_add(count).ok_or_else(|| Error::Malformed {
            message: format!("skip of {count} bytes from offset {} overflows", self.pos),
        })?;
        self.seek(pos)
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], Error> {
        let bytes = self.bytes;
        let end = self
            .pos
            .checked_add(count)
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| Error::Malformed {
                message: format!(
                    "unexpected end of data at offset {} (wanted {count} bytes of {})",
                    self.pos,
                    bytes.len()
                ),
            })?;
        let slice = &bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], Error> {
        self.take(count)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub(crate) fn read_i16(&mut self) -> Result<i16, Error> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub(crate) fn read_f32(&mut self) -> Result<f32, Error> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub(crate) fn read_fourcc(&mut self) -> Result<[u8; 4], Error> {
        let bytes = self.take(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    pub(crate) fn read_vec2(&mut self) -> Result<Vec2, Error> {
        Ok(Vec2::new(self.read_f32()?, self.read_f32()?))
    }

    pub(crate) fn read_vec3(&mut self) -> Result<Vec3, Error> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    pub(crate) fn read_quat(&mut self) -> Result<Quat, Error> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        let z = self.read_f32()?;
        let w = self.read_f32()?;
        Ok(Quat::from_xyzw(x, y, z, w))
    }

    /// Reads 16 floats as a transform. The file stores the rows of a
    /// row-vector matrix; loading them as columns yields the equivalent
    /// column-vector transform, translation in the w axis.
    pub(crate) fn read_mat4(&mut self) -> Result<Mat4, Error> {
        let mut elements = [0.0f32; 16];
        for element in &mut elements {
            *element = self.read_f32()?;
        }
        Ok(Mat4::from_cols_array(&elements))
    }

    /// Reads `count` bytes as a UTF-8 string.
    pub(crate) fn read_str(&mut self, count: usize) -> Result<String, Error> {
        let offset = self.pos;
        let bytes = self.take(count)?;
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(e) => Err(Error::Malformed {
                message: format!("invalid utf-8 in {count}-byte string at offset {offset}: {e}"),
            }),
        }
    }

    /// Reads a NUL-terminated string, leaving the cursor past the terminator.
    pub(crate) fn read_cstr(&mut self) -> Result<String, Error> {
        let offset = self.pos;
        let terminator = self.bytes[self.pos..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Error::Malformed {
                message: format!("unterminated string at offset {offset}"),
            })?;
        let s = self.read_str(terminator)?;
        self.pos += 1;
        Ok(s)
    }

    /// Reads a NUL-terminated string at `offset` without moving the cursor.
    pub(crate) fn read_cstr_at(&mut self, offset: usize) -> Result<String, Error> {
        let resume = self.pos;
        self.seek(offset)?;
        let result = self.read_cstr();
        self.pos = resume;
        result
    }
}
