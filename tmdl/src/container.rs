use log::debug;

use crate::Error;
use crate::cursor::ByteCursor;

const TAG_TSFL: &[u8; 4] = b"TSFL";
const TAG_HDRX: &[u8; 4] = b"HDRX";
const TAG_SECT: &[u8; 4] = b"SECT";
const TAG_RELC: &[u8; 4] = b"RELC";
const TAG_SYMB: &[u8; 4] = b"SYMB";

/// Marker at the start of an encoded SECT payload.
const MARKER_ENCODED: &[u8; 4] = b"BTEC";

/// Bytes per symbol entry ahead of the out-of-line name table.
const SYMBOL_ENTRY_SIZE: usize = 12;

/// A 4-byte tag name plus declared payload size. `payload` is the buffer
/// offset immediately after the header; all reads against the tag are bounded
/// by `payload + size`.
#[derive(Clone, Copy, Debug)]
pub struct Tag {
    pub name: [u8; 4],
    pub size: u32,
    pub payload: usize,
}

impl Tag {
    fn read(cur: &mut ByteCursor<'_>) -> Result<Self, Error> {
        let name = cur.read_fourcc()?;
        let size = cur.read_u32()?;
        Ok(Tag {
            name,
            size,
            payload: cur.position(),
        })
    }

    pub fn is(&self, name: &[u8; 4]) -> bool {
        &self.name == name
    }

    fn expect(
        cur: &mut ByteCursor<'_>,
        name: &[u8; 4],
        expected: &'static str,
    ) -> Result<Self, Error> {
        let tag = Tag::read(cur)?;
        if !tag.is(name) {
            return Err(Error::TagMismatch {
                expected,
                found: String::from_utf8_lossy(&tag.name).into_owned(),
            });
        }
        Ok(tag)
    }
}

/// A named entry of the SYMB table, resolvable to a byte offset inside the
/// SECT payload.
#[derive(Clone, Debug)]
pub struct SymbolEntry {
    pub id: i16,
    pub name: String,
    pub name_id: i16,
    pub offset: u32,
}

#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
}

impl SymbolTable {
    fn parse(cur: &mut ByteCursor<'_>) -> Result<Self, Error> {
        let count = cur.read_u32()? as usize;
        let names_base = cur.position() + SYMBOL_ENTRY_SIZE * count;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let id = cur.read_i16()?;
            // The name offset sits between `id` and `name_id` on the wire.
            let name_offset = cur.read_u32()? as usize;
            let name_id = cur.read_i16()?;
            let offset = cur.read_u32()?;
            let name = cur.read_cstr_at(names_base + name_offset)?;
            entries.push(SymbolEntry {
                id,
                name,
                name_id,
                offset,
            });
        }
        Ok(SymbolTable { entries })
    }

    /// First entry whose name matches exactly; `None` is a valid "not
    /// present" result that drives model-shape branching, not an error.
    pub fn find(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parsed outer TSFL container: the owned SECT payload plus the tables that
/// address into it. Symbol offsets are relative to the start of `section`.
#[derive(Clone, Debug)]
pub struct Container {
    pub type_code: [u8; 4],
    pub section: Vec<u8>,
    /// RELC relocation triples, carried but not interpreted by the decode
    /// path.
    pub relocations: Vec<(u16, u16, u32)>,
    pub symbols: SymbolTable,
}

impl Container {
    /// Walks the fixed TSFL → type code → HDRX → SECT → RELC → SYMB layout.
    ///
    /// A wrong leading tag yields [`Error::TagMismatch`] (type probing); a
    /// `BTEC`-encoded section yields [`Error::EncodedSection`]. Either way
    /// decoding halts with nothing produced.
    pub fn parse(bytes: &[u8]) -> Result<Self, Error> {
        let mut cur = ByteCursor::new(bytes);

        Tag::expect(&mut cur, TAG_TSFL, "TSFL")?;
        let type_code = cur.read_fourcc()?;

        let hdrx = Tag::expect(&mut cur, TAG_HDRX, "HDRX")?;
        cur.skip(hdrx.size as usize)?;

        let sect = Tag::expect(&mut cur, TAG_SECT, "SECT")?;
        let section = cur.read_bytes(sect.size as usize)?;
        if section.len() >= 4 && &section[..4] == MARKER_ENCODED {
            return Err(Error::EncodedSection);
        }
        let section = section.to_vec();

        Tag::expect(&mut cur, TAG_RELC, "RELC")?;
        let relocation_count = cur.read_u32()? as usize;
        let mut relocations = Vec::with_capacity(relocation_count);
        for _ in 0..relocation_count {
            relocations.push((cur.read_u16()?, cur.read_u16()?, cur.read_u32()?));
        }

        Tag::expect(&mut cur, TAG_SYMB, "SYMB")?;
        let symbols = SymbolTable::parse(&mut cur)?;

        debug!(
            "parsed TSFL container: {} symbols, {} relocations, {}-byte section",
            symbols.len(),
            relocations.len(),
            section.len()
        );

        Ok(Container {
            type_code,
            section,
            relocations,
            symbols,
        })
    }

    pub(crate) fn section_cursor(&self) -> ByteCursor<'_> {
        ByteCursor::new(&self.section)
    }
}
