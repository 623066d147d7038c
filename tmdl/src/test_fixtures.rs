//! Hand-built little-endian buffers shared by the decoder tests.

/// Append-only buffer writer with explicit padding, mirroring how the
/// format addresses everything by absolute section offset.
pub(crate) struct SectionWriter {
    bytes: Vec<u8>,
}

impl SectionWriter {
    pub(crate) fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub(crate) fn position(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn put_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub(crate) fn put_u16(&mut self, value: u16) {
        self.bytes.extend(value.to_le_bytes());
    }

    pub(crate) fn put_i16(&mut self, value: i16) {
        self.bytes.extend(value.to_le_bytes());
    }

    pub(crate) fn put_u32(&mut self, value: u32) {
        self.bytes.extend(value.to_le_bytes());
    }

    pub(crate) fn put_f32(&mut self, value: f32) {
        self.bytes.extend(value.to_le_bytes());
    }

    pub(crate) fn put_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend(bytes);
    }

    pub(crate) fn put_cstr(&mut self, s: &str) {
        self.bytes.extend(s.as_bytes());
        self.bytes.push(0);
    }

    /// Zero-fills up to `offset`; panics if the writer is already past it.
    pub(crate) fn pad_to(&mut self, offset: usize) {
        assert!(
            self.bytes.len() <= offset,
            "writer at {} is already past pad target {offset}",
            self.bytes.len()
        );
        self.bytes.resize(offset, 0);
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

fn tag(name: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend(name);
    out.extend((payload.len() as u32).to_le_bytes());
    out.extend(payload);
    out
}

/// Wraps a section payload and symbol list into a complete TSFL buffer.
pub(crate) fn wrap_container(section: &[u8], symbols: &[(&str, u32)]) -> Vec<u8> {
    wrap_container_with_relocations(section, symbols, &[])
}

pub(crate) fn wrap_container_with_relocations(
    section: &[u8],
    symbols: &[(&str, u32)],
    relocations: &[(u16, u16, u32)],
) -> Vec<u8> {
    let mut symb = Vec::new();
    symb.extend((symbols.len() as u32).to_le_bytes());
    let mut names = Vec::new();
    for (i, (name, offset)) in symbols.iter().enumerate() {
        symb.extend((i as i16).to_le_bytes());
        symb.extend((names.len() as u32).to_le_bytes());
        symb.extend((i as i16).to_le_bytes());
        symb.extend(offset.to_le_bytes());
        names.extend(name.as_bytes());
        names.push(0);
    }
    symb.extend(names);

    let mut relc = Vec::new();
    relc.extend((relocations.len() as u32).to_le_bytes());
    for (a, b, c) in relocations {
        relc.extend(a.to_le_bytes());
        relc.extend(b.to_le_bytes());
        relc.extend(c.to_le_bytes());
    }

    let mut body = Vec::new();
    body.extend(b"TMDL");
    body.extend(tag(b"HDRX", &[]));
    body.extend(tag(b"SECT", section));
    body.extend(tag(b"RELC", &relc));
    body.extend(tag(b"SYMB", &symb));

    let mut out = Vec::new();
    out.extend(b"TSFL");
    out.extend((body.len() as u32).to_le_bytes());
    out.extend(body);
    out
}

/// Skeleton block header: counts, 0x2E reserved bytes, then the bone and
/// animation table offsets.
pub(crate) fn put_skeleton_header(
    w: &mut SectionWriter,
    node_count: u32,
    animation_count: u16,
    first_bone_offset: u32,
    animation_table_offset: u32,
) {
    w.put_u32(node_count);
    w.put_u16(animation_count);
    w.put_bytes(&[0; 0x2E]);
    w.put_u32(first_bone_offset);
    w.put_u32(animation_table_offset);
}

/// One 0xC0-byte bone record with identity rest/inverse-bind transforms.
pub(crate) fn put_bone(
    w: &mut SectionWriter,
    name: &str,
    parent: i16,
    rotation: [f32; 4],
    fallback_translation: [f32; 3],
) {
    for component in rotation {
        w.put_f32(component);
    }
    for _ in 0..2 {
        put_identity_mat4(w);
    }
    w.put_u8(name.len() as u8);
    w.put_bytes(name.as_bytes());
    w.put_bytes(&vec![0; 31 - name.len()]);
    w.put_i16(parent);
    w.put_u16(0);
    for component in fallback_translation {
        w.put_f32(component);
    }
}

fn put_identity_mat4(w: &mut SectionWriter) {
    for i in 0..16 {
        w.put_f32(if i % 5 == 0 { 1.0 } else { 0.0 });
    }
}

/// One 0x30-byte clip record starting at the writer's current position.
pub(crate) fn put_clip(
    w: &mut SectionWriter,
    name: &str,
    flags: u32,
    channel_count: u32,
    duration: f32,
    channels_offset: u32,
) {
    let clip_offset = w.position();
    w.put_u8(name.len() as u8);
    w.put_bytes(name.as_bytes());
    w.pad_to(clip_offset + 0x20);
    w.put_u32(flags);
    w.put_u32(channel_count);
    w.put_f32(duration);
    w.put_u32(channels_offset);
}

/// One 8-byte channel record; mode and key width pack into the flags word.
pub(crate) fn put_channel(
    w: &mut SectionWriter,
    mode: u8,
    key_width: u8,
    key_count: u16,
    keys_offset: u32,
) {
    w.put_u16(mode as u16 | (key_width as u16) << 8);
    w.put_u16(key_count);
    w.put_u32(keys_offset);
}

pub(crate) fn assert_approx(actual: f32, expected: f32, eps: f32, ctx: &str) {
    assert!(
        (actual - expected).abs() <= eps,
        "{ctx}: expected {expected}, got {actual} (diff {})",
        (actual - expected).abs()
    );
}
