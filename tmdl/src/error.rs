use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The buffer does not open with the tag the decoder expected. This is
    /// "not this format", used for type probing, not a corrupt file.
    #[error("expected {expected} tag, found {found:?}")]
    TagMismatch { expected: &'static str, found: String },

    /// The SECT payload carries the `BTEC` marker: a recognized container
    /// whose section data is encoded. Decoding stops, nothing is produced.
    #[error("section payload is BTEC-encoded; encoded sections are not supported")]
    EncodedSection,

    #[error("malformed container data: {message}")]
    Malformed { message: String },

    /// An animation channel dereferenced a keyframe-library pool out of
    /// range, usually a sign the wrong `.tkl` companion was supplied.
    #[error("{pool} index {index} out of range for keyframe library pool of {len}")]
    KeyframeIndex {
        pool: &'static str,
        index: usize,
        len: usize,
    },
}
