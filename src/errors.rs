//! Error types for record decoding and region queries.

use thiserror::Error;

/// Result type alias for htsview operations.
pub type Result<T> = std::result::Result<T, HtsViewError>;

/// Error type for htsview operations.
///
/// Decode failures are always surfaced to the caller; a truncated or
/// malformed buffer never yields a partial result. Collaborator-level
/// failures (cannot open a file, missing index, read errors) travel through
/// the [`HtsViewError::Io`] variant unclassified.
#[derive(Error, Debug)]
pub enum HtsViewError {
    /// A packed CIGAR word carries an opcode outside the `MIDNSHP=XB` alphabet.
    #[error("invalid CIGAR opcode {opcode} in operation {index}")]
    MalformedCigar {
        /// The out-of-range opcode index (low nibble of the packed word)
        opcode: u32,
        /// Position of the offending operation in the sequence
        index: usize,
    },

    /// A CIGAR operation length does not fit the 28-bit packed field.
    #[error("CIGAR operation length {length} exceeds the 28-bit packed range")]
    LengthOverflow {
        /// The overlong operation length
        length: u32,
    },

    /// A record buffer ended before a declared payload was complete.
    #[error("record truncated at byte {offset}: {expected} more byte(s) expected")]
    TruncatedRecord {
        /// Byte offset at which the shortfall was detected
        offset: usize,
        /// Number of bytes the current entry still required
        expected: usize,
    },

    /// A record's CIGAR covers a different number of query bases than the
    /// record declares for its sequence.
    #[error("CIGAR covers {cigar_bases} query base(s) but the record declares {seq_bases}")]
    CigarSequenceMismatch {
        /// Query bases consumed by the CIGAR
        cigar_bases: usize,
        /// Declared sequence length
        seq_bases: usize,
    },

    /// An auxiliary tag declares a type byte the decoder does not recognize.
    #[error("unrecognized auxiliary tag type '{}' (0x{type_byte:02x}) at byte {offset}", char::from(*type_byte))]
    MalformedAuxType {
        /// The unrecognized type byte
        type_byte: u8,
        /// Byte offset of the type byte within the aux block
        offset: usize,
    },

    /// A tag value was supplied with a type byte outside the supported alphabet.
    #[error("unsupported auxiliary tag type '{}' (0x{type_byte:02x})", char::from(*type_byte))]
    UnsupportedTagType {
        /// The unsupported type byte
        type_byte: u8,
    },

    /// A region string does not match `NAME` or `NAME:START-END`.
    #[error("malformed region '{region}': {reason}")]
    RegionSyntax {
        /// The region string as supplied by the caller
        region: String,
        /// Why it was rejected
        reason: String,
    },

    /// A region query was advanced after being closed.
    #[error("region query advanced after close")]
    IteratorClosed,

    /// A genotype array length is not an even multiple of the sample count.
    #[error("genotype array of length {length} does not divide evenly over {samples} sample(s)")]
    SampleCountMismatch {
        /// Length of the packed allele-index array
        length: usize,
        /// Number of samples the caller declared
        samples: usize,
    },

    /// A feature-line column expected to hold a coordinate is not an integer.
    #[error("coordinate column {column} holds non-numeric value '{value}'")]
    MalformedCoordinate {
        /// The 0-based column index
        column: usize,
        /// The offending field text
        value: String,
    },

    /// An opaque failure from the external format engine.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
