//! Structured random-access views over indexed genomic record formats.
//!
//! The engine side (file handles, BGZF, index lookup) stays behind the
//! [`IndexedSource`] and [`RecordCursor`] traits; this crate supplies the
//! structured layer above it: raw record field access, CIGAR and auxiliary
//! tag codecs, overlap quality reconciliation, region strings, feature-line
//! schemas, FASTA index parsing, and genotype classification.

#![deny(unsafe_code)]

pub mod cigar;
pub mod errors;
pub mod fai;
pub mod feature;
pub mod fields;
pub mod genotype;
pub mod overlap;
pub mod query;
pub mod record;
pub mod region;
pub mod sequence;
pub mod tags;

#[cfg(test)]
pub(crate) mod testutil;

pub use cigar::{CigarOp, Kind};
pub use errors::{HtsViewError, Result};
pub use feature::{Field, TrackColumns};
pub use genotype::GenotypeCall;
pub use overlap::OverlapStats;
pub use query::{IndexedSource, RecordCursor, RecordView, RegionQuery};
pub use record::AlignmentRecord;
pub use region::Region;
pub use tags::{AuxTag, AuxValue};
