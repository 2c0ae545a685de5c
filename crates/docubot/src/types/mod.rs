//! Core data types

pub mod document;
pub mod query;
pub mod record;
pub mod response;

pub use document::{ExtractedText, Format, ImageNote, Segment, SourceDocument};
pub use record::{RecordMetadata, SearchMatch, VectorRecord};
