//! uxf-gen - Writer for UXF documents.
//!
//! Serializes a [`Uxf`](uxf_model::Uxf) document back to UXF text. Layout
//! follows short-value heuristics: small lists of short scalars go on one
//! line, maps and tables with at most one entry may stay on one line, and
//! everything else is written one element per line at a configurable
//! indent.

pub mod writer;

pub use writer::{write_document, write_document_with, WriteOptions};
