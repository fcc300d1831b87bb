//! # mt940-tags
//!
//! A parser for individual MT940 bank-statement tags.
//!
//! An MT940 message is a sequence of tags, each introduced by a numeric or
//! alphabetic identifier (`:20:`, `:61:`, `:NS:`, ...) followed by free-form
//! content. This crate covers the per-tag step only: given an identifier, an
//! optional sub-identifier, and the raw content after the identifier, it
//! produces a [`ParsedTag`] whose named fields carry the typed content
//! (dates, signed amounts, currency codes, references, narrative text,
//! nested message blocks).
//!
//! Splitting a raw message into tag chunks and assembling tags into
//! statements is the caller's job; see [`TagRegistry`] for the entry point
//! the outer parser uses.

pub mod helpers;
pub mod tags;

pub use tags::fields::{FieldValue, Fields, ParsedTag};
pub use tags::grammar::{TagDefinition, TagKind};
pub use tags::registry::TagRegistry;
pub use tags::TagError;
