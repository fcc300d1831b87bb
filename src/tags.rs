//! MT940 tag parsing
//!
//! This module is the tag-dispatch core: a [`registry::TagRegistry`] maps
//! tag identifiers to [`grammar::TagDefinition`]s, each definition applies
//! one anchored pattern to the raw content and builds the kind's fixed field
//! set, and [`fields::ParsedTag`] is the typed record handed back to the
//! caller.
//!
//! The submodules split along those lines:
//! - `fields` - the output data model (`FieldValue`, `ParsedTag`)
//! - `grammar` - the closed kind set, patterns, and extraction rules
//! - `registry` - identifier resolution and the `create_tag` entry point

use std::fmt;

pub mod fields;
pub mod grammar;
pub mod registry;

pub use fields::{FieldValue, Fields, ParsedTag};
pub use grammar::{TagDefinition, TagKind};
pub use registry::TagRegistry;

use crate::helpers::NormalizeError;

/// Errors raised while constructing a single tag
///
/// An unknown tag identifier is not an error; `resolve`/`create_tag` report
/// it as `None` and leave the significance to the caller. These variants
/// cover the fatal case: a recognized kind whose content cannot be turned
/// into its field set. No partial record is ever produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TagError {
    /// Content did not match the resolved kind's pattern
    Unparsable { id: String, content: String },
    /// A captured group could not be normalized into a typed value
    Normalize(NormalizeError),
}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagError::Unparsable { id, content } => {
                write!(f, "Cannot parse tag {}: {}", id, content)
            }
            TagError::Normalize(err) => write!(f, "Cannot normalize tag field: {}", err),
        }
    }
}

impl std::error::Error for TagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TagError::Unparsable { .. } => None,
            TagError::Normalize(err) => Some(err),
        }
    }
}

impl From<NormalizeError> for TagError {
    fn from(err: NormalizeError) -> Self {
        TagError::Normalize(err)
    }
}
