//! # Wire Input Validation
//!
//! Two families of checks guard the codec:
//!
//! - **Bounds**: chunk offsets and lengths against the declared message size
//! - **Identifiers**: character classes and reserved namespaces for frame fields

pub mod bounds;
pub mod identifiers;

pub use bounds::{check_chunk_bounds, safe_slice_mut, validate_message_size};
pub use identifiers::{
    is_destination_char, is_letter_or_number, is_source_char, validate_destination,
    validate_source,
};
