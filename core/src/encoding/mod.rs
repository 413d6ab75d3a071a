//! # Byte-Level Encoding
//!
//! The small set of byte writers every wire format in this crate is made of:
//! fixed-width integers, Bitcoin-style compact size, and script data pushes.
//!
//! These are deliberately free functions appending to a `Vec<u8>`. The
//! builders assemble preimages and raw transactions field by field, in the
//! exact order consensus dictates, and a writer that hides the buffer would
//! only make that order harder to audit.

pub mod bytes;

pub use bytes::{
    push_data, reversed, write_compact_size, write_u32_be, write_u32_le, write_u64_le,
    write_var_bytes,
};
