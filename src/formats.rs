//! Output formats for parsed lines
//!
//! Only the canonical JSON rendering exists today; it is what the topology
//! pipeline consumes.

pub mod json;
