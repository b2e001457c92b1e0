//! Live adapters backed by real external tools.

pub mod convert;
