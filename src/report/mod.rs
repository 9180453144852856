//! Scan result rendering

pub mod json;
pub mod text;
