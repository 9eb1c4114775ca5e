//! Post-generation scoring of output text.

pub mod sentiment;
pub mod similarity;
