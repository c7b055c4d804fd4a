#![forbid(unsafe_code)]

pub mod measurement;
pub mod position;
