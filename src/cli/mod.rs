//! Command-line reporting

pub mod output;
