//! Expose mdxprep's command layer for integration tests. The supported
//! library surface is `mdxprep-core`.
pub mod cli;
pub mod commands;
