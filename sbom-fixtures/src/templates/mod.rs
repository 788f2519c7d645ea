//! Fixture file contents, one module per tool
//!
//! Each module exposes its file contents as constants plus a `generate`
//! function returning them in a fixed order. Manifest first, then any
//! auxiliary requirement or lock files, then sources.

pub mod pdm;
pub mod pip;
pub mod pip_tools;
pub mod pipenv;
pub mod poetry;
pub mod uv;
