//! Workspace for the build script: manifest model and DGN table generator.
pub mod conf;
pub mod domain;
pub mod errors;
pub mod gen_dgns;
pub mod name_helpers;
