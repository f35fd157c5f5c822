//! Building blocks shared by several parts of the configuration.

pub mod image_repository;
pub mod resources;
