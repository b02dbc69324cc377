//! Errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scene file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// A shard outline needs at least three vertices to enclose anything
    #[error("shard outline has {vertices} vertices, at least 3 are required")]
    DegenerateShard { vertices: usize },

    #[error("no light with index {index} (scene has {count})")]
    NoSuchLight { index: usize, count: usize },
}
