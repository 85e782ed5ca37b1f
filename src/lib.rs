pub mod text;
pub mod entity;
pub mod graph;
pub mod visual;
pub mod table;
pub mod pipeline;
pub mod config;
pub mod error;

pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
