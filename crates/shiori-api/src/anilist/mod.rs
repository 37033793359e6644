pub mod client;
pub mod error;
pub mod types;

pub use client::{AniListClient, ClientConfig};
pub use error::AniListError;
