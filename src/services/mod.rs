//! External service clients.

pub mod anilist;

pub use anilist::{AniListClient, AniListConfig};
