//! Forge release API: repository ids, release records and the catalog client.

mod client;
mod repo;
mod types;

pub use client::{Forge, ReleaseSource};
pub use repo::ForgeRepo;
pub use types::{Asset, Release};

#[cfg(test)]
pub use client::MockReleaseSource;
