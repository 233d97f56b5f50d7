pub mod client;
pub mod error;
pub mod model;
pub mod schema;

pub use client::NotionClient;
