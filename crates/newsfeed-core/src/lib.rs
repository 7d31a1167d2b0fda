pub mod config;
#[cfg(feature = "dynamo")]
pub mod dynamo;
pub mod error;
pub mod mapper;
pub mod models;
pub mod newsfeed;
pub mod store;

pub use error::{AppError, Result};
pub use mapper::map_entry;
pub use models::{Article, RawEntry};
pub use newsfeed::NewsFeed;
pub use store::{EntryStore, JsonFileStore, MemoryStore};
