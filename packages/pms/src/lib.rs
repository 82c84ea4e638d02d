// ABOUTME: Upstream PMS integration for NAPE
// ABOUTME: REST client, snapshot mapping, and the mock fallback store

pub mod client;
pub mod error;
pub mod mapper;
pub mod mock;
pub mod source;
pub mod wire;

pub use client::PmsClient;
pub use error::PmsError;
pub use mock::{mock_projects, mock_snapshot, DEFAULT_MOCK_PROJECT_ID};
pub use source::{FallbackPms, LivePms, MockPms, SnapshotSource};
