//! Remote tracker integrations.

pub mod youtrack_client;

pub use youtrack_client::YouTrackClient;
