use async_trait::async_trait;

use crate::error::Result;

/// Navigation collaborator that opens a URL for the user (e.g. a browser tab).
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn open(&self, url: &str) -> Result<()>;
}
