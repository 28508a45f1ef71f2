//! Terminal stand-ins for the desktop alert center and browser.

use async_trait::async_trait;
use ytn_core::alert::{AlertContent, AlertSink};
use ytn_core::error::Result;
use ytn_core::navigation::Navigator;

/// Writes alerts to the log. The handle is printed so `ytn open` can act on it.
pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn create(&self, handle: &str, alert: &AlertContent) -> Result<()> {
        tracing::info!(
            handle = %handle,
            icon = %alert.icon_ref,
            "[Alert] {}: {}",
            alert.title,
            alert.message.trim()
        );
        Ok(())
    }
}

/// Prints the URL instead of opening a browser tab.
pub struct LogNavigator;

#[async_trait]
impl Navigator for LogNavigator {
    async fn open(&self, url: &str) -> Result<()> {
        println!("{}", url);
        Ok(())
    }
}
