use anyhow::{Result, bail};
use ytn_core::config::TrackerCredentials;

use crate::bootstrap::App;

pub async fn execute(app: &App, token: &str, host: &str) -> Result<()> {
    let credentials = TrackerCredentials::new(token.trim(), host);
    if credentials.api_token.is_empty() || credentials.tracker_host.is_empty() {
        bail!("Both --token and --host must be non-empty");
    }

    credentials.save(app.durable.as_ref()).await?;
    println!(
        "Saved credentials for {} to {}",
        credentials.tracker_host,
        app.durable.path().display()
    );
    Ok(())
}
