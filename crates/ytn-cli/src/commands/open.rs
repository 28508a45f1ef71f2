use anyhow::Result;

use crate::bootstrap::App;

pub async fn execute(app: &App, handle: &str) -> Result<()> {
    if app.activation().handle_click(handle).await?.is_none() {
        eprintln!("Nothing to open for {:?}", handle);
    }
    Ok(())
}
