use anyhow::{Result, bail};
use ytn_application::CycleOutcome;

use crate::bootstrap::App;

/// One cycle against the tracker. The session store dies with the process,
/// so every notification currently listed is alerted again.
pub async fn execute(app: App) -> Result<()> {
    let mut poller = app.poller();
    let report = poller.run_cycle().await;

    match report.outcome {
        CycleOutcome::Disabled(e) => {
            bail!("{}; run `ytn configure --token <token> --host <host>`", e)
        }
        CycleOutcome::FetchFailed(e) | CycleOutcome::StoreFailed(e) => Err(e.into()),
        CycleOutcome::Processed(batch) => {
            println!(
                "{} alerted, {} already seen, {} failed ({:?})",
                batch.alerted, batch.already_seen, batch.failed, report.elapsed
            );
            Ok(())
        }
    }
}
