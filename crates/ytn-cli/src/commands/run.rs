use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use ytn_application::{ActivityIndicator, BroadcastChannel, IndicatorState, ObserverHandle};

use crate::bootstrap::App;

const ACKNOWLEDGE_GRACE: Duration = Duration::from_secs(1);

pub async fn execute(app: App) -> Result<()> {
    let channel = app.attach_broadcast()?;

    let indicator = Arc::new(ActivityIndicator::new());
    let mut indicator_rx = indicator.subscribe();
    let observer = channel.spawn_observer(indicator.clone());
    let follower = tokio::spawn(async move {
        while indicator_rx.changed().await.is_ok() {
            let state = *indicator_rx.borrow_and_update();
            if state == IndicatorState::Active {
                tracing::info!("[Indicator] Unread notifications");
            }
        }
    });

    let poller = app.poller().spawn();
    tracing::info!("[Run] Polling, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    tracing::info!("[Run] Shutting down");

    poller.stop();
    poller.join().await?;

    clear_and_stop(&channel, &indicator, observer).await;
    follower.abort();

    Ok(())
}

/// Sends `cleared` and waits for the indicator to take it before the
/// observer loop is cancelled.
async fn clear_and_stop(
    channel: &BroadcastChannel,
    indicator: &ActivityIndicator,
    observer: ObserverHandle,
) {
    match channel.acknowledge() {
        Ok(_) => {
            let mut state = indicator.subscribe();
            let timed_out = tokio::time::timeout(
                ACKNOWLEDGE_GRACE,
                state.wait_for(|s| *s == IndicatorState::Idle),
            )
            .await
            .is_err();
            if timed_out {
                tracing::warn!("[Run] Indicator did not clear before shutdown");
            }
        }
        Err(e) => tracing::debug!("[Run] Acknowledge not delivered: {}", e),
    }

    observer.stop();
    observer.join().await;
}
