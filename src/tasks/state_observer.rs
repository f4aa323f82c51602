//! Timer event observer background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::state::{AppState, TimerEvent};

/// Background task that logs every timer transition until the session ends
pub async fn state_observer_task(state: Arc<AppState>) {
    info!("Starting timer observer task");

    let mut events = state.controller.events();

    loop {
        match events.recv().await {
            Ok(TimerEvent::Tick { remaining_ms, progress }) => {
                debug!("Observed tick: {}ms remaining, progress {:.3}", remaining_ms, progress);
            }
            Ok(TimerEvent::Finished) => {
                info!("Observed countdown completion");
            }
            Ok(event) => {
                debug!("Observed timer event: {:?}", event);
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Timer observer lagged, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Timer event channel closed, stopping observer");
                break;
            }
        }
    }
}
