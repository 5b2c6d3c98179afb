use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::registry::{SessionHandle, SessionRegistry};

/// Spawn the task that feeds wall-clock time into a session.
///
/// Each tick advances the session clock by the real time elapsed since the
/// previous tick and publishes the resulting events. The task exits once the
/// session has torn down, removing it from the registry.
pub(crate) fn spawn(
    registry: Arc<SessionRegistry>,
    handle: SessionHandle,
    tick: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last = Instant::now();

        loop {
            interval.tick().await;
            let now = Instant::now();
            let delta = now - last;
            last = now;

            let closed = handle
                .with_session(|s| {
                    s.advance_clock(delta);
                    s.is_torn_down()
                })
                .await;

            if closed {
                registry.forget(handle.id).await;
                break;
            }
        }
        tracing::debug!(session_id = %handle.id, "driver stopped");
    })
}
