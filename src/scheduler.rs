use crate::router::{Invocation, ModeRouter};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

/// Submits a timer tick to the router every `every`, starting immediately.
/// A tick that overruns delays the next one instead of bursting.
pub fn start(router: Arc<ModeRouter>, every: Duration) -> JoinHandle<()> {
    info!(?every, "starting availability scheduler");

    tokio::spawn(async move {
        let mut ticks = interval(every);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticks.tick().await;
            let reply = router.dispatch(Invocation::TimerTick).await;
            if reply.status.is_success() {
                info!(body = %reply.body, "scheduled check finished");
            } else {
                error!(status = reply.status.as_u16(), body = %reply.body, "scheduled check failed");
            }
        }
    })
}
