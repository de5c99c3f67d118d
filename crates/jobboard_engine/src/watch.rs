use std::time::Duration;

use board_logging::board_debug;
use jobboard_core::WatchPlan;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// Every scheduled poll was emitted.
    Exhausted,
    Cancelled,
}

/// Emits `WatchWaitElapsed` after the initial wait, then at most
/// `plan.max_polls` `WatchPollDue` events spaced by `plan.interval`.
///
/// Returns as soon as `cancel` fires; nothing is emitted afterwards.
pub async fn run_watch(
    plan: WatchPlan,
    sink: &dyn EventSink,
    cancel: &CancellationToken,
) -> WatchOutcome {
    if !sleep_unless_cancelled(plan.initial_wait, cancel).await {
        return WatchOutcome::Cancelled;
    }
    sink.emit(EngineEvent::WatchWaitElapsed);

    for poll in 1..=plan.max_polls {
        if !sleep_unless_cancelled(plan.interval, cancel).await {
            return WatchOutcome::Cancelled;
        }
        sink.emit(EngineEvent::WatchPollDue { poll });
    }
    WatchOutcome::Exhausted
}

async fn sleep_unless_cancelled(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => {
            board_debug!("Scrape watch cancelled");
            false
        }
        _ = tokio::time::sleep(duration) => !cancel.is_cancelled(),
    }
}
