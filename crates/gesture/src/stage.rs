//! Gesture stage task: drains the tracking channel and publishes the
//! shared control signal.
//!
//! The stage is the single writer of the signal board; the speed ticker
//! and the frame loop read it through `watch::Receiver`s.

use async_channel::Receiver;
use contracts::{ControlSignal, GestureConfig, HandSet};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::GestureInterpreter;

/// Counters reported when the stage stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureStageSummary {
    pub hand_sets: u64,
    pub signal_changes: u64,
    pub held_frames: u64,
}

pub struct GestureStage {
    interpreter: GestureInterpreter,
    signal_tx: watch::Sender<ControlSignal>,
    summary: GestureStageSummary,
}

impl GestureStage {
    pub fn new(config: GestureConfig) -> Self {
        let (signal_tx, _) = watch::channel(ControlSignal::IDLE);
        Self {
            interpreter: GestureInterpreter::new(config),
            signal_tx,
            summary: GestureStageSummary::default(),
        }
    }

    /// New reader of the control signal board
    pub fn subscribe(&self) -> watch::Receiver<ControlSignal> {
        self.signal_tx.subscribe()
    }

    /// Feed one hand set; returns the signal if it changed
    pub fn process(&mut self, hands: &HandSet) -> Option<ControlSignal> {
        self.summary.hand_sets += 1;
        metrics::counter!("gesture_hand_sets_total").increment(1);

        let held_before = self.interpreter.held_frames();
        let signal = *self.interpreter.apply(hands);
        if self.interpreter.held_frames() > held_before {
            self.summary.held_frames += 1;
            metrics::counter!("gesture_signal_holds_total").increment(1);
            return None;
        }

        let changed = self.signal_tx.send_if_modified(|current| {
            if *current == signal {
                false
            } else {
                *current = signal;
                true
            }
        });

        if changed {
            self.summary.signal_changes += 1;
            metrics::counter!("gesture_signal_changes_total", "gear" => signal.gear.as_str())
                .increment(1);
            debug!(
                gear = %signal.gear,
                direction = %signal.direction,
                steering = format!("{:.1}", signal.steering_angle_deg),
                "control signal updated"
            );
            Some(signal)
        } else {
            None
        }
    }

    pub fn summary(&self) -> GestureStageSummary {
        self.summary
    }

    /// Run on the runtime until the channel closes or the handle stops it
    pub fn spawn(self, rx: Receiver<HandSet>) -> GestureStageHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(rx, shutdown_rx));
        GestureStageHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    #[instrument(name = "gesture_stage", skip_all)]
    async fn run(
        mut self,
        rx: Receiver<HandSet>,
        mut shutdown: oneshot::Receiver<()>,
    ) -> GestureStageSummary {
        info!("gesture stage started");
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                next = rx.recv() => match next {
                    Ok(hands) => {
                        self.process(&hands);
                    }
                    Err(_) => {
                        debug!("tracking channel closed");
                        break;
                    }
                },
            }
        }
        info!(
            hand_sets = self.summary.hand_sets,
            changes = self.summary.signal_changes,
            held = self.summary.held_frames,
            "gesture stage stopped"
        );
        self.summary
    }
}

/// Owner of a spawned gesture stage; dropping it aborts the task
pub struct GestureStageHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<GestureStageSummary>>,
}

impl GestureStageHandle {
    /// Stop the stage and wait for it to exit
    pub async fn stop(mut self) -> GestureStageSummary {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.task.take() {
            Some(task) => match task.await {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(error = %e, "gesture stage task failed");
                    GestureStageSummary::default()
                }
            },
            None => GestureStageSummary::default(),
        }
    }
}

impl Drop for GestureStageHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
