//! Fixed-period ticker task driving the speed integrator.

use contracts::{ControlSignal, Gear};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::SpeedIntegrator;

/// Speed published after each tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeedSample {
    pub speed: f32,
    pub tick: u64,
}

/// Spawned ticker; the only writer of the speed value
///
/// `stop` returns after the task has exited, so no tick can land after
/// it. Dropping the ticker aborts the task.
pub struct SpeedTicker {
    speed_rx: watch::Receiver<SpeedSample>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<SpeedSample>>,
}

impl SpeedTicker {
    /// Start ticking every `tick_ms`, reading the gear from `control_rx`
    pub fn spawn(integrator: SpeedIntegrator, control_rx: watch::Receiver<ControlSignal>) -> Self {
        let initial = SpeedSample {
            speed: integrator.speed(),
            tick: integrator.ticks(),
        };
        let (speed_tx, speed_rx) = watch::channel(initial);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run(integrator, control_rx, speed_tx, shutdown_rx));

        Self {
            speed_rx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SpeedSample> {
        self.speed_rx.clone()
    }

    /// Latest published speed
    pub fn speed(&self) -> f32 {
        self.speed_rx.borrow().speed
    }

    /// Stop the timer and wait for the task, returning the final sample
    pub async fn stop(mut self) -> SpeedSample {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let last = *self.speed_rx.borrow();
        match self.task.take() {
            Some(task) => task.await.unwrap_or_else(|e| {
                warn!(error = %e, "speed ticker task failed");
                last
            }),
            None => last,
        }
    }
}

impl Drop for SpeedTicker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[instrument(name = "speed_ticker", skip_all, fields(tick_ms = integrator.config().tick_ms))]
async fn run(
    mut integrator: SpeedIntegrator,
    control_rx: watch::Receiver<ControlSignal>,
    speed_tx: watch::Sender<SpeedSample>,
    mut shutdown: oneshot::Receiver<()>,
) -> SpeedSample {
    let period = integrator.config().tick_interval();
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("speed ticker started");
    let mut last_gear = Gear::Idle;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = interval.tick() => {
                let gear = control_rx.borrow().gear;
                if gear != last_gear {
                    debug!(from = %last_gear, to = %gear, speed = integrator.speed(), "gear change");
                    last_gear = gear;
                }
                let speed = integrator.tick(gear);
                speed_tx.send_replace(SpeedSample {
                    speed,
                    tick: integrator.ticks(),
                });
                metrics::gauge!("drivetrain_speed").set(speed as f64);
                metrics::counter!("drivetrain_ticks_total", "gear" => gear.as_str()).increment(1);
            }
        }
    }

    let last = SpeedSample {
        speed: integrator.speed(),
        tick: integrator.ticks(),
    };
    info!(speed = last.speed, ticks = last.tick, "speed ticker stopped");
    last
}
