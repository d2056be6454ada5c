//! Session orchestrator - wires intake, gesture, drivetrain, vehicle and HUD.
//!
//! Task layout:
//! - tracker thread(s) push hand sets into the intake channel
//! - gesture stage task publishes the control signal (watch)
//! - speed ticker task publishes the speed (watch)
//! - this task runs the frame loop and feeds the HUD dispatcher
//!
//! Teardown runs in reverse dependency order: tracking, gesture, ticker,
//! then the HUD sinks are drained.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use contracts::{DriveInput, HandSource, HudFrame, RacerBlueprint};
use drivetrain::{SpeedIntegrator, SpeedTicker};
use gesture::GestureStage;
use ingestion::{MockHandSource, MockScript, ReplayConfig, ReplayHandSource, TrackingPipeline};
use observability::SessionMetricsAggregator;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};
use vehicle::DriveRig;

use super::SessionStats;
use crate::error::{CliError, Result};

/// Where hand sets come from
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Scripted synthetic tracker
    Mock(MockScript),
    /// Recorded session
    Replay { path: PathBuf, config: ReplayConfig },
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub blueprint: RacerBlueprint,

    /// Maximum number of rendered frames (None = unlimited)
    pub max_frames: Option<u64>,

    /// Session timeout (None = no timeout)
    pub timeout: Option<Duration>,

    pub source: InputSource,
}

/// Why the frame loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    MaxFrames,
    Shutdown,
    TimedOut,
}

/// State owned by the frame loop
struct FrameLoop {
    rig: DriveRig,
    control_rx: watch::Receiver<contracts::ControlSignal>,
    speed_rx: watch::Receiver<drivetrain::SpeedSample>,
    hud_tx: mpsc::Sender<HudFrame>,
    aggregator: SessionMetricsAggregator,
    frames: u64,
    hud_frames: u64,
    hud_dropped: u64,
}

pub struct Session {
    config: SessionConfig,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    fn build_source(&self) -> Result<Box<dyn HandSource>> {
        let tracking = &self.config.blueprint.tracking;
        Ok(match &self.config.source {
            InputSource::Mock(script) => {
                info!(script = script.name(), "using mock hand tracker");
                Box::new(MockHandSource::new(
                    tracking.source_id.clone(),
                    *script,
                    tracking.frequency_hz,
                ))
            }
            InputSource::Replay { path, config } => {
                info!(path = %path.display(), speed = config.speed_multiplier, "replaying recorded session");
                Box::new(ReplayHandSource::load(
                    path,
                    tracking.source_id.clone(),
                    config.clone(),
                )?)
            }
        })
    }

    /// Drive until max frames, timeout or `shutdown` resolves
    #[instrument(name = "session_run", skip_all)]
    pub async fn run<F>(self, shutdown: F) -> Result<SessionStats>
    where
        F: Future<Output = ()>,
    {
        let start = Instant::now();
        let blueprint = &self.config.blueprint;

        // Intake
        let mut tracking = TrackingPipeline::from_tracking(&blueprint.tracking);
        tracking.register_source(self.build_source()?)?;
        let hands_rx = tracking
            .take_receiver()
            .ok_or_else(|| CliError::shutdown("tracking receiver already taken"))?;

        // Gesture stage and speed ticker
        let stage = GestureStage::new(blueprint.gesture.clone());
        let control_rx = stage.subscribe();
        let gesture = stage.spawn(hands_rx);

        let ticker = SpeedTicker::spawn(
            SpeedIntegrator::new(blueprint.drivetrain.clone()),
            control_rx.clone(),
        );

        // HUD
        if blueprint.hud.is_empty() {
            warn!("No HUD sinks configured - HUD frames will be dropped");
        }
        let (hud_tx, hud_rx) = mpsc::channel::<HudFrame>(64);
        let dispatcher = hud::create_dispatcher(blueprint.hud.clone(), hud_rx).await?;
        let hud_task = dispatcher.spawn();

        let listening = tracking.start_all();
        if listening == 0 {
            warn!("no hand tracker is running; control signal stays at its last value");
        }
        info!(
            sources = tracking.source_count(),
            listening,
            fps = blueprint.session.fps,
            "session started"
        );

        let mut frame_loop = FrameLoop {
            rig: DriveRig::mounted(blueprint),
            control_rx,
            speed_rx: ticker.subscribe(),
            hud_tx,
            aggregator: SessionMetricsAggregator::new(),
            frames: 0,
            hud_frames: 0,
            hud_dropped: 0,
        };

        let drive = frame_loop.drive(blueprint, start, self.config.max_frames, &tracking, shutdown);
        let reason = match self.config.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, drive).await {
                Ok(reason) => reason,
                Err(_) => {
                    warn!(timeout_secs = timeout.as_secs_f64(), "session timed out");
                    StopReason::TimedOut
                }
            },
            None => drive.await,
        };
        info!(?reason, frames = frame_loop.frames, "frame loop finished");

        // Teardown
        tracking.stop_all();
        let intake = tracking.metrics().snapshot();
        let gesture_summary = gesture.stop().await;
        let final_speed = ticker.stop().await;

        let FrameLoop {
            rig,
            hud_tx,
            mut aggregator,
            frames,
            hud_frames,
            hud_dropped,
            ..
        } = frame_loop;
        drop(hud_tx);
        let sink_metrics = match tokio::time::timeout(Duration::from_secs(5), hud_task).await {
            Ok(Ok(metrics)) => metrics,
            Ok(Err(e)) => {
                warn!(error = %e, "HUD dispatcher task failed");
                Vec::new()
            }
            Err(_) => {
                warn!("HUD sinks did not drain within 5s");
                Vec::new()
            }
        };

        aggregator.set_held_signals(gesture_summary.held_frames);
        let position = rig.position();

        let stats = SessionStats {
            frames,
            hud_frames,
            hud_dropped,
            hand_sets: gesture_summary.hand_sets,
            signal_changes: gesture_summary.signal_changes,
            final_speed: final_speed.speed,
            speed_ticks: final_speed.tick,
            final_position: [position.x, position.y, position.z],
            intake,
            sink_metrics,
            aggregator,
            duration: start.elapsed(),
            timed_out: reason == StopReason::TimedOut,
        };

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            fps = format!("{:.2}", stats.fps()),
            "session shutdown complete"
        );
        Ok(stats)
    }
}

impl FrameLoop {
    async fn drive<F>(
        &mut self,
        blueprint: &RacerBlueprint,
        start: Instant,
        max_frames: Option<u64>,
        tracking: &TrackingPipeline,
        shutdown: F,
    ) -> StopReason
    where
        F: Future<Output = ()>,
    {
        let frame_interval = blueprint.session.frame_interval();
        let hud_interval = blueprint.session.hud_interval();

        let mut ticker = tokio::time::interval(frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut last_frame = Instant::now();
        let mut last_hud: Option<Instant> = None;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => return StopReason::Shutdown,
                now = ticker.tick() => {
                    let delta = now.saturating_duration_since(last_frame);
                    let delta = if self.frames == 0 || delta.is_zero() {
                        frame_interval
                    } else {
                        delta
                    };
                    last_frame = now;

                    self.render_frame(delta.as_secs_f32());

                    if last_hud.map_or(true, |t| now.duration_since(t) >= hud_interval) {
                        last_hud = Some(now);
                        self.publish_hud(start, tracking);
                    }

                    if max_frames.is_some_and(|max| self.frames >= max) {
                        info!(frames = self.frames, "Reached max frames limit");
                        return StopReason::MaxFrames;
                    }
                }
            }
        }
    }

    fn render_frame(&mut self, delta: f32) {
        self.frames += 1;
        let signal = *self.control_rx.borrow();
        let speed = self.speed_rx.borrow().speed;
        let input = DriveInput {
            speed,
            steering_angle_deg: signal.steering_angle_deg,
        };

        match self.rig.step(input, delta) {
            Ok(_) => {
                self.aggregator.record_frame(speed, &signal, delta);
                observability::record_frame(speed, &signal, delta);
            }
            Err(skip) => {
                debug!(reason = skip.reason(), error = %skip, "frame skipped");
                self.aggregator.record_skip(skip.reason());
                observability::record_frame_skipped(skip.reason());
            }
        }
    }

    fn publish_hud(&mut self, start: Instant, tracking: &TrackingPipeline) {
        let signal = *self.control_rx.borrow();
        let speed = self.speed_rx.borrow().speed;
        let p = self.rig.position();
        let frame = HudFrame::new(
            self.frames,
            start.elapsed().as_secs_f64(),
            speed,
            &signal,
            [p.x, p.y, p.z],
        );

        let accepted = self.hud_tx.try_send(frame).is_ok();
        if accepted {
            self.hud_frames += 1;
        } else {
            self.hud_dropped += 1;
        }
        observability::record_hud_dispatched("dispatcher", accepted);

        let intake = tracking.metrics().snapshot();
        observability::record_intake(intake.queue_len, intake.hand_sets_dropped);
    }
}
