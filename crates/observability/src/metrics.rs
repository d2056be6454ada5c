//! Session metrics
//!
//! Per-frame counters for the Prometheus recorder plus an in-memory
//! aggregator for the end-of-run summary.

use std::collections::BTreeMap;

use contracts::{ControlSignal, Gear};
use metrics::{counter, gauge, histogram};

/// Record one simulated frame
///
/// # Example
///
/// ```ignore
/// use observability::metrics::record_frame;
///
/// if let Ok(command) = motion.update(Some(&mut body), input, delta) {
///     record_frame(speed, &signal, delta);
/// }
/// ```
pub fn record_frame(speed: f32, signal: &ControlSignal, delta_s: f32) {
    counter!("gesture_racer_frames_total").increment(1);
    gauge!("gesture_racer_speed").set(speed as f64);
    gauge!("gesture_racer_steering_angle_deg").set(signal.steering_angle_deg as f64);
    histogram!("gesture_racer_frame_delta_ms").record(delta_s as f64 * 1000.0);
    counter!("gesture_racer_gear_frames_total", "gear" => signal.gear.as_str()).increment(1);
}

/// Record a frame the controllers skipped
pub fn record_frame_skipped(reason: &'static str) {
    counter!("gesture_racer_frames_skipped_total", "reason" => reason).increment(1);
}

/// Record a HUD frame handed to a sink queue
pub fn record_hud_dispatched(sink_name: &str, accepted: bool) {
    let status = if accepted { "accepted" } else { "dropped" };
    counter!(
        "gesture_racer_hud_frames_total",
        "sink" => sink_name.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record the intake channel state
pub fn record_intake(queue_len: usize, dropped_total: u64) {
    gauge!("gesture_racer_intake_queue_len").set(queue_len as f64);
    gauge!("gesture_racer_intake_dropped").set(dropped_total as f64);
}

/// Session metrics aggregator
#[derive(Debug, Clone, Default)]
pub struct SessionMetricsAggregator {
    pub total_frames: u64,

    pub skipped_frames: u64,

    /// Skip count per reason
    pub skip_reasons: BTreeMap<String, u64>,

    /// Frames spent in each gear
    pub gear_frames: BTreeMap<String, u64>,

    /// Signals held because hands were missing
    pub held_signals: u64,

    pub speed_stats: RunningStats,

    /// Absolute steering angle
    pub steering_stats: RunningStats,

    /// Frame delta in milliseconds
    pub delta_stats: RunningStats,
}

impl SessionMetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, speed: f32, signal: &ControlSignal, delta_s: f32) {
        self.total_frames += 1;
        *self
            .gear_frames
            .entry(signal.gear.as_str().to_string())
            .or_insert(0) += 1;
        self.speed_stats.push(speed as f64);
        self.steering_stats.push(signal.steering_angle_deg.abs() as f64);
        self.delta_stats.push(delta_s as f64 * 1000.0);
    }

    pub fn record_skip(&mut self, reason: &str) {
        self.total_frames += 1;
        self.skipped_frames += 1;
        *self.skip_reasons.entry(reason.to_string()).or_insert(0) += 1;
    }

    pub fn set_held_signals(&mut self, held: u64) {
        self.held_signals = held;
    }

    pub fn summary(&self) -> SessionSummary {
        let rendered = self.total_frames - self.skipped_frames;
        let share = |gear: Gear| {
            let frames = self.gear_frames.get(gear.as_str()).copied().unwrap_or(0);
            if rendered > 0 {
                frames as f64 / rendered as f64 * 100.0
            } else {
                0.0
            }
        };
        SessionSummary {
            total_frames: self.total_frames,
            skipped_frames: self.skipped_frames,
            skip_rate: if self.total_frames > 0 {
                self.skipped_frames as f64 / self.total_frames as f64 * 100.0
            } else {
                0.0
            },
            held_signals: self.held_signals,
            accelerate_share: share(Gear::Accelerate),
            brake_share: share(Gear::Brake),
            speed: StatsSummary::from(&self.speed_stats),
            steering_deg: StatsSummary::from(&self.steering_stats),
            frame_delta_ms: StatsSummary::from(&self.delta_stats),
            skip_reasons: self.skip_reasons.clone(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// End-of-run summary
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    pub total_frames: u64,
    pub skipped_frames: u64,
    pub skip_rate: f64,
    pub held_signals: u64,
    pub accelerate_share: f64,
    pub brake_share: f64,
    pub speed: StatsSummary,
    pub steering_deg: StatsSummary,
    pub frame_delta_ms: StatsSummary,
    pub skip_reasons: BTreeMap<String, u64>,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Session Summary ===")?;
        writeln!(f, "Total frames: {}", self.total_frames)?;
        writeln!(
            f,
            "Skipped frames: {} ({:.2}%)",
            self.skipped_frames, self.skip_rate
        )?;
        writeln!(f, "Held signals: {}", self.held_signals)?;
        writeln!(
            f,
            "Throttle: {:.1}% accelerate, {:.1}% brake",
            self.accelerate_share, self.brake_share
        )?;
        writeln!(f, "Speed: {}", self.speed)?;
        writeln!(f, "|Steering| (deg): {}", self.steering_deg)?;
        writeln!(f, "Frame delta (ms): {}", self.frame_delta_ms)?;

        if !self.skip_reasons.is_empty() {
            writeln!(f, "Skip reasons:")?;
            for (reason, count) in &self.skip_reasons {
                writeln!(f, "  {}: {}", reason, count)?;
            }
        }

        Ok(())
    }
}

/// Stats summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
