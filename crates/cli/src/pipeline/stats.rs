//! Session statistics.

use std::time::Duration;

use hud::MetricsSnapshot as SinkSnapshot;
use ingestion::MetricsSnapshot as IntakeSnapshot;
use observability::SessionMetricsAggregator;

/// Statistics from a session run
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    /// Frames the loop ran, including skipped ones
    pub frames: u64,

    pub hud_frames: u64,

    /// HUD frames dropped because the dispatcher queue was full
    pub hud_dropped: u64,

    /// Hand sets the gesture stage consumed
    pub hand_sets: u64,

    pub signal_changes: u64,

    pub final_speed: f32,

    pub speed_ticks: u64,

    pub final_position: [f32; 3],

    pub intake: IntakeSnapshot,

    pub sink_metrics: Vec<(String, SinkSnapshot)>,

    pub aggregator: SessionMetricsAggregator,

    pub duration: Duration,

    pub timed_out: bool,
}

impl SessionStats {
    /// Rendered frames per second
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Gesture Racer Session ===\n");

        println!("Overview");
        println!("   ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   ├─ Frames: {}", self.frames);
        println!("   ├─ FPS: {:.2}", self.fps());
        println!("   ├─ Final speed: {:.1} ({} ticks)", self.final_speed, self.speed_ticks);
        println!(
            "   └─ Final position: ({:.2}, {:.2}, {:.2})",
            self.final_position[0], self.final_position[1], self.final_position[2]
        );

        println!("\nTracking");
        println!("   ├─ Hand sets received: {}", self.intake.hand_sets_received);
        println!("   ├─ Hand sets dropped: {}", self.intake.hand_sets_dropped);
        println!("   ├─ Hand sets interpreted: {}", self.hand_sets);
        println!("   ├─ Signal changes: {}", self.signal_changes);
        println!("   └─ Tracker errors: {}", self.intake.tracker_errors);

        println!("\nHUD");
        println!("   ├─ Frames published: {}", self.hud_frames);
        println!("   └─ Frames dropped: {}", self.hud_dropped);
        for (name, metrics) in &self.sink_metrics {
            println!(
                "      • {}: written={} failed={} superseded={}",
                name, metrics.write_count, metrics.failure_count, metrics.dropped_count
            );
        }

        println!("\n{}", self.aggregator.summary());
    }
}
