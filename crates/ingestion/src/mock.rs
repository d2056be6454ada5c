//! Mock hand source
//!
//! Plays a scripted drive from synthesized landmarks, for running without
//! a camera.

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use contracts::{ContractError, Gear, HandSet, HandSetCallback, HandSource};
use tracing::{debug, trace};

use crate::error::IngestionError;
use crate::synth;

/// Built-in driving scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MockScript {
    /// 20 s loop: straight, left bend, coast, right bend, brake, coast
    #[default]
    Lap,
    /// Full throttle, wheel level
    Straight,
    /// 4 s throttle, 4 s brake, then idle
    BrakeTest,
    /// 5 s loop: 2 s steering, 2 s no hands, 1 s one hand
    SignalLoss,
}

impl MockScript {
    pub const ALL: [MockScript; 4] = [
        MockScript::Lap,
        MockScript::Straight,
        MockScript::BrakeTest,
        MockScript::SignalLoss,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MockScript::Lap => "lap",
            MockScript::Straight => "straight",
            MockScript::BrakeTest => "brake-test",
            MockScript::SignalLoss => "signal-loss",
        }
    }

    /// Hand set at `t` seconds into the script
    pub fn hand_set_at(&self, t: f64) -> HandSet {
        match self {
            MockScript::Lap => {
                let (gear, deg) = match t.rem_euclid(20.0) {
                    p if p < 5.0 => (Gear::Accelerate, 0.0),
                    p if p < 9.0 => (Gear::Accelerate, 20.0),
                    p if p < 12.0 => (Gear::Idle, 0.0),
                    p if p < 16.0 => (Gear::Accelerate, -20.0),
                    p if p < 18.0 => (Gear::Brake, 0.0),
                    _ => (Gear::Idle, 0.0),
                };
                synth::hand_set_at(t, gear, deg)
            }
            MockScript::Straight => synth::hand_set_at(t, Gear::Accelerate, 0.0),
            MockScript::BrakeTest => {
                let gear = if t < 4.0 {
                    Gear::Accelerate
                } else if t < 8.0 {
                    Gear::Brake
                } else {
                    Gear::Idle
                };
                synth::hand_set_at(t, gear, 0.0)
            }
            MockScript::SignalLoss => match t.rem_euclid(5.0) {
                p if p < 2.0 => synth::hand_set_at(t, Gear::Accelerate, 15.0),
                p if p < 4.0 => HandSet::empty(t),
                _ => synth::lone_hand(t),
            },
        }
    }
}

impl FromStr for MockScript {
    type Err = IngestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MockScript::ALL
            .into_iter()
            .find(|script| script.name() == s)
            .ok_or_else(|| IngestionError::UnknownScript { name: s.to_string() })
    }
}

/// Mock hand source
///
/// Emits on a background thread at `frequency_hz`, like a camera callback.
pub struct MockHandSource {
    source_id: String,
    script: MockScript,
    frequency_hz: f64,
    available: bool,
    running: Arc<AtomicBool>,
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl MockHandSource {
    pub fn new(source_id: impl Into<String>, script: MockScript, frequency_hz: f64) -> Self {
        Self {
            source_id: source_id.into(),
            script,
            frequency_hz: frequency_hz.max(1.0),
            available: true,
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: Mutex::new(None),
        }
    }

    /// Source whose tracker never starts
    pub fn unavailable(source_id: impl Into<String>) -> Self {
        let mut source = Self::new(source_id, MockScript::default(), 30.0);
        source.available = false;
        source
    }

    pub fn script(&self) -> MockScript {
        self.script
    }
}

impl HandSource for MockHandSource {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn listen(&self, callback: HandSetCallback) -> Result<(), ContractError> {
        if !self.available {
            return Err(ContractError::tracker_unavailable(
                &self.source_id,
                "camera could not be opened",
            ));
        }
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let source_id = self.source_id.clone();
        let script = self.script;
        let interval = Duration::from_secs_f64(1.0 / self.frequency_hz);
        let running = self.running.clone();

        let handle = thread::spawn(move || {
            debug!(source_id = %source_id, script = script.name(), "mock hand source started");
            let start = Instant::now();
            let mut frame_id: u64 = 0;

            while running.load(Ordering::Relaxed) {
                let t = start.elapsed().as_secs_f64();
                frame_id += 1;
                let hands = script.hand_set_at(t).with_frame_id(frame_id);
                trace!(source_id = %source_id, frame_id, hands = hands.len(), "mock hand set");
                callback(hands);
                thread::sleep(interval);
            }

            debug!(source_id = %source_id, frames = frame_id, "mock hand source stopped");
        });

        if let Ok(mut slot) = self.thread_handle.lock() {
            *slot = Some(handle);
        }
        Ok(())
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let handle = self.thread_handle.lock().ok().and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }

    fn is_listening(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

impl Drop for MockHandSource {
    fn drop(&mut self) {
        self.stop();
    }
}
