//! Replay hand source - plays back a recorded tracking session
//!
//! One JSON object per line:
//!
//! ```text
//! {"timestamp": 0.033, "frame_id": 1, "hands": [
//!     {"handedness": "Left", "landmarks": [[0.31, 0.52], [0.30, 0.49, -0.01], ...]},
//!     {"handedness": "Right", "landmarks": [...]}
//! ]}
//! ```
//!
//! Frames are emitted at their recorded offsets, scaled by the speed
//! multiplier.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use contracts::{ContractError, Hand, HandSet, HandSetCallback, HandSource, Handedness, Landmark};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{IngestionError, Result};

/// Longest recording accepted by `load`, in seconds
pub const MAX_RECORDING_SPAN_S: f64 = 24.0 * 60.0 * 60.0;

/// Upper bound on one uninterrupted sleep of the playback thread
const PACING_SLICE: Duration = Duration::from_millis(10);

/// Replay configuration
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Playback speed multiplier (1.0 = recorded speed)
    pub speed_multiplier: f64,

    pub loop_playback: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            loop_playback: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RecordedFrame {
    timestamp: f64,
    #[serde(default)]
    frame_id: Option<u64>,
    #[serde(default)]
    hands: Vec<RecordedHand>,
}

#[derive(Debug, Deserialize)]
struct RecordedHand {
    handedness: String,
    landmarks: Vec<Vec<f32>>,
}

impl RecordedHand {
    fn into_hand(self) -> std::result::Result<Hand, String> {
        let handedness = Handedness::from_label(&self.handedness)
            .ok_or_else(|| format!("unknown handedness '{}'", self.handedness))?;
        let points = self
            .landmarks
            .iter()
            .map(|p| match p.as_slice() {
                [x, y] => Ok(Landmark::new(*x, *y)),
                [x, y, z] => Ok(Landmark { x: *x, y: *y, z: *z }),
                other => Err(format!("landmark needs 2 or 3 values, got {}", other.len())),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Hand::from_slice(handedness, &points).map_err(|e| e.to_string())
    }
}

fn parse_line(line: &str) -> std::result::Result<HandSet, String> {
    let frame: RecordedFrame = serde_json::from_str(line).map_err(|e| e.to_string())?;
    let hands = frame
        .hands
        .into_iter()
        .map(RecordedHand::into_hand)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let set = HandSet::new(frame.timestamp, hands).map_err(|e| e.to_string())?;
    Ok(match frame.frame_id {
        Some(id) => set.with_frame_id(id),
        None => set,
    })
}

/// Replay hand source
pub struct ReplayHandSource {
    source_id: String,
    frames: Arc<Vec<HandSet>>,
    config: ReplayConfig,
    listening: Arc<AtomicBool>,
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl ReplayHandSource {
    /// Load a recording
    ///
    /// # Errors
    /// The file cannot be read, or any non-empty line is malformed.
    pub fn load(path: &Path, source_id: impl Into<String>, config: ReplayConfig) -> Result<Self> {
        let file = File::open(path).map_err(|e| IngestionError::replay_load(path, e.to_string()))?;
        let reader = BufReader::new(file);

        let mut frames = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| IngestionError::replay_load(path, e.to_string()))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let set = parse_line(line).map_err(|e| IngestionError::replay_parse(idx + 1, e))?;
            frames.push(set);
        }

        frames.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));

        if let (Some(first), Some(last)) = (frames.first(), frames.last()) {
            let span = last.timestamp - first.timestamp;
            if span > MAX_RECORDING_SPAN_S {
                return Err(IngestionError::replay_load(
                    path,
                    format!("recording spans {span}s, limit is {MAX_RECORDING_SPAN_S}s"),
                ));
            }
        }

        let source_id = source_id.into();
        info!(source_id = %source_id, frames = frames.len(), path = %path.display(), "loaded recording");

        Ok(Self::from_frames(source_id, frames, config))
    }

    pub fn from_frames(source_id: impl Into<String>, frames: Vec<HandSet>, config: ReplayConfig) -> Self {
        Self {
            source_id: source_id.into(),
            frames: Arc::new(frames),
            config,
            listening: Arc::new(AtomicBool::new(false)),
            thread_handle: Mutex::new(None),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Recorded span in seconds
    pub fn duration_s(&self) -> f64 {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0.0,
        }
    }
}

impl HandSource for ReplayHandSource {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn listen(&self, callback: HandSetCallback) -> std::result::Result<(), ContractError> {
        if self.frames.is_empty() {
            return Err(ContractError::tracker_unavailable(
                &self.source_id,
                "recording has no frames",
            ));
        }
        if self.listening.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let source_id = self.source_id.clone();
        let frames = self.frames.clone();
        let listening = self.listening.clone();
        let speed = self.config.speed_multiplier.max(0.1);
        let loop_playback = self.config.loop_playback;

        let handle = thread::spawn(move || {
            debug!(source_id = %source_id, "replay thread started");
            let first_timestamp = frames[0].timestamp;

            'playback: loop {
                let start_time = Instant::now();

                for frame in frames.iter() {
                    if !listening.load(Ordering::Relaxed) {
                        debug!(source_id = %source_id, "replay stopped");
                        break 'playback;
                    }

                    let offset = (frame.timestamp - first_timestamp).max(0.0);
                    let deadline = Duration::try_from_secs_f64(offset / speed)
                        .ok()
                        .and_then(|target| start_time.checked_add(target));
                    let Some(deadline) = deadline else {
                        warn!(
                            source_id = %source_id,
                            timestamp = frame.timestamp,
                            "frame offset out of range, skipped"
                        );
                        continue;
                    };
                    if !wait_until(deadline, &listening) {
                        debug!(source_id = %source_id, "replay stopped");
                        break 'playback;
                    }

                    callback(frame.clone());
                }

                if !loop_playback {
                    info!(source_id = %source_id, "replay completed");
                    break;
                }
                debug!(source_id = %source_id, "looping replay");
            }

            listening.store(false, Ordering::SeqCst);
        });

        if let Ok(mut slot) = self.thread_handle.lock() {
            *slot = Some(handle);
        }
        Ok(())
    }

    fn stop(&self) {
        self.listening.store(false, Ordering::SeqCst);
        let handle = self.thread_handle.lock().ok().and_then(|mut slot| slot.take());
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!(source_id = %self.source_id, "replay thread panicked");
            }
        }
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }
}

/// Sleep until `deadline` in short slices; false once `listening` clears
fn wait_until(deadline: Instant, listening: &AtomicBool) -> bool {
    loop {
        if !listening.load(Ordering::Relaxed) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep((deadline - now).min(PACING_SLICE));
    }
}

impl Drop for ReplayHandSource {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn hand_json(label: &str, x: f32) -> String {
        let points: Vec<String> = (0..21).map(|_| format!("[{x}, 0.5]")).collect();
        format!(r#"{{"handedness": "{label}", "landmarks": [{}]}}"#, points.join(", "))
    }

    fn recording(lines: &[String]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    fn two_hand_line(timestamp: f64, frame_id: u64) -> String {
        format!(
            r#"{{"timestamp": {timestamp}, "frame_id": {frame_id}, "hands": [{}, {}]}}"#,
            hand_json("Left", 0.3),
            hand_json("Right", 0.7)
        )
    }

    #[test]
    fn test_load_sorts_by_timestamp() {
        let file = recording(&[
            two_hand_line(0.2, 3),
            String::new(),
            two_hand_line(0.0, 1),
            r#"{"timestamp": 0.1, "hands": []}"#.to_string(),
        ]);
        let source = ReplayHandSource::load(file.path(), "replay", ReplayConfig::default()).unwrap();
        assert_eq!(source.frame_count(), 3);
        assert_eq!(source.frames[0].frame_id, Some(1));
        assert!(source.frames[1].is_empty());
        assert!((source.duration_s() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let file = recording(&[two_hand_line(0.0, 1), r#"{"timestamp": "x"}"#.to_string()]);
        let err = ReplayHandSource::load(file.path(), "replay", ReplayConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, IngestionError::ReplayParse { line: 2, .. }), "{err}");
    }

    #[test]
    fn test_short_landmark_list_rejected() {
        let line = r#"{"timestamp": 0.0, "hands": [{"handedness": "Left", "landmarks": [[0.1, 0.2]]}]}"#;
        assert!(parse_line(line).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = ReplayHandSource::load(
            Path::new("/nonexistent/session.jsonl"),
            "replay",
            ReplayConfig::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, IngestionError::ReplayLoad { .. }));
    }

    #[test]
    fn test_plays_all_frames_then_stops_listening() {
        let file = recording(&[two_hand_line(0.0, 1), two_hand_line(0.01, 2), two_hand_line(0.02, 3)]);
        let source = ReplayHandSource::load(
            file.path(),
            "replay",
            ReplayConfig {
                speed_multiplier: 10.0,
                loop_playback: false,
            },
        )
        .unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        source
            .listen(Arc::new(move |set| sink.lock().unwrap().push(set.frame_id)))
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while source.is_listening() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        source.stop();
        assert_eq!(*seen.lock().unwrap(), vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_stop_interrupts_long_gap() {
        let frames = vec![
            HandSet::empty(0.0).with_frame_id(1),
            HandSet::empty(5.0).with_frame_id(2),
        ];
        let source = ReplayHandSource::from_frames("replay", frames, ReplayConfig::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        source
            .listen(Arc::new(move |set| sink.lock().unwrap().push(set.frame_id)))
            .unwrap();
        thread::sleep(Duration::from_millis(100));

        let started = Instant::now();
        source.stop();
        assert!(started.elapsed() < Duration::from_millis(500), "stop took {:?}", started.elapsed());
        assert!(!source.is_listening());
        assert_eq!(*seen.lock().unwrap(), vec![Some(1)]);
    }

    #[test]
    fn test_oversized_span_rejected() {
        let file = recording(&[two_hand_line(0.0, 1), two_hand_line(1e20, 2)]);
        let err = ReplayHandSource::load(file.path(), "replay", ReplayConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, IngestionError::ReplayLoad { .. }), "{err}");
        assert!(err.to_string().contains("limit"), "{err}");
    }

    #[test]
    fn test_out_of_range_offset_is_skipped() {
        let frames = vec![
            HandSet::empty(0.0).with_frame_id(1),
            HandSet::empty(1e20).with_frame_id(2),
        ];
        let source = ReplayHandSource::from_frames("replay", frames, ReplayConfig::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        source
            .listen(Arc::new(move |set| sink.lock().unwrap().push(set.frame_id)))
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while source.is_listening() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(!source.is_listening());
        source.stop();
        assert_eq!(*seen.lock().unwrap(), vec![Some(1)]);
    }

    #[test]
    fn test_empty_recording_is_unavailable() {
        let source = ReplayHandSource::from_frames("replay", Vec::new(), ReplayConfig::default());
        assert!(source.listen(Arc::new(|_| {})).is_err());
    }
}
