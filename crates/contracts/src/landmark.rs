//! Hand landmark types produced by the external hand tracker.
//!
//! Index constants follow the 21-point hand topology used by common
//! landmark models.

use serde::{Deserialize, Serialize};

use crate::ContractError;

/// Number of landmarks per tracked hand
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_TIP: usize = 20;

/// Normalized 2D image position, `z` is relative depth and unused by the core
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Hand label reported by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Parse tracker label ("Left" / "Right", case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// One tracked hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub handedness: Handedness,
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl Hand {
    pub fn new(handedness: Handedness, landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self {
            handedness,
            landmarks,
        }
    }

    /// Build from a slice, which must hold exactly 21 landmarks
    pub fn from_slice(handedness: Handedness, points: &[Landmark]) -> Result<Self, ContractError> {
        let landmarks: [Landmark; LANDMARK_COUNT] = points.try_into().map_err(|_| {
            ContractError::invalid_hand_set(format!(
                "{handedness:?} hand has {} landmarks, expected {LANDMARK_COUNT}",
                points.len()
            ))
        })?;
        Ok(Self::new(handedness, landmarks))
    }

    #[inline]
    pub fn landmark(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }
}

/// Per-frame tracker output: zero, one or two hands with distinct labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandSet {
    /// Capture time in seconds
    pub timestamp: f64,

    /// Optional frame number, for ordering/diagnostics
    pub frame_id: Option<u64>,

    hands: Vec<Hand>,
}

impl HandSet {
    /// Create a hand set
    ///
    /// # Errors
    /// More than two hands, or two hands carrying the same label.
    pub fn new(timestamp: f64, hands: Vec<Hand>) -> Result<Self, ContractError> {
        if hands.len() > 2 {
            return Err(ContractError::invalid_hand_set(format!(
                "expected at most 2 hands, got {}",
                hands.len()
            )));
        }
        if let [a, b] = hands.as_slice() {
            if a.handedness == b.handedness {
                return Err(ContractError::invalid_hand_set(format!(
                    "duplicate handedness label {:?}",
                    a.handedness
                )));
            }
        }
        Ok(Self {
            timestamp,
            frame_id: None,
            hands,
        })
    }

    /// Hand set with no detections
    pub fn empty(timestamp: f64) -> Self {
        Self {
            timestamp,
            frame_id: None,
            hands: Vec::new(),
        }
    }

    pub fn single(timestamp: f64, hand: Hand) -> Self {
        Self {
            timestamp,
            frame_id: None,
            hands: vec![hand],
        }
    }

    /// Both hands; labels are forced to left/right
    pub fn both(timestamp: f64, mut left: Hand, mut right: Hand) -> Self {
        left.handedness = Handedness::Left;
        right.handedness = Handedness::Right;
        Self {
            timestamp,
            frame_id: None,
            hands: vec![left, right],
        }
    }

    pub fn with_frame_id(mut self, frame_id: u64) -> Self {
        self.frame_id = Some(frame_id);
        self
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn len(&self) -> usize {
        self.hands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn hand(&self, handedness: Handedness) -> Option<&Hand> {
        self.hands.iter().find(|h| h.handedness == handedness)
    }

    /// `(left, right)` when both hands are present
    pub fn pair(&self) -> Option<(&Hand, &Hand)> {
        Some((self.hand(Handedness::Left)?, self.hand(Handedness::Right)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_hand(handedness: Handedness) -> Hand {
        Hand::new(handedness, [Landmark::new(0.5, 0.5); LANDMARK_COUNT])
    }

    #[test]
    fn test_hand_set_accepts_two_distinct_hands() {
        let set = HandSet::new(
            0.0,
            vec![flat_hand(Handedness::Right), flat_hand(Handedness::Left)],
        )
        .unwrap();
        let (left, right) = set.pair().unwrap();
        assert_eq!(left.handedness, Handedness::Left);
        assert_eq!(right.handedness, Handedness::Right);
    }

    #[test]
    fn test_hand_set_rejects_duplicate_labels() {
        let result = HandSet::new(
            0.0,
            vec![flat_hand(Handedness::Left), flat_hand(Handedness::Left)],
        );
        assert!(matches!(result, Err(ContractError::InvalidHandSet { .. })));
    }

    #[test]
    fn test_hand_set_rejects_three_hands() {
        let result = HandSet::new(
            0.0,
            vec![
                flat_hand(Handedness::Left),
                flat_hand(Handedness::Right),
                flat_hand(Handedness::Left),
            ],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_single_hand_has_no_pair() {
        let set = HandSet::new(0.0, vec![flat_hand(Handedness::Left)]).unwrap();
        assert!(set.pair().is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_hand_from_slice_length_check() {
        let points = vec![Landmark::default(); 20];
        assert!(Hand::from_slice(Handedness::Left, &points).is_err());
        let points = vec![Landmark::default(); LANDMARK_COUNT];
        assert!(Hand::from_slice(Handedness::Left, &points).is_ok());
    }

    #[test]
    fn test_handedness_label() {
        assert_eq!(Handedness::from_label("Left"), Some(Handedness::Left));
        assert_eq!(Handedness::from_label("RIGHT"), Some(Handedness::Right));
        assert_eq!(Handedness::from_label("both"), None);
    }
}
