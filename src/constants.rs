//! Constants used throughout the application

/// Number of landmarks in a full hand skeleton
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Bones of the hand skeleton, as pairs of landmark ids
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4),
    (0, 5), (5, 6), (6, 7), (7, 8),
    (5, 9), (9, 10), (10, 11), (11, 12),
    (9, 13), (13, 14), (14, 15), (15, 16),
    (13, 17), (0, 17), (17, 18), (18, 19), (19, 20),
];

/// Landmark id of the thumb tip
pub const THUMB_TIP: usize = 4;

/// Landmark id of the index finger tip
pub const INDEX_FINGER_TIP: usize = 8;

/// Pinch distance mapped to minimum volume, in pixels
pub const DEFAULT_DISTANCE_MIN: f64 = 0.0;

/// Pinch distance mapped to maximum volume, in pixels.
/// Calibrated by eye for a hand roughly an arm's length from a webcam.
pub const DEFAULT_DISTANCE_MAX: f64 = 100.0;

/// Default window sizes for the two moving averages
pub const DEFAULT_DISTANCE_WINDOW: usize = 3;
pub const DEFAULT_VOLUME_WINDOW: usize = 5;

/// Exponent of the loudness shaping curve
pub const DEFAULT_CURVE_EXPONENT: f64 = 0.5;

/// Minimum time between two volume writes, in milliseconds
pub const DEFAULT_MIN_UPDATE_INTERVAL_MS: u64 = 100;

/// Minimum change, in native units, before a volume write is issued
pub const DEFAULT_MIN_VOLUME_CHANGE: f64 = 0.03;

/// Hand detector defaults
pub const DEFAULT_MAX_HANDS: usize = 1;
pub const DEFAULT_MIN_DETECTION_CONFIDENCE: f32 = 0.7;
pub const DEFAULT_MIN_TRACKING_CONFIDENCE: f32 = 0.5;

/// Native range of the simulated sink, matching a typical Windows endpoint in dB
pub const SIMULATED_VOLUME_MIN: f64 = -65.25;
pub const SIMULATED_VOLUME_MAX: f64 = 0.0;

/// Volume bar geometry (pixels)
pub const VOLUME_BAR_LEFT: i32 = 50;
pub const VOLUME_BAR_RIGHT: i32 = 85;
pub const VOLUME_BAR_TOP: f64 = 150.0;
pub const VOLUME_BAR_BOTTOM: f64 = 400.0;

/// Percentage boundaries of the low and medium level bands
pub const LEVEL_LOW_PERCENT: f64 = 30.0;
pub const LEVEL_MEDIUM_PERCENT: f64 = 70.0;

/// Key codes that stop the preview loop
pub const KEY_ESCAPE: i32 = 27;
pub const KEY_QUIT: i32 = b'q' as i32;

/// Preview window title
pub const DEFAULT_WINDOW_TITLE: &str = "Hand Gesture Volume Control";
