//! Constants used throughout the application

/// Number of points in a face mesh landmark set
pub const NUM_FACE_LANDMARKS: usize = 468;

/// Number of points in a hand landmark set
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Face mesh anchors used for head orientation
pub mod face {
    pub const LEFT_CHEEK: usize = 234;
    pub const RIGHT_CHEEK: usize = 454;
    pub const TOP_OF_HEAD: usize = 10;
    pub const CHIN: usize = 152;
    pub const NOSE_TIP: usize = 1;

    /// Left eye contour in EAR order: outer corner, two upper lids, inner corner, two lower lids
    pub const LEFT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];
}

/// Hand landmark indices
pub mod hand {
    pub const WRIST: usize = 0;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_KNUCKLE: usize = 9;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP: usize = 16;
    pub const LITTLE_TIP: usize = 20;
}

/// Neutral (straight ahead) angle for both yaw and pitch, in degrees
pub const NEUTRAL_ANGLE: f64 = 180.0;

/// Full turn in degrees
pub const FULL_TURN: f64 = 360.0;

/// Default screen margin kept free of the cursor, in pixels
pub const DEFAULT_SCREEN_MARGIN: i32 = 10;

/// Default capacity of the forward vector smoothing window
pub const DEFAULT_SMOOTHING_WINDOW: usize = 8;

/// Default actuation rate
pub const DEFAULT_ACTUATOR_HZ: f64 = 100.0;

/// Scroll step used by the scroll gesture
pub const DEFAULT_SCROLL_AMOUNT: i32 = 50;

/// Characters selectable on the dial with an open hand
pub const DIAL_LETTERS: &str = " ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Characters selectable on the dial with a closed fist
pub const DIAL_SYMBOLS: &str = "1234567890.,!?;:@#&+-/*=";

/// Numeric precision epsilon
pub const EPSILON: f64 = 1e-10;
