/// Number of points in a profile produced by the control system.
pub const PROFILE_POINTS: usize = 121;

/// Outer edge of the normalized-flux profile domain.
pub const PROFILE_EDGE: f64 = 1.2;

/// Increment between profile points in the control system.
pub const PROFILE_STEP: f64 = 0.01;

/// Numbered knot channels archived per fitted quantity (`ftsspsin1..=75`).
pub const FIT_CHANNELS: usize = 75;

/// First shot whose archive carries the online profile signal.
pub const ONLINE_PROFILE_FIRST_SHOT: u32 = 190_000;
