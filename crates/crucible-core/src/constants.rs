//! Simulation constants and tuning parameters.

// --- Earth ---

/// Earth gravitational parameter (m³/s²).
pub const MU_EARTH: f64 = 3.986004418e14;

/// Earth rotation rate (rad/s), used for the ECI→ECEF GMST rotation.
pub const OMEGA_EARTH: f64 = 7.2921159e-5;

/// Mean Earth radius in meters (spherical geodesy).
pub const R_EARTH_MEAN: f64 = 6_371_000.0;

/// WGS84 semi-major axis (meters).
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = 0.006_694_379_990_14;

/// Standard gravity (m/s²).
pub const G0: f64 = 9.80665;

// --- Flight model ---

/// Maximum sub-step for 3-DOF integration (seconds). Ticks larger than
/// this are split to bound truncation error.
pub const MAX_FLIGHT_SUBSTEP: f64 = 0.1;

/// Stall floor for the flight model (m/s).
pub const MIN_FLIGHT_SPEED: f64 = 50.0;

/// Flight-path angle clamp (radians, ±80°).
pub const GAMMA_LIMIT: f64 = 80.0 * std::f64::consts::PI / 180.0;

/// Mach number above which wave drag is added.
pub const WAVE_DRAG_MACH: f64 = 0.85;

// --- Waypoint / intercept steering ---

/// Great-circle distance at which a waypoint counts as reached (meters).
pub const WAYPOINT_CAPTURE_RADIUS: f64 = 2_000.0;

/// Maximum bank command (radians, ~40°).
pub const MAX_BANK: f64 = 0.7;

/// Proportional gain from heading error to bank command.
pub const BANK_GAIN: f64 = 2.0;

/// Proportional gain from altitude error to angle of attack.
pub const ALPHA_ALT_GAIN: f64 = 0.001;

/// Angle-of-attack steering clamp (radians).
pub const ALPHA_LIMIT: f64 = 0.15;

/// Minimum altitude an interceptor holds over a ground target (meters).
pub const INTERCEPT_MIN_ALT: f64 = 500.0;

// --- Auto-patrol racetrack (externally-piloted entities run headlessly) ---

/// Forward leg of the auto-assigned racetrack (meters).
pub const AUTO_PATROL_LEG_FWD: f64 = 50_000.0;

/// Lateral leg of the auto-assigned racetrack (meters).
pub const AUTO_PATROL_LEG_SIDE: f64 = 20_000.0;

// --- Sensors ---

/// Both sensor and target below this altitude ⇒ ground-to-ground pair,
/// skipped by radar sweeps (meters).
pub const GROUND_ALT_THRESHOLD: f64 = 100.0;

/// Default radar sweep period (seconds).
pub const DEFAULT_SWEEP_INTERVAL: f64 = 0.5;

/// Default time without detection before a sensor track is dropped (seconds).
pub const DEFAULT_TRACK_TIMEOUT: f64 = 5.0;

// --- Kill-chain timings ---

/// SAM DETECT phase dwell (seconds).
pub const SAM_DETECT_SECS: f64 = 1.0;

/// SAM TRACK phase dwell, i.e. firing solution computation (seconds).
pub const SAM_TRACK_SECS: f64 = 2.0;

/// SAM ASSESS phase dwell (seconds).
pub const SAM_ASSESS_SECS: f64 = 3.0;

/// SAM reload time after a salvo before the next can fire (seconds).
pub const SAM_RELOAD_SECS: f64 = 6.0;

/// A2A ASSESS phase dwell (seconds).
pub const A2A_ASSESS_SECS: f64 = 2.0;

/// Lock dwell for active-radar seekers (seconds).
pub const LOCK_SECS_ACTIVE_RADAR: f64 = 1.5;

/// Lock dwell for infrared seekers (seconds).
pub const LOCK_SECS_INFRARED: f64 = 2.5;

/// Kinetic kill cooldown after a missed Pk roll (seconds).
pub const KKV_COOLDOWN_SECS: f64 = 5.0;
