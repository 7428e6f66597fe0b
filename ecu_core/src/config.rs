//! Compile-time calibration of the control engine.
//!
//! Every threshold is paired with the comparison operator it is used with in
//! the controller that owns it; the operator is part of the calibration.

// ── Common ───────────────────────────────────────────────────────────────────

/// Nominal control period.
pub const TICK_MS: u32 = 10;
/// A reading older than this (strictly greater) is stale.
pub const STALE_THRESHOLD_MS: u32 = 100;

// ── Autobrake ────────────────────────────────────────────────────────────────

/// Brake-qualifying when `distance_mm <= BRAKE_THRESH_MM`.
pub const BRAKE_THRESH_MM: u16 = 1220;
/// Consecutive qualifying ticks before the brake request is asserted.
pub const AUTOBRAKE_DEBOUNCE_COUNT: u8 = 3;

// ── Wipers ───────────────────────────────────────────────────────────────────

/// Off → Int when `rain >= RAIN_THR_INT_ON_PCT`.
pub const RAIN_THR_INT_ON_PCT: u8 = 20;
/// Int → Off when `rain < RAIN_THR_INT_OFF_PCT`.
pub const RAIN_THR_INT_OFF_PCT: u8 = 15;
/// Int → Low when `rain >= RAIN_THR_LOW_ON_PCT`.
pub const RAIN_THR_LOW_ON_PCT: u8 = 40;
/// Low → Int when `rain < RAIN_THR_LOW_OFF_PCT`.
pub const RAIN_THR_LOW_OFF_PCT: u8 = 35;
/// Low → High when `rain >= RAIN_THR_HIGH_ON_PCT`.
pub const RAIN_THR_HIGH_ON_PCT: u8 = 70;
/// High → Low when `rain < RAIN_THR_HIGH_OFF_PCT`.
pub const RAIN_THR_HIGH_OFF_PCT: u8 = 60;
/// Ticks a candidate mode must be held before it is commanded.
pub const WIPERS_DEBOUNCE_COUNT: u8 = 2;

// ── Speed governor ───────────────────────────────────────────────────────────

/// Limit in force until the first recognised sign.
pub const SPEEDGOV_DEFAULT_LIMIT_KPH: u16 = 50;
/// Consecutive `speed > limit` ticks before the alarm is raised.
pub const SPEEDGOV_DEBOUNCE_COUNT: u8 = 2;
/// Alarm clears when `speed <= limit - SPEEDGOV_HYSTERESIS_KPH`.
pub const SPEEDGOV_HYSTERESIS_KPH: u16 = 3;

// ── Autopark ─────────────────────────────────────────────────────────────────

/// Parking is only possible while `speed <= AUTOPARK_MAX_SPEED_KPH`.
pub const AUTOPARK_MAX_SPEED_KPH: u16 = 10;
/// A gap qualifies when `width_mm >= AUTOPARK_MIN_GAP_MM`.
pub const AUTOPARK_MIN_GAP_MM: u16 = 5000;
/// Consecutive qualifying gap reads before the maneuver starts.
pub const AUTOPARK_DEBOUNCE_COUNT: u8 = 3;
/// Ticks spent in each maneuver phase.
pub const PARK_REVERSE_RIGHT_TICKS: u16 = 50;
pub const PARK_STRAIGHTEN_TICKS: u16 = 20;
pub const PARK_REVERSE_LEFT_TICKS: u16 = 50;

// ── Climate ──────────────────────────────────────────────────────────────────

/// Minimum spacing between PI updates.
pub const CLIMATE_DT_MS: u32 = 1000;
pub const CLIMATE_KP: i32 = 8;
pub const CLIMATE_KI: i32 = 1;
/// Default cabin target, tenths of °C.
pub const CLIMATE_SETPOINT_X10: i16 = 220;
/// Integral accumulator is clamped to `±CLIMATE_INTEGRAL_LIMIT`.
pub const CLIMATE_INTEGRAL_LIMIT: i32 = 1000;
/// PI output is clamped to `±CLIMATE_OUTPUT_LIMIT`.
pub const CLIMATE_OUTPUT_LIMIT: i32 = 300;
/// Upper `|pi|` bounds (inclusive) of fan stages 0, 1 and 2.
pub const FAN_STAGE_BOUNDS: [i32; 3] = [50, 100, 200];
pub const MAX_FAN_STAGE: u8 = 3;
/// Blend goes full cold when `pi < BLEND_COLD_BELOW`.
pub const BLEND_COLD_BELOW: i32 = -50;
/// AC forced on when `setpoint - cabin < CLIMATE_AC_ERROR_X10`.
pub const CLIMATE_AC_ERROR_X10: i32 = -20;
/// AC forced on when `humidity > CLIMATE_HUMIDITY_HIGH_PCT`.
pub const CLIMATE_HUMIDITY_HIGH_PCT: u8 = 70;
/// AC forced on when `ambient > setpoint + CLIMATE_AMBIENT_MARGIN_X10`.
pub const CLIMATE_AMBIENT_MARGIN_X10: i32 = 50;
