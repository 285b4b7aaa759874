//! GPIO / peripheral pin assignments for the HomeSentry main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Status LEDs
// ---------------------------------------------------------------------------

/// Digital output: dashboard-controlled status LED (active HIGH).
pub const STATUS_LED_GPIO: i32 = 11;
/// Digital output: motion indicator LED (active HIGH).
pub const MOTION_LED_GPIO: i32 = 4;
/// Digital output: flame indicator LED (active HIGH).
pub const FLAME_LED_GPIO: i32 = 3;

// ---------------------------------------------------------------------------
// Alarm buzzer
// ---------------------------------------------------------------------------

/// Digital output: piezo buzzer for the gas alarm (active HIGH).
pub const BUZZER_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Sensors — Digital
// ---------------------------------------------------------------------------

/// DHT11 climate sensor — bidirectional single-wire data line.
pub const CLIMATE_DATA_GPIO: i32 = 10;

/// IR flame sensor module — digital output, active LOW (LOW = flame present).
pub const FLAME_SENSE_GPIO: i32 = 16;

/// PIR motion sensor — digital output, active HIGH (HIGH = motion present).
pub const MOTION_SENSE_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Sensors — Analog (ADC1)
// ---------------------------------------------------------------------------

/// MQ-2 gas sensor — analog voltage via resistive divider.
pub const GAS_ADC_GPIO: i32 = 26;
/// ADC1 channel for the gas sensor input.
pub const GAS_ADC_CHANNEL: u32 = 5;
