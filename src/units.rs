//! Unit constants for data sizes, rates, distances and time.
//!
//! Data sizes are expressed in **bits**, so `4.0 * MEGABYTE` is a packet size
//! in bits and `200.0 * MEGABIT / SECOND` is a data rate in bits per second.
//! Distances are in meters and times in seconds.

pub const BIT: f64 = 1.0;
pub const BYTE: f64 = 8.0 * BIT;

// SI (1000-based)
pub const KILOBIT: f64 = 1000.0 * BIT;
pub const KILOBYTE: f64 = 1000.0 * BYTE;
pub const MEGABIT: f64 = 1000.0 * KILOBIT;
pub const MEGABYTE: f64 = 1000.0 * KILOBYTE;
pub const GIGABIT: f64 = 1000.0 * MEGABIT;
pub const GIGABYTE: f64 = 1000.0 * MEGABYTE;
pub const TERABIT: f64 = 1000.0 * GIGABIT;
pub const TERABYTE: f64 = 1000.0 * GIGABYTE;
pub const PETABIT: f64 = 1000.0 * TERABIT;
pub const PETABYTE: f64 = 1000.0 * TERABYTE;

// Binary (1024-based)
pub const KIBIBYTE: f64 = 1024.0 * BYTE;
pub const MEBIBYTE: f64 = 1024.0 * KIBIBYTE;
pub const GIBIBYTE: f64 = 1024.0 * MEBIBYTE;
pub const TEBIBYTE: f64 = 1024.0 * GIBIBYTE;
pub const PEBIBYTE: f64 = 1024.0 * TEBIBYTE;

pub const METER: f64 = 1.0;
pub const KILOMETER: f64 = 1000.0 * METER;

pub const SECOND: f64 = 1.0;
pub const MINUTE: f64 = 60.0 * SECOND;
pub const HOUR: f64 = 60.0 * MINUTE;
pub const DAY: f64 = 24.0 * HOUR;
pub const WEEK: f64 = 7.0 * DAY;
/// Thirty-day month.
pub const MONTH: f64 = 30.0 * DAY;
/// 365-day year.
pub const YEAR: f64 = 365.0 * DAY;

/// Speed of light in vacuum, meters per second.
pub const SPEED_OF_LIGHT_MPS: f64 = 299_792_458.0;
/// Rounded speed of light, handy for back-of-the-envelope checks.
pub const SPEED_OF_LIGHT_APPROX_MPS: f64 = 300_000_000.0;
