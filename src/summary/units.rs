//! Magnitude-scaled formatting for sizes and rates.
//!
//! Bytes and instructions share the same 1024-based prefixes; only the base
//! label differs.

use crate::trace::event::CategoryDescriptor;

const KILO: f64 = 1024.0;
const MEGA: f64 = KILO * 1024.0;
const GIGA: f64 = MEGA * 1024.0;

/// Minimum width of the numeric part of a formatted quantity.
pub const FIELD_WIDTH: usize = 8;

/// Printed in place of a rate when the average duration is zero.
pub const INFINITE_RATE_TOKEN: &str = "inf";

/// Base unit of a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Bytes,
    Instructions,
}

impl Unit {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bytes => "B",
            Self::Instructions => "insn",
        }
    }

    pub const fn for_descriptor(descriptor: &CategoryDescriptor) -> Self {
        if descriptor.instruction_oriented {
            Self::Instructions
        } else {
            Self::Bytes
        }
    }
}

/// Binary magnitude prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    One,
    Kilo,
    Mega,
    Giga,
}

impl Scale {
    /// Picks the largest prefix that keeps `value` at or above 1.
    pub fn for_value(value: f64) -> Self {
        if value < KILO {
            Self::One
        } else if value < MEGA {
            Self::Kilo
        } else if value < GIGA {
            Self::Mega
        } else {
            Self::Giga
        }
    }

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::One => "",
            Self::Kilo => "K",
            Self::Mega => "M",
            Self::Giga => "G",
        }
    }

    pub const fn divisor(self) -> f64 {
        match self {
            Self::One => 1.0,
            Self::Kilo => KILO,
            Self::Mega => MEGA,
            Self::Giga => GIGA,
        }
    }
}

/// Formats `value` as e.g. `"   2.000KB"`.
pub fn format_quantity(value: f64, unit: Unit) -> String {
    let scale = Scale::for_value(value);
    format!(
        "{:>width$.3}{}{}",
        value / scale.divisor(),
        scale.prefix(),
        unit.label(),
        width = FIELD_WIDTH,
    )
}

/// Formats a per-second rate; `None` renders the infinite-rate sentinel.
pub fn format_rate(rate: Option<f64>, unit: Unit) -> String {
    match rate {
        Some(value) => format!("{}/s", format_quantity(value, unit)),
        None => format!(
            "{:>width$}{}/s",
            INFINITE_RATE_TOKEN,
            unit.label(),
            width = FIELD_WIDTH,
        ),
    }
}
