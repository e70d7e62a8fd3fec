//! Four-character labels for menus and edit values

use core::fmt::Write;

use super::context::EditField;
use crate::traits::DisplayText;

pub const LABEL_TIME: &str = "TIME";
pub const LABEL_SCHEDULE: &str = "SCHD";
pub const LABEL_NAP: &str = "NAP";
pub const LABEL_STOP: &str = "STOP";
pub const LABEL_LOCK: &str = "LOCK";
pub const LABEL_UNLOCK: &str = "UNLK";
pub const LABEL_BRIGHTNESS: &str = "BRIT";
pub const LABEL_BACK: &str = "BACK";
pub const LABEL_START: &str = "STRT";
pub const LABEL_DISPLAY: &str = "DISP";
pub const LABEL_LED: &str = "LED";

/// `08PM` style 12-hour label with the leading zero kept
pub fn hours_label(hour: u8) -> DisplayText {
    let hour = hour % 24;
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    let mut text = DisplayText::new();
    let _ = write!(text, "{:02}{}", hour12, if hour < 12 { "AM" } else { "PM" });
    text
}

/// `M 05`
pub fn minutes_label(minute: u8) -> DisplayText {
    let mut text = DisplayText::new();
    let _ = write!(text, "M {:02}", minute % 60);
    text
}

/// Right-aligned minutes, ` 120`
pub fn duration_label(minutes: u16) -> DisplayText {
    let mut text = DisplayText::new();
    let _ = write!(text, "{:>4}", minutes);
    text
}

/// Two-digit level, `  07`
pub fn level_label(level: u8) -> DisplayText {
    let mut text = DisplayText::new();
    let _ = write!(text, "  {:02}", level);
    text
}

/// Right-aligned percentage, ` 50%`
pub fn percent_label(percent: u8) -> DisplayText {
    let mut text = DisplayText::new();
    let _ = write!(text, "{:>3}%", percent);
    text
}

/// Label for an edit field's current value
pub fn field_label(field: EditField, value: u16) -> DisplayText {
    match field {
        EditField::Hour | EditField::SleepHour | EditField::QuietHour => hours_label(value as u8),
        EditField::Minute | EditField::SleepMinute | EditField::QuietMinute => {
            minutes_label(value as u8)
        }
        EditField::NapDuration => duration_label(value),
        EditField::DisplayLevel => level_label(value as u8),
        EditField::LedPercent => percent_label(value as u8),
    }
}
