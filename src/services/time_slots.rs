use chrono::{Datelike, LocalResult, NaiveDate, TimeZone, Weekday};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::warn;

/// The timezone the coach's availability is defined in. Submitted times are
/// always expressed in this zone, never in the visitor's.
pub const REFERENCE_TIMEZONE: Tz = chrono_tz::Europe::Stockholm;

/// Consultation availability: 13:00-17:00 Stockholm time in half-hour steps.
pub const AVAILABILITY: [(u32, u32); 9] = [
    (13, 0),
    (13, 30),
    (14, 0),
    (14, 30),
    (15, 0),
    (15, 30),
    (16, 0),
    (16, 30),
    (17, 0),
];

/// One bookable slot, rendered for display: the Stockholm wall-clock label,
/// its equivalent in the visitor's timezone, and whether both should be
/// shown (they collapse to one when the labels coincide).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotDisplay {
    pub reference_label: String,
    pub local_label: String,
    pub show_both: bool,
}

/// Project the fixed Stockholm availability window onto a calendar date and
/// convert each point into the visitor's timezone.
///
/// Conversion goes through the absolute instant, so the local labels come
/// out right on either side of a daylight-saving transition. Callers must
/// regenerate the slots whenever the selected date changes.
pub fn generate_slots(date: NaiveDate, visitor_tz: Tz) -> Vec<SlotDisplay> {
    let mut slots = Vec::with_capacity(AVAILABILITY.len());

    for &(hour, minute) in AVAILABILITY.iter() {
        let Some(naive) = date.and_hms_opt(hour, minute, 0) else {
            continue;
        };

        // Resolve the Stockholm wall-clock time to an absolute instant.
        // During the fall-back hour both readings are valid; take the first.
        let reference_time = match REFERENCE_TIMEZONE.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(dt, _) => dt,
            LocalResult::None => {
                warn!("Skipping slot {}:{:02} on {}: no such local time", hour, minute, date);
                continue;
            }
        };

        let local_time = reference_time.with_timezone(&visitor_tz);

        let reference_label = format_slot_label(&reference_time);
        let local_label = format_slot_label(&local_time);
        let show_both = visitor_tz != REFERENCE_TIMEZONE && reference_label != local_label;

        slots.push(SlotDisplay {
            reference_label,
            local_label,
            show_both,
        });
    }

    slots
}

/// Consultations can be booked for today or later, on weekdays only.
pub fn is_bookable_date(date: NaiveDate, today: NaiveDate) -> bool {
    date >= today && !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

// 12-hour clock label, e.g. "1:30 PM"
fn format_slot_label<T: TimeZone>(time: &chrono::DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    time.format("%-I:%M %p").to_string()
}
