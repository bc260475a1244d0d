use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::services::time_slots::REFERENCE_TIMEZONE;

/// A time slot the visitor picked: the Stockholm wall-clock label (the
/// canonical value) plus its equivalent in the visitor's own timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSelection {
    pub reference_label: String,
    pub local_label: String,
}

/// In-progress consultation booking.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub name: String,
    pub email: String,
    pub message: String,
    pub selected_date: Option<NaiveDate>,
    pub selected_slot: Option<SlotSelection>,
}

/// Wire shape accepted by the consultation intake endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub name: String,
    pub email: String,
    pub preferred_date: String,
    pub preferred_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BookingForm {
    /// Build the submission payload, or `None` while no date or slot is
    /// selected. Validation runs separately; this is pure assembly.
    ///
    /// The Stockholm label is always what gets transmitted. For visitors in
    /// another timezone the local equivalent is appended for context, so the
    /// coach reads an unambiguous time either way.
    pub fn payload(&self, visitor_tz: Tz) -> Option<BookingPayload> {
        let date = self.selected_date?;
        let slot = self.selected_slot.as_ref()?;

        let preferred_time =
            if visitor_tz == REFERENCE_TIMEZONE || slot.local_label == slot.reference_label {
                slot.reference_label.clone()
            } else {
                format!(
                    "{} (Swedish time) / {} ({})",
                    slot.reference_label,
                    slot.local_label,
                    visitor_tz.name()
                )
            };

        Some(BookingPayload {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            preferred_date: date.format("%A, %B %-d, %Y").to_string(),
            preferred_time,
            message: crate::models::application::optional_text(&self.message),
        })
    }
}
