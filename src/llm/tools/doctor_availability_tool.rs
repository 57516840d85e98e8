use crate::error::Result;
use crate::llm::tools::tool::required_str;
use crate::llm::tools::{LlmTool, ToolDescriptor};
use crate::schedule::{Availability, ScheduleStore};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub const TOOL_NAME: &str = "is_doctor_available";

/// Checks whether a doctor has an open slot at a given date and time.
///
/// The model supplies the doctor's full name, an ISO date and an `HH:MM` time. Negative
/// answers are ordinary results with a `reason` the model can relay to the patient.
#[derive(Clone)]
pub struct DoctorAvailabilityTool {
    store: Arc<ScheduleStore>,
}

impl DoctorAvailabilityTool {
    pub fn new(store: Arc<ScheduleStore>) -> Self {
        Self { store }
    }
}

impl LlmTool for DoctorAvailabilityTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let doctor_name = required_str(args, "doctor_name")?;
        let requested_date = required_str(args, "requested_date")?;
        let requested_time = required_str(args, "requested_time")?;

        info!(
            doctor = doctor_name,
            date = requested_date,
            time = requested_time,
            "Checking doctor availability"
        );

        let outcome = self.store.check_availability(doctor_name, requested_date, requested_time);

        let mut result = json!({
            "doctor_name": doctor_name,
            "requested_date": requested_date,
            "requested_time": requested_time,
            "available": outcome.is_available(),
            "reason": outcome.reason(),
        });

        if let Availability::Available { slot, .. } = &outcome {
            result["matched_slot"] = json!(slot);
        }
        if let Ok(date) = NaiveDate::parse_from_str(requested_date, "%Y-%m-%d") {
            result["weekday"] = json!(date.format("%A").to_string());
        }

        Ok(result)
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            TOOL_NAME,
            "Check if a doctor is available on a given date and time.",
            json!({
                "type": "object",
                "properties": {
                    "doctor_name": {
                        "type": "string",
                        "description": "Full name of the doctor to check availability for. Example: 'Jamil Ahmad'"
                    },
                    "requested_date": {
                        "type": "string",
                        "description": "Date of the requested appointment in YYYY-MM-DD format. Example: '2025-01-21'"
                    },
                    "requested_time": {
                        "type": "string",
                        "description": "Time of the requested appointment in HH:MM format (24-hour clock). Example: '09:00'"
                    }
                },
                "required": ["doctor_name", "requested_date", "requested_time"]
            }),
        )
    }
}
