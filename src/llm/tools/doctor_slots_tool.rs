use crate::error::Result;
use crate::llm::tools::tool::required_str;
use crate::llm::tools::{LlmTool, ToolDescriptor};
use crate::schedule::ScheduleStore;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

pub const TOOL_NAME: &str = "list_available_slots";

/// Lists a doctor's open slots on a date so the model can offer alternatives.
#[derive(Clone)]
pub struct DoctorSlotsTool {
    store: Arc<ScheduleStore>,
}

impl DoctorSlotsTool {
    pub fn new(store: Arc<ScheduleStore>) -> Self {
        Self { store }
    }
}

impl LlmTool for DoctorSlotsTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let doctor_name = required_str(args, "doctor_name")?;
        let requested_date = required_str(args, "requested_date")?;

        let schedules = self.store.slots_on(doctor_name, requested_date);

        Ok(json!({
            "doctor_name": doctor_name,
            "requested_date": requested_date,
            "doctor_found": self.store.has_doctor(doctor_name),
            "schedules": schedules,
        }))
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            TOOL_NAME,
            "List the open appointment slots a doctor has on a given date.",
            json!({
                "type": "object",
                "properties": {
                    "doctor_name": {
                        "type": "string",
                        "description": "Full name of the doctor. Example: 'Jamil Ahmad'"
                    },
                    "requested_date": {
                        "type": "string",
                        "description": "Date in YYYY-MM-DD format. Example: '2025-01-21'"
                    }
                },
                "required": ["doctor_name", "requested_date"]
            }),
        )
    }
}
