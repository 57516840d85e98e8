use crate::error::Result;
use crate::llm::tools::tool::required_str;
use crate::llm::tools::{LlmTool, ToolDescriptor};
use crate::schedule::ScheduleStore;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

pub const TOOL_NAME: &str = "find_doctors_by_specialty";

/// Finds doctors whose specialty contains the requested text (case-insensitive), so the
/// model can recommend someone with similar expertise when a doctor is fully booked.
#[derive(Clone)]
pub struct SpecialtySearchTool {
    store: Arc<ScheduleStore>,
}

impl SpecialtySearchTool {
    pub fn new(store: Arc<ScheduleStore>) -> Self {
        Self { store }
    }
}

impl LlmTool for SpecialtySearchTool {
    fn run(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let specialty = required_str(args, "specialty")?;
        let doctors = self.store.doctors_with_specialty(specialty);

        Ok(json!({
            "specialty": specialty,
            "count": doctors.len(),
            "doctors": doctors,
        }))
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::function(
            TOOL_NAME,
            "Find doctors whose specialty matches the given text, with the dates they have \
             open slots.",
            json!({
                "type": "object",
                "properties": {
                    "specialty": {
                        "type": "string",
                        "description": "Specialty or part of it. Example: 'Cardiology'"
                    }
                },
                "required": ["specialty"]
            }),
        )
    }
}
