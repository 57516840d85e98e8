pub mod doctor_availability_tool;
pub mod doctor_slots_tool;
pub mod specialty_search_tool;
mod tool;

pub use doctor_availability_tool::DoctorAvailabilityTool;
pub use doctor_slots_tool::DoctorSlotsTool;
pub use specialty_search_tool::SpecialtySearchTool;
pub use tool::{required_str, FunctionDescriptor, LlmTool, ToolDescriptor};

use crate::schedule::ScheduleStore;
use std::sync::Arc;

/// Every tool backed by the schedule store, in the order they are offered to the model.
pub fn schedule_tools(store: Arc<ScheduleStore>) -> Vec<Box<dyn LlmTool>> {
    vec![
        Box::new(DoctorAvailabilityTool::new(store.clone())),
        Box::new(DoctorSlotsTool::new(store.clone())),
        Box::new(SpecialtySearchTool::new(store)),
    ]
}
