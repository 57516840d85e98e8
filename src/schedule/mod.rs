//! Doctor schedule: loading the CSV directory and answering availability questions.

pub mod loader;
pub mod model;
pub mod slot;
pub mod store;

pub use loader::{load_directory, parse_directory};
pub use model::{Availability, Directory, Doctor, DoctorId, DoctorSlots};
pub use slot::{MatchMode, Slot, TimeRange};
pub use store::{DoctorSummary, ScheduleStore};
