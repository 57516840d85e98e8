use super::slot::{parse_time, MatchMode, Slot};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Identifier assigned to each doctor in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DoctorId(pub usize);

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

/// A doctor and the open slots for each scheduled date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    /// Date string (as written in the file) to slots, in file order.
    pub available_slots: BTreeMap<String, Vec<Slot>>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn slots_on(&self, date: &str) -> Option<&[Slot]> {
        self.available_slots.get(date).map(Vec::as_slice)
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.available_slots.keys().map(String::as_str)
    }
}

/// Outcome of an availability check. Only `Available` is a positive answer; the rest
/// explain why the answer is negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available { doctor: DoctorId, slot: String },
    DoctorNotFound,
    NoScheduleOnDate,
    NoMatchingSlot,
    UnrecognizedTime,
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available { .. })
    }

    /// Short machine-readable reason, used in tool output.
    pub fn reason(&self) -> &'static str {
        match self {
            Availability::Available { .. } => "available",
            Availability::DoctorNotFound => "doctor_not_found",
            Availability::NoScheduleOnDate => "no_schedule_on_date",
            Availability::NoMatchingSlot => "no_matching_slot",
            Availability::UnrecognizedTime => "unrecognized_time",
        }
    }

    // Ordering used to pick the most informative negative answer across namesakes.
    fn specificity(&self) -> u8 {
        match self {
            Availability::Available { .. } => 4,
            Availability::NoMatchingSlot => 3,
            Availability::UnrecognizedTime => 2,
            Availability::NoScheduleOnDate => 1,
            Availability::DoctorNotFound => 0,
        }
    }
}

/// Slots of one doctor on one date, trimmed for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoctorSlots {
    pub doctor: DoctorId,
    pub doctor_name: String,
    pub specialty: String,
    pub date: String,
    pub slots: Vec<String>,
}

/// In-memory directory of doctors, indexed by full name.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    doctors: Vec<Doctor>,
    by_name: HashMap<String, Vec<DoctorId>>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one schedule row.
    ///
    /// A row joins an existing doctor when both full name and specialty match; otherwise a
    /// new doctor is created. The slots for `date` replace whatever that doctor already had
    /// for the same date.
    pub fn insert_row(
        &mut self,
        first_name: &str,
        last_name: &str,
        specialty: &str,
        date: &str,
        slots: Vec<Slot>,
    ) -> DoctorId {
        let full_name = format!("{} {}", first_name, last_name);
        let existing = self
            .by_name
            .get(&full_name)
            .and_then(|ids| ids.iter().find(|id| self.doctors[id.0].specialty == specialty))
            .copied();

        let id = match existing {
            Some(id) => id,
            None => {
                let id = DoctorId(self.doctors.len());
                self.doctors.push(Doctor {
                    id,
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                    specialty: specialty.to_string(),
                    available_slots: BTreeMap::new(),
                });
                self.by_name.entry(full_name).or_default().push(id);
                id
            }
        };

        self.doctors[id.0].available_slots.insert(date.to_string(), slots);
        id
    }

    pub fn len(&self) -> usize {
        self.doctors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doctors.is_empty()
    }

    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn get(&self, id: DoctorId) -> Option<&Doctor> {
        self.doctors.get(id.0)
    }

    /// All doctors with exactly this full name, in load order.
    pub fn find_by_name(&self, full_name: &str) -> Vec<&Doctor> {
        self.by_name
            .get(full_name)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    /// Case-insensitive substring search on specialty.
    pub fn find_by_specialty(&self, query: &str) -> Vec<&Doctor> {
        let needle = query.trim().to_lowercase();
        self.doctors
            .iter()
            .filter(|d| d.specialty.to_lowercase().contains(&needle))
            .collect()
    }

    /// Check whether `full_name` has a slot at `time` on `date`.
    ///
    /// Name and date are exact matches. Slots are scanned in file order and the first
    /// match wins. With several namesakes the first available one wins.
    pub fn check_availability(
        &self,
        full_name: &str,
        date: &str,
        time: &str,
        mode: MatchMode,
    ) -> Availability {
        let mut best = Availability::DoctorNotFound;

        for doctor in self.find_by_name(full_name) {
            let outcome = check_doctor(doctor, date, time, mode);
            if outcome.is_available() {
                return outcome;
            }
            if outcome.specificity() > best.specificity() {
                best = outcome;
            }
        }

        best
    }

    pub fn is_available(&self, full_name: &str, date: &str, time: &str, mode: MatchMode) -> bool {
        self.check_availability(full_name, date, time, mode).is_available()
    }

    /// Slots for each doctor named `full_name` who has an entry for `date`.
    pub fn slots_on(&self, full_name: &str, date: &str) -> Vec<DoctorSlots> {
        self.find_by_name(full_name)
            .into_iter()
            .filter_map(|doctor| {
                let slots = doctor.slots_on(date)?;
                Some(DoctorSlots {
                    doctor: doctor.id,
                    doctor_name: doctor.full_name(),
                    specialty: doctor.specialty.clone(),
                    date: date.to_string(),
                    slots: slots
                        .iter()
                        .map(|s| s.label().to_string())
                        .filter(|s| !s.is_empty())
                        .collect(),
                })
            })
            .collect()
    }
}

fn check_doctor(doctor: &Doctor, date: &str, time: &str, mode: MatchMode) -> Availability {
    let Some(slots) = doctor.slots_on(date) else {
        return Availability::NoScheduleOnDate;
    };

    if mode == MatchMode::Structured && parse_time(time).is_none() {
        return Availability::UnrecognizedTime;
    }

    slots
        .iter()
        .find(|slot| slot.matches(time, mode))
        .map(|slot| Availability::Available {
            doctor: doctor.id,
            slot: slot.label().to_string(),
        })
        .unwrap_or(Availability::NoMatchingSlot)
}
