use super::loader::load_directory;
use super::model::{Availability, Directory, DoctorSlots};
use super::slot::MatchMode;
use crate::error::{ClinicError, Result};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

/// Load-once schedule store shared by the availability tools.
///
/// The file is read when the store is opened and again only when [`reload`] is called;
/// queries never touch the disk.
///
/// [`reload`]: ScheduleStore::reload
pub struct ScheduleStore {
    path: Option<PathBuf>,
    match_mode: MatchMode,
    directory: RwLock<Directory>,
}

/// Summary of a doctor returned by specialty searches.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DoctorSummary {
    pub doctor_name: String,
    pub specialty: String,
    pub dates: Vec<String>,
}

impl ScheduleStore {
    /// Open a store backed by the schedule file at `path`.
    pub fn open(path: impl Into<PathBuf>, match_mode: MatchMode) -> Result<Self> {
        let path = path.into();
        let directory = load_directory(&path)?;
        info!(
            path = %path.display(),
            doctors = directory.len(),
            match_mode = %match_mode,
            "Doctor schedule loaded"
        );

        Ok(Self {
            path: Some(path),
            match_mode,
            directory: RwLock::new(directory),
        })
    }

    /// Build a store around an already-parsed directory. Such a store cannot reload.
    pub fn from_directory(directory: Directory, match_mode: MatchMode) -> Self {
        Self {
            path: None,
            match_mode,
            directory: RwLock::new(directory),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    /// Re-read the backing file and swap in the new directory.
    ///
    /// On failure the previous directory stays in place. Returns the number of doctors
    /// now loaded.
    pub fn reload(&self) -> Result<usize> {
        let path = self.path.as_ref().ok_or_else(|| {
            ClinicError::ConfigError("Schedule store has no backing file to reload".to_string())
        })?;

        let directory = match load_directory(path) {
            Ok(directory) => directory,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Schedule reload failed, keeping previous data"
                );
                return Err(e);
            }
        };

        let count = directory.len();
        *self.directory.write().unwrap_or_else(PoisonError::into_inner) = directory;
        info!(path = %path.display(), doctors = count, "Doctor schedule reloaded");
        Ok(count)
    }

    pub fn doctor_count(&self) -> usize {
        self.read().len()
    }

    pub fn check_availability(&self, doctor_name: &str, date: &str, time: &str) -> Availability {
        debug!(doctor = doctor_name, date = date, time = time, "Checking availability");
        let outcome = self.read().check_availability(doctor_name, date, time, self.match_mode);
        debug!(doctor = doctor_name, reason = outcome.reason(), "Availability checked");
        outcome
    }

    pub fn is_available(&self, doctor_name: &str, date: &str, time: &str) -> bool {
        self.check_availability(doctor_name, date, time).is_available()
    }

    pub fn has_doctor(&self, doctor_name: &str) -> bool {
        !self.read().find_by_name(doctor_name).is_empty()
    }

    pub fn slots_on(&self, doctor_name: &str, date: &str) -> Vec<DoctorSlots> {
        self.read().slots_on(doctor_name, date)
    }

    pub fn doctors_with_specialty(&self, specialty: &str) -> Vec<DoctorSummary> {
        self.read()
            .find_by_specialty(specialty)
            .into_iter()
            .map(|doctor| DoctorSummary {
                doctor_name: doctor.full_name(),
                specialty: doctor.specialty.clone(),
                dates: doctor.dates().map(String::from).collect(),
            })
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, Directory> {
        self.directory.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::slot::split_slots;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "first_name,last_name,specialty,date,available_slots";

    fn schedule_file(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn add(directory: &mut Directory, first: &str, last: &str, specialty: &str, date: &str) {
        directory.insert_row(first, last, specialty, date, split_slots("09:00-09:30"));
    }

    fn rewrite(file: &NamedTempFile, rows: &[&str]) {
        let mut contents = format!("{}\n", HEADER);
        for row in rows {
            contents.push_str(row);
            contents.push('\n');
        }
        std::fs::write(file.path(), contents).unwrap();
    }

    #[test]
    fn test_open_and_query() {
        let file =
            schedule_file(&["Jamil,Ahmad,Cardiology,2025-01-21,\"09:00-09:30,09:30-10:00\""]);
        let store = ScheduleStore::open(file.path(), MatchMode::Structured).unwrap();

        assert_eq!(store.doctor_count(), 1);
        assert!(store.has_doctor("Jamil Ahmad"));
        assert!(!store.has_doctor("Unknown Doctor"));
        assert!(store.is_available("Jamil Ahmad", "2025-01-21", "09:00"));
        assert!(!store.is_available("Jamil Ahmad", "2025-01-21", "11:00"));
        assert!(!store.is_available("Jamil Ahmad", "2025-01-22", "09:00"));
        assert!(!store.is_available("Unknown Doctor", "2025-01-21", "09:00"));
    }

    #[test]
    fn test_queries_do_not_reread_the_file() {
        let file = schedule_file(&["Jamil,Ahmad,Cardiology,2025-01-21,09:00-09:30"]);
        let store = ScheduleStore::open(file.path(), MatchMode::Structured).unwrap();

        rewrite(&file, &["Jamil,Ahmad,Cardiology,2025-01-21,17:00-17:30"]);

        assert!(store.is_available("Jamil Ahmad", "2025-01-21", "09:00"));
        assert!(!store.is_available("Jamil Ahmad", "2025-01-21", "17:00"));
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let file = schedule_file(&["Jamil,Ahmad,Cardiology,2025-01-21,09:00-09:30"]);
        let store = ScheduleStore::open(file.path(), MatchMode::Structured).unwrap();

        rewrite(
            &file,
            &[
                "Jamil,Ahmad,Cardiology,2025-01-21,17:00-17:30",
                "Sara,Khan,Dermatology,2025-01-21,10:00-10:30",
            ],
        );

        assert_eq!(store.reload().unwrap(), 2);
        assert!(!store.is_available("Jamil Ahmad", "2025-01-21", "09:00"));
        assert!(store.is_available("Jamil Ahmad", "2025-01-21", "17:00"));
        assert!(store.is_available("Sara Khan", "2025-01-21", "10:00"));
    }

    #[test]
    fn test_failed_reload_keeps_previous_directory() {
        let file = schedule_file(&["Jamil,Ahmad,Cardiology,2025-01-21,09:00-09:30"]);
        let store = ScheduleStore::open(file.path(), MatchMode::Structured).unwrap();

        rewrite(&file, &["Jamil,Ahmad"]);

        assert!(store.reload().is_err());
        assert!(store.is_available("Jamil Ahmad", "2025-01-21", "09:00"));
    }

    #[test]
    fn test_reload_without_backing_file() {
        let store = ScheduleStore::from_directory(Directory::new(), MatchMode::Structured);
        assert!(store.path().is_none());
        assert!(matches!(store.reload(), Err(ClinicError::ConfigError(_))));
    }

    #[test]
    fn test_open_missing_file_fails() {
        let result = ScheduleStore::open("/definitely/not/here.csv", MatchMode::Structured);
        assert!(matches!(result, Err(ClinicError::IoError(_))));
    }

    #[test]
    fn test_match_mode_is_applied() {
        let mut directory = Directory::new();
        let slots = split_slots("19:00-19:30");
        directory.insert_row("Sara", "Khan", "Dermatology", "2025-01-21", slots);

        let structured = ScheduleStore::from_directory(directory.clone(), MatchMode::Structured);
        let substring = ScheduleStore::from_directory(directory, MatchMode::Substring);

        assert!(!structured.is_available("Sara Khan", "2025-01-21", "9:00"));
        assert!(substring.is_available("Sara Khan", "2025-01-21", "9:00"));
        assert_eq!(substring.match_mode(), MatchMode::Substring);
    }

    #[test]
    fn test_doctors_with_specialty() {
        let mut directory = Directory::new();
        add(&mut directory, "Jamil", "Ahmad", "Cardiology", "2025-01-21");
        add(&mut directory, "Jamil", "Ahmad", "Cardiology", "2025-01-22");
        let slots = split_slots("19:00-19:30");
        directory.insert_row("Sara", "Khan", "Dermatology", "2025-01-21", slots);
        let store = ScheduleStore::from_directory(directory, MatchMode::Structured);

        let found = store.doctors_with_specialty("CARDIO");
        assert_eq!(
            found,
            vec![DoctorSummary {
                doctor_name: "Jamil Ahmad".to_string(),
                specialty: "Cardiology".to_string(),
                dates: vec!["2025-01-21".to_string(), "2025-01-22".to_string()],
            }]
        );
        assert!(store.doctors_with_specialty("Oncology").is_empty());
    }
}
