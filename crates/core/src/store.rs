//! Persistence seam.
//!
//! The engine itself does no I/O. Hosts load a [`ClinicState`] at startup, build a
//! [`crate::Clinic`] from it, and save [`crate::Clinic::snapshot`] after each change.
//!
//! [`JsonFileStore`] keeps the whole state in one pretty-printed JSON file:
//!
//! ```text
//! <data_dir>/
//! ├── clinic.json
//! └── files/        # uploaded documents, see clinic_files
//! ```

use crate::clinic::ClinicState;
use crate::constants::CLINIC_STATE_FILENAME;
use crate::{ClinicError, ClinicResult};
use std::fs;
use std::path::{Path, PathBuf};

pub trait ClinicStore {
    /// Returns the saved state, or `None` if nothing has been saved yet.
    fn load(&self) -> ClinicResult<Option<ClinicState>>;

    fn save(&self, state: &ClinicState) -> ClinicResult<()>;
}

#[derive(Clone, Debug)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `data_dir`, creating the directory if needed.
    pub fn new(data_dir: impl Into<PathBuf>) -> ClinicResult<Self> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(ClinicError::StorageDirCreation)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(CLINIC_STATE_FILENAME)
    }
}

impl ClinicStore for JsonFileStore {
    fn load(&self) -> ClinicResult<Option<ClinicState>> {
        let path = self.state_path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no saved state at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(ClinicError::FileRead(e)),
        };
        let state = serde_json::from_str(&contents).map_err(ClinicError::Deserialization)?;
        Ok(Some(state))
    }

    /// Writes to a sibling temp file first and renames it over the old state, so a failed
    /// write never leaves a truncated `clinic.json`.
    fn save(&self, state: &ClinicState) -> ClinicResult<()> {
        let json = serde_json::to_string_pretty(state).map_err(ClinicError::Serialization)?;
        let path = self.state_path();
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(ClinicError::FileWrite)?;
        fs::rename(&tmp, &path).map_err(ClinicError::FileWrite)?;
        tracing::debug!(
            "saved {} patients to {}",
            state.patients.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::NoDocumentConverter;
    use crate::{Clinic, ClinicConfig};
    use tempfile::TempDir;

    fn populated() -> Clinic {
        let mut clinic = Clinic::new(ClinicConfig::standard(2026), Box::new(NoDocumentConverter));
        clinic
            .register_patient("123", "Ana Pérez", "F", "15/6/1990", "3001234567")
            .unwrap();
        clinic
            .register_patient("456", "Luis Gómez", "M", "2/11/1975", "3109876543")
            .unwrap();
        clinic
            .schedule_appointment("123", "enero", 10, 10, None)
            .unwrap();
        clinic
            .schedule_appointment("456", "enero", 10, 15, Some("renal"))
            .unwrap();
        clinic.confirm_appointment("456").unwrap();
        clinic
    }

    #[test]
    fn load_without_saved_state_is_none() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path().join("data")).unwrap();
        assert!(store.data_dir().is_dir());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_restores_state() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path()).unwrap();
        let state = populated().snapshot();

        store.save(&state).unwrap();
        let loaded = store.load().unwrap().expect("state saved");
        assert_eq!(loaded, state);
        assert!(!store.state_path().with_extension("json.tmp").exists());

        let clinic = Clinic::from_state(
            ClinicConfig::standard(2026),
            Box::new(NoDocumentConverter),
            loaded,
        )
        .unwrap();
        let schedule = clinic.daily_schedule("enero", 10).unwrap();
        assert!(schedule[1].is_some());
        assert!(schedule[6].is_some());
    }

    #[test]
    fn corrupt_state_is_reported() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path()).unwrap();
        fs::write(store.state_path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(ClinicError::Deserialization(_))));
    }
}
