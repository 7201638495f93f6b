use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::domain::HouseholdProfile;

/// Fixed key the profile record is stored under.
pub const PROFILE_NAMESPACE: &str = "casa_user_prefs";

/// Durable home for the single household profile record.
pub trait ProfileStore: Send + Sync {
    /// `Ok(None)` means no profile has been saved yet.
    fn load(&self) -> Result<Option<HouseholdProfile>, ProfileStoreError>;
    fn save(&self, profile: &HouseholdProfile) -> Result<(), ProfileStoreError>;
    /// Removing an absent record is not an error.
    fn remove(&self) -> Result<(), ProfileStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("profile record at {path} is unreadable: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("profile storage failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile could not be serialized: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Stores the profile as `<directory>/casa_user_prefs.json`.
#[derive(Debug, Clone)]
pub struct FileProfileStore {
    path: PathBuf,
}

impl FileProfileStore {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            path: directory
                .as_ref()
                .join(format!("{PROFILE_NAMESPACE}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for FileProfileStore {
    fn load(&self) -> Result<Option<HouseholdProfile>, ProfileStoreError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| ProfileStoreError::Corrupt {
                path: self.path.display().to_string(),
                source,
            })
    }

    fn save(&self, profile: &HouseholdProfile) -> Result<(), ProfileStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let encoded = serde_json::to_vec_pretty(profile).map_err(ProfileStoreError::Encode)?;
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, encoded)?;
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), ProfileStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Process-local store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    record: Mutex<Option<HouseholdProfile>>,
}

impl InMemoryProfileStore {
    pub fn with_profile(profile: HouseholdProfile) -> Self {
        Self {
            record: Mutex::new(Some(profile)),
        }
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn load(&self) -> Result<Option<HouseholdProfile>, ProfileStoreError> {
        Ok(self.record.lock().expect("profile mutex poisoned").clone())
    }

    fn save(&self, profile: &HouseholdProfile) -> Result<(), ProfileStoreError> {
        *self.record.lock().expect("profile mutex poisoned") = Some(profile.clone());
        Ok(())
    }

    fn remove(&self) -> Result<(), ProfileStoreError> {
        self.record.lock().expect("profile mutex poisoned").take();
        Ok(())
    }
}
