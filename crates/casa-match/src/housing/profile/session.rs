use std::sync::Arc;

use tracing::{info, warn};

use super::domain::HouseholdProfile;
use super::store::{ProfileStore, ProfileStoreError};
use super::validation::{validate_intake, IntakeViolation};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Store(#[from] ProfileStoreError),
}

/// Owns the session's household profile and keeps the store in step with it.
pub struct ProfileSession {
    store: Arc<dyn ProfileStore>,
    current: Option<HouseholdProfile>,
}

impl ProfileSession {
    /// A session with nothing loaded yet; call [`ProfileSession::restore`] to hydrate.
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Load hook. An unreadable record is discarded and treated as absent.
    pub fn restore(&mut self) -> Result<Option<&HouseholdProfile>, ProfileError> {
        self.current = match self.store.load() {
            Ok(profile) => profile,
            Err(ProfileStoreError::Corrupt { path, source }) => {
                warn!(%path, error = %source, "discarding unreadable profile record");
                self.store.remove()?;
                None
            }
            Err(err) => return Err(err.into()),
        };

        if self.current.is_some() {
            info!("restored household profile");
        }
        Ok(self.current.as_ref())
    }

    /// Save hook: validate a finished intake and persist it.
    pub fn complete_intake(
        &mut self,
        profile: HouseholdProfile,
    ) -> Result<&HouseholdProfile, ProfileError> {
        let profile = validate_intake(profile)?;
        self.store.save(&profile)?;
        info!(household_size = profile.household_size, "household profile saved");
        Ok(self.current.insert(profile))
    }

    pub fn current(&self) -> Option<&HouseholdProfile> {
        self.current.as_ref()
    }

    /// Clear hook: forget the profile and delete the stored record.
    pub fn reset(&mut self) -> Result<(), ProfileError> {
        self.store.remove()?;
        self.current = None;
        info!("household profile cleared");
        Ok(())
    }
}
