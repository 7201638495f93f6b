//! Household profile: intake validation, durable storage, and the session
//! object that owns the profile between intake and reset.

pub mod domain;
pub mod router;
mod session;
mod store;
mod validation;

pub use domain::{
    BedroomPreference, ContactMethod, EmploymentStatus, HouseholdProfile, MoveTimeline,
};
pub use router::{profile_router, MatchesView, ProfileRoutes};
pub use session::{ProfileError, ProfileSession};
pub use store::{
    FileProfileStore, InMemoryProfileStore, ProfileStore, ProfileStoreError, PROFILE_NAMESPACE,
};
pub use validation::{
    validate_intake, IntakeStep, IntakeViolation, MAX_HOUSEHOLD_SIZE, MIN_HOUSEHOLD_SIZE,
};
