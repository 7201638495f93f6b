use super::domain::HouseholdProfile;

pub const MIN_HOUSEHOLD_SIZE: u8 = 1;
pub const MAX_HOUSEHOLD_SIZE: u8 = 15;

/// Intake screens, in the order the applicant completes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeStep {
    Contact,
    Household,
    Finances,
    Preferences,
}

impl IntakeStep {
    pub fn label(&self) -> &'static str {
        match self {
            IntakeStep::Contact => "contact",
            IntakeStep::Household => "household",
            IntakeStep::Finances => "finances",
            IntakeStep::Preferences => "preferences",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntakeViolation {
    #[error("full name is required")]
    MissingName,
    #[error("email address '{0}' is not valid")]
    InvalidEmail(String),
    #[error("a phone number is required for SMS contact")]
    MissingPhone,
    #[error("household size must be between 1 and 15, got {0}")]
    HouseholdSize(u8),
    #[error("minimum rent {min} exceeds maximum rent {max}")]
    RentBounds { min: u32, max: u32 },
}

impl IntakeViolation {
    pub fn step(&self) -> IntakeStep {
        match self {
            IntakeViolation::MissingName
            | IntakeViolation::InvalidEmail(_)
            | IntakeViolation::MissingPhone => IntakeStep::Contact,
            IntakeViolation::HouseholdSize(_) => IntakeStep::Household,
            IntakeViolation::RentBounds { .. } => IntakeStep::Finances,
        }
    }
}

/// Check a completed intake and return the trimmed profile that gets stored.
pub fn validate_intake(mut profile: HouseholdProfile) -> Result<HouseholdProfile, IntakeViolation> {
    profile.full_name = profile.full_name.trim().to_string();
    profile.email = profile.email.trim().to_string();
    profile.phone = profile.phone.trim().to_string();

    if profile.full_name.is_empty() {
        return Err(IntakeViolation::MissingName);
    }
    if !looks_like_email(&profile.email) {
        return Err(IntakeViolation::InvalidEmail(profile.email));
    }
    if profile.contact_method != super::ContactMethod::Email && profile.phone.is_empty() {
        return Err(IntakeViolation::MissingPhone);
    }

    if !(MIN_HOUSEHOLD_SIZE..=MAX_HOUSEHOLD_SIZE).contains(&profile.household_size) {
        return Err(IntakeViolation::HouseholdSize(profile.household_size));
    }

    if profile.max_rent > 0 && profile.min_rent > profile.max_rent {
        return Err(IntakeViolation::RentBounds {
            min: profile.min_rent,
            max: profile.max_rent,
        });
    }

    profile.voucher_details = if profile.has_voucher {
        profile
            .voucher_details
            .map(|details| details.trim().to_string())
            .filter(|details| !details.is_empty())
    } else {
        None
    };

    if !profile.accessibility_required {
        profile.accessibility_features.clear();
    }

    Ok(profile)
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}
