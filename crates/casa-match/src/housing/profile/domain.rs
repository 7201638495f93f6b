use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::housing::listings::Borough;

/// Applicant's self-reported eligibility and preference data.
///
/// Field names are camelCase on the wire and on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub contact_method: ContactMethod,
    #[serde(default)]
    pub boroughs: BTreeSet<Borough>,
    pub household_size: u8,
    pub annual_income: u32,
    pub employment_status: EmploymentStatus,
    pub bedroom_preference: BedroomPreference,
    #[serde(default)]
    pub min_rent: u32,
    #[serde(default)]
    pub max_rent: u32,
    #[serde(default)]
    pub has_voucher: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voucher_details: Option<String>,
    pub move_timeline: MoveTimeline,
    #[serde(default)]
    pub accessibility_required: bool,
    #[serde(default)]
    pub accessibility_features: Vec<String>,
}

impl HouseholdProfile {
    pub fn first_name(&self) -> &str {
        self.full_name.split_whitespace().next().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    #[default]
    Email,
    Sms,
    Both,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentStatus {
    #[default]
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    #[serde(rename = "Self-employed")]
    SelfEmployed,
    Unemployed,
    Retired,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BedroomPreference {
    Studio,
    #[default]
    #[serde(rename = "1BR")]
    OneBedroom,
    #[serde(rename = "2BR")]
    TwoBedroom,
    #[serde(rename = "3BR")]
    ThreeBedroom,
    #[serde(rename = "4+BR")]
    FourPlusBedroom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveTimeline {
    #[default]
    Immediately,
    #[serde(rename = "1-3 months")]
    OneToThreeMonths,
    #[serde(rename = "3-6 months")]
    ThreeToSixMonths,
    #[serde(rename = "6-12 months")]
    SixToTwelveMonths,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_stored_camel_case_record() {
        let stored = json!({
            "fullName": "Ana Lopez",
            "email": "ana@example.com",
            "phone": "718-555-0100",
            "contactMethod": "both",
            "boroughs": ["Queens", "Staten Island", "Queens"],
            "householdSize": 3,
            "annualIncome": 52000,
            "employmentStatus": "Part-time",
            "bedroomPreference": "2BR",
            "minRent": 0,
            "maxRent": 1600,
            "hasVoucher": true,
            "voucherDetails": "CityFHEPS",
            "moveTimeline": "1-3 months",
            "accessibilityRequired": false,
            "accessibilityFeatures": []
        });

        let profile: HouseholdProfile = serde_json::from_value(stored).expect("profile parses");
        assert_eq!(profile.contact_method, ContactMethod::Both);
        assert_eq!(profile.boroughs.len(), 2);
        assert_eq!(profile.bedroom_preference, BedroomPreference::TwoBedroom);
        assert_eq!(profile.move_timeline, MoveTimeline::OneToThreeMonths);
        assert_eq!(profile.first_name(), "Ana");
    }
}
