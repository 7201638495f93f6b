use serde::{Deserialize, Serialize};

use crate::housing::profile::HouseholdProfile;

/// Borough value meaning "no borough filter".
pub const ALL_BOROUGHS: &str = "All";

/// Typed search criteria. `None` means the criterion is not applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub borough: Option<String>,
    pub income: Option<u32>,
    pub max_rent: Option<u32>,
    pub household_size: Option<u8>,
}

impl SearchQuery {
    /// Criteria a dashboard derives from a stored profile plus the borough picker.
    pub fn for_profile(profile: &HouseholdProfile, borough: Option<&str>) -> Self {
        Self {
            borough: normalize_borough(borough),
            income: positive(profile.annual_income),
            max_rent: positive(profile.max_rent),
            household_size: Some(profile.household_size),
        }
    }

    pub fn with_borough(mut self, borough: Option<&str>) -> Self {
        self.borough = normalize_borough(borough);
        self
    }

    /// Wire form, using `0` for criteria that are not applied.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(4);
        if let Some(borough) = &self.borough {
            params.push(("borough", borough.clone()));
        }
        params.push(("income", self.income.unwrap_or(0).to_string()));
        params.push(("maxRent", self.max_rent.unwrap_or(0).to_string()));
        if let Some(size) = self.household_size {
            params.push(("householdSize", size.to_string()));
        }
        params
    }
}

/// Raw query-string parameters as received from the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub borough: Option<String>,
    #[serde(default)]
    pub income: Option<String>,
    #[serde(default)]
    pub max_rent: Option<String>,
    #[serde(default)]
    pub household_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("parameter '{name}' must be an integer, got '{value}'")]
    NotAnInteger { name: &'static str, value: String },
    #[error("parameter '{name}' is out of range: {value}")]
    OutOfRange { name: &'static str, value: String },
}

impl TryFrom<&SearchParams> for SearchQuery {
    type Error = QueryError;

    fn try_from(params: &SearchParams) -> Result<Self, Self::Error> {
        let household_size = parse_amount("householdSize", params.household_size.as_deref())?
            .map(|size| {
                u8::try_from(size).map_err(|_| QueryError::OutOfRange {
                    name: "householdSize",
                    value: size.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            borough: normalize_borough(params.borough.as_deref()),
            income: parse_amount("income", params.income.as_deref())?,
            max_rent: parse_amount("maxRent", params.max_rent.as_deref())?,
            household_size,
        })
    }
}

fn normalize_borough(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(ALL_BOROUGHS))
        .map(str::to_string)
}

fn positive(value: u32) -> Option<u32> {
    (value > 0).then_some(value)
}

/// Missing, blank, zero and negative values all mean "not applied".
fn parse_amount(name: &'static str, raw: Option<&str>) -> Result<Option<u32>, QueryError> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    let value: i64 = raw.parse().map_err(|_| QueryError::NotAnInteger {
        name,
        value: raw.to_string(),
    })?;

    if value <= 0 {
        return Ok(None);
    }

    u32::try_from(value)
        .map(Some)
        .map_err(|_| QueryError::OutOfRange {
            name,
            value: raw.to_string(),
        })
}
