use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Application URLs containing this marker belong to a preferred partner.
pub const PARTNER_MARKER: &str = "tfc.com";

/// The five New York City boroughs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Borough {
    Manhattan,
    Brooklyn,
    Queens,
    Bronx,
    #[serde(rename = "Staten Island")]
    StatenIsland,
}

impl Borough {
    pub const ALL: [Borough; 5] = [
        Borough::Manhattan,
        Borough::Brooklyn,
        Borough::Queens,
        Borough::Bronx,
        Borough::StatenIsland,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Borough::Manhattan => "Manhattan",
            Borough::Brooklyn => "Brooklyn",
            Borough::Queens => "Queens",
            Borough::Bronx => "Bronx",
            Borough::StatenIsland => "Staten Island",
        }
    }

    /// Case-insensitive comparison against a free-form borough name.
    pub fn matches_name(&self, name: &str) -> bool {
        self.label().eq_ignore_ascii_case(name.trim())
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown borough '{0}'")]
pub struct UnknownBorough(pub String);

impl FromStr for Borough {
    type Err = UnknownBorough;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Borough::ALL
            .into_iter()
            .find(|borough| borough.matches_name(value))
            .ok_or_else(|| UnknownBorough(value.trim().to_string()))
    }
}

/// Monthly rent span advertised for a development, serialized as `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u32; 2]", into = "[u32; 2]")]
pub struct RentRange {
    low: u32,
    high: u32,
}

impl RentRange {
    pub fn new(low: u32, high: u32) -> Result<Self, ListingInvariant> {
        if low > high {
            return Err(ListingInvariant::RentRangeInverted { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn high(&self) -> u32 {
        self.high
    }
}

impl TryFrom<[u32; 2]> for RentRange {
    type Error = ListingInvariant;

    fn try_from([low, high]: [u32; 2]) -> Result<Self, Self::Error> {
        RentRange::new(low, high)
    }
}

impl From<RentRange> for [u32; 2] {
    fn from(range: RentRange) -> Self {
        [range.low, range.high]
    }
}

/// One affordable-housing development's unit offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub development_name: String,
    pub address: String,
    pub borough: Borough,
    pub neighborhood: String,
    pub total_units: u32,
    pub affordable_units: u32,
    pub min_income: u32,
    pub max_income: u32,
    pub rent_range: RentRange,
    pub application_deadline: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_url: Option<String>,
    pub ami_percentage: u16,
    pub amenities: Vec<String>,
    pub accessibility_features: Vec<String>,
    pub pet_policy: String,
}

impl Listing {
    pub fn validate(&self) -> Result<(), ListingInvariant> {
        if self.min_income > self.max_income {
            return Err(ListingInvariant::IncomeBandInverted {
                min: self.min_income,
                max: self.max_income,
            });
        }
        if self.affordable_units > self.total_units {
            return Err(ListingInvariant::UnitCountExceeded {
                affordable: self.affordable_units,
                total: self.total_units,
            });
        }
        Ok(())
    }

    pub fn is_partner(&self) -> bool {
        self.application_url
            .as_deref()
            .is_some_and(|url| url.contains(PARTNER_MARKER))
    }

    pub fn ami_tier(&self) -> AmiTier {
        AmiTier::for_percentage(self.ami_percentage)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingInvariant {
    #[error("rent range low {low} exceeds high {high}")]
    RentRangeInverted { low: u32, high: u32 },
    #[error("minimum income {min} exceeds maximum income {max}")]
    IncomeBandInverted { min: u32, max: u32 },
    #[error("{affordable} affordable units exceed {total} total units")]
    UnitCountExceeded { affordable: u32, total: u32 },
}

/// Badge grouping for a listing's AMI target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmiTier {
    VeryLow,
    Low,
    Moderate,
}

impl AmiTier {
    pub fn for_percentage(percentage: u16) -> Self {
        match percentage {
            0..=50 => AmiTier::VeryLow,
            51..=80 => AmiTier::Low,
            _ => AmiTier::Moderate,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AmiTier::VeryLow => "Extremely/Very Low Income",
            AmiTier::Low => "Low Income",
            AmiTier::Moderate => "Moderate/Middle Income",
        }
    }
}
