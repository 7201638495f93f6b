use super::domain::{Borough, Listing, ListingInvariant, RentRange};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Row-level failure carrying the 1-based data line for operator feedback.
#[derive(Debug)]
pub(crate) enum RowError {
    Csv(csv::Error),
    Invalid { line: u64, reason: String },
}

pub(crate) fn parse_listings<R: Read>(reader: R) -> Result<Vec<Listing>, RowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut listings = Vec::new();

    for (index, record) in csv_reader.deserialize::<ListingRow>().enumerate() {
        let row = record.map_err(RowError::Csv)?;
        let line = index as u64 + 1;
        let listing = row
            .into_listing()
            .map_err(|reason| RowError::Invalid { line, reason })?;
        listings.push(listing);
    }

    Ok(listings)
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    id: String,
    development_name: String,
    address: String,
    borough: String,
    neighborhood: String,
    total_units: u32,
    affordable_units: u32,
    min_income: u32,
    max_income: u32,
    rent_low: u32,
    rent_high: u32,
    application_deadline: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    image_url: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    application_url: Option<String>,
    ami_percentage: u16,
    #[serde(default)]
    amenities: String,
    #[serde(default)]
    accessibility_features: String,
    pet_policy: String,
}

impl ListingRow {
    fn into_listing(self) -> Result<Listing, String> {
        let borough: Borough = self.borough.parse().map_err(|err| format!("{err}"))?;
        let application_deadline =
            NaiveDate::parse_from_str(self.application_deadline.trim(), "%Y-%m-%d").map_err(
                |err| {
                    format!(
                        "application_deadline '{}' is not YYYY-MM-DD ({err})",
                        self.application_deadline
                    )
                },
            )?;
        let rent_range =
            RentRange::new(self.rent_low, self.rent_high).map_err(|err| err.to_string())?;

        let listing = Listing {
            id: self.id,
            development_name: self.development_name,
            address: self.address,
            borough,
            neighborhood: self.neighborhood,
            total_units: self.total_units,
            affordable_units: self.affordable_units,
            min_income: self.min_income,
            max_income: self.max_income,
            rent_range,
            application_deadline,
            image_url: self.image_url,
            application_url: self.application_url,
            ami_percentage: self.ami_percentage,
            amenities: split_labels(&self.amenities),
            accessibility_features: split_labels(&self.accessibility_features),
            pet_policy: self.pet_policy,
        };

        listing
            .validate()
            .map_err(|err: ListingInvariant| err.to_string())?;
        Ok(listing)
    }
}

fn split_labels(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
