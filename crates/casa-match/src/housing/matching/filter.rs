use crate::housing::listings::Listing;

use super::query::SearchQuery;

/// Applicants may earn as little as 70% of a listing's minimum income.
const LENIENT_FLOOR_NUMERATOR: u64 = 7;
const LENIENT_FLOOR_DENOMINATOR: u64 = 10;

/// Which income bounds are enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EligibilityMode {
    /// Lenient floor and the listing's maximum income.
    #[default]
    Strict,
    /// Lenient floor only; over-income applicants stay eligible.
    Lenient,
}

/// Pure predicate deciding which listings a household qualifies for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EligibilityFilter {
    borough: Option<String>,
    income: Option<u32>,
    max_rent: Option<u32>,
    mode: EligibilityMode,
}

impl EligibilityFilter {
    pub fn from_query(query: &SearchQuery) -> Self {
        Self {
            borough: query.borough.clone(),
            income: query.income,
            max_rent: query.max_rent,
            mode: EligibilityMode::Strict,
        }
    }

    pub fn with_mode(mut self, mode: EligibilityMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn admits(&self, listing: &Listing) -> bool {
        self.borough_matches(listing) && self.income_qualifies(listing) && self.rent_fits(listing)
    }

    /// Keeps admitted listings in their input order.
    pub fn apply(&self, listings: &[Listing]) -> Vec<Listing> {
        listings
            .iter()
            .filter(|listing| self.admits(listing))
            .cloned()
            .collect()
    }

    fn borough_matches(&self, listing: &Listing) -> bool {
        match &self.borough {
            Some(name) => listing.borough.matches_name(name),
            None => true,
        }
    }

    fn income_qualifies(&self, listing: &Listing) -> bool {
        let Some(income) = self.income else {
            return true;
        };

        let income = u64::from(income);
        let floor_met = income * LENIENT_FLOOR_DENOMINATOR
            >= u64::from(listing.min_income) * LENIENT_FLOOR_NUMERATOR;

        match self.mode {
            EligibilityMode::Strict => floor_met && income <= u64::from(listing.max_income),
            EligibilityMode::Lenient => floor_met,
        }
    }

    fn rent_fits(&self, listing: &Listing) -> bool {
        match self.max_rent {
            Some(max_rent) => listing.rent_range.low() <= max_rent,
            None => true,
        }
    }
}
