//! NYC 2024 area median income reference figures.

use serde::Serialize;

/// 100% AMI for households of one through eight people.
const MEDIAN_BY_HOUSEHOLD: [u32; 8] = [
    108_600, 124_200, 139_700, 155_200, 167_700, 180_100, 192_500, 204_900,
];

/// Each person beyond eight adds 8% of the four-person median.
const EXTRA_PERSON_SHARE_PERCENT: u32 = 8;

/// Bands published for NYC housing lotteries.
pub const AMI_BANDS: [u16; 8] = [30, 40, 50, 60, 80, 100, 130, 165];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmiBand {
    pub name: String,
    pub percentage: u16,
    pub income_limit: u32,
    pub user_income: Option<u32>,
}

/// Where a household's income sits against every AMI band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomePosition {
    pub household_size: u8,
    pub annual_income: Option<u32>,
    pub bands: Vec<AmiBand>,
    /// Lowest band whose limit covers the income; `None` above the top band
    /// or when no income was given.
    pub bracket: Option<u16>,
}

pub fn median_income(household_size: u8) -> u32 {
    let size = household_size.max(1) as usize;
    if size <= MEDIAN_BY_HOUSEHOLD.len() {
        return MEDIAN_BY_HOUSEHOLD[size - 1];
    }
    let extra_people = (size - MEDIAN_BY_HOUSEHOLD.len()) as u32;
    let per_person = MEDIAN_BY_HOUSEHOLD[3] * EXTRA_PERSON_SHARE_PERCENT / 100;
    MEDIAN_BY_HOUSEHOLD[MEDIAN_BY_HOUSEHOLD.len() - 1] + extra_people * per_person
}

/// Band limit rounded to the nearest $100.
pub fn income_limit(household_size: u8, percentage: u16) -> u32 {
    let raw = u64::from(median_income(household_size)) * u64::from(percentage) / 100;
    (((raw + 50) / 100) * 100) as u32
}

pub fn income_position(household_size: u8, annual_income: Option<u32>) -> IncomePosition {
    let bands: Vec<AmiBand> = AMI_BANDS
        .iter()
        .map(|&percentage| AmiBand {
            name: format!("{percentage}% AMI"),
            percentage,
            income_limit: income_limit(household_size, percentage),
            user_income: annual_income,
        })
        .collect();

    let bracket = annual_income.and_then(|income| {
        bands
            .iter()
            .find(|band| income <= band.income_limit)
            .map(|band| band.percentage)
    });

    IncomePosition {
        household_size,
        annual_income,
        bands,
        bracket,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_medians_cover_one_through_eight() {
        assert_eq!(median_income(1), 108_600);
        assert_eq!(median_income(4), 155_200);
        assert_eq!(median_income(8), 204_900);
        assert_eq!(median_income(0), 108_600);
    }

    #[test]
    fn larger_households_extend_by_eight_percent_of_four_person_median() {
        assert_eq!(median_income(9), 204_900 + 12_416);
        assert_eq!(median_income(10), 204_900 + 2 * 12_416);
    }

    #[test]
    fn limits_round_to_nearest_hundred() {
        assert_eq!(income_limit(3, 60), 83_800);
        assert_eq!(income_limit(1, 30), 32_600);
    }

    #[test]
    fn bracket_is_lowest_covering_band() {
        let position = income_position(3, Some(52_000));
        assert_eq!(position.bands.len(), AMI_BANDS.len());
        assert_eq!(position.bands[0].name, "30% AMI");
        assert_eq!(position.bracket, Some(40));
        assert!(position
            .bands
            .iter()
            .all(|band| band.user_income == Some(52_000)));

        assert_eq!(income_position(1, Some(500_000)).bracket, None);
    }

    #[test]
    fn missing_income_has_no_bracket() {
        let position = income_position(3, None);
        assert_eq!(position.bracket, None);
        assert_eq!(position.annual_income, None);
        assert!(position.bands.iter().all(|band| band.user_income.is_none()));
        assert_eq!(position.bands[3].income_limit, 83_800);

        assert_eq!(income_position(3, Some(0)).bracket, Some(30));
    }
}
