//! Per-season rain-count clauses and the conjunctive predicate over them.

use serde::{Deserialize, Serialize};

use crate::weather::{Season, WeatherVector};

/// A single clause: "at least `min_rain_days` rainy days within
/// `[start_day, end_day]` of `season`".
///
/// Immutable once constructed -- [`WeatherCondition::new`] is the only way
/// to build one and it enforces the invariants described on the type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherCondition {
    season: Season,
    start_day: u32,
    end_day: u32,
    min_rain_days: u32,
}

/// Why a [`WeatherCondition`] could not be constructed.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionError {
    #[error("min_rain_days must be at least 1")]
    ZeroMinRainDays,
    #[error("start_day ({start_day}) must be between 1 and 28 and not exceed end_day ({end_day})")]
    InvalidDayRange { start_day: u32, end_day: u32 },
    #[error("min_rain_days ({min_rain_days}) exceeds the {day_count}-day range")]
    MinRainDaysExceedsRange { min_rain_days: u32, day_count: u32 },
    #[error(
        "min_rain_days ({min_rain_days}) equals the {day_count}-day range; \
         a clause requiring every day rainy is disallowed"
    )]
    MinRainDaysRequiresEveryDay { min_rain_days: u32, day_count: u32 },
}

impl WeatherCondition {
    /// Validates and constructs a clause.
    ///
    /// `start_day <= end_day`, both within `[1, 28]`, and
    /// `min_rain_days < (end_day - start_day + 1)` (strict -- "every day
    /// rainy" is rejected, not just "more days than exist").
    pub fn new(
        season: Season,
        start_day: u32,
        end_day: u32,
        min_rain_days: u32,
    ) -> Result<Self, ConditionError> {
        if min_rain_days == 0 {
            return Err(ConditionError::ZeroMinRainDays);
        }
        if start_day < 1 || end_day > 28 || start_day > end_day {
            return Err(ConditionError::InvalidDayRange { start_day, end_day });
        }
        let day_count = end_day - start_day + 1;
        if min_rain_days > day_count {
            return Err(ConditionError::MinRainDaysExceedsRange {
                min_rain_days,
                day_count,
            });
        }
        if min_rain_days == day_count {
            return Err(ConditionError::MinRainDaysRequiresEveryDay {
                min_rain_days,
                day_count,
            });
        }
        Ok(Self {
            season,
            start_day,
            end_day,
            min_rain_days,
        })
    }

    /// Absolute day (1..=84) of this clause's first day.
    pub fn absolute_start(&self) -> u32 {
        self.season.offset() + self.start_day
    }

    /// Absolute day (1..=84) of this clause's last day.
    pub fn absolute_end(&self) -> u32 {
        self.season.offset() + self.end_day
    }

    /// Minimum number of rainy days required within this clause's range.
    pub fn min_rain_days(&self) -> u32 {
        self.min_rain_days
    }

    /// Season this clause applies to.
    pub fn season(&self) -> Season {
        self.season
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWeatherCondition {
    season: Season,
    start_day: u32,
    end_day: u32,
    min_rain_days: u32,
}

impl TryFrom<RawWeatherCondition> for WeatherCondition {
    type Error = ConditionError;

    fn try_from(raw: RawWeatherCondition) -> Result<Self, Self::Error> {
        WeatherCondition::new(raw.season, raw.start_day, raw.end_day, raw.min_rain_days)
    }
}

impl<'de> Deserialize<'de> for WeatherCondition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawWeatherCondition::deserialize(deserializer)?;
        WeatherCondition::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// An ordered, possibly-empty list of clauses. An empty set is a
/// universal-accept predicate.
pub type ConditionSet = Vec<WeatherCondition>;

/// `true` iff every clause's rain count in `vector` meets its
/// `min_rain_days` threshold. Short-circuits on the first failing clause;
/// clause order has no effect on the result.
pub fn matches(vector: &WeatherVector, conditions: &[WeatherCondition]) -> bool {
    conditions
        .iter()
        .all(|c| vector.rain_count(c.absolute_start(), c.absolute_end()) >= c.min_rain_days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::predict_year;

    #[test]
    fn rejects_zero_min_rain_days() {
        assert!(matches!(
            WeatherCondition::new(Season::Spring, 1, 10, 0),
            Err(ConditionError::ZeroMinRainDays)
        ));
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(matches!(
            WeatherCondition::new(Season::Spring, 10, 5, 1),
            Err(ConditionError::InvalidDayRange { .. })
        ));
    }

    #[test]
    fn rejects_min_rain_days_requiring_every_day() {
        assert!(matches!(
            WeatherCondition::new(Season::Spring, 1, 5, 5),
            Err(ConditionError::MinRainDaysRequiresEveryDay { .. })
        ));
    }

    #[test]
    fn rejects_min_rain_days_over_range() {
        assert!(matches!(
            WeatherCondition::new(Season::Spring, 1, 5, 6),
            Err(ConditionError::MinRainDaysExceedsRange { .. })
        ));
    }

    #[test]
    fn empty_condition_set_always_matches() {
        let vector = predict_year(42, false);
        assert!(matches(&vector, &[]));
    }

    #[test]
    fn absolute_day_offsets() {
        let c = WeatherCondition::new(Season::Fall, 1, 10, 1).unwrap();
        assert_eq!(c.absolute_start(), 57);
        assert_eq!(c.absolute_end(), 66);
    }

    #[test]
    fn relaxing_min_rain_days_can_only_add_matches() {
        let vector = predict_year(2121, false);
        let strict = WeatherCondition::new(Season::Spring, 1, 10, 3).unwrap();
        let relaxed = WeatherCondition::new(Season::Spring, 1, 10, 1).unwrap();
        if matches(&vector, &[strict]) {
            assert!(matches(&vector, &[relaxed]));
        }
    }

    #[test]
    fn scenario_seed_59_matches_spring_clause() {
        // Scenario 1: {Spring, 1..10, minRain=5} over 0..1000 includes seed 59.
        let condition = WeatherCondition::new(Season::Spring, 1, 10, 5).unwrap();
        let vector = predict_year(59, false);
        assert!(matches(&vector, &[condition]));
    }

    #[test]
    fn scenario_seed_58038_matches_spring_and_summer_clauses() {
        let spring = WeatherCondition::new(Season::Spring, 1, 10, 5).unwrap();
        let summer = WeatherCondition::new(Season::Summer, 1, 10, 6).unwrap();
        let vector = predict_year(58038, false);
        assert!(matches(&vector, &[spring, summer]));
    }

    #[test]
    fn scenario_seed_100077568_matches_three_season_clauses() {
        let spring = WeatherCondition::new(Season::Spring, 1, 15, 6).unwrap();
        let summer = WeatherCondition::new(Season::Summer, 1, 15, 7).unwrap();
        let fall = WeatherCondition::new(Season::Fall, 1, 15, 6).unwrap();
        let vector = predict_year(100_077_568, false);
        assert!(matches(&vector, &[spring, summer, fall]));
    }

    #[test]
    fn scenario_seed_2092416592_matches_full_season_clauses() {
        let spring = WeatherCondition::new(Season::Spring, 1, 28, 10).unwrap();
        let summer = WeatherCondition::new(Season::Summer, 1, 28, 14).unwrap();
        let fall = WeatherCondition::new(Season::Fall, 1, 28, 13).unwrap();
        let vector = predict_year(2_092_416_592, false);
        assert!(matches(&vector, &[spring, summer, fall]));
    }
}
