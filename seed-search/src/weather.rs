//! Deterministic reconstruction of a game seed's first-year weather.
//!
//! [`predict_year`] dispatches the fixed calendar rules first (they
//! short-circuit) and falls through to a probabilistic draw routed through
//! [`crate::rng`] otherwise. The result is an 84-bit rain/dry vector
//! covering Spring, Summer and Fall of year one.

use crate::rng::{next_double, next_int, random_seed};

/// Days in a season.
pub const DAYS_PER_SEASON: u32 = 28;
/// Seasons covered by the first-year prediction (Spring, Summer, Fall).
pub const SEASON_COUNT: u32 = 3;
/// Total tracked days, `DAYS_PER_SEASON * SEASON_COUNT`.
pub const TOTAL_DAYS: u32 = DAYS_PER_SEASON * SEASON_COUNT;

const GREEN_RAIN_DAYS: [u32; 8] = [5, 6, 7, 14, 15, 16, 18, 23];

/// One of the three seasons tracked by this system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, serde::Serialize, serde::Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Offset of this season's day 1 within the 84-day absolute range.
    pub fn offset(self) -> u32 {
        match self {
            Season::Spring => 0,
            Season::Summer => DAYS_PER_SEASON,
            Season::Fall => 2 * DAYS_PER_SEASON,
        }
    }

    fn from_index(index: u32) -> Season {
        match index {
            0 => Season::Spring,
            1 => Season::Summer,
            _ => Season::Fall,
        }
    }
}

/// The 84-day rain/dry vector for a single seed.
///
/// Index `0` is absolute day 1 (Spring 1); index 83 is absolute day 84
/// (Fall 28). Never stored long-term -- reconstructed on demand, one vector
/// per (seed, legacy flag) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeatherVector {
    rain: [bool; TOTAL_DAYS as usize],
}

impl WeatherVector {
    /// Whether `absolute_day` (1..=84) is rainy.
    pub fn is_rain(&self, absolute_day: u32) -> bool {
        self.rain[(absolute_day - 1) as usize]
    }

    /// Count of rainy days in the inclusive `[start, end]` absolute range.
    pub fn rain_count(&self, start: u32, end: u32) -> u32 {
        (start..=end).filter(|&day| self.is_rain(day)).count() as u32
    }
}

/// Decoded weather flattened into per-season day-of-month lists, plus the
/// year's single green rain day. Diagnostics-only; never consulted by the
/// predicate evaluator or search driver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeatherDetail {
    pub spring_rain_days: Vec<u32>,
    pub summer_rain_days: Vec<u32>,
    pub fall_rain_days: Vec<u32>,
    pub green_rain_day: u32,
}

fn summer_rain_chance_hash() -> i32 {
    crate::hash::hash_string("summer_rain_chance")
}

fn location_weather_hash() -> i32 {
    crate::hash::hash_string("location_weather")
}

/// The day-of-month (in Summer) on which rain is forced by the separately
/// drawn green rain index.
pub fn green_rain_day(game_seed: i32, legacy: bool) -> u32 {
    let seed = random_seed(777, game_seed, 0, 0, 0, legacy);
    let idx = next_int(seed, GREEN_RAIN_DAYS.len() as i32) as usize;
    GREEN_RAIN_DAYS[idx]
}

fn is_rain_on(day: u32, game_seed: i32, legacy: bool, green_day: u32) -> bool {
    let dom = (day - 1) % DAYS_PER_SEASON + 1;
    if dom == 1 {
        return false;
    }

    let season = Season::from_index((day - 1) / DAYS_PER_SEASON);
    match season {
        Season::Spring => match dom {
            2 | 4 | 5 => false,
            3 => true,
            13 | 24 => false,
            _ => spring_fall_probabilistic(day, game_seed, legacy),
        },
        Season::Summer => {
            if dom == green_day {
                true
            } else if dom == 11 || dom == 28 {
                false
            } else if dom % 13 == 0 {
                true
            } else {
                summer_probabilistic(day, dom, game_seed, legacy)
            }
        }
        Season::Fall => match dom {
            16 | 27 => false,
            _ => spring_fall_probabilistic(day, game_seed, legacy),
        },
    }
}

fn summer_probabilistic(day: u32, dom: u32, game_seed: i32, legacy: bool) -> bool {
    let seed = random_seed(
        (day - 1) as i32,
        game_seed / 2,
        summer_rain_chance_hash(),
        0,
        0,
        legacy,
    );
    next_double(seed) < 0.12 + 0.003 * (dom - 1) as f64
}

fn spring_fall_probabilistic(day: u32, game_seed: i32, legacy: bool) -> bool {
    let seed = random_seed(location_weather_hash(), game_seed, (day - 1) as i32, 0, 0, legacy);
    next_double(seed) < 0.183
}

/// Reconstructs the full 84-day weather vector for `(game_seed, legacy)`.
///
/// Total function; every seed in `[0, 2^31 - 1]` and both legacy settings
/// produce a result.
pub fn predict_year(game_seed: i32, legacy: bool) -> WeatherVector {
    let green_day = green_rain_day(game_seed, legacy);
    let mut rain = [false; TOTAL_DAYS as usize];
    for day in 1..=TOTAL_DAYS {
        rain[(day - 1) as usize] = is_rain_on(day, game_seed, legacy, green_day);
    }
    WeatherVector { rain }
}

/// Same computation as [`predict_year`], flattened into day-of-month lists
/// for reporting. Used only by diagnostics / scenario tests.
pub fn predict_year_detail(game_seed: i32, legacy: bool) -> WeatherDetail {
    let vector = predict_year(game_seed, legacy);
    let mut detail = WeatherDetail {
        spring_rain_days: Vec::new(),
        summer_rain_days: Vec::new(),
        fall_rain_days: Vec::new(),
        green_rain_day: green_rain_day(game_seed, legacy),
    };
    for day in 1..=TOTAL_DAYS {
        if !vector.is_rain(day) {
            continue;
        }
        let dom = (day - 1) % DAYS_PER_SEASON + 1;
        match Season::from_index((day - 1) / DAYS_PER_SEASON) {
            Season::Spring => detail.spring_rain_days.push(dom),
            Season::Summer => detail.summer_rain_days.push(dom),
            Season::Fall => detail.fall_rain_days.push(dom),
        }
    }
    detail
}
