//! # Seed Search
//!
//! A library for finding game seeds whose first-year weather satisfies a
//! set of rain-count constraints.
//!
//! `seed-search` is built from four pure, total layers plus a driver:
//!
//! * [`hash`]: the XXHash32-based hash kernel.
//! * [`rng`]: single-step draws from the .NET-compatible RNG.
//! * [`weather`]: the weather oracle, [`weather::predict_year`].
//! * [`condition`]: [`condition::WeatherCondition`] clauses and the
//!   conjunctive [`condition::matches`] predicate.
//! * [`search`]: the massively parallel search driver and its
//!   [`events::SearchEvent`] stream.
//!
//! ## Example
//! ```no_run
//! use seed_search::{condition::WeatherCondition, search::SearchRequest, weather::Season};
//!
//! let condition = WeatherCondition::new(Season::Spring, 1, 10, 5)?;
//! let request = SearchRequest::new(0, 1_000, false, vec![condition], 20)?;
//! let (_run, events) = seed_search::search::search(request);
//! for event in events {
//!     println!("{event:?}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod condition;
pub mod events;
pub mod hash;
pub mod rng;
pub mod search;
pub mod weather;
