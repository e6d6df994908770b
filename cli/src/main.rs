use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cliclack::{intro, note, outro, progress_bar};
use seed_search::{
    condition::WeatherCondition,
    events::SearchEvent,
    search::{search, SearchRequest},
    weather::predict_year_detail,
};
use serde::Deserialize;

/// Weather seed finder.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a JSON search request.
    config_file: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestFile {
    start_seed: u32,
    end_seed: u32,
    #[serde(default)]
    use_legacy_random: bool,
    #[serde(default)]
    weather_conditions: Vec<WeatherCondition>,
    #[serde(default = "default_output_limit")]
    output_limit: usize,
}

fn default_output_limit() -> usize {
    20
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    intro("Seed Search")?;

    let config_data = std::fs::read_to_string(&args.config_file)
        .with_context(|| format!("reading {}", args.config_file.display()))?;
    let config: RequestFile =
        serde_json::from_str(&config_data).context("parsing search request")?;
    let use_legacy_random = config.use_legacy_random;
    let request = SearchRequest::new(
        config.start_seed,
        config.end_seed,
        use_legacy_random,
        config.weather_conditions,
        config.output_limit,
    )?;

    let (_run, events) = search(request);
    let mut seeds = Vec::new();
    let mut pb = None;
    let mut last_checked = 0u64;
    for event in events {
        match event {
            SearchEvent::Start { total } => {
                tracing::info!(total, "search started");
                let bar = progress_bar(total);
                bar.start("Searching...");
                pb = Some(bar);
            }
            SearchEvent::Progress { checked_count, .. } => {
                if let Some(bar) = &pb {
                    bar.inc(checked_count - last_checked);
                }
                last_checked = checked_count;
            }
            SearchEvent::Found { seed } => {
                seeds.push(seed);
            }
            SearchEvent::Complete {
                total_found,
                elapsed,
                error,
            } => {
                if let Some(err) = error {
                    if let Some(bar) = &pb {
                        bar.stop(format!("search aborted: {err}"));
                    }
                    return Err(anyhow::anyhow!(err));
                }
                if let Some(bar) = &pb {
                    bar.stop(format!("{total_found} seed(s) found in {elapsed:.2}s"));
                }
            }
        }
    }

    for seed in &seeds {
        let detail = predict_year_detail(*seed as i32, use_legacy_random);
        let report = format!(
            "spring rain: {:?}\nsummer rain: {:?}\nfall rain: {:?}\ngreen rain day: {}",
            detail.spring_rain_days, detail.summer_rain_days, detail.fall_rain_days, detail.green_rain_day
        );
        note(format!("{seed}"), report)?;
    }

    outro(format!("Finished: {} seed(s) found.", seeds.len()))?;
    Ok(())
}
