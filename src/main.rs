use anyhow::Context;
use clap::Parser;
use classmate_map::config::{DEFAULT_OUTPUT_DIR, DEFAULT_USER_AGENT};
use classmate_map::location::providers::NOMINATIM_SEARCH_URL;
use classmate_map::location::{LookupOptions, NominatimGeocoder};
use classmate_map::render::WordCloudOptions;
use classmate_map::{run, RunConfig};
use std::path::PathBuf;
use std::time::Duration;

/// 同学蹭饭地图 — classmate map generator
///
/// Reads a CSV roster with 姓名 (name) and 学校 (school) columns, locates every
/// school through OpenStreetMap Nominatim and writes a browsable map, a word
/// cloud and summary sheets to the output directory.
///
/// Examples:
///   classmate-map 同学.csv
///   classmate-map 同学.csv --output-dir out --timeout 5
///   RUST_LOG=debug classmate-map 同学.csv
#[derive(Parser)]
#[command(name = "classmate-map", version, about, long_about = None)]
struct Cli {
    /// Roster CSV (UTF-8, header row with 姓名 and 学校).
    input: PathBuf,

    /// Directory for the map, word cloud, stats and location cache.
    #[arg(long, short = 'o', default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Per-query geocoding timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Country restriction for geocoding (ISO 3166-1 alpha-2).
    #[arg(long, default_value = "cn")]
    country: String,

    /// Preferred language of returned addresses.
    #[arg(long, default_value = "zh-CN")]
    language: String,

    /// Nominatim search endpoint.
    #[arg(long, default_value = NOMINATIM_SEARCH_URL)]
    endpoint: String,

    /// User-Agent sent to the geocoding service.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Maximum number of schools shown in the word cloud.
    #[arg(long, default_value_t = 50)]
    max_words: usize,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        RunConfig {
            input: self.input,
            output_dir: self.output_dir,
            lookup: LookupOptions {
                country: self.country,
                timeout: Duration::from_secs(self.timeout),
                language: self.language,
            },
            wordcloud: WordCloudOptions {
                max_words: self.max_words,
                ..WordCloudOptions::default()
            },
            endpoint: self.endpoint,
            user_agent: self.user_agent,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config();
    let geocoder = NominatimGeocoder::with_endpoint(config.endpoint.clone(), config.user_agent.clone());

    let summary = run(&config, geocoder)
        .with_context(|| format!("failed to build the map from {}", config.input.display()))?;

    // ── Summary ─────────────────────────────────────────────────

    eprintln!();
    eprintln!("{}", "=".repeat(50));
    eprintln!("  {} rows, {} schools, {} unresolved", summary.rows, summary.schools, summary.unresolved.len());
    if !summary.unresolved.is_empty() {
        eprintln!("  Unresolved: {}", summary.unresolved.join(", "));
    }
    eprintln!("  Map:        {}", summary.map.display());
    eprintln!("  Word cloud: {}", summary.wordcloud.display());
    eprintln!("  Stats:      {}", summary.stats.cities.display());
    eprintln!("              {}", summary.stats.schools.display());
    eprintln!("              {}", summary.stats.raw.display());
    eprintln!("  Cache:      {}", summary.cache.display());
    eprintln!("{}", "=".repeat(50));
    Ok(())
}
