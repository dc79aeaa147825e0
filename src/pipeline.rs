//! End-to-end run: roster → locations → map, word cloud and stats.

use crate::config::RunConfig;
use crate::error::{Error, Result};
use crate::location::{Geocoder, LocationCache, SchoolLocations, SchoolResolver};
use crate::map_data::{build_markers, compute_center};
use crate::render::{self, StatsFiles};
use crate::roster::Roster;
use log::{error, info};
use std::fs;
use std::path::PathBuf;

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub rows: usize,
    pub schools: usize,
    /// Schools left at the `(0, 0)` sentinel, in input order.
    pub unresolved: Vec<String>,
    pub cache: PathBuf,
    pub map: PathBuf,
    pub wordcloud: PathBuf,
    pub stats: StatsFiles,
}

/// Resolve every school once, in the given order.
pub fn resolve_all<G: Geocoder>(
    resolver: &SchoolResolver<G>,
    schools: &[&str],
    cache: &mut LocationCache,
) -> SchoolLocations {
    let total = schools.len();
    schools
        .iter()
        .enumerate()
        .map(|(i, school)| {
            info!("[{}/{}] {}", i + 1, total, school);
            (school.to_string(), resolver.resolve(school, cache))
        })
        .collect()
}

/// Run the whole pipeline against `geocoder`.
pub fn run<G: Geocoder>(config: &RunConfig, geocoder: G) -> Result<RunSummary> {
    let roster = Roster::from_path(&config.input)?;
    fs::create_dir_all(config.output_dir()).map_err(|e| Error::io(config.output_dir(), e))?;

    let cache_path = config.cache_path();
    let mut cache = LocationCache::load(&cache_path);
    let resolver = SchoolResolver::with_options(geocoder, config.lookup.clone());

    let schools = roster.schools();
    info!("Resolving {} schools", schools.len());
    let locations = resolve_all(&resolver, &schools, &mut cache);

    if let Err(e) = cache.save(&cache_path) {
        error!("Could not save location cache: {}", e);
    }

    let unresolved: Vec<String> = schools
        .iter()
        .filter(|s| locations.get(**s).is_some_and(|loc| !loc.is_resolved()))
        .map(|s| s.to_string())
        .collect();

    let markers = build_markers(roster.rows(), &locations);
    let center = compute_center(locations.values());
    let map_path = config.map_path();
    let html = render::render_map(center, &markers)?;
    fs::write(&map_path, html).map_err(|e| Error::io(&map_path, e))?;
    info!("Map written to {}", map_path.display());

    let located = roster.locate(&locations);
    let wordcloud_path = config.wordcloud_path();
    let svg = render::render_wordcloud(&located, &config.wordcloud)?;
    fs::write(&wordcloud_path, svg).map_err(|e| Error::io(&wordcloud_path, e))?;
    info!("Word cloud written to {}", wordcloud_path.display());

    let stats = render::write_stats(config.output_dir(), &roster, &located)?;
    info!("Stats written to {}", config.output_dir().display());

    Ok(RunSummary {
        rows: roster.len(),
        schools: schools.len(),
        unresolved,
        cache: cache_path,
        map: map_path,
        wordcloud: wordcloud_path,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::testing::ScriptedGeocoder;
    use crate::location::types::Coords;
    use tempfile::TempDir;

    const CSV: &str = "姓名,学校\n张三,深圳\n李四,火星\n王五,深圳\n赵六,北大\n";

    fn scripted() -> ScriptedGeocoder {
        ScriptedGeocoder::new()
            .hit("深圳大学, 中国", "深圳大学, 南山区, 深圳市, 广东省, 518000, 中国", 22.53, 113.93)
            .fail("北大大学, 中国")
            .hit("北大, 中国", "北京大学, 海淀区, 北京市, 100871, 中国", 39.99, 116.31)
    }

    fn setup() -> (TempDir, RunConfig) {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("同学.csv");
        fs::write(&input, CSV).unwrap();
        let mut config = RunConfig::new(input);
        config.output_dir = dir.path().join("out");
        (dir, config)
    }

    #[test]
    fn test_resolve_all_in_order() {
        let geocoder = scripted();
        let resolver = SchoolResolver::new(&geocoder);
        let mut cache = LocationCache::new();
        let locations = resolve_all(&resolver, &["深圳", "北大"], &mut cache);
        assert_eq!(locations.len(), 2);
        assert_eq!(cache.len(), 2);
        assert_eq!(geocoder.queries()[0], "深圳大学, 中国");
        assert_eq!(locations["北大"].coords, Coords(39.99, 116.31));
    }

    #[test]
    fn test_run_writes_everything() {
        let (_dir, config) = setup();
        let geocoder = scripted();
        let summary = run(&config, &geocoder).unwrap();

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.schools, 3);
        assert_eq!(summary.unresolved, vec!["火星"]);
        for path in [
            &summary.cache,
            &summary.map,
            &summary.wordcloud,
            &summary.stats.cities,
            &summary.stats.schools,
            &summary.stats.raw,
        ] {
            assert!(path.exists(), "{} missing", path.display());
        }

        let cache = LocationCache::load(&summary.cache);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("深圳").unwrap().city, "深圳市");
        assert!(!cache.get("火星").unwrap().is_resolved());

        let html = fs::read_to_string(&summary.map).unwrap();
        assert!(html.contains(r#""students":["张三","王五"]"#));
        assert!(!html.contains("104.1954"), "fell back to the default center");
    }

    #[test]
    fn test_second_run_uses_cache() {
        let (_dir, config) = setup();
        let first = scripted();
        run(&config, &first).unwrap();
        assert!(!first.queries().is_empty());

        let second = ScriptedGeocoder::new();
        let summary = run(&config, &second).unwrap();
        assert!(second.queries().is_empty());
        assert_eq!(summary.unresolved, vec!["火星"]);
    }

    #[test]
    fn test_unreadable_cache_starts_over() {
        let (_dir, config) = setup();
        fs::create_dir_all(config.output_dir()).unwrap();
        fs::write(config.cache_path(), "garbage").unwrap();

        let geocoder = scripted();
        run(&config, &geocoder).unwrap();
        assert_eq!(LocationCache::load(&config.cache_path()).len(), 3);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let (dir, mut config) = setup();
        let input = dir.path().join("bad.csv");
        fs::write(&input, "名字,学校\n张三,深圳\n").unwrap();
        config.input = input;

        let err = run(&config, ScriptedGeocoder::new()).unwrap_err();
        assert!(matches!(err, Error::MissingColumn(_)));
        assert!(!config.cache_path().exists());
    }
}
