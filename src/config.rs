//! Run configuration and output file layout.

use crate::location::types::LookupOptions;
use crate::location::providers::NOMINATIM_SEARCH_URL;
use crate::render::WordCloudOptions;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "蹭饭地图结果";
pub const DEFAULT_USER_AGENT: &str = concat!("classmate-map/", env!("CARGO_PKG_VERSION"));

pub const CACHE_FILE: &str = "location_cache.json";
pub const MAP_FILE: &str = "蹭饭地图.html";
pub const WORDCLOUD_FILE: &str = "学校分布词云.svg";

/// Everything one run needs to know.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub lookup: LookupOptions,
    pub wordcloud: WordCloudOptions,
    /// Nominatim search endpoint.
    pub endpoint: String,
    pub user_agent: String,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            lookup: LookupOptions::default(),
            wordcloud: WordCloudOptions::default(),
            endpoint: NOMINATIM_SEARCH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn cache_path(&self) -> PathBuf {
        self.output_dir.join(CACHE_FILE)
    }

    pub fn map_path(&self) -> PathBuf {
        self.output_dir.join(MAP_FILE)
    }

    pub fn wordcloud_path(&self) -> PathBuf {
        self.output_dir.join(WORDCLOUD_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::new("同学.csv");
        assert_eq!(config.output_dir(), Path::new("蹭饭地图结果"));
        assert_eq!(config.cache_path(), Path::new("蹭饭地图结果/location_cache.json"));
        assert_eq!(config.lookup.country, "cn");
        assert_eq!(config.lookup.timeout.as_secs(), 10);
        assert_eq!(config.wordcloud.max_words, 50);
        assert!(config.user_agent.starts_with("classmate-map/"));
    }
}
