//! Output renderers: map page, word cloud and stats sheets.

pub mod html;
pub mod stats;
pub mod wordcloud;

pub use html::render_map;
pub use stats::{write_stats, StatsFiles};
pub use wordcloud::{render_wordcloud, WordCloudOptions};
