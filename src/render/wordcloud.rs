//! School word cloud, rendered as SVG.
//!
//! Words are weighted by how many people attend each school. Placement walks an
//! Archimedean spiral out from the centre of the canvas and takes the first spot
//! where the word's box overlaps nothing placed so far. A word that does not fit
//! is shrunk a few times and then dropped.

use crate::error::Result;
use crate::roster::LocatedRow;
use askama::Template;
use std::collections::HashMap;

pub const WORDCLOUD_TITLE: &str = "同学大学分布";

/// matplotlib's tab20 palette.
const TAB20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

const TITLE_BAND: f64 = 60.0;
const PADDING: f64 = 2.0;
const SPIRAL_STEP: f64 = 0.1;
const SPIRAL_GROWTH: f64 = 2.0;
const MAX_SPIRAL_STEPS: usize = 6000;
const SHRINK: f64 = 0.85;

#[derive(Debug, Clone)]
pub struct WordCloudOptions {
    pub width: u32,
    pub height: u32,
    pub max_words: usize,
    pub min_font: f64,
    pub max_font: f64,
}

impl Default for WordCloudOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            max_words: 50,
            min_font: 14.0,
            max_font: 96.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub count: usize,
    /// Centre of the word's box.
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub color: &'static str,
}

impl PlacedWord {
    fn rect(&self) -> Rect {
        Rect::around(self.x, self.y, text_width(&self.text, self.font_size), line_height(self.font_size))
    }
}

#[derive(Debug, Clone, Copy)]
struct Rect {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Rect {
    fn around(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self {
            left: cx - w / 2.0,
            top: cy - h / 2.0,
            right: cx + w / 2.0,
            bottom: cy + h / 2.0,
        }
    }

    fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right + PADDING
            && other.left < self.right + PADDING
            && self.top < other.bottom + PADDING
            && other.top < self.bottom + PADDING
    }

    fn inside(&self, bounds: &Rect) -> bool {
        self.left >= bounds.left
            && self.right <= bounds.right
            && self.top >= bounds.top
            && self.bottom <= bounds.bottom
    }
}

/// Estimated advance width: CJK glyphs are square, Latin ones about 0.6 em.
fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars()
        .map(|c| if c.is_ascii() { 0.6 } else { 1.0 })
        .sum::<f64>()
        * font_size
}

fn line_height(font_size: f64) -> f64 {
    font_size * 1.1
}

/// School → headcount, most frequent first. Ties keep first appearance.
pub fn school_frequencies(rows: &[LocatedRow<'_>]) -> Vec<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in rows {
        let school = r.row.school.as_str();
        *counts.entry(school).or_insert_with(|| {
            order.push(school);
            0
        }) += 1;
    }
    let mut freqs: Vec<(String, usize)> = order
        .into_iter()
        .map(|s| (s.to_string(), counts[s]))
        .collect();
    // stable sort keeps first-appearance order among equal counts
    freqs.sort_by(|a, b| b.1.cmp(&a.1));
    freqs
}

/// Lay out up to `max_words` words without overlap.
pub fn layout(freqs: &[(String, usize)], opts: &WordCloudOptions) -> Vec<PlacedWord> {
    let words = &freqs[..freqs.len().min(opts.max_words)];
    let (Some(max_count), Some(min_count)) = (
        words.iter().map(|w| w.1).max(),
        words.iter().map(|w| w.1).min(),
    ) else {
        return Vec::new();
    };

    let bounds = Rect {
        left: 0.0,
        top: TITLE_BAND,
        right: opts.width as f64,
        bottom: opts.height as f64,
    };
    let cx = opts.width as f64 / 2.0;
    let cy = (TITLE_BAND + opts.height as f64) / 2.0;
    let aspect = (bounds.right - bounds.left) / (bounds.bottom - bounds.top);

    let mut placed: Vec<PlacedWord> = Vec::with_capacity(words.len());
    for (i, (text, count)) in words.iter().enumerate() {
        let mut size = scaled_font(*count, min_count, max_count, opts);
        let color = TAB20[i % TAB20.len()];

        let spot = loop {
            let w = text_width(text, size);
            let h = line_height(size);
            let found = (0..MAX_SPIRAL_STEPS).find_map(|step| {
                let t = step as f64 * SPIRAL_STEP;
                let x = cx + aspect * SPIRAL_GROWTH * t * t.cos();
                let y = cy + SPIRAL_GROWTH * t * t.sin();
                let rect = Rect::around(x, y, w, h);
                let free = rect.inside(&bounds) && placed.iter().all(|p| !p.rect().intersects(&rect));
                free.then_some((x, y))
            });
            if found.is_some() || size * SHRINK < opts.min_font {
                break found.map(|(x, y)| (x, y, size));
            }
            size *= SHRINK;
        };

        match spot {
            Some((x, y, font_size)) => placed.push(PlacedWord {
                text: text.clone(),
                count: *count,
                x,
                y,
                font_size,
                color,
            }),
            None => log::debug!("Word cloud has no room for {}", text),
        }
    }
    placed
}

fn scaled_font(count: usize, min_count: usize, max_count: usize, opts: &WordCloudOptions) -> f64 {
    if max_count == min_count {
        return opts.max_font;
    }
    let t = (count - min_count) as f64 / (max_count - min_count) as f64;
    opts.min_font + t * (opts.max_font - opts.min_font)
}

#[derive(Template)]
#[template(path = "wordcloud.svg", escape = "html")]
struct WordCloudSvg<'a> {
    width: u32,
    height: u32,
    title: &'a str,
    title_x: f64,
    title_y: f64,
    title_size: u32,
    words: &'a [PlacedWord],
}

/// Build the SVG document for `rows`.
pub fn render_wordcloud(rows: &[LocatedRow<'_>], opts: &WordCloudOptions) -> Result<String> {
    let words = layout(&school_frequencies(rows), opts);
    let svg = WordCloudSvg {
        width: opts.width,
        height: opts.height,
        title: WORDCLOUD_TITLE,
        title_x: opts.width as f64 / 2.0,
        title_y: TITLE_BAND / 2.0,
        title_size: 28,
        words: &words,
    };
    Ok(svg.render()?)
}
