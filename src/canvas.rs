//! Drawing surface used by the layout engine.
//!
//! Coordinates are millimetres with the origin at the top-left corner of the
//! page; `y` grows downwards and text is positioned by its baseline.

use crate::error::Result;
use crate::metrics::{FontFaces, FontMetrics, Weight};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const INK: Rgb = Rgb(30, 41, 59);
    pub const MUTED: Rgb = Rgb(100, 116, 139);
    pub const BRAND: Rgb = Rgb(15, 39, 71);
    pub const ACCENT: Rgb = Rgb(201, 162, 39);
    pub const TINT: Rgb = Rgb(241, 245, 249);
    pub const RULE: Rgb = Rgb(203, 213, 225);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub weight: Weight,
    pub color: Rgb,
}

impl TextStyle {
    pub fn regular(size: f32) -> Self {
        TextStyle { size, weight: Weight::Regular, color: Rgb::INK }
    }

    pub fn bold(size: f32) -> Self {
        TextStyle { size, weight: Weight::Bold, color: Rgb::INK }
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }
}

/// A multi-page drawing target. There is always at least one page and
/// exactly one current page that drawing calls go to.
pub trait Canvas {
    fn page_count(&self) -> usize;

    /// Append a page and make it current.
    fn add_page(&mut self);

    /// Make an existing page (0-based) current.
    fn set_page(&mut self, index: usize);

    fn current_page(&self) -> usize;

    /// Switch to an embedded font family for all following text.
    fn register_fonts(&mut self, faces: FontFaces) -> Result<()>;

    fn metrics(&self) -> &FontMetrics;

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle);

    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    fn stroke_rect(&mut self, rect: Rect, color: Rgb, width: f32);

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, width: f32);

    fn text_width(&self, text: &str, size: f32, weight: Weight) -> f32 {
        self.metrics().text_width(text, size, weight)
    }

    /// Greedy word wrap to `max_width` millimetres.
    fn split_to_width(&self, text: &str, size: f32, weight: Weight, max_width: f32) -> Vec<String> {
        wrap_text(self.metrics(), text, size, weight, max_width)
    }
}

/// Greedy word wrap. Explicit newlines always break, blank lines survive,
/// and a word wider than the whole line is split between characters.
pub fn wrap_text(metrics: &FontMetrics, text: &str, size: f32, weight: Weight, max_width: f32) -> Vec<String> {
    let width = |s: &str| metrics.text_width(s, size, weight);
    let mut lines = Vec::new();

    for raw in text.split('\n') {
        let mut current = String::new();
        let mut pushed_any = false;

        for word in raw.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if width(&candidate) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                pushed_any = true;
            }
            if width(word) <= max_width {
                current = word.to_string();
            } else {
                for c in word.chars() {
                    current.push(c);
                    if width(&current) > max_width && current.chars().count() > 1 {
                        current.pop();
                        lines.push(std::mem::take(&mut current));
                        current.push(c);
                    }
                }
            }
        }

        if !current.is_empty() || !pushed_any {
            lines.push(current);
        }
    }
    lines
}

// ==========================================
// Recording canvas
// ==========================================

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text { text: String, x: f32, y: f32, style: TextStyle },
    FillRect { rect: Rect, color: Rgb },
    StrokeRect { rect: Rect, color: Rgb, width: f32 },
    Line { from: (f32, f32), to: (f32, f32), color: Rgb, width: f32 },
}

/// Keeps every drawing call in memory. Backs `preview` and the tests.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    pages: Vec<Vec<DrawOp>>,
    current: usize,
    metrics: FontMetrics,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        RecordingCanvas { pages: vec![Vec::new()], current: 0, metrics: FontMetrics::Builtin }
    }
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self, page: usize) -> &[DrawOp] {
        &self.pages[page]
    }

    /// Text runs of one page in drawing order.
    pub fn page_text(&self, page: usize) -> Vec<&str> {
        self.pages[page]
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All text of the document joined with newlines.
    pub fn all_text(&self) -> String {
        (0..self.pages.len())
            .flat_map(|p| self.page_text(p))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Canvas for RecordingCanvas {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self) {
        self.pages.push(Vec::new());
        self.current = self.pages.len() - 1;
    }

    fn set_page(&mut self, index: usize) {
        self.current = index.min(self.pages.len() - 1);
    }

    fn current_page(&self) -> usize {
        self.current
    }

    fn register_fonts(&mut self, faces: FontFaces) -> Result<()> {
        faces.validate()?;
        self.metrics = FontMetrics::Embedded(faces);
        Ok(())
    }

    fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        self.pages[self.current].push(DrawOp::Text { text: text.to_string(), x, y, style });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.pages[self.current].push(DrawOp::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgb, width: f32) {
        self.pages[self.current].push(DrawOp::StrokeRect { rect, color, width });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb, width: f32) {
        self.pages[self.current].push(DrawOp::Line { from, to, color, width });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(text: &str, max: f32) -> Vec<String> {
        wrap_text(&FontMetrics::Builtin, text, 10.0, Weight::Regular, max)
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap("kisa metin", 100.0), vec!["kisa metin"]);
    }

    #[test]
    fn wrapping_respects_width_and_keeps_words() {
        let text = "bu sozlesme taraflar arasinda karsilikli olarak imzalanmistir ve yururluktedir";
        let lines = wrap(text, 40.0);
        assert!(lines.len() > 1);
        let m = FontMetrics::Builtin;
        for line in &lines {
            assert!(m.text_width(line, 10.0, Weight::Regular) <= 40.0, "{line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn newlines_and_blank_lines_are_kept() {
        assert_eq!(wrap("a\n\nb", 100.0), vec!["a", "", "b"]);
        assert_eq!(wrap("", 100.0), vec![""]);
    }

    #[test]
    fn overlong_word_is_split() {
        let lines = wrap(&"x".repeat(200), 20.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "x".repeat(200));
    }

    #[test]
    fn recorder_tracks_pages() {
        let mut c = RecordingCanvas::new();
        c.draw_text("one", 0.0, 0.0, TextStyle::regular(10.0));
        c.add_page();
        c.draw_text("two", 0.0, 0.0, TextStyle::regular(10.0));
        c.set_page(0);
        c.draw_text("again", 0.0, 0.0, TextStyle::regular(10.0));

        assert_eq!(c.page_count(), 2);
        assert_eq!(c.page_text(0), vec!["one", "again"]);
        assert_eq!(c.page_text(1), vec!["two"]);
    }
}
