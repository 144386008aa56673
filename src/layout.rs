//! Flowing layout on top of a [`Canvas`].
//!
//! [`Layout`] owns the write cursor for one document. Every block asks
//! [`Layout::ensure_space`] for its height before drawing, which is the only
//! place a page break is decided. Headers are stamped as pages are created;
//! footers need the final page count and are stamped by [`Layout::finalize`].

use crate::canvas::{Canvas, Rect, Rgb, TextStyle};
use crate::metrics::{line_height, Weight, PT_TO_MM};
use crate::pdf::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::text::normalize;

pub const BODY_SIZE: f32 = 9.5;
pub const SMALL_SIZE: f32 = 8.0;
const TITLE_SIZE: f32 = 10.5;

const SECTION_RESERVE: f32 = 20.0;
const SECTION_ADVANCE: f32 = 14.0;
const PARAGRAPH_PADDING: f32 = 3.0;
const CELL_PADDING: f32 = 2.0;
const BOX_GAP: f32 = 6.0;

pub const CONFIDENTIALITY_NOTICE: &str =
    "Bu belge gizlidir; yalnızca taraflar arasında kullanılmak üzere hazırlanmıştır.";

/// Page size and the band reserved for header and footer, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_x: f32,
    pub header_height: f32,
    /// Cursor position on a fresh page.
    pub top: f32,
    /// Content must not extend below this line.
    pub bottom: f32,
}

impl PageGeometry {
    pub fn a4() -> Self {
        PageGeometry {
            width: PAGE_WIDTH_MM,
            height: PAGE_HEIGHT_MM,
            margin_x: 20.0,
            header_height: 28.0,
            top: 40.0,
            bottom: PAGE_HEIGHT_MM - 26.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin_x
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// What the header band and footer show on every page.
#[derive(Debug, Clone, Default)]
pub struct HeaderInfo {
    pub title: String,
    pub contract_no: String,
    pub date: String,
    pub brand: String,
    pub contact_line: String,
}

/// One side of the parties section.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoBox {
    pub heading: String,
    pub rows: Vec<(String, String)>,
}

/// One side of the signature section.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureBox {
    pub heading: String,
    pub name: String,
}

pub struct Layout<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    geometry: PageGeometry,
    header: HeaderInfo,
    font_available: bool,
    cursor: f32,
}

/// Distance from the top of a text line to its baseline.
fn ascent(size: f32) -> f32 {
    size * PT_TO_MM
}

fn box_heading_height() -> f32 {
    line_height(BODY_SIZE) + 2.0
}

impl<'a, C: Canvas + ?Sized> Layout<'a, C> {
    /// Start laying out on the canvas' current (first) page.
    pub fn new(canvas: &'a mut C, geometry: PageGeometry, header: HeaderInfo, font_available: bool) -> Self {
        let mut layout = Layout { canvas, geometry, header, font_available, cursor: geometry.top };
        layout.stamp_header();
        layout
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn page_count(&self) -> usize {
        self.canvas.page_count()
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let text = normalize(text, self.font_available);
        self.canvas.draw_text(&text, x, y, style);
    }

    fn wrap(&self, text: &str, size: f32, weight: Weight, width: f32) -> Vec<String> {
        let text = normalize(text, self.font_available);
        self.canvas.split_to_width(&text, size, weight, width)
    }

    fn width_of(&self, text: &str, size: f32, weight: Weight) -> f32 {
        let text = normalize(text, self.font_available);
        self.canvas.text_width(&text, size, weight)
    }

    /// Break to a new page unless `needed` millimetres fit below the cursor.
    /// Returns whether a page was added.
    pub fn ensure_space(&mut self, needed: f32) -> bool {
        if self.cursor + needed <= self.geometry.bottom {
            return false;
        }
        self.canvas.add_page();
        self.stamp_header();
        self.cursor = self.geometry.top;
        true
    }

    pub fn space(&mut self, gap: f32) {
        self.cursor += gap;
    }

    pub fn section_title(&mut self, title: &str) {
        self.ensure_space(SECTION_RESERVE);
        let x = self.geometry.margin_x;
        let y = self.cursor;
        self.canvas.fill_rect(Rect::new(x, y - 1.0, 1.2, 5.5), Rgb::ACCENT);
        self.text(title, x + 4.0, y + ascent(TITLE_SIZE), TextStyle::bold(TITLE_SIZE).color(Rgb::BRAND));
        self.cursor += SECTION_ADVANCE;
    }

    /// Wrapped body text. A paragraph that fits on one page is never split;
    /// a longer one flows across pages line by line.
    pub fn paragraph(&mut self, text: &str, size: f32) {
        let lines = self.wrap(text, size, Weight::Regular, self.geometry.content_width());
        let lh = line_height(size);
        let needed = lines.len() as f32 * lh + PARAGRAPH_PADDING;
        let page_room = self.geometry.bottom - self.geometry.top;
        let style = TextStyle::regular(size);
        let x = self.geometry.margin_x;

        if needed <= page_room {
            self.ensure_space(needed);
            for line in &lines {
                self.canvas.draw_text(line, x, self.cursor + ascent(size), style);
                self.cursor += lh;
            }
        } else {
            for line in &lines {
                self.ensure_space(lh);
                self.canvas.draw_text(line, x, self.cursor + ascent(size), style);
                self.cursor += lh;
            }
        }
        self.cursor += PARAGRAPH_PADDING;
    }

    fn page_room(&self) -> f32 {
        self.geometry.bottom - self.geometry.top
    }

    /// Lines `start..end` of a wrapped cell, clipped to what the cell has.
    fn slice(lines: &[String], start: usize, end: usize) -> &[String] {
        &lines[start.min(lines.len())..end.min(lines.len())]
    }

    /// How many `lh`-high lines fit below the cursor once `chrome` is taken,
    /// never less than one.
    fn lines_that_fit(&self, chrome: f32, lh: f32, remaining: usize) -> usize {
        let room = self.geometry.bottom - self.cursor - chrome;
        ((room / lh).floor().max(1.0) as usize).min(remaining)
    }

    /// Two-column table: bold tinted label, wrapped value. `widths` are the
    /// label and value column widths. A table that fits on one page is kept
    /// together; otherwise rows flow, and a row taller than a page is split
    /// between its lines.
    pub fn table(&mut self, rows: &[(String, String)], widths: [f32; 2]) {
        let size = BODY_SIZE;
        let lh = line_height(size);
        let prepared: Vec<(Vec<String>, Vec<String>)> = rows
            .iter()
            .map(|(label, value)| {
                let l = self.wrap(label, size, Weight::Bold, widths[0] - 2.0 * CELL_PADDING);
                let v = self.wrap(value, size, Weight::Regular, widths[1] - 2.0 * CELL_PADDING);
                (l, v)
            })
            .collect();
        let row_height = |l: &Vec<String>, v: &Vec<String>| l.len().max(v.len()) as f32 * lh + 2.0 * CELL_PADDING;
        let total: f32 = prepared.iter().map(|(l, v)| row_height(l, v)).sum();
        if total <= self.page_room() {
            self.ensure_space(total);
        }

        for (label, value) in &prepared {
            let count = label.len().max(value.len());
            if row_height(label, value) <= self.page_room() {
                self.ensure_space(row_height(label, value));
                self.table_row(label, value, widths, count);
                continue;
            }
            let mut start = 0;
            while start < count {
                self.ensure_space(lh + 2.0 * CELL_PADDING);
                let take = self.lines_that_fit(2.0 * CELL_PADDING, lh, count - start);
                let end = start + take;
                self.table_row(Self::slice(label, start, end), Self::slice(value, start, end), widths, take);
                start = end;
            }
        }
        self.cursor += 4.0;
    }

    fn table_row(&mut self, label: &[String], value: &[String], widths: [f32; 2], lines: usize) {
        let size = BODY_SIZE;
        let lh = line_height(size);
        let h = lines as f32 * lh + 2.0 * CELL_PADDING;
        let x = self.geometry.margin_x;
        let y = self.cursor;
        let label_cell = Rect::new(x, y, widths[0], h);
        let value_cell = Rect::new(x + widths[0], y, widths[1], h);
        self.canvas.fill_rect(label_cell, Rgb::TINT);
        self.canvas.stroke_rect(label_cell, Rgb::RULE, 0.2);
        self.canvas.stroke_rect(value_cell, Rgb::RULE, 0.2);

        for (i, line) in label.iter().enumerate() {
            let baseline = y + CELL_PADDING + i as f32 * lh + ascent(size);
            self.canvas.draw_text(line, x + CELL_PADDING, baseline, TextStyle::bold(size).color(Rgb::BRAND));
        }
        for (i, line) in value.iter().enumerate() {
            let baseline = y + CELL_PADDING + i as f32 * lh + ascent(size);
            self.canvas.draw_text(line, x + widths[0] + CELL_PADDING, baseline, TextStyle::regular(size));
        }
        self.cursor += h;
    }

    fn box_lines(&self, b: &InfoBox, width: f32) -> Vec<String> {
        b.rows
            .iter()
            .flat_map(|(label, value)| {
                self.wrap(&format!("{}: {}", label, value), SMALL_SIZE + 0.5, Weight::Regular, width)
            })
            .collect()
    }

    /// Two bordered boxes side by side, each with a heading and label/value
    /// rows. Boxes taller than a page continue on the next page with their
    /// headings repeated.
    pub fn info_boxes(&mut self, left: &InfoBox, right: &InfoBox) {
        let lh = line_height(SMALL_SIZE + 0.5);
        let box_w = (self.geometry.content_width() - BOX_GAP) / 2.0;
        let inner = box_w - 2.0 * CELL_PADDING - 2.0;

        let lines = [self.box_lines(left, inner), self.box_lines(right, inner)];
        let headings = [left.heading.as_str(), right.heading.as_str()];
        let count = lines.iter().map(Vec::len).max().unwrap_or(0);
        // heading band, padding and the gap after the boxes
        let chrome = box_heading_height() + 2.0 * CELL_PADDING + 2.0 + 4.0;

        if chrome + count as f32 * lh <= self.page_room() {
            self.ensure_space(chrome + count as f32 * lh);
            self.box_pair(headings, [lines[0].as_slice(), lines[1].as_slice()], count);
            return;
        }
        let mut start = 0;
        while start < count {
            self.ensure_space(chrome + lh);
            let take = self.lines_that_fit(chrome, lh, count - start);
            let end = start + take;
            let parts = [Self::slice(&lines[0], start, end), Self::slice(&lines[1], start, end)];
            self.box_pair(headings, parts, take);
            start = end;
        }
    }

    fn box_pair(&mut self, headings: [&str; 2], parts: [&[String]; 2], lines: usize) {
        let size = SMALL_SIZE + 0.5;
        let lh = line_height(size);
        let box_w = (self.geometry.content_width() - BOX_GAP) / 2.0;
        let heading_h = box_heading_height();
        let box_h = heading_h + lines as f32 * lh + 2.0 * CELL_PADDING + 2.0;

        let y = self.cursor;
        for (i, (heading, body)) in headings.into_iter().zip(parts).enumerate() {
            let x = self.geometry.margin_x + i as f32 * (box_w + BOX_GAP);
            self.canvas.fill_rect(Rect::new(x, y, box_w, heading_h), Rgb::BRAND);
            self.canvas.stroke_rect(Rect::new(x, y, box_w, box_h), Rgb::RULE, 0.3);
            self.text(
                heading,
                x + CELL_PADDING + 1.0,
                y + 1.0 + ascent(BODY_SIZE),
                TextStyle::bold(BODY_SIZE).color(Rgb::WHITE),
            );
            let mut line_y = y + heading_h + CELL_PADDING;
            for line in body {
                self.canvas.draw_text(line, x + CELL_PADDING + 1.0, line_y + ascent(size), TextStyle::regular(size));
                line_y += lh;
            }
        }
        self.cursor += box_h + 4.0;
    }

    /// Name, blank signature and date lines, and a seal placeholder for each party.
    pub fn signature_blocks(&mut self, left: &SignatureBox, right: &SignatureBox) {
        let box_w = (self.geometry.content_width() - BOX_GAP) / 2.0;
        let box_h = 44.0;
        self.ensure_space(box_h + 4.0);

        let y = self.cursor;
        let size = SMALL_SIZE + 0.5;
        for (i, b) in [left, right].into_iter().enumerate() {
            let x = self.geometry.margin_x + i as f32 * (box_w + BOX_GAP);
            self.canvas.stroke_rect(Rect::new(x, y, box_w, box_h), Rgb::RULE, 0.3);
            self.text(&b.heading, x + 3.0, y + 3.0 + ascent(BODY_SIZE), TextStyle::bold(BODY_SIZE).color(Rgb::BRAND));
            self.text(&b.name, x + 3.0, y + 11.0 + ascent(size), TextStyle::regular(size));

            for (j, label) in ["İmza", "Tarih"].into_iter().enumerate() {
                let line_y = y + 22.0 + j as f32 * 8.0;
                self.text(label, x + 3.0, line_y, TextStyle::regular(size).color(Rgb::MUTED));
                self.canvas.line((x + 18.0, line_y + 0.5), (x + box_w - 4.0, line_y + 0.5), Rgb::RULE, 0.3);
            }
            self.text("Kaşe", x + 3.0, y + box_h - 4.0, TextStyle::regular(size).color(Rgb::MUTED));
        }
        self.cursor += box_h + 4.0;
    }

    fn stamp_header(&mut self) {
        let g = self.geometry;
        let right = g.width - g.margin_x;
        self.canvas.fill_rect(Rect::new(0.0, 0.0, g.width, g.header_height), Rgb::BRAND);
        self.canvas.fill_rect(Rect::new(0.0, g.header_height, g.width, 1.2), Rgb::ACCENT);

        let brand = self.header.brand.clone();
        let title = self.header.title.clone();
        let meta = format!("No: {}   Tarih: {}", self.header.contract_no, self.header.date);

        self.text(&brand, g.margin_x, 12.0, TextStyle::bold(15.0).color(Rgb::WHITE));
        self.text(&title, g.margin_x, 20.0, TextStyle::regular(9.0).color(Rgb::ACCENT));
        let meta_w = self.width_of(&meta, 8.5, Weight::Regular);
        self.text(&meta, right - meta_w, 20.0, TextStyle::regular(8.5).color(Rgb::WHITE));
    }

    /// Stamp the footer on every page now that the page count is final.
    /// Returns the page count.
    pub fn finalize(&mut self) -> usize {
        let total = self.canvas.page_count();
        let last = self.canvas.current_page();
        let g = self.geometry;
        let rule_y = g.height - 18.0;
        let right = g.width - g.margin_x;
        let contact = self.header.contact_line.clone();

        for page in 0..total {
            self.canvas.set_page(page);
            self.canvas.line((g.margin_x, rule_y), (right, rule_y), Rgb::RULE, 0.3);
            self.text(&contact, g.margin_x, rule_y + 5.0, TextStyle::regular(7.5).color(Rgb::MUTED));

            let number = format!("Sayfa {} / {}", page + 1, total);
            let number_w = self.width_of(&number, 7.5, Weight::Regular);
            self.text(&number, right - number_w, rule_y + 5.0, TextStyle::regular(7.5).color(Rgb::MUTED));

            let notice_w = self.width_of(CONFIDENTIALITY_NOTICE, 7.0, Weight::Regular);
            self.text(
                CONFIDENTIALITY_NOTICE,
                (g.width - notice_w) / 2.0,
                rule_y + 10.0,
                TextStyle::regular(7.0).color(Rgb::MUTED),
            );
        }
        self.canvas.set_page(last);
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, RecordingCanvas};

    fn header() -> HeaderInfo {
        HeaderInfo {
            title: "HİZMET SÖZLEŞMESİ".into(),
            contract_no: "DNS-2026-1234".into(),
            date: "19.10.2026".into(),
            brand: "Dinamik".into(),
            contact_line: "Dinamik  |  info@example.com".into(),
        }
    }

    #[test]
    fn new_layout_stamps_header_and_starts_at_top() {
        let mut canvas = RecordingCanvas::new();
        let layout = Layout::new(&mut canvas, PageGeometry::a4(), header(), false);
        assert_eq!(layout.cursor(), PageGeometry::a4().top);
        let text = canvas.page_text(0);
        assert!(text.contains(&"Dinamik"));
        assert!(text.contains(&"HIZMET SOZLESMESI"));
    }

    #[test]
    fn ensure_space_breaks_only_past_bottom() {
        let mut canvas = RecordingCanvas::new();
        let g = PageGeometry::a4();
        let mut layout = Layout::new(&mut canvas, g, header(), true);

        assert!(!layout.ensure_space(g.bottom - g.top));
        layout.space(g.bottom - g.top - 1.0);
        assert!(layout.ensure_space(2.0));
        assert_eq!(layout.cursor(), g.top);
        assert_eq!(layout.page_count(), 2);
        // header repeated on the new page
        assert!(canvas.page_text(1).contains(&"Dinamik"));
    }

    #[test]
    fn section_title_advances_cursor() {
        let mut canvas = RecordingCanvas::new();
        let mut layout = Layout::new(&mut canvas, PageGeometry::a4(), header(), true);
        let before = layout.cursor();
        layout.section_title("MADDE 1 - TARAFLAR");
        assert_eq!(layout.cursor() - before, 14.0);
        assert!(canvas.ops(0).iter().any(|op| matches!(op, DrawOp::FillRect { color: Rgb::ACCENT, .. })));
    }

    #[test]
    fn table_draws_label_and_value_cells() {
        let mut canvas = RecordingCanvas::new();
        let mut layout = Layout::new(&mut canvas, PageGeometry::a4(), header(), true);
        let rows = vec![("Başlangıç".to_string(), "01.11.2026".to_string())];
        let before = layout.cursor();
        layout.table(&rows, [60.0, 110.0]);
        assert!(layout.cursor() > before);
        let text = canvas.page_text(0);
        assert!(text.contains(&"Başlangıç"));
        assert!(text.contains(&"01.11.2026"));
    }

    #[test]
    fn finalize_restores_current_page() {
        let mut canvas = RecordingCanvas::new();
        let mut layout = Layout::new(&mut canvas, PageGeometry::a4(), header(), true);
        layout.space(500.0);
        layout.ensure_space(10.0);
        assert_eq!(layout.finalize(), 2);
        assert_eq!(canvas.current_page(), 1);
        assert!(canvas.page_text(0).contains(&"Sayfa 1 / 2"));
    }
}
