//! `printpdf` implementation of [`Canvas`].

use std::io::{BufWriter, Cursor};

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
    PdfLayerReference, PdfPageIndex, Point, Polygon,
};

use crate::canvas::{Canvas, Rect, Rgb, TextStyle};
use crate::error::{ContractError, Result};
use crate::metrics::{FontFaces, FontMetrics, Weight};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

pub struct PdfCanvas {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    current: usize,
    fonts: Fonts,
    metrics: FontMetrics,
}

fn pdf_err(e: printpdf::Error) -> ContractError {
    ContractError::Pdf(e.to_string())
}

fn color(c: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        c.0 as f32 / 255.0,
        c.1 as f32 / 255.0,
        c.2 as f32 / 255.0,
        None,
    ))
}

impl PdfCanvas {
    /// A4 document with a single empty page, drawing in built-in Helvetica.
    pub fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?;
        Ok(PdfCanvas {
            doc,
            pages: vec![(page, layer)],
            current: 0,
            fonts: Fonts { regular, bold },
            metrics: FontMetrics::Builtin,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        let (page, layer) = self.pages[self.current];
        self.doc.get_page(page).get_layer(layer)
    }

    /// Serialize the finished document.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut writer = BufWriter::new(Cursor::new(&mut buf));
            self.doc.save(&mut writer).map_err(pdf_err)?;
        }
        Ok(buf)
    }

    // PDF space has its origin bottom-left.
    fn point(x: f32, y: f32) -> Point {
        Point::new(Mm(x), Mm(PAGE_HEIGHT_MM - y))
    }

    fn ring(rect: Rect) -> Vec<(Point, bool)> {
        vec![
            (Self::point(rect.x, rect.y), false),
            (Self::point(rect.x + rect.w, rect.y), false),
            (Self::point(rect.x + rect.w, rect.y + rect.h), false),
            (Self::point(rect.x, rect.y + rect.h), false),
        ]
    }
}

impl Canvas for PdfCanvas {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        self.pages.push((page, layer));
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
        let regular = self
            .doc
            .add_external_font(Cursor::new(faces.regular.as_slice()))
            .map_err(pdf_err)?;
        let bold = self
            .doc
            .add_external_font(Cursor::new(faces.bold.as_slice()))
            .map_err(pdf_err)?;
        self.fonts = Fonts { regular, bold };
        self.metrics = FontMetrics::Embedded(faces);
        Ok(())
    }

    fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let layer = self.layer();
        let font = match style.weight {
            Weight::Regular => &self.fonts.regular,
            Weight::Bold => &self.fonts.bold,
        };
        layer.set_fill_color(color(style.color));
        layer.use_text(text, style.size, Mm(x), Mm(PAGE_HEIGHT_MM - y), font);
    }

    fn fill_rect(&mut self, rect: Rect, fill: Rgb) {
        let layer = self.layer();
        layer.set_fill_color(color(fill));
        layer.add_polygon(Polygon {
            rings: vec![Self::ring(rect)],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Rgb, width: f32) {
        let layer = self.layer();
        layer.set_outline_color(color(stroke));
        layer.set_outline_thickness(width);
        layer.add_line(Line { points: Self::ring(rect), is_closed: true });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Rgb, width: f32) {
        let layer = self.layer();
        layer.set_outline_color(color(stroke));
        layer.set_outline_thickness(width);
        layer.add_line(Line {
            points: vec![(Self::point(from.0, from.1), false), (Self::point(to.0, to.1), false)],
            is_closed: false,
        });
    }
}
