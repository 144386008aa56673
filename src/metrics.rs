//! Text width measurement.
//!
//! The fallback font is the PDF base-14 Helvetica family, measured from its
//! AFM advance widths. Embedded TrueType faces are measured from their `hmtx`
//! table through `ttf-parser`.

use crate::error::{ContractError, Result};

pub const PT_TO_MM: f32 = 0.352_777_8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

/// Helvetica widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // digits
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica-Bold widths for ASCII 32..=126, in 1/1000 em.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // digits
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a..m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n..z
    389, 280, 389, 584, // '{'..'~'
];

const HELVETICA_DEFAULT: u16 = 556;

fn builtin_width(c: char, weight: Weight) -> u16 {
    let table = match weight {
        Weight::Regular => &HELVETICA,
        Weight::Bold => &HELVETICA_BOLD,
    };
    let code = c as u32;
    if (32..=126).contains(&code) {
        table[(code - 32) as usize]
    } else {
        HELVETICA_DEFAULT
    }
}

/// Raw bytes of the regular and bold faces of one family.
#[derive(Debug, Clone)]
pub struct FontFaces {
    pub regular: Vec<u8>,
    pub bold: Vec<u8>,
}

impl FontFaces {
    /// Both faces must parse, otherwise the set is useless to the renderer.
    pub fn validate(&self) -> Result<()> {
        for (name, data) in [("regular", &self.regular), ("bold", &self.bold)] {
            ttf_parser::Face::parse(data, 0)
                .map_err(|e| ContractError::Font(format!("{} face: {}", name, e)))?;
        }
        Ok(())
    }
}

/// Which font the renderer is currently drawing with.
#[derive(Debug, Clone, Default)]
pub enum FontMetrics {
    #[default]
    Builtin,
    Embedded(FontFaces),
}

impl FontMetrics {
    /// Width of `text` at `size` points, in millimetres.
    pub fn text_width(&self, text: &str, size: f32, weight: Weight) -> f32 {
        let em = match self {
            FontMetrics::Builtin => builtin_em(text, weight),
            FontMetrics::Embedded(faces) => {
                let data = match weight {
                    Weight::Regular => &faces.regular,
                    Weight::Bold => &faces.bold,
                };
                match ttf_parser::Face::parse(data, 0) {
                    Ok(face) => truetype_em(&face, text),
                    Err(_) => builtin_em(text, weight),
                }
            }
        };
        em * size * PT_TO_MM
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, FontMetrics::Embedded(_))
    }
}

fn builtin_em(text: &str, weight: Weight) -> f32 {
    text.chars().map(|c| builtin_width(c, weight) as f32).sum::<f32>() / 1000.0
}

fn truetype_em(face: &ttf_parser::Face<'_>, text: &str) -> f32 {
    let upem = face.units_per_em() as f32;
    let fallback = upem / 2.0;
    let units: f32 = text
        .chars()
        .map(|c| {
            face.glyph_index(c)
                .and_then(|gid| face.glyph_hor_advance(gid))
                .map(|adv| adv as f32)
                .unwrap_or(fallback)
        })
        .sum();
    units / upem
}

/// Line advance for a given font size, in millimetres.
pub fn line_height(size: f32) -> f32 {
    size * PT_TO_MM * 1.4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_widths_follow_afm() {
        let m = FontMetrics::Builtin;
        // "Hi" = 722 + 222 units at 10pt
        let w = m.text_width("Hi", 10.0, Weight::Regular);
        assert!((w - 0.944 * 10.0 * PT_TO_MM).abs() < 1e-4);
        assert!(m.text_width("Hi", 10.0, Weight::Bold) > w);
        assert_eq!(m.text_width("", 10.0, Weight::Regular), 0.0);
    }

    #[test]
    fn width_scales_with_size() {
        let m = FontMetrics::Builtin;
        let a = m.text_width("Sozlesme", 10.0, Weight::Regular);
        let b = m.text_width("Sozlesme", 20.0, Weight::Regular);
        assert!((b - 2.0 * a).abs() < 1e-4);
    }

    #[test]
    fn garbage_faces_fail_validation() {
        let faces = FontFaces {
            regular: b"not a font".to_vec(),
            bold: Vec::new(),
        };
        assert!(matches!(faces.validate(), Err(ContractError::Font(_))));
    }
}
