//! Text helpers shared by the templates and the layout engine.

use std::borrow::Cow;

/// Shown wherever an amount or date was left blank.
pub const NOT_DETERMINED: &str = "(Belirlenmedi)";

/// Substitutions applied when only the built-in font is available.
const TRANSLITERATION: &[(char, &str)] = &[
    ('ç', "c"),
    ('Ç', "C"),
    ('ğ', "g"),
    ('Ğ', "G"),
    ('ı', "i"),
    ('İ', "I"),
    ('ö', "o"),
    ('Ö', "O"),
    ('ş', "s"),
    ('Ş', "S"),
    ('ü', "u"),
    ('Ü', "U"),
    ('â', "a"),
    ('Â', "A"),
    ('î', "i"),
    ('Î', "I"),
    ('û', "u"),
    ('Û', "U"),
    ('á', "a"),
    ('à', "a"),
    ('ä', "a"),
    ('é', "e"),
    ('è', "e"),
    ('ê', "e"),
    ('ë', "e"),
    ('í', "i"),
    ('ï', "i"),
    ('ó', "o"),
    ('ô', "o"),
    ('ú', "u"),
    ('ñ', "n"),
    ('ß', "ss"),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2212}', "-"),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{201E}', "\""),
    ('\u{00AB}', "\""),
    ('\u{00BB}', "\""),
    ('\u{2026}', "..."),
    ('\u{2022}', "-"),
    ('\u{00A0}', " "),
    ('\u{20BA}', "TL"),
];

/// Make `text` safe for the fallback font.
///
/// With `font_available` the loaded font covers every glyph and the text is
/// returned as is. Otherwise known characters are transliterated and any
/// other non-ASCII character is dropped, so the result is always ASCII.
pub fn normalize(text: &str, font_available: bool) -> Cow<'_, str> {
    if font_available || text.is_ascii() {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else if let Some((_, sub)) = TRANSLITERATION.iter().find(|(k, _)| *k == c) {
            out.push_str(sub);
        }
    }
    Cow::Owned(out)
}

/// Numeric reading of a free-text field, the same way a browser's `Number()`
/// reads it: surrounding whitespace ignored, empty is zero, junk is NaN.
/// `0x`/`0o`/`0b` integers are read in their radix and only the spelled out
/// `Infinity` is infinite.
pub fn js_number(s: &str) -> f64 {
    let s = s.trim();
    match s {
        "" => return 0.0,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return f64::NAN;
            }
            return digits
                .chars()
                .filter_map(|c| c.to_digit(radix))
                .fold(0.0, |acc, d| acc * radix as f64 + d as f64);
        }
    }

    // f64's parser also takes `inf` and `nan` in any case
    if s.bytes().any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E')) {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Round half up, matching `Math.round`.
pub fn js_round(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Format a number with Turkish separators: `.` for thousands, `,` for
/// decimals, at most three fraction digits.
pub fn format_tr(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let negative = value < 0.0;
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if negative && (grouped != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac.is_empty() {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// `50.000 TL`
pub fn money(value: f64) -> String {
    format!("{} TL", format_tr(value))
}

/// Money rendering for an optional amount field: blank means not determined.
pub fn money_or_placeholder(raw: &str) -> String {
    if raw.trim().is_empty() {
        NOT_DETERMINED.to_string()
    } else {
        money(js_number(raw))
    }
}

/// The value itself, or `(label)` when blank.
pub fn or_placeholder(value: &str, label: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        format!("({})", label)
    } else {
        value.to_string()
    }
}

/// File name component: whitespace runs become `_`, path separators are
/// neutralised, blank falls back to `fallback`.
pub fn file_component(value: &str, fallback: &str) -> String {
    let joined = value.split_whitespace().collect::<Vec<_>>().join("_");
    if joined.is_empty() {
        return fallback.to_string();
    }
    joined.replace(['/', '\\'], "-")
}
