//! Contract templates.
//!
//! A template turns a [`ContractInput`] into an ordered list of [`Clause`]s.
//! Clause prose lives in `tera` templates so the wording can reference form
//! fields and derived amounts; [`compose`] then feeds the clauses through the
//! shared [`Layout`] primitives.

mod nda;
mod service;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use crate::canvas::Canvas;
use crate::error::Result;
use crate::layout::{HeaderInfo, InfoBox, Layout, PageGeometry, SignatureBox, BODY_SIZE};
use crate::model::{Brand, ContractInput, Party, PartyField};
use crate::text::{js_number, js_round, money, money_or_placeholder, or_placeholder, NOT_DETERMINED};

pub use service::ServicePolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Service agreement
    #[default]
    Service,
    /// Non-disclosure agreement
    Nda,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 2] = [TemplateKind::Service, TemplateKind::Nda];

    pub fn title(self) -> &'static str {
        match self {
            TemplateKind::Service => "DANIŞMANLIK HİZMET SÖZLEŞMESİ",
            TemplateKind::Nda => "GİZLİLİK SÖZLEŞMESİ",
        }
    }

    /// File name prefix, also used to recognise generated files.
    pub fn file_prefix(self) -> &'static str {
        match self {
            TemplateKind::Service => "Hizmet_Sozlesmesi",
            TemplateKind::Nda => "Gizlilik_Sozlesmesi",
        }
    }

    /// Deterministic output name from the client's trade title and the
    /// contract number (service) or contract date (NDA).
    pub fn file_name(self, input: &ContractInput) -> String {
        let business = crate::text::file_component(&input.client.business_name, "Musteri");
        let id = match self {
            TemplateKind::Service => crate::text::file_component(&input.contract_no, "Taslak"),
            TemplateKind::Nda => crate::text::file_component(&input.contract_date, "Taslak"),
        };
        format!("{}_{}_{}.pdf", self.file_prefix(), business, id)
    }

    pub fn clauses(self, input: &ContractInput) -> Result<Vec<Clause>> {
        let renderer = ClauseRenderer::new(input)?;
        match self {
            TemplateKind::Service => service::clauses(input, &renderer),
            TemplateKind::Nda => nda::clauses(input, &renderer),
        }
    }
}

impl std::fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateKind::Service => f.write_str("Hizmet Sözleşmesi"),
            TemplateKind::Nda => f.write_str("Gizlilik Sözleşmesi (NDA)"),
        }
    }
}

// ==========================================
// Clause model
// ==========================================

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(String),
    Table(Vec<(String, String)>),
    Parties(InfoBox, InfoBox),
    Signatures(SignatureBox, SignatureBox),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// `None` for the unnumbered signature section.
    pub number: Option<usize>,
    pub heading: String,
    pub blocks: Vec<Block>,
}

impl Clause {
    pub fn title(&self) -> String {
        match self.number {
            Some(n) => format!("MADDE {} - {}", n, self.heading),
            None => self.heading.clone(),
        }
    }

    /// Every table row of this clause.
    pub fn table_rows(&self) -> impl Iterator<Item = &(String, String)> {
        self.blocks.iter().flat_map(|b| match b {
            Block::Table(rows) => rows.as_slice(),
            _ => &[],
        })
    }

    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Numbers clauses in order, starting at 1.
pub(crate) struct ClauseList {
    clauses: Vec<Clause>,
}

impl ClauseList {
    pub fn new() -> Self {
        ClauseList { clauses: Vec::new() }
    }

    pub fn article(&mut self, heading: &str, blocks: Vec<Block>) {
        let number = self.clauses.len() + 1;
        self.clauses.push(Clause { number: Some(number), heading: heading.to_string(), blocks });
    }

    pub fn finish(mut self, signatures: Block) -> Vec<Clause> {
        self.clauses.push(Clause { number: None, heading: "İMZALAR".to_string(), blocks: vec![signatures] });
        self.clauses
    }
}

// ==========================================
// Clause text rendering
// ==========================================

/// Values the clause templates can reference.
#[derive(Serialize)]
struct ClauseContext<'a> {
    input: &'a ContractInput,
    issuer_name: String,
    client_name: String,
    fee: String,
    penalty: String,
    confidentiality_duration: String,
    policy: ServicePolicy,
}

pub(crate) struct ClauseRenderer {
    tera: Tera,
    context: Context,
}

impl ClauseRenderer {
    pub fn new(input: &ContractInput) -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(service::TEXTS.iter().chain(nda::TEXTS.iter()).copied())?;

        let ctx = ClauseContext {
            input,
            issuer_name: or_placeholder(&input.issuer.business_name, "Hizmet Veren"),
            client_name: or_placeholder(&input.client.business_name, "Hizmet Alan"),
            fee: money_or_placeholder(&input.total_fee),
            penalty: money_or_placeholder(&input.penalty),
            confidentiality_duration: or_placeholder(&input.confidentiality_duration, "Süre"),
            policy: ServicePolicy::default(),
        };
        let context = Context::from_serialize(&ctx)?;
        Ok(ClauseRenderer { tera, context })
    }

    pub fn render(&self, name: &str) -> Result<String> {
        Ok(self.tera.render(name, &self.context)?.trim().to_string())
    }

    pub fn text(&self, name: &str) -> Result<Block> {
        Ok(Block::Text(self.render(name)?))
    }
}

// ==========================================
// Shared blocks
// ==========================================

/// Party box; blank fields show as `(Label)`.
pub(crate) fn party_box(heading: &str, party: &Party) -> InfoBox {
    InfoBox {
        heading: heading.to_string(),
        rows: PartyField::ALL
            .into_iter()
            .map(|f| (f.label().to_string(), or_placeholder(f.get(party), f.label())))
            .collect(),
    }
}

pub(crate) fn signature_box(heading: &str, party: &Party) -> SignatureBox {
    let name = match (party.business_name.trim(), party.name.trim()) {
        ("", "") => "(Ad Soyad / Ünvan)".to_string(),
        (business, "") => business.to_string(),
        ("", person) => person.to_string(),
        (business, person) => format!("{} - {}", business, person),
    };
    SignatureBox { heading: heading.to_string(), name }
}

/// Derived payment rows. Upfront and remainder are computed independently
/// from their own percentages; they are not forced to add up to the total.
pub fn payment_rows(input: &ContractInput) -> Vec<(String, String)> {
    let upfront_label = format!("Peşinat (%{})", input.upfront_pct.trim());
    let remainder_label = format!("Kalan Ödeme (%{})", input.remainder_pct.trim());

    let (total, upfront, remainder) = if input.total_fee.trim().is_empty() {
        (NOT_DETERMINED.to_string(), NOT_DETERMINED.to_string(), NOT_DETERMINED.to_string())
    } else {
        let total = js_number(&input.total_fee);
        (
            money(total),
            money(js_round(total * js_number(&input.upfront_pct) / 100.0)),
            money(js_round(total * js_number(&input.remainder_pct) / 100.0)),
        )
    };

    vec![
        ("Toplam Hizmet Bedeli".to_string(), total),
        (upfront_label, upfront),
        (remainder_label, remainder),
        ("Ödeme Notu".to_string(), or_placeholder(&input.payment_note, "Not yok")),
    ]
}

pub(crate) fn value_or_not_determined(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() { NOT_DETERMINED.to_string() } else { value.to_string() }
}

// ==========================================
// Composition
// ==========================================

pub fn header_info(kind: TemplateKind, input: &ContractInput, brand: &Brand) -> HeaderInfo {
    HeaderInfo {
        title: kind.title().to_string(),
        contract_no: input.contract_no.clone(),
        date: input.contract_date.clone(),
        brand: brand.name.clone(),
        contact_line: brand.contact_line(),
    }
}

/// Lay out a complete document on `canvas` and stamp the footers.
/// Returns the final page count.
pub fn compose<C: Canvas + ?Sized>(
    canvas: &mut C,
    kind: TemplateKind,
    input: &ContractInput,
    brand: &Brand,
    geometry: PageGeometry,
    font_available: bool,
) -> Result<usize> {
    let clauses = kind.clauses(input)?;
    let mut layout = Layout::new(canvas, geometry, header_info(kind, input, brand), font_available);
    let content = layout.geometry().content_width();
    let label_w = 58.0_f32.min(content / 2.0);

    for clause in &clauses {
        layout.section_title(&clause.title());
        for block in &clause.blocks {
            match block {
                Block::Text(text) => layout.paragraph(text, BODY_SIZE),
                Block::Table(rows) => layout.table(rows, [label_w, content - label_w]),
                Block::Parties(left, right) => layout.info_boxes(left, right),
                Block::Signatures(left, right) => layout.signature_blocks(left, right),
            }
        }
        layout.space(2.0);
    }
    Ok(layout.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_rows_use_each_percentage_independently() {
        let input = ContractInput {
            total_fee: "100000".into(),
            upfront_pct: "30".into(),
            remainder_pct: "80".into(),
            ..Default::default()
        };
        let rows = payment_rows(&input);
        assert_eq!(rows[0].1, "100.000 TL");
        assert_eq!(rows[1], ("Peşinat (%30)".to_string(), "30.000 TL".to_string()));
        assert_eq!(rows[2], ("Kalan Ödeme (%80)".to_string(), "80.000 TL".to_string()));
    }

    #[test]
    fn payment_rows_round_half_up() {
        for (total, u, r) in [(999.0, 50.0, 50.0), (12345.0, 33.3, 66.7), (1.0, 50.0, 50.0), (777.0, 12.5, 0.0)] {
            let input = ContractInput {
                total_fee: total.to_string(),
                upfront_pct: u.to_string(),
                remainder_pct: r.to_string(),
                ..Default::default()
            };
            let rows = payment_rows(&input);
            assert_eq!(rows[1].1, money(js_round(total * u / 100.0)));
            assert_eq!(rows[2].1, money(js_round(total * r / 100.0)));
        }
    }

    #[test]
    fn blank_fee_shows_placeholders() {
        let rows = payment_rows(&ContractInput::default());
        assert!(rows[..3].iter().all(|(_, v)| v == NOT_DETERMINED));
    }

    #[test]
    fn file_names_follow_template() {
        let mut input = ContractInput {
            contract_no: "DNS-2026-4821".into(),
            contract_date: "19.10.2026".into(),
            ..Default::default()
        };
        assert_eq!(TemplateKind::Service.file_name(&input), "Hizmet_Sozlesmesi_Musteri_DNS-2026-4821.pdf");

        input.client.business_name = "Acme  Gıda Ltd.".into();
        assert_eq!(TemplateKind::Service.file_name(&input), "Hizmet_Sozlesmesi_Acme_Gıda_Ltd._DNS-2026-4821.pdf");
        assert_eq!(TemplateKind::Nda.file_name(&input), "Gizlilik_Sozlesmesi_Acme_Gıda_Ltd._19.10.2026.pdf");
    }

    #[test]
    fn signature_name_combines_business_and_person() {
        let mut party = Party::default();
        assert_eq!(signature_box("A", &party).name, "(Ad Soyad / Ünvan)");
        party.business_name = "Acme".into();
        assert_eq!(signature_box("A", &party).name, "Acme");
        party.name = "Ali Veli".into();
        assert_eq!(signature_box("A", &party).name, "Acme - Ali Veli");
    }
}
