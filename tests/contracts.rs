use std::fs;

use chrono::NaiveDate;
use contract_maker::canvas::{Canvas, DrawOp, RecordingCanvas};
use contract_maker::layout::PageGeometry;
use contract_maker::config::{self, AppSettings};
use contract_maker::model::parse_assignment;
use contract_maker::text::normalize;
use contract_maker::{Brand, Composer, ContractInput, IssuerConfig, PartyField, TemplateKind};

fn issuer() -> IssuerConfig {
    toml::from_str(config::DEFAULT_ISSUER_TEMPLATE).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// Document text with wrapped lines rejoined.
fn flat_text(canvas: &RecordingCanvas) -> String {
    canvas.all_text().replace('\n', " ")
}

fn preview(input: ContractInput, kind: TemplateKind) -> RecordingCanvas {
    Composer::new(input, kind, issuer().brand).preview(None).unwrap()
}

#[test]
fn blank_service_contract_shows_placeholders() {
    let canvas = preview(ContractInput::default(), TemplateKind::Service);
    let text = flat_text(&canvas);

    assert!(text.contains("(Belirlenmedi)"));
    assert!(text.contains("(Hizmet kapsami belirtilmedi)"));
    assert!(text.contains("(Ad Soyad / Unvan)"));
    for pf in PartyField::ALL {
        let placeholder = format!("{}: ({})", pf.label(), pf.label());
        assert!(text.contains(normalize(&placeholder, false).as_ref()), "{}", placeholder);
    }
}

#[test]
fn fallback_font_output_is_ascii() {
    for kind in TemplateKind::ALL {
        let input = ContractInput::new(&issuer(), today());
        assert!(preview(input, kind).all_text().is_ascii(), "{:?}", kind);
    }
}

#[test]
fn service_fee_split_in_half() {
    let mut input = ContractInput::new(&issuer(), today());
    input.total_fee = "100000".into();
    input.upfront_pct = "50".into();
    input.remainder_pct = "50".into();

    let canvas = preview(input, TemplateKind::Service);
    let cells: Vec<String> = (0..canvas.page_count())
        .flat_map(|p| canvas.page_text(p).into_iter().map(str::to_string).collect::<Vec<_>>())
        .collect();

    assert_eq!(cells.iter().filter(|t| *t == "50.000 TL").count(), 2);
    assert!(cells.iter().any(|t| t == "100.000 TL"));
    assert!(cells.iter().any(|t| t == "Pesinat (%50)"));
}

#[test]
fn nda_quotes_duration_and_penalty() {
    let mut input = ContractInput::new(&issuer(), today());
    input.confidentiality_duration = "2 yıl".into();
    input.penalty = "50000".into();

    let text = flat_text(&preview(input, TemplateKind::Nda));
    assert!(text.contains("2 yil"));
    assert!(text.contains("50.000 TL"));
    assert!(text.contains("MADDE 9 - UYGULANACAK HUKUK VE YETKI"));
    assert!(text.contains("IMZALAR"));
}

/// Body text runs (footer excluded) that start below the bottom margin.
fn runs_past_bottom(canvas: &RecordingCanvas) -> Vec<String> {
    let bottom = PageGeometry::a4().bottom;
    (0..canvas.page_count())
        .flat_map(|page| canvas.ops(page))
        .filter_map(|op| match op {
            DrawOp::Text { text, y, style, .. } if style.size >= 8.0 && *y > bottom => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn long_payment_note_stays_on_the_pages() {
    let mut input = ContractInput::new(&issuer(), today());
    input.payment_note = "Ödeme koşulları taraflarca ayrıca yazılı olarak teyit edilir. ".repeat(60);

    let canvas = preview(input, TemplateKind::Service);
    assert!(runs_past_bottom(&canvas).is_empty());
    assert!(flat_text(&canvas).contains("MADDE 15 - GENEL HUKUMLER"));
}

#[test]
fn long_client_address_stays_on_the_pages() {
    let mut input = ContractInput::new(&issuer(), today());
    input.client.address = "Çok uzun adres satırı, mahalle, cadde, sokak ve bina bilgisi. ".repeat(80);

    let canvas = preview(input, TemplateKind::Nda);
    assert!(runs_past_bottom(&canvas).is_empty());
    assert!(canvas.page_count() > 2);
}

#[test]
fn generate_from_input_file_with_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("contract.toml");
    fs::write(
        &input_path,
        "contract_no = \"DNS-2026-4821\"\ntotal_fee = \"100000\"\n\n[client]\nbusiness_name = \"Acme Gıda\"\n",
    )
    .unwrap();

    let defaults = ContractInput::new(&issuer(), today());
    let input = config::load_input(&input_path, &defaults).unwrap();
    assert_eq!(input.issuer, defaults.issuer);
    assert_eq!(input.payment_note, defaults.payment_note);

    let mut composer = Composer::new(input, TemplateKind::Service, Brand::default());
    let (field, value) = parse_assignment("client.name=Ayşe Kaya").unwrap();
    composer.update(field, value);

    let settings = AppSettings::new(dir.path().to_string_lossy());
    let generated = composer.generate_on(&settings, today()).unwrap();

    assert_eq!(composer.input().client.name, "Ayşe Kaya");
    assert_eq!(
        generated.path,
        dir.path().join("output/2026/acme-gida/Hizmet_Sozlesmesi_Acme_Gıda_DNS-2026-4821.pdf")
    );
    let bytes = fs::read(&generated.path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let listed = contract_maker::archive::list_documents(&settings.output_root(), 2026);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].client, "Acme Gıda");
    assert_eq!(listed[0].reference, "DNS-2026-4821");
}
