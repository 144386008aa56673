use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use comfy_table::{Attribute, Cell, Color, Table};
use inquire::{Confirm, DateSelect, Select, Text};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use contract_maker::api::{ContentClient, Lead};
use contract_maker::archive;
use contract_maker::canvas::Canvas;
use contract_maker::config::{self, AppSettings};
use contract_maker::model::{format_date, parse_assignment};
use contract_maker::text::js_number;
use contract_maker::{Brand, Composer, ContractInput, Field, IssuerConfig, PartyField, TemplateKind};

// ==========================================
// Constants
// ==========================================
const BUSINESS_TYPES: [&str; 6] = ["Perakende", "Üretim", "Hizmet", "E-ticaret", "Restoran / Kafe", "Diğer"];

// ==========================================
// CLI
// ==========================================

#[derive(Parser)]
#[command(name = "contract-maker", about = "Service agreements and NDAs as PDF")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in a new contract interactively
    New {
        #[arg(short, long, value_enum, default_value_t)]
        template: TemplateKind,
    },
    /// Generate a contract from a TOML input file
    Generate {
        input: PathBuf,
        #[arg(short, long, value_enum, default_value_t)]
        template: TemplateKind,
        /// Override one field, e.g. --set client.business_name="Acme Ltd"
        #[arg(long = "set", value_parser = parse_assignment)]
        overrides: Vec<(Field, String)>,
    },
    /// Print the laid out pages without writing a PDF
    Preview {
        input: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value_t)]
        template: TemplateKind,
    },
    /// Write a starter input file
    Sample {
        #[arg(default_value = "contract.toml")]
        path: PathBuf,
    },
    /// List generated contracts
    List {
        /// Year to list (defaults to current year)
        year: Option<i32>,
    },
    /// Open output folder
    Open,
    /// Configure data directory, fonts and site API
    Config,
    /// Send a contact request to the site
    Lead,
}

// ==========================================
// Main Function
// ==========================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Commands::Config = command {
        setup_config_wizard()?;
        return Ok(());
    }

    let settings = match config::load_settings() {
        Some(settings) => settings,
        None => setup_config_wizard()?,
    };
    let root = settings.root();
    let issuer = config::load_issuer_config(&root).context("Failed to load issuer.toml")?;
    let today = Local::now().date_naive();
    let defaults = ContractInput::new(&issuer, today);

    match command {
        Commands::New { template } => {
            let brand = resolve_brand(&settings, &issuer);
            let mut composer = Composer::new(defaults, template, brand);
            contract_wizard(&mut composer, today)?;
            println!("\n📝 {}", composer.file_name());
            if Confirm::new("Generate PDF now?").with_default(true).prompt()? {
                run_generate(&mut composer, &settings)?;
            }
        }
        Commands::Generate { input, template, overrides } => {
            let loaded = config::load_input(&input, &defaults)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let mut composer = Composer::new(loaded, template, resolve_brand(&settings, &issuer));
            for (field, value) in overrides {
                composer.update(field, value);
            }
            if template == TemplateKind::Service {
                warn_on_payment_split(composer.input());
            }
            run_generate(&mut composer, &settings)?;
        }
        Commands::Preview { input, template } => {
            let loaded = match input {
                Some(path) => config::load_input(&path, &defaults)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => defaults,
            };
            let composer = Composer::new(loaded, template, issuer.brand.clone());
            preview(&composer, &settings)?;
        }
        Commands::Sample { path } => {
            write_sample(&path, &defaults)?;
        }
        Commands::List { year } => {
            list_contracts(&settings, year.unwrap_or_else(|| today.year()));
        }
        Commands::Open => {
            open_folder_wizard(&settings.output_root());
        }
        Commands::Lead => {
            lead_wizard(&settings)?;
        }
        Commands::Config => unreachable!("handled before settings are loaded"),
    }
    Ok(())
}

// ==========================================
// 1. Contract Wizard
// ==========================================

fn contract_wizard(composer: &mut Composer, today: NaiveDate) -> Result<()> {
    println!("\n--- {} ---", composer.template());

    let date = DateSelect::new("Sözleşme Tarihi:").with_default(today).prompt()?;
    composer.update(Field::ContractDate, format_date(date));
    prompt_field(composer, Field::ContractNo, "Sözleşme No:")?;

    println!("\n--- Müşteri (Taraf B) ---");
    for pf in PartyField::ALL {
        prompt_field(composer, Field::Client(pf), &format!("{}:", pf.label()))?;
    }

    match composer.template() {
        TemplateKind::Service => {
            println!("\n--- Hizmet Detayları ---");
            prompt_date(composer, Field::StartDate, "Başlangıç Tarihi (Esc ile atla):", today)?;
            prompt_date(composer, Field::EndDate, "Bitiş Tarihi (Esc ile atla):", today)?;
            prompt_field(composer, Field::Duration, "Süre (örn. 6 ay):")?;
            prompt_field(composer, Field::Scope, "Hizmet Kapsamı (satır için \\n):")?;

            println!("\n--- Ödeme ---");
            prompt_field(composer, Field::TotalFee, "Toplam Bedel (TL):")?;
            prompt_field(composer, Field::UpfrontPct, "Peşinat (%):")?;
            prompt_field(composer, Field::RemainderPct, "Kalan Ödeme (%):")?;
            prompt_field(composer, Field::PaymentNote, "Ödeme Notu:")?;
            warn_on_payment_split(composer.input());
        }
        TemplateKind::Nda => {
            println!("\n--- Gizlilik ---");
            prompt_field(composer, Field::ConfidentialityDuration, "Gizlilik Süresi:")?;
            prompt_field(composer, Field::Penalty, "Cezai Şart (TL):")?;
        }
    }
    Ok(())
}

fn prompt_field(composer: &mut Composer, field: Field, label: &str) -> Result<()> {
    let current = composer.input().get(field).to_string();
    let answer = Text::new(label).with_default(&current).prompt()?;
    composer.update(field, answer.replace("\\n", "\n"));
    Ok(())
}

fn prompt_date(composer: &mut Composer, field: Field, label: &str, today: NaiveDate) -> Result<()> {
    if let Some(date) = DateSelect::new(label).with_default(today).prompt_skippable()? {
        composer.update(field, format_date(date));
    }
    Ok(())
}

/// Percentages are free text; a split that does not add up is only flagged.
fn warn_on_payment_split(input: &ContractInput) {
    let sum = js_number(&input.upfront_pct) + js_number(&input.remainder_pct);
    if !sum.is_nan() && (sum - 100.0).abs() > f64::EPSILON {
        println!("⚠️  Peşinat + kalan ödeme = %{} (100 değil). Sözleşme yine de oluşturulacak.", sum);
    }
}

// ==========================================
// 2. Generation & Preview
// ==========================================

fn resolve_brand(settings: &AppSettings, issuer: &IssuerConfig) -> Brand {
    let Some(base) = settings.api_base.as_deref().filter(|b| !b.trim().is_empty()) else {
        return issuer.brand.clone();
    };
    match ContentClient::new(base) {
        Ok(client) => issuer.brand.hydrate(&client),
        Err(e) => {
            debug!(error = %e, "content client unavailable");
            issuer.brand.clone()
        }
    }
}

fn run_generate(composer: &mut Composer, settings: &AppSettings) -> Result<()> {
    println!("⏳ Generating {}...", composer.template());
    let Some(generated) = composer.generate(settings) else {
        let reason = composer.last_error().unwrap_or("unknown error").to_string();
        println!("❌ PDF oluşturulamadı.");
        bail!(reason);
    };

    println!("✅ Contract saved: {}", generated.path.display());
    println!("📄 Pages: {}", generated.pages);
    if !generated.font_embedded {
        println!(
            "⚠️  Fonts not found at {}. Built-in Helvetica used, Turkish characters transliterated.",
            settings.font_source()
        );
    }
    if settings.open_after {
        open_and_reveal(&generated.path);
    }
    Ok(())
}

fn preview(composer: &Composer, settings: &AppSettings) -> Result<()> {
    let canvas = composer.preview(Some(&settings.font_source()))?;
    let pages = canvas.page_count();
    for page in 0..pages {
        println!("\n===== Sayfa {} / {} =====", page + 1, pages);
        for line in canvas.page_text(page) {
            println!("{}", line);
        }
    }
    println!("\n📝 {}", composer.file_name());
    Ok(())
}

fn write_sample(path: &Path, defaults: &ContractInput) -> Result<()> {
    if path.exists() && !Confirm::new(&format!("{} exists. Overwrite?", path.display())).with_default(false).prompt()? {
        println!("Operation cancelled.");
        return Ok(());
    }
    let toml_str = toml::to_string_pretty(defaults).context("Failed to serialize sample input")?;
    fs::write(path, toml_str).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("✅ Sample input written: {}", path.display());
    println!("   Fill in the [client] table, then run: contract-maker generate {}", path.display());
    Ok(())
}

// ==========================================
// 3. Listing
// ==========================================

fn list_contracts(settings: &AppSettings, year: i32) {
    let documents = archive::list_documents(&settings.output_root(), year);
    if documents.is_empty() {
        println!("No contracts found for {}.", year);
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Type"),
        Cell::new("Client"),
        Cell::new("No / Date"),
        Cell::new("File"),
    ]);

    for doc in &documents {
        let kind_cell = match doc.kind {
            TemplateKind::Service => Cell::new("Hizmet").fg(Color::Rgb { r: 15, g: 39, b: 71 }),
            TemplateKind::Nda => Cell::new("NDA").fg(Color::Rgb { r: 161, g: 98, b: 7 }),
        };
        let file = doc.path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        table.add_row(vec![kind_cell, Cell::new(&doc.client), Cell::new(&doc.reference), Cell::new(file)]);
    }

    table.add_row(vec![
        Cell::new(format!("Total ({})", year)).add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(format!("{} contracts", documents.len())).add_attribute(Attribute::Bold),
    ]);

    println!("\n--- Contracts ({}) ---", year);
    println!("{table}");
}

// ==========================================
// 4. Lead Submission
// ==========================================

fn lead_wizard(settings: &AppSettings) -> Result<()> {
    let Some(base) = settings.api_base.as_deref().filter(|b| !b.trim().is_empty()) else {
        bail!("No site API configured. Run `contract-maker config` first.");
    };
    let client = ContentClient::new(base)?;

    println!("\n--- İletişim Talebi ---");
    let lead = Lead {
        name: Text::new("Ad Soyad:").prompt()?,
        email: Text::new("E-posta:").prompt()?,
        phone: Text::new("Telefon:").prompt()?,
        business_type: Select::new("İşletme Türü:", BUSINESS_TYPES.to_vec()).prompt()?.to_string(),
        message: Text::new("Mesaj:").prompt()?,
    };

    match client.submit_lead(&lead) {
        Ok(()) => println!("✅ Talebiniz alındı. En kısa sürede dönüş yapacağız."),
        Err(e) => println!("❌ {}", e),
    }
    Ok(())
}

// ==========================================
// 5. Open Folder Logic
// ==========================================

fn open_folder_wizard(output_root: &Path) {
    let root_opt = "📂 Open Root Output Directory".to_string();

    let mut client_paths = Vec::new();
    if let Ok(years) = fs::read_dir(output_root) {
        for year_entry in years.flatten() {
            if !year_entry.path().is_dir() {
                continue;
            }
            let year_name = year_entry.file_name().to_string_lossy().to_string();
            if let Ok(clients) = fs::read_dir(year_entry.path()) {
                for client_entry in clients.flatten() {
                    if client_entry.path().is_dir() {
                        let client_name = client_entry.file_name().to_string_lossy().to_string();
                        client_paths.push(format!("{} / {}", year_name, client_name));
                    }
                }
            }
        }
    }
    client_paths.sort();
    client_paths.reverse();

    let mut options = vec![root_opt.clone()];
    options.extend(client_paths);

    match Select::new("Select Folder to Open:", options).prompt() {
        Ok(choice) => {
            let target_path = match choice.split_once(" / ") {
                Some((year, client)) if choice != root_opt => output_root.join(year).join(client),
                _ => output_root.to_path_buf(),
            };
            println!("🚀 Opening: {:?}", target_path);
            open_path(&target_path);
        }
        Err(_) => println!("Operation cancelled."),
    }
}

fn open_path(path: &Path) {
    #[cfg(target_os = "macos")]
    Command::new("open").arg(path).spawn().ok();
    #[cfg(target_os = "windows")]
    Command::new("explorer").arg(path).spawn().ok();
    #[cfg(target_os = "linux")]
    Command::new("xdg-open").arg(path).spawn().ok();
}

// Open file and reveal in Finder/Explorer
fn open_and_reveal(path: &Path) {
    #[cfg(target_os = "macos")]
    Command::new("open").arg("-R").arg(path).spawn().ok();
    #[cfg(target_os = "windows")]
    Command::new("explorer").arg(format!("/select,{}", path.to_string_lossy())).spawn().ok();
    #[cfg(target_os = "linux")]
    {
        if let Some(parent) = path.parent() {
            Command::new("xdg-open").arg(parent).spawn().ok();
        }
    }

    open_path(path);
}

// ==========================================
// 6. Config
// ==========================================

fn setup_config_wizard() -> Result<AppSettings> {
    println!("\n⚙️  --- Configuration Setup ---");
    let current = config::load_settings();
    let default_root = current
        .as_ref()
        .map(|s| s.data_root.clone())
        .unwrap_or_else(|| "~/Documents/Contracts".to_string());

    println!("📂 Opening folder picker...");
    let picked_path = rfd::FileDialog::new().set_title("Select Root Data Directory").pick_folder();

    let data_root = match picked_path {
        Some(path) => path.to_string_lossy().to_string(),
        None => {
            println!("❌ No folder selected. Falling back to manual input.");
            Text::new("Enter Root Data Directory:").with_default(&default_root).prompt()?
        }
    };

    let mut settings = AppSettings::new(data_root);
    let default_fonts = current
        .as_ref()
        .and_then(|s| s.font_source.clone())
        .unwrap_or_else(|| settings.font_source().to_string());
    let fonts = Text::new("Font folder or URL (Roboto-Regular.ttf, Roboto-Bold.ttf):")
        .with_default(&default_fonts)
        .prompt()?;
    settings.font_source = Some(fonts).filter(|f| !f.trim().is_empty());

    let default_api = current.as_ref().and_then(|s| s.api_base.clone()).unwrap_or_default();
    let api = Text::new("Site API base (optional):").with_default(&default_api).prompt()?;
    settings.api_base = Some(api).filter(|a| !a.trim().is_empty());

    let default_open = current.as_ref().map(|s| s.open_after).unwrap_or(true);
    settings.open_after = Confirm::new("Open PDFs after generating?").with_default(default_open).prompt()?;

    let path = config::save_settings(&settings).context("Failed to save settings")?;
    println!("✅ Settings saved: {}", path.display());
    Ok(settings)
}
