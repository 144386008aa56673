//! Form state and the generate pipeline.

use std::fs;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use slug::slugify;
use tracing::{error, info};

use crate::canvas::RecordingCanvas;
use crate::config::AppSettings;
use crate::error::Result;
use crate::font::{self, FontSource};
use crate::layout::PageGeometry;
use crate::model::{Brand, ContractInput, Field};
use crate::pdf::PdfCanvas;
use crate::templates::{self, TemplateKind};

/// Holds the contract being edited and produces documents from it.
///
/// Generation never propagates an error: a failure is logged, kept in
/// [`Composer::last_error`] and the composer stays usable.
#[derive(Debug, Clone)]
pub struct Composer {
    input: ContractInput,
    template: TemplateKind,
    brand: Brand,
    generating: bool,
    last_error: Option<String>,
}

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub path: PathBuf,
    pub pages: usize,
    pub font_embedded: bool,
}

impl Composer {
    pub fn new(input: ContractInput, template: TemplateKind, brand: Brand) -> Self {
        Composer { input, template, brand, generating: false, last_error: None }
    }

    pub fn input(&self) -> &ContractInput {
        &self.input
    }

    pub fn template(&self) -> TemplateKind {
        self.template
    }

    pub fn set_template(&mut self, template: TemplateKind) {
        self.template = template;
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn update(&mut self, field: Field, value: impl Into<String>) {
        self.input.set(field, value);
    }

    pub fn file_name(&self) -> String {
        self.template.file_name(&self.input)
    }

    /// Render with the selected template and write the PDF under the
    /// settings' output folder. Returns `None` on failure.
    pub fn generate(&mut self, settings: &AppSettings) -> Option<Generated> {
        self.generate_on(settings, Local::now().date_naive())
    }

    pub fn generate_on(&mut self, settings: &AppSettings, today: NaiveDate) -> Option<Generated> {
        self.generating = true;
        self.last_error = None;
        let outcome = self.build(settings, today);
        self.generating = false;

        match outcome {
            Ok(generated) => {
                info!(path = %generated.path.display(), pages = generated.pages, "contract generated");
                Some(generated)
            }
            Err(e) => {
                error!(template = ?self.template, error = %e, "contract generation failed");
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    fn build(&self, settings: &AppSettings, today: NaiveDate) -> Result<Generated> {
        let mut canvas = PdfCanvas::new(self.template.title())?;
        let font_embedded = font::load_fonts(&mut canvas, &settings.font_source());
        let pages = templates::compose(
            &mut canvas,
            self.template,
            &self.input,
            &self.brand,
            PageGeometry::a4(),
            font_embedded,
        )?;
        let bytes = canvas.into_bytes()?;

        let client = match slugify(&self.input.client.business_name) {
            s if s.is_empty() => "musteri".to_string(),
            s => s,
        };
        let dir = settings.output_dir(today, &client);
        fs::create_dir_all(&dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, bytes)?;

        Ok(Generated { path, pages, font_embedded })
    }

    /// Lay the document out in memory, without touching the filesystem.
    pub fn preview(&self, fonts: Option<&FontSource>) -> Result<RecordingCanvas> {
        let mut canvas = RecordingCanvas::new();
        let font_available = fonts.is_some_and(|source| font::load_fonts(&mut canvas, source));
        templates::compose(
            &mut canvas,
            self.template,
            &self.input,
            &self.brand,
            PageGeometry::a4(),
            font_available,
        )?;
        Ok(canvas)
    }
}
