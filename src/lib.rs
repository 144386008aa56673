//! contract-maker - consulting contracts as paginated PDFs
//!
//! A [`Composer`] holds the form state ([`ContractInput`]) and a selected
//! [`TemplateKind`]. Generating runs this pipeline:
//!
//! 1. **Font loading** - embed the localized TTF family, or fall back to
//!    built-in Helvetica with transliterated text
//! 2. **Clauses** - the template turns the input into numbered articles,
//!    tables and party boxes
//! 3. **Layout** - clauses flow onto pages with a header band per page
//! 4. **Finalize** - footers with `Sayfa P / N` are stamped on every page
//! 5. **Save** - the PDF lands in `{data_root}/output/{year}/{client}/`

pub mod api;
pub mod archive;
pub mod canvas;
pub mod composer;
pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod pdf;
pub mod templates;
pub mod text;

pub use composer::{Composer, Generated};
pub use error::{ContractError, Result};
pub use model::{Brand, ContractInput, Field, IssuerConfig, Party, PartyField};
pub use templates::TemplateKind;
