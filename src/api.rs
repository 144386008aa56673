//! Client for the marketing site's content and lead endpoints.
//!
//! Reads are best effort: any transport failure or non-OK status leaves the
//! caller with its built-in fallback. Lead submission reports failures.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ContractError, Result};
use crate::model::Brand;

pub const CONNECTIVITY_ERROR: &str = "Sunucuya ulaşılamadı. Lütfen bağlantınızı kontrol edip tekrar deneyin.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    All,
    Hero,
    Team,
    Branding,
    Footer,
}

impl Section {
    pub fn path(self) -> &'static str {
        match self {
            Section::All => "/api/content",
            Section::Hero => "/api/content/hero",
            Section::Team => "/api/content/team",
            Section::Branding => "/api/content/branding",
            Section::Footer => "/api/content/footer",
        }
    }
}

/// Shape of `/api/content/branding`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Branding {
    pub company_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

/// Body of `POST /api/leads`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub business_type: String,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

pub struct ContentClient {
    base: String,
    http: Client,
}

impl ContentClient {
    pub fn new(base: &str) -> Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(5)).build()?;
        Ok(ContentClient { base: base.trim_end_matches('/').to_string(), http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// `None` on any failure; the failure is only logged.
    pub fn fetch<T: DeserializeOwned>(&self, section: Section) -> Option<T> {
        let url = self.url(section.path());
        let result = self
            .http
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json::<T>());
        match result {
            Ok(body) => Some(body),
            Err(e) => {
                debug!(%url, error = %e, "content fetch failed, keeping fallback");
                None
            }
        }
    }

    pub fn fetch_or<T: DeserializeOwned>(&self, section: Section, fallback: T) -> T {
        self.fetch(section).unwrap_or(fallback)
    }

    /// Submit a contact-form lead. A rejected request carries the server's
    /// `detail` message when it sends one.
    pub fn submit_lead(&self, lead: &Lead) -> Result<()> {
        let response = self
            .http
            .post(self.url("/api/leads"))
            .json(lead)
            .send()
            .map_err(|e| {
                debug!(error = %e, "lead submission failed");
                ContractError::Lead(CONNECTIVITY_ERROR.to_string())
            })?;

        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status();
        let detail = response
            .json::<ErrorBody>()
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or_else(|| format!("Talep reddedildi ({})", status));
        Err(ContractError::Lead(detail))
    }
}

impl Brand {
    /// Overlay remote branding on the configured brand; fields the API does
    /// not send, or sends blank, are kept.
    pub fn hydrate(&self, client: &ContentClient) -> Brand {
        let remote: Branding = client.fetch_or(Section::Branding, Branding::default());
        let pick = |remote: Option<String>, local: &str| {
            remote.filter(|s| !s.trim().is_empty()).unwrap_or_else(|| local.to_string())
        };
        Brand {
            name: pick(remote.company_name, &self.name),
            phone: pick(remote.phone, &self.phone),
            email: pick(remote.email, &self.email),
            website: pick(remote.website, &self.website),
        }
    }
}
