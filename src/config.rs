use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::font::FontSource;
use crate::model::{ContractInput, IssuerConfig};

// Embedded so a fresh data root always gets a usable issuer file
pub const DEFAULT_ISSUER_TEMPLATE: &str = include_str!("../issuer.toml");

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppSettings {
    pub data_root: String,
    /// Folder or base URL holding the TTF files; `{data_root}/fonts` when unset.
    #[serde(default)]
    pub font_source: Option<String>,
    /// Site API base, e.g. `https://example.com`.
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default = "default_true")]
    pub open_after: bool,
}

fn default_true() -> bool {
    true
}

impl AppSettings {
    pub fn new(data_root: impl Into<String>) -> Self {
        AppSettings { data_root: data_root.into(), font_source: None, api_base: None, open_after: true }
    }

    pub fn root(&self) -> PathBuf {
        PathBuf::from(expand_home_dir(&self.data_root))
    }

    pub fn output_root(&self) -> PathBuf {
        self.root().join("output")
    }

    /// `{output}/{year}/{client}` for a document dated `date`.
    pub fn output_dir(&self, date: NaiveDate, client_slug: &str) -> PathBuf {
        self.output_root().join(date.year().to_string()).join(client_slug)
    }

    pub fn font_source(&self) -> FontSource {
        match &self.font_source {
            Some(s) if !s.trim().is_empty() => FontSource::parse(&expand_home_dir(s)),
            _ => FontSource::Dir(self.root().join("fonts")),
        }
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "contract-maker", "app") {
        let config_dir = proj_dirs.config_dir();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).ok();
        }
        return config_dir.join("settings.toml");
    }
    PathBuf::from("settings.toml")
}

pub fn load_settings() -> Option<AppSettings> {
    load_settings_from(&get_config_path())
}

pub fn load_settings_from(path: &Path) -> Option<AppSettings> {
    let content = fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

pub fn save_settings(settings: &AppSettings) -> Result<PathBuf> {
    let path = get_config_path();
    save_settings_to(settings, &path)?;
    Ok(path)
}

pub fn save_settings_to(settings: &AppSettings, path: &Path) -> Result<()> {
    fs::write(path, toml::to_string_pretty(settings)?)?;
    Ok(())
}

/// Read `issuer.toml` from the data root, seeding it from the embedded
/// default on first use.
pub fn load_issuer_config(root: &Path) -> Result<IssuerConfig> {
    let path = root.join("issuer.toml");
    if path.exists() {
        let content = fs::read_to_string(&path)?;
        return Ok(toml::from_str(&content)?);
    }
    info!(path = %path.display(), "writing default issuer configuration");
    fs::create_dir_all(root)?;
    fs::write(&path, DEFAULT_ISSUER_TEMPLATE)?;
    Ok(toml::from_str(DEFAULT_ISSUER_TEMPLATE)?)
}

/// Read a contract input file. Keys the file leaves out take their value
/// from `defaults`; keys present in the file win, even when blank.
pub fn load_input(path: &Path, defaults: &ContractInput) -> Result<ContractInput> {
    let content = fs::read_to_string(path)?;
    let overrides: toml::Table = content.parse()?;
    let mut merged = toml::Value::try_from(defaults)?;
    if let toml::Value::Table(base) = &mut merged {
        merge_tables(base, overrides);
    }
    Ok(merged.try_into()?)
}

fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(inner)), toml::Value::Table(over)) => merge_tables(inner, over),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

pub fn expand_home_dir(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(base_dirs) = BaseDirs::new() {
            let home = base_dirs.home_dir().to_string_lossy();
            return path.replacen('~', &home, 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_roundtrip_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "data_root = \"/srv/contracts\"\n").unwrap();

        let settings = load_settings_from(&path).unwrap();
        assert_eq!(settings, AppSettings::new("/srv/contracts"));
        assert!(settings.open_after);

        let mut changed = settings.clone();
        changed.api_base = Some("https://example.com".into());
        save_settings_to(&changed, &path).unwrap();
        assert_eq!(load_settings_from(&path).unwrap(), changed);
    }

    #[test]
    fn font_source_defaults_to_data_root() {
        let settings = AppSettings::new("/srv/contracts");
        assert_eq!(settings.font_source(), FontSource::Dir(PathBuf::from("/srv/contracts/fonts")));

        let remote = AppSettings { font_source: Some("https://cdn.example.com/f".into()), ..settings };
        assert_eq!(remote.font_source(), FontSource::Url("https://cdn.example.com/f".into()));
    }

    #[test]
    fn issuer_config_is_seeded_once() {
        let dir = tempfile::tempdir().unwrap();
        let first = load_issuer_config(dir.path()).unwrap();
        assert!(dir.path().join("issuer.toml").exists());
        assert_eq!(first.contract_prefix, "DNS");

        fs::write(
            dir.path().join("issuer.toml"),
            DEFAULT_ISSUER_TEMPLATE.replace("contract_prefix = \"DNS\"", "contract_prefix = \"ABC\""),
        )
        .unwrap();
        assert_eq!(load_issuer_config(dir.path()).unwrap().contract_prefix, "ABC");
    }

    #[test]
    fn input_file_overrides_only_given_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.toml");
        fs::write(
            &path,
            "total_fee = \"100000\"\nupfront_pct = \"\"\n\n[client]\nbusiness_name = \"Acme\"\n",
        )
        .unwrap();

        let mut defaults = ContractInput::default();
        defaults.contract_no = "DNS-2026-1000".into();
        defaults.upfront_pct = "50".into();
        defaults.client.phone = "0212".into();

        let input = load_input(&path, &defaults).unwrap();
        assert_eq!(input.contract_no, "DNS-2026-1000");
        assert_eq!(input.total_fee, "100000");
        assert_eq!(input.upfront_pct, "");
        assert_eq!(input.client.business_name, "Acme");
        assert_eq!(input.client.phone, "0212");
    }

    #[test]
    fn output_dir_is_grouped_by_year_and_client() {
        let settings = AppSettings::new("/srv/contracts");
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(
            settings.output_dir(date, "acme"),
            PathBuf::from("/srv/contracts/output/2026/acme")
        );
    }
}
