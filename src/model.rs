use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ContractError;

/// One contracting party. Every field is free text.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Party {
    pub name: String,          // authorized person
    pub business_name: String, // trade title (Ünvan)
    pub phone: String,
    pub email: String,
    pub address: String,
    pub tax_office: String,
    pub tax_id: String,
}

/// Brand line printed in the header band and footer of every page.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Brand {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub website: String,
}

impl Brand {
    /// Footer contact line, empty parts skipped.
    pub fn contact_line(&self) -> String {
        [&self.name, &self.phone, &self.email, &self.website]
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim())
            .collect::<Vec<_>>()
            .join("  |  ")
    }
}

/// Contents of `issuer.toml`: who we are when we sign.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct IssuerConfig {
    #[serde(default = "default_prefix")]
    pub contract_prefix: String,
    pub brand: Brand,
    pub party: Party,
}

fn default_prefix() -> String {
    "SZL".to_string()
}

/// Everything the form collects. Amounts and percentages stay strings until
/// a template needs them as numbers.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ContractInput {
    pub issuer: Party,
    pub client: Party,
    pub contract_no: String,
    pub contract_date: String,
    pub start_date: String,
    pub end_date: String,
    pub duration: String,
    pub scope: String,
    pub total_fee: String,
    pub upfront_pct: String,
    pub remainder_pct: String,
    pub payment_note: String,
    pub confidentiality_duration: String,
    pub penalty: String,
}

pub const DEFAULT_PAYMENT_NOTE: &str =
    "Ödemeler fatura tarihinden itibaren 7 gün içinde banka havalesi ile yapılır. Bedellere KDV dahil değildir.";

impl ContractInput {
    /// Fresh form state: issuer pre-filled, client blank, generated contract number and date.
    pub fn new(issuer: &IssuerConfig, today: NaiveDate) -> Self {
        ContractInput {
            issuer: issuer.party.clone(),
            client: Party::default(),
            contract_no: generate_contract_no(&issuer.contract_prefix, today.year()),
            contract_date: format_date(today),
            upfront_pct: "50".to_string(),
            remainder_pct: "50".to_string(),
            payment_note: DEFAULT_PAYMENT_NOTE.to_string(),
            confidentiality_duration: "2 yıl".to_string(),
            ..Default::default()
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::Issuer(p) => p.slot(&mut self.issuer),
            Field::Client(p) => p.slot(&mut self.client),
            Field::ContractNo => &mut self.contract_no,
            Field::ContractDate => &mut self.contract_date,
            Field::StartDate => &mut self.start_date,
            Field::EndDate => &mut self.end_date,
            Field::Duration => &mut self.duration,
            Field::Scope => &mut self.scope,
            Field::TotalFee => &mut self.total_fee,
            Field::UpfrontPct => &mut self.upfront_pct,
            Field::RemainderPct => &mut self.remainder_pct,
            Field::PaymentNote => &mut self.payment_note,
            Field::ConfidentialityDuration => &mut self.confidentiality_duration,
            Field::Penalty => &mut self.penalty,
        }
    }

    /// Replace a single field, leaving every other field untouched.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Issuer(p) => p.get(&self.issuer),
            Field::Client(p) => p.get(&self.client),
            Field::ContractNo => &self.contract_no,
            Field::ContractDate => &self.contract_date,
            Field::StartDate => &self.start_date,
            Field::EndDate => &self.end_date,
            Field::Duration => &self.duration,
            Field::Scope => &self.scope,
            Field::TotalFee => &self.total_fee,
            Field::UpfrontPct => &self.upfront_pct,
            Field::RemainderPct => &self.remainder_pct,
            Field::PaymentNote => &self.payment_note,
            Field::ConfidentialityDuration => &self.confidentiality_duration,
            Field::Penalty => &self.penalty,
        }
    }
}

/// `PREFIX-YEAR-NNNN` with a random four digit suffix.
pub fn generate_contract_no(prefix: &str, year: i32) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(1000..10000);
    format!("{}-{}-{}", prefix, year, suffix)
}

/// Turkish short date, e.g. `19.10.2026`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

// ==========================================
// Field paths
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyField {
    Name,
    BusinessName,
    Phone,
    Email,
    Address,
    TaxOffice,
    TaxId,
}

impl PartyField {
    pub const ALL: [PartyField; 7] = [
        PartyField::Name,
        PartyField::BusinessName,
        PartyField::Phone,
        PartyField::Email,
        PartyField::Address,
        PartyField::TaxOffice,
        PartyField::TaxId,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PartyField::Name => "name",
            PartyField::BusinessName => "business_name",
            PartyField::Phone => "phone",
            PartyField::Email => "email",
            PartyField::Address => "address",
            PartyField::TaxOffice => "tax_office",
            PartyField::TaxId => "tax_id",
        }
    }

    /// Label used on the form and inside the party boxes.
    pub fn label(self) -> &'static str {
        match self {
            PartyField::Name => "Yetkili",
            PartyField::BusinessName => "Ünvan",
            PartyField::Phone => "Telefon",
            PartyField::Email => "E-posta",
            PartyField::Address => "Adres",
            PartyField::TaxOffice => "Vergi Dairesi",
            PartyField::TaxId => "Vergi No",
        }
    }

    fn slot(self, party: &mut Party) -> &mut String {
        match self {
            PartyField::Name => &mut party.name,
            PartyField::BusinessName => &mut party.business_name,
            PartyField::Phone => &mut party.phone,
            PartyField::Email => &mut party.email,
            PartyField::Address => &mut party.address,
            PartyField::TaxOffice => &mut party.tax_office,
            PartyField::TaxId => &mut party.tax_id,
        }
    }

    pub fn get(self, party: &Party) -> &str {
        match self {
            PartyField::Name => &party.name,
            PartyField::BusinessName => &party.business_name,
            PartyField::Phone => &party.phone,
            PartyField::Email => &party.email,
            PartyField::Address => &party.address,
            PartyField::TaxOffice => &party.tax_office,
            PartyField::TaxId => &party.tax_id,
        }
    }
}

/// Dotted path to one editable field of [`ContractInput`], e.g. `client.business_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Issuer(PartyField),
    Client(PartyField),
    ContractNo,
    ContractDate,
    StartDate,
    EndDate,
    Duration,
    Scope,
    TotalFee,
    UpfrontPct,
    RemainderPct,
    PaymentNote,
    ConfidentialityDuration,
    Penalty,
}

const SCALAR_FIELDS: [(&str, Field); 12] = [
    ("contract_no", Field::ContractNo),
    ("contract_date", Field::ContractDate),
    ("start_date", Field::StartDate),
    ("end_date", Field::EndDate),
    ("duration", Field::Duration),
    ("scope", Field::Scope),
    ("total_fee", Field::TotalFee),
    ("upfront_pct", Field::UpfrontPct),
    ("remainder_pct", Field::RemainderPct),
    ("payment_note", Field::PaymentNote),
    ("confidentiality_duration", Field::ConfidentialityDuration),
    ("penalty", Field::Penalty),
];

impl FromStr for Field {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((party, key)) = s.split_once('.') {
            let pf = PartyField::ALL
                .into_iter()
                .find(|f| f.key() == key)
                .ok_or_else(|| ContractError::UnknownField(s.to_string()))?;
            return match party {
                "issuer" => Ok(Field::Issuer(pf)),
                "client" => Ok(Field::Client(pf)),
                _ => Err(ContractError::UnknownField(s.to_string())),
            };
        }
        SCALAR_FIELDS
            .iter()
            .find(|(k, _)| *k == s)
            .map(|(_, f)| *f)
            .ok_or_else(|| ContractError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Issuer(p) => write!(f, "issuer.{}", p.key()),
            Field::Client(p) => write!(f, "client.{}", p.key()),
            other => {
                let key = SCALAR_FIELDS
                    .iter()
                    .find(|(_, field)| field == other)
                    .map(|(k, _)| *k)
                    .unwrap_or("?");
                f.write_str(key)
            }
        }
    }
}

/// Parse a `field=value` override from the command line.
pub fn parse_assignment(s: &str) -> Result<(Field, String), ContractError> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| ContractError::UnknownField(s.to_string()))?;
    Ok((key.parse()?, value.replace("\\n", "\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> IssuerConfig {
        toml::from_str(crate::config::DEFAULT_ISSUER_TEMPLATE).unwrap()
    }

    #[test]
    fn new_input_prefills_issuer_and_defaults() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let input = ContractInput::new(&issuer(), today);

        assert_eq!(input.contract_date, "19.10.2026");
        assert!(input.contract_no.starts_with("DNS-2026-"));
        let suffix: u32 = input.contract_no.rsplit('-').next().unwrap().parse().unwrap();
        assert!((1000..=9999).contains(&suffix));
        assert!(!input.issuer.business_name.is_empty());
        assert_eq!(input.client, Party::default());
        assert_eq!(input.upfront_pct, "50");
        assert_eq!(input.remainder_pct, "50");
    }

    #[test]
    fn set_touches_only_one_field() {
        let mut input = ContractInput::default();
        input.total_fee = "1000".into();
        let before = input.clone();

        input.set(Field::Client(PartyField::BusinessName), "Acme A.Ş.");

        assert_eq!(input.client.business_name, "Acme A.Ş.");
        assert_eq!(input.total_fee, before.total_fee);
        assert_eq!(input.issuer, before.issuer);
        assert_eq!(input.get(Field::Client(PartyField::BusinessName)), "Acme A.Ş.");
    }

    #[test]
    fn field_paths_parse_and_display() {
        for key in ["client.tax_id", "issuer.name", "penalty", "upfront_pct"] {
            let field: Field = key.parse().unwrap();
            assert_eq!(field.to_string(), key);
        }
        assert!("client.shoe_size".parse::<Field>().is_err());
        assert!("nobody.name".parse::<Field>().is_err());
        assert!("fee".parse::<Field>().is_err());
    }

    #[test]
    fn assignment_keeps_equals_in_value_and_expands_newlines() {
        let (field, value) = parse_assignment("scope=a=b\\nc").unwrap();
        assert_eq!(field, Field::Scope);
        assert_eq!(value, "a=b\nc");
        assert!(parse_assignment("scope").is_err());
    }

    #[test]
    fn brand_contact_line_skips_blanks() {
        let brand = Brand {
            name: "X".into(),
            phone: " ".into(),
            email: "a@b.c".into(),
            website: String::new(),
        };
        assert_eq!(brand.contact_line(), "X  |  a@b.c");
    }
}
