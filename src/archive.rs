//! Index of generated contracts under the output folder.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::templates::TemplateKind;

#[derive(Debug, Clone, PartialEq)]
pub struct ArchivedDocument {
    pub kind: TemplateKind,
    pub client: String,
    /// Contract number (service) or contract date (NDA).
    pub reference: String,
    pub path: PathBuf,
}

fn name_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(Hizmet_Sozlesmesi|Gizlilik_Sozlesmesi)_(.+)_([^_]+)\.pdf$").expect("valid pattern")
    })
}

/// Recognise a file name produced by [`TemplateKind::file_name`].
pub fn parse_file_name(name: &str) -> Option<(TemplateKind, String, String)> {
    let caps = name_pattern().captures(name)?;
    let kind = TemplateKind::ALL.into_iter().find(|k| k.file_prefix() == &caps[1])?;
    Some((kind, caps[2].replace('_', " "), caps[3].to_string()))
}

/// Every generated contract below `{output_root}/{year}`, newest first.
pub fn list_documents(output_root: &Path, year: i32) -> Vec<ArchivedDocument> {
    let mut found = Vec::new();
    let mut stack = vec![output_root.join(year.to_string())];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else { continue };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if let Some((kind, client, reference)) = parse_file_name(&name) {
                found.push(ArchivedDocument { kind, client, reference, path });
            }
        }
    }
    found.sort_by_key(|d| std::cmp::Reverse(fs::metadata(&d.path).and_then(|m| m.modified()).ok()));
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_templates() {
        assert_eq!(
            parse_file_name("Hizmet_Sozlesmesi_Acme_Gida_DNS-2026-4821.pdf"),
            Some((TemplateKind::Service, "Acme Gida".into(), "DNS-2026-4821".into()))
        );
        assert_eq!(
            parse_file_name("Gizlilik_Sozlesmesi_Musteri_19.10.2026.pdf"),
            Some((TemplateKind::Nda, "Musteri".into(), "19.10.2026".into()))
        );
        assert_eq!(parse_file_name("invoice.pdf"), None);
        assert_eq!(parse_file_name("Hizmet_Sozlesmesi_x.typ"), None);
    }

    #[test]
    fn lists_only_contracts_of_the_year() {
        let dir = tempfile::tempdir().unwrap();
        let y2026 = dir.path().join("2026/acme");
        let y2025 = dir.path().join("2025/acme");
        fs::create_dir_all(&y2026).unwrap();
        fs::create_dir_all(&y2025).unwrap();
        fs::write(y2026.join("Hizmet_Sozlesmesi_Acme_DNS-2026-1111.pdf"), b"%PDF").unwrap();
        fs::write(y2026.join("notes.txt"), b"").unwrap();
        fs::write(y2025.join("Gizlilik_Sozlesmesi_Acme_01.02.2025.pdf"), b"%PDF").unwrap();

        let docs = list_documents(dir.path(), 2026);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].reference, "DNS-2026-1111");
        assert!(list_documents(dir.path(), 2024).is_empty());
    }
}
