//! `sql-migrations`: `CREATE TABLE` statements inside a migration file
//! (any `.sql` file under a `migrate`/`migrations` path segment) become
//! `data_store` findings. Text-only.

use crate::model::{Confidence, Finding, FindingKind, FindingPayload, Fingerprint};
use crate::parsing::ParseConfidence;
use crate::scanners::registry::{ScannerAst, ScannerDescriptor};
use crate::scanners::util::{has_extension, path_contains_segment};
use crate::types::{FileEvidence, LanguageTag};
use regex::Regex;
use std::sync::OnceLock;

pub const DESCRIPTOR: ScannerDescriptor = ScannerDescriptor {
    id: "sql-migrations",
    language: LanguageTag::Other,
    matches: |path| has_extension(path, "sql") && path_contains_segment(path, "migrat"),
    scan,
};

fn create_table_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)create\s+table\s+(?:if\s+not\s+exists\s+)?"?'?\[?([\w.]+)"?'?\]?"#).unwrap())
}

fn scan(file: &FileEvidence, _ast: ScannerAst, _confidence: ParseConfidence) -> Vec<Finding> {
    let text = file.text();
    create_table_re()
        .captures_iter(&text)
        .map(|cap| {
            let name = cap[1].to_string();
            let loc = file.locatable_at(cap.get(0).unwrap().start());
            Finding {
                scanner_id: DESCRIPTOR.id,
                kind: FindingKind::DataStore,
                fingerprint: Fingerprint::component(FindingKind::DataStore, &name, LanguageTag::Other),
                confidence: Confidence::High,
                loc,
                payload: FindingPayload::DataStore {
                    store_kind: "relational-table".to_string(),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_table_under_migrate_dir_emits_datastore() {
        let sql = "CREATE TABLE IF NOT EXISTS orders (\n  id INTEGER PRIMARY KEY,\n  total NUMERIC\n);\n";
        let file = FileEvidence::new("db/migrate/20240101_create_orders.sql", sql.as_bytes().to_vec());
        let findings = scan(&file, None, ParseConfidence::High);
        assert_eq!(findings.len(), 1);
        match &findings[0].payload {
            FindingPayload::DataStore { store_kind } => assert_eq!(store_kind, "relational-table"),
            _ => panic!("expected data-store payload"),
        }
        match findings[0].fingerprint.as_component() {
            Some(c) => assert_eq!(c.canonical_name, "orders"),
            None => panic!("expected component fingerprint"),
        }
    }

    #[test]
    fn descriptor_does_not_match_sql_outside_migration_directories() {
        assert!(!(DESCRIPTOR.matches)(std::path::Path::new("reports/ad_hoc.sql")));
        assert!((DESCRIPTOR.matches)(std::path::Path::new("db/migrate/001_init.sql")));
    }
}
