//! Panel barcode format: `PNL-<PROJECTCODE>-<SHORTID>`.
//!
//! The short id is the first ten hex digits of a BLAKE3 digest of the panel
//! id, upper-cased. It is an opaque token: there is no way back from a short
//! id to the panel id. Panels are resolved by exact match on the barcode
//! stored with the panel row.

use uuid::Uuid;

use crate::error::{LifecycleError, LifecycleResult};

pub const BARCODE_PREFIX: &str = "PNL";
pub const SHORT_ID_LEN: usize = 10;
pub const MAX_PROJECT_CODE_LEN: usize = 32;

/// Segments of a well-formed barcode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBarcode {
    pub project_code: String,
    pub short_id: String,
}

/// Builds the barcode for a panel of the given project.
pub fn generate(panel_id: Uuid, project_code: &str) -> LifecycleResult<String> {
    let project_code = project_code.trim().to_ascii_uppercase();
    if project_code.is_empty()
        || project_code.len() > MAX_PROJECT_CODE_LEN
        || !project_code.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(LifecycleError::InvalidInput(format!(
            "Invalid project code for barcode: '{project_code}'"
        )));
    }
    Ok(format!(
        "{BARCODE_PREFIX}-{project_code}-{}",
        short_id(panel_id)
    ))
}

/// Ten upper-case hex characters derived from the panel identity bytes.
pub fn short_id(panel_id: Uuid) -> String {
    let digest = blake3::hash(panel_id.as_bytes());
    digest.to_hex()[..SHORT_ID_LEN].to_ascii_uppercase()
}

pub fn validate(barcode: &str) -> bool {
    split(barcode).is_some()
}

/// Splits a barcode into its project code and short id.
pub fn parse(barcode: &str) -> LifecycleResult<ParsedBarcode> {
    split(barcode)
        .map(|(project_code, short_id)| ParsedBarcode {
            project_code: project_code.to_string(),
            short_id: short_id.to_string(),
        })
        .ok_or_else(|| LifecycleError::InvalidInput(format!("Invalid barcode format: {barcode}")))
}

fn split(barcode: &str) -> Option<(&str, &str)> {
    let mut segments = barcode.split('-');
    let (prefix, project_code, short_id) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() || prefix != BARCODE_PREFIX || project_code.is_empty() {
        return None;
    }
    let short_id_ok = short_id.len() == SHORT_ID_LEN
        && short_id
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase());
    short_id_ok.then_some((project_code, short_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_barcodes_validate() {
        for _ in 0..64 {
            let barcode = generate(Uuid::new_v4(), "PRJ001").unwrap();
            assert!(validate(&barcode), "{barcode}");
            assert!(barcode.starts_with("PNL-PRJ001-"));
            assert_eq!(barcode.len(), "PNL-PRJ001-".len() + SHORT_ID_LEN);
        }
    }

    #[test]
    fn test_generation_is_deterministic_per_panel() {
        let panel_id = Uuid::new_v4();
        assert_eq!(generate(panel_id, "prj001").unwrap(), generate(panel_id, "PRJ001").unwrap());
        assert_ne!(short_id(panel_id), short_id(Uuid::new_v4()));
    }

    #[test]
    fn test_parse_returns_segments_only() {
        let parsed = parse("PNL-PRJ001-0A1B2C3D4E").unwrap();
        assert_eq!(
            parsed,
            ParsedBarcode {
                project_code: "PRJ001".to_string(),
                short_id: "0A1B2C3D4E".to_string(),
            }
        );
    }

    #[test]
    fn test_validate_rejects_malformed_barcodes() {
        for barcode in [
            "",
            "PNL",
            "PNL-PRJ001",
            "BOX-PRJ001-0A1B2C3D4E",
            "pnl-PRJ001-0A1B2C3D4E",
            "PNL--0A1B2C3D4E",
            "PNL-PRJ001-0a1b2c3d4e",
            "PNL-PRJ001-0A1B2C",
            "PNL-PRJ-001-0A1B2C3D4E",
        ] {
            assert!(!validate(barcode), "{barcode:?}");
            assert!(matches!(parse(barcode), Err(LifecycleError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_generate_rejects_unusable_project_codes() {
        for code in ["", "  ", "PRJ-001", "PRJ 001"] {
            assert!(generate(Uuid::new_v4(), code).is_err(), "{code:?}");
        }
    }
}
