//! Reissue profiles: the discount, naming, and refund settings applied when an
//! order is recreated. Loaded from a YAML file (default `config/reissue.yaml`).

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    FixedAmount,
    Percentage,
    Shipping,
}

impl std::fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscountKind::FixedAmount => write!(f, "fixed_amount"),
            DiscountKind::Percentage => write!(f, "percentage"),
            DiscountKind::Shipping => write!(f, "shipping"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountSettings {
    pub code: String,
    pub amount: Decimal,
    #[serde(default = "default_discount_kind")]
    pub kind: DiscountKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundSettings {
    #[serde(default = "default_gateway")]
    pub gateway: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub notify: bool,
}

impl Default for RefundSettings {
    fn default() -> Self {
        Self {
            gateway: default_gateway(),
            amount: Decimal::ZERO,
            notify: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReissueProfile {
    pub name: String,
    pub discount: DiscountSettings,
    /// Appended to the original order name, e.g. `#1001` + `-FreeBase`.
    pub name_suffix: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default = "default_financial_status")]
    pub financial_status: String,
    #[serde(default)]
    pub mark_fulfilled: bool,
    #[serde(default)]
    pub send_receipt: bool,
    #[serde(default)]
    pub send_fulfillment_receipt: bool,
    #[serde(default)]
    pub refund: RefundSettings,
}

#[derive(Debug, Deserialize)]
pub struct ProfilesFile {
    pub profiles: Vec<ReissueProfile>,
}

impl ProfilesFile {
    /// Finds a profile by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] listing the known names when no
    /// profile matches.
    pub fn get(&self, name: &str) -> Result<&ReissueProfile, ConfigError> {
        self.profiles.iter().find(|p| p.name == name).ok_or_else(|| {
            let known: Vec<&str> = self.profiles.iter().map(|p| p.name.as_str()).collect();
            ConfigError::Validation(format!(
                "unknown reissue profile '{name}'; known profiles: [{}]",
                known.join(", ")
            ))
        })
    }
}

fn default_discount_kind() -> DiscountKind {
    DiscountKind::FixedAmount
}

fn default_gateway() -> String {
    "manual".to_string()
}

fn default_financial_status() -> String {
    "paid".to_string()
}

/// Load and validate reissue profiles from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profiles(path: &Path) -> Result<ProfilesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProfilesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_profiles(&content)
}

fn parse_profiles(content: &str) -> Result<ProfilesFile, ConfigError> {
    let profiles_file: ProfilesFile = serde_yaml::from_str(content)?;
    validate_profiles(&profiles_file)?;
    Ok(profiles_file)
}

fn validate_profiles(profiles_file: &ProfilesFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for profile in &profiles_file.profiles {
        if profile.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "profile name must be non-empty".to_string(),
            ));
        }

        if !seen_names.insert(profile.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate profile name: '{}'",
                profile.name
            )));
        }

        if profile.discount.code.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "profile '{}' has an empty discount code",
                profile.name
            )));
        }

        if profile.discount.amount.is_sign_negative() {
            return Err(ConfigError::Validation(format!(
                "profile '{}' has a negative discount amount {}",
                profile.name, profile.discount.amount
            )));
        }

        if profile.refund.amount.is_sign_negative() {
            return Err(ConfigError::Validation(format!(
                "profile '{}' has a negative refund amount {}",
                profile.name, profile.refund.amount
            )));
        }

        if profile.name_suffix.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "profile '{}' must set a non-empty name_suffix",
                profile.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
profiles:
  - name: free-base
    discount:
      code: BASEFORFREE
      amount: "5.00"
    name_suffix: "-FreeBase"
    note: "This is a new order created with a discount"
  - name: discounted-fulfilled
    discount:
      code: BASEFORFREE
      amount: 5.00
      kind: fixed_amount
    name_suffix: "-DISCOUNTED"
    financial_status: paid
    mark_fulfilled: true
    refund:
      gateway: manual
      amount: "0.00"
"#;

    #[test]
    fn parses_sample_with_defaults() {
        let file = parse_profiles(SAMPLE).unwrap();
        assert_eq!(file.profiles.len(), 2);

        let free_base = file.get("free-base").unwrap();
        assert_eq!(free_base.discount.code, "BASEFORFREE");
        assert_eq!(free_base.discount.amount, Decimal::new(500, 2));
        assert_eq!(free_base.discount.kind, DiscountKind::FixedAmount);
        assert_eq!(free_base.financial_status, "paid");
        assert!(!free_base.mark_fulfilled);
        assert!(!free_base.send_receipt);
        assert_eq!(free_base.refund, RefundSettings::default());

        let fulfilled = file.get("discounted-fulfilled").unwrap();
        assert!(fulfilled.mark_fulfilled);
        assert_eq!(fulfilled.discount.amount, Decimal::new(5, 0));
    }

    #[test]
    fn unknown_profile_lists_known_names() {
        let file = parse_profiles(SAMPLE).unwrap();
        let err = file.get("missing").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("missing"));
        assert!(msg.contains("free-base, discounted-fulfilled"));
    }

    #[test]
    fn rejects_duplicate_names() {
        let yaml = r#"
profiles:
  - name: a
    discount: { code: X, amount: "1.00" }
    name_suffix: "-A"
  - name: a
    discount: { code: Y, amount: "2.00" }
    name_suffix: "-B"
"#;
        let err = parse_profiles(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn rejects_empty_discount_code() {
        let yaml = r#"
profiles:
  - name: a
    discount: { code: "  ", amount: "1.00" }
    name_suffix: "-A"
"#;
        let err = parse_profiles(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("discount code")));
    }

    #[test]
    fn rejects_negative_discount_amount() {
        let yaml = r#"
profiles:
  - name: a
    discount: { code: X, amount: "-3.00" }
    name_suffix: "-A"
"#;
        let err = parse_profiles(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("negative")));
    }

    #[test]
    fn rejects_blank_suffix() {
        let yaml = r#"
profiles:
  - name: a
    discount: { code: X, amount: "1.00" }
    name_suffix: ""
"#;
        let err = parse_profiles(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("name_suffix")));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = parse_profiles("profiles: [not: {valid").unwrap_err();
        assert!(matches!(err, ConfigError::ProfilesFileParse(_)));
    }

    #[test]
    fn load_profiles_reports_missing_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yaml");
        let err = load_profiles(&path).unwrap_err();
        assert!(
            matches!(err, ConfigError::ProfilesFileIo { ref path, .. } if path.ends_with("nope.yaml")),
            "expected ProfilesFileIo, got: {err:?}"
        );
    }

    #[test]
    fn load_profiles_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reissue.yaml");
        std::fs::write(&path, SAMPLE).unwrap();
        let file = load_profiles(&path).unwrap();
        assert_eq!(file.profiles[0].name, "free-base");
    }
}
