// 📐 Schema-Constrained Field Extractor - Sanitizing untrusted imports
//
// The AI/import collaborator hands us an arbitrary parsed JSON object; this
// module is the sole boundary between that object and persisted state. It
// never fails: every declared-but-invalid field is recorded with a reason,
// unknown keys are ignored, and the valid subset is returned for import.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// ENTITY TYPES
// ============================================================================

/// The closed set of importable entity schemas. Not extensible at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Card,
    Credit,
    Perk,
    Multiplier,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Card => "card",
            EntityType::Credit => "credit",
            EntityType::Perk => "perk",
            EntityType::Multiplier => "multiplier",
        }
    }

    pub const ALL: [EntityType; 4] = [
        EntityType::Card,
        EntityType::Credit,
        EntityType::Perk,
        EntityType::Multiplier,
    ];
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FIELD RULES
// ============================================================================

/// Validation rule attached to a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Non-empty string after trimming
    NonEmptyText,
    /// `#RRGGBB` color string, case-insensitive hex digits
    HexColor,
    /// Numeric string with no currency symbol or units (e.g. "300", not "$300")
    BareNumeric,
    /// Case-insensitive membership in a fixed vocabulary
    OneOf(&'static [&'static str]),
    /// Strictly positive JSON number
    PositiveNumber,
    /// Free text that must not itself embed a multiplier value like "3x on"
    PlainLabel,
}

impl FieldRule {
    /// Apply this rule to a raw JSON value. `Ok` means accept;
    /// `Err` carries the skip reason.
    fn check(&self, value: &Value) -> std::result::Result<(), String> {
        match self {
            FieldRule::NonEmptyText => {
                let text = expect_text(value)?;
                if text.trim().is_empty() {
                    return Err("must not be empty".to_string());
                }
                Ok(())
            }

            FieldRule::HexColor => {
                let text = expect_text(value)?;
                let digits = text
                    .strip_prefix('#')
                    .ok_or_else(|| format!("{:?} is missing the leading #", text))?;
                if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(format!("{:?} is not a #RRGGBB color", text));
                }
                Ok(())
            }

            FieldRule::BareNumeric => {
                let text = expect_text(value)?;
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err("must not be empty".to_string());
                }
                if trimmed.parse::<f64>().is_err() {
                    return Err(format!(
                        "{:?} is not a bare number (no currency symbol or units)",
                        text
                    ));
                }
                Ok(())
            }

            FieldRule::OneOf(vocabulary) => {
                let text = expect_text(value)?;
                if vocabulary
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(text.trim()))
                {
                    Ok(())
                } else {
                    Err(format!("{:?} is not one of {}", text, vocabulary.join(", ")))
                }
            }

            FieldRule::PositiveNumber => {
                let number = value
                    .as_f64()
                    .ok_or_else(|| format!("expected a number, got {}", json_type_name(value)))?;
                if number > 0.0 {
                    Ok(())
                } else {
                    Err(format!("must be strictly positive, got {}", number))
                }
            }

            FieldRule::PlainLabel => {
                let text = expect_text(value)?;
                if text.trim().is_empty() {
                    return Err("must not be empty".to_string());
                }
                if embeds_multiplier_value(text) {
                    return Err(format!(
                        "{:?} embeds a multiplier value; the rate belongs in its own field",
                        text
                    ));
                }
                Ok(())
            }
        }
    }
}

fn expect_text(value: &Value) -> std::result::Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected text, got {}", json_type_name(value)))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// True iff the text contains a token like "3x" or "1.5x" - a rate value
/// pasted into a display name.
fn embeds_multiplier_value(text: &str) -> bool {
    text.split_whitespace().any(|token| {
        let token = token.to_ascii_lowercase();
        let token = token.trim_end_matches(|c: char| !c.is_ascii_alphanumeric());
        match token.strip_suffix('x') {
            Some(prefix) => {
                !prefix.is_empty()
                    && prefix.chars().any(|c| c.is_ascii_digit())
                    && prefix.chars().all(|c| c.is_ascii_digit() || c == '.')
            }
            None => false,
        }
    })
}

// ============================================================================
// SCHEMAS
// ============================================================================

/// A named, typed slot in an entity schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub rule: FieldRule,
}

const fn field(name: &'static str, rule: FieldRule) -> FieldDescriptor {
    FieldDescriptor { name, rule }
}

const NETWORKS: &[&str] = &["visa", "mastercard", "amex", "discover"];
const FREQUENCIES: &[&str] = &["monthly", "quarterly", "semi_annual", "annual"];
const PERK_CATEGORIES: &[&str] = &["travel", "dining", "lounge", "insurance", "shopping", "other"];
const MULTIPLIER_CATEGORIES: &[&str] = &["travel", "dining", "gas", "groceries", "online", "other"];

const CARD_SCHEMA: &[FieldDescriptor] = &[
    field("CardName", FieldRule::NonEmptyText),
    field("Issuer", FieldRule::NonEmptyText),
    field("Network", FieldRule::OneOf(NETWORKS)),
    field("AnnualFee", FieldRule::PositiveNumber),
    field("Color", FieldRule::HexColor),
];

const CREDIT_SCHEMA: &[FieldDescriptor] = &[
    field("Name", FieldRule::NonEmptyText),
    field("Description", FieldRule::NonEmptyText),
    field("Value", FieldRule::BareNumeric),
    field("Frequency", FieldRule::OneOf(FREQUENCIES)),
];

const PERK_SCHEMA: &[FieldDescriptor] = &[
    field("Name", FieldRule::NonEmptyText),
    field("Description", FieldRule::NonEmptyText),
    field("Category", FieldRule::OneOf(PERK_CATEGORIES)),
];

const MULTIPLIER_SCHEMA: &[FieldDescriptor] = &[
    field("Name", FieldRule::PlainLabel),
    field("Rate", FieldRule::PositiveNumber),
    field("Category", FieldRule::OneOf(MULTIPLIER_CATEGORIES)),
];

/// Ordered field descriptors for an entity type.
pub fn schema_for(entity_type: EntityType) -> &'static [FieldDescriptor] {
    match entity_type {
        EntityType::Card => CARD_SCHEMA,
        EntityType::Credit => CREDIT_SCHEMA,
        EntityType::Perk => PERK_SCHEMA,
        EntityType::Multiplier => MULTIPLIER_SCHEMA,
    }
}

// ============================================================================
// FIELD VALIDATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCheck {
    pub valid: bool,
    pub reason: Option<String>,
}

impl FieldCheck {
    fn ok() -> Self {
        FieldCheck {
            valid: true,
            reason: None,
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        FieldCheck {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Validate one named field against its entity schema. A field name the
/// schema does not declare is itself invalid.
pub fn validate_field(entity_type: EntityType, field_name: &str, value: &Value) -> FieldCheck {
    let descriptor = schema_for(entity_type)
        .iter()
        .find(|d| d.name == field_name);

    match descriptor {
        None => FieldCheck::rejected(format!(
            "unexpected field {:?} for entity type {}",
            field_name, entity_type
        )),
        Some(descriptor) => match descriptor.rule.check(value) {
            Ok(()) => FieldCheck::ok(),
            Err(reason) => FieldCheck::rejected(reason),
        },
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedField {
    pub field: String,
    pub reason: String,
}

/// Partition of a raw object into the importable subset and the rejects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub valid: Map<String, Value>,
    pub skipped: Vec<SkippedField>,
}

impl Extraction {
    pub fn accepted_count(&self) -> usize {
        self.valid.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} field(s) accepted, {} skipped",
            self.accepted_count(),
            self.skipped_count()
        )
    }
}

/// Extract the valid subset of `raw` for the given entity schema.
///
/// Walks every field the schema declares, applying its rule to the
/// corresponding value when present. Declared-but-invalid fields are skipped
/// with a reason; keys the schema does not declare are silently ignored;
/// absent declared fields are not reported. Never fails, whatever the shape
/// of `raw` - a non-object payload simply yields an empty extraction.
pub fn extract_valid(entity_type: EntityType, raw: &Value) -> Extraction {
    let mut extraction = Extraction {
        valid: Map::new(),
        skipped: Vec::new(),
    };

    let object = match raw.as_object() {
        Some(object) => object,
        None => return extraction,
    };

    for descriptor in schema_for(entity_type) {
        let value = match object.get(descriptor.name) {
            Some(value) => value,
            None => continue,
        };

        match descriptor.rule.check(value) {
            Ok(()) => {
                extraction
                    .valid
                    .insert(descriptor.name.to_string(), value.clone());
            }
            Err(reason) => {
                extraction.skipped.push(SkippedField {
                    field: descriptor.name.to_string(),
                    reason,
                });
            }
        }
    }

    extraction
}

/// Parse the import collaborator's raw text into a JSON value.
/// This is the only fallible step at the import boundary; everything after
/// it goes through `extract_valid` and cannot fail.
pub fn parse_import_payload(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).context("Failed to parse import payload as JSON")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schemas_are_closed_and_nonempty() {
        for entity_type in EntityType::ALL {
            assert!(!schema_for(entity_type).is_empty());
        }
    }

    #[test]
    fn test_unexpected_field_is_invalid() {
        let check = validate_field(EntityType::Card, "FavoriteColor", &json!("blue"));
        assert!(!check.valid);
        assert!(check.reason.unwrap().contains("unexpected field"));
    }

    #[test]
    fn test_non_empty_text() {
        assert!(validate_field(EntityType::Card, "CardName", &json!("Sapphire")).valid);
        assert!(!validate_field(EntityType::Card, "CardName", &json!("")).valid);
        assert!(!validate_field(EntityType::Card, "CardName", &json!("   ")).valid);
        assert!(!validate_field(EntityType::Card, "CardName", &json!(42)).valid);
    }

    #[test]
    fn test_hex_color() {
        assert!(validate_field(EntityType::Card, "Color", &json!("#1A73E8")).valid);
        assert!(validate_field(EntityType::Card, "Color", &json!("#1a73e8")).valid);

        let missing_hash = validate_field(EntityType::Card, "Color", &json!("1A73E8"));
        assert!(!missing_hash.valid);
        assert!(missing_hash.reason.unwrap().contains('#'));

        assert!(!validate_field(EntityType::Card, "Color", &json!("#ZZZZZZ")).valid);
        assert!(!validate_field(EntityType::Card, "Color", &json!("#1A73E")).valid);
        assert!(!validate_field(EntityType::Card, "Color", &json!("#1A73E8F")).valid);
    }

    #[test]
    fn test_enumerated_membership_is_case_insensitive() {
        assert!(validate_field(EntityType::Card, "Network", &json!("Visa")).valid);
        assert!(validate_field(EntityType::Card, "Network", &json!("AMEX")).valid);
        assert!(!validate_field(EntityType::Card, "Network", &json!("diners")).valid);
    }

    #[test]
    fn test_positive_number() {
        assert!(validate_field(EntityType::Card, "AnnualFee", &json!(95)).valid);
        assert!(validate_field(EntityType::Card, "AnnualFee", &json!(0.5)).valid);
        assert!(!validate_field(EntityType::Card, "AnnualFee", &json!(0)).valid);
        assert!(!validate_field(EntityType::Card, "AnnualFee", &json!(-95)).valid);

        // wrong type: a numeric string is still a string
        let check = validate_field(EntityType::Card, "AnnualFee", &json!("95"));
        assert!(!check.valid);
        assert!(check.reason.unwrap().contains("expected a number"));
    }

    #[test]
    fn test_bare_numeric_string() {
        assert!(validate_field(EntityType::Credit, "Value", &json!("300")).valid);
        assert!(validate_field(EntityType::Credit, "Value", &json!("12.50")).valid);
        assert!(!validate_field(EntityType::Credit, "Value", &json!("$300")).valid);
        assert!(!validate_field(EntityType::Credit, "Value", &json!("300 USD")).valid);
        assert!(!validate_field(EntityType::Credit, "Value", &json!("")).valid);
    }

    #[test]
    fn test_plain_label_rejects_embedded_rates() {
        for bad in ["3x on groceries", "Dining 5X", "1.5x points", "Up to 10x!"] {
            let check = validate_field(EntityType::Multiplier, "Name", &json!(bad));
            assert!(!check.valid, "{:?} should be rejected", bad);
        }
        for good in ["Groceries", "Dining and takeout", "Tax software"] {
            let check = validate_field(EntityType::Multiplier, "Name", &json!(good));
            assert!(check.valid, "{:?} should be accepted", good);
        }
    }

    #[test]
    fn test_extract_partial_success() {
        let raw = json!({
            "CardName": "X",
            "AnnualFee": "95",
            "Bogus": 1
        });

        let extraction = extract_valid(EntityType::Card, &raw);

        assert_eq!(extraction.accepted_count(), 1);
        assert_eq!(extraction.valid.get("CardName"), Some(&json!("X")));

        assert_eq!(extraction.skipped_count(), 1);
        assert_eq!(extraction.skipped[0].field, "AnnualFee");
        assert!(extraction.skipped[0].reason.contains("expected a number"));

        // undeclared keys are silently ignored, not reported
        assert!(!extraction.skipped.iter().any(|s| s.field == "Bogus"));
    }

    #[test]
    fn test_extract_full_object() {
        let raw = json!({
            "CardName": "Sapphire Preferred",
            "Issuer": "Chase",
            "Network": "visa",
            "AnnualFee": 95,
            "Color": "#1A73E8"
        });

        let extraction = extract_valid(EntityType::Card, &raw);
        assert_eq!(extraction.accepted_count(), 5);
        assert_eq!(extraction.skipped_count(), 0);
    }

    #[test]
    fn test_extract_absent_fields_are_not_reported() {
        let raw = json!({ "CardName": "Gold Card" });
        let extraction = extract_valid(EntityType::Card, &raw);
        assert_eq!(extraction.accepted_count(), 1);
        assert_eq!(extraction.skipped_count(), 0);
    }

    #[test]
    fn test_extract_never_fails_on_arbitrary_shapes() {
        for raw in [json!(null), json!(42), json!("text"), json!([1, 2, 3])] {
            let extraction = extract_valid(EntityType::Perk, &raw);
            assert_eq!(extraction.accepted_count(), 0);
            assert_eq!(extraction.skipped_count(), 0);
        }

        // declared fields with wildly wrong types are skipped, not fatal
        let raw = json!({
            "Name": {"nested": true},
            "Description": [1, 2],
            "Category": null
        });
        let extraction = extract_valid(EntityType::Perk, &raw);
        assert_eq!(extraction.accepted_count(), 0);
        assert_eq!(extraction.skipped_count(), 3);
    }

    #[test]
    fn test_extraction_summary() {
        let raw = json!({ "Name": "Lounge access", "Category": "lounge" });
        let extraction = extract_valid(EntityType::Perk, &raw);
        assert_eq!(extraction.summary(), "2 field(s) accepted, 0 skipped");
    }

    #[test]
    fn test_parse_import_payload() {
        let value = parse_import_payload(r#"{"CardName": "X"}"#).unwrap();
        assert!(value.is_object());

        let err = parse_import_payload("not json at all").unwrap_err();
        assert!(format!("{:#}", err).contains("import payload"));
    }
}
