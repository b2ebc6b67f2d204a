//! Input validation for raw form submissions
//!
//! Turns an untyped field map into a typed record. Every field is checked and
//! every problem is reported, so a user can fix the whole form in one round
//! trip. Values that fail a range or domain check are reported and left out
//! of the partial record.

use crate::errors::PredictError;
use crate::vocabulary::CategoricalFeature;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Raw key/value input as received from the form
pub type RawRecord = HashMap<String, String>;

/// Lowest accepted outlet establishment year
pub const MIN_ESTABLISHMENT_YEAR: i64 = 1985;
/// Highest accepted outlet establishment year
pub const MAX_ESTABLISHMENT_YEAR: i64 = 2025;

/// A required input field, in feature-vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ItemIdentifier,
    ItemWeight,
    ItemFatContent,
    ItemVisibility,
    ItemType,
    ItemMrp,
    OutletIdentifier,
    OutletEstablishmentYear,
    OutletSize,
    OutletLocationType,
    OutletType,
}

/// How a field is coerced from its raw string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, must be non-empty
    Text,
    /// Text restricted to a fixed vocabulary
    Categorical(CategoricalFeature),
    /// Finite floating point number; the message follows the field title on
    /// coercion failure
    Number(&'static str),
    /// Signed integer
    Integer(&'static str),
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::ItemIdentifier,
        Field::ItemWeight,
        Field::ItemFatContent,
        Field::ItemVisibility,
        Field::ItemType,
        Field::ItemMrp,
        Field::OutletIdentifier,
        Field::OutletEstablishmentYear,
        Field::OutletSize,
        Field::OutletLocationType,
        Field::OutletType,
    ];

    /// Form key
    pub fn key(self) -> &'static str {
        match self {
            Field::ItemIdentifier => "item_identifier",
            Field::ItemWeight => "item_weight",
            Field::ItemFatContent => "item_fat_content",
            Field::ItemVisibility => "item_visibility",
            Field::ItemType => "item_type",
            Field::ItemMrp => "item_mrp",
            Field::OutletIdentifier => "outlet_identifier",
            Field::OutletEstablishmentYear => "outlet_establishment_year",
            Field::OutletSize => "outlet_size",
            Field::OutletLocationType => "outlet_location_type",
            Field::OutletType => "outlet_type",
        }
    }

    /// Human readable name: `item_mrp` becomes `Item Mrp`
    pub fn title(self) -> String {
        self.key()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::ItemIdentifier => FieldKind::Text,
            Field::ItemWeight => FieldKind::Number("must be a number"),
            Field::ItemFatContent => FieldKind::Categorical(CategoricalFeature::ItemFatContent),
            Field::ItemVisibility => FieldKind::Number("must be a number between 0 and 1"),
            Field::ItemType => FieldKind::Categorical(CategoricalFeature::ItemType),
            Field::ItemMrp => FieldKind::Number("must be a positive number"),
            Field::OutletIdentifier => FieldKind::Integer("must be an integer"),
            Field::OutletEstablishmentYear => FieldKind::Integer("must be a year between 1985 and 2025"),
            Field::OutletSize => FieldKind::Categorical(CategoricalFeature::OutletSize),
            Field::OutletLocationType => FieldKind::Categorical(CategoricalFeature::OutletLocationType),
            Field::OutletType => FieldKind::Categorical(CategoricalFeature::OutletType),
        }
    }

    /// Range or domain violation for an already coerced value
    fn check(self, value: &FieldValue) -> Option<String> {
        match (self, value) {
            (Field::ItemVisibility, FieldValue::Number(v)) if !(0.0..=1.0).contains(v) => {
                Some("Item visibility must be a number between 0 and 1".to_string())
            }
            (Field::ItemMrp, FieldValue::Number(v)) if *v <= 0.0 => {
                Some("Item MRP must be a positive number".to_string())
            }
            (Field::OutletEstablishmentYear, FieldValue::Integer(v))
                if !(MIN_ESTABLISHMENT_YEAR..=MAX_ESTABLISHMENT_YEAR).contains(v) =>
            {
                Some(format!(
                    "Outlet establishment year must be a year between {MIN_ESTABLISHMENT_YEAR} and {MAX_ESTABLISHMENT_YEAR}"
                ))
            }
            (_, FieldValue::Text(text)) => match self.kind() {
                FieldKind::Categorical(feature) if !feature.contains(text) => Some(format!(
                    "{} must be one of: {}",
                    self.title(),
                    feature.values().join(", ")
                )),
                _ => None,
            },
            _ => None,
        }
    }

    /// Coerce a non-empty raw value to this field's type
    fn coerce(self, raw: &str) -> Result<FieldValue, String> {
        match self.kind() {
            FieldKind::Text | FieldKind::Categorical(_) => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Number(message) => parse_number(raw)
                .map(FieldValue::Number)
                .ok_or_else(|| format!("{} {message}", self.title())),
            FieldKind::Integer(message) => raw
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| format!("{} {message}", self.title())),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A typed field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Integer(i64),
}

/// Typed, range-checked fields
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidatedRecord {
    fields: BTreeMap<Field, FieldValue>,
}

impl ValidatedRecord {
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    /// Text value of a field, if present and textual
    pub fn text(&self, field: Field) -> Option<&str> {
        match self.fields.get(&field)? {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric value of a field, integers widened to `f64`
    pub fn number(&self, field: Field) -> Option<f64> {
        match self.fields.get(&field)? {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Integer(v) => Some(*v as f64),
            FieldValue::Text(_) => None,
        }
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Outcome of validating one raw record
#[derive(Debug, Clone, Default)]
pub struct Validation {
    /// Fields that passed coercion and checks
    pub record: ValidatedRecord,
    /// Every problem found, in field order
    pub errors: Vec<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Accept the record only when no error was found
    pub fn into_result(self) -> Result<ValidatedRecord, PredictError> {
        if self.errors.is_empty() {
            Ok(self.record)
        } else {
            Err(PredictError::Validation(self.errors))
        }
    }
}

/// Validate a raw record, collecting every error
pub fn validate(raw: &RawRecord) -> Validation {
    let mut validation = Validation::default();

    for field in Field::ALL {
        let value = raw.get(field.key()).map(|v| v.trim()).unwrap_or_default();
        if value.is_empty() {
            validation.errors.push(format!("{} is required", field.title()));
            continue;
        }

        let typed = match field.coerce(value) {
            Ok(typed) => typed,
            Err(message) => {
                validation.errors.push(message);
                continue;
            }
        };

        match field.check(&typed) {
            Some(message) => validation.errors.push(message),
            None => {
                validation.record.fields.insert(field, typed);
            }
        }
    }

    validation
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample() -> RawRecord {
        [
            ("item_identifier", "FDA15"),
            ("item_weight", "9.3"),
            ("item_fat_content", "Low Fat"),
            ("item_visibility", "0.016"),
            ("item_type", "Dairy"),
            ("item_mrp", "249.8"),
            ("outlet_identifier", "1"),
            ("outlet_establishment_year", "1999"),
            ("outlet_size", "Medium"),
            ("outlet_location_type", "Tier 1"),
            ("outlet_type", "Supermarket Type1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn with(field: &str, value: &str) -> RawRecord {
        let mut raw = sample();
        raw.insert(field.to_string(), value.to_string());
        raw
    }

    #[test]
    fn titles() {
        assert_eq!(Field::ItemMrp.title(), "Item Mrp");
        assert_eq!(Field::OutletEstablishmentYear.title(), "Outlet Establishment Year");
        assert_eq!(Field::ItemIdentifier.title(), "Item Identifier");
    }

    #[test]
    fn well_formed_record_passes() {
        let validation = validate(&sample());
        assert!(validation.is_valid(), "{:?}", validation.errors);
        assert_eq!(validation.record.len(), 11);
        assert_eq!(validation.record.text(Field::ItemIdentifier), Some("FDA15"));
        assert_eq!(validation.record.number(Field::ItemWeight), Some(9.3));
        assert_eq!(
            validation.record.get(Field::OutletEstablishmentYear),
            Some(&FieldValue::Integer(1999))
        );
    }

    #[test]
    fn empty_input_reports_every_field() {
        let validation = validate(&RawRecord::new());
        assert_eq!(validation.errors.len(), 11);
        assert!(validation.errors.iter().all(|e| e.ends_with(" is required")));
        assert_eq!(validation.errors[0], "Item Identifier is required");
        assert_eq!(validation.errors[5], "Item Mrp is required");
        assert!(validation.record.is_empty());
    }

    #[test]
    fn blank_values_count_as_missing() {
        let validation = validate(&with("item_weight", "   "));
        assert_eq!(validation.errors, vec!["Item Weight is required".to_string()]);
        assert!(!validation.record.contains(Field::ItemWeight));
    }

    #[test]
    fn visibility_out_of_range() {
        let validation = validate(&with("item_visibility", "1.5"));
        assert_eq!(
            validation.errors,
            vec!["Item visibility must be a number between 0 and 1".to_string()]
        );
        assert!(!validation.record.contains(Field::ItemVisibility));
        assert_eq!(validation.record.len(), 10);
    }

    #[test]
    fn visibility_bounds_are_inclusive() {
        assert!(validate(&with("item_visibility", "0")).is_valid());
        assert!(validate(&with("item_visibility", "1")).is_valid());
    }

    #[test]
    fn mrp_must_be_positive() {
        let validation = validate(&with("item_mrp", "-5"));
        assert_eq!(validation.errors, vec!["Item MRP must be a positive number".to_string()]);
        assert!(!validate(&with("item_mrp", "0")).is_valid());
    }

    #[test]
    fn year_out_of_range() {
        let validation = validate(&with("outlet_establishment_year", "1900"));
        assert_eq!(
            validation.errors,
            vec!["Outlet establishment year must be a year between 1985 and 2025".to_string()]
        );
        assert!(validate(&with("outlet_establishment_year", "1985")).is_valid());
        assert!(validate(&with("outlet_establishment_year", "2025")).is_valid());
    }

    #[test]
    fn coercion_failures_use_field_titles() {
        let mut raw = sample();
        raw.insert("item_weight".into(), "heavy".into());
        raw.insert("outlet_identifier".into(), "1.5".into());
        raw.insert("outlet_establishment_year".into(), "nineteen".into());
        raw.insert("item_visibility".into(), "NaN".into());

        let validation = validate(&raw);
        assert_eq!(
            validation.errors,
            vec![
                "Item Weight must be a number".to_string(),
                "Item Visibility must be a number between 0 and 1".to_string(),
                "Outlet Identifier must be an integer".to_string(),
                "Outlet Establishment Year must be a year between 1985 and 2025".to_string(),
            ]
        );
        assert_eq!(validation.record.len(), 7);
    }

    #[test]
    fn categorical_domain_is_checked() {
        let validation = validate(&with("outlet_size", "Huge"));
        assert_eq!(
            validation.errors,
            vec!["Outlet Size must be one of: Small, Medium, High".to_string()]
        );
        assert!(!validation.record.contains(Field::OutletSize));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let validation = validate(&with("item_mrp", " 249.8 "));
        assert!(validation.is_valid());
        assert_eq!(validation.record.number(Field::ItemMrp), Some(249.8));
    }

    #[test]
    fn into_result_rejects_on_any_error() {
        let err = validate(&with("item_mrp", "-1")).into_result().unwrap_err();
        assert_eq!(err.details().map(|d| d.len()), Some(1));
        assert!(validate(&sample()).into_result().is_ok());
    }
}
