use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::LedgerError;

/// One recorded expense, exactly as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub name: String,
    #[serde(serialize_with = "serialize_nominal")]
    pub nominal: f64,
    pub category: String,
    #[serde(with = "crate::types::timestamp")]
    pub date: DateTime<Utc>,
}

// largest magnitude below which every integer is exact in an f64
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Whole amounts are written as JSON integers, so `5` stays `5` on disk.
fn serialize_nominal<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT_INT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Request body for both create and partial update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nominal: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
}

/// A create request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub name: String,
    pub nominal: f64,
    pub category: String,
}

impl ExpenseInput {
    /// Create requires a non-empty `name` and `category` and a present `nominal`.
    /// A zero amount is a legitimate value.
    pub fn validate(self) -> Result<NewExpense, LedgerError> {
        match (
            non_empty(self.name),
            self.nominal,
            non_empty(self.category),
        ) {
            (Some(name), Some(nominal), Some(category)) => Ok(NewExpense {
                name,
                nominal,
                category,
            }),
            _ => Err(LedgerError::missing_fields()),
        }
    }

    /// Overlay the provided fields onto `current`; `id` and `date` are kept.
    pub fn apply_to(self, current: &Expense) -> Expense {
        Expense {
            id: current.id,
            name: non_empty(self.name).unwrap_or_else(|| current.name.clone()),
            nominal: self.nominal.unwrap_or(current.nominal),
            category: non_empty(self.category).unwrap_or_else(|| current.category.clone()),
            date: current.date,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Query string of `GET /expenses`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseQuery {
    pub category: Option<String>,
    pub startdate: Option<String>,
    pub enddate: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn coffee() -> Expense {
        Expense {
            id: 1,
            name: "Coffee".into(),
            nominal: 5.0,
            category: "Food".into(),
            date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn zero_nominal_is_accepted() {
        let input = ExpenseInput {
            name: Some("Freebie".into()),
            nominal: Some(0.0),
            category: Some("Misc".into()),
        };
        assert_eq!(input.validate().unwrap().nominal, 0.0);
    }

    #[test]
    fn blank_name_or_missing_nominal_is_rejected() {
        let blank = ExpenseInput {
            name: Some("  ".into()),
            nominal: Some(3.0),
            category: Some("Food".into()),
        };
        assert!(matches!(blank.validate(), Err(LedgerError::Validation(_))));

        let no_amount = ExpenseInput {
            name: Some("Tea".into()),
            nominal: None,
            category: Some("Food".into()),
        };
        assert!(matches!(no_amount.validate(), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn patch_keeps_unspecified_fields() {
        let patch = ExpenseInput {
            nominal: Some(10.0),
            name: Some(String::new()),
            ..Default::default()
        };
        let updated = patch.apply_to(&coffee());
        assert_eq!(updated.nominal, 10.0);
        assert_eq!(updated.name, "Coffee");
        assert_eq!(updated.category, "Food");
        assert_eq!(updated.date, coffee().date);
        assert_eq!(updated.id, 1);
    }

    #[test]
    fn zero_nominal_patch_replaces_amount() {
        let patch = ExpenseInput {
            nominal: Some(0.0),
            ..Default::default()
        };
        let updated = patch.apply_to(&coffee());
        assert_eq!(updated.nominal, 0.0);
        assert_eq!(updated.name, "Coffee");
    }

    #[test]
    fn whole_amounts_serialize_as_integers() {
        let json = serde_json::to_value(coffee()).unwrap();
        assert!(json["nominal"].is_i64());
        assert_eq!(json["nominal"], 5);

        let fractional = Expense {
            nominal: 2.5,
            ..coffee()
        };
        let json = serde_json::to_value(fractional).unwrap();
        assert_eq!(json["nominal"], 2.5);
    }

    #[test]
    fn reads_date_only_records() {
        let raw = r#"{"id":1,"name":"Coffee","nominal":5,"category":"Food","date":"2024-01-01"}"#;
        let parsed: Expense = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed, coffee());
    }
}
