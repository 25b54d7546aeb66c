//! Fee Composition
//!
//! Derives the single charge amount from an application's fee fields.

use serde::{Deserialize, Deserializer};

/// Fee composition of one scholarship application.
///
/// Fields arrive from untrusted client JSON: absent or non-numeric values
/// are coerced to zero rather than rejected. Numeric strings are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    #[serde(default, deserialize_with = "lenient_amount")]
    pub application_fees: f64,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub tuition_fees: f64,

    #[serde(default, deserialize_with = "lenient_amount")]
    pub service_charge: f64,
}

impl FeeBreakdown {
    pub fn new(application_fees: f64, tuition_fees: f64, service_charge: f64) -> Self {
        Self {
            application_fees,
            tuition_fees,
            service_charge,
        }
    }

    /// Total charge in minor currency units (cents).
    ///
    /// `round((application + tuition + service) * 100)`, computed once at
    /// session creation and never re-derived afterward. Negative sums pass
    /// through unchanged.
    #[allow(clippy::cast_possible_truncation)]
    pub fn total_minor_units(&self) -> i64 {
        ((self.application_fees + self.tuition_fees + self.service_charge) * 100.0).round() as i64
    }
}

/// Accept a number, a numeric string, or anything else as zero.
fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_total_minor_units() {
        let fees = FeeBreakdown::new(50.0, 100.0, 10.0);
        assert_eq!(fees.total_minor_units(), 16000);
    }

    #[test]
    fn test_fractional_amounts_round() {
        let fees = FeeBreakdown::new(0.125, 0.0, 0.0);
        assert_eq!(fees.total_minor_units(), 13);

        let fees = FeeBreakdown::new(19.99, 0.01, 0.0);
        assert_eq!(fees.total_minor_units(), 2000);

        // f64 sum lands just under 1999.5 and rounds down
        let fees = FeeBreakdown::new(19.99, 0.005, 0.0);
        assert_eq!(fees.total_minor_units(), 1999);
    }

    #[test]
    fn test_missing_fields_are_zero() {
        let fees: FeeBreakdown = serde_json::from_value(json!({ "tuitionFees": 25 })).unwrap();
        assert_eq!(fees.application_fees, 0.0);
        assert_eq!(fees.service_charge, 0.0);
        assert_eq!(fees.total_minor_units(), 2500);

        let fees: FeeBreakdown = serde_json::from_value(json!({})).unwrap();
        assert_eq!(fees.total_minor_units(), 0);
    }

    #[test]
    fn test_numeric_strings_coerce() {
        let fees: FeeBreakdown = serde_json::from_value(json!({
            "applicationFees": "50",
            "tuitionFees": "100.5",
            "serviceCharge": 10,
        }))
        .unwrap();
        assert_eq!(fees.total_minor_units(), 16050);
    }

    #[test]
    fn test_non_numeric_fields_are_zero_not_errors() {
        let fees: FeeBreakdown = serde_json::from_value(json!({
            "applicationFees": "free",
            "tuitionFees": null,
            "serviceCharge": { "amount": 10 },
        }))
        .unwrap();
        assert_eq!(fees.total_minor_units(), 0);
    }

    #[test]
    fn test_negative_sums_pass_through() {
        let fees = FeeBreakdown::new(-20.0, 5.0, 0.0);
        assert_eq!(fees.total_minor_units(), -1500);
    }
}
