// src/models/credit.rs
//! TÜBİTAK timestamp credit balance.

use serde::{Deserialize, Deserializer, Serialize};

/// Response of `/api/tubitak/credit`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TubitakCredit {
    pub remaining_credit: Option<i64>,
    /// Sent as a string or a number depending on the backend version.
    #[serde(deserialize_with = "string_or_number")]
    pub customer_id: Option<String>,
    pub message: Option<String>,
}

impl TubitakCredit {
    /// Remaining credit, zero when the backend omitted it.
    pub fn remaining(&self) -> i64 {
        self.remaining_credit.unwrap_or(0)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_id_accepts_string_or_number() {
        let text: TubitakCredit = serde_json::from_str(r#"{"remainingCredit":5,"customerId":"C-7"}"#).unwrap();
        assert_eq!(text.customer_id.as_deref(), Some("C-7"));

        let number: TubitakCredit = serde_json::from_str(r#"{"customerId":123456}"#).unwrap();
        assert_eq!(number.customer_id.as_deref(), Some("123456"));
        assert_eq!(number.remaining(), 0);

        let missing: TubitakCredit = serde_json::from_str(r#"{"customerId":null}"#).unwrap();
        assert_eq!(missing.customer_id, None);
    }
}
