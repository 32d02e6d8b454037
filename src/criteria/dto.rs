use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::repo::Criterion;
use crate::{
    error::ApiError,
    response::PageInfo,
    validation::{parse_percentage, Validator},
};

/// Body of create and update. `presentase` may arrive as a number or a
/// numeric string.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CriterionRequest {
    #[serde(rename = "namakriteria")]
    pub name: String,
    #[serde(rename = "presentase")]
    pub weight: Value,
}

/// Validated fields ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionFields {
    pub name: String,
    pub weight: f64,
}

impl CriterionRequest {
    pub fn validate(&self) -> Result<CriterionFields, ApiError> {
        let name = self.name.trim();
        let mut v = Validator::new();

        if name.is_empty() {
            v.check(false, "namakriteria", "Nama kriteria wajib diisi");
        } else {
            v.length(name, 3, 100, "namakriteria", "Nama kriteria harus antara 3-100 karakter");
        }

        let blank = match &self.weight {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        };
        let weight = parse_percentage(&self.weight);
        if blank {
            v.check(false, "presentase", "Presentase wajib diisi");
        } else {
            v.check(weight.is_some(), "presentase", "Presentase harus berupa angka antara 0-100");
        }

        v.finish()?;
        Ok(CriterionFields {
            name: name.to_string(),
            weight: weight.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CriterionList {
    pub kriterias: Vec<Criterion>,
    pub pagination: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> Result<CriterionFields, ApiError> {
        serde_json::from_value::<CriterionRequest>(body).unwrap().validate()
    }

    #[test]
    fn accepts_number_or_numeric_string() {
        let a = parse(json!({"namakriteria": " Pendidikan ", "presentase": 40})).unwrap();
        assert_eq!(a, CriterionFields { name: "Pendidikan".into(), weight: 40.0 });

        let b = parse(json!({"namakriteria": "Pengalaman", "presentase": "12.5"})).unwrap();
        assert_eq!(b.weight, 12.5);
    }

    #[test]
    fn rejects_out_of_range_weight() {
        for bad in [json!(-0.5), json!(100.5), json!("banyak"), json!(true)] {
            assert!(parse(json!({"namakriteria": "Usia", "presentase": bad})).is_err());
        }
    }

    #[test]
    fn missing_fields_are_required() {
        match parse(json!({})).unwrap_err() {
            ApiError::Validation { errors, .. } => {
                let msgs: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
                assert_eq!(msgs, ["Nama kriteria wajib diisi", "Presentase wajib diisi"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
