use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::repository::{Entity, Owner};
use crate::validators::{validate_airport_name, validate_icao_code, FieldErrors};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Airport {
    pub id: i64,
    pub icao_code: String,
    pub name: String,
    #[serde(rename = "user")]
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewAirport {
    pub icao_code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct AirportPatch {
    pub icao_code: Option<String>,
    pub name: Option<String>,
}

impl Entity for Airport {
    type Scope = Owner;
    /// Upper-cased ICAO code
    type Key = String;
    type New = NewAirport;
    type Patch = AirportPatch;

    const NAME: &'static str = "Airport";
}

#[derive(Debug, Default, Deserialize)]
pub struct AirportPayload {
    pub icao_code: Option<String>,
    pub name: Option<String>,
}

impl AirportPayload {
    pub fn into_new(self) -> Result<NewAirport, FieldErrors> {
        let mut errors = FieldErrors::new();
        let icao_code =
            errors.require("icao_code", self.icao_code, |v| validate_icao_code("icao_code", &v));
        let name = errors.require("name", self.name, |v| validate_airport_name(&v));

        match (icao_code, name) {
            (Some(icao_code), Some(name)) if errors.is_empty() => {
                Ok(NewAirport { icao_code, name })
            }
            _ => Err(errors),
        }
    }

    pub fn into_patch(self) -> Result<AirportPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let patch = AirportPatch {
            icao_code: errors.optional(self.icao_code, |v| validate_icao_code("icao_code", &v)),
            name: errors.optional(self.name, |v| validate_airport_name(&v)),
        };
        errors.into_result().map(|_| patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_are_required() {
        let errors = AirportPayload::default().into_new().unwrap_err();
        assert!(errors.contains("icao_code"));
        assert!(errors.contains("name"));
    }

    #[test]
    fn lowercase_code_is_rejected_in_body() {
        let errors = AirportPayload {
            icao_code: Some("ksvn".into()),
            name: Some("Hunter AAF".into()),
        }
        .into_new()
        .unwrap_err();
        assert!(errors.contains("icao_code"));
        assert!(!errors.contains("name"));
    }

    #[test]
    fn serializes_owner_as_user() {
        let airport = Airport {
            id: 3,
            icao_code: "KSVN".into(),
            name: "Hunter AAF".into(),
            user_id: 7,
        };
        let json = serde_json::to_value(&airport).unwrap();
        assert_eq!(json["user"], 7);
        assert!(json.get("user_id").is_none());
    }
}
