use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::repository::{BriefScope, Entity};
use crate::validators::{validate_hazard_type, validate_information, FieldErrors};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Hazard {
    pub id: i64,
    #[serde(rename = "brief")]
    pub brief_id: i64,
    #[serde(rename = "type")]
    pub hazard_type: String,
    pub information: String,
}

#[derive(Debug, Clone)]
pub struct NewHazard {
    pub hazard_type: String,
    pub information: String,
}

#[derive(Debug, Clone, Default)]
pub struct HazardPatch {
    pub hazard_type: Option<String>,
    pub information: Option<String>,
}

impl Entity for Hazard {
    type Scope = BriefScope;
    type Key = i64;
    type New = NewHazard;
    type Patch = HazardPatch;

    const NAME: &'static str = "Hazard";
}

#[derive(Debug, Default, Deserialize)]
pub struct HazardPayload {
    #[serde(rename = "type")]
    pub hazard_type: Option<String>,
    pub information: Option<String>,
}

impl HazardPayload {
    pub fn into_new(self) -> Result<NewHazard, FieldErrors> {
        let mut errors = FieldErrors::new();
        let hazard_type = errors.require("type", self.hazard_type, |v| validate_hazard_type(&v));
        let information =
            errors.require("information", self.information, |v| validate_information(&v));

        match (hazard_type, information) {
            (Some(hazard_type), Some(information)) if errors.is_empty() => Ok(NewHazard {
                hazard_type,
                information,
            }),
            _ => Err(errors),
        }
    }

    pub fn into_patch(self) -> Result<HazardPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let patch = HazardPatch {
            hazard_type: errors.optional(self.hazard_type, |v| validate_hazard_type(&v)),
            information: errors.optional(self.information, |v| validate_information(&v)),
        };
        errors.into_result().map(|_| patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_key_round_trips_through_json() {
        let payload: HazardPayload = serde_json::from_value(serde_json::json!({
            "type": "Thunderstorms",
            "information": "Big Thunder stuff"
        }))
        .unwrap();
        let new = payload.into_new().unwrap();
        assert_eq!(new.hazard_type, "Thunderstorms");

        let hazard = Hazard {
            id: 1,
            brief_id: 2,
            hazard_type: new.hazard_type,
            information: new.information,
        };
        let json = serde_json::to_value(&hazard).unwrap();
        assert_eq!(json["type"], "Thunderstorms");
        assert_eq!(json["brief"], 2);
    }

    #[test]
    fn lowercase_type_is_rejected() {
        let errors = HazardPayload {
            hazard_type: Some("icing".into()),
            information: Some("Light rime".into()),
        }
        .into_new()
        .unwrap_err();
        assert!(errors.contains("type"));
    }
}
