use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::hazard::Hazard;
use crate::database::repository::{Entity, FlightScope};
use crate::validators::{
    stored_time, validate_altimeter_setting, validate_sky_condition, validate_temperature,
    validate_visibility, validate_wind_group, FieldErrors,
};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Brief {
    pub id: i64,
    #[serde(rename = "flight")]
    pub flight_id: i64,
    pub surface_winds: String,
    pub flight_level_winds: String,
    pub visibility: String,
    pub sky_condition: String,
    pub temperature: String,
    pub altimeter_setting: String,
    pub brief_time: DateTime<Utc>,
    pub void_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BriefDetail {
    #[serde(flatten)]
    pub brief: Brief,
    pub hazards: Vec<Hazard>,
}

#[derive(Debug, Clone)]
pub struct NewBrief {
    pub surface_winds: String,
    pub flight_level_winds: String,
    pub visibility: String,
    pub sky_condition: String,
    pub temperature: String,
    pub altimeter_setting: String,
    pub brief_time: DateTime<Utc>,
    pub void_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct BriefPatch {
    pub surface_winds: Option<String>,
    pub flight_level_winds: Option<String>,
    pub visibility: Option<String>,
    pub sky_condition: Option<String>,
    pub temperature: Option<String>,
    pub altimeter_setting: Option<String>,
    pub brief_time: Option<DateTime<Utc>>,
    pub void_time: Option<DateTime<Utc>>,
}

impl Entity for Brief {
    type Scope = FlightScope;
    type Key = i64;
    type New = NewBrief;
    type Patch = BriefPatch;

    const NAME: &'static str = "Brief";
}

#[derive(Debug, Default, Deserialize)]
pub struct BriefPayload {
    pub surface_winds: Option<String>,
    pub flight_level_winds: Option<String>,
    pub visibility: Option<String>,
    pub sky_condition: Option<String>,
    pub temperature: Option<String>,
    pub altimeter_setting: Option<String>,
    pub brief_time: Option<DateTime<Utc>>,
    pub void_time: Option<DateTime<Utc>>,
}

impl BriefPayload {
    pub fn into_new(self) -> Result<NewBrief, FieldErrors> {
        let mut errors = FieldErrors::new();
        let surface_winds = errors.require("surface_winds", self.surface_winds, |v| {
            validate_wind_group("surface_winds", &v)
        });
        let flight_level_winds = errors.require("flight_level_winds", self.flight_level_winds, |v| {
            validate_wind_group("flight_level_winds", &v)
        });
        let visibility = errors.require("visibility", self.visibility, |v| validate_visibility(&v));
        let sky_condition =
            errors.require("sky_condition", self.sky_condition, |v| validate_sky_condition(&v));
        let temperature =
            errors.require("temperature", self.temperature, |v| validate_temperature(&v));
        let altimeter_setting = errors.require("altimeter_setting", self.altimeter_setting, |v| {
            validate_altimeter_setting(&v)
        });
        let brief_time = errors.required("brief_time", self.brief_time.map(stored_time));
        let void_time = errors.required("void_time", self.void_time.map(stored_time));

        match (
            surface_winds,
            flight_level_winds,
            visibility,
            sky_condition,
            temperature,
            altimeter_setting,
            brief_time,
            void_time,
        ) {
            (
                Some(surface_winds),
                Some(flight_level_winds),
                Some(visibility),
                Some(sky_condition),
                Some(temperature),
                Some(altimeter_setting),
                Some(brief_time),
                Some(void_time),
            ) if errors.is_empty() => Ok(NewBrief {
                surface_winds,
                flight_level_winds,
                visibility,
                sky_condition,
                temperature,
                altimeter_setting,
                brief_time,
                void_time,
            }),
            _ => Err(errors),
        }
    }

    pub fn into_patch(self) -> Result<BriefPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let patch = BriefPatch {
            surface_winds: errors
                .optional(self.surface_winds, |v| validate_wind_group("surface_winds", &v)),
            flight_level_winds: errors.optional(self.flight_level_winds, |v| {
                validate_wind_group("flight_level_winds", &v)
            }),
            visibility: errors.optional(self.visibility, |v| validate_visibility(&v)),
            sky_condition: errors.optional(self.sky_condition, |v| validate_sky_condition(&v)),
            temperature: errors.optional(self.temperature, |v| validate_temperature(&v)),
            altimeter_setting: errors
                .optional(self.altimeter_setting, |v| validate_altimeter_setting(&v)),
            brief_time: self.brief_time.map(stored_time),
            void_time: self.void_time.map(stored_time),
        };
        errors.into_result().map(|_| patch)
    }
}
