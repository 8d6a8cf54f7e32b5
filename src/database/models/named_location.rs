use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::repository::{Entity, Owner};
use crate::validators::{
    validate_city_name, validate_latitude, validate_longitude, validate_region_code, FieldErrors,
};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct NamedLocation {
    pub id: i64,
    pub city: String,
    pub country: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    #[serde(rename = "user")]
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewNamedLocation {
    pub city: String,
    pub country: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct NamedLocationPatch {
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

impl Entity for NamedLocation {
    type Scope = Owner;
    /// City name, matched case-insensitively
    type Key = String;
    type New = NewNamedLocation;
    type Patch = NamedLocationPatch;

    const NAME: &'static str = "Named location";
}

#[derive(Debug, Default, Deserialize)]
pub struct NamedLocationPayload {
    pub city: Option<String>,
    #[serde(alias = "state")]
    pub country: Option<String>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

impl NamedLocationPayload {
    pub fn into_new(self) -> Result<NewNamedLocation, FieldErrors> {
        let mut errors = FieldErrors::new();
        let city = errors.require("city", self.city, |v| validate_city_name(&v));
        let country =
            errors.require("country", self.country, |v| validate_region_code("country", &v));
        let latitude = errors.require("latitude", self.latitude, validate_latitude);
        let longitude = errors.require("longitude", self.longitude, validate_longitude);

        match (city, country, latitude, longitude) {
            (Some(city), Some(country), Some(latitude), Some(longitude)) if errors.is_empty() => {
                Ok(NewNamedLocation {
                    city,
                    country,
                    latitude,
                    longitude,
                })
            }
            _ => Err(errors),
        }
    }

    pub fn into_patch(self) -> Result<NamedLocationPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let patch = NamedLocationPatch {
            city: errors.optional(self.city, |v| validate_city_name(&v)),
            country: errors.optional(self.country, |v| validate_region_code("country", &v)),
            latitude: errors.optional(self.latitude, validate_latitude),
            longitude: errors.optional(self.longitude, validate_longitude),
        };
        errors.into_result().map(|_| patch)
    }
}
