//! Field-format validators.
//!
//! Every validator returns the accepted value (normalized where noted) or a
//! [`ValidationError`] naming the offending field. Payload conversions collect
//! failures into [`FieldErrors`] so a single response can report every
//! violated field at once.

use std::collections::BTreeMap;

use chrono::{DateTime, SubsecRound, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Single field failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Field -> messages map accumulated while validating a payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn push(&mut self, error: ValidationError) {
        self.add(error.field, error.message);
    }

    /// Records a missing-field error when `value` is `None`
    pub fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.add(field, REQUIRED_MESSAGE);
        }
        value
    }

    /// Required field that must also pass `validate`
    pub fn require<T, U>(
        &mut self,
        field: &str,
        value: Option<T>,
        validate: impl FnOnce(T) -> Result<U, ValidationError>,
    ) -> Option<U> {
        let value = self.required(field, value)?;
        self.check(validate(value))
    }

    /// Keeps the value on success, records the error otherwise
    pub fn check<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.push(error);
                None
            }
        }
    }

    /// Validates an optional (patch) value: absent stays absent, present must pass
    pub fn optional<T, U>(
        &mut self,
        value: Option<T>,
        validate: impl FnOnce(T) -> Result<U, ValidationError>,
    ) -> Option<U> {
        value.and_then(|v| self.check(validate(v)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = FieldErrors::new();
        errors.push(error);
        errors
    }
}

static ICAO_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{4}$").unwrap());
static PLACE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z,. ]+$").unwrap());
static DISPLAY_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap());
static PERSON_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-z]+$").unwrap());
static AIRCRAFT_TYPE_MODEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9-]+$").unwrap());
static PILOT_RESPONSIBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9\- ]+$").unwrap());
static WIND_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{3}|VRB)\d{2,3}(G\d{2,3})?KT$").unwrap());
static VISIBILITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[PM]?(\d+|\d+/\d+|\d+ \d+/\d+)SM$").unwrap());
static SKY_CONDITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(((OVC|BKN|VV|SCT|FEW)\d{3})|SKC|CLR)( (((OVC|BKN|VV|SCT|FEW)\d{3})|SKC|CLR))*$")
        .unwrap()
});
static ALTIMETER_SETTING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^A\d{4}$").unwrap());
static TEMPERATURE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^M?\d+$").unwrap());
static REGION_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}$").unwrap());
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

const COORDINATE_SCALE: u32 = 6;

fn matches(
    field: &str,
    value: &str,
    pattern: &Regex,
    message: impl FnOnce() -> String,
) -> Result<String, ValidationError> {
    if pattern.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(ValidationError::new(field, message()))
    }
}

fn max_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("Ensure this field has no more than {} characters.", max),
        ));
    }
    Ok(())
}

fn not_blank(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "This field may not be blank."));
    }
    Ok(())
}

/// Airport codes: exactly four uppercase letters
pub fn validate_icao_code(field: &str, value: &str) -> Result<String, ValidationError> {
    matches(field, value, &ICAO_CODE, || {
        format!(
            "{} is not a valid ICAO code. It should consist of only 4 capitalized characters.",
            value
        )
    })
}

pub fn validate_airport_name(value: &str) -> Result<String, ValidationError> {
    max_length("name", value, 100)?;
    matches("name", value, &PLACE_NAME, || {
        format!(
            "{} must be Title case and only contain letters, spaces, commas, and periods.",
            value
        )
    })
}

pub fn validate_city_name(value: &str) -> Result<String, ValidationError> {
    max_length("city", value, 40)?;
    matches("city", value, &PLACE_NAME, || {
        format!(
            "{} must be Title case and only contain letters, spaces, commas, and periods.",
            value
        )
    })
}

pub fn validate_hazard_type(value: &str) -> Result<String, ValidationError> {
    max_length("type", value, 100)?;
    matches("type", value, &PLACE_NAME, || {
        format!("{} must be in Title case.", value)
    })
}

pub fn validate_display_name(value: &str) -> Result<String, ValidationError> {
    let length = value.chars().count();
    if !(6..=25).contains(&length) {
        return Err(ValidationError::new(
            "display_name",
            "Display names must be between 6 and 25 characters.",
        ));
    }
    matches("display_name", value, &DISPLAY_NAME, || {
        format!(
            "{} is not a valid display name. Display names should only contain letters, \
             numbers, or the following special characters: .-_",
            value
        )
    })
}

/// First and last names: title case, letters only
pub fn validate_person_name(field: &str, value: &str) -> Result<String, ValidationError> {
    max_length(field, value, 50)?;
    matches(field, value, &PERSON_NAME, || {
        format!(
            "{} is not a valid name. Names should be in title case and only contain letters",
            value
        )
    })
}

pub fn validate_email(value: &str) -> Result<String, ValidationError> {
    max_length("email", value, 255)?;
    let email = value.trim().to_lowercase();
    matches("email", &email, &EMAIL, || "Enter a valid email address.".to_string())
}

pub fn validate_password(value: &str, min_length: usize) -> Result<String, ValidationError> {
    not_blank("password", value)?;
    if value.chars().count() < min_length {
        return Err(ValidationError::new(
            "password",
            format!("Ensure this field has at least {} characters.", min_length),
        ));
    }
    Ok(value.to_string())
}

pub fn validate_tail_number(value: i32) -> Result<i32, ValidationError> {
    if !(100..=999).contains(&value) {
        return Err(ValidationError::new(
            "tail_number",
            format!("{} must be between 100 and 999.", value),
        ));
    }
    Ok(value)
}

pub fn validate_callsign(value: &str) -> Result<String, ValidationError> {
    max_length("callsign", value, 20)?;
    Ok(value.to_string())
}

pub fn validate_aircraft_type_model(value: &str) -> Result<String, ValidationError> {
    max_length("aircraft_type_model", value, 20)?;
    matches("aircraft_type_model", value, &AIRCRAFT_TYPE_MODEL, || {
        format!(
            "{} is not a valid aircraft model. It should consist only of uppercase \
             letters, a hyphen, and digits.",
            value
        )
    })
}

pub fn validate_pilot_responsible(value: &str) -> Result<String, ValidationError> {
    max_length("pilot_responsible", value, 100)?;
    matches("pilot_responsible", value, &PILOT_RESPONSIBLE, || {
        format!("{} must be in Title Case.", value)
    })
}

pub fn validate_flight_level(value: i32) -> Result<i32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::new(
            "flight_level",
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    Ok(value)
}

/// METAR wind group, e.g. `27009G15KT` or `VRB03KT`
pub fn validate_wind_group(field: &str, value: &str) -> Result<String, ValidationError> {
    matches(field, value, &WIND_GROUP, || {
        format!("{} must be in the correct METAR and TAF format.", value)
    })
}

pub fn validate_visibility(value: &str) -> Result<String, ValidationError> {
    matches("visibility", value, &VISIBILITY, || {
        format!("{} must be a valid visibility format.", value)
    })
}

pub fn validate_sky_condition(value: &str) -> Result<String, ValidationError> {
    max_length("sky_condition", value, 100)?;
    matches("sky_condition", value, &SKY_CONDITION, || {
        format!("{} must be a valid sky condition.", value)
    })
}

pub fn validate_altimeter_setting(value: &str) -> Result<String, ValidationError> {
    matches("altimeter_setting", value, &ALTIMETER_SETTING, || {
        format!("{} must be a valid altimeter setting.", value)
    })
}

pub fn validate_temperature(value: &str) -> Result<String, ValidationError> {
    max_length("temperature", value, 10)?;
    matches("temperature", value, &TEMPERATURE, || {
        format!("{} is not a valid temperature string.", value)
    })
}

/// Two-letter state or country abbreviation
pub fn validate_region_code(field: &str, value: &str) -> Result<String, ValidationError> {
    matches(field, value, &REGION_CODE, || {
        format!("{} must consist of only 2 capital letters.", value)
    })
}

pub fn validate_latitude(value: Decimal) -> Result<Decimal, ValidationError> {
    validate_coordinate("latitude", value, Decimal::from(90))
}

pub fn validate_longitude(value: Decimal) -> Result<Decimal, ValidationError> {
    validate_coordinate("longitude", value, Decimal::from(180))
}

/// Range and precision check; accepted values are rescaled to six places
fn validate_coordinate(
    field: &str,
    value: Decimal,
    bound: Decimal,
) -> Result<Decimal, ValidationError> {
    if value.abs() > bound {
        return Err(ValidationError::new(
            field,
            format!("{} must be between -{} and {}.", value, bound, bound),
        ));
    }
    if value.normalize().scale() > COORDINATE_SCALE {
        return Err(ValidationError::new(
            field,
            format!(
                "Ensure that there are no more than {} decimal places.",
                COORDINATE_SCALE
            ),
        ));
    }
    let mut scaled = value;
    scaled.rescale(COORDINATE_SCALE);
    Ok(scaled)
}

pub fn validate_list_name(value: &str) -> Result<String, ValidationError> {
    not_blank("name", value)?;
    max_length("name", value, 50)?;
    Ok(value.to_string())
}

pub fn validate_task_name(value: &str) -> Result<String, ValidationError> {
    not_blank("name", value)?;
    max_length("name", value, 255)?;
    Ok(value.to_string())
}

pub fn validate_information(value: &str) -> Result<String, ValidationError> {
    not_blank("information", value)?;
    Ok(value.to_string())
}

/// Drops sub-microsecond digits so a timestamp reads back the same from
/// either store (TIMESTAMPTZ keeps six places).
pub fn stored_time(value: DateTime<Utc>) -> DateTime<Utc> {
    value.trunc_subsecs(6)
}
