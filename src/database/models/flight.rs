use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::brief::BriefDetail;
use crate::database::repository::{Entity, Owner};
use crate::validators::{
    stored_time, validate_aircraft_type_model, validate_callsign, validate_flight_level,
    validate_icao_code, validate_pilot_responsible, validate_tail_number, FieldErrors,
};

pub const DEFAULT_FLIGHT_LEVEL: i32 = 1000;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Flight {
    pub id: i64,
    pub tail_number: i32,
    pub callsign: Option<String>,
    pub aircraft_type_model: String,
    pub pilot_responsible: String,
    pub origin: String,
    pub destination: String,
    pub flight_level: i32,
    pub takeoff_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    #[serde(rename = "user")]
    pub user_id: i64,
}

/// Flight with its briefs (and their hazards) nested
#[derive(Debug, Clone, Serialize)]
pub struct FlightDetail {
    #[serde(flatten)]
    pub flight: Flight,
    pub briefs: Vec<BriefDetail>,
}

#[derive(Debug, Clone)]
pub struct NewFlight {
    pub tail_number: i32,
    pub callsign: Option<String>,
    pub aircraft_type_model: String,
    pub pilot_responsible: String,
    pub origin: String,
    pub destination: String,
    pub flight_level: i32,
    pub takeoff_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct FlightPatch {
    pub tail_number: Option<i32>,
    pub callsign: Option<String>,
    pub aircraft_type_model: Option<String>,
    pub pilot_responsible: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub flight_level: Option<i32>,
    pub takeoff_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
}

impl Entity for Flight {
    type Scope = Owner;
    type Key = i64;
    type New = NewFlight;
    type Patch = FlightPatch;

    const NAME: &'static str = "Flight";
}

#[derive(Debug, Default, Deserialize)]
pub struct FlightPayload {
    pub tail_number: Option<i32>,
    pub callsign: Option<String>,
    pub aircraft_type_model: Option<String>,
    pub pilot_responsible: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub flight_level: Option<i32>,
    pub takeoff_time: Option<DateTime<Utc>>,
    pub arrival_time: Option<DateTime<Utc>>,
}

impl FlightPayload {
    pub fn into_new(self) -> Result<NewFlight, FieldErrors> {
        let mut errors = FieldErrors::new();
        let tail_number = errors.require("tail_number", self.tail_number, validate_tail_number);
        let callsign = errors.optional(self.callsign, |v| validate_callsign(&v));
        let aircraft_type_model = errors.require(
            "aircraft_type_model",
            self.aircraft_type_model,
            |v| validate_aircraft_type_model(&v),
        );
        let pilot_responsible = errors.require("pilot_responsible", self.pilot_responsible, |v| {
            validate_pilot_responsible(&v)
        });
        let origin = errors.require("origin", self.origin, |v| validate_icao_code("origin", &v));
        let destination = errors.require("destination", self.destination, |v| {
            validate_icao_code("destination", &v)
        });
        let flight_level = errors
            .optional(self.flight_level, validate_flight_level)
            .unwrap_or(DEFAULT_FLIGHT_LEVEL);
        let takeoff_time = stored_time(self.takeoff_time.unwrap_or_else(Utc::now));
        let arrival_time = errors.required("arrival_time", self.arrival_time.map(stored_time));

        match (
            tail_number,
            aircraft_type_model,
            pilot_responsible,
            origin,
            destination,
            arrival_time,
        ) {
            (
                Some(tail_number),
                Some(aircraft_type_model),
                Some(pilot_responsible),
                Some(origin),
                Some(destination),
                Some(arrival_time),
            ) if errors.is_empty() => Ok(NewFlight {
                tail_number,
                callsign,
                aircraft_type_model,
                pilot_responsible,
                origin,
                destination,
                flight_level,
                takeoff_time,
                arrival_time,
            }),
            _ => Err(errors),
        }
    }

    pub fn into_patch(self) -> Result<FlightPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let patch = FlightPatch {
            tail_number: errors.optional(self.tail_number, validate_tail_number),
            callsign: errors.optional(self.callsign, |v| validate_callsign(&v)),
            aircraft_type_model: errors
                .optional(self.aircraft_type_model, |v| validate_aircraft_type_model(&v)),
            pilot_responsible: errors
                .optional(self.pilot_responsible, |v| validate_pilot_responsible(&v)),
            origin: errors.optional(self.origin, |v| validate_icao_code("origin", &v)),
            destination: errors.optional(self.destination, |v| {
                validate_icao_code("destination", &v)
            }),
            flight_level: errors.optional(self.flight_level, validate_flight_level),
            takeoff_time: self.takeoff_time.map(stored_time),
            arrival_time: self.arrival_time.map(stored_time),
        };
        errors.into_result().map(|_| patch)
    }
}
