//! In-process store with the same uniqueness and cascade rules as the
//! Postgres schema. Backs the integration tests and `serve --in-memory`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Airport, AirportPatch, AuthToken, Brief, BriefPatch, Flight, FlightPatch, Hazard, HazardPatch,
    List, ListPatch, NamedLocation, NamedLocationPatch, NewAirport, NewBrief, NewFlight, NewHazard,
    NewList, NewNamedLocation, NewTask, NewUser, Task, TaskPatch, User, UserPatch,
};
use crate::database::repository::{
    BriefScope, FlightScope, HealthCheck, ListScope, Owner, Repository, TokenRepository,
    UserRepository,
};
use crate::validators::stored_time;

#[derive(Debug, Default)]
struct MemoryData {
    next_id: i64,
    users: BTreeMap<i64, User>,
    tokens: HashMap<String, AuthToken>,
    airports: BTreeMap<i64, Airport>,
    flights: BTreeMap<i64, Flight>,
    briefs: BTreeMap<i64, Brief>,
    hazards: BTreeMap<i64, Hazard>,
    named_locations: BTreeMap<i64, NamedLocation>,
    lists: BTreeMap<i64, List>,
    tasks: BTreeMap<i64, Task>,
}

fn integrity(constraint: &str) -> DatabaseError {
    DatabaseError::Integrity(format!(
        "duplicate key value violates unique constraint \"{}\"",
        constraint
    ))
}

impl MemoryData {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn owns_flight(&self, scope: &FlightScope) -> bool {
        self.flights
            .get(&scope.flight_id)
            .is_some_and(|flight| flight.user_id == scope.user_id)
    }

    fn owns_brief(&self, scope: &BriefScope) -> bool {
        self.owns_flight(&scope.flight())
            && self
                .briefs
                .get(&scope.brief_id)
                .is_some_and(|brief| brief.flight_id == scope.flight_id)
    }

    fn owns_list(&self, scope: &ListScope) -> bool {
        self.lists
            .get(&scope.list_id)
            .is_some_and(|list| list.user_id == scope.user_id)
    }

    fn airport_id(&self, scope: &Owner, icao_code: &str) -> Option<i64> {
        self.airports
            .values()
            .find(|a| a.user_id == scope.user_id && a.icao_code == icao_code)
            .map(|a| a.id)
    }

    fn named_location_id(&self, scope: &Owner, city: &str) -> Option<i64> {
        let city = city.to_lowercase();
        self.named_locations
            .values()
            .find(|n| n.user_id == scope.user_id && n.city.to_lowercase() == city)
            .map(|n| n.id)
    }

    fn check_airport_unique(&self, airport: &Airport) -> Result<(), DatabaseError> {
        let clash = self.airports.values().any(|other| {
            other.id != airport.id
                && other.user_id == airport.user_id
                && other.icao_code == airport.icao_code
        });
        if clash {
            return Err(integrity("unique_icao_code_per_user"));
        }
        Ok(())
    }

    fn check_flight_unique(&self, flight: &Flight) -> Result<(), DatabaseError> {
        let clash = self.flights.values().any(|other| {
            other.id != flight.id
                && other.tail_number == flight.tail_number
                && other.aircraft_type_model == flight.aircraft_type_model
                && other.takeoff_time == flight.takeoff_time
        });
        if clash {
            return Err(integrity("unique_aircraft_takeoff_time"));
        }
        Ok(())
    }

    fn check_brief_unique(&self, brief: &Brief) -> Result<(), DatabaseError> {
        let clash = self
            .briefs
            .values()
            .any(|other| other.id != brief.id && other.brief_time == brief.brief_time);
        if clash {
            return Err(integrity("briefs_brief_time_key"));
        }
        Ok(())
    }

    fn check_named_location_unique(&self, location: &NamedLocation) -> Result<(), DatabaseError> {
        let clash = self.named_locations.values().any(|other| {
            other.id != location.id
                && other.user_id == location.user_id
                && other.latitude == location.latitude
                && other.longitude == location.longitude
        });
        if clash {
            return Err(integrity("unique_coordinates_per_user"));
        }
        Ok(())
    }

    fn remove_brief(&mut self, brief_id: i64) {
        self.briefs.remove(&brief_id);
        self.hazards.retain(|_, hazard| hazard.brief_id != brief_id);
    }

    fn remove_flight(&mut self, flight_id: i64) {
        self.flights.remove(&flight_id);
        let briefs: Vec<i64> = self
            .briefs
            .values()
            .filter(|brief| brief.flight_id == flight_id)
            .map(|brief| brief.id)
            .collect();
        for brief_id in briefs {
            self.remove_brief(brief_id);
        }
    }

    fn remove_list(&mut self, list_id: i64) {
        self.lists.remove(&list_id);
        self.tasks.retain(|_, task| task.list_id != list_id);
    }

    fn remove_user(&mut self, user_id: i64) -> bool {
        if self.users.remove(&user_id).is_none() {
            return false;
        }
        self.tokens.retain(|_, token| token.user_id != user_id);
        self.airports.retain(|_, airport| airport.user_id != user_id);
        self.named_locations.retain(|_, location| location.user_id != user_id);

        let flights: Vec<i64> = self
            .flights
            .values()
            .filter(|flight| flight.user_id == user_id)
            .map(|flight| flight.id)
            .collect();
        for flight_id in flights {
            self.remove_flight(flight_id);
        }

        let lists: Vec<i64> = self
            .lists
            .values()
            .filter(|list| list.user_id == user_id)
            .map(|list| list.id)
            .collect();
        for list_id in lists {
            self.remove_list(list_id);
        }
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        let mut data = self.inner.write().await;
        if data.users.values().any(|user| user.email == new.email) {
            return Err(integrity("users_email_key"));
        }
        let user = User {
            id: data.allocate_id(),
            email: new.email,
            password_hash: new.password_hash,
            display_name: new.display_name,
            first_name: new.first_name,
            last_name: new.last_name,
            created_at: stored_time(Utc::now()),
        };
        data.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let data = self.inner.read().await;
        Ok(data.users.values().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let data = self.inner.read().await;
        Ok(data.users.get(&id).cloned())
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>, DatabaseError> {
        let mut data = self.inner.write().await;
        let Some(user) = data.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(display_name) = patch.display_name {
            user.display_name = display_name;
        }
        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: i64) -> Result<bool, DatabaseError> {
        let mut data = self.inner.write().await;
        Ok(data.remove_user(id))
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn issue(&self, user_id: i64, token_hash: &str) -> Result<AuthToken, DatabaseError> {
        let mut data = self.inner.write().await;
        if !data.users.contains_key(&user_id) {
            return Err(DatabaseError::Integrity(
                "insert on table \"auth_tokens\" violates foreign key constraint".to_string(),
            ));
        }
        if data.tokens.contains_key(token_hash) {
            return Err(integrity("auth_tokens_pkey"));
        }
        let token = AuthToken {
            token_hash: token_hash.to_string(),
            user_id,
            created_at: stored_time(Utc::now()),
        };
        data.tokens.insert(token.token_hash.clone(), token.clone());
        Ok(token)
    }

    async fn find(&self, token_hash: &str) -> Result<Option<AuthToken>, DatabaseError> {
        let data = self.inner.read().await;
        Ok(data.tokens.get(token_hash).cloned())
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, DatabaseError> {
        let mut data = self.inner.write().await;
        Ok(data.tokens.remove(token_hash).is_some())
    }
}

#[async_trait]
impl Repository<Airport> for MemoryStore {
    async fn select_any(&self, scope: &Owner) -> Result<Vec<Airport>, DatabaseError> {
        let data = self.inner.read().await;
        Ok(data
            .airports
            .values()
            .filter(|a| a.user_id == scope.user_id)
            .cloned()
            .collect())
    }

    async fn select_one(
        &self,
        scope: &Owner,
        key: &String,
    ) -> Result<Option<Airport>, DatabaseError> {
        let data = self.inner.read().await;
        Ok(data
            .airport_id(scope, key)
            .and_then(|id| data.airports.get(&id).cloned()))
    }

    async fn insert(&self, scope: &Owner, new: NewAirport) -> Result<Airport, DatabaseError> {
        let mut data = self.inner.write().await;
        let airport = Airport {
            id: 0,
            icao_code: new.icao_code,
            name: new.name,
            user_id: scope.user_id,
        };
        data.check_airport_unique(&airport)?;
        let airport = Airport {
            id: data.allocate_id(),
            ..airport
        };
        data.airports.insert(airport.id, airport.clone());
        Ok(airport)
    }

    async fn update(
        &self,
        scope: &Owner,
        key: &String,
        patch: AirportPatch,
    ) -> Result<Option<Airport>, DatabaseError> {
        let mut data = self.inner.write().await;
        let Some(id) = data.airport_id(scope, key) else {
            return Ok(None);
        };
        let Some(mut airport) = data.airports.get(&id).cloned() else {
            return Ok(None);
        };
        if let Some(icao_code) = patch.icao_code {
            airport.icao_code = icao_code;
        }
        if let Some(name) = patch.name {
            airport.name = name;
        }
        data.check_airport_unique(&airport)?;
        data.airports.insert(id, airport.clone());
        Ok(Some(airport))
    }

    async fn delete(&self, scope: &Owner, key: &String) -> Result<bool, DatabaseError> {
        let mut data = self.inner.write().await;
        match data.airport_id(scope, key) {
            Some(id) => Ok(data.airports.remove(&id).is_some()),
            None => Ok(false),
        }
    }
}

#[async_trait]
impl Repository<Flight> for MemoryStore {
    async fn select_any(&self, scope: &Owner) -> Result<Vec<Flight>, DatabaseError> {
        let data = self.inner.read().await;
        Ok(data
            .flights
            .values()
            .filter(|f| f.user_id == scope.user_id)
            .cloned()
            .collect())
    }

    async fn select_one(&self, scope: &Owner, key: &i64) -> Result<Option<Flight>, DatabaseError> {
        let data = self.inner.read().await;
        Ok(data
            .flights
            .get(key)
            .filter(|f| f.user_id == scope.user_id)
            .cloned())
    }

    async fn insert(&self, scope: &Owner, new: NewFlight) -> Result<Flight, DatabaseError> {
        let mut data = self.inner.write().await;
        let flight = Flight {
            id: 0,
            tail_number: new.tail_number,
            callsign: new.callsign,
            aircraft_type_model: new.aircraft_type_model,
            pilot_responsible: new.pilot_responsible,
            origin: new.origin,
            destination: new.destination,
            flight_level: new.flight_level,
            takeoff_time: new.takeoff_time,
            arrival_time: new.arrival_time,
            user_id: scope.user_id,
        };
        data.check_flight_unique(&flight)?;
        let flight = Flight {
            id: data.allocate_id(),
            ..flight
        };
        data.flights.insert(flight.id, flight.clone());
        Ok(flight)
    }

    async fn update(
        &self,
        scope: &Owner,
        key: &i64,
        patch: FlightPatch,
    ) -> Result<Option<Flight>, DatabaseError> {
        let mut data = self.inner.write().await;
        let Some(mut flight) = data
            .flights
            .get(key)
            .filter(|f| f.user_id == scope.user_id)
            .cloned()
        else {
            return Ok(None);
        };
        if let Some(v) = patch.tail_number {
            flight.tail_number = v;
        }
        if let Some(v) = patch.callsign {
            flight.callsign = Some(v);
        }
        if let Some(v) = patch.aircraft_type_model {
            flight.aircraft_type_model = v;
        }
        if let Some(v) = patch.pilot_responsible {
            flight.pilot_responsible = v;
        }
        if let Some(v) = patch.origin {
            flight.origin = v;
        }
        if let Some(v) = patch.destination {
            flight.destination = v;
        }
        if let Some(v) = patch.flight_level {
            flight.flight_level = v;
        }
        if let Some(v) = patch.takeoff_time {
            flight.takeoff_time = v;
        }
        if let Some(v) = patch.arrival_time {
            flight.arrival_time = v;
        }
        data.check_flight_unique(&flight)?;
        data.flights.insert(flight.id, flight.clone());
        Ok(Some(flight))
    }

    async fn delete(&self, scope: &Owner, key: &i64) -> Result<bool, DatabaseError> {
        let mut data = self.inner.write().await;
        if !data.owns_flight(&scope.flight(*key)) {
            return Ok(false);
        }
        data.remove_flight(*key);
        Ok(true)
    }
}

#[async_trait]
impl Repository<Brief> for MemoryStore {
    async fn select_any(&self, scope: &FlightScope) -> Result<Vec<Brief>, DatabaseError> {
        let data = self.inner.read().await;
        if !data.owns_flight(scope) {
            return Ok(Vec::new());
        }
        Ok(data
            .briefs
            .values()
            .filter(|b| b.flight_id == scope.flight_id)
            .cloned()
            .collect())
    }

    async fn select_one(
        &self,
        scope: &FlightScope,
        key: &i64,
    ) -> Result<Option<Brief>, DatabaseError> {
        let data = self.inner.read().await;
        if !data.owns_brief(&scope.brief(*key)) {
            return Ok(None);
        }
        Ok(data.briefs.get(key).cloned())
    }

    async fn insert(&self, scope: &FlightScope, new: NewBrief) -> Result<Brief, DatabaseError> {
        let mut data = self.inner.write().await;
        if !data.owns_flight(scope) {
            return Err(DatabaseError::not_found::<Flight>());
        }
        let brief = Brief {
            id: 0,
            flight_id: scope.flight_id,
            surface_winds: new.surface_winds,
            flight_level_winds: new.flight_level_winds,
            visibility: new.visibility,
            sky_condition: new.sky_condition,
            temperature: new.temperature,
            altimeter_setting: new.altimeter_setting,
            brief_time: new.brief_time,
            void_time: new.void_time,
        };
        data.check_brief_unique(&brief)?;
        let brief = Brief {
            id: data.allocate_id(),
            ..brief
        };
        data.briefs.insert(brief.id, brief.clone());
        Ok(brief)
    }

    async fn update(
        &self,
        scope: &FlightScope,
        key: &i64,
        patch: BriefPatch,
    ) -> Result<Option<Brief>, DatabaseError> {
        let mut data = self.inner.write().await;
        if !data.owns_brief(&scope.brief(*key)) {
            return Ok(None);
        }
        let Some(mut brief) = data.briefs.get(key).cloned() else {
            return Ok(None);
        };
        if let Some(v) = patch.surface_winds {
            brief.surface_winds = v;
        }
        if let Some(v) = patch.flight_level_winds {
            brief.flight_level_winds = v;
        }
        if let Some(v) = patch.visibility {
            brief.visibility = v;
        }
        if let Some(v) = patch.sky_condition {
            brief.sky_condition = v;
        }
        if let Some(v) = patch.temperature {
            brief.temperature = v;
        }
        if let Some(v) = patch.altimeter_setting {
            brief.altimeter_setting = v;
        }
        if let Some(v) = patch.brief_time {
            brief.brief_time = v;
        }
        if let Some(v) = patch.void_time {
            brief.void_time = v;
        }
        data.check_brief_unique(&brief)?;
        data.briefs.insert(brief.id, brief.clone());
        Ok(Some(brief))
    }

    async fn delete(&self, scope: &FlightScope, key: &i64) -> Result<bool, DatabaseError> {
        let mut data = self.inner.write().await;
        if !data.owns_brief(&scope.brief(*key)) {
            return Ok(false);
        }
        data.remove_brief(*key);
        Ok(true)
    }
}

#[async_trait]
impl Repository<Hazard> for MemoryStore {
    async fn select_any(&self, scope: &BriefScope) -> Result<Vec<Hazard>, DatabaseError> {
        let data = self.inner.read().await;
        if !data.owns_brief(scope) {
            return Ok(Vec::new());
        }
        Ok(data
            .hazards
            .values()
            .filter(|h| h.brief_id == scope.brief_id)
            .cloned()
            .collect())
    }

    async fn select_one(
        &self,
        scope: &BriefScope,
        key: &i64,
    ) -> Result<Option<Hazard>, DatabaseError> {
        let data = self.inner.read().await;
        if !data.owns_brief(scope) {
            return Ok(None);
        }
        Ok(data
            .hazards
            .get(key)
            .filter(|h| h.brief_id == scope.brief_id)
            .cloned())
    }

    async fn insert(&self, scope: &BriefScope, new: NewHazard) -> Result<Hazard, DatabaseError> {
        let mut data = self.inner.write().await;
        if !data.owns_brief(scope) {
            return Err(DatabaseError::not_found::<Brief>());
        }
        let hazard = Hazard {
            id: data.allocate_id(),
            brief_id: scope.brief_id,
            hazard_type: new.hazard_type,
            information: new.information,
        };
        data.hazards.insert(hazard.id, hazard.clone());
        Ok(hazard)
    }

    async fn update(
        &self,
        scope: &BriefScope,
        key: &i64,
        patch: HazardPatch,
    ) -> Result<Option<Hazard>, DatabaseError> {
        let mut data = self.inner.write().await;
        if !data.owns_brief(scope) {
            return Ok(None);
        }
        let Some(hazard) = data
            .hazards
            .get_mut(key)
            .filter(|h| h.brief_id == scope.brief_id)
        else {
            return Ok(None);
        };
        if let Some(v) = patch.hazard_type {
            hazard.hazard_type = v;
        }
        if let Some(v) = patch.information {
            hazard.information = v;
        }
        Ok(Some(hazard.clone()))
    }

    async fn delete(&self, scope: &BriefScope, key: &i64) -> Result<bool, DatabaseError> {
        let mut data = self.inner.write().await;
        if !data.owns_brief(scope) {
            return Ok(false);
        }
        let owned = data
            .hazards
            .get(key)
            .is_some_and(|h| h.brief_id == scope.brief_id);
        if owned {
            data.hazards.remove(key);
        }
        Ok(owned)
    }
}

#[async_trait]
impl Repository<NamedLocation> for MemoryStore {
    async fn select_any(&self, scope: &Owner) -> Result<Vec<NamedLocation>, DatabaseError> {
        let data = self.inner.read().await;
        Ok(data
            .named_locations
            .values()
            .filter(|n| n.user_id == scope.user_id)
            .cloned()
            .collect())
    }

    async fn select_one(
        &self,
        scope: &Owner,
        key: &String,
    ) -> Result<Option<NamedLocation>, DatabaseError> {
        let data = self.inner.read().await;
        Ok(data
            .named_location_id(scope, key)
            .and_then(|id| data.named_locations.get(&id).cloned()))
    }

    async fn insert(
        &self,
        scope: &Owner,
        new: NewNamedLocation,
    ) -> Result<NamedLocation, DatabaseError> {
        let mut data = self.inner.write().await;
        let location = NamedLocation {
            id: 0,
            city: new.city,
            country: new.country,
            latitude: new.latitude,
            longitude: new.longitude,
            user_id: scope.user_id,
        };
        data.check_named_location_unique(&location)?;
        let location = NamedLocation {
            id: data.allocate_id(),
            ..location
        };
        data.named_locations.insert(location.id, location.clone());
        Ok(location)
    }

    async fn update(
        &self,
        scope: &Owner,
        key: &String,
        patch: NamedLocationPatch,
    ) -> Result<Option<NamedLocation>, DatabaseError> {
        let mut data = self.inner.write().await;
        let Some(id) = data.named_location_id(scope, key) else {
            return Ok(None);
        };
        let Some(mut location) = data.named_locations.get(&id).cloned() else {
            return Ok(None);
        };
        if let Some(v) = patch.city {
            location.city = v;
        }
        if let Some(v) = patch.country {
            location.country = v;
        }
        if let Some(v) = patch.latitude {
            location.latitude = v;
        }
        if let Some(v) = patch.longitude {
            location.longitude = v;
        }
        data.check_named_location_unique(&location)?;
        data.named_locations.insert(id, location.clone());
        Ok(Some(location))
    }

    async fn delete(&self, scope: &Owner, key: &String) -> Result<bool, DatabaseError> {
        let mut data = self.inner.write().await;
        match data.named_location_id(scope, key) {
            Some(id) => Ok(data.named_locations.remove(&id).is_some()),
            None => Ok(false),
        }
    }
}

#[async_trait]
impl Repository<List> for MemoryStore {
    async fn select_any(&self, scope: &Owner) -> Result<Vec<List>, DatabaseError> {
        let data = self.inner.read().await;
        Ok(data
            .lists
            .values()
            .filter(|l| l.user_id == scope.user_id)
            .cloned()
            .collect())
    }

    async fn select_one(&self, scope: &Owner, key: &i64) -> Result<Option<List>, DatabaseError> {
        let data = self.inner.read().await;
        Ok(data
            .lists
            .get(key)
            .filter(|l| l.user_id == scope.user_id)
            .cloned())
    }

    async fn insert(&self, scope: &Owner, new: NewList) -> Result<List, DatabaseError> {
        let mut data = self.inner.write().await;
        let list = List {
            id: data.allocate_id(),
            name: new.name,
            completed: new.completed,
            user_id: scope.user_id,
        };
        data.lists.insert(list.id, list.clone());
        Ok(list)
    }

    async fn update(
        &self,
        scope: &Owner,
        key: &i64,
        patch: ListPatch,
    ) -> Result<Option<List>, DatabaseError> {
        let mut data = self.inner.write().await;
        let Some(list) = data
            .lists
            .get_mut(key)
            .filter(|l| l.user_id == scope.user_id)
        else {
            return Ok(None);
        };
        if let Some(v) = patch.name {
            list.name = v;
        }
        if let Some(v) = patch.completed {
            list.completed = v;
        }
        Ok(Some(list.clone()))
    }

    async fn delete(&self, scope: &Owner, key: &i64) -> Result<bool, DatabaseError> {
        let mut data = self.inner.write().await;
        if !data.owns_list(&scope.list(*key)) {
            return Ok(false);
        }
        data.remove_list(*key);
        Ok(true)
    }
}

#[async_trait]
impl Repository<Task> for MemoryStore {
    async fn select_any(&self, scope: &ListScope) -> Result<Vec<Task>, DatabaseError> {
        let data = self.inner.read().await;
        if !data.owns_list(scope) {
            return Ok(Vec::new());
        }
        Ok(data
            .tasks
            .values()
            .filter(|t| t.list_id == scope.list_id)
            .cloned()
            .collect())
    }

    async fn select_one(
        &self,
        scope: &ListScope,
        key: &i64,
    ) -> Result<Option<Task>, DatabaseError> {
        let data = self.inner.read().await;
        if !data.owns_list(scope) {
            return Ok(None);
        }
        Ok(data
            .tasks
            .get(key)
            .filter(|t| t.list_id == scope.list_id)
            .cloned())
    }

    async fn insert(&self, scope: &ListScope, new: NewTask) -> Result<Task, DatabaseError> {
        let mut data = self.inner.write().await;
        if !data.owns_list(scope) {
            return Err(DatabaseError::not_found::<List>());
        }
        let task = Task {
            id: data.allocate_id(),
            list_id: scope.list_id,
            name: new.name,
            completed: new.completed,
        };
        data.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(
        &self,
        scope: &ListScope,
        key: &i64,
        patch: TaskPatch,
    ) -> Result<Option<Task>, DatabaseError> {
        let mut data = self.inner.write().await;
        if !data.owns_list(scope) {
            return Ok(None);
        }
        let Some(task) = data
            .tasks
            .get_mut(key)
            .filter(|t| t.list_id == scope.list_id)
        else {
            return Ok(None);
        };
        if let Some(v) = patch.name {
            task.name = v;
        }
        if let Some(v) = patch.completed {
            task.completed = v;
        }
        Ok(Some(task.clone()))
    }

    async fn delete(&self, scope: &ListScope, key: &i64) -> Result<bool, DatabaseError> {
        let mut data = self.inner.write().await;
        if !data.owns_list(scope) {
            return Ok(false);
        }
        let owned = data
            .tasks
            .get(key)
            .is_some_and(|t| t.list_id == scope.list_id);
        if owned {
            data.tasks.remove(key);
        }
        Ok(owned)
    }
}
