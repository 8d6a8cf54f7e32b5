//! PostgreSQL-backed store.
//!
//! Ownership is enforced in SQL: child rows are only reachable by joining up
//! to the owning user, and child inserts select their parent row under the
//! same predicate so a foreign parent id inserts nothing.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Airport, AirportPatch, AuthToken, Brief, BriefPatch, Flight, FlightPatch, Hazard, HazardPatch,
    List, ListPatch, NamedLocation, NamedLocationPatch, NewAirport, NewBrief, NewFlight, NewHazard,
    NewList, NewNamedLocation, NewTask, NewUser, Task, TaskPatch, User, UserPatch,
};
use crate::database::repository::{
    BriefScope, FlightScope, HealthCheck, ListScope, Owner, Repository, TokenRepository,
    UserRepository,
};

const USER_COLUMNS: &str =
    "id, email, password_hash, display_name, first_name, last_name, created_at";
const AIRPORT_COLUMNS: &str = "id, icao_code, name, user_id";
const FLIGHT_COLUMNS: &str = "id, tail_number, callsign, aircraft_type_model, pilot_responsible, \
     origin, destination, flight_level, takeoff_time, arrival_time, user_id";
const BRIEF_COLUMNS: &str = "id, flight_id, surface_winds, flight_level_winds, visibility, \
     sky_condition, temperature, altimeter_setting, brief_time, void_time";
const HAZARD_COLUMNS: &str = "id, brief_id, hazard_type, information";
const NAMED_LOCATION_COLUMNS: &str = "id, city, country, latitude, longitude, user_id";
const LIST_COLUMNS: &str = "id, name, completed, user_id";
const TASK_COLUMNS: &str = "id, list_id, name, completed";

/// Prefixes every column in a list with a table alias
fn qualified(alias: &str, columns: &str) -> String {
    columns
        .split(',')
        .map(|column| format!("{}.{}", alias, column.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn insert_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, display_name, first_name, last_name) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(new.email)
            .bind(new.password_hash)
            .bind(new.display_name)
            .bind(new.first_name)
            .bind(new.last_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET \
                display_name = COALESCE($2, display_name), \
                first_name = COALESCE($3, first_name), \
                last_name = COALESCE($4, last_name) \
             WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(patch.display_name)
            .bind(patch.first_name)
            .bind(patch.last_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TokenRepository for PgStore {
    async fn issue(&self, user_id: i64, token_hash: &str) -> Result<AuthToken, DatabaseError> {
        let token = sqlx::query_as::<_, AuthToken>(
            "INSERT INTO auth_tokens (token_hash, user_id) VALUES ($1, $2) \
             RETURNING token_hash, user_id, created_at",
        )
        .bind(token_hash)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(token)
    }

    async fn find(&self, token_hash: &str) -> Result<Option<AuthToken>, DatabaseError> {
        let token = sqlx::query_as::<_, AuthToken>(
            "SELECT token_hash, user_id, created_at FROM auth_tokens WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(token)
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository<Airport> for PgStore {
    async fn select_any(&self, scope: &Owner) -> Result<Vec<Airport>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM airports WHERE user_id = $1 ORDER BY id",
            AIRPORT_COLUMNS
        );
        let rows = sqlx::query_as::<_, Airport>(&sql)
            .bind(scope.user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn select_one(
        &self,
        scope: &Owner,
        key: &String,
    ) -> Result<Option<Airport>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM airports WHERE user_id = $1 AND icao_code = $2",
            AIRPORT_COLUMNS
        );
        let row = sqlx::query_as::<_, Airport>(&sql)
            .bind(scope.user_id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, scope: &Owner, new: NewAirport) -> Result<Airport, DatabaseError> {
        let sql = format!(
            "INSERT INTO airports (icao_code, name, user_id) VALUES ($1, $2, $3) RETURNING {}",
            AIRPORT_COLUMNS
        );
        let row = sqlx::query_as::<_, Airport>(&sql)
            .bind(new.icao_code)
            .bind(new.name)
            .bind(scope.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(
        &self,
        scope: &Owner,
        key: &String,
        patch: AirportPatch,
    ) -> Result<Option<Airport>, DatabaseError> {
        let sql = format!(
            "UPDATE airports SET \
                icao_code = COALESCE($3, icao_code), \
                name = COALESCE($4, name) \
             WHERE user_id = $1 AND icao_code = $2 RETURNING {}",
            AIRPORT_COLUMNS
        );
        let row = sqlx::query_as::<_, Airport>(&sql)
            .bind(scope.user_id)
            .bind(key)
            .bind(patch.icao_code)
            .bind(patch.name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, scope: &Owner, key: &String) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM airports WHERE user_id = $1 AND icao_code = $2")
            .bind(scope.user_id)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository<Flight> for PgStore {
    async fn select_any(&self, scope: &Owner) -> Result<Vec<Flight>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM flights WHERE user_id = $1 ORDER BY id",
            FLIGHT_COLUMNS
        );
        let rows = sqlx::query_as::<_, Flight>(&sql)
            .bind(scope.user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn select_one(&self, scope: &Owner, key: &i64) -> Result<Option<Flight>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM flights WHERE user_id = $1 AND id = $2",
            FLIGHT_COLUMNS
        );
        let row = sqlx::query_as::<_, Flight>(&sql)
            .bind(scope.user_id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, scope: &Owner, new: NewFlight) -> Result<Flight, DatabaseError> {
        let sql = format!(
            "INSERT INTO flights (tail_number, callsign, aircraft_type_model, pilot_responsible, \
                origin, destination, flight_level, takeoff_time, arrival_time, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {}",
            FLIGHT_COLUMNS
        );
        let row = sqlx::query_as::<_, Flight>(&sql)
            .bind(new.tail_number)
            .bind(new.callsign)
            .bind(new.aircraft_type_model)
            .bind(new.pilot_responsible)
            .bind(new.origin)
            .bind(new.destination)
            .bind(new.flight_level)
            .bind(new.takeoff_time)
            .bind(new.arrival_time)
            .bind(scope.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(
        &self,
        scope: &Owner,
        key: &i64,
        patch: FlightPatch,
    ) -> Result<Option<Flight>, DatabaseError> {
        let sql = format!(
            "UPDATE flights SET \
                tail_number = COALESCE($3, tail_number), \
                callsign = COALESCE($4, callsign), \
                aircraft_type_model = COALESCE($5, aircraft_type_model), \
                pilot_responsible = COALESCE($6, pilot_responsible), \
                origin = COALESCE($7, origin), \
                destination = COALESCE($8, destination), \
                flight_level = COALESCE($9, flight_level), \
                takeoff_time = COALESCE($10, takeoff_time), \
                arrival_time = COALESCE($11, arrival_time) \
             WHERE user_id = $1 AND id = $2 RETURNING {}",
            FLIGHT_COLUMNS
        );
        let row = sqlx::query_as::<_, Flight>(&sql)
            .bind(scope.user_id)
            .bind(key)
            .bind(patch.tail_number)
            .bind(patch.callsign)
            .bind(patch.aircraft_type_model)
            .bind(patch.pilot_responsible)
            .bind(patch.origin)
            .bind(patch.destination)
            .bind(patch.flight_level)
            .bind(patch.takeoff_time)
            .bind(patch.arrival_time)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, scope: &Owner, key: &i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM flights WHERE user_id = $1 AND id = $2")
            .bind(scope.user_id)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository<Brief> for PgStore {
    async fn select_any(&self, scope: &FlightScope) -> Result<Vec<Brief>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM briefs b JOIN flights f ON f.id = b.flight_id \
             WHERE f.user_id = $1 AND b.flight_id = $2 ORDER BY b.id",
            qualified("b", BRIEF_COLUMNS)
        );
        let rows = sqlx::query_as::<_, Brief>(&sql)
            .bind(scope.user_id)
            .bind(scope.flight_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn select_one(
        &self,
        scope: &FlightScope,
        key: &i64,
    ) -> Result<Option<Brief>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM briefs b JOIN flights f ON f.id = b.flight_id \
             WHERE f.user_id = $1 AND b.flight_id = $2 AND b.id = $3",
            qualified("b", BRIEF_COLUMNS)
        );
        let row = sqlx::query_as::<_, Brief>(&sql)
            .bind(scope.user_id)
            .bind(scope.flight_id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, scope: &FlightScope, new: NewBrief) -> Result<Brief, DatabaseError> {
        let sql = format!(
            "INSERT INTO briefs (flight_id, surface_winds, flight_level_winds, visibility, \
                sky_condition, temperature, altimeter_setting, brief_time, void_time) \
             SELECT f.id, $3, $4, $5, $6, $7, $8, $9, $10 FROM flights f \
             WHERE f.user_id = $1 AND f.id = $2 RETURNING {}",
            BRIEF_COLUMNS
        );
        sqlx::query_as::<_, Brief>(&sql)
            .bind(scope.user_id)
            .bind(scope.flight_id)
            .bind(new.surface_winds)
            .bind(new.flight_level_winds)
            .bind(new.visibility)
            .bind(new.sky_condition)
            .bind(new.temperature)
            .bind(new.altimeter_setting)
            .bind(new.brief_time)
            .bind(new.void_time)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(DatabaseError::not_found::<Flight>)
    }

    async fn update(
        &self,
        scope: &FlightScope,
        key: &i64,
        patch: BriefPatch,
    ) -> Result<Option<Brief>, DatabaseError> {
        let sql = format!(
            "UPDATE briefs b SET \
                surface_winds = COALESCE($4, b.surface_winds), \
                flight_level_winds = COALESCE($5, b.flight_level_winds), \
                visibility = COALESCE($6, b.visibility), \
                sky_condition = COALESCE($7, b.sky_condition), \
                temperature = COALESCE($8, b.temperature), \
                altimeter_setting = COALESCE($9, b.altimeter_setting), \
                brief_time = COALESCE($10, b.brief_time), \
                void_time = COALESCE($11, b.void_time) \
             FROM flights f \
             WHERE f.id = b.flight_id AND f.user_id = $1 AND b.flight_id = $2 AND b.id = $3 \
             RETURNING {}",
            qualified("b", BRIEF_COLUMNS)
        );
        let row = sqlx::query_as::<_, Brief>(&sql)
            .bind(scope.user_id)
            .bind(scope.flight_id)
            .bind(key)
            .bind(patch.surface_winds)
            .bind(patch.flight_level_winds)
            .bind(patch.visibility)
            .bind(patch.sky_condition)
            .bind(patch.temperature)
            .bind(patch.altimeter_setting)
            .bind(patch.brief_time)
            .bind(patch.void_time)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, scope: &FlightScope, key: &i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM briefs b USING flights f \
             WHERE f.id = b.flight_id AND f.user_id = $1 AND b.flight_id = $2 AND b.id = $3",
        )
        .bind(scope.user_id)
        .bind(scope.flight_id)
        .bind(key)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository<Hazard> for PgStore {
    async fn select_any(&self, scope: &BriefScope) -> Result<Vec<Hazard>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM hazards h \
             JOIN briefs b ON b.id = h.brief_id \
             JOIN flights f ON f.id = b.flight_id \
             WHERE f.user_id = $1 AND b.flight_id = $2 AND h.brief_id = $3 ORDER BY h.id",
            qualified("h", HAZARD_COLUMNS)
        );
        let rows = sqlx::query_as::<_, Hazard>(&sql)
            .bind(scope.user_id)
            .bind(scope.flight_id)
            .bind(scope.brief_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn select_one(
        &self,
        scope: &BriefScope,
        key: &i64,
    ) -> Result<Option<Hazard>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM hazards h \
             JOIN briefs b ON b.id = h.brief_id \
             JOIN flights f ON f.id = b.flight_id \
             WHERE f.user_id = $1 AND b.flight_id = $2 AND h.brief_id = $3 AND h.id = $4",
            qualified("h", HAZARD_COLUMNS)
        );
        let row = sqlx::query_as::<_, Hazard>(&sql)
            .bind(scope.user_id)
            .bind(scope.flight_id)
            .bind(scope.brief_id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, scope: &BriefScope, new: NewHazard) -> Result<Hazard, DatabaseError> {
        let sql = format!(
            "INSERT INTO hazards (brief_id, hazard_type, information) \
             SELECT b.id, $4, $5 FROM briefs b JOIN flights f ON f.id = b.flight_id \
             WHERE f.user_id = $1 AND b.flight_id = $2 AND b.id = $3 RETURNING {}",
            HAZARD_COLUMNS
        );
        sqlx::query_as::<_, Hazard>(&sql)
            .bind(scope.user_id)
            .bind(scope.flight_id)
            .bind(scope.brief_id)
            .bind(new.hazard_type)
            .bind(new.information)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(DatabaseError::not_found::<Brief>)
    }

    async fn update(
        &self,
        scope: &BriefScope,
        key: &i64,
        patch: HazardPatch,
    ) -> Result<Option<Hazard>, DatabaseError> {
        let sql = format!(
            "UPDATE hazards h SET \
                hazard_type = COALESCE($5, h.hazard_type), \
                information = COALESCE($6, h.information) \
             FROM briefs b JOIN flights f ON f.id = b.flight_id \
             WHERE b.id = h.brief_id AND f.user_id = $1 AND b.flight_id = $2 \
                AND h.brief_id = $3 AND h.id = $4 \
             RETURNING {}",
            qualified("h", HAZARD_COLUMNS)
        );
        let row = sqlx::query_as::<_, Hazard>(&sql)
            .bind(scope.user_id)
            .bind(scope.flight_id)
            .bind(scope.brief_id)
            .bind(key)
            .bind(patch.hazard_type)
            .bind(patch.information)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, scope: &BriefScope, key: &i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM hazards h USING briefs b, flights f \
             WHERE b.id = h.brief_id AND f.id = b.flight_id AND f.user_id = $1 \
                AND b.flight_id = $2 AND h.brief_id = $3 AND h.id = $4",
        )
        .bind(scope.user_id)
        .bind(scope.flight_id)
        .bind(scope.brief_id)
        .bind(key)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Resolves a city key to the oldest matching row of the user
const NAMED_LOCATION_BY_CITY: &str = "SELECT id FROM named_locations \
     WHERE user_id = $1 AND lower(city) = lower($2) ORDER BY id LIMIT 1";

#[async_trait]
impl Repository<NamedLocation> for PgStore {
    async fn select_any(&self, scope: &Owner) -> Result<Vec<NamedLocation>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM named_locations WHERE user_id = $1 ORDER BY id",
            NAMED_LOCATION_COLUMNS
        );
        let rows = sqlx::query_as::<_, NamedLocation>(&sql)
            .bind(scope.user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn select_one(
        &self,
        scope: &Owner,
        key: &String,
    ) -> Result<Option<NamedLocation>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM named_locations WHERE id = ({})",
            NAMED_LOCATION_COLUMNS, NAMED_LOCATION_BY_CITY
        );
        let row = sqlx::query_as::<_, NamedLocation>(&sql)
            .bind(scope.user_id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(
        &self,
        scope: &Owner,
        new: NewNamedLocation,
    ) -> Result<NamedLocation, DatabaseError> {
        let sql = format!(
            "INSERT INTO named_locations (city, country, latitude, longitude, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            NAMED_LOCATION_COLUMNS
        );
        let row = sqlx::query_as::<_, NamedLocation>(&sql)
            .bind(new.city)
            .bind(new.country)
            .bind(new.latitude)
            .bind(new.longitude)
            .bind(scope.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(
        &self,
        scope: &Owner,
        key: &String,
        patch: NamedLocationPatch,
    ) -> Result<Option<NamedLocation>, DatabaseError> {
        let sql = format!(
            "UPDATE named_locations SET \
                city = COALESCE($3, city), \
                country = COALESCE($4, country), \
                latitude = COALESCE($5, latitude), \
                longitude = COALESCE($6, longitude) \
             WHERE id = ({}) RETURNING {}",
            NAMED_LOCATION_BY_CITY, NAMED_LOCATION_COLUMNS
        );
        let row = sqlx::query_as::<_, NamedLocation>(&sql)
            .bind(scope.user_id)
            .bind(key)
            .bind(patch.city)
            .bind(patch.country)
            .bind(patch.latitude)
            .bind(patch.longitude)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, scope: &Owner, key: &String) -> Result<bool, DatabaseError> {
        let sql = format!("DELETE FROM named_locations WHERE id = ({})", NAMED_LOCATION_BY_CITY);
        let result = sqlx::query(&sql)
            .bind(scope.user_id)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository<List> for PgStore {
    async fn select_any(&self, scope: &Owner) -> Result<Vec<List>, DatabaseError> {
        let sql = format!("SELECT {} FROM lists WHERE user_id = $1 ORDER BY id", LIST_COLUMNS);
        let rows = sqlx::query_as::<_, List>(&sql)
            .bind(scope.user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn select_one(&self, scope: &Owner, key: &i64) -> Result<Option<List>, DatabaseError> {
        let sql = format!("SELECT {} FROM lists WHERE user_id = $1 AND id = $2", LIST_COLUMNS);
        let row = sqlx::query_as::<_, List>(&sql)
            .bind(scope.user_id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, scope: &Owner, new: NewList) -> Result<List, DatabaseError> {
        let sql = format!(
            "INSERT INTO lists (name, completed, user_id) VALUES ($1, $2, $3) RETURNING {}",
            LIST_COLUMNS
        );
        let row = sqlx::query_as::<_, List>(&sql)
            .bind(new.name)
            .bind(new.completed)
            .bind(scope.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update(
        &self,
        scope: &Owner,
        key: &i64,
        patch: ListPatch,
    ) -> Result<Option<List>, DatabaseError> {
        let sql = format!(
            "UPDATE lists SET \
                name = COALESCE($3, name), \
                completed = COALESCE($4, completed) \
             WHERE user_id = $1 AND id = $2 RETURNING {}",
            LIST_COLUMNS
        );
        let row = sqlx::query_as::<_, List>(&sql)
            .bind(scope.user_id)
            .bind(key)
            .bind(patch.name)
            .bind(patch.completed)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, scope: &Owner, key: &i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM lists WHERE user_id = $1 AND id = $2")
            .bind(scope.user_id)
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Repository<Task> for PgStore {
    async fn select_any(&self, scope: &ListScope) -> Result<Vec<Task>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM tasks t JOIN lists l ON l.id = t.list_id \
             WHERE l.user_id = $1 AND t.list_id = $2 ORDER BY t.id",
            qualified("t", TASK_COLUMNS)
        );
        let rows = sqlx::query_as::<_, Task>(&sql)
            .bind(scope.user_id)
            .bind(scope.list_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn select_one(
        &self,
        scope: &ListScope,
        key: &i64,
    ) -> Result<Option<Task>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM tasks t JOIN lists l ON l.id = t.list_id \
             WHERE l.user_id = $1 AND t.list_id = $2 AND t.id = $3",
            qualified("t", TASK_COLUMNS)
        );
        let row = sqlx::query_as::<_, Task>(&sql)
            .bind(scope.user_id)
            .bind(scope.list_id)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, scope: &ListScope, new: NewTask) -> Result<Task, DatabaseError> {
        let sql = format!(
            "INSERT INTO tasks (list_id, name, completed) \
             SELECT l.id, $3, $4 FROM lists l WHERE l.user_id = $1 AND l.id = $2 \
             RETURNING {}",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(scope.user_id)
            .bind(scope.list_id)
            .bind(new.name)
            .bind(new.completed)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(DatabaseError::not_found::<List>)
    }

    async fn update(
        &self,
        scope: &ListScope,
        key: &i64,
        patch: TaskPatch,
    ) -> Result<Option<Task>, DatabaseError> {
        let sql = format!(
            "UPDATE tasks t SET \
                name = COALESCE($4, t.name), \
                completed = COALESCE($5, t.completed) \
             FROM lists l \
             WHERE l.id = t.list_id AND l.user_id = $1 AND t.list_id = $2 AND t.id = $3 \
             RETURNING {}",
            qualified("t", TASK_COLUMNS)
        );
        let row = sqlx::query_as::<_, Task>(&sql)
            .bind(scope.user_id)
            .bind(scope.list_id)
            .bind(key)
            .bind(patch.name)
            .bind(patch.completed)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete(&self, scope: &ListScope, key: &i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM tasks t USING lists l \
             WHERE l.id = t.list_id AND l.user_id = $1 AND t.list_id = $2 AND t.id = $3",
        )
        .bind(scope.user_id)
        .bind(scope.list_id)
        .bind(key)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
