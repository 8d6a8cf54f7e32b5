//! Data-access interface shared by the Postgres and in-memory stores.
//!
//! Every query takes an explicit ownership scope, so a handler can never
//! reach a row that the authenticated user does not own, directly or
//! through its parent chain.

use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Airport, AuthToken, Brief, Flight, Hazard, List, NamedLocation, NewUser, Task, User, UserPatch,
};

/// Top-level rows owned directly by a user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    pub user_id: i64,
}

/// Briefs of one of the user's flights
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightScope {
    pub user_id: i64,
    pub flight_id: i64,
}

/// Hazards of one brief, reached through the user's flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BriefScope {
    pub user_id: i64,
    pub flight_id: i64,
    pub brief_id: i64,
}

/// Tasks of one of the user's lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListScope {
    pub user_id: i64,
    pub list_id: i64,
}

impl Owner {
    pub fn flight(self, flight_id: i64) -> FlightScope {
        FlightScope {
            user_id: self.user_id,
            flight_id,
        }
    }

    pub fn list(self, list_id: i64) -> ListScope {
        ListScope {
            user_id: self.user_id,
            list_id,
        }
    }
}

impl FlightScope {
    pub fn owner(self) -> Owner {
        Owner {
            user_id: self.user_id,
        }
    }

    pub fn brief(self, brief_id: i64) -> BriefScope {
        BriefScope {
            user_id: self.user_id,
            flight_id: self.flight_id,
            brief_id,
        }
    }
}

impl BriefScope {
    pub fn flight(self) -> FlightScope {
        FlightScope {
            user_id: self.user_id,
            flight_id: self.flight_id,
        }
    }
}

impl ListScope {
    pub fn owner(self) -> Owner {
        Owner {
            user_id: self.user_id,
        }
    }
}

/// A stored resource type and the shapes used to scope, address and mutate it
pub trait Entity: Clone + Send + Sync + 'static {
    type Scope: Send + Sync;
    type Key: Send + Sync;
    type New: Send;
    type Patch: Send;

    const NAME: &'static str;
}

#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// All rows in scope, oldest first
    async fn select_any(&self, scope: &E::Scope) -> Result<Vec<E>, DatabaseError>;

    async fn select_one(&self, scope: &E::Scope, key: &E::Key) -> Result<Option<E>, DatabaseError>;

    /// Fails with `NotFound` when the scope's parent row is absent or not owned
    async fn insert(&self, scope: &E::Scope, new: E::New) -> Result<E, DatabaseError>;

    async fn update(
        &self,
        scope: &E::Scope,
        key: &E::Key,
        patch: E::Patch,
    ) -> Result<Option<E>, DatabaseError>;

    async fn delete(&self, scope: &E::Scope, key: &E::Key) -> Result<bool, DatabaseError>;

    async fn select_404(&self, scope: &E::Scope, key: &E::Key) -> Result<E, DatabaseError> {
        self.select_one(scope, key)
            .await?
            .ok_or_else(|| DatabaseError::not_found::<E>())
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, new: NewUser) -> Result<User, DatabaseError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError>;
    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>, DatabaseError>;
    /// Removes the user and everything it owns
    async fn delete_user(&self, id: i64) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn issue(&self, user_id: i64, token_hash: &str) -> Result<AuthToken, DatabaseError>;
    async fn find(&self, token_hash: &str) -> Result<Option<AuthToken>, DatabaseError>;
    async fn revoke(&self, token_hash: &str) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// Everything a backing store must provide to serve the API
pub trait Store:
    UserRepository
    + TokenRepository
    + HealthCheck
    + Repository<Airport>
    + Repository<Flight>
    + Repository<Brief>
    + Repository<Hazard>
    + Repository<NamedLocation>
    + Repository<List>
    + Repository<Task>
    + 'static
{
}

impl<T> Store for T where
    T: UserRepository
        + TokenRepository
        + HealthCheck
        + Repository<Airport>
        + Repository<Flight>
        + Repository<Brief>
        + Repository<Hazard>
        + Repository<NamedLocation>
        + Repository<List>
        + Repository<Task>
        + 'static
{
}
