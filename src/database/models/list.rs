use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::task::Task;
use crate::database::repository::{Entity, Owner};
use crate::validators::{validate_list_name, FieldErrors};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct List {
    pub id: i64,
    pub name: String,
    pub completed: bool,
    #[serde(rename = "user")]
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListDetail {
    #[serde(flatten)]
    pub list: List,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone)]
pub struct NewList {
    pub name: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ListPatch {
    pub name: Option<String>,
    pub completed: Option<bool>,
}

impl Entity for List {
    type Scope = Owner;
    type Key = i64;
    type New = NewList;
    type Patch = ListPatch;

    const NAME: &'static str = "List";
}

/// `tasks` is accepted and ignored; tasks are managed through their own routes
#[derive(Debug, Default, Deserialize)]
pub struct ListPayload {
    pub name: Option<String>,
    pub completed: Option<bool>,
}

impl ListPayload {
    pub fn into_new(self) -> Result<NewList, FieldErrors> {
        let mut errors = FieldErrors::new();
        match errors.require("name", self.name, |v| validate_list_name(&v)) {
            Some(name) => Ok(NewList {
                name,
                completed: self.completed.unwrap_or(false),
            }),
            None => Err(errors),
        }
    }

    pub fn into_patch(self) -> Result<ListPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let patch = ListPatch {
            name: errors.optional(self.name, |v| validate_list_name(&v)),
            completed: self.completed,
        };
        errors.into_result().map(|_| patch)
    }
}
