use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::repository::{Entity, ListScope};
use crate::validators::{validate_task_name, FieldErrors};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Task {
    pub id: i64,
    #[serde(rename = "list")]
    pub list_id: i64,
    pub name: String,
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub completed: Option<bool>,
}

impl Entity for Task {
    type Scope = ListScope;
    type Key = i64;
    type New = NewTask;
    type Patch = TaskPatch;

    const NAME: &'static str = "Task";
}

/// The parent list comes from the route; a `list` key in the body is ignored
#[derive(Debug, Default, Deserialize)]
pub struct TaskPayload {
    pub name: Option<String>,
    pub completed: Option<bool>,
}

impl TaskPayload {
    pub fn into_new(self) -> Result<NewTask, FieldErrors> {
        let mut errors = FieldErrors::new();
        match errors.require("name", self.name, |v| validate_task_name(&v)) {
            Some(name) => Ok(NewTask {
                name,
                completed: self.completed.unwrap_or(false),
            }),
            None => Err(errors),
        }
    }

    pub fn into_patch(self) -> Result<TaskPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let patch = TaskPatch {
            name: errors.optional(self.name, |v| validate_task_name(&v)),
            completed: self.completed,
        };
        errors.into_result().map(|_| patch)
    }
}
