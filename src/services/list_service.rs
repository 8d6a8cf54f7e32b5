use crate::database::models::{List, ListDetail, ListPatch};
use crate::database::{ListScope, Owner};
use crate::error::ApiError;
use crate::state::AppState;

/// Recomputes a list's `completed` flag from its tasks.
///
/// Runs after every task create, update and delete. A list with no tasks
/// keeps whatever flag it had.
pub async fn sync_list_completion(state: &AppState, scope: &ListScope) -> Result<(), ApiError> {
    let tasks = state.tasks.select_any(scope).await?;
    if tasks.is_empty() {
        return Ok(());
    }

    let completed = tasks.iter().all(|task| task.completed);
    let patch = ListPatch {
        name: None,
        completed: Some(completed),
    };
    state
        .lists
        .update(&scope.owner(), &scope.list_id, patch)
        .await?;
    tracing::debug!("List {} completed = {}", scope.list_id, completed);
    Ok(())
}

pub async fn list_detail(
    state: &AppState,
    owner: &Owner,
    list: List,
) -> Result<ListDetail, ApiError> {
    let tasks = state.tasks.select_any(&owner.list(list.id)).await?;
    Ok(ListDetail { list, tasks })
}
