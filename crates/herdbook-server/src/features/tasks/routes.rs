//! Task routes
//!
//! - `GET /tasks/` - all tasks for admins, own tasks for workers
//! - `GET|POST /tasks/create/` - assign a task (admin)
//! - `GET /tasks/:id/` - detail (admin or assignee)
//! - `GET|POST /tasks/:id/update/` - full form for admins, status form for the assignee
//! - `GET|POST /tasks/:id/delete/` - confirm and delete (admin)

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Form, Router,
};
use chrono::Utc;
use herdbook_common::Message;
use serde::Serialize;

use super::{
    commands::{
        CreateTaskError, DeleteTaskError, TaskForm, UpdateTaskError, UpdateTaskStatusCommand,
    },
    queries::{GetTaskError, ListTasksError, ListTasksQuery, TaskListItem},
};
use crate::{
    api::{
        response::{form_page, invalid_form, redirect_with_success, Page},
        AppState,
    },
    auth::{require_admin, worker_profile_id, DASHBOARD_PATH},
    error::{AppError, AppResult},
    features::shared::{choices, Choice, ChoiceOption},
    session::AuthContext,
};

const TASK_LIST_PATH: &str = "/tasks/";

fn task_detail_path(task_id: i64) -> String {
    format!("/tasks/{}/", task_id)
}

pub fn tasks_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks/", get(list_tasks))
        .route("/tasks/create/", get(new_task).post(create_task))
        .route("/tasks/:id/", get(task_detail))
        .route("/tasks/:id/update/", get(edit_task).post(update_task))
        .route("/tasks/:id/delete/", get(confirm_delete_task).post(delete_task))
}

// ============================================================================
// View models
// ============================================================================

#[derive(Debug, Serialize)]
struct TaskListView {
    tasks: Vec<TaskListItem>,
}

#[derive(Debug, Serialize)]
struct TaskView {
    task: TaskListItem,
}

#[derive(Debug, Serialize)]
struct TaskFormExtra {
    workers: Vec<Choice>,
    statuses: Vec<ChoiceOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<TaskListItem>,
}

impl TaskFormExtra {
    async fn load(state: &AppState, task: Option<TaskListItem>) -> AppResult<Self> {
        Ok(Self {
            workers: choices::active_workers(&state.db).await?,
            statuses: choices::task_statuses(),
            task,
        })
    }
}

#[derive(Debug, Serialize)]
struct StatusFormExtra {
    statuses: Vec<ChoiceOption>,
    task: TaskListItem,
}

// ============================================================================
// Query handlers
// ============================================================================

async fn list_tasks(State(state): State<AppState>, auth: AuthContext) -> AppResult<Response> {
    let query = if auth.actor.is_admin() {
        ListTasksQuery::all()
    } else {
        ListTasksQuery::for_worker(worker_profile_id(&state.db, &auth.actor).await?)
    };
    let tasks = super::queries::list::handle(&state.db, query, Utc::now()).await?;

    Ok(Page::new(&auth.request, "tasks/list", TaskListView { tasks }).into_response())
}

async fn task_detail(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<i64>,
) -> AppResult<Response> {
    let task = super::queries::get::handle(&state.db, task_id, Utc::now()).await?;
    if !auth.actor.is_admin() && task.worker_user_id != auth.actor.user_id {
        return Err(AppError::AccessDenied {
            redirect_to: DASHBOARD_PATH,
        });
    }

    Ok(Page::new(&auth.request, "tasks/detail", TaskView { task }).into_response())
}

// ============================================================================
// Command handlers
// ============================================================================

async fn new_task(State(state): State<AppState>, auth: AuthContext) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    let extra = TaskFormExtra::load(&state, None).await?;
    Ok(form_page(&auth.request, "tasks/form", TaskForm::initial(), extra))
}

#[tracing::instrument(skip_all, fields(user_id = auth.actor.user_id))]
async fn create_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Form(command): Form<TaskForm>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;

    match super::commands::create::handle(&state.db, &auth.actor, command.clone()).await {
        Ok(_) => Ok(redirect_with_success(TASK_LIST_PATH, Message::TaskAssigned)),
        Err(CreateTaskError::Validation(errors)) => {
            let extra = TaskFormExtra::load(&state, None).await?;
            Ok(invalid_form(&auth.request, "tasks/form", command, &errors, extra))
        },
        Err(e) => Err(e.into()),
    }
}

async fn edit_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<i64>,
) -> AppResult<Response> {
    let task = super::queries::get::handle(&state.db, task_id, Utc::now()).await?;

    if auth.actor.is_admin() {
        let form = TaskForm::from_task(&task.task);
        let extra = TaskFormExtra::load(&state, Some(task)).await?;
        return Ok(form_page(&auth.request, "tasks/form", form, extra));
    }

    let worker_id = worker_profile_id(&state.db, &auth.actor).await?;
    if task.task.assigned_to != worker_id {
        return Err(AppError::AccessDenied {
            redirect_to: DASHBOARD_PATH,
        });
    }
    let form = UpdateTaskStatusCommand {
        status: task.task.status.as_str().to_string(),
    };
    let extra = StatusFormExtra {
        statuses: choices::task_statuses(),
        task,
    };
    Ok(form_page(&auth.request, "tasks/status_form", form, extra))
}

/// Admins submit the full task form; workers submit only `status`
#[tracing::instrument(skip_all, fields(task_id, user_id = auth.actor.user_id))]
async fn update_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<i64>,
    Form(command): Form<TaskForm>,
) -> AppResult<Response> {
    let task = super::queries::get::handle(&state.db, task_id, Utc::now()).await?;

    if auth.actor.is_admin() {
        return match super::commands::update::handle(&state.db, task_id, command.clone()).await {
            Ok(_) => Ok(redirect_with_success(task_detail_path(task_id), Message::TaskUpdated)),
            Err(UpdateTaskError::Validation(errors)) => {
                let extra = TaskFormExtra::load(&state, Some(task)).await?;
                Ok(invalid_form(&auth.request, "tasks/form", command, &errors, extra))
            },
            Err(e) => Err(e.into()),
        };
    }

    let worker_id = worker_profile_id(&state.db, &auth.actor).await?;
    let status_command = UpdateTaskStatusCommand {
        status: command.status,
    };
    match super::commands::update::handle_status(&state.db, task_id, worker_id, status_command.clone())
        .await
    {
        Ok(_) => Ok(redirect_with_success(task_detail_path(task_id), Message::StatusUpdated)),
        Err(UpdateTaskError::Validation(errors)) => {
            let extra = StatusFormExtra {
                statuses: choices::task_statuses(),
                task,
            };
            Ok(invalid_form(&auth.request, "tasks/status_form", status_command, &errors, extra))
        },
        Err(e) => Err(e.into()),
    }
}

async fn confirm_delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    let task = super::queries::get::handle(&state.db, task_id, Utc::now()).await?;
    Ok(Page::new(&auth.request, "tasks/confirm_delete", TaskView { task }).into_response())
}

#[tracing::instrument(skip_all, fields(task_id, user_id = auth.actor.user_id))]
async fn delete_task(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(task_id): Path<i64>,
) -> AppResult<Response> {
    require_admin(&auth.actor, DASHBOARD_PATH)?;
    super::commands::delete::handle(&state.db, task_id).await?;
    Ok(redirect_with_success(TASK_LIST_PATH, Message::TaskDeleted))
}

// ============================================================================
// Error conversions
// ============================================================================

impl From<ListTasksError> for AppError {
    fn from(err: ListTasksError) -> Self {
        match err {
            ListTasksError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetTaskError> for AppError {
    fn from(err: GetTaskError) -> Self {
        match err {
            GetTaskError::NotFound(id) => AppError::not_found("Task", id),
            GetTaskError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<CreateTaskError> for AppError {
    fn from(err: CreateTaskError) -> Self {
        match err {
            CreateTaskError::Validation(errors) => {
                AppError::Internal(format!("unhandled form errors: {}", errors))
            },
            CreateTaskError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateTaskError> for AppError {
    fn from(err: UpdateTaskError) -> Self {
        match err {
            UpdateTaskError::NotFound(id) => AppError::not_found("Task", id),
            UpdateTaskError::NotAssignee { .. } => AppError::AccessDenied {
                redirect_to: DASHBOARD_PATH,
            },
            UpdateTaskError::Validation(errors) => {
                AppError::Internal(format!("unhandled form errors: {}", errors))
            },
            UpdateTaskError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteTaskError> for AppError {
    fn from(err: DeleteTaskError) -> Self {
        match err {
            DeleteTaskError::NotFound(id) => AppError::not_found("Task", id),
            DeleteTaskError::Database(e) => AppError::Database(e),
        }
    }
}
