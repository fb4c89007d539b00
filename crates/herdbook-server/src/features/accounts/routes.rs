//! Login, logout, language switching and the dashboard

use axum::{
    extract::State,
    http::{header, HeaderMap, Uri},
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Extension, Form, Router,
};
use chrono::Utc;
use herdbook_common::Message;
use std::collections::BTreeMap;

use super::{
    commands::{LoginCommand, LoginError},
    queries::DashboardError,
};
use crate::{
    api::{
        response::{invalid_form, redirect_with_success, FormContext, Page},
        AppState,
    },
    auth::{worker_profile_id, DASHBOARD_PATH, LOGIN_PATH},
    error::{AppError, AppResult},
    middleware::no_cache,
    session::{AuthContext, Flash, RequestContext, SessionChange},
};

pub fn accounts_routes() -> Router<AppState> {
    let session_views = Router::new()
        .route("/", get(login_page).post(login))
        .route("/logout/", get(logout).post(logout));

    no_cache(session_views)
        .route("/change-language/", get(change_language))
        .route("/dashboard/", get(dashboard))
}

async fn login_page(ctx: RequestContext) -> Response {
    if ctx.actor.is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }
    let form = LoginCommand {
        language: ctx.language.code().to_string(),
        ..LoginCommand::default()
    };
    Page::new(&ctx, "login", FormContext {
        form,
        errors: BTreeMap::new(),
        extra: (),
    })
    .into_response()
}

/// On success the session is re-issued for the user with the chosen language
#[tracing::instrument(skip_all, fields(username = %command.username))]
async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
    Form(command): Form<LoginCommand>,
) -> AppResult<Response> {
    match super::commands::login::handle(&state.db, command.clone()).await {
        Ok(login) => Ok((
            Extension(SessionChange::Login {
                user_id: login.user_id,
                language: login.language,
            }),
            redirect_with_success(DASHBOARD_PATH, Message::LoginSuccessful),
        )
            .into_response()),
        Err(LoginError::Validation(errors)) => {
            Ok(invalid_form(&ctx, "login", command, &errors, ()))
        },
        Err(LoginError::InvalidCredentials) => {
            let ctx = RequestContext {
                language: command.language(),
                ..ctx
            };
            let page = Page::new(&ctx, "login", FormContext {
                form: command,
                errors: BTreeMap::new(),
                extra: (),
            })
            .with_flash(Flash::error(Message::InvalidCredentials));
            Ok(page.into_response())
        },
        Err(LoginError::Password(e)) => Err(e.into()),
        Err(LoginError::Database(e)) => Err(e.into()),
    }
}

async fn logout(ctx: RequestContext) -> Response {
    if let Some(actor) = &ctx.actor {
        tracing::info!(user_id = actor.user_id, "User logged out");
    }
    (
        Extension(SessionChange::Logout),
        redirect_with_success(LOGIN_PATH, Message::LoggedOut),
    )
        .into_response()
}

/// The session layer has already applied `?lang=`; send the user back where
/// they came from
async fn change_language(headers: HeaderMap) -> Redirect {
    Redirect::to(&referer_path(&headers).unwrap_or_else(|| DASHBOARD_PATH.to_string()))
}

/// Path of the `Referer`, without its query so a stale `lang` is not re-applied
fn referer_path(headers: &HeaderMap) -> Option<String> {
    let referer = headers.get(header::REFERER)?.to_str().ok()?;
    let uri: Uri = referer.parse().ok()?;
    let path = uri.path();
    path.starts_with('/').then(|| path.to_string())
}

async fn dashboard(State(state): State<AppState>, auth: AuthContext) -> AppResult<Response> {
    let now = Utc::now();
    if auth.actor.is_admin() {
        let dashboard = super::queries::dashboard::admin(&state.db, now).await?;
        return Ok(Page::new(&auth.request, "dashboard/admin", dashboard).into_response());
    }

    let worker_id = worker_profile_id(&state.db, &auth.actor).await?;
    let dashboard = super::queries::dashboard::worker(&state.db, worker_id, now).await?;
    Ok(Page::new(&auth.request, "dashboard/worker", dashboard).into_response())
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Database(e) => AppError::Database(e),
        }
    }
}
