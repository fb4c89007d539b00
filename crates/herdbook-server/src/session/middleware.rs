//! Session middleware
//!
//! Resolves the session before the handler runs and applies the handler's
//! session markers afterwards.

use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderValue, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use herdbook_common::Language;
use serde::Deserialize;

use super::{
    session_id_from_headers, FlashesShown, PendingFlashes, RequestContext, Session, SessionChange,
};
use crate::{api::AppState, auth::Actor, error::AppError};

#[derive(Debug, Deserialize)]
struct LanguageParam {
    lang: Option<String>,
}

/// `?lang=` override present on any request; unknown codes select English
fn language_override(uri: &Uri) -> Option<Language> {
    Query::<LanguageParam>::try_from_uri(uri)
        .ok()
        .and_then(|Query(param)| param.lang)
        .map(|code| Language::from_code_or_default(&code))
}

pub async fn session_layer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    match run(state, request, next).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn run(state: AppState, mut request: Request, next: Next) -> Result<Response, AppError> {
    let store = &state.sessions;
    let requested_language = language_override(request.uri());

    let existing = match session_id_from_headers(request.headers()) {
        Some(id) => store.load(&id).await?,
        None => None,
    };

    let (mut session, mut issue_cookie) = match existing {
        Some(session) => (session, false),
        None => {
            let language = requested_language.unwrap_or_default();
            (store.create(None, language, &[]).await?, true)
        },
    };

    if let Some(language) = requested_language {
        if language != session.language {
            store.set_language(&session.id, language).await?;
            session.language = language;
        }
    }

    let actor = match session.user_id {
        Some(user_id) => Actor::load(&state.db, user_id).await?,
        None => None,
    };

    request.extensions_mut().insert(RequestContext {
        language: session.language,
        actor,
        messages: session.flashes.clone(),
    });

    let mut response = next.run(request).await;

    let shown = response.extensions_mut().remove::<FlashesShown>().is_some();
    let new_flashes = response
        .extensions_mut()
        .remove::<PendingFlashes>()
        .unwrap_or_default()
        .0;
    let change = response.extensions_mut().remove::<SessionChange>();

    let mut flashes = if shown { Vec::new() } else { session.flashes.clone() };
    flashes.extend(new_flashes);

    match change {
        Some(SessionChange::Login { user_id, language }) => {
            session = replace(&state, &session, Some(user_id), language, &flashes).await?;
            issue_cookie = true;
            tracing::info!(user_id, "Session re-issued after login");
        },
        Some(SessionChange::Logout) => {
            let language = session.language;
            session = replace(&state, &session, None, language, &flashes).await?;
            issue_cookie = true;
            tracing::info!("Session cleared");
        },
        None => {
            if flashes != session.flashes {
                store.set_flashes(&session.id, &flashes).await?;
            }
        },
    }

    if issue_cookie {
        let cookie = HeaderValue::from_str(&store.cookie(&session.id))
            .map_err(|e| AppError::Internal(format!("invalid session cookie: {}", e)))?;
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    Ok(response)
}

async fn replace(
    state: &AppState,
    old: &Session,
    user_id: Option<i64>,
    language: Language,
    flashes: &[super::Flash],
) -> Result<Session, AppError> {
    state.sessions.destroy(&old.id).await?;
    Ok(state.sessions.create(user_id, language, flashes).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_override() {
        let uri: Uri = "/dashboard/?lang=mr".parse().unwrap();
        assert_eq!(language_override(&uri), Some(Language::Marathi));

        let uri: Uri = "/tasks/?page=2&lang=fr".parse().unwrap();
        assert_eq!(language_override(&uri), Some(Language::English));

        let uri: Uri = "/tasks/".parse().unwrap();
        assert_eq!(language_override(&uri), None);
    }
}
