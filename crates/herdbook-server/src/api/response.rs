//! Response types
//!
//! Pages are rendered as JSON view models: the view name, the active
//! language, the flash messages to display and the view's context. Form
//! views carry the submitted values and localized field errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use herdbook_common::{Language, Message};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::{
    features::shared::validation::FieldErrors,
    session::{Flash, FlashLevel, FlashesShown, PendingFlashes, RequestContext},
};

/// Standard error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

/// A flash message rendered in the request's language
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub level: FlashLevel,
    pub text: &'static str,
}

impl MessageView {
    fn new(flash: &Flash, language: Language) -> Self {
        Self {
            level: flash.level,
            text: flash.text(language),
        }
    }
}

/// A rendered page
///
/// Rendering a page consumes the session's pending flashes.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub view: &'static str,
    pub language: Language,
    pub messages: Vec<MessageView>,
    pub context: T,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> Page<T> {
    pub fn new(ctx: &RequestContext, view: &'static str, context: T) -> Self {
        Self {
            view,
            language: ctx.language,
            messages: ctx
                .messages
                .iter()
                .map(|flash| MessageView::new(flash, ctx.language))
                .collect(),
            context,
            status: StatusCode::OK,
        }
    }

    /// Show a message on this page without storing it
    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.messages.push(MessageView::new(&flash, self.language));
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        (self.status, Extension(FlashesShown), Json(self)).into_response()
    }
}

/// Context of a form view: submitted values, field errors and any extra data
/// the form needs (choices, the parent record)
#[derive(Debug, Serialize)]
pub struct FormContext<F, E = ()> {
    pub form: F,
    pub errors: BTreeMap<&'static str, Vec<String>>,
    #[serde(flatten)]
    pub extra: E,
}

/// Initial (GET) form view
pub fn form_page<F: Serialize, E: Serialize>(
    ctx: &RequestContext,
    view: &'static str,
    form: F,
    extra: E,
) -> Response {
    Page::new(
        ctx,
        view,
        FormContext {
            form,
            errors: BTreeMap::new(),
            extra,
        },
    )
    .into_response()
}

/// Form re-rendered with field errors, `422 Unprocessable Entity`
pub fn invalid_form<F: Serialize, E: Serialize>(
    ctx: &RequestContext,
    view: &'static str,
    form: F,
    errors: &FieldErrors,
    extra: E,
) -> Response {
    Page::new(
        ctx,
        view,
        FormContext {
            form,
            errors: errors.localize(ctx.language),
            extra,
        },
    )
    .with_status(StatusCode::UNPROCESSABLE_ENTITY)
    .into_response()
}

/// `303 See Other` carrying a success message for the next page
pub fn redirect_with_success(location: impl AsRef<str>, message: Message) -> Response {
    redirect_with(location, Flash::success(message))
}

pub fn redirect_with(location: impl AsRef<str>, flash: Flash) -> Response {
    (
        Extension(PendingFlashes(vec![flash])),
        Redirect::to(location.as_ref()),
    )
        .into_response()
}
