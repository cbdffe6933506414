//! Module form controller.
//!
//! A single endpoint with two states. GET renders the form view; POST binds the submitted
//! payload and renders the same view again. Both expose the full user list as the `users`
//! model attribute. Nothing is persisted and there is no redirect after a POST.
//!
//! Submissions bind from JSON (`application/json` or any `+json` type) or from an
//! `application/x-www-form-urlencoded` body. A payload that fails to bind is reported back as
//! `errors` on the redisplayed view with `422 Unprocessable Entity`, so the caller sees why the
//! submission was not accepted.

use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::Json,
};
use mhde_core::User;
use serde::Serialize;
use utoipa::ToSchema;

/// Path the form controller is mounted on.
pub const FORM_PATH: &str = "/module/mhealthdataexchange/mhealthdataexchange.form";

/// View rendered for both GET and POST.
pub const FORM_VIEW: &str = "/module/mhealthdataexchange/mhealthdataexchange";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserRes {
    pub user_id: i64,
    pub uuid: String,
    pub username: String,
    pub display_name: Option<String>,
}

impl From<User> for UserRes {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            uuid: user.uuid.to_string(),
            username: user.username.to_string(),
            display_name: user.person.display_name(),
        }
    }
}

/// The rendered view: its name and model attributes.
#[derive(Debug, Serialize, ToSchema)]
pub struct FormViewRes {
    pub view: String,
    pub users: Vec<UserRes>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

type HandlerError = (StatusCode, &'static str);

/// The `users` model attribute.
fn users_attribute(state: &AppState) -> Result<Vec<UserRes>, HandlerError> {
    match state.services.users.get_all_users() {
        Ok(users) => Ok(users.into_iter().map(UserRes::from).collect()),
        Err(e) => {
            tracing::error!("List users error: {:?}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

/// Binds a submission. An empty body is an empty submission.
fn bind_submission(headers: &HeaderMap, body: &Bytes) -> Result<serde_json::Value, Vec<String>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Null);
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if media_type == "application/json" || media_type.ends_with("+json") {
        serde_json::from_slice(body).map_err(|e| vec![format!("invalid JSON payload: {e}")])
    } else if media_type == "application/x-www-form-urlencoded" {
        bind_form_fields(body)
    } else {
        Err(vec![format!(
            "unsupported content type '{content_type}', expected application/json or \
             application/x-www-form-urlencoded"
        )])
    }
}

/// Form fields as a JSON object. Repeated fields collect into an array in submission order.
fn bind_form_fields(body: &Bytes) -> Result<serde_json::Value, Vec<String>> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
        .map_err(|e| vec![format!("invalid form payload: {e}")])?;

    let mut fields = serde_json::Map::new();
    for (name, value) in pairs {
        let value = serde_json::Value::String(value);
        match fields.get_mut(&name) {
            None => {
                fields.insert(name, value);
            }
            Some(serde_json::Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = serde_json::Value::Array(vec![first, value]);
            }
        }
    }

    Ok(serde_json::Value::Object(fields))
}

#[utoipa::path(
    get,
    path = "/module/mhealthdataexchange/mhealthdataexchange.form",
    responses(
        (status = 200, description = "Form view with the user list", body = FormViewRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Render the form view.
///
/// # Errors
/// Returns `500 Internal Server Error` if the user list cannot be fetched from the host.
#[axum::debug_handler]
pub async fn on_get(State(state): State<AppState>) -> Result<Json<FormViewRes>, HandlerError> {
    let users = users_attribute(&state)?;
    Ok(Json(FormViewRes {
        view: FORM_VIEW.into(),
        users,
        errors: Vec::new(),
    }))
}

#[utoipa::path(
    post,
    path = "/module/mhealthdataexchange/mhealthdataexchange.form",
    responses(
        (status = 200, description = "Submission accepted, form view redisplayed", body = FormViewRes),
        (status = 422, description = "Submission could not be bound, form view with errors", body = FormViewRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Accept a form submission and redisplay the form view.
///
/// # Errors
/// Returns `500 Internal Server Error` if the user list cannot be fetched from the host.
#[axum::debug_handler]
pub async fn on_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<FormViewRes>), HandlerError> {
    let users = users_attribute(&state)?;

    match bind_submission(&headers, &body) {
        Ok(submission) => {
            tracing::debug!(kind = json_kind(&submission), "form submission bound");
            Ok((
                StatusCode::OK,
                Json(FormViewRes {
                    view: FORM_VIEW.into(),
                    users,
                    errors: Vec::new(),
                }),
            ))
        }
        Err(errors) => {
            tracing::warn!(?errors, "form submission rejected");
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(FormViewRes {
                    view: FORM_VIEW.into(),
                    users,
                    errors,
                }),
            ))
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "empty",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
