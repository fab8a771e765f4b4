//! The CR role gate and login validation.
//!
//! None of this is real authentication: students assert their own
//! identity against the roster, and the CR password is a daily value
//! anyone in the class could derive. It exists to keep honest people
//! honest, not to resist an attacker.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, Response, StatusCode},
    middleware::Next,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;

use crate::types::StudentRecord;

/// The CR password for a given calendar date: `DDMMYYYY`.
pub fn daily_password(date: NaiveDate) -> String {
    format!("{:02}{:02}{:04}", date.day(), date.month(), date.year())
}

/// CR password configuration.
#[derive(Debug, Clone, Default)]
pub struct CrAuthConfig {
    /// Fixed password pinned via env; None = daily-rotating value.
    pub password_override: Option<String>,
}

impl CrAuthConfig {
    /// Load from the `WORDBOARD_CR_PASSWORD` env var. Unset or blank
    /// means the daily-rotating password stays in effect.
    pub fn from_env() -> Self {
        let password_override = std::env::var("WORDBOARD_CR_PASSWORD")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if password_override.is_some() {
            tracing::info!("CR password pinned via WORDBOARD_CR_PASSWORD");
        } else {
            tracing::info!("CR password rotates daily (DDMMYYYY of the local date)");
        }
        Self { password_override }
    }

    /// Check a candidate CR password against the pinned or daily value.
    pub fn validate(&self, candidate: &str) -> bool {
        let expected = match &self.password_override {
            Some(p) => p.clone(),
            None => daily_password(chrono::Local::now().date_naive()),
        };
        constant_time_eq(expected.as_bytes(), candidate.as_bytes())
    }
}

/// Constant-time byte comparison to prevent timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Student login check: the (roll number, name) pair must match a
/// roster row, name compared case-insensitively.
pub fn roster_match(roster: &[StudentRecord], roll_no: &str, name: &str) -> bool {
    let name = name.trim().to_lowercase();
    let roll_no = roll_no.trim();
    roster
        .iter()
        .any(|s| s.roll_no == roll_no && s.name.to_lowercase() == name)
}

/// Roll number shown for a CR, looked up from the roster by name.
pub fn cr_roll_no(roster: &[StudentRecord], name: &str) -> String {
    let name = name.trim().to_lowercase();
    roster
        .iter()
        .find(|s| s.name.to_lowercase() == name)
        .map(|s| s.roll_no.clone())
        .unwrap_or_else(|| "N/A".to_string())
}

/// HTTP Basic Auth middleware for the `/api` routes.
///
/// The username is the self-asserted CR name and is not checked; only
/// the password gates access.
pub async fn cr_auth_middleware(
    State(auth_config): State<Arc<CrAuthConfig>>,
    request: Request<Body>,
    next: Next,
) -> Response<Body> {
    if let Some(auth_header) = request.headers().get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(credentials) = auth_str.strip_prefix("Basic ") {
                if let Ok(decoded) = BASE64.decode(credentials) {
                    if let Ok(decoded_str) = String::from_utf8(decoded) {
                        if let Some((_username, password)) = decoded_str.split_once(':') {
                            if auth_config.validate(password) {
                                return next.run(request).await;
                            }
                        }
                    }
                }
            }
        }
    }

    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header(header::WWW_AUTHENTICATE, "Basic realm=\"Wordboard CR\"")
        .body(Body::from("Unauthorized"))
        .unwrap()
}
