//! Shared mapping from reqwest failures and HTTP statuses to port errors.

use reqwest::StatusCode;

use crate::domain::ports::{FeedSourceError, LikeGatewayError};

const PREVIEW_CHAR_LIMIT: usize = 160;

/// Port errors that can describe HTTP failures.
pub(super) trait HttpFailure: Sized {
    fn timeout(message: String) -> Self;
    fn transport(message: String) -> Self;
    fn rejected(status: u16, message: String) -> Self;
}

impl HttpFailure for FeedSourceError {
    fn timeout(message: String) -> Self {
        Self::Timeout { message }
    }

    fn transport(message: String) -> Self {
        Self::Transport { message }
    }

    fn rejected(status: u16, message: String) -> Self {
        Self::Rejected { status, message }
    }
}

impl HttpFailure for LikeGatewayError {
    fn timeout(message: String) -> Self {
        Self::Timeout { message }
    }

    fn transport(message: String) -> Self {
        Self::Transport { message }
    }

    fn rejected(status: u16, message: String) -> Self {
        Self::Rejected { status, message }
    }
}

pub(super) fn map_transport_error<E: HttpFailure>(error: &reqwest::Error) -> E {
    if error.is_timeout() {
        E::timeout(error.to_string())
    } else {
        E::transport(error.to_string())
    }
}

pub(super) fn map_status_error<E: HttpFailure>(status: StatusCode, body: &[u8]) -> E {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => E::timeout(message),
        _ if status.is_client_error() => E::rejected(status.as_u16(), message),
        _ => E::transport(message),
    }
}

pub(super) fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
