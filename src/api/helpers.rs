use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use tracing::{debug, error};

use crate::errors::QuicklinkError;

use super::types::ErrorBody;

/// HTTP status for an engine error.
pub fn http_status(err: &QuicklinkError) -> StatusCode {
    match err {
        QuicklinkError::MissingUrl(_)
        | QuicklinkError::InvalidUrl(_)
        | QuicklinkError::InvalidAlias(_)
        | QuicklinkError::InvalidAliasLength(_)
        | QuicklinkError::AliasTaken(_)
        | QuicklinkError::MissingUserId(_)
        | QuicklinkError::NoChanges(_) => StatusCode::BAD_REQUEST,
        QuicklinkError::NotFound(_) => StatusCode::NOT_FOUND,
        QuicklinkError::Unauthorized(_) => StatusCode::FORBIDDEN,
        QuicklinkError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// `{"error": message, "code": CODE}` with the mapped status.
pub fn error_response(err: &QuicklinkError) -> HttpResponse {
    let status = http_status(err);
    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else {
        debug!("Request rejected: {}", err);
    }

    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ErrorBody {
            error: err.message(),
            code: err.code(),
        })
}

pub fn json_response<T: Serialize>(status: StatusCode, data: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(data)
}

/// 成功时 200 + JSON，失败时映射错误
pub fn api_result<T: Serialize>(result: Result<T, QuicklinkError>) -> HttpResponse {
    match result {
        Ok(data) => json_response(StatusCode::OK, &data),
        Err(e) => error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            http_status(&QuicklinkError::alias_taken("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            http_status(&QuicklinkError::not_found("x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            http_status(&QuicklinkError::unauthorized("x")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            http_status(&QuicklinkError::store_unavailable("x")),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            http_status(&QuicklinkError::code_space_exhausted("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
