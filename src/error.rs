use std::fmt;

use anyhow::anyhow;

use actix_web::{
    http::{header::ContentType, StatusCode},
    HttpResponse,
    ResponseError,
};


#[derive(Debug)]
pub struct Error {
    status_code: StatusCode,
    err: anyhow::Error,
}

impl Error {
    fn internal(err: anyhow::Error) -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            err,
        }
    }
    fn bad_request(err: anyhow::Error) -> Self {
        Self {
            status_code: StatusCode::BAD_REQUEST,
            err
        }
    }
}

pub fn missing_query() -> Error {
    Error::bad_request(anyhow!("Missing query parameter 'q'"))
}
pub fn value_parsing_err<E: Into<anyhow::Error>>(err: E) -> Error {
    Error::bad_request(err.into())
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.err, f)
    }
}

impl<E: Into<anyhow::Error> + Send> From<E> for Error {
    fn from(err: E) -> Self {
        Self::internal(err.into())
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        self.status_code
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        // Library errors stay in the log, clients only see client errors verbatim
        let body = if status_code.is_server_error() {
            log::error!("{:#}", self.err);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status_code)
            .insert_header(ContentType::plaintext())
            .body(body)
    }
}
