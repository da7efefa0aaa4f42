pub mod check;
pub mod expiry;
pub mod subscriptions;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde_json::{Value, json};

/// Status and JSON body produced for one invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub cors: bool,
}

impl Reply {
    pub fn message(status: StatusCode, message: &str) -> Self {
        Reply {
            status,
            body: json!({ "message": message }),
            cors: false,
        }
    }

    pub fn error(status: StatusCode, error: &str) -> Self {
        Reply {
            status,
            body: json!({ "error": error }),
            cors: false,
        }
    }

    /// Empty reply to a CORS preflight
    pub fn preflight() -> Self {
        Reply {
            status: StatusCode::OK,
            body: Value::Null,
            cors: true,
        }
    }

    pub fn with_cors(mut self) -> Self {
        self.cors = true;
        self
    }

    pub fn into_response(self, allowed_origin: &str) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);
        if self.cors {
            builder
                .insert_header(("Access-Control-Allow-Origin", allowed_origin))
                .insert_header(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
                .insert_header(("Access-Control-Allow-Headers", "Content-Type"))
                .insert_header(("Access-Control-Allow-Credentials", "true"));
        }
        match self.body {
            Value::Null => builder.finish(),
            body => builder.json(body),
        }
    }
}
