pub mod comment;
pub mod health;
pub mod post;

use actix_web::{HttpMessage, HttpRequest};

pub(crate) fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<crate::presentation::middleware::RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}
