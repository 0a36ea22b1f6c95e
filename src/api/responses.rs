//! Shared response helpers

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};

/// A generated file offered as a download
#[derive(Debug)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
}

impl Attachment {
    pub fn csv(file_name: impl Into<String>, body: String) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: "text/csv; charset=utf-8",
            body,
        }
    }

    pub fn xml(file_name: impl Into<String>, body: String) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: "application/xml; charset=utf-8",
            body,
        }
    }
}

impl IntoResponse for Attachment {
    fn into_response(self) -> Response {
        let disposition = format!("attachment; filename=\"{}\"", self.file_name.replace('"', ""));
        let mut response = self.body.into_response();
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        if let Ok(value) = HeaderValue::from_str(&disposition) {
            headers.insert(header::CONTENT_DISPOSITION, value);
        }
        response
    }
}
