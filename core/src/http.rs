//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! `TodoClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network; a `Transport` (see `transport`) executes the
//! round-trip in between. Keeping the two apart lets the wire format be
//! checked against fixed vectors and lets tests swap in scripted transports.

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether a request with this method may be sent again after a failed
    /// attempt. `PUT` toggles on this API, so repeating it is not safe.
    pub fn is_retry_safe(self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Patch | HttpMethod::Delete)
    }
}

/// An HTTP request described as plain data.
///
/// Built by `TodoClient::build_*` methods and handed to a `Transport`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport`, then passed to `TodoClient::parse_*` methods.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Gateway and availability errors that are worth another attempt.
    pub fn is_transient_failure(&self) -> bool {
        matches!(self.status, 502..=504)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_get_patch_delete_are_retry_safe() {
        assert!(HttpMethod::Get.is_retry_safe());
        assert!(HttpMethod::Patch.is_retry_safe());
        assert!(HttpMethod::Delete.is_retry_safe());
        assert!(!HttpMethod::Post.is_retry_safe());
        assert!(!HttpMethod::Put.is_retry_safe());
    }

    #[test]
    fn gateway_errors_are_transient() {
        let mut response = HttpResponse {
            status: 503,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(response.is_transient_failure());
        response.status = 500;
        assert!(!response.is_transient_failure());
        response.status = 404;
        assert!(!response.is_transient_failure());
    }
}
