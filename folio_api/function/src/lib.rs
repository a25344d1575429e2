//! Single invocation adapter, driven by the Lambda runtime.
//!
//! Each invocation carries one http request. Cross-origin requests are
//! answered here (there is no cors layer in front of the function), so every
//! response carries the configured `Access-Control-Allow-Origin`.

use anyhow::anyhow;
use folio_api_rest::models::contact::{
    invalid_request_format, parse_submission, send_message_response,
};
use folio_core_contact_contracts::ContactService;
use lambda_http::{
    http::{header, HeaderValue, Method, StatusCode},
    run, service_fn, Body, Error, Request, Response,
};
use serde::Serialize;
use tracing::{debug, error, info};

pub const ALLOWED_HEADERS: &str = "Content-Type";
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";
/// Seconds a browser may cache the pre-flight response
pub const PREFLIGHT_MAX_AGE: &str = "86400";

#[derive(Debug, Clone)]
pub struct ContactFunction<Contact> {
    contact: Contact,
    config: ContactFunctionConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFunctionConfig {
    pub allowed_origin: HeaderValue,
}

#[derive(Serialize)]
struct MethodNotAllowed {
    error: &'static str,
}

impl<Contact> ContactFunction<Contact>
where
    Contact: ContactService,
{
    pub fn new(contact: Contact, config: ContactFunctionConfig) -> Self {
        Self { contact, config }
    }

    /// Process invocations until the runtime shuts the function down.
    pub async fn run(self) -> anyhow::Result<()> {
        info!("Waiting for function invocations");
        let function = &self;
        run(service_fn(move |request| async move {
            Ok::<_, Error>(function.handle(request).await)
        }))
        .await
        .map_err(|err| anyhow!(err))
    }

    pub async fn handle(&self, request: Request) -> Response<Body> {
        let mut response = match *request.method() {
            Method::OPTIONS => preflight(),
            Method::POST => self.send_message(request.body()).await,
            ref method => {
                debug!(%method, "rejecting request with unsupported method");
                json_response(
                    StatusCode::METHOD_NOT_ALLOWED,
                    &MethodNotAllowed {
                        error: "Method not allowed",
                    },
                )
            }
        };

        response.headers_mut().insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.config.allowed_origin.clone(),
        );

        response
    }

    async fn send_message(&self, body: &Body) -> Response<Body> {
        let (status, body) = match parse_submission(body.as_ref()) {
            Ok(submission) => send_message_response(self.contact.send_message(submission).await),
            Err(err) => {
                debug!("rejecting malformed contact request body: {err}");
                invalid_request_format()
            }
        };

        let mut response = json_response(status, &body);
        if status.is_success() {
            let headers = response.headers_mut();
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOWED_HEADERS),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHODS),
            );
        }
        response
    }
}

fn preflight() -> Response<Body> {
    let mut response = Response::new(Body::Empty);
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE),
    );
    response
}

fn json_response(status: StatusCode, body: &impl Serialize) -> Response<Body> {
    let (status, body) = match serde_json::to_string(body) {
        Ok(body) => (status, Body::Text(body)),
        Err(err) => {
            error!("Failed to serialize response body: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, Body::Empty)
        }
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
