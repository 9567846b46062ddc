use std::rc::Rc;

pub use gloo_net::http::Method;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use yew::Callback;

use crate::config::ServiceUrls;
use crate::guard::full_navigation;
use crate::session::{Role, Session, SessionError};
use crate::transport::GlooTransport;

/* -------------------------------------------------------------------------- */
/*                               vocabulaire HTTP                             */
/* -------------------------------------------------------------------------- */

/// The three remote origins the console talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Service {
    /// Accounts, login, profile.
    Identity,
    /// Reservations and bills.
    Billing,
    /// Car inventory.
    Inventory,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    #[error("no {0} session, please sign in")]
    MissingToken(Role),
    #[error("network error: {0}")]
    Network(String),
    #[error("{message}")]
    Unauthorized { status: u16, message: String },
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("could not encode request: {0}")]
    Encode(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// True when the session was rejected or missing; the interceptor already
    /// redirected in that case.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. } | ApiError::MissingToken(_))
    }
}

/// One round trip. Implementations perform exactly one network call.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/* -------------------------------------------------------------------------- */
/*                                  client                                    */
/* -------------------------------------------------------------------------- */

/// HTTP client bound to one role's session.
///
/// Every call that carries a token goes through [`ApiClient::request`], which
/// is also the single place where a 401/403 closes the session and sends the
/// browser back to the login page of that role.
pub struct ApiClient<T = GlooTransport> {
    transport: Rc<T>,
    urls: Rc<ServiceUrls>,
    session: Session,
    role: Role,
    on_unauthorized: Callback<Role>,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            urls: Rc::clone(&self.urls),
            session: self.session.clone(),
            role: self.role,
            on_unauthorized: self.on_unauthorized.clone(),
        }
    }
}

impl ApiClient<GlooTransport> {
    pub fn browser(session: Session, role: Role) -> Self {
        Self::new(
            Rc::new(GlooTransport),
            Rc::new(ServiceUrls::from_env()),
            session,
            role,
            Callback::from(|role: Role| full_navigation(role.login_route())),
        )
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(
        transport: Rc<T>,
        urls: Rc<ServiceUrls>,
        session: Session,
        role: Role,
        on_unauthorized: Callback<Role>,
    ) -> Self {
        Self { transport, urls, session, role, on_unauthorized }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Raw call: `token`, when given, goes out as `Authorization: Bearer …`.
    pub async fn request(
        &self,
        method: Method,
        service: Service,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.urls.base(service), path);

        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        let body = match body {
            Some(json) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(serde_json::to_string(json).map_err(|e| ApiError::Encode(e.to_string()))?)
            }
            None => None,
        };

        debug!("{method:?} {url}");
        let response = self
            .transport
            .send(HttpRequest { method, url, headers, body })
            .await?;

        match interpret(response) {
            Err(err @ ApiError::Unauthorized { .. }) if token.is_some() => {
                self.expire();
                Err(err)
            }
            other => other,
        }
    }

    /// Same as [`request`](Self::request) with the current token of the bound
    /// role. Without a token nothing is sent and the browser is redirected.
    pub async fn authed(
        &self,
        method: Method,
        service: Service,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let Some(token) = self.session.current_token(self.role) else {
            self.expire();
            return Err(ApiError::MissingToken(self.role));
        };
        self.request(method, service, path, body, Some(&token)).await
    }

    pub async fn fetch_json<U: DeserializeOwned>(&self, service: Service, path: &str) -> Result<U, ApiError> {
        let value = self.authed(Method::GET, service, path, None).await?;
        decode(value)
    }

    pub async fn send_json<U: DeserializeOwned>(
        &self,
        method: Method,
        service: Service,
        path: &str,
        body: &Value,
    ) -> Result<U, ApiError> {
        let value = self.authed(method, service, path, Some(body)).await?;
        decode(value)
    }

    /// DELETE whose answer (often empty) is ignored.
    pub async fn fetch_empty(&self, service: Service, path: &str) -> Result<(), ApiError> {
        self.authed(Method::DELETE, service, path, None).await.map(|_| ())
    }

    fn expire(&self) {
        warn!("{} session rejected, back to {}", self.role, self.role.login_route());
        self.session.logout(self.role);
        self.on_unauthorized.emit(self.role);
    }
}

/* -------------------------------------------------------------------------- */
/*                              helpers réponse                               */
/* -------------------------------------------------------------------------- */

pub fn decode<U: DeserializeOwned>(value: Value) -> Result<U, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// 2xx → JSON body (or `null` when empty); anything else → `ApiError` carrying
/// the server's `message` when it sent one.
fn interpret(response: HttpResponse) -> Result<Value, ApiError> {
    if (200..300).contains(&response.status) {
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return match serde_json::from_str(&response.body) {
            Ok(json) => Ok(json),
            Err(_) => Ok(Value::String(response.body)),
        };
    }

    let message = error_message(&response);
    match response.status {
        401 | 403 => Err(ApiError::Unauthorized { status: response.status, message }),
        status => Err(ApiError::Status { status, message }),
    }
}

fn error_message(response: &HttpResponse) -> String {
    let from_body = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|json| {
            ["message", "error"]
                .iter()
                .find_map(|key| json.get(key).and_then(Value::as_str).map(str::to_string))
        });

    match from_body {
        Some(message) => message,
        None if !response.status_text.is_empty() => response.status_text.clone(),
        None => format!("request failed with status {}", response.status),
    }
}

/* -------------------------------------------------------------------------- */
/*                              transport simulé                              */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use serde_json::Value;
    use yew::Callback;

    use super::*;

    /// Replays queued answers and records every request it sees.
    #[derive(Default)]
    pub struct MockTransport {
        calls: RefCell<Vec<HttpRequest>>,
        replies: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
    }

    impl MockTransport {
        pub fn reply(&self, status: u16, body: Value) -> &Self {
            let body = if body.is_null() { String::new() } else { body.to_string() };
            self.replies.borrow_mut().push_back(Ok(HttpResponse {
                status,
                status_text: String::new(),
                body,
            }));
            self
        }

        pub fn fail(&self, error: ApiError) -> &Self {
            self.replies.borrow_mut().push_back(Err(error));
            self
        }

        pub fn calls(&self) -> Vec<HttpRequest> {
            self.calls.borrow().clone()
        }
    }

    impl Transport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.calls.borrow_mut().push(request);
            self.replies.borrow_mut().pop_front().unwrap_or_else(|| {
                Ok(HttpResponse { status: 200, status_text: "OK".into(), body: String::new() })
            })
        }
    }

    pub struct Harness {
        pub client: ApiClient<MockTransport>,
        pub transport: Rc<MockTransport>,
        pub redirects: Rc<RefCell<Vec<Role>>>,
    }

    pub fn harness(session: &Session, role: Role) -> Harness {
        let transport = Rc::new(MockTransport::default());
        let redirects = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&redirects);
        let client = ApiClient::new(
            Rc::clone(&transport),
            Rc::new(ServiceUrls::new("https://identity.test/api", "https://billing.test/api", "https://inventory.test")),
            session.clone(),
            role,
            Callback::from(move |role: Role| sink.borrow_mut().push(role)),
        );
        Harness { client, transport, redirects }
    }
}
