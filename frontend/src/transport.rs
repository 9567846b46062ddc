use gloo_net::http::{Method, Request, RequestBuilder};

use crate::api::{ApiError, HttpRequest, HttpResponse, Transport};

/// `fetch` through gloo-net. No retry, no timeout beyond the browser's.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = match request.method {
            Method::GET => Request::get(&request.url),
            Method::POST => Request::post(&request.url),
            Method::PUT => Request::put(&request.url),
            Method::DELETE => Request::delete(&request.url),
            other => RequestBuilder::new(&request.url).method(other),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let sent = match request.body {
            Some(body) => builder
                .body(body)
                .map_err(|e| ApiError::Encode(e.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        };
        let resp = sent.map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        let status_text = resp.status_text();
        // corps illisible = corps vide
        let body = resp.text().await.unwrap_or_default();

        Ok(HttpResponse { status, status_text, body })
    }
}
