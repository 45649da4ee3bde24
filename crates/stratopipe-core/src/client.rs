//! HTTP client bound to the StratoPipe API base URL.
//!
//! Every outgoing request passes through the same interception steps:
//! the session token is attached as `Authorization`, and unsafe methods
//! (POST, PUT, PATCH, DELETE) echo the CSRF cookie in `X-CSRFToken`.
//! A 401 response notifies the [`UnauthorizedHandler`] with the login URL
//! and is still returned to the caller as [`ApiError::Unauthorized`].

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::{AuthScheme, ClientConfig};
use crate::constants::{paths, CSRF_HEADER};
use crate::credentials::{CredentialProvider, MemoryCredentials};
use crate::error::ApiError;

/// Receives the login URL whenever the server rejects a session
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self, login_url: &Url);
}

impl<F> UnauthorizedHandler for F
where
    F: Fn(&Url) + Send + Sync,
{
    fn on_unauthorized(&self, login_url: &Url) {
        self(login_url)
    }
}

pub struct ApiClientBuilder {
    config: ClientConfig,
    credentials: Option<Arc<dyn CredentialProvider>>,
    on_unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

impl ApiClientBuilder {
    pub fn credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn on_unauthorized(mut self, handler: impl UnauthorizedHandler + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let base_url = self.config.resolve_base_url()?;
        let login_url = self.config.login_url(&base_url)?;
        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::new(MemoryCredentials::new()));

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let builder = reqwest::Client::builder().default_headers(headers);
        let builder = match credentials.cookie_jar() {
            Some(jar) => builder.cookie_provider(jar),
            None => builder.cookie_store(true),
        };

        debug!(base_url = %base_url, "api client configured");

        Ok(ApiClient {
            http: builder.build()?,
            base_url,
            login_url,
            auth_scheme: self.config.auth_scheme,
            prime_csrf: self.config.prime_csrf,
            credentials,
            on_unauthorized: self.on_unauthorized,
        })
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    login_url: Url,
    auth_scheme: AuthScheme,
    prime_csrf: bool,
    credentials: Arc<dyn CredentialProvider>,
    on_unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

impl ApiClient {
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            credentials: None,
            on_unauthorized: None,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn login_url(&self) -> &Url {
        &self.login_url
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    /// Resolve a relative resource path against the base URL
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path).await?;
        decode(self.dispatch(request).await?).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, path).await?.query(query);
        decode(self.dispatch(request).await?).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::POST, path, body).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PUT, path, body).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(Method::PATCH, path, body).await
    }

    /// DELETE; the response body is discarded
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, path).await?;
        self.dispatch(request).await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let request = self.request(Method::POST, path).await?.multipart(form);
        decode(self.dispatch(request).await?).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, path).await?.json(body);
        decode(self.dispatch(request).await?).await
    }

    /// Request interception: credentials first, then CSRF for unsafe methods
    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path)?;
        debug!(%method, %url, "dispatching request");

        let unsafe_method = is_unsafe(&method);
        let mut request = self.http.request(method, url);

        if let Some(token) = self.credentials.token()? {
            request = request.header(AUTHORIZATION, self.auth_scheme.header_value(&token));
        }

        if unsafe_method {
            if self.prime_csrf {
                self.ensure_csrf_cookie().await;
            }
            if let Some(csrf) = self.credentials.csrf_token()? {
                request = request.header(CSRF_HEADER, csrf);
            }
        }

        Ok(request)
    }

    /// Response interception: 401 notifies the handler, then fails like any
    /// other error status
    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            warn!(login_url = %self.login_url, "request unauthorized, redirecting to login");
            if let Some(handler) = &self.on_unauthorized {
                handler.on_unauthorized(&self.login_url);
            }
            return Err(ApiError::Unauthorized { body });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }

    /// Best-effort safe GETs that let the server set the CSRF cookie
    async fn ensure_csrf_cookie(&self) {
        if matches!(self.credentials.csrf_token(), Ok(Some(_))) {
            return;
        }

        for path in [paths::CSRF, ""] {
            if let Ok(url) = self.url(path) {
                if let Err(e) = self.http.get(url).send().await {
                    debug!(error = %e, "csrf priming request failed");
                }
            }
            if matches!(self.credentials.csrf_token(), Ok(Some(_))) {
                return;
            }
        }
    }
}

fn is_unsafe(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Decode a JSON body; an empty body decodes as `null`
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}
