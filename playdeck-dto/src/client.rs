#[cfg(feature = "client")]
use crate::diagnostics::{Diagnostics, ErrorKind};
#[cfg(feature = "client")]
use crate::envelope::MalformedResponse;
#[cfg(feature = "client")]
use std::sync::Arc;
#[cfg(feature = "client")]
use std::time::Duration;

#[cfg(feature = "client")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("invalid token")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
    #[error("could not build request: {0}")]
    Request(#[source] reqwest::Error),
    #[error("request timed out")]
    Timeout(#[source] reqwest::Error),
    #[error("network unreachable: {0}")]
    NetworkUnreachable(#[source] reqwest::Error),
    /// The raw body is kept; the message shows only its readable part.
    #[error("server error: {0}: {message}", message = crate::JsonError::message_of(.1))]
    ServerError(reqwest::StatusCode, String),
    #[error("client error: {0}: {message}", message = crate::JsonError::message_of(.1))]
    ClientError(reqwest::StatusCode, String),
    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponse),
}

#[cfg(feature = "client")]
impl Error {
    /// Classify a failure that happened before a status was received.
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Error::Timeout(error)
        } else if error.is_builder() {
            Error::Request(error)
        } else {
            Error::NetworkUnreachable(error)
        }
    }

    fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        if status.is_server_error() {
            Error::ServerError(status, body)
        } else {
            Error::ClientError(status, body)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl(_) | Error::InvalidToken(_) | Error::Request(_) => {
                ErrorKind::InvalidRequest
            }
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::NetworkUnreachable(_) => ErrorKind::NetworkUnreachable,
            Error::ServerError(..) => ErrorKind::ServerError,
            Error::ClientError(..) => ErrorKind::ClientError,
            Error::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }

    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Error::ServerError(status, _) | Error::ClientError(status, _) => Some(*status),
            _ => None,
        }
    }

    /// Whether the server said the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(reqwest::StatusCode::NOT_FOUND)
    }
}

/// The API host used when none is configured. Can be set at build time with
/// the `PLAYDECK_API_URL` environment variable.
pub const DEFAULT_SERVER_URL: &str = match option_env!("PLAYDECK_API_URL") {
    Some(url) => url,
    None => "http://127.0.0.1:8000/api/",
};

#[cfg(feature = "client")]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Make sure relative endpoint paths are joined below the base path, not
/// next to it.
pub fn normalize_base(mut url: url::Url) -> url::Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(feature = "client")]
#[derive(Default, Debug, Clone)]
pub struct ClientConfig<'a> {
    pub url_base: Option<url::Url>,
    pub token: Option<&'a str>,
    pub timeout: Option<Duration>,
    pub diagnostics: Option<Arc<dyn Diagnostics>>,
}

#[cfg(feature = "client")]
impl<'a> ClientConfig<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_url(mut self, url: impl AsRef<str>) -> Result<Self, Error> {
        self.url_base = Some(url::Url::parse(url.as_ref())?);
        Ok(self)
    }

    pub fn with_token(mut self, token: &'a str) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_optional_token(mut self, token: Option<&'a str>) -> Self {
        self.token = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }
}

macro_rules! declare_client_impl {
    ($async_or_url: ident) => {
        declare_client! {
            $async_or_url;

            get games_list(
                ("games"),
                @query query: &crate::games::GameListQuery,
            ) -> Vec<crate::games::Game>;
            get games_get(
                ("games/{id}", id: &crate::types::ResourceId),
            ) -> crate::games::Game;
            post games_create(
                ("games"),
                @body body: &crate::games::GameCreateRequest<'_>,
            ) -> crate::games::Game;
            put games_update(
                ("games/{id}", id: &crate::types::ResourceId),
                @body body: &crate::games::GameUpdateRequest<'_>,
            ) -> crate::games::Game;
            delete games_delete(
                ("games/{id}", id: &crate::types::ResourceId),
            ) -> crate::Ok;

            get consoles_list(
                ("consoles"),
                @query query: &crate::consoles::ConsoleListQuery,
            ) -> Vec<crate::consoles::Console>;
            get consoles_get(
                ("consoles/{id}", id: &crate::types::ResourceId),
            ) -> crate::consoles::Console;
            post consoles_create(
                ("consoles"),
                @body body: &crate::consoles::ConsoleCreateRequest<'_>,
            ) -> crate::consoles::Console;
            put consoles_update(
                ("consoles/{id}", id: &crate::types::ResourceId),
                @body body: &crate::consoles::ConsoleUpdateRequest<'_>,
            ) -> crate::consoles::Console;
            delete consoles_delete(
                ("consoles/{id}", id: &crate::types::ResourceId),
            ) -> crate::Ok;

            get events_list(
                ("events"),
                @query query: &crate::events::EventListQuery,
            ) -> Vec<crate::events::Event>;
            get events_get(
                ("events/{id}", id: &crate::types::ResourceId),
            ) -> crate::events::Event;
            post events_create(
                ("events"),
                @body body: &crate::events::EventCreateRequest<'_>,
            ) -> crate::events::Event;
            put events_update(
                ("events/{id}", id: &crate::types::ResourceId),
                @body body: &crate::events::EventUpdateRequest<'_>,
            ) -> crate::events::Event;
            delete events_delete(
                ("events/{id}", id: &crate::types::ResourceId),
            ) -> crate::Ok;

            get bookings_list(
                ("bookings"),
                @query query: &crate::bookings::BookingListQuery,
            ) -> Vec<crate::bookings::Booking>;
            get bookings_get(
                ("bookings/{id}", id: &crate::types::ResourceId),
            ) -> crate::bookings::Booking;
            post bookings_create(
                ("bookings"),
                @body body: &crate::bookings::BookingCreateRequest<'_>,
            ) -> crate::bookings::Booking;
            put bookings_update(
                ("bookings/{id}", id: &crate::types::ResourceId),
                @body body: &crate::bookings::BookingUpdateRequest,
            ) -> crate::bookings::Booking;
            delete bookings_delete(
                ("bookings/{id}", id: &crate::types::ResourceId),
            ) -> crate::Ok;
            get bookings_check_availability(
                ("bookings/check-availability"),
                @query query: &crate::bookings::AvailabilityQuery,
            ) -> crate::bookings::AvailabilityResult;

            get dashboard_stats(
                ("dashboard/stats"),
            ) -> crate::dashboard::DashboardStats;

            post auth_register(
                ("register"),
                @body body: &crate::auth::RegisterRequest<'_>,
            ) -> crate::auth::AuthResponse;
            post auth_login(
                ("login"),
                @body body: &crate::auth::LoginRequest<'_>,
            ) -> crate::auth::AuthResponse;
            post auth_logout(
                ("logout"),
            ) -> crate::Ok;
            get auth_me(
                ("me"),
            ) -> crate::user::User;
        }
    };
}

macro_rules! declare_client {
    (
        url;

        $(
            $(#[$fattr:meta])*
            $method: ident $fname: ident(
                (
                    $url: literal $(,)?
                    $( $path_name: ident: $path_type: ty ),*
                    $(,)?
                ),
                $(@query $query_name: ident: $query_type: ty, )*
                $(@body $body_name: ident: $body_type: ty, )*
            ) -> $rtype: ty;
        )*
    ) => {
        $(
            $(#[$fattr])*
            pub fn $fname(url: &Url, $( $path_name: $path_type, )*) -> Result<Url, ParseError> {
                url.join(&format!($url))
            }
        )*
    };

    (
        async;

        $(
            $(#[$fattr:meta])*
            $method: ident $fname: ident(
                (
                    $url: literal $(,)?
                    $( $path_name: ident: $path_type: ty ),*
                    $(,)?
                ),
                $(@query $query_name: ident: $query_type: ty, )*
                $(@body $body_name: ident: $body_type: ty, )*
            ) -> $rtype: ty;
        )*
    ) => {
        $(
            $(#[$fattr])*
            pub async fn $fname(
                &self,
                $( $path_name: $path_type, )*
                $( $query_name: $query_type, )*
                $( $body_name: $body_type, )*
            ) -> Result<$rtype, super::Error> {
                let url = crate::client::routes:: $fname ( &self.base, $( $path_name, )* )?;
                let request = self.http
                    . $method (url.clone())
                    $(.query( $query_name ))*
                    $(.json( $body_name ))*
                ;

                self.execute(&url, request).await
            }
        )*
    };
}

/// URL builders for every endpoint, relative to an API base URL.
pub mod routes {
    use url::{ParseError, Url};

    declare_client_impl!(url);
}

#[cfg(feature = "client")]
mod http {
    use super::{normalize_base, ClientConfig, Error, DEFAULT_SERVER_URL, DEFAULT_TIMEOUT};
    use crate::diagnostics::{default_diagnostics, Diagnostic, Diagnostics};
    use crate::envelope::Payload;
    use reqwest::{header, RequestBuilder, Url};
    use std::sync::Arc;

    /// Access to every resource collection of the API.
    ///
    /// The bearer token, if any, is fixed when the client is built. Every call
    /// is bounded by the configured timeout and reports its failures to the
    /// configured [`Diagnostics`] before returning them.
    #[derive(Debug, Clone)]
    pub struct Client {
        base: Url,
        http: reqwest::Client,
        authenticated: bool,
        diagnostics: Arc<dyn Diagnostics>,
    }

    impl Client {
        fn http_client(
            auth_token: Option<&str>,
            timeout: std::time::Duration,
        ) -> Result<reqwest::Client, Error> {
            let mut headers = header::HeaderMap::new();
            if let Some(token) = auth_token {
                let mut auth_value = header::HeaderValue::from_str(&format!("Bearer {}", token))?;
                auth_value.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, auth_value);
            }

            reqwest::Client::builder()
                .default_headers(headers)
                .cookie_store(true)
                .timeout(timeout)
                .build()
                .map_err(Error::Request)
        }

        pub fn new(
            ClientConfig {
                url_base,
                token,
                timeout,
                diagnostics,
            }: ClientConfig,
        ) -> Result<Self, Error> {
            let base = match url_base {
                Some(url) => url,
                None => Url::parse(DEFAULT_SERVER_URL)?,
            };

            Ok(Self {
                base: normalize_base(base),
                http: Self::http_client(token, timeout.unwrap_or(DEFAULT_TIMEOUT))?,
                authenticated: token.is_some(),
                diagnostics: diagnostics.unwrap_or_else(default_diagnostics),
            })
        }

        pub fn base_url(&self) -> &Url {
            &self.base
        }

        pub fn is_authenticated(&self) -> bool {
            self.authenticated
        }

        async fn send<T: Payload>(request: RequestBuilder) -> Result<T, Error> {
            let response = request.send().await.map_err(Error::from_transport)?;
            let status = response.status();
            let body = response.bytes().await.map_err(Error::from_transport)?;

            if status.is_success() {
                Ok(T::from_body(&body)?)
            } else {
                Err(Error::from_status(
                    status,
                    String::from_utf8_lossy(&body).into_owned(),
                ))
            }
        }

        async fn execute<T: Payload>(&self, url: &Url, request: RequestBuilder) -> Result<T, Error> {
            let result = Self::send(request).await;

            if let Err(error) = &result {
                self.diagnostics.emit(Diagnostic::RequestFailed {
                    kind: error.kind(),
                    endpoint: url.to_string(),
                    status: error.status().map(|s| s.as_u16()),
                });
            }
            result
        }

        declare_client_impl!(async);
    }
}

#[cfg(feature = "client")]
pub use http::Client;
