//! Structured reporting of failures.
//!
//! The client and the detail resolver never print. They hand a [`Diagnostic`]
//! to whatever [`Diagnostics`] implementation they were built with.
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use strum::{Display, IntoStaticStr};

/// What went wrong, without the details.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The request did not complete within the configured timeout.
    Timeout,
    /// No response was received at all.
    NetworkUnreachable,
    /// The server answered with a 5xx status.
    ServerError,
    /// The server answered with any other non-success status.
    ClientError,
    /// The body could not be decoded into the expected payload.
    MalformedResponse,
    /// Nothing in the collection matched the requested slug.
    NotFound,
    /// The request could not be built (bad URL, bad token, ...).
    InvalidRequest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    RequestFailed {
        kind: ErrorKind,
        endpoint: String,
        status: Option<u16>,
    },
    ResolveFailed {
        slug: String,
        kind: ErrorKind,
    },
}

impl Diagnostic {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Diagnostic::RequestFailed { kind, .. } => *kind,
            Diagnostic::ResolveFailed { kind, .. } => *kind,
        }
    }
}

pub trait Diagnostics: Debug + Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to `tracing` as a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::RequestFailed {
                kind,
                endpoint,
                status,
            } => {
                let kind: &'static str = kind.into();
                tracing::warn!(kind, %endpoint, ?status, "request failed");
            }
            Diagnostic::ResolveFailed { slug, kind } => {
                let kind: &'static str = kind.into();
                tracing::warn!(kind, %slug, "could not resolve detail");
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// Keeps every diagnostic in memory. Cloning shares the same buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordedDiagnostics(Arc<Mutex<Vec<Diagnostic>>>);

impl RecordedDiagnostics {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        match self.0.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.entries().iter().map(Diagnostic::kind).collect()
    }
}

impl Diagnostics for RecordedDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        match self.0.lock() {
            Ok(mut entries) => entries.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}

pub fn default_diagnostics() -> Arc<dyn Diagnostics> {
    Arc::new(TracingDiagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_diagnostics_share_their_buffer() {
        let recorded = RecordedDiagnostics::new();
        let sink: Arc<dyn Diagnostics> = Arc::new(recorded.clone());

        sink.emit(Diagnostic::RequestFailed {
            kind: ErrorKind::ServerError,
            endpoint: "http://localhost/games".to_string(),
            status: Some(503),
        });
        sink.emit(Diagnostic::ResolveFailed {
            slug: "halo".to_string(),
            kind: ErrorKind::NotFound,
        });

        assert_eq!(
            recorded.kinds(),
            vec![ErrorKind::ServerError, ErrorKind::NotFound]
        );
    }

    #[test]
    fn kinds_render_as_snake_case() {
        assert_eq!(ErrorKind::NetworkUnreachable.to_string(), "network_unreachable");
        let kind: &'static str = ErrorKind::MalformedResponse.into();
        assert_eq!(kind, "malformed_response");
    }
}
