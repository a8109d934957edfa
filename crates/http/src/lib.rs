//! A transport that posts questions to the answering service over HTTP.

#[macro_use]
extern crate tracing;

mod body;
mod config;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use mime::Mime;
use qanouni_model::{
    ErrorKind, QuestionRequest, Transport, TransportError, TransportResponse,
};
use reqwest::{Client, header};

pub use body::HttpBody;
pub use config::{HttpConfig, HttpConfigBuilder};

/// Error type for [`HttpTransport`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    fn from_reqwest(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connect
        } else if err.is_body() || err.is_decode() {
            ErrorKind::Interrupted
        } else {
            ErrorKind::Other
        };
        Self::new(format!("{err}"), kind)
    }

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl TransportError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// HTTP transport for the answering service.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    config: Arc<HttpConfig>,
}

impl HttpTransport {
    /// Creates a new `HttpTransport` with the given configuration.
    pub fn new(config: HttpConfig) -> Result<Self, Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if config.no_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(|err| {
            Error::new(format!("cannot build client: {err}"), ErrorKind::Other)
        })?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }
}

impl Transport for HttpTransport {
    type Error = Error;
    type Body = HttpBody;

    fn send_question(
        &self,
        req: &QuestionRequest,
    ) -> impl Future<Output = Result<TransportResponse<Self::Body>, Self::Error>>
    + Send
    + 'static {
        debug!("posting a question to {}", self.config.endpoint);
        let resp_fut = self
            .client
            .post(&self.config.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .json(req)
            .send();

        async move {
            let resp = resp_fut.await.map_err(Error::from_reqwest)?;
            let status = resp.status();

            if status.is_success() {
                // The answer is expected to be raw text. Anything else is
                // still streamed, since the body is never interpreted.
                let content_type = resp
                    .headers()
                    .get(header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok());
                let is_text = content_type
                    .and_then(|v| v.parse().ok())
                    .map(|m: Mime| m.type_() == mime::TEXT)
                    .unwrap_or(false);
                if !is_text {
                    warn!("unexpected content type: {content_type:?}");
                }
            } else {
                debug!("service rejected the question with {status}");
            }

            Ok(TransportResponse {
                status: status.as_u16(),
                body: HttpBody::from_response(resp),
            })
        }
    }
}
