use reqwest::StatusCode;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never completed: DNS, refused connection, timeout...
    #[error("Error -1: Couldn't connect: {0}")]
    Connection(#[from] reqwest::Error),
    /// The body is not JSON, misses a required field or has an unknown `opstat`.
    #[error("Error -2: {0}")]
    Json(String),
    /// myGengo answered with `opstat: "error"`.
    ///
    /// For a list of error codes, see: <http://mygengo.com/services/api/dev-docs/error-codes>
    #[error("Error {code}: {msg}")]
    Api { code: i64, msg: String },
    /// Non success status that was not retried, or still failing after the last retry.
    #[error("Error {}: request failed: {body}", .status.as_u16())]
    Http { status: StatusCode, body: String },
}

impl Error {
    pub const CONNECTION_CODE: i64 = -1;
    pub const JSON_CODE: i64 = -2;

    pub fn code(&self) -> i64 {
        match self {
            Error::Connection(_) => Self::CONNECTION_CODE,
            Error::Json(_) => Self::JSON_CODE,
            Error::Api { code, .. } => *code,
            Error::Http { status, .. } => i64::from(status.as_u16()),
        }
    }

    /// The message part, without the `Error <code>:` prefix.
    pub fn msg(&self) -> String {
        match self {
            Error::Connection(e) => format!("Couldn't connect: {e}"),
            Error::Json(msg) => msg.clone(),
            Error::Api { msg, .. } => msg.clone(),
            Error::Http { body, .. } => body.clone(),
        }
    }

    pub(crate) fn missing_field(field: &str) -> Self {
        Error::Json(format!("Bad JSON: {field:?} not in response"))
    }
}

impl From<mygengo_common::Error> for Error {
    fn from(e: mygengo_common::Error) -> Self {
        Error::Json(format!("Couldn't encode params: {e}"))
    }
}
