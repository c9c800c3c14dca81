//! Error type for a single fetch attempt

/// Why one HTTP attempt did not produce a JSON payload.
///
/// Never crosses into the job driver: the transport logs it, retries, and
/// finally reports an absent result.
#[derive(Debug)]
pub enum FetchError {
    /// Server answered with a status other than 200
    Status(u16),
    /// Connect, timeout or body read failure (message has the URL stripped)
    Transport(String),
    /// 200 response whose body is not JSON
    Json(serde_json::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status(s) => write!(f, "Non-200 status {s}"),
            Self::Transport(msg) => write!(f, "HTTP error: {msg}"),
            Self::Json(e) => write!(f, "Invalid JSON body: {e}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl FetchError {
    /// Create a transport error from reqwest, dropping the URL so the API
    /// key in the query string never reaches the logs.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        let e = e.without_url();
        if e.is_timeout() {
            Self::Transport(format!("timed out: {e}"))
        } else {
            Self::Transport(e.to_string())
        }
    }

    /// Server-side rejection (logged as a warning) rather than an exception
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status(_))
    }
}
