//! Authentication for requests to the blob store.

use reqwest::RequestBuilder;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How outgoing requests authenticate.
///
/// Parsed from `none`, `userpass:<user>:<password>` or `token:<token>`.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    None,
    UserPass { username: String, password: String },
    Token(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed auth value {0:?}, expected none, userpass:<user>:<password> or token:<token>")]
    Malformed(String),
}

impl AuthMode {
    /// Attach the auth header, if any, to a request.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            AuthMode::None => request,
            AuthMode::UserPass { username, password } => {
                request.basic_auth(username, Some(password))
            }
            AuthMode::Token(token) => request.bearer_auth(token),
        }
    }
}

impl FromStr for AuthMode {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || AuthError::Malformed(redact(s));
        match s.split_once(':') {
            None if s.is_empty() || s == "none" => Ok(AuthMode::None),
            Some(("userpass", rest)) => {
                let (username, password) = rest.split_once(':').ok_or_else(malformed)?;
                if username.is_empty() {
                    return Err(malformed());
                }
                Ok(AuthMode::UserPass {
                    username: username.to_string(),
                    password: password.to_string(),
                })
            }
            Some(("token", token)) if !token.is_empty() => Ok(AuthMode::Token(token.to_string())),
            _ => Err(malformed()),
        }
    }
}

// Never echo secrets back into logs.
fn redact(s: &str) -> String {
    match s.split_once(':') {
        Some((scheme, _)) => format!("{}:***", scheme),
        None => s.to_string(),
    }
}

impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::None => write!(f, "None"),
            AuthMode::UserPass { username, .. } => {
                write!(f, "UserPass {{ username: {:?}, password: *** }}", username)
            }
            AuthMode::Token(_) => write!(f, "Token(***)"),
        }
    }
}
