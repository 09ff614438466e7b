//! Login and the identity of the signed-in user.

use serde_json::Value;
use tracing::info;

use crate::api::{CommandError, Request};
use crate::dispatch::CommandRunner;
use crate::identity::IdentityRecord;

const LOGIN_URI: &str = "auth/login";

/// Who is signed in. Fixed for the lifetime of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_name: String,
    pub identity: IdentityRecord,
}

impl Session {
    pub fn new(user_name: impl Into<String>, identity: IdentityRecord) -> Self {
        Self {
            user_name: user_name.into(),
            identity,
        }
    }

    /// Build from the login payload: the identity fields plus `userName`.
    pub fn from_login_data(data: Value, username: &str) -> Result<Self, CommandError> {
        if !data.is_object() {
            return Err(CommandError::MalformedPayload(format!(
                "expected a user object, got {}",
                data
            )));
        }
        let user_name = data
            .get("userName")
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(username)
            .to_string();
        Ok(Self::new(user_name, IdentityRecord::from(data)))
    }
}

/// Authenticate against the server. Runs on the caller's task; the UI loop
/// has not started yet when this is called.
pub async fn login(
    runner: &CommandRunner,
    username: &str,
    password: &str,
) -> Result<Session, CommandError> {
    let request = Request::new(LOGIN_URI)
        .param("username", username)
        .param("password", password);

    let data = runner.execute(&request, runner.timeout()).await.into_payload()?;
    let session = Session::from_login_data(data, username)?;
    info!(user = %session.user_name, "Logged in");
    Ok(session)
}
