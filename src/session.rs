//! The signed-in user and the guard consumers use to state that they
//! need one.
//!
//! The session is plain data established by `POST /login` and passed
//! around explicitly. Operations that need authentication call
//! [SessionContext::require] and propagate the error instead of
//! assuming a signed-in user exists somewhere globally.

use serde::Deserialize;

use crate::error::Error;
use crate::record::wire::IdValue;

/// The user behind an authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// Server side user id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Sign-in email.
    pub email: String,
    /// Coarse role, `admin` or `user`.
    pub role: String,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The signed-in user.
    pub user: SessionUser,
}

/// Holds the current session, if any.
///
/// Cheap to clone and pass by value into views and operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    session: Option<Session>,
}

impl SessionContext {
    /// A context with nobody signed in.
    pub fn anonymous() -> SessionContext {
        SessionContext { session: None }
    }

    /// A context carrying an authenticated session.
    pub fn authenticated(session: Session) -> SessionContext {
        SessionContext {
            session: Some(session),
        }
    }

    /// The current session, when one exists.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The current session, or [Error::MissingSession] when nobody is
    /// signed in.
    pub fn require(&self) -> Result<&Session, Error> {
        self.session.as_ref().ok_or(Error::MissingSession)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct LoginResponseDto {
    #[serde(default)]
    pub user: Option<SessionUserDto>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SessionUserDto {
    #[serde(default, alias = "_id")]
    pub id: Option<IdValue>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl SessionUserDto {
    pub(crate) fn into_user(self) -> SessionUser {
        SessionUser {
            id: self
                .id
                .as_ref()
                .map(IdValue::to_id_string)
                .unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            role: self.role.unwrap_or_else(|| "user".to_string()),
        }
    }
}

#[cfg(test)]
mod session_context_tests {
    use super::{Session, SessionContext, SessionUser, SessionUserDto};
    use crate::error::Error;

    fn test_session() -> Session {
        Session {
            user: SessionUser {
                id: "1".to_string(),
                name: "Amina".to_string(),
                email: "amina@example.com".to_string(),
                role: "admin".to_string(),
            },
        }
    }

    #[test]
    fn require_rejects_anonymous_context() {
        let context = SessionContext::anonymous();

        assert_eq!(context.require(), Err(Error::MissingSession));
    }

    #[test]
    fn require_returns_authenticated_session() {
        let context = SessionContext::authenticated(test_session());

        let session = context.require().unwrap();

        assert_eq!(session.user.name, "Amina");
    }

    #[test]
    fn wire_user_defaults_role() {
        let dto: SessionUserDto = serde_json::from_value(serde_json::json!({
            "id": 5,
            "name": "Amina",
            "email": "amina@example.com",
        }))
        .unwrap();

        let user = dto.into_user();

        assert_eq!(user.id, "5");
        assert_eq!(user.role, "user");
    }
}
