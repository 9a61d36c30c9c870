//! Authenticated principal and its role.

use crate::EngineError;

/// Role attached to every user account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
    Admin,
    #[default]
    Staff,
}

impl Role {
    /// Returns the canonical role string stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            other => Err(EngineError::InvalidInput(format!("invalid role: {other}"))),
        }
    }
}

/// Identity decoded from a verified bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub role: Role,
}

impl Identity {
    pub fn new(id: impl Into<String>, username: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails with [`EngineError::Forbidden`] unless the identity is an admin.
    pub(crate) fn require_admin(&self, action: &str) -> Result<(), EngineError> {
        if !self.is_admin() {
            return Err(EngineError::Forbidden(format!("Only admin can {action}")));
        }
        Ok(())
    }
}
