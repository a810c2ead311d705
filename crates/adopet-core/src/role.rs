//! User roles.
//!
//! Roles travel on the wire as `ROLE_*` strings inside bearer token
//! claims. The closed variants cover the platform's known roles; any
//! other string is preserved verbatim in [`Role::Other`] so that an
//! unknown upstream value round-trips instead of being destroyed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A user's role on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Regular adopter account.
    Tutor,

    /// Generic administrator of a partner institution.
    ///
    /// This is the unrefined role carried in tokens; the identity layer
    /// refines it into [`Role::Refugio`] or [`Role::Veterinaria`] when
    /// the institution kind is known.
    Administrador,

    /// Operator of an animal shelter.
    Refugio,

    /// Operator of a veterinary clinic.
    Veterinaria,

    /// A role string this build does not know about.
    Other(String),
}

impl Role {
    /// Parses a wire-format role string.
    ///
    /// Never fails: unknown values become [`Role::Other`].
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value {
            "ROLE_TUTOR" => Self::Tutor,
            "ROLE_ADMINISTRADOR" => Self::Administrador,
            "ROLE_REFUGIO" => Self::Refugio,
            "ROLE_VETERINARIA" => Self::Veterinaria,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the wire-format role string.
    #[must_use]
    pub fn as_wire(&self) -> &str {
        match self {
            Self::Tutor => "ROLE_TUTOR",
            Self::Administrador => "ROLE_ADMINISTRADOR",
            Self::Refugio => "ROLE_REFUGIO",
            Self::Veterinaria => "ROLE_VETERINARIA",
            Self::Other(value) => value,
        }
    }

    /// Returns `true` for the generic, unrefined administrator role.
    #[must_use]
    pub fn is_administrador(&self) -> bool {
        matches!(self, Self::Administrador)
    }

    /// Returns `true` for any institution-operator role, refined or not.
    #[must_use]
    pub fn is_institutional(&self) -> bool {
        matches!(self, Self::Administrador | Self::Refugio | Self::Veterinaria)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::from_wire(&value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_wire().to_string()
    }
}
