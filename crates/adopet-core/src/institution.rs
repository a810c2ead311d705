//! Partner institution kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// The kind of a partner institution registered on the platform.
///
/// The upstream institution directory reports the kind as an
/// upper-case string (`"REFUGIO"`, `"VETERINARIA"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstitutionKind {
    /// Animal shelter.
    Refugio,
    /// Veterinary clinic.
    Veterinaria,
}

impl InstitutionKind {
    /// Parses an upstream kind string.
    ///
    /// Returns `None` for kinds this build does not know about; callers
    /// treat that the same way as a failed lookup.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "REFUGIO" => Some(Self::Refugio),
            "VETERINARIA" => Some(Self::Veterinaria),
            _ => None,
        }
    }

    /// Returns the upstream string for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Refugio => "REFUGIO",
            Self::Veterinaria => "VETERINARIA",
        }
    }

    /// Returns the refined operator role for an administrator of an
    /// institution of this kind.
    #[must_use]
    pub fn operator_role(&self) -> Role {
        match self {
            Self::Refugio => Role::Refugio,
            Self::Veterinaria => Role::Veterinaria,
        }
    }
}

impl fmt::Display for InstitutionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_kinds() {
        assert_eq!(
            InstitutionKind::parse("REFUGIO"),
            Some(InstitutionKind::Refugio)
        );
        assert_eq!(
            InstitutionKind::parse("VETERINARIA"),
            Some(InstitutionKind::Veterinaria)
        );
    }

    #[test]
    fn test_parse_unknown_kind() {
        assert_eq!(InstitutionKind::parse("GUARDERIA"), None);
        assert_eq!(InstitutionKind::parse("refugio"), None);
    }

    #[test]
    fn test_operator_role_mapping() {
        assert_eq!(InstitutionKind::Refugio.operator_role(), Role::Refugio);
        assert_eq!(
            InstitutionKind::Veterinaria.operator_role(),
            Role::Veterinaria
        );
    }

    #[test]
    fn test_serde_rename() {
        let json = serde_json::to_string(&InstitutionKind::Refugio).unwrap();
        assert_eq!(json, "\"REFUGIO\"");

        let kind: InstitutionKind = serde_json::from_str("\"VETERINARIA\"").unwrap();
        assert_eq!(kind, InstitutionKind::Veterinaria);
    }
}
