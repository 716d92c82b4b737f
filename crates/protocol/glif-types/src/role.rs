//! Agent key roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;

/// A signing role with authority over an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyRole {
    /// Agent owner.
    Owner,
    /// Day-to-day operator.
    Operator,
    /// Signs credential requests.
    Request,
    /// Multisig proposer for a native owner.
    OwnerProposer,
    /// Multisig approver for a native owner.
    OwnerApprover,
}

impl KeyRole {
    /// Roles that must exist before any signing operation.
    pub const REQUIRED: [KeyRole; 3] = [KeyRole::Owner, KeyRole::Operator, KeyRole::Request];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Operator => "operator",
            Self::Request => "request",
            Self::OwnerProposer => "ownerproposer",
            Self::OwnerApprover => "ownerapprover",
        }
    }

    /// Environment variable holding this role's keystore passphrase.
    pub fn passphrase_env(&self) -> Option<&'static str> {
        match self {
            Self::Owner => Some("GLIF_OWNER_PASSPHRASE"),
            Self::Operator => Some("GLIF_OPERATOR_PASSPHRASE"),
            _ => None,
        }
    }

    /// Label shown at the interactive passphrase prompt.
    pub fn passphrase_prompt(&self) -> String {
        let mut label = self.as_str().to_string();
        if let Some(first) = label.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        format!("{} key passphrase", label)
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyRole {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "operator" => Ok(Self::Operator),
            "request" => Ok(Self::Request),
            "ownerproposer" => Ok(Self::OwnerProposer),
            "ownerapprover" => Ok(Self::OwnerApprover),
            _ => Err(TypesError::InvalidRole(s.to_string())),
        }
    }
}
