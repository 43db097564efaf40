use std::fmt;

/// Caller role as asserted by the upstream gateway.
///
/// Anything other than the three restricted roles sees the whole tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Maker,
    Approver,
    Admin,
    Unrestricted,
}

impl Role {
    /// Case-insensitive parse; unknown roles are unrestricted.
    pub fn from_header(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "maker" => Role::Maker,
            "approver" => Role::Approver,
            "admin" => Role::Admin,
            _ => Role::Unrestricted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Maker => "Maker",
            Role::Approver => "Approver",
            Role::Admin => "Admin",
            Role::Unrestricted => "Unrestricted",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
