use serde::{Deserialize, Serialize};

/// The authenticated account, as returned by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn active_by_default() -> bool {
    true
}

impl User {
    /// Full name when the account has one, otherwise the email address.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

/// Bearer token issued by `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "bearer")]
    pub token_type: String,
}

fn bearer() -> String {
    "bearer".to_string()
}
