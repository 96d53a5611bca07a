use serde::{Deserialize, Serialize};

/// Type of JWT: access or refresh.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    #[serde(alias = "Access")]
    Access,
    #[serde(alias = "Refresh")]
    Refresh,
}

/// Who the caller is, as far as this service is concerned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub roles: Vec<String>,
    pub rider_id: Option<i32>,
    pub driver_id: Option<i32>,
}

/// JWT payload of service tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,             // email
    #[serde(default)]
    pub roles: Vec<String>,
    pub rider_id: Option<i32>,
    pub driver_id: Option<i32>,
    pub iat: usize,              // issued at (unix timestamp)
    pub exp: usize,              // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity {
            email: self.sub.clone(),
            roles: self.roles.clone(),
            rider_id: self.rider_id,
            driver_id: self.driver_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Claims read from the identity provider's ID token.
#[derive(Debug, Clone, Deserialize)]
pub struct IdTokenClaims {
    pub sub: String,
    pub email: Option<String>,
    pub roles: Option<OneOrMany>,
    pub role: Option<String>,
}

impl IdTokenClaims {
    /// `email`, falling back to `sub` for providers that use the address as subject.
    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.sub)
    }

    /// `roles` wins over a single `role`; missing both means no roles.
    pub fn roles(&self) -> Vec<String> {
        let raw = match (&self.roles, &self.role) {
            (Some(OneOrMany::Many(roles)), _) => roles.clone(),
            (Some(OneOrMany::One(role)), _) => vec![role.clone()],
            (None, Some(role)) => vec![role.clone()],
            (None, None) => Vec::new(),
        };
        raw.into_iter()
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty())
            .collect()
    }
}
