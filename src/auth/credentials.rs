use uuid::Uuid;

/// Credentials presented to the broker when a session connects.
///
/// Carries the display username and the opaque token issued at login. The
/// client performs no validation of its own; token issuance lives on the
/// platform side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    token: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }

    /// Credentials with a freshly generated demo token, mirroring the
    /// platform's demo login flow.
    pub fn demo(username: impl Into<String>) -> Self {
        let token = format!("demo-{}", Uuid::new_v4());
        Self {
            username: username.into(),
            token,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}
