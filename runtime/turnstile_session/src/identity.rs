use secrecy::{ExposeSecret, SecretString};

/// The name of an authenticated user.
///
/// It's never empty: the empty string is reserved to mean "nobody is logged in",
/// and a [`Username`] can't be built from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate a raw username.
    pub fn parse(raw: impl Into<String>) -> Result<Self, EmptyUsername> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(EmptyUsername);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("A username can't be empty")]
pub struct EmptyUsername;

/// Who is behind the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// No valid session cookie was attached to the request.
    Anonymous,
    /// The request carries a valid session cookie for this user.
    Authenticated(Username),
}

impl Identity {
    pub fn username(&self) -> Option<&Username> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated(username) => Some(username),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated(_))
    }
}

/// The credentials submitted with a login attempt.
#[derive(Debug)]
pub struct Credentials {
    name: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Decide who these credentials belong to.
    ///
    /// There is no user database: any non-empty name, paired with any
    /// non-empty password, is accepted.
    /// `None` is returned if either of them is empty.
    pub fn authenticate(self) -> Option<Username> {
        if self.password.expose_secret().is_empty() {
            return None;
        }
        Username::parse(self.name).ok()
    }
}
