use secrecy::SecretString;

/// Process-wide configuration resolved from the CLI.
///
/// The token signing secret lives here so it is constructed once at startup
/// and passed explicitly into the token service, never read from ambient
/// state. Tests inject their own secret the same way.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub token_secret: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(token_secret: SecretString) -> Self {
        Self { token_secret }
    }
}
