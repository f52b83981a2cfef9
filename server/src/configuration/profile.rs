use std::env::VarError;

use anyhow::Context;

/// The application profile, i.e. the type of environment the application is running in.
/// See [`Config::load`] for more details on how it influences the way configuration
/// is loaded.
///
/// [`Config::load`]: crate::configuration::Config::load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationProfile {
    /// Local development profile.
    ///
    /// The corresponding configuration file is `dev.yml`.
    /// It's committed to the repository: it must only contain non-sensitive values.
    Dev,
    /// Production profile.
    ///
    /// The corresponding configuration file is `prod.yml`.
    /// Session keys must be injected at runtime, via environment variables.
    Prod,
    /// The profile used by the black-box test suite.
    ///
    /// The corresponding configuration file is `test.yml`.
    Test,
}

impl ApplicationProfile {
    /// Load the application profile from the `APP_PROFILE` environment variable.
    ///
    /// `default_profile` is used if the variable is not set.
    pub fn load(
        default_profile: Option<ApplicationProfile>,
    ) -> Result<ApplicationProfile, anyhow::Error> {
        static PROFILE_ENV_VAR: &str = "APP_PROFILE";

        match (std::env::var(PROFILE_ENV_VAR), default_profile) {
            (Ok(raw_value), _) => raw_value.parse().with_context(|| {
                format!("Failed to parse the `{PROFILE_ENV_VAR}` environment variable")
            }),
            (Err(VarError::NotPresent), Some(default_profile)) => Ok(default_profile),
            (Err(e), _) => Err(anyhow::anyhow!(e).context(format!(
                "Failed to read the `{PROFILE_ENV_VAR}` environment variable"
            ))),
        }
    }

    /// Return the profile as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationProfile::Dev => "dev",
            ApplicationProfile::Prod => "prod",
            ApplicationProfile::Test => "test",
        }
    }
}

impl std::str::FromStr for ApplicationProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(ApplicationProfile::Dev),
            "prod" | "production" => Ok(ApplicationProfile::Prod),
            "test" => Ok(ApplicationProfile::Test),
            s => Err(anyhow::anyhow!(
                "`{}` is not a valid application profile.\nValid options are `dev`, `prod` and `test`.",
                s
            )),
        }
    }
}
