use ::serde::de::DeserializeOwned;

/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize`; field `smtp_port` is read from `SMTP_PORT`.
/// Optional settings use `#[serde(default = ...)]`.
pub trait Config: Sized + DeserializeOwned {
    fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Load from explicit `(NAME, value)` pairs instead of the process environment.
    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
