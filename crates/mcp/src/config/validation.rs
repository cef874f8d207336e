//! Configuration validation for the backend address.

use crate::config::ConfigError;
use tracing::debug;
use url::Url;

/// Parse and validate a backend base URL.
pub fn validate_backend_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })?;

    let scheme = url.scheme();
    if scheme != "http" {
        return Err(ConfigError::UnsupportedScheme(scheme.to_string()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::MissingHost);
    }

    debug!(%url, "validated backend url");
    Ok(url)
}
