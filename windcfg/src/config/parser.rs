//! Format-specific parsing of configuration files.

use std::path::Path;

use figment::Figment;
#[cfg(feature = "toml")]
use figment::providers::{Format, Toml};
#[cfg(feature = "json5")]
use figment_json5::Json5;

use crate::{WindError, WindResult};

/// Parse configuration data according to the file extension.
///
/// `.json` and `.json5` files need the `json5` feature; everything else is
/// read as TOML, which needs the `toml` feature.
///
/// # Errors
///
/// Returns a [`WindError::File`] when TOML fails to parse or the format's
/// feature is disabled.
pub(super) fn parse_config_by_format(path: &Path, data: &str) -> WindResult<Figment> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let figment = match ext.as_deref() {
        Some("json" | "json5") => {
            #[cfg(feature = "json5")]
            {
                Figment::from(Json5::string(data))
            }
            #[cfg(not(feature = "json5"))]
            {
                let _ = data;
                return Err(disabled(path, "json5"));
            }
        }
        _ => {
            #[cfg(feature = "toml")]
            {
                // Report syntax errors against the file before figment parses again.
                toml::from_str::<toml::Value>(data).map_err(|e| WindError::file_arc(path, e))?;
                Figment::from(Toml::string(data))
            }
            #[cfg(not(feature = "toml"))]
            {
                let _ = data;
                return Err(disabled(path, "toml"));
            }
        }
    };
    Ok(figment)
}

#[cfg(any(not(feature = "toml"), not(feature = "json5")))]
fn disabled(path: &Path, feature: &str) -> std::sync::Arc<WindError> {
    WindError::file_arc(
        path,
        std::io::Error::other(format!(
            "{feature} feature disabled: enable the '{feature}' feature to support this file format"
        )),
    )
}
