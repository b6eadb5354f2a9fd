//! Mapping between attribute paths and Zenoh key expressions.
//!
//! Attribute paths use the supervisory system's convention (`/Turbine/RPM`).
//! On the wire each path is scoped to its service:
//!
//! ```text
//! <prefix>/<service>/<path without leading slash>
//! ```

/// Default key expression prefix for all WindSight attributes.
pub const KEY_PREFIX: &str = "windsight";

/// Builder for WindSight key expressions.
#[derive(Debug, Clone)]
pub struct KeyExprBuilder {
    prefix: String,
}

impl Default for KeyExprBuilder {
    fn default() -> Self {
        Self::new(KEY_PREFIX)
    }
}

impl KeyExprBuilder {
    /// Create a builder rooted at `prefix` (trailing slashes are ignored).
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    /// The prefix this builder was created with.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key expression for one attribute of a service.
    ///
    /// # Example
    /// ```
    /// use windsight_common::keyexpr::KeyExprBuilder;
    ///
    /// let builder = KeyExprBuilder::new("windsight");
    /// let key = builder.attribute("bornay_ttyUSB0", "/Turbine/RPM");
    /// assert_eq!(key, "windsight/bornay_ttyUSB0/Turbine/RPM");
    /// ```
    pub fn attribute(&self, service: &str, path: &str) -> String {
        format!("{}/{}/{}", self.prefix, service, path_to_suffix(path))
    }

    /// Liveliness token key announcing that a service is registered.
    pub fn liveliness_key(&self, service: &str) -> String {
        format!("{}/{}/@/alive", self.prefix, service)
    }

    /// Key for bridge status messages.
    pub fn status_key(&self) -> String {
        format!("{}/@/status", self.prefix)
    }
}

/// Strip the leading `/` of an attribute path so it can be appended to a key.
pub fn path_to_suffix(path: &str) -> &str {
    path.trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_builder() {
        let builder = KeyExprBuilder::default();

        assert_eq!(
            builder.attribute("svc", "/History/Overall/MaxRPM"),
            "windsight/svc/History/Overall/MaxRPM"
        );
        assert_eq!(builder.liveliness_key("svc"), "windsight/svc/@/alive");
        assert_eq!(builder.status_key(), "windsight/@/status");
    }

    #[test]
    fn test_trailing_slash_prefix() {
        let builder = KeyExprBuilder::new("site/windsight/");
        assert_eq!(builder.prefix(), "site/windsight");
        assert_eq!(
            builder.attribute("svc", "/Dc/0/Voltage"),
            "site/windsight/svc/Dc/0/Voltage"
        );
    }

    #[test]
    fn test_path_to_suffix() {
        assert_eq!(path_to_suffix("/Turbine/RPM"), "Turbine/RPM");
        assert_eq!(path_to_suffix("Turbine/RPM"), "Turbine/RPM");
    }
}
