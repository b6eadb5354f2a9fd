//! Attribute publisher for Zenoh.

use std::sync::Arc;

use windsight_common::{AttributeUpdate, Format, KeyExprBuilder, encode};

use crate::error::{BridgeError, Result};

/// Publisher for sending attribute updates to Zenoh.
///
/// Wraps a Zenoh session and maps each [`AttributeUpdate`] onto the key
/// `<prefix>/<service>/<path>`.
#[derive(Clone, Debug)]
pub struct Publisher {
    session: Arc<zenoh::Session>,
    keys: KeyExprBuilder,
    format: Format,
}

impl Publisher {
    /// Create a new publisher.
    pub fn new(
        session: Arc<zenoh::Session>,
        key_prefix: impl Into<String>,
        format: Format,
    ) -> Self {
        Self {
            session,
            keys: KeyExprBuilder::new(key_prefix),
            format,
        }
    }

    /// Get the key prefix.
    pub fn key_prefix(&self) -> &str {
        self.keys.prefix()
    }

    /// Get the key expression builder.
    pub fn keys(&self) -> &KeyExprBuilder {
        &self.keys
    }

    /// Get the serialization format.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Get a reference to the Zenoh session.
    pub fn session(&self) -> &Arc<zenoh::Session> {
        &self.session
    }

    /// Publish one attribute update.
    pub async fn publish(&self, update: &AttributeUpdate) -> Result<()> {
        let key = self.keys.attribute(&update.service, &update.path);
        let payload =
            encode(update, self.format).map_err(|e| BridgeError::Serialization(e.to_string()))?;

        self.publish_raw(&key, payload).await
    }

    /// Publish a batch of attribute updates.
    ///
    /// Failures are logged and counted; the batch always runs to the end.
    pub async fn publish_batch<'a, I>(&self, updates: I) -> PublishStats
    where
        I: IntoIterator<Item = &'a AttributeUpdate>,
    {
        let mut stats = PublishStats::default();

        for update in updates {
            match self.publish(update).await {
                Ok(()) => stats.success += 1,
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!(error = %e, path = %update.path, "Failed to publish attribute");
                }
            }
        }

        stats
    }

    /// Publish raw bytes to a key (for status messages, etc.).
    pub async fn publish_raw(&self, key: &str, payload: Vec<u8>) -> Result<()> {
        self.session
            .put(key, payload)
            .await
            .map_err(|e| BridgeError::Publish {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    /// Publish a JSON value to a key.
    pub async fn publish_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let payload = serde_json::to_vec(value)?;
        self.publish_raw(key, payload).await
    }
}

/// Statistics from a batch publish operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishStats {
    /// Number of successfully published updates.
    pub success: usize,
    /// Number of failed publishes.
    pub failed: usize,
}

impl PublishStats {
    /// Total number of attempted publishes.
    pub fn total(&self) -> usize {
        self.success + self.failed
    }

    /// Record the outcome of a single publish.
    pub fn record<E>(&mut self, outcome: &std::result::Result<(), E>) {
        match outcome {
            Ok(()) => self.success += 1,
            Err(_) => self.failed += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_stats() {
        let mut stats = PublishStats::default();
        assert_eq!(stats.total(), 0);

        stats.success = 29;
        stats.failed = 2;
        assert_eq!(stats.total(), 31);
    }

    #[test]
    fn test_publish_stats_record() {
        let mut stats = PublishStats::default();
        stats.record::<()>(&Ok(()));
        stats.record(&Err("closed"));
        stats.record::<()>(&Ok(()));
        stats.record::<()>(&Ok(()));

        assert_eq!(stats, PublishStats { success: 3, failed: 1 });
        assert_eq!(stats.total(), 4);
    }
}
