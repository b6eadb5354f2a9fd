//! Liveliness token announcing a registered service.
//!
//! A bridge registers its service once, when the first real data is
//! available. Subscribers watching `<prefix>/*/@/alive` get a PUT when the
//! service appears and a DELETE when the token is dropped (process exit or
//! session loss).

use std::sync::Arc;

use zenoh::Session;
use zenoh::liveliness::LivelinessToken;

use crate::KeyExprBuilder;
use crate::error::{BridgeError, Result};

/// Liveliness token for one service.
///
/// The token stays declared for as long as this value is alive.
#[derive(Debug)]
pub struct ServiceLiveliness {
    key: String,
    #[allow(dead_code)]
    token: LivelinessToken,
}

impl ServiceLiveliness {
    /// Declare `service` as alive at `<prefix>/<service>/@/alive`.
    pub async fn declare(
        session: &Arc<Session>,
        keys: &KeyExprBuilder,
        service: &str,
    ) -> Result<Self> {
        let key = keys.liveliness_key(service);

        let token = session
            .liveliness()
            .declare_token(&key)
            .await
            .map_err(|e| {
                BridgeError::liveliness(format!("Failed to declare token for {}: {}", service, e))
            })?;

        tracing::info!(key = %key, "Service liveliness token declared");

        Ok(Self { key, token })
    }

    /// Key expression of the token.
    pub fn key(&self) -> &str {
        &self.key
    }
}
