//! Publish sink seam between the poll loop and the attribute bus.

use std::future::Future;

use windsight_bridge_framework::{AttributeUpdate, BridgeError, Publisher, ServiceLiveliness};

use crate::service::ServiceInfo;

/// Accepts attribute updates for one registered service.
pub trait PublishSink: Send {
    fn publish(
        &mut self,
        update: AttributeUpdate,
    ) -> impl Future<Output = Result<(), BridgeError>> + Send;
}

/// Registers a service and hands back its [`PublishSink`].
///
/// Called once per process, on the first successful read.
pub trait SinkFactory: Send {
    type Sink: PublishSink;

    fn create(
        &mut self,
        info: &ServiceInfo,
    ) -> impl Future<Output = Result<Self::Sink, BridgeError>> + Send;
}

/// Registers services on Zenoh.
///
/// Registration declares the service liveliness token and publishes the
/// management attributes.
#[derive(Debug, Clone)]
pub struct ZenohSinkFactory {
    publisher: Publisher,
}

impl ZenohSinkFactory {
    pub fn new(publisher: Publisher) -> Self {
        Self { publisher }
    }
}

impl SinkFactory for ZenohSinkFactory {
    type Sink = ZenohSink;

    async fn create(&mut self, info: &ServiceInfo) -> Result<ZenohSink, BridgeError> {
        let liveliness =
            ServiceLiveliness::declare(self.publisher.session(), self.publisher.keys(), &info.name)
                .await?;

        let updates: Vec<AttributeUpdate> = info
            .management_attributes()
            .into_iter()
            .map(|(path, value)| AttributeUpdate::new(info.name.as_str(), path, value))
            .collect();

        let stats = self.publisher.publish_batch(&updates).await;
        if stats.failed > 0 {
            tracing::warn!(
                service = %info.name,
                failed = stats.failed,
                total = stats.total(),
                "Some management attributes were not published"
            );
        }

        tracing::info!(
            service = %info.name,
            device_instance = info.device_instance,
            liveliness = %liveliness.key(),
            "Service registered"
        );

        Ok(ZenohSink {
            publisher: self.publisher.clone(),
            _liveliness: liveliness,
        })
    }
}

/// Publishes attribute updates of a registered service.
///
/// The service stays registered for as long as the sink is alive.
#[derive(Debug)]
pub struct ZenohSink {
    publisher: Publisher,
    _liveliness: ServiceLiveliness,
}

impl PublishSink for ZenohSink {
    async fn publish(&mut self, update: AttributeUpdate) -> Result<(), BridgeError> {
        self.publisher.publish(&update).await
    }
}
