//! Modbus RTU register client.

use std::future::Future;
use std::time::Duration;

use tokio_modbus::client::Context;
use tokio_modbus::prelude::*;
use tokio_serial::{DataBits, Parity, SerialStream, StopBits};

use crate::error::ClientError;
use crate::registers::{DEVICE_ADDRESS, RegisterBlock};

/// Serial line speed of the controller.
pub const BAUD_RATE: u32 = 57_600;

/// Connection state of a [`RegisterClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

/// Reads contiguous holding register blocks from the controller.
///
/// Implementations fold every transport fault into a [`ClientError`] and
/// never return partial results.
pub trait RegisterClient: Send {
    /// Current connection state.
    fn state(&self) -> ConnectionState;

    /// Open the transport, releasing any previous one first.
    fn connect(
        &mut self,
        port: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<ConnectionState, ClientError>> + Send;

    /// Release the transport. Always leaves the client disconnected.
    fn disconnect(&mut self) -> impl Future<Output = ()> + Send;

    /// Read `count` holding registers starting at `base`.
    fn read_registers(
        &mut self,
        base: u16,
        count: u16,
    ) -> impl Future<Output = Result<RegisterBlock, ClientError>> + Send;
}

/// [`RegisterClient`] over a Modbus RTU serial line (57600-8-N-1).
#[derive(Debug, Default)]
pub struct RtuRegisterClient {
    ctx: Option<Context>,
    timeout: Duration,
}

impl RtuRegisterClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn open(port: &str, timeout: Duration) -> Result<Context, ClientError> {
        let builder = tokio_serial::new(port, BAUD_RATE)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(timeout);

        let serial = SerialStream::open(&builder).map_err(|e| ClientError::Connect {
            port: port.to_string(),
            message: e.to_string(),
        })?;

        Ok(rtu::attach_slave(serial, Slave(DEVICE_ADDRESS)))
    }
}

impl RegisterClient for RtuRegisterClient {
    fn state(&self) -> ConnectionState {
        if self.ctx.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    async fn connect(
        &mut self,
        port: &str,
        timeout: Duration,
    ) -> Result<ConnectionState, ClientError> {
        self.disconnect().await;

        let ctx = Self::open(port, timeout)?;
        self.ctx = Some(ctx);
        self.timeout = timeout;

        tracing::debug!(
            port = %port,
            baud = BAUD_RATE,
            unit = DEVICE_ADDRESS,
            "Serial transport open"
        );

        Ok(ConnectionState::Connected)
    }

    async fn disconnect(&mut self) {
        if let Some(mut ctx) = self.ctx.take() {
            if let Err(e) = ctx.disconnect().await {
                tracing::debug!(error = %e, "Error closing serial transport");
            }
        }
    }

    async fn read_registers(&mut self, base: u16, count: u16) -> Result<RegisterBlock, ClientError> {
        let timeout = self.timeout;
        let ctx = self
            .ctx
            .as_mut()
            .ok_or_else(|| ClientError::read("not connected"))?;

        let values = tokio::time::timeout(timeout, ctx.read_holding_registers(base, count))
            .await
            .map_err(|_| ClientError::read(format!("timeout after {:?}", timeout)))?
            .map_err(|e| ClientError::read(e.to_string()))?
            .map_err(|e| ClientError::read(format!("Exception: {:?}", e)))?;

        if values.len() != usize::from(count) {
            return Err(ClientError::read(format!(
                "short response: {} of {} registers",
                values.len(),
                count
            )));
        }

        Ok(RegisterBlock::new(values))
    }
}
