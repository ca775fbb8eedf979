//! Background worker for BLE operations.
//!
//! All Bluetooth work happens here so the render loop never blocks. The
//! worker receives [`Command`]s, owns the single [`ConnectionSlot`], and
//! reports progress as [`SensorEvent`]s. Each connect attempt runs in its
//! own task with a cancellation token, so the UI always has an escape hatch
//! while a connect is in flight.

use std::sync::Arc;

use futures::StreamExt;
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use thingy_core::device::ConnectionConfig;
use thingy_core::{
    Command, ConnectionSlot, Device, Error, SensorEvent, StreamOptions, TemperatureStream,
};

/// Background worker that handles BLE operations.
pub struct SensorWorker {
    /// Receiver for commands from the UI thread.
    command_rx: mpsc::Receiver<Command>,
    /// Sender for events back to the UI thread.
    event_tx: mpsc::Sender<SensorEvent>,
    /// The single active connection.
    slot: Arc<ConnectionSlot>,
    /// Connection configuration (timeouts).
    config: ConnectionConfig,
    /// Cancellation token for the in-flight connect attempt, if any.
    connect_cancel: Option<CancellationToken>,
    /// The running connect/stream session task, if any.
    session_task: Option<JoinHandle<()>>,
}

impl SensorWorker {
    /// Create a new sensor worker.
    pub fn new(command_rx: mpsc::Receiver<Command>, event_tx: mpsc::Sender<SensorEvent>) -> Self {
        Self {
            command_rx,
            event_tx,
            slot: Arc::new(ConnectionSlot::new()),
            config: ConnectionConfig::default(),
            connect_cancel: None,
            session_task: None,
        }
    }

    /// Run the worker's main loop.
    ///
    /// Consumes the worker and runs until [`Command::Shutdown`] is received
    /// or the command channel is closed.
    pub async fn run(mut self) {
        info!("SensorWorker started");

        loop {
            match self.command_rx.recv().await {
                Some(Command::Shutdown) => {
                    info!("SensorWorker received shutdown command");
                    break;
                }
                Some(cmd) => self.handle_command(cmd).await,
                None => {
                    info!("Command channel closed, shutting down worker");
                    break;
                }
            }
        }

        self.shutdown().await;
        info!("SensorWorker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        info!(?cmd, "Handling command");

        match cmd {
            Command::Connect { identifier } => self.handle_connect(identifier),
            Command::CancelConnect => {
                if let Some(token) = &self.connect_cancel {
                    token.cancel();
                }
            }
            Command::Disconnect => self.handle_disconnect().await,
            Command::Shutdown => {
                // Handled in run()
            }
        }
    }

    /// Spawn a session task: connect, subscribe, forward readings.
    ///
    /// The session task holds the slot's connect permit, so a second Connect
    /// command while one is in flight reports `ConnectInProgress` instead of
    /// creating a duplicate subscription.
    fn handle_connect(&mut self, identifier: Option<String>) {
        let cancel = CancellationToken::new();
        self.connect_cancel = Some(cancel.clone());

        let slot = Arc::clone(&self.slot);
        let event_tx = self.event_tx.clone();
        let config = self.config.clone();
        self.session_task = Some(tokio::spawn(run_session(
            slot, event_tx, config, identifier, cancel,
        )));
    }

    async fn handle_disconnect(&mut self) {
        if let Some(device) = self.slot.take() {
            // The session task observes the stream ending and reports
            // Disconnected to the UI.
            device.disconnect().await.ok();
        }
    }

    async fn shutdown(&mut self) {
        if let Some(token) = self.connect_cancel.take() {
            token.cancel();
        }
        if let Some(device) = self.slot.take() {
            device.disconnect().await.ok();
        }
        if let Some(task) = self.session_task.take() {
            task.await.ok();
        }
    }
}

/// One connect-and-stream session.
async fn run_session(
    slot: Arc<ConnectionSlot>,
    event_tx: mpsc::Sender<SensorEvent>,
    config: ConnectionConfig,
    identifier: Option<String>,
    cancel: CancellationToken,
) {
    let permit = match slot.begin_connect() {
        Ok(permit) => permit,
        Err(e) => {
            let _ = event_tx
                .send(SensorEvent::ConnectionFailed {
                    error: e.to_string(),
                    cancelled: false,
                })
                .await;
            return;
        }
    };

    let _ = event_tx
        .send(SensorEvent::Connecting {
            identifier: identifier.clone(),
        })
        .await;

    let connect = async {
        match identifier.as_deref() {
            Some(id) => Device::connect_with_config(id, config).await,
            None => Device::connect_any_with_config(config).await,
        }
    };

    let result = tokio::select! {
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = connect => result,
    };

    let device = match result {
        Ok(device) => Arc::new(device),
        Err(e) => {
            // Permit drop rolls the slot back to Idle
            let _ = event_tx
                .send(SensorEvent::ConnectionFailed {
                    cancelled: e.is_cancellation(),
                    error: e.to_string(),
                })
                .await;
            return;
        }
    };

    let mut stream =
        match TemperatureStream::subscribe(Arc::clone(&device), StreamOptions::default()).await {
            Ok(stream) => stream,
            Err(e) => {
                device.disconnect().await.ok();
                let _ = event_tx
                    .send(SensorEvent::ConnectionFailed {
                        error: e.to_string(),
                        cancelled: false,
                    })
                    .await;
                return;
            }
        };

    permit.complete(Arc::clone(&device));
    let _ = event_tx
        .send(SensorEvent::Connected {
            name: device.name().map(str::to_string),
            address: device.address().to_string(),
        })
        .await;

    while let Some(item) = stream.next().await {
        let event = match item {
            Ok(reading) => SensorEvent::ReadingUpdated {
                reading,
                at: OffsetDateTime::now_utc(),
            },
            Err(e) => SensorEvent::ReadingError {
                error: e.to_string(),
            },
        };
        if event_tx.send(event).await.is_err() {
            debug!("Event receiver dropped, ending session");
            break;
        }
    }

    // Stream ended: either an explicit disconnect already emptied the slot,
    // or the transport dropped underneath us and the device is still held.
    if let Some(device) = slot.take() {
        device.disconnect().await.ok();
    }
    let _ = event_tx.send(SensorEvent::Disconnected).await;
}
