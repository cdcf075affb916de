//! Real-time WebSocket transport.
//!
//! [`spawn_socket`] starts a task that owns the socket and reports
//! open/message/close/error as [`TransportEvent`]s on a channel. The task
//! never touches session state; the controller consumes the events one at a
//! time. Outbound text goes through [`SocketHandle`]. Dropping the handle
//! closes the socket.

use futures_util::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("websocket connect failed: {0}")]
    Connect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket stream failed: {0}")]
    Stream(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket task is gone")]
    ChannelClosed,
}

/// Callback-equivalent events raised by the transport.
#[derive(Debug)]
pub enum TransportEvent {
    Opened,
    Message(String),
    Closed,
    Error(TransportError),
}

/// Anything that can carry one outbound text frame.
pub trait Outbound {
    fn send_text(&self, text: String) -> Result<(), TransportError>;
}

/// Sender half of a spawned socket.
#[derive(Debug)]
pub struct SocketHandle {
    outbound: mpsc::UnboundedSender<String>,
}

impl Outbound for SocketHandle {
    fn send_text(&self, text: String) -> Result<(), TransportError> {
        self.outbound.send(text).map_err(|_| TransportError::ChannelClosed)
    }
}

/// Connect to `url` on a background task.
#[must_use]
pub fn spawn_socket(url: Url) -> (SocketHandle, mpsc::UnboundedReceiver<TransportEvent>) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    tokio::spawn(run_socket(url, outbound_rx, event_tx));
    (SocketHandle { outbound: outbound_tx }, event_rx)
}

async fn run_socket(
    url: Url,
    mut outbound: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    tracing::info!(host = url.host_str().unwrap_or_default(), path = url.path(), "connecting websocket");
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(error) => {
            let _ = events.send(TransportEvent::Error(TransportError::Connect(Box::new(error))));
            return;
        }
    };
    if events.send(TransportEvent::Opened).is_err() {
        return;
    }

    let (mut sink, mut source) = stream.split();
    loop {
        tokio::select! {
            next = outbound.recv() => {
                let Some(text) = next else {
                    // Handle dropped: local teardown, nobody is listening for events.
                    let _ = sink.close().await;
                    return;
                };
                if let Err(error) = sink.send(Message::Text(text.into())).await {
                    let _ = events.send(TransportEvent::Error(TransportError::Stream(Box::new(error))));
                    return;
                }
            }
            frame = source.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if events.send(TransportEvent::Message(text.as_str().to_owned())).is_err() {
                        return;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    // Flushes the queued close reply before the socket drops.
                    let _ = sink.close().await;
                    let _ = events.send(TransportEvent::Closed);
                    return;
                }
                Some(Ok(Message::Binary(bytes))) => {
                    tracing::debug!(len = bytes.len(), "ignoring binary websocket frame");
                }
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    let _ = events.send(TransportEvent::Error(TransportError::Stream(Box::new(error))));
                    return;
                }
            }
        }
    }
}
