//! WebSocket bridge between the enhancer and the browser UI.
//!
//! Each connected client gets its own [`Session`]. Text frames are parsed
//! as [`UiToServer`] messages and every reply is sent back as a JSON text
//! frame, in order.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinError;
use tokio_tungstenite::tungstenite::Message;

use crate::fetch::ResolvedImage;
use crate::ipc::{ServerToUi, UiToServer};
use crate::session::Session;

/// Errors that stop the bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
}

/// Bind the listener on `127.0.0.1:{port}`.
pub async fn bind(port: u16) -> Result<TcpListener, BridgeError> {
    let addr = format!("127.0.0.1:{port}");
    TcpListener::bind(&addr)
        .await
        .map_err(|source| BridgeError::Bind { addr, source })
}

/// Accept clients forever, one task per connection.
pub async fn serve(
    listener: TcpListener,
    sample: Arc<ResolvedImage>,
    threshold: f32,
) -> Result<(), BridgeError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("WebSocket server listening on ws://{addr}");
    }

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Failed to accept connection: {e}");
                continue;
            }
        };
        tracing::info!("WebSocket client connected: {peer}");

        let session = Session::new(Arc::clone(&sample), threshold);
        tokio::spawn(async move {
            match handle_connection(stream, session).await {
                Some(session) => tracing::info!(
                    "WebSocket client disconnected: {peer} (last image: {} [{:?}], depth {} m)",
                    session.source(),
                    session.origin(),
                    session.depth()
                ),
                None => tracing::info!("WebSocket client disconnected: {peer}"),
            }
        });
    }
}

/// Run one message through the session on the blocking pool.
///
/// Enhancement and PNG encoding are CPU bound; keeping them off the async
/// workers lets other clients progress while a large upload is processed.
async fn dispatch(
    mut session: Session,
    msg: UiToServer,
) -> Result<(Session, Vec<ServerToUi>), JoinError> {
    tokio::task::spawn_blocking(move || {
        let replies = session.handle(msg);
        (session, replies)
    })
    .await
}

/// Serve one client until it disconnects, then hand the session back.
///
/// Returns `None` if the session was lost to a panicking handler.
async fn handle_connection(stream: TcpStream, mut session: Session) -> Option<Session> {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            tracing::error!("WebSocket handshake failed: {e}");
            return Some(session);
        }
    };
    let (mut ws_sink, mut ws_source) = ws_stream.split();

    while let Some(frame) = ws_source.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("WebSocket read failed: {e}");
                break;
            }
        };

        let replies = match serde_json::from_str::<UiToServer>(&text) {
            Ok(msg) => match dispatch(session, msg).await {
                Ok((returned, replies)) => {
                    session = returned;
                    replies
                }
                Err(e) => {
                    tracing::error!("Session handler failed: {e}");
                    return None;
                }
            },
            Err(e) => {
                tracing::warn!("Failed to parse UI message: {e}");
                vec![ServerToUi::Error {
                    message: format!("Malformed message: {e}"),
                }]
            }
        };

        for reply in replies {
            let json = match serde_json::to_string(&reply) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize ServerToUi: {e}");
                    continue;
                }
            };
            if ws_sink.send(Message::Text(json.into())).await.is_err() {
                return Some(session);
            }
        }
    }
    Some(session)
}
