use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::{
    AppState,
    auth::{AuthHub, AuthListener, Navigator},
    db::enums::UserType,
    middleware::auth::Session,
};

/// Frames pushed to `/ws/auth` clients.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SocketMessage {
    Ready {
        session_id: String,
        user_type: Option<UserType>,
    },
    Navigate {
        to: String,
    },
}

/// Forwards navigation requests into the socket task.
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelNavigator {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: &str) {
        if self.tx.send(route.to_string()).is_err() {
            tracing::debug!(route, "Socket already gone, dropping navigation");
        }
    }
}

pub async fn auth_socket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Response {
    tracing::info!(
        user_id = %session.user.id,
        session_id = %session.id,
        "Auth socket upgrade"
    );
    let hub = state.auth_hub.clone();
    ws.on_upgrade(move |socket| handle_auth_socket(socket, hub, session))
}

async fn send_frame(
    sender: &mut futures_util::stream::SplitSink<WebSocket, Message>,
    frame: &SocketMessage,
) -> bool {
    match serde_json::to_string(frame) {
        Ok(text) => sender.send(Message::Text(text)).await.is_ok(),
        Err(e) => {
            tracing::error!("Failed to encode socket frame: {}", e);
            false
        }
    }
}

async fn handle_auth_socket(socket: WebSocket, hub: AuthHub, session: Session) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let listener = AuthListener::mount(
        &hub.session(&session.id, &session.user),
        Arc::new(ChannelNavigator::new(tx)),
    );

    let (mut sender, mut receiver) = socket.split();
    let ready = SocketMessage::Ready {
        session_id: session.id.clone(),
        user_type: session.user.user_type,
    };

    if send_frame(&mut sender, &ready).await {
        loop {
            tokio::select! {
                route = rx.recv() => {
                    if let Some(to) = route {
                        send_frame(&mut sender, &SocketMessage::Navigate { to }).await;
                        let _ = sender.send(Message::Close(None)).await;
                    }
                    break;
                }
                incoming = receiver.next() => match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::warn!(session_id = %session.id, "Auth socket error: {}", e);
                        break;
                    }
                    Some(Ok(_)) => {}
                },
            }
        }
    }

    drop(listener);
    hub.release(&session.id);
    tracing::info!(session_id = %session.id, "Auth socket closed");
}
