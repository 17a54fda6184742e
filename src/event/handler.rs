use std::sync::Arc;

use axum::Extension;
use axum::extract::State;
use axum::extract::ws::{Message as Frame, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use log::{debug, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::model::{Command, NotificationStream};
use crate::{message, thread, user};

pub async fn ws(
    ws: WebSocketUpgrade,
    Extension(me): Extension<user::Id>,
    State(thread_service): State<thread::Service>,
    State(message_service): State<message::Service>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, me, thread_service, message_service))
}

/// One socket, at most one active subscription. A new subscribe command
/// replaces the previous subscription; closing the socket releases it.
async fn handle_socket(
    socket: WebSocket,
    me: user::Id,
    thread_service: thread::Service,
    message_service: message::Service,
) {
    let (sink, mut frames) = socket.split();
    let sink = Arc::new(Mutex::new(sink));
    let mut forward: Option<JoinHandle<()>> = None;

    while let Some(Ok(frame)) = frames.next().await {
        match frame {
            Frame::Text(text) => match serde_json::from_str::<Command>(&text) {
                Ok(command) => {
                    let subscription = match &command {
                        Command::SubscribeThreads => match thread_service.subscribe(&me).await {
                            Ok(s) => Some(s),
                            Err(e) => {
                                warn!("thread subscription rejected for {me}: {e:?}");
                                None
                            }
                        },
                        Command::SubscribeMessages { thread_id } => {
                            match message_service.subscribe(&me, thread_id).await {
                                Ok(s) => Some(s),
                                Err(e) => {
                                    warn!("message subscription rejected for {me}: {e:?}");
                                    None
                                }
                            }
                        }
                    };

                    if let Some(subscription) = subscription {
                        if let Some(previous) = forward.take() {
                            previous.abort();
                        }
                        forward = Some(tokio::spawn(forward_notifications(
                            subscription,
                            sink.clone(),
                        )));
                    }
                }
                Err(e) => debug!("ignoring malformed ws command: {e:?}"),
            },
            Frame::Close(_) => break,
            _ => {}
        }
    }

    if let Some(forward) = forward.take() {
        forward.abort();
    }
}

async fn forward_notifications(
    mut subscription: NotificationStream,
    sink: Arc<Mutex<SplitSink<WebSocket, Frame>>>,
) {
    while let Some(notification) = subscription.next().await {
        match serde_json::to_string(&notification) {
            Ok(json) => {
                if sink.lock().await.send(Frame::Text(json.into())).await.is_err() {
                    break;
                }
            }
            Err(e) => warn!("failed to serialize notification: {e:?}"),
        }
    }
}
