//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching subscribe/unsubscribe commands and forwarding filtered
//! change notifications.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::messages::{WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::domain::{ChangeEvent, EventId};

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards matching notifications from the [`broadcast::Receiver`]
///   to the client. A notification never carries aggregate state; the
///   client refetches the event detail and recomputes locally.
pub async fn run_connection(socket: WebSocket, mut change_rx: broadcast::Receiver<ChangeEvent>) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let mut subs = SubscriptionManager::new();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let response = handle_text_message(&text, &mut subs);
                        if let Some(resp_json) = response
                            && ws_tx.send(Message::text(resp_json)).await.is_err() {
                                break;
                            }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Notification from the ChangeBus
            change = change_rx.recv() => {
                match change {
                    Ok(change_event) => {
                        if subs.matches(change_event.event_id()) {
                            let msg = WsMessage {
                                id: uuid::Uuid::new_v4().to_string(),
                                msg_type: WsMessageType::Change,
                                timestamp: chrono::Utc::now(),
                                payload: serde_json::to_value(&change_event).unwrap_or_default(),
                            };
                            let json = serde_json::to_string(&msg).unwrap_or_default();
                            if ws_tx.send(Message::text(json)).await.is_err() {
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind change bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

/// Handles a text message from the client, returning an optional JSON response.
fn handle_text_message(text: &str, subs: &mut SubscriptionManager) -> Option<String> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        let err = WsMessage {
            id: String::new(),
            msg_type: WsMessageType::Error,
            timestamp: chrono::Utc::now(),
            payload: serde_json::json!({
                "code": 400,
                "message": "malformed JSON"
            }),
        };
        return serde_json::to_string(&err).ok();
    };

    // Only command envelopes are dispatched; a client echoing back a
    // change or response envelope gets an error instead of a side effect.
    if msg.msg_type != WsMessageType::Command {
        let err = WsMessage {
            id: msg.id,
            msg_type: WsMessageType::Error,
            timestamp: chrono::Utc::now(),
            payload: serde_json::json!({
                "code": 400,
                "message": "expected a command envelope"
            }),
        };
        return serde_json::to_string(&err).ok();
    }

    match serde_json::from_value::<WsCommand>(msg.payload.clone()) {
        Ok(WsCommand::Subscribe { event_ids }) => {
            let (ids, wildcard) = parse_event_ids(&event_ids);
            subs.subscribe(&ids, wildcard);
            let response = WsMessage {
                id: msg.id,
                msg_type: WsMessageType::Response,
                timestamp: chrono::Utc::now(),
                payload: serde_json::json!({
                    "subscribed": ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "count": subs.count(),
                    "wildcard": subs.is_subscribed_all(),
                }),
            };
            serde_json::to_string(&response).ok()
        }
        Ok(WsCommand::Unsubscribe { event_ids }) => {
            let (ids, _) = parse_event_ids(&event_ids);
            subs.unsubscribe(&ids);
            let response = WsMessage {
                id: msg.id,
                msg_type: WsMessageType::Response,
                timestamp: chrono::Utc::now(),
                payload: serde_json::json!({
                    "unsubscribed": ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "remaining_count": subs.count(),
                }),
            };
            serde_json::to_string(&response).ok()
        }
        Err(_) => {
            let err = WsMessage {
                id: msg.id,
                msg_type: WsMessageType::Error,
                timestamp: chrono::Utc::now(),
                payload: serde_json::json!({
                    "code": 404,
                    "message": "unknown command"
                }),
            };
            serde_json::to_string(&err).ok()
        }
    }
}

/// Parses raw ID strings into event IDs; `"*"` flags the wildcard.
/// Unparseable entries are dropped silently.
fn parse_event_ids(raw: &[String]) -> (Vec<EventId>, bool) {
    let mut ids = Vec::new();
    let mut wildcard = false;
    for s in raw {
        if s == "*" {
            wildcard = true;
        } else if let Ok(uuid) = s.parse::<uuid::Uuid>() {
            ids.push(EventId::from_uuid(uuid));
        }
    }
    (ids, wildcard)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parse_event_ids_handles_wildcard_and_garbage() {
        let id = uuid::Uuid::new_v4();
        let raw = vec![id.to_string(), "*".to_string(), "not-a-uuid".to_string()];
        let (ids, wildcard) = parse_event_ids(&raw);
        assert_eq!(ids, vec![EventId::from_uuid(id)]);
        assert!(wildcard);
    }

    #[test]
    fn malformed_json_yields_error_message() {
        let mut subs = SubscriptionManager::new();
        let Some(resp) = handle_text_message("{nope", &mut subs) else {
            panic!("expected an error response");
        };
        let Ok(msg) = serde_json::from_str::<WsMessage>(&resp) else {
            panic!("error response must be a valid envelope");
        };
        assert_eq!(msg.msg_type, WsMessageType::Error);
    }

    #[test]
    fn subscribe_command_updates_filter() {
        let mut subs = SubscriptionManager::new();
        let id = uuid::Uuid::new_v4();
        let msg = serde_json::json!({
            "id": "req-1",
            "type": "command",
            "timestamp": chrono::Utc::now(),
            "payload": { "command": "subscribe", "event_ids": [id.to_string()] }
        });
        let text = msg.to_string();
        let Some(resp) = handle_text_message(&text, &mut subs) else {
            panic!("expected a response");
        };
        assert!(resp.contains("\"count\":1"));
        assert!(subs.matches(EventId::from_uuid(id)));
    }

    #[test]
    fn non_command_envelope_is_not_dispatched() {
        let mut subs = SubscriptionManager::new();
        let id = uuid::Uuid::new_v4();
        // A subscribe payload inside a non-command envelope must be
        // rejected without touching the subscription filter.
        let msg = serde_json::json!({
            "id": "req-3",
            "type": "change",
            "timestamp": chrono::Utc::now(),
            "payload": { "command": "subscribe", "event_ids": [id.to_string()] }
        });
        let text = msg.to_string();
        let Some(resp) = handle_text_message(&text, &mut subs) else {
            panic!("expected a response");
        };
        let Ok(envelope) = serde_json::from_str::<WsMessage>(&resp) else {
            panic!("error response must be a valid envelope");
        };
        assert_eq!(envelope.msg_type, WsMessageType::Error);
        assert!(!subs.matches(EventId::from_uuid(id)));
        assert_eq!(subs.count(), 0);
    }

    #[test]
    fn unknown_command_yields_error() {
        let mut subs = SubscriptionManager::new();
        let msg = serde_json::json!({
            "id": "req-2",
            "type": "command",
            "timestamp": chrono::Utc::now(),
            "payload": { "command": "teleport" }
        });
        let text = msg.to_string();
        let Some(resp) = handle_text_message(&text, &mut subs) else {
            panic!("expected a response");
        };
        assert!(resp.contains("unknown command"));
    }
}
