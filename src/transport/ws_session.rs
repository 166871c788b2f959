use crate::game::room::RoomHandle;
use crate::protocol::decode_client_message;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Low-priority frames written per wakeup, after the latest world frame.
const LO_SENDS_PER_WAKE: usize = 8;
/// Low-priority frames held locally; the rest wait in the room's bounded queue.
const LO_PENDING_LIMIT: usize = 32;

pub async fn handle_socket(socket: WebSocket, room: RoomHandle) {
    let (mut sender, mut receiver) = socket.split();
    let Some(session) = room.connect().await else {
        debug!("room unavailable, closing socket");
        return;
    };
    let session_id = session.session_id;
    let outbound_state = session.outbound_state;
    let mut outbound_hi_rx = session.outbound_hi_rx;
    let mut outbound_lo_rx = session.outbound_lo_rx;
    info!(%session_id, "client connected");

    let send_task = tokio::spawn(async move {
        let mut pending_hi: VecDeque<String> = VecDeque::new();
        let mut pending_lo: VecDeque<String> = VecDeque::new();
        let mut pending_state: Option<Arc<str>> = None;

        loop {
            tokio::select! {
                payload = outbound_hi_rx.recv() => match payload {
                    Some(payload) => pending_hi.push_back(payload),
                    None => return,
                },
                Some(payload) = outbound_lo_rx.recv() => {
                    pending_lo.push_back(payload);
                }
                _ = outbound_state.wait_for_update() => {}
            }

            while let Ok(payload) = outbound_hi_rx.try_recv() {
                pending_hi.push_back(payload);
            }
            pull_lo(&mut outbound_lo_rx, &mut pending_lo);
            if let Some(payload) = outbound_state.take_latest() {
                pending_state = Some(payload);
            }

            while let Some(payload) = pending_hi.pop_front() {
                if sender.send(Message::Text(payload)).await.is_err() {
                    return;
                }
            }

            if let Some(payload) = pending_state.take() {
                if sender.send(Message::Text(payload.to_string())).await.is_err() {
                    return;
                }
            }

            for payload in pending_lo.drain(..pending_lo.len().min(LO_SENDS_PER_WAKE)) {
                if sender.send(Message::Text(payload)).await.is_err() {
                    return;
                }
            }
        }
    });

    while let Some(result) = receiver.next().await {
        let Ok(message) = result else { break };
        match message {
            Message::Text(text) => match decode_client_message(&text) {
                Ok(message) => room.send(session_id, message),
                Err(error) => debug!(%session_id, %error, "ignoring client frame"),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    room.disconnect(session_id);
    send_task.abort();
    info!(%session_id, "client disconnected");
}

fn pull_lo(outbound_lo_rx: &mut mpsc::Receiver<String>, pending_lo: &mut VecDeque<String>) {
    while pending_lo.len() < LO_PENDING_LIMIT {
        let Ok(payload) = outbound_lo_rx.try_recv() else { break };
        pending_lo.push_back(payload);
    }
}
