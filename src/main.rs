use axum::{
  extract::{State, WebSocketUpgrade},
  http::{Method, StatusCode},
  response::IntoResponse,
  routing::get,
  Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod game;
mod protocol;
mod shared;
mod transport;

use config::ServerConfig;
use game::room::{Room, RoomHandle};
use game::world::World;

#[derive(Clone)]
struct AppState {
  room: RoomHandle,
}

#[derive(Debug, Serialize)]
struct OkResponse {
  ok: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
  ok: bool,
  error: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let server_config = ServerConfig::load_or_default();
  let game_config = Arc::new(server_config.game_config()?);
  tracing::info!(
    width = game_config.world_width,
    height = game_config.world_height,
    tick_rate = game_config.tick_rate,
    bots = game_config.bot_count,
    "game config loaded"
  );

  let mut world = World::from_entropy(game_config);
  world.populate();
  let (room, room_task) = Room::spawn(world);

  let state = Arc::new(AppState { room: room.clone() });

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET])
    .allow_headers(Any);

  let app: Router = Router::new()
    .route("/api/health", get(health))
    .route("/api/leaderboard", get(leaderboard))
    .route("/api/stats", get(stats))
    .route("/api/world", get(ws_handler))
    .layer(cors)
    .with_state(state);

  let address = server_config.socket_addr();
  tracing::info!("listening on {address}");

  let listener = tokio::net::TcpListener::bind(address).await?;
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  room.shutdown();
  room_task.await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(error) = tokio::signal::ctrl_c().await {
    tracing::warn!(%error, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutdown requested");
}

fn room_unavailable() -> axum::response::Response {
  (
    StatusCode::SERVICE_UNAVAILABLE,
    Json(ErrorResponse {
      ok: false,
      error: "Room is not running".to_string(),
    }),
  )
    .into_response()
}

async fn health() -> impl IntoResponse {
  Json(OkResponse { ok: true })
}

async fn leaderboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  match state.room.leaderboard().await {
    Some(entries) => (StatusCode::OK, Json(entries)).into_response(),
    None => room_unavailable(),
  }
}

async fn stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  match state.room.stats().await {
    Some(stats) => (StatusCode::OK, Json(stats)).into_response(),
    None => room_unavailable(),
  }
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let room = state.room.clone();
  ws.on_upgrade(move |socket| transport::ws_session::handle_socket(socket, room))
}
