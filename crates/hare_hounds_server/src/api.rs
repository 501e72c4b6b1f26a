//! REST API.
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | POST | `/hareandhounds/api/games` | 201 new match |
//! | PUT | `/hareandhounds/api/games/{gameId}` | 200 joined |
//! | GET | `/hareandhounds/api/games/{gameId}/state` | 200 state |
//! | GET | `/hareandhounds/api/games/{gameId}/board` | 200 pieces |
//! | POST | `/hareandhounds/api/games/{gameId}/turns` | 200 move accepted |
//!
//! Failures carry a `{status, reason}` body.

use crate::service::{GameInfo, MatchService, ServiceError};
use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State, rejection::JsonRejection},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use hare_hounds::{MatchId, MatchState, Move, MoveError, Piece, PieceKind, PlayerId, Position};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::{debug, error, info, instrument, warn};

/// Root of every game route.
pub const API_BASE: &str = "/hareandhounds/api/games";

/// Body of a create request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    /// Kind the creator plays.
    pub piece_type: PieceKind,
}

/// Body of a move request.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    /// The acting player.
    pub player_id: PlayerId,
    /// Origin rank.
    pub from_x: i32,
    /// Origin file.
    pub from_y: i32,
    /// Destination rank.
    pub to_x: i32,
    /// Destination file.
    pub to_y: i32,
}

impl TurnRequest {
    fn to_move(self) -> Move {
        Move::new(
            self.player_id,
            Position::new(self.from_x, self.from_y),
            Position::new(self.to_x, self.to_y),
        )
    }
}

/// Body of a state reply.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateReply {
    /// The match.
    pub game_id: MatchId,
    /// Its current state.
    pub state: MatchState,
}

/// Body of an accepted move.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TurnReply {
    /// Always `OK`.
    pub status: &'static str,
    /// State after the move.
    pub state: MatchState,
}

/// An API failure with its HTTP status and machine-readable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    reason: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: &'a str,
    reason: &'a str,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, reason: impl Into<String>) -> Self {
        Self {
            status,
            code,
            reason: reason.into(),
        }
    }

    fn bad_request(reason: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", reason)
    }

    fn unknown_game(reason: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "INVALID_GAME_ID", reason)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let reason = err.to_string();
        match err {
            ServiceError::NotFound(_) => Self::unknown_game(reason),
            ServiceError::AlreadyJoined(_) => Self::new(StatusCode::GONE, "ALREADY_JOINED", reason),
            ServiceError::Move(MoveError::InvalidPlayer(_)) => {
                Self::new(StatusCode::NOT_FOUND, "INVALID_PLAYER_ID", reason)
            }
            ServiceError::Move(MoveError::IncorrectTurn { .. }) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "INCORRECT_TURN", reason)
            }
            ServiceError::Move(MoveError::IllegalMove(_)) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, "ILLEGAL_MOVE", reason)
            }
            ServiceError::Storage(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_FAILURE", reason)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, reason = %self.reason, "Request failed");
        } else {
            debug!(code = self.code, reason = %self.reason, "Request rejected");
        }
        let body = ErrorBody {
            status: self.code,
            reason: &self.reason,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Parses a path segment as a match id. Anything unparseable names no match.
fn parse_game_id(raw: &str) -> Result<MatchId, ApiError> {
    raw.parse::<u64>()
        .map(MatchId::new)
        .map_err(|_| ApiError::unknown_game(format!("Match {} not found", raw)))
}

#[instrument(skip(service, payload))]
async fn create_game(
    State(service): State<Arc<MatchService>>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GameInfo>), ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Malformed create request");
        ApiError::bad_request(e.body_text())
    })?;
    let info = service.create(request.piece_type)?;
    Ok((StatusCode::CREATED, Json(info)))
}

#[instrument(skip(service))]
async fn join_game(
    State(service): State<Arc<MatchService>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameInfo>, ApiError> {
    let id = parse_game_id(&game_id)?;
    Ok(Json(service.join(id)?))
}

#[instrument(skip(service))]
async fn game_state(
    State(service): State<Arc<MatchService>>,
    Path(game_id): Path<String>,
) -> Result<Json<StateReply>, ApiError> {
    let id = parse_game_id(&game_id)?;
    let state = service.state(id)?;
    Ok(Json(StateReply { game_id: id, state }))
}

#[instrument(skip(service))]
async fn game_board(
    State(service): State<Arc<MatchService>>,
    Path(game_id): Path<String>,
) -> Result<Json<Vec<Piece>>, ApiError> {
    let id = parse_game_id(&game_id)?;
    Ok(Json(service.board(id)?))
}

#[instrument(skip(service, payload))]
async fn play_turn(
    State(service): State<Arc<MatchService>>,
    Path(game_id): Path<String>,
    payload: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<Json<TurnReply>, ApiError> {
    let id = parse_game_id(&game_id)?;
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Malformed turn request");
        ApiError::bad_request(e.body_text())
    })?;
    let state = service.play(id, request.to_move())?;
    Ok(Json(TurnReply { status: "OK", state }))
}

/// Builds the game routes over `service`.
pub fn router(service: Arc<MatchService>) -> Router {
    Router::new()
        .route(API_BASE, post(create_game))
        .route(&format!("{API_BASE}/{{game_id}}"), put(join_game))
        .route(&format!("{API_BASE}/{{game_id}}/state"), get(game_state))
        .route(&format!("{API_BASE}/{{game_id}}/board"), get(game_board))
        .route(&format!("{API_BASE}/{{game_id}}/turns"), post(play_turn))
        .with_state(service)
}

/// Wraps [`router`] with request logging.
pub fn app(service: Arc<MatchService>) -> Router {
    router(service).layer(
        ServiceBuilder::new()
            .map_request(|req: Request<Body>| {
                info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
                req
            })
            .map_response(|resp: Response| {
                info!(status = %resp.status(), "Response sent");
                resp
            }),
    )
}
