use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use warp::Filter;
use warp::Reply;
use warp::http::StatusCode;

use crate::auth::AuthService;
use crate::sessions::SessionManager;
use history_core::{DEFAULT_BOARD_SIZE, STARTING_FEN, render_board, to_svg};
use history_types::{ErrorResponse, HistoryError, Principal, ScreenEvent};

pub mod auth;
pub mod config;
pub mod sessions;

#[derive(Debug, Deserialize)]
struct BoardQuery {
    fen: Option<String>,
    size: Option<f64>,
}

pub fn create_routes(
    session_manager: Arc<SessionManager>,
    auth_service: Arc<AuthService>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let sessions_filter = warp::any().map({
        let session_manager = session_manager.clone();
        move || session_manager.clone()
    });

    let auth_filter = warp::any().map({
        let auth_service = auth_service.clone();
        move || auth_service.clone()
    });

    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    // Sign in with a Clerk session token
    let sign_in = warp::path!("auth" / "session")
        .and(warp::post())
        .and(warp::header::optional::<String>("authorization"))
        .and(sessions_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_sign_in);

    // Guest mode
    let bypass = warp::path!("auth" / "bypass")
        .and(warp::post())
        .and(sessions_filter.clone())
        .and_then(handle_bypass);

    let sign_out = warp::path!("auth" / "session" / String)
        .and(warp::delete())
        .and(sessions_filter.clone())
        .and_then(handle_sign_out);

    let screen = warp::path!("screen" / String)
        .and(warp::get())
        .and(sessions_filter.clone())
        .and_then(handle_screen_request);

    let events = warp::path!("screen" / String / "events")
        .and(warp::post())
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json::<ScreenEvent>())
        .and(sessions_filter.clone())
        .and_then(handle_screen_event);

    let games = warp::path!("games" / String / String)
        .and(warp::get())
        .and(sessions_filter.clone())
        .and_then(handle_games_request);

    let board = warp::path!("board")
        .and(warp::get())
        .and(warp::query::<BoardQuery>())
        .and_then(handle_board_request);

    let board_svg = warp::path!("board.svg")
        .and(warp::get())
        .and(warp::query::<BoardQuery>())
        .and_then(handle_board_svg_request);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST", "DELETE"]);

    health
        .or(sign_in)
        .or(bypass)
        .or(sign_out)
        .or(screen)
        .or(events)
        .or(games)
        .or(board)
        .or(board_svg)
        .with(cors)
        .with(warp::log("chess_history"))
}

fn status_for(error: &HistoryError) -> StatusCode {
    match error {
        HistoryError::InvalidDate { .. } | HistoryError::InvalidEvent { .. } => {
            StatusCode::BAD_REQUEST
        }
        HistoryError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
        HistoryError::AuthenticationRequired
        | HistoryError::InvalidToken
        | HistoryError::SessionExpired => StatusCode::UNAUTHORIZED,
        HistoryError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_reply(error: HistoryError) -> warp::reply::WithStatus<warp::reply::Json> {
    let status = status_for(&error);
    warp::reply::with_status(warp::reply::json(&ErrorResponse::from(error)), status)
}

fn parse_session_id(raw: &str) -> Result<Uuid, HistoryError> {
    Uuid::parse_str(raw).map_err(|_| HistoryError::InvalidEvent {
        message: "Invalid session ID format".to_string(),
    })
}

async fn handle_sign_in(
    auth_header: Option<String>,
    session_manager: Arc<SessionManager>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let Some(auth_header) = auth_header else {
        return Ok(error_reply(HistoryError::AuthenticationRequired));
    };
    let token = auth_header.strip_prefix("Bearer ").unwrap_or(&auth_header);

    match auth_service.validate_token(token).await {
        Ok(user) => {
            let info = session_manager.create_session(Principal::User(user)).await;
            Ok(warp::reply::with_status(
                warp::reply::json(&info),
                StatusCode::CREATED,
            ))
        }
        Err(e) => {
            tracing::warn!("Sign-in rejected: {}", e);
            Ok(error_reply(e.into()))
        }
    }
}

async fn handle_bypass(
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let info = session_manager.create_session(Principal::Guest).await;
    Ok(warp::reply::with_status(
        warp::reply::json(&info),
        StatusCode::CREATED,
    ))
}

async fn handle_sign_out(
    session_id: String,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = match parse_session_id(&session_id) {
        Ok(id) => session_manager.end_session(id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({ "signed_out": true })),
            StatusCode::OK,
        )),
        Err(e) => Ok(error_reply(e)),
    }
}

async fn handle_screen_request(
    session_id: String,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = match parse_session_id(&session_id) {
        Ok(id) => session_manager.view(id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(view) => Ok(warp::reply::with_status(
            warp::reply::json(&view),
            StatusCode::OK,
        )),
        Err(e) => Ok(error_reply(e)),
    }
}

async fn handle_screen_event(
    session_id: String,
    event: ScreenEvent,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = match parse_session_id(&session_id) {
        Ok(id) => session_manager.apply_event(id, event).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(view) => Ok(warp::reply::with_status(
            warp::reply::json(&view),
            StatusCode::OK,
        )),
        Err(e) => {
            tracing::debug!("Screen event for {} failed: {}", session_id, e);
            Ok(error_reply(e))
        }
    }
}

async fn handle_games_request(
    session_id: String,
    date: String,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let result = match parse_session_id(&session_id) {
        Ok(id) => session_manager.games_on(id, &date).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(games) => Ok(warp::reply::with_status(
            warp::reply::json(&games),
            StatusCode::OK,
        )),
        Err(e) => Ok(error_reply(e)),
    }
}

fn board_size(query: &BoardQuery) -> Result<f64, HistoryError> {
    match query.size {
        None => Ok(DEFAULT_BOARD_SIZE),
        Some(size) if size.is_finite() && size > 0.0 => Ok(size),
        Some(size) => Err(HistoryError::InvalidEvent {
            message: format!("Invalid board size: {}", size),
        }),
    }
}

async fn handle_board_request(query: BoardQuery) -> Result<impl warp::Reply, warp::Rejection> {
    match board_size(&query) {
        Ok(size) => {
            let fen = query.fen.as_deref().unwrap_or(STARTING_FEN);
            Ok(warp::reply::with_status(
                warp::reply::json(&render_board(fen, size)),
                StatusCode::OK,
            ))
        }
        Err(e) => Ok(error_reply(e)),
    }
}

async fn handle_board_svg_request(
    query: BoardQuery,
) -> Result<warp::reply::Response, warp::Rejection> {
    match board_size(&query) {
        Ok(size) => {
            let fen = query.fen.as_deref().unwrap_or(STARTING_FEN);
            let svg = to_svg(&render_board(fen, size));
            Ok(warp::reply::with_header(svg, "content-type", "image/svg+xml").into_response())
        }
        Err(e) => Ok(error_reply(e).into_response()),
    }
}
