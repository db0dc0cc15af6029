//! Server-sent snapshots of a collection.
//!
//! ```text
//! GET /api/live/products
//!
//! event: snapshot
//! data: [{"id":"…","name":"Lawn Suit",…}, …]      ◄── on connect
//!
//! event: snapshot
//! data: [ … ]                                      ◄── after every change
//! ```
//!
//! Each event carries the whole collection. The subscription ends when the
//! client disconnects and the stream is dropped.

use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::Router;
use futures_util::stream::{Stream, StreamExt};
use tracing::debug;

use loom_core::COLLECTIONS;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new().route("/api/live/{collection}", get(live))
}

async fn live(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    if !COLLECTIONS.contains(&collection.as_str()) {
        return Err(ApiError::not_found("Collection", &collection));
    }

    let snapshots = state.store()?.raw(&collection).watch();
    debug!(collection = %collection, "Live subscription opened");

    let events = snapshots.map(|documents| Event::default().event("snapshot").json_data(documents));
    Ok(Sse::new(events).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
