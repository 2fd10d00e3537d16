//! Leaderboard handler.
//!
//! ```text
//! GET /api/v1/ranking?limit=5
//! ```

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::ports::RankingEntry;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, RankingEntrySchema};
use crate::inbound::http::state::HttpState;

/// Query string for `GET /api/v1/ranking`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RankingParams {
    /// Rows to return; defaults to 10 and is clamped to 1..=100.
    pub limit: Option<i64>,
}

impl RankingParams {
    /// Non-positive limits clamp to the minimum rather than failing.
    fn requested_limit(&self) -> Option<usize> {
        self.limit.map(|n| usize::try_from(n).unwrap_or(0))
    }
}

/// Users ordered by points, highest first.
#[utoipa::path(
    get,
    path = "/api/v1/ranking",
    params(RankingParams),
    responses(
        (status = 200, description = "Leaderboard", body = [RankingEntrySchema]),
        (status = 400, description = "Malformed limit", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["ranking"],
    operation_id = "getRanking",
    security([])
)]
#[get("/ranking")]
pub async fn ranking(
    state: web::Data<HttpState>,
    params: web::Query<RankingParams>,
) -> ApiResult<web::Json<Vec<RankingEntry>>> {
    let entries = state.ranking.top(params.requested_limit()).await?;
    Ok(web::Json(entries))
}
