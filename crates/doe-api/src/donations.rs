use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::info;

use doe_types::api::{DonateRequest, DonateResponse};
use doe_types::models::LeaderboardEntry;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::{run_blocking, validate};

pub const LEADERBOARD_SIZE: u32 = 10;

/// Record a donation and hand back the simulated PIX payload. No payment is
/// taken; the ledger row is written before anything is "paid".
pub async fn donate(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DonateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = validate::required(req.username, "username")?;
    let amount = validate::amount(req.amount)?;

    let created_at = chrono::Utc::now().to_rfc3339();
    let db = state.clone();
    let u = username.clone();
    let donation_id = run_blocking(move || db.db.insert_donation(&u, amount, &created_at)).await?;

    info!("Donation {} recorded: {:.2} from '{}'", donation_id, amount, username);

    Ok((
        StatusCode::CREATED,
        Json(DonateResponse {
            message: "Donation recorded. Awaiting payment.".into(),
            donation_id,
            qr_code_data: qr_code_data(amount, &username),
        }),
    ))
}

/// Top donors by total amount. Recomputed on every call; equal totals come
/// back in no particular order.
pub async fn leaderboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = run_blocking(move || db.db.top_donors(LEADERBOARD_SIZE)).await?;

    let entries: Vec<LeaderboardEntry> = rows
        .into_iter()
        .map(|row| LeaderboardEntry {
            username: row.username,
            total_amount: row.total_amount,
        })
        .collect();

    Ok(Json(entries))
}

fn qr_code_data(amount: f64, username: &str) -> String {
    format!("SimulacaoPIX_Valor_{:.2}_Para_{}", amount, username)
}
