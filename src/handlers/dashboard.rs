// src/handlers/dashboard.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError, config::AppState, middleware::escopo::Escopo,
    models::dashboard::ResumoDashboard,
};

// Visão geral: contagens por estado e transações abertas, já recortadas
// pelo escopo do usuário.
// GET /api/dashboard/resumo
#[utoipa::path(
    get,
    path = "/api/dashboard/resumo",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Resumo do inventário no escopo do usuário", body = ResumoDashboard)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_resumo(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
) -> Result<impl IntoResponse, AppError> {
    let resumo = app_state.dashboard_service.resumo(&escopo).await?;
    Ok((StatusCode::OK, Json(resumo)))
}
