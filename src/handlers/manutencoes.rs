// src/handlers/manutencoes.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        escopo::Escopo,
        papel::{PapelAdministrador, RequerPapel},
    },
    models::manutencao::{Manutencao, TipoManutencao},
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateManutencaoPayload {
    pub ferramenta_id: Uuid,
    /// PREVENTIVA ou CORRETIVA; imutável depois da criação.
    pub tipo: TipoManutencao,
    /// Quando omitida, assume a data de hoje.
    pub data_inicio: Option<NaiveDate>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EncerrarManutencaoPayload {
    /// Quando omitida, assume a data de hoje.
    pub data_fim: Option<NaiveDate>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateManutencaoPayload {
    /// Reenviar o mesmo tipo é aceito; trocá-lo é rejeitado.
    pub tipo: Option<TipoManutencao>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListarManutencoesQuery {
    pub ativo: Option<bool>,
}

// ---
// Handlers
// ---

// POST /api/manutencoes
#[utoipa::path(
    post,
    path = "/api/manutencoes",
    tag = "Manutencoes",
    request_body = CreateManutencaoPayload,
    responses(
        (status = 201, description = "Manutenção aberta; a ferramenta passa a EM_MANUTENCAO", body = Manutencao),
        (status = 409, description = "Ferramenta indisponível")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_manutencao(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Json(payload): Json<CreateManutencaoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let manutencao = app_state
        .manutencao_service
        .abrir(
            &escopo,
            payload.ferramenta_id,
            payload.tipo,
            payload.data_inicio,
            payload.observacoes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(manutencao)))
}

// GET /api/manutencoes
#[utoipa::path(
    get,
    path = "/api/manutencoes",
    tag = "Manutencoes",
    params(
        ("ativo" = Option<bool>, Query, description = "Filtra por abertas/encerradas")
    ),
    responses(
        (status = 200, description = "Manutenções visíveis no escopo do usuário", body = [Manutencao])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_manutencoes(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Query(query): Query<ListarManutencoesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let manutencoes = app_state
        .manutencao_service
        .listar(&escopo, query.ativo)
        .await?;
    Ok((StatusCode::OK, Json(manutencoes)))
}

// GET /api/manutencoes/{id}
#[utoipa::path(
    get,
    path = "/api/manutencoes/{id}",
    tag = "Manutencoes",
    params(("id" = Uuid, Path, description = "ID da Manutenção")),
    responses(
        (status = 200, description = "Manutenção encontrada", body = Manutencao)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_manutencao(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let manutencao = app_state.manutencao_service.buscar(&escopo, id).await?;
    Ok((StatusCode::OK, Json(manutencao)))
}

// POST /api/manutencoes/{id}/encerrar
#[utoipa::path(
    post,
    path = "/api/manutencoes/{id}/encerrar",
    tag = "Manutencoes",
    request_body = EncerrarManutencaoPayload,
    params(("id" = Uuid, Path, description = "ID da Manutenção")),
    responses(
        (status = 200, description = "Manutenção encerrada com os campos históricos preenchidos", body = Manutencao),
        (status = 409, description = "Manutenção já encerrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn encerrar_manutencao(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
    Json(payload): Json<EncerrarManutencaoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let manutencao = app_state
        .manutencao_service
        .encerrar(&escopo, id, payload.data_fim, payload.observacoes.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(manutencao)))
}

// PATCH /api/manutencoes/{id}
#[utoipa::path(
    patch,
    path = "/api/manutencoes/{id}",
    tag = "Manutencoes",
    request_body = UpdateManutencaoPayload,
    params(("id" = Uuid, Path, description = "ID da Manutenção")),
    responses(
        (status = 200, description = "Manutenção atualizada (o tipo nunca muda)", body = Manutencao),
        (status = 409, description = "Tentativa de trocar o tipo")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_manutencao(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateManutencaoPayload>,
) -> Result<impl IntoResponse, AppError> {
    let manutencao = app_state
        .manutencao_service
        .atualizar(&escopo, id, payload.tipo, payload.observacoes.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(manutencao)))
}

// DELETE /api/manutencoes/{id}
#[utoipa::path(
    delete,
    path = "/api/manutencoes/{id}",
    tag = "Manutencoes",
    params(("id" = Uuid, Path, description = "ID da Manutenção")),
    responses(
        (status = 204, description = "Manutenção removida")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_manutencao(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.manutencao_service.excluir(&escopo, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
