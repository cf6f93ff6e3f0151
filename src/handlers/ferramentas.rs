// src/handlers/ferramentas.rs

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
    models::ferramenta::{EstadoFerramenta, Ferramenta},
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFerramentaPayload {
    pub deposito_id: Uuid,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,

    #[validate(length(min = 1, max = 50, message = "O número de série é obrigatório."))]
    pub numero_serie: String,

    pub descricao: Option<String>,
    pub data_aquisicao: NaiveDate,
}

// O numero_serie é identidade imutável: não aparece no update.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFerramentaPayload {
    pub deposito_id: Uuid,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,

    pub descricao: Option<String>,
    pub data_aquisicao: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ListarFerramentasQuery {
    pub estado: Option<EstadoFerramenta>,
}

// ---
// Handlers
// ---

// POST /api/ferramentas
#[utoipa::path(
    post,
    path = "/api/ferramentas",
    tag = "Ferramentas",
    request_body = CreateFerramentaPayload,
    responses(
        (status = 201, description = "Ferramenta cadastrada (nasce DISPONIVEL)", body = Ferramenta),
        (status = 409, description = "Número de série já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_ferramenta(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Escopo(escopo): Escopo,
    Json(payload): Json<CreateFerramentaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let ferramenta = app_state
        .ferramenta_service
        .criar(
            &escopo,
            payload.deposito_id,
            &payload.nome,
            &payload.numero_serie,
            payload.descricao.as_deref(),
            payload.data_aquisicao,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ferramenta)))
}

// GET /api/ferramentas
#[utoipa::path(
    get,
    path = "/api/ferramentas",
    tag = "Ferramentas",
    params(
        ("estado" = Option<EstadoFerramenta>, Query, description = "Filtra por estado")
    ),
    responses(
        (status = 200, description = "Ferramentas visíveis no escopo do usuário", body = [Ferramenta])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_ferramentas(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Query(query): Query<ListarFerramentasQuery>,
) -> Result<impl IntoResponse, AppError> {
    let ferramentas = app_state
        .ferramenta_service
        .listar(&escopo, query.estado)
        .await?;
    Ok((StatusCode::OK, Json(ferramentas)))
}

// GET /api/ferramentas/{id}
#[utoipa::path(
    get,
    path = "/api/ferramentas/{id}",
    tag = "Ferramentas",
    params(("id" = Uuid, Path, description = "ID da Ferramenta")),
    responses(
        (status = 200, description = "Ferramenta encontrada", body = Ferramenta)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_ferramenta(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let ferramenta = app_state.ferramenta_service.buscar(&escopo, id).await?;
    Ok((StatusCode::OK, Json(ferramenta)))
}

// PUT /api/ferramentas/{id}
#[utoipa::path(
    put,
    path = "/api/ferramentas/{id}",
    tag = "Ferramentas",
    request_body = UpdateFerramentaPayload,
    params(("id" = Uuid, Path, description = "ID da Ferramenta")),
    responses(
        (status = 200, description = "Ferramenta atualizada", body = Ferramenta)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_ferramenta(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFerramentaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let ferramenta = app_state
        .ferramenta_service
        .atualizar(
            &escopo,
            id,
            &payload.nome,
            payload.descricao.as_deref(),
            payload.data_aquisicao,
            payload.deposito_id,
        )
        .await?;
    Ok((StatusCode::OK, Json(ferramenta)))
}

/// Só a partir de DISPONIVEL; qualquer outro estado é rejeitado nomeando a
/// condição bloqueante.
// POST /api/ferramentas/{id}/desativar
#[utoipa::path(
    post,
    path = "/api/ferramentas/{id}/desativar",
    tag = "Ferramentas",
    params(("id" = Uuid, Path, description = "ID da Ferramenta")),
    responses(
        (status = 200, description = "Ferramenta inativada", body = Ferramenta),
        (status = 409, description = "Ferramenta emprestada ou em manutenção")
    ),
    security(("api_jwt" = []))
)]
pub async fn desativar_ferramenta(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let ferramenta = app_state.ferramenta_service.desativar(&escopo, id).await?;
    Ok((StatusCode::OK, Json(ferramenta)))
}

/// Só INATIVA -> DISPONIVEL.
// POST /api/ferramentas/{id}/reativar
#[utoipa::path(
    post,
    path = "/api/ferramentas/{id}/reativar",
    tag = "Ferramentas",
    params(("id" = Uuid, Path, description = "ID da Ferramenta")),
    responses(
        (status = 200, description = "Ferramenta de volta a DISPONIVEL", body = Ferramenta),
        (status = 409, description = "Ferramenta não está inativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn reativar_ferramenta(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let ferramenta = app_state.ferramenta_service.reativar(&escopo, id).await?;
    Ok((StatusCode::OK, Json(ferramenta)))
}
