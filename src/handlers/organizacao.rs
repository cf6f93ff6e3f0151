// src/handlers/organizacao.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        escopo::Escopo,
        papel::{PapelAdministrador, PapelMaximo, RequerPapel},
    },
    models::organizacao::{Deposito, Filial, RelatorioDesativacao},
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilialPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    pub descricao: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepositoPayload {
    pub filial_id: Uuid,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    pub descricao: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepositoPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    pub descricao: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListarFiliaisQuery {
    pub ativo: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListarDepositosQuery {
    pub filial_id: Option<Uuid>,
}

// O modo simulação roda só a checagem de bloqueio, sem mutar nada.
#[derive(Debug, Deserialize)]
pub struct DesativarQuery {
    #[serde(default)]
    pub simular: bool,
}

// ---
// Filiais
// ---

// POST /api/filiais
#[utoipa::path(
    post,
    path = "/api/filiais",
    tag = "Organizacao",
    request_body = FilialPayload,
    responses(
        (status = 201, description = "Filial criada", body = Filial)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_filial(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Json(payload): Json<FilialPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let filial = app_state
        .organizacao_service
        .criar_filial(&payload.nome, payload.descricao.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(filial)))
}

// GET /api/filiais
#[utoipa::path(
    get,
    path = "/api/filiais",
    tag = "Organizacao",
    params(("ativo" = Option<bool>, Query, description = "Filtra por ativas/inativas")),
    responses(
        (status = 200, description = "Filiais visíveis no escopo do usuário", body = [Filial])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_filiais(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Query(query): Query<ListarFiliaisQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filiais = app_state
        .organizacao_service
        .listar_filiais(&escopo, query.ativo)
        .await?;
    Ok((StatusCode::OK, Json(filiais)))
}

// GET /api/filiais/{id}
#[utoipa::path(
    get,
    path = "/api/filiais/{id}",
    tag = "Organizacao",
    params(("id" = Uuid, Path, description = "ID da Filial")),
    responses(
        (status = 200, description = "Filial encontrada", body = Filial)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_filial(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let filial = app_state.organizacao_service.buscar_filial(&escopo, id).await?;
    Ok((StatusCode::OK, Json(filial)))
}

// PUT /api/filiais/{id}
#[utoipa::path(
    put,
    path = "/api/filiais/{id}",
    tag = "Organizacao",
    request_body = FilialPayload,
    params(("id" = Uuid, Path, description = "ID da Filial")),
    responses(
        (status = 200, description = "Filial atualizada", body = Filial)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_filial(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FilialPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let filial = app_state
        .organizacao_service
        .atualizar_filial(id, &payload.nome, payload.descricao.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(filial)))
}

/// Desativação em cascata, restrita ao MAXIMO. `?simular=true` devolve o
/// relatório de bloqueios sem executar nada.
// POST /api/filiais/{id}/desativar
#[utoipa::path(
    post,
    path = "/api/filiais/{id}/desativar",
    tag = "Organizacao",
    params(
        ("id" = Uuid, Path, description = "ID da Filial"),
        ("simular" = Option<bool>, Query, description = "Só checa os bloqueios, sem mutar nada")
    ),
    responses(
        (status = 200, description = "Filial desativada em cascata, ou relatório da simulação", body = RelatorioDesativacao),
        (status = 409, description = "Ferramentas emprestadas ou em manutenção bloqueiam a cascata")
    ),
    security(("api_jwt" = []))
)]
pub async fn desativar_filial(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelMaximo>,
    Path(id): Path<Uuid>,
    Query(query): Query<DesativarQuery>,
) -> Result<impl IntoResponse, AppError> {
    if query.simular {
        let relatorio = app_state
            .organizacao_service
            .simular_desativacao_filial(id)
            .await?;
        return Ok((StatusCode::OK, Json(relatorio)).into_response());
    }

    let filial = app_state.organizacao_service.desativar_filial(id).await?;
    Ok((StatusCode::OK, Json(filial)).into_response())
}

// POST /api/filiais/{id}/reativar
#[utoipa::path(
    post,
    path = "/api/filiais/{id}/reativar",
    tag = "Organizacao",
    params(("id" = Uuid, Path, description = "ID da Filial")),
    responses(
        (status = 200, description = "Filial reativada com seus depósitos e ferramentas", body = Filial)
    ),
    security(("api_jwt" = []))
)]
pub async fn reativar_filial(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelMaximo>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let filial = app_state.organizacao_service.reativar_filial(id).await?;
    Ok((StatusCode::OK, Json(filial)))
}

// ---
// Depósitos
// ---

// POST /api/depositos
#[utoipa::path(
    post,
    path = "/api/depositos",
    tag = "Organizacao",
    request_body = CreateDepositoPayload,
    responses(
        (status = 201, description = "Depósito criado", body = Deposito)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_deposito(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Json(payload): Json<CreateDepositoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let deposito = app_state
        .organizacao_service
        .criar_deposito(payload.filial_id, &payload.nome, payload.descricao.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(deposito)))
}

// GET /api/depositos
#[utoipa::path(
    get,
    path = "/api/depositos",
    tag = "Organizacao",
    params(("filialId" = Option<Uuid>, Query, description = "Filtra por filial")),
    responses(
        (status = 200, description = "Depósitos visíveis no escopo do usuário", body = [Deposito])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_depositos(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Query(query): Query<ListarDepositosQuery>,
) -> Result<impl IntoResponse, AppError> {
    let depositos = app_state
        .organizacao_service
        .listar_depositos(&escopo, query.filial_id)
        .await?;
    Ok((StatusCode::OK, Json(depositos)))
}

// GET /api/depositos/{id}
#[utoipa::path(
    get,
    path = "/api/depositos/{id}",
    tag = "Organizacao",
    params(("id" = Uuid, Path, description = "ID do Depósito")),
    responses(
        (status = 200, description = "Depósito encontrado", body = Deposito)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_deposito(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deposito = app_state.organizacao_service.buscar_deposito(&escopo, id).await?;
    Ok((StatusCode::OK, Json(deposito)))
}

// PUT /api/depositos/{id}
#[utoipa::path(
    put,
    path = "/api/depositos/{id}",
    tag = "Organizacao",
    request_body = UpdateDepositoPayload,
    params(("id" = Uuid, Path, description = "ID do Depósito")),
    responses(
        (status = 200, description = "Depósito atualizado", body = Deposito)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_deposito(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDepositoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let deposito = app_state
        .organizacao_service
        .atualizar_deposito(&escopo, id, &payload.nome, payload.descricao.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(deposito)))
}

// POST /api/depositos/{id}/desativar
#[utoipa::path(
    post,
    path = "/api/depositos/{id}/desativar",
    tag = "Organizacao",
    params(
        ("id" = Uuid, Path, description = "ID do Depósito"),
        ("simular" = Option<bool>, Query, description = "Só checa os bloqueios, sem mutar nada")
    ),
    responses(
        (status = 200, description = "Depósito desativado com suas ferramentas, ou relatório da simulação", body = RelatorioDesativacao),
        (status = 409, description = "Ferramentas emprestadas ou em manutenção bloqueiam a cascata")
    ),
    security(("api_jwt" = []))
)]
pub async fn desativar_deposito(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelMaximo>,
    Path(id): Path<Uuid>,
    Query(query): Query<DesativarQuery>,
) -> Result<impl IntoResponse, AppError> {
    if query.simular {
        let relatorio = app_state
            .organizacao_service
            .simular_desativacao_deposito(id)
            .await?;
        return Ok((StatusCode::OK, Json(relatorio)).into_response());
    }

    let deposito = app_state.organizacao_service.desativar_deposito(id).await?;
    Ok((StatusCode::OK, Json(deposito)).into_response())
}

// POST /api/depositos/{id}/reativar
#[utoipa::path(
    post,
    path = "/api/depositos/{id}/reativar",
    tag = "Organizacao",
    params(("id" = Uuid, Path, description = "ID do Depósito")),
    responses(
        (status = 200, description = "Depósito reativado com suas ferramentas", body = Deposito)
    ),
    security(("api_jwt" = []))
)]
pub async fn reativar_deposito(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelMaximo>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let deposito = app_state.organizacao_service.reativar_deposito(id).await?;
    Ok((StatusCode::OK, Json(deposito)))
}
