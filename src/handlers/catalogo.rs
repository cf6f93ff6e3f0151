// src/handlers/catalogo.rs

use axum::{
    extract::{Path, State},
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
    middleware::papel::{PapelAdministrador, RequerPapel},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetorPayload {
    #[validate(length(min = 1, message = "O nome do setor é obrigatório."))]
    pub nome_setor: String,
    pub descricao_setor: Option<String>,
    #[serde(default = "ativo_default")]
    pub ativo: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CargoPayload {
    #[validate(length(min = 1, message = "O nome do cargo é obrigatório."))]
    pub nome_cargo: String,
    pub descricao_cargo: Option<String>,
    #[serde(default = "ativo_default")]
    pub ativo: bool,
}

fn ativo_default() -> bool {
    true
}

// ---
// Setores
// ---

pub async fn create_setor(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Json(payload): Json<SetorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let setor = app_state
        .catalogo_service
        .criar_setor(&payload.nome_setor, payload.descricao_setor.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(setor)))
}

pub async fn list_setores(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let setores = app_state.catalogo_service.listar_setores().await?;
    Ok((StatusCode::OK, Json(setores)))
}

pub async fn update_setor(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let setor = app_state
        .catalogo_service
        .atualizar_setor(
            id,
            &payload.nome_setor,
            payload.descricao_setor.as_deref(),
            payload.ativo,
        )
        .await?;
    Ok((StatusCode::OK, Json(setor)))
}

// ---
// Cargos
// ---

pub async fn create_cargo(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Json(payload): Json<CargoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cargo = app_state
        .catalogo_service
        .criar_cargo(&payload.nome_cargo, payload.descricao_cargo.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(cargo)))
}

pub async fn list_cargos(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let cargos = app_state.catalogo_service.listar_cargos().await?;
    Ok((StatusCode::OK, Json(cargos)))
}

pub async fn update_cargo(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CargoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cargo = app_state
        .catalogo_service
        .atualizar_cargo(
            id,
            &payload.nome_cargo,
            payload.descricao_cargo.as_deref(),
            payload.ativo,
        )
        .await?;
    Ok((StatusCode::OK, Json(cargo)))
}
