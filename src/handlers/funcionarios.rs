// src/handlers/funcionarios.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        escopo::Escopo,
        papel::{PapelAdministrador, RequerPapel},
    },
};

// ---
// Validação Customizada
// ---
fn validate_matricula(matricula: &str) -> Result<(), ValidationError> {
    if matricula.is_empty() || !matricula.chars().all(|c| c.is_ascii_digit()) {
        let mut err = ValidationError::new("matricula");
        err.message = Some("Somente números são permitidos.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFuncionarioPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,

    #[validate(custom(function = "validate_matricula"))]
    pub matricula: String,

    #[validate(length(min = 11, max = 14, message = "O CPF fornecido é inválido."))]
    pub cpf: String,

    pub setor_id: Option<Uuid>,
    pub cargo_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O funcionário precisa de ao menos uma filial."))]
    pub filiais: Vec<Uuid>,
}

// Matrícula e CPF são identidade; não aparecem no update.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFuncionarioPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,

    pub setor_id: Option<Uuid>,
    pub cargo_id: Option<Uuid>,
    pub ativo: bool,

    /// Quando presente, substitui o conjunto de filiais do funcionário.
    pub filiais: Option<Vec<Uuid>>,
}

// ---
// Handlers
// ---

pub async fn create_funcionario(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Escopo(escopo): Escopo,
    Json(payload): Json<CreateFuncionarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let funcionario = app_state
        .funcionario_service
        .criar(
            &escopo,
            &payload.nome,
            &payload.matricula,
            &payload.cpf,
            payload.setor_id,
            payload.cargo_id,
            &payload.filiais,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(funcionario)))
}

pub async fn list_funcionarios(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
) -> Result<impl IntoResponse, AppError> {
    let funcionarios = app_state.funcionario_service.listar(&escopo).await?;
    Ok((StatusCode::OK, Json(funcionarios)))
}

pub async fn get_funcionario(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let funcionario = app_state.funcionario_service.buscar(&escopo, id).await?;
    Ok((StatusCode::OK, Json(funcionario)))
}

/// Inativação (`ativo=false`) é rejeitada enquanto o funcionário tiver
/// empréstimos abertos.
pub async fn update_funcionario(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateFuncionarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let funcionario = app_state
        .funcionario_service
        .atualizar(
            &escopo,
            id,
            &payload.nome,
            payload.setor_id,
            payload.cargo_id,
            payload.ativo,
            payload.filiais.as_deref(),
        )
        .await?;
    Ok((StatusCode::OK, Json(funcionario)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matricula_somente_com_digitos_e_aceita() {
        assert!(validate_matricula("00123").is_ok());
    }

    #[test]
    fn matricula_vazia_ou_com_letras_e_rejeitada() {
        assert!(validate_matricula("").is_err());
        assert!(validate_matricula("12a45").is_err());
        assert!(validate_matricula("12 45").is_err());
    }
}
