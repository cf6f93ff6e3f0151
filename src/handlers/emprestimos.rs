// src/handlers/emprestimos.rs

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
    models::emprestimo::Emprestimo,
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmprestimoPayload {
    pub ferramenta_id: Uuid,
    pub funcionario_id: Uuid,
    /// Quando omitida, assume a data de hoje.
    pub data_emprestimo: Option<NaiveDate>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EncerrarEmprestimoPayload {
    /// Quando omitida, assume a data de hoje.
    pub data_devolucao: Option<NaiveDate>,
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmprestimoPayload {
    pub observacoes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListarEmprestimosQuery {
    pub ativo: Option<bool>,
}

// ---
// Handlers
// ---

/// Abre um empréstimo: a ferramenta precisa estar DISPONIVEL e o
/// funcionário precisa pertencer à filial dela.
// POST /api/emprestimos
#[utoipa::path(
    post,
    path = "/api/emprestimos",
    tag = "Emprestimos",
    request_body = CreateEmprestimoPayload,
    responses(
        (status = 201, description = "Empréstimo aberto; a ferramenta passa a EMPRESTADA", body = Emprestimo),
        (status = 409, description = "Ferramenta indisponível ou funcionário fora da filial")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_emprestimo(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Json(payload): Json<CreateEmprestimoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let emprestimo = app_state
        .emprestimo_service
        .abrir(
            &escopo,
            payload.ferramenta_id,
            payload.funcionario_id,
            payload.data_emprestimo,
            payload.observacoes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(emprestimo)))
}

// GET /api/emprestimos
#[utoipa::path(
    get,
    path = "/api/emprestimos",
    tag = "Emprestimos",
    params(
        ("ativo" = Option<bool>, Query, description = "Filtra por abertos/encerrados")
    ),
    responses(
        (status = 200, description = "Empréstimos visíveis no escopo do usuário", body = [Emprestimo])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_emprestimos(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Query(query): Query<ListarEmprestimosQuery>,
) -> Result<impl IntoResponse, AppError> {
    let emprestimos = app_state
        .emprestimo_service
        .listar(&escopo, query.ativo)
        .await?;
    Ok((StatusCode::OK, Json(emprestimos)))
}

// GET /api/emprestimos/{id}
#[utoipa::path(
    get,
    path = "/api/emprestimos/{id}",
    tag = "Emprestimos",
    params(("id" = Uuid, Path, description = "ID do Empréstimo")),
    responses(
        (status = 200, description = "Empréstimo encontrado", body = Emprestimo)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_emprestimo(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let emprestimo = app_state.emprestimo_service.buscar(&escopo, id).await?;
    Ok((StatusCode::OK, Json(emprestimo)))
}

/// Encerra o empréstimo: snapshot + devolução da ferramenta + anulação das
/// referências, em uma transação só.
// POST /api/emprestimos/{id}/encerrar
#[utoipa::path(
    post,
    path = "/api/emprestimos/{id}/encerrar",
    tag = "Emprestimos",
    request_body = EncerrarEmprestimoPayload,
    params(("id" = Uuid, Path, description = "ID do Empréstimo")),
    responses(
        (status = 200, description = "Empréstimo encerrado com os campos históricos preenchidos", body = Emprestimo),
        (status = 409, description = "Empréstimo já encerrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn encerrar_emprestimo(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
    Json(payload): Json<EncerrarEmprestimoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let emprestimo = app_state
        .emprestimo_service
        .encerrar(
            &escopo,
            id,
            payload.data_devolucao,
            payload.observacoes.as_deref(),
        )
        .await?;
    Ok((StatusCode::OK, Json(emprestimo)))
}

// PATCH /api/emprestimos/{id}
#[utoipa::path(
    patch,
    path = "/api/emprestimos/{id}",
    tag = "Emprestimos",
    request_body = UpdateEmprestimoPayload,
    params(("id" = Uuid, Path, description = "ID do Empréstimo")),
    responses(
        (status = 200, description = "Empréstimo atualizado (apenas enquanto aberto)", body = Emprestimo)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_emprestimo(
    State(app_state): State<AppState>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEmprestimoPayload>,
) -> Result<impl IntoResponse, AppError> {
    let emprestimo = app_state
        .emprestimo_service
        .atualizar(&escopo, id, payload.observacoes.as_deref())
        .await?;
    Ok((StatusCode::OK, Json(emprestimo)))
}

/// Exclusão física (rara). A ferramenta é liberada antes da remoção, se
/// este empréstimo é quem a segura.
// DELETE /api/emprestimos/{id}
#[utoipa::path(
    delete,
    path = "/api/emprestimos/{id}",
    tag = "Emprestimos",
    params(("id" = Uuid, Path, description = "ID do Empréstimo")),
    responses(
        (status = 204, description = "Empréstimo removido")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_emprestimo(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelAdministrador>,
    Escopo(escopo): Escopo,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.emprestimo_service.excluir(&escopo, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
