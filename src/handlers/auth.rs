// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    middleware::papel::{PapelMaximo, RequerPapel},
    models::auth::{
        AuthResponse, CreateUsuarioPayload, LoginUsuarioPayload, RegisterUsuarioPayload, Usuario,
    },
};

// Handler de registro (bootstrap do primeiro usuário MAXIMO)
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUsuarioPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .registrar_bootstrap(&payload.nome, &payload.email, &payload.cpf, &payload.senha)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// Handler de login
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUsuarioPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .login_user(&payload.email, &payload.senha)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// Handler da rota protegida /me
pub async fn get_me(AuthenticatedUser(usuario): AuthenticatedUser) -> Json<Usuario> {
    Json(usuario)
}

// Criação de usuários, restrita ao papel MAXIMO
pub async fn create_usuario(
    State(app_state): State<AppState>,
    _guard: RequerPapel<PapelMaximo>,
    Json(payload): Json<CreateUsuarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let usuario = app_state
        .auth_service
        .criar_usuario(
            &payload.nome,
            &payload.email,
            &payload.cpf,
            &payload.senha,
            payload.papel,
            &payload.filiais,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(usuario)))
}
