// src/middleware/escopo.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{EscopoAcesso, Usuario},
};

// O extrator do escopo de acesso: calculado uma vez por requisição a
// partir do papel do usuário autenticado e passado explicitamente para os
// services. Coordenadores carregam o conjunto de filiais atribuídas.
#[derive(Debug, Clone)]
pub struct Escopo(pub EscopoAcesso);

impl<S> FromRequestParts<S> for Escopo
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let usuario = parts
            .extensions
            .get::<Usuario>()
            .cloned()
            .ok_or(AppError::TokenInvalido)?;

        let filiais = app_state
            .usuario_repo
            .filiais_do_usuario(usuario.id)
            .await?;

        Ok(Escopo(EscopoAcesso::para_usuario(usuario.papel, filiais)))
    }
}
