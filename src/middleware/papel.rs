// src/middleware/papel.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{PapelUsuario, Usuario},
};

/// 1. O Trait que define quais papéis uma rota exige
pub trait PapelDef: Send + Sync + 'static {
    fn permite(papel: PapelUsuario) -> bool;
}

/// 2. O Extractor (Guardião)
pub struct RequerPapel<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts

impl<T, S> FromRequestParts<S> for RequerPapel<T>
where
    T: PapelDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let usuario = parts
            .extensions
            .get::<Usuario>()
            .ok_or(AppError::TokenInvalido)?;

        if !T::permite(usuario.papel) {
            return Err(AppError::PapelInsuficiente);
        }

        Ok(RequerPapel(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

/// Ações administrativas de maior privilégio (desativar filial, criar
/// usuários).
pub struct PapelMaximo;
impl PapelDef for PapelMaximo {
    fn permite(papel: PapelUsuario) -> bool {
        papel == PapelUsuario::Maximo
    }
}

/// Gestão de cadastros (ferramentas, funcionários, depósitos).
pub struct PapelAdministrador;
impl PapelDef for PapelAdministrador {
    fn permite(papel: PapelUsuario) -> bool {
        matches!(papel, PapelUsuario::Maximo | PapelUsuario::Administrador)
    }
}
