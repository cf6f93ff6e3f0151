// src/services/catalogo_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogoRepository,
    models::catalogo::{Cargo, Setor},
};

// CRUD fino sobre os dados de referência; nenhuma regra além da unicidade
// de nome (resolvida no repositório).
#[derive(Clone)]
pub struct CatalogoService {
    catalogo_repo: CatalogoRepository,
    pool: PgPool,
}

impl CatalogoService {
    pub fn new(catalogo_repo: CatalogoRepository, pool: PgPool) -> Self {
        Self { catalogo_repo, pool }
    }

    pub async fn criar_setor(
        &self,
        nome_setor: &str,
        descricao_setor: Option<&str>,
    ) -> Result<Setor, AppError> {
        self.catalogo_repo
            .criar_setor(&self.pool, nome_setor, descricao_setor)
            .await
    }

    pub async fn listar_setores(&self) -> Result<Vec<Setor>, AppError> {
        self.catalogo_repo.listar_setores().await
    }

    pub async fn atualizar_setor(
        &self,
        id: Uuid,
        nome_setor: &str,
        descricao_setor: Option<&str>,
        ativo: bool,
    ) -> Result<Setor, AppError> {
        self.catalogo_repo
            .buscar_setor(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Setor"))?;
        self.catalogo_repo
            .atualizar_setor(&self.pool, id, nome_setor, descricao_setor, ativo)
            .await
    }

    pub async fn criar_cargo(
        &self,
        nome_cargo: &str,
        descricao_cargo: Option<&str>,
    ) -> Result<Cargo, AppError> {
        self.catalogo_repo
            .criar_cargo(&self.pool, nome_cargo, descricao_cargo)
            .await
    }

    pub async fn listar_cargos(&self) -> Result<Vec<Cargo>, AppError> {
        self.catalogo_repo.listar_cargos().await
    }

    pub async fn atualizar_cargo(
        &self,
        id: Uuid,
        nome_cargo: &str,
        descricao_cargo: Option<&str>,
        ativo: bool,
    ) -> Result<Cargo, AppError> {
        self.catalogo_repo
            .buscar_cargo(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Cargo"))?;
        self.catalogo_repo
            .atualizar_cargo(&self.pool, id, nome_cargo, descricao_cargo, ativo)
            .await
    }
}
