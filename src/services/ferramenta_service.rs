// src/services/ferramenta_service.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FerramentaRepository, OrganizacaoRepository},
    models::{
        auth::EscopoAcesso,
        ferramenta::{EstadoFerramenta, Ferramenta},
    },
};

#[derive(Clone)]
pub struct FerramentaService {
    ferramenta_repo: FerramentaRepository,
    organizacao_repo: OrganizacaoRepository,
    pool: PgPool,
}

impl FerramentaService {
    pub fn new(
        ferramenta_repo: FerramentaRepository,
        organizacao_repo: OrganizacaoRepository,
        pool: PgPool,
    ) -> Self {
        Self { ferramenta_repo, organizacao_repo, pool }
    }

    /// Única porta de mutação do estado: valida a tabela de transições
    /// antes de persistir. Nunca grava uma transição fora da tabela.
    pub(crate) async fn transicionar_estado<'e, E>(
        &self,
        executor: E,
        ferramenta: &Ferramenta,
        novo_estado: EstadoFerramenta,
    ) -> Result<Ferramenta, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !ferramenta.estado.transicao_valida(novo_estado) {
            return Err(AppError::TransicaoEstadoInvalida {
                de: ferramenta.estado,
                para: novo_estado,
            });
        }
        self.ferramenta_repo
            .atualizar_estado(executor, ferramenta.id, novo_estado)
            .await
    }

    pub async fn criar(
        &self,
        escopo: &EscopoAcesso,
        deposito_id: Uuid,
        nome: &str,
        numero_serie: &str,
        descricao: Option<&str>,
        data_aquisicao: NaiveDate,
    ) -> Result<Ferramenta, AppError> {
        let deposito = self
            .organizacao_repo
            .buscar_deposito(&self.pool, deposito_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Depósito"))?;

        if !escopo.permite_filial(deposito.filial_id) {
            return Err(AppError::EscopoNegado);
        }
        if !deposito.ativo {
            return Err(AppError::DepositoInativo(deposito.nome));
        }

        self.ferramenta_repo
            .criar(&self.pool, deposito_id, nome, numero_serie, descricao, data_aquisicao)
            .await
    }

    pub async fn listar(
        &self,
        escopo: &EscopoAcesso,
        estado: Option<EstadoFerramenta>,
    ) -> Result<Vec<Ferramenta>, AppError> {
        let filtro = escopo.filtro_filiais();
        self.ferramenta_repo.listar(filtro.as_deref(), estado).await
    }

    pub async fn buscar(
        &self,
        escopo: &EscopoAcesso,
        id: Uuid,
    ) -> Result<Ferramenta, AppError> {
        let ferramenta = self
            .ferramenta_repo
            .buscar(&self.pool, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Ferramenta"))?;

        self.checar_escopo(escopo, &ferramenta).await?;
        Ok(ferramenta)
    }

    pub async fn atualizar(
        &self,
        escopo: &EscopoAcesso,
        id: Uuid,
        nome: &str,
        descricao: Option<&str>,
        data_aquisicao: NaiveDate,
        deposito_id: Uuid,
    ) -> Result<Ferramenta, AppError> {
        let ferramenta = self.buscar(escopo, id).await?;

        // Mudança de depósito também precisa respeitar o escopo.
        if deposito_id != ferramenta.deposito_id {
            let deposito = self
                .organizacao_repo
                .buscar_deposito(&self.pool, deposito_id)
                .await?
                .ok_or(AppError::NaoEncontrado("Depósito"))?;
            if !escopo.permite_filial(deposito.filial_id) {
                return Err(AppError::EscopoNegado);
            }
            if !deposito.ativo {
                return Err(AppError::DepositoInativo(deposito.nome));
            }
        }

        self.ferramenta_repo
            .atualizar(&self.pool, id, nome, descricao, data_aquisicao, deposito_id)
            .await
    }

    /// Desativação administrativa: só a partir de DISPONIVEL (a tabela de
    /// transições rejeita o resto, nomeando o estado bloqueante).
    pub async fn desativar(&self, escopo: &EscopoAcesso, id: Uuid) -> Result<Ferramenta, AppError> {
        let mut tx = self.pool.begin().await?;

        let ferramenta = self
            .ferramenta_repo
            .buscar_para_atualizacao(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Ferramenta"))?;
        self.checar_escopo(escopo, &ferramenta).await?;

        let atualizada = self
            .transicionar_estado(&mut *tx, &ferramenta, EstadoFerramenta::Inativa)
            .await?;

        tx.commit().await?;
        Ok(atualizada)
    }

    /// Reativação: só INATIVA -> DISPONIVEL.
    pub async fn reativar(&self, escopo: &EscopoAcesso, id: Uuid) -> Result<Ferramenta, AppError> {
        let mut tx = self.pool.begin().await?;

        let ferramenta = self
            .ferramenta_repo
            .buscar_para_atualizacao(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Ferramenta"))?;
        self.checar_escopo(escopo, &ferramenta).await?;

        if ferramenta.estado != EstadoFerramenta::Inativa {
            return Err(AppError::TransicaoEstadoInvalida {
                de: ferramenta.estado,
                para: EstadoFerramenta::Disponivel,
            });
        }

        let atualizada = self
            .transicionar_estado(&mut *tx, &ferramenta, EstadoFerramenta::Disponivel)
            .await?;

        tx.commit().await?;
        Ok(atualizada)
    }

    async fn checar_escopo(
        &self,
        escopo: &EscopoAcesso,
        ferramenta: &Ferramenta,
    ) -> Result<(), AppError> {
        if matches!(escopo, EscopoAcesso::Global) {
            return Ok(());
        }
        let (filial_id, _) = self
            .ferramenta_repo
            .filial_da_ferramenta(&self.pool, ferramenta.id)
            .await?
            .ok_or(AppError::NaoEncontrado("Filial"))?;
        if !escopo.permite_filial(filial_id) {
            return Err(AppError::EscopoNegado);
        }
        Ok(())
    }
}
