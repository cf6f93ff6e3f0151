// src/services/organizacao_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FerramentaRepository, OrganizacaoRepository},
    models::{
        auth::EscopoAcesso,
        organizacao::{Deposito, Filial, RelatorioDesativacao},
    },
};

#[derive(Clone)]
pub struct OrganizacaoService {
    organizacao_repo: OrganizacaoRepository,
    ferramenta_repo: FerramentaRepository,
    pool: PgPool,
}

impl OrganizacaoService {
    pub fn new(
        organizacao_repo: OrganizacaoRepository,
        ferramenta_repo: FerramentaRepository,
        pool: PgPool,
    ) -> Self {
        Self { organizacao_repo, ferramenta_repo, pool }
    }

    // ---
    // Filiais
    // ---

    pub async fn criar_filial(
        &self,
        nome: &str,
        descricao: Option<&str>,
    ) -> Result<Filial, AppError> {
        self.organizacao_repo.criar_filial(&self.pool, nome, descricao).await
    }

    pub async fn listar_filiais(
        &self,
        escopo: &EscopoAcesso,
        ativo: Option<bool>,
    ) -> Result<Vec<Filial>, AppError> {
        let filtro = escopo.filtro_filiais();
        self.organizacao_repo.listar_filiais(filtro.as_deref(), ativo).await
    }

    pub async fn buscar_filial(
        &self,
        escopo: &EscopoAcesso,
        id: Uuid,
    ) -> Result<Filial, AppError> {
        if !escopo.permite_filial(id) {
            return Err(AppError::EscopoNegado);
        }
        self.organizacao_repo
            .buscar_filial(&self.pool, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Filial"))
    }

    pub async fn atualizar_filial(
        &self,
        id: Uuid,
        nome: &str,
        descricao: Option<&str>,
    ) -> Result<Filial, AppError> {
        self.organizacao_repo
            .buscar_filial(&self.pool, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Filial"))?;
        self.organizacao_repo.atualizar_filial(&self.pool, id, nome, descricao).await
    }

    /// Modo simulação: só a checagem de pré-condição, sem nenhuma mutação.
    pub async fn simular_desativacao_filial(
        &self,
        id: Uuid,
    ) -> Result<RelatorioDesativacao, AppError> {
        self.organizacao_repo
            .buscar_filial(&self.pool, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Filial"))?;
        let bloqueios = self.ferramenta_repo.bloqueantes_da_filial(&self.pool, id).await?;
        Ok(RelatorioDesativacao::novo(bloqueios))
    }

    /// Desativação em cascata da filial, tudo-ou-nada: filial inativa,
    /// depósitos inativos, ferramentas INATIVAS, vínculos de funcionários
    /// removidos. A checagem de bloqueio roda DENTRO da transação para que
    /// um empréstimo aberto em corrida não escape.
    pub async fn desativar_filial(&self, id: Uuid) -> Result<Filial, AppError> {
        let mut tx = self.pool.begin().await?;

        let filial = self
            .organizacao_repo
            .buscar_filial(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Filial"))?;

        let bloqueios = self.ferramenta_repo.bloqueantes_da_filial(&mut *tx, id).await?;
        if !bloqueios.is_empty() {
            return Err(AppError::DesativacaoBloqueada {
                alvo: filial.nome,
                bloqueios,
            });
        }

        let filial = self.organizacao_repo.definir_ativo_filial(&mut *tx, id, false).await?;
        let depositos = self
            .organizacao_repo
            .definir_ativo_depositos_da_filial(&mut *tx, id, false)
            .await?;
        let ferramentas = self.ferramenta_repo.inativar_da_filial(&mut *tx, id).await?;
        let vinculos = self.organizacao_repo.remover_vinculos_funcionarios(&mut *tx, id).await?;

        tx.commit().await?;

        tracing::info!(
            "Filial '{}' desativada: {} depósitos, {} ferramentas, {} vínculos removidos",
            filial.nome,
            depositos,
            ferramentas,
            vinculos
        );
        Ok(filial)
    }

    /// Reativação da filial: depósitos voltam a ativos e as ferramentas
    /// INATIVAS voltam a DISPONIVEL. Os vínculos de funcionários não são
    /// recriados (foram removidos na desativação).
    pub async fn reativar_filial(&self, id: Uuid) -> Result<Filial, AppError> {
        let mut tx = self.pool.begin().await?;

        let filial = self
            .organizacao_repo
            .buscar_filial(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Filial"))?;
        if filial.ativo {
            return Err(AppError::JaAtivo(format!("Filial '{}'", filial.nome)));
        }

        let filial = self.organizacao_repo.definir_ativo_filial(&mut *tx, id, true).await?;
        self.organizacao_repo
            .definir_ativo_depositos_da_filial(&mut *tx, id, true)
            .await?;
        self.ferramenta_repo.reativar_da_filial(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(filial)
    }

    // ---
    // Depósitos
    // ---

    pub async fn criar_deposito(
        &self,
        filial_id: Uuid,
        nome: &str,
        descricao: Option<&str>,
    ) -> Result<Deposito, AppError> {
        let filial = self
            .organizacao_repo
            .buscar_filial(&self.pool, filial_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Filial"))?;
        if !filial.ativo {
            return Err(AppError::FilialInativa(filial.nome));
        }
        self.organizacao_repo
            .criar_deposito(&self.pool, filial_id, nome, descricao)
            .await
    }

    pub async fn listar_depositos(
        &self,
        escopo: &EscopoAcesso,
        filial_id: Option<Uuid>,
    ) -> Result<Vec<Deposito>, AppError> {
        if let Some(filial_id) = filial_id {
            if !escopo.permite_filial(filial_id) {
                return Err(AppError::EscopoNegado);
            }
        }
        let filtro = escopo.filtro_filiais();
        self.organizacao_repo.listar_depositos(filtro.as_deref(), filial_id).await
    }

    pub async fn buscar_deposito(
        &self,
        escopo: &EscopoAcesso,
        id: Uuid,
    ) -> Result<Deposito, AppError> {
        let deposito = self
            .organizacao_repo
            .buscar_deposito(&self.pool, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Depósito"))?;
        if !escopo.permite_filial(deposito.filial_id) {
            return Err(AppError::EscopoNegado);
        }
        Ok(deposito)
    }

    pub async fn atualizar_deposito(
        &self,
        escopo: &EscopoAcesso,
        id: Uuid,
        nome: &str,
        descricao: Option<&str>,
    ) -> Result<Deposito, AppError> {
        self.buscar_deposito(escopo, id).await?;
        self.organizacao_repo.atualizar_deposito(&self.pool, id, nome, descricao).await
    }

    pub async fn simular_desativacao_deposito(
        &self,
        id: Uuid,
    ) -> Result<RelatorioDesativacao, AppError> {
        self.organizacao_repo
            .buscar_deposito(&self.pool, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Depósito"))?;
        let bloqueios = self.ferramenta_repo.bloqueantes_do_deposito(&self.pool, id).await?;
        Ok(RelatorioDesativacao::novo(bloqueios))
    }

    /// Mesmo padrão da filial, restrito a um depósito: a cascata cobre só
    /// as ferramentas dele (o depósito não tem outros filhos).
    pub async fn desativar_deposito(&self, id: Uuid) -> Result<Deposito, AppError> {
        let mut tx = self.pool.begin().await?;

        let deposito = self
            .organizacao_repo
            .buscar_deposito(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Depósito"))?;

        let bloqueios = self.ferramenta_repo.bloqueantes_do_deposito(&mut *tx, id).await?;
        if !bloqueios.is_empty() {
            return Err(AppError::DesativacaoBloqueada {
                alvo: deposito.nome,
                bloqueios,
            });
        }

        let deposito = self
            .organizacao_repo
            .definir_ativo_deposito(&mut *tx, id, false)
            .await?;
        self.ferramenta_repo.inativar_do_deposito(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(deposito)
    }

    pub async fn reativar_deposito(&self, id: Uuid) -> Result<Deposito, AppError> {
        let mut tx = self.pool.begin().await?;

        let deposito = self
            .organizacao_repo
            .buscar_deposito(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Depósito"))?;
        if deposito.ativo {
            return Err(AppError::JaAtivo(format!("Depósito '{}'", deposito.nome)));
        }

        // Não faz sentido reativar um depósito de filial inativa.
        let filial = self
            .organizacao_repo
            .buscar_filial(&mut *tx, deposito.filial_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Filial"))?;
        if !filial.ativo {
            return Err(AppError::FilialInativa(filial.nome));
        }

        let deposito = self
            .organizacao_repo
            .definir_ativo_deposito(&mut *tx, id, true)
            .await?;
        self.ferramenta_repo.reativar_do_deposito(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(deposito)
    }
}
