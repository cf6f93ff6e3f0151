// src/services/manutencao_service.rs

use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FerramentaRepository, ManutencaoRepository},
    models::{
        auth::EscopoAcesso,
        ferramenta::{EstadoFerramenta, Ferramenta},
        manutencao::{
            valida_encerramento, valida_tipo_imutavel, Manutencao, SnapshotManutencao,
            TipoManutencao,
        },
    },
    services::ferramenta_service::FerramentaService,
};

// O espelho do EmprestimoService sem a perna do funcionário: nenhuma
// validação de vínculo de filial, e o `tipo` é imutável após a criação.
#[derive(Clone)]
pub struct ManutencaoService {
    manutencao_repo: ManutencaoRepository,
    ferramenta_repo: FerramentaRepository,
    ferramenta_service: FerramentaService,
    pool: PgPool,
}

impl ManutencaoService {
    pub fn new(
        manutencao_repo: ManutencaoRepository,
        ferramenta_repo: FerramentaRepository,
        ferramenta_service: FerramentaService,
        pool: PgPool,
    ) -> Self {
        Self {
            manutencao_repo,
            ferramenta_repo,
            ferramenta_service,
            pool,
        }
    }

    /// Abre uma manutenção: DISPONIVEL -> EM_MANUTENCAO sob lock de linha.
    /// A exclusão mútua com empréstimos sai da própria pré-condição: uma
    /// ferramenta EMPRESTADA nunca está DISPONIVEL.
    pub async fn abrir(
        &self,
        escopo: &EscopoAcesso,
        ferramenta_id: Uuid,
        tipo: TipoManutencao,
        data_inicio: Option<NaiveDate>,
        observacoes: Option<&str>,
    ) -> Result<Manutencao, AppError> {
        let mut tx = self.pool.begin().await?;

        let ferramenta = self
            .ferramenta_repo
            .buscar_para_atualizacao(&mut *tx, ferramenta_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Ferramenta"))?;

        let (filial_id, _) = self
            .ferramenta_repo
            .filial_da_ferramenta(&mut *tx, ferramenta.id)
            .await?
            .ok_or(AppError::NaoEncontrado("Filial"))?;
        if !escopo.permite_filial(filial_id) {
            return Err(AppError::EscopoNegado);
        }

        if ferramenta.estado != EstadoFerramenta::Disponivel {
            return Err(AppError::FerramentaIndisponivel {
                nome: ferramenta.nome.clone(),
                numero_serie: ferramenta.numero_serie.clone(),
                estado: ferramenta.estado,
            });
        }

        let data = data_inicio.unwrap_or_else(|| Utc::now().date_naive());
        let manutencao = self
            .manutencao_repo
            .criar(&mut *tx, ferramenta.id, tipo, data, observacoes)
            .await?;

        let nome = format!("Manutenção #{}", manutencao.numero);
        let manutencao = self
            .manutencao_repo
            .atualizar_nome(&mut *tx, manutencao.id, &nome)
            .await?;

        self.ferramenta_service
            .transicionar_estado(&mut *tx, &ferramenta, EstadoFerramenta::EmManutencao)
            .await?;

        tx.commit().await?;
        Ok(manutencao)
    }

    /// Encerra uma manutenção: snapshot, EM_MANUTENCAO -> DISPONIVEL,
    /// anulação da referência. Mesma ordem estrita do empréstimo.
    pub async fn encerrar(
        &self,
        escopo: &EscopoAcesso,
        id: Uuid,
        data_fim: Option<NaiveDate>,
        observacoes: Option<&str>,
    ) -> Result<Manutencao, AppError> {
        let mut tx = self.pool.begin().await?;

        let manutencao = self
            .manutencao_repo
            .buscar_para_atualizacao(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Manutenção"))?;

        if !manutencao.ativo {
            return Err(AppError::ManutencaoJaEncerrada(manutencao.numero));
        }

        let ferramenta = self
            .ferramenta_com_lock_e_escopo(&mut tx, &manutencao, escopo)
            .await?;

        let data_fim = data_fim.unwrap_or_else(|| Utc::now().date_naive());
        valida_encerramento(manutencao.data_inicio, data_fim)?;

        let snapshot = SnapshotManutencao::capturar(&manutencao, ferramenta.as_ref());

        if let Some(ferramenta) = &ferramenta {
            if ferramenta.estado == EstadoFerramenta::EmManutencao {
                self.ferramenta_service
                    .transicionar_estado(&mut *tx, ferramenta, EstadoFerramenta::Disponivel)
                    .await?;
            }
        }

        let encerrada = self
            .manutencao_repo
            .encerrar(&mut *tx, id, &snapshot, data_fim, observacoes)
            .await?;

        tx.commit().await?;
        Ok(encerrada)
    }

    /// Edição com a manutenção aberta. Tentativa de trocar o tipo é
    /// rejeitada; registro encerrado nunca volta a ser mutado.
    pub async fn atualizar(
        &self,
        escopo: &EscopoAcesso,
        id: Uuid,
        tipo: Option<TipoManutencao>,
        observacoes: Option<&str>,
    ) -> Result<Manutencao, AppError> {
        let mut tx = self.pool.begin().await?;

        let manutencao = self
            .manutencao_repo
            .buscar_para_atualizacao(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Manutenção"))?;

        if !manutencao.ativo {
            return Err(AppError::ManutencaoJaEncerrada(manutencao.numero));
        }
        valida_tipo_imutavel(manutencao.tipo, tipo)?;
        self.checar_escopo(&mut tx, &manutencao, escopo).await?;

        let atualizada = self
            .manutencao_repo
            .atualizar_aberta(&mut *tx, id, observacoes)
            .await?;

        tx.commit().await?;
        Ok(atualizada)
    }

    /// Exclusão física com a mesma válvula de segurança do empréstimo:
    /// libera a ferramenta só se ela está EM_MANUTENCAO por causa deste
    /// registro.
    pub async fn excluir(&self, escopo: &EscopoAcesso, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let manutencao = self
            .manutencao_repo
            .buscar_para_atualizacao(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Manutenção"))?;

        let ferramenta = self
            .ferramenta_com_lock_e_escopo(&mut tx, &manutencao, escopo)
            .await?;

        if manutencao.ativo {
            if let Some(ferramenta) = &ferramenta {
                if ferramenta.estado == EstadoFerramenta::EmManutencao {
                    self.ferramenta_service
                        .transicionar_estado(&mut *tx, ferramenta, EstadoFerramenta::Disponivel)
                        .await?;
                }
            }
        }

        self.manutencao_repo.excluir(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn listar(
        &self,
        escopo: &EscopoAcesso,
        ativo: Option<bool>,
    ) -> Result<Vec<Manutencao>, AppError> {
        let filtro = escopo.filtro_filiais();
        self.manutencao_repo.listar(filtro.as_deref(), ativo).await
    }

    pub async fn buscar(&self, escopo: &EscopoAcesso, id: Uuid) -> Result<Manutencao, AppError> {
        let manutencao = self
            .manutencao_repo
            .buscar(&self.pool, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Manutenção"))?;

        if !matches!(escopo, EscopoAcesso::Global) {
            let Some(ferramenta_id) = manutencao.ferramenta_id else {
                return Err(AppError::EscopoNegado);
            };
            let (filial_id, _) = self
                .ferramenta_repo
                .filial_da_ferramenta(&self.pool, ferramenta_id)
                .await?
                .ok_or(AppError::NaoEncontrado("Filial"))?;
            if !escopo.permite_filial(filial_id) {
                return Err(AppError::EscopoNegado);
            }
        }
        Ok(manutencao)
    }

    async fn ferramenta_com_lock_e_escopo(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        manutencao: &Manutencao,
        escopo: &EscopoAcesso,
    ) -> Result<Option<Ferramenta>, AppError> {
        let Some(ferramenta_id) = manutencao.ferramenta_id else {
            return Ok(None);
        };
        let ferramenta = self
            .ferramenta_repo
            .buscar_para_atualizacao(&mut **tx, ferramenta_id)
            .await?;

        if let Some(ferramenta) = &ferramenta {
            if !matches!(escopo, EscopoAcesso::Global) {
                let (filial_id, _) = self
                    .ferramenta_repo
                    .filial_da_ferramenta(&mut **tx, ferramenta.id)
                    .await?
                    .ok_or(AppError::NaoEncontrado("Filial"))?;
                if !escopo.permite_filial(filial_id) {
                    return Err(AppError::EscopoNegado);
                }
            }
        }
        Ok(ferramenta)
    }

    async fn checar_escopo(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        manutencao: &Manutencao,
        escopo: &EscopoAcesso,
    ) -> Result<(), AppError> {
        if matches!(escopo, EscopoAcesso::Global) {
            return Ok(());
        }
        let Some(ferramenta_id) = manutencao.ferramenta_id else {
            return Err(AppError::EscopoNegado);
        };
        let (filial_id, _) = self
            .ferramenta_repo
            .filial_da_ferramenta(&mut **tx, ferramenta_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Filial"))?;
        if !escopo.permite_filial(filial_id) {
            return Err(AppError::EscopoNegado);
        }
        Ok(())
    }
}
