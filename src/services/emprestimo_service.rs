// src/services/emprestimo_service.rs

use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{EmprestimoRepository, FerramentaRepository, FuncionarioRepository},
    models::{
        auth::EscopoAcesso,
        emprestimo::{valida_devolucao, Emprestimo, SnapshotEmprestimo},
        ferramenta::{EstadoFerramenta, Ferramenta},
    },
    services::ferramenta_service::FerramentaService,
};

#[derive(Clone)]
pub struct EmprestimoService {
    emprestimo_repo: EmprestimoRepository,
    ferramenta_repo: FerramentaRepository,
    funcionario_repo: FuncionarioRepository,
    ferramenta_service: FerramentaService,
    pool: PgPool,
}

impl EmprestimoService {
    pub fn new(
        emprestimo_repo: EmprestimoRepository,
        ferramenta_repo: FerramentaRepository,
        funcionario_repo: FuncionarioRepository,
        ferramenta_service: FerramentaService,
        pool: PgPool,
    ) -> Self {
        Self {
            emprestimo_repo,
            ferramenta_repo,
            funcionario_repo,
            ferramenta_service,
            pool,
        }
    }

    /// Abre um empréstimo. Tudo dentro de uma transação: o lock de linha na
    /// ferramenta faz a pré-condição de disponibilidade valer também sob
    /// corrida (o segundo "abrir" concorrente enxerga EMPRESTADA e falha
    /// limpo, sem corromper o estado).
    pub async fn abrir(
        &self,
        escopo: &EscopoAcesso,
        ferramenta_id: Uuid,
        funcionario_id: Uuid,
        data_emprestimo: Option<NaiveDate>,
        observacoes: Option<&str>,
    ) -> Result<Emprestimo, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Ferramenta com lock + pré-condição de disponibilidade
        let ferramenta = self
            .ferramenta_repo
            .buscar_para_atualizacao(&mut *tx, ferramenta_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Ferramenta"))?;

        let (filial_id, filial_nome) = self
            .ferramenta_repo
            .filial_da_ferramenta(&mut *tx, ferramenta.id)
            .await?
            .ok_or(AppError::NaoEncontrado("Filial"))?;

        // Referência fora do escopo é rejeitada, nunca filtrada.
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

        // 2. Funcionário ativo e da mesma filial da ferramenta
        let funcionario = self
            .funcionario_repo
            .buscar(&mut *tx, funcionario_id)
            .await?
            .ok_or(AppError::NaoEncontrado("Funcionário"))?;

        if !funcionario.ativo {
            return Err(AppError::FuncionarioInativo(funcionario.nome.clone()));
        }

        let filiais_do_funcionario = self
            .funcionario_repo
            .filiais_do_funcionario(&mut *tx, funcionario_id)
            .await?;
        if !filiais_do_funcionario.contains(&filial_id) {
            return Err(AppError::FuncionarioForaDaFilial {
                funcionario: funcionario.nome.clone(),
                filial: filial_nome,
            });
        }

        // 3. Cria o registro e batiza com o próprio número gerado
        let data = data_emprestimo.unwrap_or_else(|| Utc::now().date_naive());
        let emprestimo = self
            .emprestimo_repo
            .criar(&mut *tx, ferramenta.id, funcionario.id, data, observacoes)
            .await?;

        let nome = format!("Empréstimo #{}", emprestimo.numero);
        let emprestimo = self
            .emprestimo_repo
            .atualizar_nome(&mut *tx, emprestimo.id, &nome)
            .await?;

        // 4. DISPONIVEL -> EMPRESTADA
        self.ferramenta_service
            .transicionar_estado(&mut *tx, &ferramenta, EstadoFerramenta::Emprestada)
            .await?;

        tx.commit().await?;
        Ok(emprestimo)
    }

    /// Encerra um empréstimo. Ordem estrita dentro da transação: captura o
    /// snapshot das relações vivas, devolve a ferramenta para DISPONIVEL e
    /// só então anula as referências — ler a relação depois de anulá-la
    /// perderia os dados históricos.
    pub async fn encerrar(
        &self,
        escopo: &EscopoAcesso,
        id: Uuid,
        data_devolucao: Option<NaiveDate>,
        observacoes: Option<&str>,
    ) -> Result<Emprestimo, AppError> {
        let mut tx = self.pool.begin().await?;

        let emprestimo = self
            .emprestimo_repo
            .buscar_para_atualizacao(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Empréstimo"))?;

        // Encerrado é terminal: nenhuma transição de volta para aberto.
        if !emprestimo.ativo {
            return Err(AppError::EmprestimoJaEncerrado(emprestimo.numero));
        }

        let ferramenta = self
            .ferramenta_com_lock_e_escopo(&mut tx, &emprestimo, escopo)
            .await?;

        let data_devolucao = data_devolucao.unwrap_or_else(|| Utc::now().date_naive());
        valida_devolucao(emprestimo.data_emprestimo, data_devolucao)?;

        let funcionario = match emprestimo.funcionario_id {
            Some(funcionario_id) => self.funcionario_repo.buscar(&mut *tx, funcionario_id).await?,
            None => None,
        };

        // Snapshot ANTES de anular as referências.
        let snapshot =
            SnapshotEmprestimo::capturar(&emprestimo, ferramenta.as_ref(), funcionario.as_ref());

        // Libera a ferramenta apenas se este empréstimo é quem a segura.
        if let Some(ferramenta) = &ferramenta {
            if ferramenta.estado == EstadoFerramenta::Emprestada {
                self.ferramenta_service
                    .transicionar_estado(&mut *tx, ferramenta, EstadoFerramenta::Disponivel)
                    .await?;
            }
        }

        let encerrado = self
            .emprestimo_repo
            .encerrar(&mut *tx, id, &snapshot, data_devolucao, observacoes)
            .await?;

        tx.commit().await?;
        Ok(encerrado)
    }

    /// Edição com o empréstimo aberto (apenas observações). Um registro
    /// encerrado nunca volta a ser mutado.
    pub async fn atualizar(
        &self,
        escopo: &EscopoAcesso,
        id: Uuid,
        observacoes: Option<&str>,
    ) -> Result<Emprestimo, AppError> {
        let mut tx = self.pool.begin().await?;

        let emprestimo = self
            .emprestimo_repo
            .buscar_para_atualizacao(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Empréstimo"))?;

        if !emprestimo.ativo {
            return Err(AppError::EmprestimoJaEncerrado(emprestimo.numero));
        }
        self.checar_escopo(&mut tx, &emprestimo, escopo).await?;

        let atualizado = self
            .emprestimo_repo
            .atualizar_aberto(&mut *tx, id, observacoes)
            .await?;

        tx.commit().await?;
        Ok(atualizado)
    }

    /// Exclusão física. Válvula de segurança contra ferramentas órfãs em
    /// EMPRESTADA: libera a ferramenta antes de remover a linha, mas só se
    /// o estado atual foi causado por este empréstimo.
    pub async fn excluir(&self, escopo: &EscopoAcesso, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let emprestimo = self
            .emprestimo_repo
            .buscar_para_atualizacao(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Empréstimo"))?;

        let ferramenta = self
            .ferramenta_com_lock_e_escopo(&mut tx, &emprestimo, escopo)
            .await?;

        if emprestimo.ativo {
            if let Some(ferramenta) = &ferramenta {
                if ferramenta.estado == EstadoFerramenta::Emprestada {
                    self.ferramenta_service
                        .transicionar_estado(&mut *tx, ferramenta, EstadoFerramenta::Disponivel)
                        .await?;
                }
            }
        }

        self.emprestimo_repo.excluir(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn listar(
        &self,
        escopo: &EscopoAcesso,
        ativo: Option<bool>,
    ) -> Result<Vec<Emprestimo>, AppError> {
        let filtro = escopo.filtro_filiais();
        self.emprestimo_repo.listar(filtro.as_deref(), ativo).await
    }

    pub async fn buscar(&self, escopo: &EscopoAcesso, id: Uuid) -> Result<Emprestimo, AppError> {
        let emprestimo = self
            .emprestimo_repo
            .buscar(&self.pool, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Empréstimo"))?;

        if !matches!(escopo, EscopoAcesso::Global) {
            let Some(ferramenta_id) = emprestimo.ferramenta_id else {
                // Sem referência viva não há como estabelecer a filial; um
                // escopo restrito não enxerga registros históricos.
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
        Ok(emprestimo)
    }

    /// Carrega (com lock) a ferramenta referenciada, validando o escopo do
    /// chamador contra a filial dela.
    async fn ferramenta_com_lock_e_escopo(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        emprestimo: &Emprestimo,
        escopo: &EscopoAcesso,
    ) -> Result<Option<Ferramenta>, AppError> {
        let Some(ferramenta_id) = emprestimo.ferramenta_id else {
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
        emprestimo: &Emprestimo,
        escopo: &EscopoAcesso,
    ) -> Result<(), AppError> {
        if matches!(escopo, EscopoAcesso::Global) {
            return Ok(());
        }
        let Some(ferramenta_id) = emprestimo.ferramenta_id else {
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
