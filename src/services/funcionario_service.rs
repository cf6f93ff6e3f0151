// src/services/funcionario_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FuncionarioRepository, OrganizacaoRepository, UsuarioRepository},
    models::{auth::EscopoAcesso, funcionario::FuncionarioDetalhe},
};

#[derive(Clone)]
pub struct FuncionarioService {
    funcionario_repo: FuncionarioRepository,
    organizacao_repo: OrganizacaoRepository,
    usuario_repo: UsuarioRepository,
    pool: PgPool,
}

impl FuncionarioService {
    pub fn new(
        funcionario_repo: FuncionarioRepository,
        organizacao_repo: OrganizacaoRepository,
        usuario_repo: UsuarioRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            funcionario_repo,
            organizacao_repo,
            usuario_repo,
            pool,
        }
    }

    /// Cria o funcionário e os vínculos de filial numa transação só.
    pub async fn criar(
        &self,
        escopo: &EscopoAcesso,
        nome: &str,
        matricula: &str,
        cpf: &str,
        setor_id: Option<Uuid>,
        cargo_id: Option<Uuid>,
        filiais: &[Uuid],
    ) -> Result<FuncionarioDetalhe, AppError> {
        self.validar_filiais(escopo, filiais).await?;

        // O CPF não pode colidir com o diretório de usuários.
        if self.usuario_repo.cpf_em_uso(cpf).await? {
            return Err(AppError::CpfJaCadastrado(cpf.to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let funcionario = self
            .funcionario_repo
            .criar(&mut *tx, nome, matricula, cpf, setor_id, cargo_id)
            .await?;
        self.funcionario_repo
            .definir_filiais(&mut *tx, funcionario.id, filiais)
            .await?;

        tx.commit().await?;

        self.funcionario_repo
            .buscar_detalhe(funcionario.id)
            .await?
            .ok_or(AppError::NaoEncontrado("Funcionário"))
    }

    pub async fn listar(
        &self,
        escopo: &EscopoAcesso,
    ) -> Result<Vec<FuncionarioDetalhe>, AppError> {
        let filtro = escopo.filtro_filiais();
        self.funcionario_repo.listar(filtro.as_deref()).await
    }

    pub async fn buscar(
        &self,
        escopo: &EscopoAcesso,
        id: Uuid,
    ) -> Result<FuncionarioDetalhe, AppError> {
        let funcionario = self
            .funcionario_repo
            .buscar_detalhe(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Funcionário"))?;

        if !funcionario.filiais.iter().any(|f| escopo.permite_filial(*f))
            && !matches!(escopo, EscopoAcesso::Global)
        {
            return Err(AppError::EscopoNegado);
        }
        Ok(funcionario)
    }

    /// Atualiza os dados cadastrais e, se enviado, o conjunto de filiais.
    /// Inativação é bloqueada enquanto houver empréstimo aberto.
    pub async fn atualizar(
        &self,
        escopo: &EscopoAcesso,
        id: Uuid,
        nome: &str,
        setor_id: Option<Uuid>,
        cargo_id: Option<Uuid>,
        ativo: bool,
        filiais: Option<&[Uuid]>,
    ) -> Result<FuncionarioDetalhe, AppError> {
        // Valida escopo sobre o registro atual
        self.buscar(escopo, id).await?;

        if let Some(filiais) = filiais {
            self.validar_filiais(escopo, filiais).await?;
        }

        let mut tx = self.pool.begin().await?;

        let atual = self
            .funcionario_repo
            .buscar(&mut *tx, id)
            .await?
            .ok_or(AppError::NaoEncontrado("Funcionário"))?;

        if atual.ativo && !ativo {
            let pendentes = self
                .funcionario_repo
                .tem_emprestimos_ativos(&mut *tx, id)
                .await?;
            if pendentes {
                return Err(AppError::FuncionarioComEmprestimos(atual.nome));
            }
        }

        self.funcionario_repo
            .atualizar(&mut *tx, id, nome, setor_id, cargo_id, ativo)
            .await?;

        if let Some(filiais) = filiais {
            self.funcionario_repo.definir_filiais(&mut *tx, id, filiais).await?;
        }

        tx.commit().await?;

        self.funcionario_repo
            .buscar_detalhe(id)
            .await?
            .ok_or(AppError::NaoEncontrado("Funcionário"))
    }

    /// Toda filial vinculada deve existir, estar ativa e pertencer ao
    /// escopo do chamador.
    async fn validar_filiais(
        &self,
        escopo: &EscopoAcesso,
        filiais: &[Uuid],
    ) -> Result<(), AppError> {
        for filial_id in filiais {
            if !escopo.permite_filial(*filial_id) {
                return Err(AppError::EscopoNegado);
            }
            let filial = self
                .organizacao_repo
                .buscar_filial(&self.pool, *filial_id)
                .await?
                .ok_or(AppError::NaoEncontrado("Filial"))?;
            if !filial.ativo {
                return Err(AppError::FilialInativa(filial.nome));
            }
        }
        Ok(())
    }
}
