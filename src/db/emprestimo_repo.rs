// src/db/emprestimo_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::emprestimo::{Emprestimo, SnapshotEmprestimo},
};

// Repositório dos empréstimos. As escritas participam sempre da transação
// do service via o executor genérico.
#[derive(Clone)]
pub struct EmprestimoRepository {
    pool: PgPool,
}

impl EmprestimoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn criar<'e, E>(
        &self,
        executor: E,
        ferramenta_id: Uuid,
        funcionario_id: Uuid,
        data_emprestimo: NaiveDate,
        observacoes: Option<&str>,
    ) -> Result<Emprestimo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let emprestimo = sqlx::query_as::<_, Emprestimo>(
            r#"
            INSERT INTO emprestimos (ferramenta_id, funcionario_id, data_emprestimo, observacoes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(ferramenta_id)
        .bind(funcionario_id)
        .bind(data_emprestimo)
        .bind(observacoes)
        .fetch_one(executor)
        .await?;
        Ok(emprestimo)
    }

    /// Segunda fase da criação: o nome de exibição vem do próprio `numero`
    /// gerado no INSERT.
    pub async fn atualizar_nome<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        nome: &str,
    ) -> Result<Emprestimo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Emprestimo>(
            r#"
            UPDATE emprestimos
            SET nome = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Empréstimo"))
    }

    /// Quando há recorte de escopo, o empréstimo só aparece se a ferramenta
    /// viva pertencer a uma filial permitida; encerrados (sem referência)
    /// ficam de fora do recorte.
    pub async fn listar(
        &self,
        filtro_filiais: Option<&[Uuid]>,
        ativo: Option<bool>,
    ) -> Result<Vec<Emprestimo>, AppError> {
        let emprestimos = sqlx::query_as::<_, Emprestimo>(
            r#"
            SELECT e.* FROM emprestimos e
            WHERE ($1::uuid[] IS NULL OR EXISTS (
                SELECT 1 FROM ferramentas f
                JOIN depositos d ON d.id = f.deposito_id
                WHERE f.id = e.ferramenta_id AND d.filial_id = ANY($1)
            ))
              AND ($2::boolean IS NULL OR e.ativo = $2)
            ORDER BY e.data_emprestimo DESC, e.numero DESC
            "#,
        )
        .bind(filtro_filiais)
        .bind(ativo)
        .fetch_all(&self.pool)
        .await?;
        Ok(emprestimos)
    }

    pub async fn buscar<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Emprestimo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let emprestimo = sqlx::query_as::<_, Emprestimo>("SELECT * FROM emprestimos WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(emprestimo)
    }

    /// Lock de linha para encerramento/exclusão: serializa encerramentos
    /// concorrentes do mesmo empréstimo.
    pub async fn buscar_para_atualizacao<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Emprestimo>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let emprestimo =
            sqlx::query_as::<_, Emprestimo>("SELECT * FROM emprestimos WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(emprestimo)
    }

    /// Só as observações são editáveis com o empréstimo aberto.
    pub async fn atualizar_aberto<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        observacoes: Option<&str>,
    ) -> Result<Emprestimo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Emprestimo>(
            r#"
            UPDATE emprestimos
            SET observacoes = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(observacoes)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Empréstimo"))
    }

    /// Encerramento: grava o snapshot, anula as referências vivas e baixa o
    /// flag `ativo` em uma única escrita. Os valores do snapshot foram
    /// lidos das relações vivas ANTES desta chamada.
    pub async fn encerrar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        snapshot: &SnapshotEmprestimo,
        data_devolucao: NaiveDate,
        observacoes: Option<&str>,
    ) -> Result<Emprestimo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Emprestimo>(
            r#"
            UPDATE emprestimos
            SET nome_ferramenta_historico = $2,
                numero_serie_ferramenta_historico = $3,
                nome_funcionario_historico = $4,
                matricula_funcionario_historico = $5,
                ferramenta_id = NULL,
                funcionario_id = NULL,
                ativo = FALSE,
                data_devolucao = $6,
                observacoes = COALESCE($7, observacoes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&snapshot.nome_ferramenta)
        .bind(&snapshot.numero_serie_ferramenta)
        .bind(&snapshot.nome_funcionario)
        .bind(&snapshot.matricula_funcionario)
        .bind(data_devolucao)
        .bind(observacoes)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Empréstimo"))
    }

    pub async fn excluir<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resultado = sqlx::query("DELETE FROM emprestimos WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(resultado.rows_affected())
    }
}
