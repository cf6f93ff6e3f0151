// src/db/funcionario_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::funcionario::{Funcionario, FuncionarioDetalhe},
};

#[derive(Clone)]
pub struct FuncionarioRepository {
    pool: PgPool,
}

const SELECT_DETALHE: &str = r#"
    SELECT fu.id, fu.nome, fu.matricula, fu.cpf,
           fu.setor_id, s.nome_setor AS setor_nome,
           fu.cargo_id, c.nome_cargo AS cargo_nome,
           COALESCE(
               ARRAY_AGG(ff.filial_id) FILTER (WHERE ff.filial_id IS NOT NULL),
               '{}'
           ) AS filiais,
           fu.ativo, fu.created_at, fu.updated_at
    FROM funcionarios fu
    LEFT JOIN setores s ON s.id = fu.setor_id
    LEFT JOIN cargos c ON c.id = fu.cargo_id
    LEFT JOIN funcionario_filiais ff ON ff.funcionario_id = fu.id
"#;

impl FuncionarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn criar<'e, E>(
        &self,
        executor: E,
        nome: &str,
        matricula: &str,
        cpf: &str,
        setor_id: Option<Uuid>,
        cargo_id: Option<Uuid>,
    ) -> Result<Funcionario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Funcionario>(
            r#"
            INSERT INTO funcionarios (nome, matricula, cpf, setor_id, cargo_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(nome)
        .bind(matricula)
        .bind(cpf)
        .bind(setor_id)
        .bind(cargo_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    let constraint = db_err.constraint().unwrap_or_default();
                    if constraint.contains("matricula") {
                        return AppError::MatriculaJaCadastrada(matricula.to_string());
                    }
                    return AppError::CpfJaCadastrado(cpf.to_string());
                }
            }
            e.into()
        })
    }

    /// Listagem com nomes de setor/cargo e filiais agregadas. O recorte de
    /// escopo olha o vínculo de filial do funcionário.
    pub async fn listar(
        &self,
        filtro_filiais: Option<&[Uuid]>,
    ) -> Result<Vec<FuncionarioDetalhe>, AppError> {
        let sql = format!(
            r#"{SELECT_DETALHE}
            WHERE ($1::uuid[] IS NULL OR EXISTS (
                SELECT 1 FROM funcionario_filiais x
                WHERE x.funcionario_id = fu.id AND x.filial_id = ANY($1)
            ))
            GROUP BY fu.id, s.nome_setor, c.nome_cargo
            ORDER BY fu.nome ASC
            "#
        );
        let funcionarios = sqlx::query_as::<_, FuncionarioDetalhe>(&sql)
            .bind(filtro_filiais)
            .fetch_all(&self.pool)
            .await?;
        Ok(funcionarios)
    }

    pub async fn buscar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Funcionario>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let funcionario =
            sqlx::query_as::<_, Funcionario>("SELECT * FROM funcionarios WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(funcionario)
    }

    pub async fn buscar_detalhe(&self, id: Uuid) -> Result<Option<FuncionarioDetalhe>, AppError> {
        let sql = format!(
            r#"{SELECT_DETALHE}
            WHERE fu.id = $1
            GROUP BY fu.id, s.nome_setor, c.nome_cargo
            "#
        );
        let funcionario = sqlx::query_as::<_, FuncionarioDetalhe>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(funcionario)
    }

    pub async fn atualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        nome: &str,
        setor_id: Option<Uuid>,
        cargo_id: Option<Uuid>,
        ativo: bool,
    ) -> Result<Funcionario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Funcionario>(
            r#"
            UPDATE funcionarios
            SET nome = $2, setor_id = $3, cargo_id = $4, ativo = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome)
        .bind(setor_id)
        .bind(cargo_id)
        .bind(ativo)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Funcionário"))
    }

    /// Substitui o conjunto de filiais do funcionário.
    pub async fn definir_filiais<'e, E>(
        &self,
        executor: E,
        funcionario_id: Uuid,
        filiais: &[Uuid],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        sqlx::query("DELETE FROM funcionario_filiais WHERE funcionario_id = $1")
            .bind(funcionario_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO funcionario_filiais (funcionario_id, filial_id)
            SELECT $1, unnest($2::uuid[])
            "#,
        )
        .bind(funcionario_id)
        .bind(filiais)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn filiais_do_funcionario<'e, E>(
        &self,
        executor: E,
        funcionario_id: Uuid,
    ) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let filiais = sqlx::query_scalar::<_, Uuid>(
            "SELECT filial_id FROM funcionario_filiais WHERE funcionario_id = $1",
        )
        .bind(funcionario_id)
        .fetch_all(executor)
        .await?;
        Ok(filiais)
    }

    /// Bloqueia a inativação do funcionário enquanto houver empréstimo
    /// aberto em nome dele.
    pub async fn tem_emprestimos_ativos<'e, E>(
        &self,
        executor: E,
        funcionario_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let existe = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM emprestimos WHERE funcionario_id = $1 AND ativo)",
        )
        .bind(funcionario_id)
        .fetch_one(executor)
        .await?;
        Ok(existe)
    }

    pub async fn cpf_em_uso(&self, cpf: &str) -> Result<bool, AppError> {
        let existe = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM funcionarios WHERE cpf = $1)",
        )
        .bind(cpf)
        .fetch_one(&self.pool)
        .await?;
        Ok(existe)
    }
}
