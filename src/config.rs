// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        CatalogoRepository, DashboardRepository, EmprestimoRepository, FerramentaRepository,
        FuncionarioRepository, ManutencaoRepository, OrganizacaoRepository, UsuarioRepository,
    },
    services::{
        auth::AuthService, catalogo_service::CatalogoService, dashboard_service::DashboardService,
        emprestimo_service::EmprestimoService, ferramenta_service::FerramentaService,
        funcionario_service::FuncionarioService, manutencao_service::ManutencaoService,
        organizacao_service::OrganizacaoService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    // O extrator de escopo precisa do repositório direto (consulta as
    // filiais do usuário a cada requisição).
    pub usuario_repo: UsuarioRepository,
    pub auth_service: AuthService,
    pub organizacao_service: OrganizacaoService,
    pub catalogo_service: CatalogoService,
    pub ferramenta_service: FerramentaService,
    pub funcionario_service: FuncionarioService,
    pub emprestimo_service: EmprestimoService,
    pub manutencao_service: ManutencaoService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let usuario_repo = UsuarioRepository::new(db_pool.clone());
        let organizacao_repo = OrganizacaoRepository::new(db_pool.clone());
        let catalogo_repo = CatalogoRepository::new(db_pool.clone());
        let ferramenta_repo = FerramentaRepository::new(db_pool.clone());
        let funcionario_repo = FuncionarioRepository::new(db_pool.clone());
        let emprestimo_repo = EmprestimoRepository::new(db_pool.clone());
        let manutencao_repo = ManutencaoRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            usuario_repo.clone(),
            funcionario_repo.clone(),
            jwt_secret.clone(),
            db_pool.clone(),
        );
        let organizacao_service = OrganizacaoService::new(
            organizacao_repo.clone(),
            ferramenta_repo.clone(),
            db_pool.clone(),
        );
        let catalogo_service = CatalogoService::new(catalogo_repo, db_pool.clone());
        // O serviço de ferramentas é a única porta de mutação do estado;
        // os serviços de empréstimo e manutenção transicionam através dele.
        let ferramenta_service = FerramentaService::new(
            ferramenta_repo.clone(),
            organizacao_repo.clone(),
            db_pool.clone(),
        );
        let funcionario_service = FuncionarioService::new(
            funcionario_repo.clone(),
            organizacao_repo,
            usuario_repo.clone(),
            db_pool.clone(),
        );
        let emprestimo_service = EmprestimoService::new(
            emprestimo_repo,
            ferramenta_repo.clone(),
            funcionario_repo,
            ferramenta_service.clone(),
            db_pool.clone(),
        );
        let manutencao_service = ManutencaoService::new(
            manutencao_repo,
            ferramenta_repo,
            ferramenta_service.clone(),
            db_pool.clone(),
        );
        let dashboard_service = DashboardService::new(dashboard_repo);

        Ok(Self {
            db_pool,
            jwt_secret,
            usuario_repo,
            auth_service,
            organizacao_service,
            catalogo_service,
            ferramenta_service,
            funcionario_service,
            emprestimo_service,
            manutencao_service,
            dashboard_service,
        })
    }
}
