// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Organizacao ---
        handlers::organizacao::create_filial,
        handlers::organizacao::list_filiais,
        handlers::organizacao::get_filial,
        handlers::organizacao::update_filial,
        handlers::organizacao::desativar_filial,
        handlers::organizacao::reativar_filial,
        handlers::organizacao::create_deposito,
        handlers::organizacao::list_depositos,
        handlers::organizacao::get_deposito,
        handlers::organizacao::update_deposito,
        handlers::organizacao::desativar_deposito,
        handlers::organizacao::reativar_deposito,

        // --- Ferramentas ---
        handlers::ferramentas::create_ferramenta,
        handlers::ferramentas::list_ferramentas,
        handlers::ferramentas::get_ferramenta,
        handlers::ferramentas::update_ferramenta,
        handlers::ferramentas::desativar_ferramenta,
        handlers::ferramentas::reativar_ferramenta,

        // --- Emprestimos ---
        handlers::emprestimos::create_emprestimo,
        handlers::emprestimos::list_emprestimos,
        handlers::emprestimos::get_emprestimo,
        handlers::emprestimos::encerrar_emprestimo,
        handlers::emprestimos::update_emprestimo,
        handlers::emprestimos::delete_emprestimo,

        // --- Manutencoes ---
        handlers::manutencoes::create_manutencao,
        handlers::manutencoes::list_manutencoes,
        handlers::manutencoes::get_manutencao,
        handlers::manutencoes::encerrar_manutencao,
        handlers::manutencoes::update_manutencao,
        handlers::manutencoes::delete_manutencao,

        // --- Dashboard ---
        handlers::dashboard::get_resumo,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::PapelUsuario,
            models::auth::Usuario,
            models::auth::RegisterUsuarioPayload,
            models::auth::CreateUsuarioPayload,
            models::auth::LoginUsuarioPayload,
            models::auth::AuthResponse,

            // --- Organizacao ---
            models::organizacao::Filial,
            models::organizacao::Deposito,
            models::organizacao::RelatorioDesativacao,
            handlers::organizacao::FilialPayload,
            handlers::organizacao::CreateDepositoPayload,
            handlers::organizacao::UpdateDepositoPayload,

            // --- Catalogo ---
            models::catalogo::Setor,
            models::catalogo::Cargo,
            handlers::catalogo::SetorPayload,
            handlers::catalogo::CargoPayload,

            // --- Ferramentas ---
            models::ferramenta::EstadoFerramenta,
            models::ferramenta::Ferramenta,
            models::ferramenta::FerramentaBloqueante,
            handlers::ferramentas::CreateFerramentaPayload,
            handlers::ferramentas::UpdateFerramentaPayload,

            // --- Funcionarios ---
            models::funcionario::Funcionario,
            models::funcionario::FuncionarioDetalhe,
            handlers::funcionarios::CreateFuncionarioPayload,
            handlers::funcionarios::UpdateFuncionarioPayload,

            // --- Emprestimos ---
            models::emprestimo::Emprestimo,
            handlers::emprestimos::CreateEmprestimoPayload,
            handlers::emprestimos::EncerrarEmprestimoPayload,
            handlers::emprestimos::UpdateEmprestimoPayload,

            // --- Manutencoes ---
            models::manutencao::TipoManutencao,
            models::manutencao::Manutencao,
            handlers::manutencoes::CreateManutencaoPayload,
            handlers::manutencoes::EncerrarManutencaoPayload,
            handlers::manutencoes::UpdateManutencaoPayload,

            // --- Dashboard ---
            models::dashboard::ResumoDashboard,
        )
    ),
    tags(
        (name = "Organizacao", description = "Filiais e Depósitos (com desativação em cascata)"),
        (name = "Ferramentas", description = "Inventário de ferramentas e seu ciclo de vida"),
        (name = "Emprestimos", description = "Abertura e encerramento de empréstimos"),
        (name = "Manutencoes", description = "Manutenções preventivas e corretivas"),
        (name = "Dashboard", description = "Visão geral do inventário")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
