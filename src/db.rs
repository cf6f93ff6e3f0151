pub mod usuario_repo;
pub use usuario_repo::UsuarioRepository;
pub mod organizacao_repo;
pub use organizacao_repo::OrganizacaoRepository;
pub mod catalogo_repo;
pub use catalogo_repo::CatalogoRepository;
pub mod ferramenta_repo;
pub use ferramenta_repo::FerramentaRepository;
pub mod funcionario_repo;
pub use funcionario_repo::FuncionarioRepository;
pub mod emprestimo_repo;
pub use emprestimo_repo::EmprestimoRepository;
pub mod manutencao_repo;
pub use manutencao_repo::ManutencaoRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
