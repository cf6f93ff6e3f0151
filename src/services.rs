pub mod auth;
pub mod catalogo_service;
pub mod dashboard_service;
pub mod emprestimo_service;
pub mod ferramenta_service;
pub mod funcionario_service;
pub mod manutencao_service;
pub mod organizacao_service;
