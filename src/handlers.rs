pub mod auth;
pub mod catalogo;
pub mod dashboard;
pub mod emprestimos;
pub mod ferramentas;
pub mod funcionarios;
pub mod manutencoes;
pub mod organizacao;
