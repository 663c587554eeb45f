pub mod auth;
pub mod categorias;
pub mod clientes_fornecedores;
pub mod contas;
pub mod transacoes;
