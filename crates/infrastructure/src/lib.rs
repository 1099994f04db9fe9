//! 基础设施层：Postgres 仓储实现与连接池构建。

pub mod db;
pub mod repository;

pub use db::{create_pg_pool, DbPool};
pub use repository::{PgChatRepository, PgMessageRepository, PgOfficerRepository};
