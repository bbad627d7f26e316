//! Application state wiring all services together.
//!
//! Services are generic over repository and hasher traits; AppState
//! pins them to the concrete infra implementations.

use std::sync::Arc;

use chrono::Duration;

use syrup_core::auth::{AuthService, TokenService};
use syrup_core::chat::ConversationAggregator;
use syrup_core::realtime::{ChatGateway, ConnectionRegistry};
use syrup_infra::crypto::Argon2PasswordHasher;
use syrup_infra::sqlite::pool::DatabasePool;
use syrup_infra::sqlite::{SqliteMessageRepository, SqliteUserRepository};
use syrup_types::config::ServerConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAuthService = AuthService<SqliteUserRepository, Argon2PasswordHasher>;
pub type ConcreteChatGateway = ChatGateway<SqliteMessageRepository, SqliteUserRepository>;
pub type ConcreteAggregator = ConversationAggregator<SqliteMessageRepository, SqliteUserRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<ConcreteAuthService>,
    pub gateway: Arc<ConcreteChatGateway>,
    pub chats: Arc<ConcreteAggregator>,
    pub users: Arc<SqliteUserRepository>,
    pub messages: Arc<SqliteMessageRepository>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<ServerConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to the database, wire
    /// services.
    pub async fn init(config: ServerConfig) -> anyhow::Result<Self> {
        let db_pool =
            DatabasePool::with_reader_limit(&config.database_url, config.max_read_connections)
                .await?;

        let users = Arc::new(SqliteUserRepository::new(db_pool.clone()));
        let messages = Arc::new(SqliteMessageRepository::new(db_pool.clone()));

        let tokens = Arc::new(TokenService::new(
            &config.jwt_secret,
            Duration::minutes(config.access_ttl_minutes),
            Duration::days(config.refresh_ttl_days),
        ));

        let auth_service = Arc::new(AuthService::new(
            users.clone(),
            Argon2PasswordHasher::new(),
            tokens.clone(),
        ));

        let registry = Arc::new(ConnectionRegistry::new(tokens.clone()));
        let gateway = Arc::new(ChatGateway::new(registry, messages.clone(), users.clone()));
        let chats = Arc::new(ConversationAggregator::new(messages.clone(), users.clone()));

        Ok(Self {
            auth_service,
            gateway,
            chats,
            users,
            messages,
            tokens,
            config: Arc::new(config),
            db_pool,
        })
    }
}
