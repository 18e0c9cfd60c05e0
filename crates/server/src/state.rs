use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::question::repository::{SeaOrmQuestionOptionRepository, SeaOrmQuestionRepository};
use service::QuestionService;

pub type AppQuestionService = QuestionService<SeaOrmQuestionRepository, SeaOrmQuestionOptionRepository>;

/// Shared handler state: one service instance built at startup.
#[derive(Clone)]
pub struct ServerState {
    pub questions: Arc<AppQuestionService>,
}

impl ServerState {
    /// Wire both SeaORM repositories onto the same connection pool.
    pub fn new(db: DatabaseConnection) -> Self {
        let service = QuestionService::new(
            Arc::new(SeaOrmQuestionRepository::new(db.clone())),
            Arc::new(SeaOrmQuestionOptionRepository::new(db)),
        );
        Self { questions: Arc::new(service) }
    }
}
