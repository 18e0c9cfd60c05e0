use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use models::{question, question_option};

use crate::errors::ServiceError;
use crate::pagination::MAX_OFFSET;
use crate::question::dto::QuestionOptionCreationDto;

/// Storage contract for question rows.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// One page of questions in ascending id order.
    async fn list(&self, page_size: u64, offset: u64) -> Result<Vec<question::Model>, ServiceError>;
    /// Fails with [`ServiceError::NotFound`] when no row exists.
    async fn get(&self, id: i32) -> Result<question::Model, ServiceError>;
    /// Returns the storage-assigned id.
    async fn create(&self, body: &str) -> Result<i32, ServiceError>;
    /// Returns rows affected; `0` means there is no such question.
    async fn update(&self, id: i32, body: &str) -> Result<u64, ServiceError>;
    async fn delete(&self, id: i32) -> Result<(), ServiceError>;
}

/// Storage contract for options scoped to a question.
#[async_trait]
pub trait QuestionOptionRepository: Send + Sync {
    async fn list(&self, question_id: i32) -> Result<Vec<question_option::Model>, ServiceError>;
    async fn create(&self, question_id: i32, option: &QuestionOptionCreationDto) -> Result<(), ServiceError>;
    async fn delete_for_question(&self, question_id: i32) -> Result<(), ServiceError>;
}

/// SeaORM-backed question repository.
#[derive(Clone)]
pub struct SeaOrmQuestionRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmQuestionRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl QuestionRepository for SeaOrmQuestionRepository {
    async fn list(&self, page_size: u64, offset: u64) -> Result<Vec<question::Model>, ServiceError> {
        if offset > MAX_OFFSET || page_size > MAX_OFFSET {
            return Err(ServiceError::Validation(format!("offset {offset} is out of range")));
        }
        Ok(question::list_page(&self.db, page_size, offset).await?)
    }

    async fn get(&self, id: i32) -> Result<question::Model, ServiceError> {
        use sea_orm::EntityTrait;
        question::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("question"))
    }

    async fn create(&self, body: &str) -> Result<i32, ServiceError> {
        Ok(question::create(&self.db, body).await?)
    }

    async fn update(&self, id: i32, body: &str) -> Result<u64, ServiceError> {
        Ok(question::update_body(&self.db, id, body).await?)
    }

    async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        use sea_orm::EntityTrait;
        question::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}

/// SeaORM-backed option repository.
#[derive(Clone)]
pub struct SeaOrmQuestionOptionRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmQuestionOptionRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl QuestionOptionRepository for SeaOrmQuestionOptionRepository {
    async fn list(&self, question_id: i32) -> Result<Vec<question_option::Model>, ServiceError> {
        Ok(question_option::list_for_question(&self.db, question_id).await?)
    }

    async fn create(&self, question_id: i32, option: &QuestionOptionCreationDto) -> Result<(), ServiceError> {
        question_option::create(&self.db, question_id, &option.body, option.correct).await?;
        Ok(())
    }

    async fn delete_for_question(&self, question_id: i32) -> Result<(), ServiceError> {
        question_option::delete_for_question(&self.db, question_id).await?;
        Ok(())
    }
}

/// In-memory repositories for tests and doc examples.
///
/// Both mocks can share a [`mock::Journal`] recording every call in order,
/// and can be told to fail or stall specific operations.
pub mod mock {
    use super::*;
    use std::collections::{BTreeMap, HashSet};
    use std::sync::{Arc, Mutex};

    pub type Journal = Arc<Mutex<Vec<String>>>;

    pub fn journal() -> Journal { Arc::new(Mutex::new(Vec::new())) }

    fn record(journal: &Option<Journal>, entry: String) {
        if let Some(j) = journal {
            j.lock().unwrap().push(entry);
        }
    }

    fn injected(op: &str) -> ServiceError { ServiceError::Db(format!("injected failure: {op}")) }

    #[derive(Default)]
    pub struct MockQuestionRepository {
        rows: Mutex<BTreeMap<i32, question::Model>>, // key: id
        last_id: Mutex<i32>,
        failing: HashSet<&'static str>,
        journal: Option<Journal>,
    }

    impl MockQuestionRepository {
        pub fn with_journal(mut self, journal: Journal) -> Self {
            self.journal = Some(journal);
            self
        }

        /// Make `op` (`list`, `get`, `create`, `update` or `delete`) fail.
        pub fn failing(mut self, op: &'static str) -> Self {
            self.failing.insert(op);
            self
        }

        /// Insert a row directly, bypassing the journal.
        pub fn seed(&self, body: &str) -> i32 {
            let mut last = self.last_id.lock().unwrap();
            *last += 1;
            self.rows.lock().unwrap().insert(*last, question::Model { id: *last, body: body.to_string() });
            *last
        }

        pub fn count(&self) -> usize { self.rows.lock().unwrap().len() }

        fn check(&self, op: &'static str, entry: String) -> Result<(), ServiceError> {
            record(&self.journal, entry);
            if self.failing.contains(op) {
                return Err(injected(op));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl QuestionRepository for MockQuestionRepository {
        async fn list(&self, page_size: u64, offset: u64) -> Result<Vec<question::Model>, ServiceError> {
            self.check("list", format!("questions.list:{page_size}:{offset}"))?;
            let rows = self.rows.lock().unwrap();
            Ok(rows.values().skip(offset as usize).take(page_size as usize).cloned().collect())
        }

        async fn get(&self, id: i32) -> Result<question::Model, ServiceError> {
            self.check("get", format!("questions.get:{id}"))?;
            let rows = self.rows.lock().unwrap();
            rows.get(&id).cloned().ok_or_else(|| ServiceError::not_found("question"))
        }

        async fn create(&self, body: &str) -> Result<i32, ServiceError> {
            self.check("create", format!("questions.create:{body}"))?;
            models::question::validate_body(body)?;
            Ok(self.seed(body))
        }

        async fn update(&self, id: i32, body: &str) -> Result<u64, ServiceError> {
            self.check("update", format!("questions.update:{id}"))?;
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(&id) {
                Some(row) => {
                    row.body = body.to_string();
                    Ok(1)
                }
                None => Ok(0),
            }
        }

        async fn delete(&self, id: i32) -> Result<(), ServiceError> {
            self.check("delete", format!("questions.delete:{id}"))?;
            self.rows.lock().unwrap().remove(&id);
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct MockQuestionOptionRepository {
        rows: Mutex<BTreeMap<i32, question_option::Model>>, // key: option id
        last_id: Mutex<i32>,
        creates: Mutex<usize>,
        failing: HashSet<&'static str>,
        fail_create_at: Option<usize>,
        stall_on: Option<String>,
        journal: Option<Journal>,
    }

    impl MockQuestionOptionRepository {
        pub fn with_journal(mut self, journal: Journal) -> Self {
            self.journal = Some(journal);
            self
        }

        /// Make `op` (`list`, `create` or `delete`) fail on every call.
        pub fn failing(mut self, op: &'static str) -> Self {
            self.failing.insert(op);
            self
        }

        /// Fail the `n`-th create call (0-based); earlier calls succeed.
        pub fn fail_create_at(mut self, n: usize) -> Self {
            self.fail_create_at = Some(n);
            self
        }

        /// Never complete a create whose body equals `body`.
        pub fn stall_on(mut self, body: &str) -> Self {
            self.stall_on = Some(body.to_string());
            self
        }

        /// Insert a row directly, bypassing the journal.
        pub fn seed(&self, question_id: i32, body: &str, correct: i32) -> i32 {
            let mut last = self.last_id.lock().unwrap();
            *last += 1;
            let row = question_option::Model { id: *last, body: body.to_string(), correct, question_id };
            self.rows.lock().unwrap().insert(*last, row);
            *last
        }

        pub fn for_question(&self, question_id: i32) -> Vec<question_option::Model> {
            let rows = self.rows.lock().unwrap();
            rows.values().filter(|o| o.question_id == question_id).cloned().collect()
        }

        fn check(&self, op: &'static str, entry: String) -> Result<(), ServiceError> {
            record(&self.journal, entry);
            if self.failing.contains(op) {
                return Err(injected(op));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl QuestionOptionRepository for MockQuestionOptionRepository {
        async fn list(&self, question_id: i32) -> Result<Vec<question_option::Model>, ServiceError> {
            self.check("list", format!("options.list:{question_id}"))?;
            Ok(self.for_question(question_id))
        }

        async fn create(&self, question_id: i32, option: &QuestionOptionCreationDto) -> Result<(), ServiceError> {
            self.check("create", format!("options.create:{question_id}:{}", option.body))?;
            let call = {
                let mut creates = self.creates.lock().unwrap();
                let call = *creates;
                *creates += 1;
                call
            };
            if self.fail_create_at == Some(call) {
                return Err(injected("create"));
            }
            if self.stall_on.as_deref() == Some(option.body.as_str()) {
                std::future::pending::<()>().await;
            }
            self.seed(question_id, &option.body, question_option::correct_flag(option.correct));
            Ok(())
        }

        async fn delete_for_question(&self, question_id: i32) -> Result<(), ServiceError> {
            self.check("delete", format!("options.delete:{question_id}"))?;
            self.rows.lock().unwrap().retain(|_, o| o.question_id != question_id);
            Ok(())
        }
    }
}
