use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use models::question;

use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::question::dto::{QuestionCreationDto, QuestionDto, QuestionOptionCreationDto};
use crate::question::repository::{QuestionOptionRepository, QuestionRepository};

/// Application service composing questions and their options.
///
/// Stateless apart from the two repositories. Create and update are a
/// sequence of independent store calls: a failure part-way leaves whatever
/// was already written in place, and dropping the returned future stops the
/// sequence at the current store call.
pub struct QuestionService<Q: QuestionRepository, O: QuestionOptionRepository> {
    questions: Arc<Q>,
    options: Arc<O>,
}

impl<Q: QuestionRepository, O: QuestionOptionRepository> QuestionService<Q, O> {
    pub fn new(questions: Arc<Q>, options: Arc<O>) -> Self { Self { questions, options } }

    /// One page of questions, each with its options, in question id order.
    ///
    /// The first failing store call aborts the whole page.
    #[instrument(skip(self))]
    pub async fn get_questions(&self, page_size: u64, offset: u64) -> Result<Vec<QuestionDto>, ServiceError> {
        let rows = self.questions.list(page_size, offset).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(self.assemble(row).await?);
        }
        debug!(count = out.len(), "questions_listed");
        Ok(out)
    }

    pub async fn get_questions_page(&self, page: Pagination) -> Result<Vec<QuestionDto>, ServiceError> {
        self.get_questions(page.limit(), page.offset()).await
    }

    /// A single question with its options; [`ServiceError::NotFound`] when absent.
    ///
    /// # Examples
    /// ```
    /// use service::QuestionService;
    /// use service::question::repository::mock::{MockQuestionRepository, MockQuestionOptionRepository};
    /// use std::sync::Arc;
    /// let questions = Arc::new(MockQuestionRepository::default());
    /// let options = Arc::new(MockQuestionOptionRepository::default());
    /// let id = questions.seed("first-question");
    /// options.seed(id, "first-option", 0);
    /// options.seed(id, "second-option", 1);
    /// let svc = QuestionService::new(questions, options);
    /// let q = tokio_test::block_on(svc.get_question_by_id(id)).unwrap();
    /// assert_eq!(q.body, "first-question");
    /// assert!(!q.options[0].correct);
    /// assert!(q.options[1].correct);
    /// assert!(tokio_test::block_on(svc.get_question_by_id(99)).unwrap_err().is_not_found());
    /// ```
    #[instrument(skip(self))]
    pub async fn get_question_by_id(&self, id: i32) -> Result<QuestionDto, ServiceError> {
        let row = self.questions.get(id).await?;
        self.assemble(row).await
    }

    /// Create a question and its options, then return what storage now holds.
    ///
    /// # Examples
    /// ```
    /// use service::QuestionService;
    /// use service::question::dto::{QuestionCreationDto, QuestionOptionCreationDto};
    /// use service::question::repository::mock::{MockQuestionRepository, MockQuestionOptionRepository};
    /// use std::sync::Arc;
    /// let svc = QuestionService::new(
    ///     Arc::new(MockQuestionRepository::default()),
    ///     Arc::new(MockQuestionOptionRepository::default()),
    /// );
    /// let input = QuestionCreationDto {
    ///     body: "first-question".into(),
    ///     options: vec![
    ///         QuestionOptionCreationDto { body: "first-option".into(), correct: false },
    ///         QuestionOptionCreationDto { body: "second-option".into(), correct: true },
    ///     ],
    /// };
    /// let created = tokio_test::block_on(svc.create_question(&input)).unwrap();
    /// assert_eq!(created.id, 1);
    /// assert_eq!(created.options.len(), 2);
    /// assert!(created.options[1].correct);
    /// ```
    #[instrument(skip(self, input), fields(options = input.options.len()))]
    pub async fn create_question(&self, input: &QuestionCreationDto) -> Result<QuestionDto, ServiceError> {
        let id = self.questions.create(&input.body).await?;
        self.create_options(id, &input.options).await?;
        let created = self.get_question_by_id(id).await?;
        info!(question_id = id, options = created.options.len(), "question_created");
        Ok(created)
    }

    /// Replace body and the whole option set of an existing question.
    ///
    /// An unknown id is not an error: the result is [`QuestionDto::default`]
    /// and no option is touched.
    #[instrument(skip(self, input), fields(options = input.options.len()))]
    pub async fn update_question(&self, id: i32, input: &QuestionCreationDto) -> Result<QuestionDto, ServiceError> {
        let touched = self.questions.update(id, &input.body).await?;
        if touched == 0 {
            info!(question_id = id, "question_update_noop");
            return Ok(QuestionDto::default());
        }

        if let Err(e) = self.options.delete_for_question(id).await {
            warn!(question_id = id, error = %e, "question_options_not_cleared");
            return Err(e);
        }
        self.create_options(id, &input.options).await?;

        let updated = self.get_question_by_id(id).await?;
        info!(question_id = id, options = updated.options.len(), "question_updated");
        Ok(updated)
    }

    /// Remove a question. Its options go with it through the storage cascade.
    #[instrument(skip(self))]
    pub async fn delete_question(&self, id: i32) -> Result<(), ServiceError> {
        self.questions.delete(id).await?;
        info!(question_id = id, "question_deleted");
        Ok(())
    }

    async fn assemble(&self, row: question::Model) -> Result<QuestionDto, ServiceError> {
        let options = self.options.list(row.id).await?;
        Ok(QuestionDto::from_parts(row, options))
    }

    async fn create_options(&self, question_id: i32, options: &[QuestionOptionCreationDto]) -> Result<(), ServiceError> {
        for (written, option) in options.iter().enumerate() {
            if let Err(e) = self.options.create(question_id, option).await {
                warn!(question_id, written, total = options.len(), error = %e, "question_create_partial");
                return Err(e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::question::dto::QuestionOptionDto;
    use crate::question::repository::mock::{journal, Journal, MockQuestionOptionRepository, MockQuestionRepository};

    type MockService = QuestionService<MockQuestionRepository, MockQuestionOptionRepository>;

    fn service(questions: MockQuestionRepository, options: MockQuestionOptionRepository) -> (MockService, Arc<MockQuestionRepository>, Arc<MockQuestionOptionRepository>) {
        let questions = Arc::new(questions);
        let options = Arc::new(options);
        (QuestionService::new(questions.clone(), options.clone()), questions, options)
    }

    fn input(body: &str, options: &[(&str, bool)]) -> QuestionCreationDto {
        QuestionCreationDto {
            body: body.into(),
            options: options
                .iter()
                .map(|(b, c)| QuestionOptionCreationDto { body: (*b).into(), correct: *c })
                .collect(),
        }
    }

    fn entries(j: &Journal) -> Vec<String> { j.lock().unwrap().clone() }

    fn seed_three_options(options: &MockQuestionOptionRepository, question_id: i32) {
        options.seed(question_id, "first-option", 0);
        options.seed(question_id, "second-option", 0);
        options.seed(question_id, "third-option", 1);
    }

    #[tokio::test]
    async fn get_questions_assembles_each_question_in_order() {
        let j = journal();
        let (svc, questions, options) = service(
            MockQuestionRepository::default().with_journal(j.clone()),
            MockQuestionOptionRepository::default().with_journal(j.clone()),
        );
        let q1 = questions.seed("first-question");
        let q2 = questions.seed("second-question");
        seed_three_options(&options, q1);
        seed_three_options(&options, q2);

        let page = svc.get_questions(10, 0).await.unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page[0].body, "first-question");
        assert_eq!(page[1].body, "second-question");
        for q in &page {
            let flags: Vec<bool> = q.options.iter().map(|o| o.correct).collect();
            assert_eq!(flags, vec![false, false, true]);
        }
        assert_eq!(entries(&j), vec!["questions.list:10:0", "options.list:1", "options.list:2"]);
    }

    #[tokio::test]
    async fn get_questions_empty_page_is_empty_list() {
        let (svc, _, _) = service(MockQuestionRepository::default(), MockQuestionOptionRepository::default());
        assert_eq!(svc.get_questions(50, 0).await.unwrap(), Vec::<QuestionDto>::new());
    }

    #[tokio::test]
    async fn get_questions_page_uses_limit_and_offset() {
        let j = journal();
        let (svc, questions, _) = service(
            MockQuestionRepository::default().with_journal(j.clone()),
            MockQuestionOptionRepository::default(),
        );
        for i in 0..5 {
            questions.seed(&format!("q{i}"));
        }
        let page = svc.get_questions_page(Pagination::new(2, 2)).await.unwrap();
        assert_eq!(page.iter().map(|q| q.id).collect::<Vec<_>>(), vec![3, 4]);
        assert_eq!(entries(&j)[0], "questions.list:2:2");
    }

    #[tokio::test]
    async fn get_questions_fails_when_listing_fails() {
        let (svc, questions, _) = service(
            MockQuestionRepository::default().failing("list"),
            MockQuestionOptionRepository::default(),
        );
        questions.seed("q");
        assert!(svc.get_questions(10, 0).await.is_err());
    }

    #[tokio::test]
    async fn get_questions_fails_when_options_fail() {
        let (svc, questions, _) = service(
            MockQuestionRepository::default(),
            MockQuestionOptionRepository::default().failing("list"),
        );
        questions.seed("first-question");
        assert!(matches!(svc.get_questions(10, 0).await, Err(ServiceError::Db(_))));
    }

    #[tokio::test]
    async fn get_question_by_id_returns_aggregate() {
        let (svc, questions, options) = service(MockQuestionRepository::default(), MockQuestionOptionRepository::default());
        let id = questions.seed("first-question");
        seed_three_options(&options, id);

        let q = svc.get_question_by_id(id).await.unwrap();
        assert_eq!(
            q,
            QuestionDto {
                id: 1,
                body: "first-question".into(),
                options: vec![
                    QuestionOptionDto { id: 1, body: "first-option".into(), correct: false },
                    QuestionOptionDto { id: 2, body: "second-option".into(), correct: false },
                    QuestionOptionDto { id: 3, body: "third-option".into(), correct: true },
                ],
            }
        );
    }

    #[tokio::test]
    async fn get_question_by_id_propagates_not_found() {
        let j = journal();
        let (svc, _, _) = service(
            MockQuestionRepository::default().with_journal(j.clone()),
            MockQuestionOptionRepository::default().with_journal(j.clone()),
        );
        assert!(svc.get_question_by_id(1).await.unwrap_err().is_not_found());
        assert_eq!(entries(&j), vec!["questions.get:1"]);
    }

    #[tokio::test]
    async fn get_question_by_id_fails_when_options_fail() {
        let (svc, questions, _) = service(
            MockQuestionRepository::default(),
            MockQuestionOptionRepository::default().failing("list"),
        );
        let id = questions.seed("q");
        assert!(svc.get_question_by_id(id).await.is_err());
    }

    #[tokio::test]
    async fn create_writes_question_then_options_in_order_then_refetches() {
        let j = journal();
        let (svc, _, _) = service(
            MockQuestionRepository::default().with_journal(j.clone()),
            MockQuestionOptionRepository::default().with_journal(j.clone()),
        );

        let created = svc
            .create_question(&input("first-question", &[("first-option", false), ("second-option", true)]))
            .await
            .unwrap();

        assert_eq!(
            created,
            QuestionDto {
                id: 1,
                body: "first-question".into(),
                options: vec![
                    QuestionOptionDto { id: 1, body: "first-option".into(), correct: false },
                    QuestionOptionDto { id: 2, body: "second-option".into(), correct: true },
                ],
            }
        );
        assert_eq!(
            entries(&j),
            vec![
                "questions.create:first-question",
                "options.create:1:first-option",
                "options.create:1:second-option",
                "questions.get:1",
                "options.list:1",
            ]
        );
        assert_eq!(svc.get_question_by_id(1).await.unwrap(), created);
    }

    #[tokio::test]
    async fn create_aborts_when_question_insert_fails() {
        let j = journal();
        let (svc, _, options) = service(
            MockQuestionRepository::default().with_journal(j.clone()).failing("create"),
            MockQuestionOptionRepository::default().with_journal(j.clone()),
        );
        let err = svc.create_question(&input("q", &[("a", true)])).await.unwrap_err();
        assert!(matches!(err, ServiceError::Db(_)));
        assert_eq!(entries(&j), vec!["questions.create:q"]);
        assert!(options.for_question(1).is_empty());
    }

    #[tokio::test]
    async fn create_leaves_partial_aggregate_when_an_option_fails() {
        let j = journal();
        let (svc, questions, options) = service(
            MockQuestionRepository::default().with_journal(j.clone()),
            MockQuestionOptionRepository::default().with_journal(j.clone()).fail_create_at(1),
        );

        let err = svc.create_question(&input("q", &[("a", true), ("b", false), ("c", false)])).await;
        assert!(err.is_err());

        // no rollback: question and the first option stay, "c" is never attempted
        assert_eq!(questions.count(), 1);
        let left: Vec<String> = options.for_question(1).into_iter().map(|o| o.body).collect();
        assert_eq!(left, vec!["a"]);
        assert_eq!(entries(&j), vec!["questions.create:q", "options.create:1:a", "options.create:1:b"]);
    }

    #[tokio::test]
    async fn create_with_empty_body_is_rejected_by_store() {
        let (svc, questions, _) = service(MockQuestionRepository::default(), MockQuestionOptionRepository::default());
        let err = svc.create_question(&input("  ", &[])).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(questions.count(), 0);
    }

    #[tokio::test]
    async fn dropped_create_stops_remaining_steps() {
        let (svc, questions, options) = service(
            MockQuestionRepository::default(),
            MockQuestionOptionRepository::default().stall_on("b"),
        );

        let res = tokio::time::timeout(
            Duration::from_millis(50),
            svc.create_question(&input("q", &[("a", true), ("b", false), ("c", false)])),
        )
        .await;

        assert!(res.is_err(), "create should still be waiting on the stalled option");
        assert_eq!(questions.count(), 1);
        let left: Vec<String> = options.for_question(1).into_iter().map(|o| o.body).collect();
        assert_eq!(left, vec!["a"]);
    }

    #[tokio::test]
    async fn update_unknown_question_is_noop_success() {
        let j = journal();
        let (svc, _, _) = service(
            MockQuestionRepository::default().with_journal(j.clone()),
            MockQuestionOptionRepository::default().with_journal(j.clone()),
        );
        let res = svc.update_question(7, &input("q", &[("a", true)])).await.unwrap();
        assert_eq!(res, QuestionDto::default());
        assert!(res.is_empty());
        assert_eq!(entries(&j), vec!["questions.update:7"]);
    }

    #[tokio::test]
    async fn update_replaces_the_whole_option_set() {
        let j = journal();
        let (svc, _, options) = service(
            MockQuestionRepository::default().with_journal(j.clone()),
            MockQuestionOptionRepository::default().with_journal(j.clone()),
        );
        let created = svc.create_question(&input("q", &[("a", true), ("b", false), ("c", false)])).await.unwrap();
        j.lock().unwrap().clear();

        let updated = svc.update_question(created.id, &input("q2", &[("x", false), ("y", true)])).await.unwrap();

        assert_eq!(updated.body, "q2");
        let got: Vec<(&str, bool)> = updated.options.iter().map(|o| (o.body.as_str(), o.correct)).collect();
        assert_eq!(got, vec![("x", false), ("y", true)]);
        assert_eq!(options.for_question(created.id).len(), 2);
        assert_eq!(svc.get_question_by_id(created.id).await.unwrap(), updated);
        assert_eq!(
            entries(&j)[..4],
            ["questions.update:1", "options.delete:1", "options.create:1:x", "options.create:1:y"]
        );
    }

    #[tokio::test]
    async fn update_fails_when_options_cannot_be_cleared() {
        let j = journal();
        let (svc, questions, options) = service(
            MockQuestionRepository::default().with_journal(j.clone()),
            MockQuestionOptionRepository::default().with_journal(j.clone()).failing("delete"),
        );
        let id = questions.seed("q");
        options.seed(id, "old", 1);

        assert!(svc.update_question(id, &input("q2", &[("new", false)])).await.is_err());
        assert_eq!(entries(&j), vec!["questions.update:1", "options.delete:1"]);
        // body already changed, old options still there
        assert_eq!(svc.get_question_by_id(id).await.unwrap().options[0].body, "old");
    }

    #[tokio::test]
    async fn update_fails_when_recreating_options_fails() {
        let (svc, questions, options) = service(
            MockQuestionRepository::default(),
            MockQuestionOptionRepository::default().fail_create_at(0),
        );
        let id = questions.seed("q");
        options.seed(id, "old", 1);

        assert!(svc.update_question(id, &input("q2", &[("new", false)])).await.is_err());
        assert!(options.for_question(id).is_empty());
    }

    #[tokio::test]
    async fn update_propagates_store_failure() {
        let (svc, questions, _) = service(
            MockQuestionRepository::default().failing("update"),
            MockQuestionOptionRepository::default(),
        );
        let id = questions.seed("q");
        assert!(matches!(svc.update_question(id, &input("q2", &[])).await, Err(ServiceError::Db(_))));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let j = journal();
        let (svc, _, _) = service(
            MockQuestionRepository::default().with_journal(j.clone()),
            MockQuestionOptionRepository::default().with_journal(j.clone()),
        );
        let created = svc.create_question(&input("q", &[("a", true)])).await.unwrap();
        j.lock().unwrap().clear();

        svc.delete_question(created.id).await.unwrap();
        assert_eq!(entries(&j), vec!["questions.delete:1"]);
        assert!(svc.get_question_by_id(created.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_propagates_store_failure() {
        let (svc, _, _) = service(
            MockQuestionRepository::default().failing("delete"),
            MockQuestionOptionRepository::default(),
        );
        assert!(svc.delete_question(1).await.is_err());
    }
}
