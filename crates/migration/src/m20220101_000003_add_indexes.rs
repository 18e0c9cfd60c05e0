use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // QuestionOption: lookups and bulk deletes are scoped by question
        manager
            .create_index(
                Index::create()
                    .name("idx_question_option_question")
                    .table(QuestionOption::Table)
                    .col(QuestionOption::QuestionId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_question_option_question")
                    .table(QuestionOption::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum QuestionOption { Table, QuestionId }
