//! Create `question_option` table.
//! `correct` is stored as an integer flag (0/1). Options are removed together
//! with their question through the cascading foreign key.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuestionOption::Table)
                    .if_not_exists()
                    .col(pk_auto(QuestionOption::Id))
                    .col(text(QuestionOption::Body).not_null())
                    .col(integer(QuestionOption::Correct).not_null().default(0))
                    .col(integer(QuestionOption::QuestionId).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_question_option_question")
                            .from(QuestionOption::Table, QuestionOption::QuestionId)
                            .to(Question::Table, Question::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(QuestionOption::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum QuestionOption {
    Table,
    Id,
    Body,
    Correct,
    QuestionId,
}

#[derive(DeriveIden)]
enum Question { Table, Id }
