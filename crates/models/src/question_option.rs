//! Selectable option belonging to a question.
//!
//! `correct` is persisted as an integer flag. This module is the only place
//! that converts between that flag and a boolean: writers go through
//! [`correct_flag`], readers through [`Model::is_correct`].

use sea_orm::{entity::prelude::*, DatabaseConnection, NotSet, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, question};

pub const CORRECT: i32 = 1;
pub const INCORRECT: i32 = 0;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question_option")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub correct: i32,
    pub question_id: i32,
}

impl Model {
    pub fn is_correct(&self) -> bool { self.correct == CORRECT }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Question }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Question => Entity::belongs_to(question::Entity)
                .from(Column::QuestionId)
                .to(question::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<question::Entity> for Entity {
    fn to() -> RelationDef { Relation::Question.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn correct_flag(correct: bool) -> i32 {
    if correct { CORRECT } else { INCORRECT }
}

pub fn validate_body(body: &str) -> Result<(), errors::ModelError> {
    if body.trim().is_empty() {
        return Err(errors::ModelError::Validation("option body required".into()));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    question_id: i32,
    body: &str,
    correct: bool,
) -> Result<i32, errors::ModelError> {
    validate_body(body)?;
    let am = ActiveModel {
        id: NotSet,
        body: Set(body.to_string()),
        correct: Set(correct_flag(correct)),
        question_id: Set(question_id),
    };
    let res = Entity::insert(am).exec(db).await?;
    Ok(res.last_insert_id)
}

/// Options of one question in insertion (id) order.
pub async fn list_for_question(db: &DatabaseConnection, question_id: i32) -> Result<Vec<Model>, errors::ModelError> {
    let rows = Entity::find()
        .filter(Column::QuestionId.eq(question_id))
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn delete_for_question(db: &DatabaseConnection, question_id: i32) -> Result<u64, errors::ModelError> {
    let res = Entity::delete_many()
        .filter(Column::QuestionId.eq(question_id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
