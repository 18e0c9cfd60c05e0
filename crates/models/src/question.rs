use sea_orm::{entity::prelude::*, sea_query::Expr, DatabaseConnection, NotSet, QueryOrder, QuerySelect, Set};
use serde::{Deserialize, Serialize};

use crate::{errors, question_option};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub body: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Options }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Options => Entity::has_many(question_option::Entity).into(),
        }
    }
}

impl Related<question_option::Entity> for Entity {
    fn to() -> RelationDef { Relation::Options.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_body(body: &str) -> Result<(), errors::ModelError> {
    if body.trim().is_empty() {
        return Err(errors::ModelError::Validation("question body required".into()));
    }
    Ok(())
}

/// Insert a question and return its storage-assigned id.
pub async fn create<C: ConnectionTrait>(db: &C, body: &str) -> Result<i32, errors::ModelError> {
    validate_body(body)?;
    let am = ActiveModel { id: NotSet, body: Set(body.to_string()) };
    let res = Entity::insert(am).exec(db).await?;
    Ok(res.last_insert_id)
}

/// One page of questions in ascending id order.
pub async fn list_page(db: &DatabaseConnection, page_size: u64, offset: u64) -> Result<Vec<Model>, errors::ModelError> {
    let rows = Entity::find()
        .order_by_asc(Column::Id)
        .limit(page_size)
        .offset(offset)
        .all(db)
        .await?;
    Ok(rows)
}

/// Replace the body; returns the number of rows touched (0 when the id is unknown).
pub async fn update_body(db: &DatabaseConnection, id: i32, body: &str) -> Result<u64, errors::ModelError> {
    validate_body(body)?;
    let res = Entity::update_many()
        .col_expr(Column::Body, Expr::value(body.to_string()))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
