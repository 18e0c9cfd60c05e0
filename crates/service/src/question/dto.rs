use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use models::{question, question_option};

/// Option as returned to API clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOptionDto {
    pub id: i32,
    pub body: String,
    pub correct: bool,
}

/// Question with its options as returned to API clients.
///
/// The default value (id 0, empty body, no options) is the "nothing there"
/// response of an update that targeted an unknown question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDto {
    pub id: i32,
    pub body: String,
    pub options: Vec<QuestionOptionDto>,
}

/// Option payload for create and update requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct QuestionOptionCreationDto {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub body: String,
    #[serde(default)]
    pub correct: bool,
}

/// Question payload for create and update requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct QuestionCreationDto {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub body: String,
    #[serde(default)]
    #[validate(nested)]
    pub options: Vec<QuestionOptionCreationDto>,
}

/// Same rule as the entity layer: whitespace alone is not a body.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

impl From<question_option::Model> for QuestionOptionDto {
    fn from(m: question_option::Model) -> Self {
        Self { id: m.id, correct: m.is_correct(), body: m.body }
    }
}

impl QuestionDto {
    pub fn from_parts(q: question::Model, options: Vec<question_option::Model>) -> Self {
        Self {
            id: q.id,
            body: q.body,
            options: options.into_iter().map(QuestionOptionDto::from).collect(),
        }
    }

    pub fn is_empty(&self) -> bool { self.id == 0 }
}
