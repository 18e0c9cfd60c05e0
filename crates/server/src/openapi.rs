use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub title: String,
    pub detail: Option<String>,
}

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct QuestionOptionDoc {
    pub id: i32,
    pub body: String,
    pub correct: bool,
}

#[derive(ToSchema)]
pub struct QuestionDoc {
    pub id: i32,
    pub body: String,
    pub options: Vec<QuestionOptionDoc>,
}

#[derive(ToSchema)]
pub struct QuestionOptionCreationDoc {
    pub body: String,
    #[schema(default = false)]
    pub correct: bool,
}

#[derive(ToSchema)]
pub struct QuestionCreationDoc {
    pub body: String,
    pub options: Vec<QuestionOptionCreationDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::questions::list,
        crate::questions::get,
        crate::questions::create,
        crate::questions::update,
        crate::questions::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            MessageDoc,
            QuestionOptionDoc,
            QuestionDoc,
            QuestionOptionCreationDoc,
            QuestionCreationDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "questions")
    )
)]
pub struct ApiDoc;
