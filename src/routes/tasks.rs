use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Pagination, TaskId, TaskInput, TaskListResponse, TaskPatch, TaskQuery, TaskResponse},
    use_cases::TaskUseCases,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// Retrieves a page of the authenticated user's tasks.
///
/// Tasks are ordered by creation date, newest first.
///
/// ## Query Parameters:
/// - `page` (optional): 1-based page number, defaults to 1.
/// - `page_size` (optional): Between 1 and 100, defaults to 20.
/// - `completed` (optional): Only completed (`true`) or only pending (`false`) tasks.
///
/// ## Responses:
/// - `200 OK`: `{tasks, total_count, page, page_size, has_next}`.
/// - `400 Bad Request`: A query parameter could not be parsed.
/// - `401 Unauthorized`: If the request lacks a valid access token.
/// - `422 Unprocessable Entity`: `page` or `page_size` out of range.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskUseCases>,
    query: web::Query<TaskQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let pagination = Pagination::new(query.page, query.page_size)?;
    let page = tasks.list(user.id(), pagination, query.completed).await?;

    Ok(HttpResponse::Ok().json(TaskListResponse::from(page)))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: Returns the new task.
/// - `400 Bad Request`: Unparseable body.
/// - `401 Unauthorized`: If the request lacks a valid access token.
/// - `422 Unprocessable Entity`: Title empty or too long, description too long.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskUseCases>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks
        .create(
            user.id(),
            &task_data.title,
            task_data.description.as_deref(),
        )
        .await?;

    Ok(HttpResponse::Created().json(TaskResponse::from(task)))
}

/// Retrieves a single task.
///
/// ## Responses:
/// - `200 OK`: Returns the task.
/// - `400 Bad Request`: `id` is not a UUID.
/// - `404 Not Found`: The task does not exist or is owned by someone else.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskUseCases>,
    task_id: web::Path<TaskId>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = tasks.get(user.id(), task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

/// Partially updates a task.
///
/// Only the fields present in the body change. An explicit `"description": null`
/// clears the description.
///
/// ## Responses:
/// - `200 OK`: Returns the updated task.
/// - `404 Not Found`: The task does not exist or is owned by someone else.
/// - `422 Unprocessable Entity`: A supplied field is invalid.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskUseCases>,
    task_id: web::Path<TaskId>,
    patch: web::Json<TaskPatch>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    patch.validate()?;

    let task = tasks
        .update(user.id(), task_id.into_inner(), &patch)
        .await?;

    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

/// Deletes a task.
///
/// ## Responses:
/// - `204 No Content`: On successful deletion.
/// - `404 Not Found`: The task does not exist or is owned by someone else.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskUseCases>,
    task_id: web::Path<TaskId>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    tasks.delete(user.id(), task_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
