use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CreateTaskRequest, UpdateTaskRequest},
    tasks::TaskService,
    uploads::UploadedFile,
};
use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use futures::StreamExt;
use serde_json::json;
use uuid::Uuid;

/// Lists the authenticated user's tasks, newest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` objects.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let tasks = tasks.list(user.id()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: required, non-empty.
/// - `description` (optional).
/// - `status` (optional): one of `todo`, `in_progress`, `stuck`, `done`. Defaults to `todo`.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: missing title or unknown status.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    task_data: web::Json<CreateTaskRequest>,
) -> Result<impl Responder, AppError> {
    let task = tasks.create(user.id(), task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Per-status task counts for the authenticated user, e.g. `{"todo": 2, "done": 1}`.
/// Statuses without tasks are omitted.
#[get("/stats")]
pub async fn task_stats(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let stats = tasks.stats(user.id()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Retrieves a single task. `403` if it belongs to someone else, `404` if it does not exist.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = tasks.get(user.id(), task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates the provided fields of a task.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: unknown status or a malformed body.
/// - `403 Forbidden`: the task belongs to another user, whatever the body holds.
/// - `404 Not Found`: no such task.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();
    // The body is only looked at once the caller is known to own the task.
    tasks.get(user.id(), task_id).await?;
    let patch = parse_update(&body)?;
    let task = tasks.update(user.id(), task_id, patch).await?;
    Ok(HttpResponse::Ok().json(task))
}

fn parse_update(body: &[u8]) -> Result<UpdateTaskRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(UpdateTaskRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::ValidationError(e.to_string()))
}

/// Deletes a task and its attachment.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    tasks.delete(user.id(), task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}

/// Attaches a file to a task. Expects `multipart/form-data` with a `file` field.
///
/// ## Responses:
/// - `200 OK`: `{"filePath": "<stored path>"}`.
/// - `400 Bad Request`: no `file` field, malformed multipart, or file too large.
/// - `403 Forbidden` / `404 Not Found`: as for updates.
#[post("/{id}/upload")]
pub async fn upload_attachment(
    tasks: web::Data<TaskService>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    payload: Multipart,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();
    tasks.get(user.id(), task_id).await?;
    let file = read_file_field(payload, tasks.attachments().max_bytes()).await?;
    let file_path = tasks.attach(user.id(), task_id, &file).await?;
    Ok(HttpResponse::Ok().json(json!({ "filePath": file_path })))
}

async fn read_file_field(mut payload: Multipart, max_bytes: usize) -> Result<UploadedFile, AppError> {
    while let Some(field) = payload.next().await {
        let mut field = field.map_err(multipart_error)?;

        let disposition = field.content_disposition();
        if disposition.get_name() != Some("file") {
            continue;
        }
        let filename = disposition.get_filename().map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(multipart_error)?;
            if bytes.len() + chunk.len() > max_bytes {
                return Err(AppError::BadRequest(format!(
                    "File exceeds the {} byte limit",
                    max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        return Ok(UploadedFile { filename, bytes });
    }

    Err(AppError::BadRequest("No file uploaded".into()))
}

fn multipart_error(error: actix_multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("Invalid multipart payload: {}", error))
}
