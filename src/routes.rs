use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, Query, State},
    response::{Html, IntoResponse},
    routing::{delete, get, post, put},
    Json, Router,
};
use http::{header, HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

use crate::blobs::{self, Blob};
use crate::error::{Notice, StudioError};
use crate::ids::{ContentId, ModuleId, QuestionId, VideoId};
use crate::library::{self, UploadMeta};
use crate::models::*;
use crate::player::{self, Player, PlayerCommand, PlayerView};
use crate::shell;
use crate::studio::AppState;
use crate::tasks::PendingTask;
use crate::templates;

type ApiResult<T> = Result<Json<Ack<T>>, StudioError>;

/// Every successful mutation answers with a notice for the author plus the new state.
#[derive(Serialize, Deserialize, Debug)]
pub struct Ack<T> {
    pub notice: Notice,
    pub data: T,
}

fn ack<T>(message: &str, data: T) -> ApiResult<T> {
    Ok(Json(Ack { notice: Notice::success(message), data }))
}

fn info<T>(message: &str, data: T) -> ApiResult<T> {
    Ok(Json(Ack { notice: Notice::info(message), data }))
}

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.body_limit();
    Router::new()
        .route("/api/studio", get(snapshot))
        // course info + preview
        .route("/api/course", put(save_course))
        .route("/api/preview", get(preview))
        .route("/api/publish", post(publish))
        // module editor
        .route("/api/modules", post(add_module))
        .route("/api/modules/draft", put(edit_module_draft).delete(reset_module_draft))
        .route("/api/modules/draft/template", post(apply_template))
        .route("/api/modules/:id", put(update_module).delete(remove_module))
        .route("/api/modules/:id/move", post(move_module))
        .route("/api/modules/:id/duplicate", post(duplicate_module))
        .route("/api/modules/:id/status", put(set_module_status))
        .route("/api/modules/:id/expand", post(toggle_expanded))
        .route("/api/modules/:id/content", post(add_content))
        .route("/api/modules/:id/content/:content_id", delete(remove_content))
        .route("/api/modules/:id/content/:content_id/complete", post(toggle_completed))
        // quiz builder
        .route("/api/quiz", put(update_quiz_settings))
        .route("/api/quiz/draft", put(edit_question_draft))
        .route("/api/quiz/questions", post(add_question))
        .route("/api/quiz/questions/:id", delete(remove_question))
        // content library
        .route("/api/library", get(list_videos))
        .route("/api/library/upload", post(upload_video))
        .route("/api/library/uploads", get(uploads_in_flight))
        .route("/api/library/:id", put(edit_video).delete(delete_video))
        .route("/blob/:id", get(serve_blob))
        // player
        .route("/api/player", get(player_state).delete(close_player))
        .route("/api/player/open/:video_id", post(open_player))
        .route("/api/player/command", post(player_command))
        .route("/api/player/key", post(player_key))
        .route("/player", get(player_shell))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

// --- course ---

async fn snapshot(State(app): State<AppState>) -> Result<impl IntoResponse, StudioError> {
    let studio = app.lock()?;
    let body = serde_json::to_value(studio.snapshot()).map_err(internal)?;
    Ok(Json(body))
}

async fn save_course(State(app): State<AppState>, Json(form): Json<Course>) -> ApiResult<Course> {
    let mut studio = app.lock()?;
    let course = studio.save_course(&form)?.clone();
    ack("Course information saved successfully!", course)
}

async fn preview(State(app): State<AppState>) -> Result<Json<crate::course::Preview>, StudioError> {
    let studio = app.lock()?;
    Ok(Json(studio.preview()))
}

async fn publish(State(app): State<AppState>) -> ApiResult<crate::course::Preview> {
    let studio = app.lock()?;
    studio.publish()?;
    ack("Course published successfully!", studio.preview())
}

// --- modules ---

async fn edit_module_draft(
    State(app): State<AppState>,
    Json(req): Json<ModuleDraftReq>,
) -> Result<Json<crate::editor::ModuleDraft>, StudioError> {
    let mut studio = app.lock()?;
    Ok(Json(studio.editor.edit_draft(req).clone()))
}

async fn reset_module_draft(State(app): State<AppState>) -> ApiResult<crate::editor::ModuleDraft> {
    let mut studio = app.lock()?;
    studio.editor.reset_draft();
    info("Module form reset", studio.editor.draft().clone())
}

async fn apply_template(
    State(app): State<AppState>,
    Json(req): Json<TemplateReq>,
) -> ApiResult<crate::editor::ModuleDraft> {
    let template = templates::parse_template(&req.template).ok_or_else(|| StudioError::Unsupported {
        field: "template",
        value: req.template.clone(),
    })?;
    let mut studio = app.lock()?;
    let s = &mut *studio;
    let draft = s.editor.apply_template(&mut s.ids, template).clone();
    info(template.name(), draft)
}

async fn add_module(State(app): State<AppState>) -> ApiResult<Module> {
    let mut studio = app.lock()?;
    let s = &mut *studio;
    let module = s.editor.add_module(&mut s.ids)?.clone();
    ack("Module created successfully!", module)
}

async fn update_module(
    State(app): State<AppState>,
    Path(id): Path<ModuleId>,
    Json(req): Json<UpdateModuleReq>,
) -> ApiResult<Module> {
    let mut studio = app.lock()?;
    let module = studio.editor.update_module(id, &req.title, &req.description)?.clone();
    ack("Module updated", module)
}

async fn remove_module(State(app): State<AppState>, Path(id): Path<ModuleId>) -> ApiResult<Module> {
    let mut studio = app.lock()?;
    let removed = studio.editor.remove_module(id)?;
    ack("Module removed", removed)
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Moved {
    pub moved: bool,
    pub order: Vec<ModuleId>,
}

async fn move_module(
    State(app): State<AppState>,
    Path(id): Path<ModuleId>,
    Json(req): Json<MoveModuleReq>,
) -> ApiResult<Moved> {
    let mut studio = app.lock()?;
    let moved = studio.editor.move_module(id, req.direction)?;
    let order = studio.editor.modules().iter().map(|m| m.id).collect();
    if moved {
        ack("Module moved", Moved { moved, order })
    } else {
        info("Module is already at the edge", Moved { moved, order })
    }
}

async fn duplicate_module(State(app): State<AppState>, Path(id): Path<ModuleId>) -> ApiResult<Module> {
    let mut studio = app.lock()?;
    let s = &mut *studio;
    let copy = s.editor.duplicate_module(&mut s.ids, id)?.clone();
    ack("Module duplicated", copy)
}

async fn set_module_status(
    State(app): State<AppState>,
    Path(id): Path<ModuleId>,
    Json(req): Json<StatusReq>,
) -> ApiResult<Module> {
    let mut studio = app.lock()?;
    let module = studio.editor.set_status(id, req.status)?.clone();
    ack("Module status updated", module)
}

async fn toggle_expanded(State(app): State<AppState>, Path(id): Path<ModuleId>) -> Result<impl IntoResponse, StudioError> {
    let expanded = app.lock()?.editor.toggle_expanded(id)?;
    Ok(Json(serde_json::json!({ "id": id, "expanded": expanded })))
}

async fn add_content(
    State(app): State<AppState>,
    Path(id): Path<ModuleId>,
    Json(req): Json<AddContentReq>,
) -> ApiResult<ContentItem> {
    let mut studio = app.lock()?;
    let s = &mut *studio;
    let item = s.editor.add_content(&mut s.ids, id, req)?.clone();
    ack("Content added", item)
}

async fn remove_content(
    State(app): State<AppState>,
    Path((id, content_id)): Path<(ModuleId, ContentId)>,
) -> ApiResult<ContentItem> {
    let mut studio = app.lock()?;
    let removed = studio.editor.remove_content(id, content_id)?;
    ack("Content removed", removed)
}

async fn toggle_completed(
    State(app): State<AppState>,
    Path((id, content_id)): Path<(ModuleId, ContentId)>,
) -> Result<Json<ContentItem>, StudioError> {
    let mut studio = app.lock()?;
    Ok(Json(studio.editor.toggle_completed(id, content_id)?.clone()))
}

// --- quiz ---

async fn update_quiz_settings(State(app): State<AppState>, Json(req): Json<QuizSettingsReq>) -> ApiResult<Quiz> {
    let mut studio = app.lock()?;
    let quiz = studio.quiz.update_settings(req)?.clone();
    ack("Quiz settings saved", quiz)
}

async fn edit_question_draft(
    State(app): State<AppState>,
    Json(req): Json<QuestionDraftReq>,
) -> Result<Json<crate::quiz::QuestionDraft>, StudioError> {
    let mut studio = app.lock()?;
    Ok(Json(studio.quiz.edit_draft(req).clone()))
}

async fn add_question(State(app): State<AppState>) -> ApiResult<QuizQuestion> {
    let mut studio = app.lock()?;
    let s = &mut *studio;
    let question = s.quiz.add_question(&mut s.ids)?.clone();
    ack("Question added to quiz!", question)
}

async fn remove_question(State(app): State<AppState>, Path(id): Path<QuestionId>) -> ApiResult<QuizQuestion> {
    let mut studio = app.lock()?;
    let removed = studio.quiz.remove_question(id)?;
    ack("Question removed", removed)
}

// --- library ---

#[derive(Serialize, Deserialize, Debug)]
pub struct VideoList {
    pub count: usize,
    pub videos: Vec<VideoRecord>,
}

async fn list_videos(State(app): State<AppState>, Query(q): Query<LibraryQuery>) -> Result<Json<VideoList>, StudioError> {
    let videos = app.lock()?.library.query(&q)?;
    Ok(Json(VideoList { count: videos.len(), videos }))
}

async fn upload_video(State(app): State<AppState>, headers: HeaderMap, mut mp: Multipart) -> ApiResult<VideoRecord> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(app.config.body_limit() as u64);
    let limit = app.config.max_upload_bytes;

    let mut file: Option<(UploadMeta, Bytes)> = None;
    while let Some(field) = mp.next_field().await.map_err(|e| upload_error(e, declared, limit))? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("video").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| upload_error(e, declared, limit))?;
        let meta = UploadMeta { file_name, content_type, size: bytes.len() as u64 };
        file = Some((meta, bytes));
    }
    let (meta, bytes) = file.ok_or(StudioError::MissingField("file"))?;
    library::validate_upload(&meta, app.config.max_upload_bytes)?;

    let _uploading = app.uploads.enter();
    let backend = app.backend.clone();
    let file_name = meta.file_name.clone();
    let bytes = PendingTask::spawn(async move {
        backend.upload(&file_name, &bytes).await?;
        Ok::<_, StudioError>(bytes)
    })
    .join()
    .await?;

    let mut studio = app.lock()?;
    let s = &mut *studio;
    let blob = s.blobs.insert(Blob {
        file_name: meta.file_name.clone(),
        content_type: meta.content_type.clone(),
        bytes: bytes.to_vec(),
    });
    let today = chrono::Local::now().date_naive();
    let video = s.library.insert(&mut s.ids, &meta, blobs::locator(blob), today).clone();
    tracing::info!(video_id = %video.id, size = meta.size, blobs = s.blobs.len(), "video uploaded");
    ack("Video uploaded successfully!", video)
}

async fn uploads_in_flight(State(app): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "uploading": app.uploads.count() }))
}

async fn edit_video(
    State(app): State<AppState>,
    Path(id): Path<VideoId>,
    Json(req): Json<EditVideoReq>,
) -> ApiResult<VideoRecord> {
    let edit = library::validate_edit(&req)?;
    let mut pending = app.lock()?.library.get(id)?.clone();
    edit.apply_to(&mut pending);

    let backend = app.backend.clone();
    PendingTask::spawn(async move { backend.save_video(&pending).await })
        .join()
        .await?;

    // the video may have been deleted while the save was in flight
    let mut studio = app.lock()?;
    let saved = studio.library.apply_edit(id, &edit)?.clone();
    ack("Video updated successfully!", saved)
}

async fn delete_video(
    State(app): State<AppState>,
    Path(id): Path<VideoId>,
    Query(q): Query<DeleteQuery>,
) -> ApiResult<VideoId> {
    app.lock()?.delete_video(id, q.confirm)?;
    ack("Video deleted successfully", id)
}

async fn serve_blob(State(app): State<AppState>, Path(id): Path<Uuid>) -> Result<impl IntoResponse, StudioError> {
    let studio = app.lock()?;
    let blob = studio.blobs.get(&id).ok_or_else(|| StudioError::not_found("blob", id))?;
    Ok((
        [
            (header::CONTENT_TYPE, blob.content_type.clone()),
            (header::CONTENT_DISPOSITION, blob.disposition()),
        ],
        blob.bytes.clone(),
    ))
}

// --- player ---

async fn open_player(State(app): State<AppState>, Path(video_id): Path<VideoId>) -> Result<Json<PlayerView>, StudioError> {
    let mut studio = app.lock()?;
    let now = Instant::now();
    let player = Player::open(studio.library.get(video_id)?, now);
    let view = player.view(now);
    studio.player = Some(player);
    Ok(Json(view))
}

async fn close_player(State(app): State<AppState>) -> Result<impl IntoResponse, StudioError> {
    let closed = app.lock()?.player.take().is_some();
    Ok(Json(serde_json::json!({ "closed": closed })))
}

async fn player_state(State(app): State<AppState>) -> Result<Json<PlayerView>, StudioError> {
    let mut studio = app.lock()?;
    Ok(Json(studio.player_mut()?.view(Instant::now())))
}

async fn player_command(
    State(app): State<AppState>,
    Json(cmd): Json<PlayerCommand>,
) -> Result<Json<PlayerView>, StudioError> {
    let mut studio = app.lock()?;
    let now = Instant::now();
    let player = studio.player_mut()?;
    player.apply(cmd, now)?;
    Ok(Json(player.view(now)))
}

#[derive(Serialize, Deserialize, Debug)]
pub struct KeyReq {
    pub key: String,
}

async fn player_key(State(app): State<AppState>, Json(req): Json<KeyReq>) -> Result<Json<PlayerView>, StudioError> {
    let mut studio = app.lock()?;
    let now = Instant::now();
    let player = studio.player_mut()?;
    // unbound keys leave the player as it is
    if let Some(cmd) = player::command_for_key(&req.key) {
        player.apply(cmd, now)?;
    }
    Ok(Json(player.view(now)))
}

async fn player_shell() -> Html<String> {
    Html(shell::render())
}

// --- helpers ---

/// Bodies cut off at the body limit get the file-too-large notice; anything else the
/// multipart parser rejects is a bad request.
fn upload_error(e: MultipartError, declared: u64, limit: u64) -> StudioError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        StudioError::FileTooLarge { size: declared, limit }
    } else {
        StudioError::MalformedUpload(e.body_text())
    }
}

fn internal<E: std::fmt::Display>(e: E) -> StudioError {
    StudioError::Internal(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StudioConfig;
    use crate::error::StudioResult;
    use crate::tasks::{Backend, SimulatedBackend};
    use axum::body::Body;
    use http::Request;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState::new(StudioConfig::default()))
    }

    fn app_with(config: StudioConfig) -> Router {
        router(AppState::new(config))
    }

    /// Simulated backend that records how many uploads ran to completion.
    struct CountingBackend {
        inner: SimulatedBackend,
        uploads: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl Backend for CountingBackend {
        async fn upload(&self, file_name: &str, bytes: &[u8]) -> StudioResult<()> {
            self.inner.upload(file_name, bytes).await?;
            self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn save_video(&self, video: &VideoRecord) -> StudioResult<()> {
            self.inner.save_video(video).await
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        send(app, req).await
    }

    async fn send_owned(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        send(&app, req).await
    }

    fn multipart(file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let boundary = "studio-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri("/api/library/upload")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap()
    }

    async fn add_module(app: &Router, title: &str) -> (StatusCode, Value) {
        call(app, "PUT", "/api/modules/draft", Some(json!({ "title": title }))).await;
        call(app, "POST", "/api/modules", None).await
    }

    #[tokio::test]
    async fn module_title_validation_over_http() {
        let app = app();
        let (status, body) = add_module(&app, "ab").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["level"], "error");

        let (status, body) = add_module(&app, "Getting Started").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["notice"]["level"], "success");
        assert_eq!(body["data"]["status"], "draft");

        let (_, snap) = call(&app, "GET", "/api/studio", None).await;
        assert_eq!(snap["modules"].as_array().unwrap().len(), 1);
        assert_eq!(snap["module_draft"]["title"], "");
    }

    #[tokio::test]
    async fn template_then_move_and_remove() {
        let app = app();
        let (_, draft) = call(&app, "POST", "/api/modules/draft/template", Some(json!({ "template": "lecture" }))).await;
        assert_eq!(draft["data"]["content"].as_array().unwrap().len(), 3);
        assert_eq!(draft["data"]["content"][0]["type"], "video");
        let (status, _) = call(&app, "POST", "/api/modules/draft/template", Some(json!({ "template": "webinar" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, first) = add_module(&app, "First").await;
        assert_eq!(first["data"]["content"].as_array().unwrap().len(), 3);
        let (_, second) = add_module(&app, "Second").await;
        let first_id = first["data"]["id"].as_u64().unwrap();
        let second_id = second["data"]["id"].as_u64().unwrap();

        let (_, moved) = call(&app, "POST", &format!("/api/modules/{first_id}/move"), Some(json!({ "direction": "up" }))).await;
        assert_eq!(moved["data"]["moved"], false);
        let (_, moved) = call(&app, "POST", &format!("/api/modules/{second_id}/move"), Some(json!({ "direction": "up" }))).await;
        assert_eq!(moved["data"]["order"], json!([second_id, first_id]));

        let (status, _) = call(&app, "DELETE", &format!("/api/modules/{first_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, "DELETE", &format!("/api/modules/{first_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn quiz_rejects_blank_options() {
        let app = app();
        let draft = json!({ "question": "2 + 2?", "type": "multiple", "options": ["3", "", "5", "6"], "correct": 0 });
        call(&app, "PUT", "/api/quiz/draft", Some(draft)).await;
        let (status, _) = call(&app, "POST", "/api/quiz/questions", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        call(&app, "PUT", "/api/quiz/draft", Some(json!({ "options": ["3", "4", "5", "6"], "correct": 1 }))).await;
        let (status, body) = call(&app, "POST", "/api/quiz/questions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["correct"], 1);
        assert_eq!(body["data"]["type"], "multiple");
    }

    #[tokio::test]
    async fn content_and_question_removal() {
        let app = app();
        let (_, module) = add_module(&app, "Lists").await;
        let module_id = module["data"]["id"].as_u64().unwrap();
        let (_, item) = call(&app, "POST", &format!("/api/modules/{module_id}/content"), Some(json!({ "type": "lesson" }))).await;
        let content_id = item["data"]["id"].as_u64().unwrap();
        let uri = format!("/api/modules/{module_id}/content/{content_id}");
        let (status, _) = call(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        call(&app, "PUT", "/api/quiz/draft", Some(json!({ "question": "Is Vec growable?", "type": "true-false", "correct": 0 }))).await;
        let (_, question) = call(&app, "POST", "/api/quiz/questions", None).await;
        let question_id = question["data"]["id"].as_u64().unwrap();
        let (status, _) = call(&app, "DELETE", &format!("/api/quiz/questions/{question_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, snap) = call(&app, "GET", "/api/studio", None).await;
        assert!(snap["quiz"]["questions"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn library_filters_over_http() {
        let app = app();
        let (_, body) = call(&app, "GET", "/api/library?category=Design&search=react", None).await;
        assert_eq!(body["count"], 0);
        let (_, body) = call(&app, "GET", "/api/library?category=Design", None).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["videos"][0]["category"], "Design");
        let (_, body) = call(&app, "GET", "/api/library?sort=newest", None).await;
        assert_eq!(body["videos"][0]["upload_date"], "2024-01-15");
    }

    #[tokio::test(start_paused = true)]
    async fn upload_rejects_non_video() {
        let app = app();
        let res = app.clone().oneshot(multipart("pic.png", "image/png", b"png")).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let (_, body) = call(&app, "GET", "/api/library", None).await;
        assert_eq!(body["count"], 3);
    }

    #[tokio::test(start_paused = true)]
    async fn upload_appends_record_and_serves_blob() {
        let app = app();
        let started = tokio::time::Instant::now();
        let res = app.clone().oneshot(multipart("lesson one.mp4", "video/mp4", b"fake-video")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(started.elapsed() >= std::time::Duration::from_millis(2000));

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let video = &body["data"];
        assert_eq!(video["title"], "lesson one");
        assert_eq!(video["upload_date"], chrono::Local::now().date_naive().to_string());

        let (_, list) = call(&app, "GET", "/api/library", None).await;
        assert_eq!(list["count"], 4);

        let url = video["url"].as_str().unwrap();
        let blob = app.clone().oneshot(Request::get(url).body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(blob.status(), StatusCode::OK);
        assert_eq!(blob.headers()[header::CONTENT_TYPE], "video/mp4");
        let data = axum::body::to_bytes(blob.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&data[..], b"fake-video");
    }

    #[tokio::test(start_paused = true)]
    async fn oversized_upload_gets_file_too_large_notice() {
        // body cut off by the transport limit
        let app = app_with(StudioConfig { max_upload_bytes: 10, ..StudioConfig::default() });
        let (status, body) = send(&app, multipart("big.mp4", "video/mp4", &[7u8; 64])).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["level"], "error");
        assert!(body["message"].as_str().unwrap().starts_with("video file size must be less than"));

        // body within the transport limit but over the ceiling
        let app = app_with(StudioConfig { max_upload_bytes: 1000, ..StudioConfig::default() });
        let (status, body) = send(&app, multipart("big.mp4", "video/mp4", &[7u8; 1500])).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["message"].as_str().unwrap().contains("got 1500 bytes"));

        let (_, list) = call(&app, "GET", "/api/library", None).await;
        assert_eq!(list["count"], 3);
    }

    #[tokio::test]
    async fn truncated_multipart_is_a_bad_request() {
        let app = app();
        let req = Request::builder()
            .method("POST")
            .uri("/api/library/upload")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=studio-test-boundary")
            .body(Body::from("--studio-test-boundary\r\nContent-Disposition: form-data; name=\"file\""))
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["level"], "error");
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_uploads_both_land() {
        let app = app();
        let first = tokio::spawn(send_owned(app.clone(), multipart("one.mp4", "video/mp4", b"one")));
        let second = tokio::spawn(send_owned(app.clone(), multipart("two.mp4", "video/mp4", b"two")));
        tokio::time::sleep(Duration::from_millis(100)).await;

        let (_, flight) = call(&app, "GET", "/api/library/uploads", None).await;
        assert_eq!(flight["uploading"], 2);

        let (a, _) = first.await.unwrap();
        let (b, _) = second.await.unwrap();
        assert_eq!((a, b), (StatusCode::OK, StatusCode::OK));

        let (_, flight) = call(&app, "GET", "/api/library/uploads", None).await;
        assert_eq!(flight["uploading"], 0);
        let (_, list) = call(&app, "GET", "/api/library?sort=title", None).await;
        assert_eq!(list["count"], 5);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_upload_leaves_library_unchanged() {
        let completed = Arc::new(AtomicUsize::new(0));
        let config = StudioConfig::default();
        let backend = CountingBackend {
            inner: SimulatedBackend { upload_delay: config.upload_delay, save_delay: config.save_delay },
            uploads: completed.clone(),
        };
        let app = router(AppState::with_backend(config, Arc::new(backend)));

        let upload = tokio::spawn(send_owned(app.clone(), multipart("gone.mp4", "video/mp4", b"gone")));
        tokio::time::sleep(Duration::from_millis(500)).await;
        let (_, flight) = call(&app, "GET", "/api/library/uploads", None).await;
        assert_eq!(flight["uploading"], 1);

        upload.abort();
        assert!(upload.await.unwrap_err().is_cancelled());
        tokio::time::sleep(Duration::from_millis(5000)).await;

        assert_eq!(completed.load(Ordering::SeqCst), 0);
        let (_, flight) = call(&app, "GET", "/api/library/uploads", None).await;
        assert_eq!(flight["uploading"], 0);
        let (_, list) = call(&app, "GET", "/api/library", None).await;
        assert_eq!(list["count"], 3);
    }

    #[tokio::test(start_paused = true)]
    async fn edit_and_confirmed_delete() {
        let app = app();
        let edit = json!({ "title": "  React Hooks Deep Dive ", "instructor": "Ann", "category": "Programming" });
        let (status, body) = call(&app, "PUT", "/api/library/1", Some(edit)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "React Hooks Deep Dive");

        let bad = json!({ "title": "Ok title", "instructor": "Ann", "category": "Programming", "thumbnail": "nope" });
        let (status, _) = call(&app, "PUT", "/api/library/1", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&app, "DELETE", "/api/library/1", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, _) = call(&app, "DELETE", "/api/library/1?confirm=true", None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, list) = call(&app, "GET", "/api/library", None).await;
        assert_eq!(list["count"], 2);
    }

    #[tokio::test]
    async fn player_keys_drive_state() {
        let app = app();
        let (status, _) = call(&app, "GET", "/api/player", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, view) = call(&app, "POST", "/api/player/open/2", None).await;
        assert_eq!(view["loading"], true);
        call(&app, "POST", "/api/player/command", Some(json!({ "command": "loaded", "duration": 120.0 }))).await;
        call(&app, "POST", "/api/player/key", Some(json!({ "key": " " }))).await;
        let (_, view) = call(&app, "POST", "/api/player/key", Some(json!({ "key": "ArrowRight" }))).await;
        assert_eq!(view["playing"], true);
        assert_eq!(view["current_time"], 10.0);
        let (status, _) = call(&app, "POST", "/api/player/command", Some(json!({ "command": "set_rate", "rate": 4.0 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, closed) = call(&app, "DELETE", "/api/player", None).await;
        assert_eq!(closed["closed"], true);
    }

    #[tokio::test]
    async fn publish_requires_title_and_module() {
        let app = app();
        let (status, _) = call(&app, "POST", "/api/publish", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = call(&app, "PUT", "/api/course", Some(json!({ "title": "Rust 101", "description": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        call(&app, "PUT", "/api/course", Some(json!({ "title": "Rust 101", "description": "Basics", "difficulty": "advanced" }))).await;
        add_module(&app, "Ownership").await;
        let (status, body) = call(&app, "POST", "/api/publish", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["estimated_hours"], 2);
        assert_eq!(body["data"]["difficulty"], "advanced");
    }
}
