use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::blobs::BlobStore;
use crate::config::StudioConfig;
use crate::course;
use crate::editor::{ModuleDraft, ModuleEditor};
use crate::error::{StudioError, StudioResult};
use crate::ids::{IdGen, ModuleId, VideoId};
use crate::library::ContentLibrary;
use crate::models::{Course, Module, Quiz};
use crate::player::Player;
use crate::quiz::{QuestionDraft, QuizBuilder};
use crate::tasks::{Backend, InFlight, SimulatedBackend};

/// Everything one authoring session holds. Lives only as long as the process.
#[derive(Debug, Default)]
pub struct Studio {
    pub ids: IdGen,
    pub course: Course,
    pub editor: ModuleEditor,
    pub quiz: QuizBuilder,
    pub library: ContentLibrary,
    pub blobs: BlobStore,
    pub player: Option<Player>,
}

/// Snapshot of the authoring state, the equivalent of one render.
#[derive(Serialize, Debug)]
pub struct Snapshot<'a> {
    pub course: &'a Course,
    pub modules: &'a [Module],
    pub expanded: Vec<ModuleId>,
    pub module_draft: &'a ModuleDraft,
    pub quiz: &'a Quiz,
    pub question_draft: &'a QuestionDraft,
}

impl Studio {
    pub fn new(mut ids: IdGen, seed_samples: bool) -> Self {
        let library = if seed_samples {
            ContentLibrary::with_samples(&mut ids)
        } else {
            ContentLibrary::default()
        };
        Self { ids, library, ..Default::default() }
    }

    pub fn save_course(&mut self, form: &Course) -> StudioResult<&Course> {
        self.course = course::validate_course(form)?;
        tracing::info!(title = %self.course.title, "course info saved");
        Ok(&self.course)
    }

    pub fn publish(&self) -> StudioResult<()> {
        course::check_publishable(&self.course, self.editor.modules())?;
        tracing::info!(title = %self.course.title, modules = self.editor.modules().len(), "course published");
        Ok(())
    }

    pub fn preview(&self) -> course::Preview {
        course::preview(&self.course, self.editor.modules(), self.quiz.quiz())
    }

    /// Deletes a video along with its uploaded bytes; closes the player if it was
    /// showing that video.
    pub fn delete_video(&mut self, id: VideoId, confirmed: bool) -> StudioResult<()> {
        let removed = self.library.delete(id, confirmed)?;
        self.blobs.release(&removed.url);
        if self.player.as_ref().is_some_and(|p| p.video_id() == id) {
            self.player = None;
        }
        tracing::info!(video_id = %id, "video deleted");
        Ok(())
    }

    pub fn player_mut(&mut self) -> StudioResult<&mut Player> {
        self.player.as_mut().ok_or_else(|| StudioError::not_found("player", "open"))
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            course: &self.course,
            modules: self.editor.modules(),
            expanded: self.editor.expanded().collect(),
            module_draft: self.editor.draft(),
            quiz: self.quiz.quiz(),
            question_draft: self.quiz.draft(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub studio: Arc<Mutex<Studio>>,
    pub backend: Arc<dyn Backend>,
    pub uploads: InFlight,
    pub config: Arc<StudioConfig>,
}

impl AppState {
    pub fn new(config: StudioConfig) -> Self {
        let backend = SimulatedBackend {
            upload_delay: config.upload_delay,
            save_delay: config.save_delay,
        };
        Self::with_backend(config, Arc::new(backend))
    }

    pub fn with_backend(config: StudioConfig, backend: Arc<dyn Backend>) -> Self {
        let studio = Studio::new(IdGen::default(), config.seed_samples);
        Self {
            studio: Arc::new(Mutex::new(studio)),
            backend,
            uploads: InFlight::default(),
            config: Arc::new(config),
        }
    }

    /// Never held across an await.
    pub fn lock(&self) -> StudioResult<MutexGuard<'_, Studio>> {
        self.studio
            .lock()
            .map_err(|e| StudioError::Internal(format!("studio state poisoned: {e}")))
    }
}
