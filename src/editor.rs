use serde::Serialize;
use std::collections::HashSet;

use crate::error::{StudioError, StudioResult};
use crate::ids::{ContentId, IdGen, ModuleId};
use crate::models::{AddContentReq, ContentItem, Direction, Module, ModuleDraftReq, ModuleStatus};
use crate::templates::{self, Template};

pub const MIN_MODULE_TITLE: usize = 3;

/// The module being composed before it is added to the course.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ModuleDraft {
    pub title: String,
    pub description: String,
    pub content: Vec<ContentItem>,
    pub template: Template,
}

#[derive(Debug, Default)]
pub struct ModuleEditor {
    modules: Vec<Module>,
    draft: ModuleDraft,
    expanded: HashSet<ModuleId>,
}

fn validate_title(title: &str) -> StudioResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StudioError::MissingField("module title"));
    }
    if title.chars().count() < MIN_MODULE_TITLE {
        return Err(StudioError::TooShort { field: "module title", min: MIN_MODULE_TITLE });
    }
    Ok(title.to_string())
}

impl ModuleEditor {
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn draft(&self) -> &ModuleDraft {
        &self.draft
    }

    pub fn is_expanded(&self, id: ModuleId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn expanded(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.modules.iter().map(|m| m.id).filter(|id| self.expanded.contains(id))
    }

    fn position(&self, id: ModuleId) -> StudioResult<usize> {
        self.modules
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| StudioError::not_found("module", id))
    }

    fn module_mut(&mut self, id: ModuleId) -> StudioResult<&mut Module> {
        let idx = self.position(id)?;
        Ok(&mut self.modules[idx])
    }

    // --- draft ---

    pub fn edit_draft(&mut self, req: ModuleDraftReq) -> &ModuleDraft {
        if let Some(title) = req.title {
            self.draft.title = title;
        }
        if let Some(description) = req.description {
            self.draft.description = description;
        }
        &self.draft
    }

    /// Replaces the draft's content with the template's placeholder sequence.
    /// Title and description are cleared, matching a fresh template pick.
    pub fn apply_template(&mut self, ids: &mut IdGen, template: Template) -> &ModuleDraft {
        self.draft = ModuleDraft {
            title: String::new(),
            description: String::new(),
            content: template.content(ids),
            template,
        };
        &self.draft
    }

    pub fn reset_draft(&mut self) {
        self.draft = ModuleDraft::default();
    }

    // --- modules ---

    pub fn add_module(&mut self, ids: &mut IdGen) -> StudioResult<&Module> {
        let title = validate_title(&self.draft.title)?;
        let draft = std::mem::take(&mut self.draft);
        self.modules.push(Module {
            id: ids.next(),
            title,
            description: draft.description,
            content: draft.content,
            status: ModuleStatus::Draft,
        });
        let added = &self.modules[self.modules.len() - 1];
        tracing::info!(module_id = %added.id, "module added");
        Ok(added)
    }

    pub fn update_module(&mut self, id: ModuleId, title: &str, description: &str) -> StudioResult<&Module> {
        let title = validate_title(title)?;
        let module = self.module_mut(id)?;
        module.title = title;
        module.description = description.to_string();
        Ok(module)
    }

    pub fn remove_module(&mut self, id: ModuleId) -> StudioResult<Module> {
        let idx = self.position(id)?;
        self.expanded.remove(&id);
        let removed = self.modules.remove(idx);
        tracing::info!(module_id = %id, "module removed");
        Ok(removed)
    }

    /// Swaps the module with its neighbour. Returns false when it already sits at the
    /// boundary in that direction, in which case nothing moves.
    pub fn move_module(&mut self, id: ModuleId, direction: Direction) -> StudioResult<bool> {
        let idx = self.position(id)?;
        let target = match direction {
            Direction::Up if idx > 0 => idx - 1,
            Direction::Down if idx + 1 < self.modules.len() => idx + 1,
            _ => return Ok(false),
        };
        self.modules.swap(idx, target);
        Ok(true)
    }

    pub fn duplicate_module(&mut self, ids: &mut IdGen, id: ModuleId) -> StudioResult<&Module> {
        let idx = self.position(id)?;
        let source = &self.modules[idx];
        let copy = Module {
            id: ids.next(),
            title: format!("{} (Copy)", source.title),
            description: source.description.clone(),
            content: source.content.clone(),
            status: ModuleStatus::Draft,
        };
        self.modules.push(copy);
        Ok(&self.modules[self.modules.len() - 1])
    }

    pub fn set_status(&mut self, id: ModuleId, status: ModuleStatus) -> StudioResult<&Module> {
        let module = self.module_mut(id)?;
        module.status = status;
        Ok(module)
    }

    pub fn toggle_expanded(&mut self, id: ModuleId) -> StudioResult<bool> {
        self.position(id)?;
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
        Ok(self.expanded.contains(&id))
    }

    // --- content ---

    pub fn add_content(&mut self, ids: &mut IdGen, id: ModuleId, req: AddContentReq) -> StudioResult<&ContentItem> {
        let module = self.module_mut(id)?;
        let title = req
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format!("New {}", req.kind.label()));
        let mut item = templates::placeholder(ids, req.kind, &title);
        item.description = req.description.unwrap_or_default();
        module.content.push(item);
        Ok(&module.content[module.content.len() - 1])
    }

    pub fn remove_content(&mut self, id: ModuleId, content_id: ContentId) -> StudioResult<ContentItem> {
        let module = self.module_mut(id)?;
        let idx = module
            .content
            .iter()
            .position(|c| c.id == content_id)
            .ok_or_else(|| StudioError::not_found("content item", content_id))?;
        Ok(module.content.remove(idx))
    }

    pub fn toggle_completed(&mut self, id: ModuleId, content_id: ContentId) -> StudioResult<&ContentItem> {
        let module = self.module_mut(id)?;
        let item = module
            .content
            .iter_mut()
            .find(|c| c.id == content_id)
            .ok_or_else(|| StudioError::not_found("content item", content_id))?;
        item.completed = !item.completed;
        Ok(item)
    }
}
