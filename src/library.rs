use chrono::NaiveDate;
use std::cmp::Ordering;

use crate::error::{StudioError, StudioResult};
use crate::ids::{IdGen, VideoId};
use crate::models::{EditVideoReq, LibraryQuery, VideoRecord};

pub const CATEGORIES: [&str; 5] = ["Programming", "Design", "Business", "Marketing", "Science"];
pub const ALL_CATEGORIES: &str = "all";
pub const DEFAULT_THUMBNAIL: &str =
    "https://images.unsplash.com/photo-1633356122544-f134324a6cee?w=300&h=200&fit=crop";
pub const MIN_VIDEO_TITLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Newest,
    Oldest,
    Title,
    Duration,
}

pub fn parse_sort(v: &str) -> Option<SortBy> {
    match v {
        "newest"   => Some(SortBy::Newest),
        "oldest"   => Some(SortBy::Oldest),
        "title"    => Some(SortBy::Title),
        "duration" => Some(SortBy::Duration),
        _ => None,
    }
}

/// Seconds in an "H:MM:SS" / "MM:SS" / "SS" duration string. Unparseable text
/// counts as zero so it sorts with the placeholders.
pub fn duration_secs(text: &str) -> u64 {
    text.trim()
        .split(':')
        .try_fold(0u64, |acc, part| part.trim().parse::<u64>().ok().map(|n| acc * 60 + n))
        .unwrap_or(0)
}

/// Declared file metadata for an upload, checked before any delay is paid.
#[derive(Debug, Clone)]
pub struct UploadMeta {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

pub fn validate_upload(meta: &UploadMeta, max_bytes: u64) -> StudioResult<()> {
    if !meta.content_type.starts_with("video/") {
        return Err(StudioError::WrongFileType(meta.content_type.clone()));
    }
    if meta.size > max_bytes {
        return Err(StudioError::FileTooLarge { size: meta.size, limit: max_bytes });
    }
    Ok(())
}

/// "lecture.final.mp4" -> "lecture.final"; names without an extension are kept.
pub fn title_from_file_name(name: &str) -> String {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => name[..idx].to_string(),
        _ => name.to_string(),
    }
}

/// Validated form of an edit, trimmed and ready to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoEdit {
    pub title: String,
    pub instructor: String,
    pub category: String,
    pub thumbnail: Option<String>,
}

impl VideoEdit {
    pub fn apply_to(&self, video: &mut VideoRecord) {
        video.title = self.title.clone();
        video.instructor = self.instructor.clone();
        video.category = self.category.clone();
        if let Some(thumbnail) = &self.thumbnail {
            video.thumbnail = thumbnail.clone();
        }
    }
}

pub fn validate_edit(req: &EditVideoReq) -> StudioResult<VideoEdit> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(StudioError::MissingField("title"));
    }
    if title.chars().count() < MIN_VIDEO_TITLE {
        return Err(StudioError::TooShort { field: "title", min: MIN_VIDEO_TITLE });
    }
    let instructor = req.instructor.trim();
    if instructor.is_empty() {
        return Err(StudioError::MissingField("instructor name"));
    }
    if req.category.is_empty() {
        return Err(StudioError::MissingField("category"));
    }
    if !CATEGORIES.contains(&req.category.as_str()) {
        return Err(StudioError::Unsupported { field: "category", value: req.category.clone() });
    }
    let thumbnail = match req.thumbnail.trim() {
        "" => None,
        t => {
            url::Url::parse(t).map_err(|_| StudioError::InvalidUrl(t.to_string()))?;
            Some(t.to_string())
        }
    };
    Ok(VideoEdit {
        title: title.to_string(),
        instructor: instructor.to_string(),
        category: req.category.clone(),
        thumbnail,
    })
}

#[derive(Debug, Default)]
pub struct ContentLibrary {
    videos: Vec<VideoRecord>,
}

impl ContentLibrary {
    pub fn with_samples(ids: &mut IdGen) -> Self {
        let sample = |ids: &mut IdGen, title: &str, file: &str, photo: &str, duration: &str, date: (i32, u32, u32), instructor: &str, category: &str| {
            VideoRecord {
                id: ids.next(),
                title: title.to_string(),
                url: format!("https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/{file}"),
                thumbnail: format!("https://images.unsplash.com/{photo}?w=300&h=200&fit=crop"),
                duration: duration.to_string(),
                upload_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap_or_default(),
                instructor: instructor.to_string(),
                category: category.to_string(),
            }
        };
        let videos = vec![
            sample(ids, "Introduction to React Hooks", "BigBuckBunny.mp4", "photo-1633356122544-f134324a6cee",
                "15:32", (2024, 1, 15), "John Doe", "Programming"),
            sample(ids, "Advanced JavaScript Concepts", "ElephantsDream.mp4", "photo-1627398242454-45a1465c2479",
                "22:45", (2024, 1, 12), "Jane Smith", "Programming"),
            sample(ids, "UI/UX Design Principles", "ForBiggerBlazes.mp4", "photo-1581291518857-4e27b48ff24e",
                "18:20", (2024, 1, 10), "Mike Johnson", "Design"),
        ];
        Self { videos }
    }

    pub fn videos(&self) -> &[VideoRecord] {
        &self.videos
    }

    pub fn get(&self, id: VideoId) -> StudioResult<&VideoRecord> {
        self.videos
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| StudioError::not_found("video", id))
    }

    /// Title search is case-insensitive; the category must match exactly unless it is
    /// absent or "all".
    pub fn query(&self, q: &LibraryQuery) -> StudioResult<Vec<VideoRecord>> {
        let sort = match q.sort.as_deref() {
            None | Some("") => SortBy::default(),
            Some(s) => parse_sort(s).ok_or_else(|| StudioError::Unsupported { field: "sort", value: s.to_string() })?,
        };
        let needle = q.search.to_lowercase();
        let category = q.category.as_deref().filter(|c| !c.is_empty() && *c != ALL_CATEGORIES);

        let mut out: Vec<VideoRecord> = self
            .videos
            .iter()
            .filter(|v| v.title.to_lowercase().contains(&needle))
            .filter(|v| category.map_or(true, |c| v.category == c))
            .cloned()
            .collect();
        out.sort_by(|a, b| compare(sort, a, b));
        Ok(out)
    }

    pub fn insert(&mut self, ids: &mut IdGen, meta: &UploadMeta, url: String, today: NaiveDate) -> &VideoRecord {
        self.videos.push(VideoRecord {
            id: ids.next(),
            title: title_from_file_name(&meta.file_name),
            url,
            thumbnail: DEFAULT_THUMBNAIL.to_string(),
            duration: "0:00".to_string(),
            upload_date: today,
            instructor: "Current User".to_string(),
            category: CATEGORIES[0].to_string(),
        });
        &self.videos[self.videos.len() - 1]
    }

    pub fn apply_edit(&mut self, id: VideoId, edit: &VideoEdit) -> StudioResult<&VideoRecord> {
        let video = self
            .videos
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| StudioError::not_found("video", id))?;
        edit.apply_to(video);
        Ok(video)
    }

    pub fn delete(&mut self, id: VideoId, confirmed: bool) -> StudioResult<VideoRecord> {
        let idx = self
            .videos
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| StudioError::not_found("video", id))?;
        if !confirmed {
            return Err(StudioError::ConfirmationRequired);
        }
        Ok(self.videos.remove(idx))
    }
}

fn compare(sort: SortBy, a: &VideoRecord, b: &VideoRecord) -> Ordering {
    match sort {
        SortBy::Newest => b.upload_date.cmp(&a.upload_date),
        SortBy::Oldest => a.upload_date.cmp(&b.upload_date),
        SortBy::Title => a.title.cmp(&b.title),
        SortBy::Duration => duration_secs(&b.duration).cmp(&duration_secs(&a.duration)),
    }
}
