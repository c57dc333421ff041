// Module templates and the placeholder content each one seeds into the draft.

use serde::{Deserialize, Serialize};

use crate::ids::IdGen;
use crate::models::{ContentItem, ContentType};

pub const VIDEO_PLACEHOLDER_DURATION: &str = "00:00";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    #[default]
    Custom,
    Lecture,
    Assignment,
    Reading,
    Interactive,
}

pub fn parse_template(id: &str) -> Option<Template> {
    match id {
        "custom"      => Some(Template::Custom),
        "lecture"     => Some(Template::Lecture),
        "assignment"  => Some(Template::Assignment),
        "reading"     => Some(Template::Reading),
        "interactive" => Some(Template::Interactive),
        _ => None,
    }
}

impl Template {
    pub fn name(self) -> &'static str {
        match self {
            Template::Custom => "Custom Module",
            Template::Lecture => "Lecture Module",
            Template::Assignment => "Assignment Module",
            Template::Reading => "Reading Module",
            Template::Interactive => "Interactive Module",
        }
    }

    fn slots(self) -> &'static [(ContentType, &'static str)] {
        match self {
            Template::Custom => &[],
            Template::Lecture => &[
                (ContentType::Video, "Lecture Video"),
                (ContentType::Resource, "Lecture Slides"),
                (ContentType::Quiz, "Knowledge Check"),
            ],
            Template::Assignment => &[
                (ContentType::Lesson, "Assignment Instructions"),
                (ContentType::Assignment, "Submit Assignment"),
                (ContentType::Resource, "Reference Materials"),
            ],
            Template::Reading => &[
                (ContentType::Lesson, "Reading Material"),
                (ContentType::Quiz, "Comprehension Quiz"),
            ],
            Template::Interactive => &[
                (ContentType::Lesson, "Introduction"),
                (ContentType::Video, "Demonstration"),
                (ContentType::Assignment, "Practice Exercise"),
                (ContentType::Discussion, "Discussion Forum"),
            ],
        }
    }

    pub fn content(self, ids: &mut IdGen) -> Vec<ContentItem> {
        self.slots()
            .iter()
            .map(|(kind, title)| placeholder(ids, *kind, title))
            .collect()
    }
}

/// Builds a content item with the defaults for its type.
pub fn placeholder(ids: &mut IdGen, kind: ContentType, title: &str) -> ContentItem {
    let duration = match kind {
        ContentType::Video => Some(VIDEO_PLACEHOLDER_DURATION.to_string()),
        _ => None,
    };
    ContentItem {
        id: ids.next(),
        kind,
        title: title.to_string(),
        description: String::new(),
        content: String::new(),
        duration,
        file: None,
        completed: false,
    }
}
