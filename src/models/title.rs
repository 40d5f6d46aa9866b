use serde::{Deserialize, Serialize};

/// Characters left behind when list-like columns are stored as stringified lists
const LIST_ARTIFACTS: [char; 3] = ['[', ']', '\''];

/// Placeholder used by the catalog source for missing cells
const MISSING_MARKER: &str = "N/A";

/// One catalog entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TitleRecord {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub genres: String,
    pub actors: String,
    pub director: String,
    pub screenwriter: String,
    /// Popularity position, lower is better
    pub rank: Option<u32>,
    /// Quality rating
    pub score: Option<f64>,
    pub link: String,
}

impl TitleRecord {
    /// Creates a record with only a title set
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Normalizes free-text and list-like fields in place
    ///
    /// Missing markers become empty strings and the list columns (keywords,
    /// genres, actors) lose their bracket and quote artifacts.
    pub fn normalized(mut self) -> Self {
        self.title = clean_text(&self.title);
        self.description = clean_text(&self.description);
        self.keywords = clean_list(&self.keywords);
        self.genres = clean_list(&self.genres);
        self.actors = clean_list(&self.actors);
        self.director = clean_text(&self.director);
        self.screenwriter = clean_text(&self.screenwriter);
        self.link = clean_text(&self.link);
        self
    }

    /// Number of space-separated pieces in the description
    pub fn description_word_count(&self) -> usize {
        self.description.split(' ').count()
    }
}

fn clean_text(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed == MISSING_MARKER {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn clean_list(value: &str) -> String {
    let stripped: String = value.chars().filter(|c| !LIST_ARTIFACTS.contains(c)).collect();
    clean_text(&stripped)
}
