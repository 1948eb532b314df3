//! Podcast list filtering.
//!
//! Mirrors the list screen: a category chip (or "all") combined with a
//! case-insensitive title search.

use crate::models::Podcast;
use serde::{Deserialize, Serialize};

/// Label of the "all categories" chip.
pub const ALL_CATEGORIES_LABEL: &str = "Tümü";

/// Category chips shown by the list screen, in display order.
pub const DEFAULT_CATEGORIES: [&str; 4] = [ALL_CATEGORIES_LABEL, "İlişkiler", "Kişisel", "Sağlık"];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Map a chip label to a filter. The "all" label selects everything.
    pub fn from_label(label: &str) -> Self {
        if label == ALL_CATEGORIES_LABEL {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(label.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => name == category,
        }
    }
}

/// Filter for the podcast list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PodcastQuery {
    pub category: CategoryFilter,
    /// Title substring, compared case-insensitively. Empty matches everything.
    pub search: String,
}

impl PodcastQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn matches(&self, podcast: &Podcast) -> bool {
        self.category.matches(&podcast.category)
            && podcast
                .title
                .to_lowercase()
                .contains(&self.search.to_lowercase())
    }

    /// Matching podcasts, in their original order.
    pub fn apply(&self, podcasts: &[Podcast]) -> Vec<Podcast> {
        podcasts
            .iter()
            .filter(|podcast| self.matches(podcast))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn podcast(id: &str, title: &str, category: &str) -> Podcast {
        Podcast {
            id: id.to_string(),
            title: title.to_string(),
            audio_url: format!("https://cdn.example.com/{id}.mp3"),
            cover_url: format!("https://cdn.example.com/{id}.jpg"),
            category: category.to_string(),
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    fn list() -> Vec<Podcast> {
        vec![
            podcast("p1", "Morning Calm", "Sağlık"),
            podcast("p2", "Talking Love", "İlişkiler"),
            podcast("p3", "Calm Couples", "İlişkiler"),
        ]
    }

    fn ids(podcasts: &[Podcast]) -> Vec<&str> {
        podcasts.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn empty_query_keeps_everything() {
        assert_eq!(ids(&PodcastQuery::new().apply(&list())), ["p1", "p2", "p3"]);
    }

    #[test]
    fn category_and_search_combine() {
        let podcasts = list();
        let query = PodcastQuery::new()
            .with_category(CategoryFilter::from_label("İlişkiler"))
            .with_search("CALM");
        assert_eq!(ids(&query.apply(&podcasts)), ["p3"]);

        let query = PodcastQuery::new().with_search("calm");
        assert_eq!(ids(&query.apply(&podcasts)), ["p1", "p3"]);
    }

    #[test]
    fn all_label_maps_to_all() {
        assert_eq!(CategoryFilter::from_label("Tümü"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_label("Kişisel"),
            CategoryFilter::Named("Kişisel".to_string())
        );
        assert!(PodcastQuery::new()
            .with_category(CategoryFilter::from_label("Kişisel"))
            .apply(&list())
            .is_empty());
    }
}
