//! Data model for the portfolio page runtime
//!
//! These types carry no browser dependencies so they can be exercised by
//! native tests and shared with build tooling that pre-renders the deck.
//!
//! Serializable with serde for the JSON blocks embedded in the page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Theme
// ============================================================================

/// Named palette applied document-wide.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// The opposite palette.
    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemePreference::Dark
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized theme '{0}', expected 'light' or 'dark'")]
pub struct ParseThemeError(pub String);

impl FromStr for ThemePreference {
    type Err = ParseThemeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

// ============================================================================
// Projects
// ============================================================================

/// Category tag of a project; selects the icon rendered on its card link.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Tableau,
    #[serde(rename = "powerbi")]
    PowerBi,
    Pdf,
    /// Also used for any tag this build does not know about.
    #[default]
    #[serde(other)]
    Github,
}

/// Secondary links shown as labelled buttons under a card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProjectLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
}

impl ProjectLinks {
    pub fn is_empty(&self) -> bool {
        self.github.is_none() && self.demo.is_none()
    }
}

/// One entry of the slide deck. Built once at load time and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectRecord {
    pub title: String,
    pub year: String,
    #[serde(rename = "type", default)]
    pub kind: ProjectKind,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "ProjectLinks::is_empty")]
    pub links: ProjectLinks,
}

impl ProjectRecord {
    pub fn new(
        title: impl Into<String>,
        year: impl Into<String>,
        kind: ProjectKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
            kind,
            description: description.into(),
            technologies: Vec::new(),
            link: None,
            image: None,
            links: ProjectLinks::default(),
        }
    }

    pub fn with_technologies<I, S>(mut self, technologies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.technologies = technologies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_links(mut self, links: ProjectLinks) -> Self {
        self.links = links;
        self
    }
}

/// Deck shipped with the page when no `#portfolio-projects` block overrides it.
pub fn default_projects() -> Vec<ProjectRecord> {
    vec![
        ProjectRecord::new(
            "ESG Reporting Dashboard",
            "2024",
            ProjectKind::Tableau,
            "Interactive Tableau dashboard for environmental, social, and governance metrics tracking and reporting.",
        )
        .with_technologies(["Tableau", "SQL", "Python"])
        .with_link("#"),
        ProjectRecord::new(
            "Sales Analytics Platform",
            "2023",
            ProjectKind::PowerBi,
            "Comprehensive sales performance analysis tool with predictive modeling capabilities.",
        )
        .with_technologies(["Power BI", "R", "SQL Server"])
        .with_link("#"),
        ProjectRecord::new(
            "Financial Data Pipeline",
            "2023",
            ProjectKind::Github,
            "Automated data processing pipeline for financial reporting and compliance monitoring.",
        )
        .with_technologies(["Python", "Apache Airflow", "PostgreSQL"])
        .with_link("#"),
        ProjectRecord::new(
            "Customer Segmentation Analysis",
            "2022",
            ProjectKind::Pdf,
            "Machine learning model for customer behavioral analysis and targeted marketing strategies.",
        )
        .with_technologies(["Python", "Scikit-learn", "Pandas"])
        .with_link("#"),
    ]
}

/// Parse a deck from the JSON array embedded in the page.
pub fn parse_projects(json: &str) -> Result<Vec<ProjectRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

// ============================================================================
// Carousel
// ============================================================================

/// Position within the slide deck.
///
/// `current_index` is always in `[0, total_slides)` unless the deck is empty,
/// in which case it stays at 0 and every step is a no-op.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarouselState {
    pub current_index: usize,
    pub total_slides: usize,
    pub loop_enabled: bool,
}

impl CarouselState {
    pub fn new(total_slides: usize, loop_enabled: bool) -> Self {
        Self {
            current_index: 0,
            total_slides,
            loop_enabled,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_slides == 0
    }

    /// Move one slide forward. Wraps when looping, otherwise stops at the end.
    pub fn step_forward(&mut self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let last = self.total_slides - 1;
        self.current_index = if self.current_index < last {
            self.current_index + 1
        } else if self.loop_enabled {
            0
        } else {
            last
        };
        self.current_index
    }

    /// Move one slide back. Wraps when looping, otherwise stops at 0.
    pub fn step_back(&mut self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.current_index = if self.current_index > 0 {
            self.current_index - 1
        } else if self.loop_enabled {
            self.total_slides - 1
        } else {
            0
        };
        self.current_index
    }

    /// Jump to `index`, reduced modulo the slide count.
    pub fn go_to(&mut self, index: usize) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.current_index = index % self.total_slides;
        self.current_index
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// Identifier of the page section currently in view (the section's `id`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ActiveSection(pub String);

impl ActiveSection {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActiveSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
