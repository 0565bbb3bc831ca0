//! Slide deck rendering.
//!
//! Each [`ProjectRecord`] becomes one `.swiper-slide` fragment. The fragments
//! are joined and assigned to the container in one go, so the page never shows
//! a half-rendered deck.

use portfolio_types::{default_projects, parse_projects, ProjectKind, ProjectRecord};

const TABLEAU_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" fill="currentColor" viewBox="0 0 24 24" aria-hidden="true"><path d="M24 12v-1h-8v1h8zm-9-4h-6v8h6V8zm1 0v8h8V8h-8zM0 11v2h6v-2H0zm7-3h6V0H7v8zm-1 0V0H0v8h6z"/></svg>"#;
const POWERBI_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" fill="currentColor" viewBox="0 0 24 24" aria-hidden="true"><path d="M24 7.5v9l-12 6-12-6v-9l12-6 12 6z"/></svg>"#;
const GITHUB_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" fill="currentColor" viewBox="0 0 24 24" aria-hidden="true"><path d="M12 0c-6.626 0-12 5.373-12 12 0 5.302 3.438 9.8 8.207 11.387.599.111.793-.261.793-.577v-2.234c-3.338.726-4.033-1.416-4.033-1.416-.546-1.387-1.333-1.756-1.333-1.756-1.089-.745.083-.729.083-.729 1.205.084 1.839 1.237 1.839 1.237 1.07 1.834 2.807 1.304 3.492.997.107-.775.418-1.305.762-1.604-2.665-.305-5.467-1.334-5.467-5.931 0-1.311.469-2.381 1.236-3.221-.124-.303-.535-1.524.117-3.176 0 0 1.008-.322 3.301 1.23.957-.266 1.983-.399 3.003-.404 1.02.005 2.047.138 3.006.404 2.291-1.552 3.297-1.23 3.297-1.23.653 1.653.242 2.874.118 3.176.77.84 1.235 1.911 1.235 3.221 0 4.609-2.807 5.624-5.479 5.921.43.372.823 1.102.823 2.222v3.293c0 .319.192.694.801.576 4.765-1.589 8.199-6.086 8.199-11.386 0-6.627-5.373-12-12-12z"/></svg>"#;
const PDF_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="20" fill="currentColor" viewBox="0 0 24 24" aria-hidden="true"><path d="M14 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V8l-6-6z"/><polyline points="14,2 14,8 20,8"/><line x1="16" y1="13" x2="8" y2="13"/><line x1="16" y1="17" x2="8" y2="17"/><polyline points="10,9 9,9 8,9"/></svg>"#;

pub fn icon_for(kind: ProjectKind) -> &'static str {
    match kind {
        ProjectKind::Tableau => TABLEAU_ICON,
        ProjectKind::PowerBi => POWERBI_ICON,
        ProjectKind::Github => GITHUB_ICON,
        ProjectKind::Pdf => PDF_ICON,
    }
}

/// Escape text for use in element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Ordered, immutable collection of project records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideDeck {
    records: Vec<ProjectRecord>,
}

impl SlideDeck {
    pub fn new(records: Vec<ProjectRecord>) -> Self {
        Self { records }
    }

    /// Deck from the page's JSON block, or the built-in deck when the block is
    /// absent or malformed.
    pub fn from_page_json(json: Option<&str>) -> Self {
        match json.map(parse_projects) {
            Some(Ok(records)) => Self::new(records),
            Some(Err(e)) => {
                log::warn!("Ignoring malformed project data, using built-in deck: {}", e);
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One markup fragment per record, in deck order.
    pub fn render_fragments(&self) -> Vec<String> {
        self.records.iter().map(render_slide).collect()
    }

    /// Markup for the whole deck, ready to replace the container content.
    pub fn render(&self) -> String {
        self.render_fragments().concat()
    }
}

impl Default for SlideDeck {
    fn default() -> Self {
        Self::new(default_projects())
    }
}

fn render_slide(project: &ProjectRecord) -> String {
    let title = escape_html(&project.title);

    let image = project
        .image
        .as_ref()
        .map(|image| {
            format!(
                r#"<div class="project-image"><img src="{}" alt="{}" loading="lazy" /></div>"#,
                escape_html(image),
                title
            )
        })
        .unwrap_or_default();

    let technologies = if project.technologies.is_empty() {
        String::new()
    } else {
        let tags: String = project
            .technologies
            .iter()
            .map(|tech| format!(r#"<span class="tech-tag">{}</span>"#, escape_html(tech)))
            .collect();
        format!(r#"<div class="project-technologies">{}</div>"#, tags)
    };

    let link = project
        .link
        .as_ref()
        .map(|link| {
            format!(
                r#"<a href="{}" class="project-link" target="_blank" rel="noopener" aria-label="View {}">{}</a>"#,
                escape_html(link),
                title,
                icon_for(project.kind)
            )
        })
        .unwrap_or_default();

    let extra_links = if project.links.is_empty() {
        String::new()
    } else {
        let anchors: String = [("GitHub", &project.links.github), ("Demo", &project.links.demo)]
            .into_iter()
            .filter_map(|(label, href)| href.as_ref().map(|href| (label, href)))
            .map(|(label, href)| {
                format!(
                    r#"<a href="{}" class="project-link" target="_blank" rel="noopener"><span>{}</span></a>"#,
                    escape_html(href),
                    label
                )
            })
            .collect();
        format!(r#"<div class="project-links">{}</div>"#, anchors)
    };

    format!(
        r#"<div class="swiper-slide"><div class="project-card">{image}<div class="project-header"><h3 class="project-title">{title}</h3><span class="project-year">{year}</span></div><p class="project-description">{description}</p>{technologies}{link}{extra_links}</div></div>"#,
        year = escape_html(&project.year),
        description = escape_html(&project.description),
    )
}
