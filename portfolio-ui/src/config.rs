//! Runtime configuration.
//!
//! Every field has a default matching the stock page. A page may override any
//! subset through a `<script type="application/json" id="portfolio-config">`
//! block; missing sections and fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::PortfolioError;

/// Id of the optional JSON block carrying configuration overrides.
pub const CONFIG_ELEMENT_ID: &str = "portfolio-config";
/// Id of the optional JSON block replacing the built-in project deck.
pub const PROJECTS_ELEMENT_ID: &str = "portfolio-projects";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PortfolioConfig {
    pub theme: ThemeConfig,
    pub carousel: CarouselConfig,
    pub reveal: RevealConfig,
    pub navigation: NavigationConfig,
    pub selectors: Selectors,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThemeConfig {
    /// localStorage key holding "light" or "dark"
    pub storage_key: String,
    /// Window after a switch during which further switches are ignored
    pub transition_cooldown_ms: u32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_string(),
            transition_cooldown_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CarouselConfig {
    /// Availability checks before giving up on the widget
    pub max_attempts: u32,
    pub retry_delay_ms: u32,
    pub loop_enabled: bool,
    pub slides_per_view: u32,
    pub space_between: u32,
    pub speed_ms: u32,
    pub grab_cursor: bool,
    pub autoplay: AutoplayConfig,
    /// Ascending by `min_width`
    pub breakpoints: Vec<Breakpoint>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            retry_delay_ms: 500,
            loop_enabled: true,
            slides_per_view: 1,
            space_between: 32,
            speed_ms: 600,
            grab_cursor: true,
            autoplay: AutoplayConfig::default(),
            breakpoints: vec![
                Breakpoint::new(640, 1),
                Breakpoint::new(768, 2),
                Breakpoint::new(1024, 3),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AutoplayConfig {
    pub enabled: bool,
    pub delay_ms: u32,
    pub disable_on_interaction: bool,
    pub pause_on_mouse_enter: bool,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: 4500,
            disable_on_interaction: false,
            pause_on_mouse_enter: true,
        }
    }
}

/// Column count applied from `min_width` CSS pixels upward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Breakpoint {
    pub min_width: u32,
    pub slides_per_view: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_between: Option<u32>,
}

impl Breakpoint {
    pub fn new(min_width: u32, slides_per_view: u32) -> Self {
        Self {
            min_width,
            slides_per_view,
            space_between: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RevealConfig {
    /// Fraction of the element that must be visible, in [0, 1]
    pub threshold: f64,
    pub root_margin: String,
    pub revealed_class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            revealed_class: "revealed".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    /// Extra gap kept between the fixed header and the section top
    pub scroll_padding_px: f64,
    /// Used when the header element cannot be measured
    pub fallback_header_height_px: f64,
    pub settle_delay_ms: u32,
    pub settle_tolerance_px: f64,
    /// Visible fraction at which a section becomes the active one
    pub section_threshold: f64,
    pub active_class: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            scroll_padding_px: 20.0,
            fallback_header_height_px: 70.0,
            settle_delay_ms: 1000,
            settle_tolerance_px: 5.0,
            section_threshold: 0.5,
            active_class: "active".to_string(),
        }
    }
}

/// CSS selectors for the DOM the runtime binds to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Selectors {
    pub theme_toggle: String,
    pub header: String,
    pub carousel: String,
    pub slides_container: String,
    pub prev_control: String,
    pub next_control: String,
    pub pagination: String,
    pub reveal_candidates: String,
    pub sections: String,
    pub anchors: String,
    pub menu_toggle: String,
    pub nav_links: String,
    pub buttons: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            theme_toggle: "#theme-toggle".to_string(),
            header: "header, .navbar".to_string(),
            carousel: ".projects-swiper".to_string(),
            slides_container: "#projects-container".to_string(),
            prev_control: "#projects-prev".to_string(),
            next_control: "#projects-next".to_string(),
            pagination: ".swiper-pagination".to_string(),
            reveal_candidates: ".reveal, .project-card".to_string(),
            sections: "section[id]".to_string(),
            anchors: "a[href^=\"#\"]".to_string(),
            menu_toggle: "#mobile-menu-toggle".to_string(),
            nav_links: ".nav-links".to_string(),
            buttons: "a.btn, button.btn, .carousel-btn".to_string(),
        }
    }
}

impl PortfolioConfig {
    /// Parse page-provided overrides and validate the result.
    pub fn from_json(json: &str) -> Result<Self, PortfolioError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PortfolioError> {
        if self.theme.storage_key.trim().is_empty() {
            return Err(PortfolioError::Config(
                "theme.storage_key must not be empty".to_string(),
            ));
        }
        if self.carousel.max_attempts == 0 {
            return Err(PortfolioError::Config(
                "carousel.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.carousel.slides_per_view == 0 {
            return Err(PortfolioError::Config(
                "carousel.slides_per_view must be at least 1".to_string(),
            ));
        }
        if let Some(bp) = self
            .carousel
            .breakpoints
            .iter()
            .find(|bp| bp.slides_per_view == 0)
        {
            return Err(PortfolioError::Config(format!(
                "carousel breakpoint {}px has zero slides_per_view",
                bp.min_width
            )));
        }
        if self
            .carousel
            .breakpoints
            .windows(2)
            .any(|pair| pair[0].min_width >= pair[1].min_width)
        {
            return Err(PortfolioError::Config(
                "carousel.breakpoints must be strictly ascending by min_width".to_string(),
            ));
        }
        unit_interval("reveal.threshold", self.reveal.threshold)?;
        unit_interval("navigation.section_threshold", self.navigation.section_threshold)?;
        if self.navigation.settle_tolerance_px < 0.0 {
            return Err(PortfolioError::Config(
                "navigation.settle_tolerance_px must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

fn unit_interval(name: &str, value: f64) -> Result<(), PortfolioError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PortfolioError::Config(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}
