//! Construction options for the slider widget, serialized to the JSON object
//! its constructor expects.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::config::{CarouselConfig, Selectors};
use crate::error::PortfolioError;

pub const NAV_DISABLED_CLASS: &str = "custom-nav-disabled";
pub const NAV_LOCK_CLASS: &str = "custom-nav-lock";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WidgetOptions {
    #[serde(rename = "loop")]
    pub loop_enabled: bool,
    pub slides_per_view: u32,
    pub space_between: u32,
    pub speed: u32,
    pub grab_cursor: bool,
    // Re-measure when slides or their parents change.
    pub observer: bool,
    pub observe_parents: bool,
    pub observe_slide_children: bool,
    pub navigation: NavigationOptions,
    pub pagination: PaginationOptions,
    /// Keyed by minimum viewport width in CSS pixels
    pub breakpoints: BTreeMap<u32, BreakpointOptions>,
    pub autoplay: Autoplay,
}

/// Custom state classes keep the widget from disabling the controls with its
/// stock classes; the adapter's own click handlers drive navigation.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationOptions {
    pub next_el: String,
    pub prev_el: String,
    pub disabled_class: String,
    pub lock_class: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationOptions {
    pub el: String,
    pub clickable: bool,
    pub dynamic_bullets: bool,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointOptions {
    pub slides_per_view: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_between: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AutoplayOptions {
    pub delay: u32,
    pub disable_on_interaction: bool,
    pub pause_on_mouse_enter: bool,
}

/// Serialized as `false` when off, as the options object when on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Autoplay {
    Disabled,
    Enabled(AutoplayOptions),
}

impl Serialize for Autoplay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Autoplay::Disabled => serializer.serialize_bool(false),
            Autoplay::Enabled(options) => options.serialize(serializer),
        }
    }
}

impl WidgetOptions {
    /// Options for the configured carousel. Reduced motion turns autoplay off
    /// regardless of configuration.
    pub fn new(config: &CarouselConfig, selectors: &Selectors, reduced_motion: bool) -> Self {
        let autoplay = if config.autoplay.enabled && !reduced_motion {
            Autoplay::Enabled(AutoplayOptions {
                delay: config.autoplay.delay_ms,
                disable_on_interaction: config.autoplay.disable_on_interaction,
                pause_on_mouse_enter: config.autoplay.pause_on_mouse_enter,
            })
        } else {
            Autoplay::Disabled
        };

        let breakpoints = config
            .breakpoints
            .iter()
            .map(|bp| {
                (
                    bp.min_width,
                    BreakpointOptions {
                        slides_per_view: bp.slides_per_view,
                        space_between: bp.space_between,
                    },
                )
            })
            .collect();

        Self {
            loop_enabled: config.loop_enabled,
            slides_per_view: config.slides_per_view,
            space_between: config.space_between,
            speed: config.speed_ms,
            grab_cursor: config.grab_cursor,
            observer: true,
            observe_parents: true,
            observe_slide_children: true,
            navigation: NavigationOptions {
                next_el: selectors.next_control.clone(),
                prev_el: selectors.prev_control.clone(),
                disabled_class: NAV_DISABLED_CLASS.to_string(),
                lock_class: NAV_LOCK_CLASS.to_string(),
            },
            pagination: PaginationOptions {
                el: selectors.pagination.clone(),
                clickable: true,
                dynamic_bullets: true,
            },
            breakpoints,
            autoplay,
        }
    }

    /// Column count in effect at `viewport_width`.
    pub fn slides_per_view_at(&self, viewport_width: u32) -> u32 {
        self.breakpoints
            .range(..=viewport_width)
            .next_back()
            .map(|(_, bp)| bp.slides_per_view)
            .unwrap_or(self.slides_per_view)
    }

    pub fn to_json(&self) -> Result<String, PortfolioError> {
        Ok(serde_json::to_string(self)?)
    }
}
