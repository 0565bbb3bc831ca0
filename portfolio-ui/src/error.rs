use portfolio_types::ParseThemeError;

/// Failures surfaced by the page runtime.
///
/// None of these is fatal to the page: each one disables a single feature and
/// the caller logs it and carries on with the rest of startup.
#[derive(Debug, thiserror::Error)]
pub enum PortfolioError {
    #[error("Missing DOM element: {0}")]
    MissingElement(String),

    #[error("Carousel widget unavailable after {attempts} attempts")]
    WidgetUnavailable { attempts: u32 },

    #[error("Carousel widget construction failed: {0}")]
    WidgetConstruction(String),

    #[error("Preference storage unavailable: {0}")]
    Storage(String),

    #[error(transparent)]
    InvalidTheme(#[from] ParseThemeError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl From<serde_json::Error> for PortfolioError {
    fn from(e: serde_json::Error) -> Self {
        PortfolioError::Config(e.to_string())
    }
}
