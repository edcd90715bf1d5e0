use crate::{Error, Result};
use confique::Config as _;
use std::collections::HashMap;

/// Client options, loaded from the environment.
///
/// Every field is also published through [`Config::map`] so that interactive
/// input can reference options as client-side variables (e.g. `:prompt`).
#[derive(Debug, Clone, confique::Config)]
pub struct Config {
    #[config(env = "QSH_PROMPT", default = "qsh")]
    pub prompt: String,
    #[config(env = "QSH_LESS_CHATTY", default = false)]
    pub less_chatty: bool,
    #[config(env = "QSH_MAX_HISTORY", default = 1000)]
    pub max_history: usize,
    #[config(env = "QSH_LOG_LEVEL", default = "info")]
    pub log_level: String,
    #[config(env = "QSH_SILENCE", default = false)]
    pub silence: bool,
    #[config(env = "QSH_SYNTAX_HIGHLIGHT", default = true)]
    pub syntax_highlight: bool,
    #[config(env = "QSH_SYNTAX_HIGHLIGHT_STYLE", default = "monokai")]
    pub syntax_highlight_style: String,
    #[config(env = "QSH_ON_ERROR_STOP", default = false)]
    pub on_error_stop: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        Config::builder()
            .env()
            .load()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// The option table consumed by the variable resolver. Passed around as an
    /// explicit context object; nothing here lives in process globals.
    pub fn map(&self) -> HashMap<String, String> {
        HashMap::from([
            ("prompt".into(), self.prompt.clone()),
            ("less_chatty".into(), self.less_chatty.to_string()),
            ("max_history".into(), self.max_history.to_string()),
            ("log_level".into(), self.log_level.clone()),
            ("silence".into(), self.silence.to_string()),
            ("syntax_highlight".into(), self.syntax_highlight.to_string()),
            (
                "syntax_highlight_style".into(),
                self.syntax_highlight_style.clone(),
            ),
            ("on_error_stop".into(), self.on_error_stop.to_string()),
        ])
    }
}
