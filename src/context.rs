use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::LanguageModelService;

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub language_model: Arc<dyn LanguageModelService>,
}

impl AppContext {
    pub fn new(config: AppConfig, language_model: Arc<dyn LanguageModelService>) -> Self {
        Self {
            config,
            language_model,
        }
    }
}
