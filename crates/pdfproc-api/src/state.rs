//! Application state shared by all handlers.

use crate::results::ResultStore;
use crate::services::ExtractionService;
use pdfproc_core::Config;

pub struct AppState {
    pub config: Config,
    pub extraction: ExtractionService,
    pub results: ResultStore,
}

impl AppState {
    pub fn new(config: Config, extraction: ExtractionService) -> Self {
        let results = ResultStore::new(config.result_cache_capacity());
        Self {
            config,
            extraction,
            results,
        }
    }
}
