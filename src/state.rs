use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::transcripts::TranscriptStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub transcripts: Arc<TranscriptStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let transcripts = Arc::new(TranscriptStore::new(PathBuf::from(
            &config.system_config.transcripts_dir,
        )));

        Self {
            config,
            transcripts,
        }
    }
}
