use serde::{Deserialize, Serialize};

pub mod watermark;

use watermark::ProcessOptions;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub watermark: ProcessOptions,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of files processed in parallel; 1 means sequential
    pub workers: usize,
    pub recursive: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            recursive: false,
        }
    }
}
