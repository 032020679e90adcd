use std::sync::Arc;

use nd_core::{Error, ModelConfig, Result, ToneAnalyzer};

pub mod dummy;
pub mod ollama;

pub use dummy::DummyAnalyzer;
pub use ollama::OllamaAnalyzer;

pub const AVAILABLE_MODELS: [&str; 2] = ["ollama", "dummy"];

/// Build the analyzer registered under `name`.
pub fn create_analyzer(name: &str, config: &ModelConfig) -> Result<Arc<dyn ToneAnalyzer>> {
    match name.to_lowercase().as_str() {
        "ollama" => Ok(Arc::new(OllamaAnalyzer::new(config)?)),
        "dummy" => Ok(Arc::new(DummyAnalyzer::new())),
        other => Err(Error::Config(format!(
            "Unknown model '{}'. Available models: {}",
            other,
            AVAILABLE_MODELS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_analyzer() {
        let config = ModelConfig::default();
        assert_eq!(create_analyzer("ollama", &config).unwrap().name(), "Ollama");
        assert_eq!(create_analyzer("Dummy", &config).unwrap().name(), "Dummy");

        let err = create_analyzer("deepseek", &config).err().unwrap();
        assert_eq!(err.to_string(), "Configuration error: Unknown model 'deepseek'. Available models: ollama, dummy");
    }
}
