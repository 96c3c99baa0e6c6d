//! Default values shared across sections

/// Hosted chat API base URL
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable read for the hosted API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Self-hosted engine API base URL
pub const DEFAULT_ENGINE_ENDPOINT: &str = "http://localhost:8000/v1";

/// Embedding server base URL
pub const DEFAULT_EMBEDDING_ENDPOINT: &str = "http://localhost:8080/v1";

/// Sentence embedding model used to index examples
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-mpnet-base-v2";

/// Connect/request timeout for backend calls, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Example set location
pub const DEFAULT_EXAMPLES_PATH: &str = "./data/ICL_examples.json";

/// Model prompt registry location
pub const DEFAULT_MODEL_MAPPING_PATH: &str = "./data/model_mapping.json";
