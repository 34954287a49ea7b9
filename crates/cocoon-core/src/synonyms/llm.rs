use std::env;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, trace};

use super::{IdentifierKind, OracleError, SynonymOracle};
use crate::storage::ResponseCache;

/// Environment variable holding the OpenAI API key
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A text-in, text-out language model
pub trait LanguageModel: Send + Sync {
    fn query(&self, prompt: &str) -> Result<String, OracleError>;
}

impl<M: LanguageModel + ?Sized> LanguageModel for Box<M> {
    fn query(&self, prompt: &str) -> Result<String, OracleError> {
        (**self).query(prompt)
    }
}

/// Oracle that asks a language model for the synonym
pub struct PromptOracle {
    model: Box<dyn LanguageModel>,
}

impl PromptOracle {
    pub fn new(model: impl LanguageModel + 'static) -> Self {
        Self {
            model: Box::new(model),
        }
    }

    pub fn prompt(name: &str, context: &str, kind: IdentifierKind) -> String {
        format!(
            "Generate a synonym for the {kind} \"{name}\" in the following code snippet: \n\n{context}\nIf no good alternative is possible, return the original name.\nAnswer with only the new {kind} name."
        )
    }
}

impl SynonymOracle for PromptOracle {
    fn generate_synonym_for(
        &self,
        name: &str,
        context: &str,
        kind: IdentifierKind,
    ) -> Result<String, OracleError> {
        let prompt = Self::prompt(name, context, kind);
        let answer = self.model.query(&prompt)?;
        Ok(answer.trim().to_string())
    }
}

/// Chat-completions client for the OpenAI API
pub struct OpenAiModel {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiModel {
    /// Build a client with the key from `OPENAI_API_KEY`
    pub fn from_env(model: &str) -> Result<Self, OracleError> {
        let api_key = env::var(OPENAI_API_KEY)
            .map_err(|_| OracleError::Unavailable(format!("{OPENAI_API_KEY} is not set")))?;
        Ok(Self::new(model, api_key))
    }

    pub fn new(model: &str, api_key: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            agent,
            endpoint: OPENAI_ENDPOINT.to_string(),
            api_key: api_key.into(),
            model: Self::model_id(model).to_string(),
        }
    }

    /// Point the client at a compatible server instead of api.openai.com
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Accepts the display name older configuration files use
    fn model_id(model: &str) -> &str {
        match model {
            "ChatGPT4o-mini" => "gpt-4o-mini",
            other => other,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

impl LanguageModel for OpenAiModel {
    fn query(&self, prompt: &str) -> Result<String, OracleError> {
        trace!(model = %self.model, "querying chat completions");
        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(json!({
                "model": self.model,
                "messages": [{ "role": "user", "content": prompt }],
            }))
            .map_err(|e| OracleError::Http(e.to_string()))?;

        let completion: ChatCompletion = response.into_json()?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OracleError::Malformed("completion has no message content".to_string()))
    }
}

/// Serves repeated prompts from a cache; only misses reach the model
pub struct CachedModel<M> {
    model: M,
    cache: Arc<dyn ResponseCache>,
}

impl<M: LanguageModel> CachedModel<M> {
    pub fn new(model: M, cache: Arc<dyn ResponseCache>) -> Self {
        Self { model, cache }
    }
}

impl<M: LanguageModel> LanguageModel for CachedModel<M> {
    fn query(&self, prompt: &str) -> Result<String, OracleError> {
        if let Some(cached) = self.cache.get(prompt)? {
            debug!("response cache hit");
            return Ok(cached);
        }
        let response = self.model.query(prompt)?;
        self.cache.put(prompt, &response)?;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::storage::MemoryCache;

    /// Answers every prompt with a fixed string and remembers the prompts
    #[derive(Default)]
    struct RecordingModel {
        answer: String,
        prompts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl RecordingModel {
        fn answering(answer: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: answer.to_string(),
                ..Self::default()
            })
        }
    }

    impl LanguageModel for Arc<RecordingModel> {
        fn query(&self, prompt: &str) -> Result<String, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.answer.clone())
        }
    }

    struct FailingModel;

    impl LanguageModel for FailingModel {
        fn query(&self, _prompt: &str) -> Result<String, OracleError> {
            Err(OracleError::Http("connection refused".to_string()))
        }
    }

    const SNIPPET: &str = "public int test() {\n  int value = 1;\n  return value;\n}";

    #[test]
    fn test_prompt_text() {
        let model = RecordingModel::answering("result");
        let oracle = PromptOracle::new(model.clone());

        let synonym = oracle
            .generate_synonym_for("value", SNIPPET, IdentifierKind::Variable)
            .unwrap();

        assert_eq!(synonym, "result");
        assert_eq!(
            model.prompts.lock().unwrap().as_slice(),
            ["Generate a synonym for the variable \"value\" in the following code snippet: \n\npublic int test() {\n  int value = 1;\n  return value;\n}\nIf no good alternative is possible, return the original name.\nAnswer with only the new variable name."]
        );
    }

    #[test]
    fn test_prompt_names_the_kind_twice() {
        let prompt = PromptOracle::prompt("value", SNIPPET, IdentifierKind::Parameter);
        assert!(prompt.starts_with("Generate a synonym for the parameter \"value\""));
        assert!(prompt.ends_with("Answer with only the new parameter name."));
    }

    #[test]
    fn test_answer_is_trimmed() {
        let oracle = PromptOracle::new(RecordingModel::answering("  total\n"));
        let synonym = oracle
            .generate_synonym_for("sum", SNIPPET, IdentifierKind::Function)
            .unwrap();
        assert_eq!(synonym, "total");
    }

    #[test]
    fn test_model_failure_is_an_oracle_error() {
        let oracle = PromptOracle::new(FailingModel);
        let err = oracle
            .generate_synonym_for("value", SNIPPET, IdentifierKind::Variable)
            .unwrap_err();
        assert!(matches!(err, OracleError::Http(_)));
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let model = RecordingModel::answering("result");
        let cache = Arc::new(MemoryCache::new());
        let cached = CachedModel::new(model.clone(), cache.clone());

        assert_eq!(cached.query("prompt").unwrap(), "result");
        assert_eq!(cached.query("prompt").unwrap(), "result");

        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get("prompt").unwrap(), Some("result".to_string()));
    }

    #[test]
    fn test_failed_query_is_not_cached() {
        let cache = Arc::new(MemoryCache::new());
        let cached = CachedModel::new(FailingModel, cache.clone());

        assert!(cached.query("prompt").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_legacy_model_name() {
        assert_eq!(OpenAiModel::new("ChatGPT4o-mini", "key").model(), "gpt-4o-mini");
        assert_eq!(OpenAiModel::new("gpt-4o", "key").model(), "gpt-4o");
    }
}
