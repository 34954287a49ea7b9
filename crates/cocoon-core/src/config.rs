/*!
# Configuration

A run is described by one YAML file:

```yaml
inputFilePath: data/in.json
outputFilePath: data/out.json
transformers:
  - name: forToWhileTransformer
  - name: variableNameTransformer
synonymGenerator:
  name: llmSynonymGenerator
  llm:
    provider: openai
    model: gpt-4o-mini
    cachePath: cache/llm.sled
```

[`CocoonConfig::build_oracle`] turns `synonymGenerator` into a
[`SynonymOracle`] and [`CocoonConfig::build_pipeline`] turns `transformers`
into a [`Pipeline`], in the listed order.
*/

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::storage::{CacheError, SledCache};
use crate::synonyms::{
    CachedModel, LanguageModel, LexicalOracle, OpenAiModel, OracleError, PromptOracle,
    SynonymOracle,
};
use crate::transformer::{
    ExpandUnaryIncrement, ForToWhile, FunctionName, NestElseIf, ParameterName, Pass, Pipeline,
    ReverseIf, SwapEqualsOperands, SwapRelationOperands, VariableName,
};

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("No transformers configured")]
    NoTransformers,

    #[error("Unknown transformer: {0}")]
    UnknownTransformer(String),

    #[error("Transformer {transformer} needs a synonym generator, but none is configured")]
    MissingOracle { transformer: String },

    #[error("Unknown synonym generator: {0}")]
    UnknownOracle(String),

    #[error("Unknown LLM provider: {0}")]
    UnknownProvider(String),

    #[error("Synonym generator {oracle} is missing its `{field}` setting")]
    MissingSetting { oracle: String, field: &'static str },

    #[error("Synonym generator setup failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("Response cache setup failed: {0}")]
    Cache(#[from] CacheError),
}

pub const LLM_SYNONYM_GENERATOR: &str = "llmSynonymGenerator";
pub const LEXICAL_SYNONYM_GENERATOR: &str = "lexicalSynonymGenerator";

/// Every pass name accepted in `transformers`
pub const TRANSFORMER_NAMES: &[&str] = &[
    "forToWhileTransformer",
    "nestElseIfTransformer",
    "reverseIfTransformer",
    "swapRelationOperandsTransformer",
    "expandUnaryIncrementTransformer",
    "swapEqualsOperandsTransformer",
    "variableNameTransformer",
    "functionNameTransformer",
    "parameterNameTransformer",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CocoonConfig {
    #[serde(default)]
    pub input_file_path: Option<PathBuf>,
    #[serde(default)]
    pub output_file_path: Option<PathBuf>,
    #[serde(default)]
    pub transformers: Vec<TransformerConfig>,
    #[serde(default)]
    pub synonym_generator: Option<SynonymGeneratorConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerConfig {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynonymGeneratorConfig {
    pub name: String,
    /// JSON thesaurus for the lexical generator
    #[serde(default)]
    pub thesaurus_path: Option<PathBuf>,
    #[serde(default)]
    pub llm: Option<LlmConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    /// Persistent prompt cache; responses are not cached when absent
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
}

impl CocoonConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// The configured synonym oracle, or `None` when the file has no
    /// `synonymGenerator` section.
    pub fn build_oracle(&self) -> Result<Option<Arc<dyn SynonymOracle>>, ConfigError> {
        let Some(generator) = &self.synonym_generator else {
            return Ok(None);
        };

        let oracle: Arc<dyn SynonymOracle> = match generator.name.as_str() {
            LEXICAL_SYNONYM_GENERATOR => {
                let path = generator
                    .thesaurus_path
                    .as_ref()
                    .ok_or_else(|| missing(generator, "thesaurusPath"))?;
                Arc::new(LexicalOracle::from_path(path)?)
            }
            LLM_SYNONYM_GENERATOR => {
                let llm = generator
                    .llm
                    .as_ref()
                    .ok_or_else(|| missing(generator, "llm"))?;
                Arc::new(PromptOracle::new(build_model(llm)?))
            }
            other => return Err(ConfigError::UnknownOracle(other.to_string())),
        };
        info!(generator = %generator.name, "synonym generator ready");
        Ok(Some(oracle))
    }

    /// The configured passes in order. Identifier passes take `oracle`.
    pub fn build_pipeline(
        &self,
        oracle: Option<Arc<dyn SynonymOracle>>,
    ) -> Result<Pipeline, ConfigError> {
        if self.transformers.is_empty() {
            return Err(ConfigError::NoTransformers);
        }

        let mut pipeline = Pipeline::new();
        for transformer in &self.transformers {
            pipeline.push(create_pass(&transformer.name, oracle.as_ref())?);
        }
        Ok(pipeline)
    }
}

fn missing(generator: &SynonymGeneratorConfig, field: &'static str) -> ConfigError {
    ConfigError::MissingSetting {
        oracle: generator.name.clone(),
        field,
    }
}

fn build_model(config: &LlmConfig) -> Result<Box<dyn LanguageModel>, ConfigError> {
    let model = match config.provider.as_str() {
        "openai" => OpenAiModel::from_env(&config.model)?,
        other => return Err(ConfigError::UnknownProvider(other.to_string())),
    };
    let model: Box<dyn LanguageModel> = match &config.cache_path {
        Some(path) => {
            let cache = SledCache::open(path)?;
            info!(path = %path.display(), entries = cache.len(), "caching LLM responses");
            Box::new(CachedModel::new(model, Arc::new(cache)))
        }
        None => Box::new(model),
    };
    Ok(model)
}

/// Map a transformer name to its pass
pub fn create_pass(
    name: &str,
    oracle: Option<&Arc<dyn SynonymOracle>>,
) -> Result<Box<dyn Pass>, ConfigError> {
    let oracle_for = |transformer: &str| {
        oracle.cloned().ok_or_else(|| ConfigError::MissingOracle {
            transformer: transformer.to_string(),
        })
    };

    let pass: Box<dyn Pass> = match name {
        "forToWhileTransformer" => Box::new(ForToWhile::new()),
        "nestElseIfTransformer" => Box::new(NestElseIf::new()),
        "reverseIfTransformer" => Box::new(ReverseIf::new()),
        "swapRelationOperandsTransformer" => Box::new(SwapRelationOperands::new()),
        "expandUnaryIncrementTransformer" => Box::new(ExpandUnaryIncrement::new()),
        "swapEqualsOperandsTransformer" => Box::new(SwapEqualsOperands::new()),
        "variableNameTransformer" => Box::new(VariableName::new(oracle_for(name)?)),
        "functionNameTransformer" => Box::new(FunctionName::new(oracle_for(name)?)),
        "parameterNameTransformer" => Box::new(ParameterName::new(oracle_for(name)?)),
        other => return Err(ConfigError::UnknownTransformer(other.to_string())),
    };
    Ok(pass)
}
