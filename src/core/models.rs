//! Built-in model catalog
//!
//! The catalog is loaded from the builtin_models.toml file embedded at build
//! time. It is fixed for the lifetime of the process.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOption {
    pub id: String,
    pub display_name: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct BuiltinModelsConfig {
    models: Vec<ModelOption>,
}

/// Load the built-in model options in display order.
pub fn load_builtin_models() -> Vec<ModelOption> {
    const CONFIG_CONTENT: &str = include_str!("../builtin_models.toml");

    let config: BuiltinModelsConfig =
        toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_models.toml");

    config.models
}

/// Find a model by id or display name (case-insensitive).
pub fn find_model(query: &str) -> Option<ModelOption> {
    let query = query.trim();
    load_builtin_models().into_iter().find(|m| {
        m.id.eq_ignore_ascii_case(query) || m.display_name.eq_ignore_ascii_case(query)
    })
}

/// Position of a model id within the catalog.
pub fn model_index(models: &[ModelOption], id: &str) -> Option<usize> {
    models.iter().position(|m| m.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_builtin_models() {
        let models = load_builtin_models();
        assert_eq!(models.len(), 4);

        let ids: Vec<&str> = models.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "mistralai/mistral-7b-instruct:free",
                "deepseek/deepseek-chat-v3.1:free",
                "openai/gpt-oss-20b:free",
                "x-ai/grok-4-fast:free",
            ]
        );
    }

    #[test]
    fn test_find_model() {
        let by_id = find_model("X-AI/GROK-4-FAST:FREE").expect("lookup by id");
        assert_eq!(by_id.display_name, "Grok 3 (Free)");

        let by_name = find_model("deepseek v3.1 (free)").expect("lookup by name");
        assert_eq!(by_name.id, "deepseek/deepseek-chat-v3.1:free");

        assert!(find_model("nonexistent").is_none());
    }

    #[test]
    fn test_model_properties() {
        for model in load_builtin_models() {
            assert!(!model.id.is_empty());
            assert!(!model.display_name.is_empty());
            assert!(!model.description.is_empty());
            assert!(model.id.contains('/'));
        }
    }

    #[test]
    fn test_model_index() {
        let models = load_builtin_models();
        assert_eq!(model_index(&models, "openai/gpt-oss-20b:free"), Some(2));
        assert_eq!(model_index(&models, "missing"), None);
    }
}
