use openai_client::ToolDeclaration;
use serde::Deserialize;
use serde_json::json;

/// The single tool this orchestrator declares and executes.
pub const RECOMMENDATION_TOOL_NAME: &str = "get_books_by_themes";

/// Declaration sent to the model on the theme-identification call.
pub fn recommendation_tool() -> ToolDeclaration {
    ToolDeclaration::new(
        RECOMMENDATION_TOOL_NAME,
        "Get book summaries based on thematic similarity.",
        json!({
            "type": "object",
            "properties": {
                "themes": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "A list of themes to search for."
                },
                "n_results": {
                    "type": "integer",
                    "description": "The number of book summaries to retrieve (default 3)."
                }
            },
            "required": ["themes"]
        }),
    )
}

/// Validated decode of the model's tool-call arguments.
///
/// `themes` is required; decoding fails closed rather than defaulting it.
/// `n_results` optionally overrides the top-N.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolArguments {
    pub themes: Vec<String>,
    #[serde(default)]
    pub n_results: Option<u64>,
}

impl ToolArguments {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_requires_themes() {
        let tool = recommendation_tool();
        assert_eq!(tool.name, RECOMMENDATION_TOOL_NAME);
        assert_eq!(tool.parameters["required"][0], "themes");
    }

    #[test]
    fn parses_themes_and_optional_n_results() {
        let args = ToolArguments::parse(r#"{"themes": ["courage", "friendship"]}"#).unwrap();
        assert_eq!(args.themes, ["courage", "friendship"]);
        assert_eq!(args.n_results, None);

        let args = ToolArguments::parse(r#"{"themes": ["war"], "n_results": 5}"#).unwrap();
        assert_eq!(args.n_results, Some(5));
    }

    #[test]
    fn missing_themes_fails_closed() {
        assert!(ToolArguments::parse(r#"{"n_results": 3}"#).is_err());
        assert!(ToolArguments::parse("not json").is_err());
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let args = ToolArguments::parse(r#"{"themes": ["hope"], "extra": true}"#).unwrap();
        assert_eq!(args.themes, ["hope"]);
    }
}
