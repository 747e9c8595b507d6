//! The tool invocation protocol.
//!
//! Given a capability name and the raw argument payload from a model reply:
//! resolve the tool, parse and validate the arguments against its declared
//! schema, resolve input files referenced in the payload, execute exactly
//! once, and package the outcome into a [`ToolStep`]. No implicit retries:
//! whether to try again after a failure is the controller's decision.

use cogent_core::error::CapabilityError;
use cogent_core::message::FunctionCall;
use cogent_core::step::{ToolInfo, ToolStep};
use cogent_core::tool::ToolRegistry;
use cogent_files::FileManager;

/// Resolve, validate, and execute one capability call.
pub(crate) async fn invoke_tool(
    tools: &ToolRegistry,
    files: &FileManager,
    call: &FunctionCall,
) -> Result<ToolStep, CapabilityError> {
    let tool = tools.get(&call.name)?;

    let arguments = parse_arguments(&call.arguments)?;
    validate_arguments(&tool.parameters_schema(), &arguments)?;

    let input_files = files.sniff_files_from_value(&arguments);
    let output = tool.execute(arguments, &input_files).await?;

    Ok(ToolStep {
        info: ToolInfo {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
        },
        success: true,
        result: output.result,
        input_files,
        output_files: output.output_files,
    })
}

/// Parse the raw argument payload into a JSON object.
fn parse_arguments(raw: &str) -> Result<serde_json::Value, CapabilityError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| CapabilityError::InvalidArguments(format!("not valid JSON: {e}")))?;
    if !value.is_object() {
        return Err(CapabilityError::InvalidArguments(format!(
            "expected a JSON object, got: {raw}"
        )));
    }
    Ok(value)
}

/// Check an argument object against a capability's declared JSON schema.
///
/// Covers the subset of JSON Schema that capability declarations use:
/// `required` membership and primitive `type` checks on declared
/// properties. Undeclared arguments are permitted.
fn validate_arguments(
    schema: &serde_json::Value,
    arguments: &serde_json::Value,
) -> Result<(), CapabilityError> {
    let Some(object) = arguments.as_object() else {
        return Err(CapabilityError::InvalidArguments(
            "expected a JSON object".into(),
        ));
    };

    if let Some(required) = schema["required"].as_array() {
        for key in required.iter().filter_map(|k| k.as_str()) {
            if !object.contains_key(key) {
                return Err(CapabilityError::InvalidArguments(format!(
                    "missing required argument '{key}'"
                )));
            }
        }
    }

    if let Some(properties) = schema["properties"].as_object() {
        for (key, value) in object {
            let Some(declared) = properties.get(key) else {
                continue;
            };
            let Some(expected) = declared["type"].as_str() else {
                continue;
            };
            if !type_matches(expected, value) {
                return Err(CapabilityError::InvalidArguments(format!(
                    "argument '{key}' should be of type '{expected}'"
                )));
            }
        }
    }

    Ok(())
}

fn type_matches(expected: &str, value: &serde_json::Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cogent_core::file::File;
    use cogent_core::tool::{Tool, ToolOutput};
    use std::sync::Arc;

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Uppercase a string"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" },
                    "repeat": { "type": "integer" }
                },
                "required": ["text"]
            })
        }

        async fn execute(
            &self,
            arguments: serde_json::Value,
            _input_files: &[File],
        ) -> Result<ToolOutput, CapabilityError> {
            let text = arguments["text"].as_str().unwrap_or_default();
            Ok(ToolOutput::from_result(
                serde_json::json!({ "text": text.to_uppercase() }),
            ))
        }
    }

    fn registry() -> ToolRegistry {
        let mut tools = ToolRegistry::new();
        tools.load(Arc::new(UpperTool));
        tools
    }

    fn file_manager() -> (tempfile::TempDir, FileManager) {
        let dir = tempfile::tempdir().unwrap();
        let manager = FileManager::new(dir.path());
        (dir, manager)
    }

    #[tokio::test]
    async fn invoke_packages_a_step() {
        let tools = registry();
        let (_dir, files) = file_manager();
        let call = FunctionCall {
            name: "upper".into(),
            thoughts: None,
            arguments: r#"{"text":"hello"}"#.into(),
        };

        let step = invoke_tool(&tools, &files, &call).await.unwrap();
        assert!(step.success);
        assert_eq!(step.info.name, "upper");
        assert_eq!(step.result["text"], "HELLO");
        assert!(step.input_files.is_empty());
    }

    #[tokio::test]
    async fn unknown_capability_fails() {
        let tools = registry();
        let (_dir, files) = file_manager();
        let call = FunctionCall {
            name: "missing".into(),
            thoughts: None,
            arguments: "{}".into(),
        };

        let err = invoke_tool(&tools, &files, &call).await.unwrap_err();
        assert!(matches!(err, CapabilityError::NotFound(_)));
    }

    #[tokio::test]
    async fn invalid_json_arguments_fail() {
        let tools = registry();
        let (_dir, files) = file_manager();
        let call = FunctionCall {
            name: "upper".into(),
            thoughts: None,
            arguments: "not json".into(),
        };

        let err = invoke_tool(&tools, &files, &call).await.unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn missing_required_argument_fails() {
        let tools = registry();
        let (_dir, files) = file_manager();
        let call = FunctionCall {
            name: "upper".into(),
            thoughts: None,
            arguments: r#"{"repeat": 2}"#.into(),
        };

        let err = invoke_tool(&tools, &files, &call).await.unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn wrong_argument_type_fails() {
        let tools = registry();
        let (_dir, files) = file_manager();
        let call = FunctionCall {
            name: "upper".into(),
            thoughts: None,
            arguments: r#"{"text": "ok", "repeat": "twice"}"#.into(),
        };

        let err = invoke_tool(&tools, &files, &call).await.unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn input_files_resolved_from_arguments() {
        let tools = registry();
        let (_dir, files) = file_manager();
        let file = files
            .create_file_from_bytes(
                b"data",
                "in.txt",
                cogent_core::file::FilePurpose::Assistants,
                serde_json::Map::new(),
            )
            .await
            .unwrap();

        let call = FunctionCall {
            name: "upper".into(),
            thoughts: None,
            arguments: format!(r#"{{"text": "see {}"}}"#, file.id),
        };

        let step = invoke_tool(&tools, &files, &call).await.unwrap();
        assert_eq!(step.input_files, vec![file]);
    }

    #[test]
    fn validate_tolerates_undeclared_arguments() {
        let schema = serde_json::json!({
            "type": "object",
            "properties": { "a": { "type": "string" } }
        });
        let args = serde_json::json!({ "a": "x", "extra": 1 });
        assert!(validate_arguments(&schema, &args).is_ok());
    }
}
