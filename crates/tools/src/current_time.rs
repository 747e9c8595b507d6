//! Current time tool — reports the current date and time.

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use cogent_core::error::CapabilityError;
use cogent_core::file::File;
use cogent_core::tool::{Tool, ToolOutput};

pub struct CurrentTimeTool;

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "current_time"
    }

    fn description(&self) -> &str {
        "Report the current date and time in RFC 3339 format (UTC)."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(
        &self,
        _arguments: serde_json::Value,
        _input_files: &[File],
    ) -> Result<ToolOutput, CapabilityError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        Ok(ToolOutput::from_result(
            serde_json::json!({ "current_time": now }),
        ))
    }
}
