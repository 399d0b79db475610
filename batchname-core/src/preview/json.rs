use super::PreviewResult;

/// Render a preview as pretty JSON
pub fn render_json(result: &PreviewResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "null".to_string())
}
