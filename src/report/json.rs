use crate::types::report::Report;

/// Compatibility reports print exactly the handler's response body.
pub fn to_json(report: &Report) -> Result<String, serde_json::Error> {
    match report {
        Report::Compatibility(compatibility) => {
            serde_json::to_string_pretty(&compatibility.response.body)
        }
        other => serde_json::to_string_pretty(other),
    }
}
