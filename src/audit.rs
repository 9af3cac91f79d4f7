use serde_json::Value;

/// Emit a structured activity event under the `audit` target. Operators can
/// route these to a separate sink with an `EnvFilter` directive like
/// `audit=info`.
pub fn log_audit(session_id: &str, action: &str, resource: Option<&str>, metadata: Option<Value>) {
    let metadata = metadata.unwrap_or(Value::Null);
    tracing::info!(
        target: "audit",
        session_id = %session_id,
        action = %action,
        resource = %resource.unwrap_or("-"),
        metadata = %metadata,
        "audit event"
    );
}
