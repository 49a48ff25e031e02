/// Result type for session-facing code.
///
/// Component errors stay typed underneath and can be recovered with
/// [anyhow::Error::downcast_ref] where a caller needs to tell, say, a
/// timeout apart from a phase failure.
pub type WindlassResult<T> = anyhow::Result<T>;
