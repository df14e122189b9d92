//! Per-call query context.

/// Options threaded through one call by the execution layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryContext {
    hint: Option<String>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an optimizer hint such as `/*+ INDEX(t idx_a) */`.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        let hint = hint.into();
        self.hint = (!hint.is_empty()).then_some(hint);
        self
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Insert the hint after the first keyword of `sql`.
    ///
    /// The statement is trimmed first. Without a hint, or when the statement
    /// is a single token, it is returned unchanged.
    pub fn apply_hint(&self, sql: &str) -> String {
        let Some(hint) = self.hint.as_deref() else {
            return sql.to_string();
        };
        let trimmed = sql.trim();
        let Some(space) = trimmed.find(' ') else {
            return sql.to_string();
        };
        format!("{} {}{}", &trimmed[..space], hint, &trimmed[space..])
    }
}
