use std::fmt;

/// Placeholder shown instead of an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub icon: &'static str,
    pub message: String,
}

impl EmptyState {
    pub fn new(icon: &'static str, message: String) -> Self {
        Self { icon, message }
    }
}

impl fmt::Display for EmptyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}  {}", self.icon, self.message)
    }
}
