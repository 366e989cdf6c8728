use thiserror::Error;

/// Why a search submission was refused. `Display` is the text shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a product name")]
    EmptyQuery,
    #[error("Please select at least one platform")]
    NoPlatformSelected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown notification severity: {0}")]
pub struct UnknownSeverity(pub String);
