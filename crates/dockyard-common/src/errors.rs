/// Malformed or structurally illegal configuration. Raised at resolve or
/// create time; the caller has to fix the input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("layout config has no root item")]
    MissingRoot,

    #[error("unknown item type '{0}'")]
    UnknownItemType(String),

    #[error("component config is missing a componentType")]
    MissingComponentType,

    #[error("'{child}' item cannot be a child of '{parent}'")]
    IllegalChild { parent: String, child: String },

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("minified config error: {0}")]
    MinifyError(String),
}

/// Programmer errors: the API was called in a state or with arguments it
/// does not accept.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("layout not initialised: {0}")]
    NotInitialised(&'static str),

    #[error("layout already initialised")]
    AlreadyInitialised,

    #[error("component type '{0}' is already registered")]
    DuplicateComponentType(String),

    #[error("component type '{0}' is not registered and no binder is set")]
    UnknownComponentType(String),

    #[error("item not found: {0}")]
    ItemNotFound(String),

    #[error("item has been destroyed: {0}")]
    ItemDestroyed(String),

    #[error("invalid insertion target: {0}")]
    InvalidTarget(String),

    #[error("popout not found: {0}")]
    PopoutNotFound(usize),
}

/// Failures caused by the hosting environment rather than the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("popout blocked")]
    PopoutBlocked,

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("sub-window config '{0}' not found in storage")]
    MissingWindowConfig(String),

    #[error("window not found: {0}")]
    WindowNotFound(String),
}

/// Reached a branch for a tag value that should have been handled
/// exhaustively. Always a logic defect.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unreachable case {code}: {value}")]
pub struct UnreachableCase {
    pub code: &'static str,
    pub value: String,
}

impl UnreachableCase {
    pub fn new(code: &'static str, value: impl std::fmt::Debug) -> Self {
        Self {
            code,
            value: format!("{value:?}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DockError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Unreachable(#[from] UnreachableCase),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
