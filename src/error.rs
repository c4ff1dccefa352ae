//! Error types for resolution and theme loading.

use std::path::PathBuf;

/// Boxed error returned by fallible token functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the resolution pipeline.
pub type Result<T, E = StylingError> = std::result::Result<T, E>;

/// Where a settings object came from, for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSource {
    /// A literal settings object declared on the definition.
    Literal,
    /// A named entry in the theme's settings namespace.
    ThemeKey(String),
    /// The return value of a theme function.
    ThemeFunction,
}

impl std::fmt::Display for LayerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerSource::Literal => write!(f, "literal"),
            LayerSource::ThemeKey(key) => write!(f, "theme key '{}'", key),
            LayerSource::ThemeFunction => write!(f, "theme function"),
        }
    }
}

/// What referenced an undeclared slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotReference {
    /// A settings layer at the given position in the stack.
    Settings { layer: usize },
    /// A token definition, i.e. the input bound to the slot's style factory.
    Tokens,
}

impl std::fmt::Display for SlotReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotReference::Settings { layer } => write!(f, "settings layer {}", layer),
            SlotReference::Tokens => write!(f, "token definitions"),
        }
    }
}

/// Fatal configuration errors surfaced while resolving a definition.
#[derive(Debug, thiserror::Error)]
pub enum StylingError {
    /// A settings layer did not produce an object.
    #[error("settings layer {index} ({source_kind}) produced {found}, expected an object")]
    InvalidLayer {
        index: usize,
        source_kind: LayerSource,
        found: &'static str,
    },

    /// A slot entry inside a settings object was not an object.
    #[error("settings layer {index} gives slot '{slot}' {found}, expected an object")]
    MalformedSlot {
        index: usize,
        slot: String,
        found: &'static str,
    },

    /// Settings or tokens were attached to a slot the definition never declared.
    #[error("{reference} references undeclared slot '{slot}'")]
    UnknownSlot {
        slot: String,
        reference: SlotReference,
    },

    /// A slot was declared under a name reserved for settings.
    #[error("slot name '{slot}' is reserved for settings-provided tokens")]
    ReservedSlot { slot: String },

    /// A token function failed when evaluated against the theme.
    #[error("token '{token}' of slot '{slot}' failed to resolve: {source}")]
    TokenFunction {
        slot: String,
        token: String,
        #[source]
        source: BoxError,
    },
}

/// Errors raised while loading a theme from a configuration source.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    /// The theme file could not be read.
    #[error("failed to read theme \"{}\": {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not name a supported format.
    #[error("unsupported theme format \"{}\" (expected .yaml, .yml or .json)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// YAML content failed to parse.
    #[error("invalid YAML theme: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON content failed to parse.
    #[error("invalid JSON theme: {0}")]
    Json(#[from] serde_json::Error),

    /// A settings entry in the theme was not an object.
    #[error("theme settings '{name}' must be an object, found {found}")]
    InvalidSettings { name: String, found: &'static str },
}

/// Short name of a JSON value's type, used in error messages.
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_layer_display() {
        let err = StylingError::InvalidLayer {
            index: 2,
            source_kind: LayerSource::ThemeFunction,
            found: kind_of(&json!(3)),
        };
        let msg = err.to_string();
        assert!(msg.contains("layer 2"));
        assert!(msg.contains("theme function"));
        assert!(msg.contains("a number"));
    }

    #[test]
    fn test_unknown_slot_display() {
        let err = StylingError::UnknownSlot {
            slot: "icon".to_string(),
            reference: SlotReference::Settings { layer: 0 },
        };
        assert_eq!(
            err.to_string(),
            "settings layer 0 references undeclared slot 'icon'"
        );
    }

    #[test]
    fn test_reserved_slot_display() {
        let err = StylingError::ReservedSlot {
            slot: "tokens".to_string(),
        };
        assert!(err.to_string().contains("'tokens' is reserved"));
    }

    #[test]
    fn test_token_function_keeps_source() {
        let err = StylingError::TokenFunction {
            slot: "root".to_string(),
            token: "color".to_string(),
            source: "ramp missing".into(),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("ramp missing"));
    }
}
