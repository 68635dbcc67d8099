use std::fmt;
use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

/// Broad class of a [`MapError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A tile-grid token is not a valid integer
    Parse,
    /// A file is missing or unreadable, or the document lacks a required element
    Load,
    /// The loaded data is internally inconsistent
    Logic,
}

/// Error type for map loading
#[derive(Debug)]
pub enum MapError {
    /// A CSV token in a layer's data block is not an integer
    InvalidTileToken {
        /// The offending token, trimmed
        token: String,
        /// Underlying integer parse error
        source: ParseIntError,
    },
    /// File I/O error
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
    /// The document could not be deserialized
    Xml(quick_xml::DeError),
    /// The document is not well-formed XML
    XmlSyntax(quick_xml::Error),
    /// The document has no `<map>` root element
    MissingRoot {
        /// Name of the root element that was found instead, if any
        found: Option<String>,
    },
    /// A `<layer>` has no `<data>` block
    MissingLayerData {
        /// Layer name
        layer: String,
    },
    /// A layer's data block uses an encoding other than CSV
    UnsupportedEncoding {
        /// Layer name
        layer: String,
        /// Encoding attribute as written in the document
        encoding: String,
    },
    /// A layer's tile count does not match its width * height
    InvalidLayerSize {
        /// Layer name
        layer: String,
        /// width * height
        expected: usize,
        /// Number of tiles parsed from the data block
        actual: usize,
    },
    /// The tileset image could not be decoded
    Image {
        /// Image path
        path: PathBuf,
        /// Decoder message
        message: String,
    },
    /// Tile size and tileset width do not describe a usable sheet
    InvalidTileset(String),
    /// Map configuration could not be parsed
    Config(serde_json::Error),
}

impl MapError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MapError::InvalidTileToken { .. } => ErrorKind::Parse,
            MapError::InvalidLayerSize { .. } => ErrorKind::Logic,
            MapError::Io { .. }
            | MapError::Xml(_)
            | MapError::XmlSyntax(_)
            | MapError::MissingRoot { .. }
            | MapError::MissingLayerData { .. }
            | MapError::UnsupportedEncoding { .. }
            | MapError::Image { .. }
            | MapError::InvalidTileset(_)
            | MapError::Config(_) => ErrorKind::Load,
        }
    }
}

impl From<quick_xml::DeError> for MapError {
    fn from(err: quick_xml::DeError) -> Self {
        MapError::Xml(err)
    }
}

impl From<quick_xml::Error> for MapError {
    fn from(err: quick_xml::Error) -> Self {
        MapError::XmlSyntax(err)
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        MapError::Config(err)
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::InvalidTileToken { token, source } => {
                write!(f, "Invalid tile id '{}': {}", token, source)
            }
            MapError::Io { path, source } => {
                write!(f, "I/O error reading {}: {}", path.display(), source)
            }
            MapError::Xml(e) => write!(f, "Failed to parse map document: {}", e),
            MapError::XmlSyntax(e) => write!(f, "Malformed XML in map document: {}", e),
            MapError::MissingRoot { found: Some(name) } => {
                write!(f, "Expected <map> root element, found <{}>", name)
            }
            MapError::MissingRoot { found: None } => {
                write!(f, "Map document has no root element")
            }
            MapError::MissingLayerData { layer } => {
                write!(f, "Layer '{}' has no <data> block", layer)
            }
            MapError::UnsupportedEncoding { layer, encoding } => write!(
                f,
                "Layer '{}' uses unsupported encoding '{}' (only csv is supported)",
                layer, encoding
            ),
            MapError::InvalidLayerSize {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "Invalid layer size for layer '{}': expected {} tiles, found {}",
                layer, expected, actual
            ),
            MapError::Image { path, message } => {
                write!(f, "Failed to decode tileset image {}: {}", path.display(), message)
            }
            MapError::InvalidTileset(msg) => write!(f, "Invalid tileset: {}", msg),
            MapError::Config(e) => write!(f, "Invalid map configuration: {}", e),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::InvalidTileToken { source, .. } => Some(source),
            MapError::Io { source, .. } => Some(source),
            MapError::Xml(e) => Some(e),
            MapError::XmlSyntax(e) => Some(e),
            MapError::Config(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_errors_into_taxonomy() {
        let parse = "x".parse::<i32>().unwrap_err();
        let err = MapError::InvalidTileToken {
            token: "x".into(),
            source: parse,
        };
        assert_eq!(err.kind(), ErrorKind::Parse);

        let err = MapError::InvalidLayerSize {
            layer: "walls".into(),
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.kind(), ErrorKind::Logic);
        assert!(err.to_string().contains("walls"));

        let err = MapError::MissingRoot { found: None };
        assert_eq!(err.kind(), ErrorKind::Load);
    }
}
