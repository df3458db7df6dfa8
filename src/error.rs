use std::path::PathBuf;

/// Errors produced by board construction, placement and lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board dimensions must be positive (got {height}x{width})")]
    InvalidDimensions { height: usize, width: usize },

    #[error("the empty cell cannot be placed as a piece")]
    InvalidPlayer,

    #[error("column {column} is full or out of range")]
    InvalidMove { column: usize },

    #[error("cell ({row}, {col}) is outside the board")]
    OutOfBounds { row: usize, col: usize },

    #[error("piece at ({row}, {col}) is floating above an empty cell")]
    Floating { row: usize, col: usize },

    #[error("failed to parse board: {0}")]
    Parse(String),
}

/// Errors returned by the minimax search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("placing into column {column} failed during search: {source}")]
    Placement {
        column: usize,
        #[source]
        source: BoardError,
    },

    #[error("board passed to search holds a preview marker at ({row}, {col})")]
    PreviewCell { row: usize, col: usize },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_error_display() {
        let err = BoardError::InvalidMove { column: 9 };
        assert_eq!(err.to_string(), "column 9 is full or out of range");
    }

    #[test]
    fn test_search_error_display() {
        let err = SearchError::Placement {
            column: 2,
            source: BoardError::InvalidMove { column: 2 },
        };
        assert_eq!(
            err.to_string(),
            "placing into column 2 failed during search: column 2 is full or out of range"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("search.depth must be > 0".to_string());
        assert_eq!(
            err.to_string(),
            "config validation error: search.depth must be > 0"
        );
    }
}
