use thiserror::Error;

/// Why a match command was left unapplied.
///
/// Neither variant is fatal: the match state is untouched and the caller
/// may keep issuing commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The UI may race a roster reset against a queued command.
    #[error("Unknown robot id: {id}")]
    UnknownRobot { id: String },

    #[error("Tile ({col}, {row}) is outside the {grid_size}x{grid_size} field")]
    OutOfBounds { col: i32, row: i32, grid_size: u8 },
}

impl CommandError {
    /// A stale reference is expected traffic; an out-of-bounds move is a caller bug.
    pub fn is_stale_reference(&self) -> bool {
        matches!(self, CommandError::UnknownRobot { .. })
    }
}

/// Geometry query outside the grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Tile ({col}, {row}) is outside the {grid_size}x{grid_size} field")]
    OutOfBounds { col: i32, row: i32, grid_size: u8 },
}

impl From<FieldError> for CommandError {
    fn from(err: FieldError) -> Self {
        match err {
            FieldError::OutOfBounds { col, row, grid_size } => {
                CommandError::OutOfBounds { col, row, grid_size }
            }
        }
    }
}

/// Failure to read a shared-link rule payload.
#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Empty rule payload")]
    Empty,

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid rule JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_converts_to_command_error() {
        let err: CommandError = FieldError::OutOfBounds { col: 7, row: 0, grid_size: 6 }.into();
        assert_eq!(err, CommandError::OutOfBounds { col: 7, row: 0, grid_size: 6 });
        assert!(!err.is_stale_reference());
        assert_eq!(err.to_string(), "Tile (7, 0) is outside the 6x6 field");
    }

    #[test]
    fn test_unknown_robot_is_stale_reference() {
        let err = CommandError::UnknownRobot { id: "X9".to_string() };
        assert!(err.is_stale_reference());
    }
}
