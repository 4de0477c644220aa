/// Reason a string cannot be used as a single path segment.
#[derive(Debug, PartialEq, Eq)]
pub enum SegmentError {
    /// Empty or whitespace-only.
    Empty,
    /// Contains `/` or `\`.
    ContainsPathSeparator,
    /// Is exactly `..`.
    PathTraversal,
    NullByte,
    /// Starts with a dot.
    Hidden,
    /// Contains control characters (CR, LF, etc.).
    ControlCharacter,
}

impl SegmentError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "must not be empty",
            Self::ContainsPathSeparator => "path separators are not allowed",
            Self::PathTraversal => "'..' is not allowed",
            Self::NullByte => "null bytes are not allowed",
            Self::Hidden => "must not start with '.'",
            Self::ControlCharacter => "control characters are not allowed",
        }
    }
}

/// Validates that `segment` names exactly one directory entry.
///
/// Returns the trimmed segment.
pub fn validate_flat_filename(segment: &str) -> Result<&str, SegmentError> {
    let trimmed = segment.trim();

    if trimmed.is_empty() {
        return Err(SegmentError::Empty);
    }

    if trimmed.contains('\0') {
        return Err(SegmentError::NullByte);
    }

    if trimmed.chars().any(char::is_control) {
        return Err(SegmentError::ControlCharacter);
    }

    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(SegmentError::ContainsPathSeparator);
    }

    if trimmed == ".." {
        return Err(SegmentError::PathTraversal);
    }

    if trimmed.starts_with('.') {
        return Err(SegmentError::Hidden);
    }

    Ok(trimmed)
}
