//! Mapping of user-supplied content and topic names onto file-name keys.
//!
//! Keys are percent-encoded so they never contain a path separator, and `_`
//! is encoded as well so it can act as the `<content>_<topic>` separator.

use crate::error::{Result, StudyError};

/// Separator between the content and topic parts of a key
pub const KEY_SEPARATOR: char = '_';

/// Encode a name for use as (part of) a file name.
pub fn storage_key(name: &str) -> String {
    urlencoding::encode(name).replace(KEY_SEPARATOR, "%5F")
}

/// Key of a topic-level artifact: `<content>_<topic>`
pub fn topic_key(content: &str, topic: &str) -> String {
    format!("{}{}{}", storage_key(content), KEY_SEPARATOR, storage_key(topic))
}

/// Prefix shared by every topic-level artifact of a content
pub fn topic_prefix(content: &str) -> String {
    format!("{}{}", storage_key(content), KEY_SEPARATOR)
}

/// Trim a user-supplied name and reject empty ones
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StudyError::InvalidName(name.to_string()));
    }
    Ok(trimmed.to_string())
}
