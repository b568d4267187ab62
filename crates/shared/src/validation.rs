use crate::constants::*;

pub fn validate_server_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Server name is required".into());
    }
    if trimmed.len() > MAX_SERVER_NAME_LENGTH {
        return Err(format!(
            "Server name must be at most {} characters",
            MAX_SERVER_NAME_LENGTH
        ));
    }
    Ok(())
}

/// Provider uids end up verbatim in the session cookie, so only a
/// conservative character set is accepted.
pub fn validate_uid(uid: &str) -> Result<(), String> {
    if uid.is_empty() {
        return Err("uid is required".into());
    }
    if uid.len() > MAX_UID_LENGTH {
        return Err("uid is too long".into());
    }
    if !uid
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err("uid can only contain letters, numbers, hyphens, and underscores".into());
    }
    Ok(())
}

pub fn validate_channel_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Channel name is required".into());
    }
    if trimmed.len() > MAX_CHANNEL_NAME_LENGTH {
        return Err(format!(
            "Channel name must be at most {} characters",
            MAX_CHANNEL_NAME_LENGTH
        ));
    }
    if is_default_channel_name(trimmed) {
        return Err(format!("Name cannot be '{}'", DEFAULT_CHANNEL_NAME.to_lowercase()));
    }
    Ok(())
}

pub fn is_default_channel_name(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(DEFAULT_CHANNEL_NAME)
}

pub fn validate_message_content(content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Content missing".into());
    }
    if content.len() > MAX_MESSAGE_LENGTH {
        return Err("Message too long".into());
    }
    Ok(())
}

/// Image and attachment links must be absolute http(s) URLs or bare file names
/// produced by the upload service (e.g. `img.png`).
pub fn validate_file_url(value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("File URL is required".into());
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err("File URL too long".into());
    }
    match url::Url::parse(trimmed) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => Ok(()),
        Ok(_) => Err("File URL must use http or https".into()),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            if trimmed.chars().any(char::is_whitespace) {
                Err("File URL is invalid".into())
            } else {
                Ok(())
            }
        }
        Err(_) => Err("File URL is invalid".into()),
    }
}
