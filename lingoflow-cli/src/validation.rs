use std::path::Path;

use lingoflow::lang::AUTO;
use unic_langid::LanguageIdentifier;

/// Validate file path exists and is readable
pub fn validate_file_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(format!("File does not exist: {}", path));
    }

    if !path_obj.is_file() {
        return Err(format!("Path is not a file: {}", path));
    }

    Ok(())
}

/// Validate output directory exists or can be created
pub fn validate_output_path(path: &str) -> Result<(), String> {
    let path_obj = Path::new(path);

    if path_obj.is_dir() {
        return Err(format!("Output path is a directory: {}", path));
    }

    if let Some(parent) = path_obj.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                return Err(format!("Cannot create output directory: {}", e));
            }
        }
    }

    Ok(())
}

/// Validate a BCP 47 language code. `pt_BR` style underscores are accepted.
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    let trimmed = lang.trim();
    if trimmed.is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    match trimmed.replace('_', "-").parse::<LanguageIdentifier>() {
        Ok(_) => Ok(()),
        Err(_) => Err(format!(
            "Invalid language code format: {}. Expected valid BCP 47 language identifier",
            lang
        )),
    }
}

/// Like [`validate_language_code`], but also accepts `auto`.
pub fn validate_source_language(lang: &str) -> Result<(), String> {
    if lang.trim().eq_ignore_ascii_case(AUTO) {
        return Ok(());
    }
    validate_language_code(lang)
}

/// Validate the keys passed to `retranslate`.
pub fn validate_keys(keys: &[String]) -> Result<(), String> {
    if keys.is_empty() {
        return Err("At least one key is required".to_string());
    }
    if let Some(blank) = keys.iter().position(|k| k.trim().is_empty()) {
        return Err(format!("Key #{} is empty", blank + 1));
    }
    Ok(())
}
