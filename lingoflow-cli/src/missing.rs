use lingoflow::{formats::read_document, missing_keys};
use lingoflow_cli::validation::validate_file_path;

/// Prints the keys of `source` that have no translation in `target`, one per
/// line. A target file that does not exist yet counts as empty.
pub fn run_missing_command(source: &str, target: &str) -> Result<(), String> {
    validate_file_path(source)?;
    let source_doc = read_document(source).map_err(|e| format!("Error reading {}: {}", source, e))?;
    let target_doc = if std::path::Path::new(target).exists() {
        read_document(target).map_err(|e| format!("Error reading {}: {}", target, e))?
    } else {
        lingoflow::Document::empty_map()
    };

    let keys = missing_keys(&source_doc, &target_doc);
    if keys.is_empty() {
        eprintln!("No missing keys");
        return Ok(());
    }
    for key in &keys {
        println!("{}", key);
    }
    eprintln!("{} missing keys", keys.len());
    Ok(())
}
