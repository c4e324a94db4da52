use std::path::Path;

use lingoflow::{
    Document, TranslationParams, Translator,
    config::Settings,
    formats::{read_document, write_document},
    lang::AUTO,
    missing_keys,
};
use lingoflow_cli::{
    session::{
        build_translator, is_language_pattern, load_settings, localized_path, read_prompt_file,
    },
    validation::{
        validate_file_path, validate_keys, validate_language_code, validate_output_path,
        validate_source_language,
    },
};
use tracing::info;

#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// A file, or a `{lang}` pattern for every language of the project.
    pub input: String,
    pub output: Option<String>,
    pub target_lang: Option<String>,
    pub source_lang: Option<String>,
    pub ui_safe: bool,
    pub only_missing: bool,
    pub no_batch: bool,
    pub prompt_file: Option<String>,
    pub config: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RetranslateOptions {
    pub input: String,
    pub output: String,
    pub target_lang: String,
    pub source_lang: Option<String>,
    pub keys: Vec<String>,
    pub ui_safe: bool,
    pub no_batch: bool,
    pub config: Option<String>,
}

/// One source file translated into one output file.
struct FileJob<'a> {
    input: &'a str,
    output: &'a str,
    params: TranslationParams,
    only_missing: bool,
    no_batch: bool,
}

fn read_existing_target(path: &str) -> Result<Document, String> {
    if Path::new(path).exists() {
        read_document(path).map_err(|e| format!("Error reading {}: {}", path, e))
    } else {
        Ok(Document::empty_map())
    }
}

fn source_language(opts_source: Option<&String>, settings: &Settings) -> String {
    opts_source
        .cloned()
        .unwrap_or_else(|| settings.source_language())
}

pub async fn run_translate_command(opts: TranslateOptions) -> Result<(), String> {
    if let Some(target) = &opts.target_lang {
        validate_language_code(target)?;
    }
    if let Some(source) = &opts.source_lang {
        validate_source_language(source)?;
    }

    if is_language_pattern(&opts.input) {
        return translate_project(opts).await;
    }

    let output = opts
        .output
        .as_deref()
        .ok_or("--output is required unless the input path contains {lang}")?;
    let target_lang = opts
        .target_lang
        .as_deref()
        .ok_or("--target is required unless the input path contains {lang}")?;
    validate_file_path(&opts.input)?;
    validate_output_path(output)?;

    let settings = load_settings(opts.config.as_deref())?;
    let prompt = opts.prompt_file.as_deref().map(read_prompt_file).transpose()?;
    let translator = build_translator(&settings, prompt)?;

    let source_lang = source_language(opts.source_lang.as_ref(), &settings);
    let job = FileJob {
        input: &opts.input,
        output,
        params: TranslationParams::new(source_lang, target_lang).with_ui_safe(opts.ui_safe),
        only_missing: opts.only_missing,
        no_batch: opts.no_batch,
    };
    translate_file(&translator, job).await
}

/// Translates `{lang}` pattern files into every configured target language,
/// or only into `--target` when it is one of them.
async fn translate_project(opts: TranslateOptions) -> Result<(), String> {
    let settings = load_settings(opts.config.as_deref())?;
    let source_lang = source_language(opts.source_lang.as_ref(), &settings);
    if source_lang.eq_ignore_ascii_case(AUTO) {
        return Err("A source language is required to resolve {lang} paths".to_string());
    }

    let targets = settings
        .select_target_languages(opts.target_lang.as_deref())
        .map_err(|e| e.to_string())?;
    let output_pattern = opts.output.as_deref().unwrap_or(&opts.input);
    if targets.len() > 1 && !is_language_pattern(output_pattern) {
        return Err(format!(
            "Output path must contain {{lang}} when translating {} languages",
            targets.len()
        ));
    }

    let input = localized_path(&opts.input, &source_lang);
    validate_file_path(&input)?;
    let outputs: Vec<String> = targets
        .iter()
        .map(|lang| localized_path(output_pattern, lang))
        .collect();
    for output in &outputs {
        validate_output_path(output)?;
    }

    let prompt = opts.prompt_file.as_deref().map(read_prompt_file).transpose()?;
    let translator = build_translator(&settings, prompt)?;
    info!(source = %source_lang, targets = targets.len(), "translating project");

    for (target_lang, output) in targets.iter().zip(&outputs) {
        let job = FileJob {
            input: &input,
            output,
            params: TranslationParams::new(source_lang.as_str(), target_lang.as_str())
                .with_ui_safe(opts.ui_safe),
            only_missing: opts.only_missing,
            no_batch: opts.no_batch,
        };
        translate_file(&translator, job).await?;
    }
    Ok(())
}

async fn translate_file(translator: &Translator, job: FileJob<'_>) -> Result<(), String> {
    let FileJob {
        input,
        output,
        params,
        only_missing,
        no_batch,
    } = job;
    let source = read_document(input).map_err(|e| format!("Error reading {}: {}", input, e))?;

    let translated = if only_missing && Path::new(output).exists() {
        let target = read_existing_target(output)?;
        let keys = missing_keys(&source, &target);
        if keys.is_empty() {
            println!("✅ {} is up to date", output);
            return Ok(());
        }
        info!(keys = keys.len(), "translating missing keys");
        let result = if no_batch {
            translator
                .translate_missing_keys(&source, &target, &keys, &params)
                .await
        } else {
            translator
                .translate_missing_keys_batch(&source, &target, &keys, &params)
                .await
        }
        .map_err(|e| e.to_string())?;
        println!("Translated {} missing keys", keys.len());
        result
    } else if no_batch {
        translator
            .translate_document_sequential(&source, &params)
            .await
            .map_err(|e| e.to_string())?
    } else {
        translator
            .translate_document(&source, &params)
            .await
            .map_err(|e| e.to_string())?
    };

    write_document(output, &translated).map_err(|e| format!("Error writing {}: {}", output, e))?;
    println!("✅ Wrote {} ({})", output, params.target_lang);
    Ok(())
}

pub async fn run_retranslate_command(opts: RetranslateOptions) -> Result<(), String> {
    validate_file_path(&opts.input)?;
    validate_output_path(&opts.output)?;
    validate_language_code(&opts.target_lang)?;
    validate_keys(&opts.keys)?;
    if let Some(source) = &opts.source_lang {
        validate_source_language(source)?;
    }

    let settings = load_settings(opts.config.as_deref())?;
    let translator = build_translator(&settings, None)?;
    let source_lang = source_language(opts.source_lang.as_ref(), &settings);
    let params = TranslationParams::new(source_lang, opts.target_lang.clone())
        .with_ui_safe(opts.ui_safe);

    let source = read_document(&opts.input)
        .map_err(|e| format!("Error reading {}: {}", opts.input, e))?;
    let target = read_existing_target(&opts.output)?;

    let result = if opts.no_batch {
        translator
            .translate_outdated_keys(&source, &target, &opts.keys, &params)
            .await
    } else {
        translator
            .translate_outdated_keys_batch(&source, &target, &opts.keys, &params)
            .await
    }
    .map_err(|e| e.to_string())?;

    write_document(&opts.output, &result)
        .map_err(|e| format!("Error writing {}: {}", opts.output, e))?;
    println!("✅ Re-translated {} keys into {}", opts.keys.len(), opts.output);
    Ok(())
}
