use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::Recorder;

pub const DEFAULT_SCHEMA_NAME: &str = "argprobe.json";
pub const DEFAULT_PROGRAM_NAME: &str = "prog";

/// Declarative description of a command line, loaded from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Schema {
    #[serde(default)]
    pub program: Option<String>,

    #[serde(default)]
    pub options: Vec<OptionSchema>,

    /// Positional arguments, in the order they must appear.
    #[serde(default)]
    pub arguments: Vec<ArgumentSchema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionSchema {
    pub names: Vec<String>,

    /// Present for options that take a value; absent for flags.
    #[serde(default)]
    pub value_name: Option<String>,

    #[serde(default)]
    pub description: String,
}

impl OptionSchema {
    /// The first declared alias; used to label reported events.
    pub fn primary_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArgumentSchema {
    pub value_name: String,

    #[serde(default)]
    pub description: String,
}

impl Schema {
    /// Declare every option and argument on `parser`, recording each fired
    /// callback into `recorder`.
    pub fn declare<'a>(
        &self,
        parser: &mut cmdline::Parser<'a>,
        recorder: &'a Recorder,
    ) -> Result<()> {
        for opt in &self.options {
            let name = opt.primary_name().to_string();
            match &opt.value_name {
                None => {
                    parser
                        .flag(opt.names.clone(), opt.description.clone(), move || {
                            recorder.flag(&name)
                        })
                        .with_context(|| format!("failed to declare flag {:?}", opt.names))?;
                }
                Some(value_name) => {
                    parser
                        .value_option(
                            opt.names.clone(),
                            value_name.clone(),
                            opt.description.clone(),
                            move |value| recorder.value(&name, value),
                        )
                        .with_context(|| format!("failed to declare option {:?}", opt.names))?;
                }
            }
        }

        for arg in &self.arguments {
            let name = arg.value_name.clone();
            parser.positional(
                arg.value_name.clone(),
                arg.description.clone(),
                move |value| recorder.argument(&name, value),
            );
        }

        tracing::debug!(
            options = self.options.len(),
            arguments = self.arguments.len(),
            "declared schema"
        );
        Ok(())
    }

    /// Program name for usage text: explicit override, then schema, then default.
    pub fn program_name(&self, explicit: Option<&str>) -> String {
        explicit
            .or(self.program.as_deref())
            .unwrap_or(DEFAULT_PROGRAM_NAME)
            .to_string()
    }
}

#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub path: PathBuf,
    pub schema: Schema,
}

pub fn load_schema(schema_path: Option<&Path>) -> Result<Option<LoadedSchema>> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;

    let (path, explicit) = match schema_path {
        Some(p) => (resolve_against(&cwd, p), true),
        None => (cwd.join(DEFAULT_SCHEMA_NAME), false),
    };

    if !path.exists() {
        if explicit {
            bail!("schema not found: {}", path.display());
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read schema: {}", path.display()))?;
    let schema: Schema = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse schema JSON: {}", path.display()))?;

    Ok(Some(LoadedSchema { path, schema }))
}

/// Like [`load_schema`], but a missing default schema is an error.
pub fn require_schema(schema_path: Option<&Path>) -> Result<LoadedSchema> {
    match load_schema(schema_path)? {
        Some(loaded) => Ok(loaded),
        None => bail!("no schema found; pass --schema or create {DEFAULT_SCHEMA_NAME}"),
    }
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
