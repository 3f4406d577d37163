//! Run configuration.
//!
//! Values come from three layers, later ones winning: built-in defaults
//! (the legacy file names in the working directory), an optional TOML file,
//! and command-line flags. Relative paths in the TOML file are resolved
//! against the file's own directory.
//!
//! ```toml
//! [inputs]
//! steel = "steel_data.json"
//! beams = "beam_data.json"
//! counts = "beam_count.json"
//!
//! [output]
//! path = "output.csv"
//! format = "csv"
//!
//! [settings]
//! cutback-policy = "reject"
//! label-language = "english"
//! include-lengths = false
//! ```

use crate::cli::{InputArgs, OutputFormat, RunArgs};
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use takeoff_core::file_io::{self, InputPaths};
use takeoff_core::project::{CutbackPolicy, GlobalSettings, LabelLanguage, TakeoffProject};
use tracing::debug;

pub const DEFAULT_OUTPUT: &str = "output.csv";

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub inputs: FileInputs,
    #[serde(default)]
    pub output: FileOutput,
    #[serde(default)]
    pub settings: SettingsOverrides,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileInputs {
    pub project: Option<PathBuf>,
    pub steel: Option<PathBuf>,
    pub beams: Option<PathBuf>,
    pub counts: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileOutput {
    pub path: Option<PathBuf>,
    pub format: Option<OutputFormat>,
}

/// Partial settings; unset fields leave the base value alone.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SettingsOverrides {
    pub cutback_policy: Option<CutbackPolicy>,
    pub label_language: Option<LabelLanguage>,
    pub include_lengths: Option<bool>,
}

impl SettingsOverrides {
    /// Overlay `other` on top of `self`
    pub fn or(self, other: SettingsOverrides) -> SettingsOverrides {
        SettingsOverrides {
            cutback_policy: other.cutback_policy.or(self.cutback_policy),
            label_language: other.label_language.or(self.label_language),
            include_lengths: other.include_lengths.or(self.include_lengths),
        }
    }

    pub fn apply(&self, settings: &mut GlobalSettings) {
        if let Some(policy) = self.cutback_policy {
            settings.cutback_policy = policy;
        }
        if let Some(language) = self.label_language {
            settings.label_language = language;
        }
        if let Some(include) = self.include_lengths {
            settings.include_lengths = include;
        }
    }
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FileConfig = toml::from_str(&content).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        debug!("Loaded config file {}", path.display());
        Ok(config.rebase(base))
    }

    /// Resolve relative paths against `base`.
    fn rebase(mut self, base: &Path) -> Self {
        let join = |p: Option<PathBuf>| p.map(|p| if p.is_absolute() { p } else { base.join(p) });
        self.inputs.project = join(self.inputs.project);
        self.inputs.steel = join(self.inputs.steel);
        self.inputs.beams = join(self.inputs.beams);
        self.inputs.counts = join(self.inputs.counts);
        self.output.path = join(self.output.path);
        self
    }
}

/// Resolved origin of the takeoff inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Files(InputPaths),
    Bundle(PathBuf),
}

impl InputSource {
    /// Load the project the source describes.
    pub fn load(&self) -> Result<TakeoffProject> {
        let project = match self {
            InputSource::Files(paths) => file_io::load_inputs(paths)?,
            InputSource::Bundle(path) => file_io::load_project(path)?,
        };
        Ok(project)
    }
}

/// Inputs plus any settings the config file carries.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInputs {
    pub source: InputSource,
    pub file: FileConfig,
}

impl ResolvedInputs {
    pub fn from_args(args: &InputArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let bundle = args.project.clone().or_else(|| file.inputs.project.clone());
        let any_file_flag = args.steel.is_some() || args.beams.is_some() || args.counts.is_some();

        let source = match bundle {
            Some(path) if !any_file_flag => InputSource::Bundle(path),
            _ => {
                let defaults = InputPaths::default();
                InputSource::Files(InputPaths {
                    steel: args.steel.clone().or_else(|| file.inputs.steel.clone()).unwrap_or(defaults.steel),
                    beams: args.beams.clone().or_else(|| file.inputs.beams.clone()).unwrap_or(defaults.beams),
                    counts: args.counts.clone().or_else(|| file.inputs.counts.clone()).unwrap_or(defaults.counts),
                })
            }
        };

        Ok(ResolvedInputs { source, file })
    }

    /// Load the project and overlay config-file settings.
    pub fn load_project(&self) -> Result<TakeoffProject> {
        let mut project = self.source.load()?;
        self.file.settings.apply(&mut project.settings);
        Ok(project)
    }
}

/// Everything the `run` command needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub inputs: ResolvedInputs,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub overrides: SettingsOverrides,
}

impl RunConfig {
    pub fn from_args(args: &RunArgs) -> Result<Self> {
        let inputs = ResolvedInputs::from_args(&args.inputs)?;

        let output = args
            .output
            .clone()
            .or_else(|| inputs.file.output.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let format = args
            .format
            .or(inputs.file.output.format)
            .unwrap_or_else(|| infer_format(&output));

        let flags = SettingsOverrides {
            cutback_policy: args.cutback_policy.map(Into::into),
            label_language: args.labels.map(Into::into),
            include_lengths: args.include_lengths,
        };
        let overrides = inputs.file.settings.or(flags);

        if output.as_os_str().is_empty() {
            return Err(CliError::Config("output path is empty".to_string()));
        }

        Ok(RunConfig {
            inputs,
            output,
            format,
            overrides,
        })
    }

    /// Load the project with every settings layer applied.
    pub fn load_project(&self) -> Result<TakeoffProject> {
        let mut project = self.inputs.source.load()?;
        self.overrides.apply(&mut project.settings);
        Ok(project)
    }
}

fn infer_format(path: &Path) -> OutputFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
        _ => OutputFormat::Csv,
    }
}
