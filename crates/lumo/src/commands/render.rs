//! `lumo render` command implementation.
//!
//! Batch-renders standalone diagram files to SVG through the diagram view
//! and a Kroki backend. Rendering is parallel with partial-failure
//! semantics: a diagram that fails to render is reported and skipped while
//! the rest still land on disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::info;

use lumo_config::{CliSettings, Config};
use lumo_diagrams::{
    DiagramLanguage, DiagramView, HtmlSlot, KrokiBackend, apply_mermaid_theme,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Diagram files to render (language detected from the extension).
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Directory to write SVG files into.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Path to configuration file (default: auto-discover lumo.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Kroki server URL for diagram rendering (overrides config).
    #[arg(long)]
    kroki_url: Option<String>,

    /// HTTP timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,

    /// Force a diagram language for all files (e.g. "mermaid").
    #[arg(short, long)]
    language: Option<String>,

    /// Enable verbose output (show per-diagram timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

/// One diagram file prepared for rendering.
struct RenderJob {
    file: PathBuf,
    language: DiagramLanguage,
    source: String,
    out_path: PathBuf,
}

/// Parameters identifying a rendered artifact on disk.
///
/// Output filenames are content-addressed: same source, language, and format
/// produce the same name, so re-running the command is a no-op for diagrams
/// that have not changed.
struct ArtifactKey<'a> {
    source: &'a str,
    endpoint: &'a str,
}

impl ArtifactKey<'_> {
    /// SHA-256 of `"{endpoint}:svg:{source}"`, hex-encoded.
    fn compute_hash(&self) -> String {
        let content = format!("{}:svg:{}", self.endpoint, self.source);
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a file cannot be prepared,
    /// or any diagram fails to render (after all others have completed).
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            kroki_url: self.kroki_url.clone(),
            timeout_secs: self.timeout,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let Some(kroki_url) = config.diagrams_resolved.kroki_url.clone() else {
            return Err(CliError::Validation(
                "diagram rendering requires diagrams.kroki_url in lumo.toml or --kroki-url"
                    .to_owned(),
            ));
        };
        let backend = KrokiBackend::new(kroki_url)
            .timeout(Duration::from_secs(config.diagrams_resolved.timeout_secs));

        let forced_language = self
            .language
            .as_deref()
            .map(|name| {
                DiagramLanguage::parse(name).ok_or_else(|| {
                    CliError::Validation(format!("unknown diagram language '{name}'"))
                })
            })
            .transpose()?;

        std::fs::create_dir_all(&self.out_dir)?;

        let mut jobs = Vec::with_capacity(self.files.len());
        let mut up_to_date = 0usize;
        for file in &self.files {
            match prepare_job(
                file,
                forced_language,
                config.diagrams_resolved.mermaid_theme.as_deref(),
                &self.out_dir,
            )? {
                Some(job) => jobs.push(job),
                None => {
                    up_to_date += 1;
                    output.info(&format!("up to date: {}", file.display()));
                }
            }
        }

        // One view per diagram; the cloned backends share the HTTP agent.
        let results: Vec<Result<PathBuf, (PathBuf, String)>> = jobs
            .par_iter()
            .map(|job| {
                let rendered = render_job(backend.clone(), job)
                    .map_err(|e| (job.file.clone(), e.to_string()))?;
                std::fs::write(&job.out_path, rendered)
                    .map_err(|e| (job.file.clone(), e.to_string()))?;
                info!(file = %job.file.display(), out = %job.out_path.display(), "diagram rendered");
                Ok(job.out_path.clone())
            })
            .collect();

        let mut failed = 0usize;
        for result in results {
            match result {
                Ok(out_path) => output.success(&format!("rendered {}", out_path.display())),
                Err((file, message)) => {
                    failed += 1;
                    output.error(&format!("failed {}: {message}", file.display()));
                }
            }
        }

        let rendered = jobs.len() - failed;
        output.info(&format!(
            "{rendered} rendered, {up_to_date} up to date, {failed} failed"
        ));

        if failed > 0 {
            return Err(CliError::Render(format!(
                "{failed} diagram(s) failed to render"
            )));
        }
        Ok(())
    }
}

/// Read and prepare one diagram file.
///
/// Returns `Ok(None)` when the content-addressed output already exists.
fn prepare_job(
    file: &Path,
    forced_language: Option<DiagramLanguage>,
    mermaid_theme: Option<&str>,
    out_dir: &Path,
) -> Result<Option<RenderJob>, CliError> {
    let language = match forced_language {
        Some(language) => language,
        None => detect_language(file)?,
    };

    let raw = std::fs::read_to_string(file)?;
    let source = match (language, mermaid_theme) {
        (DiagramLanguage::Mermaid, Some(theme)) => apply_mermaid_theme(&raw, theme),
        _ => raw,
    };

    let key = ArtifactKey {
        source: &source,
        endpoint: language.kroki_endpoint(),
    };
    let hash = &key.compute_hash()[..12];
    let stem = file
        .file_stem()
        .map_or_else(|| "diagram".to_owned(), |s| s.to_string_lossy().into_owned());
    let out_path = out_dir.join(format!("{stem}-{hash}.svg"));

    if out_path.exists() {
        return Ok(None);
    }

    Ok(Some(RenderJob {
        file: file.to_path_buf(),
        language,
        source,
        out_path,
    }))
}

/// Determine the diagram language from a file extension.
fn detect_language(file: &Path) -> Result<DiagramLanguage, CliError> {
    file.extension()
        .and_then(|ext| ext.to_str())
        .and_then(DiagramLanguage::from_extension)
        .ok_or_else(|| {
            CliError::Validation(format!(
                "cannot determine diagram language for {} (use --language)",
                file.display()
            ))
        })
}

/// Render one job through the view lifecycle, returning the SVG markup.
fn render_job(backend: KrokiBackend, job: &RenderJob) -> Result<String, CliError> {
    let mut view = DiagramView::new(backend, job.language);
    view.attach(HtmlSlot::new())?;
    view.render(&job.source)?;

    let markup = view
        .target()
        .and_then(HtmlSlot::markup)
        .map(str::to_owned)
        .ok_or_else(|| CliError::Render("renderer produced no artifact".to_owned()))?;
    view.detach();
    Ok(markup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_artifact_key_is_content_addressed() {
        let a = ArtifactKey {
            source: "graph TD\n  A --> B",
            endpoint: "mermaid",
        };
        let b = ArtifactKey {
            source: "graph TD\n  A --> B",
            endpoint: "mermaid",
        };
        let c = ArtifactKey {
            source: "graph TD\n  A --> C",
            endpoint: "mermaid",
        };

        assert_eq!(a.compute_hash(), b.compute_hash());
        assert_ne!(a.compute_hash(), c.compute_hash());
        assert_eq!(a.compute_hash().len(), 64);
    }

    #[test]
    fn test_artifact_key_endpoint_matters() {
        let mermaid = ArtifactKey {
            source: "source",
            endpoint: "mermaid",
        };
        let plantuml = ArtifactKey {
            source: "source",
            endpoint: "plantuml",
        };
        assert_ne!(mermaid.compute_hash(), plantuml.compute_hash());
    }

    #[test]
    fn test_detect_language_from_extension() {
        let language = detect_language(Path::new("flow.mmd")).unwrap();
        assert_eq!(language, DiagramLanguage::Mermaid);
    }

    #[test]
    fn test_detect_language_unknown_extension() {
        let err = detect_language(Path::new("notes.txt")).unwrap_err();
        assert!(err.to_string().contains("notes.txt"));
        assert!(err.to_string().contains("--language"));
    }

    #[test]
    fn test_prepare_job_themes_mermaid_source() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("flow.mmd");
        std::fs::write(&file, "graph TD\n  A --> B").unwrap();

        let job = prepare_job(&file, None, Some("dark"), dir.path())
            .unwrap()
            .unwrap();

        assert!(job.source.starts_with("%%{init:"));
        assert_eq!(job.language, DiagramLanguage::Mermaid);
    }

    #[test]
    fn test_prepare_job_skips_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("flow.mmd");
        std::fs::write(&file, "graph TD\n  A --> B").unwrap();

        let job = prepare_job(&file, None, None, dir.path()).unwrap().unwrap();
        std::fs::write(&job.out_path, "<svg/>").unwrap();

        // Second preparation sees the artifact and short-circuits
        assert!(prepare_job(&file, None, None, dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_prepare_job_output_name_has_stem_and_hash() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("flow.mmd");
        std::fs::write(&file, "graph TD").unwrap();

        let job = prepare_job(&file, None, None, dir.path()).unwrap().unwrap();
        let name = job.out_path.file_name().unwrap().to_string_lossy();

        assert!(name.starts_with("flow-"));
        assert!(name.ends_with(".svg"));
        // stem + '-' + 12 hash chars + ".svg"
        assert_eq!(name.len(), "flow-".len() + 12 + ".svg".len());
    }
}
