//! Supported diagram languages.

/// Diagram description languages lumo can send to a Kroki service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramLanguage {
    Mermaid,
    PlantUml,
    GraphViz,
    Ditaa,
    Svgbob,
    WaveDrom,
}

impl DiagramLanguage {
    /// Parse a language from a code-fence name.
    ///
    /// Returns `None` for languages lumo does not render as diagrams.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "mermaid" => Some(Self::Mermaid),
            "plantuml" => Some(Self::PlantUml),
            "graphviz" | "dot" => Some(Self::GraphViz),
            "ditaa" => Some(Self::Ditaa),
            "svgbob" => Some(Self::Svgbob),
            "wavedrom" => Some(Self::WaveDrom),
            _ => None,
        }
    }

    /// Detect a language from a file extension (without the dot).
    ///
    /// Used by the CLI to pick the renderer for standalone diagram files.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "mmd" | "mermaid" => Some(Self::Mermaid),
            "puml" | "plantuml" => Some(Self::PlantUml),
            "dot" | "gv" => Some(Self::GraphViz),
            "ditaa" => Some(Self::Ditaa),
            "bob" | "svgbob" => Some(Self::Svgbob),
            "wavedrom" => Some(Self::WaveDrom),
            _ => None,
        }
    }

    /// Kroki endpoint name for this language.
    #[must_use]
    pub fn kroki_endpoint(self) -> &'static str {
        match self {
            Self::Mermaid => "mermaid",
            Self::PlantUml => "plantuml",
            Self::GraphViz => "graphviz",
            Self::Ditaa => "ditaa",
            Self::Svgbob => "svgbob",
            Self::WaveDrom => "wavedrom",
        }
    }
}
