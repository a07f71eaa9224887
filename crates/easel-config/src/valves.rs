use serde::Deserialize;

/// Administrator valves
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Valves {
    /// Logging verbosity
    #[serde(default)]
    pub log_level: LogLevel,
    /// Preferred emission method; tried before everything in `emission_priority`
    #[serde(default)]
    pub emission_method: Option<EmissionMethod>,
    /// Order in which emission methods are tried
    #[serde(default = "default_emission_priority")]
    pub emission_priority: Vec<EmissionMethod>,
    /// Largest local file converted to base64, in megabytes
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    /// File extensions accepted for base64 conversion
    #[serde(default = "default_supported_formats")]
    pub supported_formats: Vec<String>,
}

impl Default for Valves {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            emission_method: None,
            emission_priority: default_emission_priority(),
            max_file_size_mb: default_max_file_size_mb(),
            supported_formats: default_supported_formats(),
        }
    }
}

impl Valves {
    /// Emission methods in the order they should be attempted
    ///
    /// The preferred method (if any) comes first, followed by the
    /// configured priority list with duplicates removed.
    pub fn emission_order(&self) -> Vec<EmissionMethod> {
        let mut order = Vec::with_capacity(self.emission_priority.len() + 1);

        for method in self.emission_method.iter().chain(&self.emission_priority) {
            if !order.contains(method) {
                order.push(*method);
            }
        }

        order
    }

    /// Maximum file size in bytes
    pub const fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Whether a file extension (without the dot) is accepted
    pub fn supports_extension(&self, extension: &str) -> bool {
        self.supported_formats
            .iter()
            .any(|format| format.trim().eq_ignore_ascii_case(extension))
    }
}

/// Per-user valves
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserValves {
    /// Report progress to the client while generating
    #[serde(default = "default_true")]
    pub show_processing_status: bool,
    /// Derive alt text from the prompt
    #[serde(default = "default_true")]
    pub auto_alt_text: bool,
}

impl Default for UserValves {
    fn default() -> Self {
        Self {
            show_processing_status: true,
            auto_alt_text: true,
        }
    }
}

/// Logging verbosity valve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Warnings and errors only
    #[default]
    Warn,
    /// Progress of each invocation
    Info,
    /// Everything, including full backend responses
    Debug,
}

impl LogLevel {
    /// Filter directive for `tracing-subscriber`
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

/// Output representation for a generated image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionMethod {
    /// Raw reference string
    Direct,
    /// `![alt](reference)`
    Markdown,
    /// `<img>` tag
    Html,
}

impl EmissionMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Markdown => "markdown",
            Self::Html => "html",
        }
    }
}

impl std::fmt::Display for EmissionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_emission_priority() -> Vec<EmissionMethod> {
    vec![EmissionMethod::Direct, EmissionMethod::Markdown, EmissionMethod::Html]
}

const fn default_max_file_size_mb() -> u64 {
    10
}

fn default_supported_formats() -> Vec<String> {
    ["png", "jpg", "jpeg", "webp", "gif", "bmp", "tiff"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

const fn default_true() -> bool {
    true
}
