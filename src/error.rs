use std::fmt;

/// Failures the fill pipeline can produce. All of them are contained to the
/// container being processed; none abort the overall scan.
#[derive(Debug)]
pub enum FillError {
    /// API key, model, or profile missing from settings. No network call is
    /// attempted when this is raised.
    ConfigurationMissing(String),

    /// Provider returned a non-2xx status or an error body.
    Provider {
        provider: String,
        message: String,
        status: Option<u16>,
    },

    /// Network-level failure reaching the provider endpoint.
    Transport {
        provider: String,
        source: reqwest::Error,
    },

    /// Model output could not be parsed as a field-to-value JSON object.
    /// Carries the raw model text for diagnostics.
    MalformedResponse { raw: String, detail: String },

    /// Page dump could not be decoded into a document.
    PageParse {
        context: String,
        source: serde_json::Error,
    },
}

impl fmt::Display for FillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillError::ConfigurationMissing(what) => {
                write!(f, "Missing configuration: {}", what)
            }
            FillError::Provider {
                provider,
                message,
                status,
            } => match status {
                Some(code) => write!(f, "{} API error (HTTP {}): {}", provider, code, message),
                None => write!(f, "{} API error: {}", provider, message),
            },
            FillError::Transport { provider, source } => {
                write!(f, "Transport failure calling {}: {}", provider, source)
            }
            FillError::MalformedResponse { raw, detail } => {
                write!(f, "Malformed model response ({}): {}", detail, raw)
            }
            FillError::PageParse { context, source } => {
                write!(f, "Page dump parse error ({}): {}", context, source)
            }
        }
    }
}

impl std::error::Error for FillError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FillError::Transport { source, .. } => Some(source),
            FillError::PageParse { source, .. } => Some(source),
            _ => None,
        }
    }
}
