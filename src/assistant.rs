//! Generative-model integration placeholder.
//!
//! Documentation only. Nothing here makes a request or reads a key.

pub const CAPTION: &str = "Gemini integration: placeholder helper shown below. To actually call \
Gemini 2.x Flash models, use the Google GenAI SDK or Vertex AI endpoints and provide your API key. \
See official docs for quickstart and model IDs.";

pub const SNIPPET: &str = r#"// Example placeholder (DO NOT HARD-CODE API KEYS IN PRODUCTION)
// let client = genai::Client::from_env()?;
// let summary = client
//     .generate("gemini-2.0-flash", "Summarize student performance...")
//     .await?;
// log::info!("{}", summary);"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub caption: &'static str,
    pub snippet: &'static str,
}

pub fn placeholder() -> Placeholder {
    Placeholder {
        caption: CAPTION,
        snippet: SNIPPET,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_is_commented_out() {
        let p = placeholder();
        assert!(p.snippet.lines().all(|l| l.starts_with("//")));
        assert!(p.caption.contains("placeholder"));
    }
}
