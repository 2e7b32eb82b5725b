use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{snippet, user};
use crate::error::AppError;

/// Highlighting languages accepted by the API. Requests naming anything
/// outside this set are rejected at validation time.
pub const LANGUAGE_CHOICES: &[&str] = &[
    "bash",
    "c",
    "cpp",
    "csharp",
    "css",
    "dart",
    "elixir",
    "erlang",
    "go",
    "haskell",
    "html",
    "java",
    "javascript",
    "json",
    "kotlin",
    "lua",
    "markdown",
    "perl",
    "php",
    "python",
    "r",
    "ruby",
    "rust",
    "scala",
    "sql",
    "swift",
    "toml",
    "typescript",
    "xml",
    "yaml",
];

/// Highlighting color styles accepted by the API.
pub const STYLE_CHOICES: &[&str] = &[
    "autumn",
    "borland",
    "bw",
    "colorful",
    "default",
    "emacs",
    "friendly",
    "fruity",
    "igor",
    "lovelace",
    "manni",
    "monokai",
    "murphy",
    "native",
    "paraiso-dark",
    "paraiso-light",
    "pastie",
    "perldoc",
    "tango",
    "trac",
    "vim",
    "vs",
    "xcode",
];

pub const DEFAULT_LANGUAGE: &str = "python";
pub const DEFAULT_STYLE: &str = "friendly";

/// Maximum title length in Unicode characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// Request body for snippet creation and full-replace update.
///
/// Every field is optional at the deserialization layer so that missing
/// required fields surface as per-field validation errors rather than a
/// body-level rejection. Unknown extra fields are ignored.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SnippetRequest {
    /// Optional display title (up to 100 characters).
    #[schema(example = "Hello world")]
    pub title: Option<String>,
    /// The snippet body. Required, must not be blank.
    #[schema(example = "print('hello')")]
    pub code: Option<String>,
    /// Render line numbers. Defaults to false.
    pub linenos: Option<bool>,
    /// Highlighting language. Defaults to "python".
    #[schema(example = "python")]
    pub language: Option<String>,
    /// Highlighting style. Defaults to "friendly".
    #[schema(example = "friendly")]
    pub style: Option<String>,
}

/// A snippet payload with defaults applied, produced by
/// `validate_snippet_request`. These are exactly the mutable fields.
pub struct SnippetFields {
    pub title: String,
    pub code: String,
    pub linenos: bool,
    pub language: String,
    pub style: String,
}

/// Validate a snippet payload and apply defaults for unset optional fields.
///
/// Collects every offending field into one reason map, so a client can
/// highlight all invalid inputs at once. Nothing is stored on failure.
pub fn validate_snippet_request(req: &SnippetRequest) -> Result<SnippetFields, AppError> {
    let mut fields: BTreeMap<String, String> = BTreeMap::new();

    let code = req.code.as_deref().unwrap_or("");
    if code.trim().is_empty() {
        fields.insert(
            "code".into(),
            "This field is required and may not be blank".into(),
        );
    }

    if let Some(ref title) = req.title
        && title.chars().count() > TITLE_MAX_CHARS
    {
        fields.insert(
            "title".into(),
            format!("Title must be at most {TITLE_MAX_CHARS} characters"),
        );
    }

    let language = req.language.as_deref().unwrap_or(DEFAULT_LANGUAGE);
    if !LANGUAGE_CHOICES.contains(&language) {
        fields.insert(
            "language".into(),
            format!("\"{language}\" is not a valid choice"),
        );
    }

    let style = req.style.as_deref().unwrap_or(DEFAULT_STYLE);
    if !STYLE_CHOICES.contains(&style) {
        fields.insert("style".into(), format!("\"{style}\" is not a valid choice"));
    }

    if !fields.is_empty() {
        return Err(AppError::ValidationFields(fields));
    }

    Ok(SnippetFields {
        title: req.title.clone().unwrap_or_default(),
        code: code.to_string(),
        linenos: req.linenos.unwrap_or(false),
        language: language.to_string(),
        style: style.to_string(),
    })
}

/// Public projection of a snippet. The owner is rendered as a username,
/// never as an identity record; credentials are never serialized.
#[derive(Serialize, utoipa::ToSchema)]
pub struct SnippetResponse {
    /// Store-assigned snippet ID.
    #[schema(example = 1)]
    pub id: i32,
    /// Username of the owning identity, or null for owner-less records.
    #[schema(example = "alice")]
    pub owner: Option<String>,
    pub title: String,
    pub code: String,
    pub linenos: bool,
    pub language: String,
    pub style: String,
}

impl SnippetResponse {
    pub fn from_model(m: snippet::Model, owner: Option<String>) -> Self {
        Self {
            id: m.id,
            owner,
            title: m.title,
            code: m.code,
            linenos: m.linenos,
            language: m.language,
            style: m.style,
        }
    }
}

impl From<(snippet::Model, Option<user::Model>)> for SnippetResponse {
    fn from((m, owner): (snippet::Model, Option<user::Model>)) -> Self {
        let owner = owner.map(|u| u.username);
        Self::from_model(m, owner)
    }
}
