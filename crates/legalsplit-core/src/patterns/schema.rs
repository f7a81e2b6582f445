use serde::{Deserialize, Serialize};

/// A pattern table driving boundary detection and output naming.
///
/// Every field except `name` and `version` has a default, so a table only
/// needs to list what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternTableDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,

    /// Pages whose trimmed text is shorter than this are flagged as no-OCR.
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,

    /// Regexes capturing `(current, total)` for "Page X of Y" numbering.
    #[serde(default)]
    pub page_of_patterns: Vec<String>,
    #[serde(default)]
    pub page_of_window: SearchWindowDef,

    /// Regexes capturing a standalone page number ("Page N", "- N -").
    #[serde(default)]
    pub standalone_patterns: Vec<String>,
    #[serde(default = "default_standalone_window")]
    pub standalone_window: SearchWindowDef,
    /// Largest value accepted as a standalone page number.
    #[serde(default = "default_standalone_max")]
    pub standalone_max: u32,

    /// Uppercase document-type keywords looked for in the page header.
    #[serde(default)]
    pub header_types: Vec<String>,
    /// Characters from the top of the page treated as the header.
    #[serde(default = "default_header_chars")]
    pub header_search_chars: usize,

    #[serde(default)]
    pub title: TitleDef,

    /// Keyword -> filename slug mapping used when naming outputs.
    #[serde(default)]
    pub document_types: Vec<DocumentTypeDef>,
    /// Regexes pulling a case identifier out of a title.
    #[serde(default)]
    pub case_patterns: Vec<String>,

    #[serde(default)]
    pub naming: NamingDef,
}

/// Which part of a page a matcher looks at: the first `head_chars`
/// characters plus the last `tail_chars` when the page is longer than both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchWindowDef {
    pub head_chars: usize,
    #[serde(default)]
    pub tail_chars: usize,
}

impl Default for SearchWindowDef {
    fn default() -> Self {
        SearchWindowDef {
            head_chars: 2000,
            tail_chars: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleDef {
    #[serde(default = "default_header_chars")]
    pub search_chars: usize,
    #[serde(default = "default_title_lines")]
    pub max_lines: usize,
    #[serde(default = "default_title_min")]
    pub min_len: usize,
    #[serde(default = "default_title_max")]
    pub max_len: usize,
}

impl Default for TitleDef {
    fn default() -> Self {
        TitleDef {
            search_chars: default_header_chars(),
            max_lines: default_title_lines(),
            min_len: default_title_min(),
            max_len: default_title_max(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTypeDef {
    /// Lowercase phrase searched for in the document title.
    pub keyword: String,
    /// Filename component, `[a-z0-9_]` only.
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingDef {
    /// Slug for documents without any title.
    #[serde(default = "default_fallback_slug")]
    pub fallback_slug: String,
    /// Slug for titled documents whose title matches no document type.
    #[serde(default = "default_untitled_slug")]
    pub untitled_slug: String,
    #[serde(default = "default_no_ocr_prefix")]
    pub no_ocr_prefix: String,
    /// Placeholders: `{prefix}`, `{base}`, `{slug}`, `{seq}`, `{index}`.
    #[serde(default = "default_filename_template")]
    pub filename_template: String,
    /// Zero-padding width of `{seq}` and `{index}`.
    #[serde(default = "default_sequence_width")]
    pub sequence_width: usize,
}

impl Default for NamingDef {
    fn default() -> Self {
        NamingDef {
            fallback_slug: default_fallback_slug(),
            untitled_slug: default_untitled_slug(),
            no_ocr_prefix: default_no_ocr_prefix(),
            filename_template: default_filename_template(),
            sequence_width: default_sequence_width(),
        }
    }
}

fn default_min_text_length() -> usize {
    50
}

fn default_standalone_window() -> SearchWindowDef {
    SearchWindowDef {
        head_chars: 1000,
        tail_chars: 500,
    }
}

fn default_standalone_max() -> u32 {
    9999
}

fn default_header_chars() -> usize {
    500
}

fn default_title_lines() -> usize {
    10
}

fn default_title_min() -> usize {
    10
}

fn default_title_max() -> usize {
    100
}

fn default_fallback_slug() -> String {
    "document".into()
}

fn default_untitled_slug() -> String {
    "legal_document".into()
}

fn default_no_ocr_prefix() -> String {
    "No_OCR_".into()
}

fn default_filename_template() -> String {
    "{prefix}{slug}_{seq}.pdf".into()
}

fn default_sequence_width() -> usize {
    3
}
