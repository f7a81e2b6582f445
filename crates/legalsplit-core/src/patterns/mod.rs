pub mod builtin;
pub mod schema;

use crate::error::SplitError;
use regex::{Regex, RegexBuilder};
use schema::{DocumentTypeDef, NamingDef, PatternTableDef, SearchWindowDef, TitleDef};
use std::path::Path;

/// Template placeholders understood by the naming resolver.
pub const TEMPLATE_PLACEHOLDERS: &[&str] = &["prefix", "base", "slug", "seq", "index"];

/// A validated, compiled pattern table.
///
/// Built once per run and shared read-only by every scan; holds no state
/// that changes while pages are processed.
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub name: String,
    pub min_text_length: usize,
    pub page_of: Vec<Regex>,
    pub page_of_window: SearchWindowDef,
    pub standalone: Vec<Regex>,
    pub standalone_window: SearchWindowDef,
    pub standalone_max: u32,
    /// Uppercase header keywords, in table order.
    pub header_types: Vec<String>,
    pub header_search_chars: usize,
    pub title: TitleDef,
    /// Document types with lowercase keywords, in table order.
    pub document_types: Vec<DocumentTypeDef>,
    pub case_patterns: Vec<Regex>,
    pub naming: NamingDef,
}

impl PatternSet {
    /// Validate and compile a pattern table definition.
    pub fn compile(def: &PatternTableDef) -> Result<PatternSet, SplitError> {
        validate_patterns(def)?;

        Ok(PatternSet {
            name: def.name.clone(),
            min_text_length: def.min_text_length,
            page_of: compile_all(&def.page_of_patterns, "page_of_patterns")?,
            page_of_window: def.page_of_window,
            standalone: compile_all(&def.standalone_patterns, "standalone_patterns")?,
            standalone_window: def.standalone_window,
            standalone_max: def.standalone_max,
            header_types: def
                .header_types
                .iter()
                .map(|h| h.trim().to_uppercase())
                .collect(),
            header_search_chars: def.header_search_chars,
            title: def.title.clone(),
            document_types: def
                .document_types
                .iter()
                .map(|d| DocumentTypeDef {
                    keyword: d.keyword.trim().to_lowercase(),
                    slug: d.slug.clone(),
                })
                .collect(),
            case_patterns: compile_all(&def.case_patterns, "case_patterns")?,
            naming: def.naming.clone(),
        })
    }
}

/// Load and compile a pattern table from a JSON file.
pub fn load_patterns(path: &Path) -> Result<PatternSet, SplitError> {
    let content = std::fs::read_to_string(path).map_err(|e| SplitError::PatternLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_patterns(&content, path)
}

/// Parse and compile a pattern table from a JSON string.
pub fn parse_patterns(json: &str, source: &Path) -> Result<PatternSet, SplitError> {
    let def: PatternTableDef = serde_json::from_str(json).map_err(|e| SplitError::PatternLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    PatternSet::compile(&def).map_err(|e| match e {
        SplitError::PatternInvalid(reason) => SplitError::PatternLoad {
            path: source.to_path_buf(),
            reason,
        },
        other => other,
    })
}

/// Parse a pattern table definition from a JSON string (no file path context).
pub fn parse_patterns_str(json: &str) -> Result<PatternTableDef, SplitError> {
    let def: PatternTableDef = serde_json::from_str(json).map_err(SplitError::Json)?;
    validate_patterns(&def)?;
    Ok(def)
}

/// Validate that a pattern table is well-formed.
///
/// Runs before any page is scanned: a bad table is a startup failure, not a
/// per-page one.
pub fn validate_patterns(def: &PatternTableDef) -> Result<(), SplitError> {
    for pattern in &def.page_of_patterns {
        let re = build_regex(pattern, "page_of_patterns")?;
        if re.captures_len() < 3 {
            return Err(SplitError::PatternInvalid(format!(
                "page_of pattern '{}' must capture (current, total)",
                pattern
            )));
        }
    }

    for pattern in &def.standalone_patterns {
        let re = build_regex(pattern, "standalone_patterns")?;
        if re.captures_len() < 2 {
            return Err(SplitError::PatternInvalid(format!(
                "standalone pattern '{}' must capture the page number",
                pattern
            )));
        }
    }

    for pattern in &def.case_patterns {
        build_regex(pattern, "case_patterns")?;
    }

    if def.header_types.iter().any(|h| h.trim().is_empty()) {
        return Err(SplitError::PatternInvalid(
            "header type keywords must not be empty".into(),
        ));
    }

    for doc_type in &def.document_types {
        if doc_type.keyword.trim().is_empty() {
            return Err(SplitError::PatternInvalid(format!(
                "document type '{}' has an empty keyword",
                doc_type.slug
            )));
        }
        validate_slug(&doc_type.slug)?;
    }

    if def.min_text_length == 0 {
        return Err(SplitError::PatternInvalid(
            "min_text_length must be at least 1".into(),
        ));
    }

    if def.title.min_len > def.title.max_len {
        return Err(SplitError::PatternInvalid(format!(
            "title min_len {} exceeds max_len {}",
            def.title.min_len, def.title.max_len
        )));
    }

    validate_naming(&def.naming)
}

fn validate_naming(naming: &NamingDef) -> Result<(), SplitError> {
    validate_slug(&naming.fallback_slug)?;
    validate_slug(&naming.untitled_slug)?;

    if naming
        .no_ocr_prefix
        .chars()
        .any(|c| c == '/' || c == '\\' || c == '{' || c == '}')
    {
        return Err(SplitError::PatternInvalid(format!(
            "no_ocr_prefix '{}' contains a reserved character",
            naming.no_ocr_prefix
        )));
    }

    let placeholders = template_placeholders(&naming.filename_template)?;
    for p in &placeholders {
        if !TEMPLATE_PLACEHOLDERS.contains(&p.as_str()) {
            return Err(SplitError::PatternInvalid(format!(
                "unknown placeholder '{{{}}}' in filename template. Available: {}",
                p,
                TEMPLATE_PLACEHOLDERS.join(", ")
            )));
        }
    }

    let has = |name: &str| placeholders.iter().any(|p| p == name);
    if !(has("index") || (has("slug") && has("seq"))) {
        return Err(SplitError::PatternInvalid(
            "filename template must contain {slug} and {seq}, or {index}".into(),
        ));
    }

    if !naming.filename_template.to_lowercase().ends_with(".pdf") {
        return Err(SplitError::PatternInvalid(
            "filename template must end in .pdf".into(),
        ));
    }

    if naming.filename_template.contains('/') || naming.filename_template.contains('\\') {
        return Err(SplitError::PatternInvalid(
            "filename template must not contain path separators".into(),
        ));
    }

    Ok(())
}

fn validate_slug(slug: &str) -> Result<(), SplitError> {
    if slug.is_empty()
        || !slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(SplitError::PatternInvalid(format!(
            "slug '{}' must be non-empty and use only [a-z0-9_]",
            slug
        )));
    }
    Ok(())
}

/// Names of the `{...}` placeholders in a template, in order.
pub fn template_placeholders(template: &str) -> Result<Vec<String>, SplitError> {
    let placeholder = Regex::new(r"\{([^{}]*)\}")
        .map_err(|e| SplitError::PatternInvalid(e.to_string()))?;

    if placeholder.replace_all(template, "").contains(['{', '}']) {
        return Err(SplitError::PatternInvalid(format!(
            "unbalanced braces in filename template '{}'",
            template
        )));
    }

    Ok(placeholder
        .captures_iter(template)
        .map(|c| c[1].to_string())
        .collect())
}

fn build_regex(pattern: &str, field: &str) -> Result<Regex, SplitError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
        .map_err(|e| SplitError::PatternInvalid(format!("{} entry '{}': {}", field, pattern, e)))
}

fn compile_all(patterns: &[String], field: &str) -> Result<Vec<Regex>, SplitError> {
    patterns.iter().map(|p| build_regex(p, field)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(extra: &str) -> String {
        format!(
            r#"{{
                "name": "Test",
                "version": "1.0"
                {}
            }}"#,
            extra
        )
    }

    #[test]
    fn test_parse_minimal_table_uses_defaults() {
        let def = parse_patterns_str(&minimal("")).unwrap();
        assert_eq!(def.min_text_length, 50);
        assert_eq!(def.page_of_window.head_chars, 2000);
        assert_eq!(def.standalone_window.head_chars, 1000);
        assert_eq!(def.title.min_len, 10);
        assert_eq!(def.naming.filename_template, "{prefix}{slug}_{seq}.pdf");
    }

    #[test]
    fn test_compile_uppercases_headers_and_lowercases_keywords() {
        let def = parse_patterns_str(&minimal(
            r#", "header_types": ["Search Warrant"],
                "document_types": [{ "keyword": "Search Warrant", "slug": "search_warrant" }]"#,
        ))
        .unwrap();
        let set = PatternSet::compile(&def).unwrap();
        assert_eq!(set.header_types, vec!["SEARCH WARRANT"]);
        assert_eq!(set.document_types[0].keyword, "search warrant");
    }

    #[test]
    fn test_bad_regex_rejected() {
        let json = minimal(r#", "page_of_patterns": ["PAGE (\\d+ OF (\\d+)"]"#);
        assert!(matches!(
            parse_patterns_str(&json),
            Err(SplitError::PatternInvalid(_))
        ));
    }

    #[test]
    fn test_page_of_needs_two_groups() {
        let json = minimal(r#", "page_of_patterns": ["PAGE (\\d+)"]"#);
        assert!(parse_patterns_str(&json).is_err());
    }

    #[test]
    fn test_standalone_needs_a_group() {
        let json = minimal(r#", "standalone_patterns": ["PAGE \\d+"]"#);
        assert!(parse_patterns_str(&json).is_err());
    }

    #[test]
    fn test_bad_slug_rejected() {
        let json = minimal(
            r#", "document_types": [{ "keyword": "warrant", "slug": "Search Warrant" }]"#,
        );
        assert!(parse_patterns_str(&json).is_err());
    }

    #[test]
    fn test_template_without_sequence_rejected() {
        let json = minimal(r#", "naming": { "filename_template": "{slug}.pdf" }"#);
        assert!(parse_patterns_str(&json).is_err());
    }

    #[test]
    fn test_template_with_index_only_accepted() {
        let json = minimal(r#", "naming": { "filename_template": "{base}_{index}.pdf" }"#);
        assert!(parse_patterns_str(&json).is_ok());
    }

    #[test]
    fn test_template_unknown_placeholder_rejected() {
        let json = minimal(r#", "naming": { "filename_template": "{slug}_{seq}_{date}.pdf" }"#);
        assert!(parse_patterns_str(&json).is_err());
    }

    #[test]
    fn test_template_placeholders() {
        let names = template_placeholders("{prefix}{base}_{slug}_{seq}.pdf").unwrap();
        assert_eq!(names, vec!["prefix", "base", "slug", "seq"]);
        assert!(template_placeholders("{slug_{seq}.pdf").is_err());
        assert!(template_placeholders("slug}_{seq}.pdf").is_err());
        assert!(template_placeholders("{slug{seq}}.pdf").is_err());
        assert_eq!(template_placeholders("plain.pdf").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_title_bounds_checked() {
        let json = minimal(r#", "title": { "min_len": 50, "max_len": 10 }"#);
        assert!(parse_patterns_str(&json).is_err());
    }

    #[test]
    fn test_parse_patterns_reports_source_path() {
        let err = parse_patterns("{ not json", Path::new("custom.json")).unwrap_err();
        match err {
            SplitError::PatternLoad { path, .. } => assert_eq!(path, Path::new("custom.json")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
