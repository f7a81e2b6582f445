use legalsplit_core::error::SplitError;
use legalsplit_core::patterns::{builtin, load_patterns, template_placeholders, PatternSet};
use std::path::Path;

pub fn list() -> Result<i32, SplitError> {
    println!("Available predefined pattern tables:\n");
    for name in builtin::PRESETS {
        let def = builtin::load_preset_def(name)?;
        let default = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!("  {:<8} {} (v{}){}", name, def.name, def.version, default);
        if let Some(ref desc) = def.description {
            println!("           {}", desc);
        }
        println!(
            "           {} page-of, {} standalone, {} header types, {} document types",
            def.page_of_patterns.len(),
            def.standalone_patterns.len(),
            def.header_types.len(),
            def.document_types.len()
        );
        println!();
    }
    Ok(0)
}

pub fn show(preset: &str) -> Result<i32, SplitError> {
    let def = builtin::load_preset_def(preset)?;
    println!("{}", serde_json::to_string_pretty(&def)?);
    Ok(0)
}

pub fn schema() -> Result<i32, SplitError> {
    print!(
        r#"JSON Pattern Table Schema
=========================

A pattern table tells legalsplit how to recognize where one document ends
and the next begins, and how to name the files it writes. Run
`legalsplit patterns show legal` for a complete example.

Top-level fields:
  name          (string, required)  Human-readable name of the table
  description   (string, optional)  What kind of bundles it is for
  version       (string, required)  Version identifier (e.g., "2025.1")
  min_text_length
                (number, optional)  Pages with fewer non-blank characters are
                                    flagged as having no OCR text. Default: 50

Boundary detection (tried in this order on every page):
  page_of_patterns
                (array, optional)   Regexes for "Page X of Y" numbering. Each
                                    must capture (X, Y). A page where X equals
                                    Y ends the current document.
  page_of_window
                (object, optional)  {{ "head_chars": 2000, "tail_chars": 500 }}
                                    Part of the page searched: the first
                                    head_chars plus the last tail_chars.
  standalone_patterns
                (array, optional)   Regexes for bare page numbers ("Page 3",
                                    "- 3 -"). Each must capture the number.
                                    Numbering that drops back to 1 starts a
                                    new document.
  standalone_window
                (object, optional)  Default: {{ "head_chars": 1000, "tail_chars": 500 }}
  standalone_max
                (number, optional)  Largest believable page number. Default: 9999
  header_types  (array, optional)   Keywords looked for near the top of the
                                    page (matched in uppercase). A change of
                                    keyword starts a new document. The longest
                                    matching keyword wins.
  header_search_chars
                (number, optional)  Characters treated as the header. Default: 500
  title         (object, optional)  Where titles are looked for:
                                    search_chars (500), max_lines (10),
                                    min_len (10), max_len (100)

All regexes are matched case-insensitively, with ^ and $ anchoring at
line boundaries.

Naming:
  document_types
                (array, optional)   {{ "keyword": "search warrant",
                                       "slug": "search_warrant" }}
                                    The longest keyword found in a document's
                                    title picks its slug. Slugs use [a-z0-9_].
  case_patterns (array, optional)   Regexes for case identifiers. The first
                                    match (group 1 if present) is appended to
                                    the slug: search_warrant_tnt-72-24
  naming        (object, optional)
    fallback_slug     Slug for documents without a title. Default: "document"
    untitled_slug     Slug for titles naming no known type.
                      Default: "legal_document"
    no_ocr_prefix     Prefix for documents containing no-OCR pages.
                      Default: "No_OCR_"
    filename_template Default: "{{prefix}}{{slug}}_{{seq}}.pdf"
                      Placeholders: {{prefix}}, {{base}} (input file stem),
                      {{slug}}, {{seq}} (per-type counter), {{index}}
                      (position in the input). Must contain {{slug}} and
                      {{seq}}, or {{index}}, and end in .pdf.
    sequence_width    Zero padding of {{seq}} and {{index}}. Default: 3

Example:
{{
  "name": "County court filings",
  "version": "1.0",
  "page_of_patterns": ["PAGE\\s+(\\d+)\\s+OF\\s+(\\d+)"],
  "standalone_patterns": ["^\\s*-\\s*(\\d+)\\s*-\\s*$"],
  "header_types": ["MOTION", "ORDER", "NOTICE OF HEARING"],
  "document_types": [
    {{ "keyword": "motion", "slug": "motion" }},
    {{ "keyword": "order", "slug": "order" }},
    {{ "keyword": "notice of hearing", "slug": "hearing_notice" }}
  ],
  "case_patterns": ["\\d{{2}}-cv-\\d+"],
  "naming": {{ "filename_template": "{{base}}_{{slug}}_{{seq}}.pdf" }}
}}
"#
    );
    Ok(0)
}

pub fn validate(file: &Path) -> Result<i32, SplitError> {
    let set = load_patterns(file)?;

    println!("Pattern table '{}' is valid.", set.name);
    println!("  Page-of patterns:    {}", set.page_of.len());
    println!("  Standalone patterns: {}", set.standalone.len());
    println!("  Header types:        {}", set.header_types.len());
    println!("  Document types:      {}", set.document_types.len());
    println!("  Filename template:   {}", set.naming.filename_template);

    let warnings = lint(&set);
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(0)
}

/// Valid but probably unintended table contents.
fn lint(set: &PatternSet) -> Vec<String> {
    let mut warnings = Vec::new();

    if set.page_of.is_empty() && set.standalone.is_empty() && set.header_types.is_empty() {
        warnings.push("no detection patterns: every PDF will be left as one document".into());
    }

    for header in &set.header_types {
        let lower = header.to_lowercase();
        if !set
            .document_types
            .iter()
            .any(|d| lower.contains(d.keyword.as_str()))
        {
            warnings.push(format!(
                "header type '{}' matches no document type; untitled documents with it are named '{}'",
                header, set.naming.untitled_slug
            ));
        }
    }

    let has_prefix = template_placeholders(&set.naming.filename_template)
        .map(|p| p.iter().any(|n| n == "prefix"))
        .unwrap_or(false);
    if !has_prefix {
        warnings.push("filename template has no {prefix}; no-OCR documents will not be marked".into());
    }

    warnings
}
