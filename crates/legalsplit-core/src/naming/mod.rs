use crate::detect::matchers::find_header_type;
use crate::model::{DocumentDescriptor, NamedOutput};
use crate::patterns::PatternSet;
use std::collections::{HashMap, HashSet};

/// Assigns output filenames to the documents found in one input PDF.
///
/// Counters live only for the duration of a `resolve` call, so every input
/// file starts again at `_001` for each type.
#[derive(Debug, Clone, Copy)]
pub struct NamingResolver<'a> {
    patterns: &'a PatternSet,
}

impl<'a> NamingResolver<'a> {
    pub fn new(patterns: &'a PatternSet) -> Self {
        NamingResolver { patterns }
    }

    /// Name documents from their titles alone.
    pub fn resolve(&self, documents: &[DocumentDescriptor], base_name: &str) -> Vec<NamedOutput> {
        self.resolve_with_pages::<&str>(documents, base_name, &[])
    }

    /// Name documents, falling back to the header of a document's own
    /// pages when it has no title.
    pub fn resolve_with_pages<S: AsRef<str>>(
        &self,
        documents: &[DocumentDescriptor],
        base_name: &str,
        pages: &[S],
    ) -> Vec<NamedOutput> {
        let base = sanitize_base_name(base_name);
        let mut counters: HashMap<String, usize> = HashMap::new();
        let mut used: HashSet<String> = HashSet::new();

        documents
            .iter()
            .enumerate()
            .map(|(index, doc)| {
                let type_slug = self.type_slug(doc, pages);
                let counter = counters.entry(type_slug.clone()).or_insert(0);
                *counter += 1;
                let per_type_sequence = *counter;

                let rendered = self.render(doc, &base, &type_slug, per_type_sequence, index);
                // Only reachable with templates that can render two slugs alike.
                let mut filename = rendered.clone();
                let mut suffix = index + 1;
                while !used.insert(filename.clone()) {
                    filename = disambiguate(&rendered, suffix);
                    suffix += 1;
                }

                NamedOutput {
                    index,
                    type_slug,
                    per_type_sequence,
                    filename,
                    document: doc.clone(),
                }
            })
            .collect()
    }

    /// The document-type slug for one descriptor.
    pub fn type_slug<S: AsRef<str>>(&self, doc: &DocumentDescriptor, pages: &[S]) -> String {
        if let Some(title) = doc.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            return self.slug_for_title(title);
        }

        let span_header = pages
            .get(doc.start_page..=doc.end_page.min(pages.len().saturating_sub(1)))
            .unwrap_or_default()
            .iter()
            .find_map(|text| find_header_type(self.patterns, text.as_ref()));

        match span_header {
            Some(header) => self.slug_for_title(&header),
            None => self.patterns.naming.fallback_slug.clone(),
        }
    }

    /// Map a title to `<type>[_<case id>]`.
    ///
    /// The longest matching document-type keyword wins; a title that names
    /// no known type gets the untitled slug.
    pub fn slug_for_title(&self, title: &str) -> String {
        let lower = title.to_lowercase();

        let mut best: Option<(&str, &str)> = None;
        for doc_type in &self.patterns.document_types {
            if lower.contains(doc_type.keyword.as_str())
                && best.map_or(true, |(k, _)| doc_type.keyword.len() > k.len())
            {
                best = Some((doc_type.keyword.as_str(), doc_type.slug.as_str()));
            }
        }
        let doc_type = best
            .map(|(_, slug)| slug.to_string())
            .unwrap_or_else(|| self.patterns.naming.untitled_slug.clone());

        match self.case_identifier(&lower) {
            Some(id) => format!("{doc_type}_{id}"),
            None => doc_type,
        }
    }

    fn case_identifier(&self, lower_title: &str) -> Option<String> {
        self.patterns.case_patterns.iter().find_map(|re| {
            let caps = re.captures(lower_title)?;
            let m = caps
                .get(1)
                .filter(|m| !m.as_str().is_empty())
                .or_else(|| caps.get(0))?;
            let id = sanitize_identifier(m.as_str());
            (!id.is_empty()).then_some(id)
        })
    }

    fn render(
        &self,
        doc: &DocumentDescriptor,
        base: &str,
        slug: &str,
        seq: usize,
        index: usize,
    ) -> String {
        let naming = &self.patterns.naming;
        let width = naming.sequence_width;
        let prefix = if doc.has_no_ocr_pages {
            naming.no_ocr_prefix.as_str()
        } else {
            ""
        };

        naming
            .filename_template
            .replace("{prefix}", prefix)
            .replace("{base}", base)
            .replace("{slug}", slug)
            .replace("{seq}", &format!("{:0width$}", seq))
            .replace("{index}", &format!("{:0width$}", index + 1))
    }
}

fn disambiguate(filename: &str, suffix: usize) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}-{suffix}.{ext}"),
        None => format!("{filename}-{suffix}"),
    }
}

/// Reduce an input file stem to `[A-Za-z0-9_-]`.
pub fn sanitize_base_name(base_name: &str) -> String {
    let cleaned: String = base_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "document".into()
    } else {
        cleaned
    }
}

fn sanitize_identifier(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}
