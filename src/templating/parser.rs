//! The tag parser seam and its default tera-backed implementation.
//!
//! The composition engine never interprets tag syntax itself. It drives a
//! [`TagParser`] through three operations:
//!
//! 1. [`cumulative_noparse`](TagParser::cumulative_noparse) - while enabled,
//!    plugin output and `{{ noparse }}` blocks are swapped for opaque
//!    placeholders and collected instead of being written into the text.
//! 2. [`parse`](TagParser::parse) - expands tags against a data scope, calling
//!    back into a [`PluginCallback`] for every plugin tag.
//! 3. [`inject_noparse`](TagParser::inject_noparse) - substitutes the
//!    collected text back, verbatim, after the whole pass is done.
//!
//! # Default syntax ([`TeraTagParser`])
//!
//! ```text
//! {{ noparse }}{{ shown as-is }}{{ /noparse }}
//! {{ theme:asset file="site.css" }}                 single plugin tag
//! {{ code:block lang='rust' }} ... {{ /code:block }}  paired plugin tag
//! {{ title }}  {% if user %}...{% endif %}          everything else: tera
//! ```
//!
//! A plugin tag is any tag whose name contains a `:`. Paired tags of the
//! same name may nest. Everything left after noparse blocks and plugin tags
//! have been taken out is rendered by tera with HTML autoescaping disabled.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};
use uuid::Uuid;

use super::error::{ErrorLocation, TemplateError};
use crate::view::Scope;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Placeholder prefix for protected text; the index and `__` follow.
const NOPARSE_PREFIX: &str = "__VIEWCRAFT_NOPARSE_";

static NOPARSE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{\s*noparse\s*\}\}(.*?)\{\{\s*/noparse\s*\}\}").expect("valid noparse regex")
});

static PLUGIN_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\{\{\s*([A-Za-z_][\w-]*(?::[\w-]+)+)((?:\s+[\w-]+\s*=\s*(?:"[^"]*"|'[^']*'))*)\s*\}\}"#,
    )
    .expect("valid plugin regex")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\w-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid attribute regex")
});

static VARIABLE_NOT_FOUND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Variable `([^`]+)` not found").expect("valid variable regex"));

static LINE_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+):(\d+)").expect("valid position regex"));

/// One plugin tag as seen by a [`PluginCallback`].
#[derive(Debug, Clone, Copy)]
pub struct PluginCall<'a> {
    /// Full plugin name, e.g. `theme:asset`
    pub name: &'a str,
    /// Tag attributes in key order
    pub attributes: &'a BTreeMap<String, String>,
    /// Text between the opening and closing tag; empty for single tags
    pub content: &'a str,
}

/// Produces the replacement text for plugin tags.
pub trait PluginCallback {
    /// Returns the output for one plugin tag.
    ///
    /// `parser` is the parser currently running, so the callback can parse
    /// the plugin content with it again.
    fn call(&self, parser: &mut dyn TagParser, call: &PluginCall<'_>)
    -> Result<String, TemplateError>;
}

/// An external tag parser driven by the composition engine.
pub trait TagParser {
    /// Turns cumulative no-parse mode on or off.
    ///
    /// While on, protected text is only substituted by
    /// [`inject_noparse`](Self::inject_noparse); while off, `parse` injects
    /// before returning.
    fn cumulative_noparse(&mut self, enabled: bool);

    /// Expands tags in `content` against `data`.
    fn parse(
        &mut self,
        content: &str,
        data: &Scope,
        callback: Option<&dyn PluginCallback>,
    ) -> Result<String, TemplateError>;

    /// Substitutes all protected text back into `content` and forgets it.
    fn inject_noparse(&mut self, content: &str) -> String;
}

/// Lex-style plugin tags and noparse blocks on top of tera.
#[derive(Debug)]
pub struct TeraTagParser {
    cumulative: bool,
    /// Random per-pass part of every placeholder, so rendered data cannot forge one
    nonce: String,
    /// Protected text, indexed by placeholder number
    protected: Vec<String>,
}

impl Default for TeraTagParser {
    fn default() -> Self {
        Self {
            cumulative: false,
            nonce: new_nonce(),
            protected: Vec::new(),
        }
    }
}

impl TeraTagParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of protected entries awaiting injection.
    pub fn pending_noparse(&self) -> usize {
        self.protected.len()
    }

    fn placeholder(&self, index: usize) -> String {
        format!("{NOPARSE_PREFIX}{}_{index}__", self.nonce)
    }

    /// Stores `text` and returns the placeholder standing in for it.
    fn protect(&mut self, text: String) -> String {
        let placeholder = self.placeholder(self.protected.len());
        tracing::trace!("Protected {} ({} bytes)", placeholder, text.len());
        self.protected.push(text);
        placeholder
    }

    fn protect_noparse_blocks(&mut self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut last = 0;

        for caps in NOPARSE_BLOCK.captures_iter(content) {
            let (Some(block), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            result.push_str(&content[last..block.start()]);
            let placeholder = self.protect(inner.as_str().to_string());
            result.push_str(&placeholder);
            last = block.end();
        }

        result.push_str(&content[last..]);
        result
    }

    fn expand_plugins(
        &mut self,
        content: &str,
        callback: Option<&dyn PluginCallback>,
    ) -> Result<String, TemplateError> {
        let mut result = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(caps) = PLUGIN_OPEN.captures(rest) {
            let Some(tag) = caps.get(0) else {
                break;
            };
            let name = caps.get(1).map_or("", |m| m.as_str());
            let attributes = parse_attributes(caps.get(2).map_or("", |m| m.as_str()));

            result.push_str(&rest[..tag.start()]);
            let after = &rest[tag.end()..];
            let (inner, consumed) = match find_closing_tag(after, name) {
                Some((inner_end, close_end)) => (&after[..inner_end], close_end),
                None => ("", 0),
            };

            let output = match callback {
                Some(callback) => {
                    tracing::debug!("Calling plugin '{}' ({} attribute(s))", name, attributes.len());
                    let call = PluginCall {
                        name,
                        attributes: &attributes,
                        content: inner,
                    };
                    callback.call(&mut *self, &call)?
                }
                None => {
                    tracing::debug!("No plugin callback, dropping '{}'", name);
                    String::new()
                }
            };

            if self.cumulative {
                let placeholder = self.protect(output);
                result.push_str(&placeholder);
            } else {
                result.push_str(&output);
            }
            rest = &after[consumed..];
        }

        result.push_str(rest);
        Ok(result)
    }

    fn render_tags(content: &str, data: &Scope) -> Result<String, TemplateError> {
        if !contains_tag_syntax(content) {
            return Ok(content.to_string());
        }

        let context = TeraContext::from_value(Value::Object(data.clone())).map_err(|e| {
            TemplateError::SyntaxError {
                message: format_tera_error(&e),
                location: Box::default(),
            }
        })?;

        // Fresh instance per pass; the one-off template name never triggers autoescaping
        let mut tera = Tera::default();
        tera.render_str(content, &context).map_err(|e| parse_tera_error(&e, content, data))
    }
}

impl TagParser for TeraTagParser {
    fn cumulative_noparse(&mut self, enabled: bool) {
        self.cumulative = enabled;
    }

    fn parse(
        &mut self,
        content: &str,
        data: &Scope,
        callback: Option<&dyn PluginCallback>,
    ) -> Result<String, TemplateError> {
        let protected = self.protect_noparse_blocks(content);
        let expanded = self.expand_plugins(&protected, callback)?;
        let rendered = Self::render_tags(&expanded, data)?;

        if self.cumulative {
            Ok(rendered)
        } else {
            Ok(self.inject_noparse(&rendered))
        }
    }

    fn inject_noparse(&mut self, content: &str) -> String {
        let mut result = content.to_string();

        // Newest first: an entry can contain placeholders of older entries
        for (index, text) in self.protected.iter().enumerate().rev() {
            result = result.replace(&self.placeholder(index), text);
        }

        tracing::trace!("Injected {} protected block(s)", self.protected.len());
        self.protected.clear();
        self.nonce = new_nonce();
        result
    }
}

fn new_nonce() -> String {
    Uuid::new_v4().simple().to_string()
}

fn contains_tag_syntax(content: &str) -> bool {
    content.contains("{{") || content.contains("{%") || content.contains("{#")
}

fn parse_attributes(raw: &str) -> BTreeMap<String, String> {
    ATTRIBUTE
        .captures_iter(raw)
        .filter_map(|caps| {
            let key = caps.get(1)?.as_str().to_string();
            let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            Some((key, value.to_string()))
        })
        .collect()
}

/// Finds the `{{ /name }}` matching an already consumed opening tag.
///
/// Returns the offset where the closing tag starts and where it ends.
fn find_closing_tag(content: &str, name: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut offset = 0;

    while let Some(found) = content[offset..].find("{{") {
        let start = offset + found;
        let Some(close) = content[start..].find("}}") else {
            break;
        };
        let end = start + close + 2;

        let inner = content[start + 2..start + close].trim();
        let (closing, tag) = match inner.strip_prefix('/') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, inner),
        };

        if tag.split_whitespace().next() != Some(name) {
            offset = start + 2;
            continue;
        }

        if !closing {
            depth += 1;
        } else if depth == 0 {
            return Some((start, end));
        } else {
            depth -= 1;
        }
        offset = end;
    }
    None
}

/// Parse a tera error into a structured [`TemplateError`]
fn parse_tera_error(error: &tera::Error, content: &str, data: &Scope) -> TemplateError {
    use std::error::Error;

    let line_number = extract_line_from_tera_error(error);
    let context_lines = line_number
        .map(|line| extract_context_lines(content, line, 3))
        .filter(|lines| !lines.is_empty());
    let location = Box::new(ErrorLocation {
        line_number,
        context_lines,
    });

    // The undefined-variable message sits somewhere in the source chain
    let mut current: Option<&dyn Error> = Some(error);
    while let Some(err) = current {
        if let Some(name) = extract_variable_name(&err.to_string()) {
            let available_variables = extract_available_variables(data);
            let suggestions = find_similar_variables(&name, &available_variables);
            return TemplateError::VariableNotFound {
                variable: name,
                available_variables: Box::new(available_variables),
                suggestions: Box::new(suggestions),
                location,
            };
        }
        current = err.source();
    }

    TemplateError::SyntaxError {
        message: format_tera_error(error),
        location,
    }
}

/// Extract variable name from "Variable `foo` not found" message
fn extract_variable_name(error_msg: &str) -> Option<String> {
    VARIABLE_NOT_FOUND.captures(error_msg)?.get(1).map(|m| m.as_str().to_string())
}

/// Variable names in scope: top-level keys plus one level of nested keys.
fn extract_available_variables(data: &Scope) -> Vec<String> {
    let mut vars = Vec::new();
    for (key, value) in data {
        vars.push(key.clone());
        if let Value::Object(nested) = value {
            vars.extend(nested.keys().map(|inner| format!("{key}.{inner}")));
        }
    }
    vars
}

/// Find similar variable names using Levenshtein distance
fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
    let mut scored: Vec<_> =
        available.iter().map(|var| (var.clone(), levenshtein(target, var))).collect();

    // Sort by distance (closest first)
    scored.sort_by_key(|(_, dist)| *dist);

    scored
        .into_iter()
        .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .take(3)
        .map(|(var, _)| var)
        .collect()
}

/// Returns up to `context_size` lines before and after `error_line` (1-indexed).
fn extract_context_lines(
    content: &str,
    error_line: usize,
    context_size: usize,
) -> Vec<(usize, String)> {
    let lines: Vec<&str> = content.lines().collect();
    let total_lines = lines.len();

    if error_line == 0 || error_line > total_lines {
        return Vec::new();
    }

    let start = error_line.saturating_sub(context_size + 1);
    let end = (error_line + context_size).min(total_lines);

    lines[start..end]
        .iter()
        .enumerate()
        .map(|(idx, line)| (start + idx + 1, line.to_string()))
        .collect()
}

/// Tera puts `line:column` into parse error messages, e.g. "1:7".
fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
    let error_msg = format!("{:?}", error);
    LINE_COLUMN.captures(&error_msg)?.get(1)?.as_str().parse::<usize>().ok()
}

/// Flattens a tera error chain into one message without tera's internal
/// one-off template name.
pub fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut all_messages = vec![error.to_string()];
    let mut current_error: Option<&dyn Error> = error.source();
    while let Some(err) = current_error {
        all_messages.push(err.to_string());
        current_error = err.source();
    }

    let messages: Vec<String> = all_messages
        .into_iter()
        .map(|msg| {
            msg.replace("while rendering '__tera_one_off'", "")
                .replace("Failed to render '__tera_one_off'", "Template rendering failed")
                .replace("Failed to parse '__tera_one_off'", "Template syntax error")
                .replace("'__tera_one_off'", "template")
                .trim()
                .to_string()
        })
        .filter(|cleaned| {
            !cleaned.is_empty()
                && cleaned != "Template rendering failed"
                && cleaned != "Template syntax error"
        })
        .collect();

    if messages.is_empty() {
        "Template syntax error (see details above)".to_string()
    } else {
        messages.join("\n  → ")
    }
}
