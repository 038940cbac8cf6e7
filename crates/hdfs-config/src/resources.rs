//! # Base Resource Loading
//!
//! Reads the resource files that seed every derived configuration. Files are
//! merged left to right, so a key defined by a later file replaces the value
//! from an earlier one.
//!
//! Supported formats, chosen by extension:
//! - `.toml`: tables are flattened into dotted keys
//! - `.json`: a top-level object, flattened like TOML
//! - anything else: property-file syntax (`key=value`, `key: value`, `key value`)

use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::error::ResourceError;
use crate::sink::Configuration;

/// Load and merge the resource files at `paths`
///
/// # Arguments
/// * `paths` - Resource files, lowest precedence first
///
/// # Returns
/// * Merged configuration; empty when `paths` is empty
///
/// Any unreadable or malformed file fails the whole load.
pub fn read_configuration<P: AsRef<Path>>(paths: &[P]) -> Result<Configuration, ResourceError> {
    let mut result = Configuration::new();

    for path in paths {
        let resource = load_resource(path.as_ref())?;
        result.copy_from(&resource);
    }

    if !paths.is_empty() {
        info!(
            files = paths.len(),
            keys = result.len(),
            "Loaded base resource configuration"
        );
    }

    Ok(result)
}

/// Load a single resource file
pub fn load_resource(path: &Path) -> Result<Configuration, ResourceError> {
    let shown = path.display().to_string();
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ResourceError::NotFound {
            path: shown.clone(),
        },
        _ => ResourceError::Read {
            path: shown.clone(),
            source,
        },
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    let config = match extension.as_str() {
        "toml" => parse_toml(&text, &shown)?,
        "json" => parse_json(&text, &shown)?,
        _ => parse_properties(&text, &shown)?,
    };

    debug!(
        path = %path.display(),
        format = %extension,
        keys = config.len(),
        "Loaded resource file"
    );
    Ok(config)
}

/// Parse property-file text
///
/// `path` is used only for error reporting.
pub fn parse_properties(text: &str, path: &str) -> Result<Configuration, ResourceError> {
    let mut config = Configuration::new();
    let mut lines = split_lines(text).into_iter().enumerate();

    while let Some((index, line)) = lines.next() {
        let start_line = index + 1;
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = String::from(trimmed);
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (raw_key, raw_value) = split_key_value(&logical);
        let key = unescape(raw_key).map_err(|details| ResourceError::Parse {
            path: path.to_string(),
            line: Some(start_line),
            details,
        })?;
        let value = unescape(raw_value).map_err(|details| ResourceError::Parse {
            path: path.to_string(),
            line: Some(start_line),
            details,
        })?;
        config.set(key, value);
    }

    Ok(config)
}

/// Split at `\n`, `\r\n` or a lone `\r`
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut index = 0;

    while index < bytes.len() {
        match bytes[index] {
            b'\n' => {
                lines.push(&text[start..index]);
                index += 1;
                start = index;
            }
            b'\r' => {
                lines.push(&text[start..index]);
                index += if bytes.get(index + 1) == Some(&b'\n') { 2 } else { 1 };
                start = index;
            }
            _ => index += 1,
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn is_separator_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000C}')
}

/// Split a logical line at the first unescaped `=`, `:` or whitespace
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    let mut separator = None;

    for (offset, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = offset;
                separator = Some((offset, true));
                break;
            }
            c if is_separator_space(c) => {
                key_end = offset;
                separator = Some((offset, false));
                break;
            }
            _ => {}
        }
    }

    let Some((offset, explicit)) = separator else {
        return (line, "");
    };

    let mut rest = &line[offset + 1..];
    if !explicit {
        rest = rest.trim_start_matches(is_separator_space);
        if let Some(stripped) = rest.strip_prefix(['=', ':']) {
            rest = stripped;
        }
    }
    (&line[..key_end], rest.trim_start_matches(is_separator_space))
}

fn unescape(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("malformed \\uxxxx escape: \\u{hex}"))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

/// Parse TOML text, flattening nested tables into dotted keys
pub fn parse_toml(text: &str, path: &str) -> Result<Configuration, ResourceError> {
    let table: toml::Table = text.parse().map_err(|err: toml::de::Error| {
        let line = err
            .span()
            .map(|span| text[..span.start].matches('\n').count() + 1);
        ResourceError::Parse {
            path: path.to_string(),
            line,
            details: err.message().to_string(),
        }
    })?;

    let mut config = Configuration::new();
    for (key, value) in &table {
        flatten_toml(key, value, &mut config, path)?;
    }
    Ok(config)
}

fn flatten_toml(
    key: &str,
    value: &toml::Value,
    config: &mut Configuration,
    path: &str,
) -> Result<(), ResourceError> {
    match value {
        toml::Value::Table(table) => {
            for (child, nested) in table {
                flatten_toml(&format!("{key}.{child}"), nested, config, path)?;
            }
        }
        toml::Value::Array(items) => {
            let rendered = items
                .iter()
                .map(|item| toml_scalar(item).ok_or_else(|| nested_array_error(key, path)))
                .collect::<Result<Vec<_>, _>>()?;
            config.set_strings(key, rendered);
        }
        scalar => {
            if let Some(rendered) = toml_scalar(scalar) {
                config.set(key, rendered);
            }
        }
    }
    Ok(())
}

fn toml_scalar(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}

/// Parse a JSON object, flattening nested objects into dotted keys
///
/// `null` values are skipped.
pub fn parse_json(text: &str, path: &str) -> Result<Configuration, ResourceError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|err| ResourceError::Parse {
            path: path.to_string(),
            line: Some(err.line()),
            details: err.to_string(),
        })?;

    let serde_json::Value::Object(object) = value else {
        return Err(ResourceError::Parse {
            path: path.to_string(),
            line: None,
            details: "top-level value must be an object".to_string(),
        });
    };

    let mut config = Configuration::new();
    for (key, value) in &object {
        flatten_json(key, value, &mut config, path)?;
    }
    Ok(config)
}

fn flatten_json(
    key: &str,
    value: &serde_json::Value,
    config: &mut Configuration,
    path: &str,
) -> Result<(), ResourceError> {
    match value {
        serde_json::Value::Object(object) => {
            for (child, nested) in object {
                flatten_json(&format!("{key}.{child}"), nested, config, path)?;
            }
        }
        serde_json::Value::Array(items) => {
            let rendered = items
                .iter()
                .map(|item| json_scalar(item).ok_or_else(|| nested_array_error(key, path)))
                .collect::<Result<Vec<_>, _>>()?;
            config.set_strings(key, rendered);
        }
        scalar => {
            if let Some(rendered) = json_scalar(scalar) {
                config.set(key, rendered);
            }
        }
    }
    Ok(())
}

fn json_scalar(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Null | serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            None
        }
    }
}

fn nested_array_error(key: &str, path: &str) -> ResourceError {
    ResourceError::Parse {
        path: path.to_string(),
        line: None,
        details: format!("array for key {key} must contain only scalar values"),
    }
}
