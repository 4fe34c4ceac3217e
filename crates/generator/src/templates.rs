//! Template loading and management

use apigen_common::naming::{to_pascal_case, to_snake_case};
use apigen_common::{GeneratorError, Result};
use std::collections::HashMap;
use tera::{Tera, Value};

/// Templates and the file each one renders to, relative to the output root
pub const TEMPLATES: &[(&str, &str, &str)] = &[
    (
        "manifest.yaml",
        "manifest.yaml",
        include_str!("../templates/manifest.yaml.tera"),
    ),
    ("lib.rs", "src/lib.rs", include_str!("../templates/lib.rs.tera")),
];

/// Load all templates
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();

    tera.register_filter("snake_case", snake_case_filter);
    tera.register_filter("pascal_case", pascal_case_filter);
    tera.register_filter("rust_doc", rust_doc_filter);

    for (name, _, source) in TEMPLATES {
        tera.add_raw_template(name, source).map_err(|e| {
            GeneratorError::Generation(format!("Failed to load {} template: {}", name, e))
        })?;
    }

    Ok(tera)
}

fn string_arg<'a>(value: &'a Value, filter: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("{} filter expects a string", filter)))
}

fn snake_case_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(to_snake_case(string_arg(value, "snake_case")?)))
}

fn pascal_case_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    Ok(Value::String(to_pascal_case(string_arg(value, "pascal_case")?)))
}

/// Turn documentation into `///` lines, e.g. `{{ doc | rust_doc(indent=4) }}`
///
/// Empty documentation renders nothing. Every line after the first, and the
/// item that follows, carries the indent, so the filter can sit at the
/// template's own indentation.
fn rust_doc_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let doc = string_arg(value, "rust_doc")?;
    let indent = args.get("indent").and_then(Value::as_u64).unwrap_or(0) as usize;
    if doc.trim().is_empty() {
        return Ok(Value::String(String::new()));
    }

    let lines: Vec<String> = doc
        .trim_end()
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                "///".to_string()
            } else {
                format!("/// {}", line.trim_end())
            }
        })
        .collect();
    let separator = format!("\n{}", " ".repeat(indent));
    Ok(Value::String(format!("{}{}", lines.join(&separator), separator)))
}
