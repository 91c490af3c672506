//! Generated prog documentation
//!
//! Builds a help document from the registries, so builders see exactly the
//! functions and properties the running server accepts.

use crate::dot_reference::DotReferenceRegistry;
use crate::registry::{FunctionRegistration, FunctionRegistry};
use crate::runtime::ProgRuntime;
use serde::Serialize;
use std::fmt::Write;

/// Narrowest width text output will wrap to
const MIN_WIDTH: usize = 20;

const INDENT: &str = "    ";

#[derive(Debug, Clone, Serialize)]
pub struct ParameterHelp {
    pub name: String,
    #[serde(rename = "type")]
    pub variable_type: String,
    pub help: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionHelp {
    pub name: String,
    pub parameters: Vec<ParameterHelp>,
    pub returns: String,
    pub help: String,
}

impl FunctionHelp {
    fn from_registration(registration: &FunctionRegistration) -> Self {
        Self {
            name: registration.name().to_string(),
            parameters: registration
                .parameters()
                .iter()
                .map(|p| ParameterHelp {
                    name: p.name.clone(),
                    variable_type: p.variable_type.describe(),
                    help: p.help.clone(),
                })
                .collect(),
            returns: registration.return_type().describe(),
            help: registration.help().to_string(),
        }
    }

    /// `name(Type param, ...) -> Type`
    pub fn synopsis(&self) -> String {
        let parameters: Vec<String> = self
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.variable_type, p.name))
            .collect();
        format!("{}({}) -> {}", self.name, parameters.join(", "), self.returns)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryHelp {
    pub name: String,
    pub functions: Vec<FunctionHelp>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyHelp {
    pub name: String,
    pub returns: String,
    pub help: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityHelp {
    pub kind: String,
    pub help: String,
    pub properties: Vec<PropertyHelp>,
}

/// Every registered function, grouped by category
pub fn function_catalogue(functions: &FunctionRegistry) -> Vec<CategoryHelp> {
    functions
        .list_by_category()
        .into_iter()
        .map(|(category, registrations)| CategoryHelp {
            name: category.to_string(),
            functions: registrations.into_iter().map(FunctionHelp::from_registration).collect(),
        })
        .collect()
}

/// Every entity kind with registered dot references
pub fn entity_catalogue(dot_references: &DotReferenceRegistry) -> Vec<EntityHelp> {
    dot_references
        .entity_types()
        .map(|kind| EntityHelp {
            kind: kind.to_string(),
            help: dot_references.type_help(kind).unwrap_or_default().to_string(),
            properties: dot_references
                .properties(kind)
                .map(|entry| PropertyHelp {
                    name: entry.name().to_string(),
                    returns: entry.return_type().describe(),
                    help: entry.help().to_string(),
                })
                .collect(),
        })
        .collect()
}

/// The complete help document
#[derive(Debug, Clone, Serialize)]
pub struct HelpDocument {
    pub functions: Vec<CategoryHelp>,
    pub entities: Vec<EntityHelp>,
}

impl HelpDocument {
    pub fn new(functions: &FunctionRegistry, dot_references: &DotReferenceRegistry) -> Self {
        Self {
            functions: function_catalogue(functions),
            entities: entity_catalogue(dot_references),
        }
    }

    pub fn for_runtime(runtime: &ProgRuntime) -> Self {
        Self::new(runtime.functions(), runtime.dot_references())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Plain text, wrapped to `width` columns
    pub fn render_text(&self, width: usize) -> String {
        let width = width.max(MIN_WIDTH);
        let mut out = String::new();

        for category in &self.functions {
            let _ = writeln!(out, "== {} ==", category.name);
            for function in &category.functions {
                let _ = writeln!(out, "{}", function.synopsis());
                push_wrapped(&mut out, &function.help, width, INDENT);
                for parameter in function.parameters.iter().filter(|p| !p.help.is_empty()) {
                    let line = format!("{}: {}", parameter.name, parameter.help);
                    push_wrapped(&mut out, &line, width, "      ");
                }
            }
            out.push('\n');
        }

        for entity in &self.entities {
            let _ = writeln!(out, "== {} ==", entity.kind);
            push_wrapped(&mut out, &entity.help, width, INDENT);
            for property in &entity.properties {
                let _ = writeln!(out, "  {} -> {}", property.name, property.returns);
                push_wrapped(&mut out, &property.help, width, "      ");
            }
            out.push('\n');
        }

        out
    }
}

fn push_wrapped(out: &mut String, text: &str, width: usize, indent: &str) {
    for line in wrap(text, width.saturating_sub(indent.len()).max(1)) {
        out.push_str(indent);
        out.push_str(&line);
        out.push('\n');
    }
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;

    fn document() -> HelpDocument {
        let mut functions = FunctionRegistry::new();
        builtins::install(&mut functions).unwrap();
        HelpDocument::new(&functions, &DotReferenceRegistry::new())
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three four", 9), vec!["one two", "three", "four"]);
        assert_eq!(wrap("", 10), Vec::<String>::new());
        assert_eq!(wrap("unbreakable", 4), vec!["unbreakable"]);
    }

    #[test]
    fn test_text_lists_every_overload() {
        let text = document().render_text(60);
        assert!(text.contains("== text =="));
        assert!(text.contains("substring(Text text, Number start) -> Text"));
        assert!(text.contains("substring(Text text, Number start, Number length) -> Text"));
        assert!(text.contains("join(Text Collection texts, Text separator) -> Text"));
        for line in text.lines().filter(|line| line.starts_with(' ')) {
            assert!(line.chars().count() <= 60, "line too long: {}", line);
        }
    }

    #[test]
    fn test_categories_are_sorted() {
        let names: Vec<_> = document().functions.iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["collection", "entity", "logic", "math", "text"]);
    }

    #[test]
    fn test_json_output() {
        let json = document().to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let categories = parsed["functions"].as_array().unwrap();
        assert_eq!(categories.len(), 5);
        assert_eq!(categories[0]["functions"][0]["name"], "average");
        assert_eq!(categories[0]["functions"][0]["parameters"][0]["type"], "Number Collection");
    }
}
