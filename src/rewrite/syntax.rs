//! Tree-sitter backed [`SourceParser`].
//!
//! `.ts`, `.mts` and `.cts` files use the TypeScript grammar; everything else
//! (including plain JS and JSX) uses the TSX grammar. Tree-sitter recovers
//! from syntax errors, so a damaged file still yields the declarations around
//! the damage. Declarations that contain an error node are never offered for
//! removal.

use super::{BindingSite, ParseError, SourceParser};
use std::ops::Range;
use std::path::Path;
use tracing::debug;
use tree_sitter::{Language, Node, Parser};

/// Default [`SourceParser`], built on `tree-sitter-typescript`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterParser;

fn grammar_for(file_name: &str) -> (&'static str, Language) {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    match extension {
        "ts" | "mts" | "cts" => (
            "typescript",
            Language::new(tree_sitter_typescript::LANGUAGE_TYPESCRIPT),
        ),
        _ => ("tsx", Language::new(tree_sitter_typescript::LANGUAGE_TSX)),
    }
}

impl SourceParser for TreeSitterParser {
    fn top_level_bindings(
        &self,
        source: &str,
        file_name: &str,
    ) -> Result<Vec<BindingSite>, ParseError> {
        let (grammar, language) = grammar_for(file_name);
        let mut parser = Parser::new();
        parser.set_language(&language).map_err(|err| {
            ParseError::new(file_name, format!("cannot load the {grammar} grammar: {err}"))
        })?;
        let tree = parser.parse(source, None).ok_or_else(|| {
            ParseError::new(file_name, format!("the {grammar} parser returned no tree"))
        })?;

        let root = tree.root_node();
        if root.has_error() {
            debug!(file = file_name, grammar, "source has syntax errors");
        }

        let mut sites = Vec::new();
        let mut cursor = root.walk();
        for statement in root.named_children(&mut cursor) {
            let Some(declaration) = variable_declaration(statement) else {
                continue;
            };
            if declaration.has_error() {
                continue;
            }
            collect_sites(source, statement, declaration, &mut sites);
        }
        Ok(sites)
    }
}

/// The `const`/`let`/`var` declaration a top-level statement carries, looking
/// through `export` and `declare`.
fn variable_declaration<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    match node.kind() {
        "lexical_declaration" | "variable_declaration" => Some(node),
        "export_statement" => node
            .child_by_field_name("declaration")
            .and_then(variable_declaration),
        "ambient_declaration" => {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .find(|child| matches!(child.kind(), "lexical_declaration" | "variable_declaration"));
            inner
        }
        _ => None,
    }
}

fn collect_sites(
    source: &str,
    statement: Node<'_>,
    declaration: Node<'_>,
    sites: &mut Vec<BindingSite>,
) {
    let mut cursor = declaration.walk();
    let declarators: Vec<Node<'_>> = declaration
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "variable_declarator")
        .collect();

    for (position, declarator) in declarators.iter().enumerate() {
        // Destructuring patterns bind no single name.
        let Some(name) = declarator
            .child_by_field_name("name")
            .filter(|name| name.kind() == "identifier")
            .and_then(|name| name.utf8_text(source.as_bytes()).ok())
        else {
            continue;
        };
        let removal = if declarators.len() == 1 {
            statement_removal(source, statement)
        } else if position + 1 < declarators.len() {
            declarator.start_byte()..declarators[position + 1].start_byte()
        } else {
            declarators[position - 1].end_byte()..declarator.end_byte()
        };
        sites.push(BindingSite {
            name: name.to_string(),
            removal,
        });
    }
}

/// Range removing a whole statement with its attached doc comment, trailing
/// same-line comment, line break and surplus blank lines.
fn statement_removal(src: &str, statement: Node<'_>) -> Range<usize> {
    let mut start = statement.start_byte();
    let span = &src[start..statement.end_byte()];
    let mut end = start + span.trim_end().len();

    if let Some(doc) = statement
        .prev_named_sibling()
        .filter(|node| node.kind() == "comment")
    {
        let gap = &src[doc.end_byte()..start];
        if src[doc.start_byte()..doc.end_byte()].starts_with("/**")
            && gap.trim().is_empty()
            && gap.matches('\n').count() <= 1
        {
            start = doc.start_byte();
        }
    }

    end += leading_blanks(&src[end..]);
    if src[end..].starts_with("//") {
        end += src[end..].find('\n').unwrap_or(src.len() - end);
    }
    let line_break = if src[end..].starts_with("\r\n") {
        2
    } else if src[end..].starts_with('\n') {
        1
    } else {
        0
    };
    if line_break == 0 && end < src.len() {
        // Other code follows on the same line; only drop the statement.
        return start..end;
    }
    end += line_break;

    let line_start = src[..start].rfind('\n').map_or(0, |pos| pos + 1);
    if src[line_start..start].trim().is_empty() {
        start = line_start;
        let preceded_by_blank =
            start == 0 || src[..start].ends_with("\n\n") || src[..start].ends_with("\n\r\n");
        if preceded_by_blank {
            while let Some(line_len) = blank_line_len(&src[end..]) {
                end += line_len;
            }
        }
    }
    start..end
}

fn leading_blanks(text: &str) -> usize {
    text.len() - text.trim_start_matches([' ', '\t']).len()
}

/// Length of the first line (including its `\n`) when it is blank.
fn blank_line_len(text: &str) -> Option<usize> {
    let newline = text.find('\n')?;
    text[..newline].trim().is_empty().then_some(newline + 1)
}
