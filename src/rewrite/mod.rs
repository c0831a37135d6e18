//! Source rewriting for registry files.
//!
//! Registry sources carry a few top-level bindings (`description`,
//! `iframeHeight`, `containerClassName`) that only matter to the docs site's
//! previews. [`SourceRewriter`] strips them before the source is published.
//! Parsing is delegated to a [`SourceParser`]; the rewriter removes one
//! matching binding at a time and re-parses, so the result never depends on
//! offsets computed against text that has since changed.

mod syntax;

pub use syntax::TreeSitterParser;

use std::ops::Range;
use thiserror::Error;
use tracing::trace;

/// Top-level bindings removed from every catalogued source file.
pub const SENTINEL_BINDINGS: &[&str] = &["iframeHeight", "containerClassName", "description"];

/// A top-level variable declarator and the byte range that removes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingSite {
    pub name: String,
    pub removal: Range<usize>,
}

/// Parser capability used by the rewriter.
pub trait SourceParser {
    /// List the top-level variable bindings of `source`, in source order.
    fn top_level_bindings(
        &self,
        source: &str,
        file_name: &str,
    ) -> Result<Vec<BindingSite>, ParseError>;
}

/// The parser could not produce a syntax tree for a file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}: {message}")]
pub struct ParseError {
    pub file: String,
    pub message: String,
}

impl ParseError {
    pub fn new(file: &str, message: impl Into<String>) -> Self {
        Self {
            file: file.to_string(),
            message: message.into(),
        }
    }
}

/// Removes named top-level bindings from source text.
pub struct SourceRewriter {
    parser: Box<dyn SourceParser + Send + Sync>,
    bindings: Vec<String>,
}

impl Default for SourceRewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceRewriter {
    /// Rewriter for the sentinel bindings using the tree-sitter grammars.
    pub fn new() -> Self {
        Self::with_parser(TreeSitterParser, SENTINEL_BINDINGS)
    }

    pub fn with_parser(
        parser: impl SourceParser + Send + Sync + 'static,
        bindings: &[&str],
    ) -> Self {
        Self {
            parser: Box::new(parser),
            bindings: bindings.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn bindings(&self) -> &[String] {
        &self.bindings
    }

    /// Return `source` without the configured bindings. Absent bindings leave
    /// the text untouched.
    pub fn rewrite(&self, source: &str, file_name: &str) -> Result<String, ParseError> {
        let mut text = source.to_string();
        loop {
            let sites = self.parser.top_level_bindings(&text, file_name)?;
            let Some(site) = sites
                .into_iter()
                .find(|site| self.bindings.iter().any(|name| *name == site.name))
            else {
                return Ok(text);
            };
            if site.removal.is_empty() || site.removal.end > text.len() {
                return Ok(text);
            }
            trace!(file = file_name, binding = %site.name, "removing binding");
            text.replace_range(site.removal, "");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rewrite(src: &str, file: &str) -> String {
        SourceRewriter::new().rewrite(src, file).unwrap()
    }

    #[test]
    fn strips_exported_description() {
        assert_eq!(
            rewrite(
                "export const description = 'x'\nexport function useFoo() {}",
                "hooks/use-foo.ts"
            ),
            "export function useFoo() {}"
        );
    }

    #[test]
    fn strips_every_sentinel_and_keeps_the_rest() {
        let src = r#"import * as React from "react"

export const description = "A debounced value."

export const iframeHeight = "600px"
export const containerClassName = "w-full"

export function useDebounce<T>(value: T, delay = 500): T {
  const description = "kept: not top level"
  return value
}
"#;
        let expected = r#"import * as React from "react"

export function useDebounce<T>(value: T, delay = 500): T {
  const description = "kept: not top level"
  return value
}
"#;
        assert_eq!(rewrite(src, "hooks/use-debounce.ts"), expected);
    }

    #[test]
    fn rewriting_is_idempotent() {
        let src = "/** Shown in docs. */\nexport const description = `multi\nline`;\nconst iframeHeight = 1, keep = 2\nexport default keep\n";
        let once = rewrite(src, "a.ts");
        assert_eq!(once, "const keep = 2\nexport default keep\n");
        assert_eq!(rewrite(&once, "a.ts"), once);
    }

    #[test]
    fn absent_bindings_are_a_no_op() {
        let src = "export function useToggle() {\n  return [on, toggle] as const\n}\n";
        assert_eq!(rewrite(src, "hooks/use-toggle.ts"), src);
    }

    #[test]
    fn handles_jsx_sources() {
        let src = "export const description = \"Card\"\n\nexport default function Page() {\n  return <p>Don't {\"panic\"}</p>\n}\n";
        assert_eq!(
            rewrite(src, "app/page.tsx"),
            "export default function Page() {\n  return <p>Don't {\"panic\"}</p>\n}\n"
        );
    }

    #[test]
    fn exact_names_only() {
        let src = "export const descriptionText = 'x'\nexport const Description = 'y'\n";
        assert_eq!(rewrite(src, "a.ts"), src);
    }

    #[test]
    fn custom_binding_lists_are_honoured() {
        let rewriter = SourceRewriter::with_parser(TreeSitterParser, &["meta"]);
        assert_eq!(
            rewriter.rewrite("const meta = 1\nconst description = 2\n", "a.ts").unwrap(),
            "const description = 2\n"
        );
    }

    #[test]
    fn generic_type_arguments_in_initializers() {
        assert_eq!(
            rewrite(
                "export const description = new Map<string, number>()\nexport function useFoo() {}\n",
                "hooks/use-foo.ts"
            ),
            "export function useFoo() {}\n"
        );
    }

    #[test]
    fn keyword_properties_before_division() {
        let src = "export const description = 'Halves a value.'\nconst half = config.default / 2\nexport const twice = half * 4 / 2\n";
        assert_eq!(
            rewrite(src, "hooks/use-half.ts"),
            "const half = config.default / 2\nexport const twice = half * 4 / 2\n"
        );
    }

    #[test]
    fn tsx_generic_arrows_with_defaults() {
        let src = "export const description = 'x'\nexport const useThing = <T = unknown,>(v: T) => v\n";
        assert_eq!(
            rewrite(src, "hooks/use-thing.tsx"),
            "export const useThing = <T = unknown,>(v: T) => v\n"
        );
    }

    #[test]
    fn malformed_sources_are_left_alone() {
        let src = "export const value = `never closed\n";
        assert_eq!(rewrite(src, "hooks/use-broken.ts"), src);
    }

    struct Unavailable;

    impl SourceParser for Unavailable {
        fn top_level_bindings(
            &self,
            _source: &str,
            file_name: &str,
        ) -> Result<Vec<BindingSite>, ParseError> {
            Err(ParseError::new(file_name, "grammar unavailable"))
        }
    }

    #[test]
    fn parser_failures_name_the_file() {
        let err = SourceRewriter::with_parser(Unavailable, SENTINEL_BINDINGS)
            .rewrite("const a = 1\n", "hooks/a.ts")
            .unwrap_err();
        assert_eq!(err.to_string(), "hooks/a.ts: grammar unavailable");
    }
}
