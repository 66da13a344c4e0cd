//! Directive scanning over raw template text.
//!
//! Recognised directives, shown with the default `{%` / `%}` delimiters:
//!
//! ```text
//! {% include "partials/nav.html" %}     reference
//! {% include ['a.html', "b.html"] %}    one reference per entry
//! {% extends 'layout.html' %}           reference
//! {% import "macros.html" as m %}       reference
//! {% define "nav" %}...{% enddefine %}  named block
//! ```
//!
//! Template comments (`{# ... #}`) are removed before scanning, so a directive
//! that is commented out is never followed.

use regex::Regex;

use quill_core::Delimiters;

use crate::error::BuildError;

/// A named block lifted out of its host file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefineBlock {
    pub name: String,
    pub body: String,
}

/// A template's text split into its own body and the blocks it defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedSource {
    pub body: String,
    pub defines: Vec<DefineBlock>,
    /// Reference targets in order of appearance, duplicates kept.
    pub references: Vec<String>,
    /// The subset of `references` marked `ignore missing`.
    pub optional: Vec<String>,
}

/// A Tera string literal in any of its three quote styles.
const STRING: &str = r#""([^"]*)"|'([^']*)'|`([^`]*)`"#;

/// Compiled directive patterns for one delimiter pair.
#[derive(Debug, Clone)]
pub struct DirectiveSyntax {
    comment: Regex,
    string: Regex,
    reference: Regex,
    define_block: Regex,
    define_name: Regex,
}

impl DirectiveSyntax {
    pub fn new(delims: &Delimiters) -> Result<Self, BuildError> {
        let l = regex::escape(&delims.left);
        let r = regex::escape(&delims.right);
        let name = r#"(?:"[^"]+"|'[^']+'|`[^`]+`)"#;
        Ok(Self {
            comment: Regex::new(r"(?s)\{#.*?#\}")?,
            string: Regex::new(STRING)?,
            reference: Regex::new(&format!(
                r#"{l}-?\s*(?:include|extends|import)\s+(\[[^\]]*\]|{name})(\s+ignore\s+missing)?"#
            ))?,
            define_block: Regex::new(&format!(
                r#"(?s){l}-?\s*define\s+({name})\s*-?{r}(.*?){l}-?\s*enddefine\s*-?{r}"#
            ))?,
            define_name: Regex::new(&format!(r#"{l}-?\s*define\s+({name})"#))?,
        })
    }

    /// Split `raw` into body, define blocks and references.
    pub fn scan(&self, raw: &str) -> ScannedSource {
        let text = self.comment.replace_all(raw, "");
        let defines = self
            .define_block
            .captures_iter(&text)
            .map(|c| DefineBlock { name: self.unquote(&c[1]), body: c[2].to_owned() })
            .collect();
        let body = self.define_block.replace_all(&text, "").into_owned();
        let references = self.references(&text);
        let optional = self
            .reference
            .captures_iter(&text)
            .filter(|c| c.get(2).is_some())
            .flat_map(|c| self.strings(&c[1]))
            .collect();
        ScannedSource { body, defines, references, optional }
    }

    /// Reference targets in `raw`, in order of appearance. Every entry of an
    /// include list counts as a reference.
    pub fn references(&self, raw: &str) -> Vec<String> {
        let text = self.comment.replace_all(raw, "");
        self.reference
            .captures_iter(&text)
            .flat_map(|c| self.strings(&c[1]))
            .collect()
    }

    /// Whether `raw` defines a block called `name`.
    pub fn defines(&self, raw: &str, name: &str) -> bool {
        let text = self.comment.replace_all(raw, "");
        self.define_name.captures_iter(&text).any(|c| self.unquote(&c[1]) == name)
    }

    fn strings(&self, literal: &str) -> Vec<String> {
        self.string
            .captures_iter(literal)
            .filter_map(|c| c.get(1).or_else(|| c.get(2)).or_else(|| c.get(3)))
            .map(|m| m.as_str().to_owned())
            .collect()
    }

    fn unquote(&self, literal: &str) -> String {
        self.strings(literal).into_iter().next().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax() -> DirectiveSyntax {
        DirectiveSyntax::new(&Delimiters::default()).unwrap()
    }

    #[test]
    fn finds_all_reference_kinds_in_order() {
        let raw = r#"{% extends "base.html" %}{% import "m.html" as m %}{%- include "nav" -%}"#;
        assert_eq!(syntax().references(raw), vec!["base.html", "m.html", "nav"]);
    }

    #[test]
    fn every_quote_style_is_a_reference() {
        let raw = "{% include 'single.html' %}{% extends `tick.html` %}{% import \"dq.html\" as m %}";
        assert_eq!(syntax().references(raw), vec!["single.html", "tick.html", "dq.html"]);
    }

    #[test]
    fn include_list_yields_each_entry() {
        let raw = r#"{% include ["a.html", 'b.html', `c.html`] ignore missing %}"#;
        assert_eq!(syntax().references(raw), vec!["a.html", "b.html", "c.html"]);
        assert_eq!(syntax().scan(raw).optional, vec!["a.html", "b.html", "c.html"]);
        assert!(syntax().scan(r#"{% include "a.html" %}"#).optional.is_empty());
    }

    #[test]
    fn define_names_accept_every_quote_style() {
        let raw = "{% define 'one' %}1{% enddefine %}{% define `two` %}2{% enddefine %}";
        let scanned = syntax().scan(raw);
        let names: Vec<_> = scanned.defines.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
        assert_eq!(scanned.body, "");
        assert!(syntax().defines(raw, "two"));
    }

    #[test]
    fn commented_directives_are_ignored() {
        let raw = "{# {% include \"old.html\" %} #}{% include \"new.html\" %}";
        assert_eq!(syntax().references(raw), vec!["new.html"]);
    }

    #[test]
    fn define_blocks_are_lifted_out_of_body() {
        let raw = r#"top{% define "nav" %}<nav>{{ x }}</nav>{% enddefine %}bottom"#;
        let scanned = syntax().scan(raw);
        assert_eq!(scanned.body, "topbottom");
        assert_eq!(
            scanned.defines,
            vec![DefineBlock { name: "nav".into(), body: "<nav>{{ x }}</nav>".into() }]
        );
    }

    #[test]
    fn references_inside_define_blocks_are_kept() {
        let raw = r#"{% define "nav" %}{% include "links.html" %}{% enddefine %}"#;
        assert_eq!(syntax().scan(raw).references, vec!["links.html"]);
    }

    #[test]
    fn custom_delimiters_are_escaped() {
        let syntax = DirectiveSyntax::new(&Delimiters { left: "<%".into(), right: "%>".into() })
            .unwrap();
        assert_eq!(syntax.references(r#"<% include "a.tpl" %>"#), vec!["a.tpl"]);
        assert!(syntax.defines(r#"<% define "side" %>x<% enddefine %>"#, "side"));
        assert!(!syntax.defines(r#"<% define "side" %>x<% enddefine %>"#, "nav"));
    }
}
