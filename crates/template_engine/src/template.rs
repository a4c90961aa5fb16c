//! Parsed templates and rendering

use std::collections::BTreeSet;

use crate::context::{Context, Scope};
use crate::parser::{parse, Diagnostic, Node};

/// A parsed template, reusable across renders.
///
/// Rendering is pure: it reads the template and the scope and nothing else.
#[derive(Debug, Clone)]
pub struct Template {
    nodes: Vec<Node>,
    diagnostics: Vec<Diagnostic>,
}

impl Template {
    /// Parse template source. Never fails; see [`Template::diagnostics`].
    pub fn parse(source: &str) -> Self {
        let (nodes, diagnostics) = parse(source);
        if !diagnostics.is_empty() {
            tracing::debug!(count = diagnostics.len(), "template has malformed directives");
        }
        Self { nodes, diagnostics }
    }

    /// Render against a binding scope
    pub fn render<S: Scope + ?Sized>(&self, scope: &S) -> String {
        let mut out = String::new();
        render_nodes(&self.nodes, scope, &mut out);
        out
    }

    /// Problems found in malformed directives, ordered by position
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether the template parsed without diagnostics
    pub fn is_well_formed(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Names used by `{{name}}` and `{{#if name}}`, sorted and deduplicated
    pub fn variables(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        collect_names(&self.nodes, &mut |node| match node {
            Node::Variable(name) | Node::If { name, .. } => {
                names.insert(name.clone());
            }
            _ => {}
        });
        names.into_iter().collect()
    }

    /// Names iterated by `{{#each name}}`, sorted and deduplicated
    pub fn sections(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        collect_names(&self.nodes, &mut |node| {
            if let Node::Each { name, .. } = node {
                names.insert(name.clone());
            }
        });
        names.into_iter().collect()
    }
}

/// Compile a template against a context in one call
pub fn compile(template: &str, context: &Context) -> String {
    tracing::trace!(template_len = template.len(), fields = context.len(), "compiling template");
    Template::parse(template).render(context)
}

fn render_nodes<S: Scope + ?Sized>(nodes: &[Node], scope: &S, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Variable(name) => {
                if let Some(value) = scope.value(name) {
                    value.write_to(out);
                }
            }
            Node::If { name, body } => {
                if scope.is_truthy(name) {
                    render_nodes(body, scope, out);
                }
            }
            Node::Each { name, body } => {
                // Items are self-contained: the body sees only the item's fields
                for item in scope.list(name).unwrap_or_default() {
                    render_nodes(body, item, out);
                }
            }
        }
    }
}

fn collect_names(nodes: &[Node], visit: &mut impl FnMut(&Node)) {
    for node in nodes {
        visit(node);
        if let Node::If { body, .. } | Node::Each { body, .. } = node {
            collect_names(body, visit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;

    fn item(name: &str, flag: bool) -> Record {
        let mut record = Record::new();
        record.insert("name".into(), name.into());
        record.insert("flag".into(), flag.into());
        record
    }

    #[test]
    fn test_parse_once_render_many() {
        let template = Template::parse("{{#if vip}}VIP {{/if}}{{name}}");
        let a = Context::new().with("name", "Ana").with("vip", true);
        let b = Context::new().with("name", "Bruno");
        assert_eq!(template.render(&a), "VIP Ana");
        assert_eq!(template.render(&b), "Bruno");
    }

    #[test]
    fn test_render_against_record() {
        let template = Template::parse("{{name}}{{#if flag}}!{{/if}}");
        assert_eq!(template.render(&item("A", true)), "A!");
    }

    #[test]
    fn test_variables_and_sections() {
        let template = Template::parse(
            "{{companyName}}{{#each items}}{{name}}{{#if flag}}{{/if}}{{/each}}{{#if hasSpecs}}{{companyName}}{{/if}}",
        );
        assert_eq!(template.variables(), vec!["companyName", "flag", "hasSpecs", "name"]);
        assert_eq!(template.sections(), vec!["items"]);
        assert!(template.is_well_formed());
    }

    #[test]
    fn test_list_as_variable_renders_empty() {
        let ctx = Context::new().with_list("items", vec![item("A", true)]);
        assert_eq!(compile("[{{items}}]", &ctx), "[]");
    }

    #[test]
    fn test_each_over_scalar_renders_nothing() {
        let ctx = Context::new().with("items", "not a list");
        assert_eq!(compile("{{#each items}}X{{/each}}", &ctx), "");
    }

    #[test]
    fn test_nested_each_inside_item_renders_nothing() {
        let ctx = Context::new().with_list("items", vec![item("A", true)]);
        assert_eq!(
            compile("{{#each items}}<{{#each items}}Y{{/each}}>{{/each}}", &ctx),
            "<>"
        );
    }

    #[test]
    fn test_each_inside_top_level_if() {
        let ctx = Context::new()
            .with("show", true)
            .with_list("items", vec![item("A", false), item("B", false)]);
        assert_eq!(
            compile("{{#if show}}{{#each items}}{{name}}{{/each}}{{/if}}", &ctx),
            "AB"
        );
        assert_eq!(
            compile("{{#if items}}has items{{/if}}", &Context::new().with_list("items", vec![])),
            ""
        );
    }
}
