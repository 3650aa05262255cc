//! HTML rendering of stored documents.

use super::component::{Component, Document};
use super::registry::ComponentRegistry;

/// One rendered block: an HTML fragment plus an error marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNode {
    pub html: String,
    /// Set for visibly-marked error nodes (unknown or invalid blocks).
    pub is_error: bool,
}

impl RenderedNode {
    fn node(html: String) -> Self {
        Self {
            html,
            is_error: false,
        }
    }

    fn error(message: &str) -> Self {
        Self {
            html: format!(
                "<div class=\"component-error\">Error: {}</div>",
                escape_html(message)
            ),
            is_error: true,
        }
    }
}

/// Pure read-only renderer mapping documents to visual output.
///
/// Dispatch on the component tag is exhaustive; the unknown/invalid arm lives
/// only here, at the rendering boundary, and degrades a single block to an
/// error node instead of failing the whole page.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'r> {
    registry: &'r ComponentRegistry,
}

impl<'r> Renderer<'r> {
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self { registry }
    }

    /// Render a document into one node per component, lazily, in document
    /// order. Re-rendering the same document always yields the same sequence.
    pub fn render<'a>(
        &'a self,
        document: &'a Document,
    ) -> impl Iterator<Item = RenderedNode> + 'a {
        document.iter().map(move |component| self.render_component(component))
    }

    fn render_component(&self, component: &Component) -> RenderedNode {
        if let Err(err) = self.registry.validate(component) {
            return RenderedNode::error(&err.to_string());
        }
        match component {
            Component::HeroSection {
                title,
                description,
                bg_color,
            } => RenderedNode::node(render_hero(title, description, bg_color)),
            // Deliberate trust boundary: TextBlock markup comes from
            // authenticated editors and is injected verbatim. Sanitization is
            // the editor's responsibility, not the renderer's.
            Component::TextBlock { content } => RenderedNode::node(format!(
                "<div class=\"text-block\">{}</div>",
                content
            )),
            Component::Spacer { height } => RenderedNode::node(format!(
                "<div class=\"spacer\" style=\"height:{}rem\" aria-hidden=\"true\"></div>",
                f64::from(*height) / 4.0
            )),
            // Validation already rejected unknown blocks above; keep a real
            // error node here rather than a panic so the dispatch stays total.
            Component::Unknown(raw) => RenderedNode::error(&format!(
                "unknown component type '{}'",
                raw.type_tag().unwrap_or("<missing type>")
            )),
        }
    }

    /// Render a full visitor-facing HTML page for an assigned document.
    pub fn render_page(&self, page_name: &str, document: &Document) -> String {
        let body: String = self
            .render(document)
            .map(|node| node.html)
            .collect::<Vec<_>>()
            .join("\n");
        page_shell(page_name, &body)
    }
}

fn render_hero(title: &str, description: &str, bg_color: &str) -> String {
    // Hex values become an inline background; anything else is treated as a
    // styling class name, matching what editors type into the bgColor field.
    let (class_attr, style_attr) = if bg_color.starts_with('#') {
        (
            String::from("hero"),
            format!(" style=\"background-color:{}\"", escape_html(bg_color)),
        )
    } else if bg_color.is_empty() {
        (String::from("hero"), String::new())
    } else {
        (format!("hero {}", escape_html(bg_color)), String::new())
    };
    format!(
        "<section class=\"{}\"{}>\n<h1>{}</h1>\n<p>{}</p>\n</section>",
        class_attr,
        style_attr,
        escape_html(title),
        escape_html(description)
    )
}

/// Friendly placeholder page for a tag with no usable content.
pub fn render_unassigned(tag_label: &str) -> String {
    let body = format!(
        "<section class=\"unassigned\">\n<h1>Content Not Assigned</h1>\n<p>The tag <strong>{}</strong> is not linked to a content page.</p>\n<p>Please contact the administrator.</p>\n</section>",
        escape_html(tag_label)
    );
    page_shell("Content Not Assigned", &body)
}

/// Minimal not-found page for an unrecognized tag identifier.
pub fn render_not_found() -> String {
    page_shell(
        "Not Found",
        "<section class=\"unassigned\">\n<h1>Tag Not Found</h1>\n<p>No tag matches this identifier.</p>\n</section>",
    )
}

fn page_shell(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

/// Escape text for safe interpolation into HTML content and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
