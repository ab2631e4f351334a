use markdown::mdast::Node;
use markdown::{Options, ParseOptions};

pub struct MarkdownRenderer {}

impl MarkdownRenderer {
    /// Renders a trusted markdown body to HTML. HTML comments, including the
    /// `<!-- more -->` break, never reach the output.
    pub fn render(md_text: &str) -> Result<String, String> {
        let buf = remove_comments(md_text)?;
        markdown::to_html_with_options(buf.as_str(), &Options::gfm())
            .map_err(|e| e.reason.to_string())
    }
}

/// Text a reader actually reads: markdown syntax, HTML and comments are
/// dropped, block boundaries become line breaks.
pub fn plain_text(md_text: &str) -> Result<String, String> {
    let buf = remove_comments(md_text)?;
    let root = markdown::to_mdast(buf.as_str(), &ParseOptions::gfm())
        .map_err(|e| e.reason.to_string())?;

    let mut text = String::new();
    collect_text(&root, &mut text);
    Ok(text)
}

fn collect_text(node: &Node, text: &mut String) {
    match node {
        Node::Text(t) => text.push_str(&t.value),
        Node::InlineCode(c) => text.push_str(&c.value),
        Node::Code(c) => text.push_str(&c.value),
        Node::Break(_) => text.push('\n'),
        _ => {}
    }

    if let Some(children) = node.children() {
        for child in children {
            collect_text(child, text);
        }
    }

    if matches!(node, Node::Paragraph(_) | Node::Heading(_) | Node::TableCell(_) | Node::Code(_)) {
        text.push('\n');
    }
}

pub fn remove_comments(md_post: &str) -> Result<String, String> {
    let mut res: String = String::new();
    let mut slice = Some(md_post);

    let start_comment = "<!--";
    let end_comment = "-->";

    while let Some(block) = slice {
        let md_buf: &str = match block.find(start_comment) {
            Some(start) => {
                let to_render: &str = &block[0..start];

                let next: &str = &block[(start + start_comment.len())..];
                match next.find(end_comment) {
                    Some(end) => {
                        slice = Some(&next[(end + end_comment.len())..]);
                    }
                    None => return Err("Error finding end of comment".to_string()),
                };

                to_render
            }
            None => {
                slice = None;
                block
            }
        };
        res.push_str(md_buf);
    }

    Ok(res)
}
