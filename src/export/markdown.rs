//! Markdown flattening for plain-text export.
//!
//! Note content is parsed with comrak and reduced to a list of text lines:
//! headings and paragraphs become single lines followed by a blank line,
//! list items get a `- ` prefix (indented per nesting level), and code
//! blocks are kept line by line.

use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, Options};

const INDENT: &str = "  ";

/// Flatten markdown into display lines, without trailing blank lines.
#[must_use]
pub fn markdown_to_lines(markdown: &str) -> Vec<String> {
    let arena = Arena::new();
    let options = Options::default();
    let root = parse_document(&arena, markdown, &options);

    let mut lines = Vec::new();
    for node in root.children() {
        push_block(node, 0, &mut lines);
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

fn push_block<'a>(node: &'a AstNode<'a>, depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    match &node.data.borrow().value {
        NodeValue::Heading(_) | NodeValue::Paragraph => {
            lines.push(format!("{indent}{}", inline_text(node)));
            if depth == 0 {
                lines.push(String::new());
            }
        }
        NodeValue::CodeBlock(block) => {
            for line in block.literal.lines() {
                lines.push(format!("{indent}{line}"));
            }
            if depth == 0 {
                lines.push(String::new());
            }
        }
        NodeValue::List(_) => {
            for item in node.children() {
                push_block(item, depth, lines);
            }
            if depth == 0 {
                lines.push(String::new());
            }
        }
        NodeValue::Item(_) => push_item(node, depth, lines),
        NodeValue::ThematicBreak => lines.push(String::new()),
        _ => {
            for child in node.children() {
                push_block(child, depth, lines);
            }
        }
    }
}

/// A list item: its leading paragraph carries the bullet, anything after it
/// (nested lists, extra paragraphs) is indented one level deeper.
fn push_item<'a>(node: &'a AstNode<'a>, depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    let mut children = node.children().peekable();

    let leading = children
        .peek()
        .filter(|child| matches!(child.data.borrow().value, NodeValue::Paragraph))
        .map(|child| inline_text(*child));
    match leading {
        Some(text) => {
            lines.push(format!("{indent}- {text}"));
            children.next();
        }
        None => lines.push(format!("{indent}-")),
    }

    for child in children {
        push_block(child, depth + 1, lines);
    }
}

fn inline_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    collect_inline(node, &mut text);
    text.trim().to_string()
}

fn collect_inline<'a>(node: &'a AstNode<'a>, out: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(t) => out.push_str(t),
        NodeValue::Code(c) => out.push_str(&c.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
        _ => {
            for child in node.children() {
                collect_inline(child, out);
            }
        }
    }
}

/// Greedily wrap a line at word boundaries to at most `width` characters.
///
/// Words longer than `width` are split. Leading spaces are kept on the first
/// piece only.
#[must_use]
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 || line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut wrapped = Vec::new();
    let mut current: String = line
        .chars()
        .take_while(|c| *c == ' ')
        .take(width / 2)
        .collect();
    let mut current_len = current.len();

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        let needs_space = current_len > 0 && !current.ends_with(' ');
        let extra = usize::from(needs_space);
        if current_len + extra + word.len() > width && !current.trim().is_empty() {
            wrapped.push(std::mem::take(&mut current));
            current_len = 0;
        } else if needs_space {
            current.push(' ');
            current_len += 1;
        }

        while current_len + word.len() > width {
            let take = width - current_len;
            let rest = word.split_off(take);
            current.extend(word);
            wrapped.push(std::mem::take(&mut current));
            current_len = 0;
            word = rest;
        }
        current_len += word.len();
        current.extend(word);
    }

    if !current.trim().is_empty() || wrapped.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_paragraphs() {
        let lines = markdown_to_lines("# Cells\n\nCells are the *basic* unit\nof life.\n");
        assert_eq!(lines, vec!["Cells", "", "Cells are the basic unit of life."]);
    }

    #[test]
    fn test_lists_are_bulleted() {
        let lines = markdown_to_lines("- Nucleus\n- Mitochondria\n  - ATP\n");
        assert_eq!(lines, vec!["- Nucleus", "- Mitochondria", "  - ATP"]);
    }

    #[test]
    fn test_code_blocks_keep_lines() {
        let lines = markdown_to_lines("```\nfn main() {}\nlet x = 1;\n```\n");
        assert_eq!(lines, vec!["fn main() {}", "let x = 1;"]);
    }

    #[test]
    fn test_inline_code_kept() {
        let lines = markdown_to_lines("Use `Vec::new` here.");
        assert_eq!(lines, vec!["Use Vec::new here."]);
    }

    #[test]
    fn test_empty_markdown() {
        assert!(markdown_to_lines("").is_empty());
    }

    #[test]
    fn test_wrap_short_line_untouched() {
        assert_eq!(wrap_line("short", 10), vec!["short"]);
        assert_eq!(wrap_line("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_at_word_boundary() {
        assert_eq!(
            wrap_line("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap_line("abcdefghijkl", 5), vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn test_wrap_never_exceeds_width() {
        let line = "Photosynthesis converts light energy into chemical energy stored in glucose molecules".repeat(3);
        for piece in wrap_line(&line, 20) {
            assert!(piece.chars().count() <= 20, "{piece:?}");
        }
    }
}
