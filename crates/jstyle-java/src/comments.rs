//! Comment collection from tree-sitter syntax trees.

use crate::convert::position;
use jstyle_core::{CommentSpan, FileContents};
use tree_sitter::Node as SyntaxNode;

/// Every line and block comment under `root`, in document order.
pub(crate) fn collect(root: SyntaxNode<'_>, contents: &FileContents) -> Vec<CommentSpan> {
    let source = contents.text();
    let mut comments = Vec::new();
    let mut cursor = root.walk();

    loop {
        let node = cursor.node();
        let kind = node.kind();
        if kind == "line_comment" || kind == "block_comment" {
            let text = source
                .get(node.start_byte()..node.end_byte())
                .unwrap_or_default();
            let (line, column) = position(contents, node.start_position());
            comments.push(if kind == "line_comment" {
                CommentSpan::line(line, column, text.trim_end_matches('\r'))
            } else {
                CommentSpan::block(line, column, text)
            });
        }

        if cursor.goto_first_child() || cursor.goto_next_sibling() {
            continue;
        }
        loop {
            if !cursor.goto_parent() {
                return comments;
            }
            if cursor.goto_next_sibling() {
                break;
            }
        }
    }
}
