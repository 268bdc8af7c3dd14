//! HTML rendering of comments.

use html_escape::encode_text;
use threadsim_core::Comment;

/// Render one comment card, without replies.
///
/// `depth` is 0 for top-level comments and 1 for replies.
#[must_use]
pub fn render_comment(comment: &Comment, depth: usize) -> String {
    format!(
        "<div class=\"bg-white p-4 rounded shadow mb-4 ml-{indent}\">\
         <div class=\"flex items-center justify-between\">\
         <span class=\"font-semibold text-blue-700\">{author}</span>\
         <span class=\"text-sm text-gray-500\">{label}</span>\
         </div>\
         <p class=\"mt-2 text-gray-800 whitespace-pre-wrap\">{text}</p>\
         </div>",
        indent = depth * 6,
        author = encode_text(&comment.author),
        label = encode_text(&comment.label),
        text = encode_text(&comment.text),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_escapes_markup() {
        let comment = Comment::new("meta_snarky", "meta", "<script>alert('x')</script> & more");
        let html = render_comment(&comment, 0);
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; more"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(">meta_snarky</span>"));
    }

    #[test]
    fn test_render_indents_replies() {
        let comment = Comment::new("CuriousCat", "reply", "same");
        assert!(render_comment(&comment, 0).contains("ml-0"));
        assert!(render_comment(&comment, 1).contains("ml-6"));
    }
}
