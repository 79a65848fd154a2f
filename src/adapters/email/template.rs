//! HTML rendering of the enhanced-idea email.

use crate::domain::idea::EnhancedIdea;

/// Subject line of the enhanced-idea email.
pub const ENHANCED_IDEA_SUBJECT: &str = "Your Enhanced Website Idea is Ready!";

const STYLE: &str = r#"
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); margin: 0; padding: 40px 20px; }
.container { max-width: 600px; margin: 0 auto; background: #ffffff; border-radius: 24px; overflow: hidden; box-shadow: 0 25px 50px rgba(0,0,0,0.15); }
.header { background: linear-gradient(135deg, #f093fb 0%, #f5576c 100%); padding: 40px; text-align: center; }
.header h1 { color: #ffffff; margin: 0; font-size: 28px; }
.original-idea { background: #f3f4f6; padding: 20px; margin: 24px; border-radius: 12px; border-left: 4px solid #764ba2; }
.original-idea p { margin: 0; color: #4b5563; font-style: italic; }
.section { padding: 0 24px 24px; }
.section h2 { color: #1a1a2e; font-size: 18px; margin-bottom: 12px; }
.section p { color: #4b5563; line-height: 1.6; }
.item-list { padding-left: 24px; }
.item-list li { background: #f9fafb; padding: 12px 16px; border-radius: 8px; margin-bottom: 8px; color: #374151; }
.tech-list li { background: #eff6ff; border: 1px solid #dbeafe; color: #1e40af; }
.footer { text-align: center; padding: 24px; background: #f9fafb; color: #9ca3af; font-size: 14px; }
"#;

/// Renders the email body for `enhanced`, quoting `original`.
///
/// All embedded text is HTML-escaped.
pub fn render_enhanced_idea_email(enhanced: &EnhancedIdea, original: &str) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str("<title>Your Enhanced Idea</title>\n");
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n<div class=\"container\">\n");

    html.push_str("<div class=\"header\"><h1>Your Enhanced Website Idea</h1></div>\n");

    html.push_str(&format!(
        "<div class=\"original-idea\">\n<p><strong>Your Original Idea:</strong></p>\n<p>&quot;{}&quot;</p>\n</div>\n",
        html_escape(original)
    ));

    push_paragraph(&mut html, "Problem Statement", enhanced.problem_statement());
    push_paragraph(&mut html, "Target Audience", enhanced.target_audience());
    push_list(&mut html, "Core Features", "item-list", enhanced.core_features());
    push_list(
        &mut html,
        "Technical Suggestions",
        "item-list tech-list",
        enhanced.technical_suggestions(),
    );
    push_list(&mut html, "Next Steps", "item-list", enhanced.next_steps());

    html.push_str(
        "<div class=\"footer\"><p>Generated by IdeaBoost - Transform your rough ideas into actionable plans</p></div>\n",
    );
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn push_paragraph(html: &mut String, heading: &str, text: &str) {
    html.push_str(&format!(
        "<div class=\"section\">\n<h2>{}</h2>\n<p>{}</p>\n</div>\n",
        heading,
        html_escape(text)
    ));
}

fn push_list(html: &mut String, heading: &str, class: &str, items: &[String]) {
    html.push_str(&format!(
        "<div class=\"section\">\n<h2>{}</h2>\n<ol class=\"{}\">\n",
        heading, class
    ));
    for item in items {
        html.push_str(&format!("<li>{}</li>\n", html_escape(item)));
    }
    html.push_str("</ol>\n</div>\n");
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EnhancedIdea {
        EnhancedIdea::new(
            "Gift cards go unused.",
            "Bargain hunters",
            vec!["Listings".to_string(), "Escrow".to_string()],
            vec!["Rust".to_string()],
            vec!["Validate demand".to_string(), "Ship MVP".to_string()],
        )
    }

    #[test]
    fn html_escape_escapes_special_chars() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(html_escape("it's"), "it&#39;s");
    }

    #[test]
    fn renders_every_section() {
        let html = render_enhanced_idea_email(&sample(), "Trade gift cards");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("&quot;Trade gift cards&quot;"));
        assert!(html.contains("<p>Gift cards go unused.</p>"));
        assert!(html.contains("<p>Bargain hunters</p>"));
        assert!(html.contains("<h2>Core Features</h2>"));
        assert!(html.contains("<h2>Technical Suggestions</h2>"));
        assert!(html.contains("<h2>Next Steps</h2>"));
        assert!(html.contains("Generated by IdeaBoost"));
    }

    #[test]
    fn list_items_are_numbered_in_order() {
        let html = render_enhanced_idea_email(&sample(), "x");

        assert_eq!(html.matches("<ol ").count(), 3);
        let validate = html.find("<li>Validate demand</li>").unwrap();
        let ship = html.find("<li>Ship MVP</li>").unwrap();
        assert!(validate < ship);
    }

    #[test]
    fn user_and_model_text_is_escaped() {
        let enhanced = EnhancedIdea::new(
            "<b>bold</b>",
            "",
            vec!["<img src=x onerror=alert(1)>".to_string()],
            vec![],
            vec![],
        );
        let html = render_enhanced_idea_email(&enhanced, "<script>alert('hi')</script>");

        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert!(!html.contains("<b>bold</b>"));
        assert!(html.contains("&lt;script&gt;alert(&#39;hi&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn items_and_style_end_their_own_lines() {
        let html = render_enhanced_idea_email(&sample(), "x");

        assert!(html.contains("</style>\n</head>"));
        assert!(html.contains("<li>Listings</li>\n<li>Escrow</li>\n</ol>"));
    }

    #[test]
    fn empty_lists_render_empty() {
        let html = render_enhanced_idea_email(&EnhancedIdea::default(), "x");
        assert!(!html.contains("<li>"));
    }
}
