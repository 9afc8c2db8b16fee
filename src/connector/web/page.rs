use uuid::Uuid;

use crate::domain::Turn;

/// Banner under the latest exchange.
pub enum Notice<'a> {
    Reply(&'a str),
    Error(&'a str),
}

/// Render the chat page. Without a session the form starts a new one on submit.
pub fn render(session: Option<Uuid>, history: &[Turn], notice: Option<Notice<'_>>) -> String {
    let mut body = String::new();

    body.push_str("<h1>🤣 JokeBot - AI Joke Generator</h1>\n");
    body.push_str("<p>Ask me for a joke about any topic, and I'll make you laugh!</p>\n");

    if !history.is_empty() {
        body.push_str("<ul class=\"history\">\n");
        for turn in history {
            body.push_str(&format!(
                "<li><b>You:</b> {}<br><b>JokeBot:</b> {}</li>\n",
                escape(turn.user()),
                escape(turn.bot())
            ));
        }
        body.push_str("</ul>\n");
    }

    match notice {
        Some(Notice::Reply(text)) => {
            body.push_str(&format!("<div class=\"success\">{}</div>\n", escape(text)));
        }
        Some(Notice::Error(text)) => {
            body.push_str(&format!("<div class=\"error\">{}</div>\n", escape(text)));
        }
        None => {}
    }

    body.push_str("<form method=\"post\" action=\"/\">\n");
    if let Some(session) = session {
        body.push_str(&format!(
            "<input type=\"hidden\" name=\"session\" value=\"{session}\">\n"
        ));
    }
    body.push_str(
        "<label for=\"message\">Enter a joke topic:</label>\n\
         <input id=\"message\" name=\"message\" autofocus autocomplete=\"off\">\n\
         <button type=\"submit\">Send</button>\n\
         </form>\n",
    );
    body.push_str("<footer>Created with ❤️ using Rust &amp; axum</footer>\n");

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>JokeBot 🤖</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto;padding:0 1rem}\
.history{list-style:none;padding:0}.history li{margin:.75rem 0}\
.success{background:#e6f4ea;padding:.75rem;border-radius:.25rem}\
.error{background:#fce8e6;padding:.75rem;border-radius:.25rem}\
footer{margin-top:2rem;color:#666;font-size:.9rem}";

/// Minimal HTML escaping for text nodes and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
