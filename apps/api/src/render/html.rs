//! HTML fragment for the results region. All dynamic text is escaped.

use std::fmt::Write;

use super::{BannerKind, ResultView, SkillList};

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

fn skill_section(out: &mut String, heading: &str, class: &str, list: &SkillList) {
    let _ = write!(out, r#"<section class="{class}"><h3>{}</h3>"#, escape(heading));
    match list.fallback {
        Some(fallback) => {
            let _ = write!(out, r#"<p class="fallback">{}</p>"#, escape(fallback));
        }
        None => {
            out.push_str("<ol>");
            for skill in &list.items {
                let _ = write!(out, "<li>{}</li>", escape(skill));
            }
            out.push_str("</ol>");
        }
    }
    out.push_str("</section>");
}

pub fn render_result(view: &ResultView) -> String {
    let mut out = String::new();

    let scroll = if view.scroll_into_view { " data-scroll=\"smooth\"" } else { "" };
    let _ = write!(out, r#"<div id="results"{scroll}>"#);

    let banner_class = match view.banner.kind {
        BannerKind::Success => "banner success",
        BannerKind::Warning => "banner warning",
    };
    let _ = write!(
        out,
        r#"<div class="{banner_class}"><strong>{}</strong>"#,
        escape(view.banner.title)
    );
    if !view.banner.notes.is_empty() {
        out.push_str("<ul>");
        for note in &view.banner.notes {
            let _ = write!(
                out,
                "<li><q>{}</q> {}</li>",
                escape(&note.quoted),
                escape(&note.explanation)
            );
        }
        out.push_str("</ul>");
    }
    out.push_str("</div>");

    skill_section(&mut out, "Matched skills", "matched", &view.matched);
    skill_section(&mut out, "Missing skills", "missing", &view.missing);

    out.push_str(r#"<section class="suggestions"><h3>Rewrite suggestions</h3>"#);
    if let Some(fallback) = view.suggestions.fallback {
        let _ = write!(out, r#"<p class="fallback">{}</p>"#, escape(fallback));
    }
    for item in &view.suggestions.items {
        let label = if item.copied { "Copied" } else { "Copy" };
        let _ = write!(
            out,
            r#"<div class="suggestion"><p class="original">{}</p><p class="suggested">{}</p><button data-copy-index="{}">{label}</button></div>"#,
            escape(&item.original),
            escape(&item.suggested),
            item.index
        );
    }
    out.push_str("</section>");

    if let Some(cost) = &view.cost {
        let _ = write!(out, r#"<p class="cost">{}</p>"#, escape(&cost.text()));
    }

    out.push_str("</div>");
    out
}
