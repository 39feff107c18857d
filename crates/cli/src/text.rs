//! Plain-text rendering of the render model, for terminals.

use portfolio_forms::{Field, FormAssistant};
use portfolio_search::{MARK_CLOSE, MARK_OPEN};
use portfolio_view::{Progress, RenderedView, RowView, ThemeToggle, ViewFlavor};
use std::fmt::Write;

pub fn view(view: &RenderedView) -> String {
    let mut out = String::new();
    if !view.chips.is_empty() {
        let chips: Vec<String> = view
            .chips
            .iter()
            .map(|c| if c.pressed { format!("[{}]", c.tag) } else { c.tag.clone() })
            .collect();
        let _ = writeln!(out, "Tags: {}", chips.join("  "));
    }
    for group in &view.groups {
        let _ = writeln!(out, "{}", group.title);
        if let Some(message) = group.empty_message {
            let _ = writeln!(out, "  {message}");
        }
        for row in &group.rows {
            row_line(&mut out, view.flavor, row);
        }
    }
    out.trim_end().to_string()
}

fn row_line(out: &mut String, flavor: ViewFlavor, row: &RowView) {
    match flavor {
        ViewFlavor::Checklist => {
            let mark = if row.complete { "x" } else { " " };
            let _ = writeln!(out, "  [{mark}] {:<8} {}", row.entry_id, row.text);
        }
        ViewFlavor::Resources => {
            let _ = writeln!(out, "  - {} <{}>", emphasize(&row.text_html), row.link);
            if let Some(description) = &row.description_html {
                let _ = writeln!(out, "    {}", emphasize(description));
            }
            if !row.tags.is_empty() {
                let _ = writeln!(out, "    tags: {}", row.tags.join(", "));
            }
        }
    }
}

/// `<mark>` spans become `*…*` on a terminal.
fn emphasize(marked: &str) -> String {
    marked.replace(MARK_OPEN, "*").replace(MARK_CLOSE, "*")
}

pub fn progress(progress: Option<Progress>) -> String {
    match progress {
        Some(progress) => progress.label(),
        None => "No steps to count.".to_string(),
    }
}

pub fn theme(toggle: &ThemeToggle) -> String {
    let source = if toggle.stored().is_some() { "saved" } else { "system" };
    format!(
        "Theme: {} ({source})\nButton: {}",
        toggle.current().as_str(),
        toggle.button_label()
    )
}

pub fn form(assistant: &FormAssistant) -> String {
    let mut out = String::new();
    for field in Field::ALL {
        let flag = if assistant.is_invalid(field) { " (!)" } else { "" };
        let _ = writeln!(out, "{:<8}{}{flag}", format!("{field}:"), assistant.values().get(field));
    }
    let _ = writeln!(out, "{}", assistant.char_count());
    if !assistant.errors().is_empty() {
        let _ = writeln!(out, "Please fix the following:");
        for message in assistant.errors() {
            let _ = writeln!(out, "  - {}", message.text());
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_catalog::Catalog;
    use portfolio_protocol::{CatalogEntry, Group};
    use portfolio_search::FilterState;
    use portfolio_store::KvStore;
    use portfolio_view::project;
    use std::rc::Rc;

    #[test]
    fn resource_matches_are_starred() {
        let catalog = Catalog::new(
            vec![Group::new("resources", "All resources")],
            vec![CatalogEntry::new("mdn-html", "resources", "MDN — HTML", "https://mdn.example")
                .with_description("Authoritative HTML documentation.")],
        )
        .unwrap();
        let mut state = FilterState::load(Rc::new(catalog), KvStore::in_memory());
        state.set_query("html");
        let text = view(&project(&state, ViewFlavor::Resources));
        assert!(text.contains("  - MDN — *HTML* <https://mdn.example>"), "{text}");
        assert!(text.contains("    Authoritative *HTML* documentation."), "{text}");
    }
}
