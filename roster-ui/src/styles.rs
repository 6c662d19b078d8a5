#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-roster-ui]";

/// Default CSS for the component along with easy-to-override design tokens.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --roster-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --roster-bg: #ffffff;
  --roster-text: #1f2933;
  --roster-muted: #52606d;
  --roster-heading: #11181c;
  --roster-surface: #f8fafc;
  --roster-border: rgba(148, 163, 184, 0.28);
  --roster-radius: 14px;
  --roster-accent: #2563eb;
  --roster-accent-soft: rgba(37, 99, 235, 0.1);
  --roster-row-hover: rgba(148, 163, 184, 0.12);
  --roster-note-bg: rgba(248, 250, 252, 0.9);
}

.roster-root {
  font-family: var(--roster-font-family);
  background: var(--roster-bg);
  color: var(--roster-text);
  border-radius: var(--roster-radius);
  padding: 26px;
  box-shadow: 0 24px 48px rgba(15, 23, 42, 0.1);
}

.roster-header h1 {
  margin: 0;
  color: var(--roster-heading);
  font-size: 1.6rem;
}

.roster-header p {
  margin: 6px 0 20px;
  color: var(--roster-muted);
}

.filter-toolbar {
  display: flex;
  flex-wrap: wrap;
  gap: 16px;
  align-items: flex-end;
  padding: 16px;
  background: var(--roster-surface);
  border: 1px solid var(--roster-border);
  border-radius: var(--roster-radius);
  margin-bottom: 20px;
}

.filter-field {
  display: flex;
  flex-direction: column;
  gap: 6px;
  font-size: 0.85rem;
}

.filter-label {
  font-weight: 600;
  color: var(--roster-muted);
}

.filter-field input,
.filter-field select {
  font: inherit;
  padding: 6px 8px;
  border: 1px solid var(--roster-border);
  border-radius: 8px;
  background: var(--roster-bg);
  color: var(--roster-text);
}

.filter-field select[multiple] {
  min-width: 150px;
  max-width: 250px;
}

.filter-pair {
  display: flex;
  gap: 8px;
}

.reset-button {
  font: inherit;
  padding: 8px 14px;
  border: none;
  border-radius: 8px;
  background: var(--roster-accent);
  color: #ffffff;
  cursor: pointer;
}

.reset-button:hover {
  filter: brightness(1.08);
}

.roster-table {
  width: 100%;
  border-collapse: collapse;
}

.roster-table th,
.roster-table td {
  text-align: left;
  padding: 10px 12px;
  border-bottom: 1px solid var(--roster-border);
}

.roster-table th {
  color: var(--roster-heading);
  font-size: 0.85rem;
  text-transform: uppercase;
  letter-spacing: 0.04em;
}

.roster-table th.sortable {
  cursor: pointer;
  user-select: none;
}

.roster-table tbody tr:hover {
  background: var(--roster-row-hover);
}

.roster-table a {
  color: var(--roster-accent);
  text-decoration: none;
}

.roster-table a:hover {
  text-decoration: underline;
}

.roster-empty {
  text-align: center;
  color: var(--roster-muted);
  padding: 28px 12px;
}

.note-row td {
  background: var(--roster-note-bg);
}

.note-list {
  list-style: none;
  margin: 0;
  padding: 0;
  display: flex;
  flex-direction: column;
  gap: 12px;
}

.note-item {
  border: 1px solid var(--roster-border);
  border-radius: 10px;
  padding: 10px 12px;
  background: var(--roster-bg);
}

.note-time {
  color: var(--roster-muted);
  font-size: 0.8rem;
}

.note-meta {
  display: flex;
  gap: 18px;
  flex-wrap: wrap;
  margin-top: 4px;
  font-size: 0.9rem;
}

.note-text {
  margin: 8px 0 0;
}

.pagination-bar {
  display: flex;
  align-items: center;
  flex-wrap: wrap;
  gap: 14px;
  margin-top: 18px;
  font-size: 0.9rem;
}

.pagination-buttons {
  display: flex;
  gap: 6px;
}

.pagination-buttons button {
  font: inherit;
  min-width: 34px;
  padding: 6px 10px;
  border: 1px solid var(--roster-border);
  border-radius: 8px;
  background: var(--roster-bg);
  color: var(--roster-text);
  cursor: pointer;
}

.pagination-buttons button:hover:enabled {
  background: var(--roster-accent-soft);
}

.pagination-buttons button:disabled {
  opacity: 0.45;
  cursor: default;
}

.pagination-goto {
  display: flex;
  align-items: center;
  gap: 6px;
}

.pagination-goto input {
  font: inherit;
  width: 64px;
  padding: 5px 8px;
  border: 1px solid var(--roster-border);
  border-radius: 8px;
}

.pagination-size {
  font: inherit;
  padding: 6px 8px;
  border: 1px solid var(--roster-border);
  border-radius: 8px;
  background: var(--roster-bg);
}

.pagination-count {
  color: var(--roster-muted);
}

.detail-root .back-link {
  display: inline-block;
  color: var(--roster-accent);
  text-decoration: none;
  margin-bottom: 14px;
}

.detail-root .back-link:hover {
  text-decoration: underline;
}

.detail-root h2 {
  margin: 0 0 12px;
  color: var(--roster-heading);
}

.detail-field {
  margin-bottom: 8px;
}

.detail-notes h3 {
  margin: 20px 0 10px;
  color: var(--roster-heading);
}

.detail-empty {
  color: var(--roster-muted);
}

@media (max-width: 720px) {
  .roster-root {
    padding: 16px;
  }

  .filter-toolbar {
    flex-direction: column;
    align-items: stretch;
  }

  .filter-pair {
    flex-direction: column;
  }

  .pagination-bar {
    flex-direction: column;
    align-items: flex-start;
  }
}
"#;

pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-roster-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
