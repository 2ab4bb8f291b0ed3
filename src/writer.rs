//! Everything that touches the destination site checkout: page files, the
//! navigation tree and the PHP routing tables.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::document::PageDocument;
use crate::error::{MigrateError, Result};
use crate::parser::sanitize::sanitize_strings;

/// `---\n<yaml>---\n`, every string value cleaned first.
pub fn render_front_matter(doc: &PageDocument) -> Result<String> {
    let mut value = serde_yaml::to_value(doc)?;
    sanitize_strings(&mut value);
    let yaml = serde_yaml::to_string(&value)?;
    Ok(format!("---\n{yaml}---\n"))
}

pub fn write_page(dir: &Path, filename: &str, doc: &PageDocument) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| MigrateError::io(dir, e))?;
    let path = dir.join(filename);
    let content = render_front_matter(doc)?;
    std::fs::write(&path, content).map_err(|e| MigrateError::io(&path, e))?;
    Ok(path)
}

fn entry_id(node: &Value) -> Option<&str> {
    node.get("entry").and_then(Value::as_str)
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Key column and id of an `entry: <id>` line, bare or behind a `- `.
fn entry_line(line: &str) -> Option<(usize, &str)> {
    let indent = indent_of(line);
    let rest = &line[indent..];
    let (col, rest) = match rest.strip_prefix('-') {
        Some(after) => {
            let key = after.trim_start();
            (indent + 1 + after.len() - key.len(), key)
        }
        None => (indent, rest),
    };
    let id = rest.strip_prefix("entry:")?.trim();
    Some((col, id.trim_matches(|c| c == '\'' || c == '"')))
}

fn is_item_start(line: &str, col: usize) -> bool {
    indent_of(line) == col && line[col..].starts_with('-')
}

/// First non-blank line at or after `from` matching `stop`, else the end.
fn next_line(lines: &[String], from: usize, stop: impl Fn(&str) -> bool) -> usize {
    (from..lines.len())
        .find(|&i| !lines[i].trim().is_empty() && stop(&lines[i]))
        .unwrap_or(lines.len())
}

/// A tree entry as lines, dash at `col`. `nest` is how far a list sits to
/// the right of its key: 2 for `-` on its own line, 0 for `- entry:`.
fn render_entry(col: usize, nest: usize, id: &str, children: &[String]) -> Vec<String> {
    let pad = " ".repeat(col);
    let mut out = if nest > 0 {
        vec![format!("{pad}-"), format!("{pad}  entry: {id}")]
    } else {
        vec![format!("{pad}- entry: {id}")]
    };
    if !children.is_empty() {
        out.push(format!("{pad}  children:"));
        for child in children {
            out.extend(render_entry(col + 2 + nest, nest, child, &[]));
        }
    }
    out
}

/// The document has a `tree` list holding `anchor`, whose children (if any)
/// form a list.
fn check_tree(tree_yaml: &str, anchor: &str) -> Result<()> {
    let doc: Value = serde_yaml::from_str(tree_yaml)?;
    let tree = doc
        .get("tree")
        .and_then(Value::as_sequence)
        .ok_or_else(|| MigrateError::Tree("document has no `tree` list".into()))?;
    let anchor_node = tree
        .iter()
        .find(|node| entry_id(node) == Some(anchor))
        .ok_or_else(|| MigrateError::Tree(format!("anchor entry {anchor} not found")))?;
    match anchor_node.get("children") {
        None | Some(Value::Null) | Some(Value::Sequence(_)) => Ok(()),
        Some(_) => Err(MigrateError::Tree(format!("children of {anchor} is not a list"))),
    }
}

/// Hang `main_id` (with `child_ids` below it) under the `anchor` entry of a
/// navigation tree. An existing entry for `main_id` is replaced in place;
/// otherwise the new entry becomes the anchor's first child. Only those
/// lines change; the rest of the document is kept as written.
pub fn patch_tree(tree_yaml: &str, anchor: &str, main_id: &str, child_ids: &[String]) -> Result<String> {
    check_tree(tree_yaml, anchor)?;
    let layout = || MigrateError::Tree(format!("cannot locate the children of {anchor}"));
    let mut lines: Vec<String> = tree_yaml.lines().map(str::to_string).collect();

    let (anchor_at, key_col) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| match entry_line(line) {
            Some((col, id)) if id == anchor => Some((i, col)),
            _ => None,
        })
        .ok_or_else(layout)?;
    let nest = if lines[anchor_at].trim_start().starts_with('-') { 0 } else { 2 };
    let anchor_end = next_line(&lines, anchor_at + 1, |l| indent_of(l) < key_col);
    let children_at = (anchor_at + 1..anchor_end)
        .find(|&i| indent_of(&lines[i]) == key_col && lines[i][key_col..].starts_with("children:"));

    let Some(children_at) = children_at else {
        let mut block = vec![format!("{}children:", " ".repeat(key_col))];
        block.extend(render_entry(key_col + nest, nest, main_id, child_ids));
        lines.splice(anchor_end..anchor_end, block);
        return Ok(join_lines(lines, tree_yaml));
    };

    let inline = lines[children_at][key_col + "children:".len()..].trim();
    if !matches!(inline, "" | "[]" | "~" | "null") {
        return Err(layout());
    }
    lines[children_at] = format!("{}children:", " ".repeat(key_col));

    let first = next_line(&lines, children_at + 1, |_| true);
    let item_col = match lines.get(first) {
        Some(l) if indent_of(l) >= key_col && is_item_start(l, indent_of(l)) => indent_of(l),
        _ => key_col + nest,
    };
    let items_end = next_line(&lines, children_at + 1, |l| {
        indent_of(l) < item_col || (indent_of(l) == item_col && !is_item_start(l, item_col))
    });
    let starts: Vec<usize> = (children_at + 1..items_end)
        .filter(|&i| is_item_start(&lines[i], item_col))
        .collect();

    let existing = starts.iter().enumerate().find_map(|(n, &start)| {
        let end = starts.get(n + 1).copied().unwrap_or(items_end);
        (start..end)
            .any(|i| entry_line(&lines[i]) == Some((item_col + 2, main_id)))
            .then_some(start..end)
    });
    let entry = render_entry(item_col, nest, main_id, child_ids);
    match existing {
        Some(span) => {
            lines.splice(span, entry);
        }
        None => {
            let at = starts.first().copied().unwrap_or(children_at + 1);
            lines.splice(at..at, entry);
        }
    }
    Ok(join_lines(lines, tree_yaml))
}

fn join_lines(lines: Vec<String>, original: &str) -> String {
    let mut out = lines.join("\n");
    if original.ends_with('\n') {
        out.push('\n');
    }
    out
}

pub fn patch_tree_file(path: &Path, anchor: &str, main_id: &str, child_ids: &[String]) -> Result<()> {
    let content = std::fs::read_to_string(path).map_err(|e| MigrateError::io(path, e))?;
    let patched = patch_tree(&content, anchor, main_id, child_ids)?;
    std::fs::write(path, patched).map_err(|e| MigrateError::io(path, e))
}

/// `'/old' => '/new'` line body for a redirect table.
pub fn redirect_entry(old_path: &str, new_path: &str) -> String {
    format!("'{old_path}' => '{new_path}'")
}

/// `'/path'` line body for the released-pages list.
pub fn released_entry(path: &str) -> String {
    format!("'{path}'")
}

/// Insert `entries` before the final `];` of a PHP array file, under a dated
/// comment. `None` when the file has no closing `];`.
pub fn append_php_entries(content: &str, entries: &[String], note: &str) -> Option<String> {
    let close = content.rfind("];")?;
    if entries.is_empty() {
        return Some(content.to_string());
    }
    let head = content[..close].trim_end();
    let mut out = String::with_capacity(content.len() + entries.len() * 64);
    out.push_str(head);
    if !head.ends_with(',') && !head.ends_with('[') {
        out.push(',');
    }
    out.push('\n');
    out.push_str(&format!(
        "    // {note} ({})\n",
        chrono::Local::now().format("%Y-%m-%d")
    ));
    for entry in entries {
        out.push_str("    ");
        out.push_str(entry);
        out.push_str(",\n");
    }
    out.push_str(&content[close..]);
    Some(out)
}

pub fn append_php_file(path: &Path, entries: &[String], note: &str) -> Result<()> {
    if entries.is_empty() {
        return Ok(());
    }
    let content = std::fs::read_to_string(path).map_err(|e| MigrateError::io(path, e))?;
    let updated =
        append_php_entries(&content, entries, note).ok_or_else(|| MigrateError::RouteTable(path.to_path_buf()))?;
    std::fs::write(path, updated).map_err(|e| MigrateError::io(path, e))
}
