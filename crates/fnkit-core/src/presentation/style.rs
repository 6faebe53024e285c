//! Small text-layout helpers shared by the renderers

use colored::Colorize;
use comfy_table::{presets::NOTHING, Table};
use console::measure_text_width;

/// `name | link`, with the link dimmed
pub fn terminal_link(name: &str, link: &str) -> String {
    format!("{} {}", name, format!("| {}", link).dimmed())
}

/// Headerless, borderless columns, one row per entry
pub fn columns<R, C>(rows: R) -> String
where
    R: IntoIterator<Item = Vec<C>>,
    C: Into<String>,
{
    let mut table = Table::new();
    table.load_preset(NOTHING);
    for row in rows {
        table.add_row(row.into_iter().map(Into::into).collect::<Vec<String>>());
    }
    for column in table.column_iter_mut() {
        column.set_padding((0, 2));
    }
    table
        .lines()
        .map(|line| line.trim_end().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Draw a single-line box around `content`
pub fn boxed(content: &str, supports_unicode: bool) -> String {
    let (tl, tr, bl, br, h, v) = if supports_unicode {
        ('┌', '┐', '└', '┘', '─', '│')
    } else {
        ('+', '+', '+', '+', '-', '|')
    };

    let lines: Vec<&str> = content.lines().collect();
    let inner = lines.iter().map(|l| measure_text_width(l)).max().unwrap_or(0) + 4;
    let horizontal: String = std::iter::repeat(h).take(inner).collect();
    let blank = format!("{}{}{}", v, " ".repeat(inner), v);

    let mut out = Vec::with_capacity(lines.len() + 4);
    out.push(format!("{}{}{}", tl, horizontal, tr));
    out.push(blank.clone());
    for line in lines {
        let pad = inner - 2 - measure_text_width(line);
        out.push(format!("{}  {}{}{}", v, line, " ".repeat(pad), v));
    }
    out.push(blank);
    out.push(format!("{}{}{}", bl, horizontal, br));
    out.join("\n")
}

/// Tree branch glyph for item `idx` of `len`
pub fn branch(idx: usize, len: usize, supports_unicode: bool) -> &'static str {
    match (idx + 1 == len, supports_unicode) {
        (true, true) => "└──",
        (false, true) => "├──",
        (true, false) => "`--",
        (false, false) => "|--",
    }
}

pub fn warning_symbol(supports_emoji: bool) -> &'static str {
    if supports_emoji {
        "⚠"
    } else {
        "‼"
    }
}
