//! HTML rendering of a [`Page`]: title, sidebar navigation and widget body.
//!
//! The output is self-contained apart from the Plotly script used to draw
//! charts. Every database-provided string passes through [`html_escape`].

use crate::charts::Chart;
use crate::frame::Frame;
use crate::page::{Choice, Page, Section, Widget, INTRO, TITLE};

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

pub fn render_page(page: &Page) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - {section}</title>
    <style>{css}</style>
    <script src="{plotly}"></script>
</head>
<body>
    {sidebar}
    <main>
        <h1>{title}</h1>
        <p class="intro">{intro}</p>
        {body}
    </main>
</body>
</html>"#,
        title = TITLE,
        section = page.section.label(),
        css = inline_css(),
        plotly = PLOTLY_SRC,
        sidebar = render_sidebar(page.section),
        intro = html_escape(INTRO),
        body = render_body(page),
    )
}

fn render_sidebar(active: Section) -> String {
    let links: String = Section::ALL
        .iter()
        .map(|section| {
            let class = if *section == active { " class=\"active\"" } else { "" };
            format!(
                r#"<li><a href="{path}"{class}>{label}</a></li>"#,
                path = section.path(),
                class = class,
                label = section.label(),
            )
        })
        .collect();
    format!(r#"<nav><h2>Navigation</h2><ul>{}</ul></nav>"#, links)
}

fn is_input(widget: &Widget) -> bool {
    matches!(widget, Widget::Select { .. } | Widget::DateInput { .. })
}

// Consecutive inputs share one GET form so they submit together.
fn render_body(page: &Page) -> String {
    let mut out = String::new();
    let mut form_open = false;
    let mut chart_index = 0;

    for widget in &page.widgets {
        if is_input(widget) && !form_open {
            out.push_str(&format!(
                r#"<form method="get" action="{}">"#,
                page.section.path()
            ));
            form_open = true;
        } else if !is_input(widget) && form_open {
            out.push_str(r#"<button type="submit">Apply</button></form>"#);
            form_open = false;
        }

        match widget {
            Widget::Subheader { text } => {
                out.push_str(&format!("<h3>{}</h3>", html_escape(text)));
            }
            Widget::Markdown { lines } => {
                for line in lines {
                    out.push_str(&format!("<p>{}</p>", render_inline_markdown(line)));
                }
            }
            Widget::Select {
                name,
                label,
                choices,
                selected,
            } => out.push_str(&render_select(name, label, choices, selected)),
            Widget::DateInput { name, label, value } => {
                out.push_str(&format!(
                    r#"<label>{label} <input type="date" name="{name}" value="{value}"></label>"#,
                    label = html_escape(label),
                    name = name,
                    value = html_escape(value),
                ));
            }
            Widget::Table { frame } => out.push_str(&render_table(frame)),
            Widget::Chart { chart } => {
                out.push_str(&render_chart(chart, chart_index));
                chart_index += 1;
            }
            Widget::Info { message } => {
                out.push_str(&format!(
                    r#"<div class="info">{}</div>"#,
                    render_inline_code(message)
                ));
            }
            Widget::Error { message } => {
                out.push_str(&format!(
                    r#"<div class="error">{}</div>"#,
                    render_inline_code(message)
                ));
            }
        }
    }
    if form_open {
        out.push_str(r#"<button type="submit">Apply</button></form>"#);
    }
    out
}

fn render_select(name: &str, label: &str, choices: &[Choice], selected: &str) -> String {
    let options: String = choices
        .iter()
        .map(|choice| {
            format!(
                r#"<option value="{value}"{selected}>{label}</option>"#,
                value = html_escape(&choice.value),
                selected = if choice.value == selected { " selected" } else { "" },
                label = html_escape(&choice.label),
            )
        })
        .collect();
    format!(
        r#"<label>{label} <select name="{name}" onchange="this.form.submit()">{options}</select></label>"#,
        label = html_escape(label),
        name = name,
        options = options,
    )
}

fn render_table(frame: &Frame) -> String {
    if frame.is_empty() {
        return r#"<p class="empty">No rows.</p>"#.to_string();
    }
    let head: String = frame
        .columns
        .iter()
        .map(|column| format!("<th>{}</th>", html_escape(column)))
        .collect();
    let rows: String = frame
        .rows
        .iter()
        .map(|row| {
            let cells: String = row
                .iter()
                .map(|cell| format!("<td>{}</td>", html_escape(&cell.to_string())))
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect();
    format!(
        r#"<table><thead><tr>{}</tr></thead><tbody>{}</tbody></table>"#,
        head, rows
    )
}

fn render_chart(chart: &Chart, index: usize) -> String {
    // `</` inside a script block would end it early.
    let figure = chart.to_plotly().to_string().replace("</", "<\\/");
    format!(
        r#"<div id="chart-{index}" class="chart"></div>
<script>Plotly.newPlot("chart-{index}", {figure});</script>"#,
        index = index,
        figure = figure,
    )
}

/// Renders `**bold**` spans; everything else is escaped text.
fn render_inline_markdown(line: &str) -> String {
    line.split("**")
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 1 {
                format!("<strong>{}</strong>", html_escape(part))
            } else {
                html_escape(part)
            }
        })
        .collect()
}

/// Renders `` `code` `` spans; everything else is escaped text.
fn render_inline_code(text: &str) -> String {
    text.split('`')
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 1 {
                format!("<code>{}</code>", html_escape(part))
            } else {
                html_escape(part)
            }
        })
        .collect()
}

fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; }
body { margin: 0; display: flex; font-family: system-ui, -apple-system, sans-serif; color: #1f2933; }
nav { width: 220px; min-height: 100vh; padding: 16px; background: #f0f2f6; }
nav h2 { font-size: 15px; text-transform: uppercase; color: #616e7c; }
nav ul { list-style: none; padding: 0; }
nav a { display: block; padding: 6px 8px; border-radius: 6px; color: inherit; text-decoration: none; }
nav a.active { background: #ffffff; font-weight: 600; }
main { flex: 1; padding: 24px 32px; }
.intro { color: #52606d; }
form { display: flex; gap: 12px; align-items: end; flex-wrap: wrap; margin: 12px 0; }
table { border-collapse: collapse; margin: 12px 0; font-size: 13px; }
th, td { border: 1px solid #e4e7eb; padding: 4px 8px; text-align: left; }
th { background: #f5f7fa; }
.info { padding: 12px; border-radius: 6px; background: #e3f0ff; }
.error { padding: 12px; border-radius: 6px; background: #ffe3e3; color: #8a041a; }
.empty { color: #7b8794; }
.chart { width: 100%; min-height: 420px; }
"#
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
