use crate::config::TrackerConfig;
use crate::grid::{rows, CellClass};
use crate::models::{TodayResponse, WidgetView};
use crate::prompt::PromptContext;
use crate::stats::format_value;

pub fn render_index(config: &TrackerConfig, view: &WidgetView, today: &TodayResponse) -> String {
    let palette = &config.palette;
    let layout = &config.layout;

    let question = if today.completed {
        PromptContext::ConfirmAddMore {
            activity: view.activity.clone(),
            today_value: today.value,
            total_value: today.total_value,
            unit: today.unit.clone(),
        }
    } else {
        PromptContext::ConfirmCompletion {
            activity: view.activity.clone(),
        }
    };
    let value_label = if today.completed {
        format!("{} to add", today.unit)
    } else {
        today.unit.clone()
    };

    INDEX_HTML
        .replace("{{BG}}", palette.background)
        .replace("{{COLOR_COMPLETED}}", palette.completed)
        .replace("{{COLOR_MISSED}}", palette.missed)
        .replace("{{COLOR_FUTURE}}", palette.future)
        .replace("{{COLOR_MUTED}}", palette.muted)
        .replace("{{PADDING}}", &format_value(layout.padding))
        .replace("{{DOT}}", &format_value(layout.circle_size))
        .replace("{{GAP}}", &format_value(layout.circle_spacing))
        .replace("{{GRID}}", &render_grid(view))
        .replace("{{ACTIVITY}}", &escape(&view.activity))
        .replace("{{STREAK}}", &escape(&view.streak_label))
        .replace("{{TOTAL}}", &format_value(view.total_value))
        .replace("{{TODAY_VALUE}}", &format_value(today.value))
        .replace("{{UNIT}}", &escape(&today.unit))
        .replace("{{DATE}}", &today.date)
        .replace("{{PROMPT_TITLE}}", &escape(&question.title()))
        .replace("{{PROMPT_MESSAGE}}", &escape(&question.message()).replace('\n', "<br />"))
        .replace("{{VALUE_LABEL}}", &escape(&value_label))
}

fn render_grid(view: &WidgetView) -> String {
    let mut html = String::new();
    for row in rows(&view.cells, view.columns) {
        html.push_str("<div class=\"row\">");
        for cell in row {
            let class = match cell.class {
                CellClass::Future => "future",
                CellClass::Completed => "completed",
                CellClass::Missed => "missed",
            };
            html.push_str(&format!(
                "<span class=\"dot {class}\" title=\"{}\"></span>",
                cell.date
            ));
        }
        html.push_str("</div>");
    }
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{ACTIVITY}} streak</title>
  <style>
    :root {
      --bg: {{BG}};
      --completed: {{COLOR_COMPLETED}};
      --missed: {{COLOR_MISSED}};
      --future: {{COLOR_FUTURE}};
      --muted: {{COLOR_MUTED}};
      --dot: {{DOT}}px;
      --gap: {{GAP}}px;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: #1c1c1e;
      color: var(--completed);
      font-family: Menlo, "SFMono-Regular", Consolas, monospace;
      display: grid;
      place-items: center;
      padding: 24px 12px;
    }

    .widget {
      width: 320px;
      background: var(--bg);
      border-radius: 22px;
      padding: 12px {{PADDING}}px;
      display: grid;
      gap: 8px;
    }

    .grid {
      display: grid;
      gap: var(--gap);
    }

    .row {
      display: flex;
      gap: var(--gap);
    }

    .dot {
      width: var(--dot);
      height: var(--dot);
      border-radius: 50%;
      display: inline-block;
    }

    .dot.completed {
      background: var(--completed);
    }

    .dot.missed {
      background: var(--missed);
    }

    .dot.future {
      background: var(--future);
    }

    footer {
      display: flex;
      justify-content: space-between;
      font-size: 12px;
    }

    footer .activity {
      font-weight: 700;
    }

    footer .streak {
      color: var(--muted);
    }

    .prompt {
      width: 320px;
      margin-top: 18px;
      background: var(--bg);
      border-radius: 18px;
      padding: 16px;
      display: grid;
      gap: 10px;
      font-size: 13px;
    }

    .prompt h2 {
      margin: 0;
      font-size: 14px;
    }

    .prompt p {
      margin: 0;
      color: var(--muted);
    }

    .prompt label {
      display: flex;
      gap: 8px;
      align-items: center;
    }

    .prompt input[type="number"] {
      width: 96px;
      padding: 6px 8px;
      border-radius: 8px;
      border: 1px solid var(--future);
      background: transparent;
      color: inherit;
      font: inherit;
    }

    .prompt button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font: inherit;
      font-weight: 700;
      cursor: pointer;
      background: var(--completed);
      color: var(--bg);
    }

    .hint {
      margin: 0;
      color: var(--muted);
      font-size: 11px;
    }
  </style>
</head>
<body>
  <div>
    <main class="widget">
      <section class="grid" aria-label="Progress since the start date">{{GRID}}</section>
      <footer>
        <span class="activity">{{ACTIVITY}}</span>
        <span class="streak">{{STREAK}}</span>
      </footer>
    </main>

    <form class="prompt" method="post" action="/record">
      <h2>{{PROMPT_TITLE}}</h2>
      <p>{{PROMPT_MESSAGE}}</p>
      <label><input type="checkbox" name="confirm" /> Yes</label>
      <label><input type="number" name="value" min="0" step="any" placeholder="0" /> {{VALUE_LABEL}}</label>
      <button type="submit">Save</button>
      <p class="hint">{{DATE}}: {{TODAY_VALUE}} {{UNIT}} today, {{TOTAL}} {{UNIT}} in total.</p>
    </form>
  </div>
</body>
</html>
"#;
