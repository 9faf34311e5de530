#![cfg(not(coverage))]

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::tui_actions::CHOICE_VIEWPORT_ROWS;
use crate::tui_state::TuiUiState;
use crate::LoadedScenario;

const ELLIPSIS: &str = "…";

pub(crate) fn render_tui(
    frame: &mut Frame<'_>,
    ui: &TuiUiState,
    scenario: &LoadedScenario,
    state_file: &str,
) {
    let terminal_width = frame.area().width as usize;
    let terminal_rows = frame.area().height as usize;
    let content_width = (terminal_width.saturating_sub(2)).max(16);

    let mut transcript = ui.rendered_lines.clone();
    if let Some(typing) = &ui.typing_line {
        transcript.push(typing.chars().take(ui.typing_chars).collect());
    }
    let wrapped_rows = transcript
        .iter()
        .flat_map(|line| wrap_line_to_width(line, content_width))
        .collect::<Vec<_>>();

    let show_choices = !ui.typing_in_progress() && !ui.choices.is_empty();

    // header, state, host, status + divider + choices + window + keys
    let mut reserved_rows = 4 + 1 + CHOICE_VIEWPORT_ROWS + 1 + 1;
    if ui.help_visible {
        reserved_rows += 1;
    }
    let visible_rows = terminal_rows.saturating_sub(reserved_rows).max(1);
    let clipped_rows = &wrapped_rows[wrapped_rows.len().saturating_sub(visible_rows)..];

    let choice_text_width = content_width.saturating_sub(2).max(8);
    let choice_rows = (0..CHOICE_VIEWPORT_ROWS)
        .map(|row| {
            let absolute = ui.choice_scroll_offset + row;
            match ui.choices.get(absolute).filter(|_| show_choices) {
                Some(choice) => (
                    truncate_to_width(&choice.text, choice_text_width),
                    absolute == ui.selected_choice_index,
                ),
                None => (" ".to_string(), false),
            }
        })
        .collect::<Vec<_>>();

    let window_text = if show_choices && ui.choices.len() > CHOICE_VIEWPORT_ROWS {
        truncate_to_width(
            &format!(
                "window {}-{} / {}",
                ui.choice_scroll_offset + 1,
                (ui.choice_scroll_offset + CHOICE_VIEWPORT_ROWS).min(ui.choices.len()),
                ui.choices.len()
            ),
            content_width,
        )
    } else if ui.ended {
        "[end]".to_string()
    } else {
        " ".to_string()
    };

    let gray = Style::default().fg(Color::Gray);
    let mut lines: Vec<Line<'_>> = vec![
        Line::from(truncate_to_width(
            &format!("{} | {}", scenario.id, scenario.title),
            content_width,
        )),
        Line::from(Span::styled(
            truncate_to_width(&format!("state: {}", state_file), content_width),
            gray,
        )),
        Line::from(Span::styled(
            truncate_to_width(&format!("host: {}", ui.host_summary), content_width),
            gray,
        )),
        Line::from(Span::styled(
            truncate_to_width(&format!("status: {}", ui.status), content_width),
            gray,
        )),
    ];
    lines.extend(clipped_rows.iter().cloned().map(Line::from));
    lines.push(Line::from(Span::styled("─".repeat(content_width), gray)));
    for (text, selected) in choice_rows {
        let (prefix, style) = if selected {
            ("> ", Style::default().fg(Color::Green))
        } else {
            ("  ", Style::default())
        };
        lines.push(Line::from(Span::styled(format!("{}{}", prefix, text), style)));
    }
    lines.push(Line::from(Span::styled(window_text, gray)));
    lines.push(Line::from(Span::styled(
        truncate_to_width(
            "keys: up/down move | enter choose | s save | l load | r restart | h help | q quit",
            content_width,
        ),
        Style::default().fg(Color::Yellow),
    )));
    if ui.help_visible {
        lines.push(Line::from(Span::styled(
            truncate_to_width(
                "saves hold the current label and host state; loading re-evaluates choice conditions.",
                content_width,
            ),
            Style::default().fg(Color::Magenta),
        )));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), frame.area());
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width == 1 {
        return ELLIPSIS.to_string();
    }
    let mut out = value.chars().take(width - 1).collect::<String>();
    out.push_str(ELLIPSIS);
    out
}

pub(crate) fn wrap_line_to_width(value: &str, width: usize) -> Vec<String> {
    let chars = value.chars().collect::<Vec<_>>();
    if width == 0 || chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(width).map(|row| row.iter().collect()).collect()
}
