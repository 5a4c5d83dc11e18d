use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use leadline_core::site::{Page, BUSINESS};
use leadline_core::{LeadField, SubmissionStatus};

use crate::app::{App, AppState, FormFocus};

use super::styles;

/// Width of the form panel, including borders
const FORM_WIDTH: u16 = 72;

/// Visible width of a text input
const INPUT_WIDTH: usize = 48;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Form
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_form(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    if app.form.status() == SubmissionStatus::Submitted {
        render_thank_you_overlay(frame, app);
    }

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("  {} · Free Estimate", BUSINESS.name);
    let source = Page::from_path(app.form.source_page())
        .map(|page| page.title())
        .unwrap_or("Unknown page");
    let right = format!("{}  [F1] Help", source);

    let title_line = Line::from(vec![
        Span::styled(title.clone(), styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize)
                .saturating_sub(title.chars().count() + right.chars().count() + 2),
        )),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

/// Show the tail of a value so the cursor end stays visible
fn visible_tail(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len <= width {
        format!("{:<width$}", value, width = width)
    } else {
        value.chars().skip(len - width).collect()
    }
}

fn field_lines(app: &App, focus: FormFocus, field: LeadField) -> Vec<Line<'static>> {
    let focused = app.focus == focus && app.is_editable();
    let marker = if field.is_required() { "*" } else { " " };
    let value = visible_tail(app.form.state().get(field), INPUT_WIDTH);
    let cursor = if focused { "▌" } else { " " };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {:>15}{} ", field.label(), marker), styles::label_style(focused)),
        Span::styled("[", styles::muted_style()),
        Span::styled(format!("{}{}", value, cursor), styles::input_style(focused)),
        Span::styled("]", styles::muted_style()),
    ])];

    if let Some(error) = app.form.errors().get(field) {
        lines.push(Line::from(vec![
            Span::raw(" ".repeat(19)),
            Span::styled(error.to_string(), styles::error_style()),
        ]));
    } else {
        lines.push(Line::from(""));
    }

    lines
}

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let width = FORM_WIDTH.min(area.width);
    let form_area = Rect::new(area.x + (area.width - width) / 2, area.y, width, area.height);

    let mut lines = vec![
        Line::from(Span::styled(
            format!(" Serving {}", BUSINESS.service_area),
            styles::muted_style(),
        )),
        Line::from(""),
    ];

    for focus in [
        FormFocus::Name,
        FormFocus::Address,
        FormFocus::Phone,
        FormFocus::Email,
        FormFocus::Details,
    ] {
        if let Some(field) = focus.field() {
            lines.extend(field_lines(app, focus, field));
        }
    }

    let button_focused = app.focus == FormFocus::Submit;
    let label = match app.form.status() {
        SubmissionStatus::Idle if button_focused => " ▶ Get My Free Estimate ◀ ",
        SubmissionStatus::Idle => "   Get My Free Estimate   ",
        SubmissionStatus::Submitting => "        Sending...        ",
        SubmissionStatus::Submitted => "          Sent!           ",
    };
    lines.push(Line::from(vec![
        Span::raw(" ".repeat(19)),
        Span::raw("["),
        Span::styled(label, styles::button_style(button_focused, app.form.can_submit())),
        Span::raw("]"),
    ]));

    if let Some(general) = app.form.errors().general() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", general), styles::error_style())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" Prefer to talk? Call or text ", styles::muted_style()),
        Span::styled(BUSINESS.phone, styles::highlight_style()),
    ]));

    let block = Block::default()
        .title(" Request a Free Estimate ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.state == AppState::Normal));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, form_area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[Tab] next | [Enter] submit | [Esc] quit";

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        format!(
            " {} lead{} sent via {} ",
            app.leads_delivered,
            if app.leads_delivered == 1 { "" } else { "s" },
            app.form.intake_name()
        )
    };

    let right_text = format!(" {} ", shortcuts);
    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.chars().count());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_thank_you_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(52, 9, frame.area());
    frame.render_widget(Clear, area);

    let first_name = app
        .form
        .state()
        .name
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("   Thanks{}{}!", if first_name.is_empty() { "" } else { ", " }, first_name),
            styles::success_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "   We'll reach out within one business day.",
            styles::help_desc_style(),
        )),
        Line::from(vec![
            Span::styled("   Need us sooner? Call ", styles::muted_style()),
            Span::styled(BUSINESS.phone, styles::highlight_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "   This form will reset in a few seconds.",
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 17, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_line = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", key), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(
            format!(" Leadline {}", version),
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Form", styles::highlight_style())),
        help_line("Tab / ↓", "Next field"),
        help_line("S-Tab / ↑", "Previous field"),
        help_line("Enter", "Next field, or submit on the button"),
        help_line("Backspace", "Delete (phone deletes a digit)"),
        help_line("Ctrl+U", "Clear the current field"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        help_line("Ctrl+S", "Submit"),
        help_line("Ctrl+N", "Start a new lead"),
        help_line("Esc", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("F1", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
