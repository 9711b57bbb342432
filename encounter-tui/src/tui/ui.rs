use color_eyre::Result;
use encounter_core::{
    dto::EncounterView,
    reminders::{Priority, Reminder},
    HpStatus,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{palette::material, Color, Style, Stylize},
    symbols::border,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, HighlightSpacing, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::app::App;

#[derive(Debug)]
pub struct TableColors {
    header_bg: Color,
    selected_row_style_fg: Color,
    selected_row_style_bg: Color,
    current_turn_style_fg: Color,
    current_turn_style_bg: Color,
    panel_border_color: Color,
}

impl TableColors {
    pub const fn new() -> Self {
        Self {
            header_bg: material::GREEN.c800,
            selected_row_style_fg: material::BLACK,
            selected_row_style_bg: material::GREEN.c100,
            current_turn_style_fg: material::BLACK,
            current_turn_style_bg: material::BLUE.c200,
            panel_border_color: material::GREEN.c400,
        }
    }
}

fn status_color(status: HpStatus) -> Color {
    match status {
        HpStatus::Healthy => material::GREEN.c400,
        HpStatus::Wounded => material::YELLOW.c400,
        HpStatus::Bloodied => material::ORANGE.c400,
        HpStatus::Critical => material::RED.c400,
        HpStatus::Unconscious => material::GRAY.c500,
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Critical => material::RED.c300,
        Priority::High => material::ORANGE.c300,
        Priority::Medium => material::YELLOW.c200,
        Priority::Low => Color::Reset,
    }
}

/// helper function to create a centered rect using up certain percentage of the available rect `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    // Cut the given rectangle into three vertical pieces
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    // Then cut the middle vertical piece into three width-wise pieces
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn draw_popup(frame: &mut Frame, app: &App, area: Rect) -> Result<()> {
    frame.render_widget(Clear, area);
    let popup_block = Block::default()
        .title(Line::from("Confirm").centered())
        .title_bottom(
            Line::from(vec![
                " Confirm ".into(),
                "<Enter>".blue().bold(),
                " Decline ".into(),
                "<Esc>".blue().bold(),
            ])
            .centered(),
        )
        .borders(Borders::ALL);

    let lines = app.popup.prompt.lines().count();
    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(popup_block.inner(area));
    let vertical_padding = (vertical_layout[1].height.saturating_sub(lines as u16) / 2).max(1);

    let padded_text = format!(
        "{}{}",
        "\n".repeat(vertical_padding as usize),
        app.popup.prompt,
    );

    // the `trim: false` will stop the text from being cut off when over the edge of the block
    let prompt = Paragraph::new(padded_text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    frame.render_widget(popup_block, area);
    frame.render_widget(prompt, vertical_layout[1]);
    if app.popup.show_input {
        frame.render_widget(&app.popup.input, vertical_layout[2]);
    }
    Ok(())
}

fn draw_table(frame: &mut Frame, app: &mut App, view: &EncounterView, area: Rect) -> Result<()> {
    let header_style = Style::default().bg(app.colors.header_bg);
    let selected_row_style = Style::default()
        .bg(app.colors.selected_row_style_bg)
        .fg(app.colors.selected_row_style_fg);

    let header = ["Ini", "Name", "HP", "AC", "Status", "Conditions"]
        .into_iter()
        .map(Cell::from)
        .collect::<Row>()
        .style(header_style)
        .height(1);
    let rows = view.combatants.iter().map(|combatant| {
        let style = if combatant.is_current {
            Style::new()
                .bg(app.colors.current_turn_style_bg)
                .fg(app.colors.current_turn_style_fg)
        } else {
            Style::new()
        };
        combatant
            .row()
            .into_iter()
            .enumerate()
            .map(|(column, content)| {
                let cell = Cell::from(Text::from(format!("\n{content}\n")));
                // status column
                if column == 4 && !combatant.is_current {
                    cell.fg(status_color(combatant.status))
                } else {
                    cell
                }
            })
            .collect::<Row>()
            .style(style)
            .height(3)
    });

    let bar = " █ ";
    let t = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Percentage(28),
            Constraint::Length(14),
            Constraint::Length(4),
            Constraint::Length(12),
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .row_highlight_style(selected_row_style)
    .highlight_spacing(HighlightSpacing::Always)
    .highlight_symbol(Text::from(vec!["".into(), bar.into(), "".into()]));
    frame.render_stateful_widget(t, area, &mut app.state);

    Ok(())
}

fn reminder_line(reminder: &Reminder) -> Line<'_> {
    Line::from(vec![
        Span::from(format!("{} ", reminder.creature)).bold(),
        Span::from(reminder.ability.name.as_str()).fg(priority_color(reminder.ability.priority)),
        Span::from(format!(": {}", reminder.ability.description)),
    ])
}

fn draw_side_panel(frame: &mut Frame, app: &App, view: &EncounterView, area: Rect) -> Result<()> {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Fill(1)])
        .split(area);

    let summary = &view.difficulty;
    let thresholds = summary.party_threshold;
    let target = app
        .store
        .active_encounter()
        .map(|e| e.difficulty.to_string())
        .unwrap_or_default();
    let difficulty = Paragraph::new(vec![
        Line::from(vec!["Difficulty: ".into(), summary.difficulty.to_string().bold()]),
        Line::from(format!(
            "XP: {} (adjusted {})",
            summary.xp, summary.adjusted_xp
        )),
        Line::from(format!(
            "Party: {} x level {}",
            view.party_size, view.party_level
        )),
        Line::from(format!(
            "Easy {} / Medium {} / Hard {} / Deadly {}",
            thresholds.easy, thresholds.medium, thresholds.hard, thresholds.deadly
        )),
        Line::from(format!(
            "Budget ({}): {} used of {}",
            target, view.used_xp, view.xp_budget
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" Encounter ")
            .borders(Borders::ALL)
            .border_style(Style::new().fg(app.colors.panel_border_color)),
    );
    frame.render_widget(difficulty, layout[0]);

    let reminders = app
        .store
        .active_encounter()
        .map(|e| app.abilities.all_reminders(e))
        .unwrap_or_default();
    let lines: Vec<Line> = if reminders.is_empty() {
        vec![Line::from("No reminders".italic())]
    } else {
        reminders.iter().map(reminder_line).collect()
    };
    let reminders = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Reminders ")
            .borders(Borders::ALL)
            .border_style(Style::new().fg(app.colors.panel_border_color)),
    );
    frame.render_widget(reminders, layout[1]);
    Ok(())
}

pub fn draw(frame: &mut Frame, app: &mut App) -> Result<()> {
    let view = app.store.active_encounter().map(EncounterView::from);
    let title = match &view {
        Some(view) => Line::from(format!("{}, Round: {}", view.name, view.round).bold()),
        None => Line::from("Encounter Tracker".bold()),
    };

    let instructions = Line::from(vec![
        " Turn ".into(),
        "<Left/Right>".blue().bold(),
        " Damage ".into(),
        "<d>".blue().bold(),
        " Heal ".into(),
        "<h>".blue().bold(),
        " Condition ".into(),
        "<c/x>".blue().bold(),
        " Roll ".into(),
        "<Ctrl+r>".blue().bold(),
        " Add ".into(),
        "<a/p>".blue().bold(),
        " Save ".into(),
        "<Ctrl+s>".blue().bold(),
        " Quit ".into(),
        "<Esc> ".blue().bold(),
    ]);
    let block = Block::default()
        .title(title.centered())
        .title_bottom(instructions.centered())
        .borders(Borders::ALL)
        .border_set(border::THICK);
    frame.render_widget(&block, frame.area());
    let inner_area = block.inner(frame.area());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(1)])
        .split(inner_area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Fill(1)])
        .split(rows[0]);

    match &view {
        Some(view) => {
            draw_table(frame, app, view, columns[0])?;
            draw_side_panel(frame, app, view, columns[1])?;
        }
        None => {
            let empty = Paragraph::new("No encounter yet. Press <e> to create one.")
                .alignment(Alignment::Center);
            frame.render_widget(empty, rows[0]);
        }
    }

    if let Some(status) = &app.status {
        frame.render_widget(Paragraph::new(status.as_str().yellow()), rows[1]);
    }

    if app.popup.active {
        let popup_area = centered_rect(app.popup.size.0, app.popup.size.1, frame.area());
        draw_popup(frame, app, popup_area)?;
    }
    Ok(())
}
