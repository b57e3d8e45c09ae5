use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, DetailView, InputMode};
use crate::config::Config;
use crate::models::{ReportStatus, Video};

pub fn draw(frame: &mut Frame, app: &App) {
    // Main horizontal split: list on the left, details on the right
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(frame.area());

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(0),    // Video list
            Constraint::Length(1), // Status line
        ])
        .split(main_chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Video metadata
            Constraint::Min(0),    // Summary or report
            Constraint::Length(1), // Report status
        ])
        .split(main_chunks[1]);

    render_header(frame, app, left_chunks[0]);
    render_video_list(frame, app, left_chunks[1]);
    render_left_status(frame, app, left_chunks[2]);

    render_video_meta(frame, app, right_chunks[0]);
    render_detail(frame, app, right_chunks[1]);
    render_right_status(frame, app, right_chunks[2]);

    if let Some(mode) = app.input_mode {
        render_input(frame, app, mode);
    }

    if app.show_help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        " Video Curator [{} | {}] ",
        app.query.filter.label(),
        app.query.sort.label()
    );
    let saved = app.videos.iter().filter(|v| v.is_saved).count();
    let mut stats = format!(" {} Videos | {} Saved", app.videos.len(), saved);
    if let Some(search) = &app.query.title {
        stats.push_str(&format!(" | \"{search}\""));
    }
    if !app.marked.is_empty() {
        stats.push_str(&format!(" | {} marked", app.marked.len()));
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(stats).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn importance_color(importance: i64) -> Color {
    match importance {
        5 => Color::Red,
        4 => Color::LightRed,
        3 => Color::Yellow,
        _ => Color::DarkGray,
    }
}

fn video_item<'a>(video: &'a Video, marked: bool) -> ListItem<'a> {
    let mark = if marked { "✗ " } else { "  " };
    let star = if video.is_saved { "★ " } else { "  " };
    let score = video.score.map(|s| s.to_string()).unwrap_or_default();

    let line = Line::from(vec![
        Span::styled(mark, Style::default().fg(Color::Red)),
        Span::styled(star, Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("{} ", video.importance),
            Style::default().fg(importance_color(video.importance)),
        ),
        Span::styled(format!("{score:>6} "), Style::default().fg(Color::Green)),
        Span::styled(
            format!("{:>8} ", video.duration_label()),
            Style::default().fg(Color::Blue),
        ),
        Span::styled(video.title.as_str(), Style::default().fg(Color::White)),
    ]);

    ListItem::new(line)
}

fn render_video_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .videos
        .iter()
        .map(|video| video_item(video, app.marked.contains(&video.id)))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.videos.is_empty() {
        state.select(Some(app.selected_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_left_status(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.is_ingesting || app.is_refreshing {
        app.status_message
            .clone()
            .unwrap_or_else(|| "Refreshing channels...".to_string())
    } else if let Some(message) = &app.status_message {
        message.clone()
    } else {
        "j/k:nav  a:add  r:refresh  b:bookmark  /:search  ?:help  q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_video_meta(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Video ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let Some(video) = app.selected_video() else {
        let paragraph = Paragraph::new("No video selected. Press 'a' to add one.").block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![Line::from(Span::styled(
        video.title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.push(Line::from(vec![
        Span::styled("Channel ", label),
        Span::raw(video.channel_title.as_deref().unwrap_or("-")),
        Span::styled("  Published ", label),
        Span::raw(video.published_at.format("%Y-%m-%d %H:%M").to_string()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Importance ", label),
        Span::raw(video.importance.to_string()),
        Span::styled("  Score ", label),
        Span::raw(video.score.map(|s| s.to_string()).unwrap_or_else(|| "-".into())),
        Span::styled("  Length ", label),
        Span::raw(video.duration_label()),
    ]));
    if let Some(tag) = &video.tag {
        lines.push(Line::from(vec![
            Span::styled("Tags ", label),
            Span::styled(tag.as_str(), Style::default().fg(Color::Magenta)),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let (title, content) = match app.detail_view {
        DetailView::Summary => (
            " Summary ",
            app.selected_video()
                .and_then(|v| v.summary.clone())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "No summary available".to_string()),
        ),
        DetailView::Report => (" Report ", report_text(app)),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn report_text(app: &App) -> String {
    match app.report_status {
        ReportStatus::NotGenerated => "Press Enter to generate a report...".to_string(),
        ReportStatus::Generating => "Generating report...".to_string(),
        ReportStatus::Failed => "Failed to generate report. Press 'g' to retry.".to_string(),
        ReportStatus::NoApiKey => format!(
            "YouTube API key not configured.\n\nPlease add your keys to:\n{}\n\nExample:\nyoutube_api_key = \"AIza...\"\ngemini_api_key = \"AIza...\"",
            Config::config_path().display()
        ),
        ReportStatus::Generated => app
            .current_report
            .as_ref()
            .map(|r| r.content.clone())
            .unwrap_or_else(|| "No report available".to_string()),
    }
}

fn render_right_status(frame: &mut Frame, app: &App, area: Rect) {
    let status = match app.report_status {
        ReportStatus::NotGenerated => "Enter:report",
        ReportStatus::Generating => "⏳ Generating...",
        ReportStatus::Failed => "❌ Failed",
        ReportStatus::NoApiKey => "⚠️  No API key",
        ReportStatus::Generated => "✓ Report cached",
    };

    let model = app
        .current_report
        .as_ref()
        .filter(|r| !r.model_version.is_empty())
        .map(|r| format!(" | {}", r.model_version))
        .unwrap_or_default();

    let paragraph =
        Paragraph::new(format!("{status}{model}")).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, app: &App, mode: InputMode) {
    let area = centered_rect(60, 20, frame.area());

    let title = match mode {
        InputMode::AddVideo => " Add video - YouTube URL or ID ",
        InputMode::Search => " Search titles ",
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let input_text = format!("> {}_", app.input);
    let paragraph = Paragraph::new(input_text).style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(50, 70, frame.area());

    let help_text = [
        "",
        " Navigation:",
        "   j / ↓    Move down",
        "   k / ↑    Move up",
        "   < / >    First / last video",
        "   Enter    Toggle summary / report",
        "",
        " Actions:",
        "   a        Add video by URL",
        "   r        Refresh channels",
        "   b        Toggle bookmark",
        "   o        Open in browser",
        "   g        Regenerate report",
        "   f        Cycle filter (all / saved)",
        "   s        Toggle sort (newest / importance)",
        "   /        Search titles (Esc clears)",
        "   Space    Mark for deletion",
        "   d        Delete marked (or selected)",
        "",
        " General:",
        "   ?        Toggle this help",
        "   q        Quit",
        "",
        " Press any key to close",
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text.join("\n"))
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
