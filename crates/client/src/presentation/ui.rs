//! Renders the battle screen.
//!
//! Layout, top to bottom: header, arena (player, stats, monster), agility
//! track, message log, key hints. The arena is offset sideways while an
//! impact shake is active.
use std::time::Instant;

use anyhow::Result;
use battle_core::{AgilityTrack, Combatant};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListDirection, ListItem, Paragraph},
};

use super::{terminal::Tui, theme::BattleTheme, view::ViewState};
use crate::message::MessageLog;

/// Rendering context containing all state needed for one frame.
pub struct RenderContext<'a> {
    pub view: &'a ViewState,
    pub messages: &'a MessageLog,
    pub track: &'a AgilityTrack,
    pub seed: u64,
    pub message_panel_height: u16,
    pub now: Instant,
}

pub fn render(terminal: &mut Tui, ctx: &RenderContext) -> Result<()> {
    let theme = BattleTheme::new();
    terminal.draw(|frame| draw(frame, ctx, &theme))?;
    Ok(())
}

pub fn draw(frame: &mut Frame, ctx: &RenderContext, theme: &BattleTheme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                        // Header
            Constraint::Min(7),                           // Arena
            Constraint::Length(4),                        // Agility track
            Constraint::Length(ctx.message_panel_height), // Messages
            Constraint::Length(1),                        // Key hints
        ])
        .split(frame.area());

    render_header(frame, chunks[0], ctx, theme);
    render_arena(
        frame,
        shifted(chunks[1], ctx.view.shake_offset(ctx.now)),
        ctx,
        theme,
    );
    render_agility(frame, chunks[2], ctx, theme);
    render_messages(frame, chunks[3], ctx, theme);
    render_footer(frame, chunks[4], ctx);
}

/// Moves `area` sideways by `dx` cells without leaving its original bounds.
fn shifted(area: Rect, dx: i16) -> Rect {
    let shift = dx.unsigned_abs().min(area.width / 4);
    let mut rect = area;
    rect.width = area.width.saturating_sub(shift);
    if dx > 0 {
        rect.x = area.x + shift;
    }
    rect
}

fn render_header(frame: &mut Frame, area: Rect, ctx: &RenderContext, theme: &BattleTheme) {
    let view = ctx.view;
    let mut spans = vec![
        Span::raw("Round: "),
        Span::styled(
            view.round.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Monster damage: "),
        Span::styled(
            format!("x{:.1}", view.damage_multiplier),
            Style::default().fg(Color::LightRed),
        ),
        Span::raw(" | Seed: "),
        Span::styled(ctx.seed.to_string(), Style::default().fg(Color::DarkGray)),
    ];

    let mut block = Block::default().borders(Borders::ALL).title(" Boss Battle ");
    if view.is_flashing(ctx.now) {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(" LEVEL UP! LVL {} ", view.progress.level),
            theme.style_flash(),
        ));
        block = block.border_style(theme.style_flash());
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_arena(frame: &mut Frame, area: Rect, ctx: &RenderContext, theme: &BattleTheme) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(38),
            Constraint::Percentage(24),
            Constraint::Percentage(38),
        ])
        .split(area);

    render_fighter(frame, columns[0], Combatant::Player, ctx, theme);
    render_stats(frame, columns[1], ctx);
    render_fighter(frame, columns[2], Combatant::Monster, ctx, theme);
}

fn render_fighter(
    frame: &mut Frame,
    area: Rect,
    who: Combatant,
    ctx: &RenderContext,
    theme: &BattleTheme,
) {
    let view = ctx.view;
    let lunging = view.is_lunging(who, ctx.now);
    let fallen = view.is_fallen(who);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {who} "))
        .border_style(theme.style_fighter(lunging, fallen));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Status
            Constraint::Length(1), // HP bar
            Constraint::Min(0),    // Floating numbers
        ])
        .split(inner);

    let status = if fallen {
        Span::styled("DEFEATED", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    } else if lunging {
        Span::styled("attacking!", theme.style_fighter(true, false))
    } else {
        Span::raw("")
    };
    frame.render_widget(
        Paragraph::new(Line::from(status)).alignment(Alignment::Center),
        rows[0],
    );

    let (hp, max_hp) = (view.hp(who), view.max_hp(who));
    let ratio = if max_hp == 0 {
        0.0
    } else {
        (f64::from(hp) / f64::from(max_hp)).clamp(0.0, 1.0)
    };
    let gauge = Gauge::default()
        .gauge_style(theme.style_health(hp, max_hp))
        .ratio(ratio)
        .label(format!("{hp} / {max_hp}"));
    frame.render_widget(gauge, rows[1]);

    let lane = rows[2];
    if lane.height == 0 {
        return;
    }
    for floater in view.floaters_for(who) {
        let age = floater.age(ctx.now).clamp(0.0, 1.0);
        // Numbers start at the bottom of the lane and drift up.
        let rise = (age * f64::from(lane.height - 1)).round() as u16;
        let row = Rect {
            y: lane.bottom() - 1 - rise,
            height: 1,
            ..lane
        };
        let mut style = theme.style_floater(floater.kind);
        if age > 0.7 {
            style = style.add_modifier(Modifier::DIM);
        }
        frame.render_widget(
            Paragraph::new(Span::styled(floater.text.as_str(), style))
                .alignment(Alignment::Center),
            row,
        );
    }
}

fn render_stats(frame: &mut Frame, area: Rect, ctx: &RenderContext) {
    let progress = ctx.view.progress;
    let label = Style::default().fg(Color::White);
    let value = Style::default().fg(Color::LightCyan);

    let lines = vec![
        Line::from(vec![
            Span::styled("LVL ", label),
            Span::styled(progress.level.to_string(), value.add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("XP  ", label),
            Span::styled(format!("{} / {}", progress.xp, progress.xp_cap), value),
        ]),
        Line::from(vec![
            Span::styled("ATK ", label),
            Span::styled(format!("+{}", progress.bonus_attack), value),
        ]),
        Line::from(vec![
            Span::styled("HP  ", label),
            Span::styled(format!("+{}", progress.bonus_hp), value),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Stats "));
    frame.render_widget(paragraph, area);
}

fn render_agility(frame: &mut Frame, area: Rect, ctx: &RenderContext, theme: &BattleTheme) {
    let view = ctx.view;
    let mut block = Block::default().borders(Borders::ALL).title(" Agility ");
    if let Some(timing) = view.timing {
        block = block.title(
            Line::from(Span::styled(
                format!(" {} ", timing.value.feedback()),
                theme.style_timing(timing.value),
            ))
            .right_aligned(),
        );
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(agility) = view.agility else {
        return;
    };
    let width = inner.width;
    if width < 2 || inner.height == 0 {
        return;
    }

    let last = width - 1;
    let track: Vec<Span> = (0..width)
        .map(|col| {
            let position = track_position(col, last, agility.span);
            Span::styled("━", theme.style_timing(ctx.track.classify(position)))
        })
        .collect();

    let pointer_col = (agility.ratio() * f64::from(last)).round() as usize;
    let pointer_style = if agility.running && view.input_enabled {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let pointer = Line::from(vec![
        Span::raw(" ".repeat(pointer_col)),
        Span::styled("▲", pointer_style),
    ]);

    frame.render_widget(Paragraph::new(vec![Line::from(track), pointer]), inner);
}

/// Track position drawn at `col` when `last` is the rightmost column.
fn track_position(col: u16, last: u16, span: u32) -> u32 {
    let position = u64::from(col) * u64::from(span) / u64::from(last.max(1));
    u32::try_from(position).unwrap_or(span)
}

fn render_messages(frame: &mut Frame, area: Rect, ctx: &RenderContext, theme: &BattleTheme) {
    let visible = ctx.message_panel_height.saturating_sub(2) as usize;
    let mut items: Vec<ListItem> = ctx
        .messages
        .recent(visible)
        .map(|entry| ListItem::new(entry.text.as_str()).style(theme.style_message(entry.tone)))
        .collect();

    // Pad with empty lines to maintain consistent height
    while items.len() < visible {
        items.push(ListItem::new(""));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Battle Log "))
        .direction(ListDirection::BottomToTop);

    frame.render_widget(list, area);
}

fn render_footer(frame: &mut Frame, area: Rect, ctx: &RenderContext) {
    let style = if ctx.view.input_enabled {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let mut text = String::from(" [A/Space] Attack  [H] Heal  [Q] Quit");
    if !ctx.view.input_enabled {
        text.push_str("  (waiting...)");
    }
    frame.render_widget(Paragraph::new(Span::styled(text, style)), area);
}
