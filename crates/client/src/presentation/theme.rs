//! Colors and emphasis for the battle screen.
use battle_core::{CritTier, LogTone, TimingTier};
use ratatui::style::{Color, Modifier, Style};

use super::view::FloaterKind;

/// Consistent color scheme for every widget.
#[derive(Clone, Copy, Debug, Default)]
pub struct BattleTheme;

impl BattleTheme {
    pub fn new() -> Self {
        Self
    }

    pub fn style_health(&self, current: u32, maximum: u32) -> Style {
        if maximum == 0 {
            return Style::default().fg(Color::Gray);
        }

        let percent = u64::from(current) * 100 / u64::from(maximum);
        let color = match percent {
            60.. => Color::Green,
            30..=59 => Color::Yellow,
            _ => Color::Red,
        };

        Style::default().fg(color)
    }

    pub fn style_crit(&self, tier: CritTier) -> Style {
        match tier {
            CritTier::None => Style::default().fg(Color::White),
            CritTier::Weak => Style::default().fg(Color::Yellow),
            CritTier::Strong => Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
            CritTier::Ultra => Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        }
    }

    pub fn style_timing(&self, tier: TimingTier) -> Style {
        match tier {
            TimingTier::Perfect => Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
            TimingTier::Good => Style::default().fg(Color::Cyan),
            TimingTier::Bad => Style::default().fg(Color::DarkGray),
        }
    }

    pub fn style_message(&self, tone: LogTone) -> Style {
        match tone {
            LogTone::Neutral => Style::default().fg(Color::White),
            LogTone::PlayerHit => Style::default().fg(Color::LightCyan),
            LogTone::MonsterHit => Style::default().fg(Color::LightRed),
            LogTone::Crit(tier) => self.style_crit(tier),
            LogTone::Heal => Style::default().fg(Color::Green),
            LogTone::LevelUp => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            LogTone::Timing(tier) => self.style_timing(tier),
            LogTone::Defeat => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }

    pub fn style_floater(&self, kind: FloaterKind) -> Style {
        match kind {
            FloaterKind::Damage(CritTier::None) => Style::default().fg(Color::LightRed),
            FloaterKind::Damage(tier) => self.style_crit(tier),
            FloaterKind::Heal => Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        }
    }

    pub fn style_fighter(&self, lunging: bool, fallen: bool) -> Style {
        if fallen {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        } else if lunging {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        }
    }

    pub fn style_flash(&self) -> Style {
        Style::default()
            .bg(Color::Yellow)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD)
    }
}
