//! Publication-year trend as a bar chart.

use crate::tui::theme::Theme;
use evidex_core::YearCount;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph};

/// Width of one bar, wide enough for a four-digit year label.
const BAR_WIDTH: u16 = 4;

pub fn render_trend_chart(frame: &mut Frame, area: Rect, trend: &[YearCount], theme: &Theme) {
    let block = Block::default()
        .title(" Publications by year ")
        .borders(Borders::ALL)
        .border_style(theme.border_style(false));

    if trend.is_empty() {
        let empty = Paragraph::new("No studies").style(theme.muted_style()).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let bars: Vec<Bar> = trend
        .iter()
        .map(|bucket| {
            Bar::default()
                .value(bucket.count as u64)
                .label(Line::from(bucket.year.to_string()))
                .style(theme.label_style())
                .value_style(theme.status_bar_style())
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(1)
        .label_style(theme.muted_style());
    frame.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(trend: &[YearCount]) -> String {
        let backend = ratatui::backend::TestBackend::new(40, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_trend_chart(frame, frame.area(), trend, &theme))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_render_trend_labels_years() {
        let trend = [
            YearCount {
                year: 2019,
                count: 2,
            },
            YearCount {
                year: 2021,
                count: 1,
            },
        ];
        let text = render(&trend);
        assert!(text.contains("2019"));
        assert!(text.contains("2021"));
    }

    #[test]
    fn test_render_empty_trend() {
        assert!(render(&[]).contains("No studies"));
    }
}
