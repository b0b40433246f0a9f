// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row): user, tabs, notice           |
// +-------------------------------+------------------+
// | Main Panel (68%)              | Dashboard (32%)  |
// |                               | lead sessions    |
// +-------------------------------+------------------+
// | Help Bar (1 row)                                 |
// +--------------------------------------------------+
//
// Technician sessions and the user-selection screen use the full width for
// the main panel.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub status_bar: Rect,
    /// Tab content.
    pub main_panel: Rect,
    /// Lead dashboard side panel.
    pub sidebar: Option<Rect>,
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect, with_sidebar: bool) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(3),    // main + sidebar
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let help_bar = vertical[2];

    if !with_sidebar {
        return AppLayout {
            status_bar,
            main_panel: middle,
            sidebar: None,
            help_bar,
        };
    }

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(middle);

    AppLayout {
        status_bar,
        main_panel: horizontal[0],
        sidebar: Some(horizontal[1]),
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 160, 50)
    }

    #[test]
    fn lead_layout_has_sidebar() {
        let layout = build_layout(test_area(), true);
        let sidebar = layout.sidebar.expect("sidebar");
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.main_panel.height, 48);
        assert_eq!(layout.main_panel.width + sidebar.width, 160);
        assert!(layout.main_panel.width > sidebar.width);
    }

    #[test]
    fn technician_layout_is_full_width() {
        let layout = build_layout(test_area(), false);
        assert!(layout.sidebar.is_none());
        assert_eq!(layout.main_panel.width, 160);
    }

    #[test]
    fn zones_stack_without_overlap() {
        let layout = build_layout(test_area(), true);
        assert_eq!(layout.main_panel.y, layout.status_bar.y + 1);
        assert_eq!(layout.help_bar.y, layout.main_panel.y + layout.main_panel.height);
    }
}
