// Screen layout.
//
// +--------------------------------------------------+
// | Status Bar (1 row)                                |
// +--------------------------------------------------+
// | Notice (1 row)                                    |
// +--------------------------------------------------+
// | Body: the current screen (fill)                   |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone)]
pub struct AppLayout {
    /// Server, auth state and the current screen.
    pub status_bar: Rect,
    /// Transient notices from the orchestrator.
    pub notice: Rect,
    pub body: Rect,
    /// Key hints for the current screen.
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        notice: vertical[1],
        body: vertical[2],
        help_bar: vertical[3],
    }
}

/// Split a screen body into a fixed-height form area on top and the
/// remaining output area below.
pub fn form_and_output(area: Rect, form_rows: u16) -> (Rect, Rect) {
    let parts = Layout::vertical([Constraint::Length(form_rows), Constraint::Min(0)]).split(area);
    (parts[0], parts[1])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn test_area() -> Rect {
        Rect::new(0, 0, 100, 40)
    }

    #[test]
    fn layout_all_rects_nonzero() {
        let layout = build_layout(test_area());
        let rects = [
            ("status_bar", layout.status_bar),
            ("notice", layout.notice),
            ("body", layout.body),
            ("help_bar", layout.help_bar),
        ];
        for (name, rect) in &rects {
            assert!(
                rect.width > 0 && rect.height > 0,
                "{} has zero area: {:?}",
                name,
                rect
            );
        }
    }

    #[test]
    fn bars_are_one_row_and_body_fills_the_rest() {
        let layout = build_layout(test_area());
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.notice.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.body.height, 37);
        assert_eq!(layout.help_bar.y, 39);
    }

    #[test]
    fn form_area_gets_requested_rows() {
        let (form, output) = form_and_output(Rect::new(0, 0, 80, 30), 8);
        assert_eq!(form.height, 8);
        assert_eq!(output.height, 22);
        assert_eq!(output.y, 8);
    }
}
