use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::widgets::{Paragraph, Wrap};

use crate::tui::component::Component;
use crate::tui::components::{CommandBar, LineInput};

/// Lays out one screen: command bar, blank row, body, and the active prompt
/// (if any) pinned to the bottom so long bodies never hide it.
pub fn draw_screen(
    frame: &mut Frame,
    command_bar: &mut CommandBar,
    body: &str,
    input: Option<&mut LineInput>,
) {
    use Constraint::{Length, Min};
    let input_height = input.as_ref().map(|i| i.height()).unwrap_or(0);
    let layout = Layout::vertical([Length(1), Length(1), Min(0), Length(input_height)]);
    let [bar_area, _gap, body_area, input_area] = layout.areas(frame.area());

    command_bar.render(frame, bar_area);

    let paragraph = Paragraph::new(body.to_string()).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, body_area);

    if let Some(input) = input {
        input.render(frame, input_area);
    }
}
