use crate::controller::{Command, Event};
use crate::geometry::Point;
use eframe::egui::{self, Pos2, Rect};

/// Where the working image was painted this frame
#[derive(Debug, Clone, Copy)]
pub struct ImageArea {
    pub shown: Rect,
    pub size: [usize; 2],
}

/// Command keys and image clicks since the last frame, in the order they arrived
///
/// Clicks only count when `area` is set, i.e. the pointer is over the
/// uncovered image.
pub fn poll_events(input: &egui::InputState, area: Option<ImageArea>) -> Vec<Event> {
    input
        .events
        .iter()
        .filter_map(|event| match event {
            egui::Event::Key {
                key,
                pressed: true,
                repeat: false,
                ..
            } => command_for_key(*key).map(Event::Command),
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed: true,
                ..
            } => area
                .and_then(|area| to_image_point(*pos, area.shown, area.size))
                .map(Event::Click),
            _ => None,
        })
        .collect()
}

pub fn command_for_key(key: egui::Key) -> Option<Command> {
    let mut chars = key.name().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Command::from_key(c),
        _ => None,
    }
}

/// Map a screen position inside `shown` back to image pixel coordinates
///
/// `shown` is where an image of `size` pixels was painted; positions outside
/// it map to `None`.
pub fn to_image_point(pos: Pos2, shown: Rect, size: [usize; 2]) -> Option<Point> {
    if !shown.contains(pos) || shown.width() <= 0.0 || shown.height() <= 0.0 {
        return None;
    }

    let x = ((pos.x - shown.min.x) * size[0] as f32 / shown.width()) as i32;
    let y = ((pos.y - shown.min.y) * size[1] as f32 / shown.height()) as i32;
    let x = x.min(size[0] as i32 - 1);
    let y = y.min(size[1] as i32 - 1);
    Some(Point::new(x, y))
}
