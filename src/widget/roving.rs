//! Arrow-key navigation over a list of items (roving tabindex).

use crate::event::input::Key;

/// Axis along which arrow keys move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

/// Index reached from `current` by `key` in a list of `len` items.
///
/// `orientation: None` accepts both arrow axes. Home/End jump to the ends.
/// With `looping`, moving past either end wraps around; without it the index
/// is clamped. Returns `None` for keys that don't navigate or an empty list.
pub fn navigate(
    key: Key,
    current: usize,
    len: usize,
    orientation: Option<Orientation>,
    looping: bool,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let current = current.min(len - 1);
    let horizontal = orientation != Some(Orientation::Vertical);
    let vertical = orientation != Some(Orientation::Horizontal);

    let step: isize = match key {
        Key::Home => return Some(0),
        Key::End => return Some(len - 1),
        Key::Right if horizontal => 1,
        Key::Down if vertical => 1,
        Key::Left if horizontal => -1,
        Key::Up if vertical => -1,
        _ => return None,
    };

    let next = current as isize + step;
    let last = len as isize - 1;
    let next = if looping {
        next.rem_euclid(len as isize)
    } else {
        next.clamp(0, last)
    };
    Some(next as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertical_ignores_horizontal_arrows() {
        let o = Some(Orientation::Vertical);
        assert_eq!(navigate(Key::Down, 0, 3, o, true), Some(1));
        assert_eq!(navigate(Key::Right, 0, 3, o, true), None);
    }

    #[test]
    fn wraps_when_looping() {
        assert_eq!(navigate(Key::Down, 2, 3, None, true), Some(0));
        assert_eq!(navigate(Key::Up, 0, 3, None, true), Some(2));
        assert_eq!(navigate(Key::Left, 0, 3, None, true), Some(2));
    }

    #[test]
    fn clamps_without_looping() {
        assert_eq!(navigate(Key::Down, 2, 3, None, false), Some(2));
        assert_eq!(navigate(Key::Up, 0, 3, None, false), Some(0));
    }

    #[test]
    fn home_end_and_empty() {
        assert_eq!(navigate(Key::Home, 2, 3, None, false), Some(0));
        assert_eq!(navigate(Key::End, 0, 3, None, false), Some(2));
        assert_eq!(navigate(Key::Down, 0, 0, None, true), None);
        assert_eq!(navigate(Key::Enter, 0, 3, None, true), None);
    }
}
