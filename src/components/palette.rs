// ============================================================================
// COLOR PALETTE — active color + recency list consumed by the editor
// ============================================================================

use std::collections::VecDeque;

use crate::canvas::Color;

/// How many recently used colors are remembered.
pub const MAX_RECENT_COLORS: usize = 10;

/// Default 16-color pixel-art palette for new documents.
pub const DEFAULT_COLORS: [Color; 16] = [
    Color::rgb(0x14, 0x0c, 0x1c),
    Color::rgb(0x44, 0x24, 0x34),
    Color::rgb(0x30, 0x34, 0x6d),
    Color::rgb(0x4e, 0x4a, 0x4e),
    Color::rgb(0x85, 0x4c, 0x30),
    Color::rgb(0x34, 0x65, 0x24),
    Color::rgb(0xd0, 0x46, 0x48),
    Color::rgb(0x75, 0x71, 0x61),
    Color::rgb(0x59, 0x7d, 0xce),
    Color::rgb(0xd2, 0x7d, 0x2c),
    Color::rgb(0x85, 0x95, 0xa1),
    Color::rgb(0x6d, 0xaa, 0x2c),
    Color::rgb(0xd2, 0xaa, 0x99),
    Color::rgb(0x6d, 0xc2, 0xca),
    Color::rgb(0xda, 0xd4, 0x5e),
    Color::rgb(0xde, 0xee, 0xd6),
];

/// Ordered color list plus the active drawing color and a most-recent-first
/// list of recently used colors. The canvas engine only ever reads the active
/// color; selection flows in from the UI or from the Eyedropper.
#[derive(Clone, Debug)]
pub struct Palette {
    colors: Vec<Color>,
    active: Color,
    recent: VecDeque<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_COLORS.to_vec())
    }
}

impl Palette {
    /// A palette starts with its first entry active. An empty list falls back
    /// to the default set.
    pub fn new(colors: Vec<Color>) -> Self {
        let colors = if colors.is_empty() { DEFAULT_COLORS.to_vec() } else { colors };
        let active = colors[0];
        Self {
            colors,
            active,
            recent: VecDeque::new(),
        }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn active(&self) -> Color {
        self.active
    }

    /// Recently used colors, most recent first.
    pub fn recent(&self) -> impl Iterator<Item = Color> + '_ {
        self.recent.iter().copied()
    }

    /// Select the active color, promoting it in the recency list.
    pub fn set_active(&mut self, color: Color) {
        self.active = color;
        self.recent.retain(|c| *c != color);
        self.recent.push_front(color);
        self.recent.truncate(MAX_RECENT_COLORS);
    }

    /// Swap in a whole new color list (document load / palette import).
    /// The active color resets to the first entry; recency is kept.
    pub fn replace(&mut self, colors: Vec<Color>) {
        if colors.is_empty() {
            return;
        }
        self.active = colors[0];
        self.colors = colors;
    }

    /// Palette entries packed as ARGB ints for the document format.
    pub fn to_packed(&self) -> Vec<i32> {
        self.colors.iter().map(|c| c.to_argb()).collect()
    }

    pub fn from_packed(packed: &[i32]) -> Vec<Color> {
        packed.iter().map(|v| Color::from_argb(*v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_has_sixteen_colors() {
        let p = Palette::default();
        assert_eq!(p.colors().len(), 16);
        assert_eq!(p.active(), DEFAULT_COLORS[0]);
    }

    #[test]
    fn set_active_promotes_in_recency_list() {
        let mut p = Palette::default();
        let a = Color::rgb(1, 1, 1);
        let b = Color::rgb(2, 2, 2);
        p.set_active(a);
        p.set_active(b);
        p.set_active(a);
        let recent: Vec<Color> = p.recent().collect();
        assert_eq!(recent, vec![a, b]);
    }

    #[test]
    fn recency_list_is_bounded() {
        let mut p = Palette::default();
        for i in 0..20u8 {
            p.set_active(Color::rgb(i, 0, 0));
        }
        assert_eq!(p.recent().count(), MAX_RECENT_COLORS);
        assert_eq!(p.recent().next(), Some(Color::rgb(19, 0, 0)));
    }

    #[test]
    fn replace_ignores_empty_list() {
        let mut p = Palette::default();
        let before = p.colors().to_vec();
        p.replace(Vec::new());
        assert_eq!(p.colors(), &before[..]);
    }

    #[test]
    fn packed_round_trip() {
        let p = Palette::default();
        let packed = p.to_packed();
        assert_eq!(Palette::from_packed(&packed), p.colors());
    }
}
