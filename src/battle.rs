//! Battle menu detection from the visible tile grid.
//!
//! The bottom seven rows of the screen hold the battle text box. Each known
//! screen is stored as the literal tile ids PyBoy reports for that box
//! (character code + 256).

use crate::snapshot::TileGrid;
use serde::{Deserialize, Serialize};

pub const TEMPLATE_ROWS: usize = 7;
pub const TEMPLATE_COLS: usize = 20;
pub const BLANK_TILE: u16 = 383;

pub type Template = [[u16; TEMPLATE_COLS]; TEMPLATE_ROWS];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleScreen {
    /// Main battle menu, cursor on FIGHT.
    Fight,
    /// Move list open, cursor on the first move.
    AttackChosen,
    /// "SQUIRTLE used TACKLE!"
    TacklePerformed,
    /// "Got away safely!"
    Fled,
}

impl BattleScreen {
    pub const ALL: [BattleScreen; 4] = [
        BattleScreen::Fight,
        BattleScreen::AttackChosen,
        BattleScreen::TacklePerformed,
        BattleScreen::Fled,
    ];

    pub fn template(self) -> &'static Template {
        match self {
            BattleScreen::Fight => &FIGHT_MENU,
            BattleScreen::AttackChosen => &MOVE_SELECT,
            BattleScreen::TacklePerformed => &TACKLE_USED,
            BattleScreen::Fled => &GOT_AWAY,
        }
    }

    /// A full screen of blank tiles with this screen's text box at the bottom.
    pub fn render(self) -> TileGrid {
        let mut grid = TileGrid::filled(TileGrid::SCREEN_ROWS, TileGrid::SCREEN_COLS, BLANK_TILE);
        let top = TileGrid::SCREEN_ROWS - TEMPLATE_ROWS;
        for (r, row) in self.template().iter().enumerate() {
            for (c, tile) in row.iter().enumerate() {
                grid.set(top + r, c, *tile);
            }
        }
        grid
    }
}

/// Decides which battle screen, if any, is showing.
#[typetag::serde]
pub trait BattleScreenClassifier: std::fmt::Debug + Send {
    /// `bottom` is the last `TEMPLATE_ROWS` rows of the screen, row-major.
    fn classify(&self, bottom: &[u16]) -> Option<BattleScreen>;
}

/// Exact tile-for-tile comparison against the known templates.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExactTemplateClassifier;

#[typetag::serde]
impl BattleScreenClassifier for ExactTemplateClassifier {
    fn classify(&self, bottom: &[u16]) -> Option<BattleScreen> {
        if bottom.len() != TEMPLATE_ROWS * TEMPLATE_COLS {
            return None;
        }
        BattleScreen::ALL.iter().copied().find(|screen| {
            screen
                .template()
                .iter()
                .zip(bottom.chunks_exact(TEMPLATE_COLS))
                .all(|(expected, actual)| expected[..] == *actual)
        })
    }
}

#[rustfmt::skip]
const FIGHT_MENU: Template = [
    [383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383],
    [377, 378, 378, 378, 378, 378, 378, 378, 377, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 379],
    [380, 383, 383, 383, 383, 383, 383, 383, 380, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 380],
    [380, 383, 383, 383, 383, 383, 383, 383, 380, 493, 389, 392, 390, 391, 403, 383, 481, 482, 383, 380],
    [380, 383, 383, 383, 383, 383, 383, 383, 380, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 380],
    [380, 383, 383, 383, 383, 383, 383, 383, 380, 383, 392, 403, 388, 396, 383, 383, 401, 404, 397, 380],
    [381, 378, 378, 378, 378, 378, 378, 378, 381, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 382],
];

#[rustfmt::skip]
const MOVE_SELECT: Template = [
    [383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383],
    [383, 383, 383, 383, 377, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 379],
    [383, 383, 383, 383, 380, 493, 403, 384, 386, 394, 395, 388, 383, 383, 383, 383, 383, 383, 383, 380],
    [383, 383, 383, 383, 380, 383, 390, 401, 398, 406, 395, 383, 383, 383, 383, 383, 383, 383, 383, 380],
    [383, 383, 383, 383, 380, 383, 483, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 380],
    [383, 383, 383, 383, 380, 383, 483, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 380],
    [383, 383, 383, 383, 381, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 382],
];

#[rustfmt::skip]
const TACKLE_USED: Template = [
    [383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383],
    [377, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 379],
    [380, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 380],
    [380, 402, 400, 404, 392, 401, 403, 395, 388, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 380],
    [380, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 380],
    [380, 436, 434, 420, 419, 383, 403, 384, 386, 394, 395, 388, 487, 383, 383, 383, 383, 383, 383, 380],
    [381, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 382],
];

#[rustfmt::skip]
const GOT_AWAY: Template = [
    [383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383],
    [377, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 379],
    [380, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 380],
    [380, 390, 430, 435, 383, 416, 438, 416, 440, 383, 434, 416, 421, 420, 427, 440, 487, 383, 383, 380],
    [380, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 380],
    [380, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 383, 380],
    [381, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 378, 382],
];

#[cfg(test)]
mod test {
    use super::*;

    fn bottom(grid: &TileGrid) -> Vec<u16> {
        grid.bottom_rows(TEMPLATE_ROWS).unwrap().to_vec()
    }

    #[test]
    fn every_template_classifies_as_itself() {
        let classifier = ExactTemplateClassifier;
        for screen in BattleScreen::ALL.iter().copied() {
            let grid = screen.render();
            assert_eq!(classifier.classify(&bottom(&grid)), Some(screen));
        }
    }

    #[test]
    fn templates_are_distinct() {
        for a in BattleScreen::ALL.iter() {
            for b in BattleScreen::ALL.iter() {
                if a != b {
                    assert_ne!(a.template(), b.template());
                }
            }
        }
    }

    #[test]
    fn single_tile_difference_is_no_match() {
        let mut grid = BattleScreen::Fight.render();
        grid.set(14, 9, BLANK_TILE); // hide the cursor
        assert_eq!(ExactTemplateClassifier.classify(&bottom(&grid)), None);
    }

    #[test]
    fn overworld_is_no_match() {
        let grid = TileGrid::filled(18, 20, 0x101);
        assert_eq!(ExactTemplateClassifier.classify(&bottom(&grid)), None);
    }

    #[test]
    fn wrong_length_is_no_match() {
        assert_eq!(ExactTemplateClassifier.classify(&[BLANK_TILE; 20]), None);
    }
}
