//! Persistent glyph buffer and per-frame change mask

use crate::shading::BLANK;

/// What is currently on screen, plus which cells the last render touched
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    glyphs: Vec<char>,
    changed: Vec<bool>,
}

impl Frame {
    /// All cells start blank, matching a freshly cleared terminal
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            glyphs: vec![BLANK; width * height],
            changed: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    #[cfg(test)]
    pub(crate) fn height(&self) -> usize {
        self.glyphs.len() / self.width.max(1)
    }

    pub fn glyph(&self, row: usize, col: usize) -> char {
        self.glyphs[row * self.width + col]
    }

    pub fn is_changed(&self, row: usize, col: usize) -> bool {
        self.changed[row * self.width + col]
    }

    /// Number of cells flagged by the last render
    pub fn changed_count(&self) -> usize {
        self.changed.iter().filter(|&&c| c).count()
    }

    /// `(row, col, glyph)` for every flagged cell, row-major
    pub fn changes(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        let width = self.width;
        self.changed
            .iter()
            .zip(&self.glyphs)
            .enumerate()
            .filter(|(_, (changed, _))| **changed)
            .map(move |(i, (_, &glyph))| (i / width, i % width, glyph))
    }

    /// Rows of glyphs, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[char]> {
        self.glyphs.chunks(self.width.max(1))
    }

    pub(crate) fn clear_changes(&mut self) {
        self.changed.fill(false);
    }

    /// Row-aligned mutable views over glyphs and mask
    pub(crate) fn parts_mut(&mut self) -> (&mut [char], &mut [bool]) {
        (self.glyphs.as_mut_slice(), self.changed.as_mut_slice())
    }
}
