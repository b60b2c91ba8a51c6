use std::ops::Range;

use crate::renderer::Rgba;

/// Depth of a pixel no pass has touched yet.
pub const FAR_DEPTH: f32 = 1.0;
/// Stencil value marking a wall-occupied pixel.
pub const STENCIL_WALL: u8 = 1;

/// Screen, stencil and depth planes, all `width × height`, row-major.
#[derive(Default)]
pub struct FrameBuffers {
    pub width: usize,
    pub height: usize,
    pub screen: Vec<Rgba>,
    pub stencil: Vec<u8>,
    /// distance / far-plane, 0‥1
    pub depth: Vec<f32>,
}

/// Mutable view of a contiguous run of rows in all three planes.
///
/// Bands handed out by [`FrameBuffers::bands`] never overlap, so each one can
/// be filled by a different worker without locking.
pub struct RowBand<'a> {
    pub rows: Range<usize>,
    pub width: usize,
    pub screen: &'a mut [Rgba],
    pub stencil: &'a mut [u8],
    pub depth: &'a mut [f32],
}

impl RowBand<'_> {
    /// Band-local index of screen pixel `(x, y)`; `y` is an absolute row.
    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(self.rows.contains(&y));
        (y - self.rows.start) * self.width + x
    }
}

impl FrameBuffers {
    pub fn new(width: usize, height: usize) -> Self {
        let mut fb = Self::default();
        fb.resize(width, height);
        fb
    }

    /// Reallocate if the resolution changed.  Contents are unspecified until
    /// the next [`FrameBuffers::clear`].
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        let len = width * height;
        self.width = width;
        self.height = height;
        self.screen.resize(len, 0);
        self.stencil.resize(len, 0);
        self.depth.resize(len, FAR_DEPTH);
    }

    /// Start-of-frame state: black screen, empty stencil, far depth.
    pub fn clear(&mut self) {
        self.screen.fill(0);
        self.stencil.fill(0);
        self.depth.fill(FAR_DEPTH);
    }

    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Split all planes into row bands matching `ranges`.
    ///
    /// `ranges` must be contiguous, ascending and start at row 0 (as produced
    /// by [`super::parallel::split_range`]).
    pub fn bands(&mut self, ranges: &[Range<usize>]) -> Vec<RowBand<'_>> {
        let width = self.width;
        let mut screen = self.screen.as_mut_slice();
        let mut stencil = self.stencil.as_mut_slice();
        let mut depth = self.depth.as_mut_slice();

        let mut out = Vec::with_capacity(ranges.len());
        let mut next_row = 0;
        for rows in ranges {
            debug_assert_eq!(rows.start, next_row, "row bands must be contiguous");
            debug_assert!(rows.end <= self.height);
            next_row = rows.end;

            let len = rows.len() * width;
            let (band_screen, rest) = std::mem::take(&mut screen).split_at_mut(len);
            screen = rest;
            let (band_stencil, rest) = std::mem::take(&mut stencil).split_at_mut(len);
            stencil = rest;
            let (band_depth, rest) = std::mem::take(&mut depth).split_at_mut(len);
            depth = rest;

            out.push(RowBand {
                rows: rows.clone(),
                width,
                screen: band_screen,
                stencil: band_stencil,
                depth: band_depth,
            });
        }
        out
    }
}
