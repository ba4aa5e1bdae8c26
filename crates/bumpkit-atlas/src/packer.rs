//! Row-shelf rectangle packing.

/// Places rectangles into a fixed `width` x `height` area, row by row.
///
/// Each rectangle goes at the cursor `(x, y)`. When it does not fit in the
/// rest of the row, the cursor wraps to `x = 0` on a new shelf starting at
/// the bottom of the tallest rectangle placed so far (`row_max`). The wrap
/// happens even if the rectangle then fails to fit vertically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShelfPacker {
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    row_max: u32,
}

impl ShelfPacker {
    /// A packer over an empty `width` x `height` area.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            x: 0,
            y: 0,
            row_max: 0,
        }
    }

    /// A packer that keeps `(0, 0)` free for the atlas's default pixel.
    ///
    /// The first shelf starts at `x = 1` and is at least one pixel tall.
    pub fn with_reserved_origin(width: u32, height: u32) -> Self {
        Self {
            x: 1,
            row_max: 1,
            ..Self::new(width, height)
        }
    }

    /// Area width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Area height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current cursor `(x, y)`.
    pub fn cursor(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    /// Bottom edge of the tallest rectangle placed so far.
    pub fn row_max(&self) -> u32 {
        self.row_max
    }

    /// Place a `width` x `height` rectangle.
    ///
    /// Returns the top-left corner, or `None` when the area has no room.
    /// A returned corner always lies inside the area.
    pub fn place(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if self.x.checked_add(width).is_none_or(|right| right > self.width) {
            self.x = 0;
            self.y = self.row_max;
        }
        let right = self.x.checked_add(width)?;
        let bottom = self.y.checked_add(height)?;
        if right > self.width || bottom > self.height {
            return None;
        }
        if self.x >= self.width || self.y >= self.height {
            return None;
        }
        let corner = (self.x, self.y);
        self.x = right;
        self.row_max = self.row_max.max(bottom);
        Some(corner)
    }
}
