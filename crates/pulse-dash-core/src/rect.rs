//! Pixel-space rectangle used when filling raster surfaces.

/// Axis-aligned rectangle in raster pixels, origin at the top-left
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_w_h(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    pub fn left(&self) -> u32 {
        self.x
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    pub fn top(&self) -> u32 {
        self.y
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Restricts the rectangle to a `width` x `height` surface
    pub fn clipped(&self, width: u32, height: u32) -> PixelRect {
        let left = self.left().min(width);
        let top = self.top().min(height);
        let right = self.right().min(width);
        let bottom = self.bottom().min(height);
        PixelRect::new(left, top, right - left, bottom - top)
    }
}

/// Pixel edge of cell `index` when `count` cells share `size` pixels.
///
/// Consecutive cells tile the axis exactly; cells narrower than a pixel
/// collapse to an empty span.
pub fn cell_edge(index: usize, count: usize, size: u32) -> u32 {
    if count == 0 {
        return 0;
    }
    (index as u64 * size as u64 / count as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipping() {
        let rect = PixelRect::new(5, 5, 10, 10).clipped(8, 20);
        assert_eq!(rect, PixelRect::new(5, 5, 3, 10));
        assert!(PixelRect::new(30, 0, 4, 4).clipped(8, 8).is_empty());
    }

    #[test]
    fn test_cell_edges_tile_axis() {
        let edges: Vec<u32> = (0..=3).map(|i| cell_edge(i, 3, 100)).collect();
        assert_eq!(edges, vec![0, 33, 66, 100]);
        assert_eq!(cell_edge(0, 0, 100), 0);
    }
}
