// ============================================================================
// GEOMETRY PRIMITIVES
// ============================================================================

/// A width/height pair, always updated together
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dimensions {
    width: f64,
    height: f64,
}

impl Dimensions {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn update(&mut self, width: f64, height: f64) -> &mut Self {
        self.width = width;
        self.height = height;
        self
    }

    pub const fn width(&self) -> f64 {
        self.width
    }

    pub const fn height(&self) -> f64 {
        self.height
    }
}

/// A straight segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Line {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }

    /// Rotates both endpoints around `(ox, oy)` by `degrees` (clockwise on screen).
    pub fn rotated(&self, degrees: f64, ox: f64, oy: f64) -> Self {
        let (x1, y1) = rotate_point(self.x1, self.y1, degrees, ox, oy);
        let (x2, y2) = rotate_point(self.x2, self.y2, degrees, ox, oy);
        Self { x1, y1, x2, y2 }
    }
}

/// Rotates a point the way an SVG `rotate(a, ox, oy)` transform does.
pub fn rotate_point(x: f64, y: f64, degrees: f64, ox: f64, oy: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (dx, dy) = (x - ox, y - oy);
    (ox + dx * cos - dy * sin, oy + dx * sin + dy * cos)
}

/// Axis-aligned rectangle with derived size and aspect ratios.
///
/// Every mutator recomputes the derived fields before returning, so
/// `width()`, `height()` and the ratios always describe the current corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    dimensions: Dimensions,
    width_over_height: f64,
    height_over_width: f64,
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl Rectangle {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let mut rect = Self {
            x1,
            y1,
            x2,
            y2,
            dimensions: Dimensions::default(),
            width_over_height: 0.0,
            height_over_width: 0.0,
        };
        rect.recompute();
        rect
    }

    pub fn update(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> &mut Self {
        self.x1 = x1;
        self.y1 = y1;
        self.x2 = x2;
        self.y2 = y2;
        self.recompute();
        self
    }

    pub fn update_from_rect(&mut self, other: &Rectangle) -> &mut Self {
        self.update(other.x1, other.y1, other.x2, other.y2)
    }

    pub const fn x1(&self) -> f64 {
        self.x1
    }

    pub const fn y1(&self) -> f64 {
        self.y1
    }

    pub const fn x2(&self) -> f64 {
        self.x2
    }

    pub const fn y2(&self) -> f64 {
        self.y2
    }

    pub const fn width(&self) -> f64 {
        self.dimensions.width
    }

    pub const fn height(&self) -> f64 {
        self.dimensions.height
    }

    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub const fn width_over_height(&self) -> f64 {
        self.width_over_height
    }

    pub const fn height_over_width(&self) -> f64 {
        self.height_over_width
    }

    pub fn set_x1(&mut self, x1: f64) -> &mut Self {
        self.x1 = x1;
        self.recompute();
        self
    }

    pub fn set_y1(&mut self, y1: f64) -> &mut Self {
        self.y1 = y1;
        self.recompute();
        self
    }

    pub fn set_x2(&mut self, x2: f64) -> &mut Self {
        self.x2 = x2;
        self.recompute();
        self
    }

    pub fn set_y2(&mut self, y2: f64) -> &mut Self {
        self.y2 = y2;
        self.recompute();
        self
    }

    /// Moves `x2` so the width becomes `width`; `x1` stays put.
    pub fn set_width(&mut self, width: f64) -> &mut Self {
        self.x2 = self.x1 + width;
        self.recompute();
        self
    }

    /// Moves `y2` so the height becomes `height`; `y1` stays put.
    pub fn set_height(&mut self, height: f64) -> &mut Self {
        self.y2 = self.y1 + height;
        self.recompute();
        self
    }

    pub fn set_width_height(&mut self, width: f64, height: f64) -> &mut Self {
        self.set_width(width).set_height(height)
    }

    pub fn set_dimensions(&mut self, dimensions: Dimensions) -> &mut Self {
        self.set_width_height(dimensions.width, dimensions.height)
    }

    /// Resizes by a multiplication factor in the horizontal direction
    pub fn scale_width(&mut self, factor: f64) -> &mut Self {
        let width = self.width() * factor;
        self.set_width(width)
    }

    /// Resizes by a multiplication factor in the vertical direction
    pub fn scale_height(&mut self, factor: f64) -> &mut Self {
        let height = self.height() * factor;
        self.set_height(height)
    }

    pub fn move_by_factor_horizontal(&mut self, factor: f64) -> &mut Self {
        let width = self.width();
        self.x1 *= factor;
        self.x2 = self.x1 + width;
        self.recompute();
        self
    }

    pub fn move_by_factor_vertical(&mut self, factor: f64) -> &mut Self {
        let height = self.height();
        self.y1 *= factor;
        self.y2 = self.y1 + height;
        self.recompute();
        self
    }

    /// First resizes, then moves by the same factor horizontally
    pub fn move_and_scale_horizontal(&mut self, factor: f64) -> &mut Self {
        self.scale_width(factor).move_by_factor_horizontal(factor)
    }

    /// First resizes, then moves by the same factor vertically
    pub fn move_and_scale_vertical(&mut self, factor: f64) -> &mut Self {
        self.scale_height(factor).move_by_factor_vertical(factor)
    }

    pub fn move_absolute_horizontal(&mut self, x1: f64) -> &mut Self {
        let width = self.width();
        self.x1 = x1;
        self.x2 = x1 + width;
        self.recompute();
        self
    }

    pub fn move_absolute_vertical(&mut self, y1: f64) -> &mut Self {
        let height = self.height();
        self.y1 = y1;
        self.y2 = y1 + height;
        self.recompute();
        self
    }

    pub fn move_delta_horizontal(&mut self, delta: f64) -> &mut Self {
        self.x1 += delta;
        self.x2 += delta;
        self.recompute();
        self
    }

    pub fn move_delta_vertical(&mut self, delta: f64) -> &mut Self {
        self.y1 += delta;
        self.y2 += delta;
        self.recompute();
        self
    }

    /// Grows by moving `(x2, y2)`; `(x1, y1)` remains the same.
    pub fn grow_from_top_left(&mut self, grow_width_by: f64, grow_height_by: f64) -> &mut Self {
        let (width, height) = (self.width(), self.height());
        self.set_width_height(width + grow_width_by, height + grow_height_by)
    }

    pub fn shrink_from_top_left(
        &mut self,
        shrink_width_by: f64,
        shrink_height_by: f64,
    ) -> &mut Self {
        self.grow_from_top_left(-shrink_width_by, -shrink_height_by)
    }

    /// Moves the top edge down so `y2` is unchanged and the height becomes `height`.
    pub fn shrink_to_height_from_bottom(&mut self, height: f64) -> &mut Self {
        self.set_y1(self.y2 - height)
    }

    /// Moves the origin, then shrinks from the (new) top-left corner.
    ///
    /// Moving by `(d, d)` and shrinking by `(2d, 2d)` insets the box by `d`
    /// on all four sides while keeping its center.
    pub fn shrink_and_move(
        &mut self,
        move_x1: f64,
        move_y1: f64,
        shrink_width_by: f64,
        shrink_height_by: f64,
    ) -> &mut Self {
        self.x1 += move_x1;
        self.y1 += move_y1;
        self.recompute();
        self.shrink_from_top_left(shrink_width_by, shrink_height_by)
    }

    fn recompute(&mut self) {
        let width = (self.x2 - self.x1).abs();
        let height = (self.y2 - self.y1).abs();
        self.dimensions.update(width, height);
        self.width_over_height = width / height;
        self.height_over_width = height / width;
    }
}
