//! Geometry of the preview.
//!
//! Coordinates follow SVG and the pixel coordinates `spright` reports: the
//! origin is the top-left corner, x grows to the right and y grows down.
//! Zooming scales about the origin, so a sprite at pixel `(4, 8)` of a
//! source lands at `(8, 16)` of its canvas at zoom 2.

/// A position in preview space.
///
/// # Examples
///
/// ```
/// # use spright_core::geometry::Point;
/// let pivot = Point::new(3.0, 4.0).offset(Point::new(10.0, 20.0)).scale(2.0);
/// assert_eq!(pivot, Point::new(26.0, 48.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns this point moved by `delta`.
    pub fn offset(self, delta: Point) -> Self {
        Self::new(self.x + delta.x, self.y + delta.y)
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// Width and height of a laid out element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Grows the size by the insets on all four sides.
    pub fn add_padding(self, insets: Insets) -> Self {
        Self::new(
            self.width + insets.horizontal_sum(),
            self.height + insets.vertical_sum(),
        )
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// The size of `other` stacked below this one.
    pub fn merge_vertical(self, other: Size) -> Self {
        Self::new(self.width.max(other.width), self.height + other.height)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates the rectangle of `size` whose top-left corner is `origin`.
    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self {
            min_x: origin.x,
            min_y: origin.y,
            max_x: origin.x + size.width,
            max_y: origin.y + size.height,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner.
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    pub fn translate(self, delta: Point) -> Self {
        Self::from_origin(self.min_point().offset(delta), self.to_size())
    }

    /// Scales all coordinates about the origin.
    ///
    /// # Examples
    ///
    /// ```
    /// # use spright_core::geometry::{Bounds, Point, Size};
    /// let sprite = Bounds::from_origin(Point::new(4.0, 8.0), Size::new(16.0, 16.0));
    /// let zoomed = sprite.scale(2.0);
    /// assert_eq!(zoomed.min_point(), Point::new(8.0, 16.0));
    /// assert_eq!(zoomed.width(), 32.0);
    /// ```
    pub fn scale(self, factor: f32) -> Self {
        Self {
            min_x: self.min_x * factor,
            min_y: self.min_y * factor,
            max_x: self.max_x * factor,
            max_y: self.max_y * factor,
        }
    }
}

/// Space kept free around an element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}
