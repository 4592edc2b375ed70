//! Map viewport framing for place sets.
//!
//! A [`Viewport`] is derived state: it is always recomputed as a pure
//! function of the current place set and never independently mutated.

use geo::Coord;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Padding factor applied to the framed extent so edge markers are not
/// clipped against the viewport boundary.
pub const FRAME_PADDING: f64 = 1.2;

/// Latitude and longitude extent of a rectangular map region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    /// Extent in degrees of latitude.
    pub lat_delta: f64,
    /// Extent in degrees of longitude.
    pub lon_delta: f64,
}

impl Span {
    /// Construct a span from its latitude and longitude extents.
    #[must_use]
    pub const fn new(lat_delta: f64, lon_delta: f64) -> Self {
        Self {
            lat_delta,
            lon_delta,
        }
    }
}

/// A rectangular map region described by a centre coordinate and a span.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use waymark_core::Viewport;
///
/// let framed = Viewport::frame([
///     Coord { x: -122.0, y: 37.0 },
///     Coord { x: -121.0, y: 38.0 },
/// ])
/// .expect("two coordinates frame a region");
/// assert_eq!(framed.center, Coord { x: -121.5, y: 37.5 });
/// assert_eq!(framed.span.lat_delta, 1.2);
/// assert_eq!(framed.span.lon_delta, 1.2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Viewport {
    /// Centre coordinate (`x = longitude`, `y = latitude`).
    pub center: Coord<f64>,
    /// Extent of the region around the centre.
    pub span: Span,
}

impl Default for Viewport {
    /// The start region before any search has framed one: central
    /// San Francisco with a 0.05-degree span.
    fn default() -> Self {
        Self {
            center: Coord {
                x: -122.4194,
                y: 37.7749,
            },
            span: Span::new(0.05, 0.05),
        }
    }
}

impl Viewport {
    /// Construct a viewport from a centre and span.
    #[must_use]
    pub const fn new(center: Coord<f64>, span: Span) -> Self {
        Self { center, span }
    }

    /// Compute the minimal padded viewport containing every coordinate.
    ///
    /// Returns `None` for an empty input; callers keep their previous
    /// viewport in that case rather than framing a degenerate region. A
    /// single coordinate frames a zero span; substitute a minimum with
    /// [`Viewport::with_min_span`] where one is needed.
    pub fn frame<I>(locations: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coord<f64>>,
    {
        let mut points = locations.into_iter();
        let first = points.next()?;
        let mut min = first;
        let mut max = first;
        for location in points {
            min.x = min.x.min(location.x);
            min.y = min.y.min(location.y);
            max.x = max.x.max(location.x);
            max.y = max.y.max(location.y);
        }

        #[expect(clippy::float_arithmetic, reason = "midpoint and extent of the frame")]
        let viewport = Self {
            center: Coord {
                x: (min.x + max.x) / 2.0,
                y: (min.y + max.y) / 2.0,
            },
            span: Span::new(
                (max.y - min.y) * FRAME_PADDING,
                (max.x - min.x) * FRAME_PADDING,
            ),
        };
        Some(viewport)
    }

    /// Return a viewport whose span is at least `min` on each axis.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use waymark_core::{Span, Viewport};
    ///
    /// let single = Viewport::frame([Coord { x: 0.0, y: 0.0 }])
    ///     .expect("one coordinate frames a region")
    ///     .with_min_span(Span::new(0.05, 0.05));
    /// assert_eq!(single.span, Span::new(0.05, 0.05));
    /// ```
    #[must_use]
    pub fn with_min_span(mut self, min: Span) -> Self {
        self.span.lat_delta = self.span.lat_delta.max(min.lat_delta);
        self.span.lon_delta = self.span.lon_delta.max(min.lon_delta);
        self
    }
}
