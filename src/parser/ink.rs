//! Handwriting overlay decoding and per-page stroke clipping.
//!
//! The overlay stores every stroke of the note in four parallel arrays:
//! interleaved point coordinates, per-stroke point counts, per-stroke widths
//! and per-stroke RGBA colours. Strokes are never split by page; a page
//! picks the points whose y falls inside its span at render time.

use kurbo::{BezPath, Point};

use crate::error::Result;
use crate::graph::schema::keys;
use crate::graph::{access, access_from, GraphNode, GraphStore, SchemaIndices};
use crate::model::{PageSpan, RenderableStroke, Rgba8, Stroke};

/// Width used when a stroke has no width entry.
const DEFAULT_STROKE_WIDTH: f32 = 1.0;

/// Decoded handwriting overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InkOverlay {
    points: Vec<f32>,
    num_points: Vec<u32>,
    widths: Vec<f32>,
    colors: Vec<u8>,
}

impl InkOverlay {
    /// Decode the overlay of a session.
    ///
    /// Returns `Ok(None)` when the note has no ink: the overlay or any of
    /// its arrays is absent.
    pub fn load(store: &GraphStore, schema: &SchemaIndices) -> Result<Option<Self>> {
        let overlay = match access(
            store,
            schema.layout_info,
            &[keys::HANDWRITING_OVERLAY.into(), keys::SPATIAL_HASH.into()],
        ) {
            Ok(leaf) => leaf.into_node()?,
            Err(e) if e.is_missing() => {
                log::debug!("No handwriting overlay: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let Some(points) = overlay_data(store, overlay, keys::CURVES_POINTS)? else {
            return Ok(None);
        };
        let Some(num_points) = overlay_data(store, overlay, keys::CURVES_NUM_POINTS)? else {
            return Ok(None);
        };
        let Some(widths) = overlay_data(store, overlay, keys::CURVES_WIDTH)? else {
            return Ok(None);
        };
        let Some(colors) = overlay_data(store, overlay, keys::CURVES_COLORS)? else {
            return Ok(None);
        };

        Ok(Some(Self {
            points: decode_f32(points, keys::CURVES_POINTS),
            num_points: decode_u32(num_points, keys::CURVES_NUM_POINTS),
            widths: decode_f32(widths, keys::CURVES_WIDTH),
            colors: colors.to_vec(),
        }))
    }

    /// Build an overlay from already-decoded arrays.
    pub fn from_parts(
        points: Vec<f32>,
        num_points: Vec<u32>,
        widths: Vec<f32>,
        colors: Vec<u8>,
    ) -> Self {
        Self {
            points,
            num_points,
            widths,
            colors,
        }
    }

    /// Number of strokes declared by the overlay.
    pub fn stroke_count(&self) -> usize {
        self.num_points.len()
    }

    /// Iterate over strokes in paint order.
    pub fn strokes(&self) -> Strokes<'_> {
        Strokes {
            overlay: self,
            index: 0,
            pos: 0,
            done: false,
        }
    }

    /// Largest y coordinate of any point, or 0 without points.
    pub fn max_y(&self) -> f64 {
        self.points
            .chunks_exact(2)
            .map(|p| f64::from(p[1]))
            .filter(|y| y.is_finite())
            .fold(0.0, f64::max)
    }

    /// The page-local polylines to draw for a page.
    ///
    /// Only points with y in the span are emitted; the first becomes a
    /// move-to and the rest line-tos. Strokes without visible points are
    /// dropped.
    pub fn strokes_for_page(&self, span: PageSpan) -> Vec<RenderableStroke> {
        self.strokes()
            .filter_map(|stroke| {
                let mut path = BezPath::new();
                for (x, y) in stroke.iter_points().filter(|(_, y)| span.contains(*y)) {
                    let point = Point::new(x, span.to_local(y));
                    if path.elements().is_empty() {
                        path.move_to(point);
                    } else {
                        path.line_to(point);
                    }
                }

                if path.elements().is_empty() {
                    return None;
                }
                Some(RenderableStroke {
                    path,
                    width: f64::from(stroke.width),
                    color: stroke.color,
                })
            })
            .collect()
    }
}

/// Iterator over the strokes of an overlay.
///
/// The point cursor advances by each stroke's full span whether or not any
/// of its points are drawn.
#[derive(Debug, Clone)]
pub struct Strokes<'a> {
    overlay: &'a InkOverlay,
    index: usize,
    pos: usize,
    done: bool,
}

impl<'a> Iterator for Strokes<'a> {
    type Item = Stroke<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let overlay = self.overlay;
        let count = *overlay.num_points.get(self.index)? as usize;
        let i = self.index;

        let start = self.pos.min(overlay.points.len());
        let end = self.pos.saturating_add(count.saturating_mul(2));
        if end > overlay.points.len() {
            log::warn!(
                "Stroke {} declares {} points but only {} coordinates remain; truncating",
                i,
                count,
                overlay.points.len() - start
            );
            self.done = true;
        }
        let points = &overlay.points[start..end.min(overlay.points.len())];

        self.pos = end;
        self.index += 1;

        let width = overlay.widths.get(i).copied().unwrap_or(DEFAULT_STROKE_WIDTH);
        let color = overlay
            .colors
            .get(i * 4..i * 4 + 4)
            .and_then(Rgba8::from_slice)
            .unwrap_or(Rgba8::BLACK);

        Some(Stroke {
            points,
            width,
            color,
        })
    }
}

fn overlay_data<'s>(
    store: &'s GraphStore,
    overlay: &'s GraphNode,
    key: &str,
) -> Result<Option<&'s [u8]>> {
    match access_from(store, overlay, &[key.into()]) {
        Ok(leaf) => Ok(Some(leaf.into_data()?)),
        Err(e) if e.is_missing() => {
            log::debug!("Handwriting overlay has no '{}' array", key);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn decode_f32(data: &[u8], name: &str) -> Vec<f32> {
    if data.len() % 4 != 0 {
        log::warn!("'{}' has {} trailing bytes", name, data.len() % 4);
    }
    data.chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn decode_u32(data: &[u8], name: &str) -> Vec<u32> {
    if data.len() % 4 != 0 {
        log::warn!("'{}' has {} trailing bytes", name, data.len() % 4);
    }
    data.chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
