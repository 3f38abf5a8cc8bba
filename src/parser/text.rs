//! Attributed text decoding and run layout.
//!
//! A text store holds an attributed string: one backing string plus a list
//! of attribute sets. Each set is an archived dictionary (parallel
//! `NS.keys` / `NS.objects` arrays) whose `range` entry selects the bytes
//! it styles.

use kurbo::Point;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::graph::schema::keys;
use crate::graph::{access, access_from, string_value, GraphNode, GraphStore, LeafValue, SchemaIndices};
use crate::model::{PageSpan, PlacedRun, Rgb, TextRun};

use super::media::parse_composite;

/// Line counting seam for run layout.
pub trait TextMeasure: Send + Sync {
    /// Number of lines `text` occupies at `font_size` within `max_width`.
    fn line_count(&self, text: &str, font_size: f64, max_width: f64) -> usize;
}

/// Counts hard line breaks only; never wraps.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineBreakMeasure;

impl TextMeasure for LineBreakMeasure {
    fn line_count(&self, text: &str, _font_size: f64, _max_width: f64) -> usize {
        text.lines().count().max(1)
    }
}

/// An ordered association list decoded from an archived dictionary.
pub type AttributeSet<'s> = Vec<(&'s str, LeafValue<'s>)>;

/// Decodes text stores into styled runs.
#[derive(Debug, Clone, Copy)]
pub struct TextRunResolver<'s> {
    store: &'s GraphStore,
}

impl<'s> TextRunResolver<'s> {
    /// Create a resolver.
    pub fn new(store: &'s GraphStore) -> Self {
        Self { store }
    }

    /// The document-global text store, if the session has one.
    pub fn global_store(&self, schema: &SchemaIndices) -> Result<Option<&'s GraphNode>> {
        match access(self.store, schema.text_store, &[keys::TEXT_STORE.into()]) {
            Ok(leaf) => Ok(Some(leaf.into_node()?)),
            Err(e) if e.is_missing() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The backing string of a text store.
    pub fn backing_string(&self, text_store: &'s GraphNode) -> Result<&'s str> {
        let leaf = access_from(
            self.store,
            text_store,
            &[keys::ATTRIBUTED_STRING.into(), keys::STRING.into()],
        )?;
        Ok(string_value(self.store, leaf)?)
    }

    /// The attribute sets of a text store, in stored order.
    ///
    /// A store without attributes has no sets.
    pub fn attribute_sets(&self, text_store: &'s GraphNode) -> Result<Vec<AttributeSet<'s>>> {
        let attributes = match access_from(
            self.store,
            text_store,
            &[keys::ATTRIBUTED_STRING.into(), keys::ATTRIBUTES.into()],
        ) {
            Ok(leaf) => leaf.into_node()?,
            Err(e) if e.is_missing() => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        // a single dictionary or an archived array of them
        if access_from(self.store, attributes, &[keys::NS_KEYS.into()]).is_ok() {
            return Ok(vec![self.association_list(attributes)?]);
        }

        let count = access_from(self.store, attributes, &[keys::NS_OBJECTS.into()])?
            .into_array()?
            .len();
        let mut sets = Vec::with_capacity(count);
        for i in 0..count {
            let set = access_from(self.store, attributes, &[keys::NS_OBJECTS.into(), i.into()])
                .map_err(Error::from)
                .and_then(|leaf| Ok(leaf.into_node()?))
                .and_then(|node| self.association_list(node));
            match set {
                Ok(set) => sets.push(set),
                Err(e) => log::warn!("Skipping attribute set {}: {}", i, e),
            }
        }
        Ok(sets)
    }

    /// Decode a store into runs. Runs that cannot be decoded are logged and
    /// skipped.
    pub fn runs(&self, text_store: &'s GraphNode) -> Result<Vec<TextRun>> {
        let text = self.backing_string(text_store)?;
        let sets = self.attribute_sets(text_store)?;

        if sets.is_empty() {
            if text.is_empty() {
                return Ok(Vec::new());
            }
            return Ok(vec![TextRun::new(0..text.len(), normalize(text))]);
        }

        Ok(sets
            .iter()
            .enumerate()
            .filter_map(|(i, set)| match self.run(text, set) {
                Ok(run) => Some(run),
                Err(e) => {
                    log::warn!("Skipping text run {}: {}", i, e);
                    None
                }
            })
            .collect())
    }

    fn run(&self, text: &str, set: &AttributeSet<'s>) -> Result<TextRun> {
        let mut range = None;
        let mut font = None;
        let mut color = None;

        for (key, value) in set {
            let applied = match *key {
                keys::ATTR_RANGE => self.range(*value).map(|r| range = Some(r)),
                keys::ATTR_FONT => self.font(*value).map(|f| font = Some(f)),
                keys::ATTR_COLOR => self.color(*value).map(|c| color = Some(c)),
                keys::ATTR_OTHER => {
                    log::debug!("Ignoring other text attributes");
                    Ok(())
                }
                keys::ATTR_CROSS_PLATFORM_COLOR => {
                    log::debug!("Ignoring cross-platform colour");
                    Ok(())
                }
                unknown => {
                    log::info!(
                        "{}",
                        Error::UnknownSchemaValue(format!("text attribute '{}'", unknown))
                    );
                    Ok(())
                }
            };
            if let Err(e) = applied {
                log::warn!("Ignoring text attribute '{}': {}", key, e);
            }
        }

        let (start, len) =
            range.ok_or_else(|| Error::Format("attribute set has no range".to_string()))?;
        let end = start.saturating_add(len);
        let slice = text.get(start..end).ok_or_else(|| {
            Error::Format(format!(
                "range {}..{} is not valid in a {} byte string",
                start,
                end,
                text.len()
            ))
        })?;

        let mut run = TextRun::new(start..end, normalize(slice));
        if let Some((family, size)) = font {
            run = run.with_font(family, size);
        }
        if let Some(color) = color {
            run = run.with_color(color);
        }
        Ok(run)
    }

    fn association_list(&self, dict: &'s GraphNode) -> Result<AttributeSet<'s>> {
        let key_count = access_from(self.store, dict, &[keys::NS_KEYS.into()])?
            .into_array()?
            .len();
        let value_count = access_from(self.store, dict, &[keys::NS_OBJECTS.into()])?
            .into_array()?
            .len();
        if key_count != value_count {
            log::warn!(
                "Archived dictionary has {} keys but {} values",
                key_count,
                value_count
            );
        }

        let mut list = Vec::with_capacity(key_count.min(value_count));
        for i in 0..key_count.min(value_count) {
            let key = access_from(self.store, dict, &[keys::NS_KEYS.into(), i.into()])?;
            let key = string_value(self.store, key)?;
            let value = access_from(self.store, dict, &[keys::NS_OBJECTS.into(), i.into()])?;
            list.push((key, value));
        }
        Ok(list)
    }

    fn range(&self, value: LeafValue<'s>) -> Result<(usize, usize)> {
        let (start, len) = parse_composite(string_value(self.store, value)?)?;
        if !(start >= 0.0 && len >= 0.0) {
            return Err(Error::Format(format!("negative range {{{}, {}}}", start, len)));
        }
        Ok((start as usize, len as usize))
    }

    fn font(&self, value: LeafValue<'s>) -> Result<(String, f64)> {
        let font = value.into_node()?;
        let name = access_from(self.store, font, &[keys::FONT_NAME.into()])?;
        let name = string_value(self.store, name)?;
        let size = access_from(self.store, font, &[keys::FONT_SIZE.into()])?.into_real()?;
        Ok((name.to_string(), size))
    }

    fn color(&self, value: LeafValue<'s>) -> Result<Rgb> {
        let color = value.into_node()?;

        if let Ok(leaf) = access_from(self.store, color, &[keys::COLOR_RGB.into()]) {
            let components = color_components(leaf)?;
            if let [r, g, b, ..] = components[..] {
                return Ok(Rgb::new(r, g, b));
            }
            return Err(Error::Format(format!(
                "{} has {} components",
                keys::COLOR_RGB,
                components.len()
            )));
        }

        if let Ok(leaf) = access_from(self.store, color, &[keys::COLOR_WHITE.into()]) {
            if let Some(level) = color_components(leaf)?.first() {
                return Ok(Rgb::grey(*level));
            }
        }

        Err(Error::UnknownSchemaValue("colour without RGB or grey components".to_string()))
    }
}

/// Stack runs top to bottom starting at `origin`.
///
/// Each run is as tall as its line count times its font size.
pub fn layout_runs(
    runs: Vec<TextRun>,
    origin: Point,
    max_width: f64,
    measure: &dyn TextMeasure,
) -> Vec<PlacedRun> {
    let mut cursor = origin.y;
    runs.into_iter()
        .map(|run| {
            let lines = measure.line_count(&run.text, run.font_size, max_width);
            let height = lines as f64 * run.font_size;
            let placed = PlacedRun {
                x: origin.x,
                y: cursor,
                height,
                run,
            };
            cursor += height;
            placed
        })
        .collect()
}

/// Keep the placed runs whose vertical extent overlaps a page.
pub fn runs_on_page(runs: Vec<PlacedRun>, span: PageSpan) -> Vec<PlacedRun> {
    runs.into_iter()
        .filter(|placed| span.overlaps(placed.y, placed.height))
        .collect()
}

fn normalize(text: &str) -> String {
    text.nfc().collect()
}

/// Parse ASCII float components ("0.2 0.4 0.6 1"), stored as data or string.
fn color_components(leaf: LeafValue<'_>) -> Result<Vec<f32>> {
    let bytes = match leaf {
        LeafValue::Data(data) => data,
        LeafValue::Str(s) => s.as_bytes(),
        other => other.into_data()?,
    };
    let text = String::from_utf8_lossy(bytes);
    text.trim_end_matches('\0')
        .split_whitespace()
        .map(|part| {
            part.parse::<f32>()
                .map_err(|_| Error::Format(format!("bad colour component '{}'", part)))
        })
        .collect()
}
