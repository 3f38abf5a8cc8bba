//! Synthetic note builder shared by the integration tests.
//!
//! Writes a binary keyed archive with `plist`, wraps it in a zip container
//! under `Note/`, and adds media files generated with `image`.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Write};

use image::{ImageFormat, RgbImage, RgbaImage};
use plist::{Dictionary, Uid, Value};
use zip::write::SimpleFileOptions;

pub const ROOT: &str = "Note";
pub const LOCKED_REFLOW: &str = "NBLockedReflowState";
pub const REFLOWABLE_REFLOW: &str = "NBReflowableReflowState";

/// One ink stroke.
#[derive(Debug, Clone)]
pub struct StrokeSpec {
    pub points: Vec<(f32, f32)>,
    pub width: f32,
    pub color: [u8; 4],
}

impl StrokeSpec {
    pub fn new(points: &[(f32, f32)]) -> Self {
        Self {
            points: points.to_vec(),
            width: 2.0,
            color: [0, 0, 0, 255],
        }
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn color(mut self, color: [u8; 4]) -> Self {
        self.color = color;
        self
    }
}

/// One attributed run: byte range, optional font and RGB colour.
#[derive(Debug, Clone)]
pub struct RunSpec {
    pub start: usize,
    pub len: usize,
    pub font: Option<(String, f64)>,
    pub rgb: Option<String>,
}

impl RunSpec {
    pub fn new(start: usize, len: usize) -> Self {
        Self {
            start,
            len,
            font: None,
            rgb: None,
        }
    }

    pub fn font(mut self, name: &str, size: f64) -> Self {
        self.font = Some((name.to_string(), size));
        self
    }

    pub fn rgb(mut self, components: &str) -> Self {
        self.rgb = Some(components.to_string());
        self
    }
}

/// A text store: backing string plus runs. No runs means no attributes.
#[derive(Debug, Clone)]
pub struct TextSpec {
    pub text: String,
    pub runs: Vec<RunSpec>,
}

impl TextSpec {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            runs: Vec::new(),
        }
    }

    pub fn styled(text: &str, runs: Vec<RunSpec>) -> Self {
        Self {
            text: text.to_string(),
            runs,
        }
    }
}

/// A media object entry.
#[derive(Debug, Clone)]
pub enum MediaSpec {
    Image {
        origin: (f64, f64),
        size: (f64, f64),
        path: String,
        is_missing: Option<bool>,
        is_jpeg: Option<bool>,
    },
    Text {
        origin: (f64, f64),
        size: (f64, f64),
        text: TextSpec,
    },
    Other {
        class: String,
        origin: (f64, f64),
        size: (f64, f64),
    },
}

impl MediaSpec {
    pub fn image(origin: (f64, f64), size: (f64, f64), path: &str) -> Self {
        MediaSpec::Image {
            origin,
            size,
            path: path.to_string(),
            is_missing: Some(false),
            is_jpeg: Some(path.ends_with(".jpg") || path.ends_with(".jpeg")),
        }
    }

    pub fn missing_image(origin: (f64, f64), size: (f64, f64), path: &str) -> Self {
        MediaSpec::Image {
            origin,
            size,
            path: path.to_string(),
            is_missing: Some(true),
            is_jpeg: Some(false),
        }
    }

    pub fn text(origin: (f64, f64), size: (f64, f64), text: TextSpec) -> Self {
        MediaSpec::Text { origin, size, text }
    }
}

/// Builder for synthetic `.note` containers.
#[derive(Debug, Clone)]
pub struct NoteBuilder {
    reflow_class: Option<String>,
    page_width: Option<f64>,
    paper: Option<String>,
    version: u64,
    strokes: Vec<StrokeSpec>,
    media: Vec<MediaSpec>,
    global_text: Option<TextSpec>,
    files: Vec<(String, Vec<u8>)>,
    metadata: Option<Dictionary>,
    overlay_override: Option<Dictionary>,
}

impl Default for NoteBuilder {
    fn default() -> Self {
        Self {
            reflow_class: Some(LOCKED_REFLOW.to_string()),
            page_width: Some(600.0),
            paper: Some("Legacy:1".to_string()),
            version: 100_000,
            strokes: Vec::new(),
            media: Vec::new(),
            global_text: None,
            files: Vec::new(),
            metadata: None,
            overlay_override: None,
        }
    }
}

impl NoteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_width(mut self, width: Option<f64>) -> Self {
        self.page_width = width;
        self
    }

    pub fn reflow_class(mut self, class: Option<&str>) -> Self {
        self.reflow_class = class.map(str::to_string);
        self
    }

    pub fn paper(mut self, identifier: Option<&str>) -> Self {
        self.paper = identifier.map(str::to_string);
        self
    }

    pub fn version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn stroke(mut self, stroke: StrokeSpec) -> Self {
        self.strokes.push(stroke);
        self
    }

    pub fn media(mut self, media: MediaSpec) -> Self {
        self.media.push(media);
        self
    }

    pub fn global_text(mut self, text: TextSpec) -> Self {
        self.global_text = Some(text);
        self
    }

    pub fn file(mut self, relative: &str, data: Vec<u8>) -> Self {
        self.files.push((relative.to_string(), data));
        self
    }

    pub fn metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(Dictionary::new)
            .insert(key.to_string(), value);
        self
    }

    /// Replace the spatial hash dictionary with raw arrays.
    pub fn raw_overlay(mut self, arrays: &[(&str, Vec<u8>)]) -> Self {
        let mut dict = Dictionary::new();
        for (key, data) in arrays {
            dict.insert(key.to_string(), Value::Data(data.clone()));
        }
        self.overlay_override = Some(dict);
        self
    }

    /// Serialize the session descriptor alone.
    pub fn session_bytes(&self) -> Vec<u8> {
        let mut archive = Archive::new();
        let general = archive.reserve();
        let layout = archive.reserve();
        debug_assert_eq!((general, layout), (1, 2));

        // 1: general info
        let mut general_info = Dictionary::new();
        if let Some(paper) = &self.paper {
            let mut attributes = Dictionary::new();
            attributes.insert("paperIdentifier".into(), Value::String(paper.clone()));
            let mut layout_model = Dictionary::new();
            layout_model.insert(
                "documentPaperAttributes".into(),
                Value::Dictionary(attributes),
            );
            general_info.insert(
                "NBNoteTakingSessionDocumentPaperLayoutModelKey".into(),
                Value::Dictionary(layout_model),
            );
        }
        archive.set(general, Value::Dictionary(general_info));

        // 2: layout info
        let mut layout_info = Dictionary::new();

        let mut reflow = Dictionary::new();
        if let Some(class) = &self.reflow_class {
            reflow.insert("$class".into(), archive.class(class));
        }
        if let Some(width) = self.page_width {
            reflow.insert("pageWidthInDocumentCoordsKey".into(), Value::Real(width));
        }
        let reflow = archive.push(Value::Dictionary(reflow));
        layout_info.insert("reflowState".into(), reflow);

        let spatial_hash = match &self.overlay_override {
            Some(dict) => Some(dict.clone()),
            None if !self.strokes.is_empty() => Some(self.overlay_arrays()),
            None => None,
        };
        if let Some(spatial_hash) = spatial_hash {
            let mut overlay = Dictionary::new();
            overlay.insert("SpatialHash".into(), Value::Dictionary(spatial_hash));
            layout_info.insert("Handwriting Overlay".into(), Value::Dictionary(overlay));
        }

        if !self.media.is_empty() {
            let refs: Vec<Value> = self
                .media
                .iter()
                .map(|media| archive.media_object(media))
                .collect();
            let mut list = Dictionary::new();
            list.insert("$class".into(), archive.class("NSMutableArray"));
            list.insert("NS.objects".into(), Value::Array(refs));
            let list = archive.push(Value::Dictionary(list));
            layout_info.insert("mediaObjects".into(), list);
        }

        if let Some(text) = &self.global_text {
            let store = archive.text_store(text);
            layout_info.insert("textStore".into(), store);
        }

        archive.set(layout, Value::Dictionary(layout_info));
        archive.to_bytes(self.version)
    }

    /// Build the zip container.
    pub fn build(&self) -> Vec<u8> {
        let mut entries = vec![(format!("{}/Session.plist", ROOT), self.session_bytes())];
        if let Some(metadata) = &self.metadata {
            let mut data = Vec::new();
            Value::Dictionary(metadata.clone())
                .to_writer_binary(&mut data)
                .unwrap();
            entries.push((format!("{}/metadata.plist", ROOT), data));
        }
        for (relative, data) in &self.files {
            entries.push((format!("{}/{}", ROOT, relative), data.clone()));
        }
        zip_entries(&entries)
    }

    fn overlay_arrays(&self) -> Dictionary {
        let mut points = Vec::new();
        let mut num_points = Vec::new();
        let mut widths = Vec::new();
        let mut colors = Vec::new();
        for stroke in &self.strokes {
            for (x, y) in &stroke.points {
                points.extend_from_slice(&x.to_le_bytes());
                points.extend_from_slice(&y.to_le_bytes());
            }
            num_points.extend_from_slice(&(stroke.points.len() as u32).to_le_bytes());
            widths.extend_from_slice(&stroke.width.to_le_bytes());
            colors.extend_from_slice(&stroke.color);
        }

        let mut dict = Dictionary::new();
        dict.insert("curvespoints".into(), Value::Data(points));
        dict.insert("curvesnumpoints".into(), Value::Data(num_points));
        dict.insert("curveswidth".into(), Value::Data(widths));
        dict.insert("curvescolors".into(), Value::Data(colors));
        dict
    }
}

/// Flat object table under construction.
struct Archive {
    objects: Vec<Value>,
    classes: HashMap<String, u64>,
}

impl Archive {
    fn new() -> Self {
        Self {
            objects: vec![Value::String("$null".into())],
            classes: HashMap::new(),
        }
    }

    fn reserve(&mut self) -> u64 {
        self.objects.push(Value::Boolean(false));
        (self.objects.len() - 1) as u64
    }

    fn set(&mut self, index: u64, value: Value) {
        self.objects[index as usize] = value;
    }

    fn push(&mut self, value: Value) -> Value {
        self.objects.push(value);
        Value::Uid(Uid::new((self.objects.len() - 1) as u64))
    }

    fn string(&mut self, text: &str) -> Value {
        self.push(Value::String(text.to_string()))
    }

    fn class(&mut self, name: &str) -> Value {
        if let Some(index) = self.classes.get(name) {
            return Value::Uid(Uid::new(*index));
        }
        let mut dict = Dictionary::new();
        dict.insert("$classname".into(), Value::String(name.to_string()));
        dict.insert(
            "$classes".into(),
            Value::Array(vec![
                Value::String(name.to_string()),
                Value::String("NSObject".into()),
            ]),
        );
        let uid = self.push(Value::Dictionary(dict));
        if let Value::Uid(id) = &uid {
            self.classes.insert(name.to_string(), id.get());
        }
        uid
    }

    fn composite(&mut self, (a, b): (f64, f64)) -> Value {
        self.string(&format!("{{{}, {}}}", a, b))
    }

    fn media_object(&mut self, media: &MediaSpec) -> Value {
        let mut dict = Dictionary::new();
        let (class, origin, size) = match media {
            MediaSpec::Image { origin, size, .. } => ("NBImageMediaObject", origin, size),
            MediaSpec::Text { origin, size, .. } => ("NBTextBlockMediaObject", origin, size),
            MediaSpec::Other {
                class,
                origin,
                size,
            } => (class.as_str(), origin, size),
        };
        dict.insert("$class".into(), self.class(class));
        dict.insert("documentContentOrigin".into(), self.composite(*origin));
        dict.insert("unscaledContentSize".into(), self.composite(*size));

        match media {
            MediaSpec::Image {
                path,
                is_missing,
                is_jpeg,
                ..
            } => {
                // archived NSString object, the way the producer writes paths
                let mut path_object = Dictionary::new();
                path_object.insert("$class".into(), self.class("NSMutableString"));
                path_object.insert("NS.string".into(), Value::String(path.clone()));
                let path_ref = self.push(Value::Dictionary(path_object));
                dict.insert("relativePath".into(), path_ref);
                if let Some(flag) = is_missing {
                    dict.insert("isMissing".into(), Value::Boolean(*flag));
                }
                if let Some(flag) = is_jpeg {
                    dict.insert("isJPEG".into(), Value::Boolean(*flag));
                }
            }
            MediaSpec::Text { text, .. } => {
                let store = self.text_store(text);
                dict.insert("textStore".into(), store);
            }
            MediaSpec::Other { .. } => {}
        }
        self.push(Value::Dictionary(dict))
    }

    fn text_store(&mut self, spec: &TextSpec) -> Value {
        let mut attributed = Dictionary::new();
        attributed.insert("NSString".into(), self.string(&spec.text));

        if !spec.runs.is_empty() {
            let sets: Vec<Value> = spec.runs.iter().map(|run| self.attribute_set(run)).collect();
            let mut array = Dictionary::new();
            array.insert("$class".into(), self.class("NSMutableArray"));
            array.insert("NS.objects".into(), Value::Array(sets));
            let attributes = self.push(Value::Dictionary(array));
            attributed.insert("NSAttributes".into(), attributes);
        }
        let attributed = self.push(Value::Dictionary(attributed));

        let mut store = Dictionary::new();
        store.insert("$class".into(), self.class("NBTextStore"));
        store.insert("attributedString".into(), attributed);
        self.push(Value::Dictionary(store))
    }

    fn attribute_set(&mut self, run: &RunSpec) -> Value {
        let mut keys = vec![self.string("range")];
        let mut values = vec![self.composite((run.start as f64, run.len as f64))];

        if let Some((name, size)) = &run.font {
            let mut font = Dictionary::new();
            font.insert("$class".into(), self.class("NSFont"));
            font.insert("NSName".into(), self.string(name));
            font.insert("NSSize".into(), Value::Real(*size));
            keys.push(self.string("font"));
            values.push(self.push(Value::Dictionary(font)));
        }

        if let Some(rgb) = &run.rgb {
            let mut color = Dictionary::new();
            color.insert("$class".into(), self.class("NSColor"));
            let mut data = rgb.as_bytes().to_vec();
            data.push(0);
            color.insert("NSRGB".into(), Value::Data(data));
            keys.push(self.string("color"));
            values.push(self.push(Value::Dictionary(color)));
        }

        let mut dict = Dictionary::new();
        dict.insert("$class".into(), self.class("NSDictionary"));
        dict.insert("NS.keys".into(), Value::Array(keys));
        dict.insert("NS.objects".into(), Value::Array(values));
        self.push(Value::Dictionary(dict))
    }

    fn to_bytes(self, version: u64) -> Vec<u8> {
        let mut top = Dictionary::new();
        top.insert("root".into(), Value::Uid(Uid::new(1)));

        let mut root = Dictionary::new();
        root.insert("$archiver".into(), Value::String("NSKeyedArchiver".into()));
        root.insert("$version".into(), Value::Integer(version.into()));
        root.insert("$top".into(), Value::Dictionary(top));
        root.insert("$objects".into(), Value::Array(self.objects));

        let mut data = Vec::new();
        Value::Dictionary(root).to_writer_binary(&mut data).unwrap();
        data
    }
}

/// Zip `(name, data)` entries in order.
pub fn zip_entries(entries: &[(String, Vec<u8>)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, data) in entries {
        zip.start_file(name.as_str(), options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// A solid-colour PNG.
pub fn png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// A solid-colour JPEG.
pub fn jpeg(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, image::Rgb(rgb));
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .unwrap();
    buf
}

/// Route crate logs to the test harness output.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
