//! `World` implementation holding a single in-memory template
//!
//! The layout snapshot is handed to the template through `sys.inputs`, so
//! document text is always treated as data and never parsed as Typst markup.

use chrono::{DateTime, Datelike, Timelike, Utc};
use contract_types::RenderError;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Array, Bytes, Datetime, Dict, Value};
use typst::syntax::{FileId, Source, VirtualPath};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, World};

use super::fonts::{global_font_cache, FontCache};

const MAIN_PATH: &str = "/main.typ";

pub struct ContractWorld {
    main: Source,
    font_cache: &'static FontCache,
    library: LazyHash<Library>,
    time: DateTime<Utc>,
}

impl ContractWorld {
    /// Build a world around `template`, exposing `inputs` as `sys.inputs`.
    ///
    /// `inputs` must be a JSON object.
    pub fn new(template: &str, inputs: &serde_json::Value) -> Result<Self, RenderError> {
        let Value::Dict(dict) = json_to_typst_value(inputs)? else {
            return Err(RenderError::Internal(
                "template inputs must be a JSON object".to_string(),
            ));
        };

        let id = FileId::new(None, VirtualPath::new(MAIN_PATH));

        Ok(Self {
            main: Source::new(id, template.to_string()),
            font_cache: global_font_cache(),
            library: LazyHash::new(Library::builder().with_inputs(dict).build()),
            time: Utc::now(),
        })
    }
}

/// Convert a JSON value to a Typst value
fn json_to_typst_value(json: &serde_json::Value) -> Result<Value, RenderError> {
    match json {
        serde_json::Value::Null => Ok(Value::None),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                Err(RenderError::Internal(format!("Invalid number: {}", n)))
            }
        }
        serde_json::Value::String(s) => Ok(Value::Str(s.as_str().into())),
        serde_json::Value::Array(arr) => {
            let items = arr
                .iter()
                .map(json_to_typst_value)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(Array::from(items.as_slice())))
        }
        serde_json::Value::Object(obj) => {
            let mut dict = Dict::new();
            for (k, v) in obj {
                dict.insert(k.as_str().into(), json_to_typst_value(v)?);
            }
            Ok(Value::Dict(dict))
        }
    }
}

impl World for ContractWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        self.font_cache.book()
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.font_cache.font(index)
    }

    fn today(&self, offset: Option<i64>) -> Option<Datetime> {
        let adjusted = self.time + chrono::Duration::hours(offset.unwrap_or(0));

        Datetime::from_ymd_hms(
            adjusted.year(),
            adjusted.month() as u8,
            adjusted.day() as u8,
            adjusted.hour() as u8,
            adjusted.minute() as u8,
            adjusted.second() as u8,
        )
    }
}
