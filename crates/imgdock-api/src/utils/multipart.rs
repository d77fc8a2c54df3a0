//! Multipart form collection
//!
//! The image forms are small and index-addressed (`image0`, `modification0`,
//! ...), so the whole form is read into memory before handlers pair fields up.

use crate::error::HttpAppError;
use axum::extract::Multipart;
use bytes::Bytes;
use imgdock_core::AppError;
use imgdock_processing::{parse_data_url, SourceImage};
use std::collections::{BTreeMap, HashMap};

/// A file part
#[derive(Debug, Clone)]
pub struct FilePart {
    pub data: Bytes,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl FilePart {
    pub fn to_source(&self) -> SourceImage {
        SourceImage {
            data: self.data.clone(),
            declared_mime: self.content_type.clone(),
            file_name: self.file_name.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum FormValue {
    File(FilePart),
    Text(String),
}

impl FormValue {
    /// Image bytes of a file part, or of a text part holding a base64 data URL
    pub fn to_source(&self) -> Result<SourceImage, AppError> {
        match self {
            FormValue::File(file) => Ok(file.to_source()),
            FormValue::Text(text) => {
                let (mime, data) =
                    parse_data_url(text).map_err(|e| AppError::InvalidInput(e.to_string()))?;
                Ok(SourceImage::new(data).with_mime(mime))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, FormValue>,
}

fn is_file_field(file_name: Option<&str>, content_type: Option<&str>) -> bool {
    file_name.is_some() || content_type.is_some_and(|ct| !ct.starts_with("text/"))
}

impl FormData {
    /// Read every field of the form. Later fields with the same name win.
    pub async fn read(mut multipart: Multipart) -> Result<Self, HttpAppError> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);

            let value = if is_file_field(file_name.as_deref(), content_type.as_deref()) {
                FormValue::File(FilePart {
                    data: field.bytes().await?,
                    file_name,
                    content_type,
                })
            } else {
                FormValue::Text(field.text().await?)
            };

            form.fields.insert(name, value);
        }

        Ok(form)
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields.get(name)
    }

    /// Text of a field, with surrounding whitespace removed. Blank is `None`.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FormValue::Text(text)) => Some(text.trim()).filter(|t| !t.is_empty()),
            _ => None,
        }
    }

    pub fn file(&self, name: &str) -> Option<&FilePart> {
        match self.fields.get(name) {
            Some(FormValue::File(file)) => Some(file),
            _ => None,
        }
    }

    /// Fields named `{prefix}{N}`, ordered by `N`
    pub fn indexed(&self, prefix: &str) -> BTreeMap<usize, &FormValue> {
        self.fields
            .iter()
            .filter_map(|(name, value)| {
                let suffix = name.strip_prefix(prefix)?;
                if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                suffix.parse::<usize>().ok().map(|index| (index, value))
            })
            .collect()
    }
}
