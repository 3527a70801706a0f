use reqwest::multipart::{Form, Part};
use tokio::fs;
use tracing::warn;

use crate::{
    error::Result,
    types::{Configuration, FileHandle, PendingFile, Platform, Podcaster},
};

pub const FILE_FIELD: &str = "file";
pub const PODCASTER_FIELD: &str = "podcaster";
pub const PLATFORMS_FIELD: &str = "platforms";

/// One entry of the multipart payload, in send order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormField<'a> {
    File { name: &'static str, file: &'a PendingFile },
    Text { name: &'static str, value: &'static str },
}

/// Snapshot of everything a single upload sends. Owns its copy of the
/// configuration, so later edits never reach a payload already built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub file: PendingFile,
    pub podcaster: Podcaster,
    pub platforms: Vec<Platform>,
}

impl Submission {
    pub fn build(file: PendingFile, config: &Configuration) -> Self {
        Self {
            file,
            podcaster: config.podcaster,
            platforms: config.platforms.iter().collect(),
        }
    }

    pub fn fields(&self) -> Vec<FormField<'_>> {
        let mut fields = Vec::with_capacity(2 + self.platforms.len());
        fields.push(FormField::File {
            name: FILE_FIELD,
            file: &self.file,
        });
        fields.push(FormField::Text {
            name: PODCASTER_FIELD,
            value: self.podcaster.as_str(),
        });
        for platform in &self.platforms {
            fields.push(FormField::Text {
                name: PLATFORMS_FIELD,
                value: platform.as_str(),
            });
        }
        fields
    }

    /// Build the multipart form, loading path-backed file content.
    pub async fn into_form(self) -> Result<Form> {
        let mut content = Some(match &self.file.handle {
            FileHandle::Path(path) => fs::read(path).await?,
            FileHandle::Memory(bytes) => bytes.to_vec(),
        });

        let mut form = Form::new();
        for field in self.fields() {
            form = match field {
                FormField::File { name, file } => {
                    let part = Part::bytes(content.take().unwrap_or_default())
                        .file_name(file.name.clone());
                    form.part(name, with_media_type(part, &file.media_type)?)
                }
                FormField::Text { name, value } => form.text(name, value),
            };
        }
        Ok(form)
    }
}

/// Declared types that do not parse as a MIME type are sent without one.
fn with_media_type(part: Part, media_type: &str) -> Result<Part> {
    match media_type.parse::<mime::Mime>() {
        Ok(mime) => Ok(part.mime_str(mime.as_ref())?),
        Err(err) => {
            warn!(media_type, error = %err, "sending file part without a content type");
            Ok(part)
        }
    }
}
