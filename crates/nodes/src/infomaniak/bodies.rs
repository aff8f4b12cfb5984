//! Body, query and computed-path builders referenced by the operation table.
//!
//! Every function reads the item's parameters and returns a fresh mapping.
//! Optional fields go through the `params` inclusion helpers so an absent or
//! falsy source never shows up as a key.

use serde_json::{Map, Value};
use strum::EnumString;

use super::images::ImageInput;
use crate::params::{include_if, include_param, Inclusion, ParameterAccessor};
use crate::NodeError;

pub const DEFAULT_RECORD_TYPE: &str = "A";
pub const DEFAULT_TTL: u64 = 3600;
pub const DEFAULT_DATABASE_TYPE: &str = "mysql";
pub const DEFAULT_ROLE: &str = "user";
pub const DEFAULT_CHAT_MODEL: &str = "mixtral";
pub const DEFAULT_IMAGE_MODEL: &str = "sdxl_lightning";
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper";

/// Image endpoints always answer with base64 payloads.
pub const IMAGE_RESPONSE_FORMAT: &str = "b64_json";

const IMAGE_OPTIONS: [&str; 5] = ["n", "size", "quality", "style", "negative_prompt"];

type Fields = Result<Map<String, Value>, NodeError>;

fn fields<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

fn str_value(value: &str) -> Value {
    Value::String(value.to_owned())
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// Where an uploaded video comes from. The two sources are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum UploadSource {
    File,
    Url,
}

/// Granularity of VOD statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StatisticsScope {
    Channel,
    Media,
}

impl UploadSource {
    fn from_params(params: &dyn ParameterAccessor) -> Result<Self, NodeError> {
        let raw = params.optional_str("uploadMethod", "file")?;
        raw.parse()
            .map_err(|_| NodeError::invalid("uploadMethod", format!("expected 'file' or 'url', got '{raw}'")))
    }
}

impl StatisticsScope {
    fn from_params(params: &dyn ParameterAccessor) -> Result<Self, NodeError> {
        let raw = params.optional_str("statisticsType", "channel")?;
        raw.parse().map_err(|_| {
            NodeError::invalid("statisticsType", format!("expected 'channel' or 'media', got '{raw}'"))
        })
    }
}

// ---------------------------------------------------------------------------
// Domain, mail, hosting, drive, newsletter, team
// ---------------------------------------------------------------------------

pub fn dns_record(params: &dyn ParameterAccessor) -> Fields {
    Ok(fields([
        ("type", params.optional("recordType", str_value(DEFAULT_RECORD_TYPE))),
        ("source", params.required("recordName")?),
        ("target", params.required("recordValue")?),
        ("ttl", params.optional("ttl", Value::from(DEFAULT_TTL))),
    ]))
}

pub fn mailbox(params: &dyn ParameterAccessor) -> Fields {
    let mut body = fields([
        ("mailbox_name", params.required("emailAddress")?),
        ("password", params.required("password")?),
    ]);
    include_param(&mut body, "first_name", params, "firstName", Inclusion::Truthy);
    include_param(&mut body, "last_name", params, "lastName", Inclusion::Truthy);
    Ok(body)
}

pub fn alias(params: &dyn ParameterAccessor) -> Fields {
    Ok(fields([
        ("alias", params.required("aliasEmail")?),
        ("destination", params.required("destinationEmail")?),
    ]))
}

pub fn database(params: &dyn ParameterAccessor) -> Fields {
    Ok(fields([
        ("name", params.required("databaseName")?),
        ("type", params.optional("databaseType", str_value(DEFAULT_DATABASE_TYPE))),
    ]))
}

pub fn drive_folder(params: &dyn ParameterAccessor) -> Fields {
    Ok(fields([("name", params.required("folderName")?)]))
}

pub fn campaign(params: &dyn ParameterAccessor) -> Fields {
    let mut body = fields([
        ("name", params.required("campaignName")?),
        ("subject", params.required("subject")?),
    ]);
    include_param(&mut body, "html_content", params, "htmlContent", Inclusion::Truthy);
    Ok(body)
}

pub fn contact(params: &dyn ParameterAccessor) -> Fields {
    let mut body = fields([("email", params.required("contactEmail")?)]);
    include_param(&mut body, "name", params, "contactName", Inclusion::Truthy);
    Ok(body)
}

pub fn invitation(params: &dyn ParameterAccessor) -> Fields {
    Ok(fields([
        ("email", params.required("memberEmail")?),
        ("role", params.optional("role", str_value(DEFAULT_ROLE))),
    ]))
}

// ---------------------------------------------------------------------------
// AI tools
// ---------------------------------------------------------------------------

pub fn chat_completion(params: &dyn ParameterAccessor) -> Fields {
    let model = params.optional("aiModel", str_value(DEFAULT_CHAT_MODEL));
    let messages = chat_messages(&params.optional("messages", Value::Object(Map::new())));
    let options = params.collection("aiOptions")?;

    let mut body = fields([("model", model), ("messages", Value::Array(messages))]);
    include_if(&mut body, &options, "max_tokens", Inclusion::Truthy);
    include_if(&mut body, &options, "temperature", Inclusion::Defined);
    include_if(&mut body, &options, "profile_type", Inclusion::Truthy);
    include_if(&mut body, &options, "stream", Inclusion::Defined);
    Ok(body)
}

/// Flatten the `{ message: [{ role, content }, ...] }` collection.
fn chat_messages(input: &Value) -> Vec<Value> {
    let Some(entries) = input.get("message").and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .map(|entry| {
            let mut message = Map::new();
            if let Some(entry) = entry.as_object() {
                include_if(&mut message, entry, "role", Inclusion::Defined);
                include_if(&mut message, entry, "content", Inclusion::Defined);
            }
            Value::Object(message)
        })
        .collect()
}

fn image_options(body: &mut Map<String, Value>, options: &Map<String, Value>) {
    for key in IMAGE_OPTIONS {
        include_if(body, options, key, Inclusion::Truthy);
    }
    body.insert("response_format".into(), str_value(IMAGE_RESPONSE_FORMAT));
}

pub fn image_generation(params: &dyn ParameterAccessor) -> Fields {
    let mut body = fields([
        ("model", params.optional("imageModel", str_value(DEFAULT_IMAGE_MODEL))),
        ("prompt", params.required("imagePrompt")?),
    ]);
    image_options(&mut body, &params.collection("aiOptions")?);
    Ok(body)
}

pub fn photo_maker(params: &dyn ParameterAccessor) -> Fields {
    let images = ImageInput::parse(params.required("inputImages")?).into_images();
    let mut body = fields([
        ("prompt", params.required("imagePrompt")?),
        ("images", Value::Array(images)),
    ]);
    image_options(&mut body, &params.collection("aiOptions")?);
    Ok(body)
}

pub fn transcription(params: &dyn ParameterAccessor) -> Fields {
    let options = params.collection("aiOptions")?;
    let mut body = fields([
        (
            "model",
            params.optional("transcriptionModel", str_value(DEFAULT_TRANSCRIPTION_MODEL)),
        ),
        ("file", params.required("audioFile")?),
    ]);
    include_if(&mut body, &options, "language", Inclusion::Truthy);
    include_if(&mut body, &options, "response_format", Inclusion::Truthy);
    Ok(body)
}

// ---------------------------------------------------------------------------
// VOD
// ---------------------------------------------------------------------------

fn publishing_options(body: &mut Map<String, Value>, options: &Map<String, Value>) {
    include_if(body, options, "auto_publish", Inclusion::Truthy);
    include_if(body, options, "auto_validate", Inclusion::Truthy);
}

pub fn video_upload(params: &dyn ParameterAccessor) -> Fields {
    let mut body = fields([("name", params.required("videoName")?)]);
    match UploadSource::from_params(params)? {
        UploadSource::File => body.insert("file".into(), params.required("videoFile")?),
        UploadSource::Url => body.insert("url".into(), params.required("videoUrl")?),
    };
    include_param(&mut body, "folder", params, "vodFolderId", Inclusion::Truthy);
    publishing_options(&mut body, &params.collection("vodOptions")?);
    Ok(body)
}

pub fn video_update(params: &dyn ParameterAccessor) -> Fields {
    let updates = params.collection("updateFields")?;
    let mut body = Map::new();
    include_if(&mut body, &updates, "name", Inclusion::Truthy);
    include_if(&mut body, &updates, "description", Inclusion::Truthy);
    include_if(&mut body, &updates, "published", Inclusion::Defined);
    include_if(&mut body, &updates, "validated", Inclusion::Defined);
    include_if(&mut body, &updates, "tags", Inclusion::Truthy);
    Ok(body)
}

pub fn vod_folder(params: &dyn ParameterAccessor) -> Fields {
    let mut body = fields([("name", params.required("vodFolderName")?)]);
    publishing_options(&mut body, &params.collection("vodOptions")?);
    Ok(body)
}

pub fn player(params: &dyn ParameterAccessor) -> Fields {
    Ok(fields([("name", params.required("playerName")?)]))
}

pub fn video_query(params: &dyn ParameterAccessor) -> Fields {
    let options = params.collection("vodOptions")?;
    let mut query = Map::new();
    include_if(&mut query, &options, "include_subtitles", Inclusion::Truthy);
    include_if(&mut query, &options, "include_chapters", Inclusion::Truthy);
    Ok(query)
}

pub fn statistics_query(params: &dyn ParameterAccessor) -> Fields {
    let options = params.collection("vodOptions")?;
    let mut query = Map::new();
    include_if(&mut query, &options, "date_from", Inclusion::Truthy);
    include_if(&mut query, &options, "date_to", Inclusion::Truthy);
    Ok(query)
}

pub fn statistics_path(params: &dyn ParameterAccessor) -> Result<String, NodeError> {
    let channel = params.required_str("vodChannelId")?;
    match StatisticsScope::from_params(params)? {
        StatisticsScope::Channel => Ok(format!("/1/vod/channel/{channel}/statistics/consumption")),
        StatisticsScope::Media => {
            let media = params.required_str("statisticsMediaId")?;
            Ok(format!("/1/vod/channel/{channel}/statistics/media/{media}"))
        }
    }
}
