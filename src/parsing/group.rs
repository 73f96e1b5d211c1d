//! Header parsing for `dump-groups` lines
//!
//! ```text
//!  group_id=4,type=select,selection_method=hash,bucket=bucket_id:0,actions=output:2,bucket=...
//!  |________| |_________| |___________________| |___________________| |_____________|
//!  promoted   promoted    group meta            bucket section        bucket actions
//! ```
//!
//! Group and bucket meta tokens are stored as written. `watch_port:1` or
//! `fields(eth_src,eth_dst)` stay single opaque keys; they are never run
//! through the term grammar.

use tracing::debug;

use crate::ast::{Bucket, Group};
use crate::config::ParserOptions;
use crate::error::{HeaderError, ParseError};
use crate::parsing::header::{parse_decimal, FieldReader, HeaderItem, RawField};
use crate::parsing::split::split_top_level;
use crate::parsing::term::parse_action_list;

/// Parse one group line.
pub fn parse_group(line: &str, options: &ParserOptions) -> Result<Group, ParseError> {
    if line.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut reader = FieldReader::new(line, &["bucket", "actions"]);
    let mut group_id: Option<u32> = None;
    let mut group_type = None;
    let mut meta = Vec::new();
    let mut buckets: Vec<Bucket> = Vec::new();
    // Bucket between its `bucket=` and `actions=`
    let mut open: Option<Bucket> = None;

    while let Some(item) = reader.next_item()? {
        match item {
            HeaderItem::Marker("bucket") => {
                if open.is_some() {
                    return Err(HeaderError::MissingActions.into());
                }
                open = Some(Bucket {
                    id: buckets.len() as u32,
                    ..Bucket::default()
                });
            }
            HeaderItem::Marker(_) => {
                let mut bucket = open.take().ok_or(HeaderError::MissingField("bucket"))?;
                let len = action_text_len(reader.remainder())?;
                let text = reader.take_raw(len);
                debug!(bucket = bucket.id, actions = text, "bucket parsed");
                bucket.actions = parse_action_list(text, options)?;
                buckets.push(bucket);
            }
            HeaderItem::Field(field) => match open.as_mut() {
                Some(bucket) => bucket_field(bucket, field)?,
                None => match field.key {
                    "group_id" => group_id = Some(parse_decimal(field.key, field.value)?),
                    "type" => group_type = Some(field.value.to_string()),
                    _ => meta.push(field.into()),
                },
            },
        }
    }
    if open.is_some() {
        return Err(HeaderError::MissingActions.into());
    }

    Ok(Group {
        group_id: group_id.ok_or(HeaderError::MissingField("group_id"))?,
        group_type: group_type.ok_or(HeaderError::MissingField("type"))?,
        meta,
        buckets,
    })
}

fn bucket_field(bucket: &mut Bucket, field: RawField<'_>) -> Result<(), HeaderError> {
    if let Some(id) = field.key.strip_prefix("bucket_id:") {
        bucket.id = parse_decimal("bucket_id", id)?;
    } else if field.key == "bucket_id" {
        bucket.id = parse_decimal(field.key, field.value)?;
    } else {
        bucket.meta.push(field.into());
    }
    Ok(())
}

/// Length of the action text at the start of `rest`: up to the depth-zero
/// comma that opens the next `bucket=`, or the end of the line.
fn action_text_len(rest: &str) -> Result<usize, ParseError> {
    let mut offset = 0;
    for (index, piece) in split_top_level(rest, ",")?.into_iter().enumerate() {
        if index > 0 && piece.trim_start().starts_with("bucket=") {
            return Ok(offset - 1);
        }
        offset += piece.len() + 1;
    }
    Ok(rest.len())
}
