use crate::model::{
    Address, DaySchedule, ShelterRecord, ShelterTags, Weekday, WeekSchedule,
};

use aws_sdk_dynamodb::types::AttributeValue;
use std::collections;

/// The nested, type-tagged representation the storage collaborator persists
/// for each record.
pub type WireRecord = collections::HashMap<String, AttributeValue>;

/// Failures while decoding a [`WireRecord`] back into a [`ShelterRecord`].
///
/// Each variant carries the dotted attribute path of the offending value.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CodecError {
    /// A required attribute is absent.
    #[error("missing attribute {0}")]
    MissingAttribute(String),

    /// An attribute carries an unexpected type tag.
    #[error("attribute {0} has an unexpected type")]
    UnexpectedType(String),

    /// A number-tagged attribute does not parse as a decimal number.
    #[error("attribute {0} is not a valid number")]
    InvalidNumber(String),
}

/// Result type for this module.
pub type CodecResult<T> = Result<T, CodecError>;

/// Encodes a record into its tagged wire representation.
///
/// Every scalar is wrapped in its type tag, closed days become the storage
/// null marker, and the tag flags are normalized: all fifteen are emitted,
/// absent ones as `false`.
pub fn encode(record: &ShelterRecord) -> WireRecord {
    let mut item = WireRecord::new();
    item.insert("shelterId".to_string(), AttributeValue::S(record.id.clone()));
    item.insert("name".to_string(), AttributeValue::S(record.name.clone()));
    if let Some(expanded_name) = &record.expanded_name {
        item.insert("expandedName".to_string(), AttributeValue::S(expanded_name.clone()));
    }
    item.insert("address".to_string(), encode_address(&record.address));
    item.insert("latitude".to_string(), AttributeValue::N(record.latitude.to_string()));
    item.insert("longitude".to_string(), AttributeValue::N(record.longitude.to_string()));
    item.insert("description".to_string(), AttributeValue::S(record.description.clone()));
    if let Some(rating) = record.rating {
        item.insert("rating".to_string(), AttributeValue::N(rating.to_string()));
    }
    item.insert("phoneNumber".to_string(), AttributeValue::S(record.phone_number.clone()));
    item.insert("emailAddress".to_string(), AttributeValue::S(record.email_address.clone()));
    if let Some(website) = &record.website {
        item.insert("website".to_string(), AttributeValue::S(website.clone()));
    }
    item.insert("hours".to_string(), encode_hours(&record.hours));
    item.insert("picture".to_string(), encode_picture(&record.picture));
    item.insert("tags".to_string(), encode_tags(&record.tags));
    item
}

fn encode_address(address: &Address) -> AttributeValue {
    AttributeValue::M(collections::HashMap::from([
        ("street".to_string(), AttributeValue::S(address.street.clone())),
        ("city".to_string(), AttributeValue::S(address.city.clone())),
        ("state".to_string(), AttributeValue::S(address.state.clone())),
        ("zipCode".to_string(), AttributeValue::S(address.zip_code.clone())),
        ("country".to_string(), AttributeValue::S(address.country.clone())),
    ]))
}

fn encode_hours(hours: &WeekSchedule) -> AttributeValue {
    let mut days = collections::HashMap::with_capacity(Weekday::ALL.len());
    for (day, schedule) in hours.days() {
        let value = match schedule {
            Some(schedule) => encode_day(schedule),
            None => AttributeValue::Null(true),
        };
        days.insert(day.as_str().to_string(), value);
    }
    AttributeValue::M(days)
}

/// Encodes one day's opening and closing times as a nested map.
pub fn encode_day(schedule: &DaySchedule) -> AttributeValue {
    AttributeValue::M(collections::HashMap::from([
        ("opening_time".to_string(), AttributeValue::S(schedule.opening_time.clone())),
        ("closing_time".to_string(), AttributeValue::S(schedule.closing_time.clone())),
    ]))
}

/// Encodes the picture URLs as an ordered list of string-tagged values.
pub fn encode_picture(picture: &[String]) -> AttributeValue {
    AttributeValue::L(picture.iter().map(|url| AttributeValue::S(url.clone())).collect())
}

fn encode_tags(tags: &ShelterTags) -> AttributeValue {
    let flags = tags
        .flags()
        .into_iter()
        .map(|(name, value)| (name.to_string(), AttributeValue::Bool(value)))
        .collect();
    AttributeValue::M(flags)
}

/// Decodes a tagged wire record back into the application-facing shape.
///
/// The inverse of [`encode`]: optional attributes (`rating`, `website`,
/// `expandedName`) appear in the output only when present in the input, a
/// null-marked or absent weekday decodes as closed, and missing tag flags
/// default to `false`.
pub fn decode(item: &WireRecord) -> CodecResult<ShelterRecord> {
    let record = ShelterRecord {
        id: required_s(item, "shelterId")?,
        name: required_s(item, "name")?,
        expanded_name: optional_s(item, "expandedName")?,
        address: decode_address(item)?,
        latitude: required_n(item, "latitude")?,
        longitude: required_n(item, "longitude")?,
        description: required_s(item, "description")?,
        rating: optional_n(item, "rating")?,
        phone_number: required_s(item, "phoneNumber")?,
        email_address: required_s(item, "emailAddress")?,
        website: optional_s(item, "website")?,
        hours: decode_hours(item)?,
        picture: decode_picture(item)?,
        tags: decode_tags(item)?,
    };
    Ok(record)
}

fn decode_address(item: &WireRecord) -> CodecResult<Address> {
    let map = required_m(item, "address")?;
    let address = Address {
        street: required_s_at(map, "address", "street")?,
        city: required_s_at(map, "address", "city")?,
        state: required_s_at(map, "address", "state")?,
        zip_code: required_s_at(map, "address", "zipCode")?,
        country: optional_s_at(map, "address", "country")?.unwrap_or_default(),
    };
    Ok(address)
}

fn decode_hours(item: &WireRecord) -> CodecResult<WeekSchedule> {
    let map = required_m(item, "hours")?;
    let mut hours = WeekSchedule::default();
    for day in Weekday::ALL {
        let schedule = match map.get(day.as_str()) {
            None | Some(AttributeValue::Null(_)) => None,
            Some(AttributeValue::M(times)) => {
                let path = format!("hours.{day}");
                Some(DaySchedule {
                    opening_time: required_s_at(times, &path, "opening_time")?,
                    closing_time: required_s_at(times, &path, "closing_time")?,
                })
            }
            Some(_) => return Err(CodecError::UnexpectedType(format!("hours.{day}"))),
        };
        match day {
            Weekday::Monday => hours.monday = schedule,
            Weekday::Tuesday => hours.tuesday = schedule,
            Weekday::Wednesday => hours.wednesday = schedule,
            Weekday::Thursday => hours.thursday = schedule,
            Weekday::Friday => hours.friday = schedule,
            Weekday::Saturday => hours.saturday = schedule,
            Weekday::Sunday => hours.sunday = schedule,
        }
    }
    Ok(hours)
}

fn decode_picture(item: &WireRecord) -> CodecResult<Vec<String>> {
    let list = match item.get("picture") {
        Some(AttributeValue::L(list)) => list,
        Some(_) => return Err(CodecError::UnexpectedType("picture".to_string())),
        None => return Err(CodecError::MissingAttribute("picture".to_string())),
    };
    let mut picture = Vec::with_capacity(list.len());
    for (i, value) in list.iter().enumerate() {
        match value {
            AttributeValue::S(url) => picture.push(url.clone()),
            _ => return Err(CodecError::UnexpectedType(format!("picture[{i}]"))),
        }
    }
    Ok(picture)
}

fn decode_tags(item: &WireRecord) -> CodecResult<ShelterTags> {
    let map = required_m(item, "tags")?;
    let mut tags = ShelterTags::default();
    for (name, value) in map {
        match value {
            AttributeValue::Bool(flag) => {
                // Unknown flag names are ignored rather than rejected.
                tags.set(name, *flag);
            }
            _ => return Err(CodecError::UnexpectedType(format!("tags.{name}"))),
        }
    }
    Ok(tags)
}

fn required_s(item: &WireRecord, name: &str) -> CodecResult<String> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(CodecError::UnexpectedType(name.to_string())),
        None => Err(CodecError::MissingAttribute(name.to_string())),
    }
}

fn optional_s(item: &WireRecord, name: &str) -> CodecResult<Option<String>> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(Some(value.clone())),
        Some(_) => Err(CodecError::UnexpectedType(name.to_string())),
        None => Ok(None),
    }
}

fn required_n(item: &WireRecord, name: &str) -> CodecResult<f64> {
    match item.get(name) {
        Some(AttributeValue::N(value)) => {
            value.parse().map_err(|_| CodecError::InvalidNumber(name.to_string()))
        }
        Some(_) => Err(CodecError::UnexpectedType(name.to_string())),
        None => Err(CodecError::MissingAttribute(name.to_string())),
    }
}

fn optional_n(item: &WireRecord, name: &str) -> CodecResult<Option<f64>> {
    match item.get(name) {
        Some(AttributeValue::N(value)) => value
            .parse()
            .map(Some)
            .map_err(|_| CodecError::InvalidNumber(name.to_string())),
        Some(_) => Err(CodecError::UnexpectedType(name.to_string())),
        None => Ok(None),
    }
}

fn required_m<'a>(
    item: &'a WireRecord,
    name: &str,
) -> CodecResult<&'a collections::HashMap<String, AttributeValue>> {
    match item.get(name) {
        Some(AttributeValue::M(map)) => Ok(map),
        Some(_) => Err(CodecError::UnexpectedType(name.to_string())),
        None => Err(CodecError::MissingAttribute(name.to_string())),
    }
}

fn required_s_at(
    map: &collections::HashMap<String, AttributeValue>,
    parent: &str,
    name: &str,
) -> CodecResult<String> {
    match map.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(CodecError::UnexpectedType(format!("{parent}.{name}"))),
        None => Err(CodecError::MissingAttribute(format!("{parent}.{name}"))),
    }
}

fn optional_s_at(
    map: &collections::HashMap<String, AttributeValue>,
    parent: &str,
    name: &str,
) -> CodecResult<Option<String>> {
    match map.get(name) {
        Some(AttributeValue::S(value)) => Ok(Some(value.clone())),
        Some(_) => Err(CodecError::UnexpectedType(format!("{parent}.{name}"))),
        None => Ok(None),
    }
}
