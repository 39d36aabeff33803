use serde::{Deserialize, Serialize};
use std::fmt;

/// Day of the week, in the capitalized spelling used by both the API and the
/// wire representation.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl Weekday {
    /// All weekdays, Monday first.  Iteration over schedules always follows
    /// this order so that validation errors are reproducible.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Returns the weekday name as it appears in the wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opening and closing time for a single day, both as `HH:MM` strings.
///
/// The strings are kept raw as submitted by the caller; validation happens in
/// [`crate::validate::validate_hours`] before anything is persisted.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    /// Time the shelter opens, `HH:MM`.
    pub opening_time: String,
    /// Time the shelter closes, `HH:MM`.
    pub closing_time: String,
}

impl DaySchedule {
    /// Convenience constructor.
    pub fn new(opening_time: impl Into<String>, closing_time: impl Into<String>) -> Self {
        Self {
            opening_time: opening_time.into(),
            closing_time: closing_time.into(),
        }
    }
}

/// Weekly schedule: one optional [`DaySchedule`] per weekday, `None` meaning
/// the shelter is closed that day.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct WeekSchedule {
    /// Monday's schedule, or `None` when closed.
    #[serde(rename = "Monday")]
    pub monday: Option<DaySchedule>,
    /// Tuesday's schedule, or `None` when closed.
    #[serde(rename = "Tuesday")]
    pub tuesday: Option<DaySchedule>,
    /// Wednesday's schedule, or `None` when closed.
    #[serde(rename = "Wednesday")]
    pub wednesday: Option<DaySchedule>,
    /// Thursday's schedule, or `None` when closed.
    #[serde(rename = "Thursday")]
    pub thursday: Option<DaySchedule>,
    /// Friday's schedule, or `None` when closed.
    #[serde(rename = "Friday")]
    pub friday: Option<DaySchedule>,
    /// Saturday's schedule, or `None` when closed.
    #[serde(rename = "Saturday")]
    pub saturday: Option<DaySchedule>,
    /// Sunday's schedule, or `None` when closed.
    #[serde(rename = "Sunday")]
    pub sunday: Option<DaySchedule>,
}

impl WeekSchedule {
    /// Returns the schedule for `day`.
    pub fn day(&self, day: Weekday) -> Option<&DaySchedule> {
        match day {
            Weekday::Monday => self.monday.as_ref(),
            Weekday::Tuesday => self.tuesday.as_ref(),
            Weekday::Wednesday => self.wednesday.as_ref(),
            Weekday::Thursday => self.thursday.as_ref(),
            Weekday::Friday => self.friday.as_ref(),
            Weekday::Saturday => self.saturday.as_ref(),
            Weekday::Sunday => self.sunday.as_ref(),
        }
    }

    /// Iterates over all days Monday-first.
    pub fn days(&self) -> impl Iterator<Item = (Weekday, Option<&DaySchedule>)> {
        Weekday::ALL.into_iter().map(move |day| (day, self.day(day)))
    }
}

/// Street address of a shelter.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street and number.
    pub street: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub zip_code: String,
    /// Country; defaults to the empty string when absent.
    #[serde(default)]
    pub country: String,
}

/// The capability flags attached to a shelter.  Absent flags default to
/// `false`; the codec always persists the full set.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ShelterTags {
    /// Accessible by wheelchair.
    #[serde(default)]
    pub wheelchair_accessible: bool,
    /// Pets allowed.
    #[serde(default)]
    pub pet_friendly: bool,
    /// Accepts families with children.
    #[serde(default)]
    pub family_friendly: bool,
    /// LGBTQ-friendly.
    #[serde(default)]
    pub lgbtq_friendly: bool,
    /// Serves veterans only.
    #[serde(default)]
    pub veterans_only: bool,
    /// Serves women only.
    #[serde(default)]
    pub women_only: bool,
    /// Serves men only.
    #[serde(default)]
    pub men_only: bool,
    /// Serves youth only.
    #[serde(default)]
    pub youth_only: bool,
    /// No appointment needed.
    #[serde(default)]
    pub accepts_walk_ins: bool,
    /// Photo identification required at intake.
    #[serde(default)]
    pub requires_id: bool,
    /// Serves free meals.
    #[serde(default)]
    pub free_meals: bool,
    /// Showers available.
    #[serde(default)]
    pub showers: bool,
    /// Laundry facilities available.
    #[serde(default)]
    pub laundry: bool,
    /// Overnight stays possible.
    #[serde(default)]
    pub overnight: bool,
    /// On-site medical services.
    #[serde(default)]
    pub medical_services: bool,
}

impl ShelterTags {
    /// Returns every flag with its wire name, in a fixed order.
    pub fn flags(&self) -> [(&'static str, bool); 15] {
        [
            ("wheelchair_accessible", self.wheelchair_accessible),
            ("pet_friendly", self.pet_friendly),
            ("family_friendly", self.family_friendly),
            ("lgbtq_friendly", self.lgbtq_friendly),
            ("veterans_only", self.veterans_only),
            ("women_only", self.women_only),
            ("men_only", self.men_only),
            ("youth_only", self.youth_only),
            ("accepts_walk_ins", self.accepts_walk_ins),
            ("requires_id", self.requires_id),
            ("free_meals", self.free_meals),
            ("showers", self.showers),
            ("laundry", self.laundry),
            ("overnight", self.overnight),
            ("medical_services", self.medical_services),
        ]
    }

    /// Sets the flag with the given wire name.  Returns `false` when the name
    /// is not a known flag, in which case nothing changes.
    pub fn set(&mut self, name: &str, value: bool) -> bool {
        let flag = match name {
            "wheelchair_accessible" => &mut self.wheelchair_accessible,
            "pet_friendly" => &mut self.pet_friendly,
            "family_friendly" => &mut self.family_friendly,
            "lgbtq_friendly" => &mut self.lgbtq_friendly,
            "veterans_only" => &mut self.veterans_only,
            "women_only" => &mut self.women_only,
            "men_only" => &mut self.men_only,
            "youth_only" => &mut self.youth_only,
            "accepts_walk_ins" => &mut self.accepts_walk_ins,
            "requires_id" => &mut self.requires_id,
            "free_meals" => &mut self.free_meals,
            "showers" => &mut self.showers,
            "laundry" => &mut self.laundry,
            "overnight" => &mut self.overnight,
            "medical_services" => &mut self.medical_services,
            _ => return false,
        };
        *flag = value;
        true
    }
}

/// Input to [`crate::service::ShelterService::post_shelter`]: a shelter record
/// without an id.  The id is assigned by the service on creation.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShelter {
    /// Display name.
    pub name: String,
    /// Longer form of the name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_name: Option<String>,
    /// Street address.
    pub address: Address,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Free-form description.
    pub description: String,
    /// Rating; when present must lie in `(0, 5]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Contact phone number.  Not validated.
    pub phone_number: String,
    /// Contact email address.  Not validated.
    pub email_address: String,
    /// Website URL, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Weekly opening hours.
    pub hours: WeekSchedule,
    /// Ordered picture URLs.
    #[serde(default)]
    pub picture: Vec<String>,
    /// Capability flags.
    #[serde(default)]
    pub tags: ShelterTags,
}

impl NewShelter {
    /// Attaches the service-assigned `id` to produce the full record.
    pub fn into_record(self, id: String) -> ShelterRecord {
        ShelterRecord {
            id,
            name: self.name,
            expanded_name: self.expanded_name,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            description: self.description,
            rating: self.rating,
            phone_number: self.phone_number,
            email_address: self.email_address,
            website: self.website,
            hours: self.hours,
            picture: self.picture,
            tags: self.tags,
        }
    }
}

/// A persisted shelter record, id included.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterRecord {
    /// Unique identifier: a decimal string assigned on creation, one greater
    /// than the highest existing numeric id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Longer form of the name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_name: Option<String>,
    /// Street address.
    pub address: Address,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Free-form description.
    pub description: String,
    /// Rating in `(0, 5]`, if rated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Contact phone number.
    pub phone_number: String,
    /// Contact email address.
    pub email_address: String,
    /// Website URL, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Weekly opening hours.
    pub hours: WeekSchedule,
    /// Ordered picture URLs.
    #[serde(default)]
    pub picture: Vec<String>,
    /// Capability flags.
    #[serde(default)]
    pub tags: ShelterTags,
}

/// Partial update for a single day's hours.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPatch {
    /// New opening time, if it should change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_time: Option<String>,
    /// New closing time, if it should change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closing_time: Option<String>,
}

/// Partial update for the weekly schedule: only the days present change.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct WeekPatch {
    /// Changes to Monday's hours.
    #[serde(rename = "Monday", default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<DayPatch>,
    /// Changes to Tuesday's hours.
    #[serde(rename = "Tuesday", default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DayPatch>,
    /// Changes to Wednesday's hours.
    #[serde(rename = "Wednesday", default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DayPatch>,
    /// Changes to Thursday's hours.
    #[serde(rename = "Thursday", default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DayPatch>,
    /// Changes to Friday's hours.
    #[serde(rename = "Friday", default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<DayPatch>,
    /// Changes to Saturday's hours.
    #[serde(rename = "Saturday", default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DayPatch>,
    /// Changes to Sunday's hours.
    #[serde(rename = "Sunday", default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DayPatch>,
}

impl WeekPatch {
    /// Iterates over the patched days Monday-first.
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &DayPatch)> {
        [
            (Weekday::Monday, &self.monday),
            (Weekday::Tuesday, &self.tuesday),
            (Weekday::Wednesday, &self.wednesday),
            (Weekday::Thursday, &self.thursday),
            (Weekday::Friday, &self.friday),
            (Weekday::Saturday, &self.saturday),
            (Weekday::Sunday, &self.sunday),
        ]
        .into_iter()
        .filter_map(|(day, patch)| patch.as_ref().map(|patch| (day, patch)))
    }
}

/// Partial update for the address: only the fields present change.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPatch {
    /// New street, if it should change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// New city, if it should change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// New state, if it should change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// New postal code, if it should change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    /// New country, if it should change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Partial update for a shelter record.  Only the supplied fields change.
///
/// `picture` replaces the whole ordered list as one unit; there is no
/// per-element patching.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterPatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New expanded name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded_name: Option<String>,
    /// Address changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressPatch>,
    /// New latitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// New longitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// New phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// New email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    /// New website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Hours changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<WeekPatch>,
    /// Replacement picture list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_weekday_order_is_monday_first() {
        let names: Vec<&str> = Weekday::ALL.iter().map(|day| day.as_str()).collect();
        assert_eq!(
            vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"],
            names
        );
    }

    #[test]
    fn test_week_schedule_days_follows_weekday_order() {
        let schedule = WeekSchedule {
            tuesday: Some(DaySchedule::new("09:00", "17:00")),
            ..Default::default()
        };
        let days: Vec<(Weekday, bool)> =
            schedule.days().map(|(day, entry)| (day, entry.is_some())).collect();
        assert_eq!(Weekday::Monday, days[0].0);
        assert!(!days[0].1);
        assert_eq!(Weekday::Tuesday, days[1].0);
        assert!(days[1].1);
        assert_eq!(7, days.len());
    }

    #[test]
    fn test_tags_set_known_and_unknown_names() {
        let mut tags = ShelterTags::default();
        assert!(tags.set("pet_friendly", true));
        assert!(tags.pet_friendly);
        assert!(!tags.set("open_bar", true));
        assert_eq!(
            1,
            tags.flags().iter().filter(|(_, value)| *value).count()
        );
    }

    #[test]
    fn test_new_shelter_from_json_applies_defaults() {
        let input: NewShelter = serde_json::from_value(json!({
            "name": "Curry Student Center",
            "address": {
                "street": "360 Huntington Ave",
                "city": "Boston",
                "state": "MA",
                "zipCode": "02115"
            },
            "latitude": 42.338,
            "longitude": -71.088,
            "description": "Student shelter",
            "phoneNumber": "617-555-0100",
            "emailAddress": "shelter@example.org",
            "hours": {
                "Monday": {"openingTime": "07:00", "closingTime": "23:00"},
                "Tuesday": null
            }
        }))
        .unwrap();

        assert_eq!("", input.address.country);
        assert_eq!(None, input.rating);
        assert_eq!(None, input.website);
        assert!(input.picture.is_empty());
        assert_eq!(ShelterTags::default(), input.tags);
        assert_eq!(Some(DaySchedule::new("07:00", "23:00")), input.hours.monday);
        assert_eq!(None, input.hours.tuesday);
    }

    #[test]
    fn test_shelter_patch_from_json_is_sparse() {
        let patch: ShelterPatch = serde_json::from_value(json!({
            "address": {"city": "Cambridge"},
            "hours": {"Friday": {"closingTime": "22:00"}}
        }))
        .unwrap();

        assert_eq!(None, patch.name);
        let address = patch.address.unwrap();
        assert_eq!(Some("Cambridge".to_string()), address.city);
        assert_eq!(None, address.street);
        let hours = patch.hours.unwrap();
        let days: Vec<(Weekday, &DayPatch)> = hours.days().collect();
        assert_eq!(1, days.len());
        assert_eq!(Weekday::Friday, days[0].0);
        assert_eq!(None, days[0].1.opening_time);
        assert_eq!(Some("22:00".to_string()), days[0].1.closing_time);
    }
}
