use crate::codec::{self, WireRecord};
use crate::error::{Error, Result};
use crate::model::{NewShelter, ShelterPatch, ShelterRecord};
use crate::store::{Key, ScanFilter, ShelterStore, StoreError};
use crate::validate;

use aws_sdk_dynamodb::types::AttributeValue;

/// Table holding shelter records.
pub const SHELTERS_TABLE: &str = "shelters";

/// Primary key attribute of the shelters table.
pub const ID_FIELD: &str = "shelterId";

/// The shelter domain service: validation, id assignment, codec use, and
/// calls to the storage collaborator.
///
/// The service is stateless between calls; the only state lives in the store.
/// Every operation validates before it writes, so a failed call never leaves
/// a partial write behind.  Id assignment reads the current highest id and
/// adds one without any transactional guarantee, so two concurrent creates
/// may race and assign the same id; this is an accepted limitation at the
/// current scale.
#[derive(Clone, Debug)]
pub struct ShelterService<S> {
    store: S,
    table: String,
}

impl<S: ShelterStore> ShelterService<S> {
    /// Creates a service over `store`, using the default table name.
    pub fn new(store: S) -> Self {
        Self::with_table(store, SHELTERS_TABLE)
    }

    /// Creates a service over `store` with an explicit table name.
    pub fn with_table(store: S, table: impl Into<String>) -> Self {
        Self { store, table: table.into() }
    }

    /// Validates `input`, assigns the next id, and persists the record.
    ///
    /// Returns the stored record, id included.  Validation happens strictly
    /// before the write: an invalid rating or schedule leaves the table
    /// untouched.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "shelterlink.post_shelter", skip(self, input), err)
    )]
    pub async fn post_shelter(&self, input: NewShelter) -> Result<ShelterRecord> {
        if let Some(rating) = input.rating {
            validate::validate_rating(rating)?;
        }
        validate::validate_hours(&input.hours)?;

        let highest = self
            .store
            .get_highest_id(&self.table, ID_FIELD)
            .await
            .map_err(|err| Error::storage("failed to allocate a shelter id", err))?;
        let id = (highest.unwrap_or(0) + 1).to_string();

        let record = input.into_record(id);
        self.store
            .put(&self.table, codec::encode(&record))
            .await
            .map_err(|err| Error::storage(format!("failed to store shelter {}", record.id), err))?;
        Ok(record)
    }

    /// Returns all shelter records, decoded.  Order is whatever the store
    /// returns and is not guaranteed stable across calls.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "shelterlink.get_shelters", skip(self), err)
    )]
    pub async fn get_shelters(&self) -> Result<Vec<ShelterRecord>> {
        let records = self
            .store
            .scan(&self.table, None)
            .await
            .map_err(|err| Error::storage("failed to scan shelters", err))?;
        let mut shelters = Vec::with_capacity(records.len());
        for record in &records {
            shelters.push(codec::decode(record)?);
        }
        Ok(shelters)
    }

    /// Returns the shelter with the given `id`, or [`Error::NotFound`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "shelterlink.get_shelter", skip(self), err)
    )]
    pub async fn get_shelter(&self, id: &str) -> Result<ShelterRecord> {
        let record = self.find(id).await?.ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok(codec::decode(&record)?)
    }

    /// Deletes the shelter with the given `id`.
    ///
    /// The delete is conditional on existence: deleting a missing record
    /// fails with [`Error::DeleteConflict`] rather than silently succeeding.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "shelterlink.delete_shelter", skip(self), err)
    )]
    pub async fn delete_shelter(&self, id: &str) -> Result<()> {
        self.store
            .delete(&self.table, Key::string(ID_FIELD, id))
            .await
            .map_err(|err| match err {
                StoreError::ConditionFailed => Error::DeleteConflict(id.to_string()),
                err => Error::storage(format!("failed to delete shelter {id}"), err),
            })
    }

    /// Applies a partial update: only the fields supplied in `patch` change.
    ///
    /// Fails with [`Error::NotFound`] before touching the store's update
    /// operation when no record with `id` exists.  Address and hours
    /// sub-fields update under dotted paths; `picture` replaces the whole
    /// list as one unit.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "shelterlink.update_shelter", skip(self, patch), err)
    )]
    pub async fn update_shelter(&self, id: &str, patch: ShelterPatch) -> Result<()> {
        if self.find(id).await?.is_none() {
            return Err(Error::NotFound(id.to_string()));
        }
        let (paths, values) = collect_update(&patch);
        if paths.is_empty() {
            return Ok(());
        }
        self.store
            .update(&self.table, Key::string(ID_FIELD, id), paths, values)
            .await
            .map_err(|err| Error::storage(format!("failed to update shelter {id}"), err))
    }

    async fn find(&self, id: &str) -> Result<Option<WireRecord>> {
        let filter = ScanFilter {
            attribute: ID_FIELD.to_string(),
            value: AttributeValue::S(id.to_string()),
        };
        let records = self
            .store
            .scan(&self.table, Some(filter))
            .await
            .map_err(|err| Error::storage(format!("failed to look up shelter {id}"), err))?;
        Ok(records.into_iter().next())
    }
}

/// Accumulates the parallel attribute path and value lists for an update.
#[derive(Debug, Default)]
struct UpdateBuilder {
    paths: Vec<String>,
    values: Vec<AttributeValue>,
}

impl UpdateBuilder {
    fn push(&mut self, path: impl Into<String>, value: AttributeValue) {
        self.paths.push(path.into());
        self.values.push(value);
    }

    fn push_opt_s(&mut self, path: &str, value: &Option<String>) {
        if let Some(value) = value {
            self.push(path, AttributeValue::S(value.clone()));
        }
    }

    fn push_opt_n(&mut self, path: &str, value: Option<f64>) {
        if let Some(value) = value {
            self.push(path, AttributeValue::N(value.to_string()));
        }
    }
}

/// Builds the path/value pairs for the supplied fields of `patch`, in a fixed
/// deterministic order.  A patched day emits independent pairs for its
/// opening and closing times, opening first, whenever each is supplied.
fn collect_update(patch: &ShelterPatch) -> (Vec<String>, Vec<AttributeValue>) {
    let mut update = UpdateBuilder::default();
    update.push_opt_s("name", &patch.name);
    if let Some(address) = &patch.address {
        update.push_opt_s("address.city", &address.city);
        update.push_opt_s("address.country", &address.country);
        update.push_opt_s("address.state", &address.state);
        update.push_opt_s("address.street", &address.street);
        update.push_opt_s("address.zipCode", &address.zip_code);
    }
    update.push_opt_n("latitude", patch.latitude);
    update.push_opt_n("longitude", patch.longitude);
    update.push_opt_s("description", &patch.description);
    update.push_opt_n("rating", patch.rating);
    update.push_opt_s("phoneNumber", &patch.phone_number);
    update.push_opt_s("emailAddress", &patch.email_address);
    update.push_opt_s("website", &patch.website);
    update.push_opt_s("expandedName", &patch.expanded_name);
    if let Some(hours) = &patch.hours {
        for (day, times) in hours.days() {
            update.push_opt_s(&format!("hours.{day}.opening_time"), &times.opening_time);
            update.push_opt_s(&format!("hours.{day}.closing_time"), &times.closing_time);
        }
    }
    if let Some(picture) = &patch.picture {
        update.push("picture", codec::encode_picture(picture));
    }
    (update.paths, update.values)
}
