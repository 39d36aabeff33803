use crate::codec::WireRecord;
use crate::store::{Key, ScanFilter, ShelterStore, StoreError, StoreResult, highest_numeric_id};

use aws_sdk_dynamodb::operation::scan::builders::ScanFluentBuilder;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::{Client, error};
use std::collections;

/// Production [`ShelterStore`] backed by a DynamoDB table.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use shelterlink::store::dynamodb::DynamoStore;
/// use shelterlink::service::ShelterService;
///
/// # fn example(client: Client) {
/// let service = ShelterService::new(DynamoStore::new(client));
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    /// Creates a store over an already-configured SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ShelterStore for DynamoStore {
    async fn scan(&self, table: &str, filter: Option<ScanFilter>) -> StoreResult<Vec<WireRecord>> {
        let mut builder = self.client.scan().table_name(table);
        if let Some(filter) = filter {
            let (expression, names, values) = filter_expression(&filter);
            builder = builder
                .filter_expression(expression)
                .set_expression_attribute_names(Some(names))
                .set_expression_attribute_values(Some(values));
        }
        collect_scan(builder).await
    }

    async fn get_highest_id(&self, table: &str, id_field: &str) -> StoreResult<Option<u64>> {
        let placeholder = format!("#{id_field}");
        let builder = self
            .client
            .scan()
            .table_name(table)
            .projection_expression(placeholder.clone())
            .expression_attribute_names(placeholder, id_field);
        let records = collect_scan(builder).await?;
        Ok(highest_numeric_id(&records, id_field))
    }

    async fn put(&self, table: &str, record: WireRecord) -> StoreResult<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(record))
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }

    async fn delete(&self, table: &str, key: Key) -> StoreResult<()> {
        let placeholder = format!("#{}", key.name);
        self.client
            .delete_item()
            .table_name(table)
            .key(key.name.clone(), key.value)
            .condition_expression(format!("attribute_exists({placeholder})"))
            .expression_attribute_names(placeholder, key.name)
            .send()
            .await
            .map_err(|err| {
                let err = err.into_service_error();
                if err.is_conditional_check_failed_exception() {
                    StoreError::ConditionFailed
                } else {
                    StoreError::Backend(error::DisplayErrorContext(err).to_string())
                }
            })?;
        Ok(())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "shelterlink.store.update", skip(self), err)
    )]
    async fn update(
        &self,
        table: &str,
        key: Key,
        attribute_paths: Vec<String>,
        attribute_values: Vec<AttributeValue>,
    ) -> StoreResult<()> {
        let (expression, names, values) = build_set_expression(&attribute_paths, attribute_values);
        self.client
            .update_item()
            .table_name(table)
            .key(key.name, key.value)
            .update_expression(expression)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .send()
            .await
            .map_err(backend_error)?;
        Ok(())
    }
}

async fn collect_scan(builder: ScanFluentBuilder) -> StoreResult<Vec<WireRecord>> {
    let mut paginator = builder.into_paginator().send();
    let mut records = Vec::new();
    while let Some(page) = paginator.next().await {
        let page = page.map_err(backend_error)?;
        records.extend(page.items.unwrap_or_default());
    }
    Ok(records)
}

fn backend_error<E>(err: error::SdkError<E>) -> StoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StoreError::Backend(error::DisplayErrorContext(err).to_string())
}

/// Compiles a dotted attribute path into its placeholder form, e.g.
/// `address.city` into `#address.#city`.
fn path_expression(path: &str) -> (String, collections::HashMap<String, String>) {
    let mut names = collections::HashMap::new();
    let placeholders: Vec<String> = path
        .split('.')
        .map(|part| {
            let placeholder = format!("#{part}");
            names.insert(placeholder.clone(), part.to_string());
            placeholder
        })
        .collect();
    (placeholders.join("."), names)
}

/// Compiles parallel path/value lists into a single `SET` update expression.
/// The lists pair up positionally; values get `:set{i}` placeholders.
fn build_set_expression(
    paths: &[String],
    values: Vec<AttributeValue>,
) -> (
    String,
    collections::HashMap<String, String>,
    collections::HashMap<String, AttributeValue>,
) {
    let mut assignments = Vec::with_capacity(paths.len());
    let mut names = collections::HashMap::new();
    let mut value_map = collections::HashMap::with_capacity(values.len());
    for (index, (path, value)) in paths.iter().zip(values).enumerate() {
        let (path, path_names) = path_expression(path);
        let value_placeholder = format!(":set{index}");
        assignments.push(format!("{path} = {value_placeholder}"));
        names.extend(path_names);
        value_map.insert(value_placeholder, value);
    }
    (format!("SET {}", assignments.join(", ")), names, value_map)
}

fn filter_expression(
    filter: &ScanFilter,
) -> (
    String,
    collections::HashMap<String, String>,
    collections::HashMap<String, AttributeValue>,
) {
    let placeholder = format!("#{}", filter.attribute);
    let value_placeholder = format!(":{}_eq0", filter.attribute);
    let expression = format!("({placeholder} = {value_placeholder})");
    let names = collections::HashMap::from([(placeholder, filter.attribute.clone())]);
    let values = collections::HashMap::from([(value_placeholder, filter.value.clone())]);
    (expression, names, values)
}
