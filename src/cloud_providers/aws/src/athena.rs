use crate::config::get_static_aws_conf;
use crate::store::QueryService;
use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_athena::types::{
    QueryExecutionContext, QueryExecutionState, ResultConfiguration, ResultSet,
};
use std::fmt;
use std::time::Duration;
use workshop_common::connection::ConnectionDescriptor;

/// Athena client bound to one schema and one staging location.
pub struct AthenaClient {
    pub client: aws_sdk_athena::Client,
    schema: String,
    output_location: String,
    poll_interval: Duration,
}

impl AthenaClient {
    /// Connects with the key pair, region, schema and staging location from `descriptor`.
    pub async fn connect(descriptor: &ConnectionDescriptor, poll_interval: Duration) -> Self {
        let config = get_static_aws_conf(
            &descriptor.access_key_id,
            &descriptor.secret_access_key,
            descriptor.region.clone(),
        )
        .await;
        Self::new_with_config(&config, descriptor, poll_interval)
    }

    pub fn new_with_config(
        config: &SdkConfig,
        descriptor: &ConnectionDescriptor,
        poll_interval: Duration,
    ) -> Self {
        Self {
            client: aws_sdk_athena::Client::new(config),
            schema: descriptor.schema.clone(),
            output_location: descriptor.output_location(),
            poll_interval,
        }
    }

    async fn start(&self, sql: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .start_query_execution()
            .query_string(sql)
            .query_execution_context(QueryExecutionContext::builder().database(&self.schema).build())
            .result_configuration(
                ResultConfiguration::builder()
                    .output_location(&self.output_location)
                    .build(),
            )
            .send()
            .await
            .map_err(|err| anyhow!("{err:?}"))
            .context("Failed to start Athena query")?;

        response
            .query_execution_id()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Athena did not return a query execution id"))
    }

    /// Polls until the execution reaches a terminal state.
    async fn wait(&self, execution_id: &str) -> anyhow::Result<()> {
        loop {
            let response = self
                .client
                .get_query_execution()
                .query_execution_id(execution_id)
                .send()
                .await
                .map_err(|err| anyhow!("{err:?}"))
                .with_context(|| format!("Failed to read state of query {}", execution_id))?;

            let status = response.query_execution().and_then(|q| q.status());
            match status.and_then(|s| s.state()) {
                Some(QueryExecutionState::Succeeded) => return Ok(()),
                Some(state @ (QueryExecutionState::Failed | QueryExecutionState::Cancelled)) => {
                    let reason = status
                        .and_then(|s| s.state_change_reason())
                        .unwrap_or("no reason given");
                    bail!("Query {} {}: {}", execution_id, state.as_str(), reason);
                }
                state => {
                    tracing::debug!("Query {} is {:?}", execution_id, state);
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }
}

#[async_trait]
impl QueryService for AthenaClient {
    async fn execute(&self, sql: &str) -> anyhow::Result<QueryResult> {
        tracing::info!("Running query against schema '{}'", self.schema);
        let execution_id = self.start(sql).await?;
        tracing::debug!("Started query execution {}", execution_id);

        self.wait(&execution_id).await?;

        let mut result: Option<QueryResult> = None;
        let mut pages = self
            .client
            .get_query_results()
            .query_execution_id(&execution_id)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page
                .map_err(|err| anyhow!("{err:?}"))
                .with_context(|| format!("Failed to fetch results of query {}", execution_id))?;
            let Some(result_set) = page.result_set() else {
                continue;
            };
            match result.as_mut() {
                Some(result) => result.append_page(result_set),
                None => result = Some(QueryResult::from_result_set(result_set)),
            }
        }

        let result = result.unwrap_or_default();
        tracing::debug!("Query {} returned {} rows", execution_id, result.rows.len());
        Ok(result)
    }
}

/// Column names and string cells of a finished query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl QueryResult {
    pub fn from_result_set(result_set: &ResultSet) -> Self {
        let columns: Vec<String> = result_set
            .result_set_metadata()
            .map(|metadata| {
                metadata
                    .column_info()
                    .iter()
                    .map(|column| column.name().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let mut rows = page_rows(result_set);

        // the first row of a SELECT result repeats the column names
        let header: Vec<Option<String>> = columns.iter().cloned().map(Some).collect();
        if !columns.is_empty() && rows.first() == Some(&header) {
            rows.remove(0);
        }

        Self { columns, rows }
    }

    /// Adds the rows of a follow-up page. Only the first page carries the header row.
    pub fn append_page(&mut self, result_set: &ResultSet) {
        self.rows.extend(page_rows(result_set));
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = |value: &Option<String>| value.clone().unwrap_or_else(|| "NULL".to_string());

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (i, value) in row.iter().enumerate() {
                let len = cell(value).chars().count();
                match widths.get_mut(i) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }

        let rule: String = widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+");

        writeln!(f, "+{}+", rule)?;
        write_row(f, &self.columns, &widths)?;
        writeln!(f, "+{}+", rule)?;
        for row in &self.rows {
            let mut values: Vec<String> = row.iter().map(cell).collect();
            values.resize(widths.len(), String::new());
            write_row(f, &values, &widths)?;
        }
        writeln!(f, "+{}+", rule)?;
        write!(f, "({} rows)", self.rows.len())
    }
}

fn page_rows(result_set: &ResultSet) -> Vec<Vec<Option<String>>> {
    result_set
        .rows()
        .iter()
        .map(|row| {
            row.data()
                .iter()
                .map(|datum| datum.var_char_value().map(str::to_string))
                .collect()
        })
        .collect()
}

fn write_row(f: &mut fmt::Formatter<'_>, values: &[String], widths: &[usize]) -> fmt::Result {
    let padded: Vec<String> = values
        .iter()
        .zip(widths)
        .map(|(value, width)| format!("{:<width$}", value, width = width))
        .collect();
    writeln!(f, "| {} |", padded.join(" | "))
}
