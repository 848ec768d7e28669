use async_trait::async_trait;
use pipeline_metrics::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock MetricsCollector with Pushgateway group semantics
///
/// `replace_group` overwrites the stored body, `delete_group` removes it.
#[derive(Default, Clone)]
pub struct MockMetricsCollector {
    groups: Arc<Mutex<HashMap<(String, String), String>>>,
    calls: Arc<Mutex<Vec<String>>>,
    fail_delete: bool,
    reject_put: Option<u16>,
}

impl MockMetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delete_failure(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn with_put_rejection(mut self, status: u16) -> Self {
        self.reject_put = Some(status);
        self
    }

    pub fn stored(&self, job: &str, instance: &str) -> Option<String> {
        self.groups
            .lock()
            .unwrap()
            .get(&(job.to_string(), instance.to_string()))
            .cloned()
    }

    pub fn group_count(&self) -> usize {
        self.groups.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetricsCollector for MockMetricsCollector {
    async fn delete_group(&self, group: &CollectorGroup) -> Result<()> {
        self.calls.lock().unwrap().push("DELETE".to_string());
        if self.fail_delete {
            return Err(MetricsError::NetworkUnavailable {
                endpoint: "http://gateway.invalid".to_string(),
                details: "timed out".to_string(),
            }
            .into());
        }
        self.groups
            .lock()
            .unwrap()
            .remove(&(group.job.clone(), group.instance.clone()));
        Ok(())
    }

    async fn replace_group(&self, group: &CollectorGroup, payload: &str) -> Result<()> {
        self.calls.lock().unwrap().push("PUT".to_string());
        if let Some(status) = self.reject_put {
            return Err(MetricsError::CollectorRejected {
                endpoint: "http://gateway.invalid".to_string(),
                status,
            }
            .into());
        }
        self.groups
            .lock()
            .unwrap()
            .insert((group.job.clone(), group.instance.clone()), payload.to_string());
        Ok(())
    }
}
