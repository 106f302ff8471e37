//! Port interfaces for deadline persistence

use async_trait::async_trait;
use docket_domain::{DeadlineFilter, LegalDeadline, Result};
use uuid::Uuid;

/// Trait for persisting legal deadlines
#[async_trait]
pub trait DeadlineRepository: Send + Sync {
    /// Insert a new deadline row.
    async fn insert(&self, deadline: &LegalDeadline) -> Result<()>;

    /// Load a deadline by id.
    async fn find(&self, id: Uuid) -> Result<Option<LegalDeadline>>;

    /// List a tenant's deadlines matching the filter, ordered by due date
    /// ascending.
    async fn list(&self, tenant_id: Uuid, filter: &DeadlineFilter) -> Result<Vec<LegalDeadline>>;

    /// Persist the full state of an already-stored deadline.
    async fn update(&self, deadline: &LegalDeadline) -> Result<()>;

    /// Delete a deadline row. Mirror cascade is orchestrated by the service.
    async fn delete(&self, id: Uuid) -> Result<()>;
}
