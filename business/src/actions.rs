//! Modal actions of the outpost list: create, edit, delete and deployment info.

use async_trait::async_trait;
use log::{info, warn};
use outposts_states::{ApiError, ModalAction};
use ustr::Ustr;

use crate::{Outpost, OutpostRequest, OutpostsClient};

/// Where the deployment documentation lives.
pub const DEPLOYMENT_DOCS_URL: &str = "https://goauthentik.io/docs/outposts/outposts/#deploy";

/// Toolbar action creating a new outpost.
#[derive(Debug, Clone)]
pub struct CreateOutpost<C> {
    client: C,
}

impl<C: OutpostsClient> CreateOutpost<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: OutpostsClient> ModalAction for CreateOutpost<C> {
    type Form = OutpostRequest;
    type Output = Outpost;

    fn header(&self) -> String {
        "Create Outpost".to_owned()
    }

    fn trigger_label(&self) -> &'static str {
        "Create"
    }

    fn submit_label(&self) -> &'static str {
        "Create"
    }

    fn initial_form(&self) -> OutpostRequest {
        OutpostRequest::default()
    }

    async fn submit(&self, form: OutpostRequest) -> Result<Outpost, ApiError> {
        form.validate()?;
        self.client.create(&form).await
    }
}

/// Row action updating one outpost, pre-filled from the row it was projected from.
#[derive(Debug, Clone)]
pub struct EditOutpost<C> {
    client: C,
    pk: Ustr,
    snapshot: OutpostRequest,
}

impl<C: OutpostsClient> EditOutpost<C> {
    pub fn new(client: C, outpost: &Outpost) -> Self {
        Self {
            client,
            pk: outpost.pk,
            snapshot: OutpostRequest::from(outpost),
        }
    }

    pub fn pk(&self) -> Ustr {
        self.pk
    }
}

#[async_trait]
impl<C: OutpostsClient> ModalAction for EditOutpost<C> {
    type Form = OutpostRequest;
    type Output = Outpost;

    fn header(&self) -> String {
        "Update Outpost".to_owned()
    }

    fn trigger_label(&self) -> &'static str {
        "Edit"
    }

    fn submit_label(&self) -> &'static str {
        "Update"
    }

    fn initial_form(&self) -> OutpostRequest {
        self.snapshot.clone()
    }

    async fn submit(&self, form: OutpostRequest) -> Result<Outpost, ApiError> {
        form.validate()?;
        self.client.update(self.pk, &form).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The record was already gone; the row is stale.
    AlreadyDeleted,
}

/// Delete confirmation bound to the identifier captured when the row was projected.
#[derive(Debug, Clone)]
pub struct DeleteOutpost<C> {
    client: C,
    pk: Ustr,
    name: String,
}

impl<C: OutpostsClient> DeleteOutpost<C> {
    pub fn new(client: C, pk: Ustr, name: impl Into<String>) -> Self {
        Self {
            client,
            pk,
            name: name.into(),
        }
    }

    pub fn pk(&self) -> Ustr {
        self.pk
    }

    /// Confirmation question shown in the modal body.
    pub fn prompt(&self) -> String {
        format!("Are you sure you want to delete Outpost {:?}?", self.name)
    }
}

#[async_trait]
impl<C: OutpostsClient> ModalAction for DeleteOutpost<C> {
    type Form = ();
    type Output = DeleteOutcome;

    fn header(&self) -> String {
        "Delete Outpost".to_owned()
    }

    fn trigger_label(&self) -> &'static str {
        "Delete"
    }

    fn submit_label(&self) -> &'static str {
        "Delete"
    }

    fn initial_form(&self) -> Self::Form {}

    async fn submit(&self, _form: ()) -> Result<DeleteOutcome, ApiError> {
        match self.client.delete(self.pk).await {
            Ok(()) => Ok(DeleteOutcome::Deleted),
            Err(ApiError::NotFound) => {
                warn!("Outpost {} was already deleted", self.pk);
                Ok(DeleteOutcome::AlreadyDeleted)
            }
            Err(err) => Err(err),
        }
    }
}

/// Environment a deployed outpost needs to reach the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentDetails {
    pub host: String,
    pub token: String,
    /// Only needed when the server uses a self-signed certificate.
    pub insecure: bool,
    pub docs_url: &'static str,
}

impl DeploymentDetails {
    /// `NAME=value` pairs in display order.
    pub fn env(&self) -> Vec<(&'static str, String)> {
        vec![
            ("AUTHENTIK_HOST", self.host.clone()),
            ("AUTHENTIK_TOKEN", self.token.clone()),
            ("AUTHENTIK_INSECURE", self.insecure.to_string()),
        ]
    }
}

/// Read-only modal with the deployment environment of one outpost.
///
/// The token is fetched on demand through the outpost's token identifier.
#[derive(Debug, Clone)]
pub struct DeploymentInfo<C> {
    client: C,
    host: String,
    pk: Ustr,
    token_identifier: String,
}

impl<C: OutpostsClient> DeploymentInfo<C> {
    pub fn new(
        client: C,
        host: impl Into<String>,
        pk: Ustr,
        token_identifier: impl Into<String>,
    ) -> Self {
        Self {
            client,
            host: host.into(),
            pk,
            token_identifier: token_identifier.into(),
        }
    }

    pub fn pk(&self) -> Ustr {
        self.pk
    }

    pub async fn load(&self) -> Result<DeploymentDetails, ApiError> {
        if self.token_identifier.is_empty() {
            return Err(ApiError::decode(format!(
                "outpost {} has no token identifier",
                self.pk
            )));
        }
        let token = self.client.view_token_key(&self.token_identifier).await?;
        info!("Fetched deployment token for outpost {}", self.pk);
        Ok(DeploymentDetails {
            host: self.host.clone(),
            token,
            insecure: true,
            docs_url: DEPLOYMENT_DOCS_URL,
        })
    }
}

#[async_trait]
impl<C: OutpostsClient> ModalAction for DeploymentInfo<C> {
    type Form = ();
    type Output = ();

    fn header(&self) -> String {
        "Outpost Deployment Info".to_owned()
    }

    fn trigger_label(&self) -> &'static str {
        "View Deployment Info"
    }

    fn submit_label(&self) -> &'static str {
        "Close"
    }

    fn initial_form(&self) -> Self::Form {}

    async fn submit(&self, _form: ()) -> Result<(), ApiError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use outposts_states::{Modal, ModalError, ModalState};

    use super::*;
    use crate::test_utils::{MemoryOutposts, outpost};

    #[tokio::test]
    async fn create_validates_before_sending() {
        let client = Arc::new(MemoryOutposts::default());
        let modal = Modal::new(CreateOutpost::new(client.clone()));
        modal.open();

        let err = modal.submit().await.unwrap_err();
        assert!(matches!(err, ModalError::Api(ApiError::Validation { .. })));
        assert!(client.calls().is_empty());
        assert!(modal.is_open());

        modal.update_form(|f| f.name = "edge".to_owned()).unwrap();
        let created = modal.submit().await.unwrap();
        assert_eq!(created.name, "edge");
        assert_eq!(modal.state(), ModalState::Closed);
    }

    #[tokio::test]
    async fn edit_starts_from_record_snapshot() {
        let client = Arc::new(MemoryOutposts::with(vec![outpost("a", "edge", &[(1, "app")])]));
        let record = outpost("a", "edge", &[(1, "app")]);
        let modal = Modal::new(EditOutpost::new(client.clone(), &record));
        modal.open();
        assert_eq!(modal.form().map(|f| f.name), Some("edge".to_owned()));

        modal.update_form(|f| f.name = "renamed".to_owned()).unwrap();
        let updated = modal.submit().await.unwrap();
        assert_eq!(updated.pk, Ustr::from("a"));
        assert_eq!(client.names(), vec!["renamed".to_owned()]);
    }

    #[tokio::test]
    async fn delete_of_missing_record_succeeds() {
        let client = Arc::new(MemoryOutposts::default());
        let modal = Modal::new(DeleteOutpost::new(client, Ustr::from("gone"), "old"));
        modal.open();
        assert_eq!(modal.submit().await, Ok(DeleteOutcome::AlreadyDeleted));
        assert_eq!(modal.state(), ModalState::Closed);
    }

    #[tokio::test]
    async fn delete_failure_keeps_modal_open() {
        let client = Arc::new(MemoryOutposts::with(vec![outpost("a", "edge", &[])]));
        client.fail_next(ApiError::Server {
            status: 500,
            body: "boom".to_owned(),
        });
        let action = DeleteOutpost::new(client.clone(), Ustr::from("a"), "edge");
        assert_eq!(action.prompt(), r#"Are you sure you want to delete Outpost "edge"?"#);

        let modal = Modal::new(action);
        modal.open();
        assert!(modal.submit().await.is_err());
        assert_eq!(modal.error().and_then(|e| e.status()), Some(500));
        assert_eq!(client.names(), vec!["edge".to_owned()]);
    }

    #[tokio::test]
    async fn deployment_info_fetches_token() {
        let client = Arc::new(MemoryOutposts::default());
        let info = DeploymentInfo::new(client, "https://auth.local", Ustr::from("a"), "ak-a-api");
        let details = info.load().await.unwrap();

        assert_eq!(
            details.env(),
            vec![
                ("AUTHENTIK_HOST", "https://auth.local".to_owned()),
                ("AUTHENTIK_TOKEN", "key-of-ak-a-api".to_owned()),
                ("AUTHENTIK_INSECURE", "true".to_owned()),
            ]
        );
        assert_eq!(details.docs_url, DEPLOYMENT_DOCS_URL);
    }

    #[test]
    fn labels_name_trigger_and_submit() {
        let client = Arc::new(MemoryOutposts::default());
        let record = outpost("a", "edge", &[]);

        let create = CreateOutpost::new(client.clone());
        assert_eq!((create.trigger_label(), create.submit_label()), ("Create", "Create"));
        let edit = EditOutpost::new(client.clone(), &record);
        assert_eq!((edit.trigger_label(), edit.submit_label()), ("Edit", "Update"));
        assert_eq!(edit.header(), "Update Outpost");
        let delete = DeleteOutpost::new(client.clone(), record.pk, "edge");
        assert_eq!((delete.trigger_label(), delete.submit_label()), ("Delete", "Delete"));
        let info = DeploymentInfo::new(client, "https://auth.local", record.pk, "ak-a-api");
        assert_eq!(
            (info.trigger_label(), info.submit_label()),
            ("View Deployment Info", "Close")
        );
    }

    #[tokio::test]
    async fn deployment_info_without_identifier_fails() {
        let client = Arc::new(MemoryOutposts::default());
        let info = DeploymentInfo::new(client, "https://auth.local", Ustr::from("a"), "");
        assert!(matches!(info.load().await, Err(ApiError::Decode(_))));
    }
}
