//! Create and update commands.

use std::process::ExitCode;

use anyhow::{Context as _, Result};
use outposts_business::{
    EditOutpost, Outpost, OutpostListPage, OutpostRequest, OutpostType, OutpostsApi,
    OutpostsClient as _,
};
use outposts_states::{ApiError, Modal, ModalAction, ModalError};
use serde_json::Value;
use tracing::{info, instrument};
use ustr::{Ustr, ustr};

use crate::cli::OutpostFields;
use crate::context::CliContext;

/// Flag values parsed up front, so malformed JSON fails before any request.
#[derive(Debug, Default)]
struct FieldPatch {
    name: Option<String>,
    outpost_type: Option<OutpostType>,
    providers: Option<Vec<u32>>,
    service_connection: Option<Ustr>,
    config: Option<Value>,
}

impl FieldPatch {
    fn parse(fields: OutpostFields) -> Result<Self> {
        let config = fields
            .config
            .as_deref()
            .map(serde_json::from_str::<Value>)
            .transpose()
            .context("--config is not valid JSON")?;
        Ok(Self {
            name: fields.name,
            outpost_type: fields.outpost_type,
            providers: (!fields.providers.is_empty()).then_some(fields.providers),
            service_connection: fields.service_connection.as_deref().map(ustr),
            config,
        })
    }

    fn apply(self, form: &mut OutpostRequest) {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(outpost_type) = self.outpost_type {
            form.outpost_type = outpost_type;
        }
        if let Some(providers) = self.providers {
            form.providers = providers;
        }
        if let Some(connection) = self.service_connection {
            form.service_connection = Some(connection);
        }
        if let Some(config) = self.config {
            form.config = config;
        }
    }
}

#[instrument(skip_all, name = "create")]
pub async fn run_create(ctx: &CliContext, fields: OutpostFields) -> Result<ExitCode> {
    let patch = FieldPatch::parse(fields)?;
    let page = ctx.page();
    let modal = page.create_modal();
    submit_form(ctx, &page, &modal, patch).await
}

#[instrument(skip_all, name = "update", fields(pk = %pk))]
pub async fn run_update(ctx: &CliContext, pk: &str, fields: OutpostFields) -> Result<ExitCode> {
    let patch = FieldPatch::parse(fields)?;
    let outpost = match ctx.api.retrieve(ustr(pk)).await {
        Ok(outpost) => outpost,
        Err(err) => {
            ctx.out.api_error(format!("Failed to load outpost {pk}"), &err);
            return Ok(ExitCode::FAILURE);
        }
    };

    let page = ctx.page();
    let modal = Modal::new(EditOutpost::new(ctx.api.clone(), &outpost));
    submit_form(ctx, &page, &modal, patch).await
}

async fn submit_form<A>(
    ctx: &CliContext,
    page: &OutpostListPage<OutpostsApi>,
    modal: &Modal<A>,
    patch: FieldPatch,
) -> Result<ExitCode>
where
    A: ModalAction<Form = OutpostRequest, Output = Outpost>,
{
    let out = &ctx.out;
    let header = modal.action().header();
    modal.open();
    modal
        .update_form(|form| patch.apply(form))
        .with_context(|| format!("{header} could not be edited"))?;

    match page.submit(modal).await {
        Ok(outpost) => {
            info!(pk = %outpost.pk, "{header} succeeded");
            out.success(format!("{} ({})", outpost.name, outpost.pk));
            if let Some(snapshot_page) = page.table().snapshot().page() {
                out.dim(format!("{} outpost(s) in total", snapshot_page.total_count()));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(ModalError::Api(err)) => {
            out.api_error(format!("{header} failed"), &err);
            Ok(exit_code_for(&err))
        }
        Err(err) => Err(err).context(header),
    }
}

fn exit_code_for(err: &ApiError) -> ExitCode {
    match err {
        ApiError::Validation { .. } => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}
