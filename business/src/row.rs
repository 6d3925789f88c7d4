//! Projects an outpost into the cells of one table row.
//!
//! The projection is pure: it reads the record and nothing else. Interactive
//! cells carry descriptors ([`HealthKey`], [`RowAction`]) that the host turns
//! into widgets and modals.

use ustr::Ustr;

use crate::{HealthKey, Outpost};

/// One table column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    /// Ordering key sent to the API when the column is sortable.
    pub ordering: Option<&'static str>,
}

impl Column {
    pub const fn new(title: &'static str) -> Self {
        Self {
            title,
            ordering: None,
        }
    }

    pub const fn sortable(title: &'static str, ordering: &'static str) -> Self {
        Self {
            title,
            ordering: Some(ordering),
        }
    }
}

pub const COLUMNS: [Column; 4] = [
    Column::sortable("Name", "name"),
    Column::new("Providers"),
    Column::new("Health and Version"),
    Column::new(""),
];

/// A hyperlink cell entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub target: String,
    pub label: String,
}

/// Per-row overlay descriptors, bound to the record as it was when projected.
#[derive(Debug, Clone, PartialEq)]
pub enum RowAction {
    Edit(Outpost),
    Delete { pk: Ustr, name: String },
    DeploymentInfo { pk: Ustr, token_identifier: String },
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Edit(_) => "Edit",
            Self::Delete { .. } => "Delete",
            Self::DeploymentInfo { .. } => "View Deployment Info",
        }
    }

    /// The record this action targets.
    pub fn pk(&self) -> Ustr {
        match self {
            Self::Edit(outpost) => outpost.pk,
            Self::Delete { pk, .. } | Self::DeploymentInfo { pk, .. } => *pk,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Links(Vec<LinkRef>),
    Health(HealthKey),
    Actions(Vec<RowAction>),
}

pub fn provider_link(pk: u32) -> String {
    format!("#/core/providers/{pk}")
}

/// Maps one record to `COLUMNS.len()` cells.
pub fn project_row(outpost: &Outpost) -> Vec<Cell> {
    let providers = outpost
        .providers_obj
        .iter()
        .map(|p| LinkRef {
            target: provider_link(p.pk),
            label: p.name.clone(),
        })
        .collect();

    vec![
        Cell::Text(outpost.name.clone()),
        Cell::Links(providers),
        Cell::Health(HealthKey(outpost.pk)),
        Cell::Actions(vec![
            RowAction::Edit(outpost.clone()),
            RowAction::Delete {
                pk: outpost.pk,
                name: outpost.name.clone(),
            },
            RowAction::DeploymentInfo {
                pk: outpost.pk,
                token_identifier: outpost.token_identifier.clone(),
            },
        ]),
    ]
}
