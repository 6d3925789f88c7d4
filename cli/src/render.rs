//! Text rendering of projected outpost rows.

use std::collections::HashMap;

use outposts_business::{COLUMNS, Cell, HealthKey, HealthStatus, Outpost, RowAction, project_row};
use outposts_states::TableSnapshot;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Text of one cell. Health cells read from `health`; rows without an entry show a placeholder.
pub fn cell_text(cell: &Cell, health: &HashMap<HealthKey, HealthStatus>) -> String {
    match cell {
        Cell::Text(text) => text.clone(),
        Cell::Links(links) => links
            .iter()
            .map(|link| format!("{} ({})", link.label, link.target))
            .collect::<Vec<_>>()
            .join("\n"),
        Cell::Health(key) => health
            .get(key)
            .map_or_else(|| "-".to_owned(), |status| status.lines().join("\n")),
        Cell::Actions(actions) => actions
            .iter()
            .map(RowAction::label)
            .collect::<Vec<_>>()
            .join(" | "),
    }
}

/// Renders the outposts as a table, with the record ID as a leading column.
pub fn render_table(outposts: &[Outpost], health: &HashMap<HealthKey, HealthStatus>) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["ID".to_owned()];
    header.extend(COLUMNS.iter().map(|c| {
        if c.title.is_empty() {
            "Actions".to_owned()
        } else {
            c.title.to_owned()
        }
    }));
    builder.push_record(header);

    for outpost in outposts {
        let mut record = vec![outpost.pk.to_string()];
        record.extend(project_row(outpost).iter().map(|c| cell_text(c, health)));
        builder.push_record(record);
    }

    builder.build().with(Style::rounded()).to_string()
}

/// `Page 2 of 3 (21-40 of 55)`, or `No outposts found.` for an empty result.
pub fn page_summary(snapshot: &TableSnapshot<Outpost>) -> String {
    let Some(page) = snapshot.page() else {
        return "Not loaded.".to_owned();
    };
    match page.item_range() {
        Some((first, last)) => format!(
            "Page {} of {} ({first}-{last} of {})",
            page.page_number(),
            page.total_pages(),
            page.total_count()
        ),
        None => "No outposts found.".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use outposts_business::{LinkRef, OutpostType, ProviderRef};
    use ustr::Ustr;

    use super::*;

    fn outpost(pk: &str, providers: Vec<ProviderRef>) -> Outpost {
        Outpost {
            pk: Ustr::from(pk),
            name: format!("outpost-{pk}"),
            outpost_type: OutpostType::Proxy,
            providers: providers.iter().map(|p| p.pk).collect(),
            providers_obj: providers,
            service_connection: None,
            token_identifier: String::new(),
            config: serde_json::json!({}),
        }
    }

    #[test]
    fn cells_render_as_text() {
        let links = Cell::Links(vec![
            LinkRef {
                target: "#/core/providers/1".to_owned(),
                label: "grafana".to_owned(),
            },
            LinkRef {
                target: "#/core/providers/2".to_owned(),
                label: "wiki".to_owned(),
            },
        ]);
        let none = HashMap::new();
        assert_eq!(
            cell_text(&links, &none),
            "grafana (#/core/providers/1)\nwiki (#/core/providers/2)"
        );
        assert_eq!(cell_text(&Cell::Links(Vec::new()), &none), "");

        let key = HealthKey(Ustr::from("a"));
        assert_eq!(cell_text(&Cell::Health(key), &none), "-");
        let known = HashMap::from([(key, HealthStatus::Unavailable)]);
        assert_eq!(cell_text(&Cell::Health(key), &known), "Not available");
    }

    #[test]
    fn table_lists_every_row() {
        let table = render_table(
            &[
                outpost("a", vec![ProviderRef {
                    pk: 1,
                    name: "grafana".to_owned(),
                }]),
                outpost("b", Vec::new()),
            ],
            &HashMap::new(),
        );

        assert!(table.contains("Health and Version"));
        assert!(table.contains("outpost-a"));
        assert!(table.contains("outpost-b"));
        assert!(table.contains("Edit | Delete | View Deployment Info"));
    }
}
