use crate::report::BugRow;

pub const HEADERS: [&str; 6] =
    ["Charm", "Status", "Description", "Owner", "Priority", "Link"];

const COLUMN_GAP: &str = "  ";

fn cells(row: &BugRow) -> [&str; 6] {
    [
        row.charm.as_str(),
        row.status.as_str(),
        row.description.as_str(),
        row.owner.as_str(),
        row.priority.as_str(),
        row.link.as_str(),
    ]
}

/// Render rows as left-justified columns under a header line. Each column
/// is as wide as its widest cell.
pub fn render(rows: &[BugRow]) -> String {
    let mut widths = HEADERS.map(|h| h.chars().count());

    for row in rows.iter() {
        for (i, cell) in cells(row).iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render_line(&HEADERS, &widths));

    for row in rows.iter() {
        lines.push(render_line(&cells(row), &widths));
    }

    lines.join("\n")
}

fn render_line(cells: &[&str; 6], widths: &[usize; 6]) -> String {
    cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<String>>()
        .join(COLUMN_GAP)
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(charm: &str, description: &str) -> BugRow {
        BugRow {
            charm: charm.into(),
            status: "New".into(),
            description: description.into(),
            owner: "Unassigned".into(),
            priority: "High".into(),
            link: "https://bugs.launchpad.net/bugs/1".into(),
        }
    }

    #[test]
    fn renders_header_for_empty_rows() {
        let output = render(&[]);
        assert_eq!(output, "Charm  Status  Description  Owner  Priority  Link");
    }

    #[test]
    fn aligns_columns_to_widest_cell() {
        let rows = vec![
            row("charm-nova", "short"),
            row("charm-keystone", "a much longer description"),
        ];

        let output = render(&rows);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);

        let status_col = lines[0].find("Status").unwrap();
        assert_eq!(lines[1].find("New").unwrap(), status_col);
        assert_eq!(lines[2].find("New").unwrap(), status_col);
        assert_eq!(status_col, "charm-keystone".len() + COLUMN_GAP.len());

        let owner_col = lines[0].find("Owner").unwrap();
        assert_eq!(lines[1].find("Unassigned").unwrap(), owner_col);
        assert_eq!(lines[2].find("Unassigned").unwrap(), owner_col);
    }

    #[test]
    fn preserves_insertion_order() {
        let rows = vec![row("charm-b", "first"), row("charm-a", "second")];

        let output = render(&rows);
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[1].starts_with("charm-b"));
        assert!(lines[2].starts_with("charm-a"));
    }
}
