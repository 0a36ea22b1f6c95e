//! CSV export of leads
//!
//! Every field is wrapped in double quotes with embedded quotes doubled,
//! fields are joined by `,` and rows by `\n`. The header row comes first.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{ContactSubmission, QuoteRequest};

pub const QUOTE_HEADERS: [&str; 11] = [
    "Date",
    "Name",
    "Email",
    "Phone",
    "Project Type",
    "Material",
    "Size",
    "Budget",
    "Status",
    "Custom Message",
    "Has Images",
];

pub const CONTACT_HEADERS: [&str; 6] = ["Date", "Name", "Email", "Phone", "Subject", "Status"];

/// A generated CSV download
#[derive(Debug, Clone, Serialize)]
pub struct CsvExport {
    pub file_name: String,
    pub body: String,
}

fn quote_field(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Render a header row and data rows
pub fn to_csv<R, F>(headers: &[&str], rows: R) -> String
where
    R: IntoIterator<Item = Vec<F>>,
    F: AsRef<str>,
{
    let mut lines = vec![headers
        .iter()
        .map(|h| quote_field(h))
        .collect::<Vec<_>>()
        .join(",")];
    for row in rows {
        lines.push(
            row.iter()
                .map(|f| quote_field(f.as_ref()))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

/// `M/D/YYYY`, no zero padding
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y").to_string()
}

/// `{prefix}-YYYY-MM-DD.csv`
pub fn export_file_name(prefix: &str, today: NaiveDate) -> String {
    format!("{}-{}.csv", prefix, today.format("%Y-%m-%d"))
}

pub fn quotes_csv(quotes: &[QuoteRequest]) -> String {
    let rows = quotes.iter().map(|q| {
        vec![
            format_date(&q.created_at),
            q.customer_name.clone(),
            q.email.clone(),
            q.phone.clone(),
            q.project_type.clone(),
            q.material_type.clone(),
            q.size.clone(),
            q.budget_range.clone(),
            q.status.to_string(),
            q.custom_message.clone(),
            if q.has_images() { "Yes" } else { "No" }.to_string(),
        ]
    });
    to_csv(&QUOTE_HEADERS, rows)
}

pub fn contacts_csv(contacts: &[ContactSubmission]) -> String {
    let rows = contacts.iter().map(|c| {
        vec![
            format_date(&c.created_at),
            c.name.clone(),
            c.email.clone(),
            c.phone.clone(),
            c.subject.clone(),
            c.status.to_string(),
        ]
    });
    to_csv(&CONTACT_HEADERS, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContactStatus, QuoteStatus};
    use chrono::TimeZone;

    fn quote(images: Vec<String>) -> QuoteRequest {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 15, 30, 0).unwrap();
        QuoteRequest {
            id: 1,
            customer_name: "Jane \"JJ\" Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: String::new(),
            project_type: "Custom Shed".to_string(),
            material_type: "Wood".to_string(),
            color: "Red".to_string(),
            size: "10x12".to_string(),
            shed_style: "Gable".to_string(),
            description: "Backyard shed".to_string(),
            budget_range: "$2,000 - $5,000".to_string(),
            timeline: "ASAP".to_string(),
            status: QuoteStatus::Pending,
            notes: String::new(),
            custom_message: "Needs a ramp, please".to_string(),
            inspiration_images: images,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_to_csv_quotes_every_field() {
        let csv = to_csv(&["A", "B"], vec![vec!["1", "x,y"], vec!["", "say \"hi\""]]);
        assert_eq!(csv, "\"A\",\"B\"\n\"1\",\"x,y\"\n\"\",\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(
            contacts_csv(&[]),
            "\"Date\",\"Name\",\"Email\",\"Phone\",\"Subject\",\"Status\""
        );
    }

    #[test]
    fn test_quote_row_layout() {
        let csv = quotes_csv(&[quote(vec!["quotes/a.jpg".to_string()]), quote(Vec::new())]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("\"Date\",\"Name\",\"Email\""));
        assert!(lines[0].ends_with("\"Custom Message\",\"Has Images\""));
        assert_eq!(
            lines[1],
            "\"3/5/2024\",\"Jane \"\"JJ\"\" Doe\",\"jane@example.com\",\"\",\"Custom Shed\",\
             \"Wood\",\"10x12\",\"$2,000 - $5,000\",\"pending\",\"Needs a ramp, please\",\"Yes\""
        );
        assert!(lines[2].ends_with("\"No\""));
    }

    #[test]
    fn test_contact_row_layout() {
        let at = Utc.with_ymd_and_hms(2023, 11, 20, 8, 0, 0).unwrap();
        let contact = ContactSubmission {
            id: 3,
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            phone: "555-0100".to_string(),
            subject: "Hours".to_string(),
            message: "Open on Sunday?".to_string(),
            status: ContactStatus::Read,
            created_at: at,
            updated_at: at,
        };
        let csv = contacts_csv(&[contact]);
        assert_eq!(
            csv.lines().nth(1),
            Some("\"11/20/2023\",\"Sam\",\"sam@example.com\",\"555-0100\",\"Hours\",\"read\"")
        );
    }

    #[test]
    fn test_file_name() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(export_file_name("quote-requests", day), "quote-requests-2024-01-09.csv");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(20))]

            /// Each line starts and ends with a quote and has one field per column
            #[test]
            fn property_fields_are_quoted(
                rows in prop::collection::vec(prop::collection::vec("[a-zA-Z0-9 ,\"]{0,12}", 3), 0..8)
            ) {
                let csv = to_csv(&["One", "Two", "Three"], rows.clone());
                let lines: Vec<&str> = csv.split('\n').collect();
                prop_assert_eq!(lines.len(), rows.len() + 1);
                for line in &lines {
                    prop_assert!(line.starts_with('"') && line.ends_with('"'));
                }
                for (line, row) in lines.iter().skip(1).zip(rows.iter()) {
                    let expected: Vec<String> = row.iter().map(|f| quote_field(f)).collect();
                    prop_assert_eq!(line.to_string(), expected.join(","));
                }
            }
        }
    }
}
