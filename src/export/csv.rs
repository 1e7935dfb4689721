//! CSV Export functionality
//!
//! One row per buyer, spreadsheet-compatible. Quoting is left to the csv
//! writer.

use std::io::Write;

use crate::error::{LeadsError, LeadsResult};
use crate::models::{format_amount, Buyer};

pub const CSV_HEADERS: [&str; 12] = [
    "ID",
    "Full Name",
    "Phone",
    "Email",
    "City",
    "Property Type",
    "Budget Min",
    "Budget Max",
    "Timeline",
    "Status",
    "Created At",
    "Updated At",
];

/// Write buyers as CSV; an empty list still gets the header row
pub fn export_buyers_csv<W: Write>(buyers: &[Buyer], writer: W) -> LeadsResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(CSV_HEADERS)
        .map_err(|e| LeadsError::Export(e.to_string()))?;

    for buyer in buyers {
        let budget_min = buyer.budget_min.map(format_amount).unwrap_or_default();
        let budget_max = buyer.budget_max.map(format_amount).unwrap_or_default();
        let created_at = buyer.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
        let updated_at = buyer.updated_at.format("%Y-%m-%d %H:%M:%S").to_string();

        csv.write_record([
            buyer.id.to_string().as_str(),
            &buyer.full_name,
            &buyer.phone,
            buyer.email.as_deref().unwrap_or(""),
            buyer.city.as_str(),
            buyer.property_type.as_str(),
            &budget_min,
            &budget_max,
            buyer.timeline.as_str(),
            buyer.status.as_str(),
            &created_at,
            &updated_at,
        ])
        .map_err(|e| LeadsError::Export(e.to_string()))?;
    }

    csv.flush().map_err(|e| LeadsError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuyerInput, City, PropertyType, Purpose, Source, Timeline};

    fn buyer(name: &str) -> Buyer {
        Buyer::from_input(
            BuyerInput {
                full_name: name.into(),
                email: Some("jo@example.com".into()),
                phone: "9876543210".into(),
                city: City::Panchkula,
                property_type: PropertyType::Retail,
                bhk: None,
                purpose: Purpose::Buy,
                budget_min: Some(2500000.0),
                budget_max: None,
                timeline: Timeline::MoreThanSixMonths,
                source: Source::WalkIn,
                notes: None,
                tags: Vec::new(),
                status: None,
            },
            "u1",
        )
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let mut out = Vec::new();
        export_buyers_csv(&[], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("ID,Full Name,Phone,Email,City,Property Type"));
    }

    #[test]
    fn test_rows_are_quoted_when_needed() {
        let mut out = Vec::new();
        export_buyers_csv(&[buyer("Lee, Jo")], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();

        assert!(row.contains("\"Lee, Jo\""));
        assert!(row.contains(",2500000,,>6m,New,"));
        assert!(row.contains("Panchkula,Retail"));
    }

    #[test]
    fn test_output_reads_back() {
        let mut out = Vec::new();
        export_buyers_csv(&[buyer("Jo Lee"), buyer("Asha Rao")], &mut out).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let names: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[1].to_string())
            .collect();
        assert_eq!(names, vec!["Jo Lee", "Asha Rao"]);
    }
}
