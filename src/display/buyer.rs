//! Buyer display formatting
//!
//! Formats buyers for terminal output in table and detail views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Buyer;
use crate::services::BuyerPage;

#[derive(Tabled)]
struct BuyerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Type")]
    property_type: String,
    #[tabled(rename = "Budget")]
    budget: String,
    #[tabled(rename = "Timeline")]
    timeline: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Buyer> for BuyerRow {
    fn from(buyer: &Buyer) -> Self {
        let property_type = match buyer.bhk {
            Some(bhk) => format!("{} ({} BHK)", buyer.property_type, bhk),
            None => buyer.property_type.to_string(),
        };
        Self {
            id: buyer.id.short(),
            name: buyer.full_name.clone(),
            phone: buyer.phone.clone(),
            city: buyer.city.to_string(),
            property_type,
            budget: buyer.budget_display(),
            timeline: buyer.timeline.to_string(),
            status: buyer.status.to_string(),
            updated: buyer.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Format one page of buyers as a table with a page footer
pub fn format_buyer_page(page: &BuyerPage) -> String {
    if page.buyers.is_empty() {
        return if page.total == 0 {
            "No buyers found.".to_string()
        } else {
            format!("Page {} is empty ({} buyers in {} pages).", page.page, page.total, page.pages)
        };
    }

    let rows: Vec<BuyerRow> = page.buyers.iter().map(BuyerRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());

    format!(
        "{}\n\nPage {} of {} ({} buyers)\n",
        table, page.page, page.pages, page.total
    )
}

/// Format a single buyer's details
pub fn format_buyer_details(buyer: &Buyer) -> String {
    let mut output = String::new();

    output.push_str(&format!("Buyer: {}\n", buyer.full_name));
    output.push_str(&format!("  ID:             {}\n", buyer.id));
    output.push_str(&format!("  Status:         {}\n", buyer.status));
    output.push_str(&format!("  Phone:          {}\n", buyer.phone));
    output.push_str(&format!(
        "  Email:          {}\n",
        buyer.email.as_deref().unwrap_or("-")
    ));
    output.push('\n');
    output.push_str(&format!("  City:           {}\n", buyer.city));
    output.push_str(&format!("  Property Type:  {}\n", buyer.property_type));
    if let Some(bhk) = buyer.bhk {
        output.push_str(&format!("  BHK:            {}\n", bhk));
    }
    output.push_str(&format!("  Purpose:        {}\n", buyer.purpose));
    output.push_str(&format!("  Budget:         {}\n", buyer.budget_display()));
    output.push_str(&format!("  Timeline:       {}\n", buyer.timeline));
    output.push_str(&format!("  Source:         {}\n", buyer.source));

    if !buyer.tags.is_empty() {
        output.push_str(&format!("  Tags:           {}\n", buyer.tags.join(", ")));
    }

    if let Some(notes) = &buyer.notes {
        output.push('\n');
        output.push_str(&format!("  Notes: {}\n", notes));
    }

    output.push('\n');
    output.push_str(&format!("  Owner:    {}\n", buyer.owner_id));
    output.push_str(&format!(
        "  Created:  {}\n",
        buyer.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        buyer.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}
