//! Buyer CLI commands
//!
//! Add, edit, inspect, list and export buyer leads. Writes go through the
//! mutation pipeline, which checks the login; reads check it here.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand, ValueEnum};
use serde_json::{Map, Value};

use crate::auth::AuthContext;
use crate::display::{format_buyer_details, format_buyer_page, format_history};
use crate::error::{LeadsError, LeadsResult};
use crate::export::{export_buyers_csv, export_buyers_json, export_buyers_yaml, BuyerExport};
use crate::models::{Buyer, BuyerId, BuyerStatus, City, PropertyType, Timeline};
use crate::services::{LeadMutationService, QueryService};
use crate::storage::{BuyerFilter, Storage};

/// Buyer subcommands
#[derive(Subcommand)]
pub enum BuyerCommands {
    /// Add a new buyer lead
    Add {
        #[command(flatten)]
        fields: BuyerFields,
        /// Read the buyer as a JSON object from a file ("-" for stdin)
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },
    /// Edit a buyer lead (fields not given keep their current value)
    Edit {
        /// Buyer ID (full or short form)
        id: String,
        #[command(flatten)]
        fields: BuyerFields,
        /// Replace the buyer with a JSON object from a file ("-" for stdin)
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },
    /// Show buyer details
    Show {
        /// Buyer ID (full or short form)
        id: String,
    },
    /// Show a buyer's change history
    History {
        /// Buyer ID (full or short form)
        id: String,
    },
    /// List buyers, most recently updated first
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Page number
        #[arg(short, long, default_value = "1")]
        page: usize,
    },
    /// Export buyers to a file
    Export {
        /// Output path ("-" for stdout)
        output: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,
        #[command(flatten)]
        filter: FilterArgs,
    },
}

/// Export file formats
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Yaml,
}

/// Buyer fields settable from flags
///
/// An empty value (`--email ""`) clears an optional field on edit.
#[derive(Args, Debug, Default)]
pub struct BuyerFields {
    /// Full name
    #[arg(long)]
    pub name: Option<String>,
    /// Phone number (10-15 digits)
    #[arg(long)]
    pub phone: Option<String>,
    /// Email address
    #[arg(long)]
    pub email: Option<String>,
    /// City (Chandigarh, Mohali, Zirakpur, Panchkula, Other)
    #[arg(long)]
    pub city: Option<String>,
    /// Property type (Apartment, Villa, Plot, Office, Retail)
    #[arg(long = "type")]
    pub property_type: Option<String>,
    /// BHK (1-4 or Studio); required for Apartment and Villa
    #[arg(long)]
    pub bhk: Option<String>,
    /// Purpose (Buy, Rent)
    #[arg(long)]
    pub purpose: Option<String>,
    /// Minimum budget
    #[arg(long)]
    pub budget_min: Option<String>,
    /// Maximum budget
    #[arg(long)]
    pub budget_max: Option<String>,
    /// Timeline (0-3m, 3-6m, >6m, Exploring)
    #[arg(long)]
    pub timeline: Option<String>,
    /// Lead source (Website, Referral, Walk-in, Call, Other)
    #[arg(long)]
    pub source: Option<String>,
    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
    /// Status (New, Qualified, Contacted, Visited, Negotiation, Converted, Dropped)
    #[arg(long)]
    pub status: Option<String>,
}

impl BuyerFields {
    /// Write every given flag into `body` under its wire name
    fn overlay(self, body: &mut Map<String, Value>) {
        let pairs = [
            ("fullName", self.name),
            ("phone", self.phone),
            ("email", self.email),
            ("city", self.city),
            ("propertyType", self.property_type),
            ("bhk", self.bhk),
            ("purpose", self.purpose),
            ("budgetMin", self.budget_min),
            ("budgetMax", self.budget_max),
            ("timeline", self.timeline),
            ("source", self.source),
            ("notes", self.notes),
            ("tags", self.tags),
            ("status", self.status),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                body.insert(key.to_string(), Value::String(value));
            }
        }
    }
}

/// List and export filters
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Filter by city
    #[arg(long)]
    pub city: Option<String>,
    /// Filter by property type
    #[arg(long = "type")]
    pub property_type: Option<String>,
    /// Filter by status
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by timeline
    #[arg(long)]
    pub timeline: Option<String>,
    /// Search name, phone or email
    #[arg(short = 'q', long)]
    pub search: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> LeadsResult<BuyerFilter> {
        Ok(BuyerFilter {
            city: parse_filter(self.city.as_deref(), "city", City::parse_loose, City::expected)?,
            property_type: parse_filter(
                self.property_type.as_deref(),
                "type",
                PropertyType::parse_loose,
                PropertyType::expected,
            )?,
            status: parse_filter(
                self.status.as_deref(),
                "status",
                BuyerStatus::parse_loose,
                BuyerStatus::expected,
            )?,
            timeline: parse_filter(
                self.timeline.as_deref(),
                "timeline",
                Timeline::parse_loose,
                Timeline::expected,
            )?,
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
        })
    }

    /// `key=value` pairs for the export envelope
    fn describe(&self) -> Vec<String> {
        [
            ("city", &self.city),
            ("type", &self.property_type),
            ("status", &self.status),
            ("timeline", &self.timeline),
            ("search", &self.search),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{}={}", key, v)))
        .collect()
    }
}

fn parse_filter<T>(
    value: Option<&str>,
    flag: &str,
    parse: fn(&str) -> Option<T>,
    expected: fn() -> String,
) -> LeadsResult<Option<T>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse(raw).map(Some).ok_or_else(|| {
            LeadsError::Validation(format!(
                "Invalid --{} '{}'. Expected one of {}",
                flag,
                raw,
                expected()
            ))
        }),
    }
}

/// Handle a buyer command
pub fn handle_buyer_command(
    storage: &Storage,
    auth: &AuthContext,
    page_size: usize,
    credential: Option<&str>,
    cmd: BuyerCommands,
) -> LeadsResult<()> {
    let mutations = LeadMutationService::new(storage, auth);
    let queries = QueryService::new(storage, page_size);

    match cmd {
        BuyerCommands::Add { fields, json } => {
            let mut body = match json {
                Some(path) => read_json_object(&path)?,
                None => Map::new(),
            };
            fields.overlay(&mut body);

            let buyer = mutations.create(&Value::Object(body), credential)?;
            println!("Created buyer: {} ({})", buyer.full_name, buyer.id.short());
            println!("  ID: {}", buyer.id);
        }
        BuyerCommands::Edit { id, fields, json } => {
            // The pipeline decides validation, auth and existence; only the
            // flag-only form needs the stored record up front to fill the body
            let (target, mut body) = match json {
                Some(path) => (resolve_id(&queries, &id), read_json_object(&path)?),
                None => {
                    let current = queries.get(&id)?;
                    let body = match serde_json::to_value(current.to_input())? {
                        Value::Object(map) => map,
                        _ => Map::new(),
                    };
                    (current.id.to_string(), body)
                }
            };
            fields.overlay(&mut body);

            let buyer = mutations.update(&target, &Value::Object(body), credential)?;
            println!("Updated buyer: {} ({})", buyer.full_name, buyer.id.short());
        }
        BuyerCommands::Show { id } => {
            auth.authenticate(credential)?;
            let buyer = queries.get(&id)?;
            print!("{}", format_buyer_details(&buyer));
        }
        BuyerCommands::History { id } => {
            auth.authenticate(credential)?;
            let (buyer, entries) = queries.history(&id)?;
            print!("{}", format_history(&buyer, &entries));
        }
        BuyerCommands::List { filter, page } => {
            auth.authenticate(credential)?;
            let page = queries.list(&filter.to_filter()?, page)?;
            println!("{}", format_buyer_page(&page));
        }
        BuyerCommands::Export {
            output,
            format,
            filter,
        } => {
            auth.authenticate(credential)?;
            let buyers = queries.all(&filter.to_filter()?)?;
            let count = buyers.len();

            if output.as_os_str() == "-" {
                write_export(io::stdout().lock(), format, buyers, filter.describe())?;
            } else {
                let file = File::create(&output).map_err(|e| {
                    LeadsError::Export(format!("Failed to create {}: {}", output.display(), e))
                })?;
                write_export(BufWriter::new(file), format, buyers, filter.describe())?;
                println!("Exported {} buyers to {}", count, output.display());
            }
        }
    }

    Ok(())
}

fn write_export<W: Write>(
    mut writer: W,
    format: ExportFormat,
    buyers: Vec<Buyer>,
    filters: Vec<String>,
) -> LeadsResult<()> {
    match format {
        ExportFormat::Csv => export_buyers_csv(&buyers, &mut writer)?,
        ExportFormat::Json => {
            export_buyers_json(&BuyerExport::new(buyers, filters), &mut writer, true)?
        }
        ExportFormat::Yaml => export_buyers_yaml(&BuyerExport::new(buyers, filters), &mut writer)?,
    }
    writer
        .flush()
        .map_err(|e| LeadsError::Export(e.to_string()))
}

/// Full id for `id`, expanding a short `byr-xxxxxxxx` form that names a
/// stored buyer; anything else is passed through unchanged
fn resolve_id(queries: &QueryService<'_>, id: &str) -> String {
    if id.parse::<BuyerId>().is_ok() {
        return id.trim().to_string();
    }
    queries
        .get(id)
        .map(|buyer| buyer.id.to_string())
        .unwrap_or_else(|_| id.to_string())
}

/// Read a JSON object body from a file, or stdin for "-"
fn read_json_object(path: &Path) -> LeadsResult<Map<String, Value>> {
    let mut contents = String::new();
    if path.as_os_str() == "-" {
        io::stdin().read_to_string(&mut contents)?;
    } else {
        contents = std::fs::read_to_string(path)?;
    }

    let parsed: Value = serde_json::from_str(&contents).map_err(|e| {
        LeadsError::Validation(format!("{} is not valid JSON: {}", path.display(), e))
    })?;
    match parsed {
        Value::Object(map) => Ok(map),
        _ => Err(LeadsError::Validation(format!(
            "{} must contain a JSON object",
            path.display()
        ))),
    }
}
