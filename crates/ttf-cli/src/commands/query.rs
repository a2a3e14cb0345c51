//! Query command implementation.
//!
//! Resolves any reference kind through the query facade.

use anyhow::Result;
use clap::Args;

use ttf_core::query::{QueryFacade, QueryOutcome, QueryResponse};
use ttf_core::resolve::{ContractMetadata, ResolvedContract};

use crate::cli::OutputFormat;
use crate::commands::{Context, PointInTimeArgs};
use crate::error::CliError;
use crate::output::{print_header, print_output, print_single, print_warning, KeyValue};

/// Arguments for the query command.
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Reference, e.g. TFM\J25, TFM2, TFMAPR1 or TFMDECJUN1
    pub reference: String,

    /// Reference kind: specific, generic, monthly_generic or spread
    #[arg(short, long, default_value = "specific")]
    pub kind: String,

    #[command(flatten)]
    pub when: PointInTimeArgs,
}

/// Execute the query command.
pub fn execute(args: QueryArgs, format: OutputFormat, ctx: &Context) -> Result<()> {
    let point_in_time = args.when.point_in_time()?;
    let table = ctx.load_calendar()?;
    let response = QueryFacade::new(&table).query(&args.reference, &args.kind, point_in_time)?;
    render(&args.reference, &response, format, ctx)
}

/// Prints a facade response, or fails with the no-match reason.
pub fn render(
    reference: &str,
    response: &QueryResponse,
    format: OutputFormat,
    ctx: &Context,
) -> Result<()> {
    if let Some(reason) = response.no_match() {
        return Err(CliError::NoMatch {
            reference: reference.to_string(),
            reason: reason.clone(),
        }
        .into());
    }

    if !ctx.quiet {
        for warning in response.warnings() {
            print_warning(&warning.to_string());
        }
    }

    match format {
        OutputFormat::Json => print_single(response),
        OutputFormat::Minimal => {
            for code in response.codes() {
                println!("{code}");
            }
            Ok(())
        }
        OutputFormat::Table | OutputFormat::Csv => {
            let rows = match &response.outcome {
                QueryOutcome::Contract(contract) => contract_rows(contract),
                QueryOutcome::Spread(spread) => super::spread::spread_rows(spread),
                QueryOutcome::NoMatch(_) => Vec::new(),
            };
            if format == OutputFormat::Table && !ctx.quiet {
                print_header(&response.reference.to_string());
            }
            print_output(&rows, format)
        }
    }
}

fn contract_rows(contract: &ResolvedContract) -> Vec<KeyValue> {
    let record = &contract.record;
    let mut rows = vec![
        KeyValue::new("Code", record.code.clone()),
        KeyValue::new("Original code", record.original_code.clone()),
        KeyValue::new(
            "Delivery month",
            record
                .delivery_month
                .map_or_else(|| "-".to_string(), |d| d.long_name()),
        ),
        KeyValue::new("Contract month", record.contract_month.to_string()),
        KeyValue::new("Expiry", record.expiry_date.to_string()),
    ];
    rows.extend(metadata_rows(&contract.metadata));
    rows
}

/// Rows describing how a contract was chosen.
pub fn metadata_rows(metadata: &ContractMetadata) -> Vec<KeyValue> {
    let mut rows = Vec::new();
    if let Some(pit) = &metadata.point_in_time {
        rows.push(KeyValue::new("Point in time", pit.to_string()));
    }
    rows.push(KeyValue::new("Candidates", metadata.candidates.to_string()));
    if let Some(expired) = &metadata.expired {
        rows.push(KeyValue::new(
            "Expired",
            format!(
                "{} {} ({}) expired {}",
                expired.month, expired.year, expired.code, expired.expiry_date
            ),
        ));
    }
    if let Some(next) = &metadata.next_available {
        rows.push(KeyValue::new(
            "Next available",
            format!("{}, expires {}", next.year, next.expiry_date),
        ));
    }
    rows
}
