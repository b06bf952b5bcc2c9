pub mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fleetdesk_core::domain::record::RecordKind;
use fleetdesk_core::domain::workflow::ApprovalAction;

use crate::commands::reminders::ReminderProfile;

#[derive(Debug, Parser)]
#[command(
    name = "fleetdesk",
    about = "Fleetdesk admin console CLI",
    long_about = "Operate the fleet/facility asset console: list records, apply approval \
                  actions, and review compliance reminders over the seeded demo dataset.",
    after_help = "Examples:\n  fleetdesk records\n  fleetdesk approve REC-V-1001 --actor \"Regional Manager\"\n  fleetdesk reminders --as-of 2026-08-01"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List console records with their derived approval status")]
    Records {
        #[arg(long, help = "Restrict to one record kind (e.g. vehicle_request)")]
        kind: Option<RecordKind>,
        #[arg(long = "as-of", help = "Evaluate against this date instead of today (YYYY-MM-DD)")]
        as_of: Option<String>,
    },
    #[command(about = "Show one record with its full workflow step list")]
    Show {
        record_id: String,
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
    #[command(about = "Approve the active workflow step of a record")]
    Approve {
        record_id: String,
        #[arg(long, help = "Acting approver recorded on the step")]
        actor: String,
        #[arg(long)]
        comment: Option<String>,
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
    #[command(about = "Reject the active workflow step; the record becomes terminal")]
    Reject {
        record_id: String,
        #[arg(long)]
        actor: String,
        #[arg(long)]
        comment: Option<String>,
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
    #[command(about = "Send the record back for revision")]
    Revise {
        record_id: String,
        #[arg(long)]
        actor: String,
        #[arg(long)]
        comment: Option<String>,
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
    #[command(about = "Reopen a revised record; the workflow restarts at the first tier")]
    Resubmit {
        record_id: String,
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
    #[command(about = "Classify legal-document expiries into reminder buckets")]
    Reminders {
        #[arg(long, help = "Threshold profile to apply (legal|sla)")]
        profile: Option<ReminderProfile>,
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
    #[command(about = "Maintenance cost totals and turnaround day-counts")]
    Maintenance {
        #[arg(long = "as-of")]
        as_of: Option<String>,
    },
    #[command(about = "Inspect effective configuration after file and env overrides")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Records { kind, as_of } => commands::records::run(kind, as_of.as_deref()),
        Command::Show { record_id, as_of } => commands::show::run(&record_id, as_of.as_deref()),
        Command::Approve { record_id, actor, comment, as_of } => commands::act::run(
            ApprovalAction::Approve,
            &record_id,
            &actor,
            comment.as_deref(),
            as_of.as_deref(),
        ),
        Command::Reject { record_id, actor, comment, as_of } => commands::act::run(
            ApprovalAction::Reject,
            &record_id,
            &actor,
            comment.as_deref(),
            as_of.as_deref(),
        ),
        Command::Revise { record_id, actor, comment, as_of } => commands::act::run(
            ApprovalAction::Revise,
            &record_id,
            &actor,
            comment.as_deref(),
            as_of.as_deref(),
        ),
        Command::Resubmit { record_id, as_of } => {
            commands::act::resubmit(&record_id, as_of.as_deref())
        }
        Command::Reminders { profile, as_of } => {
            commands::reminders::run(profile, as_of.as_deref())
        }
        Command::Maintenance { as_of } => commands::maintenance::run(as_of.as_deref()),
        Command::Config => commands::config::run(),
    };

    tracing::debug!(exit_code = result.exit_code, "command finished");
    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
