use crate::types::assessment::{AssessmentType, Gender};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lovemirror",
    version,
    about = "Relationship self-assessment scoring CLI"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory holding lovemirror.toml and the data file
    #[arg(long, global = true, default_value = ".")]
    pub data: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the question sheet for an assessment type or profile
    Questions(QuestionsCommand),
    /// Score an answer sheet without saving it
    Score(ScoreCommand),
    /// Score a bridal-price sheet and value it
    BridalPrice(BridalPriceCommand),
    /// Score and save a self-assessment
    Submit(SubmitCommand),
    /// Invite, list, renew or remove the people who rate a user
    Assessor(AssessorCommand),
    /// Answer an assessor invitation with a rating of the inviting user
    Assess(AssessCommand),
    /// Recalculate a user's delusional score
    Delusional(DelusionalCommand),
    /// Summarize the external assessments of a user
    Summary(SummaryCommand),
    /// Create a partner invitation
    Invite(InviteCommand),
    /// Accept a partner invitation
    Accept(AcceptCommand),
    /// Decline a partner invitation
    Decline(DeclineCommand),
    /// Mark a relationship inactive
    EndRelationship(RelationshipCommand),
    /// Calculate and store a couple's compatibility
    Compatibility(CompatibilityCommand),
    /// Show the stored compatibility score of a relationship
    CompatibilityScore(RelationshipCommand),
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

#[derive(Args)]
pub struct QuestionsCommand {
    #[arg(long = "type", value_enum, required_unless_present = "gender")]
    pub assessment_type: Option<AssessmentType>,
    #[arg(long, value_enum)]
    pub gender: Option<Gender>,
    #[arg(long, requires = "gender")]
    pub region: Option<String>,
    #[arg(long, requires = "gender")]
    pub cultural_context: Option<String>,
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct ScoreCommand {
    #[arg(long = "type", value_enum)]
    pub assessment_type: AssessmentType,
    /// JSON array of responses; `-` reads stdin
    #[arg(long)]
    pub responses: PathBuf,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

fn positive_amount(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{raw} is not a positive finite amount"));
    }
    Ok(value)
}

fn share_percentage(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{raw} is not a finite, non-negative percentage"));
    }
    Ok(value)
}

#[derive(Args)]
pub struct BridalPriceCommand {
    /// JSON array of responses; `-` reads stdin
    #[arg(long)]
    pub responses: PathBuf,
    #[arg(long)]
    pub region: Option<String>,
    #[arg(long, value_parser = positive_amount)]
    pub base_value: Option<f64>,
    #[arg(long, requires = "percentage", value_parser = positive_amount)]
    pub partner_income: Option<f64>,
    /// Share of partner income, in percent
    #[arg(long, requires = "partner_income", value_parser = share_percentage)]
    pub percentage: Option<f64>,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct SubmitCommand {
    #[arg(long)]
    pub user: String,
    #[arg(long = "type", value_enum)]
    pub assessment_type: AssessmentType,
    #[arg(long)]
    pub responses: PathBuf,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct AssessorCommand {
    #[command(subcommand)]
    pub action: AssessorAction,
}

#[derive(Subcommand)]
pub enum AssessorAction {
    /// Invite someone to rate a user
    Invite(AssessorInviteCommand),
    /// List a user's assessors, newest first
    List(AssessorListCommand),
    /// Renew a pending assessor's expiry
    Resend(AssessorTargetCommand),
    /// Remove an assessor
    Remove(AssessorTargetCommand),
}

#[derive(Args)]
pub struct AssessorInviteCommand {
    /// The user being rated
    #[arg(long)]
    pub user: String,
    #[arg(long)]
    pub email: String,
    /// How the assessor knows the user
    #[arg(long)]
    pub relationship: String,
    #[arg(long = "type", value_enum)]
    pub assessment_type: Option<AssessmentType>,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct AssessorListCommand {
    #[arg(long)]
    pub user: String,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct AssessorTargetCommand {
    #[arg(long)]
    pub user: String,
    /// Assessor id
    #[arg(long)]
    pub id: String,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct AssessCommand {
    /// Code from the assessor invitation
    #[arg(long)]
    pub code: String,
    /// Needed only when the invitation names no type
    #[arg(long = "type", value_enum)]
    pub assessment_type: Option<AssessmentType>,
    #[arg(long)]
    pub responses: PathBuf,
    #[arg(long)]
    pub feedback: Option<String>,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct DelusionalCommand {
    #[arg(long)]
    pub user: String,
    #[arg(long = "type", value_enum)]
    pub assessment_type: AssessmentType,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct SummaryCommand {
    #[arg(long)]
    pub user: String,
    #[arg(long = "type", value_enum)]
    pub assessment_type: Option<AssessmentType>,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct InviteCommand {
    #[arg(long)]
    pub user: String,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct AcceptCommand {
    #[arg(long)]
    pub user: String,
    #[arg(long)]
    pub code: String,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct DeclineCommand {
    #[arg(long)]
    pub user: String,
    #[arg(long)]
    pub code: String,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct RelationshipCommand {
    #[arg(long)]
    pub user: String,
    #[arg(long)]
    pub relationship: String,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct CompatibilityCommand {
    /// Caller identity; omitted means unauthenticated
    #[arg(long)]
    pub user: Option<String>,
    #[arg(long, conflicts_with = "relationship")]
    pub code: Option<String>,
    #[arg(long)]
    pub relationship: Option<String>,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_must_be_positive_and_finite() {
        assert_eq!(positive_amount("1500.5"), Ok(1500.5));
        for raw in ["NaN", "inf", "-inf", "0", "-20", "ten"] {
            assert!(positive_amount(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn percentages_may_be_zero() {
        assert_eq!(share_percentage("0"), Ok(0.0));
        assert!(share_percentage("-1").is_err());
        assert!(share_percentage("NaN").is_err());
    }
}
