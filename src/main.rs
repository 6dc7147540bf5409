mod assessors;
mod bridal_price;
mod cli;
mod compatibility;
mod config;
mod delusional;
mod error;
mod logging;
mod questions;
mod report;
mod scoring;
mod store;
mod submit;
mod types;

use crate::error::MirrorError;
use crate::scoring::tables::ScoringTables;
use crate::store::{FileStore, Store};
use crate::types::assessment::{AssessmentType, Category, Profile, Response};
use crate::types::config::MirrorConfig;
use crate::types::records::CompatibilityRecord;
use crate::types::records::ExternalAssessor;
use crate::types::report::{
    AssessorEntry, AssessorList, CategoryFeedback, CategorySuggestion, CompatibilityReport,
    DelusionalReport, QuestionGroup, QuestionSheet, Report, ScoreReport, StoredCompatibility,
};
use chrono::Utc;
use clap::Parser;
use std::io::Read;
use std::path::Path;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const INSUFFICIENT_DATA: i32 = 1;
    pub const REJECTED: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn output_format(format: cli::ReportFormat) -> report::OutputFormat {
    match format {
        cli::ReportFormat::Json => report::OutputFormat::Json,
        cli::ReportFormat::Md => report::OutputFormat::Md,
    }
}

fn emit(rendered: &Report, format: cli::ReportFormat) -> Result<(), MirrorError> {
    println!("{}", report::render(rendered, output_format(format))?);
    Ok(())
}

fn read_responses(path: &Path) -> Result<Vec<Response>, MirrorError> {
    let content = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        if !path.exists() {
            return Err(MirrorError::PathNotFound(path.display().to_string()));
        }
        std::fs::read_to_string(path)?
    };
    serde_json::from_str(&content)
        .map_err(|e| MirrorError::InvalidResponses(format!("{}: {}", path.display(), e)))
}

fn open_store(data: &Path, config: &MirrorConfig) -> Result<FileStore, MirrorError> {
    let store = FileStore::open(data.join(config.store_file()))?;
    tracing::debug!(path = %store.path().display(), "using store");
    Ok(store)
}

fn question_sheet(tables: &ScoringTables, assessment_type: AssessmentType) -> QuestionSheet {
    let all = questions::questions_for(assessment_type);
    let groups = questions::questions_by_category(&all)
        .into_iter()
        .map(|(category, members)| QuestionGroup {
            category,
            description: Category::from_name(category).map(Category::description),
            questions: members.into_iter().cloned().collect(),
        })
        .collect();
    QuestionSheet {
        assessment_type,
        groups,
        badges: tables.for_type(assessment_type).badges.thresholds(),
    }
}

fn delusional_report(
    user_id: &str,
    assessment_type: AssessmentType,
    score: delusional::DelusionalScoreResult,
) -> DelusionalReport {
    let category_feedback = score
        .category_gaps
        .iter()
        .map(|gap| CategoryFeedback {
            category: gap.category.clone(),
            gap: gap.gap,
            status: gap.status,
            feedback: delusional::feedback::category_feedback(gap),
        })
        .collect();
    DelusionalReport {
        user_id: user_id.to_string(),
        assessment_type,
        overall_feedback: delusional::feedback::overall_feedback(score.overall_score),
        category_feedback,
        score,
    }
}

fn category_suggestions(record: &CompatibilityRecord) -> Vec<CategorySuggestion> {
    record
        .category_scores
        .iter()
        .map(|category| CategorySuggestion {
            category: category.category.clone(),
            match_percentage: category.match_percentage,
            suggestion: compatibility::category_suggestion(
                &category.category,
                category.match_percentage,
            ),
        })
        .collect()
}

fn compatibility_report(response: compatibility::handler::ApiResponse) -> CompatibilityReport {
    let record = response
        .is_success()
        .then(|| {
            serde_json::from_value::<CompatibilityRecord>(
                response.body["compatibilityScore"].clone(),
            )
            .ok()
        })
        .flatten();

    CompatibilityReport {
        badge: record
            .as_ref()
            .map(|record| compatibility::compatibility_badge(record.overall_percentage)),
        category_suggestions: record.as_ref().map(category_suggestions).unwrap_or_default(),
        response,
    }
}

fn assessor_entry(assessor: ExternalAssessor) -> AssessorEntry {
    AssessorEntry {
        assessment_name: assessors::assessment_type_name(assessor.assessment_type),
        assessor,
    }
}

fn run_assessor(
    data: &Path,
    cfg: &MirrorConfig,
    action: cli::AssessorAction,
) -> Result<i32, MirrorError> {
    let mut store = open_store(data, cfg)?;
    let (rendered, format) = match action {
        cli::AssessorAction::Invite(cmd) => {
            let assessor = assessors::invite_assessor(
                &mut store,
                &cmd.user,
                assessors::NewAssessor {
                    email: cmd.email,
                    relationship: cmd.relationship,
                    assessment_type: cmd.assessment_type,
                },
                Utc::now(),
            )?;
            (Report::Assessor(assessor_entry(assessor)), cmd.format)
        }
        cli::AssessorAction::List(cmd) => {
            let listed = store
                .assessors(&cmd.user)?
                .into_iter()
                .map(assessor_entry)
                .collect();
            let list = AssessorList {
                user_id: cmd.user,
                assessors: listed,
            };
            (Report::Assessors(list), cmd.format)
        }
        cli::AssessorAction::Resend(cmd) => {
            let assessor =
                assessors::resend_assessor(&mut store, &cmd.user, &cmd.id, Utc::now())?;
            (Report::Assessor(assessor_entry(assessor)), cmd.format)
        }
        cli::AssessorAction::Remove(cmd) => {
            let assessor = assessors::remove_assessor(&mut store, &cmd.user, &cmd.id)?;
            (Report::Assessor(assessor_entry(assessor)), cmd.format)
        }
    };
    emit(&rendered, format)?;
    Ok(exit_code::SUCCESS)
}

fn run() -> Result<i32, MirrorError> {
    let cli = cli::Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    if !cli.data.exists() {
        return Err(MirrorError::PathNotFound(cli.data.display().to_string()));
    }
    let loaded = config::load_config(&cli.data)?;
    if loaded.is_none() {
        tracing::info!(data = %cli.data.display(), "no lovemirror.toml found, using defaults");
    }
    let cfg = loaded.unwrap_or_default();

    match cli.command {
        cli::Commands::Questions(cmd) => {
            let assessment_type = match cmd.gender {
                Some(gender) => {
                    let profile = Profile {
                        gender,
                        region: cmd.region,
                        cultural_context: cmd.cultural_context,
                    };
                    types::assessment::resolve_assessment_type(&profile, cmd.assessment_type)
                        .ok_or_else(|| {
                            MirrorError::UnsupportedProfile(format!("{:?}", profile.gender))
                        })?
                }
                None => cmd.assessment_type.ok_or_else(|| {
                    MirrorError::UnsupportedProfile("no type or gender given".to_string())
                })?,
            };
            emit(
                &Report::Questions(question_sheet(&cfg.scoring_tables(), assessment_type)),
                cmd.format,
            )?;
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Score(cmd) => {
            let responses = read_responses(&cmd.responses)?;
            questions::validate_responses(&responses)?;
            let result =
                scoring::calculate_scores(&cfg.scoring_tables(), &responses, cmd.assessment_type);
            let suggestions = scoring::suggestions::improvement_suggestions(&result.lowest_categories);
            emit(
                &Report::Score(ScoreReport {
                    result,
                    suggestions,
                }),
                cmd.format,
            )?;
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::BridalPrice(cmd) => {
            let responses = read_responses(&cmd.responses)?;
            questions::validate_responses(&responses)?;
            let result = scoring::calculate_scores(
                &cfg.scoring_tables(),
                &responses,
                AssessmentType::BridalPrice,
            );
            let options = bridal_price::ValuationOptions {
                base_value: cmd.base_value,
                region: cmd.region,
                partner_income: cmd.partner_income,
                bridal_price_percentage: cmd.percentage,
            };
            let valuation = cfg
                .bridal_price_valuator()
                .value(&result.category_scores, &options);
            emit(&Report::BridalPrice(valuation), cmd.format)?;
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Submit(cmd) => {
            let responses = read_responses(&cmd.responses)?;
            let mut store = open_store(&cli.data, &cfg)?;
            let submitted = submit::submit_assessment(
                &mut store,
                &cfg.scoring_tables(),
                &cmd.user,
                cmd.assessment_type,
                &responses,
                Utc::now(),
            )?;
            emit(&Report::Submitted(submitted), cmd.format)?;
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Assessor(cmd) => run_assessor(&cli.data, &cfg, cmd.action),
        cli::Commands::Assess(cmd) => {
            let responses = read_responses(&cmd.responses)?;
            let mut store = open_store(&cli.data, &cfg)?;
            let submitted = submit::submit_external_assessment(
                &mut store,
                &cfg.scoring_tables(),
                submit::ExternalSubmission {
                    assessor_code: cmd.code,
                    assessment_type: cmd.assessment_type,
                    responses,
                    feedback: cmd.feedback,
                },
                Utc::now(),
            )?;
            emit(&Report::External(submitted), cmd.format)?;
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Delusional(cmd) => {
            let mut store = open_store(&cli.data, &cfg)?;
            match delusional::calculate_delusional_score(
                &mut store,
                &cmd.user,
                cmd.assessment_type,
            )? {
                Some(score) => {
                    let rendered = delusional_report(&cmd.user, cmd.assessment_type, score);
                    emit(&Report::Delusional(rendered), cmd.format)?;
                    Ok(exit_code::SUCCESS)
                }
                None => {
                    eprintln!(
                        "warning: not enough data to score {} for {}",
                        cmd.assessment_type, cmd.user
                    );
                    Ok(exit_code::INSUFFICIENT_DATA)
                }
            }
        }
        cli::Commands::Summary(cmd) => {
            let store = open_store(&cli.data, &cfg)?;
            let results = store.external_results(&cmd.user, cmd.assessment_type)?;
            match delusional::summary::summarize(&results) {
                Some(summary) => {
                    emit(&Report::Summary(summary), cmd.format)?;
                    Ok(exit_code::SUCCESS)
                }
                None => {
                    eprintln!("warning: no external assessments for {}", cmd.user);
                    Ok(exit_code::INSUFFICIENT_DATA)
                }
            }
        }
        cli::Commands::Invite(cmd) => {
            let mut store = open_store(&cli.data, &cfg)?;
            let invitation = compatibility::invitation::create_invitation(
                &mut store,
                &cmd.user,
                cmd.email.as_deref(),
                Utc::now(),
            )?;
            emit(&Report::Invitation(invitation), cmd.format)?;
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Accept(cmd) => {
            let mut store = open_store(&cli.data, &cfg)?;
            let relationship = compatibility::invitation::accept_invitation(
                &mut store,
                &cmd.code,
                &cmd.user,
                Utc::now(),
            )?;
            emit(&Report::Relationship(relationship), cmd.format)?;
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Decline(cmd) => {
            let mut store = open_store(&cli.data, &cfg)?;
            let invitation =
                compatibility::invitation::decline_invitation(&mut store, &cmd.code, &cmd.user)?;
            emit(&Report::Invitation(invitation), cmd.format)?;
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::EndRelationship(cmd) => {
            let mut store = open_store(&cli.data, &cfg)?;
            let relationship = compatibility::relationship::end_relationship(
                &mut store,
                &cmd.relationship,
                &cmd.user,
            )?;
            emit(&Report::Relationship(relationship), cmd.format)?;
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::CompatibilityScore(cmd) => {
            let store = open_store(&cli.data, &cfg)?;
            match compatibility::relationship::latest_compatibility(
                &store,
                &cmd.relationship,
                &cmd.user,
            )? {
                Some(record) => {
                    let stored = StoredCompatibility {
                        badge: compatibility::compatibility_badge(record.overall_percentage),
                        category_suggestions: category_suggestions(&record),
                        record,
                    };
                    emit(&Report::StoredCompatibility(stored), cmd.format)?;
                    Ok(exit_code::SUCCESS)
                }
                None => {
                    eprintln!("warning: {}", compatibility::relationship::NO_SCORE_YET);
                    Ok(exit_code::INSUFFICIENT_DATA)
                }
            }
        }
        cli::Commands::Compatibility(cmd) => {
            let mut store = open_store(&cli.data, &cfg)?;
            let request = compatibility::handler::CompatibilityRequest {
                invitation_code: cmd.code,
                relationship_id: cmd.relationship,
            };
            let response = compatibility::handler::handle(
                &mut store,
                cmd.user.as_deref(),
                &request,
                cfg.recommendation_threshold(),
                Utc::now(),
            );
            let status = response.status;
            emit(
                &Report::Compatibility(compatibility_report(response)),
                cmd.format,
            )?;
            Ok(match status {
                200..=299 => exit_code::SUCCESS,
                400..=499 => exit_code::REJECTED,
                _ => exit_code::RUNTIME_FAILURE,
            })
        }
    }
}

fn failure_code(error: &MirrorError) -> i32 {
    match error {
        MirrorError::InvalidResponses(_)
        | MirrorError::UnsupportedProfile(_)
        | MirrorError::Invitation(_)
        | MirrorError::Relationship(_)
        | MirrorError::Assessor(_) => exit_code::REJECTED,
        _ => exit_code::RUNTIME_FAILURE,
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(failure_code(&e));
        }
    }
}
