//! CLI argument parsing and subcommand dispatch.
use clap::{Parser, Subcommand};
use log::*;
use std::io::Write;

use crate::{
    BugToolError, Result,
    config::Config,
    report,
    workflow::{
        WorkflowContext, contributors, migrate, milestone, release,
        search::{self, SearchParams},
    },
};

/// Global CLI arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, global = true)]
    /// Path to the configuration file. Defaults to charm-bug-tool.toml when
    /// present in the working directory.
    pub config: Option<String>,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    #[arg(long, default_value_t = false, global = true)]
    /// Log every change instead of writing it to the tracker.
    pub dry_run: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Bug housekeeping subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Mark Fix Committed bugs in a milestone as Fix Released.
    Release {
        #[arg(long)]
        milestone: Option<String>,
    },

    /// List the assignees of bugs released in a milestone.
    Contributors {
        #[arg(long)]
        milestone: Option<String>,
    },

    /// Tabulate bugs across the project group.
    Search {
        #[arg(long)]
        milestone: Option<String>,

        #[arg(long)]
        /// Bug task status, e.g. "Fix Committed".
        status: Option<String>,

        #[arg(long)]
        /// Accepted for compatibility. Has no effect.
        target: Option<String>,

        #[arg(long)]
        /// Also render the results to this HTML file.
        html: Option<String>,
    },

    /// Move open bugs from one milestone to another.
    MilestoneBump {
        #[arg(long)]
        milestone: Option<String>,

        #[arg(long)]
        target_milestone: Option<String>,
    },

    /// Remove open bugs from a milestone.
    MilestoneClear {
        #[arg(long)]
        milestone: Option<String>,
    },

    /// Assign closed bugs without a milestone to a milestone.
    MilestoneAssign {
        #[arg(long)]
        milestone: Option<String>,
    },

    /// Create a milestone on every project in the group.
    MilestoneCreate {
        #[arg(long)]
        milestone: Option<String>,

        #[arg(long)]
        /// Target date in YYYY-MM-DD format.
        target_date: Option<String>,
    },

    /// Move a charm's bugs from the legacy distribution into its project.
    MigrateCharm {
        #[arg(long)]
        charm: Option<String>,
    },
}

/// Run `command` and print its results to `out`.
pub async fn execute(
    command: Command,
    ctx: &WorkflowContext,
    config: &Config,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Release { milestone } => {
            let released = release::execute(ctx, milestone).await?;
            writeln!(out, "released {released} bug tasks")?;
        }
        Command::Contributors { milestone } => {
            for name in contributors::execute(ctx, milestone).await? {
                writeln!(out, "{name}")?;
            }
        }
        Command::Search {
            milestone,
            status,
            target,
            html,
        } => {
            let rows = search::execute(
                ctx,
                SearchParams {
                    milestone,
                    status,
                    target,
                },
            )
            .await?;

            writeln!(out, "{}", report::table::render(&rows))?;

            if let Some(path) = html {
                report::html::write(
                    &rows,
                    config.report.template_dir.as_deref(),
                    &path,
                )
                .await?;
                info!("wrote {} bugs to {path}", rows.len());
            }
        }
        Command::MilestoneBump {
            milestone,
            target_milestone,
        } => {
            let moved =
                milestone::bump(ctx, milestone, target_milestone).await?;
            writeln!(out, "moved {moved} bug tasks")?;
        }
        Command::MilestoneClear { milestone } => {
            let cleared = milestone::clear(ctx, milestone).await?;
            writeln!(out, "cleared {cleared} bug tasks")?;
        }
        Command::MilestoneAssign { milestone } => {
            let summary = milestone::assign(ctx, milestone).await?;
            writeln!(
                out,
                "assigned {} bug tasks, skipped {}",
                summary.assigned,
                summary.skipped.len()
            )?;
        }
        Command::MilestoneCreate {
            milestone,
            target_date,
        } => {
            let outcomes =
                milestone::create(ctx, milestone, target_date).await?;
            for outcome in outcomes.iter() {
                match outcome {
                    milestone::CreateOutcome::Created { project } => {
                        writeln!(out, "{project}: created")?
                    }
                    milestone::CreateOutcome::Existing { project } => {
                        writeln!(out, "{project}: updated")?
                    }
                    milestone::CreateOutcome::NoSeries { project } => {
                        writeln!(out, "{project}: skipped, no series")?
                    }
                }
            }
        }
        Command::MigrateCharm { charm } => {
            let Some(report) = migrate::execute(ctx, charm).await? else {
                return Ok(());
            };

            if report.created_project {
                writeln!(out, "created project {}", report.project)?;
            }
            writeln!(
                out,
                "migrated {} bug tasks to {}",
                report.migrated(),
                report.project
            )?;

            let failed = report.failed();
            for outcome in failed.iter() {
                if let migrate::MigrationOutcome::Failed { bug_id, reason } =
                    outcome
                {
                    writeln!(out, "failed bug #{bug_id}: {reason}")?;
                }
            }

            if !failed.is_empty() {
                return Err(BugToolError::tracker(format!(
                    "{} bug tasks failed to migrate to {}",
                    failed.len(),
                    report.project
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_helpers::*,
        tracker::types::{BugTaskStatus, SourcePackage},
    };

    #[test]
    fn parses_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "charm-bug-tool",
            "release",
            "--milestone",
            "24.04",
            "--dry-run",
            "--debug",
            "--config",
            "custom.toml",
        ])
        .unwrap();

        assert!(args.dry_run);
        assert!(args.debug);
        assert_eq!(args.config.as_deref(), Some("custom.toml"));
        assert_eq!(
            args.command,
            Command::Release {
                milestone: Some("24.04".into())
            }
        );
    }

    #[test]
    fn required_options_are_optional_at_parse_time() {
        let args =
            Args::try_parse_from(["charm-bug-tool", "milestone-bump"]).unwrap();

        assert_eq!(
            args.command,
            Command::MilestoneBump {
                milestone: None,
                target_milestone: None,
            }
        );
    }

    #[test]
    fn parses_search_options() {
        let args = Args::try_parse_from([
            "charm-bug-tool",
            "search",
            "--status",
            "Fix Committed",
            "--target",
            "charm-nova",
            "--html",
            "out/bugs.html",
        ])
        .unwrap();

        assert_eq!(
            args.command,
            Command::Search {
                milestone: None,
                status: Some("Fix Committed".into()),
                target: Some("charm-nova".into()),
                html: Some("out/bugs.html".into()),
            }
        );
    }

    #[test]
    fn requires_a_subcommand() {
        assert!(Args::try_parse_from(["charm-bug-tool"]).is_err());
        assert!(Args::try_parse_from(["charm-bug-tool", "bogus"]).is_err());
    }

    #[tokio::test]
    async fn prints_contributors_one_per_line() {
        let mut mock_tracker = mock_tracker();
        expect_group_milestone(&mut mock_tracker, "24.04");
        mock_tracker.expect_search_tasks().returning(|_, _| {
            let mut task =
                test_task(1, "charm-nova", BugTaskStatus::FixReleased);
            task.assignee_link = Some(link("~alice"));
            let mut other =
                test_task(2, "charm-nova", BugTaskStatus::FixReleased);
            other.assignee_link = Some(link("~bob"));
            Ok(vec![task, other])
        });
        mock_tracker.expect_get_person_by_link().returning(|person_link| {
            let name = person_link.trim_start_matches(&link("~")).to_string();
            Ok(test_person(&name, &name.to_uppercase()))
        });

        let ctx = create_test_context(mock_tracker);
        let mut out = vec![];
        execute(
            Command::Contributors {
                milestone: Some("24.04".into()),
            },
            &ctx,
            &Config::default(),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "ALICE\nBOB\n");
    }

    #[tokio::test]
    async fn search_writes_table_and_html() {
        let mut mock_tracker = mock_tracker();
        mock_tracker.expect_search_tasks().returning(|_, _| {
            Ok(vec![test_task(1, "charm-nova", BugTaskStatus::New)])
        });

        let dir = tempfile::tempdir().unwrap();
        let html = dir.path().join("reports/bugs.html");

        let ctx = create_test_context(mock_tracker);
        let mut out = vec![];
        execute(
            Command::Search {
                milestone: None,
                status: None,
                target: None,
                html: Some(html.to_string_lossy().to_string()),
            },
            &ctx,
            &Config::default(),
            &mut out,
        )
        .await
        .unwrap();

        let table = String::from_utf8(out).unwrap();
        assert!(table.starts_with("Charm"));
        assert!(table.ends_with("/+bug/1\n"));
        assert!(table.contains("charm-nova"));
        assert!(table.contains("Unassigned"));

        let rendered = std::fs::read_to_string(html).unwrap();
        assert!(rendered.contains("1 bug"));
        assert!(rendered.contains("<td>charm-nova</td>"));
    }

    #[tokio::test]
    async fn failed_migration_is_an_error_after_summary() {
        let mut mock_tracker = mock_tracker();
        mock_tracker.expect_get_source_package().returning(|_, _| {
            Ok(Some(SourcePackage {
                name: "nova".into(),
                display_name: "nova".into(),
                self_link: link("charms/+source/nova"),
            }))
        });
        mock_tracker
            .expect_get_project()
            .returning(|name| Ok(Some(test_project(name))));
        mock_tracker.expect_search_tasks().returning(|_, _| {
            Ok(vec![test_task(5, "charms", BugTaskStatus::New)])
        });
        mock_tracker.expect_get_bug_tasks().returning(|_| Ok(vec![]));
        mock_tracker
            .expect_add_bug_task()
            .returning(|_, _| Err(BugToolError::tracker("boom")));
        mock_tracker.expect_update_bug_task().never();

        let ctx = create_test_context(mock_tracker);
        let mut out = vec![];
        let result = execute(
            Command::MigrateCharm {
                charm: Some("nova".into()),
            },
            &ctx,
            &Config::default(),
            &mut out,
        )
        .await;

        assert!(matches!(result, Err(BugToolError::Tracker(_))));
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("migrated 0 bug tasks to charm-nova"));
        assert!(printed.contains("failed bug #5"));
    }
}
