mod cli;
mod output;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, CourseArgs, CourseCommand, EnrollmentCommand, ParticipantArgs, ParticipantCommand};
use output::Output;
use traincore::database::queries;
use traincore::utils::dates::today;
use traincore::{
    Console, ConsoleConfig, ConsoleError, Course, CourseDraft, Participant, ParticipantDraft,
    UploadNaming,
};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<ConsoleError>() {
                Some(err) if err.is_user_facing() => eprintln!("Error: {err}"),
                _ => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = ConsoleConfig::default()
        .with_database_path(&cli.db)
        .with_uploads_dir(&cli.uploads);
    let console = Console::open(&config)
        .with_context(|| format!("failed to open store at {}", cli.db.display()))?;
    let out = Output::new(cli.json);

    match cli.command.unwrap_or(Commands::Check) {
        Commands::Check => {
            let report = console.self_check()?;
            out.check(&report)?;
            return Ok(if report.passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
        Commands::Dashboard { today: day } => {
            out.dashboard(&console.dashboard(day.unwrap_or_else(today))?)?;
        }
        Commands::Catalog { duration_type } => {
            out.catalog(&console.catalog(duration_type)?)?;
        }
        Commands::Course(cmd) => handle_course(&console, &out, cmd)?,
        Commands::Participant(cmd) => handle_participant(&console, &out, cmd)?,
        Commands::Enroll { course_id, participant_id } => {
            let id = console.enroll(course_id, participant_id, today())?;
            out.message(&format!("Enrollment {id} created"), id)?;
        }
        Commands::Enrollment(cmd) => match cmd {
            EnrollmentCommand::Options { duration_type } => {
                let options = console.enrollment_options(duration_type)?;
                if !options.is_complete() {
                    eprintln!("Add at least one course of this type and one participant before enrolling");
                }
                out.enrollment_options(&options)?;
            }
            EnrollmentCommand::List { duration_type } => {
                out.enrollments(&console.list_enrollments(duration_type)?)?;
            }
            EnrollmentCommand::Delete { id } => {
                console.delete_enrollment(id)?;
                out.message(&format!("Enrollment {id} deleted"), id)?;
            }
            EnrollmentCommand::Orphans => {
                out.orphans(&console.orphaned_enrollments()?)?;
            }
        },
        Commands::Query { sql, params } => {
            let table = queries::query(
                console.store().connection()?,
                &sql,
                rusqlite::params_from_iter(params.iter()),
            )?;
            out.tabular(&table)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn handle_course(console: &Console, out: &Output, cmd: CourseCommand) -> anyhow::Result<()> {
    match cmd {
        CourseCommand::List { duration_type } => out.courses(&console.list_courses(duration_type)?)?,
        CourseCommand::Show { id } => out.course(&console.get_course(id)?)?,
        CourseCommand::Add(args) => {
            let draft = course_draft(console, None, args)?;
            let id = console.add_course(&draft)?;
            out.message(&format!("Course {id} added"), id)?;
        }
        CourseCommand::Update { id, fields } => {
            let current = console.get_course(id)?;
            let draft = course_draft(console, Some(current), fields)?;
            console.update_course(id, &draft)?;
            out.message(&format!("Course {id} updated"), id)?;
        }
        CourseCommand::Delete { id } => {
            console.delete_course(id)?;
            out.message(&format!("Course {id} deleted"), id)?;
        }
    }
    Ok(())
}

/// Merge command-line fields over an existing course (or nothing, for add)
fn course_draft(
    console: &Console,
    current: Option<Course>,
    args: CourseArgs,
) -> anyhow::Result<CourseDraft> {
    let missing = |what: &str| ConsoleError::Validation(format!("{what} is required"));

    let image_url = match &args.upload {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let naming = if args.unique_name { UploadNaming::Unique } else { UploadNaming::Original };
            Some(console.upload_course_image(&file_name, &bytes, naming)?)
        }
        None => args
            .image_url
            .or_else(|| current.as_ref().and_then(|c| c.image_url.clone())),
    };

    let start_date = args
        .start
        .or_else(|| current.as_ref().and_then(|c| c.start_date))
        .ok_or_else(|| missing("Start date"))?;
    let end_date = args
        .end
        .or_else(|| current.as_ref().and_then(|c| c.end_date))
        .ok_or_else(|| missing("End date"))?;

    Ok(CourseDraft {
        title: args
            .title
            .or_else(|| current.as_ref().map(|c| c.title.clone()))
            .unwrap_or_default(),
        description: args
            .description
            .or_else(|| current.as_ref().and_then(|c| c.description.clone())),
        duration_type: args
            .duration_type
            .or_else(|| current.as_ref().map(|c| c.duration_type))
            .unwrap_or_default(),
        start_date,
        end_date,
        image_url,
        ref_url: args
            .ref_url
            .or_else(|| current.as_ref().and_then(|c| c.ref_url.clone())),
    })
}

fn handle_participant(console: &Console, out: &Output, cmd: ParticipantCommand) -> anyhow::Result<()> {
    match cmd {
        ParticipantCommand::List => out.participants(&console.list_participants()?)?,
        ParticipantCommand::Show { id } => out.participant(&console.get_participant(id)?)?,
        ParticipantCommand::Add(args) => {
            let id = console.add_participant(&participant_draft(None, args))?;
            out.message(&format!("Participant {id} added"), id)?;
        }
        ParticipantCommand::Update { id, fields } => {
            let current = console.get_participant(id)?;
            console.update_participant(id, &participant_draft(Some(current), fields))?;
            out.message(&format!("Participant {id} updated"), id)?;
        }
        ParticipantCommand::Delete { id } => {
            console.delete_participant(id)?;
            out.message(&format!("Participant {id} deleted"), id)?;
        }
    }
    Ok(())
}

fn participant_draft(current: Option<Participant>, args: ParticipantArgs) -> ParticipantDraft {
    let current = current.as_ref();
    ParticipantDraft {
        name: args.name.or_else(|| current.map(|p| p.name.clone())).unwrap_or_default(),
        email: args.email.or_else(|| current.map(|p| p.email.clone())).unwrap_or_default(),
        phone: args.phone.or_else(|| current.and_then(|p| p.phone.clone())),
        dob: args.dob.or_else(|| {
            current
                .and_then(|p| p.dob)
                .map(|d| traincore::utils::dates::format_display_date(&d))
        }),
    }
}
