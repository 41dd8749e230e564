use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use traincore::utils::dates::parse_date_input;
use traincore::DurationType;

#[derive(Parser)]
#[command(name = "traincore")]
#[command(about = "Training department console: courses, participants, enrollments")]
#[command(version)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, env = "TRAINCORE_DB", default_value = traincore::DATABASE_FILENAME, global = true)]
    pub db: PathBuf,

    /// Directory for uploaded course images
    #[arg(long, env = "TRAINCORE_UPLOADS", default_value = traincore::UPLOADS_DIR, global = true)]
    pub uploads: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Without a command, run the schema self-check
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify tables and columns, print PASS or FAIL
    Check,

    /// Totals, courses per type and upcoming courses
    Dashboard {
        /// Reference date (defaults to today)
        #[arg(long, value_parser = parse_date_arg)]
        today: Option<NaiveDate>,
    },

    /// Courses of one type with their participants
    Catalog {
        #[arg(value_parser = parse_duration_arg)]
        duration_type: DurationType,
    },

    /// Course administration
    #[command(subcommand)]
    Course(CourseCommand),

    /// Participant administration
    #[command(subcommand)]
    Participant(ParticipantCommand),

    /// Enroll a participant in a course
    Enroll {
        course_id: i64,
        participant_id: i64,
    },

    /// Enrollment administration
    #[command(subcommand)]
    Enrollment(EnrollmentCommand),

    /// Run a read query with positional text parameters
    Query {
        sql: String,
        params: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum CourseCommand {
    /// List courses of one type
    List {
        #[arg(value_parser = parse_duration_arg)]
        duration_type: DurationType,
    },
    /// Show one course
    Show { id: i64 },
    /// Add a course
    Add(CourseArgs),
    /// Update a course; omitted fields keep their value
    Update {
        id: i64,
        #[command(flatten)]
        fields: CourseArgs,
    },
    /// Delete a course
    Delete { id: i64 },
}

#[derive(Args)]
pub struct CourseArgs {
    /// Course title
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Short-term, Long-term or Seminar
    #[arg(long = "type", value_parser = parse_duration_arg)]
    pub duration_type: Option<DurationType>,
    /// yyyy-mm-dd or dd/mm/yyyy
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,
    /// yyyy-mm-dd or dd/mm/yyyy
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,
    /// Image URL or path
    #[arg(long, conflicts_with = "upload")]
    pub image_url: Option<String>,
    /// Local image file to copy into the uploads directory
    #[arg(long)]
    pub upload: Option<PathBuf>,
    /// Store the upload under a generated name
    #[arg(long, requires = "upload")]
    pub unique_name: bool,
    /// Reference material link
    #[arg(long)]
    pub ref_url: Option<String>,
}

#[derive(Subcommand)]
pub enum ParticipantCommand {
    /// List all participants
    List,
    /// Show one participant
    Show { id: i64 },
    /// Add a participant
    Add(ParticipantArgs),
    /// Update a participant; omitted fields keep their value
    Update {
        id: i64,
        #[command(flatten)]
        fields: ParticipantArgs,
    },
    /// Delete a participant
    Delete { id: i64 },
}

#[derive(Args)]
pub struct ParticipantArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    /// Date of birth, dd/mm/yyyy
    #[arg(long)]
    pub dob: Option<String>,
}

#[derive(Subcommand)]
pub enum EnrollmentCommand {
    /// Courses of one type and all participants available for enrollment
    Options {
        #[arg(value_parser = parse_duration_arg)]
        duration_type: DurationType,
    },
    /// List enrollments in courses of one type
    List {
        #[arg(value_parser = parse_duration_arg)]
        duration_type: DurationType,
    },
    /// Delete an enrollment
    Delete { id: i64 },
    /// Enrollments whose course or participant was deleted
    Orphans,
}

fn parse_duration_arg(s: &str) -> Result<DurationType, String> {
    s.parse().map_err(|e: traincore::database::models::ParseDurationTypeError| e.to_string())
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date_input(s).ok_or_else(|| format!("invalid date '{s}', expected yyyy-mm-dd or dd/mm/yyyy"))
}
