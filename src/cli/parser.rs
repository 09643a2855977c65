use crate::export::ExportFormat;
use crate::models::scanner::ScannerKind;
use clap::{ArgGroup, Parser, Subcommand};

/// Command-line interface definition for rPickup
/// School pickup attendance: QR scans at the bus and the school gate
#[derive(Parser)]
#[command(
    name = "rpickup",
    version = env!("CARGO_PKG_VERSION"),
    about = "School pickup attendance: resolve QR scans into IN/OUT events and notify parents",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check integrity and IN/OUT alternation")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Manage student profiles
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },

    /// Resolve a single scan and record the IN/OUT event
    Scan {
        /// Checkpoint kind
        #[arg(long, value_enum, default_value = "school")]
        scanner: ScannerKind,

        /// Raw QR payload as read from the card
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        qr: Option<String>,

        /// Student ID typed by the operator
        #[arg(long)]
        id: Option<String>,

        /// Station name; scans sharing it share the duplicate window
        #[arg(long)]
        station: Option<String>,

        /// Override the cooldown window (seconds)
        #[arg(long)]
        cooldown: Option<u64>,
    },

    /// Run a scanning station reading one scan per line from stdin
    Station {
        #[arg(long, value_enum, default_value = "school")]
        scanner: ScannerKind,

        /// Treat each line as a typed student ID instead of a QR payload
        #[arg(long)]
        manual: bool,

        /// Override the cooldown window (seconds)
        #[arg(long)]
        cooldown: Option<u64>,
    },

    /// List attendance records
    List {
        #[arg(long, help = "Filter by student ID")]
        student: Option<String>,

        #[arg(long, help = "Filter by local date (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(long, value_enum, help = "Filter by checkpoint kind")]
        scanner: Option<ScannerKind>,

        #[arg(long, help = "Filter by direction (in/out)")]
        direction: Option<String>,

        #[arg(long = "summary", help = "One row per student and day")]
        summary: bool,
    },

    /// Parent notifications
    Notify {
        #[command(subcommand)]
        action: NotifyAction,
    },

    /// Leave applications
    Leave {
        #[command(subcommand)]
        action: LeaveAction,
    },

    /// School bus registry
    Bus {
        #[command(subcommand)]
        action: BusAction,
    },

    /// Bus departure schedules
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },

    /// Export attendance records
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Only this student ID")]
        student: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum StudentAction {
    /// Register a student and generate the card payload
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        class: String,
        #[arg(long = "parent-name")]
        parent_name: String,
        #[arg(long = "parent-contact")]
        parent_contact: String,
        #[arg(long = "parent-email")]
        parent_email: Option<String>,
        #[arg(long = "parent-address")]
        parent_address: String,
        #[arg(long)]
        photo: Option<String>,
        /// Name of a registered bus
        #[arg(long)]
        bus: Option<String>,
    },

    /// List students
    List {
        #[arg(long)]
        class: Option<String>,
    },

    /// Show one student and the QR payload of the card
    Show { id: String },

    /// Update fields of a student; the card payload is regenerated
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        class: Option<String>,
        #[arg(long = "parent-name")]
        parent_name: Option<String>,
        #[arg(long = "parent-contact")]
        parent_contact: Option<String>,
        #[arg(long = "parent-email")]
        parent_email: Option<String>,
        #[arg(long = "parent-address")]
        parent_address: Option<String>,
        #[arg(long)]
        photo: Option<String>,
        /// Bus name; an empty value unlinks the student
        #[arg(long)]
        bus: Option<String>,
    },

    /// Delete a student profile (attendance is kept)
    Del { id: String },
}

#[derive(Subcommand)]
pub enum NotifyAction {
    /// List notifications for a parent email, a student, or everyone
    #[command(group(ArgGroup::new("who").required(true).args(["parent", "student", "all"])))]
    List {
        #[arg(long = "parent")]
        parent: Option<String>,

        #[arg(long)]
        student: Option<String>,

        /// Every notification (admin view)
        #[arg(long)]
        all: bool,

        #[arg(long)]
        unread: bool,
    },

    /// Mark one notification, or all of a parent's, as read
    Read {
        #[arg(conflicts_with = "all", required_unless_present = "all")]
        id: Option<i64>,

        /// Parent email whose notifications are all marked read
        #[arg(long, value_name = "EMAIL")]
        all: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum LeaveAction {
    /// Submit a leave application
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        class: String,
        #[arg(long)]
        roll: String,
        #[arg(long)]
        reason: String,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },

    /// List applications
    List {
        #[arg(long)]
        pending: bool,
    },

    /// Approve a pending application
    Approve { id: i64 },

    /// Reject a pending application
    Reject { id: i64 },

    /// Latest application for a roll number
    Status { roll: String },
}

#[derive(Subcommand)]
pub enum BusAction {
    /// Register a bus and its driver
    Add {
        name: String,
        #[arg(long = "driver-name")]
        driver_name: String,
        #[arg(long = "driver-contact")]
        driver_contact: String,
    },

    /// List buses with the number of students riding each
    List,

    /// Update a bus
    Edit {
        name: String,
        /// New bus name
        #[arg(long = "name")]
        new_name: Option<String>,
        #[arg(long = "driver-name")]
        driver_name: Option<String>,
        #[arg(long = "driver-contact")]
        driver_contact: Option<String>,
    },

    /// Delete a bus and its schedules (riders are unlinked)
    Del { name: String },
}

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Add a departure for a bus
    Add {
        #[arg(long)]
        bus: String,
        /// Day (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Departure time (HH:MM)
        #[arg(long)]
        time: String,
        #[arg(long, default_value = "")]
        info: String,
    },

    /// List schedules
    List {
        #[arg(long)]
        bus: Option<String>,
        /// Day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Change time or info; parents of riders are notified
    Edit {
        id: i64,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        info: Option<String>,
    },
}
