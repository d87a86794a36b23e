use anyhow::Context;
use clap::{Parser, Subcommand};
use clinic_core::{
    Clinic, ClinicConfig, ClinicResult, ClinicStore, FileDocumentConverter, JsonFileStore,
    config::local_year,
    constants::{CLOSE_HOUR, DEFAULT_CLINIC_DATA_DIR, OPEN_HOUR, ULTRASOUND_TYPES},
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "clinic")]
#[command(about = "Patient registry and appointment book for a small medical office")]
struct Cli {
    /// Directory holding clinic.json and stored documents
    #[arg(long, env = "CLINIC_DATA_DIR", default_value = DEFAULT_CLINIC_DATA_DIR)]
    data_dir: PathBuf,

    /// First bookable hour
    #[arg(long, env = "CLINIC_OPEN_HOUR", default_value_t = OPEN_HOUR)]
    open_hour: u32,

    /// Last bookable hour (inclusive)
    #[arg(long, env = "CLINIC_CLOSE_HOUR", default_value_t = CLOSE_HOUR)]
    close_hour: u32,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn config(&self) -> ClinicResult<ClinicConfig> {
        ClinicConfig::new(self.open_hour, self.close_hour, ULTRASOUND_TYPES, local_year())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List registered patients
    List,
    /// Register a patient
    Register {
        /// National ID
        id: String,
        /// Full name
        name: String,
        /// Sex
        sex: String,
        /// Birth date (D/M/Y)
        birth_date: String,
        /// Phone number
        phone: String,
    },
    /// Remove a patient, cancelling their appointment
    Remove { id: String },
    /// Book an appointment in the current year
    Schedule {
        id: String,
        /// Month name in Spanish (enero, febrero, ...)
        month: String,
        day: u32,
        /// Hour within opening hours
        hour: u32,
        /// Ultrasound type, for ultrasound appointments
        #[arg(long)]
        ultrasound: Option<String>,
    },
    /// Confirm a patient's appointment
    Confirm { id: String },
    /// Cancel a patient's appointment
    Cancel { id: String },
    /// Attend a patient's appointment, attaching an uploaded document
    Attend { id: String, file: PathBuf },
    /// Show the schedule for a day
    ScheduleDay { month: String, day: u32 },
    /// Show which hours are free on a day
    Availability { month: String, day: u32 },
    /// List unconfirmed appointments on a day
    Unconfirmed { month: String, day: u32 },
    /// Show a patient's history
    History { id: String },
}

impl Commands {
    fn mutates(&self) -> bool {
        matches!(
            self,
            Commands::Register { .. }
                | Commands::Remove { .. }
                | Commands::Schedule { .. }
                | Commands::Confirm { .. }
                | Commands::Cancel { .. }
                | Commands::Attend { .. }
        )
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinic_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = cli.config()?;
    let Some(command) = cli.command else {
        println!("Use 'clinic --help' for commands");
        return Ok(());
    };

    let store = JsonFileStore::new(&cli.data_dir)
        .with_context(|| format!("opening data directory {}", cli.data_dir.display()))?;
    let converter = FileDocumentConverter::new(store.data_dir())?;
    let state = store.load()?.unwrap_or_default();
    let mut clinic = Clinic::from_state(cfg, Box::new(converter), state)
        .with_context(|| format!("loading {}", store.state_path().display()))?;

    run(&mut clinic, &command)?;

    if command.mutates() {
        store.save(&clinic.snapshot())?;
    }
    Ok(())
}

fn run(clinic: &mut Clinic, command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::List => {
            if clinic.patient_count() == 0 {
                println!("No patients found.");
            }
            for patient in clinic.patients() {
                println!("{patient} Age: {}", patient.age());
            }
        }
        Commands::Register {
            id,
            name,
            sex,
            birth_date,
            phone,
        } => {
            let patient = clinic.register_patient(id, name, sex, birth_date, phone)?;
            println!("Registered {patient}");
        }
        Commands::Remove { id } => {
            let patient = clinic.remove_patient(id)?;
            println!("Removed {patient}");
        }
        Commands::Schedule {
            id,
            month,
            day,
            hour,
            ultrasound,
        } => {
            let key = clinic.schedule_appointment(id, month, *day, *hour, ultrasound.as_deref())?;
            println!("Booked {} at {} for {id}", key.date, key.slot);
        }
        Commands::Confirm { id } => {
            clinic.confirm_appointment(id)?;
            println!("Confirmed appointment for {id}");
        }
        Commands::Cancel { id } => {
            let appointment = clinic.cancel_appointment(id)?;
            println!("Cancelled {appointment}");
        }
        Commands::Attend { id, file } => {
            clinic.attend_appointment(id, file)?;
            println!("Attended appointment for {id}");
        }
        Commands::ScheduleDay { month, day } => {
            let schedule = clinic.daily_schedule(month, *day)?;
            for (hour, entry) in clinic.config().hours().zip(schedule) {
                match entry {
                    Some(entry) => println!("{hour:02}:00  {} | {}", entry.patient, entry.appointment),
                    None => println!("{hour:02}:00  -"),
                }
            }
        }
        Commands::Availability { month, day } => {
            let free = clinic.daily_availability(month, *day)?;
            let open = free.iter().filter(|f| **f).count();
            for (hour, free) in clinic.config().hours().zip(free) {
                println!("{hour:02}:00  {}", if free { "free" } else { "booked" });
            }
            println!("{open} of {} hours free", clinic.config().slots_per_day());
        }
        Commands::Unconfirmed { month, day } => {
            let pending = clinic.unconfirmed_appointments(month, *day)?;
            if pending.is_empty() {
                println!("No unconfirmed appointments.");
            }
            for appointment in pending {
                println!("{} ({appointment})", appointment.patient_id());
            }
        }
        Commands::History { id } => {
            for entry in clinic.patient_history(id)? {
                println!("{entry}\n");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clinic_core::NoDocumentConverter;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn schedule_parses_optional_ultrasound() {
        let cli = Cli::try_parse_from([
            "clinic", "schedule", "123", "enero", "10", "10", "--ultrasound", "fetal",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Schedule { ultrasound, hour, .. }) => {
                assert_eq!(ultrasound.as_deref(), Some("fetal"));
                assert_eq!(hour, 10);
            }
            _ => panic!("expected schedule command"),
        }
    }

    #[test]
    fn hour_flags_build_validated_config() {
        let cli = Cli::try_parse_from(["clinic", "--open-hour", "8", "--close-hour", "12", "list"])
            .unwrap();
        let cfg = cli.config().unwrap();
        assert_eq!(cfg.hours(), 8..=12);
        assert_eq!(cfg.slots_per_day(), 5);

        let cli = Cli::try_parse_from(["clinic", "--open-hour", "17", "list"]).unwrap();
        assert!(cli.config().is_err());
    }

    #[test]
    fn run_reports_domain_errors() {
        let mut clinic = Clinic::new(ClinicConfig::standard(2026), Box::new(NoDocumentConverter));
        let register = Commands::Register {
            id: "123".into(),
            name: "Ana".into(),
            sex: "F".into(),
            birth_date: "15/6/1990".into(),
            phone: "1".into(),
        };
        assert!(register.mutates());
        run(&mut clinic, &register).unwrap();
        assert!(run(&mut clinic, &register).is_err());
        assert!(run(&mut clinic, &Commands::Confirm { id: "123".into() }).is_err());
        assert!(!Commands::List.mutates());
    }
}
