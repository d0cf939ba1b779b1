use chrono::{DateTime, Local, TimeZone, Utc};

use crate::domain::slurm::hostlist::expand_hostlist;
use crate::domain::slurm::reservation_commands::{SlurmReservation, SlurmReservationCommands};
use crate::domain::utils::command::{CommandOutput, CommandRunner, ProcessRunner, command_line};
use crate::domain::utils::id::SlurmReservationName;
use crate::error::{Error, Result};

const NO_RESERVATIONS_MESSAGE: &str = "No reservations in the system";
const RESERVATION_NOT_FOUND_MESSAGE: &str = "not found";
const SCONTROL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// `scontrol` invocations issued by [`ScontrolReservationCommands`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScontrolCommand {
    Create { name: String, start_time: DateTime<Utc>, user: String, nodenames: String },
    Update { name: String, nodenames: String },
    Delete { name: String },
    Show { name: String },
    ShowAll,
}

impl ScontrolCommand {
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Create { name, start_time, user, nodenames } => vec![
                "create".to_string(),
                "reservation".to_string(),
                format!("ReservationName={}", name),
                format!("StartTime={}", format_start_time(start_time, &Local)),
                "Duration=infinite".to_string(),
                format!("Users={}", user),
                "Flags=maint".to_string(),
                format!("Nodes={}", nodenames),
            ],
            Self::Update { name, nodenames } => {
                vec!["update".to_string(), format!("ReservationName={}", name), format!("Nodes={}", nodenames)]
            }
            Self::Delete { name } => vec!["delete".to_string(), format!("ReservationName={}", name)],
            Self::Show { name } => vec!["show".to_string(), format!("ReservationName={}", name)],
            Self::ShowAll => vec!["show".to_string(), "reservations".to_string(), "--oneliner".to_string()],
        }
    }
}

/// Slurm reads `StartTime` without zone designator as the local time of the controller.
pub fn format_start_time<Tz: TimeZone>(start_time: &DateTime<Utc>, timezone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    start_time.with_timezone(timezone).format(SCONTROL_TIME_FORMAT).to_string()
}

/// Manages Slurm reservations through the `scontrol` CLI.
#[derive(Debug)]
pub struct ScontrolReservationCommands {
    scontrol_path: String,
    user: String,
    runner: Box<dyn CommandRunner>,
}

impl ScontrolReservationCommands {
    pub fn new(scontrol_path: impl Into<String>, user: impl Into<String>) -> Self {
        Self::with_runner(scontrol_path, user, Box::new(ProcessRunner))
    }

    pub fn with_runner(scontrol_path: impl Into<String>, user: impl Into<String>, runner: Box<dyn CommandRunner>) -> Self {
        ScontrolReservationCommands { scontrol_path: scontrol_path.into(), user: user.into(), runner }
    }

    fn execute(&self, command: &ScontrolCommand) -> Result<CommandOutput> {
        let args = command.args();
        let output = self.runner.run(&self.scontrol_path, &args).map_err(|e| Error::SlurmCommand {
            command: command_line(&self.scontrol_path, &args),
            message: e.to_string(),
        })?;
        Ok(output)
    }

    fn execute_checked(&self, command: &ScontrolCommand) -> Result<CommandOutput> {
        let output = self.execute(command)?;
        if !output.success {
            return Err(Error::SlurmCommand {
                command: command_line(&self.scontrol_path, &command.args()),
                message: output.combined().trim().to_string(),
            });
        }
        Ok(output)
    }
}

impl SlurmReservationCommands for ScontrolReservationCommands {
    fn exists(&self, name: &SlurmReservationName) -> Result<bool> {
        let command = ScontrolCommand::Show { name: name.to_string() };
        let output = self.execute(&command)?;

        if output.success {
            return Ok(true);
        }

        let message = output.combined();
        if message.contains(RESERVATION_NOT_FOUND_MESSAGE) {
            log::debug!("Slurm reservation {} not found.", name);
            return Ok(false);
        }

        Err(Error::SlurmCommand { command: command_line(&self.scontrol_path, &command.args()), message: message.trim().to_string() })
    }

    fn create(&self, name: &SlurmReservationName, start_time: DateTime<Utc>, nodenames: &[String]) -> Result<()> {
        self.execute_checked(&ScontrolCommand::Create {
            name: name.to_string(),
            start_time,
            user: self.user.clone(),
            nodenames: nodenames.join(","),
        })?;
        Ok(())
    }

    fn update(&self, name: &SlurmReservationName, nodenames: &[String]) -> Result<()> {
        self.execute_checked(&ScontrolCommand::Update { name: name.to_string(), nodenames: nodenames.join(",") })?;
        Ok(())
    }

    fn delete(&self, name: &SlurmReservationName) -> Result<()> {
        self.execute_checked(&ScontrolCommand::Delete { name: name.to_string() })?;
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<SlurmReservation>> {
        let output = self.execute_checked(&ScontrolCommand::ShowAll)?;
        Ok(parse_reservations(&output.stdout))
    }
}

/// Parses the output of `scontrol show reservations --oneliner`, one reservation per line.
pub fn parse_reservations(output: &str) -> Vec<SlurmReservation> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(NO_RESERVATIONS_MESSAGE))
        .filter_map(|line| {
            let mut name = None;
            let mut nodes = "";

            for token in line.split_whitespace() {
                if let Some(value) = token.strip_prefix("ReservationName=") {
                    name = Some(value);
                } else if let Some(value) = token.strip_prefix("Nodes=") {
                    nodes = value;
                }
            }

            if name.is_none() {
                log::warn!("Skipping unexpected scontrol output line: {}", line);
            }

            name.map(|name| SlurmReservation { name: SlurmReservationName::new(name), nodenames: expand_hostlist(nodes) })
        })
        .collect()
}
