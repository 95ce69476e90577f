use gadgethub_dashboard::WorksheetName;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid command: {details}")]
    InvalidCommand { details: String },
    #[error("Command execution failed: {details}")]
    ExecutionFailed { details: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Renders every tab, or only the given worksheet.
    Show { worksheet: Option<WorksheetName> },
    /// Renders every tab repeatedly until interrupted.
    Watch,
    ListWorksheets,
    HealthCheck,
}

impl Command {
    /// Parses `args` as received by `main`, program name first.
    pub fn parse(args: &[String]) -> Result<Command, CommandError> {
        match args.get(1).map(|s| s.as_str()) {
            None | Some("show") => {
                let rest = args.get(2..).unwrap_or_default();
                if rest.is_empty() {
                    return Ok(Command::Show { worksheet: None });
                }
                let name = rest.join(" ");
                let worksheet = name
                    .parse::<WorksheetName>()
                    .map_err(|e| CommandError::InvalidCommand {
                        details: e.to_string(),
                    })?;
                Ok(Command::Show {
                    worksheet: Some(worksheet),
                })
            }
            Some("watch") => Ok(Command::Watch),
            Some("list") => Ok(Command::ListWorksheets),
            Some("health") => Ok(Command::HealthCheck),
            Some(other) => Err(CommandError::InvalidCommand {
                details: format!(
                    "unknown command '{}', expected one of: show, watch, list, health",
                    other
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("gadgethub-dashboard")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_default_is_show_all() {
        assert_eq!(
            Command::parse(&args(&[])).unwrap(),
            Command::Show { worksheet: None }
        );
        assert_eq!(
            Command::parse(&args(&["show"])).unwrap(),
            Command::Show { worksheet: None }
        );
    }

    #[test]
    fn test_show_single_worksheet() {
        assert_eq!(
            Command::parse(&args(&["show", "Sales", "Reps"])).unwrap(),
            Command::Show {
                worksheet: Some(WorksheetName::SalesReps)
            }
        );
        assert_eq!(
            Command::parse(&args(&["show", "historical-sales"])).unwrap(),
            Command::Show {
                worksheet: Some(WorksheetName::SalesRecords)
            }
        );
    }

    #[test]
    fn test_show_unknown_worksheet() {
        assert!(matches!(
            Command::parse(&args(&["show", "Inventory"])),
            Err(CommandError::InvalidCommand { .. })
        ));
    }

    #[test]
    fn test_other_commands() {
        assert_eq!(Command::parse(&args(&["watch"])).unwrap(), Command::Watch);
        assert_eq!(
            Command::parse(&args(&["list"])).unwrap(),
            Command::ListWorksheets
        );
        assert_eq!(
            Command::parse(&args(&["health"])).unwrap(),
            Command::HealthCheck
        );
        assert!(Command::parse(&args(&["export"])).is_err());
    }
}
