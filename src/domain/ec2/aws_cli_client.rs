use crate::api::ec2_dto::DescribeCapacityReservationsResponse;
use crate::domain::capacity_block::CapacityBlockState;
use crate::domain::ec2::capacity_reservation_provider::{CapacityReservationInfo, CapacityReservationProvider};
use crate::domain::utils::command::{CommandRunner, ProcessRunner, command_line};
use crate::domain::utils::id::CapacityBlockId;
use crate::error::{Error, Result};

/// Describes capacity reservations with `aws ec2 describe-capacity-reservations`.
///
/// Credentials are resolved by the AWS CLI itself (instance profile, env, ...).
#[derive(Debug)]
pub struct AwsCliEc2Client {
    aws_cli_path: String,
    region: String,
    runner: Box<dyn CommandRunner>,
}

impl AwsCliEc2Client {
    pub fn new(aws_cli_path: impl Into<String>, region: impl Into<String>) -> Self {
        Self::with_runner(aws_cli_path, region, Box::new(ProcessRunner))
    }

    pub fn with_runner(aws_cli_path: impl Into<String>, region: impl Into<String>, runner: Box<dyn CommandRunner>) -> Self {
        AwsCliEc2Client { aws_cli_path: aws_cli_path.into(), region: region.into(), runner }
    }

    fn args(&self, capacity_reservation_ids: &[CapacityBlockId]) -> Vec<String> {
        let mut args = vec![
            "ec2".to_string(),
            "describe-capacity-reservations".to_string(),
            "--region".to_string(),
            self.region.clone(),
            "--output".to_string(),
            "json".to_string(),
            "--capacity-reservation-ids".to_string(),
        ];
        args.extend(capacity_reservation_ids.iter().map(|id| id.to_string()));
        args
    }
}

const NOT_FOUND_ERROR_CODE: &str = "InvalidCapacityReservationId.NotFound";

impl CapacityReservationProvider for AwsCliEc2Client {
    /// Ids EC2 rejects as not found are dropped and the query is repeated with the rest,
    /// so a single deleted reservation does not hide the state of the others.
    fn describe_capacity_reservations(&self, capacity_reservation_ids: &[CapacityBlockId]) -> Result<Vec<CapacityReservationInfo>> {
        let mut remaining_ids = capacity_reservation_ids.to_vec();

        while !remaining_ids.is_empty() {
            let args = self.args(&remaining_ids);
            let command = command_line(&self.aws_cli_path, &args);

            let output = self.runner.run(&self.aws_cli_path, &args).map_err(|e| Error::CapacityReservationQuery(format!("{}: {}", command, e)))?;

            if output.success {
                let response: DescribeCapacityReservationsResponse = serde_json::from_str(&output.stdout)
                    .map_err(|e| Error::CapacityReservationQuery(format!("{}: unexpected response: {}", command, e)))?;

                return Ok(response
                    .capacity_reservations
                    .iter()
                    .map(|reservation| CapacityReservationInfo {
                        capacity_reservation_id: CapacityBlockId::new(reservation.capacity_reservation_id.clone()),
                        state: CapacityBlockState::from(reservation.state.as_str()),
                    })
                    .collect());
            }

            let stderr = output.stderr.trim();
            let not_found = not_found_ids(stderr, &remaining_ids);
            if not_found.is_empty() {
                return Err(Error::CapacityReservationQuery(format!("{}: {}", command, stderr)));
            }

            log::warn!("Capacity reservations {:?} are not known to EC2, querying the remaining ones", not_found);
            remaining_ids.retain(|id| !not_found.contains(id));
        }

        Ok(Vec::new())
    }
}

/// Requested ids named in an `InvalidCapacityReservationId.NotFound` error message.
fn not_found_ids(stderr: &str, requested_ids: &[CapacityBlockId]) -> Vec<CapacityBlockId> {
    if !stderr.contains(NOT_FOUND_ERROR_CODE) {
        return Vec::new();
    }

    let mentioned: Vec<&str> = stderr.split(|c: char| !(c.is_ascii_alphanumeric() || c == '-')).filter(|token| !token.is_empty()).collect();

    requested_ids.iter().filter(|id| mentioned.contains(&id.as_str())).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::utils::command::CommandOutput;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct ScriptedRunner {
        outputs: Arc<Mutex<VecDeque<CommandOutput>>>,
        calls: Arc<Mutex<Vec<Vec<String>>>>,
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, _program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
            self.calls.lock().unwrap().push(args.to_vec());
            let output = self.outputs.lock().unwrap().pop_front().expect("unexpected aws call");
            Ok(output)
        }
    }

    fn output(success: bool, stdout: &str, stderr: &str) -> CommandOutput {
        CommandOutput { success, stdout: stdout.to_string(), stderr: stderr.to_string() }
    }

    fn client(outputs: Vec<CommandOutput>) -> (AwsCliEc2Client, Arc<Mutex<Vec<Vec<String>>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let runner = ScriptedRunner { outputs: Arc::new(Mutex::new(outputs.into())), calls: calls.clone() };
        (AwsCliEc2Client::with_runner("aws", "us-east-2", Box::new(runner)), calls)
    }

    fn ids(ids: &[&str]) -> Vec<CapacityBlockId> {
        ids.iter().map(|id| CapacityBlockId::new(*id)).collect()
    }

    fn requested_ids(args: &[String]) -> Vec<String> {
        let position = args.iter().position(|arg| arg == "--capacity-reservation-ids").unwrap();
        args[position + 1..].to_vec()
    }

    #[test]
    fn test_describe_capacity_reservations() {
        let stdout = r#"{
            "CapacityReservations": [
                { "CapacityReservationId": "cr-1", "State": "pending", "InstanceType": "p5.48xlarge", "ReservationType": "capacity-block" },
                { "CapacityReservationId": "cr-2", "State": "active", "AvailabilityZone": "us-east-2a" }
            ]
        }"#;
        let (client, calls) = client(vec![output(true, stdout, "")]);

        let infos = client.describe_capacity_reservations(&ids(&["cr-1", "cr-2"])).unwrap();

        assert_eq!(
            infos,
            vec![
                CapacityReservationInfo { capacity_reservation_id: CapacityBlockId::new("cr-1"), state: CapacityBlockState::Pending },
                CapacityReservationInfo { capacity_reservation_id: CapacityBlockId::new("cr-2"), state: CapacityBlockState::Active },
            ]
        );

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(requested_ids(&calls[0]), vec!["cr-1", "cr-2"]);
        assert!(calls[0].contains(&"us-east-2".to_string()));
    }

    #[test]
    fn test_failed_query() {
        let (client, _) = client(vec![output(false, "", "An error occurred (UnauthorizedOperation) when calling the DescribeCapacityReservations operation")]);

        let result = client.describe_capacity_reservations(&ids(&["cr-1"]));

        assert!(matches!(result, Err(Error::CapacityReservationQuery(message)) if message.contains("UnauthorizedOperation")));
    }

    #[test]
    fn test_unparseable_response_is_query_error() {
        let (client, _) = client(vec![output(true, "<html>Service Unavailable</html>", "")]);

        let result = client.describe_capacity_reservations(&ids(&["cr-1"]));

        assert!(matches!(result, Err(Error::CapacityReservationQuery(message)) if message.contains("unexpected response")));
    }

    #[test]
    fn test_not_found_ids_are_dropped_and_query_repeated() {
        let not_found = "An error occurred (InvalidCapacityReservationId.NotFound) when calling the DescribeCapacityReservations operation: \
                         The capacity reservation ID 'cr-2' does not exist";
        let stdout = r#"{ "CapacityReservations": [
            { "CapacityReservationId": "cr-1", "State": "pending" },
            { "CapacityReservationId": "cr-3", "State": "active" }
        ] }"#;
        let (client, calls) = client(vec![output(false, "", not_found), output(true, stdout, "")]);

        let infos = client.describe_capacity_reservations(&ids(&["cr-1", "cr-2", "cr-3"])).unwrap();

        assert_eq!(
            infos,
            vec![
                CapacityReservationInfo { capacity_reservation_id: CapacityBlockId::new("cr-1"), state: CapacityBlockState::Pending },
                CapacityReservationInfo { capacity_reservation_id: CapacityBlockId::new("cr-3"), state: CapacityBlockState::Active },
            ]
        );

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(requested_ids(&calls[0]), vec!["cr-1", "cr-2", "cr-3"]);
        assert_eq!(requested_ids(&calls[1]), vec!["cr-1", "cr-3"]);
    }

    #[test]
    fn test_all_ids_not_found() {
        let not_found = "An error occurred (InvalidCapacityReservationId.NotFound): The capacity reservation IDs 'cr-1, cr-2' do not exist";
        let (client, calls) = client(vec![output(false, "", not_found)]);

        let infos = client.describe_capacity_reservations(&ids(&["cr-1", "cr-2"])).unwrap();

        assert!(infos.is_empty());
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_not_found_without_known_id_is_error() {
        let not_found = "An error occurred (InvalidCapacityReservationId.NotFound): The capacity reservation ID 'cr-9' does not exist";
        let (client, calls) = client(vec![output(false, "", not_found)]);

        let result = client.describe_capacity_reservations(&ids(&["cr-1"]));

        assert!(matches!(result, Err(Error::CapacityReservationQuery(message)) if message.contains("NotFound")));
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_not_found_ids_match_whole_tokens() {
        let stderr = "(InvalidCapacityReservationId.NotFound) The capacity reservation ID 'cr-10' does not exist";

        assert_eq!(not_found_ids(stderr, &ids(&["cr-1", "cr-10"])), ids(&["cr-10"]));
        assert!(not_found_ids("(UnauthorizedOperation) cr-1", &ids(&["cr-1"])).is_empty());
    }
}
