use std::collections::HashSet;

use crate::domain::slurm::slurm_node::SlurmNode;
use crate::domain::utils::command::{CommandRunner, ProcessRunner, command_line};
use crate::error::{Error, Result};

/// Lists the compute nodes known to Slurm through `sinfo`.
#[derive(Debug)]
pub struct SinfoNodeInventory {
    sinfo_path: String,
    runner: Box<dyn CommandRunner>,
}

impl SinfoNodeInventory {
    pub fn new(sinfo_path: impl Into<String>) -> Self {
        Self::with_runner(sinfo_path, Box::new(ProcessRunner))
    }

    pub fn with_runner(sinfo_path: impl Into<String>, runner: Box<dyn CommandRunner>) -> Self {
        SinfoNodeInventory { sinfo_path: sinfo_path.into(), runner }
    }

    pub fn list_nodes(&self) -> Result<Vec<SlurmNode>> {
        let args: Vec<String> = ["-N", "-h", "-o", "%N"].iter().map(|arg| arg.to_string()).collect();

        let output = self
            .runner
            .run(&self.sinfo_path, &args)
            .map_err(|e| Error::SlurmCommand { command: command_line(&self.sinfo_path, &args), message: e.to_string() })?;

        if !output.success {
            return Err(Error::SlurmCommand { command: command_line(&self.sinfo_path, &args), message: output.combined().trim().to_string() });
        }

        Ok(parse_nodes(&output.stdout))
    }
}

/// A node in several partitions is listed once per partition.
fn parse_nodes(output: &str) -> Vec<SlurmNode> {
    let mut seen = HashSet::new();

    output
        .lines()
        .map(str::trim)
        .filter(|nodename| !nodename.is_empty() && seen.insert(nodename.to_string()))
        .filter_map(|nodename| match SlurmNode::from_nodename(nodename) {
            Ok(node) => Some(node),
            Err(e) => {
                log::debug!("Skipping node {}: {}", nodename, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::utils::command::CommandOutput;

    #[derive(Debug)]
    struct StaticRunner(CommandOutput);

    impl CommandRunner for StaticRunner {
        fn run(&self, _program: &str, _args: &[String]) -> std::io::Result<CommandOutput> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_list_nodes() {
        let output = CommandOutput { success: true, stdout: "q1-st-cr1-1\nq1-st-cr1-1\nq1-dy-cr2-3\nhead-node\n".to_string(), stderr: String::new() };
        let inventory = SinfoNodeInventory::with_runner("sinfo", Box::new(StaticRunner(output)));

        let nodes = inventory.list_nodes().unwrap();

        assert_eq!(nodes, vec![SlurmNode::new("q1-st-cr1-1", "q1", "cr1"), SlurmNode::new("q1-dy-cr2-3", "q1", "cr2")]);
    }

    #[test]
    fn test_list_nodes_failure() {
        let output = CommandOutput { success: false, stdout: String::new(), stderr: "slurm_load_partitions: Unable to contact slurm controller".to_string() };
        let inventory = SinfoNodeInventory::with_runner("sinfo", Box::new(StaticRunner(output)));

        assert!(matches!(inventory.list_nodes(), Err(Error::SlurmCommand { .. })));
    }
}
