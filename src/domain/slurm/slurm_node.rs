use crate::domain::utils::id::{ComputeResourceName, QueueName};
use crate::error::{Error, Result};

/// A compute node as seen by Slurm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlurmNode {
    pub name: String,
    pub queue_name: QueueName,
    pub compute_resource_name: ComputeResourceName,
}

impl SlurmNode {
    pub fn new(name: impl Into<String>, queue_name: impl Into<String>, compute_resource_name: impl Into<String>) -> Self {
        SlurmNode {
            name: name.into(),
            queue_name: QueueName::new(queue_name),
            compute_resource_name: ComputeResourceName::new(compute_resource_name),
        }
    }

    /// Builds a node from a name following `<queue>-<st|dy>-<compute resource>-<index>`.
    ///
    /// Queue and compute resource names may contain `-`, so the last `-st-` or `-dy-`
    /// separates them.
    ///
    /// # Errors
    /// `Error::InvalidNodeName` if the name does not follow the convention.
    pub fn from_nodename(nodename: &str) -> Result<SlurmNode> {
        let invalid = || Error::InvalidNodeName(nodename.to_string());

        let (prefix, index) = nodename.rsplit_once('-').ok_or_else(invalid)?;
        if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let separator = ["-st-", "-dy-"].iter().filter_map(|separator| prefix.rfind(separator)).max().ok_or_else(invalid)?;

        let queue_name = &prefix[..separator];
        let compute_resource_name = &prefix[separator + 4..];

        if !is_valid_name(queue_name) || !is_valid_name(compute_resource_name) {
            return Err(invalid());
        }

        Ok(SlurmNode::new(nodename, queue_name, compute_resource_name))
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_nodename() {
        let node = SlurmNode::from_nodename("queue1-st-compute-a-12").unwrap();
        assert_eq!(node.name, "queue1-st-compute-a-12");
        assert_eq!(node.queue_name.as_str(), "queue1");
        assert_eq!(node.compute_resource_name.as_str(), "compute-a");

        let node = SlurmNode::from_nodename("gpu-queue-dy-p5-1").unwrap();
        assert_eq!(node.queue_name.as_str(), "gpu-queue");
        assert_eq!(node.compute_resource_name.as_str(), "p5");
    }

    #[test]
    fn test_from_invalid_nodename() {
        for nodename in ["login-node", "queue1-st-cr1-", "queue1-xx-cr1-1", "-st-cr1-1", "queue1-st--1", "Queue-st-cr1-1"] {
            assert!(matches!(SlurmNode::from_nodename(nodename), Err(Error::InvalidNodeName(_))), "{} should be rejected", nodename);
        }
    }
}
