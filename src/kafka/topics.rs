//! Topic descriptions and cluster metadata snapshots.

use crate::config::KafkaConfig;
use std::collections::HashSet;

/// Desired shape of a single topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicSpec {
    pub name: String,
    pub partitions: i32,
    pub replication_factor: i32,
}

/// The ordered set of topics one run must bring into existence.
///
/// Built from configuration; names are trimmed and blank entries dropped, so
/// downstream code never sees a topic name with surrounding whitespace.
#[derive(Debug, Clone)]
pub struct TopicSet {
    specs: Vec<TopicSpec>,
}

impl TopicSet {
    pub fn new(specs: Vec<TopicSpec>) -> Self {
        Self { specs }
    }

    pub fn from_config(config: &KafkaConfig) -> Self {
        let specs = config
            .topic_names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(|name| TopicSpec {
                name: name.to_string(),
                partitions: config.num_partitions,
                replication_factor: config.replication_factor,
            })
            .collect();
        Self { specs }
    }

    pub fn specs(&self) -> &[TopicSpec] {
        &self.specs
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|spec| spec.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Topic names present in the cluster at one metadata fetch.
///
/// Membership checks are exact: no trimming, case-sensitive.
#[derive(Debug, Default, Clone)]
pub struct TopicSnapshot {
    names: HashSet<String>,
}

impl TopicSnapshot {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<String> for TopicSnapshot {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}
