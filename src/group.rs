// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Grouping of observations by register, and the global environment index.

use std::collections::{BTreeMap, BTreeSet};

use crate::observation::Observation;

/// All observations of one register, plus the register's canonical field order.
#[derive(Debug)]
pub struct RegisterGroup<'a> {
    pub name: &'a str,
    /// Taken from the first observation seen for this register.
    pub field_order: Vec<&'a str>,
    /// In order of first appearance in the source list.
    pub observations: Vec<&'a Observation>,
}

impl<'a> RegisterGroup<'a> {
    fn new(first: &'a Observation) -> Self {
        Self {
            name: first.register_name(),
            field_order: first.fields().names().collect(),
            observations: vec![first],
        }
    }

    /// Labels of the environments that reported this register, sorted and deduplicated.
    pub fn environments(&self) -> BTreeSet<&'a str> {
        self.observations.iter().map(|o| o.environment()).collect()
    }
}

/// Sorted set of every distinct environment label.
#[derive(Debug, Default)]
pub struct EnvironmentIndex<'a> {
    labels: Vec<&'a str>,
}

impl<'a> EnvironmentIndex<'a> {
    pub fn new(observations: &'a [Observation]) -> Self {
        let labels: BTreeSet<&str> = observations.iter().map(|o| o.environment()).collect();
        Self { labels: labels.into_iter().collect() }
    }

    pub fn labels(&self) -> &[&'a str] {
        &self.labels
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.binary_search_by(|l| (*l).cmp(label)).ok()
    }

    /// The subsequence of the index whose labels reported `group`, in index order.
    pub fn restrict(&self, group: &RegisterGroup<'_>) -> Vec<&'a str> {
        let present = group.environments();
        self.labels.iter().copied().filter(|l| present.contains(*l)).collect()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Partitions `observations` into groups keyed (and sorted) by register name.
pub fn group_observations(observations: &[Observation]) -> BTreeMap<&str, RegisterGroup<'_>> {
    observations.iter().fold(BTreeMap::<&str, RegisterGroup<'_>>::new(), |mut groups, obs| {
        groups
            .entry(obs.register_name())
            .and_modify(|g| g.observations.push(obs))
            .or_insert_with(|| RegisterGroup::new(obs));
        groups
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::Fields;

    fn obs(env: &str, reg: &str, fields: &[(&str, &str)]) -> Observation {
        Observation::new(env, reg, fields.iter().copied().collect::<Fields>())
    }

    #[test]
    fn test_every_observation_lands_in_its_group() {
        let list = [
            obs("e2", "TCR_EL1", &[("t0sz", "0")]),
            obs("e1", "MAIR_EL1", &[("value", "[]")]),
            obs("e1", "TCR_EL1", &[("t0sz", "16")]),
        ];
        let groups = group_observations(&list);

        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), ["MAIR_EL1", "TCR_EL1"]);
        let tcr = &groups["TCR_EL1"];
        assert_eq!(tcr.observations.len(), 2);
        assert_eq!(tcr.observations[0].environment(), "e2");
        assert_eq!(tcr.observations[1].environment(), "e1");
    }

    #[test]
    fn test_field_order_comes_from_first_observation() {
        let list = [
            obs("b", "R", &[("z", "1"), ("a", "2")]),
            obs("a", "R", &[("a", "3"), ("z", "4"), ("extra", "5")]),
        ];
        let groups = group_observations(&list);
        assert_eq!(groups["R"].field_order, ["z", "a"]);
    }

    #[test]
    fn test_environment_index_is_sorted_and_restricted() {
        let list = [
            obs("gamma", "R", &[]),
            obs("alpha", "S", &[]),
            obs("beta", "R", &[]),
            obs("alpha", "R", &[]),
        ];
        let index = EnvironmentIndex::new(&list);
        let groups = group_observations(&list);

        assert_eq!(index.labels(), ["alpha", "beta", "gamma"]);
        assert_eq!(index.position("beta"), Some(1));
        assert_eq!(index.position("delta"), None);
        assert_eq!(index.restrict(&groups["R"]), ["alpha", "beta", "gamma"]);
        assert_eq!(index.restrict(&groups["S"]), ["alpha"]);
    }
}
