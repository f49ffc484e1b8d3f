use crewfit_core::{ConfigNode, CrewRecord, SessionState};
use tracing::warn;

use super::codec::{DecodeReport, FieldReader, TreeCodec};

pub const SESSION_STATE_NODE: &str = "SESSION_STATE";
pub const CREW_NODE: &str = "CREW";

impl TreeCodec for SessionState {
    const NODE_NAME: &'static str = SESSION_STATE_NODE;

    fn encode(&self) -> ConfigNode {
        let mut node = ConfigNode::new(SESSION_STATE_NODE);
        node.set_value("enabled", self.enabled);
        node.set_value("wimp_mode", self.wimp_mode);
        node.set_value("initial_fitness", self.initial_fitness);
        node.set_value("min_fitness", self.min_fitness);
        node.set_value("max_fitness", self.max_fitness);
        node.set_value("gee_tolerance", self.gee_tolerance);

        for crew in &self.roster {
            let child = node.add_node(ConfigNode::new(CREW_NODE));
            child.set_value("name", &crew.name);
            child.set_value("fitness", crew.fitness);
            child.set_value("active", crew.active);
        }
        node
    }

    fn decode(&mut self, fragment: &ConfigNode, strict: bool) -> DecodeReport {
        let mut reader = FieldReader::new(fragment);
        reader.read_flag("enabled", &mut self.enabled);
        reader.read_flag("wimp_mode", &mut self.wimp_mode);
        reader.read_finite("initial_fitness", &mut self.initial_fitness);
        reader.read_finite("min_fitness", &mut self.min_fitness);
        reader.read_finite("max_fitness", &mut self.max_fitness);
        reader.read_finite("gee_tolerance", &mut self.gee_tolerance);

        let crew_nodes: Vec<&ConfigNode> = reader.children(CREW_NODE).collect();
        let mut nested = Vec::with_capacity(crew_nodes.len());
        for crew_node in crew_nodes {
            nested.push(decode_crew(self, crew_node, strict));
        }
        for report in nested {
            reader.report_mut().absorb(CREW_NODE, report);
        }

        reader.finish(strict)
    }
}

/// Merge one persisted crew entry into the roster.
///
/// Entries without a name cannot be keyed and are skipped. Fields absent from
/// the entry keep the existing record's value, or the starting fitness for a
/// newly seen crew member.
fn decode_crew(state: &mut SessionState, node: &ConfigNode, strict: bool) -> DecodeReport {
    let Some(name) = node.get_value("name").map(str::trim).filter(|n| !n.is_empty()) else {
        warn!("Skipping crew entry without a name");
        return DecodeReport {
            node: CREW_NODE.to_string(),
            invalid: vec!["name".to_string()],
            ..Default::default()
        };
    };

    let mut record = state
        .crew(name)
        .cloned()
        .unwrap_or_else(|| CrewRecord::new(name, state.initial_fitness));

    let mut reader = FieldReader::new(node);
    let mut ignored_name = String::new();
    reader.read("name", &mut ignored_name);
    reader.read_finite("fitness", &mut record.fitness);
    reader.read_flag("active", &mut record.active);
    let report = reader.finish(strict);

    state.upsert_crew(record);
    report
}
