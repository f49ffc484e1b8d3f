use crewfit_core::ConfigNode;
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::{debug, warn};

/// An object that persists itself as one named node of the config tree.
pub trait TreeCodec {
    /// Name of the child node this object owns inside the host tree.
    const NODE_NAME: &'static str;

    /// Write every known field, in a stable order.
    fn encode(&self) -> ConfigNode;

    /// Apply the fields present in `fragment`.
    ///
    /// Missing keys leave the current value untouched. Unknown keys are
    /// reported as diagnostics when `strict` is set and ignored otherwise.
    /// Decoding never fails.
    fn decode(&mut self, fragment: &ConfigNode, strict: bool) -> DecodeReport;
}

/// Outcome of decoding one fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    pub node: String,
    /// The fragment was absent from the parent tree
    pub missing: bool,
    /// Keys whose values were applied
    pub applied: Vec<String>,
    /// Keys that were present but could not be parsed
    pub invalid: Vec<String>,
    /// Unrecognised keys and child nodes, only collected in strict mode
    pub unknown_keys: Vec<String>,
}

impl DecodeReport {
    pub fn missing(node: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            missing: true,
            ..Default::default()
        }
    }

    /// No invalid values and no unknown keys.
    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty() && self.unknown_keys.is_empty()
    }

    /// Fold a nested report into this one, prefixing its keys.
    pub fn absorb(&mut self, prefix: &str, nested: DecodeReport) {
        let qualify = |k: String| format!("{}.{}", prefix, k);
        self.applied.extend(nested.applied.into_iter().map(qualify));
        self.invalid.extend(nested.invalid.into_iter().map(qualify));
        self.unknown_keys
            .extend(nested.unknown_keys.into_iter().map(qualify));
    }
}

/// Field-by-field reader over one fragment.
///
/// Every key read (or explicitly acknowledged) is remembered so that
/// [`FieldReader::finish`] can report leftovers as unknown.
pub struct FieldReader<'a> {
    node: &'a ConfigNode,
    known: BTreeSet<&'a str>,
    report: DecodeReport,
}

impl<'a> FieldReader<'a> {
    pub fn new(node: &'a ConfigNode) -> Self {
        Self {
            node,
            known: BTreeSet::new(),
            report: DecodeReport {
                node: node.name().to_string(),
                ..Default::default()
            },
        }
    }

    /// Assign `target` from `key` if present and parseable.
    pub fn read<T: FromStr>(&mut self, key: &'a str, target: &mut T) {
        self.known.insert(key);
        match self.node.parse_value::<T>(key) {
            Some(Ok(value)) => {
                *target = value;
                self.report.applied.push(key.to_string());
            }
            Some(Err(e)) => {
                warn!(node = %self.node.name(), key = %key, error = %e, "Keeping previous value");
                self.report.invalid.push(key.to_string());
            }
            None => {}
        }
    }

    /// Like [`FieldReader::read`] for floats that must be finite.
    ///
    /// `NaN` and infinities parse as `f32` but are reported invalid, keeping
    /// the previous value.
    pub fn read_finite(&mut self, key: &'a str, target: &mut f32) {
        let applied = self.report.applied.len();
        let mut value = *target;
        self.read(key, &mut value);
        if self.report.applied.len() == applied {
            return;
        }
        if value.is_finite() {
            *target = value;
            return;
        }

        warn!(node = %self.node.name(), key = %key, value = %value, "Keeping previous value");
        self.report.applied.pop();
        self.report.invalid.push(key.to_string());
    }

    /// Like [`FieldReader::read`] but accepts `True`/`FALSE` style spellings.
    pub fn read_flag(&mut self, key: &'a str, target: &mut bool) {
        self.known.insert(key);
        let Some(raw) = self.node.get_value(key) else {
            return;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" => *target = true,
            "false" => *target = false,
            _ => {
                warn!(node = %self.node.name(), key = %key, value = %raw, "Keeping previous flag");
                self.report.invalid.push(key.to_string());
                return;
            }
        }
        self.report.applied.push(key.to_string());
    }

    /// Mark child nodes named `name` as understood by the caller.
    pub fn children(&mut self, name: &'a str) -> impl Iterator<Item = &'a ConfigNode> {
        self.known.insert(name);
        self.node.nodes_named(name)
    }

    pub fn report_mut(&mut self) -> &mut DecodeReport {
        &mut self.report
    }

    /// Close the reader, collecting unknown keys when `strict`.
    pub fn finish(self, strict: bool) -> DecodeReport {
        let mut report = self.report;
        let unknown: Vec<String> = self
            .node
            .values()
            .map(|(k, _)| k)
            .chain(self.node.nodes().map(|n| n.name()))
            .filter(|k| !self.known.contains(k))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        for key in &unknown {
            if strict {
                warn!(node = %report.node, key = %key, "Unknown key in persisted state");
            } else {
                debug!(node = %report.node, key = %key, "Ignoring unknown key");
            }
        }
        if strict {
            report.unknown_keys = unknown;
        }
        report
    }
}

/// Install `value`'s fragment as the only child of its name under `parent`.
///
/// Sibling nodes owned by other modules are left untouched.
pub fn save_fragment<T: TreeCodec>(parent: &mut ConfigNode, value: &T) {
    let fragment = value.encode();
    debug!(node = %T::NODE_NAME, "Saving fragment");
    parent.set_node(fragment);
}

/// Decode `value` from its child node under `parent`.
///
/// An absent node is not an error: `value` keeps its defaults.
pub fn load_fragment<T: TreeCodec>(parent: &ConfigNode, value: &mut T, strict: bool) -> DecodeReport {
    match parent.get_node(T::NODE_NAME) {
        Some(fragment) => {
            let report = value.decode(fragment, strict);
            debug!(
                node = %T::NODE_NAME,
                applied = report.applied.len(),
                invalid = report.invalid.len(),
                unknown = report.unknown_keys.len(),
                "Loaded fragment"
            );
            report
        }
        None => {
            debug!(node = %T::NODE_NAME, "Fragment absent, keeping defaults");
            DecodeReport::missing(T::NODE_NAME)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        count: u32,
        label: String,
        on: bool,
    }

    impl TreeCodec for Sample {
        const NODE_NAME: &'static str = "SAMPLE";

        fn encode(&self) -> ConfigNode {
            let mut node = ConfigNode::new(Self::NODE_NAME);
            node.set_value("count", self.count);
            node.set_value("label", &self.label);
            node.set_value("on", self.on);
            node
        }

        fn decode(&mut self, fragment: &ConfigNode, strict: bool) -> DecodeReport {
            let mut reader = FieldReader::new(fragment);
            reader.read("count", &mut self.count);
            reader.read("label", &mut self.label);
            reader.read_flag("on", &mut self.on);
            reader.finish(strict)
        }
    }

    #[test]
    fn test_missing_fragment_keeps_defaults() {
        let root = ConfigNode::new("GAME");
        let mut sample = Sample::default();
        let report = load_fragment(&root, &mut sample, true);

        assert!(report.missing);
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn test_partial_fragment_fills_present_fields() {
        let mut fragment = ConfigNode::new("SAMPLE");
        fragment.set_value("label", "hello");
        fragment.set_value("on", "True");

        let mut sample = Sample {
            count: 7,
            ..Default::default()
        };
        let report = sample.decode(&fragment, true);

        assert_eq!(sample.count, 7);
        assert_eq!(sample.label, "hello");
        assert!(sample.on);
        assert_eq!(report.applied, vec!["label", "on"]);
        assert!(report.is_clean());
    }

    #[test]
    fn test_invalid_value_keeps_previous() {
        let mut fragment = ConfigNode::new("SAMPLE");
        fragment.set_value("count", "lots");

        let mut sample = Sample {
            count: 3,
            ..Default::default()
        };
        let report = sample.decode(&fragment, false);

        assert_eq!(sample.count, 3);
        assert_eq!(report.invalid, vec!["count"]);
    }

    #[test]
    fn test_read_finite_rejects_nan_and_infinity() {
        let mut fragment = ConfigNode::new("SAMPLE");
        fragment.set_value("low", "NaN");
        fragment.set_value("high", "inf");
        fragment.set_value("huge", "1e39");
        fragment.set_value("ok", "2.5");

        let (mut low, mut high, mut huge, mut ok) = (1.0f32, 2.0f32, 3.0f32, 0.0f32);
        let mut reader = FieldReader::new(&fragment);
        reader.read_finite("low", &mut low);
        reader.read_finite("high", &mut high);
        reader.read_finite("huge", &mut huge);
        reader.read_finite("ok", &mut ok);
        let report = reader.finish(true);

        assert_eq!((low, high, huge, ok), (1.0, 2.0, 3.0, 2.5));
        assert_eq!(report.invalid, vec!["low", "high", "huge"]);
        assert_eq!(report.applied, vec!["ok"]);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_unknown_keys_only_reported_when_strict() {
        let mut fragment = ConfigNode::new("SAMPLE");
        fragment.set_value("legacy", "1");
        fragment.add_node(ConfigNode::new("OLD_CHILD"));

        let mut sample = Sample::default();
        let lenient = sample.decode(&fragment, false);
        assert!(lenient.unknown_keys.is_empty());

        let strict = sample.decode(&fragment, true);
        assert_eq!(strict.unknown_keys, vec!["OLD_CHILD", "legacy"]);
    }

    #[test]
    fn test_save_fragment_replaces_only_own_node() {
        let mut root = ConfigNode::new("GAME");
        root.add_node(ConfigNode::new("OTHER")).set_value("keep", "me");
        let mut stale = ConfigNode::new("SAMPLE");
        stale.set_value("stale", "yes");
        root.add_node(stale);

        let sample = Sample {
            count: 1,
            label: "x".to_string(),
            on: true,
        };
        save_fragment(&mut root, &sample);

        assert_eq!(root.get_node("OTHER").unwrap().get_value("keep"), Some("me"));
        let saved = root.get_node("SAMPLE").unwrap();
        assert!(!saved.has_value("stale"));
        assert_eq!(saved.get_value("count"), Some("1"));

        let mut back = Sample::default();
        load_fragment(&root, &mut back, true);
        assert_eq!(back, sample);
    }
}
