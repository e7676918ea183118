//! Human-readable explanations of belief and justification state.

use crate::engine::Reasoner;
use crate::term::Iri;

fn quoted(iris: &[Iri]) -> String {
    iris.iter()
        .map(|i| format!("“{}”", i.local_name()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn verb(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}

impl Reasoner {
    /// `"held."` or `"not held."` from the stored flag, followed by the
    /// justifications of `belief` and whether it currently holds.
    #[must_use]
    pub fn belief_status(&self, belief: &Iri) -> String {
        let held = if self.materialized_state(belief) {
            "held."
        } else {
            "not held."
        };
        let justifications = self.justifications_of(belief);
        if justifications.is_empty() {
            return held.to_string();
        }
        format!(
            "{held} Justified by {}, which {}",
            quoted(&justifications),
            if self.state(belief) { "holds" } else { "does not hold" }
        )
    }

    /// `"Justified"`, or `"Not justified:"` with one bullet naming the IN-list
    /// beliefs that are not held and one naming the OUT-list beliefs that are.
    #[must_use]
    pub fn justification_status(&self, justification: &Iri) -> String {
        let ins: Vec<Iri> = self
            .in_list(justification)
            .into_iter()
            .filter(|b| !self.state(b))
            .collect();
        let outs: Vec<Iri> = self
            .out_list(justification)
            .into_iter()
            .filter(|b| self.state(b))
            .collect();

        match (ins.is_empty(), outs.is_empty()) {
            (true, true) => "Justified".to_string(),
            (false, false) => format!(
                "Not justified:\n • {} in IN-list {} not believed.\n • {} in OUT-list {} believed",
                verb(ins.len(), "is", "are"),
                quoted(&ins),
                verb(outs.len(), "is", "are"),
                quoted(&outs),
            ),
            (false, true) => format!(
                "Not justified:\n • {} {} currently not held",
                quoted(&ins),
                verb(ins.len(), "is", "are"),
            ),
            (true, false) => format!(
                "Not justified:\n • {} {} currently held",
                quoted(&outs),
                verb(outs.len(), "is", "are"),
            ),
        }
    }

    /// `"is justified"`, or `"not justified due to: "` followed by the
    /// justifications of `belief` that do not hold.
    #[must_use]
    pub fn justification_summary(&self, belief: &Iri) -> String {
        let failing: Vec<String> = self
            .justifications_of(belief)
            .iter()
            .filter(|j| !self.holds(j))
            .map(|j| j.local_name().to_string())
            .collect();
        if failing.is_empty() {
            "is justified".to_string()
        } else {
            format!("not justified due to: {}", failing.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::config::PropagationConfig;
    use crate::engine::Reasoner;
    use crate::graph::Graph;
    use crate::schema::JtmsSchema;
    use crate::storage::InMemoryTripleStore;
    use crate::term::{Iri, Triple};
    use crate::vocab;

    fn iri(s: &str) -> Iri {
        Iri::parse(s).unwrap()
    }

    fn edge(s: &str, p: &'static str, o: &str) -> Triple {
        Triple::new(iri(s), vocab::iri(p), iri(o))
    }

    fn typed(s: &str, class: &'static str) -> Triple {
        Triple::new(iri(s), vocab::iri(vocab::RDF_TYPE), vocab::iri(class))
    }

    fn updated(kb: Vec<Triple>) -> Reasoner {
        let mut r = Reasoner::open(
            Arc::new(InMemoryTripleStore::new()),
            Arc::new(JtmsSchema::default()),
            iri("urn:graph:reasoner"),
            PropagationConfig::default(),
        )
        .unwrap();
        let kb: Graph = kb.into();
        assert!(r.update(&kb).unwrap().is_committed());
        r
    }

    #[test]
    fn test_belief_status() {
        let r = updated(vec![
            typed("urn:kb#a", vocab::PREMISE),
            edge("urn:kb#j", vocab::HAS_SUPPORT, "urn:kb#a"),
            edge("urn:kb#j", vocab::JUSTIFIES, "urn:kb#b"),
            typed("urn:kb#lonely", vocab::BELIEF),
        ]);
        assert_eq!(
            r.belief_status(&iri("urn:kb#b")),
            "held. Justified by “j”, which holds"
        );
        assert_eq!(r.belief_status(&iri("urn:kb#lonely")), "not held.");
    }

    #[test]
    fn test_justification_status_texts() {
        let r = updated(vec![
            typed("urn:kb#p", vocab::PREMISE),
            typed("urn:kb#n", vocab::BELIEF),
            edge("urn:kb#ok", vocab::HAS_SUPPORT, "urn:kb#p"),
            edge("urn:kb#ok", vocab::JUSTIFIES, "urn:kb#x"),
            edge("urn:kb#inblock", vocab::HAS_SUPPORT, "urn:kb#n"),
            edge("urn:kb#inblock", vocab::JUSTIFIES, "urn:kb#y"),
            edge("urn:kb#outblock", vocab::HAS_OPPOSITION, "urn:kb#p"),
            edge("urn:kb#outblock", vocab::JUSTIFIES, "urn:kb#z"),
            edge("urn:kb#both", vocab::HAS_SUPPORT, "urn:kb#n"),
            edge("urn:kb#both", vocab::HAS_OPPOSITION, "urn:kb#p"),
            edge("urn:kb#both", vocab::JUSTIFIES, "urn:kb#w"),
        ]);
        assert_eq!(r.justification_status(&iri("urn:kb#ok")), "Justified");
        assert_eq!(
            r.justification_status(&iri("urn:kb#inblock")),
            "Not justified:\n • “n” is currently not held"
        );
        assert_eq!(
            r.justification_status(&iri("urn:kb#outblock")),
            "Not justified:\n • “p” is currently held"
        );
        assert_eq!(
            r.justification_status(&iri("urn:kb#both")),
            "Not justified:\n • is in IN-list “n” not believed.\n • is in OUT-list “p” believed"
        );
    }

    #[test]
    fn test_justification_summary() {
        let r = updated(vec![
            typed("urn:kb#n", vocab::BELIEF),
            edge("urn:kb#good", vocab::JUSTIFIES, "urn:kb#b"),
            edge("urn:kb#bad", vocab::HAS_SUPPORT, "urn:kb#n"),
            edge("urn:kb#bad", vocab::JUSTIFIES, "urn:kb#c"),
        ]);
        assert_eq!(r.justification_summary(&iri("urn:kb#b")), "is justified");
        assert_eq!(
            r.justification_summary(&iri("urn:kb#c")),
            "not justified due to: bad"
        );
    }
}
