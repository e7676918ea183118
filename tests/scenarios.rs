//! End-to-end scenarios over the in-memory store: the battery / power /
//! transmitter network, built and edited through the `Tms` facade.

use jtms::{CommandOutcome, Iri, Tms};

const BATTERY: &str = "urn:kb#batteryOk";
const POWER: &str = "urn:kb#havePower";
const TRANSMIT: &str = "urn:kb#canTransmit";

fn iri(s: &str) -> Iri {
    Iri::parse(s).unwrap()
}

/// batteryOk is a premise on the IN-list of havePower, which justifies
/// canTransmit.
fn powered() -> Tms {
    let mut tms = Tms::in_memory().unwrap();
    assert!(tms.add_belief(TRANSMIT).unwrap().is_committed());
    assert!(tms.add_justification(POWER).unwrap().is_committed());
    assert!(tms.add_to_in_as_premise(BATTERY, POWER).unwrap().is_committed());
    assert!(tms.justifies(POWER, TRANSMIT).unwrap().is_committed());
    tms
}

#[test]
fn scenario_a_premise_supports_consequent() {
    let tms = powered();
    let r = tms.reasoner();

    assert!(r.state(&iri(BATTERY)));
    assert!(r.holds(&iri(POWER)));
    assert!(r.state(&iri(TRANSMIT)));
    assert!(r.materialized_state(&iri(TRANSMIT)));
    assert_eq!(r.justification_status(&iri(POWER)), "Justified");
    assert_eq!(
        r.belief_status(&iri(TRANSMIT)),
        "held. Justified by “havePower”, which holds"
    );
}

#[test]
fn scenario_b_contradiction_retracts_consequent() {
    let mut tms = powered();
    let outcome = tms.contradict(BATTERY).unwrap();
    assert!(outcome.is_committed());

    let r = tms.reasoner();
    assert!(!r.holds(&iri(POWER)));
    assert!(!r.materialized_state(&iri(TRANSMIT)));
    assert!(!r.state(&iri(TRANSMIT)));
    assert_eq!(
        r.justification_summary(&iri(TRANSMIT)),
        "not justified due to: havePower"
    );
}

#[test]
fn scenario_c_removing_justification_cascades() {
    let mut tms = powered();
    tms.remove_justification(POWER).unwrap();

    let power = jtms::Term::from(iri(POWER));
    assert!(tms.knowledge_base().graph().references(&power).is_empty());
    assert!(tms.reasoner().graph().references(&power).is_empty());

    let r = tms.reasoner();
    assert!(r.justifications_of(&iri(TRANSMIT)).is_empty());
    assert!(!r.state(&iri(TRANSMIT)));
    assert!(!r.materialized_state(&iri(TRANSMIT)));
    assert_eq!(r.belief_status(&iri(TRANSMIT)), "not held.");
}

#[test]
fn opposing_belief_blocks_until_retracted() {
    let mut tms = powered();
    let failure = "urn:kb#transmitterFault";
    tms.add_to_out(failure, POWER).unwrap();
    assert!(tms.reasoner().materialized_state(&iri(TRANSMIT)));

    tms.premise(failure).unwrap();
    assert!(!tms.reasoner().holds(&iri(POWER)));
    assert!(!tms.reasoner().materialized_state(&iri(TRANSMIT)));
    assert_eq!(
        tms.reasoner().justification_status(&iri(POWER)),
        "Not justified:\n • “transmitterFault” is currently held"
    );

    tms.remove_from_out(failure, POWER).unwrap();
    assert!(tms.reasoner().materialized_state(&iri(TRANSMIT)));
}

#[test]
fn alternative_justification_keeps_belief_in() {
    let mut tms = powered();
    tms.add_to_in("urn:kb#solarOk", "urn:kb#solarPower").unwrap();
    tms.premise("urn:kb#solarOk").unwrap();
    tms.justifies("urn:kb#solarPower", TRANSMIT).unwrap();

    tms.contradict(BATTERY).unwrap();
    assert!(!tms.reasoner().holds(&iri(POWER)));
    assert!(tms.reasoner().materialized_state(&iri(TRANSMIT)));
}

#[test]
fn lookup_resolves_node_kinds() {
    let tms = powered();
    let r = tms.reasoner();
    assert!(r.lookup(BATTERY).as_belief().is_some());
    assert!(r.lookup(POWER).as_justification().is_some());
    assert!(r.lookup("urn:kb#nothing").is_none());
    assert_eq!(r.support_list_edges(), vec![(iri(POWER), iri(BATTERY))]);
    assert_eq!(r.justification_edges(), vec![(iri(TRANSMIT), iri(POWER))]);
}

#[test]
fn ignored_commands_do_not_update() {
    let mut tms = powered();
    let before = tms.reasoner().graph().clone();
    assert_eq!(tms.add_belief("").unwrap(), CommandOutcome::Ignored);
    assert_eq!(tms.reasoner().graph(), &before);
}
