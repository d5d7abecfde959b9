//! State transition scenarios
//!
//! The first input whose name contains `state`, `status`, `mode` or `phase`
//! is the state variable. Every ordered pair of distinct states becomes one
//! transition, expected to be accepted; there is no transition table, so
//! "accepted" is an assumption rather than a derived fact.

use crate::model::{InputField, Validity, Value, ValueMap};

/// Out-of-vocabulary state used for the rejection test
pub const INVALID_STATE: &str = "INVALID_STATE";

const STATE_KEYWORDS: [&str; 4] = ["state", "status", "mode", "phase"];

/// One state test before ids and the remaining inputs are filled in
#[derive(Debug, Clone, PartialEq)]
pub struct StateCase {
    /// Value for the state field
    pub state: Value,
    pub expected: ValueMap,
    pub validity: Validity,
    pub scenario: String,
}

/// First input that looks like a state variable
pub fn find_state_field(inputs: &[InputField]) -> Option<&InputField> {
    inputs.iter().find(|inp| {
        let name = inp.name.to_lowercase();
        STATE_KEYWORDS.iter().any(|k| name.contains(k))
    })
}

/// Transition cases for a state field
///
/// `default_states` is used when the field has no allowed values.
pub fn state_cases(field: &InputField, default_states: &[String]) -> Vec<StateCase> {
    let states = field.allowed().unwrap_or(default_states);
    let mut cases = Vec::with_capacity(states.len() * states.len().saturating_sub(1) + 1);

    for from in states {
        for to in states {
            if from == to {
                continue;
            }
            let mut expected = ValueMap::new();
            expected.insert("next_state".into(), Value::String(to.clone()));
            cases.push(StateCase {
                state: Value::String(from.clone()),
                expected,
                validity: Validity::Valid,
                scenario: format!("Transition from {} to {}", from, to),
            });
        }
    }

    let mut rejected = ValueMap::new();
    rejected.insert("status".into(), Value::String("REJECTED".into()));
    cases.push(StateCase {
        state: Value::String(INVALID_STATE.into()),
        expected: rejected,
        validity: Validity::Invalid,
        scenario: "Invalid state input".into(),
    });

    cases
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;

    fn defaults() -> Vec<String> {
        ["INIT", "ACTIVE", "IDLE", "ERROR"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_find_state_field() {
        let inputs = vec![
            InputField::new("speed", FieldType::Integer),
            InputField::new("flight_Phase", FieldType::String),
            InputField::new("mode", FieldType::String),
        ];
        assert_eq!(find_state_field(&inputs).unwrap().name, "flight_Phase");
        assert!(find_state_field(&inputs[..1]).is_none());
    }

    #[test]
    fn test_two_states() {
        let field = InputField::new("mode", FieldType::Enumeration).with_values(["INIT", "ACTIVE"]);
        let cases = state_cases(&field, &defaults());
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0].scenario, "Transition from INIT to ACTIVE");
        assert_eq!(cases[1].scenario, "Transition from ACTIVE to INIT");
        assert_eq!(cases[1].expected["next_state"], Value::String("INIT".into()));
        assert_eq!(cases[2].validity, Validity::Invalid);
        assert_eq!(cases[2].state, Value::String(INVALID_STATE.into()));
    }

    #[test]
    fn test_default_vocabulary() {
        let field = InputField::new("status", FieldType::String);
        let cases = state_cases(&field, &defaults());
        // 4 * 3 transitions + 1 invalid
        assert_eq!(cases.len(), 13);
        assert_eq!(
            cases.iter().filter(|c| c.validity == Validity::Valid).count(),
            12
        );
    }
}
