//! Test case assembly
//!
//! For each rule and each of its selected techniques, generate candidate
//! values, fill the remaining inputs with nominal values, ask the oracle for
//! the expected output and stamp the record with the next id. Output order is
//! rule order, then technique order, then field order, then candidate order.

use crate::config::SynthesisConfig;
use crate::mcdc::{condition_combinations, condition_value};
use crate::model::{
    InputField, OutputField, Priority, Rule, StrategyMap, Technique, TestCase, Traceability,
    Validity, Value, ValueMap,
};
use crate::oracle::{self, Oracle};
use crate::state::{find_state_field, state_cases};
use crate::text::RuleText;
use crate::values::{bva_values, ep_values, negative_values, nominal_value, Candidate};

/// Per-request test case id counter
///
/// Starts at 1 and never hands out the same id twice. A fresh sequence is
/// created for every request.
#[derive(Debug, Clone)]
pub struct IdSequence {
    prefix: String,
    next: u64,
}

impl IdSequence {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

/// A test case before it gets an id and traceability
struct Draft {
    technique: Technique,
    scenario: String,
    inputs: ValueMap,
    expected: ValueMap,
    priority: Priority,
    validity: Validity,
}

/// Builds test cases for one requirement
pub struct TestCaseBuilder<'a> {
    requirement_id: &'a str,
    inputs: &'a [InputField],
    outputs: &'a [OutputField],
    config: &'a SynthesisConfig,
    oracle: Oracle,
    nominals: ValueMap,
}

impl<'a> TestCaseBuilder<'a> {
    pub fn new(
        requirement_id: &'a str,
        inputs: &'a [InputField],
        outputs: &'a [OutputField],
        config: &'a SynthesisConfig,
    ) -> Self {
        let nominals = inputs
            .iter()
            .map(|f| (f.name.clone(), nominal_value(f)))
            .collect();
        Self {
            requirement_id,
            inputs,
            outputs,
            config,
            oracle: Oracle::default(),
            nominals,
        }
    }

    /// Every test for one rule, for the given techniques in order
    pub fn build_rule(
        &self,
        rule: &Rule,
        techniques: &[Technique],
        ids: &mut IdSequence,
    ) -> Vec<TestCase> {
        let mut cases = Vec::new();
        for technique in techniques {
            let drafts = match technique {
                Technique::Bva => self.bva(rule),
                Technique::Ep => self.ep(rule),
                Technique::Mcdc => self.mcdc(rule),
                Technique::State => self.state(),
                Technique::Negative => self.negative(),
            };
            tracing::debug!(
                rule = %rule.rule_id,
                technique = technique.code(),
                count = drafts.len(),
                "generated tests"
            );
            cases.extend(drafts.into_iter().map(|d| self.finish(d, rule, ids)));
        }
        cases
    }

    fn finish(&self, draft: Draft, rule: &Rule, ids: &mut IdSequence) -> TestCase {
        TestCase {
            tc_id: ids.next_id(),
            rule_id: rule.rule_id.clone(),
            technique: draft.technique,
            scenario: draft.scenario,
            inputs: draft.inputs,
            expected_output: draft.expected,
            priority: draft.priority,
            validity: draft.validity,
            traceability: Traceability {
                requirement: self.requirement_id.to_string(),
                rule: rule.rule_id.clone(),
            },
        }
    }

    /// Full input mapping: overrides where given, nominal values elsewhere
    fn fill(&self, overrides: &ValueMap) -> ValueMap {
        self.nominals
            .iter()
            .map(|(name, nominal)| {
                let value = overrides.get(name).unwrap_or(nominal).clone();
                (name.clone(), value)
            })
            .collect()
    }

    fn fill_one(&self, name: &str, value: Value) -> ValueMap {
        let mut overrides = ValueMap::new();
        overrides.insert(name.to_string(), value);
        self.fill(&overrides)
    }

    /// Oracle result, with a fixed fallback if the oracle fails
    fn expect(&self, rule: &Rule, inputs: &ValueMap, valid: bool) -> ValueMap {
        match self
            .oracle
            .compute(rule, inputs, self.inputs, self.outputs, valid)
        {
            Ok(expected) => expected,
            Err(e) => {
                tracing::warn!(rule = %rule.rule_id, error = %e, "oracle failed, using fallback");
                oracle::status(if valid { oracle::ACCEPTED } else { oracle::REJECTED })
            }
        }
    }

    /// One draft per candidate of one field, with the oracle deciding the outcome
    fn candidate_drafts(
        &self,
        rule: &Rule,
        technique: Technique,
        priority: Priority,
        field: &InputField,
        candidates: Vec<Candidate>,
    ) -> Vec<Draft> {
        candidates
            .into_iter()
            .map(|c| {
                let scenario = format!(
                    "{}: {} = {} ({})",
                    technique.short(),
                    field.name,
                    c.value,
                    c.description
                );
                let inputs = self.fill_one(&field.name, c.value);
                let expected = self.expect(rule, &inputs, c.validity.is_valid());
                Draft {
                    technique,
                    scenario,
                    inputs,
                    expected,
                    priority,
                    validity: c.validity,
                }
            })
            .collect()
    }

    fn bva(&self, rule: &Rule) -> Vec<Draft> {
        self.inputs
            .iter()
            .filter(|f| f.data_type.is_numeric())
            .flat_map(|f| {
                self.candidate_drafts(rule, Technique::Bva, Priority::High, f, bva_values(f))
            })
            .collect()
    }

    fn ep(&self, rule: &Rule) -> Vec<Draft> {
        self.inputs
            .iter()
            .flat_map(|f| {
                self.candidate_drafts(rule, Technique::Ep, Priority::Medium, f, ep_values(f))
            })
            .collect()
    }

    /// Invalid by construction; the rule is never consulted
    fn negative(&self) -> Vec<Draft> {
        self.inputs
            .iter()
            .flat_map(|field| {
                negative_values(field).into_iter().map(move |c| Draft {
                    technique: Technique::Negative,
                    scenario: format!(
                        "{}: {} = {} ({})",
                        Technique::Negative.short(),
                        field.name,
                        c.value,
                        c.description
                    ),
                    inputs: self.fill_one(&field.name, c.value),
                    expected: oracle::status(oracle::REJECTED),
                    priority: Priority::High,
                    validity: Validity::Invalid,
                })
            })
            .collect()
    }

    fn mcdc(&self, rule: &Rule) -> Vec<Draft> {
        let text = RuleText::new(rule);
        let relevant = text.referenced_fields(self.inputs);

        condition_combinations(&relevant, self.config.full_table_limit)
            .into_iter()
            .map(|combo| {
                let overrides: ValueMap = relevant
                    .iter()
                    .map(|f| {
                        let holds = combo.assignment.get(&f.name).copied().unwrap_or(true);
                        (f.name.clone(), condition_value(f, holds, &text))
                    })
                    .collect();
                let inputs = self.fill(&overrides);
                let expected = self.expect(rule, &inputs, true);
                Draft {
                    technique: Technique::Mcdc,
                    scenario: format!("{}: {}", Technique::Mcdc.short(), combo.description),
                    inputs,
                    expected,
                    priority: if combo.all_true() {
                        Priority::High
                    } else {
                        Priority::Medium
                    },
                    validity: Validity::Valid,
                }
            })
            .collect()
    }

    /// Transitions for the detected state field; nothing when there is none
    fn state(&self) -> Vec<Draft> {
        let Some(field) = find_state_field(self.inputs) else {
            return Vec::new();
        };

        state_cases(field, &self.config.default_states)
            .into_iter()
            .map(|case| Draft {
                technique: Technique::State,
                scenario: case.scenario,
                inputs: self.fill_one(&field.name, case.state),
                expected: case.expected,
                priority: if case.validity.is_valid() {
                    Priority::Medium
                } else {
                    Priority::High
                },
                validity: case.validity,
            })
            .collect()
    }
}

/// Generate the ordered test case list for one requirement
///
/// Rules missing from `strategies` produce no tests. Ids restart at 1 on
/// every call.
pub fn synthesize(
    rules: &[Rule],
    inputs: &[InputField],
    outputs: &[OutputField],
    strategies: &StrategyMap,
    requirement_id: &str,
    config: &SynthesisConfig,
) -> Vec<TestCase> {
    let builder = TestCaseBuilder::new(requirement_id, inputs, outputs, config);
    let mut ids = IdSequence::new(config.prefix_for(requirement_id));

    let cases: Vec<TestCase> = rules
        .iter()
        .flat_map(|rule| {
            let techniques = strategies
                .get(&rule.rule_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            builder.build_rule(rule, techniques, &mut ids)
        })
        .collect();

    tracing::debug!(requirement = requirement_id, count = ids.issued(), "synthesized tests");
    cases
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;
    use pretty_assertions::assert_eq;

    fn strategies(rule_id: &str, techniques: &[Technique]) -> StrategyMap {
        let mut map = StrategyMap::new();
        map.insert(rule_id.to_string(), techniques.to_vec());
        map
    }

    #[test]
    fn test_id_sequence() {
        let mut ids = IdSequence::new("TC_R_");
        assert_eq!(ids.next_id(), "TC_R_1");
        assert_eq!(ids.next_id(), "TC_R_2");
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_bva_overspeed() {
        let rules = vec![Rule::new("R1", "speed > 200", "raise overspeed alarm")];
        let inputs = vec![InputField::new("speed", FieldType::Integer).with_range(0.0, 300.0)];
        let outputs = vec![OutputField::new("overspeed_alarm", FieldType::Boolean)];
        let cases = synthesize(
            &rules,
            &inputs,
            &outputs,
            &strategies("R1", &[Technique::Bva]),
            "REQ1",
            &SynthesisConfig::default(),
        );

        assert_eq!(cases.len(), 7);
        assert_eq!(cases[0].tc_id, "TC_REQ1_1");
        assert_eq!(cases[6].tc_id, "TC_REQ1_7");
        assert_eq!(cases[0].scenario, "BVA: speed = 0 (Minimum boundary)");
        assert_eq!(cases[0].expected_output["overspeed_alarm"], Value::Bool(false));
        // maximum boundary 300 exceeds the threshold
        assert_eq!(cases[4].expected_output["overspeed_alarm"], Value::Bool(true));
        assert_eq!(cases[5].expected_output, oracle::status(oracle::REJECTED));
        assert!(cases.iter().all(|c| c.priority == Priority::High));
    }

    #[test]
    fn test_oracle_failure_falls_back_to_status() {
        let rules = vec![Rule::new("R1", "always", "area is the product of width and depth")];
        let inputs = vec![
            InputField::new("width", FieldType::Float).with_range(0.0, 1e300),
            InputField::new("depth", FieldType::Float).with_range(0.0, 1e300),
        ];
        let outputs = vec![OutputField::new("area", FieldType::Float)];
        let cases = synthesize(
            &rules,
            &inputs,
            &outputs,
            &strategies("R1", &[Technique::Bva]),
            "REQ",
            &SynthesisConfig::default(),
        );

        // width = 0 keeps the product finite
        assert_eq!(cases[0].expected_output["area"], Value::Float(0.0));

        let max = cases
            .iter()
            .find(|c| c.scenario.contains("Maximum boundary") && c.inputs.contains_key("width"))
            .unwrap();
        assert_eq!(max.inputs["width"], Value::Float(1e300));
        assert_eq!(max.expected_output, oracle::status(oracle::ACCEPTED));

        let below = cases
            .iter()
            .find(|c| c.scenario.contains("Below minimum"))
            .unwrap();
        assert_eq!(below.expected_output, oracle::status(oracle::REJECTED));
    }

    #[test]
    fn test_huge_string_range_does_not_exhaust_memory() {
        let rules = vec![Rule::new("R1", "x", "y")];
        let inputs = vec![InputField::new("payload", FieldType::String).with_range(0.0, 1e12)];
        let cases = synthesize(
            &rules,
            &inputs,
            &[],
            &strategies("R1", &[Technique::Ep, Technique::Negative]),
            "REQ",
            &SynthesisConfig::default(),
        );
        assert_eq!(cases.len(), 5);
        for case in &cases {
            if let Value::String(s) = &case.inputs["payload"] {
                assert!(s.len() <= crate::values::MAX_STRING_LEN);
            }
        }
    }

    #[test]
    fn test_nominal_fill_for_other_fields() {
        let rules = vec![Rule::new("R1", "x", "y")];
        let inputs = vec![
            InputField::new("armed", FieldType::Boolean),
            InputField::new("altitude", FieldType::Integer),
            InputField::new("mode", FieldType::Enumeration).with_values(["AUTO", "MANUAL"]),
        ];
        let cases = synthesize(
            &rules,
            &inputs,
            &[],
            &strategies("R1", &[Technique::Negative]),
            "REQ",
            &SynthesisConfig::default(),
        );
        let first = &cases[0];
        assert_eq!(first.inputs["armed"], Value::Null);
        assert_eq!(first.inputs["altitude"], Value::Int(50000));
        assert_eq!(first.inputs["mode"], Value::String("AUTO".into()));
        let keys: Vec<_> = first.inputs.keys().cloned().collect();
        assert_eq!(keys, vec!["armed", "altitude", "mode"]);
    }

    #[test]
    fn test_mcdc_two_fields() {
        let rules = vec![Rule::new("R1", "weight and height", "accept")];
        let inputs = vec![
            InputField::new("weight", FieldType::Float),
            InputField::new("height", FieldType::Float),
        ];
        let cases = synthesize(
            &rules,
            &inputs,
            &[],
            &strategies("R1", &[Technique::Mcdc]),
            "REQ",
            &SynthesisConfig::default(),
        );
        assert_eq!(cases.len(), 4);
        assert_eq!(cases[0].priority, Priority::High);
        assert!(cases[1..].iter().all(|c| c.priority == Priority::Medium));
        assert_eq!(cases[3].inputs["weight"], Value::Float(0.0));
        assert_eq!(cases[0].inputs["weight"], Value::Float(50000.0));
        assert!(cases.iter().all(|c| c.validity == Validity::Valid));
    }

    #[test]
    fn test_state_tests() {
        let rules = vec![Rule::new("R1", "mode changes", "switch")];
        let inputs = vec![
            InputField::new("mode", FieldType::Enumeration).with_values(["INIT", "ACTIVE"]),
            InputField::new("speed", FieldType::Integer),
        ];
        let cases = synthesize(
            &rules,
            &inputs,
            &[],
            &strategies("R1", &[Technique::State]),
            "REQ",
            &SynthesisConfig::default(),
        );
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0].inputs["mode"], Value::String("INIT".into()));
        assert_eq!(cases[0].inputs["speed"], Value::Int(250));
        assert_eq!(cases[2].priority, Priority::High);
        assert_eq!(cases[2].expected_output, oracle::status(oracle::REJECTED));
    }

    #[test]
    fn test_state_without_state_field_is_empty() {
        let rules = vec![Rule::new("R1", "state changes", "x")];
        let inputs = vec![InputField::new("speed", FieldType::Integer)];
        let cases = synthesize(
            &rules,
            &inputs,
            &[],
            &strategies("R1", &[Technique::State]),
            "REQ",
            &SynthesisConfig::default(),
        );
        assert!(cases.is_empty());
    }

    #[test]
    fn test_ids_continue_across_rules_and_restart_per_call() {
        let rules = vec![Rule::new("R1", "a", "b"), Rule::new("R2", "a", "b")];
        let inputs = vec![InputField::new("flag", FieldType::Boolean)];
        let mut map = strategies("R1", &[Technique::Negative]);
        map.insert("R2".into(), vec![Technique::Negative]);
        let config = SynthesisConfig::default();

        let first = synthesize(&rules, &inputs, &[], &map, "Q", &config);
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].tc_id, "TC_Q_2");
        assert_eq!(first[1].rule_id, "R2");

        let second = synthesize(&rules, &inputs, &[], &map, "Q", &config);
        assert_eq!(first, second);
    }
}
