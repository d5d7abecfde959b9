//! Per-rule technique selection
//!
//! Lexical cues in the rule text plus field-type signals decide which
//! techniques apply. NEGATIVE is always selected, so no rule is left
//! uncovered.

use crate::interpret::BoundaryHints;
use crate::model::{InputField, Rule, StrategyMap, Technique};
use crate::text::RuleText;

const PARTITION_CUES: [&str; 4] = ["category", "type", "class", "partition"];
const COMPOUND_CUES: [&str; 6] = [" and ", " or ", "&&", "||", "both", "either"];
const STATE_CUES: [&str; 5] = ["state", "mode", "status", "phase", "transition"];

/// Techniques for every rule, keyed by rule id in rule order
pub fn select_strategies(
    rules: &[Rule],
    inputs: &[InputField],
    boundary_hints: &BoundaryHints,
) -> StrategyMap {
    rules
        .iter()
        .map(|rule| {
            let techniques = techniques_for(rule, inputs, !boundary_hints.is_empty());
            tracing::debug!(rule = %rule.rule_id, ?techniques, "selected techniques");
            (rule.rule_id.clone(), techniques)
        })
        .collect()
}

/// Techniques for one rule, deduplicated and in canonical order
pub fn techniques_for(rule: &Rule, inputs: &[InputField], has_hints: bool) -> Vec<Technique> {
    let text = RuleText::new(rule);
    let mut techniques = Vec::with_capacity(Technique::ALL.len());

    let has_numeric = inputs.iter().any(|f| f.data_type.is_numeric());
    let has_discrete = inputs.iter().any(|f| f.allowed_values.is_some());

    if has_numeric || has_hints {
        techniques.push(Technique::Bva);
    }
    if has_discrete || text.mentions_any(&PARTITION_CUES) || techniques.contains(&Technique::Bva) {
        techniques.push(Technique::Ep);
    }
    if text.mentions_any(&COMPOUND_CUES) {
        techniques.push(Technique::Mcdc);
    }
    if text.mentions_any(&STATE_CUES) {
        techniques.push(Technique::State);
    }
    techniques.push(Technique::Negative);

    techniques.sort();
    techniques.dedup();
    if techniques.is_empty() {
        techniques = vec![Technique::Ep, Technique::Negative];
    }
    techniques
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::BoundaryHint;
    use crate::model::FieldType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numeric_pairs_bva_and_ep() {
        let rule = Rule::new("R1", "speed > 200", "raise alarm");
        let inputs = vec![InputField::new("speed", FieldType::Integer)];
        assert_eq!(
            techniques_for(&rule, &inputs, false),
            vec![Technique::Bva, Technique::Ep, Technique::Negative]
        );
    }

    #[test]
    fn test_compound_and_state_cues() {
        let rule = Rule::new("R1", "weight and height are set", "switch mode");
        let inputs = vec![
            InputField::new("weight", FieldType::Boolean),
            InputField::new("height", FieldType::Boolean),
        ];
        assert_eq!(
            techniques_for(&rule, &inputs, false),
            vec![Technique::Mcdc, Technique::State, Technique::Negative]
        );
    }

    #[test]
    fn test_hints_enable_bva() {
        let rule = Rule::new("R1", "flag set", "ok");
        let inputs = vec![InputField::new("flag", FieldType::Boolean)];
        assert_eq!(
            techniques_for(&rule, &inputs, true),
            vec![Technique::Bva, Technique::Ep, Technique::Negative]
        );
    }

    #[test]
    fn test_partition_cue_and_discrete_field() {
        let rule = Rule::new("R1", "vehicle class is known", "ok");
        assert!(techniques_for(&rule, &[], false).contains(&Technique::Ep));

        let rule = Rule::new("R1", "always", "ok");
        let inputs = vec![InputField::new("c", FieldType::String).with_values(["A"])];
        assert_eq!(
            techniques_for(&rule, &inputs, false),
            vec![Technique::Ep, Technique::Negative]
        );
    }

    #[test]
    fn test_select_strategies_keeps_rule_order() {
        let rules = vec![
            Rule::new("R2", "x", "y"),
            Rule::new("R1", "either a or b", "y"),
        ];
        let mut hints = BoundaryHints::new();
        hints.insert("x".into(), BoundaryHint::default());
        let map = select_strategies(&rules, &[], &hints);
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["R2", "R1"]);
        assert!(map["R1"].contains(&Technique::Mcdc));
        assert!(map["R2"].contains(&Technique::Bva));
    }
}
