//! Element Query Conditions
//!
//! Parses the inside of an embedded condition, e.g. the
//! `(min-available-width: 300px) and (max-available-width: 40em)` of
//! `div:media((min-available-width: 300px) and (max-available-width: 40em))`,
//! into a [`RuleSet`], and derives the marker class name for it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every synthesized marker class starts with this.
pub const CLASS_PREFIX: &str = "query";

// One clause: `property: <number><unit>`, optionally wrapped in parens.
// The unit is captured loosely so unknown units can be reported and dropped.
static QUERY_RULES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(?\s*([^\s:()]+)\s*:\s*(\d+(?:\.\d+)?)([A-Za-z]+)\s*\)?").unwrap()
});

/// Length units a clause may be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Px,
    Em,
    Rem,
    Vw,
    Vh,
    Vmin,
    Vmax,
    // Recognised, but not converted to pixels.
    Ch,
    Ex,
    Cm,
    Mm,
    Q,
    In,
    Pt,
    Pc,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Px => "px",
            Units::Em => "em",
            Units::Rem => "rem",
            Units::Vw => "vw",
            Units::Vh => "vh",
            Units::Vmin => "vmin",
            Units::Vmax => "vmax",
            Units::Ch => "ch",
            Units::Ex => "ex",
            Units::Cm => "cm",
            Units::Mm => "mm",
            Units::Q => "q",
            Units::In => "in",
            Units::Pt => "pt",
            Units::Pc => "pc",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown unit '{0}'")]
pub struct UnknownUnit(pub String);

impl FromStr for Units {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let units = match s.to_ascii_lowercase().as_str() {
            "px" => Units::Px,
            "em" => Units::Em,
            "rem" => Units::Rem,
            "vw" => Units::Vw,
            "vh" => Units::Vh,
            "vmin" => Units::Vmin,
            "vmax" => Units::Vmax,
            "ch" => Units::Ch,
            "ex" => Units::Ex,
            "cm" => Units::Cm,
            "mm" => Units::Mm,
            "q" => Units::Q,
            "in" => Units::In,
            "pt" => Units::Pt,
            "pc" => Units::Pc,
            _ => return Err(UnknownUnit(s.to_string())),
        };
        Ok(units)
    }
}

/// One atomic clause of an element query, e.g. `min-available-width: 300px`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub property: String,
    pub value: f64,
    pub units: Units,
}

impl Rule {
    pub fn new(property: impl Into<String>, value: f64, units: Units) -> Self {
        Rule {
            property: property.into(),
            value,
            units,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}{}", self.property, self.value, self.units)
    }
}

/// All clauses of one embedded condition. They are ANDed together.
pub type RuleSet = SmallVec<[Rule; 2]>;

/// Parse the text between the parentheses of `:media(...)`.
///
/// Clauses with a unit outside [`Units`] are dropped; the rest of the
/// condition is kept.
pub fn parse_condition(query: &str) -> RuleSet {
    let mut rules = RuleSet::new();
    for caps in QUERY_RULES_RE.captures_iter(query) {
        let property = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let number = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        let unit = caps.get(3).map(|m| m.as_str()).unwrap_or("");

        let value = match number.parse::<f64>() {
            Ok(value) => value,
            Err(_) => continue,
        };
        match unit.parse::<Units>() {
            Ok(units) => rules.push(Rule::new(property, value, units)),
            Err(err) => {
                let clause = caps.get(0).map(|m| m.as_str()).unwrap_or("");
                log::debug!(target: "element_query", "dropping clause '{}': {}", clause.trim(), err);
            }
        }
    }
    rules
}

/// Build the marker class that stands in for a condition:
/// `query_<property>_<value><units>` for each rule, in order.
pub fn class_name_for_rules(rules: &[Rule]) -> String {
    let mut name = String::from(CLASS_PREFIX);
    for rule in rules {
        name.push('_');
        name.push_str(&rule.property);
        name.push('_');
        name.push_str(&rule.value.to_string());
        name.push_str(rule.units.as_str());
    }
    name
}

/// Escape a class name so it can follow a `.` in a selector.
pub fn css_class_token(class_name: &str) -> String {
    let mut token = String::with_capacity(class_name.len());
    for ch in class_name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
            token.push(ch);
        } else {
            token.push('\\');
            token.push(ch);
        }
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_single_clause() {
        let rules = parse_condition("min-available-width: 300px");
        assert_eq!(
            rules.as_slice(),
            &[Rule::new("min-available-width", 300.0, Units::Px)]
        );
    }

    #[test]
    fn should_parse_juxtaposed_clauses() {
        let rules = parse_condition("(min-available-width: 10em) and (max-available-width: 40.5em)");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0], Rule::new("min-available-width", 10.0, Units::Em));
        assert_eq!(rules[1], Rule::new("max-available-width", 40.5, Units::Em));
    }

    #[test]
    fn should_drop_clause_with_unknown_unit() {
        let rules = parse_condition("(min-available-width: 10furlongs) (max-available-width: 2vw)");
        assert_eq!(
            rules.as_slice(),
            &[Rule::new("max-available-width", 2.0, Units::Vw)]
        );
    }

    #[test]
    fn should_accept_units_case_insensitively() {
        let rules = parse_condition("max-available-width: 3REM");
        assert_eq!(rules[0].units, Units::Rem);
    }

    #[test]
    fn should_name_class_from_rules_in_order() {
        let rules = parse_condition("(min-available-width: 300px) (max-available-width: 1.5em)");
        assert_eq!(
            class_name_for_rules(&rules),
            "query_min-available-width_300px_max-available-width_1.5em"
        );
    }

    #[test]
    fn should_name_empty_rule_set() {
        assert_eq!(class_name_for_rules(&[]), "query");
    }

    #[test]
    fn should_escape_dots_in_class_token() {
        assert_eq!(
            css_class_token("query_min-available-width_1.5em"),
            "query_min-available-width_1\\.5em"
        );
        assert_eq!(
            css_class_token("query_min-available-width_300px"),
            "query_min-available-width_300px"
        );
    }

    #[test]
    fn should_serialize_units_as_css_tokens() {
        let json = serde_json::to_string(&Rule::new("min-available-width", 2.0, Units::Vmin)).unwrap();
        assert_eq!(
            json,
            r#"{"property":"min-available-width","value":2.0,"units":"vmin"}"#
        );
    }
}
