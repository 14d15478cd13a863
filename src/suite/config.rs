use std::str::FromStr;

use super::errors::{ConfigError, Error};
use crate::generator::GateChoice;

/// One `key = value` line of a suite `config.txt`.
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// Reseed the generator.
    Seed(u64),
    /// Circuit family, 1 to 3.
    Family(u8),
    TestType(GateChoice),
    /// Security parameter, written to a fresh key file as given.
    Key(String),
    Width(usize),
    Gates(usize),
    GateFanin(f64),
    XorGates(usize),
    XorFanin(f64),
    Depth(usize),
    NumCircuits(usize),
    NumInputs(usize),
    /// Generate circuits with the settings seen so far when `true`.
    Generate(bool),
}

/// Parses every non-blank line. Each line is exactly `key = value`, three tokens separated by
/// single spaces.
pub fn parse_config(text: &str) -> Result<Vec<Directive>, Error> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            parse_line(line).map_err(|source| Error::Config {
                line: index + 1,
                source,
            })
        })
        .collect()
}

fn parse_line(line: &str) -> Result<Directive, ConfigError> {
    let parts = line.trim_end_matches('\r').split(' ').collect::<Vec<_>>();
    let [key, "=", value] = parts.as_slice() else {
        return Err(ConfigError::Shape(line.to_owned()));
    };

    let directive = match *key {
        "seed" => Directive::Seed(number(key, value)?),
        "fam" => Directive::Family(number(key, value)?),
        "test_type" => Directive::TestType(value.parse()?),
        "K" => Directive::Key((*value).to_owned()),
        "W" => Directive::Width(number(key, value)?),
        "G" => Directive::Gates(number(key, value)?),
        "fg" => Directive::GateFanin(number(key, value)?),
        "X" => Directive::XorGates(number(key, value)?),
        "fx" => Directive::XorFanin(number(key, value)?),
        "D" => Directive::Depth(number(key, value)?),
        "num_circuits" => Directive::NumCircuits(number(key, value)?),
        "num_inputs" => Directive::NumInputs(number(key, value)?),
        "generate" => Directive::Generate(match *value {
            "True" | "true" => true,
            "False" | "false" => false,
            other => return Err(ConfigError::BadBool(other.to_owned())),
        }),
        other => return Err(ConfigError::UnknownKey(other.to_owned())),
    };

    Ok(directive)
}

fn number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::BadNumber {
        key: key.to_owned(),
        value: value.to_owned(),
    })
}
