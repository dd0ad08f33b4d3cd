//! The render module substitutes named values into configuration file templates.
//!
//! Placeholders take the form `{name}` or `{name:d}`.  A bare placeholder (or an explicit `:s`)
//! renders any value using its display form; `:d` renders a base-10 integer and rejects anything
//! that isn't one.  Text that doesn't look like a placeholder is copied through untouched.
use crate::error::{self, Result};
use lazy_static::lazy_static;
use log::debug;
use regex::{Captures, Regex};
use snafu::OptionExt;
use std::collections::BTreeMap;
use std::fmt::Display;

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{(?P<name>[a-z_][a-z0-9_]*)(?::(?P<conv>[sd]))?\}").unwrap();
}

/// A single value available for substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    Str(String),
    Int(i64),
}

impl Display for TemplateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateValue::Str(s) => write!(f, "{}", s),
            TemplateValue::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        TemplateValue::Str(s)
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        TemplateValue::Str(s.to_string())
    }
}

impl From<i64> for TemplateValue {
    fn from(i: i64) -> Self {
        TemplateValue::Int(i)
    }
}

impl From<u8> for TemplateValue {
    fn from(i: u8) -> Self {
        TemplateValue::Int(i64::from(i))
    }
}

/// The named values a template may reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateValues {
    inner: BTreeMap<String, TemplateValue>,
}

impl TemplateValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K, V>(&mut self, name: K, value: V) -> Option<TemplateValue>
    where
        K: Into<String>,
        V: Into<TemplateValue>,
    {
        self.inner.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&TemplateValue> {
        self.inner.get(name)
    }
}

impl<K, V> FromIterator<(K, V)> for TemplateValues
where
    K: Into<String>,
    V: Into<TemplateValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut values = Self::new();
        for (k, v) in iter {
            values.insert(k, v);
        }
        values
    }
}

/// Render `template`, replacing every placeholder with its value.  Either every placeholder is
/// substituted or an error is returned; partial output is never handed back.
pub fn render(template: &str, values: &TemplateValues) -> Result<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        // Group 0 always participates in a match
        let Some(whole) = caps.get(0) else {
            continue;
        };
        rendered.push_str(&template[last..whole.start()]);
        rendered.push_str(&substitute(&caps, values)?);
        last = whole.end();
    }
    rendered.push_str(&template[last..]);

    debug!("Rendered template of {} bytes", rendered.len());
    Ok(rendered)
}

fn substitute(caps: &Captures<'_>, values: &TemplateValues) -> Result<String> {
    let name = caps.name("name").map(|m| m.as_str()).unwrap_or_default();
    let conversion = caps
        .name("conv")
        .and_then(|m| m.as_str().chars().next())
        .unwrap_or('s');

    let value = values
        .get(name)
        .context(error::MissingParameterSnafu { name })?;

    match (conversion, value) {
        ('d', TemplateValue::Int(i)) => Ok(i.to_string()),
        ('d', TemplateValue::Str(s)) => s
            .trim()
            .parse::<i64>()
            .map(|i| i.to_string())
            .ok()
            .context(error::FormatSnafu {
                name,
                conversion,
                value: s,
            }),
        (_, value) => Ok(value.to_string()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    fn values() -> TemplateValues {
        vec![
            ("ip", TemplateValue::from("10.0.0.5")),
            ("prefix_length", TemplateValue::from(24u8)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn substitutes_every_occurrence() {
        let rendered = render("a={ip} b={ip} p={prefix_length:d}\n", &values()).unwrap();
        assert_eq!(rendered, "a=10.0.0.5 b=10.0.0.5 p=24\n");
    }

    #[test]
    fn integer_with_string_conversion() {
        let rendered = render("{prefix_length}/{prefix_length:s}", &values()).unwrap();
        assert_eq!(rendered, "24/24");
    }

    #[test]
    fn negative_integer() {
        let mut v = values();
        v.insert("offset", -3i64);
        assert_eq!(render("{offset:d}", &v).unwrap(), "-3");
    }

    #[test]
    fn numeric_string_as_integer() {
        let mut v = values();
        v.insert("prefix_length", "16");
        assert_eq!(render("PREFIX={prefix_length:d}", &v).unwrap(), "PREFIX=16");
    }

    #[test]
    fn non_integer_as_integer() {
        let mut v = values();
        v.insert("prefix_length", "twenty-four");
        match render("PREFIX={prefix_length:d}", &v) {
            Err(Error::Format {
                name,
                conversion,
                value,
            }) => {
                assert_eq!(name, "prefix_length");
                assert_eq!(conversion, 'd');
                assert_eq!(value, "twenty-four");
            }
            other => panic!("expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn missing_parameter() {
        match render("IPADDR={ip}\nGATEWAY={gateway_ip}\n", &values()) {
            Err(Error::MissingParameter { name }) => assert_eq!(name, "gateway_ip"),
            other => panic!("expected MissingParameter error, got {:?}", other),
        }
    }

    #[test]
    fn non_placeholders_untouched() {
        let template = "addresses: [{ip}]\n{Upper} {} {ip:x} { ip }\n";
        assert_eq!(
            render(template, &values()).unwrap(),
            "addresses: [10.0.0.5]\n{Upper} {} {ip:x} { ip }\n"
        );
    }

    #[test]
    fn values_are_not_rescanned() {
        let mut v = values();
        v.insert("ip", "{prefix_length}");
        assert_eq!(render("{ip}", &v).unwrap(), "{prefix_length}");
    }
}
