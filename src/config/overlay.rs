//! Overlay of user supplied values on top of the default parameters.

use serde_yaml::{Mapping, Value};
use std::fs;
use std::io::Read;
use std::path::Path;

use super::parameters::{PARAMETER_KEYS, Parameters};
use crate::errors::{ParameterError, Result};
use crate::readwrite::{read_sequence, read_sites};

/// Values explicitly given in a parameter document.
///
/// Only recognized keys with non-null values are kept, in the canonical order of
/// `PARAMETER_KEYS`. File references are kept as given and only read when applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overlay {
    entries: Vec<(&'static str, Value)>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mapping(mapping: &Mapping) -> Self {
        for key in mapping.keys() {
            match key.as_str() {
                Some(name) if PARAMETER_KEYS.contains(&name) => {}
                Some(name) => log::debug!("Ignoring unknown parameter `{name}`"),
                None => log::debug!("Ignoring parameter with non-string key {key:?}"),
            }
        }

        let entries = PARAMETER_KEYS
            .iter()
            .filter_map(|&key| match mapping.get(key) {
                Some(value) if !value.is_null() => Some((key, value.clone())),
                _ => None,
            })
            .collect();
        Self { entries }
    }

    pub fn read(reader: &mut dyn Read) -> Result<Overlay> {
        let mut document = String::new();
        reader.read_to_string(&mut document).map_err(|error| {
            ParameterError::ConfigUnavailable(format!("unable to read document: {error}"))
        })?;
        if document.trim().is_empty() {
            return Ok(Self::new());
        }

        let value: Value = serde_yaml::from_str(&document).map_err(|error| {
            ParameterError::ConfigUnavailable(format!("unable to parse document: {error}"))
        })?;
        match value {
            Value::Mapping(mapping) => Ok(Self::from_mapping(&mapping)),
            Value::Null => Ok(Self::new()),
            other => Err(ParameterError::ConfigUnavailable(format!(
                "document is a {} instead of a mapping",
                describe(&other)
            ))),
        }
    }

    pub fn read_from_file(path: &Path) -> Result<Overlay> {
        let file = fs::File::open(path).map_err(|error| {
            ParameterError::ConfigUnavailable(format!(
                "cannot load {}: {error}",
                path.display()
            ))
        })?;
        let mut reader = std::io::BufReader::new(file);
        let overlay = Self::read(&mut reader)?;
        log::info!(
            "Loading {} parameters from {}",
            overlay.len(),
            path.display()
        );
        Ok(overlay)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overridden keys in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }

    /// Position of `key` in the canonical order of the overridden keys.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(name, _)| *name == key)
    }

    /// Apply all overridden values in canonical order.
    ///
    /// Every value is type checked as it is applied. On error, the values applied before the
    /// failing key remain applied to `parameters` and none after it are.
    pub fn apply(&self, parameters: &mut Parameters) -> Result<()> {
        self.apply_prefix(self.len(), parameters)
    }

    /// Apply the first `n` overridden values in canonical order.
    pub fn apply_prefix(&self, n: usize, parameters: &mut Parameters) -> Result<()> {
        let prefix = &self.entries[..n.min(self.len())];

        // side files are relative to the overridden input directory, if it is applied
        let input_dir = match prefix.iter().find(|(key, _)| *key == "inputDir") {
            Some((_, Value::String(dir))) => dir.clone(),
            _ => parameters.input_dir.clone(),
        };

        let mut table = parameters.to_mapping()?;
        for (key, value) in prefix {
            let value = resolve_reference(key, value, Path::new(&input_dir))?;
            table.insert(Value::String(key.to_string()), value);
            *parameters = Parameters::from_mapping(&table, key)?;
            log::debug!("Applied parameter `{key}`");
        }
        Ok(())
    }
}

/// Replace file references by the content of the referenced side file.
fn resolve_reference(key: &str, value: &Value, input_dir: &Path) -> Result<Value> {
    match (key, value) {
        ("startingSequence", Value::String(file)) => {
            let sequence = read_sequence(&input_dir.join(file))?;
            Ok(Value::String(sequence))
        }
        ("startingSequence", other) => Err(ParameterError::TypeMismatch {
            key: key.to_string(),
            message: format!("expected a file name, found {}", describe(other)),
        }),
        ("epitopeSites", Value::Sequence(sites))
            if sites.iter().any(|site| site.as_u64() == Some(0)) =>
        {
            Err(ParameterError::TypeMismatch {
                key: key.to_string(),
                message: "epitope sites are 1-based, found 0".to_string(),
            })
        }
        ("epitopeSites", Value::String(file)) => {
            let sites = read_sites(&input_dir.join(file))?;
            Ok(Value::Sequence(
                sites.into_iter().map(|site| Value::from(site as u64)).collect(),
            ))
        }
        _ => Ok(value.clone()),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_f64() => "real",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
