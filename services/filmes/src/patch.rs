//! JSON Patch documents (RFC 6902) applied to `serde_json::Value` trees
//!
//! Paths are JSON Pointers (RFC 6901). A document is applied atomically:
//! if any operation fails the target is left exactly as it was.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A single patch operation, tagged by its `op` member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

/// Ordered list of patch operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument(pub Vec<PatchOperation>);

/// Error raised while applying a patch operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("'{path}' is not a valid JSON pointer")]
    InvalidPointer { path: String },

    #[error("no value exists at '{path}'")]
    PathNotFound { path: String },

    #[error("'{path}' does not address a valid array index")]
    InvalidIndex { path: String },

    #[error("the document root cannot be removed")]
    RemoveRoot { path: String },

    #[error("cannot move '{from}' into its own child '{path}'")]
    MoveIntoChild { from: String, path: String },

    #[error("the value at '{path}' does not match the expected value")]
    TestFailed { path: String },
}

impl PatchError {
    /// Pointer of the location the failing operation targeted
    pub fn path(&self) -> &str {
        match self {
            PatchError::InvalidPointer { path }
            | PatchError::PathNotFound { path }
            | PatchError::InvalidIndex { path }
            | PatchError::RemoveRoot { path }
            | PatchError::MoveIntoChild { path, .. }
            | PatchError::TestFailed { path } => path,
        }
    }
}

impl PatchDocument {
    /// Apply every operation in order to `document`
    pub fn apply(&self, document: &mut Value) -> Result<(), PatchError> {
        let mut working = document.clone();
        for operation in &self.0 {
            operation.apply(&mut working)?;
        }
        *document = working;
        Ok(())
    }
}

impl PatchOperation {
    fn apply(&self, document: &mut Value) -> Result<(), PatchError> {
        match self {
            PatchOperation::Add { path, value } => add(document, path, value.clone()),
            PatchOperation::Remove { path } => remove(document, path).map(|_| ()),
            PatchOperation::Replace { path, value } => {
                let tokens = parse_pointer(path)?;
                *resolve_mut(document, &tokens, path)? = value.clone();
                Ok(())
            }
            PatchOperation::Move { from, path } => {
                if from == path {
                    // Still has to exist.
                    let tokens = parse_pointer(from)?;
                    resolve_mut(document, &tokens, from)?;
                    return Ok(());
                }
                if path.starts_with(&format!("{}/", from)) {
                    return Err(PatchError::MoveIntoChild {
                        from: from.clone(),
                        path: path.clone(),
                    });
                }
                let value = remove(document, from)?;
                add(document, path, value)
            }
            PatchOperation::Copy { from, path } => {
                let tokens = parse_pointer(from)?;
                let value = resolve_mut(document, &tokens, from)?.clone();
                add(document, path, value)
            }
            PatchOperation::Test { path, value } => {
                let tokens = parse_pointer(path)?;
                if json_eq(resolve_mut(document, &tokens, path)?, value) {
                    Ok(())
                } else {
                    Err(PatchError::TestFailed { path: path.clone() })
                }
            }
        }
    }
}

/// JSON equality: numbers compare by value, so `136` equals `136.0`.
fn json_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => match (a.as_u64(), b.as_u64()) {
                (Some(a), Some(b)) => a == b,
                _ => a.as_f64() == b.as_f64(),
            },
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| json_eq(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, value)| b.get(key).is_some_and(|other| json_eq(value, other)))
        }
        _ => left == right,
    }
}

fn add(document: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    let mut tokens = parse_pointer(path)?;
    let Some(last) = tokens.pop() else {
        *document = value;
        return Ok(());
    };

    match resolve_mut(document, &tokens, path)? {
        Value::Object(members) => {
            members.insert(last, value);
            Ok(())
        }
        Value::Array(items) => {
            let index = parse_index(&last, items.len(), true, path)?;
            items.insert(index, value);
            Ok(())
        }
        _ => Err(PatchError::PathNotFound {
            path: path.to_string(),
        }),
    }
}

fn remove(document: &mut Value, path: &str) -> Result<Value, PatchError> {
    let mut tokens = parse_pointer(path)?;
    let Some(last) = tokens.pop() else {
        return Err(PatchError::RemoveRoot {
            path: path.to_string(),
        });
    };

    match resolve_mut(document, &tokens, path)? {
        Value::Object(members) => members.remove(&last).ok_or_else(|| PatchError::PathNotFound {
            path: path.to_string(),
        }),
        Value::Array(items) => {
            let index = parse_index(&last, items.len(), false, path)?;
            Ok(items.remove(index))
        }
        _ => Err(PatchError::PathNotFound {
            path: path.to_string(),
        }),
    }
}

fn resolve_mut<'a>(
    document: &'a mut Value,
    tokens: &[String],
    path: &str,
) -> Result<&'a mut Value, PatchError> {
    let mut current = document;
    for token in tokens {
        let next = match current {
            Value::Object(members) => members.get_mut(token),
            Value::Array(items) => {
                let index = parse_index(token, items.len(), false, path)?;
                items.get_mut(index)
            }
            _ => None,
        };
        current = next.ok_or_else(|| PatchError::PathNotFound {
            path: path.to_string(),
        })?;
    }
    Ok(current)
}

fn parse_pointer(path: &str) -> Result<Vec<String>, PatchError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }

    let invalid = || PatchError::InvalidPointer {
        path: path.to_string(),
    };
    let rest = path.strip_prefix('/').ok_or_else(invalid)?;
    rest.split('/')
        .map(|token| unescape(token).ok_or_else(invalid))
        .collect()
}

fn unescape(token: &str) -> Option<String> {
    let mut decoded = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => decoded.push('~'),
                Some('1') => decoded.push('/'),
                _ => return None,
            }
        } else {
            decoded.push(c);
        }
    }
    Some(decoded)
}

/// `-` and `len` are only accepted when inserting.
fn parse_index(token: &str, len: usize, inserting: bool, path: &str) -> Result<usize, PatchError> {
    if inserting && token == "-" {
        return Ok(len);
    }

    let well_formed = !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token == "0" || !token.starts_with('0'));
    let index = well_formed
        .then(|| token.parse::<usize>().ok())
        .flatten()
        .ok_or_else(|| PatchError::InvalidIndex {
            path: path.to_string(),
        })?;

    if index < len || (inserting && index == len) {
        Ok(index)
    } else {
        Err(PatchError::PathNotFound {
            path: path.to_string(),
        })
    }
}
