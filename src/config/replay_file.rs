use crate::errors::{ReplayError, Result};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;

/// Branches to rebase onto one upstream, in declared order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebaseGroup {
    pub upstream: String,
    pub branches: Vec<String>,
}

/// Branches built from one start point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageGroup {
    pub start_point: String,
    pub branches: Vec<StagedBranch>,
}

/// A branch created from its group's start point by merging `merges` in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedBranch {
    pub name: String,
    pub merges: Vec<String>,
}

/// The parsed configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayConfig {
    pub rebase: Vec<RebaseGroup>,
    pub stage: Vec<StageGroup>,
}

impl ReplayConfig {
    /// Parse a configuration document from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        if is_blank_document(content) {
            return Ok(Self::default());
        }
        let raw: RawConfig = serde_yaml::from_str(content)?;
        Ok(raw.into())
    }

    /// Read and parse the configuration file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ReplayError::ConfigNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| {
            ReplayError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content).map_err(|e| match e {
            ReplayError::Yaml(e) => {
                ReplayError::config(format!("Failed to parse {}: {}", path.display(), e))
            }
            other => other,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rebase.is_empty() && self.stage.is_empty()
    }

    /// Every branch the document rebases or creates, first occurrence first
    pub fn branches(&self) -> Vec<String> {
        let rebased = self.rebase.iter().flat_map(|g| g.branches.iter());
        let staged = self
            .stage
            .iter()
            .flat_map(|g| g.branches.iter().map(|b| &b.name));

        let mut seen = Vec::new();
        for branch in rebased.chain(staged) {
            if !seen.contains(branch) {
                seen.push(branch.clone());
            }
        }
        seen
    }
}

/// Only whitespace, comments and document markers
fn is_blank_document(content: &str) -> bool {
    content.lines().map(str::trim).all(|line| {
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    rebase: Declared<RefList>,
    #[serde(default)]
    stage: Declared<Declared<RefList>>,
}

impl From<RawConfig> for ReplayConfig {
    fn from(raw: RawConfig) -> Self {
        let rebase = raw
            .rebase
            .0
            .into_iter()
            .map(|(upstream, branches)| RebaseGroup {
                upstream,
                branches: branches.0,
            })
            .collect();
        let stage = raw
            .stage
            .0
            .into_iter()
            .map(|(start_point, branches)| StageGroup {
                start_point,
                branches: branches
                    .0
                    .into_iter()
                    .map(|(name, merges)| StagedBranch {
                        name,
                        merges: merges.0,
                    })
                    .collect(),
            })
            .collect();
        Self { rebase, stage }
    }
}

/// A mapping kept in document order; `null` reads as empty
struct Declared<V>(Vec<(String, V)>);

impl<V> Default for Declared<V> {
    fn default() -> Self {
        Declared(Vec::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Declared<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct DeclaredVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for DeclaredVisitor<V> {
            type Value = Declared<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping keyed by branch or ref name")
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(Declared::default())
            }

            fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(Declared::default())
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, V)> = Vec::new();
                while let Some((RefName(key), value)) = map.next_entry::<RefName, V>()? {
                    if entries.iter().any(|(k, _)| *k == key) {
                        return Err(de::Error::custom(format!("duplicate key '{key}'")));
                    }
                    entries.push((key, value));
                }
                Ok(Declared(entries))
            }
        }

        deserializer.deserialize_any(DeclaredVisitor(PhantomData))
    }
}

/// An ordered list of references; a lone scalar is a one-element list
struct RefList(Vec<String>);

impl<'de> Deserialize<'de> for RefList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RefListVisitor;

        impl<'de> Visitor<'de> for RefListVisitor {
            type Value = RefList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a list of branch or commit names")
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(RefList(Vec::new()))
            }

            fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
                Ok(RefList(Vec::new()))
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut refs = Vec::new();
                while let Some(RefName(name)) = seq.next_element()? {
                    refs.push(name);
                }
                Ok(RefList(refs))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
                RefNameVisitor.visit_str(v).map(|r| RefList(vec![r.0]))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
                Ok(RefList(vec![v.to_string()]))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
                Ok(RefList(vec![v.to_string()]))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
                RefNameVisitor.visit_f64(v).map(|r| RefList(vec![r.0]))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Self::Value, E> {
                RefNameVisitor.visit_bool(v).map(|r| RefList(vec![r.0]))
            }
        }

        deserializer.deserialize_any(RefListVisitor)
    }
}

/// A branch or commit name. Scalars YAML reads as numbers or booleans are
/// taken as their literal text, so all-digit short commit ids survive.
struct RefName(String);

struct RefNameVisitor;

impl<'de> Visitor<'de> for RefNameVisitor {
    type Value = RefName;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a branch or commit name")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Self::Value, E> {
        let name = v.trim();
        if name.is_empty() {
            return Err(E::custom("empty branch or commit name"));
        }
        Ok(RefName(name.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Self::Value, E> {
        Ok(RefName(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Self::Value, E> {
        Ok(RefName(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Self::Value, E> {
        Ok(RefName(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Self::Value, E> {
        Ok(RefName(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for RefName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(RefNameVisitor)
    }
}
