use crate::shared::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Maximum length for package names (security limit)
const MAX_PACKAGE_NAME_LENGTH: usize = 255;

/// Maximum length for package versions (security limit)
const MAX_VERSION_LENGTH: usize = 100;

/// Package ecosystem supported by the graph service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ecosystem {
    Maven,
    Pypi,
    Npm,
}

impl Ecosystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Maven => "maven",
            Ecosystem::Pypi => "pypi",
            Ecosystem::Npm => "npm",
        }
    }
}

impl FromStr for Ecosystem {
    type Err = anyhow::Error;

    /// Parses an ecosystem name case-insensitively ("PyPI" and "pypi" are the same)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "maven" => Ok(Ecosystem::Maven),
            "pypi" => Ok(Ecosystem::Pypi),
            "npm" => Ok(Ecosystem::Npm),
            other => anyhow::bail!(
                "Unsupported ecosystem '{}'. Expected one of: maven, pypi, npm",
                other
            ),
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Ecosystem {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Ecosystem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Rejects empty, oversized, whitespace or control characters.
///
/// Names are ecosystem specific (`group:artifact` for maven, `@scope/name`
/// for npm) so only characters that can never be part of a coordinate are
/// refused.
fn validate_component(value: &str, kind: &str, max_len: usize) -> Result<()> {
    if value.is_empty() {
        anyhow::bail!("Package {} cannot be empty", kind);
    }

    if value.len() > max_len {
        anyhow::bail!(
            "Package {} is too long ({} bytes). Maximum allowed: {} bytes",
            kind,
            value.len(),
            max_len
        );
    }

    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        anyhow::bail!(
            "Package {} '{}' contains whitespace or control characters",
            kind,
            value.escape_debug()
        );
    }

    Ok(())
}

/// NewType wrapper for package name with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: String) -> Result<Self> {
        validate_component(&name, "name", MAX_PACKAGE_NAME_LENGTH)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PackageName {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PackageName> for String {
    fn from(value: PackageName) -> Self {
        value.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// NewType wrapper for package version with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version(String);

impl Version {
    pub fn new(version: String) -> Result<Self> {
        validate_component(&version, "version", MAX_VERSION_LENGTH)?;
        Ok(Self(version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Version {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Package value object identified by its `(name, version)` pair
///
/// A package may list the packages it depends on, but that list is NOT part
/// of its identity: equality, hashing and ordering only look at name and
/// version. Two packages with the same coordinates and different dependency
/// lists are the same entity, which is what lets the normalizer collapse
/// overlapping manifests into a duplicate-free graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    name: PackageName,
    version: Version,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    dependencies: Vec<Package>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Package>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Package>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Package {
    pub fn new(name: String, version: String) -> Result<Self> {
        Ok(Self {
            name: PackageName::new(name)?,
            version: Version::new(version)?,
            dependencies: Vec::new(),
        })
    }

    pub fn from_parts(name: PackageName, version: Version) -> Self {
        Self {
            name,
            version,
            dependencies: Vec::new(),
        }
    }

    /// Attaches the packages this package lists as its own dependencies
    pub fn with_dependencies(mut self, dependencies: Vec<Package>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    pub fn package_name(&self) -> &PackageName {
        &self.name
    }

    pub fn package_version(&self) -> &Version {
        &self.version
    }

    pub fn dependencies(&self) -> &[Package] {
        &self.dependencies
    }

    /// Copy of this package carrying only its identity
    pub fn identity(&self) -> Package {
        Self::from_parts(self.name.clone(), self.version.clone())
    }
}

impl PartialEq for Package {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version
    }
}

impl Eq for Package {}

impl Hash for Package {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version.hash(state);
    }
}

impl PartialOrd for Package {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Package {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(&other.name)
            .then_with(|| self.version.cmp(&other.version))
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
