// src/models.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

// --- CATALOGUE MODELS (persisted in catalogue.bin) ---

/// A registered project. Its identity is the canonical filesystem path.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Display name. Defaults to the last path segment.
    pub name: String,
    /// Canonical, absolute path to the project root.
    pub path: PathBuf,
    /// Group labels. A `BTreeSet` keeps them deduplicated and gives a stable "first" group.
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

impl Project {
    /// Creates an ungrouped project, deriving the name from the path when none is given.
    pub fn new(path: PathBuf, name: Option<String>) -> Self {
        let name = name.unwrap_or_else(|| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned())
        });
        Self {
            name,
            path,
            groups: BTreeSet::new(),
        }
    }

    /// The group used as resolution context: the first label in sorted order.
    pub fn primary_group(&self) -> Option<&str> {
        self.groups.iter().next().map(String::as_str)
    }

    /// Whether `group` is one of this project's labels.
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }
}

/// The persisted list of registered projects, in registration order.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    /// Registered projects.
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Criteria for `list_projects_matching`. Every field that is set must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    /// Exact project name.
    pub name: Option<String>,
    /// Canonical project path.
    pub path: Option<PathBuf>,
    /// A group the project must belong to.
    pub group: Option<String>,
}

impl ProjectFilter {
    /// Matches projects named `name`.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Adds a group criterion, or clears it with `None`.
    pub fn with_group(mut self, group: Option<String>) -> Self {
        self.group = group;
        self
    }

    /// Whether `project` satisfies every set criterion.
    pub fn matches(&self, project: &Project) -> bool {
        self.name.as_deref().is_none_or(|n| project.name == n)
            && self.path.as_deref().is_none_or(|p| project.path == p)
            && self.group.as_deref().is_none_or(|g| project.in_group(g))
    }
}

// --- `pier.toml` MODELS (What is read from a project's descriptor) ---

/// The deserialized structure of a project's `pier.toml`.
///
/// Script values are kept as raw TOML so that one malformed entry does not
/// make the whole descriptor unreadable.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct ProjectDescriptor {
    /// Name used when the project is registered.
    pub name: Option<String>,
    /// Free text shown by `info`.
    pub description: Option<String>,
    /// Script name to raw value, in declaration order.
    #[serde(default)]
    pub scripts: IndexMap<String, toml::Value>,
    /// Script name to the projects that must run before it.
    #[serde(default)]
    pub dependencies: IndexMap<String, Vec<DependencyDecl>>,
}

impl ProjectDescriptor {
    /// A small starter descriptor for `pier init`.
    pub fn new_for_init(name: &str) -> Self {
        let mut scripts = IndexMap::new();
        scripts.insert(
            "hello".to_string(),
            toml::Value::String(format!("echo \"Hello from {}!\" $@", name)),
        );
        scripts.insert(
            "check".to_string(),
            toml::Value::Array(vec![toml::Value::String("hello".to_string())]),
        );

        Self {
            name: Some(name.to_string()),
            description: Some("A project managed by `pier`.".to_string()),
            scripts,
            dependencies: IndexMap::new(),
        }
    }
}

/// One entry of `[dependencies]`: another project whose scripts run first.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DependencyDecl {
    /// Catalogue name of the project depended upon.
    pub project: String,
    /// Which of this node's scripts propagate to the dependency, and how.
    #[serde(default)]
    pub scripts: IndexMap<String, ScriptPropagation>,
}

/// A script value: a literal command template or a list of other script names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptValue {
    /// A command template.
    Literal(String),
    /// Names of other scripts, expanded in order.
    Alias(Vec<String>),
}

impl ScriptValue {
    /// Interprets a raw TOML value. Returns `None` for any other shape.
    pub fn from_toml(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::String(s) => Some(Self::Literal(s.clone())),
            toml::Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(Self::Alias),
            _ => None,
        }
    }
}

/// How a script propagates to a dependency project.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(from = "PropagationValue", into = "PropagationValue")]
pub enum ScriptPropagation {
    /// `false`: the dependency is not run for this script.
    Disabled,
    /// `true`: the dependency runs its script of the same name.
    SameName,
    /// `"other"`: the dependency runs `other` instead.
    Renamed(String),
}

impl ScriptPropagation {
    /// The script to run on the dependency when the dependent runs `script`.
    pub fn target_script<'a>(&'a self, script: &'a str) -> Option<&'a str> {
        match self {
            Self::Disabled => None,
            Self::SameName => Some(script),
            Self::Renamed(other) => Some(other.as_str()),
        }
    }
}

/// The on-disk shape of a propagation value (`true`, `false` or a script name).
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(untagged)]
enum PropagationValue {
    Flag(bool),
    Script(String),
}

impl From<PropagationValue> for ScriptPropagation {
    fn from(value: PropagationValue) -> Self {
        match value {
            PropagationValue::Flag(true) => Self::SameName,
            PropagationValue::Flag(false) => Self::Disabled,
            PropagationValue::Script(name) => Self::Renamed(name),
        }
    }
}

impl From<ScriptPropagation> for PropagationValue {
    fn from(value: ScriptPropagation) -> Self {
        match value {
            ScriptPropagation::Disabled => Self::Flag(false),
            ScriptPropagation::SameName => Self::Flag(true),
            ScriptPropagation::Renamed(name) => Self::Script(name),
        }
    }
}

// --- RUN PLAN MODELS (In-memory, produced by the resolver) ---

/// Identifies one script of one project: `<canonical path>@<script>`.
/// Shared by the resolution and execution stacks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScriptKey(String);

impl ScriptKey {
    /// Builds the key for `script` of the project at `path`.
    pub fn new(path: &Path, script: &str) -> Self {
        Self(format!("{}@{}", path.display(), script))
    }

    /// The key as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScriptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One project's contribution to a run: its literal commands plus the
/// dependency subtrees that must run before them.
///
/// Built once by the resolver and never mutated afterwards.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    name: String,
    group: Option<String>,
    command_list: IndexMap<String, String>,
    dependencies: Vec<RunConfiguration>,
}

impl RunConfiguration {
    /// Assembles a node from its parts.
    pub fn new(
        name: String,
        group: Option<String>,
        command_list: IndexMap<String, String>,
        dependencies: Vec<RunConfiguration>,
    ) -> Self {
        Self {
            name,
            group,
            command_list,
            dependencies,
        }
    }

    /// Project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Primary group of the project, if it has one.
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Script name to literal command template, in expansion order.
    pub fn command_list(&self) -> &IndexMap<String, String> {
        &self.command_list
    }

    /// Subtrees that run before this node.
    pub fn dependencies(&self) -> &[RunConfiguration] {
        &self.dependencies
    }

    /// Number of nodes in this subtree, including `self`.
    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        1 + self
            .dependencies
            .iter()
            .map(Self::node_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_name_defaults_to_last_path_segment() {
        let project = Project::new(PathBuf::from("/work/acme/api"), None);
        assert_eq!(project.name, "api");

        let named = Project::new(PathBuf::from("/work/acme/api"), Some("backend".to_string()));
        assert_eq!(named.name, "backend");
    }

    #[test]
    fn test_primary_group_is_first_in_sorted_order() {
        let mut project = Project::new(PathBuf::from("/work/api"), None);
        assert_eq!(project.primary_group(), None);

        project.groups.insert("work".to_string());
        project.groups.insert("acme".to_string());
        project.groups.insert("work".to_string());
        assert_eq!(project.groups.len(), 2);
        assert_eq!(project.primary_group(), Some("acme"));
    }

    #[test]
    fn test_filter_requires_every_provided_field() {
        let mut project = Project::new(PathBuf::from("/work/api"), None);
        project.groups.insert("acme".to_string());

        assert!(ProjectFilter::default().matches(&project));
        assert!(ProjectFilter::by_name("api").matches(&project));
        assert!(
            ProjectFilter::by_name("api")
                .with_group(Some("acme".to_string()))
                .matches(&project)
        );
        assert!(
            !ProjectFilter::by_name("api")
                .with_group(Some("other".to_string()))
                .matches(&project)
        );
        assert!(!ProjectFilter::by_name("web").matches(&project));
    }

    #[test]
    fn test_script_value_from_toml_shapes() {
        let literal = toml::Value::String("cargo build".to_string());
        assert_eq!(
            ScriptValue::from_toml(&literal),
            Some(ScriptValue::Literal("cargo build".to_string()))
        );

        let alias = toml::Value::Array(vec![
            toml::Value::String("lint".to_string()),
            toml::Value::String("test".to_string()),
        ]);
        assert_eq!(
            ScriptValue::from_toml(&alias),
            Some(ScriptValue::Alias(vec!["lint".to_string(), "test".to_string()]))
        );

        // Mixed arrays and scalars of other types are malformed.
        let mixed = toml::Value::Array(vec![
            toml::Value::String("lint".to_string()),
            toml::Value::Integer(3),
        ]);
        assert_eq!(ScriptValue::from_toml(&mixed), None);
        assert_eq!(ScriptValue::from_toml(&toml::Value::Boolean(true)), None);
    }

    #[test]
    fn test_dependency_decl_parses_propagation_variants() {
        let toml_str = r#"
            project = "db"
            scripts = { start = true, stop = false, build = "compile" }
        "#;
        let decl: DependencyDecl = toml::from_str(toml_str).unwrap();
        assert_eq!(decl.project, "db");
        assert_eq!(decl.scripts.get("start"), Some(&ScriptPropagation::SameName));
        assert_eq!(decl.scripts.get("stop"), Some(&ScriptPropagation::Disabled));
        assert_eq!(
            decl.scripts.get("build"),
            Some(&ScriptPropagation::Renamed("compile".to_string()))
        );
    }

    #[test]
    fn test_dependency_decl_rejects_unknown_fields() {
        let toml_str = r#"
            projet = "db"
        "#;
        let result: Result<DependencyDecl, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_propagation_target_script() {
        assert_eq!(ScriptPropagation::Disabled.target_script("start"), None);
        assert_eq!(ScriptPropagation::SameName.target_script("start"), Some("start"));
        assert_eq!(
            ScriptPropagation::Renamed("serve".to_string()).target_script("start"),
            Some("serve")
        );
    }

    #[test]
    fn test_script_key_format() {
        let key = ScriptKey::new(Path::new("/work/api"), "build");
        assert_eq!(key.as_str(), "/work/api@build");
        assert_eq!(key.to_string(), "/work/api@build");
    }
}
