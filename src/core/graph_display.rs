// src/core/graph_display.rs

use crate::models::{Project, RunConfiguration};
use colored::*;
use std::collections::BTreeMap;
use std::fmt::Write;

const UNGROUPED: &str = "(ungrouped)";

/// Prints the catalogue as a tree of groups. Ungrouped projects come last.
pub fn display_catalogue_tree(projects: &[Project], show_paths: bool) {
    if projects.is_empty() {
        println!("\nNo projects registered. Use 'pier add [PATH]' to register one.");
        return;
    }
    println!("\n{}", "Registered projects:".bold());
    print!("{}", render_catalogue_tree(projects, show_paths));
}

/// Prints a run plan forest. Each node's dependencies are its children.
pub fn display_run_plan(script: &str, forest: &[RunConfiguration]) {
    if forest.is_empty() {
        println!("\nNothing to run for '{}'.", script);
        return;
    }
    println!("\n{} '{}':", "Run plan for".bold(), script.cyan());
    print!("{}", render_run_plan(forest));
}

/// Renders projects as a tree of groups, ungrouped projects last.
pub fn render_catalogue_tree(projects: &[Project], show_paths: bool) -> String {
    // A project in several groups is listed under each of them.
    let mut by_group: BTreeMap<&str, Vec<&Project>> = BTreeMap::new();
    let mut ungrouped: Vec<&Project> = Vec::new();
    for project in projects {
        if project.groups.is_empty() {
            ungrouped.push(project);
        }
        for group in &project.groups {
            by_group.entry(group.as_str()).or_default().push(project);
        }
    }

    let mut sections: Vec<(&str, Vec<&Project>)> = by_group.into_iter().collect();
    if !ungrouped.is_empty() {
        sections.push((UNGROUPED, ungrouped));
    }

    let mut out = String::new();
    for (group, mut members) in sections {
        members.sort_by(|a, b| a.name.cmp(&b.name));
        let _ = writeln!(out, "{}", group);
        for (j, project) in members.iter().enumerate() {
            let connector = if j + 1 == members.len() { "└─" } else { "├─" };
            if show_paths {
                let _ = writeln!(out, "{} {} [{}]", connector, project.name, project.path.display());
            } else {
                let _ = writeln!(out, "{} {}", connector, project.name);
            }
        }
    }
    out
}

/// Renders a run plan forest with dependencies nested under their dependents.
pub fn render_run_plan(forest: &[RunConfiguration]) -> String {
    let mut out = String::new();
    for (i, node) in forest.iter().enumerate() {
        render_node(&mut out, node, "", i + 1 == forest.len());
    }
    out
}

/// Recursive function to render a plan node and its dependencies.
fn render_node(out: &mut String, node: &RunConfiguration, prefix: &str, is_last: bool) {
    let connector = if is_last { "└─" } else { "├─" };
    let group = node
        .group()
        .map(|g| format!(" ({})", g))
        .unwrap_or_default();
    let scripts = if node.command_list().is_empty() {
        "-".to_string()
    } else {
        node.command_list()
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let _ = writeln!(out, "{}{} {}{}: {}", prefix, connector, node.name(), group, scripts);

    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    let children = node.dependencies();
    for (i, child) in children.iter().enumerate() {
        render_node(out, child, &child_prefix, i + 1 == children.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn project(name: &str, path: &str, groups: &[&str]) -> Project {
        let mut project = Project::new(PathBuf::from(path), Some(name.to_string()));
        project.groups = groups.iter().map(|g| g.to_string()).collect();
        project
    }

    fn node(name: &str, scripts: &[&str], dependencies: Vec<RunConfiguration>) -> RunConfiguration {
        let commands: IndexMap<String, String> = scripts
            .iter()
            .map(|s| (s.to_string(), format!("run {}", s)))
            .collect();
        RunConfiguration::new(name.to_string(), None, commands, dependencies)
    }

    #[test]
    fn test_catalogue_tree_groups_projects() {
        let projects = vec![
            project("web", "/work/acme/web", &["acme"]),
            project("tools", "/work/tools", &[]),
            project("api", "/work/acme/api", &["acme", "backend"]),
        ];

        let tree = render_catalogue_tree(&projects, false);
        assert_eq!(
            tree,
            "acme\n├─ api\n└─ web\nbackend\n└─ api\n(ungrouped)\n└─ tools\n"
        );
    }

    #[test]
    fn test_catalogue_tree_with_paths() {
        let projects = vec![project("api", "/work/api", &[])];
        assert_eq!(
            render_catalogue_tree(&projects, true),
            "(ungrouped)\n└─ api [/work/api]\n"
        );
    }

    #[test]
    fn test_run_plan_tree_nests_dependencies() {
        let forest = vec![
            node(
                "web",
                &["install", "serve"],
                vec![node("api", &["start"], vec![node("db", &["up"], vec![])]), node("auth", &[], vec![])],
            ),
            node("docs", &["build"], vec![]),
        ];

        assert_eq!(
            render_run_plan(&forest),
            "├─ web: install, serve\n\
             │  ├─ api: start\n\
             │  │  └─ db: up\n\
             │  └─ auth: -\n\
             └─ docs: build\n"
        );
    }
}
