//! `cyclic-dependency`: import cycles between files.
//!
//! Strongly connected components are found with Tarjan's algorithm driven by
//! an explicit work stack, so deep import chains cannot overflow the call
//! stack. Every component with more than one file is a cycle.

use std::collections::HashMap;

use archgate_core::{ProjectGraph, Rule, RuleContext, RuleError, RuleKind, Severity, Violation};

use crate::meta::RuleMeta;

/// Flags every file that takes part in an import cycle.
#[derive(Debug, Clone)]
pub struct CyclicDependency {
    meta: RuleMeta,
}

impl Default for CyclicDependency {
    fn default() -> Self {
        Self::new()
    }
}

impl CyclicDependency {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self {
            meta: RuleMeta::for_kind(RuleKind::CyclicDependency),
        }
    }

    /// Replaces the rule identity.
    #[must_use]
    pub fn with_meta(mut self, meta: RuleMeta) -> Self {
        self.meta = meta;
        self
    }
}

impl Rule for CyclicDependency {
    fn id(&self) -> &str {
        &self.meta.id
    }

    fn kind(&self) -> RuleKind {
        RuleKind::CyclicDependency
    }

    fn severity(&self) -> Severity {
        self.meta.severity
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Violation>, RuleError> {
        let mut violations = Vec::new();
        for cycle in strongly_connected_components(ctx.graph)
            .into_iter()
            .filter(|c| c.len() > 1)
        {
            let members = cycle.join(", ");
            for file in &cycle {
                violations.push(
                    self.meta
                        .violation(
                            file,
                            format!(
                                "File is part of a dependency cycle of {} files: {members}",
                                cycle.len()
                            ),
                        )
                        .with_suggestion("Invert one of the imports or extract the shared part")
                        .with_metadata("cycle", cycle.clone())
                        .with_metadata("cycleSize", cycle.len()),
                );
            }
        }
        Ok(violations)
    }
}

/// Strongly connected components of the file graph.
///
/// Members of each component are sorted by path and components are ordered
/// by their first member. Singleton components are included.
#[must_use]
pub fn strongly_connected_components(graph: &ProjectGraph) -> Vec<Vec<String>> {
    let nodes: Vec<&str> = graph.files.keys().map(String::as_str).collect();
    let ids: HashMap<&str, usize> = nodes.iter().enumerate().map(|(i, n)| (*n, i)).collect();

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for edge in &graph.edges {
        if let (Some(&from), Some(&to)) = (ids.get(edge.from.as_str()), ids.get(edge.to.as_str())) {
            if !adjacency[from].contains(&to) {
                adjacency[from].push(to);
            }
        }
    }

    let mut tarjan = Tarjan::new(nodes.len());
    for start in 0..nodes.len() {
        if tarjan.index[start].is_none() {
            tarjan.run(start, &adjacency);
        }
    }

    let mut components: Vec<Vec<String>> = tarjan
        .components
        .into_iter()
        .map(|c| {
            let mut members: Vec<String> = c.into_iter().map(|i| nodes[i].to_owned()).collect();
            members.sort();
            members
        })
        .collect();
    components.sort();
    components
}

struct Tarjan {
    next_index: usize,
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl Tarjan {
    fn new(n: usize) -> Self {
        Self {
            next_index: 0,
            index: vec![None; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    fn discover(&mut self, v: usize) {
        self.index[v] = Some(self.next_index);
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
    }

    fn run(&mut self, start: usize, adjacency: &[Vec<usize>]) {
        // (node, next successor position)
        let mut work: Vec<(usize, usize)> = vec![(start, 0)];
        self.discover(start);

        while let Some(&(v, pos)) = work.last() {
            if let Some(&w) = adjacency[v].get(pos) {
                if let Some(top) = work.last_mut() {
                    top.1 += 1;
                }
                match self.index[w] {
                    None => {
                        self.discover(w);
                        work.push((w, 0));
                    }
                    Some(w_index) if self.on_stack[w] => {
                        self.lowlink[v] = self.lowlink[v].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            work.pop();
            if let Some(&(parent, _)) = work.last() {
                self.lowlink[parent] = self.lowlink[parent].min(self.lowlink[v]);
            }
            if self.index[v] == Some(self.lowlink[v]) {
                let mut component = Vec::new();
                while let Some(w) = self.stack.pop() {
                    self.on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                self.components.push(component);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{graph, no_contexts};

    fn files(names: &[&'static str]) -> Vec<(&'static str, Option<&'static str>)> {
        names.iter().map(|n| (*n, None)).collect()
    }

    #[test]
    fn three_file_cycle_flags_every_member() {
        let g = graph(
            &files(&["a.ts", "b.ts", "c.ts"]),
            &[("a.ts", "b.ts"), ("b.ts", "c.ts"), ("c.ts", "a.ts")],
        );
        let contexts = no_contexts();
        let ctx = RuleContext::new(&g, &contexts);

        let violations = CyclicDependency::new().check(&ctx).unwrap();
        assert_eq!(violations.len(), 3);
        for v in &violations {
            assert_eq!(v.metadata["cycle"], serde_json::json!(["a.ts", "b.ts", "c.ts"]));
            assert_eq!(v.metadata["cycleSize"], 3);
        }
        insta::assert_snapshot!(
            violations[0].message,
            @"File is part of a dependency cycle of 3 files: a.ts, b.ts, c.ts"
        );
    }

    #[test]
    fn dag_has_no_cycles() {
        let g = graph(
            &files(&["a.ts", "b.ts", "c.ts", "d.ts"]),
            &[("a.ts", "b.ts"), ("a.ts", "c.ts"), ("b.ts", "d.ts"), ("c.ts", "d.ts")],
        );
        let contexts = no_contexts();
        let ctx = RuleContext::new(&g, &contexts);
        assert!(CyclicDependency::new().check(&ctx).unwrap().is_empty());
    }

    #[test]
    fn separate_cycles_are_separate_components() {
        let g = graph(
            &files(&["a.ts", "b.ts", "c.ts", "x.ts", "y.ts"]),
            &[
                ("a.ts", "b.ts"),
                ("b.ts", "a.ts"),
                ("b.ts", "x.ts"),
                ("x.ts", "y.ts"),
                ("y.ts", "x.ts"),
                ("c.ts", "a.ts"),
            ],
        );
        let cycles: Vec<Vec<String>> = strongly_connected_components(&g)
            .into_iter()
            .filter(|c| c.len() > 1)
            .collect();
        assert_eq!(
            cycles,
            vec![
                vec!["a.ts".to_owned(), "b.ts".to_owned()],
                vec!["x.ts".to_owned(), "y.ts".to_owned()],
            ]
        );
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let names: Vec<String> = (0..20_000).map(|i| format!("f{i:05}.ts")).collect();
        let mut g = ProjectGraph::new();
        for n in &names {
            g.insert_file(archgate_core::SourceFile::new(n.clone(), archgate_core::Language::TypeScript));
        }
        for pair in names.windows(2) {
            g.add_edge(archgate_core::DependencyEdge::import(&pair[0], &pair[1], "typescript"));
        }
        g.add_edge(archgate_core::DependencyEdge::import(&names[19_999], &names[0], "typescript"));

        let components = strongly_connected_components(&g);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].len(), 20_000);
    }
}
