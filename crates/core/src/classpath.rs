//! Classpath assembly
//!
//! A [`Classpath`] is a set of normalized absolute paths. The [`ClasspathBuilder`]
//! resolves artifacts, optionally with their transitive dependencies, records them in a
//! dependency graph and unions their files into the classpath.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use petgraph::algo::kosaraju_scc;
use petgraph::prelude::*;
use tracing::{debug, warn};
use yeti_toolchain_protocol::ToolchainContext;

use crate::artifact::{ArtifactRepository, Coordinate, DependencySpec};
use crate::source_locator::normalize;
use crate::types::YetiResult;

/// Set of classpath entries, unique by canonical path.
///
/// Iteration order is the sorted path order; it carries no meaning beyond making
/// argument lists and logs reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classpath {
    entries: BTreeSet<PathBuf>,
}

impl Classpath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, returns `false` when it was already present
    pub fn insert(&mut self, entry: impl AsRef<Path>) -> bool {
        self.entries.insert(normalize(entry.as_ref()))
    }

    pub fn contains(&self, entry: impl AsRef<Path>) -> bool {
        self.entries.contains(&normalize(entry.as_ref()))
    }

    pub fn union(&mut self, other: &Classpath) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.iter()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| entry.display().to_string())
            .collect()
    }

    /// The isolated execution context scoped to exactly these entries
    pub fn to_context(&self) -> ToolchainContext {
        ToolchainContext::new(self.entries.iter().cloned().collect())
    }
}

impl<P: AsRef<Path>> Extend<P> for Classpath {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

impl<P: AsRef<Path>> FromIterator<P> for Classpath {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut classpath = Classpath::new();
        classpath.extend(iter);
        classpath
    }
}

/// Resolve one artifact, and its dependencies when `include_transitive` is set, into a
/// classpath.
pub fn resolve(
    repository: &dyn ArtifactRepository,
    coordinate: &Coordinate,
    include_transitive: bool,
) -> YetiResult<Classpath> {
    let mut builder = ClasspathBuilder::new(repository);
    builder.add_artifact(coordinate, include_transitive)?;
    Ok(builder.into_classpath())
}

struct ResolvedNode {
    index: NodeIndex,
    dependencies: Vec<DependencySpec>,
}

/// Incrementally resolves artifacts into a classpath
pub struct ClasspathBuilder<'a> {
    repository: &'a dyn ArtifactRepository,
    graph: DiGraph<Coordinate, ()>,
    resolved: HashMap<Coordinate, ResolvedNode>,
    expanded: HashSet<NodeIndex>,
    classpath: Classpath,
}

impl<'a> ClasspathBuilder<'a> {
    pub fn new(repository: &'a dyn ArtifactRepository) -> Self {
        Self {
            repository,
            graph: DiGraph::new(),
            resolved: HashMap::new(),
            expanded: HashSet::new(),
            classpath: Classpath::new(),
        }
    }

    /// Resolve `coordinate` and add its file. With `include_transitive`, every
    /// non-optional dependency declared by its descriptor is resolved recursively.
    ///
    /// A coordinate that cannot be resolved fails the whole operation.
    pub fn add_artifact(&mut self, coordinate: &Coordinate, include_transitive: bool) -> YetiResult<()> {
        let root = self.visit(coordinate)?;
        if !include_transitive {
            return Ok(());
        }

        let mut queue = VecDeque::new();
        queue.push_back(root);

        while let Some(node_index) = queue.pop_front() {
            if !self.expanded.insert(node_index) {
                continue;
            }

            let dependencies = self.graph_dependencies(node_index);
            for spec in dependencies {
                if spec.optional {
                    debug!("Skipping optional dependency {}", spec.coordinate());
                    continue;
                }
                let child = self.visit(&spec.coordinate())?;
                self.graph.update_edge(node_index, child, ());
                queue.push_back(child);
            }
        }

        self.warn_on_cycles();
        Ok(())
    }

    pub fn classpath(&self) -> &Classpath {
        &self.classpath
    }

    pub fn into_classpath(self) -> Classpath {
        self.classpath
    }

    /// Every dependency cycle among the resolved artifacts, each sorted
    pub fn cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = kosaraju_scc(&self.graph)
            .into_iter()
            .filter_map(|component| {
                if component.len() > 1 {
                    let mut cycle = component
                        .iter()
                        .map(|node| self.graph[*node].to_string())
                        .collect::<Vec<_>>();
                    cycle.sort();
                    Some(cycle)
                } else {
                    let node = component[0];
                    if self.graph.contains_edge(node, node) {
                        Some(vec![self.graph[node].to_string()])
                    } else {
                        None
                    }
                }
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Depth-first rendering of the dependency tree below `root` as (depth, coordinate)
    /// pairs. Artifacts already printed are not descended into again.
    pub fn dependency_tree(&self, root: &Coordinate) -> Vec<(usize, Coordinate)> {
        let mut lines = Vec::new();
        let Some(resolved) = self.resolved.get(root) else {
            return lines;
        };

        let mut visited = HashSet::new();
        let mut stack = vec![(0usize, resolved.index)];
        while let Some((depth, node_index)) = stack.pop() {
            lines.push((depth, self.graph[node_index].clone()));
            if !visited.insert(node_index) {
                continue;
            }

            let mut children: Vec<NodeIndex> = self.graph.neighbors(node_index).collect();
            children.sort_by(|a, b| self.graph[*b].cmp(&self.graph[*a]));
            for child in children {
                stack.push((depth + 1, child));
            }
        }
        lines
    }

    fn visit(&mut self, coordinate: &Coordinate) -> YetiResult<NodeIndex> {
        if let Some(node) = self.resolved.get(coordinate) {
            return Ok(node.index);
        }

        let artifact = self.repository.resolve(coordinate)?;
        debug!("Resolved {} -> {}", coordinate, artifact.path.display());
        self.classpath.insert(&artifact.path);

        let index = self.graph.add_node(coordinate.clone());
        self.resolved.insert(
            coordinate.clone(),
            ResolvedNode {
                index,
                dependencies: artifact.dependencies,
            },
        );
        Ok(index)
    }

    fn graph_dependencies(&self, node_index: NodeIndex) -> Vec<DependencySpec> {
        self.resolved
            .get(&self.graph[node_index])
            .map(|node| node.dependencies.clone())
            .unwrap_or_default()
    }

    fn warn_on_cycles(&self) {
        for cycle in self.cycles() {
            let mut path = cycle.clone();
            if let Some(first) = path.first().cloned() {
                path.push(first);
            }
            warn!("Circular artifact dependency: {}", path.join(" -> "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::LocalRepository;
    use crate::types::YetiError;

    fn publish(repository: &LocalRepository, coordinate: &Coordinate, descriptor: &str) -> PathBuf {
        let dir = repository.artifact_dir(coordinate);
        std::fs::create_dir_all(&dir).unwrap();
        let jar = dir.join(format!("{}-{}.jar", coordinate.artifact, coordinate.version));
        std::fs::write(&jar, b"").unwrap();
        if !descriptor.is_empty() {
            std::fs::write(repository.descriptor_path(coordinate), descriptor).unwrap();
        }
        jar.canonicalize().unwrap()
    }

    fn dependency(artifact: &str) -> String {
        format!(
            "[[dependencies]]\ngroup = \"org.yeti\"\nartifact = \"{}\"\nversion = \"1.0\"\n",
            artifact
        )
    }

    #[test]
    fn classpath_is_unique_by_canonical_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let lib = temp_dir.path().join("lib");
        std::fs::create_dir_all(&lib).unwrap();

        let mut classpath = Classpath::new();
        assert!(classpath.insert(&lib));
        assert!(!classpath.insert(temp_dir.path().join("lib/../lib")));
        assert_eq!(classpath.len(), 1);
    }

    #[test]
    fn transitive_dependencies_are_included() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repository = LocalRepository::new(temp_dir.path());
        let x = Coordinate::new("org.yeti", "x", "1.0");
        let y = Coordinate::new("org.yeti", "y", "1.0");
        let x_jar = publish(&repository, &x, &dependency("y"));
        let y_jar = publish(&repository, &y, "");

        let classpath = resolve(&repository, &x, true).unwrap();

        assert!(classpath.len() >= 2);
        assert!(classpath.contains(&x_jar));
        assert!(classpath.contains(&y_jar));
    }

    #[test]
    fn without_transitive_only_the_artifact_is_added() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repository = LocalRepository::new(temp_dir.path());
        let x = Coordinate::new("org.yeti", "x", "1.0");
        let x_jar = publish(&repository, &x, &dependency("missing"));

        let classpath = resolve(&repository, &x, false).unwrap();

        assert_eq!(classpath.iter().collect::<Vec<_>>(), vec![&x_jar]);
    }

    #[test]
    fn resolving_twice_keeps_one_entry() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repository = LocalRepository::new(temp_dir.path());
        let x = Coordinate::new("org.yeti", "x", "1.0");
        publish(&repository, &x, "");

        let mut builder = ClasspathBuilder::new(&repository);
        builder.add_artifact(&x, true).unwrap();
        builder.add_artifact(&x, true).unwrap();

        assert_eq!(builder.classpath().len(), 1);
    }

    #[test]
    fn optional_dependencies_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repository = LocalRepository::new(temp_dir.path());
        let x = Coordinate::new("org.yeti", "x", "1.0");
        publish(
            &repository,
            &x,
            &format!("{}optional = true\n", dependency("not-published")),
        );

        let classpath = resolve(&repository, &x, true).unwrap();

        assert_eq!(classpath.len(), 1);
    }

    #[test]
    fn missing_transitive_dependency_fails_the_resolution() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repository = LocalRepository::new(temp_dir.path());
        let x = Coordinate::new("org.yeti", "x", "1.0");
        publish(&repository, &x, &dependency("not-published"));

        let error = resolve(&repository, &x, true).unwrap_err();

        assert!(matches!(error, YetiError::ArtifactNotFound { .. }));
    }

    #[test]
    fn cycles_terminate_and_are_reported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repository = LocalRepository::new(temp_dir.path());
        let a = Coordinate::new("org.yeti", "a", "1.0");
        let b = Coordinate::new("org.yeti", "b", "1.0");
        publish(&repository, &a, &dependency("b"));
        publish(&repository, &b, &dependency("a"));

        let mut builder = ClasspathBuilder::new(&repository);
        builder.add_artifact(&a, true).unwrap();

        assert_eq!(builder.classpath().len(), 2);
        assert_eq!(
            builder.cycles(),
            vec![vec!["org.yeti:a:1.0".to_string(), "org.yeti:b:1.0".to_string()]]
        );
    }

    #[test]
    fn dependency_tree_lists_children_in_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repository = LocalRepository::new(temp_dir.path());
        let root = Coordinate::new("org.yeti", "root", "1.0");
        publish(
            &repository,
            &root,
            &format!("{}\n{}", dependency("zeta"), dependency("alpha")),
        );
        publish(&repository, &Coordinate::new("org.yeti", "zeta", "1.0"), "");
        publish(&repository, &Coordinate::new("org.yeti", "alpha", "1.0"), "");

        let mut builder = ClasspathBuilder::new(&repository);
        builder.add_artifact(&root, true).unwrap();
        let tree: Vec<(usize, String)> = builder
            .dependency_tree(&root)
            .into_iter()
            .map(|(depth, coordinate)| (depth, coordinate.artifact))
            .collect();

        assert_eq!(
            tree,
            vec![
                (0, "root".to_string()),
                (1, "alpha".to_string()),
                (1, "zeta".to_string()),
            ]
        );
    }

    #[test]
    fn context_lists_entries_in_sorted_order() {
        let classpath: Classpath = ["/b/two.jar", "/a/one.jar"].iter().collect();
        let context = classpath.to_context();
        assert_eq!(
            context.classpath,
            vec![PathBuf::from("/a/one.jar"), PathBuf::from("/b/two.jar")]
        );
    }
}
