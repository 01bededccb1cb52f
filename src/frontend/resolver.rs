//! Module resolution for multi-file programs
//!
//! Maps an imported dotted name to a [`ModuleSource`] and orders modules so that every module is
//! compiled after the modules it imports.
//!
//! Search order for `import a.b`:
//! 1. `<importer dir>/a/b.py`, then `<importer dir>/a/b/__init__.py`
//! 2. the same under each include path
//! 3. the standard library (`<stdlib>/a/b.py`)

use std::path::{Path, PathBuf};

use pyrite_core::lang::intrinsics::COMPILER_DEFINED_MODULE;

use crate::config::CompilerOptions;
use crate::frontend::source::{INTERNAL_MODULE, ModuleSource};

/// Names that never map to a file: the internal module is injected everywhere and intrinsics are
/// provided by the compiler.
pub fn is_virtual(name: &str) -> bool {
    name == INTERNAL_MODULE || name == COMPILER_DEFINED_MODULE
}

/// Find the source of module `name` imported from a module living in `importer_dir`.
pub fn locate(name: &str, importer_dir: &Path, options: &CompilerOptions) -> Option<ModuleSource> {
    if is_virtual(name) || name.is_empty() {
        return None;
    }

    let search_dirs = std::iter::once(importer_dir).chain(options.include_paths.iter().map(PathBuf::as_path));
    for dir in search_dirs {
        if let Some(path) = find_module_file(dir, name) {
            return Some(ModuleSource::File(path));
        }
    }

    let stdlib = ModuleSource::Stdlib(name.to_string());
    match stdlib.resolve_path(options) {
        Some(path) if path.is_file() => Some(stdlib),
        _ => None,
    }
}

fn find_module_file(dir: &Path, name: &str) -> Option<PathBuf> {
    let base: PathBuf = std::iter::once(dir.as_os_str())
        .chain(name.split('.').map(std::ffi::OsStr::new))
        .collect();

    let mut file = base.clone();
    file.set_extension("py");
    if file.is_file() {
        return Some(file);
    }

    // Package directory, Python style
    let init = base.join("__init__.py");
    init.is_file().then_some(init)
}

/// Compilation order over a module graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyOrder {
    /// Every node, dependencies before dependents, otherwise in index order.
    pub order: Vec<usize>,
    /// Each import cycle found, as the nodes on it in the order they import each other.
    pub cycles: Vec<Vec<usize>>,
}

impl DependencyOrder {
    pub fn in_cycle(&self, node: usize) -> Option<&[usize]> {
        self.cycles.iter().find(|c| c.contains(&node)).map(Vec::as_slice)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

/// Order nodes dependencies-first. `edges[i]` lists the nodes node `i` depends on.
///
/// Depth-first post-order starting from each node in index order, so the result is stable with
/// respect to registration order.
pub fn dependency_order(edges: &[Vec<usize>]) -> DependencyOrder {
    struct Walk<'e> {
        edges: &'e [Vec<usize>],
        marks: Vec<Mark>,
        stack: Vec<usize>,
        out: DependencyOrder,
    }

    impl Walk<'_> {
        fn visit(&mut self, node: usize) {
            match self.marks[node] {
                Mark::Done => return,
                Mark::Visiting => {
                    if let Some(pos) = self.stack.iter().position(|&n| n == node) {
                        self.out.cycles.push(self.stack[pos..].to_vec());
                    }
                    return;
                }
                Mark::Unvisited => {}
            }

            self.marks[node] = Mark::Visiting;
            self.stack.push(node);
            for &dep in &self.edges[node] {
                if dep < self.edges.len() {
                    self.visit(dep);
                }
            }
            self.stack.pop();
            self.marks[node] = Mark::Done;
            self.out.order.push(node);
        }
    }

    let mut walk = Walk {
        edges,
        marks: vec![Mark::Unvisited; edges.len()],
        stack: Vec::new(),
        out: DependencyOrder::default(),
    };
    for node in 0..edges.len() {
        walk.visit(node);
    }
    walk.out
}
