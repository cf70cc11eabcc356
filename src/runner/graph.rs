//! Pre-task graph
//!
//! Links every task to its pre-tasks after the final config is loaded, then
//! rejects cycles before anything runs.

use crate::config::{args_in_scope, Config};
use crate::error::{ReferenceError, ReferenceResult, Result};
use crate::runner::task::{Task, TaskId};
use std::collections::HashMap;

/// All tasks of a config with their pre-task links resolved
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    index: HashMap<String, TaskId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    White,
    Grey,
    Black,
}

impl TaskGraph {
    /// Build the graph from a fully loaded config
    pub fn resolve(config: &Config) -> Result<Self> {
        let mut names: Vec<&String> = config.tasks.keys().collect();
        names.sort();

        let mut tasks = Vec::with_capacity(names.len());
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.into_iter().enumerate() {
            let task_config = &config.tasks[name];
            let scope = args_in_scope(config, task_config)?;
            tasks.push(Task::from_config(task_config, scope));
            index.insert(name.clone(), TaskId(i));
        }

        let mut graph = TaskGraph { tasks, index };
        graph.link()?;
        graph.check_cycles()?;

        log::debug!("Resolved task graph with {} tasks", graph.tasks.len());
        Ok(graph)
    }

    /// Resolve pre-task names into ids, preserving listed order
    fn link(&mut self) -> ReferenceResult<()> {
        for task in self.tasks.iter_mut() {
            let mut pre_tasks = Vec::with_capacity(task.pre_names.len());
            for pre_name in &task.pre_names {
                let id = self.index.get(pre_name).copied().ok_or_else(|| {
                    ReferenceError::UnknownPreTask {
                        task: task.name.clone(),
                        missing: pre_name.clone(),
                    }
                })?;
                pre_tasks.push(id);
            }
            task.pre_tasks = pre_tasks;
        }
        Ok(())
    }

    /// Depth-first search with white/grey/black marks
    fn check_cycles(&self) -> ReferenceResult<()> {
        let mut marks = vec![Mark::White; self.tasks.len()];
        let mut path = Vec::new();

        for start in 0..self.tasks.len() {
            if marks[start] == Mark::White {
                self.visit(TaskId(start), &mut marks, &mut path)?;
            }
        }
        Ok(())
    }

    fn visit(
        &self,
        id: TaskId,
        marks: &mut [Mark],
        path: &mut Vec<TaskId>,
    ) -> ReferenceResult<()> {
        marks[id.0] = Mark::Grey;
        path.push(id);

        for &pre in &self.tasks[id.0].pre_tasks {
            match marks[pre.0] {
                Mark::Grey => {
                    let start = path.iter().position(|&p| p == pre).unwrap_or(0);
                    let mut members: Vec<String> = path[start..]
                        .iter()
                        .map(|&p| self.tasks[p.0].name.clone())
                        .collect();
                    members.push(self.tasks[pre.0].name.clone());
                    return Err(ReferenceError::Cycle { members });
                }
                Mark::White => self.visit(pre, marks, path)?,
                Mark::Black => {}
            }
        }

        path.pop();
        marks[id.0] = Mark::Black;
        Ok(())
    }

    /// Look up a task by name
    pub fn get(&self, name: &str) -> Option<TaskId> {
        self.index.get(name).copied()
    }

    /// The task behind an id
    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id.0]
    }

    /// Resolved pre-tasks of a task, in listed order
    pub fn pre_tasks(&self, id: TaskId) -> &[TaskId] {
        &self.tasks[id.0].pre_tasks
    }

    /// Every task reachable from `root` through pre-task links, `root` included
    pub fn reachable(&self, root: TaskId) -> Vec<TaskId> {
        let mut seen = vec![false; self.tasks.len()];
        let mut order = Vec::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if seen[id.0] {
                continue;
            }
            seen[id.0] = true;
            order.push(id);
            stack.extend(self.pre_tasks(id).iter().rev());
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::error::TuskError;

    fn graph(yaml: &str) -> Result<TaskGraph> {
        TaskGraph::resolve(&parse_config(yaml).unwrap())
    }

    fn pre_names(graph: &TaskGraph, name: &str) -> Vec<String> {
        let id = graph.get(name).unwrap();
        graph
            .pre_tasks(id)
            .iter()
            .map(|&p| graph.task(p).name.clone())
            .collect()
    }

    #[test]
    fn test_forward_references_keep_listed_order() {
        let graph = graph(
            r#"
tasks:
  deploy:
    pre: [test, build]
  test: {}
  build: {}
"#,
        )
        .unwrap();
        assert!(["deploy", "test", "build"].iter().all(|n| graph.get(n).is_some()));
        assert_eq!(pre_names(&graph, "deploy"), vec!["test", "build"]);
    }

    #[test]
    fn test_unknown_pre_task() {
        let err = graph(
            r#"
tasks:
  build:
    pre: compile
"#,
        )
        .unwrap_err();
        match err {
            TuskError::Reference(ReferenceError::UnknownPreTask { task, missing }) => {
                assert_eq!(task, "build");
                assert_eq!(missing, "compile");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cycle_names_members() {
        let err = graph(
            r#"
tasks:
  a:
    pre: b
  b:
    pre: c
  c:
    pre: a
"#,
        )
        .unwrap_err();
        match err {
            TuskError::Reference(ReferenceError::Cycle { members }) => {
                assert_eq!(members, vec!["a", "b", "c", "a"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let err = graph("tasks:\n  loop:\n    pre: loop\n").unwrap_err();
        assert!(matches!(
            err,
            TuskError::Reference(ReferenceError::Cycle { ref members }) if members == &["loop", "loop"]
        ));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let graph = graph(
            r#"
tasks:
  all:
    pre: [left, right]
  left:
    pre: base
  right:
    pre: base
  base: {}
"#,
        )
        .unwrap();
        let root = graph.get("all").unwrap();
        let names: Vec<&str> = graph
            .reachable(root)
            .into_iter()
            .map(|id| graph.task(id).name.as_str())
            .collect();
        assert_eq!(names, vec!["all", "left", "base", "right"]);
    }
}
