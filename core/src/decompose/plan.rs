use std::collections::HashMap;

use serde::Serialize;

use crate::error::PlanError;

use super::types::TaskLike;

/// A dependency reference to a task that is not part of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingDependency {
    pub task_id: String,
    pub missing_dep: String,
}

/// Dependency-respecting total order of a task set.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionPlan<T> {
    pub order: Vec<T>,

    /// References ignored while ordering (treated as already satisfied).
    pub dangling: Vec<DanglingDependency>,
}

impl<T: TaskLike> ExecutionPlan<T> {
    pub fn task_ids(&self) -> Vec<&str> {
        self.order.iter().map(|t| t.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Pending,
    Resolved,
}

/// Task dependency graph (DAG)
#[derive(Debug, Clone)]
pub struct TaskGraph<T: TaskLike> {
    /// Task nodes: task_id -> Task
    nodes: HashMap<String, T>,

    /// Dependency edges: task_id -> list of dependencies
    edges: HashMap<String, Vec<String>>,

    /// Original insertion order (for stable sorting)
    insertion_order: Vec<String>,
}

impl<T: TaskLike> TaskGraph<T> {
    /// Construct task graph from task list
    pub fn from_tasks(tasks: &[T]) -> Result<Self, PlanError> {
        let mut nodes = HashMap::new();
        let mut edges = HashMap::new();
        let mut insertion_order = Vec::new();

        for task in tasks {
            if nodes.contains_key(task.id()) {
                return Err(PlanError::DuplicateTaskId(task.id().to_string()));
            }

            let task_id = task.id().to_string();
            nodes.insert(task_id.clone(), task.clone());
            edges.insert(task_id.clone(), task.dependencies().to_vec());
            insertion_order.push(task_id);
        }

        Ok(Self {
            nodes,
            edges,
            insertion_order,
        })
    }

    /// Dependencies that point outside the task set, in input order.
    pub fn dangling_dependencies(&self) -> Vec<DanglingDependency> {
        self.insertion_order
            .iter()
            .flat_map(|task_id| {
                self.edges
                    .get(task_id)
                    .into_iter()
                    .flatten()
                    .filter(|dep| !self.nodes.contains_key(dep.as_str()))
                    .map(move |dep| DanglingDependency {
                        task_id: task_id.clone(),
                        missing_dep: dep.clone(),
                    })
            })
            .collect()
    }

    /// Depth-first topological order with an explicit stack.
    ///
    /// Every task is emitted after all of its in-plan dependencies. Roots are
    /// taken in insertion order and dependencies in declaration order, so
    /// independent tasks keep their input order. Reaching a task that is
    /// still pending on the stack means a cycle.
    ///
    /// # Time Complexity
    ///
    /// O(V + E) where V = number of tasks, E = number of dependencies
    pub fn topological_order(&self) -> Result<Vec<String>, PlanError> {
        let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(self.nodes.len());
        let mut order: Vec<String> = Vec::with_capacity(self.nodes.len());

        for root in &self.insertion_order {
            if marks.contains_key(root.as_str()) {
                continue;
            }

            let mut stack: Vec<(&str, usize)> = vec![(root.as_str(), 0)];
            marks.insert(root.as_str(), Mark::Pending);

            while let Some(&(task_id, next)) = stack.last() {
                let deps = self.edges.get(task_id).map(Vec::as_slice).unwrap_or(&[]);

                if next >= deps.len() {
                    marks.insert(task_id, Mark::Resolved);
                    order.push(task_id.to_string());
                    stack.pop();
                    continue;
                }

                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }

                let dep = deps[next].as_str();
                if !self.nodes.contains_key(dep) {
                    continue;
                }

                match marks.get(dep) {
                    Some(Mark::Resolved) => {}
                    Some(Mark::Pending) => {
                        return Err(PlanError::CircularDependency {
                            task_id: dep.to_string(),
                            path: format_cycle_path(&stack, dep),
                        });
                    }
                    None => {
                        marks.insert(dep, Mark::Pending);
                        stack.push((dep, 0));
                    }
                }
            }
        }

        Ok(order)
    }

    /// Consume the graph into tasks following `topological_order`.
    pub fn into_plan(mut self) -> Result<ExecutionPlan<T>, PlanError> {
        let ids = self.topological_order()?;
        let dangling = self.dangling_dependencies();
        let order = ids
            .iter()
            .filter_map(|id| self.nodes.remove(id))
            .collect();
        Ok(ExecutionPlan { order, dangling })
    }
}

fn format_cycle_path(stack: &[(&str, usize)], repeated: &str) -> String {
    let start = stack
        .iter()
        .position(|(id, _)| *id == repeated)
        .unwrap_or(0);
    stack[start..]
        .iter()
        .map(|(id, _)| *id)
        .chain(std::iter::once(repeated))
        .collect::<Vec<_>>()
        .join(" -> ")
}
