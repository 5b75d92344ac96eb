use crate::models::TaskWithAssignee;

/// Title ordering applied on top of cache order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    None,
    AToZ,
    ZToA,
}

impl SortOrder {
    /// `none → a-z → z-a → none`
    pub fn next(self) -> Self {
        match self {
            SortOrder::None => SortOrder::AToZ,
            SortOrder::AToZ => SortOrder::ZToA,
            SortOrder::ZToA => SortOrder::None,
        }
    }
}

/// Search box and sort toggle. Produces a view over the cache, never edits it.
#[derive(Debug, Clone, Default)]
pub struct TaskView {
    pub search_query: String,
    pub sort_order: SortOrder,
}

impl TaskView {
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn toggle_sort(&mut self) {
        self.sort_order = self.sort_order.next();
    }

    pub fn apply<'a>(&self, tasks: &'a [TaskWithAssignee]) -> Vec<&'a TaskWithAssignee> {
        let query = self.search_query.trim().to_lowercase();

        let mut visible: Vec<&TaskWithAssignee> = tasks
            .iter()
            .filter(|t| query.is_empty() || matches_query(t, &query))
            .collect();

        match self.sort_order {
            SortOrder::None => {}
            SortOrder::AToZ => visible.sort_by_key(|t| t.task.title.to_lowercase()),
            SortOrder::ZToA => {
                visible.sort_by(|a, b| b.task.title.to_lowercase().cmp(&a.task.title.to_lowercase()))
            }
        }

        visible
    }
}

fn matches_query(task: &TaskWithAssignee, query: &str) -> bool {
    task.task.title.to_lowercase().contains(query)
        || task
            .task
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(query))
}
