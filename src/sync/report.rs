use crate::filesystem::Stub;

/// What the engine did with one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutcome {
    /// The whole directory went to the device in one push.
    PushedWholesale,
    /// Missing files (possibly none) were pushed and the subtree looks complete.
    Complete { pushed_files: usize },
    /// Missing files (possibly none) were pushed; subdirectories still need
    /// their own evaluation.
    Incomplete { pushed_files: usize },
}

impl NodeOutcome {
    /// Whether descendants of the node can be skipped for the rest of the run.
    pub fn covers_subtree(&self) -> bool {
        matches!(
            self,
            NodeOutcome::PushedWholesale | NodeOutcome::Complete { .. }
        )
    }

    fn pushed_files(&self) -> usize {
        match self {
            NodeOutcome::PushedWholesale => 0,
            NodeOutcome::Complete { pushed_files } | NodeOutcome::Incomplete { pushed_files } => {
                *pushed_files
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeFailure {
    pub stub: Stub,
    pub message: String,
}

/// Outcome of one sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    nodes_visited: usize,
    nodes_skipped: usize,
    wholesale_pushes: usize,
    batch_pushes: usize,
    files_pushed: usize,
    failures: Vec<NodeFailure>,
}

impl SyncReport {
    pub fn record(&mut self, outcome: NodeOutcome) {
        self.nodes_visited += 1;
        match outcome {
            NodeOutcome::PushedWholesale => self.wholesale_pushes += 1,
            other if other.pushed_files() > 0 => {
                self.batch_pushes += 1;
                self.files_pushed += other.pushed_files();
            }
            _ => {}
        }
    }

    pub fn record_skipped(&mut self) {
        self.nodes_skipped += 1;
    }

    pub fn record_failure(&mut self, stub: Stub, message: String) {
        self.failures.push(NodeFailure { stub, message });
    }

    pub fn nodes_visited(&self) -> usize {
        self.nodes_visited
    }

    pub fn nodes_skipped(&self) -> usize {
        self.nodes_skipped
    }

    pub fn wholesale_pushes(&self) -> usize {
        self.wholesale_pushes
    }

    pub fn batch_pushes(&self) -> usize {
        self.batch_pushes
    }

    pub fn files_pushed(&self) -> usize {
        self.files_pushed
    }

    /// Number of bulk-copy invocations, wholesale or batched.
    pub fn pushes(&self) -> usize {
        self.wholesale_pushes + self.batch_pushes
    }

    pub fn failures(&self) -> &[NodeFailure] {
        &self.failures
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
